use std::io;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use scanview::app::App;
use scanview::config::Config;
use scanview::data::source::{DataSource, DirectoryDataSource};
use scanview::logging;

fn print_usage() {
    println!("scanview - terminal viewer for model scan results");
    println!();
    println!("Usage: scanview [DATA_DIR]");
    println!();
    println!("  DATA_DIR  directory holding scans/transcripts/validation");
    println!("            .json or .csv files (overrides the config file)");
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        print_usage();
        return Ok(());
    }

    logging::init_tracing();

    let mut config = Config::load()?;
    if let Some(dir) = args.first() {
        config.data.directory = Some(PathBuf::from(dir));
    }

    let source: Option<Box<dyn DataSource>> = config
        .data
        .directory
        .clone()
        .map(|dir| Box::new(DirectoryDataSource::new(dir)) as Box<dyn DataSource>);

    info!(
        directory = ?config.data.directory,
        "starting viewer"
    );

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config, source);
    let result = app.run(&mut terminal);

    // Always restore the terminal, even when the loop errored
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}
