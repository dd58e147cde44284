use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use tracing::debug;

use crate::data::data_view::{DataView, SortSpec};
use crate::data::datatable::{DataColumn, DataRow, DataTable};
use crate::data::loaders;
use crate::filter::FilterCondition;

/// A cursor-paged slice of rows
#[derive(Debug, Clone)]
pub struct Page {
    pub items: Vec<DataRow>,
    pub columns: Vec<DataColumn>,
    /// Present when more rows exist past this page
    pub next_cursor: Option<String>,
    /// Rows matching the filter, across all pages
    pub total_count: usize,
}

#[derive(Debug, Clone)]
pub struct PageRequest {
    pub limit: usize,
    pub cursor: Option<String>,
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            cursor: None,
        }
    }

    pub fn after(limit: usize, cursor: impl Into<String>) -> Self {
        Self {
            limit,
            cursor: Some(cursor.into()),
        }
    }
}

/// Abstracts where rows come from; the grid only ever sees pages
pub trait DataSource: Send + Sync {
    /// Fetch one page of rows at `location`, filtered and ordered
    fn fetch(
        &self,
        location: &str,
        filter: Option<&FilterCondition>,
        order_by: &[SortSpec],
        request: &PageRequest,
    ) -> Result<Page>;
}

/// Resolves a row to a navigable route for activation and open-in-new-view
pub trait RouteResolver: Send + Sync {
    fn route_for(&self, location: &str, row_id: &str) -> String;
}

/// Default route shape: `<location>/<row id>`
#[derive(Debug, Clone, Default)]
pub struct PathRouteResolver;

impl RouteResolver for PathRouteResolver {
    fn route_for(&self, location: &str, row_id: &str) -> String {
        format!("{}/{}", location, row_id)
    }
}

fn page_of(
    table: &DataTable,
    filter: Option<&FilterCondition>,
    order_by: &[SortSpec],
    request: &PageRequest,
) -> Result<Page> {
    let mut view = DataView::new(Arc::new(table.clone()));
    view.apply(filter, order_by);

    let total = view.row_count();
    let offset: usize = match &request.cursor {
        None => 0,
        Some(cursor) => cursor
            .parse()
            .map_err(|_| anyhow!("malformed page cursor {:?}", cursor))?,
    };

    let end = (offset + request.limit).min(total);
    let items: Vec<DataRow> = (offset..end)
        .filter_map(|i| view.get_row(i).cloned())
        .collect();
    let next_cursor = (end < total).then(|| end.to_string());

    debug!(
        offset,
        returned = items.len(),
        total,
        has_more = next_cursor.is_some(),
        "page served"
    );

    Ok(Page {
        items,
        columns: table.columns.clone(),
        next_cursor,
        total_count: total,
    })
}

/// In-memory source over preloaded tables, keyed by location
#[derive(Default)]
pub struct MemoryDataSource {
    tables: HashMap<String, DataTable>,
}

impl MemoryDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, table: DataTable) {
        self.tables.insert(location.into(), table);
    }
}

impl DataSource for MemoryDataSource {
    fn fetch(
        &self,
        location: &str,
        filter: Option<&FilterCondition>,
        order_by: &[SortSpec],
        request: &PageRequest,
    ) -> Result<Page> {
        let table = self
            .tables
            .get(location)
            .ok_or_else(|| anyhow!("unknown location {:?}", location))?;
        page_of(table, filter, order_by, request)
    }
}

/// Source backed by a directory of `<location>.json` / `<location>.csv`
/// files, loaded lazily and cached
pub struct DirectoryDataSource {
    directory: PathBuf,
    cache: Mutex<HashMap<String, Arc<DataTable>>>,
}

impl DirectoryDataSource {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    fn load(&self, location: &str) -> Result<Arc<DataTable>> {
        if let Some(table) = self
            .cache
            .lock()
            .map_err(|_| anyhow!("source cache poisoned"))?
            .get(location)
        {
            return Ok(Arc::clone(table));
        }

        let json_path = self.directory.join(format!("{}.json", location));
        let csv_path = self.directory.join(format!("{}.csv", location));

        let table = if json_path.exists() {
            loaders::load_json_to_datatable(&json_path, location)?
        } else if csv_path.exists() {
            loaders::load_csv_to_datatable(&csv_path, location)?
        } else {
            return Err(anyhow!(
                "no {}.json or {}.csv under {}",
                location,
                location,
                self.directory.display()
            ));
        };

        let table = Arc::new(table);
        self.cache
            .lock()
            .map_err(|_| anyhow!("source cache poisoned"))?
            .insert(location.to_string(), Arc::clone(&table));
        Ok(table)
    }
}

impl DataSource for DirectoryDataSource {
    fn fetch(
        &self,
        location: &str,
        filter: Option<&FilterCondition>,
        order_by: &[SortSpec],
        request: &PageRequest,
    ) -> Result<Page> {
        let table = self.load(location)?;
        page_of(&table, filter, order_by, request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::datatable::{DataColumn, DataValue};
    use crate::filter::{FilterOperand, FilterOperator, FilterValue};

    fn source_with_rows(n: usize) -> MemoryDataSource {
        let mut table = DataTable::new("scans");
        table.add_column(DataColumn::new("id"));
        table.add_column(DataColumn::new("score"));
        for i in 0..n {
            table
                .add_row(DataRow::new(
                    format!("s{}", i),
                    vec![
                        DataValue::String(format!("s{}", i)),
                        DataValue::Integer(i as i64),
                    ],
                ))
                .unwrap();
        }
        let mut source = MemoryDataSource::new();
        source.insert("scans", table);
        source
    }

    #[test]
    fn test_cursor_paging() {
        let source = source_with_rows(25);

        let page = source
            .fetch("scans", None, &[], &PageRequest::first(10))
            .unwrap();
        assert_eq!(page.items.len(), 10);
        assert_eq!(page.total_count, 25);
        assert_eq!(page.next_cursor.as_deref(), Some("10"));

        let page = source
            .fetch("scans", None, &[], &PageRequest::after(10, "20"))
            .unwrap();
        assert_eq!(page.items.len(), 5);
        // Final page: no cursor means no more data
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_filtered_paging_counts_matches() {
        let source = source_with_rows(25);
        let cond = FilterCondition::compare(
            "score",
            FilterOperator::LessThan,
            FilterOperand::Single(FilterValue::Number(5.0)),
        );

        let page = source
            .fetch("scans", Some(&cond), &[], &PageRequest::first(10))
            .unwrap();
        assert_eq!(page.total_count, 5);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.next_cursor, None);
    }

    #[test]
    fn test_ordered_paging() {
        let source = source_with_rows(5);
        let page = source
            .fetch(
                "scans",
                None,
                &[SortSpec::descending("score")],
                &PageRequest::first(2),
            )
            .unwrap();
        let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["s4", "s3"]);
    }

    #[test]
    fn test_unknown_location_errors() {
        let source = source_with_rows(1);
        assert!(source
            .fetch("nope", None, &[], &PageRequest::first(10))
            .is_err());
    }

    #[test]
    fn test_malformed_cursor_errors() {
        let source = source_with_rows(1);
        assert!(source
            .fetch("scans", None, &[], &PageRequest::after(10, "bogus"))
            .is_err());
    }

    #[test]
    fn test_route_resolver() {
        let resolver = PathRouteResolver;
        assert_eq!(resolver.route_for("scans", "s3"), "scans/s3");
    }
}
