use tracing::debug;

/// Edge-triggered watcher for infinite-scroll paging
///
/// Fires when the distance from the bottom of the content first drops below
/// the threshold, then stays quiet until it re-arms, either by scrolling
/// back above the threshold or by new content arriving (content growth).
/// Deduplicating against an in-flight fetch is the caller's job; the
/// watcher never swallows a legitimate crossing.
#[derive(Debug, Clone)]
pub struct FetchWatcher {
    threshold: usize,
    below: bool,
    last_content: usize,
}

impl FetchWatcher {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            below: false,
            last_content: 0,
        }
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Feed a scroll tick; true means "request the next page now"
    pub fn observe(&mut self, offset: usize, viewport: usize, content: usize) -> bool {
        if content != self.last_content {
            // New data (or a reset) re-arms the trigger
            self.last_content = content;
            self.below = false;
        }

        let distance = content.saturating_sub(offset + viewport);
        let was_below = self.below;
        self.below = distance < self.threshold;

        let fire = self.below && !was_below;
        if fire {
            debug!(distance, threshold = self.threshold, "near end of content");
        }
        fire
    }

    /// Forget everything, e.g. when the panel's data is replaced wholesale
    pub fn reset(&mut self) {
        self.below = false;
        self.last_content = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_once_per_crossing() {
        let mut w = FetchWatcher::new(500);

        // Far from the bottom: nothing
        assert!(!w.observe(0, 100, 10_000));
        // Crossing under the threshold fires exactly once
        assert!(w.observe(9_401, 100, 10_000));
        // Subsequent ticks below the threshold stay quiet
        assert!(!w.observe(9_450, 100, 10_000));
        assert!(!w.observe(9_900, 100, 10_000));
    }

    #[test]
    fn test_rearms_after_scrolling_away() {
        let mut w = FetchWatcher::new(500);
        assert!(w.observe(9_600, 100, 10_000));
        assert!(!w.observe(9_700, 100, 10_000));

        // Back above the threshold, then below again
        assert!(!w.observe(1_000, 100, 10_000));
        assert!(w.observe(9_600, 100, 10_000));
    }

    #[test]
    fn test_rearms_when_content_grows() {
        let mut w = FetchWatcher::new(500);
        assert!(w.observe(9_600, 100, 10_000));
        assert!(!w.observe(9_650, 100, 10_000));

        // A new page landed; still near the (new) bottom, so fire again
        assert!(w.observe(11_600, 100, 12_000));
        assert!(!w.observe(11_650, 100, 12_000));
    }

    #[test]
    fn test_exact_threshold_boundary() {
        let mut w = FetchWatcher::new(500);
        // distance == threshold is not yet a crossing
        assert!(!w.observe(9_400, 100, 10_000));
        // distance == 499 is
        assert!(w.observe(9_401, 100, 10_000));
    }
}
