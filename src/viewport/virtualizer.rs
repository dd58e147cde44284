use std::collections::HashMap;
use std::ops::Range;
use tracing::trace;

/// Layout of one virtualized row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualItem {
    pub index: usize,
    /// Offset of the row's leading edge from the top of the content
    pub start: usize,
    pub size: u16,
    pub end: usize,
    /// Masonry sub-track; always 0 with a single lane
    pub lane: usize,
}

/// Where to place a row when scrolling to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
    /// Nearest edge if off-screen, no movement if already visible
    Auto,
}

/// Computes which row indices intersect a scrolled viewport
///
/// Row extents come from an estimator and are corrected by dynamic
/// measurements after rows mount; a correction shifts every later row's
/// offsets without touching their sizes. The measurement cache is dropped
/// whenever the row count, the estimator, or the lane count changes.
pub struct RowVirtualizer {
    count: usize,
    estimator: Box<dyn Fn(usize) -> u16 + Send>,
    lane_count: usize,
    overscan: usize,
    /// Index-keyed prefix of computed layouts, extended on demand
    measurements: Vec<VirtualItem>,
    /// Dynamic size corrections, by row index
    measured_sizes: HashMap<usize, u16>,
}

impl RowVirtualizer {
    pub fn new(count: usize, estimate: u16) -> Self {
        Self::with_estimator(count, Box::new(move |_| estimate))
    }

    pub fn with_estimator(count: usize, estimator: Box<dyn Fn(usize) -> u16 + Send>) -> Self {
        Self {
            count,
            estimator,
            lane_count: 1,
            overscan: 2,
            measurements: Vec::new(),
            measured_sizes: HashMap::new(),
        }
    }

    pub fn with_overscan(mut self, overscan: usize) -> Self {
        self.overscan = overscan;
        self
    }

    pub fn with_lane_count(mut self, lane_count: usize) -> Self {
        self.lane_count = lane_count.max(1);
        self.measurements.clear();
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn overscan(&self) -> usize {
        self.overscan
    }

    /// Replace the row count, invalidating all cached layout
    pub fn set_count(&mut self, count: usize) {
        if self.count != count {
            self.count = count;
            self.measurements.clear();
            self.measured_sizes.clear();
        }
    }

    /// Replace the size estimator, invalidating all cached layout
    pub fn set_estimator(&mut self, estimator: Box<dyn Fn(usize) -> u16 + Send>) {
        self.estimator = estimator;
        self.measurements.clear();
        self.measured_sizes.clear();
    }

    pub fn set_lane_count(&mut self, lane_count: usize) {
        let lane_count = lane_count.max(1);
        if self.lane_count != lane_count {
            self.lane_count = lane_count;
            self.measurements.clear();
        }
    }

    /// Record the actual mounted size of a row
    ///
    /// Later rows keep their sizes; their offsets shift when next computed.
    pub fn measure_row(&mut self, index: usize, size: u16) {
        if index >= self.count {
            return;
        }
        let current = self.size_of(index);
        if current == size {
            return;
        }
        trace!(index, from = current, to = size, "row remeasured");
        self.measured_sizes.insert(index, size);
        self.measurements.truncate(index);
    }

    fn size_of(&self, index: usize) -> u16 {
        self.measured_sizes
            .get(&index)
            .copied()
            .unwrap_or_else(|| (self.estimator)(index))
    }

    /// Extend the layout cache so indices `..=index` are available
    fn ensure_measured_to(&mut self, index: usize) {
        let upto = index.min(self.count.saturating_sub(1));
        while self.measurements.len() <= upto {
            let i = self.measurements.len();
            let lane = i % self.lane_count;
            let start = self
                .measurements
                .iter()
                .rev()
                .find(|item| item.lane == lane)
                .map(|item| item.end)
                .unwrap_or(0);
            let size = self.size_of(i);
            self.measurements.push(VirtualItem {
                index: i,
                start,
                size,
                end: start + size as usize,
                lane,
            });
        }
    }

    /// Layout of a single row
    pub fn item(&mut self, index: usize) -> Option<VirtualItem> {
        if index >= self.count {
            return None;
        }
        self.ensure_measured_to(index);
        self.measurements.get(index).copied()
    }

    /// Total content extent, for scrollbar math
    pub fn total_size(&mut self) -> usize {
        if self.count == 0 {
            return 0;
        }
        self.ensure_measured_to(self.count - 1);
        self.measurements
            .iter()
            .map(|item| item.end)
            .max()
            .unwrap_or(0)
    }

    /// Index range intersecting `[offset, offset + viewport)`, padded by
    /// the overscan on both sides
    ///
    /// Empty when there are no rows or no viewport; otherwise never empty.
    pub fn visible_range(&mut self, offset: usize, viewport: u16) -> Range<usize> {
        if self.count == 0 || viewport == 0 {
            return 0..0;
        }

        self.ensure_measured_to(self.count - 1);
        let limit = offset + viewport as usize;

        let mut first = None;
        let mut last = 0;
        for item in &self.measurements {
            if item.end > offset && item.start < limit {
                if first.is_none() {
                    first = Some(item.index);
                }
                last = item.index;
            }
        }

        // Scrolled past the end: clamp to the final row
        let (first, last) = match first {
            Some(f) => (f, last),
            None => (self.count - 1, self.count - 1),
        };

        let start = first.saturating_sub(self.overscan);
        let end = (last + self.overscan).min(self.count - 1);
        start..end + 1
    }

    /// Scroll offset that places `index` per the alignment
    ///
    /// With dynamic measurements still landing, callers re-run this after
    /// each correction until the offset stops moving.
    pub fn scroll_to_index(
        &mut self,
        index: usize,
        align: Align,
        viewport: u16,
        current_offset: usize,
    ) -> usize {
        if self.count == 0 {
            return 0;
        }
        let index = index.min(self.count - 1);
        let item = match self.item(index) {
            Some(item) => item,
            None => return current_offset,
        };
        let total = self.total_size();
        let viewport = viewport as usize;
        let max_offset = total.saturating_sub(viewport);

        let target = match align {
            Align::Start => item.start,
            Align::End => (item.end).saturating_sub(viewport),
            Align::Center => {
                let slack = viewport.saturating_sub(item.size as usize) / 2;
                item.start.saturating_sub(slack)
            }
            Align::Auto => {
                if item.start < current_offset {
                    item.start
                } else if item.end > current_offset + viewport {
                    item.end.saturating_sub(viewport)
                } else {
                    current_offset
                }
            }
        };

        target.min(max_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_zero_viewport() {
        let mut v = RowVirtualizer::new(0, 1);
        assert!(v.visible_range(0, 10).is_empty());
        assert_eq!(v.total_size(), 0);

        let mut v = RowVirtualizer::new(100, 1);
        assert!(v.visible_range(0, 0).is_empty());
    }

    #[test]
    fn test_range_covers_viewport() {
        let mut v = RowVirtualizer::new(100, 1).with_overscan(0);
        assert_eq!(v.visible_range(0, 10), 0..10);
        assert_eq!(v.visible_range(5, 10), 5..15);
        assert_eq!(v.total_size(), 100);
    }

    #[test]
    fn test_overscan_padding() {
        let mut v = RowVirtualizer::new(100, 1).with_overscan(3);
        assert_eq!(v.visible_range(10, 10), 7..23);
        // Clamped at the edges
        assert_eq!(v.visible_range(0, 10), 0..13);
        assert_eq!(v.visible_range(90, 10), 87..100);
    }

    #[test]
    fn test_dynamic_measurement_shifts_later_rows() {
        let mut v = RowVirtualizer::new(10, 2).with_overscan(0);
        let before = v.item(5).unwrap();
        assert_eq!(before.start, 10);

        // Row 2 turns out to be taller than estimated
        v.measure_row(2, 6);
        let after = v.item(5).unwrap();
        assert_eq!(after.start, 14);
        assert_eq!(after.size, 2);
        assert_eq!(v.total_size(), 24);

        // Rows before the correction are untouched
        assert_eq!(v.item(1).unwrap().start, 2);
    }

    #[test]
    fn test_scroll_to_index_alignments() {
        let mut v = RowVirtualizer::new(100, 1);

        assert_eq!(v.scroll_to_index(50, Align::Start, 10, 0), 50);
        assert_eq!(v.scroll_to_index(50, Align::End, 10, 0), 41);
        assert_eq!(v.scroll_to_index(50, Align::Center, 10, 0), 46);

        // Auto: no movement when already visible, nearest edge otherwise
        assert_eq!(v.scroll_to_index(5, Align::Auto, 10, 3), 3);
        assert_eq!(v.scroll_to_index(2, Align::Auto, 10, 3), 2);
        assert_eq!(v.scroll_to_index(20, Align::Auto, 10, 3), 11);

        // Clamped to the scrollable extent
        assert_eq!(v.scroll_to_index(99, Align::Start, 10, 0), 90);
    }

    #[test]
    fn test_scroll_to_index_converges_with_measurements() {
        let mut v = RowVirtualizer::new(100, 1);
        let mut offset = v.scroll_to_index(60, Align::Start, 10, 0);

        // A mount-time measurement lands; re-running moves the offset once
        v.measure_row(10, 5);
        let next = v.scroll_to_index(60, Align::Start, 10, offset);
        assert_ne!(next, offset);
        offset = next;

        // No further corrections: the offset is a fixed point
        assert_eq!(v.scroll_to_index(60, Align::Start, 10, offset), offset);
    }

    #[test]
    fn test_invalidation_on_count_change() {
        let mut v = RowVirtualizer::new(10, 2);
        v.measure_row(3, 8);
        assert_eq!(v.total_size(), 26);

        v.set_count(20);
        // Measurements reset with the new population
        assert_eq!(v.total_size(), 40);
    }
}
