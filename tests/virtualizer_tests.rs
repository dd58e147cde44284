use scanview::viewport::{Align, RowVirtualizer};

#[test]
fn test_range_emptiness_matches_population() {
    // Non-empty exactly when there are rows and a viewport to fill
    for count in [0usize, 1, 7, 100, 5_000] {
        for viewport in [0u16, 1, 10, 200] {
            let mut v = RowVirtualizer::new(count, 1);
            let range = v.visible_range(0, viewport);
            if count > 0 && viewport > 0 {
                assert!(
                    !range.is_empty(),
                    "expected rows for count={} viewport={}",
                    count,
                    viewport
                );
            } else {
                assert!(
                    range.is_empty(),
                    "expected empty range for count={} viewport={}",
                    count,
                    viewport
                );
            }
        }
    }
}

#[test]
fn test_range_is_clamped_to_population() {
    let mut v = RowVirtualizer::new(10, 1).with_overscan(5);
    // Overscan never escapes the row population
    let range = v.visible_range(0, 100);
    assert_eq!(range, 0..10);

    // Scrolled far past the end: still a valid, clamped range
    let range = v.visible_range(10_000, 10);
    assert!(!range.is_empty());
    assert!(range.end <= 10);
}

#[test]
fn test_cumulative_offsets_are_contiguous() {
    let mut v = RowVirtualizer::with_estimator(50, Box::new(|i| 1 + (i % 3) as u16));
    let mut expected_start = 0usize;
    for i in 0..50 {
        let item = v.item(i).unwrap();
        assert_eq!(item.index, i);
        assert_eq!(item.start, expected_start);
        assert_eq!(item.end, item.start + item.size as usize);
        assert_eq!(item.lane, 0);
        expected_start = item.end;
    }
    assert_eq!(v.total_size(), expected_start);
}

#[test]
fn test_measurement_correction_shifts_only_later_rows() {
    let mut v = RowVirtualizer::new(30, 2);
    let starts_before: Vec<usize> = (0..30).map(|i| v.item(i).unwrap().start).collect();

    v.measure_row(10, 7);

    for (i, before) in starts_before.iter().enumerate() {
        let after = v.item(i).unwrap();
        if i <= 10 {
            assert_eq!(after.start, *before, "row {} must not move", i);
        } else {
            // Every later row shifts by the 5-cell correction
            assert_eq!(after.start, before + 5, "row {} must shift", i);
        }
        if i != 10 {
            assert_eq!(after.size, 2, "row {} keeps its estimate", i);
        }
    }
}

#[test]
fn test_scroll_to_index_fixed_point_under_dynamic_sizes() {
    let mut v = RowVirtualizer::new(200, 1);
    let viewport = 20u16;
    let mut offset = v.scroll_to_index(150, Align::Center, viewport, 0);

    // Measurements trickle in as rows mount; keep converging
    for (row, size) in [(3usize, 4u16), (40, 2), (149, 3)] {
        v.measure_row(row, size);
        for _ in 0..4 {
            let next = v.scroll_to_index(150, Align::Center, viewport, offset);
            if next == offset {
                break;
            }
            offset = next;
        }
    }

    // At the fixed point the target row really is inside the window
    let item = v.item(150).unwrap();
    assert!(item.start >= offset);
    assert!(item.end <= offset + viewport as usize);
    assert_eq!(
        v.scroll_to_index(150, Align::Center, viewport, offset),
        offset
    );
}

#[test]
fn test_alignment_semantics() {
    let mut v = RowVirtualizer::new(100, 2);
    let viewport = 10u16;

    let start = v.scroll_to_index(30, Align::Start, viewport, 0);
    assert_eq!(start, 60);

    let end = v.scroll_to_index(30, Align::End, viewport, 0);
    assert_eq!(end, 62 - viewport as usize);

    // Auto leaves an already-visible row alone
    let auto = v.scroll_to_index(30, Align::Auto, viewport, 58);
    assert_eq!(auto, 58);
}
