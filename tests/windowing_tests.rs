//! Window selection tests
//!
//! Covers the pure windowing math: rows needed to fill a viewport, the
//! target index for a scroll percentage, hysteresis and window ranges.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use test_case::test_case;
use virtgrid::layout::windowing::Hysteresis;
use virtgrid::layout::{
    min_columns_to_render, min_rows_to_render, target_index, AnchorRequest, WindowRequest,
};
use virtgrid::{Column, ColumnWidth, Row, ScrollDirection};

fn uniform_rows(count: usize, height: f64) -> Vec<Row> {
    (0..count).map(|i| Row::new(i, height)).collect()
}

fn drawn_columns(widths: &[u32]) -> Vec<Column> {
    widths
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let mut column = Column::new(format!("c{i}"), ColumnWidth::Pixels(w));
            column.drawn_width = w;
            column
        })
        .collect()
}

#[test_case(300.0 => 10 ; "exact fit")]
#[test_case(301.0 => 11 ; "one pixel over")]
#[test_case(15.0 => 1 ; "smaller than a row")]
#[test_case(0.0 => 0 ; "empty viewport")]
fn test_min_rows_uniform(viewport_height: f64) -> usize {
    min_rows_to_render(&uniform_rows(1000, 30.0), viewport_height)
}

#[test]
fn test_min_rows_whole_cache_when_short() {
    assert_eq!(min_rows_to_render(&uniform_rows(4, 30.0), 300.0), 4);
}

#[test_case(0.0 => 0 ; "top")]
#[test_case(0.5 => 495 ; "middle")]
#[test_case(1.0 => 990 ; "bottom")]
#[test_case(1.5 => 990 ; "past the end")]
#[test_case(-0.2 => 0 ; "negative")]
fn test_target_index_for_1000_rows(percentage: f64) -> usize {
    target_index(990, percentage)
}

#[test]
fn test_target_index_never_exceeds_max() {
    for max_index in [0_usize, 1, 7, 990] {
        for step in 0..=100 {
            let percentage = f64::from(step) / 100.0;
            assert!(target_index(max_index, percentage) <= max_index);
        }
    }
}

#[test]
fn test_windows_for_1000_rows() {
    let request = WindowRequest {
        cache_len: 1000,
        min_visible: 10,
        target: 0,
        excess: 5,
        virtualize: true,
    };
    assert_eq!(request.max_index(), 990);
    assert_eq!(request.range(), 0..15);
    assert_eq!(WindowRequest { target: 495, ..request }.range(), 490..510);
    assert_eq!(WindowRequest { target: 990, ..request }.range(), 985..1000);
}

#[test]
fn test_window_always_within_cache() {
    for cache_len in [0_usize, 1, 5, 50, 1000] {
        for target in [0_usize, 3, 49, 999, 5000] {
            for virtualize in [true, false] {
                let range = WindowRequest {
                    cache_len,
                    min_visible: 10,
                    target,
                    excess: 4,
                    virtualize,
                }
                .range();
                assert!(range.start <= range.end, "{range:?}");
                assert!(range.end <= cache_len, "{range:?} exceeds {cache_len}");
            }
        }
    }
}

#[test]
fn test_small_cache_renders_whole() {
    let request = WindowRequest {
        cache_len: 5,
        min_visible: 5,
        target: 0,
        excess: 4,
        virtualize: false,
    };
    assert_eq!(request.range(), 0..5);
}

#[test]
fn test_hysteresis_threshold_both_directions() {
    let down = Hysteresis {
        previous_position: 100.0,
        position: 130.0,
        previous_index: 20,
        threshold: 4,
    };
    assert!(down.suppresses(23, 990));
    assert!(!down.suppresses(24, 990));

    let up = Hysteresis {
        previous_position: 130.0,
        position: 100.0,
        ..down
    };
    assert!(up.suppresses(17, 990));
    assert!(!up.suppresses(16, 990));

    let still = Hysteresis {
        position: 100.0,
        ..up
    };
    assert!(!still.suppresses(20, 990));
}

#[test]
fn test_min_columns_partial_edges() {
    let columns = drawn_columns(&[120; 10]);
    // 400px shows three full columns and part of a fourth
    assert_eq!(min_columns_to_render(&columns, 400.0), 4);
    assert_eq!(min_columns_to_render(&columns, 2000.0), 10);
    assert_eq!(min_columns_to_render(&[], 400.0), 0);
}

#[test]
fn test_anchor_up_from_top() {
    let request = AnchorRequest {
        direction: ScrollDirection::Up,
        anchor: 0,
        cache_len: 300,
        min_visible: 10,
        excess: 4,
    };
    assert_eq!(request.range(), Some(0..14));
    assert_eq!(
        AnchorRequest {
            direction: ScrollDirection::None,
            ..request
        }
        .range(),
        None
    );
}
