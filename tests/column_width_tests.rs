//! Column width parsing and allocation tests

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use test_case::test_case;
use virtgrid::layout::allocate_column_widths;
use virtgrid::{Column, ColumnWidth, GridError};

fn columns(widths: &[&str]) -> Vec<Column> {
    widths
        .iter()
        .enumerate()
        .map(|(i, w)| Column::new(format!("c{i}"), w.parse().unwrap()))
        .collect()
}

fn drawn(columns: &[Column]) -> Vec<u32> {
    columns.iter().map(|c| c.drawn_width).collect()
}

#[test_case("120" => ColumnWidth::Pixels(120) ; "pixels")]
#[test_case("25%" => ColumnWidth::Percent(25.0) ; "percent")]
#[test_case("*" => ColumnWidth::Star(1) ; "single star")]
#[test_case("***" => ColumnWidth::Star(3) ; "triple star")]
fn test_parse_width(text: &str) -> ColumnWidth {
    text.parse().unwrap()
}

#[test]
fn test_parse_width_rejects_garbage() {
    let err = "wide".parse::<ColumnWidth>().unwrap_err();
    assert!(matches!(err, GridError::InvalidWidth(_)));
    assert_eq!(
        ColumnWidth::parse_lenient("wide"),
        ColumnWidth::Unspecified("wide".to_string())
    );
}

#[test]
fn test_column_definitions_from_json() {
    let json = r#"[
        {"uid": "name", "width": "*"},
        {"uid": "age", "width": 80, "maxWidth": 120},
        {"uid": "notes", "width": "30%", "visible": false}
    ]"#;
    let cols: Vec<Column> = serde_json::from_str(json).unwrap();
    assert_eq!(cols[0].width, ColumnWidth::Star(1));
    assert_eq!(cols[1].width, ColumnWidth::Pixels(80));
    assert_eq!(cols[1].max_width, Some(120));
    assert!(!cols[2].visible);
}

#[test]
fn test_three_sizing_classes() {
    let mut cols = columns(&["100", "50%", "*"]);
    let allocation = allocate_column_widths(&mut cols, 500);
    assert_eq!(drawn(&cols), vec![100, 200, 200]);
    assert_eq!(allocation.canvas_width, 500);
}

#[test_case(&["*", "*", "*"], 300 ; "equal stars")]
#[test_case(&["*", "**", "*"], 401 ; "weighted stars with remainder")]
#[test_case(&["20%", "30%", "*"], 777 ; "percent and star")]
#[test_case(&["50", "*", "*", "*"], 1000 ; "manual and stars")]
fn test_elastic_layout_fills_viewport(widths: &[&str], available: u32) {
    let mut cols = columns(widths);
    let allocation = allocate_column_widths(&mut cols, available);
    assert_eq!(drawn(&cols).iter().sum::<u32>(), available);
    assert_eq!(allocation.canvas_width, available);
}

#[test]
fn test_widths_respect_bounds() {
    let mut cols = vec![
        Column::new("a", ColumnWidth::Star(1)).with_min_width(250),
        Column::new("b", ColumnWidth::Star(1)).with_max_width(90),
        Column::new("c", ColumnWidth::Percent(10.0)).with_min_width(75),
        Column::new("d", ColumnWidth::Star(2)),
    ];
    allocate_column_widths(&mut cols, 900);
    for col in &cols {
        if let Some(min) = col.min_width {
            assert!(col.drawn_width >= min, "{} below min", col.uid);
        }
        if let Some(max) = col.max_width {
            assert!(col.drawn_width <= max, "{} above max", col.uid);
        }
    }
}

#[test]
fn test_manual_widths_overflow_viewport() {
    let mut cols = columns(&["300", "300", "300"]);
    let allocation = allocate_column_widths(&mut cols, 500);
    assert_eq!(drawn(&cols), vec![300, 300, 300]);
    assert_eq!(allocation.canvas_width, 900);
}

#[test]
fn test_hidden_columns_get_no_width() {
    let mut cols = vec![
        Column::new("a", ColumnWidth::Star(1)),
        Column::new("b", ColumnWidth::Pixels(100)).hidden(),
        Column::new("c", ColumnWidth::Percent(50.0)).hidden(),
    ];
    allocate_column_widths(&mut cols, 400);
    assert_eq!(drawn(&cols), vec![400, 0, 0]);
}

#[test]
fn test_class_definition_text() {
    let mut col = Column::new("7", ColumnWidth::Pixels(120));
    col.drawn_width = 120;
    assert_eq!(col.class_name(), "ui-grid-col7");
    assert_eq!(
        col.class_definition("42"),
        " .grid42 .ui-grid-col7 { min-width: 120px; max-width: 120px; }"
    );
}
