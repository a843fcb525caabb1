//! Browser tests for the JavaScript surface.
//!
//! Run with: wasm-pack test --headless --chrome

#![cfg(target_arch = "wasm32")]
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use js_sys::Function;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;
use virtgrid::GridPane;

wasm_bindgen_test_configure!(run_in_browser);

fn js(source: &str) -> JsValue {
    js_sys::eval(source).unwrap()
}

fn body_pane() -> GridPane {
    GridPane::new(
        "1",
        "body",
        js("({ virtualizationThreshold: 100, excessRows: 5 })"),
        js("({ gridHeight: 300, gridWidth: 500 })"),
    )
    .unwrap()
}

#[wasm_bindgen_test]
fn test_scrolls_rows_from_js() {
    let mut pane = body_pane();
    pane.set_rows(js(
        "Array.from({ length: 1000 }, (_, i) => ({ key: i, height: 30 }))",
    ))
    .unwrap();
    pane.adjust_scroll_vertical(None, Some(0.5), true);
    assert_eq!(pane.current_top_row(), 490);
    let keys = pane.rendered_row_keys();
    assert_eq!(keys.len(), 20);
    assert_eq!(keys[0], "490");
    assert_eq!(pane.refresh_requests(), 1);
}

#[wasm_bindgen_test]
fn test_rejects_unknown_pane() {
    assert!(GridPane::new("1", "middle", JsValue::UNDEFINED, JsValue::UNDEFINED).is_err());
}

#[wasm_bindgen_test]
fn test_js_adjuster_register_and_remove() {
    let mut pane = body_pane();
    let adjuster = Function::new_with_args("a", "return { height: a.height - 40, width: a.width };");
    pane.register_viewport_adjuster(adjuster.clone());
    assert_eq!(pane.viewport_height(), 260.0);

    assert!(pane.remove_viewport_adjuster(&adjuster));
    assert!(!pane.remove_viewport_adjuster(&adjuster));
    assert_eq!(pane.viewport_height(), 300.0);
}

#[wasm_bindgen_test]
fn test_throwing_adjuster_is_skipped() {
    let mut pane = body_pane();
    pane.register_viewport_adjuster(Function::new_with_args("a", "throw new Error('nope');"));
    assert_eq!(pane.viewport_height(), 300.0);
}

#[wasm_bindgen_test]
fn test_column_widths_from_js() {
    let mut pane = body_pane();
    pane.set_columns(js(
        "[{ uid: 'a', width: 100 }, { uid: 'b', width: '50%' }, { uid: 'c', width: '*' }]",
    ))
    .unwrap();
    pane.update_column_widths().unwrap();
    assert_eq!(pane.canvas_width(), 500.0);
    let styles = pane.build_styles();
    assert!(styles.contains(".grid1 .ui-grid-colb { min-width: 200px; max-width: 200px; }"));
}
