//! JavaScript surface: one [`GridPane`] per rendered pane.
//!
//! Options, geometry, rows and columns cross the boundary as plain objects
//! and go through `serde-wasm-bindgen`. Viewport adjusters are JavaScript
//! functions taking and returning `{ height, width }`.
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { GridPane } from 'virtgrid';
//! await init();
//! const pane = new GridPane('1', 'body', { virtualizationThreshold: 20 },
//!                           { gridHeight: 400, gridWidth: 800, headerHeight: 30 });
//! pane.set_rows(rows.map((r, i) => ({ key: r.id, height: 30 })));
//! pane.set_columns([{ uid: 'name', width: '*' }, { uid: 'age', width: 80 }]);
//! pane.update_column_widths();
//! pane.adjust_scroll_vertical(el.scrollTop, undefined, false);
//! ```

use std::rc::Rc;

use js_sys::Function;
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;

use crate::container::RenderContainer;
use crate::error::{GridError, Result};
use crate::grid::{GridContext, GridHost};
use crate::layout::{ViewportAdjuster, ViewportAdjustment};
use crate::types::{Column, GridGeometry, GridOptions, PaneName, Row, ScrollDirection};

/// Viewport adjuster backed by a JavaScript function.
struct JsAdjuster {
    callback: Function,
}

impl ViewportAdjuster for JsAdjuster {
    fn adjust(&self, current: ViewportAdjustment) -> Result<ViewportAdjustment> {
        let arg = serde_wasm_bindgen::to_value(&current)
            .map_err(|e| GridError::Adjuster(e.to_string()))?;
        let out = self
            .callback
            .call1(&JsValue::NULL, &arg)
            .map_err(|e| GridError::Adjuster(format!("{e:?}")))?;
        serde_wasm_bindgen::from_value(out).map_err(|e| GridError::Adjuster(e.to_string()))
    }
}

/// Deserialize a JS object, treating `undefined`/`null` as the default.
fn from_js_or_default<T: DeserializeOwned + Default>(value: JsValue) -> Result<T> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|e| GridError::InvalidConfig(e.to_string()))
}

fn to_js<T: serde::Serialize + ?Sized>(value: &T) -> std::result::Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// A render container together with the grid state it reads.
#[wasm_bindgen]
pub struct GridPane {
    host: Rc<GridHost>,
    container: RenderContainer,
    adjusters: Vec<(Function, Rc<dyn ViewportAdjuster>)>,
}

#[wasm_bindgen]
impl GridPane {
    /// Create a pane (`"body"`, `"left"` or `"right"`) for grid `id`.
    ///
    /// # Errors
    /// Returns an error for an unknown pane name or invalid options/geometry.
    #[wasm_bindgen(constructor)]
    pub fn new(
        id: &str,
        pane: &str,
        options: JsValue,
        geometry: JsValue,
    ) -> std::result::Result<GridPane, JsValue> {
        console_error_panic_hook::set_once();

        let pane: PaneName = pane.parse()?;
        let options: GridOptions = from_js_or_default(options)?;
        options.validate()?;
        let geometry: GridGeometry = from_js_or_default(geometry)?;

        let host = Rc::new(GridHost::new(id, options, geometry));
        let container = RenderContainer::new(pane, Rc::clone(&host) as Rc<dyn GridContext>);
        log::debug!("created {pane} pane for grid {id}");
        Ok(Self {
            host,
            container,
            adjusters: Vec::new(),
        })
    }

    /// # Errors
    /// Returns an error if the options are malformed or invalid.
    pub fn set_options(&mut self, options: JsValue) -> std::result::Result<(), JsValue> {
        let options: GridOptions = from_js_or_default(options)?;
        options.validate()?;
        self.host.set_options(options);
        Ok(())
    }

    /// # Errors
    /// Returns an error if the geometry is malformed.
    pub fn set_geometry(&mut self, geometry: JsValue) -> std::result::Result<(), JsValue> {
        let geometry: GridGeometry = from_js_or_default(geometry)?;
        self.host.set_geometry(geometry);
        Ok(())
    }

    pub fn set_pinned_columns(&mut self, left: bool, right: bool) {
        self.host.set_pinned_columns(left, right);
    }

    /// `"up"`, `"down"` or anything else for none.
    pub fn set_scroll_direction(&mut self, direction: &str) {
        let direction = match direction {
            "up" => ScrollDirection::Up,
            "down" => ScrollDirection::Down,
            _ => ScrollDirection::None,
        };
        self.host.set_scroll_direction(direction);
    }

    /// Replace the row cache with an array of `{ key, height }`.
    ///
    /// # Errors
    /// Returns an error if the array cannot be read as rows.
    pub fn set_rows(&mut self, rows: JsValue) -> std::result::Result<(), JsValue> {
        let rows: Vec<Row> = from_js_or_default(rows)?;
        self.container.set_visible_rows(rows);
        Ok(())
    }

    /// Append rows to the cache.
    ///
    /// # Errors
    /// Returns an error if the array cannot be read as rows.
    pub fn append_rows(&mut self, rows: JsValue) -> std::result::Result<(), JsValue> {
        let rows: Vec<Row> = from_js_or_default(rows)?;
        self.container.append_rows(rows);
        Ok(())
    }

    /// Replace the column cache with an array of column definitions.
    ///
    /// # Errors
    /// Returns an error if a definition, or its width, cannot be read.
    pub fn set_columns(&mut self, columns: JsValue) -> std::result::Result<(), JsValue> {
        let columns: Vec<Column> = from_js_or_default(columns)?;
        self.container.set_visible_columns(columns);
        Ok(())
    }

    pub fn reset(&mut self) {
        self.container.reset();
    }

    pub fn register_viewport_adjuster(&mut self, callback: Function) {
        let adjuster: Rc<dyn ViewportAdjuster> = Rc::new(JsAdjuster {
            callback: callback.clone(),
        });
        self.container.register_viewport_adjuster(Rc::clone(&adjuster));
        self.adjusters.push((callback, adjuster));
    }

    /// Remove the first registration of `callback`; `false` if unknown.
    pub fn remove_viewport_adjuster(&mut self, callback: &Function) -> bool {
        let target: &JsValue = callback.as_ref();
        let position = self.adjusters.iter().position(|(stored, _)| {
            let stored: &JsValue = stored.as_ref();
            stored == target
        });
        let Some(index) = position else {
            return false;
        };
        let (_, adjuster) = self.adjusters.remove(index);
        self.container.remove_viewport_adjuster(&adjuster)
    }

    pub fn adjust_scroll_vertical(
        &mut self,
        scroll_top: Option<f64>,
        scroll_percentage: Option<f64>,
        force: bool,
    ) {
        self.container
            .adjust_scroll_vertical(scroll_top, scroll_percentage, force);
    }

    pub fn adjust_scroll_horizontal(
        &mut self,
        scroll_left: Option<f64>,
        scroll_percentage: Option<f64>,
        force: bool,
    ) {
        self.container
            .adjust_scroll_horizontal(scroll_left, scroll_percentage, force);
    }

    pub fn redraw_in_place(&mut self) {
        self.container.redraw_in_place();
    }

    /// Run the width pass; returns `{ availableWidth, canvasWidth, unresolved }`.
    ///
    /// # Errors
    /// Returns an error if the result cannot be serialized.
    pub fn update_column_widths(&mut self) -> std::result::Result<JsValue, JsValue> {
        let allocation = self.container.update_column_widths();
        to_js(&allocation)
    }

    /// Keys of the rendered rows, in order.
    pub fn rendered_row_keys(&self) -> Vec<String> {
        self.container
            .rendered_rows()
            .iter()
            .map(|row| row.key.to_string())
            .collect()
    }

    /// Rendered columns with their drawn widths.
    ///
    /// # Errors
    /// Returns an error if the columns cannot be serialized.
    pub fn rendered_columns(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(self.container.rendered_columns())
    }

    pub fn current_top_row(&self) -> usize {
        self.container.current_top_row()
    }

    pub fn current_first_column(&self) -> usize {
        self.container.current_first_column()
    }

    pub fn column_offset(&self) -> f64 {
        self.container.column_offset()
    }

    pub fn canvas_height(&mut self) -> f64 {
        self.container.canvas_height()
    }

    pub fn canvas_width(&self) -> f64 {
        self.container.canvas_width()
    }

    pub fn viewport_height(&self) -> f64 {
        self.container.viewport_height()
    }

    pub fn viewport_width(&self) -> f64 {
        self.container.viewport_width()
    }

    pub fn header_viewport_width(&self) -> f64 {
        self.container.header_viewport_width()
    }

    /// Inline CSS for the rendered row at `index`.
    pub fn row_style(&self, index: usize) -> String {
        self.container.row_style(index).to_string()
    }

    pub fn header_cell_wrapper_style(&self) -> Option<String> {
        self.container
            .header_cell_wrapper_style()
            .map(|style| style.to_string())
    }

    pub fn view_port_style(&self) -> String {
        self.container.view_port_style().to_string()
    }

    /// Every registered style computation, in priority order.
    pub fn build_styles(&self) -> String {
        self.host.build_styles()
    }

    pub fn refresh_requests(&self) -> usize {
        self.host.refresh_requests()
    }

    /// Drain canvas-height notifications as `[old, new]` pairs.
    ///
    /// # Errors
    /// Returns an error if the events cannot be serialized.
    pub fn take_canvas_height_events(&self) -> std::result::Result<JsValue, JsValue> {
        to_js(&self.host.take_canvas_height_events())
    }
}
