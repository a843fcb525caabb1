//! Scrollbar ownership tests across the three panes

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use std::rc::Rc;

use test_case::test_case;
use virtgrid::{
    GridContext, GridGeometry, GridHost, GridOptions, PaneName, RenderContainer, ScrollbarPolicy,
};

fn css(pane: PaneName, rtl: bool, left: bool, right: bool) -> String {
    let host = Rc::new(GridHost::new(
        "1",
        GridOptions {
            rtl,
            ..GridOptions::default()
        },
        GridGeometry::default(),
    ));
    host.set_pinned_columns(left, right);
    RenderContainer::new(pane, Rc::clone(&host) as Rc<dyn GridContext>)
        .view_port_style()
        .to_string()
}

#[test_case(PaneName::Body, false, false, false => "overflow-x: scroll; overflow-y: scroll;" ; "body alone")]
#[test_case(PaneName::Body, false, false, true => "overflow-x: scroll; overflow-y: hidden;" ; "body with right pane")]
#[test_case(PaneName::Body, false, true, false => "overflow-x: scroll; overflow-y: scroll;" ; "body with left pane")]
#[test_case(PaneName::Body, true, true, false => "overflow-x: scroll; overflow-y: hidden;" ; "rtl body with left pane")]
#[test_case(PaneName::Right, false, false, true => "overflow-x: hidden; overflow-y: scroll;" ; "right pane owns scrollbar")]
#[test_case(PaneName::Left, false, true, true => "overflow-x: hidden; overflow-y: hidden;" ; "left pane in ltr")]
#[test_case(PaneName::Left, true, true, false => "overflow-x: hidden; overflow-y: scroll;" ; "left pane in rtl")]
#[test_case(PaneName::Right, true, false, true => "overflow-x: hidden; overflow-y: hidden;" ; "right pane in rtl")]
fn test_viewport_overflow(pane: PaneName, rtl: bool, left: bool, right: bool) -> String {
    css(pane, rtl, left, right)
}

#[test]
fn test_scrollbar_policies() {
    let host = Rc::new(GridHost::new(
        "1",
        GridOptions {
            enable_horizontal_scrollbar: ScrollbarPolicy::Never,
            enable_vertical_scrollbar: ScrollbarPolicy::WhenNeeded,
            ..GridOptions::default()
        },
        GridGeometry::default(),
    ));
    let body = RenderContainer::new(PaneName::Body, Rc::clone(&host) as Rc<dyn GridContext>);
    assert_eq!(
        body.view_port_style().to_string(),
        "overflow-x: hidden; overflow-y: auto;"
    );
}

#[test]
fn test_scrollbar_policy_from_options_json() {
    let options = GridOptions::from_json(
        r#"{"enableHorizontalScrollbar": 0, "enableVerticalScrollbar": "whenNeeded", "rtl": true}"#,
    )
    .unwrap();
    assert_eq!(options.enable_horizontal_scrollbar, ScrollbarPolicy::Never);
    assert_eq!(options.enable_vertical_scrollbar, ScrollbarPolicy::WhenNeeded);
    assert!(options.rtl);
    assert_eq!(options.excess_rows, 4);
}
