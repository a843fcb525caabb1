//! Benchmarks for windowing and width allocation.
//!
//! Run with: cargo bench
//!
//! Results are saved to `target/criterion/` with HTML reports.

use std::rc::Rc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use virtgrid::layout::allocate_column_widths;
use virtgrid::{
    Column, ColumnWidth, GridContext, GridGeometry, GridHost, GridOptions, PaneName,
    RenderContainer, Row,
};

fn body_with_rows(count: usize) -> (Rc<GridHost>, RenderContainer) {
    let host = Rc::new(GridHost::new(
        "bench",
        GridOptions::default(),
        GridGeometry {
            grid_height: 800.0,
            grid_width: 1200.0,
            header_height: 30.0,
            ..GridGeometry::default()
        },
    ));
    let mut body = RenderContainer::new(PaneName::Body, Rc::clone(&host) as Rc<dyn GridContext>);
    body.set_visible_rows((0..count).map(|i| Row::new(i, 30.0)).collect());
    (host, body)
}

/// Scroll through the whole cache in row-sized steps
fn bench_vertical_scroll(c: &mut Criterion) {
    let mut group = c.benchmark_group("vertical_scroll");
    for count in [1_000_usize, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            let (_host, mut body) = body_with_rows(count);
            let length = body.vertical_scroll_length();
            b.iter(|| {
                let mut position = 0.0;
                while position < length {
                    body.adjust_scroll_vertical(Some(black_box(position)), None, false);
                    position += 3000.0;
                }
            });
        });
    }
    group.finish();
}

/// Allocate widths for a mix of fixed, percent and star columns
fn bench_column_widths(c: &mut Criterion) {
    let columns: Vec<Column> = (0..200_u32)
        .map(|i| {
            let width = match i % 3 {
                0 => ColumnWidth::Pixels(80),
                1 => ColumnWidth::Percent(2.0),
                _ => ColumnWidth::Star(1 + i % 2),
            };
            let column = Column::new(i.to_string(), width);
            if i % 7 == 0 {
                column.with_min_width(60).with_max_width(140)
            } else {
                column
            }
        })
        .collect();

    c.bench_function("allocate_200_columns", |b| {
        b.iter(|| {
            let mut cols = columns.clone();
            allocate_column_widths(black_box(&mut cols), black_box(4000))
        });
    });
}

criterion_group!(benches, bench_vertical_scroll, bench_column_widths);
criterion_main!(benches);
