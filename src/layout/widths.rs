//! Column width allocation.
//!
//! Visible columns fall into three sizing classes resolved in priority
//! order: manual pixel widths, then percentages of what manual columns left,
//! then star columns sharing whatever is still left by weight. Percent and
//! star pools are clamped to each column's `[min_width, max_width]`: a
//! clamped column leaves its pool and its width comes off the base before
//! the rest of the pool is resolved again. Pixels lost to truncation are
//! handed out one at a time so elastic layouts fill the viewport exactly.

use serde::Serialize;

use crate::types::{Column, ColumnWidth};

/// Result of one width-allocation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidthAllocation {
    pub available_width: u32,
    /// Total drawn width, never less than `available_width`
    pub canvas_width: u32,
    /// Uids of visible columns whose width could not be interpreted
    pub unresolved: Vec<String>,
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn floor_px(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.min(f64::from(u32::MAX)).floor() as u32
}

fn flex_weight(column: &Column) -> u64 {
    match column.width {
        ColumnWidth::Star(weight) => u64::from(weight),
        _ => 0,
    }
}

/// The two elastic sizing classes, resolved one pool at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pool {
    Percent,
    Flex,
}

/// How one pass over a pool turns a column's width into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Share {
    /// Percentages of the base
    Percent { base: f64 },
    /// Pixels per unit of star weight
    Flex { unit: f64 },
}

impl Pool {
    #[allow(clippy::cast_precision_loss)]
    fn share(self, base: i64, pool: &[usize], columns: &[Column]) -> Share {
        let base = base.max(0) as f64;
        match self {
            Pool::Percent => Share::Percent { base },
            Pool::Flex => {
                let pool_weight: u64 = pool
                    .iter()
                    .filter_map(|&i| columns.get(i))
                    .map(flex_weight)
                    .sum();
                let unit = if pool_weight == 0 {
                    0.0
                } else {
                    base / pool_weight as f64
                };
                Share::Flex { unit }
            }
        }
    }
}

impl Share {
    /// Width `column` gets before clamping.
    #[allow(clippy::cast_precision_loss)]
    fn width(self, column: &Column) -> u32 {
        match (self, &column.width) {
            (Share::Percent { base }, ColumnWidth::Percent(percent)) => {
                floor_px(base * percent / 100.0)
            }
            (Share::Flex { unit }, ColumnWidth::Star(_)) => {
                floor_px(unit * flex_weight(column) as f64)
            }
            _ => 0,
        }
    }
}

/// Resolve one elastic pool against `remaining`, clamping to a fixed point.
///
/// Every width assigned here is taken off `remaining`. Returns the total.
fn resolve_pool(columns: &mut [Column], mut pool: Vec<usize>, remaining: &mut i64, kind: Pool) -> u64 {
    let mut assigned = 0u64;
    loop {
        let share = kind.share(*remaining, &pool, columns);

        let mut clamped = Vec::new();
        let mut elastic = Vec::with_capacity(pool.len());
        for &i in &pool {
            let Some(column) = columns.get(i) else {
                continue;
            };
            let width = share.width(column);
            match column.clamp(width) {
                Some(bound) => clamped.push((i, bound)),
                None => elastic.push((i, width)),
            }
        }

        if clamped.is_empty() {
            for (i, width) in elastic {
                if let Some(column) = columns.get_mut(i) {
                    column.drawn_width = width;
                    assigned += u64::from(width);
                    *remaining -= i64::from(width);
                }
            }
            return assigned;
        }

        for (i, bound) in clamped {
            if let Some(column) = columns.get_mut(i) {
                column.drawn_width = bound;
                assigned += u64::from(bound);
                *remaining -= i64::from(bound);
            }
        }
        pool = elastic.into_iter().map(|(i, _)| i).collect();
    }
}

/// Hand leftover pixels out one at a time, round-robin over the visible
/// columns that can still grow. Returns how many pixels were placed.
fn distribute_remainder(columns: &mut [Column], mut leftover: u64) -> u64 {
    let mut placed = 0;
    while leftover > 0 {
        let mut grew = false;
        for column in columns.iter_mut() {
            if leftover == 0 {
                break;
            }
            if column.can_grow() {
                column.drawn_width += 1;
                leftover -= 1;
                placed += 1;
                grew = true;
            }
        }
        if !grew {
            log::debug!("{leftover}px left over: every column is at its maximum width");
            break;
        }
    }
    placed
}

/// Assign every visible column a `drawn_width` for `available_width` pixels.
///
/// Hidden columns are skipped and end the pass with a zero width, as do
/// columns whose width is [`ColumnWidth::Unspecified`] (reported in
/// [`WidthAllocation::unresolved`]).
pub fn allocate_column_widths(columns: &mut [Column], available_width: u32) -> WidthAllocation {
    let mut percent_pool = Vec::new();
    let mut flex_pool = Vec::new();
    let mut unresolved = Vec::new();
    let mut canvas = 0u64;

    for (i, column) in columns.iter_mut().enumerate() {
        column.drawn_width = 0;
        if !column.visible {
            continue;
        }
        match &column.width {
            ColumnWidth::Pixels(px) => {
                column.drawn_width = *px;
                canvas += u64::from(*px);
            }
            ColumnWidth::Percent(_) => percent_pool.push(i),
            ColumnWidth::Star(_) => flex_pool.push(i),
            ColumnWidth::Unspecified(raw) => {
                log::warn!(
                    "column '{}' has unrecognised width '{raw}'; it gets no width",
                    column.uid
                );
                unresolved.push(column.uid.clone());
            }
        }
    }

    let manual = i64::try_from(canvas).unwrap_or(i64::MAX);
    let mut remaining = i64::from(available_width) - manual;

    if !percent_pool.is_empty() {
        canvas += resolve_pool(columns, percent_pool, &mut remaining, Pool::Percent);
    }
    if !flex_pool.is_empty() {
        canvas += resolve_pool(columns, flex_pool, &mut remaining, Pool::Flex);
    }

    let has_elastic = columns.iter().any(|c| c.visible && c.width.is_elastic());
    let available = u64::from(available_width);
    if has_elastic && canvas < available {
        canvas += distribute_remainder(columns, available - canvas);
    }

    let canvas_width = u32::try_from(canvas.max(available)).unwrap_or(u32::MAX);
    log::trace!("allocated {canvas}px of {available_width}px across {} columns", columns.len());

    WidthAllocation {
        available_width,
        canvas_width,
        unresolved,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;

    fn col(uid: &str, width: &str) -> Column {
        Column::new(uid, ColumnWidth::parse_lenient(width))
    }

    fn drawn(columns: &[Column]) -> Vec<u32> {
        columns.iter().map(|c| c.drawn_width).collect()
    }

    #[test]
    fn test_manual_percent_star() {
        let mut cols = vec![col("a", "100"), col("b", "50%"), col("c", "*")];
        let result = allocate_column_widths(&mut cols, 500);
        assert_eq!(drawn(&cols), vec![100, 200, 200]);
        assert_eq!(result.canvas_width, 500);
        assert!(result.unresolved.is_empty());
    }

    #[test]
    fn test_star_weights() {
        let mut cols = vec![col("a", "*"), col("b", "**"), col("c", "*")];
        allocate_column_widths(&mut cols, 400);
        assert_eq!(drawn(&cols), vec![100, 200, 100]);
    }

    #[test]
    fn test_remainder_round_robin() {
        let mut cols = vec![col("a", "*"), col("b", "*"), col("c", "*")];
        let result = allocate_column_widths(&mut cols, 101);
        // 33 each, then two leftover pixels to the first two columns
        assert_eq!(drawn(&cols), vec![34, 34, 33]);
        assert_eq!(result.canvas_width, 101);
    }

    #[test]
    fn test_all_manual_keeps_gap() {
        let mut cols = vec![col("a", "100"), col("b", "150")];
        let result = allocate_column_widths(&mut cols, 500);
        assert_eq!(drawn(&cols), vec![100, 150]);
        // Canvas is floored at the available width, columns are not stretched
        assert_eq!(result.canvas_width, 500);
    }

    #[test]
    fn test_manual_overflow_grows_canvas() {
        let mut cols = vec![col("a", "400"), col("b", "300"), col("c", "*")];
        let result = allocate_column_widths(&mut cols, 500);
        assert_eq!(drawn(&cols), vec![400, 300, 0]);
        assert_eq!(result.canvas_width, 700);
    }

    #[test]
    fn test_hidden_columns_skipped() {
        let mut cols = vec![col("a", "200").hidden(), col("b", "*"), col("c", "*")];
        allocate_column_widths(&mut cols, 300);
        assert_eq!(drawn(&cols), vec![0, 150, 150]);
    }

    #[test]
    fn test_unspecified_width_reported() {
        let mut cols = vec![col("a", "auto"), col("b", "*")];
        let result = allocate_column_widths(&mut cols, 300);
        assert_eq!(drawn(&cols), vec![0, 300]);
        assert_eq!(result.unresolved, vec!["a".to_string()]);
    }

    #[test]
    fn test_percent_min_clamp_shrinks_base() {
        let mut cols = vec![col("a", "40%"), col("b", "10%").with_min_width(150)];
        let result = allocate_column_widths(&mut cols, 1000);
        assert!(cols[1].drawn_width >= 150);
        // Leftover distribution tops the 490px of percent widths up to the viewport
        assert_eq!(cols.iter().map(|c| c.drawn_width).sum::<u32>(), 1000);
        assert_eq!(result.canvas_width, 1000);
    }

    #[test]
    fn test_share_matches_pool_class() {
        let cols = vec![col("a", "25%"), col("b", "**"), col("c", "*")];
        let percent = Pool::Percent.share(800, &[0], &cols);
        assert_eq!(percent.width(&cols[0]), 200);
        assert_eq!(percent.width(&cols[1]), 0);

        let flex = Pool::Flex.share(900, &[1, 2], &cols);
        assert_eq!(flex, Share::Flex { unit: 300.0 });
        assert_eq!(flex.width(&cols[1]), 600);
        assert_eq!(flex.width(&cols[0]), 0);

        assert_eq!(Pool::Flex.share(900, &[], &cols), Share::Flex { unit: 0.0 });
        assert_eq!(Pool::Percent.share(-50, &[0], &cols).width(&cols[0]), 0);
    }

    #[test]
    fn test_percent_resolution_before_remainder() {
        // 10% of 1000 = 100 < 150, so b is clamped and the 40% resolves against 850
        let mut cols = vec![col("a", "40%"), col("b", "10%").with_min_width(150)];
        let mut remaining = 1000;
        let assigned = resolve_pool(&mut cols, vec![0, 1], &mut remaining, Pool::Percent);
        assert_eq!(drawn(&cols), vec![340, 150]);
        assert_eq!(assigned, 490);
        assert_eq!(remaining, 510);
    }

    #[test]
    fn test_star_max_clamp_redistributes() {
        let mut cols = vec![col("a", "*").with_max_width(100), col("b", "*"), col("c", "*")];
        allocate_column_widths(&mut cols, 600);
        assert_eq!(drawn(&cols), vec![100, 250, 250]);
    }

    #[test]
    fn test_star_clamp_cascades() {
        // After a is clamped to 100 the unit grows to 250, which pushes b past its max
        let mut cols = vec![
            col("a", "*").with_max_width(100),
            col("b", "*").with_max_width(220),
            col("c", "*"),
        ];
        allocate_column_widths(&mut cols, 600);
        assert_eq!(drawn(&cols), vec![100, 220, 280]);
    }

    #[test]
    fn test_adjacent_clamped_columns_all_clamped() {
        let mut cols = vec![
            col("a", "*").with_min_width(300),
            col("b", "*").with_min_width(300),
            col("c", "*"),
        ];
        allocate_column_widths(&mut cols, 600);
        assert_eq!(cols[0].drawn_width, 300);
        assert_eq!(cols[1].drawn_width, 300);
        assert_eq!(cols[2].drawn_width, 0);
    }

    #[test]
    fn test_remainder_respects_max() {
        let mut cols = vec![
            col("a", "*").with_max_width(50),
            col("b", "100").with_max_width(100),
        ];
        let result = allocate_column_widths(&mut cols, 400);
        // Neither column may grow, so the gap stays
        assert_eq!(drawn(&cols), vec![50, 100]);
        assert_eq!(result.canvas_width, 400);
    }

    #[test]
    fn test_zero_available_width() {
        let mut cols = vec![col("a", "*"), col("b", "50%")];
        let result = allocate_column_widths(&mut cols, 0);
        assert_eq!(drawn(&cols), vec![0, 0]);
        assert_eq!(result.canvas_width, 0);
    }

    #[test]
    fn test_drawn_width_not_preserved() {
        let mut cols = vec![col("a", "*"), col("b", "*")];
        allocate_column_widths(&mut cols, 400);
        cols[1].visible = false;
        allocate_column_widths(&mut cols, 400);
        assert_eq!(drawn(&cols), vec![400, 0]);
    }
}
