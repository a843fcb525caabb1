//! Viewport adjusters: features that reserve part of a pane's viewport.
//!
//! Each adjuster receives the running `{height, width}` total and returns
//! the new total, usually with negative deltas. Adjusters run in
//! registration order. A failing adjuster, or one that returns a non-finite
//! value, is logged and skipped so it cannot corrupt the pane's geometry.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Accumulated change to the nominal viewport size, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ViewportAdjustment {
    pub height: f64,
    pub width: f64,
}

impl ViewportAdjustment {
    pub fn new(height: f64, width: f64) -> Self {
        Self { height, width }
    }

    pub fn is_finite(&self) -> bool {
        self.height.is_finite() && self.width.is_finite()
    }
}

/// Transforms the running viewport adjustment.
pub trait ViewportAdjuster {
    /// # Errors
    /// Implementations backed by foreign callbacks return an error when the
    /// callback throws or yields something that is not an adjustment.
    fn adjust(&self, current: ViewportAdjustment) -> Result<ViewportAdjustment>;
}

impl<F> ViewportAdjuster for F
where
    F: Fn(ViewportAdjustment) -> ViewportAdjustment,
{
    fn adjust(&self, current: ViewportAdjustment) -> Result<ViewportAdjustment> {
        Ok(self(current))
    }
}

/// Adjuster that subtracts a fixed amount of space, e.g. for a sticky footer row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReserveSpace {
    pub height: f64,
    pub width: f64,
}

impl ViewportAdjuster for ReserveSpace {
    fn adjust(&self, current: ViewportAdjustment) -> Result<ViewportAdjustment> {
        Ok(ViewportAdjustment::new(
            current.height - self.height,
            current.width - self.width,
        ))
    }
}

/// Ordered list of adjusters registered on one container.
#[derive(Default)]
pub struct AdjusterRegistry {
    adjusters: Vec<Rc<dyn ViewportAdjuster>>,
}

impl fmt::Debug for AdjusterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdjusterRegistry")
            .field("len", &self.adjusters.len())
            .finish()
    }
}

impl AdjusterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an adjuster; it runs after every adjuster registered before it.
    pub fn register(&mut self, adjuster: Rc<dyn ViewportAdjuster>) {
        self.adjusters.push(adjuster);
    }

    /// Remove the first registration of this exact adjuster.
    ///
    /// Returns `false` (and changes nothing) if it was never registered.
    pub fn remove(&mut self, adjuster: &Rc<dyn ViewportAdjuster>) -> bool {
        let position = self
            .adjusters
            .iter()
            .position(|a| std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(adjuster)));
        match position {
            Some(index) => {
                self.adjusters.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.adjusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjusters.is_empty()
    }

    pub fn clear(&mut self) {
        self.adjusters.clear();
    }

    /// Fold every adjuster over a zero adjustment.
    pub fn fold(&self) -> ViewportAdjustment {
        self.adjusters
            .iter()
            .enumerate()
            .fold(ViewportAdjustment::default(), |acc, (index, adjuster)| {
                match adjuster.adjust(acc) {
                    Ok(next) if next.is_finite() => next,
                    Ok(next) => {
                        log::warn!(
                            "viewport adjuster #{index} returned non-finite {next:?}; skipped"
                        );
                        acc
                    }
                    Err(e) => {
                        log::warn!("viewport adjuster #{index} failed: {e}; skipped");
                        acc
                    }
                }
            })
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
    use crate::error::GridError;

    struct Failing;

    impl ViewportAdjuster for Failing {
        fn adjust(&self, _current: ViewportAdjustment) -> Result<ViewportAdjustment> {
            Err(GridError::Adjuster("boom".into()))
        }
    }

    #[test]
    fn test_fold_in_registration_order() {
        let mut registry = AdjusterRegistry::new();
        registry.register(Rc::new(|a: ViewportAdjustment| {
            ViewportAdjustment::new(a.height - 10.0, a.width)
        }));
        // Doubles whatever the first adjuster produced
        registry.register(Rc::new(|a: ViewportAdjustment| {
            ViewportAdjustment::new(a.height * 2.0, a.width - 17.0)
        }));
        let total = registry.fold();
        assert_eq!(total.height, -20.0);
        assert_eq!(total.width, -17.0);
    }

    #[test]
    fn test_remove_first_matching_only() {
        let mut registry = AdjusterRegistry::new();
        let reserve: Rc<dyn ViewportAdjuster> = Rc::new(ReserveSpace {
            height: 30.0,
            width: 0.0,
        });
        registry.register(Rc::clone(&reserve));
        registry.register(Rc::clone(&reserve));
        assert!(registry.remove(&reserve));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.fold().height, -30.0);
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut registry = AdjusterRegistry::new();
        registry.register(Rc::new(ReserveSpace {
            height: 5.0,
            width: 5.0,
        }));
        let other: Rc<dyn ViewportAdjuster> = Rc::new(ReserveSpace {
            height: 5.0,
            width: 5.0,
        });
        assert!(!registry.remove(&other));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_failures_are_skipped() {
        let mut registry = AdjusterRegistry::new();
        registry.register(Rc::new(ReserveSpace {
            height: 10.0,
            width: 0.0,
        }));
        registry.register(Rc::new(Failing));
        registry.register(Rc::new(|_: ViewportAdjustment| {
            ViewportAdjustment::new(f64::NAN, 0.0)
        }));
        registry.register(Rc::new(ReserveSpace {
            height: 5.0,
            width: 2.0,
        }));
        let total = registry.fold();
        assert_eq!(total, ViewportAdjustment::new(-15.0, -2.0));
    }
}
