//! Graph utility functions and helpers.

use fingraph_common::{FinGraphError, Result};
use std::ops::Range;

/// Fraction of the value span added above and below the data.
const PADDING: f64 = 0.1;

/// Utility functions for graph generation.
pub struct GraphUtils;

impl GraphUtils {
    /// Reject a series holding NaN or an infinity, which cannot be plotted.
    pub fn ensure_finite<'a, I>(series: &str, values: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a f64>,
    {
        match values.into_iter().position(|v| !v.is_finite()) {
            Some(index) => Err(FinGraphError::graph(format!(
                "{series} has a non-finite value at position {index}"
            ))),
            None => Ok(()),
        }
    }

    /// Value axis range that always contains zero, padded on both sides.
    pub fn value_range<I>(values: I) -> Range<f64>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let span = max - min;
        if span <= f64::EPSILON {
            return 0.0..1.0;
        }

        let pad = span * PADDING;
        let lower = if min < 0.0 { min - pad } else { 0.0 };
        let upper = if max > 0.0 { max + pad } else { 0.0 };
        lower..upper
    }

    /// Category axis with one slot per item, centered on the item index.
    #[allow(clippy::cast_precision_loss)]
    pub fn index_range(count: usize) -> Range<f64> {
        -0.5..(count.max(1) as f64 - 0.5)
    }

    /// Label for the slot nearest `position`, empty between slots.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn slot_label(labels: &[String], position: f64) -> String {
        let nearest = position.round();
        if nearest < 0.0 || (position - nearest).abs() > 0.25 {
            return String::new();
        }
        labels.get(nearest as usize).cloned().unwrap_or_default()
    }

    /// Offset that keeps a value label clear of its bar.
    pub fn label_offset(range: &Range<f64>) -> f64 {
        (range.end - range.start) * 0.02
    }
}
