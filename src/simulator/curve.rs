//! Grid-aligned curves with explicit not-yet-dosed samples
//!
//! [`Curve`] is the value type every stage of the simulator produces and
//! consumes. Each sample is an `Option<f64>` distinguishing three states
//! a plain float would conflate:
//!
//! - `None`: the moment precedes the dose behind this curve; there is no
//!   value, not even zero
//! - `Some(0.0)`: the model ran and produced zero
//! - `Some(x)`: the model ran and produced `x`
//!
//! Summation treats `None` as the additive identity and always yields a
//! fully defined curve, so totals never inherit masking from their parts.
//! Display concerns (hiding pre-dose stretches, hiding values under a
//! visibility floor) are explicit operations a renderer applies to a copy,
//! never something the simulator bakes into the numbers.

use serde::{Deserialize, Serialize};

use crate::simulator::grid::SampleGrid;

/// A sampled curve aligned 1:1 with a [SampleGrid]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    samples: Vec<Option<f64>>,
}

/// The highest defined sample of a curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    /// Index of the peak sample in the grid
    pub index: usize,
    /// Value at the peak
    pub value: f64,
}

impl Curve {
    /// Create a curve from raw samples
    pub(crate) fn from_samples(samples: Vec<Option<f64>>) -> Self {
        Curve { samples }
    }

    /// Create a fully defined all-zero curve, the identity for [`add`](Self::add)
    pub(crate) fn zeros(len: usize) -> Self {
        Curve {
            samples: vec![Some(0.0); len],
        }
    }

    /// Get the samples
    pub fn samples(&self) -> &[Option<f64>] {
        &self.samples
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the curve has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the samples with undefined entries replaced by `fill`
    ///
    /// Use `0.0` for arithmetic and `f64::NAN` for plot pipelines that
    /// expect gaps as NaN.
    pub fn filled(&self, fill: f64) -> Vec<f64> {
        self.samples
            .iter()
            .map(|sample| sample.unwrap_or(fill))
            .collect()
    }

    /// Add two curves sample-by-sample
    ///
    /// Undefined samples act as zero, so the result is always fully
    /// defined: a substance that has not started dosing yet contributes
    /// nothing to a total, it does not mask it.
    ///
    /// # Panics
    ///
    /// Panics if the curves have different lengths; curves from different
    /// grids must never be mixed.
    pub fn add(&self, other: &Curve) -> Curve {
        assert_eq!(
            self.samples.len(),
            other.samples.len(),
            "cannot add curves of different lengths"
        );
        let samples = self
            .samples
            .iter()
            .zip(&other.samples)
            .map(|(a, b)| Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)))
            .collect();
        Curve { samples }
    }

    /// Get a copy with every sample before `index` masked out
    pub fn masked_before_index(&self, index: usize) -> Curve {
        let samples = self
            .samples
            .iter()
            .enumerate()
            .map(|(i, sample)| if i < index { None } else { *sample })
            .collect();
        Curve { samples }
    }

    /// Get a copy with every defined sample below `threshold` masked out
    ///
    /// This is the renderer-side visibility floor; already-masked samples
    /// stay masked.
    pub fn masked_below(&self, threshold: f64) -> Curve {
        let samples = self
            .samples
            .iter()
            .map(|sample| match sample {
                Some(v) if *v < threshold => None,
                other => *other,
            })
            .collect();
        Curve { samples }
    }

    /// Get the highest defined sample, or `None` if every sample is masked
    ///
    /// Ties resolve to the earliest sample.
    pub fn peak(&self) -> Option<Peak> {
        let mut best: Option<(usize, f64)> = None;
        for (i, sample) in self.samples.iter().enumerate() {
            if let Some(v) = sample {
                match best {
                    Some((_, value)) if value >= *v => {}
                    _ => best = Some((i, *v)),
                }
            }
        }
        best.map(|(index, value)| Peak { index, value })
    }

    /// Linearly interpolate the curve at hour `t`
    ///
    /// Times outside the grid clamp to the first/last sample. Returns
    /// `None` when either bracketing sample is masked.
    ///
    /// # Panics
    ///
    /// Panics if the curve is not aligned with `grid`.
    pub fn interpolate(&self, grid: &SampleGrid, t: f64) -> Option<f64> {
        assert_eq!(
            self.samples.len(),
            grid.len(),
            "curve is not aligned with grid"
        );
        if self.samples.is_empty() {
            return None;
        }
        let times = grid.times();
        if t <= times[0] {
            return self.samples[0];
        }
        if t >= times[times.len() - 1] {
            return self.samples[self.samples.len() - 1];
        }
        let position = (t - grid.start()) / grid.step_hours();
        let lo = (position.floor() as usize).min(self.samples.len() - 2);
        let frac = position - lo as f64;
        match (self.samples[lo], self.samples[lo + 1]) {
            (Some(a), Some(b)) => Some(a + (b - a) * frac),
            _ => None,
        }
    }
}

impl std::fmt::Display for Curve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let masked = self.samples.iter().filter(|s| s.is_none()).count();
        write!(f, "Curve ({} samples, {} masked)", self.samples.len(), masked)?;
        if let Some(peak) = self.peak() {
            write!(f, ", peak {:.4} at index {}", peak.value, peak.index)?;
        }
        Ok(())
    }
}
