//! The shared sampling grid all curves are computed on
//!
//! Every curve in a profile is sampled on one uniform grid so curves can be
//! summed, compared and truncated index-by-index. The grid anchors on the
//! whole hour at or before the regimen's earliest dose and spans a fixed
//! window from there, one sample per minute by default. Construction is
//! deterministic: same regimen and options, same grid.

use serde::{Deserialize, Serialize};

use crate::error::InvalidParameterError;

/// Options controlling the sampling grid
///
/// An unvalidated bag in the usual options style; values are checked when
/// the grid is built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridOptions {
    /// Length of the sampled window in hours (default: 24.0)
    pub window_hours: f64,
    /// Sample spacing in minutes (default: 1.0)
    pub resolution_minutes: f64,
    /// Window start used when the regimen has no doses at all (default: 8.0)
    pub default_start: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            window_hours: 24.0,
            resolution_minutes: 1.0,
            default_start: 8.0,
        }
    }
}

impl GridOptions {
    /// Set the window length in hours
    pub fn with_window_hours(mut self, window_hours: f64) -> Self {
        self.window_hours = window_hours;
        self
    }

    /// Set the sample spacing in minutes
    pub fn with_resolution_minutes(mut self, resolution_minutes: f64) -> Self {
        self.resolution_minutes = resolution_minutes;
        self
    }

    /// Set the window start used when no doses exist
    pub fn with_default_start(mut self, default_start: f64) -> Self {
        self.default_start = default_start;
        self
    }
}

/// A uniform, inclusive sampling grid over the simulated day
///
/// Times are hours of the day; the grid runs from `start` to `end`
/// inclusive with evenly spaced samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleGrid {
    times: Vec<f64>,
    start: f64,
    end: f64,
    step: f64,
}

impl SampleGrid {
    /// Build the grid for a regimen's earliest dose time
    ///
    /// The window starts at the whole hour at or before `first_dose_time`
    /// (`floor`), or at `options.default_start` when the regimen has no
    /// doses. Sample count is `round(window_minutes / resolution) + 1`, so
    /// both window ends are included.
    pub fn anchored(
        first_dose_time: Option<f64>,
        options: &GridOptions,
    ) -> Result<Self, InvalidParameterError> {
        if !(options.window_hours.is_finite() && options.window_hours > 0.0) {
            return Err(InvalidParameterError::new(
                "window_hours",
                options.window_hours,
                "must be positive and finite",
            ));
        }
        if !(options.resolution_minutes.is_finite() && options.resolution_minutes > 0.0) {
            return Err(InvalidParameterError::new(
                "resolution_minutes",
                options.resolution_minutes,
                "must be positive and finite",
            ));
        }
        if !options.default_start.is_finite() {
            return Err(InvalidParameterError::new(
                "default_start",
                options.default_start,
                "must be finite",
            ));
        }

        let start = match first_dose_time {
            Some(t) => t.floor(),
            None => options.default_start,
        };
        let end = start + options.window_hours;
        // at least two samples so the step is defined
        let n = ((options.window_hours * 60.0 / options.resolution_minutes).round() as usize + 1)
            .max(2);
        let span = end - start;
        let times: Vec<f64> = (0..n)
            .map(|i| start + i as f64 * span / (n - 1) as f64)
            .collect();
        let step = span / (n - 1) as f64;

        Ok(SampleGrid {
            times,
            start,
            end,
            step,
        })
    }

    /// Get the sample times, in hours of the day
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Get the window start, in hours of the day
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Get the window end, in hours of the day
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Get the spacing between samples, in hours
    pub fn step_hours(&self) -> f64 {
        self.step
    }

    /// Get the number of samples
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Check if the grid has no samples
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Get the index of the first sample at or after `t`
    ///
    /// Returns `Some(0)` for times at or before the window start and `None`
    /// for times past the window end. A small tolerance keeps times that
    /// land exactly on a sample from rounding up to the next one.
    pub fn index_at_or_after(&self, t: f64) -> Option<usize> {
        if t <= self.start {
            return Some(0);
        }
        if t > self.end {
            return None;
        }
        let index = ((t - self.start) / self.step - 1e-9).ceil() as usize;
        Some(index.min(self.times.len() - 1))
    }
}
