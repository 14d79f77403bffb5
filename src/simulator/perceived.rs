//! Concentration to perceived-intensity transform
//!
//! Felt stimulant effect tracks the rate of change of concentration more
//! than the concentration itself: onset is sharp, wear-off leads the actual
//! elimination tail. The transform models this by convolving the
//! concentration curve with a zero-DC biexponential kernel
//!
//! `k(τ) = e^(−τ/rise_tau)/rise_tau − e^(−τ/decay_tau)/decay_tau, τ ≥ 0`
//!
//! which passes rising stretches and suppresses the slow tail. The kernel
//! is normalized so its positive lobe has unit area — peak-location shifts
//! with the tau ratio make peak normalization unstable — then scaled by
//! `gain`. After convolution the curve is rescaled so its peak lands at
//! `peak_scale ×` the concentration peak, and optionally capped at
//! `clamp_scale ×` that peak to stop kernel ringing from overshooting.
//!
//! The transform runs per dose component; component curves then sum like
//! any others. Output curves are fully defined: a perceived curve is zero
//! before its dose, not undefined.

use ndarray::{s, Array1};

use crate::data::params::PerceivedParams;
use crate::error::InvalidParameterError;
use crate::simulator::curve::Curve;

/// Denominators at or below this count as zero and skip their scaling step
/// rather than dividing by them
const NEAR_ZERO: f64 = 1e-9;

/// The sampled perceived-effect kernel for one parameter set and grid step
///
/// Building the kernel costs a few thousand exponentials, so one kernel is
/// built per substance and applied to every dose component.
#[derive(Debug, Clone)]
pub struct PerceivedKernel {
    weights: Array1<f64>,
    params: PerceivedParams,
}

impl PerceivedKernel {
    /// Sample the kernel for a grid step
    ///
    /// The kernel extends to `8 × decay_tau`, by which point both
    /// exponentials are negligible.
    pub fn new(params: &PerceivedParams, step_hours: f64) -> Result<Self, InvalidParameterError> {
        if !(step_hours.is_finite() && step_hours > 0.0) {
            return Err(InvalidParameterError::new(
                "step_hours",
                step_hours,
                "must be positive and finite",
            ));
        }
        let rise_tau = params.rise_tau();
        let decay_tau = params.decay_tau();

        let len = (8.0 * decay_tau / step_hours).ceil() as usize;
        let mut weights: Array1<f64> = (0..=len)
            .map(|i| {
                let tau = i as f64 * step_hours;
                (-tau / rise_tau).exp() / rise_tau - (-tau / decay_tau).exp() / decay_tau
            })
            .collect();

        // unit positive-lobe area, then gain
        let mut positive_area: f64 =
            weights.iter().map(|w| w.max(0.0)).sum::<f64>() * step_hours;
        if positive_area <= NEAR_ZERO {
            positive_area = 1.0;
        }
        weights *= params.gain() / positive_area;

        Ok(PerceivedKernel {
            weights,
            params: params.clone(),
        })
    }

    /// Get the number of kernel samples
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if the kernel has no samples
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Transform one concentration curve into its perceived curve
    ///
    /// Masked input samples act as zero. The convolution is causal and
    /// truncated to the input length, the result is floored at zero,
    /// peak-matched to `peak_scale ×` the input peak (skipped when the
    /// convolved peak is indistinguishable from zero) and clamped at
    /// `clamp_scale ×` the input peak when a clamp is set. The output is
    /// fully defined.
    pub fn apply(&self, pk: &Curve) -> Curve {
        let input = Array1::from_vec(pk.filled(0.0));
        let n = input.len();
        let m = self.weights.len();

        let mut output: Array1<f64> = Array1::zeros(n);
        for i in 0..n {
            let reach = i.min(m - 1);
            output[i] = self
                .weights
                .slice(s![..=reach])
                .dot(&input.slice(s![i - reach..=i; -1]));
        }
        output.mapv_inplace(|v| v.max(0.0));

        let pk_peak = input.iter().fold(0.0_f64, |acc, &v| acc.max(v));
        let pd_peak = output.iter().fold(0.0_f64, |acc, &v| acc.max(v));
        if pd_peak > NEAR_ZERO {
            output *= self.params.peak_scale() * pk_peak / pd_peak;
        }
        if let Some(clamp_scale) = self.params.clamp_scale() {
            if pk_peak > 0.0 {
                let cap = clamp_scale * pk_peak;
                output.mapv_inplace(|v| v.min(cap));
            }
        }

        Curve::from_samples(output.iter().map(|&v| Some(v)).collect())
    }
}
