//! Closed-form single-dose response
//!
//! The Bateman function: first-order absorption into, and first-order
//! elimination out of, a single compartment. Every curve in the crate is a
//! sum of these, one per instantaneous pulse.

use crate::data::dose::Dose;
use crate::data::params::Kinetics;
use crate::simulator::curve::Curve;
use crate::simulator::grid::SampleGrid;

/// Response to a single dose at one instant in time
///
/// Returns `None` before the dose time: the dose has not happened yet, so
/// there is no value to report. From the dose time on, the response is
///
/// `amount · ka/(ka − ke) · (e^(−ke·Δt) − e^(−ka·Δt))`
///
/// floored at zero. Units follow `amount`; the curve is an amount-like
/// relative measure, not a plasma concentration.
///
/// [Kinetics] construction keeps `ka` and `ke` apart, so the denominator
/// is never degenerate here.
pub fn response(t: f64, amount: f64, t0: f64, kinetics: &Kinetics) -> Option<f64> {
    if t < t0 {
        return None;
    }
    let dt = t - t0;
    let ka = kinetics.ka();
    let ke = kinetics.ke();
    let value = amount * (ka / (ka - ke)) * ((-ke * dt).exp() - (-ka * dt).exp());
    Some(value.max(0.0))
}

/// Sample the response to one dose across a grid
///
/// Samples before the dose time are masked; the rest follow [response].
pub fn single_dose_curve(grid: &SampleGrid, dose: &Dose, kinetics: &Kinetics) -> Curve {
    let samples = grid
        .times()
        .iter()
        .map(|&t| response(t, dose.amount(), dose.time(), kinetics))
        .collect();
    Curve::from_samples(samples)
}
