//! Model parameters: absorption/elimination kinetics and perceived-effect shaping
//!
//! This module defines the two parameter sets a [`Substance`](crate::data::substance::Substance)
//! carries:
//! - [`Kinetics`]: first-order absorption and elimination rate constants for
//!   the one-compartment concentration model
//! - [`PerceivedParams`]: kernel parameters for the subjective-intensity
//!   transform applied on top of the concentration curve
//!
//! Both validate on construction and are plain immutable values afterwards;
//! nothing in the crate reads parameters from shared or global state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::InvalidParameterError;

/// First-order absorption and elimination constants
///
/// `ka` (absorption) and `ke` (elimination) are in 1/hours. The closed-form
/// concentration solution divides by `ka - ke`, so the constructor nudges a
/// near-equal pair apart rather than letting the curve blow up.
///
/// # Example
///
/// ```
/// use dosecurve::Kinetics;
///
/// // lisdexamfetamine: slow carrier-mediated absorption, ~11 h half-life
/// let kinetics = Kinetics::with_half_life(0.8, 11.0).unwrap();
/// assert!((kinetics.ke() - 0.063).abs() < 1e-3);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Kinetics {
    ka: f64,
    ke: f64,
}

impl Kinetics {
    /// Threshold below which `ka` and `ke` count as equal, and the amount
    /// added to `ka` to separate them
    ///
    /// The separation is far below any physiologically meaningful difference
    /// but keeps the `ka - ke` denominator well away from zero.
    pub const KA_KE_EPSILON: f64 = 1e-6;

    /// Create kinetics from absorption and elimination rate constants
    ///
    /// Both constants must be positive and finite. If they are within
    /// [`KA_KE_EPSILON`](Self::KA_KE_EPSILON) of each other, `ka` is raised
    /// by that epsilon so the pair is never degenerate.
    pub fn new(ka: f64, ke: f64) -> Result<Self, InvalidParameterError> {
        if !(ka.is_finite() && ka > 0.0) {
            return Err(InvalidParameterError::new(
                "ka",
                ka,
                "must be positive and finite",
            ));
        }
        if !(ke.is_finite() && ke > 0.0) {
            return Err(InvalidParameterError::new(
                "ke",
                ke,
                "must be positive and finite",
            ));
        }
        let ka = if (ka - ke).abs() < Self::KA_KE_EPSILON {
            tracing::debug!(
                "ka = {} within epsilon of ke = {}, separating by {}",
                ka,
                ke,
                Self::KA_KE_EPSILON
            );
            ka + Self::KA_KE_EPSILON
        } else {
            ka
        };
        Ok(Kinetics { ka, ke })
    }

    /// Create kinetics from an absorption constant and an elimination half-life
    ///
    /// `ke` is derived as `ln(2) / half_life`, with `half_life` in hours.
    pub fn with_half_life(ka: f64, half_life: f64) -> Result<Self, InvalidParameterError> {
        if !(half_life.is_finite() && half_life > 0.0) {
            return Err(InvalidParameterError::new(
                "half_life",
                half_life,
                "must be positive and finite",
            ));
        }
        Self::new(ka, std::f64::consts::LN_2 / half_life)
    }

    /// Get the absorption rate constant, in 1/hours
    pub fn ka(&self) -> f64 {
        self.ka
    }

    /// Get the elimination rate constant, in 1/hours
    pub fn ke(&self) -> f64 {
        self.ke
    }

    /// Get the elimination half-life, in hours
    pub fn half_life(&self) -> f64 {
        std::f64::consts::LN_2 / self.ke
    }

    /// Get the time from intake to peak concentration, in hours
    ///
    /// Closed form for the one-compartment model: `ln(ka/ke) / (ka - ke)`.
    /// Well defined because construction keeps `ka` and `ke` apart.
    pub fn tmax(&self) -> f64 {
        (self.ka / self.ke).ln() / (self.ka - self.ke)
    }
}

impl fmt::Display for Kinetics {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "ka = {:.3}/h, ke = {:.3}/h (t½ = {:.1} h)",
            self.ka,
            self.ke,
            self.half_life()
        )
    }
}

/// Parameters of the perceived-intensity transform
///
/// The transform convolves a concentration curve with a biexponential
/// band-pass kernel (fast rise, slower decay), then rescales the result
/// against the concentration peak. See
/// [`PerceivedKernel`](crate::simulator::perceived::PerceivedKernel) for the
/// kernel itself.
///
/// Only the two time constants are required; the shaping knobs default to
/// the values below and are adjusted through `with_*` methods:
///
/// | knob          | default | meaning                                          |
/// |---------------|---------|--------------------------------------------------|
/// | `gain`        | 1.0     | multiplier applied after kernel normalization    |
/// | `peak_scale`  | 1.0     | target perceived peak as a fraction of PK peak   |
/// | `clamp_scale` | 1.1     | hard cap as a fraction of PK peak (`None` = off) |
/// | `floor`       | 0.05    | display cutoff, in curve units                   |
///
/// The floor is metadata for renderers; the simulator never applies it to
/// the numbers it produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerceivedParams {
    rise_tau: f64,
    decay_tau: f64,
    gain: f64,
    peak_scale: f64,
    clamp_scale: Option<f64>,
    floor: f64,
}

impl PerceivedParams {
    /// Minimum separation enforced between `decay_tau` and `rise_tau`, in hours
    pub const DECAY_TAU_MARGIN: f64 = 1e-3;

    /// Create perceived-effect parameters from the two kernel time constants
    ///
    /// Both taus must be positive and finite. A `decay_tau` at or below
    /// `rise_tau` would invert the kernel, so it is raised to
    /// `rise_tau + `[`DECAY_TAU_MARGIN`](Self::DECAY_TAU_MARGIN) instead of
    /// being rejected.
    pub fn new(rise_tau: f64, decay_tau: f64) -> Result<Self, InvalidParameterError> {
        if !(rise_tau.is_finite() && rise_tau > 0.0) {
            return Err(InvalidParameterError::new(
                "rise_tau",
                rise_tau,
                "must be positive and finite",
            ));
        }
        if !(decay_tau.is_finite() && decay_tau > 0.0) {
            return Err(InvalidParameterError::new(
                "decay_tau",
                decay_tau,
                "must be positive and finite",
            ));
        }
        let decay_tau = if decay_tau <= rise_tau {
            tracing::debug!(
                "decay_tau = {} not above rise_tau = {}, raising to {}",
                decay_tau,
                rise_tau,
                rise_tau + Self::DECAY_TAU_MARGIN
            );
            rise_tau + Self::DECAY_TAU_MARGIN
        } else {
            decay_tau
        };
        Ok(PerceivedParams {
            rise_tau,
            decay_tau,
            gain: 1.0,
            peak_scale: 1.0,
            clamp_scale: Some(1.1),
            floor: 0.05,
        })
    }

    /// Set the post-normalization gain
    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// Set the target perceived peak as a fraction of the concentration peak
    pub fn with_peak_scale(mut self, peak_scale: f64) -> Self {
        self.peak_scale = peak_scale;
        self
    }

    /// Set the hard cap as a fraction of the concentration peak, or `None`
    /// to disable clamping
    pub fn with_clamp_scale(mut self, clamp_scale: Option<f64>) -> Self {
        self.clamp_scale = clamp_scale;
        self
    }

    /// Set the display cutoff, in curve units
    pub fn with_floor(mut self, floor: f64) -> Self {
        self.floor = floor;
        self
    }

    /// Get the kernel rise time constant, in hours
    pub fn rise_tau(&self) -> f64 {
        self.rise_tau
    }

    /// Get the kernel decay time constant, in hours
    pub fn decay_tau(&self) -> f64 {
        self.decay_tau
    }

    /// Get the post-normalization gain
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Get the target perceived peak as a fraction of the concentration peak
    pub fn peak_scale(&self) -> f64 {
        self.peak_scale
    }

    /// Get the hard cap as a fraction of the concentration peak, if enabled
    pub fn clamp_scale(&self) -> Option<f64> {
        self.clamp_scale
    }

    /// Get the display cutoff, in curve units
    ///
    /// Renderers hide samples below this value, typically through
    /// [`Curve::masked_below`](crate::simulator::Curve::masked_below); the
    /// simulator leaves them in place.
    pub fn floor(&self) -> f64 {
        self.floor
    }
}
