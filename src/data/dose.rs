use std::fmt;

use serde::Deserialize;

/// Represents one entry in a dosing schedule
///
/// An entry is either:
/// - a [Dose] (the full amount taken at a single instant), or
/// - an [ExtendedDose] (an amount ingested across a duration, e.g. a drink
///   sipped over an hour), which the simulator expands into sub-pulses.
#[derive(serde::Serialize, Debug, Clone, Deserialize)]
pub enum DoseEvent {
    /// An instantaneous intake
    Single(Dose),
    /// An intake spread across a duration
    Extended(ExtendedDose),
}

impl DoseEvent {
    /// Get the time of the event (start time for extended doses)
    pub fn time(&self) -> f64 {
        match self {
            DoseEvent::Single(dose) => dose.time,
            DoseEvent::Extended(extended) => extended.start_time,
        }
    }

    /// Get the total amount of the event
    pub fn amount(&self) -> f64 {
        match self {
            DoseEvent::Single(dose) => dose.amount,
            DoseEvent::Extended(extended) => extended.amount,
        }
    }

    /// Expand the event into the instantaneous pulses the simulator sums over
    ///
    /// A [Dose] yields itself; an [ExtendedDose] yields its sub-pulses.
    pub fn pulses(&self) -> Vec<Dose> {
        match self {
            DoseEvent::Single(dose) => vec![dose.clone()],
            DoseEvent::Extended(extended) => extended.pulses(),
        }
    }
}

/// Represents an instantaneous intake of a substance
///
/// A [Dose] is a discrete amount taken at a specific hour of the day.
#[derive(serde::Serialize, Debug, Clone, Deserialize)]
pub struct Dose {
    time: f64,
    amount: f64,
}

impl Dose {
    /// Create a new dose
    ///
    /// # Arguments
    ///
    /// * `time` - Time of the intake, in hours of the day
    /// * `amount` - Amount taken, in milligrams
    pub(crate) fn new(time: f64, amount: f64) -> Self {
        Dose { time, amount }
    }

    /// Get the time of the intake, in hours of the day
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Get the amount taken, in milligrams
    pub fn amount(&self) -> f64 {
        self.amount
    }
}

/// Represents an intake spread across a duration
///
/// An [ExtendedDose] models drinking or eating a total amount over a span of
/// minutes rather than swallowing it at once. For simulation it expands into
/// `parts` equal instantaneous pulses, evenly spaced from the start time;
/// when `parts` is not given, one pulse per minute of duration is used.
#[derive(serde::Serialize, Debug, Clone, Deserialize)]
pub struct ExtendedDose {
    start_time: f64,
    amount: f64,
    duration_minutes: f64,
    parts: Option<usize>,
}

impl ExtendedDose {
    /// Create a new extended dose
    ///
    /// # Arguments
    ///
    /// * `start_time` - Start of the intake, in hours of the day
    /// * `amount` - Total amount taken, in milligrams
    /// * `duration_minutes` - Span of the intake, in minutes
    /// * `parts` - Number of sub-pulses, or `None` for one per minute
    pub(crate) fn new(
        start_time: f64,
        amount: f64,
        duration_minutes: f64,
        parts: Option<usize>,
    ) -> Self {
        ExtendedDose {
            start_time,
            amount,
            duration_minutes,
            parts,
        }
    }

    /// Get the start of the intake, in hours of the day
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Get the total amount taken, in milligrams
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Get the span of the intake, in minutes
    pub fn duration_minutes(&self) -> f64 {
        self.duration_minutes
    }

    /// Get the requested number of sub-pulses, if any
    pub fn parts(&self) -> Option<usize> {
        self.parts
    }

    /// Expand into equal instantaneous sub-pulses
    ///
    /// The total amount is divided evenly over `n` pulses, where `n` is
    /// `parts` when given and `duration_minutes` rounded to the nearest
    /// integer otherwise, with a minimum of one. Pulses start at
    /// `start_time` and are spaced `duration_minutes / n` apart, so the
    /// last pulse lands before the end of the span. A non-positive
    /// duration collapses to a single pulse of the full amount.
    pub fn pulses(&self) -> Vec<Dose> {
        if self.duration_minutes <= 0.0 {
            return vec![Dose::new(self.start_time, self.amount)];
        }
        let n = self
            .parts
            .unwrap_or_else(|| self.duration_minutes.round() as usize)
            .max(1);
        let step_hours = (self.duration_minutes / n as f64) / 60.0;
        let amount_each = self.amount / n as f64;
        (0..n)
            .map(|i| Dose::new(self.start_time + i as f64 * step_hours, amount_each))
            .collect()
    }
}

impl fmt::Display for DoseEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DoseEvent::Single(dose) => write!(
                f,
                "Dose at time {:.2} with amount {:.2} mg",
                dose.time, dose.amount
            ),
            DoseEvent::Extended(extended) => write!(
                f,
                "Extended dose starting at {:.2} with amount {:.2} mg over {:.1} minutes",
                extended.start_time, extended.amount, extended.duration_minutes
            ),
        }
    }
}
