use crate::data::dose::{Dose, DoseEvent, ExtendedDose};
use crate::data::params::{Kinetics, PerceivedParams};
use crate::data::schedule::Schedule;
use crate::data::substance::{Composition, Regimen, Substance};

/// Fluent builder for a [Substance]
///
/// Obtained from [`Substance::builder`]; finished with [`build`](Self::build).
pub struct SubstanceBuilder {
    name: String,
    schedule: Schedule,
    kinetics: Kinetics,
    perceived: Option<PerceivedParams>,
    composition: Composition,
}

impl SubstanceBuilder {
    pub(crate) fn new(name: impl Into<String>, kinetics: Kinetics) -> Self {
        SubstanceBuilder {
            name: name.into(),
            schedule: Schedule::new(),
            kinetics,
            perceived: None,
            composition: Composition::default(),
        }
    }

    /// Add a dose event to the schedule
    pub fn event(mut self, event: DoseEvent) -> Self {
        self.schedule.add_event(event);
        self
    }

    /// Add an instantaneous dose
    ///
    /// # Arguments
    ///
    /// * `time` - Time of the intake, in hours of the day
    /// * `amount` - Amount taken, in milligrams
    pub fn dose(self, time: f64, amount: f64) -> Self {
        self.event(DoseEvent::Single(Dose::new(time, amount)))
    }

    /// Add an intake spread across a duration, split into one pulse per minute
    ///
    /// # Arguments
    ///
    /// * `start_time` - Start of the intake, in hours of the day
    /// * `amount` - Total amount taken, in milligrams
    /// * `duration_minutes` - Span of the intake, in minutes
    pub fn extended_dose(self, start_time: f64, amount: f64, duration_minutes: f64) -> Self {
        self.event(DoseEvent::Extended(ExtendedDose::new(
            start_time,
            amount,
            duration_minutes,
            None,
        )))
    }

    /// Add an intake spread across a duration, split into a chosen number of pulses
    pub fn extended_dose_in_parts(
        self,
        start_time: f64,
        amount: f64,
        duration_minutes: f64,
        parts: usize,
    ) -> Self {
        self.event(DoseEvent::Extended(ExtendedDose::new(
            start_time,
            amount,
            duration_minutes,
            Some(parts),
        )))
    }

    /// Repeat the last event `n` times, shifting each copy by `delta` hours
    pub fn repeat(mut self, n: usize, delta: f64) -> Self {
        let last_event = match self.schedule.events.last() {
            Some(event) => event.clone(),
            None => panic!("There is no event to repeat"),
        };
        for i in 1..=n {
            self = match last_event.clone() {
                DoseEvent::Single(dose) => {
                    self.dose(dose.time() + delta * i as f64, dose.amount())
                }
                DoseEvent::Extended(extended) => match extended.parts() {
                    Some(parts) => self.extended_dose_in_parts(
                        extended.start_time() + delta * i as f64,
                        extended.amount(),
                        extended.duration_minutes(),
                        parts,
                    ),
                    None => self.extended_dose(
                        extended.start_time() + delta * i as f64,
                        extended.amount(),
                        extended.duration_minutes(),
                    ),
                },
            };
        }
        self
    }

    /// Attach perceived-effect parameters
    pub fn perceived(mut self, params: PerceivedParams) -> Self {
        self.perceived = Some(params);
        self
    }

    /// Keep the substance out of the pooled regimen total
    ///
    /// Use for substances whose amounts are on a different scale than the
    /// rest of the regimen.
    pub fn independent(mut self) -> Self {
        self.composition = Composition::Independent;
        self
    }

    /// Build the substance
    pub fn build(self) -> Substance {
        Substance {
            name: self.name,
            schedule: self.schedule,
            kinetics: self.kinetics,
            perceived: self.perceived,
            composition: self.composition,
        }
    }

    /// Build the substance and wrap it in a single-substance [Regimen]
    pub fn build_regimen(self) -> Regimen {
        Regimen::from(self.build())
    }
}
