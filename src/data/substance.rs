use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::builder::SubstanceBuilder;
use crate::data::params::{Kinetics, PerceivedParams};
use crate::data::schedule::Schedule;

/// How a substance participates in the pooled regimen total
///
/// Pooling only makes sense for substances whose amounts live on the same
/// scale (e.g. two amfetamine routes in dexamfetamine-equivalent mg).
/// Substances on their own scale (caffeine in mg next to stimulants in
/// dex-eq mg) stay out of the pool and are reported per substance only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Composition {
    /// Amounts share the regimen scale; the substance joins the pooled total
    #[default]
    Shared,
    /// Amounts are on an unrelated scale; the substance is reported alone
    Independent,
}

/// A named substance: its dosing schedule, kinetics, and optional
/// perceived-effect parameters
///
/// Build one through [`Substance::builder`]:
///
/// ```
/// use dosecurve::{Kinetics, Substance};
///
/// let dex = Substance::builder("dexamfetamine", Kinetics::with_half_life(1.4, 2.7).unwrap())
///     .dose(8.0, 5.0)
///     .dose(11.0, 5.0)
///     .build();
/// assert_eq!(dex.schedule().len(), 2);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Substance {
    pub(crate) name: String,
    pub(crate) schedule: Schedule,
    pub(crate) kinetics: Kinetics,
    pub(crate) perceived: Option<PerceivedParams>,
    pub(crate) composition: Composition,
}

impl Substance {
    /// Create a fluent builder for a substance
    ///
    /// # Arguments
    ///
    /// * `name` - Substance name, used to identify its curves in results
    /// * `kinetics` - Absorption/elimination constants for the model
    pub fn builder(name: impl Into<String>, kinetics: Kinetics) -> SubstanceBuilder {
        SubstanceBuilder::new(name, kinetics)
    }

    /// Get the substance name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the dosing schedule
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    /// Get the kinetic constants
    pub fn kinetics(&self) -> &Kinetics {
        &self.kinetics
    }

    /// Get the perceived-effect parameters, if the substance models them
    pub fn perceived(&self) -> Option<&PerceivedParams> {
        self.perceived.as_ref()
    }

    /// Get how the substance participates in the pooled total
    pub fn composition(&self) -> Composition {
        self.composition
    }
}

/// A full regimen: every substance simulated over the same day
///
/// The regimen anchors the shared sampling window (its earliest dose across
/// all substances) and is the entry point for computing curves via
/// [`Profile::profile`](crate::simulator::Profile::profile).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Regimen {
    pub(crate) substances: Vec<Substance>,
}

impl Regimen {
    /// Create a regimen from a vector of substances
    pub fn new(substances: Vec<Substance>) -> Self {
        Regimen { substances }
    }

    /// Add a substance to the regimen
    pub fn add_substance(&mut self, substance: Substance) {
        self.substances.push(substance);
    }

    /// Get a vector of references to all substances
    pub fn substances(&self) -> Vec<&Substance> {
        self.substances.iter().collect()
    }

    /// Get a substance by name
    pub fn get_substance(&self, name: &str) -> Option<&Substance> {
        self.substances
            .iter()
            .find(|substance| substance.name == name)
    }

    /// Get the earliest dose time across every substance, or `None` when no
    /// substance has any dose
    pub fn first_dose_time(&self) -> Option<f64> {
        self.substances
            .iter()
            .filter_map(|substance| substance.schedule.first_dose_time())
            .fold(None, |min, t| match min {
                Some(m) if m <= t => Some(m),
                _ => Some(t),
            })
    }

    /// Get an iterator over all substances
    pub fn iter(&'_ self) -> std::slice::Iter<'_, Substance> {
        self.substances.iter()
    }

    /// Get the number of substances
    pub fn len(&self) -> usize {
        self.substances.len()
    }

    /// Check if the regimen has any substances
    pub fn is_empty(&self) -> bool {
        self.substances.is_empty()
    }
}

impl From<Substance> for Regimen {
    /// Wrap a single substance in a regimen of its own
    fn from(substance: Substance) -> Self {
        Regimen {
            substances: vec![substance],
        }
    }
}

impl IntoIterator for Regimen {
    type Item = Substance;
    type IntoIter = std::vec::IntoIter<Substance>;
    /// Consumes the regimen and yields owned substances
    fn into_iter(self) -> Self::IntoIter {
        self.substances.into_iter()
    }
}

impl<'a> IntoIterator for &'a Regimen {
    type Item = &'a Substance;
    type IntoIter = std::slice::Iter<'a, Substance>;
    /// Iterate immutably over all substances
    fn into_iter(self) -> Self::IntoIter {
        self.substances.iter()
    }
}

impl fmt::Display for Substance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Substance {} ({})", self.name, self.kinetics)?;
        write!(f, "{}", self.schedule)?;
        Ok(())
    }
}

impl fmt::Display for Regimen {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Regimen with {} substances", self.substances.len())?;
        for substance in &self.substances {
            writeln!(f, "{}", substance)?;
        }
        Ok(())
    }
}
