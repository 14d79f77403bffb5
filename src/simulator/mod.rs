//! Day-curve simulation for dosing regimens
//!
//! This module turns a [`Regimen`] into plottable curves: a shared sampling
//! grid, a concentration (PK) curve per dose and per substance, optional
//! perceived-effect curves, pooled totals over the substances that combine,
//! and optional stop-after projection branches.
//!
//! # Design
//!
//! - **One grid**: every curve in a profile is sampled on the same
//!   [`SampleGrid`], anchored at the regimen's first dose
//! - **Masked starts**: per-dose concentration curves are undefined before
//!   their dose; perceived curves and totals are always fully defined
//! - **Composable**: substances sum into pooled totals unless marked
//!   [`Composition::Independent`](crate::data::Composition)
//! - **Projection-ready**: branches for "stop after this dose" come from the
//!   same per-dose curves, not a re-simulation
//!
//! # Usage
//!
//! Profiling is performed by calling `.profile()` on a [`Regimen`] or a
//! single [`Substance`]:
//!
//! ```rust,ignore
//! use dosecurve::prelude::*;
//!
//! let regimen = Substance::builder("dexamfetamine", Kinetics::with_half_life(1.4, 2.7)?)
//!     .dose(8.0, 10.0)
//!     .dose(12.0, 5.0)
//!     .build_regimen();
//!
//! let profile = regimen.profile(&ProfileOptions::default())?;
//! println!("{} samples", profile.grid.len());
//! println!("peak {:?}", profile.pooled_pk.peak());
//! ```
//!
//! # Projections
//!
//! ```rust,ignore
//! let options = ProfileOptions::default().with_projections_for("dexamfetamine");
//! let profile = regimen.profile(&options)?;
//! for branch in &profile.branches {
//!     println!("{branch}");
//! }
//! ```

pub mod bateman;
pub mod curve;
pub mod grid;
pub mod output;
pub mod perceived;
pub mod projection;

pub use curve::{Curve, Peak};
pub use grid::{GridOptions, SampleGrid};
pub use output::{
    clock_label, CurveArtifact, CurveRole, DoseCurve, RegimenProfile, SubstanceCurves,
};
pub use perceived::PerceivedKernel;
pub use projection::ProjectionBranch;

use rayon::prelude::*;

use crate::data::dose::DoseEvent;
use crate::data::params::Kinetics;
use crate::data::substance::{Composition, Regimen, Substance};
use crate::error::InvalidParameterError;

/// Options controlling a profile run
#[derive(Debug, Clone, Default)]
pub struct ProfileOptions {
    /// Sampling grid configuration
    pub grid: GridOptions,
    /// Substance to build stop-after branches for, by name
    pub projections_for: Option<String>,
}

impl ProfileOptions {
    /// Set the grid configuration
    pub fn with_grid(mut self, grid: GridOptions) -> Self {
        self.grid = grid;
        self
    }

    /// Set the sample spacing in minutes
    pub fn with_resolution_minutes(mut self, resolution_minutes: f64) -> Self {
        self.grid.resolution_minutes = resolution_minutes;
        self
    }

    /// Set the window length in hours
    pub fn with_window_hours(mut self, window_hours: f64) -> Self {
        self.grid.window_hours = window_hours;
        self
    }

    /// Request stop-after branches for the named substance
    pub fn with_projections_for(mut self, name: impl Into<String>) -> Self {
        self.projections_for = Some(name.into());
        self
    }
}

/// Extension trait for day-curve profiling
///
/// Provides `.profile()` on [`Regimen`] and [`Substance`]. Profiling a
/// substance directly wraps it in a one-substance regimen.
pub trait Profile {
    /// Simulate every curve of the day window
    fn profile(&self, options: &ProfileOptions) -> Result<RegimenProfile, InvalidParameterError>;
}

impl Profile for Regimen {
    fn profile(&self, options: &ProfileOptions) -> Result<RegimenProfile, InvalidParameterError> {
        profile_regimen(self, options)
    }
}

impl Profile for Substance {
    fn profile(&self, options: &ProfileOptions) -> Result<RegimenProfile, InvalidParameterError> {
        Regimen::from(self.clone()).profile(options)
    }
}

/// Core profiling for one regimen
fn profile_regimen(
    regimen: &Regimen,
    options: &ProfileOptions,
) -> Result<RegimenProfile, InvalidParameterError> {
    if let Some(name) = &options.projections_for {
        if regimen.get_substance(name).is_none() {
            return Err(InvalidParameterError::new(
                "projections_for",
                name.clone(),
                "must name a substance in the regimen",
            ));
        }
    }

    let grid = SampleGrid::anchored(regimen.first_dose_time(), &options.grid)?;

    let substances = regimen
        .iter()
        .map(|substance| assemble_substance(substance, &grid))
        .collect::<Result<Vec<SubstanceCurves>, InvalidParameterError>>()?;

    let pooled_pk = substances
        .iter()
        .filter(|s| s.composition == Composition::Shared)
        .fold(Curve::zeros(grid.len()), |acc, s| acc.add(&s.pk_total));

    let any_shared_perceived = substances
        .iter()
        .any(|s| s.composition == Composition::Shared && s.perceived_total.is_some());
    let pooled_perceived = any_shared_perceived.then(|| {
        substances
            .iter()
            .filter(|s| s.composition == Composition::Shared)
            .filter_map(|s| s.perceived_total.as_ref())
            .fold(Curve::zeros(grid.len()), |acc, total| acc.add(total))
    });

    let branches = match &options.projections_for {
        Some(name) => projection::stop_after_branches(&grid, &substances, name),
        None => Vec::new(),
    };

    tracing::debug!(
        substances = substances.len(),
        samples = grid.len(),
        branches = branches.len(),
        "profiled regimen"
    );

    Ok(RegimenProfile {
        grid,
        substances,
        pooled_pk,
        pooled_perceived,
        branches,
    })
}

/// Simulate every curve for one substance on an existing grid
///
/// Dose events are independent of each other, so their curves are computed
/// in parallel; `collect` preserves schedule order.
fn assemble_substance(
    substance: &Substance,
    grid: &SampleGrid,
) -> Result<SubstanceCurves, InvalidParameterError> {
    let kernel = match substance.perceived() {
        Some(params) => Some(PerceivedKernel::new(params, grid.step_hours())?),
        None => None,
    };

    let doses: Vec<DoseCurve> = substance
        .schedule()
        .events
        .par_iter()
        .enumerate()
        .map(|(index, event)| {
            let pk = event_curve(grid, event, substance.kinetics());
            let perceived = kernel.as_ref().map(|k| k.apply(&pk));
            DoseCurve {
                index,
                event: event.clone(),
                pk,
                perceived,
            }
        })
        .collect();

    let pk_total = doses
        .iter()
        .fold(Curve::zeros(grid.len()), |acc, dose| acc.add(&dose.pk));
    let perceived_total = kernel.as_ref().map(|_| {
        doses
            .iter()
            .filter_map(|dose| dose.perceived.as_ref())
            .fold(Curve::zeros(grid.len()), |acc, curve| acc.add(curve))
    });

    Ok(SubstanceCurves {
        name: substance.name().to_string(),
        composition: substance.composition(),
        doses,
        pk_total,
        perceived_total,
        display_floor: substance.perceived().map(|p| p.floor()),
    })
}

/// The concentration curve of one dose event, masked before its start
///
/// Extended events sum their pulse curves first; the mask still starts at
/// the event's own start time, so the whole event appears at once.
fn event_curve(grid: &SampleGrid, event: &DoseEvent, kinetics: &Kinetics) -> Curve {
    let summed = event
        .pulses()
        .iter()
        .fold(Curve::zeros(grid.len()), |acc, pulse| {
            acc.add(&bateman::single_dose_curve(grid, pulse, kinetics))
        });
    let start = grid.index_at_or_after(event.time()).unwrap_or(grid.len());
    summed.masked_before_index(start)
}
