//! Stop-after projection branches
//!
//! A projection answers "what does the rest of the day look like if I stop
//! dosing now?". For a designated substance with `n` doses there are `n - 1`
//! decision points, one after each dose except the last: the branch for
//! decision point `i` keeps the first `i + 1` doses in time order, drops the
//! rest, and carries every other pooled substance's full totals unchanged.
//!
//! Branches are masked strictly before the time of the first dropped dose.
//! Up to that moment the branch is identical to the full profile, so drawing
//! it earlier would only repaint the main curve.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::data::substance::Composition;
use crate::simulator::curve::Curve;
use crate::simulator::grid::SampleGrid;
use crate::simulator::output::{clock_label, SubstanceCurves};

/// One stop-after branch of a profile
///
/// Produced by profiling with projections requested, in time order of the
/// designated substance's doses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionBranch {
    /// The designated substance
    pub substance: String,
    /// Number of time-ordered doses the branch keeps
    pub truncation_index: usize,
    /// Time of the last kept dose, in hours of the day
    pub included_dose_time: f64,
    /// Time of the first dropped dose; samples before it are masked
    pub branch_time: f64,
    /// Concentration under the truncated schedule
    pub pk: Curve,
    /// Perceived effect under the truncated schedule, when the designated
    /// substance models it
    pub perceived: Option<Curve>,
}

impl fmt::Display for ProjectionBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stop after {} {} ({} of the doses kept)",
            clock_label(self.included_dose_time),
            self.substance,
            self.truncation_index,
        )
    }
}

/// Build the stop-after branches for one designated substance
///
/// The partial sums accumulate dose by dose, so successive branches reuse
/// the previous branch's work. Substances marked [Composition::Independent]
/// never mix in: an Independent designated substance projects alone, and an
/// Independent bystander stays out of a Shared substance's branches.
pub(crate) fn stop_after_branches(
    grid: &SampleGrid,
    substances: &[SubstanceCurves],
    target: &str,
) -> Vec<ProjectionBranch> {
    let Some(designated) = substances.iter().find(|s| s.name == target) else {
        return Vec::new();
    };

    let mut order: Vec<usize> = (0..designated.doses.len()).collect();
    order.sort_by(|&a, &b| {
        designated.doses[a]
            .event
            .time()
            .partial_cmp(&designated.doses[b].event.time())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    if order.len() < 2 {
        return Vec::new();
    }

    let mut partial_pk = Curve::zeros(grid.len());
    let mut partial_perceived = Curve::zeros(grid.len());
    if designated.composition == Composition::Shared {
        let others = substances
            .iter()
            .filter(|s| s.composition == Composition::Shared && s.name != designated.name);
        for other in others {
            partial_pk = partial_pk.add(&other.pk_total);
            if let Some(total) = &other.perceived_total {
                partial_perceived = partial_perceived.add(total);
            }
        }
    }
    let models_perceived = designated.perceived_total.is_some();

    let mut branches = Vec::with_capacity(order.len() - 1);
    for (kept, window) in order.windows(2).enumerate() {
        let included = &designated.doses[window[0]];
        let next = &designated.doses[window[1]];

        partial_pk = partial_pk.add(&included.pk);
        if let Some(perceived) = &included.perceived {
            partial_perceived = partial_perceived.add(perceived);
        }

        let branch_time = next.event.time();
        let mask = grid.index_at_or_after(branch_time).unwrap_or(grid.len());
        branches.push(ProjectionBranch {
            substance: designated.name.clone(),
            truncation_index: kept + 1,
            included_dose_time: included.event.time(),
            branch_time,
            pk: partial_pk.masked_before_index(mask),
            perceived: models_perceived.then(|| partial_perceived.masked_before_index(mask)),
        });
    }
    branches
}
