//! Renderer-facing results
//!
//! A profile run produces a [RegimenProfile]: every curve computed for a
//! regimen, grouped by substance, together with the grid they are aligned
//! with and the identity metadata a renderer needs to label lines without
//! recomputing anything. Nothing here draws, writes files or reads
//! arguments; chart styling, legends and persistence live outside the crate.
//!
//! [`RegimenProfile::artifacts`] flattens the grouped curves into
//! [CurveArtifact] records, one per drawable line. Artifacts carry their own
//! time axis and nullable sample values, so they serialize to plot-friendly
//! JSON: a masked sample becomes `null` instead of a NaN that many JSON
//! consumers reject.

use serde::{Deserialize, Serialize};

use crate::data::dose::DoseEvent;
use crate::data::substance::Composition;
use crate::simulator::curve::Curve;
use crate::simulator::grid::SampleGrid;
use crate::simulator::projection::ProjectionBranch;

/// The curves computed for one dose event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DoseCurve {
    /// Position of the event in its schedule, in insertion order
    pub index: usize,
    /// The originating event
    pub event: DoseEvent,
    /// Concentration response to this event alone, masked before its time
    pub pk: Curve,
    /// Perceived response to this event alone, when the substance models it
    pub perceived: Option<Curve>,
}

/// All curves computed for one substance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubstanceCurves {
    /// Substance name
    pub name: String,
    /// Whether the substance joins the pooled regimen total
    pub composition: Composition,
    /// Per-dose curves, in schedule insertion order
    pub doses: Vec<DoseCurve>,
    /// Concentration total over all doses, fully defined
    pub pk_total: Curve,
    /// Perceived total, when the substance models perceived effect
    pub perceived_total: Option<Curve>,
    /// Display cutoff for perceived curves, in curve units
    ///
    /// Metadata for renderers; no sample in this struct has it applied.
    pub display_floor: Option<f64>,
}

/// The full output of one profile run
///
/// All curves are aligned 1:1 with `grid`. Totals are fully defined;
/// per-dose curves and projection branches are masked before they start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimenProfile {
    /// The grid every curve is sampled on
    pub grid: SampleGrid,
    /// Per-substance curves, in regimen order
    pub substances: Vec<SubstanceCurves>,
    /// Pooled concentration total over the Shared substances
    pub pooled_pk: Curve,
    /// Pooled perceived total over the Shared substances that model it,
    /// or `None` when none do
    pub pooled_perceived: Option<Curve>,
    /// Stop-after projection branches, when requested
    pub branches: Vec<ProjectionBranch>,
}

impl RegimenProfile {
    /// Get one substance's curves by name
    pub fn substance(&self, name: &str) -> Option<&SubstanceCurves> {
        self.substances.iter().find(|s| s.name == name)
    }

    /// Flatten the profile into one artifact per drawable line
    ///
    /// Order: pooled totals first, then each substance's totals followed by
    /// its per-dose curves, then projection branches. Labels follow the
    /// `"dexamfetamine 5mg @ 11am (PK)"` convention; renderers are free to
    /// rebuild their own from the metadata instead.
    pub fn artifacts(&self) -> Vec<CurveArtifact> {
        let mut artifacts = Vec::new();

        artifacts.push(CurveArtifact::new(
            CurveRole::PooledPk,
            "Total (PK)".to_string(),
            &self.grid,
            &self.pooled_pk,
        ));
        if let Some(pooled) = &self.pooled_perceived {
            let mut artifact = CurveArtifact::new(
                CurveRole::PooledPerceived,
                "Total (perceived)".to_string(),
                &self.grid,
                pooled,
            );
            artifact.display_floor = self.pooled_display_floor();
            artifacts.push(artifact);
        }

        for substance in &self.substances {
            let mut artifact = CurveArtifact::new(
                CurveRole::SubstancePk,
                format!("{} (PK)", substance.name),
                &self.grid,
                &substance.pk_total,
            );
            artifact.substance = Some(substance.name.clone());
            artifacts.push(artifact);

            if let Some(total) = &substance.perceived_total {
                let mut artifact = CurveArtifact::new(
                    CurveRole::SubstancePerceived,
                    format!("{} (perceived)", substance.name),
                    &self.grid,
                    total,
                );
                artifact.substance = Some(substance.name.clone());
                artifact.display_floor = substance.display_floor;
                artifacts.push(artifact);
            }

            for dose in &substance.doses {
                let mut artifact = CurveArtifact::new(
                    CurveRole::DosePk,
                    dose_label(&substance.name, &dose.event, "PK"),
                    &self.grid,
                    &dose.pk,
                );
                artifact.substance = Some(substance.name.clone());
                artifact.dose_index = Some(dose.index);
                artifact.dose_time = Some(dose.event.time());
                artifact.dose_amount = Some(dose.event.amount());
                artifacts.push(artifact);

                if let Some(perceived) = &dose.perceived {
                    let mut artifact = CurveArtifact::new(
                        CurveRole::DosePerceived,
                        dose_label(&substance.name, &dose.event, "perceived"),
                        &self.grid,
                        perceived,
                    );
                    artifact.substance = Some(substance.name.clone());
                    artifact.dose_index = Some(dose.index);
                    artifact.dose_time = Some(dose.event.time());
                    artifact.dose_amount = Some(dose.event.amount());
                    artifact.display_floor = substance.display_floor;
                    artifacts.push(artifact);
                }
            }
        }

        for branch in &self.branches {
            let mut artifact = CurveArtifact::new(
                CurveRole::ProjectionPk,
                branch_label(branch, "PK"),
                &self.grid,
                &branch.pk,
            );
            artifact.substance = Some(branch.substance.clone());
            artifact.dose_time = Some(branch.included_dose_time);
            artifact.truncation_index = Some(branch.truncation_index);
            artifact.branch_time = Some(branch.branch_time);
            artifacts.push(artifact);

            if let Some(perceived) = &branch.perceived {
                let mut artifact = CurveArtifact::new(
                    CurveRole::ProjectionPerceived,
                    branch_label(branch, "perceived"),
                    &self.grid,
                    perceived,
                );
                artifact.substance = Some(branch.substance.clone());
                artifact.dose_time = Some(branch.included_dose_time);
                artifact.truncation_index = Some(branch.truncation_index);
                artifact.branch_time = Some(branch.branch_time);
                artifacts.push(artifact);
            }
        }

        artifacts
    }

    /// Serialize [`artifacts`](Self::artifacts) to pretty-printed JSON
    pub fn artifacts_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.artifacts())
    }

    /// The strictest display floor among the pooled perceived contributors
    ///
    /// Substances can carry different floors; the pooled curve gets the
    /// maximum so a renderer hiding below it hides what every contributor
    /// would hide.
    fn pooled_display_floor(&self) -> Option<f64> {
        self.substances
            .iter()
            .filter(|s| s.composition == Composition::Shared && s.perceived_total.is_some())
            .filter_map(|s| s.display_floor)
            .fold(None, |max, floor| match max {
                Some(m) if m >= floor => Some(m),
                _ => Some(floor),
            })
    }
}

fn dose_label(substance: &str, event: &DoseEvent, kind: &str) -> String {
    format!(
        "{} {}mg @ {} ({})",
        substance,
        event.amount(),
        clock_label(event.time()),
        kind
    )
}

fn branch_label(branch: &ProjectionBranch, kind: &str) -> String {
    format!(
        "Stop after {} {} ({})",
        clock_label(branch.included_dose_time),
        branch.substance,
        kind
    )
}

/// What a curve represents, for renderer dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CurveRole {
    /// Concentration response to a single dose event
    DosePk,
    /// Perceived response to a single dose event
    DosePerceived,
    /// One substance's concentration total
    SubstancePk,
    /// One substance's perceived total
    SubstancePerceived,
    /// Pooled concentration total over the Shared substances
    PooledPk,
    /// Pooled perceived total over the Shared substances
    PooledPerceived,
    /// Stop-after concentration branch
    ProjectionPk,
    /// Stop-after perceived branch
    ProjectionPerceived,
}

/// One drawable line, flattened for a renderer
///
/// Fields that do not apply to a role are `None`: pooled totals carry no
/// substance, substance totals carry no dose metadata, and only projection
/// roles carry branch metadata. For projection roles `dose_time` is the time
/// of the last dose the branch includes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurveArtifact {
    /// What the curve represents
    pub role: CurveRole,
    /// Suggested legend label
    pub label: String,
    /// Originating substance, when the role is substance-specific
    pub substance: Option<String>,
    /// Originating dose position in its schedule, for dose roles
    pub dose_index: Option<usize>,
    /// Originating dose time in hours of the day
    pub dose_time: Option<f64>,
    /// Originating dose amount in mg, for dose roles
    pub dose_amount: Option<f64>,
    /// Truncation point, for projection roles
    pub truncation_index: Option<usize>,
    /// Time the branch becomes valid, for projection roles
    pub branch_time: Option<f64>,
    /// Display cutoff in curve units, for perceived roles
    pub display_floor: Option<f64>,
    /// Sample times, in hours of the day
    pub times: Vec<f64>,
    /// Sample values; `None` marks a masked (not yet started) sample
    pub values: Vec<Option<f64>>,
}

impl CurveArtifact {
    fn new(role: CurveRole, label: String, grid: &SampleGrid, curve: &Curve) -> Self {
        CurveArtifact {
            role,
            label,
            substance: None,
            dose_index: None,
            dose_time: None,
            dose_amount: None,
            truncation_index: None,
            branch_time: None,
            display_floor: None,
            times: grid.times().to_vec(),
            values: curve.samples().to_vec(),
        }
    }
}

/// Format a decimal hour of the day as a 12-hour clock label
///
/// Rounds to the nearest minute and wraps at 24 hours, so grid times past
/// midnight label as the next morning: `8.0` is `"8am"`, `13.5` is
/// `"1:30pm"`, `32.0` is `"8am"` again.
pub fn clock_label(hour: f64) -> String {
    let total_minutes = ((hour * 60.0).round() as i64).rem_euclid(24 * 60);
    let h24 = total_minutes / 60;
    let minutes = total_minutes % 60;
    let suffix = if h24 < 12 { "am" } else { "pm" };
    let h12 = match h24 % 12 {
        0 => 12,
        h => h,
    };
    if minutes == 0 {
        format!("{}{}", h12, suffix)
    } else {
        format!("{}:{:02}{}", h12, minutes, suffix)
    }
}
