//! Tests for stop-after projection branches through the public API
//!
//! Tests cover:
//! - Branch count and time ordering
//! - Branch values against manually summed partials
//! - Masking before the first dropped dose
//! - Perceived branches
//! - Composition rules inside branches

use approx::assert_relative_eq;
use dosecurve::prelude::*;

fn dex_kinetics() -> Kinetics {
    Kinetics::with_half_life(1.4, 2.7).unwrap()
}

fn dex_three_doses() -> Regimen {
    Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .dose(13.0, 5.0)
        .build_regimen()
}

#[test]
fn test_one_branch_per_skippable_dose() {
    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = dex_three_doses().profile(&options).unwrap();

    assert_eq!(profile.branches.len(), 2);
    assert_eq!(profile.branches[0].included_dose_time, 8.0);
    assert_eq!(profile.branches[0].branch_time, 11.0);
    assert_eq!(profile.branches[1].included_dose_time, 11.0);
    assert_eq!(profile.branches[1].branch_time, 13.0);

    // a single dose leaves nothing to skip
    let single = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 5.0)
        .build_regimen();
    assert!(single.profile(&options).unwrap().branches.is_empty());
}

#[test]
fn test_branches_match_manually_summed_partials() {
    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = dex_three_doses().profile(&options).unwrap();
    let grid = &profile.grid;
    let dex = profile.substance("dexamfetamine").unwrap();

    // after every dose has landed, branch k carries exactly k + 1 doses
    let at = 14.0;
    let first = dex.doses[0].pk.interpolate(grid, at).unwrap();
    let second = dex.doses[1].pk.interpolate(grid, at).unwrap();
    assert_relative_eq!(
        profile.branches[0].pk.interpolate(grid, at).unwrap(),
        first,
        epsilon = 1e-12
    );
    assert_relative_eq!(
        profile.branches[1].pk.interpolate(grid, at).unwrap(),
        first + second,
        epsilon = 1e-12
    );

    // the full total keeps the third dose as well
    assert!(
        dex.pk_total.interpolate(grid, at).unwrap()
            > profile.branches[1].pk.interpolate(grid, at).unwrap()
    );
}

#[test]
fn test_branches_are_masked_until_their_decision_point() {
    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = dex_three_doses().profile(&options).unwrap();

    // default grid: 1-minute samples from 8am, so 11am is index 180
    let first = &profile.branches[0].pk;
    assert_eq!(first.samples()[179], None);
    assert!(first.samples()[180].is_some());

    let second = &profile.branches[1].pk;
    assert_eq!(second.samples()[299], None);
    assert!(second.samples()[300].is_some());
}

#[test]
fn test_branches_carry_other_shared_substances() {
    let mut regimen = dex_three_doses();
    regimen.add_substance(
        Substance::builder("vyvanse", Kinetics::with_half_life(0.8, 11.0).unwrap())
            .dose(8.0, 12.0)
            .build(),
    );

    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = regimen.profile(&options).unwrap();
    let grid = &profile.grid;

    let vyvanse = profile.substance("vyvanse").unwrap();
    let dex = profile.substance("dexamfetamine").unwrap();
    let at = 12.0;
    assert_relative_eq!(
        profile.branches[0].pk.interpolate(grid, at).unwrap(),
        vyvanse.pk_total.interpolate(grid, at).unwrap()
            + dex.doses[0].pk.interpolate(grid, at).unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_independent_designated_substance_projects_alone() {
    let mut regimen = Substance::builder("caffeine", Kinetics::with_half_life(3.0, 5.0).unwrap())
        .dose(9.0, 75.0)
        .dose(13.0, 75.0)
        .independent()
        .build_regimen();
    regimen.add_substance(
        Substance::builder("dexamfetamine", dex_kinetics())
            .dose(8.0, 5.0)
            .build(),
    );

    let options = ProfileOptions::default().with_projections_for("caffeine");
    let profile = regimen.profile(&options).unwrap();
    let grid = &profile.grid;
    let caffeine = profile.substance("caffeine").unwrap();

    assert_eq!(profile.branches.len(), 1);
    let at = 14.0;
    assert_relative_eq!(
        profile.branches[0].pk.interpolate(grid, at).unwrap(),
        caffeine.doses[0].pk.interpolate(grid, at).unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_perceived_branches_when_the_substance_models_perceived_effect() {
    let regimen = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .perceived(PerceivedParams::new(0.5, 3.0).unwrap())
        .build_regimen();

    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = regimen.profile(&options).unwrap();
    let grid = &profile.grid;
    let dex = profile.substance("dexamfetamine").unwrap();

    let branch = &profile.branches[0];
    let perceived = branch.perceived.as_ref().unwrap();
    assert_eq!(perceived.len(), grid.len());
    // masked exactly like the PK branch
    assert_eq!(perceived.samples()[179], None);
    assert!(perceived.samples()[180].is_some());
    // one dose kept, so the branch tracks that dose's perceived curve
    assert_relative_eq!(
        perceived.interpolate(grid, 12.0).unwrap(),
        dex.doses[0].perceived.as_ref().unwrap().interpolate(grid, 12.0).unwrap(),
        epsilon = 1e-12
    );

    // without a perceived model the branches are PK-only
    let bare = dex_three_doses().profile(&options).unwrap();
    assert!(bare.branches.iter().all(|b| b.perceived.is_none()));
}

#[test]
fn test_unsorted_schedules_branch_in_time_order() {
    let regimen = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(13.0, 5.0)
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .build_regimen();

    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = regimen.profile(&options).unwrap();

    let times: Vec<(f64, f64)> = profile
        .branches
        .iter()
        .map(|b| (b.included_dose_time, b.branch_time))
        .collect();
    assert_eq!(times, vec![(8.0, 11.0), (11.0, 13.0)]);
}

#[test]
fn test_projection_artifacts_carry_branch_metadata() {
    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = dex_three_doses().profile(&options).unwrap();
    let artifacts = profile.artifacts();

    let projections: Vec<_> = artifacts
        .iter()
        .filter(|a| a.role == CurveRole::ProjectionPk)
        .collect();
    assert_eq!(projections.len(), 2);
    assert_eq!(projections[0].label, "Stop after 8am dexamfetamine (PK)");
    assert_eq!(projections[0].branch_time, Some(11.0));
    assert_eq!(projections[0].substance.as_deref(), Some("dexamfetamine"));
    assert_eq!(projections[1].label, "Stop after 11am dexamfetamine (PK)");
}
