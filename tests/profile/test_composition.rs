//! Tests for multi-dose superposition and multi-substance pooling
//!
//! Tests cover:
//! - Totals as sums of per-dose curves
//! - Insertion-order independence
//! - Extended (split) doses against their hand-rolled equivalent
//! - Pooling rules for Shared and Independent substances
//! - Artifact flattening

use approx::assert_relative_eq;
use dosecurve::prelude::*;

fn dex_kinetics() -> Kinetics {
    Kinetics::with_half_life(1.4, 2.7).unwrap()
}

#[test]
fn test_total_is_the_sum_of_dose_curves() {
    let profile = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    let grid = &profile.grid;
    let dex = profile.substance("dexamfetamine").unwrap();
    let first = &dex.doses[0].pk;
    let second = &dex.doses[1].pk;

    // before the second dose the total is the first dose alone
    assert_eq!(second.interpolate(grid, 10.0), None);
    assert_relative_eq!(
        dex.pk_total.interpolate(grid, 10.0).unwrap(),
        first.interpolate(grid, 10.0).unwrap(),
        epsilon = 1e-12
    );

    // afterwards both doses contribute
    let at_noon = dex.pk_total.interpolate(grid, 12.0).unwrap();
    assert!(second.interpolate(grid, 12.0).unwrap() > 0.0);
    assert_relative_eq!(
        at_noon,
        first.interpolate(grid, 12.0).unwrap() + second.interpolate(grid, 12.0).unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_resumming_dose_curves_reproduces_the_total() {
    let profile = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 15.0)
        .dose(11.0, 5.0)
        .dose(13.0, 7.5)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    let dex = profile.substance("dexamfetamine").unwrap();
    let mut manual = vec![0.0; profile.grid.len()];
    for dose in &dex.doses {
        for (acc, sample) in manual.iter_mut().zip(dose.pk.filled(0.0)) {
            *acc += sample;
        }
    }
    for (computed, expected) in dex.pk_total.filled(0.0).iter().zip(&manual) {
        assert_relative_eq!(computed, expected, epsilon = 1e-12);
    }
}

#[test]
fn test_insertion_order_does_not_change_the_total() {
    let forward = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 15.0)
        .dose(11.0, 5.0)
        .dose(13.0, 7.5)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();
    let shuffled = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(13.0, 7.5)
        .dose(8.0, 15.0)
        .dose(11.0, 5.0)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    assert_eq!(forward.grid.start(), shuffled.grid.start());
    for (a, b) in forward
        .pooled_pk
        .filled(0.0)
        .iter()
        .zip(shuffled.pooled_pk.filled(0.0))
    {
        assert_relative_eq!(a, &b, epsilon = 1e-12);
    }
}

#[test]
fn test_extended_dose_matches_its_pulse_train() {
    // 15 units over an hour in 4 parts: 3.75 at 8:00, 8:15, 8:30, 8:45
    let extended = Substance::builder("caffeine", Kinetics::with_half_life(3.0, 5.0).unwrap())
        .extended_dose_in_parts(8.0, 15.0, 60.0, 4)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();
    let pulses = Substance::builder("caffeine", Kinetics::with_half_life(3.0, 5.0).unwrap())
        .dose(8.0, 3.75)
        .dose(8.25, 3.75)
        .dose(8.5, 3.75)
        .dose(8.75, 3.75)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    // one event on the schedule, but the same curve as four single doses
    assert_eq!(extended.substances[0].doses.len(), 1);
    assert_eq!(pulses.substances[0].doses.len(), 4);
    for (a, b) in extended
        .pooled_pk
        .filled(0.0)
        .iter()
        .zip(pulses.pooled_pk.filled(0.0))
    {
        assert_relative_eq!(a, &b, epsilon = 1e-12);
    }
}

#[test]
fn test_unsized_extended_dose_splits_per_minute() {
    let profile = Substance::builder("caffeine", Kinetics::with_half_life(3.0, 5.0).unwrap())
        .extended_dose(13.0, 90.0, 30.0)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    let event = &profile.substances[0].doses[0].event;
    assert_eq!(event.pulses().len(), 30);
    assert_relative_eq!(event.pulses()[0].amount(), 3.0, epsilon = 1e-12);
    // total mass is preserved by the split
    let total: f64 = event.pulses().iter().map(|p| p.amount()).sum();
    assert_relative_eq!(total, 90.0, epsilon = 1e-12);
}

#[test]
fn test_empty_schedule_yields_a_zero_total() {
    let profile = Substance::builder("dexamfetamine", dex_kinetics())
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    assert_eq!(profile.grid.start(), 8.0);
    assert!(profile
        .pooled_pk
        .samples()
        .iter()
        .all(|s| *s == Some(0.0)));
}

#[test]
fn test_independent_substances_keep_their_own_curves() {
    let mut regimen = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 5.0)
        .build_regimen();
    regimen.add_substance(
        Substance::builder("caffeine", Kinetics::with_half_life(3.0, 5.0).unwrap())
            .dose(9.0, 150.0)
            .independent()
            .build(),
    );

    let profile = regimen.profile(&ProfileOptions::default()).unwrap();
    let dex = profile.substance("dexamfetamine").unwrap();
    let caffeine = profile.substance("caffeine").unwrap();

    assert_eq!(caffeine.composition, Composition::Independent);
    // the pool carries dex only; caffeine's much larger curve stays apart
    for (pooled, dex_only) in profile
        .pooled_pk
        .filled(0.0)
        .iter()
        .zip(dex.pk_total.filled(0.0))
    {
        assert_relative_eq!(pooled, &dex_only, epsilon = 1e-12);
    }
    assert!(caffeine.pk_total.peak().unwrap().value > dex.pk_total.peak().unwrap().value);
}

#[test]
fn test_artifacts_enumerate_every_curve() {
    let mut regimen = Substance::builder("dexamfetamine", dex_kinetics())
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .perceived(PerceivedParams::new(0.5, 3.0).unwrap())
        .build_regimen();
    regimen.add_substance(
        Substance::builder("vyvanse", Kinetics::with_half_life(0.8, 11.0).unwrap())
            .dose(8.0, 12.0)
            .build(),
    );

    let profile = regimen.profile(&ProfileOptions::default()).unwrap();
    let artifacts = profile.artifacts();

    // pooled PK + pooled perceived
    // + dex: substance PK, substance perceived, 2 x (dose PK + dose perceived)
    // + vyvanse: substance PK, 1 dose PK
    assert_eq!(artifacts.len(), 2 + 6 + 2);

    assert_eq!(artifacts[0].role, CurveRole::PooledPk);
    assert_eq!(artifacts[0].label, "Total (PK)");
    assert_eq!(artifacts[1].role, CurveRole::PooledPerceived);
    assert_eq!(artifacts[1].display_floor, Some(0.05));

    let dose_labels: Vec<&str> = artifacts
        .iter()
        .filter(|a| a.role == CurveRole::DosePk)
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(
        dose_labels,
        vec![
            "dexamfetamine 5mg @ 8am (PK)",
            "dexamfetamine 5mg @ 11am (PK)",
            "vyvanse 12mg @ 8am (PK)",
        ]
    );

    // every artifact is aligned with the grid
    assert!(artifacts
        .iter()
        .all(|a| a.times.len() == profile.grid.len() && a.values.len() == profile.grid.len()));

    let json = profile.artifacts_json().unwrap();
    assert!(json.contains("\"pooled_pk\""));
    assert!(json.contains("\"dose_perceived\""));
}
