//! Tests for single-dose concentration curves
//!
//! Tests cover:
//! - Bateman curve shape (rise, peak at Tmax, decay)
//! - Exact values against the closed form
//! - Grid anchoring and masking before the dose
//! - Equal absorption/elimination rates

use approx::assert_relative_eq;
use dosecurve::prelude::*;

/// amount * ka/(ka-ke) * (e^(-ke*dt) - e^(-ka*dt))
fn bateman(amount: f64, ka: f64, ke: f64, dt: f64) -> f64 {
    amount * ka / (ka - ke) * ((-ke * dt).exp() - (-ka * dt).exp())
}

#[test]
fn test_single_dose_matches_closed_form_on_grid() {
    let ka = 0.8;
    let ke = std::f64::consts::LN_2 / 11.0;
    let substance = Substance::builder("vyvanse", Kinetics::with_half_life(ka, 11.0).unwrap())
        .dose(8.0, 30.0)
        .build();

    let profile = substance.profile(&ProfileOptions::default()).unwrap();
    let curve = &profile.pooled_pk;

    // 10am is two hours after the dose and lies exactly on the grid
    let at_10am = curve.interpolate(&profile.grid, 10.0).unwrap();
    assert_relative_eq!(at_10am, bateman(30.0, ka, ke, 2.0), epsilon = 1e-12);

    // nothing on board at the moment of dosing
    assert_eq!(curve.interpolate(&profile.grid, 8.0), Some(0.0));
}

#[test]
fn test_single_dose_peaks_at_tmax() {
    let ka = 0.8;
    let ke = std::f64::consts::LN_2 / 11.0;
    let kinetics = Kinetics::with_half_life(ka, 11.0).unwrap();
    let tmax = kinetics.tmax();
    assert_relative_eq!(tmax, (ka / ke).ln() / (ka - ke), epsilon = 1e-12);

    let profile = Substance::builder("vyvanse", kinetics)
        .dose(8.0, 30.0)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    let peak = profile.pooled_pk.peak().unwrap();
    let peak_time = profile.grid.times()[peak.index];

    // the sampled peak sits within one grid step of the analytic Tmax
    assert!((peak_time - (8.0 + tmax)).abs() <= profile.grid.step_hours() + 1e-12);
    assert_relative_eq!(peak.value, bateman(30.0, ka, ke, tmax), epsilon = 1e-4);
}

#[test]
fn test_curve_rises_then_decays() {
    let profile = Substance::builder("vyvanse", Kinetics::with_half_life(0.8, 11.0).unwrap())
        .dose(8.0, 30.0)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    let samples = profile.pooled_pk.filled(0.0);
    let peak_index = profile.pooled_pk.peak().unwrap().index;

    for i in 1..=peak_index {
        assert!(samples[i] > samples[i - 1], "not rising at index {i}");
    }
    for i in (peak_index + 1)..samples.len() {
        assert!(samples[i] < samples[i - 1], "not decaying at index {i}");
    }
    // still positive at the end of the window
    assert!(samples[samples.len() - 1] > 0.0);
}

#[test]
fn test_grid_floors_the_first_dose_and_masks_before_it() {
    let substance = Substance::builder("dexamfetamine", Kinetics::with_half_life(1.4, 2.7).unwrap())
        .dose(9.5, 5.0)
        .build();
    let profile = substance.profile(&ProfileOptions::default()).unwrap();

    assert_eq!(profile.grid.start(), 9.0);
    assert_eq!(profile.grid.end(), 33.0);
    assert_eq!(profile.grid.len(), 24 * 60 + 1);

    // the dose curve is undefined for the half hour before the dose
    let dose_curve = &profile.substances[0].doses[0].pk;
    assert_eq!(dose_curve.samples()[29], None);
    assert_eq!(dose_curve.samples()[30], Some(0.0));
    assert!(dose_curve.samples()[31].unwrap() > 0.0);

    // the total fills the masked stretch with zero instead
    assert_eq!(profile.pooled_pk.samples()[0], Some(0.0));
}

#[test]
fn test_equal_rates_are_nudged_apart() {
    let kinetics = Kinetics::new(0.5, 0.5).unwrap();
    assert!(kinetics.ka() != kinetics.ke());

    let profile = Substance::builder("generic", kinetics)
        .dose(8.0, 10.0)
        .build()
        .profile(&ProfileOptions::default())
        .unwrap();

    let samples = profile.pooled_pk.filled(0.0);
    assert!(samples.iter().all(|v| v.is_finite()));
    assert!(profile.pooled_pk.peak().unwrap().value > 0.0);
}

#[test]
fn test_half_life_constructor() {
    let kinetics = Kinetics::with_half_life(0.8, 11.0).unwrap();
    assert_relative_eq!(kinetics.ke(), std::f64::consts::LN_2 / 11.0, epsilon = 1e-12);
    assert_relative_eq!(kinetics.half_life(), 11.0, epsilon = 1e-12);
}

#[test]
fn test_rejected_parameters() {
    assert!(Kinetics::new(0.0, 0.5).is_err());
    assert!(Kinetics::new(0.5, -0.1).is_err());
    assert!(Kinetics::new(f64::NAN, 0.5).is_err());
    assert!(Kinetics::with_half_life(0.8, 0.0).is_err());
    assert!(PerceivedParams::new(0.0, 3.0).is_err());
    assert!(PerceivedParams::new(0.5, f64::INFINITY).is_err());
}
