fn main() -> Result<(), dosecurve::InvalidParameterError> {
    use dosecurve::prelude::*;

    let dex_kinetics = Kinetics::with_half_life(1.4, 2.7)?;

    // Reference day: a Vyvanse capsule with three 5mg top-ups
    let mut reference = Substance::builder("vyvanse", Kinetics::with_half_life(0.8, 11.0)?)
        .dose(8.0, capsule_to_dex_eq_mg(30.0))
        .build_regimen();
    reference.add_substance(
        Substance::builder("dexamfetamine", dex_kinetics)
            .dose(8.0, 5.0)
            .dose(11.0, 5.0)
            .dose(13.0, 5.0)
            .build(),
    );

    // Candidate day: dexamfetamine only, front-loaded and tapered
    let candidate = Substance::builder("dexamfetamine", dex_kinetics)
        .dose(8.0, 15.0)
        .dose(9.5, 5.0)
        .dose(11.0, 7.5)
        .dose(11.75, 2.5)
        .dose(13.0, 7.5)
        .build_regimen();

    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let reference_profile = reference.profile(&options)?;
    let candidate_profile = candidate.profile(&options)?;
    let grid = &reference_profile.grid;

    println!("Reference: Vyvanse 30mg capsule + 3 x 5mg dex top-ups");
    println!("Candidate: dex only, 37.5mg over five doses\n");

    println!("┌─────────┬───────────┬───────────┬────────────┐");
    println!("│  Time   │ Reference │ Candidate │ Difference │");
    println!("├─────────┼───────────┼───────────┼────────────┤");
    for hour in [9.0, 10.0, 11.0, 12.0, 13.0, 14.0, 16.0, 18.0, 22.0] {
        let reference_level = reference_profile.pooled_pk.interpolate(grid, hour).unwrap();
        let candidate_level = candidate_profile.pooled_pk.interpolate(grid, hour).unwrap();
        println!(
            "│ {:>7} │ {:>9.2} │ {:>9.2} │ {:>10.2} │",
            clock_label(hour),
            reference_level,
            candidate_level,
            candidate_level - reference_level,
        );
    }
    println!("└─────────┴───────────┴───────────┴────────────┘\n");

    let reference_peak = reference_profile.pooled_pk.peak().unwrap();
    let candidate_peak = candidate_profile.pooled_pk.peak().unwrap();
    println!(
        "Peaks: reference {:.2} at {}, candidate {:.2} at {}\n",
        reference_peak.value,
        clock_label(grid.times()[reference_peak.index]),
        candidate_peak.value,
        clock_label(grid.times()[candidate_peak.index]),
    );

    // Cutoff planning for the candidate: what each skipped top-up buys
    println!("If the candidate plan stops early:");
    for branch in &candidate_profile.branches {
        let at_10pm = branch.pk.interpolate(grid, 22.0).unwrap();
        println!("  {branch}: {at_10pm:.2} mg on board at 10pm");
    }
    let full = candidate_profile.pooled_pk.interpolate(grid, 22.0).unwrap();
    println!("  Full plan: {full:.2} mg on board at 10pm");

    Ok(())
}
