fn main() -> Result<(), dosecurve::InvalidParameterError> {
    use dosecurve::prelude::*;

    // A 30mg Vyvanse capsule at 8am, expressed as d-amphetamine equivalent
    let vyvanse = Substance::builder("vyvanse", Kinetics::with_half_life(0.8, 11.0)?)
        .dose(8.0, capsule_to_dex_eq_mg(30.0))
        .build();

    // Dexamfetamine 5mg top-ups at 8am, 11am and 1pm
    let dex = Substance::builder("dexamfetamine", Kinetics::with_half_life(1.4, 2.7)?)
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .dose(13.0, 5.0)
        .build();

    let mut regimen = Regimen::from(vyvanse);
    regimen.add_substance(dex);
    println!("{regimen}");

    // Profile the day, with stop-after branches for the top-ups
    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = regimen.profile(&options)?;
    let grid = &profile.grid;

    let peak = profile.pooled_pk.peak().unwrap();
    println!(
        "Total peaks at {} with {:.1} mg-equivalent on board\n",
        clock_label(grid.times()[peak.index]),
        peak.value
    );

    // Levels through the day
    println!("┌─────────┬─────────┬─────────┬─────────┐");
    println!("│  Time   │ Vyvanse │   Dex   │  Total  │");
    println!("├─────────┼─────────┼─────────┼─────────┤");
    let vyvanse = profile.substance("vyvanse").unwrap();
    let dex = profile.substance("dexamfetamine").unwrap();
    for hour in [9.0, 10.0, 12.0, 14.0, 16.0, 20.0, 24.0] {
        println!(
            "│ {:>7} │ {:>7.2} │ {:>7.2} │ {:>7.2} │",
            clock_label(hour),
            vyvanse.pk_total.interpolate(grid, hour).unwrap(),
            dex.pk_total.interpolate(grid, hour).unwrap(),
            profile.pooled_pk.interpolate(grid, hour).unwrap(),
        );
    }
    println!("└─────────┴─────────┴─────────┴─────────┘\n");

    // What the evening looks like if a top-up is skipped
    for branch in &profile.branches {
        let at_8pm = branch.pk.interpolate(grid, 20.0).unwrap();
        println!("{branch}: {at_8pm:.2} mg-equivalent left at 8pm");
    }
    let full_at_8pm = profile.pooled_pk.interpolate(grid, 20.0).unwrap();
    println!("Full schedule: {full_at_8pm:.2} mg-equivalent left at 8pm");

    Ok(())
}
