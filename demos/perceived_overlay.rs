fn main() -> Result<(), dosecurve::InvalidParameterError> {
    use dosecurve::prelude::*;

    // Morning capsule and afternoon top-ups, each with a perceived-effect model
    let vyvanse = Substance::builder("vyvanse", Kinetics::with_half_life(0.8, 11.0)?)
        .dose(8.0, capsule_to_dex_eq_mg(30.0))
        .perceived(PerceivedParams::new(1.0, 6.0)?)
        .build();
    let dex = Substance::builder("dexamfetamine", Kinetics::with_half_life(1.4, 2.7)?)
        .dose(8.0, 5.0)
        .dose(11.0, 5.0)
        .dose(13.0, 5.0)
        .perceived(PerceivedParams::new(0.5, 3.0)?)
        .build();

    // Caffeine is on its own scale, so it stays out of the pooled totals
    let coffee = Substance::builder("caffeine", Kinetics::with_half_life(3.0, 5.0)?)
        .extended_dose(13.0, scoops_to_caffeine_mg(1.0), 60.0)
        .independent()
        .build();

    let mut regimen = Regimen::from(vyvanse);
    regimen.add_substance(dex);
    regimen.add_substance(coffee);

    let options = ProfileOptions::default().with_projections_for("dexamfetamine");
    let profile = regimen.profile(&options)?;
    let grid = &profile.grid;

    // How far the felt effect trails the blood level
    println!("┌───────────────┬─────────┬───────────┬───────┐");
    println!("│   Substance   │ PK peak │ Felt peak │  Lag  │");
    println!("├───────────────┼─────────┼───────────┼───────┤");
    for substance in &profile.substances {
        let pk = substance.pk_total.peak().unwrap();
        let felt = substance.perceived_total.as_ref().and_then(|c| c.peak());
        match felt {
            Some(felt) => {
                let lag = (felt.index as f64 - pk.index as f64) * grid.step_hours() * 60.0;
                println!(
                    "│ {:<13} │ {:>7} │ {:>9} │ {:>4}m │",
                    substance.name,
                    clock_label(grid.times()[pk.index]),
                    clock_label(grid.times()[felt.index]),
                    lag.round(),
                );
            }
            None => println!(
                "│ {:<13} │ {:>7} │ {:>9} │ {:>5} │",
                substance.name,
                clock_label(grid.times()[pk.index]),
                "-",
                "-",
            ),
        }
    }
    println!("└───────────────┴─────────┴───────────┴───────┘\n");

    // Blood level vs felt effect through the day
    let felt_total = profile.pooled_perceived.as_ref().unwrap();
    println!("┌─────────┬─────────┬─────────┐");
    println!("│  Time   │  Level  │  Felt   │");
    println!("├─────────┼─────────┼─────────┤");
    for hour in [9.0, 11.0, 13.0, 15.0, 17.0, 19.0, 21.0] {
        println!(
            "│ {:>7} │ {:>7.2} │ {:>7.2} │",
            clock_label(hour),
            profile.pooled_pk.interpolate(grid, hour).unwrap(),
            felt_total.interpolate(grid, hour).unwrap(),
        );
    }
    println!("└─────────┴─────────┴─────────┘\n");

    // Renderers clip the felt trace at the display floor
    let dex_curves = profile.substance("dexamfetamine").unwrap();
    let floor = dex_curves.display_floor.unwrap();
    let visible = dex_curves
        .perceived_total
        .as_ref()
        .unwrap()
        .masked_below(floor);
    let first = visible.samples().iter().position(|s| s.is_some()).unwrap();
    let last = visible.samples().iter().rposition(|s| s.is_some()).unwrap();
    println!(
        "Felt dexamfetamine clears the {floor} floor from {} to {}\n",
        clock_label(grid.times()[first]),
        clock_label(grid.times()[last]),
    );

    // Stopping early moves the felt tail, not just the blood level
    for branch in &profile.branches {
        let felt = branch.perceived.as_ref().unwrap();
        println!(
            "{branch}: felt {:.2} at 6pm",
            felt.interpolate(grid, 18.0).unwrap()
        );
    }
    println!(
        "Full schedule: felt {:.2} at 6pm\n",
        felt_total.interpolate(grid, 18.0).unwrap()
    );

    // One artifact per trace, ready for a renderer
    let artifacts = profile.artifacts();
    let felt_traces = artifacts
        .iter()
        .filter(|a| {
            matches!(
                a.role,
                CurveRole::DosePerceived
                    | CurveRole::SubstancePerceived
                    | CurveRole::PooledPerceived
                    | CurveRole::ProjectionPerceived
            )
        })
        .count();
    let json = profile.artifacts_json().unwrap();
    println!(
        "{} artifacts to draw, {} of them felt-effect traces ({} bytes as JSON)",
        artifacts.len(),
        felt_traces,
        json.len()
    );

    Ok(())
}
