//! Intake-to-milligram conversion helpers
//!
//! Dose amounts in a schedule are plain milligrams, but intakes are usually
//! known in other terms: a lisdexamfetamine capsule strength, espresso
//! shots, grams of beans. These helpers convert such measures to the mg the
//! model works in. The rates are coarse population estimates; the constants
//! are public so callers can do their own arithmetic with calibrated values.

/// Fraction of a lisdexamfetamine capsule that becomes circulating
/// dexamfetamine (by mass)
///
/// A 30 mg capsule yields roughly 12 mg of dexamfetamine after prodrug
/// conversion.
pub const LISDEX_DEX_EQ_RATIO: f64 = 0.4;

/// Caffeine yield of a single espresso shot, in mg
///
/// Midpoint of the common 60-80 mg range for a 30 mL single shot.
pub const CAFFEINE_MG_PER_SHOT: f64 = 75.0;

/// Whole-bean mass of one AeroPress scoop, in grams
///
/// Scoops hold 11-14 g depending on bean size and roast.
pub const BEAN_GRAMS_PER_SCOOP: f64 = 13.0;

/// Caffeine yield per gram of dry beans, in mg
///
/// Arabica runs 10-12 mg/g, robusta closer to 18-20 mg/g; 12 is a pragmatic
/// arabica midpoint.
pub const CAFFEINE_MG_PER_GRAM: f64 = 12.0;

/// Convert a lisdexamfetamine capsule strength to dexamfetamine-equivalent mg
pub fn capsule_to_dex_eq_mg(capsule_mg: f64) -> f64 {
    capsule_mg * LISDEX_DEX_EQ_RATIO
}

/// Recover the capsule strength behind a dexamfetamine-equivalent amount
pub fn dex_eq_to_capsule_mg(dex_eq_mg: f64) -> f64 {
    dex_eq_mg / LISDEX_DEX_EQ_RATIO
}

/// Estimate caffeine mg from a number of espresso shots
pub fn shots_to_caffeine_mg(shots: f64) -> f64 {
    shots * CAFFEINE_MG_PER_SHOT
}

/// Estimate caffeine mg from grams of dry coffee beans
///
/// Extraction varies with method, grind and time; treat the result as a
/// coarse estimate.
pub fn beans_to_caffeine_mg(grams: f64) -> f64 {
    grams * CAFFEINE_MG_PER_GRAM
}

/// Estimate caffeine mg from AeroPress scoops, via bean mass
pub fn scoops_to_caffeine_mg(scoops: f64) -> f64 {
    beans_to_caffeine_mg(scoops * BEAN_GRAMS_PER_SCOOP)
}
