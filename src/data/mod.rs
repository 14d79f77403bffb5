pub mod builder;
pub mod dose;
pub mod params;
pub mod schedule;
pub mod substance;
pub mod units;
pub use builder::SubstanceBuilder;
pub use dose::{Dose, DoseEvent, ExtendedDose};
pub use params::{Kinetics, PerceivedParams};
pub use schedule::Schedule;
pub use substance::{Composition, Regimen, Substance};
