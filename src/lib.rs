pub mod data;
pub mod error;
pub mod simulator;

//extension traits
pub use crate::data::*;
pub use crate::simulator::{
    clock_label, Curve, CurveArtifact, CurveRole, DoseCurve, GridOptions, Peak, PerceivedKernel,
    Profile, ProfileOptions, ProjectionBranch, RegimenProfile, SampleGrid, SubstanceCurves,
};
pub use error::InvalidParameterError;

pub mod prelude {
    pub use crate::data::units::*;
    pub use crate::data::{
        Composition, Dose, DoseEvent, ExtendedDose, Kinetics, PerceivedParams, Regimen, Schedule,
        Substance, SubstanceBuilder,
    };
    pub use crate::error::InvalidParameterError;
    pub use crate::simulator::{
        clock_label, Curve, CurveArtifact, CurveRole, GridOptions, Peak, Profile, ProfileOptions,
        RegimenProfile, SampleGrid,
    };
}
