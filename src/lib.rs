//! # dike-rs
//!
//! A time-stepped damage progression engine for dike revetments.
//!
//! This crate provides the building blocks for structural response
//! calculations of dike outer slopes under storm loading:
//! - Hydraulic load primitives (surf similarity, wave angle impact)
//! - Natural stone revetments under wave attack
//! - Grass revetments under wave impact, wave run-up and overtopping
//! - Hydraulic asphalt concrete under wave impact (fatigue)
//! - A time-stepping calculation controller with pre-flight validation
//!
//! Damage is dimensionless and cumulative: each location starts from its
//! initial damage and accrues an increment per time step until the failure
//! number is reached. Every run over the same input is reproducible
//! bit-for-bit, sequential or parallel.

pub mod hydraulics;
pub mod input;
pub mod overtopping;
pub mod revetment;
pub mod simulation;
pub mod validation;

// Re-export main types for convenience
pub use hydraulics::{
    GRAVITY, average_number_of_waves, increment_of_time, surf_similarity_parameter,
    wave_angle_impact_betamax, wave_angle_impact_nqr,
};
pub use input::{CalculationInput, CalculationInputBuilder, InputError, TimeDependentInput};
pub use overtopping::{
    FixedOvertoppingKernel, OvertoppingError, OvertoppingGeometry, OvertoppingKernel,
    OvertoppingLoad, OvertoppingResult,
};
pub use revetment::defaults::TopLayerType;
pub use revetment::{CalculationError, DamageState, LocationDependentInput};
pub use revetment::asphalt_wave_impact::{
    AsphaltFactor, AsphaltWaveImpactCoefficients, AsphaltWaveImpactConstructionProperties,
    AsphaltWaveImpactLocation,
};
pub use revetment::grass_overtopping::{
    GrassOvertoppingCoefficients, GrassOvertoppingConstructionProperties, GrassOvertoppingLocation,
};
pub use revetment::grass_wave_impact::{
    GrassWaveImpactCoefficients, GrassWaveImpactConstructionProperties, GrassWaveImpactLocation,
};
pub use revetment::grass_wave_runup::{
    GrassWaveRunupCoefficients, GrassWaveRunupConstructionProperties, GrassWaveRunupLocation,
};
pub use revetment::natural_stone::{
    NaturalStoneCoefficients, NaturalStoneConstructionProperties, NaturalStoneLocation,
};
pub use simulation::{
    CalculationResult, Calculator, CalculatorState, LocationDependentOutput,
};
pub use validation::{IssueSeverity, ValidationIssue, ValidationReport};
