//! Default coefficient tables per revetment and top layer type.
//!
//! The tables are process-wide immutable data: pure functions returning
//! value-type coefficient structs, never mutable statics. Asking a revetment
//! for a top layer it does not support is a configuration error.

use std::fmt;

use super::asphalt_wave_impact::{AsphaltFactor, AsphaltWaveImpactCoefficients};
use super::grass_overtopping::GrassOvertoppingCoefficients;
use super::grass_wave_impact::GrassWaveImpactCoefficients;
use super::grass_wave_runup::GrassWaveRunupCoefficients;
use super::natural_stone::NaturalStoneCoefficients;
use crate::input::InputError;

/// Default damage threshold counting as failure.
pub const FAILURE_NUMBER: f64 = 1.0;

/// Default natural stone top layer thickness (m).
pub const NATURAL_STONE_THICKNESS_TOP_LAYER: f64 = 0.25;

/// Default natural stone relative density.
pub const NATURAL_STONE_RELATIVE_DENSITY: f64 = 1.65;

/// Material sub-variant of a revetment top layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TopLayerType {
    /// Loose Nordic stone (natural stone revetments).
    NordicStone,
    /// Grass with an open sod.
    GrassOpenSod,
    /// Grass with a closed sod.
    GrassClosedSod,
    /// Grass parameterized per the Dikes Overtopping protocol.
    DikesOvertoppingProtocol,
    /// Hydraulic asphalt concrete.
    HydraulicAsphaltConcrete,
}

impl fmt::Display for TopLayerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TopLayerType::NordicStone => "nordic stone",
            TopLayerType::GrassOpenSod => "grass open sod",
            TopLayerType::GrassClosedSod => "grass closed sod",
            TopLayerType::DikesOvertoppingProtocol => "dikes overtopping protocol",
            TopLayerType::HydraulicAsphaltConcrete => "hydraulic asphalt concrete",
        };
        write!(f, "{name}")
    }
}

// =============================================================================
// Natural Stone
// =============================================================================

/// Default coefficients for natural stone revetments.
pub fn natural_stone_coefficients(
    top_layer: TopLayerType,
) -> Result<NaturalStoneCoefficients, InputError> {
    match top_layer {
        TopLayerType::NordicStone => Ok(NaturalStoneCoefficients {
            xib: 2.9,
            plunging_a: 4.0,
            plunging_b: 0.0,
            plunging_c: 0.0,
            plunging_n: -0.9,
            surging_a: 0.8,
            surging_b: 0.0,
            surging_c: 0.0,
            surging_n: 0.6,
            upper_limit_a: 0.1,
            upper_limit_b: 0.6,
            upper_limit_c: 1.0,
            lower_limit_a: 0.1,
            lower_limit_b: 0.2,
            lower_limit_c: 4.0,
            betamax: 78.0,
        }),
        other => Err(InputError::UnsupportedTopLayer {
            revetment: "natural stone",
            top_layer: other,
        }),
    }
}

// =============================================================================
// Grass Wave Impact
// =============================================================================

/// Default coefficients for grass wave impact revetments.
pub fn grass_wave_impact_coefficients(
    top_layer: TopLayerType,
) -> Result<GrassWaveImpactCoefficients, InputError> {
    let (time_line_a, time_line_b) = match top_layer {
        TopLayerType::GrassClosedSod => (1.0, -0.000009722),
        TopLayerType::GrassOpenSod => (0.8, -0.00001944),
        other => {
            return Err(InputError::UnsupportedTopLayer {
                revetment: "grass wave impact",
                top_layer: other,
            })
        }
    };
    Ok(GrassWaveImpactCoefficients {
        time_line_a,
        time_line_b,
        time_line_c: 0.25,
        temax: 3_600_000.0,
        temin: 3.6,
        wave_angle_n: 2.0 / 3.0,
        wave_angle_q: 0.35,
        wave_angle_r: 10.0,
        upper_limit_aul: 0.0,
        lower_limit_all: 0.5,
    })
}

// =============================================================================
// Grass Wave Run-up
// =============================================================================

/// Default coefficients for grass wave run-up revetments.
pub fn grass_wave_runup_coefficients(
    top_layer: TopLayerType,
) -> Result<GrassWaveRunupCoefficients, InputError> {
    let critical_front_velocity = match top_layer {
        TopLayerType::GrassClosedSod => 6.6,
        TopLayerType::GrassOpenSod => 4.3,
        other => {
            return Err(InputError::UnsupportedTopLayer {
                revetment: "grass wave run-up",
                top_layer: other,
            })
        }
    };
    Ok(GrassWaveRunupCoefficients {
        representative_2p_aru: 1.65,
        representative_2p_bru: 4.0,
        representative_2p_cru: 1.5,
        wave_angle_n: 2.0 / 3.0,
        wave_angle_q: 0.35,
        wave_angle_r: 10.0,
        front_velocity_cu: 1.1,
        critical_front_velocity,
        critical_cumulative_overload: 7000.0,
        increased_load_alpha_m: 1.0,
        reduced_strength_alpha_s: 1.0,
        fixed_number_of_waves: 10_000,
        factor_ctm: 0.92,
    })
}

// =============================================================================
// Grass Overtopping
// =============================================================================

/// Default coefficients for grass overtopping revetments.
pub fn grass_overtopping_coefficients(
    top_layer: TopLayerType,
) -> Result<GrassOvertoppingCoefficients, InputError> {
    let critical_front_velocity = match top_layer {
        TopLayerType::GrassClosedSod | TopLayerType::DikesOvertoppingProtocol => 6.6,
        TopLayerType::GrassOpenSod => 4.3,
        other => {
            return Err(InputError::UnsupportedTopLayer {
                revetment: "grass overtopping",
                top_layer: other,
            })
        }
    };
    Ok(GrassOvertoppingCoefficients {
        front_velocity_cwo: 1.45,
        acceleration_alpha_a: 1.0,
        critical_front_velocity,
        critical_cumulative_overload: 7000.0,
        increased_load_alpha_m: 1.0,
        reduced_strength_alpha_s: 1.0,
        fixed_number_of_waves: 10_000,
        factor_ctm: 0.92,
    })
}

// =============================================================================
// Asphalt Wave Impact
// =============================================================================

/// Default coefficients and distribution tables for asphalt revetments.
///
/// The width, depth and impact factor tables are probability distributions
/// (each probability column sums to 1); their order is part of the contract,
/// since the fatigue accumulation must be reproducible bit-for-bit.
pub fn asphalt_wave_impact_coefficients(
    top_layer: TopLayerType,
) -> Result<AsphaltWaveImpactCoefficients, InputError> {
    match top_layer {
        TopLayerType::HydraulicAsphaltConcrete => Ok(AsphaltWaveImpactCoefficients {
            fatigue_alpha: 0.42,
            fatigue_beta: 4.76,
            impact_number_c: 1.0,
            stiffness_relation_nu: 0.35,
            density_of_water: 1025.0,
            factor_ctm: 1.0,
            width_factors: vec![
                AsphaltFactor::new(0.1, 0.0392),
                AsphaltFactor::new(0.2, 0.0738),
                AsphaltFactor::new(0.3, 0.1002),
                AsphaltFactor::new(0.4, 0.1162),
                AsphaltFactor::new(0.5, 0.1213),
                AsphaltFactor::new(0.6, 0.1168),
                AsphaltFactor::new(0.7, 0.1051),
                AsphaltFactor::new(0.8, 0.0890),
                AsphaltFactor::new(0.9, 0.0712),
                AsphaltFactor::new(1.0, 0.0541),
                AsphaltFactor::new(1.1, 0.0391),
                AsphaltFactor::new(1.2, 0.0269),
                AsphaltFactor::new(1.3, 0.0216),
                AsphaltFactor::new(1.4, 0.0150),
                AsphaltFactor::new(1.5, 0.0105),
            ],
            depth_factors: vec![
                AsphaltFactor::new(-1.0, 0.005),
                AsphaltFactor::new(-0.875, 0.081),
                AsphaltFactor::new(-0.75, 0.196),
                AsphaltFactor::new(-0.625, 0.235),
                AsphaltFactor::new(-0.5, 0.213),
                AsphaltFactor::new(-0.375, 0.160),
                AsphaltFactor::new(-0.25, 0.108),
                AsphaltFactor::new(-0.125, 0.002),
            ],
            impact_factors: vec![
                AsphaltFactor::new(2.0, 0.039),
                AsphaltFactor::new(2.4, 0.1),
                AsphaltFactor::new(2.8, 0.18),
                AsphaltFactor::new(3.2, 0.235),
                AsphaltFactor::new(3.6, 0.2),
                AsphaltFactor::new(4.0, 0.13),
                AsphaltFactor::new(4.4, 0.077),
                AsphaltFactor::new(4.8, 0.039),
            ],
        }),
        other => Err(InputError::UnsupportedTopLayer {
            revetment: "asphalt wave impact",
            top_layer: other,
        }),
    }
}
