//! Hydraulic asphalt concrete under wave impact, fatigue method.
//!
//! The top layer is treated as a plate on an elastic foundation. Each time
//! step convolves three discrete probability distributions: the impact width,
//! the impact depth below the still water line, and the impact pressure
//! factor. For every combination the bending stress at the location follows
//! from the strip-load influence function of a beam on an elastic foundation,
//! and a Miner fatigue rule converts stress exceedance into incremental
//! damage.
//!
//! All three loops run in fixed table order and the sums are never reordered,
//! so the accumulation is reproducible bit-for-bit.

use super::defaults::{self, TopLayerType};
use super::{
    interpolated_time_of_failure, validate_damage_parameters, CalculationError, DamageState,
    LocationDependentInput,
};
use crate::hydraulics::{self, GRAVITY};
use crate::input::{InputError, TimeDependentInput};
use crate::validation::{check_positive, check_range, ValidationReport};

/// Relative distances are capped here; beyond it the influence function has
/// decayed to nothing and large arguments only cost precision.
const MAX_RELATIVE_DISTANCE: f64 = 85.0;

/// Bending stress floor keeping the fatigue logarithm defined.
const BENDING_STRESS_FLOOR: f64 = 1e-99;

// =============================================================================
// Coefficients
// =============================================================================

/// One entry of a discrete factor distribution.
#[derive(Clone, Copy, Debug)]
pub struct AsphaltFactor {
    /// Factor value (dimensionless, applied to Hm0 or the peak stress).
    pub value: f64,
    /// Probability mass of this entry.
    pub probability: f64,
}

impl AsphaltFactor {
    /// Create a factor entry.
    pub fn new(value: f64, probability: f64) -> Self {
        Self { value, probability }
    }
}

/// Material coefficients and factor tables for an asphalt top layer.
#[derive(Clone, Debug)]
pub struct AsphaltWaveImpactCoefficients {
    /// Fatigue exponent α.
    pub fatigue_alpha: f64,
    /// Fatigue coefficient β.
    pub fatigue_beta: f64,
    /// Impact number scaling coefficient c.
    pub impact_number_c: f64,
    /// Poisson ratio ν of the asphalt plate.
    pub stiffness_relation_nu: f64,
    /// Density of (sea) water (kg/m³).
    pub density_of_water: f64,
    /// Tm-1,0 to mean period conversion factor.
    pub factor_ctm: f64,
    /// Impact width distribution (fraction of Hm0).
    pub width_factors: Vec<AsphaltFactor>,
    /// Impact depth distribution (fraction of Hm0 below SWL).
    pub depth_factors: Vec<AsphaltFactor>,
    /// Impact pressure factor distribution.
    pub impact_factors: Vec<AsphaltFactor>,
}

// =============================================================================
// Formulas
// =============================================================================

/// Equivalent plate thickness of the upper layer on its sub layer (m).
///
/// The upper layer is transformed to sub-layer stiffness before the two are
/// stacked.
pub fn computational_thickness(
    thickness_upper_layer: f64,
    thickness_sub_layer: f64,
    elastic_modulus_upper_layer: f64,
    elastic_modulus_sub_layer: f64,
) -> f64 {
    thickness_upper_layer * (elastic_modulus_upper_layer / elastic_modulus_sub_layer).cbrt()
        + thickness_sub_layer
}

/// Stiffness relation β of the plate on its elastic foundation (1/m).
pub fn stiffness_relation(
    computational_thickness: f64,
    elastic_modulus: f64,
    soil_elasticity: f64,
    nu: f64,
) -> f64 {
    (3.0 * soil_elasticity * (1.0 - nu * nu)
        / (elastic_modulus * computational_thickness.powi(3)))
    .powf(0.25)
}

/// Peak impact pressure of the design wave (MPa).
pub fn maximum_peak_stress(density_of_water: f64, wave_height_hm0: f64) -> f64 {
    16.0 * density_of_water * GRAVITY * wave_height_hm0 / (std::f64::consts::PI * 1.0e6)
}

/// Impact number folding the outer slope and the pressure factor.
#[inline]
pub fn impact_number(outer_slope_tan: f64, impact_factor_value: f64, c: f64) -> f64 {
    4.0 * c * outer_slope_tan * impact_factor_value
}

/// Strip-load influence function of a beam on an elastic foundation.
///
/// `relative_distance` is β times the slope-parallel distance from the impact
/// center, `relative_width` is β times the impact half-width. Interior and
/// exterior points take different branch signs of `B(x) = e^(-x)·sin(x)`.
pub fn spatial_distribution_bending_stress(relative_distance: f64, relative_width: f64) -> f64 {
    let rd = relative_distance.min(MAX_RELATIVE_DISTANCE);
    let rw = relative_width.min(MAX_RELATIVE_DISTANCE);
    let b = |x: f64| (-x).exp() * x.sin();
    if rd < rw {
        b(rw - rd) + b(rw + rd)
    } else {
        b(rd - rw) - b(rd + rw)
    }
}

/// Bending stress at the location for one width/depth combination (MPa).
pub fn bending_stress(
    max_peak_stress: f64,
    stiffness_relation: f64,
    computational_thickness: f64,
    relative_distance: f64,
    relative_width: f64,
) -> f64 {
    let spatial = spatial_distribution_bending_stress(relative_distance, relative_width);
    (3.0 * max_peak_stress * spatial
        / (4.0 * (stiffness_relation * computational_thickness).powi(2)))
    .max(BENDING_STRESS_FLOOR)
}

/// Inner fatigue accumulation over the impact factor distribution.
///
/// Fixed table order; part of the reproducibility contract.
pub fn impact_factor_accumulation(
    fatigue_alpha: f64,
    fatigue_beta: f64,
    average_number_of_waves: f64,
    log_failure_tension: f64,
    bending_stress: f64,
    outer_slope_tan: f64,
    impact_number_c: f64,
    impact_factors: &[AsphaltFactor],
) -> f64 {
    let mut sum = 0.0;
    for factor in impact_factors {
        let tension = impact_number(outer_slope_tan, factor.value, impact_number_c) * bending_stress;
        let log_tension = tension.log10();
        let fatigue =
            10.0_f64.powf(-fatigue_beta * (log_failure_tension - log_tension).max(0.0).powf(fatigue_alpha));
        sum += factor.probability * average_number_of_waves * fatigue;
    }
    sum
}

// =============================================================================
// Construction Properties
// =============================================================================

/// Construction-time parameters for an asphalt wave impact location.
#[derive(Clone, Debug)]
pub struct AsphaltWaveImpactConstructionProperties {
    /// Cross-shore x-coordinate (m).
    pub x: f64,
    /// Revetment surface elevation at x (m).
    pub z: f64,
    /// Outer slope angle (degrees).
    pub outer_slope_angle: f64,
    /// Top layer variant.
    pub top_layer_type: TopLayerType,
    /// Flexural failure tension of the asphalt (MPa).
    pub failure_tension: f64,
    /// Spring constant of the supporting soil (MPa/m).
    pub soil_elasticity: f64,
    /// Upper layer thickness (m).
    pub thickness_upper_layer: f64,
    /// Upper layer elastic modulus (MPa).
    pub elastic_modulus_upper_layer: f64,
    /// Sub layer thickness (m); defaults to 0 (no sub layer).
    pub thickness_sub_layer: Option<f64>,
    /// Sub layer elastic modulus (MPa); defaults to the upper layer's.
    pub elastic_modulus_sub_layer: Option<f64>,
    /// Damage present before the first time step; defaults to 0.
    pub initial_damage: Option<f64>,
    /// Damage threshold counting as failure; defaults to 1.
    pub failure_number: Option<f64>,
    /// Full coefficient table override; defaults for the top layer variant.
    pub coefficients: Option<AsphaltWaveImpactCoefficients>,
}

impl AsphaltWaveImpactConstructionProperties {
    /// Properties with every optional parameter left to its default.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        x: f64,
        z: f64,
        outer_slope_angle: f64,
        top_layer_type: TopLayerType,
        failure_tension: f64,
        soil_elasticity: f64,
        thickness_upper_layer: f64,
        elastic_modulus_upper_layer: f64,
    ) -> Self {
        Self {
            x,
            z,
            outer_slope_angle,
            top_layer_type,
            failure_tension,
            soil_elasticity,
            thickness_upper_layer,
            elastic_modulus_upper_layer,
            thickness_sub_layer: None,
            elastic_modulus_sub_layer: None,
            initial_damage: None,
            failure_number: None,
            coefficients: None,
        }
    }

    /// Add a sub layer below the asphalt.
    pub fn with_sub_layer(mut self, thickness: f64, elastic_modulus: f64) -> Self {
        self.thickness_sub_layer = Some(thickness);
        self.elastic_modulus_sub_layer = Some(elastic_modulus);
        self
    }

    /// Override the initial damage.
    pub fn with_initial_damage(mut self, initial_damage: f64) -> Self {
        self.initial_damage = Some(initial_damage);
        self
    }

    /// Override the failure number.
    pub fn with_failure_number(mut self, failure_number: f64) -> Self {
        self.failure_number = Some(failure_number);
        self
    }

    /// Override the full coefficient table.
    pub fn with_coefficients(mut self, coefficients: AsphaltWaveImpactCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }
}

// =============================================================================
// Location Model
// =============================================================================

/// Asphalt wave impact location with its running damage state.
///
/// The plate parameters are time-invariant, so the computational thickness,
/// stiffness relation and failure tension logarithm are resolved once at
/// construction.
pub struct AsphaltWaveImpactLocation {
    x: f64,
    z: f64,
    outer_slope_tan: f64,
    outer_slope_sin: f64,
    log_failure_tension: f64,
    computational_thickness: f64,
    stiffness_relation: f64,
    failure_tension: f64,
    initial_damage: f64,
    failure_number: f64,
    coefficients: AsphaltWaveImpactCoefficients,
    state: DamageState,
}

impl AsphaltWaveImpactLocation {
    /// Build a location, resolving omitted parameters to defaults.
    ///
    /// # Errors
    /// [`InputError::UnsupportedTopLayer`] if the top layer is not hydraulic
    /// asphalt concrete.
    pub fn new(props: AsphaltWaveImpactConstructionProperties) -> Result<Self, InputError> {
        let coefficients = match props.coefficients {
            Some(c) => c,
            None => defaults::asphalt_wave_impact_coefficients(props.top_layer_type)?,
        };
        let elastic_modulus_sub_layer = props
            .elastic_modulus_sub_layer
            .unwrap_or(props.elastic_modulus_upper_layer);
        let thickness = computational_thickness(
            props.thickness_upper_layer,
            props.thickness_sub_layer.unwrap_or(0.0),
            props.elastic_modulus_upper_layer,
            elastic_modulus_sub_layer,
        );
        let relation = stiffness_relation(
            thickness,
            elastic_modulus_sub_layer,
            props.soil_elasticity,
            coefficients.stiffness_relation_nu,
        );
        let slope = props.outer_slope_angle.to_radians();
        let initial_damage = props.initial_damage.unwrap_or(0.0);
        Ok(Self {
            x: props.x,
            z: props.z,
            outer_slope_tan: slope.tan(),
            outer_slope_sin: slope.sin(),
            log_failure_tension: props.failure_tension.log10(),
            computational_thickness: thickness,
            stiffness_relation: relation,
            failure_tension: props.failure_tension,
            initial_damage,
            failure_number: props.failure_number.unwrap_or(defaults::FAILURE_NUMBER),
            coefficients,
            state: DamageState::new(initial_damage),
        })
    }

    /// Damage increment of one step: the width x depth x impact convolution.
    fn increment_damage(&self, time_step: &TimeDependentInput) -> f64 {
        let c = &self.coefficients;
        let hm0 = time_step.wave_height_hm0();
        let waves = hydraulics::average_number_of_waves(
            time_step.increment_time(),
            time_step.wave_period_tm10(),
            c.factor_ctm,
        );
        let peak = maximum_peak_stress(c.density_of_water, hm0);

        let mut increment = 0.0;
        for width in &c.width_factors {
            let relative_width = self.stiffness_relation * width.value * hm0 / 2.0;
            let mut depth_accumulation = 0.0;
            for depth in &c.depth_factors {
                let impact_level = time_step.water_level() + depth.value * hm0;
                let relative_distance =
                    self.stiffness_relation * (self.z - impact_level).abs() / self.outer_slope_sin;
                let stress = bending_stress(
                    peak,
                    self.stiffness_relation,
                    self.computational_thickness,
                    relative_distance,
                    relative_width,
                );
                depth_accumulation += depth.probability
                    * impact_factor_accumulation(
                        c.fatigue_alpha,
                        c.fatigue_beta,
                        waves,
                        self.log_failure_tension,
                        stress,
                        self.outer_slope_tan,
                        c.impact_number_c,
                        &c.impact_factors,
                    );
            }
            increment += width.probability * depth_accumulation;
        }
        increment
    }
}

impl LocationDependentInput for AsphaltWaveImpactLocation {
    fn position(&self) -> f64 {
        self.x
    }

    fn initial_damage(&self) -> f64 {
        self.initial_damage
    }

    fn failure_number(&self) -> f64 {
        self.failure_number
    }

    fn damage(&self) -> f64 {
        self.state.damage()
    }

    fn time_of_failure(&self) -> Option<f64> {
        self.state.time_of_failure()
    }

    fn validate(&self, report: &mut ValidationReport) {
        validate_damage_parameters(report, self.x, self.initial_damage, self.failure_number);
        check_positive(report, "failure tension", self.failure_tension);
        check_positive(
            report,
            "computational thickness",
            self.computational_thickness,
        );
        check_positive(report, "stiffness relation", self.stiffness_relation);
        let c = &self.coefficients;
        check_positive(report, "fatigue alpha", c.fatigue_alpha);
        check_positive(report, "fatigue beta", c.fatigue_beta);
        check_range(report, "poisson ratio nu", c.stiffness_relation_nu, 0.0, 0.5);
        check_positive(report, "density of water", c.density_of_water);
        for (name, table) in [
            ("width", &c.width_factors),
            ("depth", &c.depth_factors),
            ("impact", &c.impact_factors),
        ] {
            if table.is_empty() {
                report.error(format!("{name} factor table must not be empty"));
            }
        }
    }

    fn calculate(
        &mut self,
        time_step: &TimeDependentInput,
        _maximum_wave_angle: f64,
    ) -> Result<f64, CalculationError> {
        let failure_number = self.failure_number;
        let start = self.state.damage();
        let begin = time_step.begin_time();

        let increment = self.increment_damage(time_step);
        let new_damage = start + increment;
        if !new_damage.is_finite() {
            return Err(CalculationError::NonFiniteDamage {
                begin_time: begin,
                end_time: time_step.end_time(),
            });
        }

        let increment_time = time_step.increment_time();
        self.state.advance(new_damage, failure_number, || {
            interpolated_time_of_failure(begin, increment_time, start, increment, failure_number)
        });
        Ok(increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_computational_thickness_equal_moduli() {
        assert_relative_eq!(computational_thickness(0.16, 0.0, 18000.0, 18000.0), 0.16);
        // Stiffer upper layer counts for more than its physical thickness.
        assert!(computational_thickness(0.16, 0.0, 27000.0, 18000.0) > 0.16);
    }

    #[test]
    fn test_stiffness_relation_pinned() {
        let beta = stiffness_relation(0.16, 18000.0, 56.0, 0.35);
        assert_relative_eq!(beta, 1.1891345249144842, epsilon = 1e-12);
    }

    #[test]
    fn test_maximum_peak_stress_pinned() {
        let peak = maximum_peak_stress(1025.0, 1.5);
        assert_relative_eq!(peak, 0.07681645159318948, epsilon = 1e-15);
    }

    #[test]
    fn test_spatial_distribution_peaks_at_center_and_decays() {
        let center = spatial_distribution_bending_stress(0.0, 0.446);
        assert_relative_eq!(center, 0.5522996966856076, epsilon = 1e-12);
        let far = spatial_distribution_bending_stress(10.0, 0.446);
        assert!(far.abs() < 1e-3);
        assert!(center > spatial_distribution_bending_stress(1.0, 0.446));
    }

    #[test]
    fn test_bending_stress_floor() {
        // Far from the impact the stress collapses onto the floor, never zero
        // or negative, so the fatigue logarithm stays defined.
        let stress = bending_stress(0.0768, 1.19, 0.16, 84.0, 0.4);
        assert!(stress >= BENDING_STRESS_FLOOR);
    }

    fn location(failure_tension: f64) -> AsphaltWaveImpactLocation {
        let props = AsphaltWaveImpactConstructionProperties::new(
            12.0,
            2.0,
            14.0,
            TopLayerType::HydraulicAsphaltConcrete,
            failure_tension,
            56.0,
            0.16,
            18000.0,
        );
        AsphaltWaveImpactLocation::new(props).unwrap()
    }

    fn step(begin: i64, end: i64) -> TimeDependentInput {
        TimeDependentInput::new(begin, end, 2.0, 1.5, 6.0, 0.0).unwrap()
    }

    #[test]
    fn test_increment_pinned_against_reference() {
        let loc = location(5.0);
        let increment = loc.increment_damage(&step(0, 3600));
        assert_relative_eq!(increment, 0.011462695706988707, epsilon = 1e-12);
    }

    #[test]
    fn test_accumulation_is_reproducible() {
        let loc = location(5.0);
        let a = loc.increment_damage(&step(0, 3600));
        let b = loc.increment_damage(&step(0, 3600));
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_strong_asphalt_outlasts_weak() {
        let mut weak = location(1.6);
        let mut strong = location(5.0);
        let ts = step(0, 3600);
        let weak_increment = weak.calculate(&ts, 78.0).unwrap();
        let strong_increment = strong.calculate(&ts, 78.0).unwrap();
        assert!(weak_increment > strong_increment);
    }

    #[test]
    fn test_weak_asphalt_fails_with_interpolated_time() {
        let mut loc = location(1.6);
        loc.calculate(&step(0, 3600), 78.0).unwrap();
        assert!(loc.damage() >= loc.failure_number());
        let tof = loc.time_of_failure().unwrap();
        assert!(tof >= 0.0 && tof <= 3600.0);
    }

    #[test]
    fn test_damage_accumulates_over_steps() {
        let mut loc = location(5.0);
        let first = loc.calculate(&step(0, 3600), 78.0).unwrap();
        let second = loc.calculate(&step(3600, 7200), 78.0).unwrap();
        assert_relative_eq!(loc.damage(), first + second);
        // Identical hydraulics give identical increments.
        assert_eq!(first.to_bits(), second.to_bits());
    }
}
