//! Natural stone revetment under wave attack.
//!
//! Damage follows a closed-form degradation law: each time step shifts the
//! stone's position on a degradation curve whose rate depends on the
//! hydraulic load / resistance ratio and the wave obliqueness. Because the
//! time line is closed-form, the in-step failure instant is computed exactly
//! rather than interpolated.

use super::defaults::{self, TopLayerType};
use super::{
    validate_damage_parameters, CalculationError, DamageState, LocationDependentInput,
};
use crate::hydraulics;
use crate::input::{InputError, TimeDependentInput};
use crate::validation::{check_positive, check_range, ValidationReport};

// =============================================================================
// Coefficients
// =============================================================================

/// Material coefficients for a natural stone top layer.
///
/// The hydraulic load formula switches between a plunging and a surging
/// branch at surf similarity `xib`; the upper/lower limit coefficients bound
/// the loading window as multiples of Hm0.
#[derive(Clone, Copy, Debug)]
pub struct NaturalStoneCoefficients {
    /// Surf similarity threshold between plunging and surging breakers.
    pub xib: f64,
    /// Plunging branch coefficient a.
    pub plunging_a: f64,
    /// Plunging branch coefficient b.
    pub plunging_b: f64,
    /// Plunging branch coefficient c.
    pub plunging_c: f64,
    /// Plunging branch exponent n.
    pub plunging_n: f64,
    /// Surging branch coefficient a.
    pub surging_a: f64,
    /// Surging branch coefficient b.
    pub surging_b: f64,
    /// Surging branch coefficient c.
    pub surging_c: f64,
    /// Surging branch exponent n.
    pub surging_n: f64,
    /// Upper loading limit coefficient a.
    pub upper_limit_a: f64,
    /// Upper loading limit coefficient b.
    pub upper_limit_b: f64,
    /// Upper loading limit exponent c.
    pub upper_limit_c: f64,
    /// Lower loading limit coefficient a.
    pub lower_limit_a: f64,
    /// Lower loading limit coefficient b.
    pub lower_limit_b: f64,
    /// Lower loading limit decay rate c.
    pub lower_limit_c: f64,
    /// Maximum obliqueness angle for the wave angle impact factor (degrees).
    pub betamax: f64,
}

// =============================================================================
// Formulas
// =============================================================================

/// Resistance of the top layer.
#[inline]
pub fn resistance(relative_density: f64, thickness_top_layer: f64) -> f64 {
    relative_density * thickness_top_layer
}

/// Regime-switched hydraulic load.
///
/// Plunging breakers (ξ < ξb): `Hm0 / (ap·ξ^np + bp·ξ + cp)`;
/// surging breakers otherwise, with the surging coefficient set.
pub fn hydraulic_load(
    surf_similarity: f64,
    wave_height_hm0: f64,
    coefficients: &NaturalStoneCoefficients,
) -> f64 {
    let c = coefficients;
    let denominator = if surf_similarity < c.xib {
        c.plunging_a * surf_similarity.powf(c.plunging_n)
            + c.plunging_b * surf_similarity
            + c.plunging_c
    } else {
        c.surging_a * surf_similarity.powf(c.surging_n)
            + c.surging_b * surf_similarity
            + c.surging_c
    };
    wave_height_hm0 / denominator
}

/// Upper bound of the loading window, as a multiple of Hm0.
///
/// Polynomial envelope `a + b·ξ^c`.
#[inline]
pub fn upper_limit_loading(surf_similarity: f64, a: f64, b: f64, c: f64) -> f64 {
    a + b * surf_similarity.powf(c)
}

/// Lower bound of the loading window, as a multiple of Hm0.
///
/// Exponential envelope `a + b·e^(−c·ξ)`: calm, low-ξ conditions raise the
/// threshold and drop out of the window.
#[inline]
pub fn lower_limit_loading(surf_similarity: f64, a: f64, b: f64, c: f64) -> f64 {
    a + b * (-c * surf_similarity).exp()
}

/// Degradation position equivalent to a given damage level.
#[inline]
pub fn reference_degradation(
    damage: f64,
    resistance: f64,
    hydraulic_load: f64,
    wave_angle_impact: f64,
) -> f64 {
    damage * (resistance / hydraulic_load) * (1.0 / wave_angle_impact)
}

/// Time (s) needed to reach a degradation position under the current period.
#[inline]
pub fn reference_time_degradation(reference_degradation: f64, wave_period_tm10: f64) -> f64 {
    1000.0 * wave_period_tm10 * reference_degradation.powi(10)
}

/// Degradation reached after loading for `reference_time` seconds.
#[inline]
pub fn degradation(reference_time: f64, wave_period_tm10: f64) -> f64 {
    (reference_time / (1000.0 * wave_period_tm10)).powf(0.1)
}

/// Degradation gained over one time step.
pub fn increment_degradation(
    reference_time_degradation: f64,
    increment_time: f64,
    wave_period_tm10: f64,
) -> f64 {
    degradation(reference_time_degradation + increment_time, wave_period_tm10)
        - degradation(reference_time_degradation, wave_period_tm10)
}

/// Incremental damage for one time step.
#[inline]
pub fn increment_damage(
    hydraulic_load: f64,
    resistance: f64,
    increment_degradation: f64,
    wave_angle_impact: f64,
) -> f64 {
    hydraulic_load / resistance * increment_degradation * wave_angle_impact
}

/// Cumulative damage after a step: simple additive accumulation.
///
/// ```
/// use dike_rs::revetment::natural_stone::damage;
///
/// assert_eq!(damage(0.1, 0.3), 0.4);
/// ```
#[inline]
pub fn damage(start_damage: f64, increment_damage: f64) -> f64 {
    start_damage + increment_damage
}

// =============================================================================
// Construction Properties
// =============================================================================

/// Construction-time parameters for a natural stone location.
///
/// Optional fields resolve to the top-layer-type defaults on build.
#[derive(Clone, Debug)]
pub struct NaturalStoneConstructionProperties {
    /// Cross-shore x-coordinate (m).
    pub x: f64,
    /// Outer slope angle (degrees).
    pub outer_slope_angle: f64,
    /// Top layer material variant.
    pub top_layer_type: TopLayerType,
    /// Top layer thickness D (m); defaults per top layer.
    pub thickness_top_layer: Option<f64>,
    /// Relative density Δ; defaults per top layer.
    pub relative_density: Option<f64>,
    /// Damage present before the first time step; defaults to 0.
    pub initial_damage: Option<f64>,
    /// Damage threshold counting as failure; defaults to 1.
    pub failure_number: Option<f64>,
    /// Full coefficient table override; defaults per top layer.
    pub coefficients: Option<NaturalStoneCoefficients>,
}

impl NaturalStoneConstructionProperties {
    /// Properties with every optional coefficient left to its default.
    pub fn new(x: f64, outer_slope_angle: f64, top_layer_type: TopLayerType) -> Self {
        Self {
            x,
            outer_slope_angle,
            top_layer_type,
            thickness_top_layer: None,
            relative_density: None,
            initial_damage: None,
            failure_number: None,
            coefficients: None,
        }
    }

    /// Override the top layer thickness (m).
    pub fn with_thickness_top_layer(mut self, thickness: f64) -> Self {
        self.thickness_top_layer = Some(thickness);
        self
    }

    /// Override the relative density.
    pub fn with_relative_density(mut self, relative_density: f64) -> Self {
        self.relative_density = Some(relative_density);
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
    pub fn with_coefficients(mut self, coefficients: NaturalStoneCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }
}

// =============================================================================
// Location Model
// =============================================================================

/// Natural stone location with its running damage state.
pub struct NaturalStoneLocation {
    x: f64,
    outer_slope_angle: f64,
    thickness_top_layer: f64,
    relative_density: f64,
    initial_damage: f64,
    failure_number: f64,
    coefficients: NaturalStoneCoefficients,
    state: DamageState,
}

impl NaturalStoneLocation {
    /// Build a location, resolving omitted parameters to the top-layer
    /// defaults.
    ///
    /// # Errors
    /// [`InputError::UnsupportedTopLayer`] if the top layer type is not a
    /// natural stone variant.
    pub fn new(props: NaturalStoneConstructionProperties) -> Result<Self, InputError> {
        let coefficients = match props.coefficients {
            Some(c) => c,
            None => defaults::natural_stone_coefficients(props.top_layer_type)?,
        };
        let initial_damage = props.initial_damage.unwrap_or(0.0);
        Ok(Self {
            x: props.x,
            outer_slope_angle: props.outer_slope_angle,
            thickness_top_layer: props
                .thickness_top_layer
                .unwrap_or(defaults::NATURAL_STONE_THICKNESS_TOP_LAYER),
            relative_density: props
                .relative_density
                .unwrap_or(defaults::NATURAL_STONE_RELATIVE_DENSITY),
            initial_damage,
            failure_number: props.failure_number.unwrap_or(defaults::FAILURE_NUMBER),
            coefficients,
            state: DamageState::new(initial_damage),
        })
    }
}

impl LocationDependentInput for NaturalStoneLocation {
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
        check_range(report, "outer slope angle", self.outer_slope_angle, 0.1, 89.9);
        check_positive(report, "thickness of top layer", self.thickness_top_layer);
        check_positive(report, "relative density", self.relative_density);
        check_positive(report, "surf similarity threshold xib", self.coefficients.xib);
        check_range(report, "betamax", self.coefficients.betamax, 0.0, 90.0);
    }

    fn calculate(
        &mut self,
        time_step: &TimeDependentInput,
        maximum_wave_angle: f64,
    ) -> Result<f64, CalculationError> {
        let hm0 = time_step.wave_height_hm0();
        let tm10 = time_step.wave_period_tm10();
        let surf_similarity =
            hydraulics::surf_similarity_parameter(self.outer_slope_angle, hm0, tm10);
        let load = hydraulic_load(surf_similarity, hm0, &self.coefficients);
        if !load.is_finite() || load <= 0.0 {
            return Err(CalculationError::DegenerateHydraulicLoad {
                load,
                surf_similarity,
                begin_time: time_step.begin_time(),
                end_time: time_step.end_time(),
            });
        }

        // Loading window membership on the Hm0-relative load.
        let c = &self.coefficients;
        let relative_load = load / hm0;
        let lower = lower_limit_loading(
            surf_similarity,
            c.lower_limit_a,
            c.lower_limit_b,
            c.lower_limit_c,
        );
        let upper = upper_limit_loading(
            surf_similarity,
            c.upper_limit_a,
            c.upper_limit_b,
            c.upper_limit_c,
        );
        if relative_load < lower || relative_load > upper {
            return Ok(0.0);
        }

        // The global maximum wave angle tightens the type-specific clipping.
        let betamax = c.betamax.min(maximum_wave_angle);
        let wave_angle_impact =
            hydraulics::wave_angle_impact_betamax(time_step.wave_angle(), betamax);

        let resistance = resistance(self.relative_density, self.thickness_top_layer);
        let start = self.state.damage();
        let reference = reference_degradation(start, resistance, load, wave_angle_impact);
        let reference_time = reference_time_degradation(reference, tm10);
        let degradation_gain =
            increment_degradation(reference_time, time_step.increment_time(), tm10);
        let increment = increment_damage(load, resistance, degradation_gain, wave_angle_impact);
        let new_damage = damage(start, increment);
        if !new_damage.is_finite() {
            return Err(CalculationError::NonFiniteDamage {
                begin_time: time_step.begin_time(),
                end_time: time_step.end_time(),
            });
        }

        let failure_number = self.failure_number;
        let begin_time = time_step.begin_time();
        let end_time = time_step.end_time();
        self.state.advance(new_damage, failure_number, || {
            // Closed-form in-step failure instant from the degradation
            // position equivalent to the failure number.
            let reference_failure =
                reference_degradation(failure_number, resistance, load, wave_angle_impact);
            let reference_time_failure = reference_time_degradation(reference_failure, tm10);
            let duration = reference_time_failure - reference_time;
            (begin_time as f64 + duration).clamp(begin_time as f64, end_time as f64)
        });
        Ok(increment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn coefficients() -> NaturalStoneCoefficients {
        defaults::natural_stone_coefficients(TopLayerType::NordicStone).unwrap()
    }

    fn step(begin: i64, end: i64) -> TimeDependentInput {
        TimeDependentInput::new(begin, end, 1.0, 1.5, 6.0, 0.0).unwrap()
    }

    #[test]
    fn test_damage_is_additive() {
        assert_eq!(damage(0.1, 0.3), 0.4);
        assert_eq!(damage(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_resistance() {
        assert_relative_eq!(resistance(1.65, 0.3), 0.495);
    }

    #[test]
    fn test_hydraulic_load_switches_regime_at_xib() {
        let c = coefficients();
        // Just below the threshold the plunging branch applies, just above
        // the surging branch: the two branches give different loads here.
        let below = hydraulic_load(c.xib - 1e-9, 1.5, &c);
        let above = hydraulic_load(c.xib + 1e-9, 1.5, &c);
        assert!(below.is_finite() && above.is_finite());
        assert!((below - above).abs() > 1e-6);
    }

    #[test]
    fn test_hydraulic_load_plunging_grows_with_surf_similarity() {
        let c = coefficients();
        // Plunging: denominator ap·ξ^np with np < 0 shrinks as ξ grows.
        let low = hydraulic_load(1.0, 1.5, &c);
        let high = hydraulic_load(2.0, 1.5, &c);
        assert!(high > low);
    }

    #[test]
    fn test_loading_window_envelopes() {
        let c = coefficients();
        for xi in [0.5_f64, 1.0, 2.0, 3.0, 5.0] {
            let lower =
                lower_limit_loading(xi, c.lower_limit_a, c.lower_limit_b, c.lower_limit_c);
            let upper =
                upper_limit_loading(xi, c.upper_limit_a, c.upper_limit_b, c.upper_limit_c);
            assert!(upper > lower, "window inverted at xi = {xi}");
        }
    }

    #[test]
    fn test_degradation_round_trip() {
        // degradation(reference_time_degradation(d)) == d
        let wave_period = 6.0;
        let d = 0.35;
        let t = reference_time_degradation(d, wave_period);
        assert_relative_eq!(degradation(t, wave_period), d, epsilon = 1e-12);
    }

    #[test]
    fn test_increment_degradation_positive() {
        let gain = increment_degradation(500.0, 900.0, 6.0);
        assert!(gain > 0.0);
    }

    #[test]
    fn test_calculate_accumulates_damage() {
        let props =
            NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::NordicStone);
        let mut location = NaturalStoneLocation::new(props).unwrap();

        let increment = location.calculate(&step(0, 3600), 78.0).unwrap();
        assert!(increment > 0.0);
        assert_relative_eq!(location.damage(), increment);

        let second = location.calculate(&step(3600, 7200), 78.0).unwrap();
        assert!(second > 0.0);
        assert_relative_eq!(location.damage(), increment + second);
    }

    #[test]
    fn test_calculate_records_in_step_failure_time() {
        let props =
            NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::NordicStone)
                .with_initial_damage(0.99)
                .with_thickness_top_layer(0.04);
        let mut location = NaturalStoneLocation::new(props).unwrap();

        // Thin stone close to failure: a long severe step must push it over.
        let severe = TimeDependentInput::new(0, 36_000, 1.0, 2.5, 7.0, 0.0).unwrap();
        location.calculate(&severe, 78.0).unwrap();
        assert!(location.damage() >= 1.0);
        let tof = location.time_of_failure().expect("failure time must be set");
        assert!((0.0..=36_000.0).contains(&tof));
    }

    #[test]
    fn test_out_of_window_step_never_stamps_failure_time() {
        // Gentle slope under steep waves pushes the relative load below the
        // lower envelope: the step carries no load, so damage already at the
        // failure number must not count as failed.
        let props = NaturalStoneConstructionProperties::new(10.0, 5.0, TopLayerType::NordicStone)
            .with_initial_damage(1.0);
        let mut location = NaturalStoneLocation::new(props).unwrap();
        let calm = TimeDependentInput::new(0, 3600, 1.0, 2.0, 4.0, 0.0).unwrap();
        let increment = location.calculate(&calm, 78.0).unwrap();
        assert_eq!(increment, 0.0);
        assert!(location.time_of_failure().is_none());
    }

    #[test]
    fn test_unsupported_top_layer_is_rejected() {
        let props =
            NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::GrassClosedSod);
        assert!(matches!(
            NaturalStoneLocation::new(props),
            Err(InputError::UnsupportedTopLayer { .. })
        ));
    }

    #[test]
    fn test_validate_flags_bad_geometry() {
        let props = NaturalStoneConstructionProperties::new(10.0, 95.0, TopLayerType::NordicStone)
            .with_thickness_top_layer(-0.1);
        let location = NaturalStoneLocation::new(props).unwrap();
        let mut report = ValidationReport::new();
        location.validate(&mut report);
        assert!(report.has_errors());
    }
}
