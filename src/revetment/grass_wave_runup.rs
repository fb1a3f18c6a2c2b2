//! Grass revetment under wave run-up, cumulative overload method.
//!
//! Each time step is expanded into a fixed discrete Rayleigh distribution of
//! run-up heights derived from the representative 2% run-up. Every wave whose
//! front velocity at the location exceeds the sod's critical velocity adds to
//! the cumulative overload; damage is the overload over the critical
//! cumulative overload.
//!
//! The per-wave loop runs in fixed ascending order and the floating sum is
//! never reordered, so results are reproducible bit-for-bit.

use super::defaults::{self, TopLayerType};
use super::{
    interpolated_time_of_failure, validate_damage_parameters, CalculationError, DamageState,
    LocationDependentInput,
};
use crate::hydraulics::{self, GRAVITY};
use crate::input::{InputError, TimeDependentInput};
use crate::validation::{check_positive, check_range, ValidationReport};

// =============================================================================
// Coefficients
// =============================================================================

/// Material coefficients for a grass wave run-up top layer.
#[derive(Clone, Copy, Debug)]
pub struct GrassWaveRunupCoefficients {
    /// Representative 2% run-up coefficient Aru.
    pub representative_2p_aru: f64,
    /// Representative 2% run-up coefficient Bru.
    pub representative_2p_bru: f64,
    /// Representative 2% run-up coefficient Cru.
    pub representative_2p_cru: f64,
    /// Wave angle impact cosine power.
    pub wave_angle_n: f64,
    /// Wave angle impact floor.
    pub wave_angle_q: f64,
    /// Wave angle impact fade-out range (degrees).
    pub wave_angle_r: f64,
    /// Front velocity coefficient Cu.
    pub front_velocity_cu: f64,
    /// Critical front velocity of the sod (m/s).
    pub critical_front_velocity: f64,
    /// Critical cumulative overload (m²/s²).
    pub critical_cumulative_overload: f64,
    /// Increased load transition αM.
    pub increased_load_alpha_m: f64,
    /// Reduced strength transition αS.
    pub reduced_strength_alpha_s: f64,
    /// Number of discrete Rayleigh waves per time step.
    pub fixed_number_of_waves: usize,
    /// Tm-1,0 to mean period conversion factor.
    pub factor_ctm: f64,
}

// =============================================================================
// Formulas
// =============================================================================

/// Representative run-up height exceeded by 2% of incoming waves (m above SWL).
///
/// ```text
/// z2% = Hm0 · f_β · min(Aru·γb·γf·ξ, γf·(Bru − Cru/√ξ))
/// ```
///
/// The first branch governs breaking waves, the second saturates the run-up
/// for non-breaking (high ξ) conditions.
pub fn representative_wave_runup_2p(
    surf_similarity: f64,
    wave_angle_impact: f64,
    gamma_b: f64,
    gamma_f: f64,
    hm0: f64,
    aru: f64,
    bru: f64,
    cru: f64,
) -> f64 {
    hm0 * wave_angle_impact
        * (aru * gamma_b * gamma_f * surf_similarity)
            .min(gamma_f * (bru - cru / surf_similarity.sqrt()))
}

/// Run-up height of the k-th of `n` discrete Rayleigh waves.
///
/// Scaled so the 2%-exceedance wave of the distribution equals `runup_2p`.
#[inline]
pub fn rayleigh_wave_runup(runup_2p: f64, k: usize, n: usize) -> f64 {
    let p = k as f64 / (n as f64 + 1.0);
    runup_2p * ((1.0 - p).ln() / 0.02_f64.ln()).sqrt()
}

/// Front velocity of a run-up tongue at a point `vertical_distance` above SWL.
///
/// The ramp factor depth-limits the velocity near the run-up tip: waves that
/// barely reach the location load it with a fraction of the full velocity.
pub fn front_velocity(wave_runup: f64, vertical_distance: f64, cu: f64) -> f64 {
    if wave_runup <= 0.0 {
        return 0.0;
    }
    let ramp = ((wave_runup - vertical_distance) / (0.25 * wave_runup)).clamp(0.0, 1.0);
    cu * (GRAVITY * wave_runup).sqrt() * ramp
}

/// Cumulative overload of one time step (m²/s²).
///
/// Fixed ascending iteration over the discrete Rayleigh waves; the summation
/// order is part of the reproducibility contract.
pub fn cumulative_overload(
    runup_2p: f64,
    vertical_distance: f64,
    average_number_of_waves: f64,
    c: &GrassWaveRunupCoefficients,
) -> f64 {
    let n = c.fixed_number_of_waves;
    let critical_squared = c.critical_front_velocity * c.critical_front_velocity;
    let mut sum = 0.0;
    for k in 1..=n {
        let runup = rayleigh_wave_runup(runup_2p, k, n);
        let velocity = front_velocity(runup, vertical_distance, c.front_velocity_cu);
        sum += (c.increased_load_alpha_m * velocity * velocity
            - c.reduced_strength_alpha_s * critical_squared)
            .max(0.0);
    }
    average_number_of_waves / n as f64 * sum
}

// =============================================================================
// Construction Properties
// =============================================================================

/// Construction-time parameters for a grass wave run-up location.
#[derive(Clone, Debug)]
pub struct GrassWaveRunupConstructionProperties {
    /// Cross-shore x-coordinate (m).
    pub x: f64,
    /// Revetment surface elevation at x (m).
    pub z: f64,
    /// Outer slope angle (degrees).
    pub outer_slope_angle: f64,
    /// Top layer sod variant.
    pub top_layer_type: TopLayerType,
    /// Berm influence factor γb; defaults to 1.
    pub gamma_b: Option<f64>,
    /// Roughness influence factor γf ∈ [0.5, 1]; defaults to 1.
    pub gamma_f: Option<f64>,
    /// Damage present before the first time step; defaults to 0.
    pub initial_damage: Option<f64>,
    /// Damage threshold counting as failure; defaults to 1.
    pub failure_number: Option<f64>,
    /// Full coefficient table override; defaults per sod variant.
    pub coefficients: Option<GrassWaveRunupCoefficients>,
}

impl GrassWaveRunupConstructionProperties {
    /// Properties with every optional coefficient left to its default.
    pub fn new(x: f64, z: f64, outer_slope_angle: f64, top_layer_type: TopLayerType) -> Self {
        Self {
            x,
            z,
            outer_slope_angle,
            top_layer_type,
            gamma_b: None,
            gamma_f: None,
            initial_damage: None,
            failure_number: None,
            coefficients: None,
        }
    }

    /// Override the berm influence factor.
    pub fn with_gamma_b(mut self, gamma_b: f64) -> Self {
        self.gamma_b = Some(gamma_b);
        self
    }

    /// Override the roughness influence factor.
    pub fn with_gamma_f(mut self, gamma_f: f64) -> Self {
        self.gamma_f = Some(gamma_f);
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
    pub fn with_coefficients(mut self, coefficients: GrassWaveRunupCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }
}

// =============================================================================
// Location Model
// =============================================================================

/// Grass wave run-up location with its running damage state.
pub struct GrassWaveRunupLocation {
    x: f64,
    z: f64,
    outer_slope_angle: f64,
    gamma_b: f64,
    gamma_f: f64,
    initial_damage: f64,
    failure_number: f64,
    coefficients: GrassWaveRunupCoefficients,
    state: DamageState,
}

impl GrassWaveRunupLocation {
    /// Build a location, resolving omitted parameters to the sod defaults.
    ///
    /// # Errors
    /// [`InputError::UnsupportedTopLayer`] if the top layer is not a grass
    /// sod variant.
    pub fn new(props: GrassWaveRunupConstructionProperties) -> Result<Self, InputError> {
        let coefficients = match props.coefficients {
            Some(c) => c,
            None => defaults::grass_wave_runup_coefficients(props.top_layer_type)?,
        };
        let initial_damage = props.initial_damage.unwrap_or(0.0);
        Ok(Self {
            x: props.x,
            z: props.z,
            outer_slope_angle: props.outer_slope_angle,
            gamma_b: props.gamma_b.unwrap_or(1.0),
            gamma_f: props.gamma_f.unwrap_or(1.0),
            initial_damage,
            failure_number: props.failure_number.unwrap_or(defaults::FAILURE_NUMBER),
            coefficients,
            state: DamageState::new(initial_damage),
        })
    }
}

impl LocationDependentInput for GrassWaveRunupLocation {
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
        check_range(report, "roughness influence gamma_f", self.gamma_f, 0.5, 1.0);
        check_positive(report, "berm influence gamma_b", self.gamma_b);
        let c = &self.coefficients;
        check_positive(report, "critical front velocity", c.critical_front_velocity);
        check_positive(
            report,
            "critical cumulative overload",
            c.critical_cumulative_overload,
        );
        if c.fixed_number_of_waves == 0 {
            report.error("fixed number of waves must be positive");
        }
    }

    fn calculate(
        &mut self,
        time_step: &TimeDependentInput,
        maximum_wave_angle: f64,
    ) -> Result<f64, CalculationError> {
        let c = self.coefficients;
        let failure_number = self.failure_number;
        let start = self.state.damage();
        let begin = time_step.begin_time();

        let surf_similarity = hydraulics::surf_similarity_parameter(
            self.outer_slope_angle,
            time_step.wave_height_hm0(),
            time_step.wave_period_tm10(),
        );
        let angle = time_step.wave_angle().abs().min(maximum_wave_angle);
        let wave_angle_impact =
            hydraulics::wave_angle_impact_nqr(angle, c.wave_angle_n, c.wave_angle_q, c.wave_angle_r);
        let runup_2p = representative_wave_runup_2p(
            surf_similarity,
            wave_angle_impact,
            self.gamma_b,
            self.gamma_f,
            time_step.wave_height_hm0(),
            c.representative_2p_aru,
            c.representative_2p_bru,
            c.representative_2p_cru,
        );
        let vertical_distance = self.z - time_step.water_level();
        if runup_2p <= 0.0 || vertical_distance < 0.0 {
            // No run-up, or the location is below SWL: run-up loading does
            // not apply this step.
            return Ok(0.0);
        }

        let waves = hydraulics::average_number_of_waves(
            time_step.increment_time(),
            time_step.wave_period_tm10(),
            c.factor_ctm,
        );
        let overload = cumulative_overload(runup_2p, vertical_distance, waves, &c);
        let increment = overload / c.critical_cumulative_overload;
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

    fn coefficients() -> GrassWaveRunupCoefficients {
        defaults::grass_wave_runup_coefficients(TopLayerType::GrassOpenSod).unwrap()
    }

    #[test]
    fn test_rayleigh_runup_distribution_shape() {
        let n = 10_000;
        let z2 = 2.0;
        // Monotone increasing in k; the 2%-exceedance wave reproduces z2.
        let low = rayleigh_wave_runup(z2, 100, n);
        let high = rayleigh_wave_runup(z2, 9_900, n);
        assert!(high > low);
        let k_2p = (0.98 * (n as f64 + 1.0)) as usize;
        assert_relative_eq!(rayleigh_wave_runup(z2, k_2p, n), z2, epsilon = 5e-3);
    }

    #[test]
    fn test_representative_runup_breaking_branch() {
        // Low surf similarity: the Aru·γb·γf·ξ branch governs.
        let z2 = representative_wave_runup_2p(1.0, 1.0, 1.0, 1.0, 1.5, 1.65, 4.0, 1.5);
        assert_relative_eq!(z2, 1.5 * 1.65);
    }

    #[test]
    fn test_representative_runup_saturates() {
        // High surf similarity: the Bru − Cru/√ξ branch caps the run-up.
        let z2 = representative_wave_runup_2p(9.0, 1.0, 1.0, 1.0, 1.5, 1.65, 4.0, 1.5);
        assert_relative_eq!(z2, 1.5 * (4.0 - 1.5 / 3.0));
    }

    #[test]
    fn test_front_velocity_ramp() {
        // Far below the run-up tip: full velocity.
        let full = front_velocity(2.0, 0.0, 1.1);
        assert_relative_eq!(full, 1.1 * (GRAVITY * 2.0).sqrt());
        // Above the tip: no loading.
        assert_eq!(front_velocity(2.0, 2.5, 1.1), 0.0);
        // Near the tip: reduced.
        let reduced = front_velocity(2.0, 1.9, 1.1);
        assert!(reduced > 0.0 && reduced < full);
    }

    #[test]
    fn test_cumulative_overload_reproducible() {
        let c = coefficients();
        let a = cumulative_overload(2.5, 0.5, 600.0, &c);
        let b = cumulative_overload(2.5, 0.5, 600.0, &c);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a >= 0.0);
    }

    #[test]
    fn test_calm_conditions_give_zero_overload() {
        // Run-up far below the critical front velocity threshold.
        let c = coefficients();
        let overload = cumulative_overload(0.05, 0.0, 600.0, &c);
        assert_eq!(overload, 0.0);
    }

    fn step(begin: i64, end: i64, hm0: f64) -> TimeDependentInput {
        TimeDependentInput::new(begin, end, 0.5, hm0, 5.5, 0.0).unwrap()
    }

    #[test]
    fn test_calculate_accumulates_and_is_monotone() {
        let props =
            GrassWaveRunupConstructionProperties::new(30.0, 1.0, 20.0, TopLayerType::GrassOpenSod);
        let mut loc = GrassWaveRunupLocation::new(props).unwrap();
        let first = loc.calculate(&step(0, 3600, 2.0), 78.0).unwrap();
        assert!(first >= 0.0);
        let second = loc.calculate(&step(3600, 7200, 2.0), 78.0).unwrap();
        assert_relative_eq!(loc.damage(), first + second);
        assert!(loc.damage() >= loc.initial_damage());
    }

    #[test]
    fn test_location_below_water_is_not_loaded() {
        let props =
            GrassWaveRunupConstructionProperties::new(30.0, -0.5, 20.0, TopLayerType::GrassOpenSod);
        let mut loc = GrassWaveRunupLocation::new(props).unwrap();
        let increment = loc.calculate(&step(0, 3600, 2.0), 78.0).unwrap();
        assert_eq!(increment, 0.0);
    }

    #[test]
    fn test_unloaded_step_never_stamps_failure_time() {
        // Submerged location with damage already at the failure number: no
        // run-up load ever touches it, so it must not count as failed.
        let props =
            GrassWaveRunupConstructionProperties::new(30.0, -0.5, 20.0, TopLayerType::GrassOpenSod)
                .with_initial_damage(1.0);
        let mut loc = GrassWaveRunupLocation::new(props).unwrap();
        loc.calculate(&step(0, 3600, 2.0), 78.0).unwrap();
        assert!(loc.time_of_failure().is_none());
    }
}
