//! Grass on the crest and inner slope under wave overtopping.
//!
//! The hydraulic load comes from the external overtopping kernel: each time
//! step is handed to the kernel, whose 2% run-up height seeds the same
//! discrete Rayleigh cumulative overload accumulation as the run-up model.
//! Only waves that run up beyond the crest load the location; their front
//! velocity at the crest is depth-limited by the freeboard.
//!
//! A kernel failure is fatal to the run (see [`crate::overtopping`]).

use super::defaults::{self, TopLayerType};
use super::grass_wave_runup::rayleigh_wave_runup;
use super::{
    interpolated_time_of_failure, validate_damage_parameters, CalculationError, DamageState,
    LocationDependentInput,
};
use crate::hydraulics::{self, GRAVITY};
use crate::input::{InputError, TimeDependentInput};
use crate::overtopping::{OvertoppingGeometry, OvertoppingKernel, OvertoppingLoad};
use crate::validation::{check_positive, ValidationReport};

// =============================================================================
// Coefficients
// =============================================================================

/// Material coefficients for a grass overtopping top layer.
#[derive(Clone, Copy, Debug)]
pub struct GrassOvertoppingCoefficients {
    /// Front velocity coefficient Cwo.
    pub front_velocity_cwo: f64,
    /// Inner-slope acceleration factor αA.
    pub acceleration_alpha_a: f64,
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

/// Front velocity of an overtopping tongue at the crest (m/s).
///
/// Waves whose run-up stays below the freeboard do not overtop and carry no
/// velocity at the crest.
pub fn overtopping_front_velocity(
    wave_runup: f64,
    freeboard: f64,
    cwo: f64,
    alpha_a: f64,
) -> f64 {
    let excess = (wave_runup - freeboard).max(0.0);
    cwo * alpha_a * (GRAVITY * excess).sqrt()
}

/// Cumulative overload of one time step (m²/s²).
///
/// Same fixed-order Rayleigh accumulation as the run-up model, with the
/// crest front velocity as the load.
pub fn cumulative_overload(
    runup_2p: f64,
    freeboard: f64,
    average_number_of_waves: f64,
    c: &GrassOvertoppingCoefficients,
) -> f64 {
    let n = c.fixed_number_of_waves;
    let critical_squared = c.critical_front_velocity * c.critical_front_velocity;
    let mut sum = 0.0;
    for k in 1..=n {
        let runup = rayleigh_wave_runup(runup_2p, k, n);
        let velocity =
            overtopping_front_velocity(runup, freeboard, c.front_velocity_cwo, c.acceleration_alpha_a);
        sum += (c.increased_load_alpha_m * velocity * velocity
            - c.reduced_strength_alpha_s * critical_squared)
            .max(0.0);
    }
    average_number_of_waves / n as f64 * sum
}

// =============================================================================
// Construction Properties
// =============================================================================

/// Construction-time parameters for a grass overtopping location.
#[derive(Clone, Debug)]
pub struct GrassOvertoppingConstructionProperties {
    /// Cross-shore x-coordinate (m), on the crest or inner slope.
    pub x: f64,
    /// Top layer sod variant.
    pub top_layer_type: TopLayerType,
    /// Outer profile geometry handed to the kernel.
    pub geometry: OvertoppingGeometry,
    /// Override for the inner-slope acceleration factor αA.
    pub acceleration_alpha_a: Option<f64>,
    /// Damage present before the first time step; defaults to 0.
    pub initial_damage: Option<f64>,
    /// Damage threshold counting as failure; defaults to 1.
    pub failure_number: Option<f64>,
    /// Full coefficient table override; defaults per sod variant.
    pub coefficients: Option<GrassOvertoppingCoefficients>,
}

impl GrassOvertoppingConstructionProperties {
    /// Properties with every optional coefficient left to its default.
    pub fn new(x: f64, top_layer_type: TopLayerType, geometry: OvertoppingGeometry) -> Self {
        Self {
            x,
            top_layer_type,
            geometry,
            acceleration_alpha_a: None,
            initial_damage: None,
            failure_number: None,
            coefficients: None,
        }
    }

    /// Override the inner-slope acceleration factor.
    pub fn with_acceleration_alpha_a(mut self, alpha_a: f64) -> Self {
        self.acceleration_alpha_a = Some(alpha_a);
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
    pub fn with_coefficients(mut self, coefficients: GrassOvertoppingCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }
}

// =============================================================================
// Location Model
// =============================================================================

/// Grass overtopping location with its running damage state.
pub struct GrassOvertoppingLocation {
    x: f64,
    geometry: OvertoppingGeometry,
    kernel: Box<dyn OvertoppingKernel>,
    initial_damage: f64,
    failure_number: f64,
    coefficients: GrassOvertoppingCoefficients,
    state: DamageState,
}

impl GrassOvertoppingLocation {
    /// Build a location around a kernel, resolving omitted parameters to the
    /// sod defaults.
    ///
    /// # Errors
    /// [`InputError::UnsupportedTopLayer`] if the top layer is not a grass
    /// sod variant or the dikes overtopping protocol parameterization.
    pub fn new(
        props: GrassOvertoppingConstructionProperties,
        kernel: Box<dyn OvertoppingKernel>,
    ) -> Result<Self, InputError> {
        let mut coefficients = match props.coefficients {
            Some(c) => c,
            None => defaults::grass_overtopping_coefficients(props.top_layer_type)?,
        };
        if let Some(alpha_a) = props.acceleration_alpha_a {
            coefficients.acceleration_alpha_a = alpha_a;
        }
        let initial_damage = props.initial_damage.unwrap_or(0.0);
        Ok(Self {
            x: props.x,
            geometry: props.geometry,
            kernel,
            initial_damage,
            failure_number: props.failure_number.unwrap_or(defaults::FAILURE_NUMBER),
            coefficients,
            state: DamageState::new(initial_damage),
        })
    }
}

impl LocationDependentInput for GrassOvertoppingLocation {
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
        let c = &self.coefficients;
        check_positive(report, "front velocity cwo", c.front_velocity_cwo);
        check_positive(report, "acceleration alpha_a", c.acceleration_alpha_a);
        check_positive(report, "critical front velocity", c.critical_front_velocity);
        check_positive(
            report,
            "critical cumulative overload",
            c.critical_cumulative_overload,
        );
        if c.fixed_number_of_waves == 0 {
            report.error("fixed number of waves must be positive");
        }
        if let Err(err) = self.kernel.validate(&self.geometry) {
            report.error(format!("at x = {}: {err}", self.x));
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

        let load = OvertoppingLoad {
            water_level: time_step.water_level(),
            wave_height_hm0: time_step.wave_height_hm0(),
            wave_period_tm10: time_step.wave_period_tm10(),
            wave_angle: time_step.wave_angle().abs().min(maximum_wave_angle),
        };
        let kernel_result = self.kernel.calculate(&load, &self.geometry)?;

        if kernel_result.z2 <= 0.0 {
            // No run-up at all this step. Run-up distributions that only
            // partially clear the crest are handled per wave below: the tail
            // of the Rayleigh distribution reaches well beyond z2.
            return Ok(0.0);
        }

        let freeboard = (self.geometry.dike_height - time_step.water_level()).max(0.0);
        let waves = hydraulics::average_number_of_waves(
            time_step.increment_time(),
            time_step.wave_period_tm10(),
            c.factor_ctm,
        );
        let overload = cumulative_overload(kernel_result.z2, freeboard, waves, &c);
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
