//! Location-dependent revetment damage models.
//!
//! Each revetment/top-layer combination is one implementation of
//! [`LocationDependentInput`]: it owns the per-location static parameters
//! (geometry, material coefficients) plus the mutable running damage state,
//! and exposes the single `calculate` step contract consumed by the
//! [`Calculator`](crate::simulation::Calculator).
//!
//! Models:
//! - [`natural_stone`] - Nordic stone under wave attack (closed-form degradation)
//! - [`grass_wave_impact`] - grass sod under direct wave impact (time line)
//! - [`grass_wave_runup`] - grass sod under wave run-up (cumulative overload)
//! - [`grass_overtopping`] - grass on crest/inner slope fed by the external
//!   overtopping kernel (cumulative overload)
//! - [`asphalt_wave_impact`] - hydraulic asphalt concrete (fatigue)

pub mod asphalt_wave_impact;
pub mod defaults;
pub mod grass_overtopping;
pub mod grass_wave_impact;
pub mod grass_wave_runup;
pub mod natural_stone;

use thiserror::Error;

use crate::input::TimeDependentInput;
use crate::overtopping::OvertoppingError;
use crate::validation::ValidationReport;

// =============================================================================
// Calculation Errors
// =============================================================================

/// Error raised while evaluating a location's damage increment.
///
/// These are calculation-time domain errors: preconditions the pre-flight
/// validation should have excluded, or external-kernel failures. Any of them
/// is fatal to the whole run.
#[derive(Debug, Error)]
pub enum CalculationError {
    /// The hydraulic load formula produced a non-finite or non-positive load.
    #[error(
        "degenerate hydraulic load {load} at surf similarity {surf_similarity} \
         (time step [{begin_time}, {end_time}])"
    )]
    DegenerateHydraulicLoad {
        load: f64,
        surf_similarity: f64,
        begin_time: i64,
        end_time: i64,
    },

    /// Accumulated damage left the finite domain.
    #[error("damage became non-finite in time step [{begin_time}, {end_time}]")]
    NonFiniteDamage { begin_time: i64, end_time: i64 },

    /// The external overtopping kernel failed; its message is preserved.
    #[error(transparent)]
    Overtopping(#[from] OvertoppingError),
}

// =============================================================================
// Running Damage State
// =============================================================================

/// Mutable running state owned by every location model.
///
/// Damage is non-decreasing across time steps; the time of failure is set at
/// most once, when cumulative damage first reaches the failure number.
#[derive(Clone, Copy, Debug)]
pub struct DamageState {
    damage: f64,
    time_of_failure: Option<f64>,
}

impl DamageState {
    /// Start tracking from an initial damage value.
    pub fn new(initial_damage: f64) -> Self {
        Self {
            damage: initial_damage,
            time_of_failure: None,
        }
    }

    /// Current cumulative damage.
    #[inline]
    pub fn damage(&self) -> f64 {
        self.damage
    }

    /// Time of failure, unset until the failure number is reached.
    #[inline]
    pub fn time_of_failure(&self) -> Option<f64> {
        self.time_of_failure
    }

    /// Advance the cumulative damage and record first failure.
    ///
    /// `time_of_failure` is evaluated lazily, only when this step crosses the
    /// failure number for the first time.
    pub fn advance<F>(&mut self, new_damage: f64, failure_number: f64, time_of_failure: F)
    where
        F: FnOnce() -> f64,
    {
        self.damage = new_damage;
        if self.time_of_failure.is_none() && new_damage >= failure_number {
            self.time_of_failure = Some(time_of_failure());
        }
    }
}

/// Linear in-step failure instant for models without a closed-form time line.
///
/// Interpolates within `[begin_time, begin_time + increment_time]` assuming
/// the increment accrues uniformly over the window.
pub(crate) fn interpolated_time_of_failure(
    begin_time: i64,
    increment_time: f64,
    start_damage: f64,
    increment_damage: f64,
    failure_number: f64,
) -> f64 {
    let remaining = failure_number - start_damage;
    let fraction = (remaining / increment_damage).clamp(0.0, 1.0);
    begin_time as f64 + fraction * increment_time
}

// =============================================================================
// Location Contract
// =============================================================================

/// Polymorphic contract every revetment location plugs into the controller.
///
/// Implementations mutate only their own running state; locations never see
/// each other, which is what makes the inner per-time-step loop
/// embarrassingly parallel.
pub trait LocationDependentInput: Send {
    /// Cross-shore x-coordinate of the location (m).
    fn position(&self) -> f64;

    /// Damage present before the first time step, in [0, 1].
    fn initial_damage(&self) -> f64;

    /// Damage threshold at which the location counts as failed.
    fn failure_number(&self) -> f64;

    /// Current cumulative damage.
    fn damage(&self) -> f64;

    /// First time at which cumulative damage reached the failure number.
    fn time_of_failure(&self) -> Option<f64>;

    /// Report issues with this location's static parameters.
    fn validate(&self, report: &mut ValidationReport);

    /// Evaluate one time step: compute the incremental damage, fold it into
    /// the running state, and return the increment.
    ///
    /// Returns 0 when the hydraulic load falls outside the model's active
    /// loading window for this step.
    fn calculate(
        &mut self,
        time_step: &TimeDependentInput,
        maximum_wave_angle: f64,
    ) -> Result<f64, CalculationError>;
}

/// Validate the damage bookkeeping shared by all models.
pub(crate) fn validate_damage_parameters(
    report: &mut ValidationReport,
    position: f64,
    initial_damage: f64,
    failure_number: f64,
) {
    crate::validation::check_range(report, "initial damage", initial_damage, 0.0, 1.0);
    if !(failure_number > 0.0) {
        report.error(format!(
            "failure number {failure_number} at x = {position} must be positive"
        ));
    } else if initial_damage >= failure_number {
        report.warning(format!(
            "initial damage {initial_damage} at x = {position} already at or above \
             failure number {failure_number}"
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_state_tracks_failure_once() {
        let mut state = DamageState::new(0.2);
        state.advance(0.6, 1.0, || unreachable!());
        assert_eq!(state.damage(), 0.6);
        assert!(state.time_of_failure().is_none());

        state.advance(1.1, 1.0, || 42.0);
        assert_eq!(state.time_of_failure(), Some(42.0));

        // A later crossing never overwrites the first failure time.
        state.advance(1.8, 1.0, || 99.0);
        assert_eq!(state.time_of_failure(), Some(42.0));
    }

    #[test]
    fn test_interpolated_time_of_failure_mid_step() {
        // Damage goes 0.8 -> 1.2 over [100, 200]; crosses 1.0 halfway.
        let t = interpolated_time_of_failure(100, 100.0, 0.8, 0.4, 1.0);
        assert_eq!(t, 150.0);
    }

    #[test]
    fn test_interpolated_time_of_failure_clamps_to_step() {
        // Already at the threshold when the step begins.
        let t = interpolated_time_of_failure(100, 100.0, 1.0, 0.4, 1.0);
        assert_eq!(t, 100.0);
    }

    #[test]
    fn test_validate_damage_parameters() {
        let mut report = ValidationReport::new();
        validate_damage_parameters(&mut report, 10.0, 0.0, 1.0);
        assert!(report.is_valid());

        let mut report = ValidationReport::new();
        validate_damage_parameters(&mut report, 10.0, 1.2, 1.0);
        assert!(report.has_errors());

        let mut report = ValidationReport::new();
        validate_damage_parameters(&mut report, 10.0, 1.0, 1.0);
        assert!(report.is_valid());
        assert!(report.has_warnings());
    }
}
