//! Calculation controller implementation.

use std::time::Instant;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::input::{CalculationInput, TimeDependentInput};
use crate::revetment::{CalculationError, LocationDependentInput};
use crate::validation::{IssueSeverity, ValidationIssue};

// =============================================================================
// Calculator State
// =============================================================================

/// Lifecycle state of a [`Calculator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalculatorState {
    /// Constructed, not yet run.
    Created,
    /// Currently stepping through time.
    Running,
    /// Ran to the final time step.
    Completed,
    /// Aborted on validation errors or a calculation error.
    Failed,
}

// =============================================================================
// Calculation Output
// =============================================================================

/// Per-location result of a completed run.
#[derive(Clone, Debug)]
pub struct LocationDependentOutput {
    /// Cross-shore x-coordinate of the location (m).
    pub position: f64,
    /// Cumulative damage after each time step, one entry per step.
    pub damages: Vec<f64>,
    /// First time at which the damage reached the failure number.
    pub time_of_failure: Option<f64>,
}

/// Result of a calculation run.
#[derive(Clone, Debug)]
pub struct CalculationResult {
    /// Per-location damage series; empty when the run failed.
    pub outputs: Vec<LocationDependentOutput>,
    /// Validation findings collected before the run started.
    pub issues: Vec<ValidationIssue>,
    /// Total wall-clock time in seconds.
    pub wall_time: f64,
    /// Whether the calculation ran to completion.
    pub success: bool,
    /// Error message if the calculation failed.
    pub error: Option<String>,
}

impl CalculationResult {
    fn success(
        outputs: Vec<LocationDependentOutput>,
        issues: Vec<ValidationIssue>,
        wall_time: f64,
    ) -> Self {
        Self {
            outputs,
            issues,
            wall_time,
            success: true,
            error: None,
        }
    }

    fn failure(issues: Vec<ValidationIssue>, wall_time: f64, error: String) -> Self {
        Self {
            outputs: Vec::new(),
            issues,
            wall_time,
            success: false,
            error: Some(error),
        }
    }
}

// =============================================================================
// Location slot
// =============================================================================

/// A location plus its accumulating damage series.
struct LocationSlot {
    location: Box<dyn LocationDependentInput>,
    damages: Vec<f64>,
}

impl LocationSlot {
    /// Evaluate one time step, honoring the stop-on-failure policy: a failed
    /// location is frozen and only repeats its last damage.
    fn advance(
        &mut self,
        time_step: &TimeDependentInput,
        maximum_wave_angle: f64,
    ) -> Result<(), CalculationError> {
        if self.location.time_of_failure().is_some() {
            self.damages.push(self.location.damage());
            return Ok(());
        }
        self.location.calculate(time_step, maximum_wave_angle)?;
        self.damages.push(self.location.damage());
        Ok(())
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Drives one calculation run over validated input.
///
/// The run is all-or-nothing: validation errors or any
/// [`CalculationError`] abort it and discard all partial damage series.
pub struct Calculator {
    state: CalculatorState,
    time_steps: Vec<TimeDependentInput>,
    slots: Vec<LocationSlot>,
    maximum_wave_angle: f64,
}

impl Calculator {
    /// Take ownership of the input and prepare a run.
    pub fn new(input: CalculationInput) -> Self {
        let (time_steps, locations, maximum_wave_angle) = input.into_parts();
        let n_steps = time_steps.len();
        let slots = locations
            .into_iter()
            .map(|location| LocationSlot {
                location,
                damages: Vec::with_capacity(n_steps),
            })
            .collect();
        Self {
            state: CalculatorState::Created,
            time_steps,
            slots,
            maximum_wave_angle,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CalculatorState {
        self.state
    }

    /// Run all time steps over all locations.
    ///
    /// Consumes the calculator; the damage series and failure times come back
    /// in the result.
    pub fn run(mut self) -> CalculationResult {
        let start_wall = Instant::now();
        self.state = CalculatorState::Running;

        // Pre-flight validation: errors block, warnings are logged.
        let mut report = crate::validation::ValidationReport::new();
        for slot in &self.slots {
            slot.location.validate(&mut report);
        }
        for issue in report.issues() {
            match issue.severity {
                IssueSeverity::Error => log::error!("{}", issue.message),
                IssueSeverity::Warning => log::warn!("{}", issue.message),
            }
        }
        if report.has_errors() {
            self.state = CalculatorState::Failed;
            return CalculationResult::failure(
                report.into_issues(),
                start_wall.elapsed().as_secs_f64(),
                "validation reported errors".to_string(),
            );
        }
        let issues = report.into_issues();

        log::info!(
            "starting calculation: {} time steps, {} locations",
            self.time_steps.len(),
            self.slots.len()
        );

        for time_step in &self.time_steps {
            if let Err(err) = advance_locations(&mut self.slots, time_step, self.maximum_wave_angle)
            {
                log::error!(
                    "calculation failed in time step [{}, {}]: {err}",
                    time_step.begin_time(),
                    time_step.end_time()
                );
                self.state = CalculatorState::Failed;
                return CalculationResult::failure(
                    issues,
                    start_wall.elapsed().as_secs_f64(),
                    err.to_string(),
                );
            }
        }

        self.state = CalculatorState::Completed;
        let outputs = self
            .slots
            .into_iter()
            .map(|slot| LocationDependentOutput {
                position: slot.location.position(),
                damages: slot.damages,
                time_of_failure: slot.location.time_of_failure(),
            })
            .collect();
        CalculationResult::success(outputs, issues, start_wall.elapsed().as_secs_f64())
    }
}

/// Advance every location through one time step.
///
/// The parallel and sequential paths are result-identical: each location's
/// arithmetic is self-contained and the first error in location order wins.
#[cfg(feature = "parallel")]
fn advance_locations(
    slots: &mut [LocationSlot],
    time_step: &TimeDependentInput,
    maximum_wave_angle: f64,
) -> Result<(), CalculationError> {
    let results: Vec<Result<(), CalculationError>> = slots
        .par_iter_mut()
        .map(|slot| slot.advance(time_step, maximum_wave_angle))
        .collect();
    for result in results {
        result?;
    }
    Ok(())
}

#[cfg(not(feature = "parallel"))]
fn advance_locations(
    slots: &mut [LocationSlot],
    time_step: &TimeDependentInput,
    maximum_wave_angle: f64,
) -> Result<(), CalculationError> {
    for slot in slots.iter_mut() {
        slot.advance(time_step, maximum_wave_angle)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::CalculationInputBuilder;
    use crate::revetment::defaults::TopLayerType;
    use crate::revetment::natural_stone::NaturalStoneConstructionProperties;

    fn calm_input() -> CalculationInput {
        CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
            .add_time_step(3600, 7200, 1.5, 0.5, 5.5, 5.0)
            .add_time_step(7200, 10800, 1.4, 0.4, 5.0, 0.0)
            .add_natural_stone_location(NaturalStoneConstructionProperties::new(
                10.0,
                20.0,
                TopLayerType::NordicStone,
            ))
            .build()
            .unwrap()
    }

    #[test]
    fn test_calculator_lifecycle() {
        let calculator = Calculator::new(calm_input());
        assert_eq!(calculator.state(), CalculatorState::Created);
        let result = calculator.run();
        assert!(result.success);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_one_damage_entry_per_time_step() {
        let result = Calculator::new(calm_input()).run();
        assert_eq!(result.outputs.len(), 1);
        assert_eq!(result.outputs[0].damages.len(), 3);
    }

    #[test]
    fn test_damage_series_is_non_decreasing() {
        let result = Calculator::new(calm_input()).run();
        let damages = &result.outputs[0].damages;
        for pair in damages.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_validation_errors_block_run() {
        let input = CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
            .add_natural_stone_location(
                NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::NordicStone)
                    .with_thickness_top_layer(-0.25),
            )
            .build()
            .unwrap();
        let result = Calculator::new(input).run();
        assert!(!result.success);
        assert!(result.outputs.is_empty());
        assert!(!result.issues.is_empty());
    }

    #[test]
    fn test_failed_location_freezes() {
        // Thin layer under heavy waves: fails in the first step, then the
        // series repeats the failure damage.
        let input = CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 1.5, 6.0, 0.0)
            .add_time_step(3600, 7200, 1.4, 1.5, 6.0, 0.0)
            .add_natural_stone_location(
                NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::NordicStone)
                    .with_thickness_top_layer(0.1),
            )
            .build()
            .unwrap();
        let result = Calculator::new(input).run();
        assert!(result.success);
        let output = &result.outputs[0];
        assert!(output.time_of_failure.is_some());
        assert!(output.damages[0] >= 1.0);
        assert_eq!(output.damages[0].to_bits(), output.damages[1].to_bits());
    }
}
