//! Calculation input assembly and validation.
//!
//! The [`CalculationInput`] aggregate exclusively owns the time-step sequence
//! and the location models for one calculation run. It is assembled through
//! the [`CalculationInputBuilder`], which resolves omitted coefficients to
//! top-layer-type defaults and enforces the construction-time invariants
//! (ordered, contiguous time steps; at least one time step and location).

mod builder;
mod time_step;

pub use builder::CalculationInputBuilder;
pub use time_step::TimeDependentInput;

use thiserror::Error;

use crate::revetment::defaults::TopLayerType;
use crate::revetment::LocationDependentInput;
use crate::validation::ValidationReport;

// =============================================================================
// Input Construction Errors
// =============================================================================

/// Error type for calculation input construction.
///
/// All variants are raised at build time, before any calculation starts.
#[derive(Debug, Error)]
pub enum InputError {
    /// A time step does not end after it begins.
    #[error("time step must end after it begins: begin {begin_time} >= end {end_time}")]
    InvalidTimeStep { begin_time: i64, end_time: i64 },

    /// Consecutive time steps leave a gap or overlap.
    #[error(
        "non-contiguous time steps: step {index} begins at {begin_time} \
         but the previous step ends at {previous_end_time}"
    )]
    NonContiguousTimeSteps {
        index: usize,
        begin_time: i64,
        previous_end_time: i64,
    },

    /// The input holds no time steps.
    #[error("calculation input needs at least one time step")]
    NoTimeSteps,

    /// The input holds no locations.
    #[error("calculation input needs at least one location")]
    NoLocations,

    /// A revetment was asked for defaults of a top layer it does not support.
    #[error("top layer type {top_layer} is not supported by the {revetment} revetment")]
    UnsupportedTopLayer {
        revetment: &'static str,
        top_layer: TopLayerType,
    },

    /// The global maximum wave angle is outside its domain.
    #[error("maximum wave angle {0} must lie in (0, 180]")]
    InvalidMaximumWaveAngle(f64),
}

// =============================================================================
// Calculation Input Aggregate
// =============================================================================

/// Validated, read-only input for one calculation run.
///
/// Owns a contiguous arena of time steps and the boxed location models; the
/// calculator operates over borrowed views of both. Created once per run,
/// never mutated afterwards (the location models' running damage state is the
/// only thing the calculator touches).
pub struct CalculationInput {
    time_steps: Vec<TimeDependentInput>,
    locations: Vec<Box<dyn LocationDependentInput>>,
    maximum_wave_angle: f64,
}

impl CalculationInput {
    pub(crate) fn new(
        time_steps: Vec<TimeDependentInput>,
        locations: Vec<Box<dyn LocationDependentInput>>,
        maximum_wave_angle: f64,
    ) -> Result<Self, InputError> {
        if time_steps.is_empty() {
            return Err(InputError::NoTimeSteps);
        }
        if locations.is_empty() {
            return Err(InputError::NoLocations);
        }
        if !(maximum_wave_angle > 0.0 && maximum_wave_angle <= 180.0) {
            return Err(InputError::InvalidMaximumWaveAngle(maximum_wave_angle));
        }
        time_step::check_contiguity(&time_steps)?;
        Ok(Self {
            time_steps,
            locations,
            maximum_wave_angle,
        })
    }

    /// Time steps in chronological order.
    pub fn time_steps(&self) -> &[TimeDependentInput] {
        &self.time_steps
    }

    /// Number of locations.
    pub fn n_locations(&self) -> usize {
        self.locations.len()
    }

    /// Global cap on the wave obliqueness angle (degrees).
    pub fn maximum_wave_angle(&self) -> f64 {
        self.maximum_wave_angle
    }

    /// Run the per-location pre-flight validators.
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        for location in &self.locations {
            location.validate(&mut report);
        }
        report
    }

    /// Split into parts for the calculator.
    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<TimeDependentInput>,
        Vec<Box<dyn LocationDependentInput>>,
        f64,
    ) {
        (self.time_steps, self.locations, self.maximum_wave_angle)
    }
}
