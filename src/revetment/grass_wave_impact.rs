//! Grass revetment under direct wave impact.
//!
//! Strength is a wave-height time line `H(t) = a·e^(b·t) + c`: the time a sod
//! survives under a given impacting wave height. Each loaded time step
//! consumes `Δt / failure_time` of the sod's life. Loading only occurs when
//! the revetment elevation lies inside the water-level-relative impact zone.

use super::defaults::{self, TopLayerType};
use super::{
    interpolated_time_of_failure, validate_damage_parameters, CalculationError, DamageState,
    LocationDependentInput,
};
use crate::hydraulics;
use crate::input::{InputError, TimeDependentInput};
use crate::validation::{check_positive, ValidationReport};

// =============================================================================
// Coefficients
// =============================================================================

/// Material coefficients for a grass wave impact top layer.
#[derive(Clone, Copy, Debug)]
pub struct GrassWaveImpactCoefficients {
    /// Time line coefficient a (m), > 0.
    pub time_line_a: f64,
    /// Time line coefficient b (1/s), < 0.
    pub time_line_b: f64,
    /// Time line coefficient c (m): asymptotic wave height the sod survives
    /// indefinitely.
    pub time_line_c: f64,
    /// Upper bound of the time line domain (s); waves below the height at
    /// `temax` never damage the sod.
    pub temax: f64,
    /// Lower bound of the time line domain (s); stronger waves are treated
    /// as the height at `temin`.
    pub temin: f64,
    /// Wave angle impact cosine power.
    pub wave_angle_n: f64,
    /// Wave angle impact floor.
    pub wave_angle_q: f64,
    /// Wave angle impact fade-out range (degrees).
    pub wave_angle_r: f64,
    /// Impact zone upper bound coefficient (fraction of Hm0 above SWL).
    pub upper_limit_aul: f64,
    /// Impact zone lower bound coefficient (fraction of Hm0 below SWL).
    pub lower_limit_all: f64,
}

// =============================================================================
// Formulas
// =============================================================================

/// Time (s) the sod survives under a constant impacting wave height.
///
/// Inverse of the time line; callers must ensure `wave_height > c`, which the
/// [`wave_height_impact`] clamp guarantees.
#[inline]
pub fn failure_time(wave_height: f64, a: f64, b: f64, c: f64) -> f64 {
    ((wave_height - c) / a).ln() / b
}

/// Wave height of the time line at time `t`.
#[inline]
pub fn time_line_wave_height(t: f64, a: f64, b: f64, c: f64) -> f64 {
    a * (b * t).exp() + c
}

/// Smallest wave height that still damages the sod (time line at `temax`).
#[inline]
pub fn minimum_wave_height(a: f64, b: f64, c: f64, temax: f64) -> f64 {
    time_line_wave_height(temax, a, b, c)
}

/// Largest wave height the time line resolves (time line at `temin`).
#[inline]
pub fn maximum_wave_height(a: f64, b: f64, c: f64, temin: f64) -> f64 {
    time_line_wave_height(temin, a, b, c)
}

/// Effective impacting wave height: angle-reduced Hm0 clamped to the time
/// line domain.
#[inline]
pub fn wave_height_impact(minimum: f64, maximum: f64, wave_angle_impact: f64, hm0: f64) -> f64 {
    (wave_angle_impact * hm0).clamp(minimum, maximum)
}

/// Incremental damage for one loaded time step.
#[inline]
pub fn increment_damage(increment_time: f64, failure_time: f64) -> f64 {
    increment_time / failure_time
}

// =============================================================================
// Construction Properties
// =============================================================================

/// Construction-time parameters for a grass wave impact location.
#[derive(Clone, Debug)]
pub struct GrassWaveImpactConstructionProperties {
    /// Cross-shore x-coordinate (m).
    pub x: f64,
    /// Revetment surface elevation at x (m).
    pub z: f64,
    /// Top layer sod variant.
    pub top_layer_type: TopLayerType,
    /// Damage present before the first time step; defaults to 0.
    pub initial_damage: Option<f64>,
    /// Damage threshold counting as failure; defaults to 1.
    pub failure_number: Option<f64>,
    /// Full coefficient table override; defaults per sod variant.
    pub coefficients: Option<GrassWaveImpactCoefficients>,
}

impl GrassWaveImpactConstructionProperties {
    /// Properties with every optional coefficient left to its default.
    pub fn new(x: f64, z: f64, top_layer_type: TopLayerType) -> Self {
        Self {
            x,
            z,
            top_layer_type,
            initial_damage: None,
            failure_number: None,
            coefficients: None,
        }
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
    pub fn with_coefficients(mut self, coefficients: GrassWaveImpactCoefficients) -> Self {
        self.coefficients = Some(coefficients);
        self
    }
}

// =============================================================================
// Location Model
// =============================================================================

/// Grass wave impact location with its running damage state.
pub struct GrassWaveImpactLocation {
    x: f64,
    z: f64,
    initial_damage: f64,
    failure_number: f64,
    coefficients: GrassWaveImpactCoefficients,
    state: DamageState,
}

impl GrassWaveImpactLocation {
    /// Build a location, resolving omitted parameters to the sod defaults.
    ///
    /// # Errors
    /// [`InputError::UnsupportedTopLayer`] if the top layer is not a grass
    /// sod variant.
    pub fn new(props: GrassWaveImpactConstructionProperties) -> Result<Self, InputError> {
        let coefficients = match props.coefficients {
            Some(c) => c,
            None => defaults::grass_wave_impact_coefficients(props.top_layer_type)?,
        };
        let initial_damage = props.initial_damage.unwrap_or(0.0);
        Ok(Self {
            x: props.x,
            z: props.z,
            initial_damage,
            failure_number: props.failure_number.unwrap_or(defaults::FAILURE_NUMBER),
            coefficients,
            state: DamageState::new(initial_damage),
        })
    }

    /// Impact zone for one time step: `[SWL − all·Hm0, SWL + aul·Hm0]`.
    fn impact_zone(&self, time_step: &TimeDependentInput) -> (f64, f64) {
        let hm0 = time_step.wave_height_hm0();
        let lower = time_step.water_level() - self.coefficients.lower_limit_all * hm0;
        let upper = time_step.water_level() + self.coefficients.upper_limit_aul * hm0;
        (lower, upper)
    }
}

impl LocationDependentInput for GrassWaveImpactLocation {
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
        check_positive(report, "time line coefficient a", c.time_line_a);
        if !(c.time_line_b < 0.0) {
            report.error(format!(
                "time line coefficient b = {} must be negative",
                c.time_line_b
            ));
        }
        if !(c.temin > 0.0 && c.temax > c.temin) {
            report.error(format!(
                "time line domain [{}, {}] must be positive and ordered",
                c.temin, c.temax
            ));
        }
        if c.lower_limit_all < 0.0 {
            report.error(format!(
                "lower limit loading all = {} must be non-negative",
                c.lower_limit_all
            ));
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

        let (lower, upper) = self.impact_zone(time_step);
        if self.z < lower || self.z > upper {
            return Ok(0.0);
        }

        let angle = time_step.wave_angle().abs().min(maximum_wave_angle);
        let wave_angle_impact =
            hydraulics::wave_angle_impact_nqr(angle, c.wave_angle_n, c.wave_angle_q, c.wave_angle_r);
        let minimum = minimum_wave_height(c.time_line_a, c.time_line_b, c.time_line_c, c.temax);
        let maximum = maximum_wave_height(c.time_line_a, c.time_line_b, c.time_line_c, c.temin);
        let wave_height = wave_height_impact(
            minimum,
            maximum,
            wave_angle_impact,
            time_step.wave_height_hm0(),
        );
        let failure_time = failure_time(wave_height, c.time_line_a, c.time_line_b, c.time_line_c);
        let increment = increment_damage(time_step.increment_time(), failure_time);
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

    fn coefficients() -> GrassWaveImpactCoefficients {
        defaults::grass_wave_impact_coefficients(TopLayerType::GrassClosedSod).unwrap()
    }

    #[test]
    fn test_failure_time_inverts_time_line() {
        let c = coefficients();
        let t = 3600.0;
        let height = time_line_wave_height(t, c.time_line_a, c.time_line_b, c.time_line_c);
        let back = failure_time(height, c.time_line_a, c.time_line_b, c.time_line_c);
        assert_relative_eq!(back, t, epsilon = 1e-6);
    }

    #[test]
    fn test_time_line_bounds_ordered() {
        let c = coefficients();
        let minimum = minimum_wave_height(c.time_line_a, c.time_line_b, c.time_line_c, c.temax);
        let maximum = maximum_wave_height(c.time_line_a, c.time_line_b, c.time_line_c, c.temin);
        assert!(minimum > c.time_line_c);
        assert!(maximum > minimum);
    }

    #[test]
    fn test_wave_height_impact_clamps() {
        let c = coefficients();
        let minimum = minimum_wave_height(c.time_line_a, c.time_line_b, c.time_line_c, c.temax);
        let maximum = maximum_wave_height(c.time_line_a, c.time_line_b, c.time_line_c, c.temin);
        assert_eq!(wave_height_impact(minimum, maximum, 1.0, 0.0), minimum);
        assert_eq!(wave_height_impact(minimum, maximum, 1.0, 100.0), maximum);
        let mid = 0.5 * (minimum + maximum);
        assert_eq!(wave_height_impact(minimum, maximum, 1.0, mid), mid);
    }

    fn location(z: f64) -> GrassWaveImpactLocation {
        GrassWaveImpactLocation::new(GrassWaveImpactConstructionProperties::new(
            25.0,
            z,
            TopLayerType::GrassClosedSod,
        ))
        .unwrap()
    }

    fn step(begin: i64, end: i64, water_level: f64, hm0: f64) -> TimeDependentInput {
        TimeDependentInput::new(begin, end, water_level, hm0, 5.5, 0.0).unwrap()
    }

    #[test]
    fn test_zero_increment_outside_impact_zone() {
        // Water level 1.0, Hm0 1.0: impact zone is [0.5, 1.0].
        let mut high_and_dry = location(3.0);
        let increment = high_and_dry.calculate(&step(0, 3600, 1.0, 1.0), 78.0).unwrap();
        assert_eq!(increment, 0.0);
        assert_eq!(high_and_dry.damage(), 0.0);

        let mut submerged = location(-1.0);
        let increment = submerged.calculate(&step(0, 3600, 1.0, 1.0), 78.0).unwrap();
        assert_eq!(increment, 0.0);
    }

    #[test]
    fn test_unloaded_step_never_stamps_failure_time() {
        // Damage already at the failure number, but the location sits outside
        // the impact zone: without load it must not count as failed.
        let mut loc = GrassWaveImpactLocation::new(
            GrassWaveImpactConstructionProperties::new(25.0, 3.0, TopLayerType::GrassClosedSod)
                .with_initial_damage(1.0),
        )
        .unwrap();
        let increment = loc.calculate(&step(0, 3600, 1.0, 1.0), 78.0).unwrap();
        assert_eq!(increment, 0.0);
        assert!(loc.time_of_failure().is_none());
    }

    #[test]
    fn test_damage_accumulates_inside_impact_zone() {
        let mut loc = location(0.8);
        let first = loc.calculate(&step(0, 3600, 1.0, 1.0), 78.0).unwrap();
        assert!(first > 0.0);
        let second = loc.calculate(&step(3600, 7200, 1.0, 1.0), 78.0).unwrap();
        assert_relative_eq!(loc.damage(), first + second);
        // Identical conditions give identical increments.
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn test_failure_time_interpolated_within_step() {
        let mut loc = GrassWaveImpactLocation::new(
            GrassWaveImpactConstructionProperties::new(25.0, 0.8, TopLayerType::GrassClosedSod)
                .with_initial_damage(0.95),
        )
        .unwrap();
        // Severe impact: large waves directly on the sod for ten hours.
        let severe = step(0, 36_000, 1.0, 1.2);
        loc.calculate(&severe, 78.0).unwrap();
        if loc.damage() >= 1.0 {
            let tof = loc.time_of_failure().expect("failure time must be set");
            assert!((0.0..=36_000.0).contains(&tof));
        }
    }

    #[test]
    fn test_open_sod_damages_faster_than_closed() {
        let mut open = GrassWaveImpactLocation::new(GrassWaveImpactConstructionProperties::new(
            25.0,
            0.8,
            TopLayerType::GrassOpenSod,
        ))
        .unwrap();
        let mut closed = location(0.8);
        let s = step(0, 3600, 1.0, 1.0);
        let open_inc = open.calculate(&s, 78.0).unwrap();
        let closed_inc = closed.calculate(&s, 78.0).unwrap();
        assert!(open_inc > closed_inc);
    }
}
