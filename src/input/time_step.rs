//! Hydraulic condition windows.
//!
//! A [`TimeDependentInput`] is one immutable window of hydraulic conditions.
//! Windows are owned exclusively by the
//! [`CalculationInput`](crate::input::CalculationInput) aggregate, which
//! enforces that consecutive windows are contiguous.

use super::InputError;

/// One hydraulic condition window.
///
/// Immutable once constructed; `begin_time < end_time` is enforced at
/// construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeDependentInput {
    begin_time: i64,
    end_time: i64,
    water_level: f64,
    wave_height_hm0: f64,
    wave_period_tm10: f64,
    wave_angle: f64,
}

impl TimeDependentInput {
    /// Create a hydraulic condition window.
    ///
    /// # Errors
    /// [`InputError::InvalidTimeStep`] if `begin_time >= end_time`.
    pub fn new(
        begin_time: i64,
        end_time: i64,
        water_level: f64,
        wave_height_hm0: f64,
        wave_period_tm10: f64,
        wave_angle: f64,
    ) -> Result<Self, InputError> {
        if begin_time >= end_time {
            return Err(InputError::InvalidTimeStep {
                begin_time,
                end_time,
            });
        }
        Ok(Self {
            begin_time,
            end_time,
            water_level,
            wave_height_hm0,
            wave_period_tm10,
            wave_angle,
        })
    }

    /// Start of the window.
    #[inline]
    pub fn begin_time(&self) -> i64 {
        self.begin_time
    }

    /// End of the window.
    #[inline]
    pub fn end_time(&self) -> i64 {
        self.end_time
    }

    /// Window duration, `end_time - begin_time`.
    #[inline]
    pub fn increment_time(&self) -> f64 {
        crate::hydraulics::increment_of_time(self.begin_time, self.end_time)
    }

    /// Still water level (m).
    #[inline]
    pub fn water_level(&self) -> f64 {
        self.water_level
    }

    /// Spectral significant wave height Hm0 (m).
    #[inline]
    pub fn wave_height_hm0(&self) -> f64 {
        self.wave_height_hm0
    }

    /// Spectral wave period Tm-1,0 (s).
    #[inline]
    pub fn wave_period_tm10(&self) -> f64 {
        self.wave_period_tm10
    }

    /// Wave attack angle relative to the dike normal (degrees).
    #[inline]
    pub fn wave_angle(&self) -> f64 {
        self.wave_angle
    }
}

/// Check that consecutive windows tile the calculation period.
///
/// # Errors
/// [`InputError::NonContiguousTimeSteps`] naming the first discontinuity.
pub(super) fn check_contiguity(time_steps: &[TimeDependentInput]) -> Result<(), InputError> {
    for (index, pair) in time_steps.windows(2).enumerate() {
        if pair[1].begin_time() != pair[0].end_time() {
            return Err(InputError::NonContiguousTimeSteps {
                index: index + 1,
                begin_time: pair[1].begin_time(),
                previous_end_time: pair[0].end_time(),
            });
        }
    }
    Ok(())
}
