//! Fluent assembly of a [`CalculationInput`].

use super::{CalculationInput, InputError, TimeDependentInput};
use crate::overtopping::OvertoppingKernel;
use crate::revetment::asphalt_wave_impact::{
    AsphaltWaveImpactConstructionProperties, AsphaltWaveImpactLocation,
};
use crate::revetment::grass_overtopping::{
    GrassOvertoppingConstructionProperties, GrassOvertoppingLocation,
};
use crate::revetment::grass_wave_impact::{
    GrassWaveImpactConstructionProperties, GrassWaveImpactLocation,
};
use crate::revetment::grass_wave_runup::{
    GrassWaveRunupConstructionProperties, GrassWaveRunupLocation,
};
use crate::revetment::natural_stone::{NaturalStoneConstructionProperties, NaturalStoneLocation};
use crate::revetment::LocationDependentInput;

/// Default cap on the wave obliqueness angle (degrees).
const DEFAULT_MAXIMUM_WAVE_ANGLE: f64 = 90.0;

/// Builder assembling time steps and locations into a [`CalculationInput`].
///
/// The `add_*` methods never fail; construction errors (bad time windows,
/// unsupported top layers, missing steps or locations) all surface from
/// [`build`](Self::build).
///
/// # Example
/// ```
/// use dike_rs::input::CalculationInputBuilder;
/// use dike_rs::revetment::defaults::TopLayerType;
/// use dike_rs::revetment::natural_stone::NaturalStoneConstructionProperties;
///
/// let input = CalculationInputBuilder::new()
///     .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
///     .add_time_step(3600, 7200, 1.6, 0.6, 5.8, 10.0)
///     .add_natural_stone_location(NaturalStoneConstructionProperties::new(
///         10.0,
///         20.0,
///         TopLayerType::NordicStone,
///     ))
///     .build()
///     .unwrap();
/// assert_eq!(input.time_steps().len(), 2);
/// ```
#[derive(Default)]
pub struct CalculationInputBuilder {
    time_steps: Vec<(i64, i64, f64, f64, f64, f64)>,
    locations: Vec<Result<Box<dyn LocationDependentInput>, InputError>>,
    maximum_wave_angle: Option<f64>,
}

impl CalculationInputBuilder {
    /// Start an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a time step with its hydraulic boundary conditions.
    ///
    /// Steps must be appended in chronological order; contiguity is checked
    /// at build time.
    pub fn add_time_step(
        mut self,
        begin_time: i64,
        end_time: i64,
        water_level: f64,
        wave_height_hm0: f64,
        wave_period_tm10: f64,
        wave_angle: f64,
    ) -> Self {
        self.time_steps.push((
            begin_time,
            end_time,
            water_level,
            wave_height_hm0,
            wave_period_tm10,
            wave_angle,
        ));
        self
    }

    /// Add a natural stone location.
    pub fn add_natural_stone_location(
        mut self,
        props: NaturalStoneConstructionProperties,
    ) -> Self {
        self.locations.push(
            NaturalStoneLocation::new(props).map(|l| Box::new(l) as Box<dyn LocationDependentInput>),
        );
        self
    }

    /// Add a grass wave impact location.
    pub fn add_grass_wave_impact_location(
        mut self,
        props: GrassWaveImpactConstructionProperties,
    ) -> Self {
        self.locations.push(
            GrassWaveImpactLocation::new(props)
                .map(|l| Box::new(l) as Box<dyn LocationDependentInput>),
        );
        self
    }

    /// Add a grass wave run-up location.
    pub fn add_grass_wave_runup_location(
        mut self,
        props: GrassWaveRunupConstructionProperties,
    ) -> Self {
        self.locations.push(
            GrassWaveRunupLocation::new(props)
                .map(|l| Box::new(l) as Box<dyn LocationDependentInput>),
        );
        self
    }

    /// Add a grass overtopping location fed by `kernel`.
    pub fn add_grass_overtopping_location(
        mut self,
        props: GrassOvertoppingConstructionProperties,
        kernel: Box<dyn OvertoppingKernel>,
    ) -> Self {
        self.locations.push(
            GrassOvertoppingLocation::new(props, kernel)
                .map(|l| Box::new(l) as Box<dyn LocationDependentInput>),
        );
        self
    }

    /// Add an asphalt wave impact location.
    pub fn add_asphalt_wave_impact_location(
        mut self,
        props: AsphaltWaveImpactConstructionProperties,
    ) -> Self {
        self.locations.push(
            AsphaltWaveImpactLocation::new(props)
                .map(|l| Box::new(l) as Box<dyn LocationDependentInput>),
        );
        self
    }

    /// Override the global cap on the wave obliqueness angle (degrees).
    pub fn with_maximum_wave_angle(mut self, maximum_wave_angle: f64) -> Self {
        self.maximum_wave_angle = Some(maximum_wave_angle);
        self
    }

    /// Assemble the validated input.
    ///
    /// # Errors
    /// The first construction error encountered: an invalid or non-contiguous
    /// time step, an unsupported top layer, an out-of-domain maximum wave
    /// angle, or an empty time-step or location list.
    pub fn build(self) -> Result<CalculationInput, InputError> {
        let time_steps = self
            .time_steps
            .into_iter()
            .map(|(begin, end, wl, hm0, tm10, angle)| {
                TimeDependentInput::new(begin, end, wl, hm0, tm10, angle)
            })
            .collect::<Result<Vec<_>, _>>()?;
        let locations = self
            .locations
            .into_iter()
            .collect::<Result<Vec<_>, _>>()?;
        CalculationInput::new(
            time_steps,
            locations,
            self.maximum_wave_angle
                .unwrap_or(DEFAULT_MAXIMUM_WAVE_ANGLE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::revetment::defaults::TopLayerType;

    fn stone() -> NaturalStoneConstructionProperties {
        NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::NordicStone)
    }

    #[test]
    fn test_builder_assembles_input() {
        let input = CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
            .add_time_step(3600, 7200, 1.6, 0.6, 5.8, 10.0)
            .add_natural_stone_location(stone())
            .build()
            .unwrap();
        assert_eq!(input.time_steps().len(), 2);
        assert_eq!(input.n_locations(), 1);
        assert_eq!(input.maximum_wave_angle(), DEFAULT_MAXIMUM_WAVE_ANGLE);
    }

    #[test]
    fn test_builder_defers_time_step_errors_to_build() {
        let result = CalculationInputBuilder::new()
            .add_time_step(3600, 0, 1.4, 0.5, 5.5, 0.0)
            .add_natural_stone_location(stone())
            .build();
        assert!(matches!(result, Err(InputError::InvalidTimeStep { .. })));
    }

    #[test]
    fn test_builder_defers_top_layer_errors_to_build() {
        let props =
            NaturalStoneConstructionProperties::new(10.0, 20.0, TopLayerType::GrassOpenSod);
        let result = CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
            .add_natural_stone_location(props)
            .build();
        assert!(matches!(result, Err(InputError::UnsupportedTopLayer { .. })));
    }

    #[test]
    fn test_builder_rejects_missing_locations() {
        let result = CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
            .build();
        assert!(matches!(result, Err(InputError::NoLocations)));
    }

    #[test]
    fn test_builder_wave_angle_override() {
        let input = CalculationInputBuilder::new()
            .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
            .add_natural_stone_location(stone())
            .with_maximum_wave_angle(78.0)
            .build()
            .unwrap();
        assert_eq!(input.maximum_wave_angle(), 78.0);
    }
}
