//! Time-stepping calculation controller.
//!
//! The [`Calculator`] drives one calculation run: time steps in chronological
//! order on the outside, locations on the inside. Locations never see each
//! other, so the inner loop is embarrassingly parallel; with the `parallel`
//! feature it fans out over rayon while producing bit-identical results to
//! the sequential loop.
//!
//! # Example
//! ```ignore
//! use dike_rs::input::CalculationInputBuilder;
//! use dike_rs::simulation::Calculator;
//!
//! let input = CalculationInputBuilder::new()
//!     .add_time_step(0, 3600, 1.4, 0.5, 5.5, 0.0)
//!     .add_natural_stone_location(props)
//!     .build()?;
//!
//! let result = Calculator::new(input).run();
//! assert!(result.success);
//! ```

mod calculator;

pub use calculator::{CalculationResult, Calculator, CalculatorState, LocationDependentOutput};
