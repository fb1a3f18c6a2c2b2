//! Boundary to the external wave overtopping kernel.
//!
//! Grass overtopping locations obtain their 2% run-up height and overtopping
//! discharge from a separately compiled kernel. The engine treats that kernel
//! as an opaque, bounded-latency synchronous call behind the
//! [`OvertoppingKernel`] trait, so the calculation core can be exercised with
//! a substitute implementation without linking the real library.
//!
//! A kernel failure carries no retry semantics: the overtopping result feeds
//! a strictly order-dependent damage accumulation, so a failed call is fatal
//! to the whole run.

use thiserror::Error;

/// Error type for overtopping kernel invocations.
#[derive(Debug, Error)]
pub enum OvertoppingError {
    /// The kernel rejected the supplied geometry.
    #[error("overtopping kernel rejected geometry: {0}")]
    InvalidGeometry(String),

    /// The kernel failed while computing run-up/discharge.
    #[error("overtopping kernel calculation failed: {0}")]
    CalculationFailed(String),
}

/// Hydraulic load handed to the kernel for one time step.
#[derive(Clone, Copy, Debug)]
pub struct OvertoppingLoad {
    /// Still water level (m).
    pub water_level: f64,
    /// Spectral significant wave height Hm0 (m).
    pub wave_height_hm0: f64,
    /// Spectral wave period Tm-1,0 (s).
    pub wave_period_tm10: f64,
    /// Wave attack angle relative to the dike normal (degrees).
    pub wave_angle: f64,
}

/// Cross-section geometry handed to the kernel.
///
/// Profile points run from the outer toe to the inner toe; `roughness[i]`
/// applies to the segment between points `i` and `i + 1`.
#[derive(Clone, Debug)]
pub struct OvertoppingGeometry {
    /// Profile point x-coordinates (m), strictly increasing.
    pub x_coordinates: Vec<f64>,
    /// Profile point z-coordinates (m).
    pub z_coordinates: Vec<f64>,
    /// Segment roughness influence factors, one per segment.
    pub roughness: Vec<f64>,
    /// Crest level of the dike (m).
    pub dike_height: f64,
}

/// Output of one kernel invocation.
#[derive(Clone, Copy, Debug)]
pub struct OvertoppingResult {
    /// Run-up height exceeded by 2% of incoming waves (m above SWL).
    pub z2: f64,
    /// Mean overtopping discharge (m³/s per m).
    pub qo: f64,
}

/// Synchronous interface to the external overtopping kernel.
pub trait OvertoppingKernel: Send + Sync {
    /// Check the geometry before any calculation is attempted.
    fn validate(&self, geometry: &OvertoppingGeometry) -> Result<(), OvertoppingError>;

    /// Compute 2% run-up and overtopping discharge for one load window.
    fn calculate(
        &self,
        load: &OvertoppingLoad,
        geometry: &OvertoppingGeometry,
    ) -> Result<OvertoppingResult, OvertoppingError>;
}

// =============================================================================
// Fixed kernel (test double)
// =============================================================================

/// Kernel substitute returning a preconfigured result for every call.
///
/// Useful in tests and anywhere the real kernel is not linked.
#[derive(Clone, Copy, Debug)]
pub struct FixedOvertoppingKernel {
    result: OvertoppingResult,
}

impl FixedOvertoppingKernel {
    /// Create a kernel that always returns `(z2, qo)`.
    pub fn new(z2: f64, qo: f64) -> Self {
        Self {
            result: OvertoppingResult { z2, qo },
        }
    }
}

impl OvertoppingKernel for FixedOvertoppingKernel {
    fn validate(&self, geometry: &OvertoppingGeometry) -> Result<(), OvertoppingError> {
        if geometry.x_coordinates.len() != geometry.z_coordinates.len() {
            return Err(OvertoppingError::InvalidGeometry(format!(
                "profile has {} x-coordinates but {} z-coordinates",
                geometry.x_coordinates.len(),
                geometry.z_coordinates.len()
            )));
        }
        if geometry.x_coordinates.len() < 2 {
            return Err(OvertoppingError::InvalidGeometry(
                "profile needs at least two points".to_string(),
            ));
        }
        if geometry.x_coordinates.windows(2).any(|w| w[1] <= w[0]) {
            return Err(OvertoppingError::InvalidGeometry(
                "profile x-coordinates must be strictly increasing".to_string(),
            ));
        }
        Ok(())
    }

    fn calculate(
        &self,
        _load: &OvertoppingLoad,
        _geometry: &OvertoppingGeometry,
    ) -> Result<OvertoppingResult, OvertoppingError> {
        Ok(self.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> OvertoppingGeometry {
        OvertoppingGeometry {
            x_coordinates: vec![0.0, 15.0, 20.0, 30.0],
            z_coordinates: vec![0.0, 5.0, 5.0, 1.0],
            roughness: vec![1.0, 1.0, 1.0],
            dike_height: 5.0,
        }
    }

    #[test]
    fn test_fixed_kernel_returns_configured_result() {
        let kernel = FixedOvertoppingKernel::new(2.4, 0.001);
        let load = OvertoppingLoad {
            water_level: 3.0,
            wave_height_hm0: 1.2,
            wave_period_tm10: 5.0,
            wave_angle: 0.0,
        };
        let result = kernel.calculate(&load, &geometry()).unwrap();
        assert_eq!(result.z2, 2.4);
        assert_eq!(result.qo, 0.001);
    }

    #[test]
    fn test_fixed_kernel_validates_point_counts() {
        let kernel = FixedOvertoppingKernel::new(2.4, 0.001);
        let mut geom = geometry();
        geom.z_coordinates.pop();
        assert!(kernel.validate(&geom).is_err());
    }

    #[test]
    fn test_fixed_kernel_validates_monotonic_x() {
        let kernel = FixedOvertoppingKernel::new(2.4, 0.001);
        let mut geom = geometry();
        geom.x_coordinates[2] = 10.0;
        let err = kernel.validate(&geom).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"));
    }
}
