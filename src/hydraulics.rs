//! Shared hydraulic formulas used by every revetment model.
//!
//! All functions in this module are pure: their result depends only on the
//! explicit arguments, so they are safe to call concurrently from any number
//! of locations. Callers are responsible for respecting the documented
//! domains (e.g. positive wave heights and periods); the upstream input
//! validation guarantees this for values coming out of a built
//! [`CalculationInput`](crate::input::CalculationInput).

/// Gravitational acceleration (m/s²).
pub const GRAVITY: f64 = 9.81;

/// Duration of a single hydraulic condition window.
///
/// # Example
/// ```
/// use dike_rs::hydraulics::increment_of_time;
///
/// assert_eq!(increment_of_time(16, 20), 4.0);
/// ```
#[inline]
pub fn increment_of_time(begin_time: i64, end_time: i64) -> f64 {
    (end_time - begin_time) as f64
}

/// Surf similarity (Iribarren) parameter ξ.
///
/// Classifies the wave breaking regime on the outer slope:
/// plunging breakers for small ξ, surging breakers for large ξ.
///
/// ```text
/// ξ = tan(α) / sqrt(2π·Hm0 / (g·Tm10²))
/// ```
///
/// # Arguments
/// * `outer_slope_angle` - Outer slope angle α in degrees
/// * `wave_height_hm0` - Spectral significant wave height Hm0 (m), > 0
/// * `wave_period_tm10` - Spectral wave period Tm-1,0 (s), > 0
pub fn surf_similarity_parameter(
    outer_slope_angle: f64,
    wave_height_hm0: f64,
    wave_period_tm10: f64,
) -> f64 {
    outer_slope_angle.to_radians().tan()
        / (2.0 * std::f64::consts::PI * wave_height_hm0
            / (GRAVITY * wave_period_tm10 * wave_period_tm10))
            .sqrt()
}

/// Wave angle impact factor with a maximum obliqueness angle (natural stone).
///
/// ```text
/// f = cos(min(βmax, |β|))^(2/3)
/// ```
///
/// The factor is flat beyond the clipping angle `betamax`: angles past it
/// yield the same factor as `betamax` itself. Returns a value in (0, 1].
pub fn wave_angle_impact_betamax(wave_angle: f64, betamax: f64) -> f64 {
    betamax
        .min(wave_angle.abs())
        .to_radians()
        .cos()
        .powf(2.0 / 3.0)
}

/// Wave angle impact factor with cosine power, floor and fade-out (grass).
///
/// For |β| ≤ 90° the factor is `max(cos(β)^n, q)`; beyond 90° it fades
/// linearly over `r` degrees down to zero:
///
/// ```text
/// f = max(q·(90 + r − |β|)/r, 0)      for |β| > 90°
/// ```
pub fn wave_angle_impact_nqr(wave_angle: f64, n: f64, q: f64, r: f64) -> f64 {
    let angle = wave_angle.abs();
    if angle <= 90.0 {
        angle.to_radians().cos().powf(n).max(q)
    } else {
        (q * (90.0 + r - angle) / r).max(0.0)
    }
}

/// Average number of waves in a time window.
///
/// ```text
/// N = Δt / (ctm·Tm10)
/// ```
///
/// `factor_ctm` converts the spectral period Tm-1,0 to the mean period.
pub fn average_number_of_waves(increment_time: f64, wave_period_tm10: f64, factor_ctm: f64) -> f64 {
    increment_time / (factor_ctm * wave_period_tm10)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_increment_of_time() {
        assert_eq!(increment_of_time(16, 20), 4.0);
        assert_eq!(increment_of_time(0, 3600), 3600.0);
        assert_eq!(increment_of_time(-10, 10), 20.0);
    }

    #[test]
    fn test_surf_similarity_parameter_reference_value() {
        // Regression pin against the reference formula. The reference value
        // is sometimes quoted together with a 17 degree slope, but 17 degrees
        // does not reproduce it under the formula above (it gives 12.59); the
        // slope below does. Do not "correct" the angle back to 17.
        let xi = surf_similarity_parameter(26.29463543228792, 2.3, 50.0);
        assert_relative_eq!(xi, 20.355326326151559, epsilon = 1e-12);
    }

    #[test]
    fn test_surf_similarity_parameter_deterministic() {
        // Pure function: identical arguments yield bit-identical results.
        let a = surf_similarity_parameter(17.0, 1.5, 6.0);
        let b = surf_similarity_parameter(17.0, 1.5, 6.0);
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_surf_similarity_parameter_scales_with_slope() {
        let gentle = surf_similarity_parameter(10.0, 1.5, 6.0);
        let steep = surf_similarity_parameter(30.0, 1.5, 6.0);
        assert!(steep > gentle);
    }

    #[test]
    fn test_wave_angle_impact_betamax_head_on() {
        assert_relative_eq!(wave_angle_impact_betamax(0.0, 78.0), 1.0);
    }

    #[test]
    fn test_wave_angle_impact_betamax_clipping_is_flat() {
        // At the clipping angle and beyond it, the factor is identical.
        let at = wave_angle_impact_betamax(78.0, 78.0);
        let beyond = wave_angle_impact_betamax(85.0, 78.0);
        let far_beyond = wave_angle_impact_betamax(120.0, 78.0);
        assert_eq!(at.to_bits(), beyond.to_bits());
        assert_eq!(at.to_bits(), far_beyond.to_bits());
        assert!(at > 0.0 && at < 1.0);
    }

    #[test]
    fn test_wave_angle_impact_betamax_symmetric() {
        let pos = wave_angle_impact_betamax(30.0, 78.0);
        let neg = wave_angle_impact_betamax(-30.0, 78.0);
        assert_eq!(pos.to_bits(), neg.to_bits());
    }

    #[test]
    fn test_wave_angle_impact_nqr_floor() {
        // Large angles below 90° bottom out at q.
        let f = wave_angle_impact_nqr(89.0, 2.0 / 3.0, 0.35, 10.0);
        assert_relative_eq!(f, 0.35);
    }

    #[test]
    fn test_wave_angle_impact_nqr_fade_out() {
        let at_90 = wave_angle_impact_nqr(90.0, 2.0 / 3.0, 0.35, 10.0);
        let at_95 = wave_angle_impact_nqr(95.0, 2.0 / 3.0, 0.35, 10.0);
        let at_100 = wave_angle_impact_nqr(100.0, 2.0 / 3.0, 0.35, 10.0);
        let at_120 = wave_angle_impact_nqr(120.0, 2.0 / 3.0, 0.35, 10.0);
        assert!(at_90 >= at_95);
        assert_relative_eq!(at_95, 0.35 * 0.5);
        assert_relative_eq!(at_100, 0.0);
        assert_relative_eq!(at_120, 0.0);
    }

    #[test]
    fn test_average_number_of_waves() {
        assert_relative_eq!(average_number_of_waves(3600.0, 6.0, 1.0), 600.0);
        assert_relative_eq!(average_number_of_waves(900.0, 4.5, 0.92), 900.0 / (0.92 * 4.5));
    }
}
