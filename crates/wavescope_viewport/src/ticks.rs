//! Grid tick spacing.

/// Target distance between minor grid lines, in pixels.
pub const MINOR_TICK_PX: f64 = 60.0;
/// Number of minor steps per major grid line.
pub const MAJOR_TICK_FACTOR: u32 = 5;

/// A grid line position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Trace time of the grid line.
    pub time: f64,
    /// Pixel column of the grid line.
    pub x: f64,
    /// Whether this is a labelled major line.
    pub major: bool,
}

/// Picks a grid step from `{1, 2, 5} × 10^k` ticks whose on-screen width is
/// closest to `target_px` at `time_scale` pixels per tick.
///
/// Ties go to the smaller step. Degenerate inputs fall back to a step of 1.
pub fn nice_tick_step(target_px: f64, time_scale: f64) -> f64 {
    if !(target_px > 0.0 && time_scale > 0.0) || !target_px.is_finite() || !time_scale.is_finite()
    {
        return 1.0;
    }
    let raw = target_px / time_scale;
    let exponent = raw.log10().floor() as i32;

    let mut best = 1.0;
    let mut best_err = f64::INFINITY;
    // The decade below and above cover rounding at decade boundaries.
    for k in [exponent - 1, exponent, exponent + 1] {
        let magnitude = 10f64.powi(k);
        for mantissa in [1.0, 2.0, 5.0] {
            let step = mantissa * magnitude;
            let err = (step * time_scale - target_px).abs();
            if err < best_err {
                best = step;
                best_err = err;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn exact_decades() {
        assert_eq!(nice_tick_step(60.0, 6.0), 10.0);
        assert_eq!(nice_tick_step(60.0, 0.6), 100.0);
        assert_eq!(nice_tick_step(60.0, 60.0), 1.0);
    }

    #[test]
    fn rounds_to_nearest_mantissa() {
        // 60 px at 1 px/tick: 50 is 10 px away, 100 is 40 px away
        assert_eq!(nice_tick_step(60.0, 1.0), 50.0);
        // 60 px at 0.25 px/tick wants 240 ticks: 200 is closest
        assert_eq!(nice_tick_step(60.0, 0.25), 200.0);
    }

    #[test]
    fn sub_tick_steps_when_zoomed_far_in() {
        assert_eq!(nice_tick_step(60.0, 300.0), 0.2);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(nice_tick_step(60.0, 0.0), 1.0);
        assert_eq!(nice_tick_step(0.0, 1.0), 1.0);
        assert_eq!(nice_tick_step(60.0, f64::NAN), 1.0);
    }

    fn is_nice(step: f64) -> bool {
        let exponent = step.log10().floor();
        let mantissa = step / 10f64.powf(exponent);
        [1.0, 2.0, 5.0, 10.0]
            .iter()
            .any(|m| (mantissa - m).abs() < 1e-9)
    }

    proptest! {
        #[test]
        fn step_is_one_two_five(target in 1.0f64..500.0, scale in 1e-9f64..1e6) {
            let step = nice_tick_step(target, scale);
            prop_assert!(is_nice(step), "step {} not nice", step);
            // Never further than a factor of 2.5 from the target.
            let px = step * scale;
            prop_assert!(px >= target / 2.5 - 1e-9 && px <= target * 2.5 + 1e-9);
        }
    }
}
