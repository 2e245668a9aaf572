//! Critically damped smoothing used for horizontal velocity.

/// Lower bound on the smoothing time to avoid dividing by zero.
const MIN_SMOOTH_TIME: f32 = 0.0001;

/// Move `current` towards `target` with a critically damped spring.
///
/// `velocity` is the filter's internal rate of change and must persist
/// between calls. The result never overshoots `target`.
///
/// # Arguments
/// * `current` - value being smoothed
/// * `target` - value to settle on
/// * `velocity` - damping accumulator, updated in place
/// * `smooth_time` - approximate time (seconds) to reach the target
/// * `dt` - step length in seconds
#[must_use]
pub fn smooth_damp(current: f32, target: f32, velocity: &mut f32, smooth_time: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return current;
    }

    let smooth_time = smooth_time.max(MIN_SMOOTH_TIME);
    let omega = 2.0 / smooth_time;
    let x = omega * dt;
    // Pade approximation of exp(-x)
    let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * decay;
    let mut output = target + (change + temp) * decay;

    if (target - current > 0.0) == (output > target) {
        output = target;
        *velocity = (output - target) / dt;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converges_on_target() {
        let mut v = 0.0;
        let mut x = 0.0;
        for _ in 0..500 {
            x = smooth_damp(x, 12.0, &mut v, 0.3, 0.02);
        }
        assert!((x - 12.0).abs() < 1e-3);
    }

    #[test]
    fn never_overshoots() {
        let mut v = 0.0;
        let mut x = -5.0;
        for _ in 0..200 {
            x = smooth_damp(x, 3.0, &mut v, 0.1, 0.05);
            assert!(x <= 3.0);
        }
    }

    #[test]
    fn zero_dt_is_identity() {
        let mut v = 1.5;
        assert_eq!(smooth_damp(2.0, 10.0, &mut v, 0.3, 0.0), 2.0);
        assert_eq!(v, 1.5);
    }

    #[test]
    fn first_step_moves_part_way() {
        let mut v = 0.0;
        let x = smooth_damp(0.0, 10.0, &mut v, 0.3, 0.02);
        assert!(x > 0.0 && x < 10.0);
        assert!(v > 0.0);
    }
}
