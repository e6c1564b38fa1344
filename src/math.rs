//! Angle and interpolation helpers used by the locomotion and camera systems.
//!
//! These mirror the smoothing behavior the controller was tuned against:
//! clamped linear interpolation and critically-damped angle smoothing.

/// Linearly interpolate from `a` to `b` with `t` clamped to `[0, 1]`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Shortest signed difference between two angles in degrees, in `(-180, 180]`.
#[inline]
pub fn delta_angle(current: f32, target: f32) -> f32 {
    let mut delta = (target - current).rem_euclid(360.0);
    if delta > 180.0 {
        delta -= 360.0;
    }
    delta
}

/// Re-wrap an angle into `[-360, 360]` once, then clamp it to `[min, max]`.
///
/// The wrap is a single step: values drift past the band by at most one
/// revolution per tick, which is all the camera accumulator can produce.
#[inline]
pub fn wrap_angle(mut angle: f32, min: f32, max: f32) -> f32 {
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    angle.clamp(min, max)
}

/// Smoothly damp `current` toward `target`, never overshooting.
///
/// `velocity` carries the smoothing state between calls and must be owned by
/// the caller. `smooth_time` is roughly the time to reach the target.
pub fn smooth_damp(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let smooth_time = smooth_time.max(0.0001);
    let omega = 2.0 / smooth_time;

    let x = omega * dt;
    let exp = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

    let change = current - target;
    let original_target = target;
    let target = current - change;

    let temp = (*velocity + omega * change) * dt;
    *velocity = (*velocity - omega * temp) * exp;
    let mut output = target + (change + temp) * exp;

    // prevent overshooting past the target
    if (original_target - current > 0.0) == (output > original_target) {
        output = original_target;
        if dt > 0.0 {
            *velocity = (output - original_target) / dt;
        }
    }

    output
}

/// [`smooth_damp`] over angles in degrees, taking the shortest arc.
pub fn smooth_damp_angle(
    current: f32,
    target: f32,
    velocity: &mut f32,
    smooth_time: f32,
    dt: f32,
) -> f32 {
    let target = current + delta_angle(current, target);
    smooth_damp(current, target, velocity, smooth_time, dt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_eq!(lerp(0.0, 10.0, 2.0), 10.0);
        assert_eq!(lerp(0.0, 10.0, -1.0), 0.0);
    }

    #[test]
    fn delta_angle_shortest_arc() {
        assert_eq!(delta_angle(0.0, 90.0), 90.0);
        assert_eq!(delta_angle(0.0, 270.0), -90.0);
        assert_eq!(delta_angle(350.0, 10.0), 20.0);
        assert_eq!(delta_angle(10.0, 350.0), -20.0);
    }

    #[test]
    fn wrap_angle_rewraps_once() {
        assert_eq!(wrap_angle(370.0, f32::MIN, f32::MAX), 10.0);
        assert_eq!(wrap_angle(-370.0, f32::MIN, f32::MAX), -10.0);
        assert_eq!(wrap_angle(45.0, f32::MIN, f32::MAX), 45.0);
    }

    #[test]
    fn wrap_angle_clamps_after_wrapping() {
        assert_eq!(wrap_angle(100.0, -30.0, 70.0), 70.0);
        assert_eq!(wrap_angle(-100.0, -30.0, 70.0), -30.0);
    }

    #[test]
    fn smooth_damp_converges() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..120 {
            value = smooth_damp(value, 10.0, &mut velocity, 0.12, 1.0 / 60.0);
        }
        assert!((value - 10.0).abs() < 0.01, "value={value}");
    }

    #[test]
    fn smooth_damp_never_overshoots() {
        let mut velocity = 0.0;
        let mut value = 0.0;
        for _ in 0..240 {
            value = smooth_damp(value, 1.0, &mut velocity, 0.05, 1.0 / 60.0);
            assert!(value <= 1.0, "overshot: {value}");
        }
    }

    #[test]
    fn smooth_damp_angle_takes_short_arc() {
        let mut velocity = 0.0;
        // From 350 toward 10 the short arc goes up through 360, not down.
        let next = smooth_damp_angle(350.0, 10.0, &mut velocity, 0.12, 1.0 / 60.0);
        assert!(next > 350.0, "next={next}");
    }
}
