//! Easing curves used to smooth phase transitions.
//!
//! All curves map `t` in `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

/// Linear progress through a run, clamped to `[0, 1]`.
///
/// A non-positive duration counts as already finished.
pub fn progress(elapsed_ms: f64, duration_ms: f64) -> f64 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (elapsed_ms / duration_ms).clamp(0.0, 1.0)
}

/// Position of `value` inside `[start, end)`, clamped to `[0, 1]`.
pub fn segment(value: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if value >= end { 1.0 } else { 0.0 };
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Move `current` a `fraction` of the way toward `target`.
#[inline]
pub fn approach(current: f64, target: f64, fraction: f64) -> f64 {
    current + (target - current) * fraction
}
