//! Input normalization for the scroll-expansion hero.
//!
//! Wheel ticks and touch drags arrive in very different units. Everything
//! below turns them into one signed progress delta, and recognizes the
//! "pull back down at the top of the page" gesture that restarts the
//! collapse animation after the hero has fully expanded.

pub const K_WHEEL: f64 = 0.0009;
/// Finger moving up the screen (expanding).
pub const K_TOUCH_EXPAND: f64 = 0.005;
/// Finger moving down the screen (collapsing). Swipes feel shorter in this
/// direction, so they get a larger factor.
pub const K_TOUCH_COLLAPSE: f64 = 0.008;
pub const COLLAPSE_SWIPE_PX: f64 = 20.0;
pub const TOP_TOLERANCE_PX: f64 = 5.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Gesture {
    /// Feed this delta into the progress value.
    Progress(f64),
    /// Leave the expanded state and start collapsing again.
    BeginCollapse,
    /// Not ours, let the browser scroll natively.
    Ignore,
}

pub fn wheel_delta(delta_y: f64) -> f64 {
    delta_y * K_WHEEL
}

/// `drag` is the previous touch Y minus the current one, positive when the
/// finger travels up.
pub fn touch_delta(drag: f64) -> f64 {
    let factor = if drag < 0.0 { K_TOUCH_COLLAPSE } else { K_TOUCH_EXPAND };
    drag * factor
}

pub fn at_top(scroll_y: f64) -> bool {
    scroll_y <= TOP_TOLERANCE_PX
}

pub fn classify_wheel(delta_y: f64, scroll_y: f64, fully_expanded: bool) -> Gesture {
    if !delta_y.is_finite() {
        return Gesture::Ignore;
    }
    if fully_expanded {
        if delta_y < 0.0 && at_top(scroll_y) {
            Gesture::BeginCollapse
        } else {
            Gesture::Ignore
        }
    } else {
        Gesture::Progress(wheel_delta(delta_y))
    }
}

pub fn classify_touch(drag: f64, scroll_y: f64, fully_expanded: bool) -> Gesture {
    if !drag.is_finite() {
        return Gesture::Ignore;
    }
    if fully_expanded {
        if drag < -COLLAPSE_SWIPE_PX && at_top(scroll_y) {
            Gesture::BeginCollapse
        } else {
            Gesture::Ignore
        }
    } else {
        Gesture::Progress(touch_delta(drag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wheel_scales_linearly() {
        assert!((wheel_delta(100.0) - 0.09).abs() < 1e-12);
        assert!((wheel_delta(-100.0) + 0.09).abs() < 1e-12);
    }

    #[test]
    fn touch_factor_depends_on_direction() {
        assert!((touch_delta(10.0) - 0.05).abs() < 1e-12);
        assert!((touch_delta(-10.0) + 0.08).abs() < 1e-12);
    }

    #[test]
    fn upward_wheel_at_top_begins_collapse_only_when_expanded() {
        assert_eq!(classify_wheel(-40.0, 0.0, true), Gesture::BeginCollapse);
        assert_eq!(classify_wheel(-40.0, 5.0, true), Gesture::BeginCollapse);
        assert_eq!(classify_wheel(-40.0, 6.0, true), Gesture::Ignore);
        assert_eq!(classify_wheel(40.0, 0.0, true), Gesture::Ignore);
        assert!(matches!(classify_wheel(-40.0, 0.0, false), Gesture::Progress(d) if d < 0.0));
    }

    #[test]
    fn short_swipes_do_not_collapse() {
        assert_eq!(classify_touch(-15.0, 0.0, true), Gesture::Ignore);
        assert_eq!(classify_touch(-25.0, 0.0, true), Gesture::BeginCollapse);
        assert_eq!(classify_touch(-25.0, 300.0, true), Gesture::Ignore);
    }

    #[test]
    fn non_finite_input_is_ignored() {
        assert_eq!(classify_wheel(f64::NAN, 0.0, false), Gesture::Ignore);
        assert_eq!(classify_touch(f64::INFINITY, 0.0, false), Gesture::Ignore);
    }
}
