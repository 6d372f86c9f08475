use std::time::Duration;

/// Returns how far the input bar must rise for a keyboard of `height`.
///
/// The safe-area inset is already reserved below the bar, so only the part of
/// the keyboard above it counts. A non-finite height or a NaN safe area
/// collapses to zero; an infinite safe area covers any keyboard.
pub fn keyboard_inset(height: f32, safe_area_bottom: f32) -> f32 {
    let height = if height.is_finite() { height } else { 0.0 };
    let safe_area_bottom = if safe_area_bottom.is_nan() {
        0.0
    } else {
        safe_area_bottom.max(0.0)
    };

    (height - safe_area_bottom).max(0.0)
}

/// Cubic ease-in-out over `[0, 1]`.
///
/// Same curve as gpui's `ease_in_out`, kept here so this crate stays free of
/// the UI toolkit.
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Input bar inset transition driven by one keyboard event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsetAnimation {
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
}

impl InsetAnimation {
    pub fn new(from: f32, to: f32, duration: Duration) -> Self {
        Self { from, to, duration }
    }

    /// Restarts the same transition from a different inset.
    ///
    /// Used when a new keyboard event interrupts a running animation: the new
    /// one starts at whatever inset is on screen right now.
    pub fn starting_from(self, from: f32) -> Self {
        Self { from, ..self }
    }

    pub fn is_instant(&self) -> bool {
        self.duration.is_zero()
    }

    /// Inset at `progress` in `[0, 1]`; values outside are clamped.
    pub fn sample(&self, progress: f32) -> f32 {
        if self.is_instant() {
            return self.to;
        }

        let eased = ease_in_out(progress);
        self.from + (self.to - self.from) * eased
    }

    /// Inset after `elapsed` time since the animation started.
    pub fn at(&self, elapsed: Duration) -> f32 {
        if self.is_instant() || elapsed >= self.duration {
            return self.to;
        }

        self.sample(elapsed.as_secs_f32() / self.duration.as_secs_f32())
    }
}

/// Registration state of a screen's keyboard event subscription.
///
/// A screen holds at most one registration; acquiring while already active is
/// a no-op so lifecycle hooks firing twice never double-subscribe.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct KeyboardSubscription {
    active: bool,
}

impl KeyboardSubscription {
    /// Returns true when this call created the registration.
    pub fn acquire(&mut self) -> bool {
        if self.active {
            return false;
        }
        self.active = true;
        true
    }

    /// Returns true when this call dropped an existing registration.
    pub fn release(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn inset_subtracts_safe_area() {
        assert_eq!(keyboard_inset(336.0, 34.0), 302.0);
        assert_eq!(keyboard_inset(300.0, 0.0), 300.0);
    }

    #[test]
    fn inset_never_goes_negative() {
        assert_eq!(keyboard_inset(20.0, 34.0), 0.0);
        assert_eq!(keyboard_inset(-50.0, 0.0), 0.0);
        assert_eq!(keyboard_inset(f32::NAN, 0.0), 0.0);
        assert_eq!(keyboard_inset(100.0, f32::NAN), 100.0);
    }

    #[test]
    fn infinite_safe_area_covers_the_keyboard() {
        assert_eq!(keyboard_inset(100.0, f32::INFINITY), 0.0);
        assert_eq!(keyboard_inset(300.0, f32::NEG_INFINITY), 300.0);
    }

    #[test]
    fn easing_hits_endpoints_and_midpoint() {
        assert!((ease_in_out(0.0)).abs() < EPSILON);
        assert!((ease_in_out(0.5) - 0.5).abs() < EPSILON);
        assert!((ease_in_out(1.0) - 1.0).abs() < EPSILON);
        assert!((ease_in_out(-3.0)).abs() < EPSILON);
        assert!((ease_in_out(7.0) - 1.0).abs() < EPSILON);
    }

    #[test]
    fn easing_is_monotonic() {
        let samples = (0..=100)
            .map(|step| ease_in_out(step as f32 / 100.0))
            .collect::<Vec<_>>();

        assert!(samples.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn animation_interpolates_between_insets() {
        let animation = InsetAnimation::new(0.0, 300.0, Duration::from_millis(250));

        assert!((animation.at(Duration::ZERO)).abs() < EPSILON);
        assert!((animation.at(Duration::from_millis(125)) - 150.0).abs() < EPSILON);
        assert_eq!(animation.at(Duration::from_millis(250)), 300.0);
        assert_eq!(animation.at(Duration::from_secs(5)), 300.0);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let animation = InsetAnimation::new(120.0, 0.0, Duration::ZERO);

        assert!(animation.is_instant());
        assert_eq!(animation.sample(0.0), 0.0);
        assert_eq!(animation.at(Duration::ZERO), 0.0);
    }

    #[test]
    fn rebasing_keeps_target_and_duration() {
        let animation = InsetAnimation::new(0.0, 300.0, Duration::from_millis(250));
        let rebased = animation.starting_from(80.0);

        assert_eq!(rebased.from, 80.0);
        assert_eq!(rebased.to, 300.0);
        assert_eq!(rebased.duration, animation.duration);
    }

    #[test]
    fn subscription_acquires_once() {
        let mut subscription = KeyboardSubscription::default();

        assert!(!subscription.is_active());
        assert!(subscription.acquire());
        assert!(!subscription.acquire());
        assert!(subscription.is_active());
        assert!(subscription.release());
        assert!(!subscription.release());
        assert!(!subscription.is_active());
    }
}
