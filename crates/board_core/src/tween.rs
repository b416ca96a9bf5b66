use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

/// Default duration of a count animation.
pub const DEFAULT_ANIMATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Easing {
    #[default]
    Linear,
    EaseInOut,
}

impl Easing {
    /// Accepts the config spellings `linear` and `easeInOut` (any case, `-`/`_` ignored).
    pub fn parse(raw: &str) -> Option<Self> {
        let name: String = raw
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match name.as_str() {
            "linear" => Some(Easing::Linear),
            "easeinout" => Some(Easing::EaseInOut),
            _ => None,
        }
    }

    fn apply(self, t: f64) -> f64 {
        match self {
            Easing::Linear => t,
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}

/// Numeric transition of a displayed count, sampled at explicit instants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountTween {
    from: u64,
    to: u64,
    started_at: Instant,
    duration: Duration,
    easing: Easing,
}

impl CountTween {
    pub fn new(from: u64, to: u64, started_at: Instant, duration: Duration) -> Self {
        Self {
            from,
            to,
            started_at,
            duration,
            easing: Easing::Linear,
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn target(&self) -> u64 {
        self.to
    }

    /// Fraction of the animation elapsed at `now`, clamped to `[0, 1]`.
    pub fn progress(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }

    /// Intermediate frames are floored; the final frame is exactly the target.
    pub fn value_at(&self, now: Instant) -> u64 {
        let progress = self.progress(now);
        if progress >= 1.0 {
            return self.to;
        }
        let span = self.to as f64 - self.from as f64;
        let value = self.from as f64 + span * self.easing.apply(progress);
        value.floor().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples(tween: &CountTween, start: Instant) -> Vec<u64> {
        (0..=25)
            .map(|step| tween.value_at(start + Duration::from_millis(step * 40)))
            .collect()
    }

    #[test]
    fn rising_animation_is_monotone_and_exact() {
        let start = Instant::now();
        let tween = CountTween::new(10, 37, start, DEFAULT_ANIMATION);
        let values = samples(&tween, start);

        assert_eq!(values.first(), Some(&10));
        assert!(values.windows(2).all(|pair| pair[0] <= pair[1]));
        assert_eq!(values.last(), Some(&37));
        assert!(tween.is_finished(start + DEFAULT_ANIMATION));
    }

    #[test]
    fn falling_animation_is_monotone_and_exact() {
        let start = Instant::now();
        let tween = CountTween::new(120, 95, start, DEFAULT_ANIMATION).with_easing(Easing::EaseInOut);
        let values = samples(&tween, start);

        assert!(values.windows(2).all(|pair| pair[0] >= pair[1]));
        assert_eq!(values.last(), Some(&95));
    }

    #[test]
    fn intermediate_frames_are_floored() {
        let start = Instant::now();
        let tween = CountTween::new(0, 3, start, Duration::from_millis(1000));
        // 3 * 0.5 = 1.5
        assert_eq!(tween.value_at(start + Duration::from_millis(500)), 1);
    }

    #[test]
    fn easing_names_parse() {
        assert_eq!(Easing::parse("linear"), Some(Easing::Linear));
        assert_eq!(Easing::parse("ease-in-out"), Some(Easing::EaseInOut));
        assert_eq!(Easing::parse("EaseInOut"), Some(Easing::EaseInOut));
        assert_eq!(Easing::parse("bounce"), None);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let start = Instant::now();
        let tween = CountTween::new(4, 9, start, Duration::ZERO);
        assert_eq!(tween.value_at(start), 9);
    }
}
