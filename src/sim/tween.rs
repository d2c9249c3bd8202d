//! Time-bounded property interpolation
//!
//! Sampled once per step against the session clock; no animation runtime.

use serde::{Deserialize, Serialize};

/// Easing curve applied to normalized progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Easing {
    Linear,
    /// Quadratic ease-out (fast start, gentle landing)
    #[default]
    QuadOut,
}

impl Easing {
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        match self {
            Easing::Linear => t,
            Easing::QuadOut => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Interpolation task from `from` to `to` over `duration_ms`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub from: f32,
    pub to: f32,
    pub start_ms: f64,
    pub duration_ms: f64,
    pub easing: Easing,
}

impl Tween {
    pub fn new(from: f32, to: f32, start_ms: f64, duration_ms: f64) -> Self {
        Self {
            from,
            to,
            start_ms,
            duration_ms,
            easing: Easing::default(),
        }
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Normalized progress clamped to [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.start_ms) / self.duration_ms).clamp(0.0, 1.0) as f32
    }

    /// Value at `now_ms`; exactly `to` once finished
    pub fn sample(&self, now_ms: f64) -> f32 {
        let t = self.progress(now_ms);
        if t >= 1.0 {
            return self.to;
        }
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        self.progress(now_ms) >= 1.0
    }
}
