//! Renderer-agnostic frame descriptions
//!
//! The core never draws. Each frame it hands the host a list of filled
//! circles plus the alpha of the black overlay that produces motion trails.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::state::{Color, EntityRef};

/// One filled circle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub entity: EntityRef,
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1 for solid entities, decaying for particles
    pub alpha: f32,
}

impl Drawable {
    pub fn solid(entity: EntityRef, center: Vec2, radius: f32, color: Color) -> Self {
        Self {
            entity,
            center,
            radius,
            color,
            alpha: 1.0,
        }
    }

    /// Fill as linear RGBA
    pub fn rgba(&self) -> [f32; 4] {
        self.color.to_rgba(self.alpha)
    }
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Alpha of the black rectangle painted over the previous frame
    pub fade_overlay: f32,
    /// Circles in draw order
    pub drawables: Vec<Drawable>,
}

impl Frame {
    /// JSON for hosts that cross a language boundary
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
