//! Food pellet.

use super::Color;
use glam::Vec2;

/// A static food item. The pool size is held constant by respawn.
#[derive(Debug, Clone)]
pub struct Food {
    pub position: Vec2,
    pub radius: f32,
    pub color: Color,
    pub removed: bool,
}

impl Food {
    pub fn new(position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            position,
            radius,
            color,
            removed: false,
        }
    }
}
