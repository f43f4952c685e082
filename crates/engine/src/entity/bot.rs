//! Autonomous bot.

use super::Color;
use glam::Vec2;

/// A bot. Geometry matches [`super::Cell`]; steering state is only
/// the current waypoint and its wander timer. Threat and prey
/// classification is recomputed from the world every tick.
#[derive(Debug, Clone)]
pub struct Bot {
    pub id: u32,
    pub position: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Point the bot is currently moving toward.
    pub target: Vec2,
    /// Ticks until the wander waypoint is re-rolled.
    pub wander_timer: u32,
    pub removed: bool,
}

impl Bot {
    pub fn new(id: u32, position: Vec2, radius: f32, color: Color) -> Self {
        Self {
            id,
            position,
            radius,
            color,
            target: position,
            wander_timer: 0,
            removed: false,
        }
    }
}
