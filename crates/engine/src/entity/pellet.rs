//! Ejected mass pellet.

use super::Color;
use glam::Vec2;

/// Mass ejected from a cell, travelling on a decaying impulse until
/// eaten or expired. Eating one restores exactly the mass the
/// ejection removed.
#[derive(Debug, Clone)]
pub struct Pellet {
    pub position: Vec2,
    pub radius: f32,
    pub color: Color,
    /// Launch impulse, decays like a cell's split impulse.
    pub impulse: Vec2,
    /// Tick the pellet was ejected on; despawns after its TTL.
    pub spawn_tick: u64,
    pub removed: bool,
}

impl Pellet {
    pub fn new(position: Vec2, radius: f32, color: Color, impulse: Vec2, tick: u64) -> Self {
        Self {
            position,
            radius,
            color,
            impulse,
            spawn_tick: tick,
            removed: false,
        }
    }
}
