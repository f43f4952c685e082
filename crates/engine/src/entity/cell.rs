//! Player cell.

use super::Color;
use glam::Vec2;

/// A single cell controlled by the player. A player owns between one
/// and `max_cells` of these.
#[derive(Debug, Clone)]
pub struct Cell {
    /// Unique entity id.
    pub id: u32,
    /// Center position in arena coordinates.
    pub position: Vec2,
    /// Radius; mass is the circle area.
    pub radius: f32,
    /// Steering velocity, accelerated toward the intent vector and
    /// damped by friction each tick.
    pub velocity: Vec2,
    /// Transient impulse from split/explode, decays independently of
    /// steering.
    pub impulse: Vec2,
    /// Cell color.
    pub color: Color,
    /// Tick the cell was created on; drives merge eligibility.
    pub birth_tick: u64,
    /// Marked by the resolver, compacted after the pass.
    pub removed: bool,
}

impl Cell {
    pub fn new(id: u32, position: Vec2, radius: f32, color: Color, tick: u64) -> Self {
        Self {
            id,
            position,
            radius,
            velocity: Vec2::ZERO,
            impulse: Vec2::ZERO,
            color,
            birth_tick: tick,
            removed: false,
        }
    }

    /// Whether the cell has left the Young state and may fuse with a
    /// mature sibling. The transition is one-way and time-triggered.
    #[inline]
    pub fn is_mature(&self, current_tick: u64, merge_delay_ticks: u64) -> bool {
        current_tick.saturating_sub(self.birth_tick) >= merge_delay_ticks
    }
}
