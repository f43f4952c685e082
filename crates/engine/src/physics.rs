//! Per-tick movement integration.
//!
//! Runs once per player cell, bot, and pellet each tick. Positions
//! are clamped to the arena every tick; a non-finite result discards
//! the whole update and zeroes the motion state so a bad value can
//! never propagate into rendering or the camera.

use crate::config::PhysicsConfig;
use crate::entity::{Bot, Cell, Pellet};
use crate::world::Arena;
use glam::Vec2;

/// Mass-dependent speed curve for player cells. Larger cells are
/// slower, with a floor so huge cells stay controllable.
#[inline]
pub fn max_speed(radius: f32, config: &PhysicsConfig) -> f32 {
    (config.base_speed * radius.powf(-config.speed_exponent) * config.speed_scale)
        .max(config.min_speed)
}

/// Speed curve for bots, tuned slightly slower than player cells.
#[inline]
pub fn bot_speed(radius: f32, config: &PhysicsConfig) -> f32 {
    (config.bot_base_speed * radius.powf(-config.bot_speed_exponent) * config.speed_scale)
        .max(config.min_speed)
}

/// Advance one player cell by one tick.
///
/// Steering velocity accelerates toward the intent vector and is
/// damped by friction; the split/eject impulse is added to position
/// directly and decays geometrically until clamped to zero.
pub fn integrate_cell(cell: &mut Cell, intent: Vec2, arena: &Arena, config: &PhysicsConfig) {
    let speed = max_speed(cell.radius, config);
    let velocity = (cell.velocity + intent * speed * config.acceleration) * config.friction;
    let mut impulse = cell.impulse;

    let candidate = cell.position + velocity + impulse;

    impulse *= config.impulse_decay;
    if impulse.length_squared() < config.impulse_epsilon * config.impulse_epsilon {
        impulse = Vec2::ZERO;
    }

    if candidate.is_finite() && velocity.is_finite() {
        cell.position = arena.clamp(candidate, cell.radius);
        cell.velocity = velocity;
        cell.impulse = impulse;
    } else {
        // Last good position stands; motion state is reset so the
        // invalid value cannot recur next tick.
        cell.velocity = Vec2::ZERO;
        cell.impulse = Vec2::ZERO;
    }
}

/// Advance one bot toward its steering target. No friction term:
/// bots move at their mass-scaled speed directly.
pub fn integrate_bot(bot: &mut Bot, arena: &Arena, config: &PhysicsConfig) {
    let to_target = bot.target - bot.position;
    let dist = to_target.length();
    if dist < 1.0 || !dist.is_finite() {
        return;
    }

    let step = to_target / dist * bot_speed(bot.radius, config).min(dist);
    let candidate = bot.position + step;
    if candidate.is_finite() {
        bot.position = arena.clamp(candidate, bot.radius);
    }
}

/// Advance one pellet on its decaying launch impulse.
pub fn integrate_pellet(pellet: &mut Pellet, arena: &Arena, config: &PhysicsConfig) {
    let candidate = pellet.position + pellet.impulse;

    pellet.impulse *= config.impulse_decay;
    if pellet.impulse.length_squared() < config.impulse_epsilon * config.impulse_epsilon {
        pellet.impulse = Vec2::ZERO;
    }

    if candidate.is_finite() {
        pellet.position = arena.clamp(candidate, pellet.radius);
    } else {
        pellet.impulse = Vec2::ZERO;
    }
}
