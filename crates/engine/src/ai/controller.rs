//! Per-tick bot steering.
//!
//! A bot's behavior is a weighted vector sum over what it can see:
//! flee from anything big enough to eat it, chase anything it can
//! eat, keep clear of viruses when large, otherwise graze food or
//! wander toward a periodically re-rolled waypoint. Nothing here is
//! stored between ticks except the wander waypoint itself; the
//! classification is re-derived from the world snapshot every time.

use crate::config::Config;
use crate::entity::{Bot, Cell, Food, Virus};
use crate::world::Arena;
use glam::Vec2;
use rand::Rng;

/// How far ahead of the bot a force-derived target is projected.
const STEER_LOOKAHEAD: f32 = 200.0;

/// Outcome of one steering decision.
#[derive(Debug, Clone, Copy)]
pub struct Steering {
    /// New waypoint for the integrator.
    pub target: Vec2,
    /// True when a fresh wander waypoint was rolled and the timer
    /// should reset.
    pub wandered: bool,
    /// Lunge destination, when the bot commits to a jump at prey.
    pub lunge_to: Option<Vec2>,
}

/// Compute the steering decision for one bot against the current
/// world snapshot. Mutates nothing; the caller applies the result.
pub fn decide(
    bot: &Bot,
    cells: &[Cell],
    bots: &[Bot],
    viruses: &[Virus],
    food: &[Food],
    arena: &Arena,
    config: &Config,
    rng: &mut impl Rng,
) -> Steering {
    let cfg = &config.bot;
    let ratio = config.combat.predation_ratio;

    let mut force = Vec2::ZERO;
    let mut prey: Option<(Vec2, f32)> = None;

    let mut consider = |other_pos: Vec2, other_radius: f32| {
        let delta = other_pos - bot.position;
        let dist = delta.length().max(1.0);
        if dist > cfg.vision_radius {
            return;
        }
        if other_radius > bot.radius * ratio {
            // Threat: repulsion, stronger when closer.
            force -= delta / dist * (cfg.flee_weight / dist);
        } else if bot.radius > other_radius * ratio {
            // Prey: attraction, stronger when closer.
            force += delta / dist * (cfg.chase_weight / dist);
            if prey.is_none_or(|(_, d)| dist < d) {
                prey = Some((other_pos, dist));
            }
        }
    };

    for cell in cells.iter().filter(|c| !c.removed) {
        consider(cell.position, cell.radius);
    }
    for other in bots.iter().filter(|b| !b.removed && b.id != bot.id) {
        consider(other.position, other.radius);
    }

    // Large bots keep their distance from viruses; the repulsion
    // outweighs food seeking by construction (it joins the force sum
    // while food is only a fallback).
    if bot.radius > cfg.large_radius {
        for virus in viruses.iter().filter(|v| !v.removed) {
            let delta = bot.position - virus.position;
            let dist = delta.length().max(1.0);
            if dist < bot.radius + virus.radius + cfg.virus_caution_margin {
                force += delta / dist * (cfg.virus_caution_weight / dist);
            }
        }
    }

    // Probabilistic lunge: a one-tick jump toward prey, approximating
    // a split-attack without spawning entities.
    let lunge_to = match prey {
        Some((prey_pos, dist))
            if bot.radius > cfg.large_radius && rng.random::<f32>() < cfg.lunge_chance =>
        {
            let dir = (prey_pos - bot.position) / dist;
            Some(arena.clamp(bot.position + dir * dist.min(cfg.lunge_range), bot.radius))
        }
        _ => None,
    };

    if force.length_squared() > 1e-6 {
        let target = bot.position + force.normalize() * STEER_LOOKAHEAD;
        return Steering {
            target: clamp_target(target, arena),
            wandered: false,
            lunge_to,
        };
    }

    // No threat or prey in sight: graze the nearest food.
    let nearest_food = food
        .iter()
        .filter(|f| !f.removed)
        .map(|f| (f.position, bot.position.distance_squared(f.position)))
        .filter(|&(_, d2)| d2 < cfg.food_radius * cfg.food_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((food_pos, _)) = nearest_food {
        return Steering {
            target: food_pos,
            wandered: false,
            lunge_to,
        };
    }

    // Nothing of interest: wander. Keep the current waypoint until
    // the timer runs out or it has been reached.
    let reached = bot.position.distance_squared(bot.target) < bot.radius * bot.radius;
    if bot.wander_timer == 0 || reached {
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        let waypoint = bot.position + Vec2::new(angle.cos(), angle.sin()) * cfg.food_radius;
        Steering {
            target: clamp_target(waypoint, arena),
            wandered: true,
            lunge_to,
        }
    } else {
        Steering {
            target: bot.target,
            wandered: false,
            lunge_to,
        }
    }
}

#[inline]
fn clamp_target(target: Vec2, arena: &Arena) -> Vec2 {
    Vec2::new(
        target.x.clamp(0.0, arena.size),
        target.y.clamp(0.0, arena.size),
    )
}
