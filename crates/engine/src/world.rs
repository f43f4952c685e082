//! World state.
//!
//! The `World` is the single owned aggregate holding every entity
//! collection; components receive it explicitly each tick and never
//! keep references into it across ticks.

use crate::config::Config;
use crate::entity::{Bot, Cell, Color, Food, Pellet, Virus};
use crate::growth;
use glam::Vec2;
use rand::Rng;

/// Square arena bounds.
#[derive(Debug, Clone, Copy)]
pub struct Arena {
    /// Side length; valid coordinates are `[0, size]`.
    pub size: f32,
}

impl Arena {
    pub fn new(size: f32) -> Self {
        Self { size }
    }

    /// A random position inside the arena.
    #[inline]
    pub fn random_position(&self, rng: &mut impl Rng) -> Vec2 {
        Vec2::new(
            rng.random_range(0.0..self.size),
            rng.random_range(0.0..self.size),
        )
    }

    /// Clamp a center so the whole disc stays inside the bounds.
    /// Velocity is untouched; walls slide, they do not bounce.
    #[inline]
    pub fn clamp(&self, position: Vec2, radius: f32) -> Vec2 {
        Vec2::new(
            position.x.clamp(radius, self.size - radius),
            position.y.clamp(radius, self.size - radius),
        )
    }

    /// Whether a disc lies fully inside the bounds.
    #[inline]
    pub fn contains(&self, position: Vec2, radius: f32) -> bool {
        position.x >= radius
            && position.y >= radius
            && position.x <= self.size - radius
            && position.y <= self.size - radius
    }
}

/// The game world containing all entities.
#[derive(Debug)]
pub struct World {
    next_id: u32,

    pub arena: Arena,
    /// The player's cells; empty once the player has died.
    pub cells: Vec<Cell>,
    pub bots: Vec<Bot>,
    pub food: Vec<Food>,
    pub viruses: Vec<Virus>,
    pub pellets: Vec<Pellet>,
}

impl World {
    pub fn new(arena_size: f32) -> Self {
        Self {
            next_id: 1,
            arena: Arena::new(arena_size),
            cells: Vec::with_capacity(16),
            bots: Vec::with_capacity(32),
            food: Vec::with_capacity(1024),
            viruses: Vec::with_capacity(32),
            pellets: Vec::with_capacity(64),
        }
    }

    /// Get the next entity id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        if self.next_id == 0 {
            self.next_id = 1; // Skip 0
        }
        id
    }

    pub fn spawn_food(&mut self, rng: &mut impl Rng, min_radius: f32, max_radius: f32) {
        let radius = if max_radius > min_radius {
            rng.random_range(min_radius..max_radius)
        } else {
            min_radius
        };
        let position = self.arena.clamp(self.arena.random_position(rng), radius);
        let color = Color::random(rng);
        self.food.push(Food::new(position, radius, color));
    }

    pub fn spawn_bot(&mut self, rng: &mut impl Rng, min_radius: f32, max_radius: f32) {
        let radius = if max_radius > min_radius {
            rng.random_range(min_radius..max_radius)
        } else {
            min_radius
        };
        let position = self.arena.clamp(self.arena.random_position(rng), radius);
        let color = Color::random(rng);
        let id = self.next_id();
        self.bots.push(Bot::new(id, position, radius, color));
    }

    pub fn spawn_virus(&mut self, rng: &mut impl Rng, radius: f32) {
        let position = self.arena.clamp(self.arena.random_position(rng), radius);
        self.viruses.push(Virus::new(position, radius));
    }

    /// Drop everything marked removed this tick. Resolver passes mark
    /// entities instead of splicing mid-iteration; this is the only
    /// place collections shrink.
    pub fn compact(&mut self) {
        self.cells.retain(|c| !c.removed);
        self.bots.retain(|b| !b.removed);
        self.food.retain(|f| !f.removed);
        self.viruses.retain(|v| !v.removed);
        self.pellets.retain(|p| !p.removed);
    }

    /// Restore the pooled entity kinds to their configured counts.
    pub fn refill(&mut self, rng: &mut impl Rng, config: &Config) {
        while self.food.len() < config.arena.food_count {
            self.spawn_food(rng, config.food.min_radius, config.food.max_radius);
        }
        while self.bots.len() < config.arena.bot_count {
            self.spawn_bot(rng, config.bot.min_radius, config.bot.max_radius);
        }
        while self.viruses.len() < config.arena.virus_count {
            self.spawn_virus(rng, config.virus.radius);
        }
    }

    /// Combined area of all player cells.
    pub fn total_player_mass(&self) -> f32 {
        self.cells.iter().map(|c| growth::area(c.radius)).sum()
    }
}
