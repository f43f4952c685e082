//! Game state and the per-tick simulation step.
//!
//! One `tick` runs to completion before the next; every collection is
//! mutated synchronously by it and nothing else. Within a pass,
//! consumed entities are marked and skipped, never spliced, and the
//! world is compacted once at the end of the tick.

use crate::ai;
use crate::collision;
use crate::config::Config;
use crate::entity::{Bot, Cell, Color, Food, Pellet, Virus};
use crate::error::ConfigError;
use crate::events::{GameEvent, VictimKind};
use crate::growth;
use crate::physics;
use crate::world::{Arena, World};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

/// Pull factor applied to a merge-eligible pair each tick.
const MERGE_PULL: f32 = 0.08;
/// Fraction of the summed radii below which an eligible pair fuses.
const FUSE_DISTANCE_FACTOR: f32 = 0.6;
/// Facing used for split/eject when the intent vector is zero.
const DEFAULT_FACING: Vec2 = Vec2::new(0.0, 1.0);

/// Input for a single tick.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Normalized steering intent, each component in [-1, 1],
    /// magnitude at most 1. Sanitized defensively on entry.
    pub intent: Vec2,
    /// Split every qualifying cell this tick.
    pub split: bool,
    /// Eject mass from every qualifying cell this tick.
    pub eject: bool,
}

/// Read-only view of the world for rendering collaborators.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub arena: Arena,
    pub cells: &'a [Cell],
    pub bots: &'a [Bot],
    pub food: &'a [Food],
    pub viruses: &'a [Virus],
    pub pellets: &'a [Pellet],
}

/// The whole simulation: configuration, world, and tick driver.
#[derive(Debug)]
pub struct Game {
    pub config: Config,
    pub world: World,
    pub tick_count: u64,

    rng: SmallRng,
    events: Vec<GameEvent>,
    last_eject_tick: Option<u64>,
    player_alive: bool,
}

impl Game {
    /// Create a game, spawn the entity pools, and start the first
    /// round with a single player cell.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };

        let world = World::new(config.arena.size);
        let mut game = Self {
            config,
            world,
            tick_count: 0,
            rng,
            events: Vec::with_capacity(32),
            last_eject_tick: None,
            player_alive: false,
        };
        game.world.refill(&mut game.rng, &game.config);
        game.respawn_player();
        Ok(game)
    }

    /// Events emitted by the most recent tick.
    #[inline]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Whether the player currently has any cells.
    #[inline]
    pub fn player_alive(&self) -> bool {
        self.player_alive
    }

    /// Read-only entity view.
    #[inline]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            arena: self.world.arena,
            cells: &self.world.cells,
            bots: &self.world.bots,
            food: &self.world.food,
            viruses: &self.world.viruses,
            pellets: &self.world.pellets,
        }
    }

    /// Start a new round: one fresh cell at the configured starting
    /// radius, honoring a configured skin color when present.
    pub fn respawn_player(&mut self) {
        let color = match self.config.player.color {
            Some([r, g, b]) => Color::new(r, g, b),
            None => Color::random(&mut self.rng),
        };
        let radius = self.config.player.start_radius;
        let position = self
            .world
            .arena
            .clamp(self.world.arena.random_position(&mut self.rng), radius);
        let id = self.world.next_id();
        self.world.cells.clear();
        self.world
            .cells
            .push(Cell::new(id, position, radius, color, self.tick_count));
        self.player_alive = true;
    }

    /// Advance the world by one frame.
    pub fn tick(&mut self, input: &TickInput) {
        self.tick_count += 1;
        self.events.clear();

        // The intent is a plain copy from the input collaborator;
        // anything non-finite is treated as no input at all.
        let intent = sanitize_intent(input.intent);

        if input.split {
            self.split(intent);
        }
        if input.eject {
            self.eject(intent);
        }

        for cell in &mut self.world.cells {
            physics::integrate_cell(cell, intent, &self.world.arena, &self.config.physics);
        }

        self.resolve_siblings();
        self.resolve_player_collisions();

        self.update_bots();
        for bot in self.world.bots.iter_mut().filter(|b| !b.removed) {
            physics::integrate_bot(bot, &self.world.arena, &self.config.physics);
        }
        self.resolve_bot_collisions();

        self.update_pellets();

        self.world.compact();
        if self.player_alive && self.world.cells.is_empty() {
            self.player_alive = false;
            info!(tick = self.tick_count, "player died");
            self.events.push(GameEvent::PlayerDied);
        }
        self.world.refill(&mut self.rng, &self.config);
    }

    /// Split every qualifying cell toward the intent direction.
    /// Silently does nothing at the cell ceiling.
    fn split(&mut self, intent: Vec2) {
        let max_cells = self.config.player.max_cells;
        let min_split_radius = self.config.player.min_split_radius;
        let count = self.world.cells.len();
        if count == 0 || count >= max_cells {
            return;
        }

        let dir = facing(intent);
        let tick = self.tick_count;

        let mut spawned: Vec<(Vec2, f32, Color)> = Vec::new();
        for cell in self.world.cells.iter_mut() {
            if count + spawned.len() >= max_cells {
                break;
            }
            if cell.radius < min_split_radius {
                continue;
            }
            let new_radius = growth::split_radius(cell.radius);
            cell.radius = new_radius;
            // Both halves re-enter the Young state so the pair cannot
            // instantly re-fuse.
            cell.birth_tick = tick;
            spawned.push((cell.position + dir * new_radius, new_radius, cell.color));
        }

        if spawned.is_empty() {
            return;
        }
        debug!(tick, pieces = spawned.len(), "player split");

        let impulse = dir * self.config.player.split_impulse;
        for (position, radius, color) in spawned {
            let id = self.world.next_id();
            let position = self.world.arena.clamp(position, radius);
            let mut sibling = Cell::new(id, position, radius, color, tick);
            sibling.impulse = impulse;
            self.world.cells.push(sibling);
        }
    }

    /// Eject a mass pellet from every qualifying cell toward the
    /// intent direction. The removed mass travels as a pellet and can
    /// be re-eaten; nothing is silently duplicated or destroyed.
    fn eject(&mut self, intent: Vec2) {
        let cooldown = self.config.eject.cooldown_ticks;
        if self
            .last_eject_tick
            .is_some_and(|t| self.tick_count.saturating_sub(t) < cooldown)
        {
            return;
        }

        let mass_loss = self.config.eject.mass_loss;
        let pellet_radius = (mass_loss / std::f32::consts::PI).sqrt();
        let dir = facing(intent);
        let tick = self.tick_count;

        let mut pellets: Vec<Pellet> = Vec::new();
        for cell in self.world.cells.iter_mut() {
            if cell.radius < self.config.player.min_eject_radius {
                continue;
            }
            let Some(new_radius) = growth::shrink(cell.radius, mass_loss) else {
                continue;
            };
            cell.radius = new_radius;

            // Slight angular spread so a stream of pellets fans out.
            let jitter = self.rng.random_range(-0.3..0.3f32);
            let (sin, cos) = (dir.y.atan2(dir.x) + jitter).sin_cos();
            let spread = Vec2::new(cos, sin);

            let position = self
                .world
                .arena
                .clamp(cell.position + spread * (new_radius + pellet_radius), pellet_radius);
            pellets.push(Pellet::new(
                position,
                pellet_radius,
                cell.color,
                spread * self.config.eject.pellet_speed,
                tick,
            ));
        }
        // The cooldown only arms when something actually ejected;
        // pressing eject while undersized costs nothing.
        if !pellets.is_empty() {
            self.last_eject_tick = Some(tick);
        }
        self.world.pellets.extend(pellets);
    }

    /// Resolve interactions among the player's own cells: pull and
    /// fuse mature pairs, push apart overlapping pairs that include a
    /// Young cell.
    fn resolve_siblings(&mut self) {
        let merge_delay = self.config.player.merge_delay_ticks;
        let tick = self.tick_count;
        let arena = self.world.arena;
        let n = self.world.cells.len();

        for i in 0..n {
            for j in (i + 1)..n {
                if self.world.cells[i].removed || self.world.cells[j].removed {
                    continue;
                }

                let a = &self.world.cells[i];
                let b = &self.world.cells[j];
                let both_mature =
                    a.is_mature(tick, merge_delay) && b.is_mature(tick, merge_delay);
                let delta = b.position - a.position;
                let dist = delta.length();
                let (a_radius, b_radius) = (a.radius, b.radius);

                if both_mature {
                    // Draw the pair together, then fuse once the
                    // centers are well inside the overlap.
                    let pull = delta * MERGE_PULL;
                    self.world.cells[i].position += pull;
                    self.world.cells[j].position -= pull;

                    if dist < (a_radius + b_radius) * FUSE_DISTANCE_FACTOR {
                        let merged = growth::merge_radius(a_radius, b_radius);
                        let survivor = &mut self.world.cells[i];
                        survivor.radius = merged;
                        survivor.position = arena.clamp(survivor.position, merged);
                        self.world.cells[j].removed = true;
                        debug!(tick, radius = merged, "cells fused");
                    }
                } else if let Some(push) =
                    collision::separation_push(a.position, a_radius, b.position, b_radius)
                {
                    let a = &mut self.world.cells[i];
                    a.position = arena.clamp(a.position + push, a_radius);
                    let b = &mut self.world.cells[j];
                    b.position = arena.clamp(b.position - push, b_radius);
                }
            }
        }
    }

    /// Player-cell resolver pass. Order per cell is food, then
    /// pellets, then predation, then virus; preserved for
    /// deterministic tests.
    fn resolve_player_collisions(&mut self) {
        let ratio = self.config.combat.predation_ratio;
        let food_gain = self.config.food.mass_gain;
        let overlap_factor = self.config.virus.overlap_factor;

        for ci in 0..self.world.cells.len() {
            if self.world.cells[ci].removed {
                continue;
            }

            self.eat_food_around(EaterRef::Cell(ci), food_gain, true);
            self.eat_pellets_around(EaterRef::Cell(ci), true);

            // Predation against bots, checked in both directions.
            for bi in 0..self.world.bots.len() {
                if self.world.cells[ci].removed {
                    break;
                }
                if self.world.bots[bi].removed {
                    continue;
                }
                let cell = &self.world.cells[ci];
                let bot = &self.world.bots[bi];
                if !collision::predation_contact(
                    cell.position,
                    cell.radius,
                    bot.position,
                    bot.radius,
                ) {
                    continue;
                }

                if collision::may_eat(cell.radius, bot.radius, ratio) {
                    let gain = growth::area(bot.radius);
                    if let Some(new_radius) = growth::grow(cell.radius, gain) {
                        EaterRef::Cell(ci).set_radius(&mut self.world, new_radius);
                        self.world.bots[bi].removed = true;
                        self.events.push(GameEvent::EntityEaten {
                            victim: VictimKind::Bot,
                            mass_gained: gain,
                        });
                    }
                } else if collision::may_eat(bot.radius, cell.radius, ratio) {
                    let loss = growth::area(cell.radius);
                    if let Some(new_radius) = growth::grow(bot.radius, loss) {
                        EaterRef::Bot(bi).set_radius(&mut self.world, new_radius);
                        self.world.cells[ci].removed = true;
                        self.events.push(GameEvent::EntityEaten {
                            victim: VictimKind::Cell,
                            mass_gained: loss,
                        });
                    }
                }
            }

            if self.world.cells[ci].removed {
                continue;
            }

            // Viruses last: a cell may feed and then pop in one tick.
            for vi in 0..self.world.viruses.len() {
                if self.world.viruses[vi].removed {
                    continue;
                }
                let cell = &self.world.cells[ci];
                let virus = &self.world.viruses[vi];
                if !collision::virus_contact(
                    cell.position,
                    cell.radius,
                    virus.position,
                    overlap_factor,
                ) {
                    continue;
                }
                if !collision::may_eat(cell.radius, virus.radius, ratio) {
                    continue;
                }

                self.world.viruses[vi].removed = true;
                let fragments = self.explode_cell(ci);
                self.events.push(GameEvent::VirusPopped { fragments });
                debug!(tick = self.tick_count, fragments, "virus popped");
                break;
            }
        }
    }

    /// Bot resolver pass: food, pellets, then predation against the
    /// player's cells (symmetric, same gate as the player pass).
    fn resolve_bot_collisions(&mut self) {
        let ratio = self.config.combat.predation_ratio;
        let food_gain = self.config.food.mass_gain;

        for bi in 0..self.world.bots.len() {
            if self.world.bots[bi].removed {
                continue;
            }

            self.eat_food_around(EaterRef::Bot(bi), food_gain, false);
            self.eat_pellets_around(EaterRef::Bot(bi), false);

            for ci in 0..self.world.cells.len() {
                if self.world.bots[bi].removed {
                    break;
                }
                if self.world.cells[ci].removed {
                    continue;
                }
                let bot = &self.world.bots[bi];
                let cell = &self.world.cells[ci];
                if !collision::predation_contact(
                    bot.position,
                    bot.radius,
                    cell.position,
                    cell.radius,
                ) {
                    continue;
                }

                if collision::may_eat(bot.radius, cell.radius, ratio) {
                    let gain = growth::area(cell.radius);
                    if let Some(new_radius) = growth::grow(bot.radius, gain) {
                        EaterRef::Bot(bi).set_radius(&mut self.world, new_radius);
                        self.world.cells[ci].removed = true;
                        self.events.push(GameEvent::EntityEaten {
                            victim: VictimKind::Cell,
                            mass_gained: gain,
                        });
                    }
                } else if collision::may_eat(cell.radius, bot.radius, ratio) {
                    let gain = growth::area(bot.radius);
                    if let Some(new_radius) = growth::grow(cell.radius, gain) {
                        EaterRef::Cell(ci).set_radius(&mut self.world, new_radius);
                        self.world.bots[bi].removed = true;
                        self.events.push(GameEvent::EntityEaten {
                            victim: VictimKind::Bot,
                            mass_gained: gain,
                        });
                    }
                }
            }
        }
    }

    /// Absorb every food item whose center lies inside the eater.
    fn eat_food_around(&mut self, eater: EaterRef, mass_gain: f32, emit: bool) {
        for fi in 0..self.world.food.len() {
            if self.world.food[fi].removed {
                continue;
            }
            let (position, radius) = eater.geometry(&self.world);
            if !collision::eats_food(position, radius, self.world.food[fi].position) {
                continue;
            }
            let Some(new_radius) = growth::grow(radius, mass_gain) else {
                continue;
            };
            eater.set_radius(&mut self.world, new_radius);
            self.world.food[fi].removed = true;
            if emit {
                self.events.push(GameEvent::FoodEaten {
                    mass_gained: mass_gain,
                });
            }
        }
    }

    /// Absorb pellets with the same radius-only test as food. The
    /// gain is the pellet's exact area, so eject-then-eat is lossless.
    fn eat_pellets_around(&mut self, eater: EaterRef, emit: bool) {
        for pi in 0..self.world.pellets.len() {
            if self.world.pellets[pi].removed {
                continue;
            }
            let (position, radius) = eater.geometry(&self.world);
            if !collision::eats_food(position, radius, self.world.pellets[pi].position) {
                continue;
            }
            let gain = growth::area(self.world.pellets[pi].radius);
            let Some(new_radius) = growth::grow(radius, gain) else {
                continue;
            };
            eater.set_radius(&mut self.world, new_radius);
            self.world.pellets[pi].removed = true;
            if emit {
                self.events.push(GameEvent::EntityEaten {
                    victim: VictimKind::Pellet,
                    mass_gained: gain,
                });
            }
        }
    }

    /// Fragment a cell that popped a virus into a radial fan. Every
    /// piece and the surviving original holds an equal share of the
    /// original area; the cell cap is never exceeded.
    fn explode_cell(&mut self, ci: usize) -> usize {
        let max_cells = self.config.player.max_cells;
        let alive = self.world.cells.iter().filter(|c| !c.removed).count();
        if alive >= max_cells {
            return 0;
        }
        let pieces = self.config.virus.max_fragments.min(max_cells - alive);
        if pieces == 0 {
            return 0;
        }

        let tick = self.tick_count;
        let total_area = growth::area(self.world.cells[ci].radius);
        let share_radius = growth::radius_from_area(total_area / (pieces + 1) as f32);

        let origin = {
            let cell = &mut self.world.cells[ci];
            cell.radius = share_radius;
            cell.birth_tick = tick;
            (cell.position, cell.color)
        };

        let impulse = self.config.player.explode_impulse;
        for k in 0..pieces {
            let angle = std::f32::consts::TAU / pieces as f32 * k as f32;
            let dir = Vec2::new(angle.cos(), angle.sin());
            let id = self.world.next_id();
            let mut piece = Cell::new(id, origin.0, share_radius, origin.1, tick);
            piece.impulse = dir * impulse;
            self.world.cells.push(piece);
        }
        pieces
    }

    /// Run the steering decision for every bot and apply it.
    fn update_bots(&mut self) {
        for i in 0..self.world.bots.len() {
            if self.world.bots[i].removed {
                continue;
            }
            let steering = ai::decide(
                &self.world.bots[i],
                &self.world.cells,
                &self.world.bots,
                &self.world.viruses,
                &self.world.food,
                &self.world.arena,
                &self.config,
                &mut self.rng,
            );

            let interval = self.config.bot.wander_interval_ticks;
            let bot = &mut self.world.bots[i];
            bot.target = steering.target;
            bot.wander_timer = if steering.wandered {
                interval
            } else {
                bot.wander_timer.saturating_sub(1)
            };
            if let Some(position) = steering.lunge_to {
                bot.position = position;
            }
        }
    }

    /// Move pellets on their decaying impulse and expire old ones.
    fn update_pellets(&mut self) {
        let ttl = self.config.eject.pellet_ttl_ticks;
        let tick = self.tick_count;
        for pellet in self.world.pellets.iter_mut().filter(|p| !p.removed) {
            physics::integrate_pellet(pellet, &self.world.arena, &self.config.physics);
            if tick.saturating_sub(pellet.spawn_tick) >= ttl {
                pellet.removed = true;
            }
        }
    }
}

/// Which entity is doing the eating in a shared feed pass.
#[derive(Clone, Copy)]
enum EaterRef {
    Cell(usize),
    Bot(usize),
}

impl EaterRef {
    fn geometry(self, world: &World) -> (Vec2, f32) {
        match self {
            EaterRef::Cell(i) => (world.cells[i].position, world.cells[i].radius),
            EaterRef::Bot(i) => (world.bots[i].position, world.bots[i].radius),
        }
    }

    fn set_radius(self, world: &mut World, radius: f32) {
        // Growth near a wall can leave the center too close to it, so
        // re-clamp against the new radius.
        let arena = world.arena;
        match self {
            EaterRef::Cell(i) => {
                let cell = &mut world.cells[i];
                cell.radius = radius;
                cell.position = arena.clamp(cell.position, radius);
            }
            EaterRef::Bot(i) => {
                let bot = &mut world.bots[i];
                bot.radius = radius;
                bot.position = arena.clamp(bot.position, radius);
            }
        }
    }
}

/// Copy and sanitize the cross-boundary intent vector: non-finite
/// input counts as no input, magnitude is capped at 1.
fn sanitize_intent(intent: Vec2) -> Vec2 {
    if !intent.is_finite() {
        return Vec2::ZERO;
    }
    intent.clamp_length_max(1.0)
}

/// Direction for split/eject; straight up when there is no intent.
fn facing(intent: Vec2) -> Vec2 {
    if intent.length_squared() < 1e-6 {
        DEFAULT_FACING
    } else {
        intent.normalize()
    }
}
