//! Engine configuration.
//!
//! All tunable numbers live here as one authoritative table. The
//! defaults below are the reference balance set; nothing in the
//! simulation hardcodes a gameplay constant.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// RNG seed; set for reproducible runs, omit for entropy seeding.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Tick interval for the host loop in milliseconds.
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub physics: PhysicsConfig,
    #[serde(default)]
    pub food: FoodConfig,
    #[serde(default)]
    pub virus: VirusConfig,
    #[serde(default)]
    pub combat: CombatConfig,
    #[serde(default)]
    pub eject: EjectConfig,
    #[serde(default)]
    pub bot: BotConfig,
}

impl Config {
    /// Load configuration from `config.toml` or use defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Path::new("config.toml");
        let config: Config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents)?
        } else {
            info!("No config.toml found, creating default config");
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            default_config
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.arena.size > 0.0 && self.arena.size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "arena.size must be positive and finite, got {}",
                self.arena.size
            )));
        }
        if self.player.max_cells == 0 {
            return Err(ConfigError::Invalid(
                "player.max_cells must be at least 1".into(),
            ));
        }
        if !(self.player.start_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "player.start_radius must be positive, got {}",
                self.player.start_radius
            )));
        }
        if !(self.combat.predation_ratio >= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "combat.predation_ratio must be >= 1.0, got {}",
                self.combat.predation_ratio
            )));
        }
        if !(self.physics.friction > 0.0 && self.physics.friction < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.friction must be in (0, 1), got {}",
                self.physics.friction
            )));
        }
        if !(self.physics.impulse_decay > 0.0 && self.physics.impulse_decay < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "physics.impulse_decay must be in (0, 1), got {}",
                self.physics.impulse_decay
            )));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            tick_interval_ms: default_tick_interval(),
            arena: ArenaConfig::default(),
            player: PlayerConfig::default(),
            physics: PhysicsConfig::default(),
            food: FoodConfig::default(),
            virus: VirusConfig::default(),
            combat: CombatConfig::default(),
            eject: EjectConfig::default(),
            bot: BotConfig::default(),
        }
    }
}

fn default_tick_interval() -> u64 {
    16
}

/// Arena bounds and entity pool counts.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArenaConfig {
    /// Side length of the square arena.
    #[serde(default = "default_arena_size")]
    pub size: f32,
    /// Food pool size, held constant by respawn.
    #[serde(default = "default_food_count")]
    pub food_count: usize,
    /// Bot pool size, held constant by respawn.
    #[serde(default = "default_bot_count")]
    pub bot_count: usize,
    /// Virus pool size, held constant by respawn.
    #[serde(default = "default_virus_count")]
    pub virus_count: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            size: default_arena_size(),
            food_count: default_food_count(),
            bot_count: default_bot_count(),
            virus_count: default_virus_count(),
        }
    }
}

fn default_arena_size() -> f32 {
    3000.0
}
fn default_food_count() -> usize {
    600
}
fn default_bot_count() -> usize {
    30
}
fn default_virus_count() -> usize {
    25
}

/// Player configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerConfig {
    /// Starting cell radius (a starting-mass unlock raises this).
    #[serde(default = "default_start_radius")]
    pub start_radius: f32,
    /// Hard ceiling on the number of player cells.
    #[serde(default = "default_max_cells")]
    pub max_cells: usize,
    /// Minimum radius a cell needs before it may split.
    #[serde(default = "default_min_split_radius")]
    pub min_split_radius: f32,
    /// Minimum radius a cell needs before it may eject.
    #[serde(default = "default_min_eject_radius")]
    pub min_eject_radius: f32,
    /// Ticks a cell stays Young (merge-ineligible) after creation.
    #[serde(default = "default_merge_delay_ticks")]
    pub merge_delay_ticks: u64,
    /// Impulse magnitude given to a freshly split sibling.
    #[serde(default = "default_split_impulse")]
    pub split_impulse: f32,
    /// Impulse magnitude given to virus-pop fragments.
    #[serde(default = "default_explode_impulse")]
    pub explode_impulse: f32,
    /// Fixed cell color as RGB (a skin unlock); random when unset.
    #[serde(default)]
    pub color: Option<[u8; 3]>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_radius: default_start_radius(),
            max_cells: default_max_cells(),
            min_split_radius: default_min_split_radius(),
            min_eject_radius: default_min_eject_radius(),
            merge_delay_ticks: default_merge_delay_ticks(),
            split_impulse: default_split_impulse(),
            explode_impulse: default_explode_impulse(),
            color: None,
        }
    }
}

fn default_start_radius() -> f32 {
    30.0
}
fn default_max_cells() -> usize {
    16
}
fn default_min_split_radius() -> f32 {
    35.0
}
fn default_min_eject_radius() -> f32 {
    35.0
}
fn default_merge_delay_ticks() -> u64 {
    720 // 12 s at 60 Hz
}
fn default_split_impulse() -> f32 {
    40.0
}
fn default_explode_impulse() -> f32 {
    20.0
}

/// Movement integration constants.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PhysicsConfig {
    /// Base term of the mass-dependent speed curve.
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,
    /// Exponent of the radius decay term (speed ~ r^-k).
    #[serde(default = "default_speed_exponent")]
    pub speed_exponent: f32,
    /// Overall speed scale.
    #[serde(default = "default_speed_scale")]
    pub speed_scale: f32,
    /// Speed floor so very large cells stay controllable.
    #[serde(default = "default_min_speed")]
    pub min_speed: f32,
    /// Fraction of max speed gained toward intent per tick.
    #[serde(default = "default_acceleration")]
    pub acceleration: f32,
    /// Per-tick velocity damping factor.
    #[serde(default = "default_friction")]
    pub friction: f32,
    /// Per-tick geometric decay of impulse velocity.
    #[serde(default = "default_impulse_decay")]
    pub impulse_decay: f32,
    /// Impulse magnitude below which it is clamped to zero.
    #[serde(default = "default_impulse_epsilon")]
    pub impulse_epsilon: f32,
    /// Base term of the bot speed curve.
    #[serde(default = "default_bot_base_speed")]
    pub bot_base_speed: f32,
    /// Radius exponent of the bot speed curve.
    #[serde(default = "default_bot_speed_exponent")]
    pub bot_speed_exponent: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            speed_exponent: default_speed_exponent(),
            speed_scale: default_speed_scale(),
            min_speed: default_min_speed(),
            acceleration: default_acceleration(),
            friction: default_friction(),
            impulse_decay: default_impulse_decay(),
            impulse_epsilon: default_impulse_epsilon(),
            bot_base_speed: default_bot_base_speed(),
            bot_speed_exponent: default_bot_speed_exponent(),
        }
    }
}

fn default_base_speed() -> f32 {
    4.0
}
fn default_speed_exponent() -> f32 {
    0.35
}
fn default_speed_scale() -> f32 {
    6.0
}
fn default_min_speed() -> f32 {
    0.8
}
fn default_acceleration() -> f32 {
    0.15
}
fn default_friction() -> f32 {
    0.92
}
fn default_impulse_decay() -> f32 {
    0.9
}
fn default_impulse_epsilon() -> f32 {
    0.01
}
fn default_bot_base_speed() -> f32 {
    2.0
}
fn default_bot_speed_exponent() -> f32 {
    0.3
}

/// Food configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FoodConfig {
    #[serde(default = "default_food_min_radius")]
    pub min_radius: f32,
    #[serde(default = "default_food_max_radius")]
    pub max_radius: f32,
    /// Mass (area) gained per food item eaten.
    #[serde(default = "default_food_mass_gain")]
    pub mass_gain: f32,
}

impl Default for FoodConfig {
    fn default() -> Self {
        Self {
            min_radius: default_food_min_radius(),
            max_radius: default_food_max_radius(),
            mass_gain: default_food_mass_gain(),
        }
    }
}

fn default_food_min_radius() -> f32 {
    5.0
}
fn default_food_max_radius() -> f32 {
    8.0
}
fn default_food_mass_gain() -> f32 {
    30.0
}

/// Virus configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct VirusConfig {
    /// Fixed virus radius; doubles as the hazard size threshold.
    #[serde(default = "default_virus_radius")]
    pub radius: f32,
    /// Fraction of the cell radius used for the overlap test.
    #[serde(default = "default_virus_overlap_factor")]
    pub overlap_factor: f32,
    /// Maximum fragments a pop can produce.
    #[serde(default = "default_virus_max_fragments")]
    pub max_fragments: usize,
}

impl Default for VirusConfig {
    fn default() -> Self {
        Self {
            radius: default_virus_radius(),
            overlap_factor: default_virus_overlap_factor(),
            max_fragments: default_virus_max_fragments(),
        }
    }
}

fn default_virus_radius() -> f32 {
    70.0
}
fn default_virus_overlap_factor() -> f32 {
    0.9
}
fn default_virus_max_fragments() -> usize {
    8
}

/// Predation rules.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CombatConfig {
    /// Minimum attacker/victim radius ratio for consumption.
    #[serde(default = "default_predation_ratio")]
    pub predation_ratio: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            predation_ratio: default_predation_ratio(),
        }
    }
}

fn default_predation_ratio() -> f32 {
    1.1
}

/// Mass ejection configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EjectConfig {
    /// Mass (area) removed from the ejecting cell per pellet.
    #[serde(default = "default_eject_mass_loss")]
    pub mass_loss: f32,
    /// Initial pellet impulse magnitude.
    #[serde(default = "default_pellet_speed")]
    pub pellet_speed: f32,
    /// Ticks before an uneaten pellet despawns.
    #[serde(default = "default_pellet_ttl")]
    pub pellet_ttl_ticks: u64,
    /// Ticks between eject commands.
    #[serde(default = "default_eject_cooldown")]
    pub cooldown_ticks: u64,
}

impl Default for EjectConfig {
    fn default() -> Self {
        Self {
            mass_loss: default_eject_mass_loss(),
            pellet_speed: default_pellet_speed(),
            pellet_ttl_ticks: default_pellet_ttl(),
            cooldown_ticks: default_eject_cooldown(),
        }
    }
}

fn default_eject_mass_loss() -> f32 {
    100.0
}
fn default_pellet_speed() -> f32 {
    25.0
}
fn default_pellet_ttl() -> u64 {
    600
}
fn default_eject_cooldown() -> u64 {
    2
}

/// Bot steering configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    /// Spawn radius range.
    #[serde(default = "default_bot_min_radius")]
    pub min_radius: f32,
    #[serde(default = "default_bot_max_radius")]
    pub max_radius: f32,
    /// Range within which other moving entities are considered.
    #[serde(default = "default_bot_vision_radius")]
    pub vision_radius: f32,
    /// Range of the food-seek fallback.
    #[serde(default = "default_bot_food_radius")]
    pub food_radius: f32,
    /// Weight of the flee term (per unit distance).
    #[serde(default = "default_flee_weight")]
    pub flee_weight: f32,
    /// Weight of the chase term (per unit distance).
    #[serde(default = "default_chase_weight")]
    pub chase_weight: f32,
    /// Extra clearance a cautious bot keeps from viruses.
    #[serde(default = "default_virus_margin")]
    pub virus_caution_margin: f32,
    /// Weight of virus repulsion; beats food seeking.
    #[serde(default = "default_virus_weight")]
    pub virus_caution_weight: f32,
    /// Radius above which a bot starts avoiding viruses.
    #[serde(default = "default_large_radius")]
    pub large_radius: f32,
    /// Ticks between wander waypoint re-rolls.
    #[serde(default = "default_wander_interval")]
    pub wander_interval_ticks: u32,
    /// Per-tick chance of a lunge at qualifying prey.
    #[serde(default = "default_lunge_chance")]
    pub lunge_chance: f32,
    /// Maximum distance a lunge covers.
    #[serde(default = "default_lunge_range")]
    pub lunge_range: f32,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            min_radius: default_bot_min_radius(),
            max_radius: default_bot_max_radius(),
            vision_radius: default_bot_vision_radius(),
            food_radius: default_bot_food_radius(),
            flee_weight: default_flee_weight(),
            chase_weight: default_chase_weight(),
            virus_caution_margin: default_virus_margin(),
            virus_caution_weight: default_virus_weight(),
            large_radius: default_large_radius(),
            wander_interval_ticks: default_wander_interval(),
            lunge_chance: default_lunge_chance(),
            lunge_range: default_lunge_range(),
        }
    }
}

fn default_bot_min_radius() -> f32 {
    20.0
}
fn default_bot_max_radius() -> f32 {
    50.0
}
fn default_bot_vision_radius() -> f32 {
    400.0
}
fn default_bot_food_radius() -> f32 {
    300.0
}
fn default_flee_weight() -> f32 {
    2.0
}
fn default_chase_weight() -> f32 {
    1.0
}
fn default_virus_margin() -> f32 {
    50.0
}
fn default_virus_weight() -> f32 {
    3.0
}
fn default_large_radius() -> f32 {
    60.0
}
fn default_wander_interval() -> u32 {
    90
}
fn default_lunge_chance() -> f32 {
    0.02
}
fn default_lunge_range() -> f32 {
    120.0
}
