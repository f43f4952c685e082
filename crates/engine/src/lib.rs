//! Petri arena simulation engine.
//!
//! A single-player mass-absorption arena: the player's cells, bots,
//! food, and viruses move, collide, consume, split, and merge inside
//! a bounded square arena. The engine takes a normalized intent
//! vector plus split/eject commands each tick and exposes a read-only
//! snapshot and a stream of discrete events; rendering, input
//! capture, audio, and progression live outside.

pub mod ai;
pub mod collision;
pub mod config;
pub mod entity;
pub mod error;
pub mod events;
pub mod game;
pub mod growth;
pub mod physics;
pub mod world;

// Re-export commonly used types
pub use config::Config;
pub use error::ConfigError;
pub use events::{GameEvent, VictimKind};
pub use game::{Game, Snapshot, TickInput};
pub use world::{Arena, World};
