//! Game entities.
//!
//! One closed struct per kind; all fields always present. Entities
//! never hold references to other entities, only plain values.

mod bot;
mod cell;
mod food;
mod pellet;
mod virus;

pub use bot::Bot;
pub use cell::Cell;
pub use food::Food;
pub use pellet::Pellet;
pub use virus::Virus;

use rand::Rng;

/// RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A random, reasonably bright color.
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::new(
            rng.random_range(50..=255),
            rng.random_range(50..=255),
            rng.random_range(50..=255),
        )
    }
}
