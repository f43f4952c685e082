//! Virus hazard.

use glam::Vec2;

/// A static hazard. Cells large enough to pop it fragment on contact.
/// The pool size is held constant by respawn.
#[derive(Debug, Clone)]
pub struct Virus {
    pub position: Vec2,
    pub radius: f32,
    pub removed: bool,
}

impl Virus {
    pub fn new(position: Vec2, radius: f32) -> Self {
        Self {
            position,
            radius,
            removed: false,
        }
    }
}
