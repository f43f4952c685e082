//! Bot AI.

mod controller;

pub use controller::{decide, Steering};
