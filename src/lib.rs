//! Shadefield library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual simulation entry point.
//! This library crate exposes the same modules so that `tests/` integration
//! tests can import types, systems, and resources without spinning up the
//! full app by hand.

pub mod shared;
pub mod daycycle;
pub mod spatial;
pub mod shadow;
pub mod plants;
pub mod economy;
pub mod effects;
pub mod hostiles;
pub mod world;
pub mod data;
