//! Scene queries for the arena using Rapier3D.
//!
//! Only the query side of Rapier is used: colliders are placed directly by
//! the game each tick and the query pipeline answers hit-scan rays.

pub mod collision;
pub mod physics_world;
pub mod raycast;

pub use collision::*;
pub use physics_world::*;
pub use raycast::*;

// Re-export Rapier for downstream crates
pub use rapier3d;

// Re-export common Rapier types
pub use rapier3d::prelude::ColliderHandle;
