//! Collision groups and filtering.

use rapier3d::prelude::*;

/// Collision groups for scene colliders.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionGroup {
    /// Static arena geometry (walls, cover, platforms)
    Environment = 1 << 0,
    /// Enemy agents
    Enemy = 1 << 1,
}

impl CollisionGroup {
    /// Membership/filter pair for static arena geometry.
    pub fn environment() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Environment as u32),
            Group::ALL,
        )
    }

    /// Membership/filter pair for enemies.
    pub fn enemy() -> InteractionGroups {
        InteractionGroups::new(
            Group::from_bits_retain(Self::Enemy as u32),
            Group::from_bits_retain(Self::Environment as u32 | Self::Enemy as u32),
        )
    }
}
