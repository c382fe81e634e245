//! Scene collider registry backed by Rapier3D.
//!
//! Colliders have no parent bodies and nothing is stepped; the game places
//! them directly and rebuilds the query pipeline before casting rays.

use crate::collision::CollisionGroup;
use engine_core::{Aabb, Vec3};
use rapier3d::prelude::*;

/// Colliders the hit-scan rays are tested against.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub island_manager: IslandManager,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            island_manager: IslandManager::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Update query pipeline for raycasting.
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static cuboid matching an arena obstacle. It has no parent body.
    pub fn add_static_box(&mut self, bounds: &Aabb) -> ColliderHandle {
        let center = bounds.center();
        let half = bounds.half_extents();
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(CollisionGroup::environment())
            .build();
        self.collider_set.insert(collider)
    }

    /// Add a movable cuboid for an enemy; reposition it with `set_collider_translation`.
    pub fn add_enemy_box(&mut self, center: Vec3, size: Vec3) -> ColliderHandle {
        let half = size * 0.5;
        let collider = ColliderBuilder::cuboid(half.x, half.y, half.z)
            .translation(vector![center.x, center.y, center.z])
            .collision_groups(CollisionGroup::enemy())
            .build();
        self.collider_set.insert(collider)
    }

    /// Move a parentless collider.
    pub fn set_collider_translation(&mut self, handle: ColliderHandle, position: Vec3) {
        if let Some(collider) = self.collider_set.get_mut(handle) {
            collider.set_translation(vector![position.x, position.y, position.z]);
        }
    }

    /// Remove a collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}
