//! The arena: a fixed set of static obstacles built once at startup.

use engine_core::{Aabb, Vec3};
use physics::PhysicsWorld;

/// Half the side length of the square arena floor.
pub const ARENA_HALF_SIZE: f32 = 50.0;
const WALL_HEIGHT: f32 = 10.0;
const WALL_THICKNESS: f32 = 1.0;

/// Cover blocks and platforms inside the walls: (center, size).
const COVER_LAYOUT: [(Vec3, Vec3); 8] = [
    (Vec3::new(10.0, 1.0, 10.0), Vec3::new(4.0, 2.0, 1.0)),
    (Vec3::new(-10.0, 1.0, 10.0), Vec3::new(1.0, 2.0, 4.0)),
    (Vec3::new(10.0, 1.0, -10.0), Vec3::new(1.0, 2.0, 4.0)),
    (Vec3::new(-10.0, 1.0, -10.0), Vec3::new(4.0, 2.0, 1.0)),
    (Vec3::new(0.0, 1.5, 22.0), Vec3::new(6.0, 3.0, 2.0)),
    (Vec3::new(0.0, 1.5, -22.0), Vec3::new(6.0, 3.0, 2.0)),
    // Low platforms
    (Vec3::new(25.0, 0.5, 0.0), Vec3::new(8.0, 1.0, 8.0)),
    (Vec3::new(-25.0, 0.5, 0.0), Vec3::new(8.0, 1.0, 8.0)),
];

/// Static collision surface of the arena. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Arena {
    obstacles: Vec<Aabb>,
}

impl Arena {
    /// Build the standard arena layout: four boundary walls plus cover and platforms.
    pub fn new() -> Self {
        let h = ARENA_HALF_SIZE;
        let t = WALL_THICKNESS;
        let y = WALL_HEIGHT * 0.5;
        let mut obstacles = vec![
            Aabb::from_center_size(Vec3::new(0.0, y, -h), Vec3::new(2.0 * h, WALL_HEIGHT, t)),
            Aabb::from_center_size(Vec3::new(0.0, y, h), Vec3::new(2.0 * h, WALL_HEIGHT, t)),
            Aabb::from_center_size(Vec3::new(-h, y, 0.0), Vec3::new(t, WALL_HEIGHT, 2.0 * h)),
            Aabb::from_center_size(Vec3::new(h, y, 0.0), Vec3::new(t, WALL_HEIGHT, 2.0 * h)),
        ];
        obstacles.extend(
            COVER_LAYOUT
                .iter()
                .map(|(center, size)| Aabb::from_center_size(*center, *size)),
        );
        Self { obstacles }
    }

    /// Arena made of the given obstacles only.
    pub fn from_obstacles(obstacles: Vec<Aabb>) -> Self {
        Self { obstacles }
    }

    pub fn obstacles(&self) -> &[Aabb] {
        &self.obstacles
    }

    /// Does `bounds` overlap any obstacle?
    pub fn intersects(&self, bounds: &Aabb) -> bool {
        self.first_intersection(bounds).is_some()
    }

    /// First obstacle that `bounds` overlaps, if any.
    pub fn first_intersection(&self, bounds: &Aabb) -> Option<&Aabb> {
        self.obstacles.iter().find(|o| o.intersects(bounds))
    }

    /// Register every obstacle as a static collider so hit-scan rays stop on it.
    pub fn register_colliders(&self, scene: &mut PhysicsWorld) {
        for obstacle in &self.obstacles {
            scene.add_static_box(obstacle);
        }
        log::info!("Arena built with {} obstacles", self.obstacles.len());
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}
