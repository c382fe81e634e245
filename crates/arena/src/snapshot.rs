//! Owned copies of simulation state for the renderer and HUD.

use engine_core::{Aabb, Entity, Health, TransformRaw, Vec3};

use crate::effects::VisualEffect;
use crate::enemy::{EnemyKind, EnemyState};

#[derive(Debug, Clone, Copy)]
pub struct PlayerView {
    /// Camera position.
    pub eye: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    /// Camera model matrix (yaw and pitch applied).
    pub view: TransformRaw,
    pub bounds: Aabb,
    pub is_dodging: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct EnemyView {
    pub entity: Entity,
    pub kind: EnemyKind,
    pub state: EnemyState,
    pub model: TransformRaw,
    pub bounds: Aabb,
    pub health: Health,
    /// Damage flash active this frame.
    pub flashing: bool,
}

/// Everything the renderer needs to draw one frame.
#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub elapsed: f32,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub obstacles: Vec<Aabb>,
    pub effects: Vec<VisualEffect>,
}

impl SceneSnapshot {
    pub fn enemy(&self, entity: Entity) -> Option<&EnemyView> {
        self.enemies.iter().find(|e| e.entity == entity)
    }
}
