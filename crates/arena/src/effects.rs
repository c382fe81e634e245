//! Short-lived shot effects handed to the renderer: muzzle flashes and hit markers.
//! Each carries its own lifetime and is dropped on expiry. Enemy damage flashes
//! live on the enemy itself.

use engine_core::{Lifetime, Vec3};

pub const MUZZLE_FLASH_SECS: f32 = 0.05;
pub const HIT_MARKER_SECS: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectKind {
    /// Flash at the weapon muzzle (camera eye).
    MuzzleFlash { point: Vec3 },
    /// Impact marker where a shot landed.
    HitMarker { point: Vec3 },
}

#[derive(Debug, Clone, Copy)]
pub struct VisualEffect {
    pub kind: EffectKind,
    pub lifetime: Lifetime,
}

impl VisualEffect {
    pub fn muzzle_flash(point: Vec3) -> Self {
        Self {
            kind: EffectKind::MuzzleFlash { point },
            lifetime: Lifetime::new(MUZZLE_FLASH_SECS),
        }
    }

    pub fn hit_marker(point: Vec3) -> Self {
        Self {
            kind: EffectKind::HitMarker { point },
            lifetime: Lifetime::new(HIT_MARKER_SECS),
        }
    }
}

/// Active shot effects.
#[derive(Debug, Default)]
pub struct Effects {
    active: Vec<VisualEffect>,
}

impl Effects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, effect: VisualEffect) {
        self.active.push(effect);
    }

    /// Age every effect by `dt` and drop the expired ones.
    pub fn update(&mut self, dt: f32) {
        self.active.retain_mut(|e| !e.lifetime.update(dt));
    }

    pub fn active(&self) -> &[VisualEffect] {
        &self.active
    }
}
