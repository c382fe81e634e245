//! Weapon system: three hit-scan weapons with ammo, fire-rate and reload state.

use std::fmt;
use std::str::FromStr;

use engine_core::Vec3;
use physics::{PhysicsWorld, RaycastHit};

/// Rays are traced this far; the weapon's range decides whether the hit counts.
const MAX_TRACE_DISTANCE: f32 = 1000.0;

/// Weapons available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponId {
    /// Accurate sidearm, medium range.
    Pistol,
    /// Heavy close-range hitter.
    Shotgun,
    /// Fast-firing long-range rifle.
    Rifle,
}

impl WeaponId {
    pub const ALL: [WeaponId; 3] = [WeaponId::Pistol, WeaponId::Shotgun, WeaponId::Rifle];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponId::Pistol => "pistol",
            WeaponId::Shotgun => "shotgun",
            WeaponId::Rifle => "rifle",
        }
    }

    /// Weapon bound to a number-key slot (0-based).
    pub fn from_slot(slot: usize) -> Option<Self> {
        Self::ALL.get(slot).copied()
    }

    fn index(&self) -> usize {
        match self {
            WeaponId::Pistol => 0,
            WeaponId::Shotgun => 1,
            WeaponId::Rifle => 2,
        }
    }
}

impl fmt::Display for WeaponId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A weapon name that matches no configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown weapon `{0}`")]
pub struct UnknownWeapon(pub String);

impl FromStr for WeaponId {
    type Err = UnknownWeapon;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownWeapon(s.to_string()))
    }
}

/// Weapon instance with current state.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub id: WeaponId,
    pub damage: f32,
    pub range: f32,
    /// Minimum seconds between shots.
    pub fire_rate: f32,
    pub reload_time: f32,
    max_ammo: u32,

    // State
    ammo: u32,
    is_reloading: bool,
    last_fire_time: Option<f32>,
    reload_ready_at: Option<f32>,
}

impl Weapon {
    pub fn new(id: WeaponId) -> Self {
        let (damage, range, fire_rate, max_ammo, reload_time) = match id {
            WeaponId::Pistol => (20.0, 20.0, 0.5, 12, 1.5),
            WeaponId::Shotgun => (80.0, 10.0, 1.2, 6, 2.5),
            WeaponId::Rifle => (35.0, 50.0, 0.2, 30, 2.0),
        };

        Self {
            id,
            damage,
            range,
            fire_rate,
            reload_time,
            max_ammo,
            ammo: max_ammo,
            is_reloading: false,
            last_fire_time: None,
            reload_ready_at: None,
        }
    }

    pub fn name(&self) -> &'static str {
        self.id.name()
    }

    pub fn ammo(&self) -> u32 {
        self.ammo
    }

    pub fn max_ammo(&self) -> u32 {
        self.max_ammo
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// Check if weapon can fire at `now`.
    pub fn can_fire(&self, now: f32) -> bool {
        let cooled = self
            .last_fire_time
            .map_or(true, |last| now - last >= self.fire_rate);
        cooled && self.ammo > 0 && !self.is_reloading
    }

    /// Consume one round. Returns false (and changes nothing) if the weapon cannot fire.
    fn trigger(&mut self, now: f32) -> bool {
        if !self.can_fire(now) {
            return false;
        }
        self.ammo -= 1;
        self.last_fire_time = Some(now);
        true
    }

    /// Start reloading. Returns false if already reloading or full.
    fn start_reload(&mut self, now: f32) -> bool {
        if self.is_reloading || self.ammo == self.max_ammo {
            return false;
        }
        self.is_reloading = true;
        self.reload_ready_at = Some(now + self.reload_time);
        true
    }

    /// Finish the reload once its deadline has passed.
    fn poll_reload(&mut self, now: f32) -> bool {
        match self.reload_ready_at {
            Some(ready_at) if now >= ready_at => {
                self.ammo = self.max_ammo;
                self.is_reloading = false;
                self.reload_ready_at = None;
                true
            }
            _ => false,
        }
    }

    pub fn snapshot(&self) -> WeaponSnapshot {
        WeaponSnapshot {
            id: self.id,
            name: self.name(),
            ammo: self.ammo,
            max_ammo: self.max_ammo,
            is_reloading: self.is_reloading,
        }
    }
}

/// Read-only copy of a weapon's state for the HUD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponSnapshot {
    pub id: WeaponId,
    pub name: &'static str,
    pub ammo: u32,
    pub max_ammo: u32,
    pub is_reloading: bool,
}

/// Result of pulling the trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireOutcome {
    /// Reloading, empty, or still cooling down. Nothing changed.
    Rejected,
    /// A round was spent but nothing was hit within range.
    Miss,
    /// A round was spent and the ray hit a surface within range.
    Hit(RaycastHit),
}

impl FireOutcome {
    pub fn registered_hit(&self) -> bool {
        matches!(self, FireOutcome::Hit(_))
    }

    pub fn fired(&self) -> bool {
        !matches!(self, FireOutcome::Rejected)
    }
}

/// The player's three weapons and which one is in hand.
#[derive(Debug, Clone)]
pub struct WeaponSystem {
    weapons: [Weapon; 3],
    current: WeaponId,
}

impl WeaponSystem {
    pub fn new() -> Self {
        Self {
            weapons: WeaponId::ALL.map(Weapon::new),
            current: WeaponId::Pistol,
        }
    }

    pub fn current_id(&self) -> WeaponId {
        self.current
    }

    pub fn current(&self) -> &Weapon {
        self.weapon(self.current)
    }

    pub fn weapon(&self, id: WeaponId) -> &Weapon {
        &self.weapons[id.index()]
    }

    fn current_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.current.index()]
    }

    /// Switch by name. Unknown names are ignored and return false.
    pub fn switch_weapon(&mut self, id: &str) -> bool {
        match id.parse::<WeaponId>() {
            Ok(id) => self.select(id),
            Err(e) => {
                log::debug!("Weapon switch ignored: {}", e);
                false
            }
        }
    }

    /// Make `id` the active weapon. Ammo and reload state of both weapons are untouched.
    pub fn select(&mut self, id: WeaponId) -> bool {
        if self.current != id {
            log::debug!("Switched weapon {} -> {}", self.current, id);
        }
        self.current = id;
        true
    }

    /// Complete any reloads whose deadline has passed. Call once per tick.
    pub fn update(&mut self, now: f32) {
        for weapon in &mut self.weapons {
            if weapon.poll_reload(now) {
                log::debug!("{} reloaded ({} rounds)", weapon.name(), weapon.ammo);
            }
        }
    }

    /// Fire the active weapon from `origin` along `direction` into `scene`.
    pub fn fire(
        &mut self,
        now: f32,
        origin: Vec3,
        direction: Vec3,
        scene: &PhysicsWorld,
    ) -> FireOutcome {
        self.update(now);
        let weapon = self.current_mut();
        if !weapon.trigger(now) {
            return FireOutcome::Rejected;
        }

        match scene.raycast(origin, direction, MAX_TRACE_DISTANCE) {
            Some(hit) if hit.distance <= weapon.range => FireOutcome::Hit(hit),
            _ => FireOutcome::Miss,
        }
    }

    /// Start reloading the active weapon. Returns whether a reload began.
    pub fn reload(&mut self, now: f32) -> bool {
        self.update(now);
        let weapon = self.current_mut();
        let started = weapon.start_reload(now);
        if started {
            log::debug!("Reloading {} ({:.1}s)", weapon.name(), weapon.reload_time);
        }
        started
    }

    pub fn snapshot(&self) -> WeaponSnapshot {
        self.current().snapshot()
    }
}

impl Default for WeaponSystem {
    fn default() -> Self {
        Self::new()
    }
}
