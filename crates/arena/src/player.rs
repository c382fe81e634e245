//! Player controller: movement physics, stamina, dodge, look and weapon handling.

use engine_core::{Aabb, Health, Transform, Vec2, Vec3};
use input::InputState;
use physics::PhysicsWorld;

use crate::weapons::{FireOutcome, WeaponId, WeaponSnapshot, WeaponSystem};

/// Eye height above whatever the player stands on.
pub const FLOOR_HEIGHT: f32 = 2.0;
/// Full extents of the player's bounding box (feet to eye).
pub const PLAYER_SIZE: Vec3 = Vec3::new(1.0, 2.0, 1.0);

const WALK_SPEED: f32 = 400.0;
const DODGE_SPEED: f32 = 600.0;
const SPRINT_MULTIPLIER: f32 = 1.5;
/// Horizontal velocity lost per second, as a fraction of itself.
const FRICTION: f32 = 10.0;
const GRAVITY: f32 = 9.8 * 100.0;
const JUMP_IMPULSE: f32 = 150.0;

const MAX_HEALTH: f32 = 100.0;
const MAX_STAMINA: f32 = 100.0;
const STAMINA_DRAIN: f32 = 20.0;
const STAMINA_REGEN: f32 = 10.0;

const DODGE_COST: f32 = 30.0;
const DODGE_COOLDOWN: f32 = 1.0;
const DODGE_WINDOW: f32 = 0.3;
const DODGE_IMPULSE: f32 = 20.0;
const DODGE_DAMAGE_FACTOR: f32 = 0.5;

/// Radians of look rotation per pixel of mouse motion at sensitivity 1.0.
const LOOK_SPEED: f32 = 0.002;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2;

/// Copy of the player's vital stats for the HUD.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStats {
    pub health: f32,
    pub max_health: f32,
    pub stamina: f32,
    pub max_stamina: f32,
    pub score: u32,
    pub current_weapon: WeaponId,
}

/// Player controller handling movement and camera.
pub struct PlayerController {
    pub position: Vec3,
    /// Velocity in the player's yaw frame: `x` strafes right, `z` moves forward.
    velocity: Vec3,
    yaw: f32,
    pitch: f32,
    sensitivity: f32,
    health: Health,
    stamina: f32,
    max_stamina: f32,
    score: u32,
    weapons: WeaponSystem,
    /// Movement axes from the last captured input (`x` right, `y` forward).
    intent: Vec2,
    can_jump: bool,
    last_dodge_time: Option<f32>,
    dodging_until: f32,
    now: f32,
}

impl PlayerController {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            sensitivity: 1.0,
            health: Health::new(MAX_HEALTH),
            stamina: MAX_STAMINA,
            max_stamina: MAX_STAMINA,
            score: 0,
            weapons: WeaponSystem::new(),
            intent: Vec2::ZERO,
            can_jump: false,
            last_dodge_time: None,
            dodging_until: f32::NEG_INFINITY,
            now: 0.0,
        }
    }

    /// Scale mouse look by `sensitivity` (1.0 = default).
    pub fn with_sensitivity(mut self, sensitivity: f32) -> Self {
        self.sensitivity = sensitivity.max(0.0);
        self
    }

    /// Update player state from this frame's input. Inert while input is not captured.
    pub fn update(&mut self, input: &InputState, dt: f32, now: f32) {
        self.now = now;
        if !input.is_cursor_locked() {
            return;
        }

        // Mouse look
        let look = input.mouse_delta() * LOOK_SPEED * self.sensitivity;
        self.yaw -= look.x;
        self.pitch = (self.pitch - look.y).clamp(-MAX_PITCH, MAX_PITCH);

        self.intent = input.movement_axes();

        // Discrete actions
        if let Some(id) = input.weapon_slot_pressed().and_then(WeaponId::from_slot) {
            self.weapons.select(id);
        }
        if input.is_reload_pressed() {
            self.weapons.reload(now);
        }
        if input.is_dodge_pressed() {
            self.try_dodge();
        }
        if input.is_jump_pressed() {
            self.jump();
        }

        // Stamina
        let sprinting = input.is_sprinting();
        if sprinting && input.is_moving() {
            self.stamina -= STAMINA_DRAIN * dt;
        } else {
            self.stamina += STAMINA_REGEN * dt;
        }
        self.stamina = self.stamina.clamp(0.0, self.max_stamina);

        // Friction and gravity. Damping never overshoots zero, however long the frame.
        let damping = (1.0 - FRICTION * dt).max(0.0);
        self.velocity.x *= damping;
        self.velocity.z *= damping;
        self.velocity.y -= GRAVITY * dt;

        // Movement
        let base = if self.is_dodging() { DODGE_SPEED } else { WALK_SPEED };
        let speed = if sprinting && self.stamina > 0.0 {
            base * SPRINT_MULTIPLIER
        } else {
            base
        };
        let direction = self.intent.normalize_or_zero();
        if self.intent.y != 0.0 {
            self.velocity.z += direction.y * speed * dt;
        }
        if self.intent.x != 0.0 {
            self.velocity.x += direction.x * speed * dt;
        }

        // Integrate in world space
        let frame = Transform::from_yaw_pitch(self.position, self.yaw, 0.0);
        self.position += frame.forward() * (self.velocity.z * dt);
        self.position += frame.right() * (self.velocity.x * dt);
        self.position.y += self.velocity.y * dt;

        if self.position.y <= FLOOR_HEIGHT {
            self.land_at(FLOOR_HEIGHT);
        }
    }

    fn land_at(&mut self, height: f32) {
        self.position.y = height;
        self.velocity.y = 0.0;
        self.can_jump = true;
    }

    /// Jump if standing on something. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.can_jump {
            return false;
        }
        self.velocity.y += JUMP_IMPULSE;
        self.can_jump = false;
        true
    }

    /// Dodge along the current movement intent. Fails without any state change
    /// while on cooldown or short of stamina.
    pub fn try_dodge(&mut self) -> bool {
        let cooled = self
            .last_dodge_time
            .map_or(true, |last| self.now - last >= DODGE_COOLDOWN);
        if !cooled || self.stamina < DODGE_COST {
            log::debug!("Dodge denied (stamina {:.0})", self.stamina);
            return false;
        }

        self.stamina -= DODGE_COST;
        self.velocity.x += axis_sign(self.intent.x) * DODGE_IMPULSE;
        self.velocity.z += axis_sign(self.intent.y) * DODGE_IMPULSE;
        self.dodging_until = self.now + DODGE_WINDOW;
        self.last_dodge_time = Some(self.now);
        true
    }

    pub fn is_dodging(&self) -> bool {
        self.now < self.dodging_until
    }

    /// Take damage (halved while dodging). Returns true if the player is now dead.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let amount = if self.is_dodging() {
            amount * DODGE_DAMAGE_FACTOR
        } else {
            amount
        };
        self.health.take_damage(amount);
        self.health.is_dead()
    }

    pub fn heal(&mut self, amount: f32) {
        self.health.heal(amount);
    }

    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    /// Switch weapon by name. Unknown names are ignored.
    pub fn switch_weapon(&mut self, id: &str) -> bool {
        self.weapons.switch_weapon(id)
    }

    pub fn reload(&mut self) -> bool {
        self.weapons.reload(self.now)
    }

    /// Fire the active weapon along the view direction.
    pub fn fire(&mut self, scene: &PhysicsWorld) -> FireOutcome {
        let view = self.view_transform();
        self.weapons.fire(self.now, view.position, view.forward(), scene)
    }

    pub fn weapons(&self) -> &WeaponSystem {
        &self.weapons
    }

    /// Complete due reloads. Runs every tick, captured or not.
    pub fn update_weapons(&mut self, now: f32) {
        self.weapons.update(now);
    }

    /// Camera transform: eye position with yaw and pitch.
    pub fn view_transform(&self) -> Transform {
        Transform::from_yaw_pitch(self.position, self.yaw, self.pitch)
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Bounding box from feet to eye.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_size(self.position - Vec3::Y * (PLAYER_SIZE.y * 0.5), PLAYER_SIZE)
    }

    /// Vertical-only response to overlapping an obstacle: stand on its top face.
    pub fn rest_on(&mut self, obstacle: &Aabb) {
        self.land_at(obstacle.max.y + FLOOR_HEIGHT);
    }

    pub fn stats(&self) -> PlayerStats {
        PlayerStats {
            health: self.health.current,
            max_health: self.health.max,
            stamina: self.stamina,
            max_stamina: self.max_stamina,
            score: self.score,
            current_weapon: self.weapons.current_id(),
        }
    }

    pub fn weapon_snapshot(&self) -> WeaponSnapshot {
        self.weapons.snapshot()
    }
}

fn axis_sign(value: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::{ElementState, KeyCode};

    const DT: f32 = 0.1;

    fn captured() -> InputState {
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input
    }

    fn grounded_player() -> PlayerController {
        let mut p = PlayerController::new(Vec3::new(0.0, FLOOR_HEIGHT, 0.0));
        p.update(&captured(), 0.0, 0.0);
        p
    }

    #[test]
    fn new_player_has_full_stats() {
        let p = PlayerController::new(Vec3::ZERO);
        let s = p.stats();
        assert_eq!(s.health, 100.0);
        assert_eq!(s.max_health, 100.0);
        assert_eq!(s.stamina, 100.0);
        assert_eq!(s.max_stamina, 100.0);
        assert_eq!(s.score, 0);
        assert_eq!(s.current_weapon, WeaponId::Pistol);
    }

    #[test]
    fn movement_is_inert_while_uncaptured() {
        let mut p = grounded_player();
        let mut input = InputState::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_mouse_motion((100.0, 0.0));
        p.update(&input, DT, 0.1);
        assert_eq!(p.position, Vec3::new(0.0, FLOOR_HEIGHT, 0.0));
        assert_eq!(p.yaw(), 0.0);
    }

    #[test]
    fn forward_moves_along_view() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        p.update(&input, DT, 0.1);
        assert!(p.position.z < 0.0);
        assert!(p.position.x.abs() < 1e-4);
        assert_eq!(p.position.y, FLOOR_HEIGHT);
    }

    #[test]
    fn strafe_right_moves_positive_x() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::KeyD, ElementState::Pressed);
        p.update(&input, DT, 0.1);
        assert!(p.position.x > 0.0);
        assert!(p.position.z.abs() < 1e-4);
    }

    #[test]
    fn friction_brings_player_to_rest() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        p.update(&input, 0.05, 0.05);
        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        for i in 0..100 {
            p.update(&input, 0.05, 0.1 + i as f32 * 0.05);
        }
        assert!(p.velocity.length() < 1e-3);
    }

    #[test]
    fn long_frame_stops_without_reversing() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        for i in 0..20 {
            p.update(&input, 1.0 / 60.0, (i + 1) as f32 / 60.0);
        }
        assert!(p.velocity.z > 0.0);

        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        let before = p.position;
        p.update(&input, 0.5, 1.0);
        assert_eq!(p.velocity.z, 0.0);
        assert_eq!(p.velocity.x, 0.0);
        assert!(p.position.z <= before.z);
        assert_eq!(p.position.y, FLOOR_HEIGHT);
    }

    #[test]
    fn sprint_drains_and_idle_regenerates_stamina() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);
        for i in 0..10 {
            p.update(&input, DT, (i + 1) as f32 * DT);
        }
        assert!((p.stats().stamina - 80.0).abs() < 1e-3);

        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        for i in 0..10 {
            p.update(&input, DT, 1.0 + (i + 1) as f32 * DT);
        }
        assert!((p.stats().stamina - 90.0).abs() < 1e-3);

        for i in 0..50 {
            p.update(&input, DT, 2.0 + (i + 1) as f32 * DT);
        }
        assert_eq!(p.stats().stamina, 100.0);
    }

    #[test]
    fn sprint_without_stamina_moves_at_walk_speed() {
        let mut walker = grounded_player();
        let mut sprinter = grounded_player();
        sprinter.stamina = 0.0;

        let mut walk = captured();
        walk.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        let mut sprint = captured();
        sprint.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        sprint.process_keyboard(KeyCode::ShiftLeft, ElementState::Pressed);

        walker.update(&walk, DT, DT);
        sprinter.update(&sprint, DT, DT);
        assert_eq!(sprinter.stats().stamina, 0.0);
        assert!((walker.position.z - sprinter.position.z).abs() < 1e-4);
    }

    #[test]
    fn dodge_denied_without_stamina() {
        let mut p = grounded_player();
        p.stamina = 25.0;
        p.intent = Vec2::new(1.0, 0.0);
        assert!(!p.try_dodge());
        assert_eq!(p.stats().stamina, 25.0);
        assert_eq!(p.velocity, Vec3::ZERO);
        assert!(!p.is_dodging());
    }

    #[test]
    fn dodge_cooldown() {
        let mut p = grounded_player();
        p.intent = Vec2::new(-1.0, 0.0);
        assert!(p.try_dodge());
        assert_eq!(p.stats().stamina, 70.0);
        assert_eq!(p.velocity.x, -20.0);
        assert!(p.is_dodging());

        p.update(&InputState::new(), DT, 0.5);
        assert!(!p.is_dodging());
        let velocity = p.velocity;
        assert!(!p.try_dodge());
        assert_eq!(p.stats().stamina, 70.0);
        assert_eq!(p.velocity, velocity);

        p.update(&InputState::new(), DT, 1.0);
        assert!(p.try_dodge());
        assert_eq!(p.stats().stamina, 40.0);
    }

    #[test]
    fn dodge_via_input_raises_speed_cap() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.process_keyboard(KeyCode::KeyQ, ElementState::Pressed);
        p.update(&input, 0.05, 0.05);
        assert!(p.is_dodging());
        // Impulse of 20 halved by friction, then 600 * 0.05 along forward.
        assert!((p.velocity.z - 40.0).abs() < 1e-3);
    }

    #[test]
    fn damage_halved_while_dodging() {
        let mut p = grounded_player();
        assert!(!p.take_damage(60.0));
        assert_eq!(p.stats().health, 40.0);
        assert!(p.try_dodge());
        assert!(!p.take_damage(30.0));
        assert_eq!(p.stats().health, 25.0);
    }

    #[test]
    fn lethal_damage_clamps_to_zero() {
        let mut p = grounded_player();
        assert!(p.take_damage(250.0));
        assert_eq!(p.stats().health, 0.0);
        assert!(p.is_dead());
        p.heal(500.0);
        assert_eq!(p.stats().health, 100.0);
    }

    #[test]
    fn jump_only_when_grounded() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::Space, ElementState::Pressed);
        p.update(&input, 0.01, 0.01);
        assert!(p.position.y > FLOOR_HEIGHT);
        assert!(!p.jump());

        input.end_frame();
        let mut t = 0.01;
        while p.position.y > FLOOR_HEIGHT {
            t += 0.01;
            p.update(&input, 0.01, t);
            assert!(t < 5.0, "player never landed");
        }
        assert_eq!(p.position.y, FLOOR_HEIGHT);
        assert!(p.jump());
    }

    #[test]
    fn pitch_is_clamped_yaw_is_not() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_mouse_motion((-10_000.0, -10_000.0));
        p.update(&input, DT, DT);
        assert_eq!(p.pitch(), MAX_PITCH);
        assert!((p.yaw() - 20.0).abs() < 1e-3);
    }

    #[test]
    fn weapon_switch_delegation() {
        let mut p = grounded_player();
        let mut input = captured();
        input.process_keyboard(KeyCode::Digit2, ElementState::Pressed);
        p.update(&input, DT, DT);
        assert_eq!(p.stats().current_weapon, WeaponId::Shotgun);
        assert!(p.switch_weapon("rifle"));
        assert!(!p.switch_weapon("bazooka"));
        assert_eq!(p.weapon_snapshot().name, "rifle");
    }

    #[test]
    fn fire_and_reload_through_controller() {
        let mut p = grounded_player();
        let scene = PhysicsWorld::new();
        assert_eq!(p.fire(&scene), FireOutcome::Miss);
        assert_eq!(p.weapon_snapshot().ammo, 11);
        assert!(p.reload());
        assert!(p.weapon_snapshot().is_reloading);
        p.update_weapons(1.5);
        assert_eq!(p.weapon_snapshot().ammo, 12);
    }

    #[test]
    fn rest_on_obstacle_lifts_player() {
        let mut p = grounded_player();
        let crate_box = Aabb::from_center_size(Vec3::new(0.0, 0.5, 0.0), Vec3::ONE);
        assert!(p.bounds().intersects(&crate_box));
        p.rest_on(&crate_box);
        assert_eq!(p.position.y, 1.0 + FLOOR_HEIGHT);
        assert!(p.jump());
    }

    #[test]
    fn snapshot_is_a_copy() {
        let mut p = grounded_player();
        let mut stats = p.stats();
        stats.health = 1.0;
        stats.score = 999;
        assert_eq!(p.stats().health, 100.0);
        p.add_score(100);
        assert_eq!(p.stats().score, 100);
    }
}
