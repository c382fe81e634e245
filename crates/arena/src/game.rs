//! The per-tick simulation: player, hit-scan fire, enemy AI, spawning and collisions.

use engine_core::{Entity, Transform, Vec3, Velocity};
use input::InputState;
use physics::{ColliderHandle, PhysicsWorld};

use crate::config::GameConfig;
use crate::effects::{Effects, VisualEffect};
use crate::enemy::{Enemy, EnemyBundle, EnemyKind, EnemyState};
use crate::player::{PlayerController, PlayerStats, FLOOR_HEIGHT};
use crate::snapshot::{EnemyView, PlayerView, SceneSnapshot};
use crate::spawner::EnemySpawner;
use crate::weapons::{FireOutcome, WeaponId, WeaponSnapshot};
use crate::world::Arena;

/// Result of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickStatus {
    Running,
    /// The player died. Every later tick is a no-op returning this again.
    GameOver { score: u32 },
}

/// Things that happened during a tick, for logging, audio and UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnemySpawned {
        entity: Entity,
        kind: EnemyKind,
        position: Vec3,
    },
    ShotFired {
        weapon: WeaponId,
        /// Impact point if the shot registered a hit.
        hit: Option<Vec3>,
    },
    EnemyKilled {
        entity: Entity,
        kind: EnemyKind,
        score: u32,
    },
    /// Contact damage taken this tick (after dodge mitigation).
    PlayerDamaged { amount: f32, health: f32 },
    SessionEnded { score: u32, survived: f32 },
}

/// One game session.
pub struct Game {
    config: GameConfig,
    elapsed: f32,
    player: PlayerController,
    enemies: hecs::World,
    scene: PhysicsWorld,
    arena: Arena,
    spawner: EnemySpawner,
    effects: Effects,
    events: Vec<GameEvent>,
    status: TickStatus,
}

impl Game {
    /// Build the arena, place the player at its center and spawn the opening wave.
    pub fn new(config: GameConfig) -> Self {
        let spawner = match config.seed {
            Some(seed) => EnemySpawner::seeded(config.spawn_interval, config.spawn_radius, seed),
            None => EnemySpawner::new(config.spawn_interval, config.spawn_radius),
        };
        Self::build(config, Arena::new(), spawner)
    }

    /// Same as [`Game::new`] with a fixed RNG seed.
    pub fn with_seed(mut config: GameConfig, seed: u64) -> Self {
        config.seed = Some(seed);
        Self::new(config)
    }

    fn build(config: GameConfig, arena: Arena, spawner: EnemySpawner) -> Self {
        let mut scene = PhysicsWorld::new();
        arena.register_colliders(&mut scene);

        let player = PlayerController::new(Vec3::new(0.0, FLOOR_HEIGHT, 0.0))
            .with_sensitivity(config.sensitivity);

        let mut game = Self {
            config,
            elapsed: 0.0,
            player,
            enemies: hecs::World::new(),
            scene,
            arena,
            spawner,
            effects: Effects::new(),
            events: Vec::new(),
            status: TickStatus::Running,
        };
        for _ in 0..game.config.initial_enemies {
            game.spawn_enemy();
        }
        log::info!("Session started with {} enemies", game.enemy_count());
        game
    }

    /// Advance the simulation by `dt` seconds using this frame's input.
    pub fn tick(&mut self, dt: f32, input: &InputState) -> TickStatus {
        if self.is_over() {
            return self.status;
        }
        let dt = dt.max(0.0);
        self.elapsed += dt;
        let now = self.elapsed;

        self.player.update_weapons(now);
        self.player.update(input, dt, now);

        if input.is_cursor_locked() && input.is_fire_pressed() {
            self.resolve_fire();
        }

        self.update_enemies(dt, now);

        if self.spawner.update(now) {
            self.spawn_enemy();
        }

        self.resolve_collisions(dt);
        self.effects.update(dt);

        if self.player.is_dead() {
            let score = self.player.stats().score;
            log::info!("Player killed after {:.1}s with score {}", self.elapsed, score);
            self.events.push(GameEvent::SessionEnded {
                score,
                survived: self.elapsed,
            });
            self.status = TickStatus::GameOver { score };
        }
        self.status
    }

    fn is_over(&self) -> bool {
        matches!(self.status, TickStatus::GameOver { .. })
    }

    fn resolve_fire(&mut self) {
        self.sync_enemy_colliders();

        let outcome = self.player.fire(&self.scene);
        let hit = match outcome {
            FireOutcome::Rejected => return,
            FireOutcome::Miss => None,
            FireOutcome::Hit(hit) => Some(hit),
        };

        let weapon = self.player.weapons().current();
        let (weapon_id, damage) = (weapon.id, weapon.damage);
        self.effects
            .push(VisualEffect::muzzle_flash(self.player.view_transform().position));
        self.events.push(GameEvent::ShotFired {
            weapon: weapon_id,
            hit: hit.map(|h| h.point),
        });

        let Some(hit) = hit else { return };
        self.effects.push(VisualEffect::hit_marker(hit.point));

        let Some(entity) = self.enemy_for_collider(hit.collider) else {
            return;
        };
        let killed = match self.enemies.get::<&mut Enemy>(entity) {
            Ok(mut enemy) => enemy.take_damage(damage),
            Err(_) => return,
        };
        if killed {
            self.kill(entity);
        }
    }

    /// Move every enemy's scene collider to its current position and rebuild the query pipeline.
    fn sync_enemy_colliders(&mut self) {
        for (_, (transform, enemy)) in self.enemies.query::<(&Transform, &Enemy)>().iter() {
            if let Some(collider) = enemy.collider {
                self.scene.set_collider_translation(collider, transform.position);
            }
        }
        self.scene.update_query_pipeline();
    }

    fn enemy_for_collider(&self, collider: ColliderHandle) -> Option<Entity> {
        self.enemies
            .query::<&Enemy>()
            .iter()
            .find(|(_, enemy)| enemy.collider == Some(collider))
            .map(|(entity, _)| entity)
    }

    /// Remove a dead enemy together with its scene collider.
    fn kill(&mut self, entity: Entity) {
        let Ok(enemy) = self.enemies.remove_one::<Enemy>(entity) else {
            return;
        };
        self.enemies.despawn(entity).ok();
        if let Some(collider) = enemy.collider {
            self.scene.remove_collider(collider);
        }

        let points = self.config.kill_score;
        self.player.add_score(points);
        log::info!("{} killed (+{})", enemy.kind.name(), points);
        self.events.push(GameEvent::EnemyKilled {
            entity,
            kind: enemy.kind,
            score: points,
        });
    }

    fn update_enemies(&mut self, dt: f32, now: f32) {
        let target = self.player.position;
        for (_, (transform, velocity, enemy)) in self
            .enemies
            .query_mut::<(&mut Transform, &mut Velocity, &mut Enemy)>()
        {
            if enemy.update(transform, velocity, target, dt, now) {
                log::trace!("{} attacks", enemy.kind.name());
            }
        }
    }

    fn spawn_enemy(&mut self) -> Entity {
        let kind = self.spawner.random_kind();
        let ground = self.spawner.ring_position(Vec3::ZERO);
        self.spawn_enemy_at(kind, ground)
    }

    /// Spawn an enemy of `kind` standing on the floor at `ground` (x/z are used).
    pub fn spawn_enemy_at(&mut self, kind: EnemyKind, ground: Vec3) -> Entity {
        let bundle = EnemyBundle::new(kind, ground);
        let position = bundle.transform.position;
        let collider = self.scene.add_enemy_box(position, kind.size());
        let entity = bundle.with_collider(collider).spawn(&mut self.enemies);
        log::info!("Spawned {} at ({:.1}, {:.1})", kind.name(), position.x, position.z);
        self.events.push(GameEvent::EnemySpawned {
            entity,
            kind,
            position,
        });
        entity
    }

    fn resolve_collisions(&mut self, dt: f32) {
        // Contact damage from attacking enemies touching the player.
        let player_bounds = self.player.bounds();
        let before = self.player.stats().health;
        for (_, (transform, enemy)) in self.enemies.query::<(&Transform, &Enemy)>().iter() {
            let touching = enemy.bounds(transform).intersects(&player_bounds);
            if enemy.state() == EnemyState::Attack && touching {
                self.player.take_damage(enemy.stats().damage * dt);
            }
        }
        let health = self.player.stats().health;
        if health < before {
            self.events.push(GameEvent::PlayerDamaged {
                amount: before - health,
                health,
            });
        }

        // Obstacles only push the player up onto their top face.
        if let Some(obstacle) = self.arena.first_intersection(&self.player.bounds()).copied() {
            self.player.rest_on(&obstacle);
        }
    }

    /// Events queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn status(&self) -> TickStatus {
        self.status
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn enemy_count(&self) -> usize {
        self.enemies.len() as usize
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player_stats(&self) -> PlayerStats {
        self.player.stats()
    }

    pub fn weapon_snapshot(&self) -> WeaponSnapshot {
        self.player.weapon_snapshot()
    }

    /// Copy of everything the renderer draws this frame.
    pub fn scene(&self) -> SceneSnapshot {
        let view = self.player.view_transform();
        let player = PlayerView {
            eye: view.position,
            yaw: self.player.yaw(),
            pitch: self.player.pitch(),
            view: view.into(),
            bounds: self.player.bounds(),
            is_dodging: self.player.is_dodging(),
        };
        let enemies = self
            .enemies
            .query::<(&Transform, &Enemy)>()
            .iter()
            .map(|(entity, (transform, enemy))| EnemyView {
                entity,
                kind: enemy.kind,
                state: enemy.state(),
                model: transform.into(),
                bounds: enemy.bounds(transform),
                health: enemy.health(),
                flashing: enemy.is_flashing(),
            })
            .collect();
        SceneSnapshot {
            elapsed: self.elapsed,
            player,
            enemies,
            obstacles: self.arena.obstacles().to_vec(),
            effects: self.effects.active().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::EffectKind;
    use input::{ElementState, KeyCode, MouseButton};

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config() -> GameConfig {
        GameConfig {
            initial_enemies: 0,
            ..GameConfig::default()
        }
    }

    fn idle() -> InputState {
        InputState::new()
    }

    /// Captured input that looks down by 0.1 rad, optionally selects a weapon slot, and fires.
    fn aim_and_fire(slot: Option<KeyCode>) -> InputState {
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_mouse_motion((0.0, 50.0));
        if let Some(key) = slot {
            input.process_keyboard(key, ElementState::Pressed);
        }
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        input
    }

    #[test]
    fn opening_wave_spawns_on_ring() {
        let mut game = Game::with_seed(GameConfig::default(), 3);
        assert_eq!(game.enemy_count(), 5);
        let spawned = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::EnemySpawned { .. }))
            .count();
        assert_eq!(spawned, 5);
        for enemy in game.scene().enemies {
            let c = enemy.bounds.center();
            assert!((Vec3::new(c.x, 0.0, c.z).length() - 30.0).abs() < 1e-3);
            assert_eq!(enemy.state, EnemyState::Patrol);
        }
    }

    #[test]
    fn spawns_every_interval() {
        let mut game = Game::with_seed(quiet_config(), 1);
        game.drain_events();
        for _ in 0..19 {
            game.tick(0.5, &idle());
        }
        assert_eq!(game.enemy_count(), 0);
        game.tick(0.5, &idle());
        assert_eq!(game.enemy_count(), 1);
        assert!(matches!(
            game.drain_events().as_slice(),
            [GameEvent::EnemySpawned { .. }]
        ));
        for _ in 0..20 {
            game.tick(0.5, &idle());
        }
        assert_eq!(game.enemy_count(), 2);
    }

    #[test]
    fn contact_damage_only_while_attacking_and_touching() {
        let mut game = Game::with_seed(quiet_config(), 1);
        game.spawn_enemy_at(EnemyKind::Grunt, Vec3::ZERO);

        // Patrol -> Chase on the first tick, no damage yet.
        game.tick(0.1, &idle());
        assert_eq!(game.player_stats().health, 100.0);

        // Chase -> Attack, overlapping: 15 dps for 0.1 s.
        game.tick(0.1, &idle());
        assert!((game.player_stats().health - 98.5).abs() < 1e-4);
        assert!(game
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::PlayerDamaged { .. })));
    }

    #[test]
    fn attacking_from_range_does_no_damage() {
        let mut game = Game::with_seed(quiet_config(), 1);
        game.spawn_enemy_at(EnemyKind::Grunt, Vec3::new(0.0, 0.0, -3.0));
        for _ in 0..3 {
            game.tick(0.1, &idle());
        }
        assert_eq!(game.scene().enemies[0].state, EnemyState::Attack);
        assert_eq!(game.player_stats().health, 100.0);
    }

    #[test]
    fn shotgun_kills_scout_and_despawns_it() {
        let mut game = Game::with_seed(quiet_config(), 1);
        let colliders = game.scene.collider_count();
        let scout = game.spawn_enemy_at(EnemyKind::Scout, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(game.scene.collider_count(), colliders + 1);
        game.drain_events();

        game.tick(DT, &aim_and_fire(Some(KeyCode::Digit2)));

        assert_eq!(game.enemy_count(), 0);
        assert_eq!(game.scene.collider_count(), colliders);
        assert_eq!(game.player_stats().score, 100);
        assert_eq!(game.player_stats().current_weapon, WeaponId::Shotgun);
        assert_eq!(game.weapon_snapshot().ammo, 5);

        let events = game.drain_events();
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::ShotFired { weapon: WeaponId::Shotgun, hit: Some(_) }
        )));
        assert!(events.contains(&GameEvent::EnemyKilled {
            entity: scout,
            kind: EnemyKind::Scout,
            score: 100,
        }));
        assert!(game.scene().enemy(scout).is_none());
    }

    #[test]
    fn pistol_wounds_and_flashes() {
        let mut game = Game::with_seed(quiet_config(), 1);
        let grunt = game.spawn_enemy_at(EnemyKind::Grunt, Vec3::new(0.0, 0.0, -10.0));

        game.tick(DT, &aim_and_fire(None));

        let scene = game.scene();
        let view = scene.enemy(grunt).unwrap();
        assert_eq!(view.health.current, 80.0);
        assert!(view.flashing);
        assert_eq!(game.player_stats().score, 0);
        assert!(scene
            .effects
            .iter()
            .any(|e| matches!(e.kind, EffectKind::HitMarker { .. })));

        // The flash lasts 0.1 s on the enemy itself.
        for _ in 0..6 {
            game.tick(DT, &idle());
        }
        let view = *game.scene().enemy(grunt).unwrap();
        assert!(!view.flashing);
        assert_eq!(view.health.current, 80.0);
    }

    #[test]
    fn long_frame_after_walking_never_moves_backwards() {
        let mut game = Game::with_seed(quiet_config(), 1);
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        for _ in 0..20 {
            game.tick(DT, &input);
            input.end_frame();
        }
        let before = game.player().position;
        assert!(before.z < 0.0);

        input.process_keyboard(KeyCode::KeyW, ElementState::Released);
        game.tick(0.5, &input);
        let after = game.player().position;
        assert!(after.z <= before.z, "moved backwards: {:?} -> {:?}", before, after);
        assert_eq!(after.x, before.x);
        assert_eq!(after.y, FLOOR_HEIGHT);
    }

    #[test]
    fn rejected_shot_leaves_no_trace() {
        let mut game = Game::with_seed(quiet_config(), 1);
        game.tick(DT, &aim_and_fire(None));
        game.drain_events();
        // 2 frames later the pistol is still cooling down.
        game.tick(DT, &aim_and_fire(None));
        assert_eq!(game.weapon_snapshot().ammo, 11);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn uncaptured_fire_is_ignored() {
        let mut game = Game::with_seed(quiet_config(), 1);
        let mut input = InputState::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        game.tick(DT, &input);
        assert_eq!(game.weapon_snapshot().ammo, 12);
    }

    #[test]
    fn player_death_ends_session_once() {
        let mut game = Game::with_seed(quiet_config(), 1);
        game.spawn_enemy_at(EnemyKind::Grunt, Vec3::ZERO);
        game.drain_events();

        let mut status = TickStatus::Running;
        for _ in 0..200 {
            status = game.tick(0.1, &idle());
            if status != TickStatus::Running {
                break;
            }
        }
        assert_eq!(status, TickStatus::GameOver { score: 0 });
        assert_eq!(game.player_stats().health, 0.0);
        let ended = game
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::SessionEnded { .. }))
            .count();
        assert_eq!(ended, 1);

        // Inert from here on.
        let elapsed = game.elapsed();
        assert_eq!(game.tick(0.1, &idle()), status);
        assert_eq!(game.elapsed(), elapsed);
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn player_stands_on_platform() {
        let mut game = Game::with_seed(quiet_config(), 1);
        game.player.position = Vec3::new(25.0, 2.5, 0.0);
        game.tick(DT, &idle());
        assert_eq!(game.player.position.y, 3.0);
    }
}
