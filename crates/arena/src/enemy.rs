//! Enemy agents: type-derived stats and the patrol/chase/attack/retreat state machine.

use engine_core::{Aabb, Health, Lifetime, Quat, Transform, Vec3, Velocity};
use physics::ColliderHandle;

/// Waypoint counts as reached inside this radius.
const WAYPOINT_REACHED: f32 = 0.5;
/// Retreat ends once this close to the home waypoint.
const HOME_REACHED: f32 = 2.0;
/// Losing the player beyond `detection_range * CHASE_GIVE_UP` ends a chase.
const CHASE_GIVE_UP: f32 = 1.5;
const CHASE_SPEED_MULT: f32 = 1.5;
const RETREAT_SPEED_MULT: f32 = 0.7;
/// Fraction of max health at or below which the enemy breaks off and retreats.
const RETREAT_HEALTH_FRACTION: f32 = 0.3;
/// Half the side of the square patrol route around the spawn point.
const PATROL_HALF_SIDE: f32 = 5.0;
/// Damage flash duration in seconds.
pub const DAMAGE_FLASH_SECS: f32 = 0.1;

/// Enemy archetypes. Stats are fixed by type at construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Baseline melee enemy.
    #[default]
    Grunt,
    /// Slow, tough, hits hard.
    Heavy,
    /// Fast and fragile, spots the player from further away.
    Scout,
}

/// Stat tuple derived from [`EnemyKind`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub max_health: f32,
    pub speed: f32,
    pub detection_range: f32,
    pub attack_range: f32,
    /// Contact damage per second while attacking.
    pub damage: f32,
    pub attack_cooldown: f32,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Grunt, EnemyKind::Heavy, EnemyKind::Scout];

    /// Resolve a type name. Unknown names fall back to [`EnemyKind::Grunt`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "grunt" => EnemyKind::Grunt,
            "heavy" => EnemyKind::Heavy,
            "scout" => EnemyKind::Scout,
            other => {
                log::debug!("Unknown enemy type {:?}, using grunt", other);
                EnemyKind::Grunt
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EnemyKind::Grunt => "grunt",
            EnemyKind::Heavy => "heavy",
            EnemyKind::Scout => "scout",
        }
    }

    pub fn stats(&self) -> EnemyStats {
        let (max_health, speed, detection_range, attack_range, damage, attack_cooldown) =
            match self {
                EnemyKind::Grunt => (100.0, 4.0, 20.0, 4.0, 15.0, 1.0),
                EnemyKind::Heavy => (200.0, 2.0, 15.0, 3.0, 20.0, 2.0),
                EnemyKind::Scout => (50.0, 8.0, 25.0, 5.0, 10.0, 0.5),
            };
        EnemyStats {
            max_health,
            speed,
            detection_range,
            attack_range,
            damage,
            attack_cooldown,
        }
    }

    /// Full extents of the enemy's bounding box.
    pub fn size(&self) -> Vec3 {
        match self {
            EnemyKind::Grunt => Vec3::new(1.0, 2.0, 1.0),
            EnemyKind::Heavy => Vec3::new(1.5, 2.5, 1.5),
            EnemyKind::Scout => Vec3::new(0.8, 1.5, 0.8),
        }
    }
}

/// AI state. Every enemy starts in `Patrol`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnemyState {
    #[default]
    Patrol,
    Chase,
    Attack,
    Retreat,
}

impl EnemyState {
    /// Transition table. `distance` is to the player, `home_distance` to the first waypoint.
    pub fn next(self, stats: &EnemyStats, distance: f32, home_distance: f32) -> EnemyState {
        match self {
            EnemyState::Patrol if distance <= stats.detection_range => EnemyState::Chase,
            EnemyState::Chase if distance <= stats.attack_range => EnemyState::Attack,
            EnemyState::Chase if distance > stats.detection_range * CHASE_GIVE_UP => {
                EnemyState::Retreat
            }
            EnemyState::Attack if distance > stats.attack_range => EnemyState::Chase,
            EnemyState::Retreat if distance <= stats.detection_range => EnemyState::Chase,
            EnemyState::Retreat if home_distance <= HOME_REACHED => EnemyState::Patrol,
            state => state,
        }
    }
}

/// Enemy component.
#[derive(Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    stats: EnemyStats,
    health: Health,
    state: EnemyState,
    patrol_route: Vec<Vec3>,
    current_waypoint: usize,
    last_attack_time: Option<f32>,
    flash: Option<Lifetime>,
    /// Scene collider used by hit-scan queries.
    pub collider: Option<ColliderHandle>,
}

impl Enemy {
    /// Create an enemy whose patrol route is a square around `spawn`.
    pub fn new(kind: EnemyKind, spawn: Vec3) -> Self {
        let h = PATROL_HALF_SIDE;
        let route = vec![
            spawn + Vec3::new(-h, 0.0, -h),
            spawn + Vec3::new(h, 0.0, -h),
            spawn + Vec3::new(h, 0.0, h),
            spawn + Vec3::new(-h, 0.0, h),
        ];
        Self::with_route(kind, route)
    }

    /// Create an enemy with an explicit patrol route. The first waypoint is home.
    pub fn with_route(kind: EnemyKind, patrol_route: Vec<Vec3>) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            stats,
            health: Health::new(stats.max_health),
            state: EnemyState::Patrol,
            patrol_route,
            current_waypoint: 0,
            last_attack_time: None,
            flash: None,
            collider: None,
        }
    }

    pub fn stats(&self) -> &EnemyStats {
        &self.stats
    }

    pub fn health(&self) -> Health {
        self.health
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn patrol_route(&self) -> &[Vec3] {
        &self.patrol_route
    }

    pub fn current_waypoint(&self) -> usize {
        self.current_waypoint
    }

    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_some_and(|f| f.is_active())
    }

    fn home(&self) -> Option<Vec3> {
        self.patrol_route.first().copied()
    }

    /// Bounding box around the enemy's current position.
    pub fn bounds(&self, transform: &Transform) -> Aabb {
        Aabb::from_center_size(transform.position, self.kind.size())
    }

    /// Run one AI tick. Returns true when an attack pulse fires this tick.
    pub fn update(
        &mut self,
        transform: &mut Transform,
        velocity: &mut Velocity,
        target: Vec3,
        dt: f32,
        now: f32,
    ) -> bool {
        if self.flash.as_mut().is_some_and(|f| f.update(dt)) {
            self.flash = None;
        }

        let distance = horizontal_distance(transform.position, target);
        let home_distance = self
            .home()
            .map_or(f32::INFINITY, |home| horizontal_distance(transform.position, home));

        let next = self.state.next(&self.stats, distance, home_distance);
        if next != self.state {
            log::debug!(
                "{} {:?} -> {:?} (player at {:.1})",
                self.kind.name(),
                self.state,
                next,
                distance
            );
            self.state = next;
        }

        match self.state {
            EnemyState::Patrol => {
                if let Some(waypoint) = self.patrol_route.get(self.current_waypoint).copied() {
                    if horizontal_distance(transform.position, waypoint) < WAYPOINT_REACHED {
                        self.current_waypoint =
                            (self.current_waypoint + 1) % self.patrol_route.len();
                    }
                }
                match self.patrol_route.get(self.current_waypoint).copied() {
                    Some(waypoint) => {
                        self.move_towards(transform, velocity, waypoint, self.stats.speed, dt)
                    }
                    None => velocity.linear = Vec3::ZERO,
                }
                false
            }
            EnemyState::Chase => {
                let speed = self.stats.speed * CHASE_SPEED_MULT;
                self.move_towards(transform, velocity, target, speed, dt);
                false
            }
            EnemyState::Attack => {
                velocity.linear = Vec3::ZERO;
                transform.face_direction(target - transform.position);
                let ready = self
                    .last_attack_time
                    .map_or(true, |last| now - last >= self.stats.attack_cooldown);
                if ready {
                    self.last_attack_time = Some(now);
                }
                ready
            }
            EnemyState::Retreat => {
                match self.home() {
                    Some(home) => {
                        let speed = self.stats.speed * RETREAT_SPEED_MULT;
                        self.move_towards(transform, velocity, home, speed, dt);
                    }
                    None => velocity.linear = Vec3::ZERO,
                }
                false
            }
        }
    }

    fn move_towards(
        &self,
        transform: &mut Transform,
        velocity: &mut Velocity,
        goal: Vec3,
        speed: f32,
        dt: f32,
    ) {
        let to_goal = goal - transform.position;
        let flat = Vec3::new(to_goal.x, 0.0, to_goal.z);
        let direction = flat.normalize_or_zero();
        velocity.linear = direction * speed;
        // Stop on the goal instead of stepping past it on long frames.
        let step = (speed * dt).min(flat.length());
        transform.position += direction * step;
        transform.face_direction(direction);
    }

    /// Apply damage. Returns true if the enemy is now dead.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health.take_damage(amount);
        self.flash = Some(Lifetime::new(DAMAGE_FLASH_SECS));
        if self.health.percentage() <= RETREAT_HEALTH_FRACTION
            && self.state != EnemyState::Retreat
        {
            log::debug!("{} badly hurt, retreating", self.kind.name());
            self.state = EnemyState::Retreat;
        }
        self.health.is_dead()
    }
}

fn horizontal_distance(a: Vec3, b: Vec3) -> f32 {
    let d = b - a;
    (d.x * d.x + d.z * d.z).sqrt()
}

/// Bundle of components for spawning an enemy.
pub struct EnemyBundle {
    pub transform: Transform,
    pub velocity: Velocity,
    pub enemy: Enemy,
}

impl EnemyBundle {
    /// Enemy of `kind` standing on the floor at `ground` (y is replaced by half its height).
    pub fn new(kind: EnemyKind, ground: Vec3) -> Self {
        let position = Vec3::new(ground.x, kind.size().y * 0.5, ground.z);
        Self {
            transform: Transform {
                position,
                rotation: Quat::IDENTITY,
                scale: Vec3::ONE,
            },
            velocity: Velocity::default(),
            enemy: Enemy::new(kind, position),
        }
    }

    pub fn with_collider(mut self, collider: ColliderHandle) -> Self {
        self.enemy.collider = Some(collider);
        self
    }

    /// Spawn into the ECS world.
    pub fn spawn(self, world: &mut hecs::World) -> hecs::Entity {
        world.spawn((self.transform, self.velocity, self.enemy))
    }
}
