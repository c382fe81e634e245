//! First-person arena shooter simulation.
//!
//! [`Game`] owns one session: the player controller and its weapons, the
//! enemy set (a `hecs` world), the static arena and the scene used for
//! hit-scan queries. A platform layer feeds it an [`input::InputState`]
//! each frame via [`Game::tick`] and reads back snapshots and events.

pub mod config;
pub mod effects;
pub mod enemy;
pub mod game;
pub mod player;
pub mod snapshot;
pub mod spawner;
pub mod weapons;
pub mod world;

pub use config::{ConfigError, GameConfig};
pub use effects::{EffectKind, VisualEffect};
pub use enemy::{Enemy, EnemyKind, EnemyState, EnemyStats};
pub use game::{Game, GameEvent, TickStatus};
pub use player::{PlayerController, PlayerStats};
pub use snapshot::{EnemyView, PlayerView, SceneSnapshot};
pub use weapons::{FireOutcome, UnknownWeapon, WeaponId, WeaponSnapshot, WeaponSystem};
pub use world::Arena;
