//! Headless arena session: runs the simulation with a scripted player, either
//! in fixed steps or paced by the wall clock, and logs what happens.

use anyhow::{ensure, Result};
use std::time::Duration;

use arena::{Game, GameConfig, GameEvent, TickStatus};
use engine_core::Time;
use input::{bindings, ElementState, InputState, MouseButton};

/// Scripted player: strafes in circles, sweeps the view, fires on a cadence
/// and cycles weapons.
struct Autopilot {
    input: InputState,
    last_slot: Option<usize>,
}

impl Autopilot {
    fn new() -> Self {
        let mut input = InputState::new();
        input.set_cursor_locked(true);
        input.process_keyboard(bindings::FORWARD, ElementState::Pressed);
        Self {
            input,
            last_slot: None,
        }
    }

    /// Feed this frame's events for simulation time `t`.
    fn drive(&mut self, t: f32, frame: u64) {
        // Alternate strafing direction every 3 seconds.
        let (press, release) = if (t / 3.0) as u32 % 2 == 0 {
            (bindings::LEFT, bindings::RIGHT)
        } else {
            (bindings::RIGHT, bindings::LEFT)
        };
        self.input.process_keyboard(release, ElementState::Released);
        self.input.process_keyboard(press, ElementState::Pressed);

        self.input.process_mouse_motion((4.0, (t * 2.0).sin() as f64 * 2.0));

        if frame % 15 == 0 {
            self.input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        } else {
            self.input.process_mouse_button(MouseButton::Left, ElementState::Released);
        }

        let slot = (t / 10.0) as usize % bindings::WEAPON_SLOTS.len();
        if self.last_slot != Some(slot) {
            let key = bindings::WEAPON_SLOTS[slot];
            self.input.process_keyboard(key, ElementState::Pressed);
            self.input.process_keyboard(key, ElementState::Released);
            self.last_slot = Some(slot);
        }
        if frame % 240 == 120 {
            self.input.process_keyboard(bindings::DODGE, ElementState::Pressed);
            self.input.process_keyboard(bindings::DODGE, ElementState::Released);
        }
        if frame % 600 == 300 {
            self.input.process_keyboard(bindings::RELOAD, ElementState::Pressed);
            self.input.process_keyboard(bindings::RELOAD, ElementState::Released);
        }
    }
}

fn log_event(event: &GameEvent) {
    match event {
        GameEvent::ShotFired { weapon, hit } => match hit {
            Some(point) => log::debug!("{} hit at {:.1?}", weapon, point),
            None => log::debug!("{} missed", weapon),
        },
        GameEvent::PlayerDamaged { amount, health } => {
            log::debug!("Player took {:.2} damage ({:.1} left)", amount, health)
        }
        GameEvent::SessionEnded { score, survived } => {
            log::info!("Session over: score {} after {:.1}s", score, survived)
        }
        // Spawns and kills are logged by the simulation itself.
        GameEvent::EnemySpawned { .. } | GameEvent::EnemyKilled { .. } => {}
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    ensure!(config.tick_rate > 0.0, "tick_rate must be positive, got {}", config.tick_rate);
    log::info!(
        "Headless arena: {:.0}s at {} Hz{} (seed {:?})",
        config.duration_secs,
        config.tick_rate,
        if config.realtime { ", wall clock" } else { "" },
        config.seed
    );
    let realtime = config.realtime;

    let mut time = Time::new();
    time.set_fixed_rate(config.tick_rate);
    let duration = Duration::from_secs_f32(config.duration_secs.max(0.0));

    let mut game = Game::new(config);
    let mut pilot = Autopilot::new();
    let mut status = TickStatus::Running;

    while time.elapsed() < duration {
        if realtime {
            // Sleep out the frame, then measure how long it really took.
            std::thread::sleep(time.fixed_timestep());
            time.update();
        } else {
            time.advance_fixed();
        }
        pilot.drive(time.elapsed_seconds(), time.frame_count());

        status = game.tick(time.delta_seconds(), &pilot.input);
        pilot.input.end_frame();

        for event in game.drain_events() {
            log_event(&event);
        }
        if status != TickStatus::Running {
            break;
        }
    }

    let stats = game.player_stats();
    let weapon = game.weapon_snapshot();
    println!(
        "{} after {:.1}s: health {:.0}/{:.0}, stamina {:.0}, score {}, {} {}/{}, {} enemies left",
        if status == TickStatus::Running { "Survived" } else { "Died" },
        game.elapsed(),
        stats.health,
        stats.max_health,
        stats.stamina,
        stats.score,
        weapon.name,
        weapon.ammo,
        weapon.max_ammo,
        game.enemy_count()
    );
    Ok(())
}
