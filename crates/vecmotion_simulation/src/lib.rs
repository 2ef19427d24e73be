//! VECMOTION Simulation Core
//!
//! Два независимых компонента:
//! - vecmath: f64 Vector3/Quaternion (aliasing-safe in-place ops, stable angle,
//!   gimbal-aware Euler)
//! - movement: observer протокол вокруг изменения position/orientation
//!   (will_* → commit → did_*), плюс ECS обвязка (events + MovementPlugin)
//!
//! Физика, коллизии, рендер — внешние observers, здесь их нет.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod logger;
pub mod movement;
pub mod vecmath;

pub use logger::{init_logger, LogLevel};
pub use movement::*;
pub use vecmath::*;

/// Конфиг симуляции (Resource)
///
/// Вставить ДО `SimulationPlugin`, иначе берутся defaults.
#[derive(Resource, Debug, Clone)]
pub struct SimulationConfig {
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Частота FixedUpdate (Hz)
    pub tick_hz: f64,
    /// Минимальный уровень логов
    pub min_log_level: LogLevel,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_hz: 60.0,
            min_log_level: LogLevel::Debug,
        }
    }
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = app
            .world()
            .get_resource::<SimulationConfig>()
            .cloned()
            .unwrap_or_default();

        init_logger();
        logger::set_log_level(config.min_log_level);

        // RNG не перезаписываем, если его уже поставил create_headless_app
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.tick_hz))
            .insert_resource(config)
            .add_plugins(MovementPlugin);
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` двигает время ровно на один fixed tick (60Hz),
/// поэтому прогоны с одинаковым seed детерминированы.
pub fn create_headless_app(seed: u64) -> App {
    const TICK_HZ: f64 = 60.0;

    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(SimulationConfig {
            seed,
            tick_hz: TICK_HZ,
            ..default()
        })
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / TICK_HZ)));

    app
}

/// Snapshot всех WorldObject для сравнения детерминизма
///
/// Порядок по WorldObjectId, значения — little-endian биты f64.
pub fn world_snapshot(world: &mut World) -> Vec<u8> {
    let mut query = world.query::<&WorldObject>();
    let mut objects: Vec<_> = query
        .iter(world)
        .map(|o| (o.id(), o.position(), o.orientation()))
        .collect();

    objects.sort_by_key(|(id, _, _)| *id);

    let mut snapshot = Vec::new();
    for (id, position, orientation) in objects {
        snapshot.extend_from_slice(&id.0.to_le_bytes());
        for value in [
            position.x,
            position.y,
            position.z,
            orientation.x,
            orientation.y,
            orientation.z,
            orientation.w,
        ] {
            snapshot.extend_from_slice(&value.to_le_bytes());
        }
    }

    snapshot
}
