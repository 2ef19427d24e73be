//! Headless симуляция VECMOTION
//!
//! Несколько WorldObject блуждают случайно (seeded), observers зажимают их в
//! арену, снапают к сетке и иногда замораживают.

use std::sync::Arc;

use bevy::prelude::*;
use rand::Rng;
use vecmotion_simulation::logger::log_info;
use vecmotion_simulation::*;

const OBJECT_COUNT: u64 = 8;
const ARENA_HALF_SIZE: f64 = 16.0;

/// Observers живут здесь: registry хранит только Weak
#[derive(Resource)]
struct ArenaObservers {
    clamp: Arc<BoundsClamp>,
    snap: Arc<GridSnap>,
    lock: Arc<MovementLock>,
}

#[derive(Resource, Default)]
struct RunStats {
    moved: usize,
    rotated: usize,
    rejected: usize,
}

fn spawn_objects(mut commands: Commands, observers: Res<ArenaObservers>) {
    for i in 0..OBJECT_COUNT {
        let object = WorldObject::new(WorldObjectId(i), Vector3::ZERO, Quaternion::IDENTITY);
        object.observers().register(&observers.clamp);
        object.observers().register(&observers.snap);
        // Лочим каждый четвёртый объект
        if i % 4 == 0 {
            object.observers().register(&observers.lock);
        }

        commands.spawn((object, Transform::default()));
    }
}

/// Система: случайные MoveIntent/RotateIntent для всех объектов
fn random_walk(
    mut rng: ResMut<DeterministicRng>,
    query: Query<(Entity, &WorldObject)>,
    mut move_intents: EventWriter<MoveIntent>,
    mut rotate_intents: EventWriter<RotateIntent>,
) {
    for (entity, object) in query.iter() {
        let step = Vector3::new(
            rng.rng.gen_range(-2.0..2.0),
            0.0,
            rng.rng.gen_range(-2.0..2.0),
        );
        move_intents.write(MoveIntent {
            entity,
            target: object.position() + step,
        });

        if rng.rng.gen_bool(0.25) {
            let yaw = rng.rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
            rotate_intents.write(RotateIntent {
                entity,
                target: Quaternion::from_euler(0.0, yaw, 0.0),
            });
        }
    }
}

fn count_outcomes(
    mut stats: ResMut<RunStats>,
    mut moved: EventReader<WorldObjectMoved>,
    mut rotated: EventReader<WorldObjectRotated>,
    mut rejected: EventReader<MovementRejected>,
) {
    stats.moved += moved.read().count();
    stats.rotated += rotated.read().count();
    stats.rejected += rejected.read().count();
}

fn main() {
    let seed = 42;
    println!("Starting VECMOTION headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.add_plugins(SimulationPlugin)
        .insert_resource(ArenaObservers {
            clamp: Arc::new(BoundsClamp::new(
                Vector3::new(-ARENA_HALF_SIZE, 0.0, -ARENA_HALF_SIZE),
                Vector3::new(ARENA_HALF_SIZE, 0.0, ARENA_HALF_SIZE),
            )),
            snap: Arc::new(GridSnap::new(0.25)),
            lock: Arc::new(MovementLock::new()),
        })
        .init_resource::<RunStats>()
        .add_systems(Startup, spawn_objects)
        .add_systems(FixedUpdate, random_walk.before(apply_movement_intents))
        .add_systems(FixedUpdate, count_outcomes.after(sync_world_object_transforms));

    // Запускаем 1000 тиков симуляции
    for tick in 0..1000 {
        // Замораживаем залоченные объекты на вторую половину прогона
        if tick == 500 {
            app.world().resource::<ArenaObservers>().lock.lock_moves(true);
        }

        app.update();

        if tick % 100 == 0 {
            let stats = app.world().resource::<RunStats>();
            log_info(&format!(
                "Tick {}: moved={} rotated={} rejected={}",
                tick, stats.moved, stats.rotated, stats.rejected
            ));
        }
    }

    let snapshot = world_snapshot(app.world_mut());
    println!("Simulation complete! snapshot: {} bytes", snapshot.len());
}
