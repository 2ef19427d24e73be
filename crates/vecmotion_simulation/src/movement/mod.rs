//! Movement domain — перехват изменений position/orientation
//!
//! Содержит:
//! - MovementObserver (will/did hooks, могут переписать proposed значение)
//! - ObserverRegistry (упорядоченный non-owning список, snapshot на каждый pass)
//! - WorldObject (owner transform'а, гоняет протокол вокруг commit)
//! - Готовые observers (BoundsClamp, GridSnap, MovementLock, MovementRecorder)
//! - ECS events + системы + MovementPlugin

mod error;
mod events;
mod observer;
mod observers;
mod registry;
mod systems;
mod world_object;

pub use error::*;
pub use events::*;
pub use observer::*;
pub use observers::*;
pub use registry::*;
pub use systems::*;
pub use world_object::*;

use bevy::prelude::*;

/// Plugin: events + системы протокола в FixedUpdate
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MoveIntent>()
            .add_event::<RotateIntent>()
            .add_event::<WorldObjectMoved>()
            .add_event::<WorldObjectRotated>()
            .add_event::<MovementRejected>()
            .add_systems(
                FixedUpdate,
                (apply_movement_intents, sync_world_object_transforms).chain(),
            );
    }
}
