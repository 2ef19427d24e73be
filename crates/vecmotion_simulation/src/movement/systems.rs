//! Movement системы

use bevy::prelude::*;

use crate::logger::log_warning;

use super::{
    MoveIntent, MovementRejected, RotateIntent, WorldObject, WorldObjectMoved, WorldObjectRotated,
};

/// Система: применяет MoveIntent/RotateIntent через observer протокол
///
/// Moves обрабатываются раньше rotations, внутри — в порядке событий.
pub fn apply_movement_intents(
    mut move_intents: EventReader<MoveIntent>,
    mut rotate_intents: EventReader<RotateIntent>,
    mut objects: Query<&mut WorldObject>,
    mut moved: EventWriter<WorldObjectMoved>,
    mut rotated: EventWriter<WorldObjectRotated>,
    mut rejected: EventWriter<MovementRejected>,
) {
    for intent in move_intents.read() {
        let Ok(mut object) = objects.get_mut(intent.entity) else {
            log_warning(&format!("MoveIntent for {:?} without WorldObject", intent.entity));
            continue;
        };

        match object.move_to(intent.target) {
            Ok(report) => {
                moved.write(WorldObjectMoved {
                    entity: intent.entity,
                    object: object.id(),
                    requested: report.requested,
                    committed: report.committed,
                });
            }
            Err(err) => {
                rejected.write(MovementRejected {
                    entity: intent.entity,
                    object: object.id(),
                    phase: err.phase(),
                    reason: err.to_string(),
                });
            }
        }
    }

    for intent in rotate_intents.read() {
        let Ok(mut object) = objects.get_mut(intent.entity) else {
            log_warning(&format!("RotateIntent for {:?} without WorldObject", intent.entity));
            continue;
        };

        match object.rotate_to(intent.target) {
            Ok(report) => {
                rotated.write(WorldObjectRotated {
                    entity: intent.entity,
                    object: object.id(),
                    requested: report.requested,
                    committed: report.committed,
                });
            }
            Err(err) => {
                rejected.write(MovementRejected {
                    entity: intent.entity,
                    object: object.id(),
                    phase: err.phase(),
                    reason: err.to_string(),
                });
            }
        }
    }
}

/// Система: committed position/orientation → Transform (f32)
///
/// Downstream (рендер, spatial index) читает только Transform.
pub fn sync_world_object_transforms(
    mut query: Query<(&WorldObject, &mut Transform), Changed<WorldObject>>,
) {
    for (object, mut transform) in query.iter_mut() {
        let orientation = object.orientation();

        transform.translation = object.position().as_vec3();
        transform.rotation = Quat::from_xyzw(
            orientation.x as f32,
            orientation.y as f32,
            orientation.z as f32,
            orientation.w as f32,
        );
    }
}
