//! Movement events (ECS сторона протокола)
//!
//! # Flow
//! 1. Внешняя система пишет `MoveIntent` / `RotateIntent`
//! 2. `apply_movement_intents` гоняет протокол на `WorldObject`
//! 3. Результат: `WorldObjectMoved` / `WorldObjectRotated` или `MovementRejected`

use bevy::prelude::*;

use crate::vecmath::{Quaternion, Vector3};

use super::{MovementPhase, WorldObjectId};

/// Event: намерение передвинуть WorldObject
#[derive(Event, Debug, Clone)]
pub struct MoveIntent {
    pub entity: Entity,
    pub target: Vector3,
}

/// Event: намерение повернуть WorldObject
#[derive(Event, Debug, Clone)]
pub struct RotateIntent {
    pub entity: Entity,
    pub target: Quaternion,
}

/// Event: move закоммичен (после did_move pass)
#[derive(Event, Debug, Clone)]
pub struct WorldObjectMoved {
    pub entity: Entity,
    pub object: WorldObjectId,
    pub requested: Vector3,
    pub committed: Vector3,
}

/// Event: rotation закоммичен (после did_rotate pass)
#[derive(Event, Debug, Clone)]
pub struct WorldObjectRotated {
    pub entity: Entity,
    pub object: WorldObjectId,
    pub requested: Quaternion,
    pub committed: Quaternion,
}

/// Event: observer отклонил intent в will_* (состояние не менялось)
#[derive(Event, Debug, Clone)]
pub struct MovementRejected {
    pub entity: Entity,
    pub object: WorldObjectId,
    pub phase: MovementPhase,
    pub reason: String,
}
