//! WorldObject — владелец position/orientation и списка observers
//!
//! Каждое изменение transform идёт через протокол:
//! `Proposed → will_* (observers по порядку) → Committed → did_*`

use std::fmt;

use bevy::prelude::*;

use crate::logger::{log_error, log_info};
use crate::vecmath::{Quaternion, Vector3};

use super::{
    MovementError, MovementObserver, MovementPhase, ObserverError, ObserverRegistry, ObserverSnapshot,
};

/// Stable ID объекта (передаётся observers как identity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect)]
pub struct WorldObjectId(pub u64);

impl fmt::Display for WorldObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "object#{}", self.0)
    }
}

/// Результат успешного move/rotate
#[derive(Debug, Clone, PartialEq)]
pub struct MovementReport<T> {
    /// Что просил caller
    pub requested: T,
    /// Что реально закоммичено (после переписывания observers)
    pub committed: T,
    /// Ошибки в did_* (уже залогированы, commit не откатывался)
    pub post_failures: Vec<MovementError>,
}

impl<T: PartialEq> MovementReport<T> {
    /// Observers переписали proposed значение
    pub fn was_adjusted(&self) -> bool {
        self.requested != self.committed
    }

    pub fn is_clean(&self) -> bool {
        self.post_failures.is_empty()
    }
}

#[derive(Component, Debug)]
pub struct WorldObject {
    id: WorldObjectId,
    position: Vector3,
    orientation: Quaternion,
    observers: ObserverRegistry,
}

impl WorldObject {
    pub fn new(id: WorldObjectId, position: Vector3, orientation: Quaternion) -> Self {
        Self {
            id,
            position,
            orientation,
            observers: ObserverRegistry::new(),
        }
    }

    pub fn id(&self) -> WorldObjectId {
        self.id
    }

    pub fn position(&self) -> Vector3 {
        self.position
    }

    pub fn orientation(&self) -> Quaternion {
        self.orientation
    }

    /// Registration capability для внешних подсистем (clone = тот же список)
    pub fn observers(&self) -> &ObserverRegistry {
        &self.observers
    }

    /// Двигает объект в `target` через observers.
    ///
    /// Observers могут переписать target (clamp, snap) или отклонить движение.
    /// При отказе позиция не меняется и did_move не вызывается.
    pub fn move_to(&mut self, target: Vector3) -> Result<MovementReport<Vector3>, MovementError> {
        let observers = self.observers.snapshot();

        let mut proposed = target;
        if let Err(err) = self.notify_will_move(&observers, &mut proposed) {
            log_info(&format!("Move of {} rejected: {}", self.id, err));
            return Err(err);
        }

        self.position = proposed;

        Ok(MovementReport {
            requested: target,
            committed: proposed,
            post_failures: self.notify_did_move(&observers),
        })
    }

    /// `move_to(position + delta)`
    pub fn translate_by(&mut self, delta: Vector3) -> Result<MovementReport<Vector3>, MovementError> {
        self.move_to(self.position + delta)
    }

    /// Поворачивает объект в `target` через observers (контракт как у move_to)
    pub fn rotate_to(&mut self, target: Quaternion) -> Result<MovementReport<Quaternion>, MovementError> {
        let observers = self.observers.snapshot();

        let mut proposed = target;
        if let Err(err) = self.notify_will_rotate(&observers, &mut proposed) {
            log_info(&format!("Rotation of {} rejected: {}", self.id, err));
            return Err(err);
        }

        self.orientation = proposed;

        Ok(MovementReport {
            requested: target,
            committed: proposed,
            post_failures: self.notify_did_rotate(&observers),
        })
    }

    /// Только will_move pass (без commit). Для owners со своим commit.
    pub fn will_move(&self, proposed: &mut Vector3) -> Result<(), MovementError> {
        self.notify_will_move(&self.observers.snapshot(), proposed)
    }

    /// Только did_move pass. Возвращает post-commit ошибки.
    pub fn did_move(&self) -> Vec<MovementError> {
        self.notify_did_move(&self.observers.snapshot())
    }

    pub fn will_rotate(&self, proposed: &mut Quaternion) -> Result<(), MovementError> {
        self.notify_will_rotate(&self.observers.snapshot(), proposed)
    }

    pub fn did_rotate(&self) -> Vec<MovementError> {
        self.notify_did_rotate(&self.observers.snapshot())
    }

    fn notify_will_move(&self, observers: &ObserverSnapshot, proposed: &mut Vector3) -> Result<(), MovementError> {
        for (id, observer) in observers {
            observer
                .will_move(self, proposed)
                .map_err(|source| MovementError::ObserverAborted {
                    object: self.id,
                    observer: *id,
                    phase: MovementPhase::WillMove,
                    source,
                })?;
        }
        Ok(())
    }

    fn notify_will_rotate(&self, observers: &ObserverSnapshot, proposed: &mut Quaternion) -> Result<(), MovementError> {
        for (id, observer) in observers {
            observer
                .will_rotate(self, proposed)
                .map_err(|source| MovementError::ObserverAborted {
                    object: self.id,
                    observer: *id,
                    phase: MovementPhase::WillRotate,
                    source,
                })?;
        }
        Ok(())
    }

    fn notify_did_move(&self, observers: &ObserverSnapshot) -> Vec<MovementError> {
        self.collect_post_failures(observers, MovementPhase::DidMove, |observer, object| {
            observer.did_move(object)
        })
    }

    fn notify_did_rotate(&self, observers: &ObserverSnapshot) -> Vec<MovementError> {
        self.collect_post_failures(observers, MovementPhase::DidRotate, |observer, object| {
            observer.did_rotate(object)
        })
    }

    /// did_* pass: все observers вызываются даже если кто-то упал
    fn collect_post_failures<F>(&self, observers: &ObserverSnapshot, phase: MovementPhase, hook: F) -> Vec<MovementError>
    where
        F: Fn(&dyn MovementObserver, &WorldObject) -> Result<(), ObserverError>,
    {
        let mut failures = Vec::new();

        for (id, observer) in observers {
            if let Err(source) = hook(observer.as_ref(), self) {
                let err = MovementError::ObserverPostFailure {
                    object: self.id,
                    observer: *id,
                    phase,
                    source,
                };
                log_error(&err.to_string());
                failures.push(err);
            }
        }

        failures
    }
}
