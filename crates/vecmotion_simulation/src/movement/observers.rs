//! Готовые observers: clamp, snap, lock, recorder
//!
//! Покрывают типовые сценарии переписывания proposed значения. Всё остальное
//! (физика, коллизии, рендер) — внешние observers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::vecmath::{Quaternion, Vector3};

use super::{MovementObserver, ObserverError, WorldObject, WorldObjectId};

/// Зажимает proposed position в axis-aligned box
#[derive(Debug, Clone, Copy)]
pub struct BoundsClamp {
    pub min: Vector3,
    pub max: Vector3,
}

impl BoundsClamp {
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }
}

impl MovementObserver for BoundsClamp {
    fn will_move(&self, _object: &WorldObject, proposed: &mut Vector3) -> Result<(), ObserverError> {
        if self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z {
            return Err(ObserverError::failed("bounds min exceeds max"));
        }

        proposed.set(
            proposed.x.clamp(self.min.x, self.max.x),
            proposed.y.clamp(self.min.y, self.max.y),
            proposed.z.clamp(self.min.z, self.max.z),
        );
        Ok(())
    }
}

/// Снапает proposed position к ближайшему узлу сетки
#[derive(Debug, Clone, Copy)]
pub struct GridSnap {
    /// Размер клетки (> 0)
    pub cell: f64,
}

impl GridSnap {
    pub fn new(cell: f64) -> Self {
        Self { cell }
    }
}

impl MovementObserver for GridSnap {
    fn will_move(&self, _object: &WorldObject, proposed: &mut Vector3) -> Result<(), ObserverError> {
        if self.cell <= 0.0 || !self.cell.is_finite() {
            return Err(ObserverError::failed(format!("invalid grid cell {}", self.cell)));
        }

        let snap = |v: f64| (v / self.cell).round() * self.cell;
        proposed.set(snap(proposed.x), snap(proposed.y), snap(proposed.z));
        Ok(())
    }
}

/// Veto на движения и/или повороты, пока lock включён
#[derive(Debug, Default)]
pub struct MovementLock {
    moves: AtomicBool,
    rotations: AtomicBool,
}

impl MovementLock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lock_moves(&self, locked: bool) {
        self.moves.store(locked, Ordering::SeqCst);
    }

    pub fn lock_rotations(&self, locked: bool) {
        self.rotations.store(locked, Ordering::SeqCst);
    }

    pub fn is_moves_locked(&self) -> bool {
        self.moves.load(Ordering::SeqCst)
    }

    pub fn is_rotations_locked(&self) -> bool {
        self.rotations.load(Ordering::SeqCst)
    }
}

impl MovementObserver for MovementLock {
    fn will_move(&self, object: &WorldObject, _proposed: &mut Vector3) -> Result<(), ObserverError> {
        if self.is_moves_locked() {
            return Err(ObserverError::rejected(format!("{} is locked in place", object.id())));
        }
        Ok(())
    }

    fn will_rotate(&self, object: &WorldObject, _proposed: &mut Quaternion) -> Result<(), ObserverError> {
        if self.is_rotations_locked() {
            return Err(ObserverError::rejected(format!("{} rotation is locked", object.id())));
        }
        Ok(())
    }
}

/// Один вызов hook'а, как его увидел recorder
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    WillMove { object: WorldObjectId, proposed: Vector3 },
    /// `position` — уже закоммиченное значение
    DidMove { object: WorldObjectId, position: Vector3 },
    WillRotate { object: WorldObjectId, proposed: Quaternion },
    DidRotate { object: WorldObjectId, orientation: Quaternion },
}

/// Пишет все вызовы hooks (диагностика, тесты). Ничего не переписывает.
#[derive(Debug, Default)]
pub struct MovementRecorder {
    calls: Mutex<Vec<RecordedCall>>,
}

impl MovementRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn clear(&self) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    fn push(&self, call: RecordedCall) {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).push(call);
    }
}

impl MovementObserver for MovementRecorder {
    fn will_move(&self, object: &WorldObject, proposed: &mut Vector3) -> Result<(), ObserverError> {
        self.push(RecordedCall::WillMove { object: object.id(), proposed: *proposed });
        Ok(())
    }

    fn did_move(&self, object: &WorldObject) -> Result<(), ObserverError> {
        self.push(RecordedCall::DidMove { object: object.id(), position: object.position() });
        Ok(())
    }

    fn will_rotate(&self, object: &WorldObject, proposed: &mut Quaternion) -> Result<(), ObserverError> {
        self.push(RecordedCall::WillRotate { object: object.id(), proposed: *proposed });
        Ok(())
    }

    fn did_rotate(&self, object: &WorldObject) -> Result<(), ObserverError> {
        self.push(RecordedCall::DidRotate { object: object.id(), orientation: object.orientation() });
        Ok(())
    }
}
