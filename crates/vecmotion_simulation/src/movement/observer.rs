//! MovementObserver — callback вокруг изменения transform у WorldObject

use crate::vecmath::{Quaternion, Vector3};

use super::{ObserverError, WorldObject};

/// Observer движения/поворота WorldObject
///
/// # Flow (один event)
/// 1. `will_*` у всех observers в порядке регистрации, с `&mut proposed`
///    (изменения видны следующим observers и финальному commit)
/// 2. Commit: объект получает (возможно переписанное) значение
/// 3. `did_*` у всех observers, объект уже в committed состоянии
///
/// Ошибка в `will_*` прерывает цепочку и движение. Ошибка в `did_*`
/// репортится, commit остаётся.
///
/// `proposed` заимствован только на время вызова — не сохранять.
/// Все hooks по умолчанию no-op.
pub trait MovementObserver: Send + Sync {
    fn will_move(&self, _object: &WorldObject, _proposed: &mut Vector3) -> Result<(), ObserverError> {
        Ok(())
    }

    fn did_move(&self, _object: &WorldObject) -> Result<(), ObserverError> {
        Ok(())
    }

    fn will_rotate(&self, _object: &WorldObject, _proposed: &mut Quaternion) -> Result<(), ObserverError> {
        Ok(())
    }

    fn did_rotate(&self, _object: &WorldObject) -> Result<(), ObserverError> {
        Ok(())
    }
}
