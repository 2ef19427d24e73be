//! ObserverRegistry — упорядоченный список non-owning ссылок на observers
//!
//! # Concurrency
//! Registry — shared handle (`Clone` шарит список), register/unregister можно
//! звать из любого потока, в том числе изнутри observer во время notification.
//! Каждый notification pass берёт `snapshot()` ДО первого вызова observer,
//! поэтому изменения списка видны только следующим passes.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, Weak};

use crate::logger::log;

use super::MovementObserver;

/// Handle регистрации (для unregister)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn index(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer#{}", self.0)
    }
}

struct Registration {
    id: ObserverId,
    observer: Weak<dyn MovementObserver>,
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    /// Insertion order = notification order
    entries: Vec<Registration>,
}

/// Live observer на момент snapshot'а
pub type ObserverSnapshot = Vec<(ObserverId, Arc<dyn MovementObserver>)>;

#[derive(Clone, Default)]
pub struct ObserverRegistry {
    inner: Arc<RwLock<RegistryInner>>,
}

impl ObserverRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Регистрирует observer в конец списка.
    ///
    /// Хранится только `Weak`: lifetime observer'а принадлежит тому, кто
    /// регистрирует. Dropped observers пропускаются и вычищаются.
    pub fn register<O: MovementObserver + 'static>(&self, observer: &Arc<O>) -> ObserverId {
        let weak: Weak<O> = Arc::downgrade(observer);
        let weak: Weak<dyn MovementObserver> = weak;

        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let id = ObserverId(inner.next_id);
        inner.next_id += 1;
        inner.entries.push(Registration { id, observer: weak });

        log(&format!("Registered {} ({} total)", id, inner.entries.len()));
        id
    }

    /// Удаляет observer. Порядок остальных не меняется.
    pub fn unregister(&self, id: ObserverId) -> bool {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let before = inner.entries.len();
        inner.entries.retain(|r| r.id != id);

        let removed = inner.entries.len() != before;
        if removed {
            log(&format!("Unregistered {} ({} left)", id, inner.entries.len()));
        }
        removed
    }

    /// Количество регистраций (включая ещё не вычищенные dropped)
    pub fn len(&self) -> usize {
        self.inner.read().unwrap_or_else(PoisonError::into_inner).entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live observers в порядке регистрации
    ///
    /// Заодно вычищает dropped observers. Lock отпускается до возврата,
    /// observers вызываются уже без lock.
    pub fn snapshot(&self) -> ObserverSnapshot {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        let mut live: ObserverSnapshot = Vec::with_capacity(inner.entries.len());

        inner.entries.retain(|r| match r.observer.upgrade() {
            Some(observer) => {
                live.push((r.id, observer));
                true
            }
            None => false,
        });

        live
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry").field("len", &self.len()).finish()
    }
}
