//! Movement protocol integration test
//!
//! Проверяем:
//! - порядок вызова observers = порядок регистрации
//! - переписанный proposed виден следующим observers и commit
//! - отказ в will_* → остальные не вызываются, commit и did_* не происходят
//! - ошибка в did_* → репорт + лог, commit остаётся
//! - register/unregister во время pass (в том числе из другого потока)

use std::sync::{Arc, Mutex};
use std::thread;

use vecmotion_simulation::logger::{set_logger, MemoryLogger};
use vecmotion_simulation::*;

type Journal = Arc<Mutex<Vec<String>>>;

/// Пишет hooks в общий журнал, опционально переписывает/отклоняет
struct Probe {
    name: &'static str,
    journal: Journal,
    rewrite_to: Option<Vector3>,
    reject: bool,
    fail_after: bool,
}

impl Probe {
    fn new(name: &'static str, journal: &Journal) -> Self {
        Self {
            name,
            journal: journal.clone(),
            rewrite_to: None,
            reject: false,
            fail_after: false,
        }
    }

    fn note(&self, entry: String) {
        self.journal.lock().unwrap().push(entry);
    }
}

impl MovementObserver for Probe {
    fn will_move(&self, _object: &WorldObject, proposed: &mut Vector3) -> Result<(), ObserverError> {
        self.note(format!("{}.will_move({:?})", self.name, (proposed.x, proposed.y, proposed.z)));
        if self.reject {
            return Err(ObserverError::rejected(format!("{} says no", self.name)));
        }
        if let Some(target) = self.rewrite_to {
            *proposed = target;
        }
        Ok(())
    }

    fn did_move(&self, object: &WorldObject) -> Result<(), ObserverError> {
        let p = object.position();
        self.note(format!("{}.did_move({:?})", self.name, (p.x, p.y, p.z)));
        if self.fail_after {
            return Err(ObserverError::failed(format!("{} index out of sync", self.name)));
        }
        Ok(())
    }

    fn will_rotate(&self, _object: &WorldObject, proposed: &mut Quaternion) -> Result<(), ObserverError> {
        self.note(format!("{}.will_rotate", self.name));
        if self.reject {
            return Err(ObserverError::rejected("no rotation"));
        }
        *proposed = Quaternion::IDENTITY;
        Ok(())
    }

    fn did_rotate(&self, _object: &WorldObject) -> Result<(), ObserverError> {
        self.note(format!("{}.did_rotate", self.name));
        Ok(())
    }
}

fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

fn object() -> WorldObject {
    WorldObject::new(WorldObjectId(1), Vector3::ZERO, Quaternion::IDENTITY)
}

#[test]
fn test_observers_run_in_registration_order_and_see_rewrites() {
    let log = journal();
    let o1 = Arc::new(Probe::new("o1", &log));
    let o2 = Arc::new(Probe {
        rewrite_to: Some(Vector3::new(2.0, 2.0, 2.0)),
        ..Probe::new("o2", &log)
    });
    let o3 = Arc::new(Probe::new("o3", &log));

    let mut obj = object();
    obj.observers().register(&o1);
    obj.observers().register(&o2);
    obj.observers().register(&o3);

    let report = obj.move_to(Vector3::new(1.0, 1.0, 1.0)).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            "o1.will_move((1.0, 1.0, 1.0))",
            "o2.will_move((1.0, 1.0, 1.0))",
            "o3.will_move((2.0, 2.0, 2.0))",
            "o1.did_move((2.0, 2.0, 2.0))",
            "o2.did_move((2.0, 2.0, 2.0))",
            "o3.did_move((2.0, 2.0, 2.0))",
        ]
    );
    assert_eq!(report.requested, Vector3::new(1.0, 1.0, 1.0));
    assert_eq!(report.committed, Vector3::new(2.0, 2.0, 2.0));
    assert_eq!(obj.position(), Vector3::new(2.0, 2.0, 2.0));
}

#[test]
fn test_last_rewrite_wins() {
    let log = journal();
    let o2 = Arc::new(Probe {
        rewrite_to: Some(Vector3::new(2.0, 0.0, 0.0)),
        ..Probe::new("o2", &log)
    });
    let o3 = Arc::new(Probe {
        rewrite_to: Some(Vector3::new(3.0, 0.0, 0.0)),
        ..Probe::new("o3", &log)
    });

    let mut obj = object();
    obj.observers().register(&o2);
    obj.observers().register(&o3);

    obj.move_to(Vector3::X_UNIT).unwrap();

    assert_eq!(obj.position(), Vector3::new(3.0, 0.0, 0.0));
}

#[test]
fn test_rejection_stops_chain_without_commit() {
    let log = journal();
    let o1 = Arc::new(Probe::new("o1", &log));
    let o2 = Arc::new(Probe { reject: true, ..Probe::new("o2", &log) });
    let o3 = Arc::new(Probe::new("o3", &log));

    let mut obj = object();
    obj.observers().register(&o1);
    let rejecting = obj.observers().register(&o2);
    obj.observers().register(&o3);

    let err = obj.move_to(Vector3::new(5.0, 0.0, 0.0)).unwrap_err();

    match err {
        MovementError::ObserverAborted { object, observer, phase, source } => {
            assert_eq!(object, WorldObjectId(1));
            assert_eq!(observer, rejecting);
            assert_eq!(phase, MovementPhase::WillMove);
            assert_eq!(source, ObserverError::rejected("o2 says no"));
        }
        other => panic!("expected ObserverAborted, got {:?}", other),
    }

    // o3 не вызван, did_move не вызван ни у кого
    assert_eq!(
        entries(&log),
        vec!["o1.will_move((5.0, 0.0, 0.0))", "o2.will_move((5.0, 0.0, 0.0))"]
    );
    assert_eq!(obj.position(), Vector3::ZERO);
}

#[test]
fn test_rotation_protocol_mirrors_move() {
    let log = journal();
    let o1 = Arc::new(Probe::new("o1", &log));

    let mut obj = object();
    obj.observers().register(&o1);

    let report = obj.rotate_to(Quaternion::from_euler(0.1, 0.2, 0.3)).unwrap();

    assert!(report.was_adjusted());
    assert_eq!(obj.orientation(), Quaternion::IDENTITY);
    assert_eq!(entries(&log), vec!["o1.will_rotate", "o1.did_rotate"]);
}

#[test]
fn test_post_failure_is_reported_and_logged_but_commit_stays() {
    let logger = MemoryLogger::new();
    set_logger(Box::new(logger.clone()));

    let log = journal();
    let o1 = Arc::new(Probe { fail_after: true, ..Probe::new("o1", &log) });
    let o2 = Arc::new(Probe::new("o2", &log));

    let mut obj = object();
    let failing = obj.observers().register(&o1);
    obj.observers().register(&o2);

    let report = obj.move_to(Vector3::Z_UNIT).unwrap();

    assert_eq!(obj.position(), Vector3::Z_UNIT);
    assert!(!report.is_clean());
    assert_eq!(report.post_failures.len(), 1);
    assert_eq!(report.post_failures[0].phase(), MovementPhase::DidMove);
    assert_eq!(report.post_failures[0].observer(), failing);

    // o2.did_move всё равно вызван
    assert!(entries(&log).contains(&"o2.did_move((0.0, 0.0, 1.0))".to_string()));
    assert!(logger.contains(LogLevel::Error, "o1 index out of sync"));
}

/// Во время will_move регистрирует ещё одного observer и снимает себя
struct SelfReplacing {
    registry: ObserverRegistry,
    replacement: Arc<MovementRecorder>,
    own_id: Mutex<Option<ObserverId>>,
}

impl MovementObserver for SelfReplacing {
    fn will_move(&self, _object: &WorldObject, _proposed: &mut Vector3) -> Result<(), ObserverError> {
        if let Some(id) = self.own_id.lock().unwrap().take() {
            self.registry.unregister(id);
            self.registry.register(&self.replacement);
        }
        Ok(())
    }
}

#[test]
fn test_registration_changes_during_pass_apply_to_next_pass() {
    let mut obj = object();
    let replacement = Arc::new(MovementRecorder::new());
    let replacer = Arc::new(SelfReplacing {
        registry: obj.observers().clone(),
        replacement: replacement.clone(),
        own_id: Mutex::new(None),
    });
    let id = obj.observers().register(&replacer);
    *replacer.own_id.lock().unwrap() = Some(id);

    // Первый pass: snapshot взят до изменения, replacement ещё не вызывается
    obj.move_to(Vector3::X_UNIT).unwrap();
    assert!(replacement.calls().is_empty());
    assert_eq!(obj.observers().len(), 1);

    // Второй pass видит новый список
    obj.move_to(Vector3::Y_UNIT).unwrap();
    assert_eq!(
        replacement.calls(),
        vec![
            RecordedCall::WillMove { object: WorldObjectId(1), proposed: Vector3::Y_UNIT },
            RecordedCall::DidMove { object: WorldObjectId(1), position: Vector3::Y_UNIT },
        ]
    );
}

#[test]
fn test_dropped_observer_is_not_notified() {
    let log = journal();
    let o1 = Arc::new(Probe::new("o1", &log));
    let o2 = Arc::new(Probe::new("o2", &log));

    let mut obj = object();
    obj.observers().register(&o1);
    obj.observers().register(&o2);
    drop(o1);

    obj.move_to(Vector3::X_UNIT).unwrap();

    assert!(entries(&log).iter().all(|e| e.starts_with("o2.")));
    assert_eq!(obj.observers().len(), 1);
}

#[test]
fn test_concurrent_registration_while_notifying() {
    const THREADS: usize = 4;
    const PER_THREAD: usize = 50;

    let mut obj = object();
    let registry = obj.observers().clone();
    let first = Arc::new(MovementRecorder::new());
    registry.register(&first);

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = registry.clone();
            thread::spawn(move || {
                let mut kept = Vec::new();
                for i in 0..PER_THREAD {
                    let observer = Arc::new(MovementRecorder::new());
                    let id = registry.register(&observer);
                    if i % 2 == 0 {
                        registry.unregister(id);
                    } else {
                        kept.push(observer);
                    }
                }
                kept
            })
        })
        .collect();

    for step in 0..100 {
        obj.move_to(Vector3::new(step as f64, 0.0, 0.0)).unwrap();
    }

    let kept: Vec<_> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();

    // Первый observer видел все 100 moves (will + did)
    assert_eq!(first.calls().len(), 200);
    assert_eq!(obj.observers().len(), 1 + kept.len());
    assert_eq!(kept.len(), THREADS * PER_THREAD / 2);

    // После гонки следующий pass доходит до всех оставшихся observers
    obj.move_to(Vector3::Z_UNIT).unwrap();
    for observer in &kept {
        assert!(observer.calls().contains(&RecordedCall::DidMove {
            object: WorldObjectId(1),
            position: Vector3::Z_UNIT,
        }));
    }
}
