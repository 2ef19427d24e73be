//! Ошибки movement протокола

use std::fmt;

use thiserror::Error;

use super::{ObserverId, WorldObjectId};

/// Что observer возвращает из hook'а
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObserverError {
    /// Observer отклонил pending move/rotate (veto)
    #[error("rejected: {reason}")]
    Rejected { reason: String },
    /// Observer сломался (внутренняя ошибка)
    #[error("failed: {reason}")]
    Failed { reason: String },
}

impl ObserverError {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self::Rejected { reason: reason.into() }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed { reason: reason.into() }
    }
}

/// Фаза протокола, в которой сработал observer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementPhase {
    WillMove,
    DidMove,
    WillRotate,
    DidRotate,
}

impl fmt::Display for MovementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementPhase::WillMove => "will_move",
            MovementPhase::DidMove => "did_move",
            MovementPhase::WillRotate => "will_rotate",
            MovementPhase::DidRotate => "did_rotate",
        };
        f.write_str(name)
    }
}

/// Ошибки movement API
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MovementError {
    /// Ошибка в will_* — цепочка прервана, commit не произошёл, did_* не вызван
    #[error("{phase} on {object} aborted by {observer}: {source}")]
    ObserverAborted {
        object: WorldObjectId,
        observer: ObserverId,
        phase: MovementPhase,
        source: ObserverError,
    },
    /// Ошибка в did_* — commit уже случился и не откатывается
    #[error("{phase} on {object} failed in {observer}: {source}")]
    ObserverPostFailure {
        object: WorldObjectId,
        observer: ObserverId,
        phase: MovementPhase,
        source: ObserverError,
    },
}

impl MovementError {
    pub fn phase(&self) -> MovementPhase {
        match self {
            MovementError::ObserverAborted { phase, .. }
            | MovementError::ObserverPostFailure { phase, .. } => *phase,
        }
    }

    pub fn observer(&self) -> ObserverId {
        match self {
            MovementError::ObserverAborted { observer, .. }
            | MovementError::ObserverPostFailure { observer, .. } => *observer,
        }
    }
}
