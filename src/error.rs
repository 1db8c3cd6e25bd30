use crate::graph::CalendarId;
use crate::time_unit::TimeUnit;
use std::io;
use thiserror::Error;

/// Programmer errors raised at the engine boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("calendar {0:?} does not exist")]
    UnknownCalendar(CalendarId),
    #[error("hours record belongs to a different week schedule")]
    ForeignHours,
    #[error("time unit {0} cannot express working time")]
    UnsupportedUnit(TimeUnit),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("calendar '{calendar}' refers to unknown parent '{parent}'")]
    UnknownParent { calendar: String, parent: String },
    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
