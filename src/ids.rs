//! Time-based record ids.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;

use crate::errors::AppError;

/// Hands out millisecond timestamps, bumped so that every id is strictly
/// greater than the previous one handed out by this generator.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: AtomicI64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Never hand out an id at or below `floor` (e.g. the largest stored id).
    pub fn observe(&self, floor: i64) {
        self.last.fetch_max(floor, Ordering::SeqCst);
    }

    /// Next id, or an error once the observed floor leaves no room above it.
    pub fn next(&self) -> Result<i64, AppError> {
        let now = Utc::now().timestamp_millis();
        let mut current = self.last.load(Ordering::SeqCst);
        loop {
            let bumped = current
                .checked_add(1)
                .ok_or_else(|| AppError::Internal("Record id space exhausted".to_string()))?;
            let candidate = now.max(bumped);
            match self.last.compare_exchange(
                current,
                candidate,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => return Ok(candidate),
                Err(actual) => current = actual,
            }
        }
    }
}
