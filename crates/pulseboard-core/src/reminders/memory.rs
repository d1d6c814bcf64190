//! In-process reminder store

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use super::{ReminderKey, ReminderStore};
use crate::error::{Error, Result};

/// Fired-key set held in memory; lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryReminderStore {
    fired: Mutex<HashSet<String>>,
}

impl MemoryReminderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.lock()?.is_empty())
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashSet<String>>> {
        self.fired
            .lock()
            .map_err(|_| Error::Store("reminder set lock poisoned".into()))
    }
}

impl ReminderStore for MemoryReminderStore {
    fn has_fired(&self, key: &ReminderKey) -> Result<bool> {
        Ok(self.lock()?.contains(&key.to_string()))
    }

    fn mark_fired(&self, key: &ReminderKey) -> Result<()> {
        self.lock()?.insert(key.to_string());
        Ok(())
    }

    fn claim(&self, key: &ReminderKey) -> Result<bool> {
        Ok(self.lock()?.insert(key.to_string()))
    }
}
