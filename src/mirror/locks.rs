//! Named mutexes created on first use.

use crate::utils::lock_recovering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
pub struct KeyedLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyedLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutex shared by every caller asking for `key`.
    pub fn handle(&self, key: &str) -> Arc<Mutex<()>> {
        let mut locks = lock_recovering(&self.locks);
        Arc::clone(locks.entry(key.to_string()).or_default())
    }
}
