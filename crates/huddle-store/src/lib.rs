pub mod models;

mod teams;
mod users;

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use uuid::Uuid;

use huddle_types::models::Team;
use models::User;

/// In-memory domain store: users and teams tables behind one lock.
///
/// Both tables live under the same lock so any team mutation that consults
/// the users table (membership adds, populated views) is a single critical
/// section. Mutations never hold the lock across an await point; the store
/// is non-persistent and process-local.
#[derive(Default)]
pub struct Store {
    inner: RwLock<Tables>,
}

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    teams: HashMap<Uuid, Team>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_read<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Tables) -> Result<T>,
    {
        let tables = self
            .inner
            .read()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&tables)
    }

    fn with_write<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T>,
    {
        let mut tables = self
            .inner
            .write()
            .map_err(|e| anyhow::anyhow!("store lock poisoned: {}", e))?;
        f(&mut tables)
    }
}
