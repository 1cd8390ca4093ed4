//! Durable Store
//!
//! Owns the data file. Reads go through the shared cache; writes go to a
//! sibling temp file that is then renamed over the target, so the target is
//! always either the previous or the new complete document.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::ReentrantMutex;
use tracing::{debug, info, warn};

use crate::cache::Cache;
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::store::{Order, PersistedState, Table, MAX_TABLES};

/// Cache key of the full dataset snapshot.
pub const SNAPSHOT_KEY: &str = "data";
/// Cache key of the orders projection.
pub const ORDERS_KEY: &str = "orders";
/// Cache key of the tables projection.
pub const TABLES_KEY: &str = "tables";

// == Cached Data ==
/// Values the store keeps in the shared cache.
#[derive(Debug, Clone)]
pub enum CachedData {
    State(Arc<PersistedState>),
    Orders(Arc<Vec<Order>>),
    Tables(Arc<Vec<Table>>),
}

// == Durable Store ==
#[derive(Debug)]
pub struct DurableStore {
    path: PathBuf,
    table_count: u32,
    cache: Arc<Cache<CachedData>>,
    /// Serializes file access; re-entrant so `write` can call `load` and `save`
    lock: ReentrantMutex<()>,
}

impl DurableStore {
    pub fn new(path: impl Into<PathBuf>, table_count: u32, cache: Arc<Cache<CachedData>>) -> Self {
        Self {
            path: path.into(),
            table_count,
            cache,
            lock: ReentrantMutex::new(()),
        }
    }

    pub fn from_config(config: &Config, cache: Arc<Cache<CachedData>>) -> Self {
        let table_count = u32::try_from(config.table_count)
            .unwrap_or(MAX_TABLES)
            .clamp(1, MAX_TABLES);
        Self::new(config.data_file.clone(), table_count, cache)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn cache(&self) -> &Arc<Cache<CachedData>> {
        &self.cache
    }

    // == Load ==
    /// Returns the current dataset, from cache when possible.
    ///
    /// A missing or unreadable data file is not an error: the default dataset
    /// is cached and returned instead.
    pub fn load(&self) -> Arc<PersistedState> {
        if let Some(CachedData::State(state)) = self.cache.get(SNAPSHOT_KEY) {
            return state;
        }

        let _guard = self.lock.lock();
        let state = match self.read_file() {
            Ok(state) => {
                debug!(path = %self.path.display(), "Loaded data file");
                state
            }
            Err(ServerError::Io(e)) if e.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No data file yet, using defaults");
                PersistedState::with_tables(self.table_count)
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read data file, using defaults");
                PersistedState::with_tables(self.table_count)
            }
        };

        let state = Arc::new(state);
        self.cache
            .set(SNAPSHOT_KEY, CachedData::State(Arc::clone(&state)));
        state
    }

    // == Save ==
    /// Atomically replaces the data file with `state` and refreshes the cache.
    ///
    /// IO failures are returned and the temp file is removed; the previous
    /// file stays intact unless the final rename itself succeeded.
    pub fn save(&self, state: &PersistedState) -> Result<()> {
        let _guard = self.lock.lock();

        let replaced = self
            .write_temp(state)
            .and_then(|temp| fs::rename(&temp, &self.path).map_err(ServerError::from));
        if let Err(e) = &replaced {
            warn!(path = %self.path.display(), error = %e, "Failed to replace data file");
            let _ = fs::remove_file(self.temp_path());
        }
        replaced?;

        self.cache
            .set(SNAPSHOT_KEY, CachedData::State(Arc::new(state.clone())));
        self.cache.invalidate(Some(ORDERS_KEY));
        self.cache.invalidate(Some(TABLES_KEY));
        debug!(
            orders = state.orders.len(),
            tables = state.tables.len(),
            "Saved data file"
        );
        Ok(())
    }

    // == Write ==
    /// Runs `mutate` on a copy of the dataset and saves the result.
    ///
    /// The store lock is held from load to save, so concurrent writers are
    /// applied one after another. Nothing is saved if `mutate` fails.
    pub fn write<T, F>(&self, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut PersistedState) -> Result<T>,
    {
        let _guard = self.lock.lock();
        let mut state = PersistedState::clone(&self.load());
        let output = mutate(&mut state)?;
        self.save(&state)?;
        Ok(output)
    }

    // == Projections ==
    /// Orders, newest first, cached under [`ORDERS_KEY`].
    pub fn orders(&self) -> Arc<Vec<Order>> {
        if let Some(CachedData::Orders(orders)) = self.cache.get(ORDERS_KEY) {
            return orders;
        }
        let _guard = self.lock.lock();
        let orders = Arc::new(self.load().orders.clone());
        self.cache
            .set(ORDERS_KEY, CachedData::Orders(Arc::clone(&orders)));
        orders
    }

    /// Tables, cached under [`TABLES_KEY`].
    pub fn tables(&self) -> Arc<Vec<Table>> {
        if let Some(CachedData::Tables(tables)) = self.cache.get(TABLES_KEY) {
            return tables;
        }
        let _guard = self.lock.lock();
        let tables = Arc::new(self.load().tables.clone());
        self.cache
            .set(TABLES_KEY, CachedData::Tables(Arc::clone(&tables)));
        tables
    }

    fn read_file(&self) -> Result<PersistedState> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name: OsString = self.path.clone().into_os_string();
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Writes and fsyncs `state` to the temp path without touching the target.
    fn write_temp(&self, state: &PersistedState) -> Result<PathBuf> {
        let temp = self.temp_path();
        let mut writer = BufWriter::new(File::create(&temp)?);
        serde_json::to_writer_pretty(&mut writer, state)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(temp)
    }
}
