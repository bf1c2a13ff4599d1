//! Application state for the donor scheduler API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::ClinicConfig;
use crate::identity::{IdentityProvider, TrustedHeaderIdentity};
use crate::store::Store;

/// Source of "today" for eligibility and booking decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Clock {
    /// The local calendar date.
    #[default]
    System,
    /// A pinned date.
    Fixed(NaiveDate),
}

impl Clock {
    /// Today's date according to this clock.
    pub fn today(&self) -> NaiveDate {
        match self {
            Clock::System => Local::now().date_naive(),
            Clock::Fixed(date) => *date,
        }
    }
}

/// Shared application state.
///
/// Every request takes the store lock once: a read lock for queries, a
/// write lock for mutations. Writes flush the snapshot before the lock is
/// released.
#[derive(Clone)]
pub struct AppState {
    store: Arc<RwLock<Box<dyn Store>>>,
    identity: Arc<dyn IdentityProvider>,
    config: Arc<ClinicConfig>,
    clock: Clock,
}

impl AppState {
    /// Creates the state with header-based identity and the system clock.
    pub fn new(store: impl Store + 'static, config: ClinicConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(Box::new(store))),
            identity: Arc::new(TrustedHeaderIdentity),
            config: Arc::new(config),
            clock: Clock::System,
        }
    }

    /// Replaces the identity provider.
    pub fn with_identity(mut self, identity: impl IdentityProvider + 'static) -> Self {
        self.identity = Arc::new(identity);
        self
    }

    /// Replaces the clock.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Locks the store for reading.
    pub async fn read(&self) -> RwLockReadGuard<'_, Box<dyn Store>> {
        self.store.read().await
    }

    /// Locks the store for writing.
    pub async fn write(&self) -> RwLockWriteGuard<'_, Box<dyn Store>> {
        self.store.write().await
    }

    /// Returns the identity provider.
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Returns the clinic configuration.
    pub fn config(&self) -> &ClinicConfig {
        &self.config
    }

    /// Today's date.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }
}
