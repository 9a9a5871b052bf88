// Application state module

use super::types::Config;
use crate::store::StudentStore;

/// Process-wide resources shared by every request handler.
///
/// The store handle is constructed once at startup and passed in
/// explicitly, never reached as an ambient global.
pub struct AppState {
    pub config: Config,
    pub store: StudentStore,
}

impl AppState {
    pub fn new(config: Config, store: StudentStore) -> Self {
        Self { config, store }
    }
}
