use crate::store::KvStore;
use crate::tracker::DailyChecklistTracker;
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Tracker plus its record store, locked together so every handler sees a
/// consistent pair.
pub struct App {
    pub tracker: DailyChecklistTracker,
    pub store: KvStore,
}

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub app: Arc<Mutex<App>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, tracker: DailyChecklistTracker, store: KvStore) -> Self {
        Self {
            data_path,
            app: Arc::new(Mutex::new(App { tracker, store })),
        }
    }
}
