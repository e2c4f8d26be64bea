pub mod aggregate;
pub mod app;
pub mod checklist;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
pub mod streak;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use checklist::ChecklistVariant;
pub use state::AppState;
pub use storage::{load_store, resolve_data_path};
pub use tracker::DailyChecklistTracker;
