pub mod access;
pub mod api;
pub mod app;
pub mod config;
pub mod errors;
pub mod format;
pub mod freshness;
pub mod handlers;
pub mod models;
pub mod session;
pub mod state;
pub mod storage;
pub mod summary;
pub mod ui;
pub mod weekly;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_session;
