pub mod aggregate;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod normalize;
pub mod session;
pub mod state;
pub mod ui;

pub use app::router;
pub use config::AppConfig;
pub use session::{run_pipeline, DashboardSession};
pub use state::AppState;
