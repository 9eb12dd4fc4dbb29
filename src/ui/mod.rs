//! Terminal dashboard for the quote snapshot

pub mod app;
pub mod components;
pub mod dashboard;
pub mod state;

pub use app::{run_app, DashboardApp};
pub use dashboard::Dashboard;
pub use state::{Activity, DashboardState};
