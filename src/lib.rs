pub mod api;
pub mod concurrent_fetcher;
pub mod models;
pub mod report;
pub mod ui;
