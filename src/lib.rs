pub mod app;
pub mod card;
pub mod config;
pub mod ingest;
pub mod logging;
pub mod maker;
pub mod model;
pub mod store;
pub mod theme;
pub mod ui;
