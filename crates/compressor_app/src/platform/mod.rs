mod app;
mod config;
mod effects;
mod selection;
mod ui;

pub use app::run_app;
