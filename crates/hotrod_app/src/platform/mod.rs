mod app;
mod config;
mod dialog;
mod lifecycle;
mod logging;
mod navigation;
mod surface;

pub use app::run_app;
