pub mod api;
pub mod app;
pub mod config;
pub mod logging;
pub mod render;
pub mod seed;
pub mod simulation;
pub mod state;
