pub mod app;
pub mod config;
pub mod osc;
pub mod pose;
pub mod render;
