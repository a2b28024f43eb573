pub mod app_state;
pub mod config;
pub mod directory;
pub mod registries;
pub mod services;
pub mod tasks;
