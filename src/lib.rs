// Public library interface for squaremap-rs
// This allows the debug CLI tool to use the core modules

pub mod app;
pub mod data;
pub mod layout;
pub mod render;
pub mod ui;
