pub mod app;
pub mod config;
pub mod error;
pub mod form;
pub mod loader;
pub mod model;
pub mod probe;
pub mod render;
pub mod signal;
pub mod store;
