pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod persistence;
pub mod seed;
pub mod state;
pub mod store;
