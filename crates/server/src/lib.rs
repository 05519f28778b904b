pub mod clients;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod stats;
pub mod theory_cache;
