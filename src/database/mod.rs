//! Database connection management and configuration

pub mod connection;

pub use connection::{DatabaseConfig, DatabasePool, Pagination};
