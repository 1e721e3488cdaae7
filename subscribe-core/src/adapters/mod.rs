//! Adapters - concrete implementations of ports

pub mod duckdb;

pub use self::duckdb::DuckDbRepository;
