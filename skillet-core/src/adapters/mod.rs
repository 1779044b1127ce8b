//! Adapter implementations (DuckDB cache, REST backend, mock backend)

pub mod duckdb;
pub mod mock;
pub mod rest;
