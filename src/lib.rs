// Library for the binary and for tests

pub mod collector;
pub mod config;
pub mod error;
pub mod host;
pub mod metrics;
pub mod models;
pub mod routes;
pub mod runner;
pub mod version;
pub mod zfs;
