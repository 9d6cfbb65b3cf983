//! Fitness Analytics Backend Library
//!
//! Hosts the analytics engine behind an HTTP API. This library exposes the
//! backend modules for use in tests and the binary.

pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
