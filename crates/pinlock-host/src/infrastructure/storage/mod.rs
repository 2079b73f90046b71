//! Persistent storage: the host configuration file.

pub mod config;
