//! Data models for mortgage offers and configuration.

pub mod config;
pub mod offer;
