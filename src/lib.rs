//! Page Gate - Purchase-Gated Access to Digital Study Materials
//!
//! This crate implements the purchase transaction lifecycle against a remote
//! payment gateway and the entitlement-gated authorization that has to agree
//! with it on every download.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
