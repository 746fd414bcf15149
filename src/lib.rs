//! Maturity Compass - Adaptive Relationship-Maturity Questionnaire
//!
//! This crate drives a phased questionnaire over an immutable question bank
//! and turns the answers into personal and relationship maturity scores, a
//! maturity zone, and the diagnostics behind them.

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
