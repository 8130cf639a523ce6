//! Host-facing configuration (data) and the strategy lifecycle contract (behavior).
//!
//! `config` exposes the validated [`StrategyConfig`] covering client credentials, endpoint
//! templates, parameter allowlists, and state entropy. `builder` assembles it from code or
//! from deserialized settings. `strategy` defines [`Strategy`], the two-phase contract every
//! provider plugin implements for the hosting middleware.

pub mod builder;
pub mod config;
pub mod strategy;

pub use builder::*;
pub use config::*;
pub use strategy::*;
