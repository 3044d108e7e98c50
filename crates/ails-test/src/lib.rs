//! Shared test fixtures for AILS crates.
//!
//! This crate provides synthetic instances and ready-made solutions. It only
//! depends on `ails-core` so every other crate can use it as a dev-dependency.
//!
//! - [`instances`] - synthetic CVRP instances (ring, grid, the ten-customer scenario)
//! - [`solutions`] - hand-built solutions over those instances
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! ails-test = { workspace = true }
//! ```
//!
//! ```
//! use ails_test::instances::ten_customer_scenario;
//!
//! let instance = ten_customer_scenario();
//! assert_eq!(instance.size(), 10);
//! assert_eq!(instance.min_number_routes(), 2);
//! ```

pub mod instances;
pub mod solutions;

pub use instances::{grid, ring, ten_customer_scenario, tight};
pub use solutions::{one_route_per_customer, single_route};
