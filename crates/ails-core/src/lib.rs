//! AILS Core - problem and solution types for the CVRP search engine
//!
//! This crate provides the data the engine works on:
//! - [`Instance`]: immutable problem data (depot, customers, demands, capacity)
//! - [`Solution`] and [`Route`]: mutable candidates whose cost is kept fresh
//!   after every mutation
//! - [`SolutionRecord`]: the plain-text solution artifact
//! - [`loading`]: CVRPLIB instance parsing

pub mod error;
pub mod instance;
pub mod loading;
pub mod solution;

pub use error::{AilsError, Result};
pub use instance::{DistanceMetric, Instance, InstanceBuilder, Point, DEPOT};
pub use solution::{Route, Solution, SolutionRecord};
