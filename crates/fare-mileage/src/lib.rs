//! Mileage validation for published fares.
//!
//! The [`routing`] module holds the route model and the engines (ticketed
//! point deduction, permissible specified routing, RIO/SAO equalization and
//! the excess mileage surcharge). [`data`] provides in-memory reference stores
//! loaded from CSV/JSON files that implement the collaborator traits the
//! engines depend on.

pub mod config;
pub mod data;
pub mod error;
pub mod routing;
pub mod telemetry;
