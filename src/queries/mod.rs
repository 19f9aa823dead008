//! Query modules for the RTE client.
//!
//! Each module provides a query struct that borrows from a
//! [`Connection`](crate::connection::Connection) and exposes endpoint-specific
//! methods returning `Result<T>`.

pub mod consumption;

pub use consumption::ConsumptionQuery;
