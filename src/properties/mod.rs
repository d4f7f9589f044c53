//! Property listing domain
//!
//! Entity model, parameter allow-listing, pagination helpers, and the
//! service composing them over the database pool.

pub mod models;
pub mod pagination;
pub mod params;
pub mod service;

pub use models::{Address, Location, Property, PropertyField};
pub use pagination::{PageInfo, Pagination};
pub use service::{PropertyPage, PropertyService};
