//! Core domain entities representing the business data model.
//!
//! # Entity Types
//!
//! - [`Link`] - A short code bound to a target URL and optional expiry
//! - [`Visit`] - One recorded resolution of a link
//! - [`VisitorInfo`] - Client metadata attached to a visit
//!
//! Creation inputs live in separate structs (`NewLink`, `NewVisit`) because
//! ids and timestamps are assigned by the store.

pub mod link;
pub mod visit;

pub use link::{Link, MAX_TTL_DAYS, NewLink};
pub use visit::{NewVisit, Visit, VisitorInfo};
