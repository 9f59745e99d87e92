//! # Pool Module
//!
//! Supplies the candidate tracks for one selection request. A pool is read
//! from one of the local track caches and then narrowed by market and
//! artist filters before it is handed to the [`crate::selector`].
//!
//! - [`PoolSource`] - which cache(s) the pool is read from
//! - [`PoolFilter`] - market (ISRC country prefix) and artist id filters
//! - [`load_pool`] - cache lookup plus filtering
//!
//! An empty result is not an error here. The selector reports it as
//! [`crate::selector::Outcome::PoolEmpty`].

mod filter;
mod source;

pub use filter::{PoolFilter, filter_by_artists, filter_by_market};
pub use source::{PoolError, PoolSource, PoolStats, load_pool};
