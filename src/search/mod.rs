//! Search orchestration module
//!
//! Fans a query out to every collection over one leased store handle and
//! joins the results into a single payload.

mod executor;

pub use executor::Search;
