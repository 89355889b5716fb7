//! Record schemas and the aggregated search payload
//!
//! Records are read-only projections of stored documents. Field names on the
//! wire follow the stored document shape (`_id`, `hotel_name`, ...).

mod types;

pub use types::*;
