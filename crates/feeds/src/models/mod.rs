//! Feed models
//!
//! - `lookup` - The identifying key for a fetch (LookupKey)
//! - `record` - Vendor-shaped payloads returned by sources (RawRecord, RawBody)

mod lookup;
mod record;

pub use lookup::LookupKey;
pub use record::{RawBody, RawRecord};
