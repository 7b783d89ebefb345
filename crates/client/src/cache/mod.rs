//! Query cache keyed by resource, filter and page.
//!
//! List and dashboard reads go through [`QueryCache::fetch`]. Mutations
//! declare the key prefixes they affect and call
//! [`QueryCache::invalidate`] once the server has accepted the change.

mod key;
mod store;
mod value;

pub use key::QueryKey;
pub use store::{Invalidation, QueryCache, QueryWatch};
pub use value::{CacheValue, Cached};
