//! DNS MX resolution and the per-batch domain cache.
//!
//! [`resolve_with`] queries any [`LookupMx`] implementation and returns the
//! exchangers sorted by ascending preference. [`DomainCache`] stores one
//! [`DomainRecord`] per domain for the lifetime of a batch.

mod cache;
mod error;
mod options;
mod resolver;
mod types;

pub use cache::DomainCache;
pub use error::MxError;
pub use options::DnsOptions;
pub use resolver::{LookupMx, SystemResolver, resolve_with};
pub use types::{DomainRecord, MxRecord, MxResolution, MxStatus};
