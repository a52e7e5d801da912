//! Mail exchange resolution.
//!
//! [`resolve_exchange`] runs an MX lookup through a [`LookupMx`]
//! implementation and returns the most preferred host picked by
//! [`select_preferred`].

mod error;
mod resolver;
mod select;
mod types;

pub use error::{ExchangeError, LookupFailure};
pub use resolver::{LookupMx, resolve_exchange};
pub use select::select_preferred;
pub use types::ExchangeCandidate;
