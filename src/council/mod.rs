//! Client for the council's bin collection form.

pub mod client;
pub mod dates;
pub mod errors;
pub mod form;
pub mod parse;
pub mod session;

pub use client::{FormPageClient, HttpSettings};
pub use errors::BinDayError;
pub use form::FormConfig;
pub use parse::{AddressEntry, CollectionScheduleRow};
pub use session::SessionTokens;
