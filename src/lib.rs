//! Next bin collection days for Guildford addresses, read from the council's
//! web form.

pub mod cache;
pub mod cli;
pub mod config;
pub mod council;
pub mod logging;
pub mod lookup;
pub mod utils;
pub mod web;

pub use council::BinDayError;
pub use lookup::{BinDayLookup, BinSchedule};
