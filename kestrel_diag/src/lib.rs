//! Diagnostics for Kestrel.
//!
//! Every component reports problems through the `Report` trait
//! so that the driver can decide how to present them (or whether to continue at all).

#[macro_use] extern crate log;

pub use crate::message::{Locale, Localize, Localized, get_message_locale};
pub use crate::report::{Kind, Stop, Result, Report, ReportMore, Reporter};
pub use crate::report::{ConsoleReport, CollectedReport, NoReport, stderr_or_plain};

mod message;
mod report;
