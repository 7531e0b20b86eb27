//! # FinGraph Common
//!
//! Shared error types, identifiers, logging setup and formatting helpers.
//!
//! Every other crate in the FinGraph workspace builds on the [`FinGraphError`]
//! type and the [`Result`] alias defined here.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{FinGraphError, Result};
pub use logging::{init_default_logging, init_dev_logging, init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
