//! # FinGraph Config
//!
//! Typed configuration for chart rendering, period defaults and export.
//!
//! Configuration is read from YAML or TOML, adjusted by `FINGRAPH_*`
//! environment variables and validated before use. Everything has a
//! default, so an empty file (or no file at all) yields a usable config.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use defaults::*;
pub use loader::*;
pub use schema::*;
pub use validator::*;
