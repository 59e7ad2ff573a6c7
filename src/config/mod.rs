// src/config/mod.rs

//! Configuration and input validation.
//!
//! Responsibilities:
//! - Define the TOML-backed config file model (`model.rs`).
//! - Load a config file from disk (`loader.rs`) and validate it
//!   (`validate.rs`).
//! - Merge file and command-line inputs into a validated [`Invocation`]
//!   (`invocation.rs`).

pub mod duration;
pub mod invocation;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use invocation::{Invocation, InvocationInput};
pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, ConsoleSection, InvocationSection, PolicySection, RawConfigFile, WaitSection};
pub use validate::validate_config;
