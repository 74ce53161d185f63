//! Common utilities and shared types for quescheetah-rs.
//!
//! This crate provides foundational components used across all quescheetah-rs crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based unique identifiers via [`IdGenerator`]
//! - **Clock**: Injectable source of the current moment via [`Clock`]
//!
//! # Example
//!
//! ```no_run
//! use quescheetah_common::{AppResult, Clock, Config, IdGenerator, SystemClock};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID {id} at {}", SystemClock.now());
//!     println!("Listening on port {}", config.server.port);
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod id;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
