//! Core business logic for quescheetah-rs.
//!
//! Services own the domain rules: question validation, vote recording and
//! answer counts. [`record`] renders entities for API responses.

pub mod record;
pub mod services;

pub use record::{Record, RecordBuilder, ToRecord};
pub use services::*;
