pub mod config;
pub mod error;
pub mod keys;
pub mod types;

pub use error::{Error, Result};
pub use types::*;
