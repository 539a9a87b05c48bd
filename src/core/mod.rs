pub mod config;
pub mod error;

pub use config::RolodexConfig;
pub use error::{ErrorKind, Result, RolodexError};
