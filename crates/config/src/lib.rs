// Configuration loading

pub mod aliases;

pub use aliases::{AliasConfig, AliasError};
