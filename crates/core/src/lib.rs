//! Core types shared by the leadmerge crates.

pub mod table;

pub use table::{Cell, Table};
