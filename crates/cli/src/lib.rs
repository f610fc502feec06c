//! `leadmerge-cli` library: campaign operations and single-file inspection,
//! shared by the `leadmerge` binary and its integration tests.

pub mod campaign;
pub mod inspect;
