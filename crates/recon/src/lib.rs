//! `leadmerge-recon`: record linkage engine.
//!
//! Pure engine crate: receives loaded tables, returns linked / filtered /
//! deduplicated tables. No file IO.

pub mod dedupe;
pub mod error;
pub mod linker;
pub mod model;
pub mod normalize;
pub mod resolve;
pub mod schema;
pub mod suppress;

pub use error::ReconError;
pub use linker::{build_lookup, link, Linked, Lookup};
pub use model::{NormalizedRecord, OutputColumn};
pub use normalize::{clean_company_key, clean_match_string, extract_domain, identity_key};
pub use resolve::resolve_column;
pub use suppress::SuppressionSet;
