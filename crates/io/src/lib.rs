// File I/O operations

pub mod csv;
pub mod ingest;
pub mod loader;
pub mod xlsx;

pub use ingest::{ingest_file, IngestError, Ingested, SourceFormat, TextEncoding};
pub use loader::{load_primary_folder, load_raw_folder, supported_files, PrimaryLoad, RawLoad, SkippedFile};
