use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// Mandatory columns could not be resolved in a source as a whole.
    MissingColumns { source: String, fields: Vec<String> },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingColumns { source, fields } => {
                write!(f, "{source}: missing mandatory columns: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for ReconError {}
