use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Supplementary domain knowledge injected into the system instruction.
///
/// Loaded once at startup and never mutated afterwards. An absent document is
/// represented by an empty context rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceContext(String);

impl ReferenceContext {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for ReferenceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub struct ReferenceStore {
    reference_file: PathBuf,
}

impl ReferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            reference_file: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.reference_file
    }

    pub fn exists(&self) -> bool {
        self.reference_file.is_file()
    }

    /// Reads the reference document. Missing or unreadable files degrade to an
    /// empty context.
    pub fn load(&self) -> ReferenceContext {
        match fs::read_to_string(&self.reference_file) {
            Ok(content) => {
                debug!(
                    "Loaded {} bytes of reference context from {}",
                    content.len(),
                    self.reference_file.display()
                );
                ReferenceContext(content)
            }
            Err(e) => {
                debug!(
                    "No reference context at {} ({e}), continuing without it",
                    self.reference_file.display()
                );
                ReferenceContext::default()
            }
        }
    }
}
