use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use indexmap::IndexMap;

/// Manifest file name, both in the training directory and inside archives.
pub const MANIFEST_FILE: &str = "MANIFEST.MF";

/// Manifest attribute naming the classifier builder that understands the
/// rest of the container.
pub const BUILDER_ATTRIBUTE: &str = "classifierBuilderClass";

/// Errors raised while reading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("malformed manifest line: {0}")]
    Malformed(String),
    #[error("manifest has no classifierBuilderClass attribute")]
    MissingBuilder,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A jar-style manifest: ordered `Key: Value` lines.
///
/// The one attribute this crate depends on is [`BUILDER_ATTRIBUTE`], which
/// records the concrete builder a packaged classifier must be loaded with.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    attributes: IndexMap<String, String>,
}

impl Manifest {
    /// Creates the standard manifest for one classifier builder.
    pub fn for_builder(builder: &str) -> Self {
        let mut attributes = IndexMap::new();
        attributes.insert("Manifest-Version".to_string(), "1.0".to_string());
        attributes.insert(BUILDER_ATTRIBUTE.to_string(), builder.to_string());
        Self { attributes }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// The recorded classifier-builder tag.
    pub fn builder_class(&self) -> Result<&str, ManifestError> {
        self.get(BUILDER_ATTRIBUTE)
            .ok_or(ManifestError::MissingBuilder)
    }

    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut attributes = IndexMap::new();
        for line in text.lines() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (key, value) = line
                .split_once(": ")
                .ok_or_else(|| ManifestError::Malformed(line.to_string()))?;
            attributes.insert(key.to_string(), value.to_string());
        }
        Ok(Self { attributes })
    }

    /// Writes `MANIFEST.MF` into a training directory.
    pub fn write_to(&self, dir: &Path) -> io::Result<()> {
        fs::write(dir.join(MANIFEST_FILE), self.to_string())
    }

    /// Reads `MANIFEST.MF` from a training directory.
    pub fn read_from(dir: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(dir.join(MANIFEST_FILE))?;
        Self::parse(&text)
    }
}

impl fmt::Display for Manifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.attributes {
            writeln!(f, "{}: {}", key, value)?;
        }
        Ok(())
    }
}
