//! Analysis units: one class together with the mutations generated for it.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{Error, InputSet, Result};
use crate::analyzers::mutation::MutationDetails;
use crate::bytecode::ClassTree;

/// A class and its candidate mutations, filtered as one batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisUnit {
    pub class: ClassTree,
    #[serde(default)]
    pub mutations: Vec<MutationDetails>,
}

impl AnalysisUnit {
    pub fn new(class: ClassTree, mutations: Vec<MutationDetails>) -> Self {
        Self { class, mutations }
    }

    /// Load every unit in `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<Self>> {
        let path = path.as_ref();
        let format = UnitFormat::detect(path).ok_or_else(|| Error::UnsupportedInput {
            path: path.to_path_buf(),
        })?;
        let content = fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => Error::Io(e),
        })?;
        let units = format
            .parse(&content)
            .map_err(|message| Error::parse(path, message))?;
        tracing::debug!("loaded {} units from {}", units.len(), path.display());
        Ok(units)
    }

    /// Load the units of every file in `inputs`, in file order.
    ///
    /// A discovered file that does not parse as a unit list is skipped with a
    /// warning. Files named directly must parse.
    pub fn load_all(inputs: &InputSet) -> Result<Vec<Self>> {
        let mut units = Vec::new();
        for path in inputs.files() {
            match Self::load(path) {
                Ok(loaded) => units.extend(loaded),
                Err(Error::Parse { path, message }) if inputs.is_discovered(&path) => {
                    tracing::warn!("skipping {}: not a unit file: {}", path.display(), message);
                }
                Err(e) => return Err(e),
            }
        }
        Ok(units)
    }
}

/// Serialized shape of a unit file.
#[derive(Debug, Deserialize)]
struct UnitFile {
    #[serde(default)]
    units: Vec<AnalysisUnit>,
}

/// On-disk formats analysis units can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitFormat {
    Json,
    Toml,
}

impl UnitFormat {
    /// Detect the format from a file extension.
    pub fn detect(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }

    /// Parse unit file content.
    ///
    /// JSON files may hold a bare array of units or an object with a `units`
    /// array. TOML files use `[[units]]` tables.
    pub fn parse(self, content: &str) -> std::result::Result<Vec<AnalysisUnit>, String> {
        match self {
            Self::Json => {
                if content.trim_start().starts_with('[') {
                    serde_json::from_str(content).map_err(|e| e.to_string())
                } else {
                    serde_json::from_str::<UnitFile>(content)
                        .map(|file| file.units)
                        .map_err(|e| e.to_string())
                }
            }
            Self::Toml => toml::from_str::<UnitFile>(content)
                .map(|file| file.units)
                .map_err(|e| e.to_string()),
        }
    }
}
