use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::lingua::tree::error::{Result, ToolError};

/// Translates sheet names into output folders below the output root.
///
/// Sheets without an entry land in a folder named after the sheet itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TreeMapping {
    folders: BTreeMap<String, String>,
}

impl TreeMapping {
    /// Creates a mapping from `(sheet, folder)` pairs.
    pub fn new<I, S, F>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, F)>,
        S: Into<String>,
        F: Into<String>,
    {
        Self {
            folders: entries
                .into_iter()
                .map(|(sheet, folder)| (sheet.into(), folder.into()))
                .collect(),
        }
    }

    /// Mapping used when no mapping file is supplied.
    pub fn builtin() -> Self {
        Self::new([
            ("greetings", "language/phrases/greetings"),
            ("farewells", "language/phrases/farewells"),
            ("numbers", "language/concepts/numbers"),
        ])
    }

    /// Loads a mapping from a JSON object of sheet name → folder path.
    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)?;
        let mapping: TreeMapping =
            serde_json::from_str(&source).map_err(|err| ToolError::InvalidMapping {
                path: path.to_path_buf(),
                reason: err.to_string(),
            })?;
        mapping.validate(path)?;
        debug!(path = %path.display(), entries = mapping.len(), "tree mapping loaded");
        Ok(mapping)
    }

    pub fn len(&self) -> usize {
        self.folders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    /// Returns the relative folder for `sheet`.
    pub fn resolve<'a>(&'a self, sheet: &'a str) -> &'a str {
        self.folders
            .get(sheet)
            .map(String::as_str)
            .unwrap_or(sheet)
    }

    /// Resolves the folder for `sheet` below `root` and makes sure it exists.
    pub fn ensure_folder(&self, root: &Path, sheet: &str) -> Result<PathBuf> {
        let folder = root.join(self.resolve(sheet));
        fs::create_dir_all(&folder)?;
        Ok(folder)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        for (sheet, folder) in &self.folders {
            let invalid = |reason: String| ToolError::InvalidMapping {
                path: path.to_path_buf(),
                reason,
            };
            if folder.trim().is_empty() {
                return Err(invalid(format!("sheet '{sheet}' maps to an empty folder")));
            }
            let escapes_root = Path::new(folder)
                .components()
                .any(|component| matches!(component, Component::RootDir | Component::Prefix(_)));
            if escapes_root {
                return Err(invalid(format!(
                    "sheet '{sheet}' maps to absolute folder '{folder}'"
                )));
            }
        }
        Ok(())
    }
}
