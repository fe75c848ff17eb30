//! Serialisation strategies for the three artifact kinds.
//!
//! The pipeline in [`crate::lingua::tree::build`] decides where files go and
//! which paths they reference; an [`ArtifactFormat`] only decides what the
//! bytes look like.

pub mod document;
pub mod module;

use std::path::Path;

use serde_json::{Map, Value};

use crate::lingua::tree::error::Result;
use crate::lingua::tree::io::paths;
use crate::lingua::tree::model::{Language, SheetArtifacts};

pub use document::DocumentFormat;
pub use module::ModuleFormat;

/// A leaf reference as seen from the parent artifact's folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeafRef {
    pub language: Language,
    /// Forward-slash path of the leaf relative to the parent, `./`-prefixed.
    pub reference: String,
}

/// A sheet reference as seen from the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRef {
    pub sheet: String,
    /// Forward-slash path of the sheet's parent artifact relative to the root.
    pub parent: String,
    /// Forward-slash path of the sheet's leaf for the root's language.
    pub leaf: String,
}

impl SheetRef {
    /// Describes `artifacts` relative to `root` for one language.
    pub fn new(root: &Path, artifacts: &SheetArtifacts, language: Language) -> Self {
        let leaf = artifacts
            .leaves
            .get(&language)
            .map(|leaf| paths::to_reference(&paths::relative_to(leaf, root)))
            .unwrap_or_default();
        Self {
            sheet: artifacts.sheet.clone(),
            parent: paths::to_reference(&paths::relative_to(&artifacts.parent, root)),
            leaf,
        }
    }
}

/// Output flavour of a translation tree.
pub trait ArtifactFormat {
    /// File extension without the leading dot.
    fn extension(&self) -> &'static str;

    /// Renders the key → text mapping of one sheet and language.
    fn render_leaf(&self, entries: &Map<String, Value>) -> Result<String>;

    /// Renders the per-sheet artifact referencing the sheet's leaves.
    fn render_parent(&self, leaves: &[LeafRef]) -> Result<String>;

    /// Renders the per-language artifact referencing every processed sheet.
    fn render_root(&self, language: Language, sheets: &[SheetRef]) -> Result<String>;
}

/// Selects one of the built-in formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// JavaScript ES modules with `export default`.
    #[default]
    Module,
    /// Plain JSON documents.
    Document,
}

impl OutputFormat {
    pub fn artifact_format(self) -> Box<dyn ArtifactFormat> {
        match self {
            OutputFormat::Module => Box::new(ModuleFormat),
            OutputFormat::Document => Box::new(DocumentFormat),
        }
    }
}
