use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Value};

/// Header of the column holding the English text.
pub const ENGLISH_COLUMN: &str = "english";
/// Header of the column holding the German text.
pub const DEUTSCH_COLUMN: &str = "deutsch";

/// Languages carried by every translation sheet.
///
/// The declaration order is the order in which artifacts are written and
/// referenced, so output stays stable between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Language {
    English,
    Deutsch,
}

impl Language {
    /// All supported languages in output order.
    pub const ALL: [Language; 2] = [Language::English, Language::Deutsch];

    /// Lowercase name used for column headers, file names and object keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => ENGLISH_COLUMN,
            Language::Deutsch => DEUTSCH_COLUMN,
        }
    }

    /// Name with a leading capital, used in console summaries.
    pub fn title(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Deutsch => "Deutsch",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single line of a translation sheet.
///
/// Values are kept untyped: numbers and booleans from the workbook flow into
/// the output unchanged and empty cells become `null`.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRow {
    pub key: String,
    pub english: Value,
    pub deutsch: Value,
}

impl TranslationRow {
    /// Returns the value stored for the given language.
    pub fn text(&self, language: Language) -> &Value {
        match language {
            Language::English => &self.english,
            Language::Deutsch => &self.deutsch,
        }
    }
}

/// A sheet that carries both language columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationSheet {
    pub name: String,
    pub rows: Vec<TranslationRow>,
}

impl TranslationSheet {
    /// Builds the key → text mapping for one language.
    ///
    /// Later duplicates overwrite earlier values while the key keeps the
    /// position of its first occurrence.
    pub fn entries(&self, language: Language) -> Map<String, Value> {
        let mut entries = Map::new();
        for row in &self.rows {
            entries.insert(row.key.clone(), row.text(language).clone());
        }
        entries
    }
}

/// A sheet left out of the tree because a language column is absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSheet {
    pub name: String,
    pub missing_columns: Vec<String>,
}

impl fmt::Display for SkippedSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Skipping sheet '{}' due to missing required columns ({}).",
            self.name,
            self.missing_columns.join(", ")
        )
    }
}

/// Files written for one processed sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetArtifacts {
    pub sheet: String,
    /// Folder holding the sheet's artifacts.
    pub folder: PathBuf,
    /// Leaf artifact per language.
    pub leaves: BTreeMap<Language, PathBuf>,
    /// Parent artifact referencing the leaves.
    pub parent: PathBuf,
}

/// A root artifact written for one language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootArtifact {
    pub language: Language,
    pub path: PathBuf,
}

impl fmt::Display for RootArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} root file created: {}",
            self.language.title(),
            self.path.display()
        )
    }
}

/// Summary of a whole conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub sheets: Vec<SheetArtifacts>,
    pub skipped: Vec<SkippedSheet>,
    pub roots: Vec<RootArtifact>,
}
