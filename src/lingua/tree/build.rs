use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};

use crate::lingua::tree::emit::{ArtifactFormat, LeafRef, OutputFormat, SheetRef};
use crate::lingua::tree::error::Result;
use crate::lingua::tree::io::excel_read::{self, RawSheet};
use crate::lingua::tree::io::paths;
use crate::lingua::tree::mapping::TreeMapping;
use crate::lingua::tree::model::{
    BuildReport, Language, RootArtifact, SheetArtifacts, SkippedSheet, TranslationSheet,
};

/// Base name of the per-sheet artifact referencing the leaves.
pub const PARENT_STEM: &str = "parent";

/// Notifications raised while a tree is being built, in the order the
/// underlying work happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildEvent<'a> {
    SheetSkipped(&'a SkippedSheet),
    SheetWritten(&'a SheetArtifacts),
    RootWritten(&'a RootArtifact),
}

/// Converts a workbook into a translation tree below `output`.
///
/// The whole workbook is read before anything is written, so an unreadable
/// input leaves the output untouched.
pub fn excel_to_tree(
    input: &Path,
    output: &Path,
    mapping: &TreeMapping,
    format: OutputFormat,
) -> Result<BuildReport> {
    excel_to_tree_with_progress(input, output, mapping, format, |_| {})
}

/// Same as [`excel_to_tree`], reporting each [`BuildEvent`] as it happens.
#[instrument(
    level = "info",
    skip_all,
    fields(input = %input.display(), output = %output.display(), ?format)
)]
pub fn excel_to_tree_with_progress(
    input: &Path,
    output: &Path,
    mapping: &TreeMapping,
    format: OutputFormat,
    progress: impl FnMut(BuildEvent<'_>),
) -> Result<BuildReport> {
    let sheets = excel_read::read_sheets(input)?;
    info!(sheet_count = sheets.len(), "read sheets from workbook");
    let artifact_format = format.artifact_format();
    build_tree_with_progress(sheets, output, mapping, artifact_format.as_ref(), progress)
}

/// Writes leaves and parents for every translation sheet, then one root per
/// language.
pub fn build_tree(
    sheets: Vec<RawSheet>,
    output: &Path,
    mapping: &TreeMapping,
    format: &dyn ArtifactFormat,
) -> Result<BuildReport> {
    build_tree_with_progress(sheets, output, mapping, format, |_| {})
}

/// Same as [`build_tree`], reporting each [`BuildEvent`] as it happens.
#[instrument(
    level = "debug",
    skip(sheets, mapping, format, progress),
    fields(output = %output.display())
)]
pub fn build_tree_with_progress(
    sheets: Vec<RawSheet>,
    output: &Path,
    mapping: &TreeMapping,
    format: &dyn ArtifactFormat,
    mut progress: impl FnMut(BuildEvent<'_>),
) -> Result<BuildReport> {
    let mut report = BuildReport::default();
    let mut parents_in_use: HashSet<PathBuf> = HashSet::new();

    for raw in sheets {
        let sheet = match raw.into_translations() {
            Ok(sheet) => sheet,
            Err(skipped) => {
                warn!(
                    sheet = %skipped.name,
                    missing = ?skipped.missing_columns,
                    "skipping sheet without both language columns"
                );
                progress(BuildEvent::SheetSkipped(&skipped));
                report.skipped.push(skipped);
                continue;
            }
        };

        let folder = mapping.ensure_folder(output, &sheet.name)?;
        let leaves = write_leaves(&sheet, &folder, format)?;

        let mut parent_path = folder.join(format!("{PARENT_STEM}.{}", format.extension()));
        if !parents_in_use.insert(parent_path.clone()) {
            parent_path = folder.join(format!(
                "{}_{PARENT_STEM}.{}",
                sheet.name,
                format.extension()
            ));
            warn!(
                sheet = %sheet.name,
                folder = %folder.display(),
                "folder already holds another sheet's parent"
            );
            parents_in_use.insert(parent_path.clone());
        }
        write_parent(&parent_path, &leaves, format)?;

        info!(
            sheet = %sheet.name,
            rows = sheet.rows.len(),
            folder = %folder.display(),
            "sheet written"
        );
        let artifacts = SheetArtifacts {
            sheet: sheet.name,
            folder,
            leaves,
            parent: parent_path,
        };
        progress(BuildEvent::SheetWritten(&artifacts));
        report.sheets.push(artifacts);
    }

    fs::create_dir_all(output)?;
    for language in Language::ALL {
        let path = write_root(output, &report.sheets, language, format)?;
        let root = RootArtifact { language, path };
        progress(BuildEvent::RootWritten(&root));
        report.roots.push(root);
    }

    Ok(report)
}

/// Writes `<sheet>_<language>.<ext>` for each language into `folder`.
pub fn write_leaves(
    sheet: &TranslationSheet,
    folder: &Path,
    format: &dyn ArtifactFormat,
) -> Result<BTreeMap<Language, PathBuf>> {
    let mut leaves = BTreeMap::new();
    for language in Language::ALL {
        let path = folder.join(format!("{}_{language}.{}", sheet.name, format.extension()));
        let rendered = format.render_leaf(&sheet.entries(language))?;
        fs::write(&path, rendered)?;
        debug!(path = %path.display(), "leaf written");
        leaves.insert(language, path);
    }
    Ok(leaves)
}

/// Writes the parent artifact at `path`, referencing `leaves` relative to
/// the parent's own folder.
pub fn write_parent(
    path: &Path,
    leaves: &BTreeMap<Language, PathBuf>,
    format: &dyn ArtifactFormat,
) -> Result<()> {
    let base = path.parent().unwrap_or_else(|| Path::new(""));
    let references: Vec<LeafRef> = leaves
        .iter()
        .map(|(language, leaf)| LeafRef {
            language: *language,
            reference: paths::to_reference(&paths::relative_to(leaf, base)),
        })
        .collect();
    fs::write(path, format.render_parent(&references)?)?;
    debug!(path = %path.display(), "parent written");
    Ok(())
}

/// Writes `<root>/<language>.<ext>` referencing every processed sheet.
pub fn write_root(
    root: &Path,
    sheets: &[SheetArtifacts],
    language: Language,
    format: &dyn ArtifactFormat,
) -> Result<PathBuf> {
    let references: Vec<SheetRef> = sheets
        .iter()
        .map(|artifacts| SheetRef::new(root, artifacts, language))
        .collect();
    let path = root.join(format!("{language}.{}", format.extension()));
    fs::write(&path, format.render_root(language, &references)?)?;
    info!(path = %path.display(), sheets = references.len(), "root written");
    Ok(path)
}
