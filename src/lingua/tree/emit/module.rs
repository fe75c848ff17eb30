use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::lingua::tree::emit::{ArtifactFormat, LeafRef, SheetRef};
use crate::lingua::tree::error::Result;
use crate::lingua::tree::model::Language;

const INDENT: &str = "    ";

/// Writes every artifact as an ES module with a single default export.
///
/// Leaves export their object literal; parents and roots import the files
/// below them and re-export the imported bindings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModuleFormat;

impl ArtifactFormat for ModuleFormat {
    fn extension(&self) -> &'static str {
        "js"
    }

    fn render_leaf(&self, entries: &Map<String, Value>) -> Result<String> {
        let literal = serde_json::to_string_pretty(entries)?;
        Ok(format!("export default {literal};\n"))
    }

    fn render_parent(&self, leaves: &[LeafRef]) -> Result<String> {
        let mut bindings = Bindings::default();
        let mut imports = Vec::with_capacity(leaves.len());
        let mut exports = Vec::with_capacity(leaves.len());

        for leaf in leaves {
            let name = leaf.language.as_str();
            let binding = bindings.claim(name);
            imports.push(import_line(&binding, &leaf.reference));
            exports.push(format!("{}: {binding}", property_key(name)));
        }

        Ok(module_body(&imports, &exports))
    }

    fn render_root(&self, language: Language, sheets: &[SheetRef]) -> Result<String> {
        let mut bindings = Bindings::default();
        let mut imports = Vec::with_capacity(sheets.len());
        let mut exports = Vec::with_capacity(sheets.len());

        for sheet in sheets {
            let binding = bindings.claim(&sheet.sheet);
            imports.push(import_line(&binding, &sheet.parent));
            exports.push(format!(
                "{}: {binding}.{}",
                property_key(&sheet.sheet),
                language.as_str()
            ));
        }

        Ok(module_body(&imports, &exports))
    }
}

/// Hands out `<name>_data` import bindings that are valid identifiers and
/// unique within one module.
#[derive(Debug, Default)]
struct Bindings {
    used: HashSet<String>,
}

impl Bindings {
    fn claim(&mut self, name: &str) -> String {
        let base = format!("{}_data", sanitize_identifier(name));
        if self.used.insert(base.clone()) {
            return base;
        }

        let mut counter = 1;
        loop {
            let candidate = format!("{base}_{counter}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            counter += 1;
        }
    }
}

fn sanitize_identifier(raw: &str) -> String {
    let mut sanitized: String = raw
        .chars()
        .map(|ch| if is_identifier_char(ch) { ch } else { '_' })
        .collect();
    if !sanitized.starts_with(is_identifier_start) {
        sanitized.insert(0, '_');
    }
    sanitized
}

fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

fn is_identifier_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn is_identifier(raw: &str) -> bool {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => is_identifier_start(first) && chars.all(is_identifier_char),
        None => false,
    }
}

fn property_key(name: &str) -> String {
    if is_identifier(name) {
        name.to_string()
    } else {
        Value::String(name.to_string()).to_string()
    }
}

fn import_line(binding: &str, reference: &str) -> String {
    let escaped = reference.replace('\\', "\\\\").replace('\'', "\\'");
    format!("import {binding} from '{escaped}';")
}

fn module_body(imports: &[String], exports: &[String]) -> String {
    let mut body = String::new();
    for import in imports {
        body.push_str(import);
        body.push('\n');
    }
    if !imports.is_empty() {
        body.push('\n');
    }
    if exports.is_empty() {
        body.push_str("export default {};\n");
        return body;
    }
    body.push_str("export default {\n");
    body.push_str(INDENT);
    body.push_str(&exports.join(&format!(",\n{INDENT}")));
    body.push_str("\n};\n");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn leaf_exports_the_object_literal() {
        let entries = json!({"hello": "Hello"});
        let entries = entries.as_object().expect("object literal");

        let rendered = ModuleFormat.render_leaf(entries).expect("leaf rendered");

        assert_eq!(rendered, "export default {\n  \"hello\": \"Hello\"\n};\n");
    }

    #[test]
    fn parent_imports_both_languages() {
        let leaves = [
            LeafRef {
                language: Language::English,
                reference: "./greetings_english.js".into(),
            },
            LeafRef {
                language: Language::Deutsch,
                reference: "./greetings_deutsch.js".into(),
            },
        ];

        let rendered = ModuleFormat.render_parent(&leaves).expect("parent rendered");

        assert_eq!(
            rendered,
            "import english_data from './greetings_english.js';\n\
             import deutsch_data from './greetings_deutsch.js';\n\
             \n\
             export default {\n    english: english_data,\n    deutsch: deutsch_data\n};\n"
        );
    }

    #[test]
    fn root_selects_the_language_from_each_parent() {
        let sheets = [
            SheetRef {
                sheet: "greetings".into(),
                parent: "./language/phrases/greetings/parent.js".into(),
                leaf: "./language/phrases/greetings/greetings_english.js".into(),
            },
            SheetRef {
                sheet: "numbers".into(),
                parent: "./language/concepts/numbers/parent.js".into(),
                leaf: "./language/concepts/numbers/numbers_english.js".into(),
            },
        ];

        let rendered = ModuleFormat
            .render_root(Language::English, &sheets)
            .expect("root rendered");

        assert_eq!(
            rendered,
            "import greetings_data from './language/phrases/greetings/parent.js';\n\
             import numbers_data from './language/concepts/numbers/parent.js';\n\
             \n\
             export default {\n    greetings: greetings_data.english,\n    numbers: numbers_data.english\n};\n"
        );
    }

    #[test]
    fn awkward_sheet_names_get_unique_bindings_and_quoted_keys() {
        let sheets = [
            SheetRef {
                sheet: "2 colours".into(),
                parent: "./2 colours/parent.js".into(),
                leaf: String::new(),
            },
            SheetRef {
                sheet: "2-colours".into(),
                parent: "./2-colours/parent.js".into(),
                leaf: String::new(),
            },
        ];

        let rendered = ModuleFormat
            .render_root(Language::Deutsch, &sheets)
            .expect("root rendered");

        assert!(rendered.contains("import _2_colours_data from './2 colours/parent.js';"));
        assert!(rendered.contains("import _2_colours_data_1 from './2-colours/parent.js';"));
        assert!(rendered.contains("\"2 colours\": _2_colours_data.deutsch"));
        assert!(rendered.contains("\"2-colours\": _2_colours_data_1.deutsch"));
    }
}
