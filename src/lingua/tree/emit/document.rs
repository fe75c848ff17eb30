use serde_json::{Map, Value};

use crate::lingua::tree::emit::{ArtifactFormat, LeafRef, SheetRef};
use crate::lingua::tree::error::Result;
use crate::lingua::tree::model::Language;

/// Writes every artifact as a pretty-printed JSON object.
///
/// Parents map language → leaf file; roots map sheet → that sheet's leaf
/// file for the root's language, both as relative paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentFormat;

impl ArtifactFormat for DocumentFormat {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn render_leaf(&self, entries: &Map<String, Value>) -> Result<String> {
        render(entries)
    }

    fn render_parent(&self, leaves: &[LeafRef]) -> Result<String> {
        let document: Map<String, Value> = leaves
            .iter()
            .map(|leaf| (leaf.language.to_string(), Value::String(leaf.reference.clone())))
            .collect();
        render(&document)
    }

    fn render_root(&self, _language: Language, sheets: &[SheetRef]) -> Result<String> {
        let document: Map<String, Value> = sheets
            .iter()
            .map(|sheet| (sheet.sheet.clone(), Value::String(sheet.leaf.clone())))
            .collect();
        render(&document)
    }
}

fn render(document: &Map<String, Value>) -> Result<String> {
    let mut rendered = serde_json::to_string_pretty(document)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parent_maps_languages_to_leaf_files() {
        let leaves = [
            LeafRef {
                language: Language::English,
                reference: "./greetings_english.json".into(),
            },
            LeafRef {
                language: Language::Deutsch,
                reference: "./greetings_deutsch.json".into(),
            },
        ];

        let rendered = DocumentFormat.render_parent(&leaves).expect("parent rendered");
        let parsed: Value = serde_json::from_str(&rendered).expect("JSON parsed");

        assert_eq!(
            parsed,
            json!({
                "english": "./greetings_english.json",
                "deutsch": "./greetings_deutsch.json"
            })
        );
    }

    #[test]
    fn root_points_at_the_language_leaf() {
        let sheets = [SheetRef {
            sheet: "greetings".into(),
            parent: "./language/phrases/greetings/parent.json".into(),
            leaf: "./language/phrases/greetings/greetings_deutsch.json".into(),
        }];

        let rendered = DocumentFormat
            .render_root(Language::Deutsch, &sheets)
            .expect("root rendered");
        let parsed: Value = serde_json::from_str(&rendered).expect("JSON parsed");

        assert_eq!(
            parsed,
            json!({"greetings": "./language/phrases/greetings/greetings_deutsch.json"})
        );
    }
}
