//! JSON record documents.

use std::{collections::BTreeMap, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    ABSTRACT, AUTHORS, BODY, CATEGORIES, DocumentError, FieldMap, JOURNAL, PUBLISHER,
    ParsedDocument, TITLE, insert_optional, insert_repeated, resolve_id,
};

/// A document identifier as it appears in JSON.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RecordId {
    /// String identifier.
    Text(String),
    /// Numeric identifier.
    Number(u64),
}

/// On-disk shape of a JSON document.
#[derive(Debug, Deserialize)]
struct Record {
    /// Document identifier.
    id: Option<RecordId>,
    /// Document title.
    title: Option<String>,
    /// Abstract text.
    #[serde(rename = "abstract")]
    abstract_text: Option<String>,
    /// Main text.
    body: Option<String>,
    /// Journal name.
    journal: Option<String>,
    /// Publisher name.
    publisher: Option<String>,
    /// Author names.
    #[serde(default)]
    authors: Vec<String>,
    /// Subject categories.
    #[serde(default)]
    categories: Vec<String>,
    /// Any other top-level keys.
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Parses a JSON record.
///
/// Known keys map onto the standard fields. Any other top-level key with a string value
/// is kept as a field of the same name; non-string extras are ignored.
pub fn parse_json(content: &str, path: &Path) -> Result<ParsedDocument, DocumentError> {
    let record: Record = serde_json::from_str(content).map_err(|source| DocumentError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let mut fields = FieldMap::new();
    for (key, value) in record.extra {
        if let Value::String(text) = value {
            fields.insert(key, text);
        }
    }
    insert_optional(&mut fields, TITLE, record.title.as_deref());
    insert_optional(&mut fields, ABSTRACT, record.abstract_text.as_deref());
    insert_optional(&mut fields, BODY, record.body.as_deref());
    insert_optional(&mut fields, JOURNAL, record.journal.as_deref());
    insert_optional(&mut fields, PUBLISHER, record.publisher.as_deref());
    insert_repeated(&mut fields, AUTHORS, &record.authors);
    insert_repeated(&mut fields, CATEGORIES, &record.categories);

    let explicit = match record.id {
        Some(RecordId::Text(id)) => Some(id),
        Some(RecordId::Number(n)) => Some(n.to_string()),
        None => None,
    };

    Ok(ParsedDocument {
        id: resolve_id(explicit.as_deref(), path)?,
        path: path.to_path_buf(),
        fields,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record() {
        let content = r#"{
            "id": "PMC7",
            "title": "Lung disease",
            "abstract": "Summary",
            "body": "Full text",
            "journal": "Thorax",
            "publisher": "BMJ",
            "authors": ["Ada", "Grace"],
            "categories": ["Pulmonology"]
        }"#;
        let doc = parse_json(content, Path::new("/c/7.json")).unwrap();

        assert_eq!(doc.id, "PMC7");
        assert_eq!(doc.fields[TITLE], "Lung disease");
        assert_eq!(doc.fields[ABSTRACT], "Summary");
        assert_eq!(doc.fields[BODY], "Full text");
        assert_eq!(doc.fields[PUBLISHER], "BMJ");
        assert_eq!(doc.fields["authors_1"], "Grace");
        assert_eq!(doc.fields["categories_0"], "Pulmonology");
    }

    #[test]
    fn numeric_id_and_extra_fields() {
        let content = r#"{"id": 42, "body": "text", "keywords": "heart lung", "year": 2020}"#;
        let doc = parse_json(content, Path::new("/c/x.json")).unwrap();

        assert_eq!(doc.id, "42");
        assert_eq!(doc.fields["keywords"], "heart lung");
        assert!(!doc.fields.contains_key("year"));
    }

    #[test]
    fn missing_id_uses_file_stem() {
        let doc = parse_json(r#"{"body": "text"}"#, Path::new("/c/record-9.json")).unwrap();
        assert_eq!(doc.id, "record-9");
    }

    #[test]
    fn invalid_json_is_error() {
        let err = parse_json("{not json", Path::new("/c/bad.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Json { .. }));
    }
}
