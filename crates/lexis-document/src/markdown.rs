//! Markdown documents with YAML frontmatter.

use std::path::Path;

use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};

use crate::{
    ABSTRACT, AUTHORS, BODY, CATEGORIES, DocumentError, FieldMap, JOURNAL, PUBLISHER,
    ParsedDocument, TITLE, insert_optional, insert_repeated, parse_frontmatter, resolve_id,
};

/// Parses a markdown document.
///
/// Structured fields come from the frontmatter. The body is the markdown rendered to plain
/// text. Without a frontmatter title, the first h1 heading becomes the title.
pub fn parse_markdown(content: &str, path: &Path) -> Result<ParsedDocument, DocumentError> {
    let (frontmatter, body) =
        parse_frontmatter(content).map_err(|source| DocumentError::Frontmatter {
            path: path.to_path_buf(),
            source,
        })?;
    let frontmatter = frontmatter.unwrap_or_default();

    let mut fields = FieldMap::new();
    let title = frontmatter.title.clone().or_else(|| first_h1(body));
    insert_optional(&mut fields, TITLE, title.as_deref());
    insert_optional(&mut fields, ABSTRACT, frontmatter.abstract_text.as_deref());
    insert_optional(&mut fields, JOURNAL, frontmatter.journal.as_deref());
    insert_optional(&mut fields, PUBLISHER, frontmatter.publisher.as_deref());
    insert_repeated(&mut fields, AUTHORS, &frontmatter.authors);
    insert_repeated(&mut fields, CATEGORIES, &frontmatter.categories);
    fields.insert(BODY.to_string(), markdown_to_text(body));

    Ok(ParsedDocument {
        id: resolve_id(frontmatter.id.as_deref(), path)?,
        path: path.to_path_buf(),
        fields,
    })
}

/// Renders markdown to plain text, dropping markup but keeping every word.
///
/// Block boundaries and line breaks become newlines so that words from adjacent
/// blocks never run together.
pub fn markdown_to_text(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    for event in Parser::new(content) {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak | Event::End(_) => text.push('\n'),
            Event::Start(Tag::Item) => text.push('\n'),
            _ => {}
        }
    }
    text.trim().to_string()
}

/// Returns the text of the first level-one heading.
fn first_h1(content: &str) -> Option<String> {
    let mut current: Option<String> = None;
    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) => current = Some(String::new()),
            Event::Text(text) | Event::Code(text) => {
                if let Some(ref mut heading) = current {
                    heading.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some(heading) = current.take() {
                    return Some(heading);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_fields_become_document_fields() {
        let content = "---\nid: PMC42\ntitle: Heart failure\nabstract: A study.\njournal: BMJ\nauthors: [Ada, Grace]\ncategories: [Cardiology]\n---\n\nThe **body** text.";
        let doc = parse_markdown(content, Path::new("/c/x.md")).unwrap();

        assert_eq!(doc.id, "PMC42");
        assert_eq!(doc.fields[TITLE], "Heart failure");
        assert_eq!(doc.fields[ABSTRACT], "A study.");
        assert_eq!(doc.fields[JOURNAL], "BMJ");
        assert_eq!(doc.fields["authors_0"], "Ada");
        assert_eq!(doc.fields["authors_1"], "Grace");
        assert_eq!(doc.fields["categories_0"], "Cardiology");
        assert_eq!(doc.fields[BODY], "The body text.");
        assert!(!doc.fields.contains_key(PUBLISHER));
    }

    #[test]
    fn title_falls_back_to_first_h1() {
        let content = "Intro\n\n# Lung `Disease`\n\nText";
        let doc = parse_markdown(content, Path::new("/c/lung.md")).unwrap();
        assert_eq!(doc.id, "lung");
        assert_eq!(doc.fields[TITLE], "Lung Disease");
    }

    #[test]
    fn blocks_do_not_run_together() {
        let text = markdown_to_text("first paragraph\n\nsecond\n\n- one\n- two");
        let words: Vec<_> = text.split_whitespace().collect();
        assert_eq!(words, vec!["first", "paragraph", "second", "one", "two"]);
    }

    #[test]
    fn malformed_frontmatter_is_fatal() {
        let content = "---\ntitle: [oops\n---\nBody";
        let err = parse_markdown(content, Path::new("/c/bad.md")).unwrap_err();
        assert!(matches!(err, DocumentError::Frontmatter { .. }));
    }
}
