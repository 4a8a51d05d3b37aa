//! YAML frontmatter parsing for markdown documents.
//!
//! Frontmatter carries the structured fields of a markdown document, delimited by `---`:
//!
//! ```markdown
//! ---
//! id: PMC1234
//! title: Chronic heart failure
//! authors: [A. Author, B. Author]
//! categories: [Cardiology]
//! ---
//!
//! Body starts here
//! ```

use serde::Deserialize;

/// Parsed frontmatter from a markdown document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Frontmatter {
    /// Stable document identifier.
    pub id: Option<String>,
    /// Document title.
    pub title: Option<String>,
    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Journal name.
    pub journal: Option<String>,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Author names.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Subject categories (`tags` is accepted as an alias).
    #[serde(default, alias = "tags")]
    pub categories: Vec<String>,
}

/// Parses YAML frontmatter from markdown content.
///
/// Returns the parsed frontmatter (if present) and the remaining content after it.
/// Content without an opening and closing `---` pair has no frontmatter. A delimited
/// block that is not valid YAML is an error: the document is malformed.
pub fn parse_frontmatter(content: &str) -> Result<(Option<Frontmatter>, &str), serde_yaml::Error> {
    let content = content.trim_start_matches('\u{feff}');
    if !content.starts_with("---") {
        return Ok((None, content));
    }

    let after_opening = &content[3..];
    let after_opening = after_opening
        .strip_prefix('\n')
        .unwrap_or(after_opening.strip_prefix("\r\n").unwrap_or(after_opening));

    let Some(closing_pos) = find_closing_delimiter(after_opening) else {
        return Ok((None, content));
    };

    let yaml_content = &after_opening[..closing_pos];
    let remaining = &after_opening[closing_pos..];

    let remaining = remaining.strip_prefix("---").unwrap_or(remaining);
    let remaining = remaining
        .strip_prefix("\r\n")
        .or_else(|| remaining.strip_prefix('\n'))
        .unwrap_or(remaining);

    let frontmatter = serde_yaml::from_str::<Frontmatter>(yaml_content)?;
    Ok((Some(frontmatter), remaining))
}

/// Finds the byte position of the closing `---` delimiter.
///
/// The delimiter must be at the start of a line.
fn find_closing_delimiter(content: &str) -> Option<usize> {
    let mut pos = 0;
    for line in content.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            return Some(pos);
        }
        pos += line.len();
    }
    None
}
