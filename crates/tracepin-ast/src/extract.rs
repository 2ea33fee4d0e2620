//! Locating the script region of container documents
//!
//! Vue, Svelte and HTML documents carry their code in `<script>` blocks,
//! Astro pages in a `---` frontmatter fence (plus optional `<script>`
//! blocks). The extractor picks the one region relevant to the selection
//! and reports the offsets that map region positions back to the host.

use crate::error::{AstError, AstResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracepin_foundation::{FileKind, ScriptDialect};
use tracing::debug;

static SCRIPT_OPEN_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<script\b([^>]*)>").expect("script tag pattern is valid")
});

static SCRIPT_CLOSE_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</script\s*>").expect("closing tag pattern is valid"));

static ATTRIBUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_:@][-A-Za-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>=`]+)))?"#)
        .expect("attribute pattern is valid")
});

/// The script text to parse plus its position inside the host document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub script_text: String,
    /// Added to every region line to get the host line
    pub line_offset: usize,
    /// Added to every region byte offset to get the host offset
    pub byte_offset: usize,
    pub dialect: ScriptDialect,
}

impl ExtractionResult {
    /// The whole document as one region.
    pub fn identity(text: &str, dialect: ScriptDialect) -> Self {
        Self {
            script_text: text.to_string(),
            line_offset: 0,
            byte_offset: 0,
            dialect,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.line_offset == 0 && self.byte_offset == 0
    }
}

/// One candidate region in host byte coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ScriptRegion {
    content_start: usize,
    content_end: usize,
    dialect: ScriptDialect,
}

/// Returns the script region of `text` that contains `line`.
///
/// Pure-script kinds always yield the identity result. Container kinds
/// return the region whose host line range contains `line`, falling back to
/// the first region, and fail when the document has none.
pub fn extract_script(text: &str, kind: FileKind, line: usize) -> AstResult<ExtractionResult> {
    if kind.is_pure_script() {
        return Ok(ExtractionResult::identity(text, kind.default_dialect()));
    }

    let regions = match kind {
        FileKind::Astro => {
            let mut regions: Vec<ScriptRegion> = find_frontmatter(text).into_iter().collect();
            regions.extend(find_script_blocks(text, kind));
            regions
        }
        _ => find_script_blocks(text, kind),
    };

    let region = regions
        .iter()
        .find(|region| {
            let first = line_of(text, region.content_start);
            let last = line_of(text, region.content_end);
            first <= line && line <= last
        })
        .or_else(|| regions.first())
        .ok_or_else(|| {
            AstError::extraction(
                kind,
                match kind {
                    FileKind::Astro => "no frontmatter or <script> block found",
                    _ => "no <script> block found",
                },
            )
        })?;

    debug!(
        kind = %kind,
        regions = regions.len(),
        content_start = region.content_start,
        dialect = ?region.dialect,
        "Extracted script region"
    );

    Ok(ExtractionResult {
        script_text: text[region.content_start..region.content_end].to_string(),
        line_offset: line_of(text, region.content_start),
        byte_offset: region.content_start,
        dialect: region.dialect,
    })
}

fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|b| **b == b'\n')
        .count()
}

/// The `---` fence of an Astro page; only valid at the top of the file.
fn find_frontmatter(text: &str) -> Option<ScriptRegion> {
    let body = text.trim_start_matches('\u{feff}');
    let leading = text.len() - body.len();
    let skipped = body.len() - body.trim_start().len();
    let rest = &body[skipped..];
    if !rest.starts_with("---") {
        return None;
    }

    let fence_end = rest.find('\n')?;
    if !rest[..fence_end].trim_end().eq("---") {
        return None;
    }
    let content_start = leading + skipped + fence_end + 1;

    let mut cursor = content_start;
    for line in text[content_start..].split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some(ScriptRegion {
                content_start,
                content_end: cursor,
                dialect: ScriptDialect::TypeScript,
            });
        }
        cursor += line.len();
    }
    None
}

fn find_script_blocks(source: &str, kind: FileKind) -> Vec<ScriptRegion> {
    let mut blocks = Vec::new();
    let mut cursor = 0;

    while let Some(open) = SCRIPT_OPEN_TAG.captures(&source[cursor..]) {
        let (Some(tag), Some(attrs)) = (open.get(0), open.get(1)) else {
            break;
        };
        let open_tag_end = cursor + tag.end();
        let attrs = attrs.as_str();

        // <script src="..." /> carries no inline code
        if attrs.trim_end().ends_with('/') {
            cursor = open_tag_end;
            continue;
        }

        let Some(close) = SCRIPT_CLOSE_TAG.find(&source[open_tag_end..]) else {
            break;
        };
        let content_end = open_tag_end + close.start();
        cursor = open_tag_end + close.end();

        let attributes = parse_attributes(attrs);
        if attributes.iter().any(|(name, _)| name == "src") {
            continue;
        }
        if let Some(dialect) = block_dialect(&attributes, kind) {
            blocks.push(ScriptRegion {
                content_start: open_tag_end,
                content_end,
                dialect,
            });
        }
    }

    blocks
}

fn parse_attributes(attrs: &str) -> Vec<(String, String)> {
    ATTRIBUTE
        .captures_iter(attrs)
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            Some((name, value))
        })
        .collect()
}

/// Grammar of a block, `None` when the block is not executable script.
fn block_dialect(attributes: &[(String, String)], kind: FileKind) -> Option<ScriptDialect> {
    let attribute = |key: &str| {
        attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.trim().to_ascii_lowercase())
    };

    if let Some(lang) = attribute("lang") {
        return ScriptDialect::from_lang_attribute(&lang);
    }

    match attribute("type").as_deref() {
        None | Some("") | Some("module") => Some(kind.default_dialect()),
        Some("text/javascript" | "application/javascript" | "text/ecmascript"
            | "application/ecmascript" | "module/javascript") => {
            Some(ScriptDialect::JavaScript)
        }
        Some("text/babel" | "text/jsx") => Some(ScriptDialect::Jsx),
        Some("text/typescript" | "application/typescript" | "ts") => {
            Some(ScriptDialect::TypeScript)
        }
        // JSON data, templates and other inert payloads
        Some(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VUE: &str = "<template>\n  <div>{{ count }}</div>\n</template>\n\n<script>\nexport default {\n  data() { return { count: 0 } }\n}\n</script>\n\n<script setup lang=\"ts\">\nconst count: number = 1;\n</script>\n";

    #[test]
    fn test_pure_script_is_identity() {
        let result = extract_script("const a = 1;", FileKind::TypeScript, 0).unwrap();
        assert!(result.is_identity());
        assert_eq!(result.script_text, "const a = 1;");
        assert_eq!(result.dialect, ScriptDialect::TypeScript);
    }

    #[test]
    fn test_vue_picks_block_containing_line() {
        let result = extract_script(VUE, FileKind::Vue, 11).unwrap();
        assert_eq!(result.script_text, "\nconst count: number = 1;\n");
        assert_eq!(result.line_offset, 10);
        assert_eq!(result.dialect, ScriptDialect::TypeScript);
        assert_eq!(
            &VUE[result.byte_offset..result.byte_offset + result.script_text.len()],
            result.script_text
        );
    }

    #[test]
    fn test_vue_falls_back_to_first_block() {
        let result = extract_script(VUE, FileKind::Vue, 1).unwrap();
        assert!(result.script_text.starts_with("\nexport default"));
        assert_eq!(result.line_offset, 4);
        assert_eq!(result.dialect, ScriptDialect::JavaScript);
    }

    #[test]
    fn test_svelte_without_script_fails() {
        let err = extract_script("<h1>Hello</h1>\n", FileKind::Svelte, 0).unwrap_err();
        assert!(matches!(
            err,
            AstError::Extraction {
                kind: FileKind::Svelte,
                ..
            }
        ));
    }

    #[test]
    fn test_svelte_module_context_block() {
        let source = "<script context=\"module\">\n  export const prerender = true;\n</script>\n<script>\n  let name = 'world';\n</script>\n";
        let result = extract_script(source, FileKind::Svelte, 4).unwrap();
        assert_eq!(result.script_text, "\n  let name = 'world';\n");
        assert_eq!(result.line_offset, 3);
    }

    #[test]
    fn test_astro_frontmatter() {
        let source = "---\nconst title = 'Home';\n---\n<h1>{title}</h1>\n";
        let result = extract_script(source, FileKind::Astro, 1).unwrap();
        assert_eq!(result.script_text, "const title = 'Home';\n");
        assert_eq!(result.line_offset, 1);
        assert_eq!(result.byte_offset, 4);
        assert_eq!(result.dialect, ScriptDialect::TypeScript);
    }

    #[test]
    fn test_astro_without_fence_or_script_fails() {
        assert!(extract_script("<h1>plain</h1>\n", FileKind::Astro, 0).is_err());
    }

    #[test]
    fn test_html_skips_external_and_data_blocks() {
        let source = "<html>\n<script src=\"app.js\"></script>\n<script type=\"application/json\">{\"a\": 1}</script>\n<script>\nconst ready = true;\n</script>\n</html>\n";
        let result = extract_script(source, FileKind::Html, 0).unwrap();
        assert_eq!(result.script_text, "\nconst ready = true;\n");
        assert_eq!(result.line_offset, 3);
    }

    #[test]
    fn test_html_babel_block_is_jsx() {
        let source = "<script type=\"text/babel\">\nconst el = <div/>;\n</script>";
        let result = extract_script(source, FileKind::Html, 1).unwrap();
        assert_eq!(result.dialect, ScriptDialect::Jsx);
    }
}
