//! Host document formats and the script grammars they embed

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The format of the document being edited.
///
/// Pure-script kinds are parsed as a whole. Container kinds hold one or more
/// embedded script (or frontmatter) regions that have to be extracted first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
    Vue,
    Svelte,
    Astro,
    Html,
}

/// Grammar used to parse a script region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptDialect {
    JavaScript,
    Jsx,
    TypeScript,
    Tsx,
}

impl FileKind {
    pub const ALL: [FileKind; 8] = [
        FileKind::JavaScript,
        FileKind::Jsx,
        FileKind::TypeScript,
        FileKind::Tsx,
        FileKind::Vue,
        FileKind::Svelte,
        FileKind::Astro,
        FileKind::Html,
    ];

    /// Maps a file extension (with or without the leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "js" | "mjs" | "cjs" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            "vue" => Some(Self::Vue),
            "svelte" => Some(Self::Svelte),
            "astro" => Some(Self::Astro),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    /// Maps an editor language identifier such as `typescriptreact`.
    pub fn from_language_id(id: &str) -> Option<Self> {
        match id {
            "javascript" => Some(Self::JavaScript),
            "javascriptreact" => Some(Self::Jsx),
            "typescript" => Some(Self::TypeScript),
            "typescriptreact" => Some(Self::Tsx),
            "vue" => Some(Self::Vue),
            "svelte" => Some(Self::Svelte),
            "astro" => Some(Self::Astro),
            "html" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Accepts either a language identifier or an extension.
    pub fn parse_hint(hint: &str) -> Option<Self> {
        Self::from_language_id(hint).or_else(|| Self::from_extension(hint))
    }

    /// Pure-script documents are parsed whole and never need extraction.
    pub fn is_pure_script(&self) -> bool {
        matches!(
            self,
            Self::JavaScript | Self::Jsx | Self::TypeScript | Self::Tsx
        )
    }

    /// Grammar used when nothing in the document says otherwise.
    pub fn default_dialect(&self) -> ScriptDialect {
        match self {
            Self::JavaScript | Self::Vue | Self::Svelte | Self::Html => ScriptDialect::JavaScript,
            Self::Jsx => ScriptDialect::Jsx,
            Self::TypeScript | Self::Astro => ScriptDialect::TypeScript,
            Self::Tsx => ScriptDialect::Tsx,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JavaScript => "javascript",
            Self::Jsx => "jsx",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
            Self::Vue => "vue",
            Self::Svelte => "svelte",
            Self::Astro => "astro",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ScriptDialect {
    /// Dialect named by a `lang` attribute (`<script lang="ts">`).
    pub fn from_lang_attribute(lang: &str) -> Option<Self> {
        match lang.trim().to_ascii_lowercase().as_str() {
            "js" | "javascript" => Some(Self::JavaScript),
            "jsx" => Some(Self::Jsx),
            "ts" | "typescript" => Some(Self::TypeScript),
            "tsx" => Some(Self::Tsx),
            _ => None,
        }
    }

    pub fn is_typescript(&self) -> bool {
        matches!(self, Self::TypeScript | Self::Tsx)
    }

    /// Whether the inline markup (JSX) extension is enabled.
    pub fn allows_jsx(&self) -> bool {
        matches!(self, Self::Jsx | Self::Tsx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_extension() {
        assert_eq!(FileKind::from_extension("ts"), Some(FileKind::TypeScript));
        assert_eq!(FileKind::from_extension(".mjs"), Some(FileKind::JavaScript));
        assert_eq!(FileKind::from_extension("HTM"), Some(FileKind::Html));
        assert_eq!(FileKind::from_extension("rs"), None);
    }

    #[test]
    fn test_parse_hint_prefers_language_id() {
        assert_eq!(FileKind::parse_hint("typescriptreact"), Some(FileKind::Tsx));
        assert_eq!(FileKind::parse_hint("vue"), Some(FileKind::Vue));
        assert_eq!(FileKind::parse_hint("cts"), Some(FileKind::TypeScript));
    }

    #[test]
    fn test_from_path() {
        let kind = FileKind::from_path(Path::new("src/components/Card.svelte"));
        assert_eq!(kind, Some(FileKind::Svelte));
    }

    #[test]
    fn test_dialects() {
        assert!(FileKind::Astro.default_dialect().is_typescript());
        assert!(!FileKind::Vue.default_dialect().allows_jsx());
        assert_eq!(
            ScriptDialect::from_lang_attribute("TS"),
            Some(ScriptDialect::TypeScript)
        );
        assert_eq!(ScriptDialect::from_lang_attribute("coffee"), None);
    }
}
