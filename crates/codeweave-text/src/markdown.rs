//! Markdown blocks built on [`SpacedText`].
//!
//! Only the constructs needed to lay out captured code next to its output
//! live here: fenced code blocks, tabs, admonitions, paragraphs, headings
//! and horizontal rules. Block-level constructs require one blank line on
//! each side, which is two newlines in [`SpacedText`] terms.

use crate::spaced::SpacedText;

/// Spacing for block-level elements.
pub const BLOCK_SPACING: (usize, usize) = (2, 2);

/// Indentation used for content nested in tabs and admonitions.
const NESTED_INDENT: &str = "    ";

/// Escape characters that are not allowed inside a quoted attribute.
pub fn escape_attr(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '&' => "&amp;".to_string(),
            '<' => "&lt;".to_string(),
            '>' => "&gt;".to_string(),
            '"' => "&quot;".to_string(),
            '\'' => "&#x27;".to_string(),
            _ => c.to_string(),
        })
        .collect()
}

/// Remove the whitespace prefix common to all non-blank lines.
///
/// Lines consisting only of whitespace are emptied and do not take part in
/// finding the common prefix.
pub fn dedent(text: &str) -> String {
    let margin = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| &line[..line.len() - line.trim_start().len()])
        .fold(None::<&str>, |common, indent| match common {
            None => Some(indent),
            Some(common) => {
                let shared = common
                    .char_indices()
                    .zip(indent.chars())
                    .find(|((_, a), b)| a != b)
                    .map_or(common.len().min(indent.len()), |((idx, _), _)| idx);
                Some(&common[..shared])
            }
        })
        .unwrap_or("");

    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                if line.ends_with('\n') { "\n" } else { "" }
            } else {
                line.strip_prefix(margin).unwrap_or(line)
            }
        })
        .collect()
}

/// Prefix every non-blank line of `text` with `prefix`.
pub fn indent(text: &str, prefix: &str) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{prefix}{line}")
            }
        })
        .collect()
}

/// A fenced code block.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CodeBlock {
    pub code: String,
    pub language: Option<String>,
    pub title: Option<String>,
    /// Line number shown for the first line of `code`.
    pub first_line: Option<usize>,
    /// Highlighted lines as an inclusive range of source line numbers.
    ///
    /// When `first_line` is set, the range is translated to be relative to
    /// the block.
    pub highlight: Option<(usize, usize)>,
}

impl CodeBlock {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Default::default()
        }
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_first_line(mut self, first_line: usize) -> Self {
        self.first_line = Some(first_line);
        self
    }

    pub fn with_highlight(mut self, from: usize, to: usize) -> Self {
        self.highlight = Some((from, to));
        self
    }

    /// The annotations written after the opening fence.
    fn annotations(&self) -> String {
        let mut annots = Vec::new();
        if let Some(language) = &self.language {
            annots.push(language.clone());
        }
        if let Some(title) = &self.title {
            annots.push(format!("title=\"{}\"", escape_attr(title)));
        }
        let highlight = match (self.first_line, self.highlight) {
            (Some(first), Some((from, to))) => Some((
                (from + 1).saturating_sub(first),
                (to + 1).saturating_sub(first),
            )),
            (_, highlight) => highlight,
        };
        if let Some(first) = self.first_line {
            annots.push(format!("linenums=\"{first}\""));
        }
        if let Some((from, to)) = highlight {
            annots.push(format!("hl_lines=\"{from}-{to}\""));
        }
        annots.join(" ")
    }

    /// The fence is longer than any backtick run inside the code.
    pub fn to_spaced_text(&self) -> SpacedText {
        let code = self.code.trim_end_matches(['\n', '\r']);
        let fence = "`".repeat(fence_len(code));
        SpacedText::new(
            format!("{fence}{}\n{code}\n{fence}", self.annotations()),
            BLOCK_SPACING,
        )
    }
}

fn fence_len(code: &str) -> usize {
    let longest_run = code
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    (longest_run + 1).max(3)
}

/// Nest `body` under a block header, indenting it.
fn nested(header: String, body: &SpacedText) -> SpacedText {
    SpacedText::new(header, BLOCK_SPACING)
        + SpacedText::new(indent(body.text(), NESTED_INDENT), BLOCK_SPACING)
}

/// A content tab. Consecutive tabs form one tab group.
pub fn tab(body: &SpacedText, title: &str) -> SpacedText {
    nested(format!("=== \"{}\"", escape_attr(title)), body)
}

/// An admonition of the given kind. Collapsed admonitions start folded.
pub fn admonition(body: &SpacedText, kind: &str, title: Option<&str>, collapse: bool) -> SpacedText {
    let marker = if collapse { "???" } else { "!!!" };
    let header = match title {
        Some(title) => format!("{marker} {kind} \"{}\"", escape_attr(title)),
        None => format!("{marker} {kind}"),
    };
    nested(header, body)
}

pub fn paragraph(text: &str) -> SpacedText {
    SpacedText::new(dedent(text).trim(), BLOCK_SPACING)
}

pub fn heading(level: usize, text: &str) -> SpacedText {
    let level = level.clamp(1, 6);
    SpacedText::new(format!("{} {}", "#".repeat(level), text.trim()), BLOCK_SPACING)
}

/// A horizontal rule.
pub fn hline() -> SpacedText {
    SpacedText::new("---", BLOCK_SPACING)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedent_common_margin() {
        let text = "    let x = 1;\n\n    if x > 0 {\n        x\n    }\n";
        assert_eq!(dedent(text), "let x = 1;\n\nif x > 0 {\n    x\n}\n");
    }

    #[test]
    fn test_dedent_whitespace_only_lines() {
        assert_eq!(dedent("  a\n   \n  b"), "a\n\nb");
        assert_eq!(dedent("\ta\n  b\n"), "\ta\n  b\n");
    }

    #[test]
    fn test_indent_skips_blank_lines() {
        assert_eq!(indent("a\n\nb\n", "    "), "    a\n\n    b\n");
    }

    #[test]
    fn test_code_block_annotations() {
        let block = CodeBlock::new("let x = 1;\n")
            .with_language("rust")
            .with_title("src/main.rs")
            .with_first_line(10)
            .with_highlight(11, 12);
        assert_eq!(
            block.to_spaced_text().text(),
            "```rust title=\"src/main.rs\" linenums=\"10\" hl_lines=\"2-3\"\nlet x = 1;\n```"
        );
    }

    #[test]
    fn test_code_block_plain() {
        let block = CodeBlock::new("x");
        assert_eq!(block.to_spaced_text().text(), "```\nx\n```");
    }

    #[test]
    fn test_code_block_fence_outgrows_backticks() {
        let block = CodeBlock::new("let doc = r#\"\n```\n\"#;").with_language("rust");
        assert_eq!(
            block.to_spaced_text().text(),
            "````rust\nlet doc = r#\"\n```\n\"#;\n````"
        );
        assert!(CodeBlock::new("a `b` c").to_spaced_text().text().starts_with("```\n"));
    }

    #[test]
    fn test_tab_indents_body() {
        let body = SpacedText::new("line one\nline two", BLOCK_SPACING);
        assert_eq!(
            tab(&body, "Code").text(),
            "=== \"Code\"\n\n    line one\n    line two"
        );
    }

    #[test]
    fn test_collapsed_admonition() {
        let body = SpacedText::plain("body");
        assert_eq!(
            admonition(&body, "code", Some("Code"), true).text(),
            "??? code \"Code\"\n\n    body"
        );
        assert_eq!(admonition(&body, "note", None, false).text(), "!!! note\n\n    body");
    }

    #[test]
    fn test_blocks_are_separated_by_blank_line() {
        let doc = heading(2, "Results") + paragraph("  Some text.  ") + hline();
        assert_eq!(doc.text(), "## Results\n\nSome text.\n\n---");
    }
}
