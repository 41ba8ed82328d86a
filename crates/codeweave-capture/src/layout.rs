/*
 * layout.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Arrangement of captured code relative to its output.
 */

use std::fmt;
use std::str::FromStr;

use codeweave_text::markdown;
use serde::{Deserialize, Serialize};

use crate::error::{CaptureError, Result};
use crate::fragment::Rendered;

/// How captured code is placed relative to the content produced with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Layout {
    /// Code block, then content.
    #[serde(rename = "top-o")]
    TopOpen,
    /// Collapsed code admonition, then content.
    #[serde(rename = "top-c")]
    TopCollapsed,
    /// Content, then code block.
    #[serde(rename = "bottom-o")]
    BottomOpen,
    /// Content, then collapsed code admonition.
    #[serde(rename = "bottom-c")]
    BottomCollapsed,
    /// Content and code on separate tabs.
    #[default]
    #[serde(rename = "tabbed")]
    Tabbed,
    /// Content only; no code is traced.
    #[serde(rename = "nocode")]
    NoCode,
}

impl Layout {
    pub const ALL: [Layout; 6] = [
        Layout::TopOpen,
        Layout::TopCollapsed,
        Layout::BottomOpen,
        Layout::BottomCollapsed,
        Layout::Tabbed,
        Layout::NoCode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layout::TopOpen => "top-o",
            Layout::TopCollapsed => "top-c",
            Layout::BottomOpen => "bottom-o",
            Layout::BottomCollapsed => "bottom-c",
            Layout::Tabbed => "tabbed",
            Layout::NoCode => "nocode",
        }
    }

    /// Whether a capture with this layout traces its code.
    pub fn tracks_code(self) -> bool {
        self != Layout::NoCode
    }

    /// Place `code` next to `content`.
    ///
    /// Every layout but [`Layout::Tabbed`] ends with a horizontal rule.
    /// Without code only the content is returned.
    pub fn arrange(self, code: Option<Rendered>, content: Rendered) -> Result<Rendered> {
        let Some(code) = code else {
            return Ok(content);
        };
        let hline = Rendered::new(markdown::hline());
        let collapsed = |code: Rendered| code.into_admonition("code", Some("Code"), true);

        let parts = match self {
            Layout::NoCode => return Ok(content),
            Layout::TopOpen => vec![code, content, hline],
            Layout::TopCollapsed => vec![collapsed(code)?, content, hline],
            Layout::BottomOpen => vec![content, code, hline],
            Layout::BottomCollapsed => vec![content, collapsed(code)?, hline],
            Layout::Tabbed => vec![content.into_tab("Content")?, code.into_tab("Code")?],
        };
        Rendered::concat(parts)
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self> {
        Layout::ALL
            .into_iter()
            .find(|layout| layout.name() == s)
            .ok_or_else(|| CaptureError::Settings {
                message: format!(
                    "unknown layout '{s}', expected one of: {}",
                    Layout::ALL.map(Layout::name).join(", ")
                ),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{admonition_requirements, tab_requirements};

    fn code() -> Rendered {
        Rendered::new(
            codeweave_text::CodeBlock::new("let x = 1;")
                .with_language("rust")
                .to_spaced_text(),
        )
    }

    fn content() -> Rendered {
        Rendered::new(markdown::paragraph("Output"))
    }

    fn arrange(layout: Layout) -> Rendered {
        layout.arrange(Some(code()), content()).unwrap()
    }

    #[test]
    fn test_names_round_trip() {
        for layout in Layout::ALL {
            assert_eq!(layout.name().parse::<Layout>().unwrap(), layout);
        }
        assert!(matches!(
            "sideways".parse::<Layout>(),
            Err(CaptureError::Settings { .. })
        ));
    }

    #[test]
    fn test_top_open() {
        assert_eq!(
            arrange(Layout::TopOpen).body.text(),
            "```rust\nlet x = 1;\n```\n\nOutput\n\n---"
        );
    }

    #[test]
    fn test_bottom_open() {
        assert_eq!(
            arrange(Layout::BottomOpen).body.text(),
            "Output\n\n```rust\nlet x = 1;\n```\n\n---"
        );
    }

    #[test]
    fn test_collapsed_layouts() {
        let top = arrange(Layout::TopCollapsed);
        assert_eq!(
            top.body.text(),
            "??? code \"Code\"\n\n    ```rust\n    let x = 1;\n    ```\n\nOutput\n\n---"
        );
        assert_eq!(top.requirements, admonition_requirements());

        let bottom = arrange(Layout::BottomCollapsed);
        assert!(bottom.body.text().starts_with("Output\n\n??? code \"Code\""));
        assert!(bottom.body.text().ends_with("\n\n---"));
    }

    #[test]
    fn test_tabbed_has_no_rule() {
        let tabbed = arrange(Layout::Tabbed);
        assert_eq!(
            tabbed.body.text(),
            "=== \"Content\"\n\n    Output\n\n=== \"Code\"\n\n    ```rust\n    let x = 1;\n    ```"
        );
        assert_eq!(tabbed.requirements, tab_requirements());
    }

    #[test]
    fn test_nocode_returns_content() {
        assert_eq!(arrange(Layout::NoCode), content());
        assert_eq!(Layout::TopOpen.arrange(None, content()).unwrap(), content());
        assert!(!Layout::NoCode.tracks_code());
    }
}
