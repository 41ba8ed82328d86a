/*
 * fragment.rs
 * Copyright (c) 2026 Posit, PBC
 *
 * Content fragments and their rendered form.
 */

//! Fragments added to a capture, and what they render to.
//!
//! Rendering produces a [`Rendered`] value: the body text, back matter that
//! must land at the end of the page (reference definitions and the like), and
//! the requirements the fragment places on the site and page configuration.
//! Rendered values combine with [`Rendered::combine`]; bodies and back matter
//! are concatenated separately and requirements are merged.

use std::fmt;

use codeweave_requirements::{ConfigValue, Requirements};
use codeweave_text::{CodeBlock, SpacedText, markdown};

use crate::error::Result;

/// Site key listing the markdown extensions a page relies on.
pub const MARKDOWN_EXTENSIONS: &str = "markdown_extensions";

fn extensions(items: impl IntoIterator<Item = ConfigValue>) -> Requirements {
    Requirements::new().with_site(MARKDOWN_EXTENSIONS, ConfigValue::seq(items))
}

/// Extensions needed to render admonitions, collapsible or not.
pub fn admonition_requirements() -> Requirements {
    extensions([
        ConfigValue::string("admonition"),
        ConfigValue::string("pymdownx.details"),
        ConfigValue::string("pymdownx.superfences"),
    ])
}

/// Extensions needed to render content tabs.
pub fn tab_requirements() -> Requirements {
    extensions([
        ConfigValue::string("pymdownx.superfences"),
        ConfigValue::map([(
            "pymdownx.tabbed",
            ConfigValue::map([("alternate_style", ConfigValue::bool(true))]),
        )]),
    ])
}

/// The rendered form of one or more fragments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub body: SpacedText,
    /// Text collected at the end of the page, never nested into blocks.
    pub back: SpacedText,
    pub requirements: Requirements,
}

impl Rendered {
    pub fn new(body: impl Into<SpacedText>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_back(mut self, back: impl Into<SpacedText>) -> Self {
        self.back = back.into();
        self
    }

    pub fn with_requirements(mut self, requirements: Requirements) -> Self {
        self.requirements = requirements;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.back.is_empty() && self.requirements.is_empty()
    }

    /// `self` followed by `other`.
    pub fn combine(&self, other: &Rendered) -> Result<Rendered> {
        Ok(Rendered {
            body: self.body.combine(&other.body),
            back: self.back.combine(&other.back),
            requirements: self.requirements.merge(&other.requirements)?,
        })
    }

    /// Combine a sequence from left to right.
    pub fn concat(items: impl IntoIterator<Item = Rendered>) -> Result<Rendered> {
        items
            .into_iter()
            .try_fold(Rendered::default(), |acc, item| acc.combine(&item))
    }

    fn nest(self, body: SpacedText, requirements: &Requirements) -> Result<Rendered> {
        Ok(Rendered {
            body,
            back: self.back,
            requirements: self.requirements.merge(requirements)?,
        })
    }

    /// Wrap the body in a content tab.
    pub fn into_tab(self, title: &str) -> Result<Rendered> {
        let body = markdown::tab(&self.body, title);
        self.nest(body, &tab_requirements())
    }

    /// Wrap the body in an admonition.
    pub fn into_admonition(self, kind: &str, title: Option<&str>, collapse: bool) -> Result<Rendered> {
        let body = markdown::admonition(&self.body, kind, title, collapse);
        self.nest(body, &admonition_requirements())
    }

    /// The page text: body, then back matter, ending with a newline.
    pub fn to_markdown(&self) -> String {
        let back = self.back.clone().with_spacing(2, 0);
        let mut text = self.body.combine(&back).into_text();
        if !text.is_empty() && !text.ends_with('\n') {
            text.push('\n');
        }
        text
    }
}

/// Extension point for content types defined outside this crate.
pub trait RenderFragment: fmt::Debug {
    fn render(&self) -> Result<Rendered>;
}

/// A piece of content added to a capture.
#[derive(Debug)]
pub enum Fragment {
    /// Text used as is.
    Raw(SpacedText),
    Paragraph(String),
    Heading {
        level: usize,
        text: String,
    },
    Code(CodeBlock),
    Admonition {
        body: Box<Fragment>,
        kind: String,
        title: Option<String>,
        collapse: bool,
    },
    Tab {
        body: Box<Fragment>,
        title: String,
    },
    HLine,
    Seq(Vec<Fragment>),
    /// Already rendered content, such as a finished nested capture.
    Rendered(Rendered),
    External(Box<dyn RenderFragment>),
}

impl Fragment {
    pub fn paragraph(text: impl Into<String>) -> Self {
        Fragment::Paragraph(text.into())
    }

    pub fn heading(level: usize, text: impl Into<String>) -> Self {
        Fragment::Heading {
            level,
            text: text.into(),
        }
    }

    pub fn admonition(
        body: impl Into<Fragment>,
        kind: impl Into<String>,
        title: Option<&str>,
        collapse: bool,
    ) -> Self {
        Fragment::Admonition {
            body: Box::new(body.into()),
            kind: kind.into(),
            title: title.map(str::to_string),
            collapse,
        }
    }

    pub fn tab(body: impl Into<Fragment>, title: impl Into<String>) -> Self {
        Fragment::Tab {
            body: Box::new(body.into()),
            title: title.into(),
        }
    }

    pub fn external(fragment: impl RenderFragment + 'static) -> Self {
        Fragment::External(Box::new(fragment))
    }

    pub fn render(&self) -> Result<Rendered> {
        match self {
            Fragment::Raw(text) => Ok(Rendered::new(text.clone())),
            Fragment::Paragraph(text) => Ok(Rendered::new(markdown::paragraph(text))),
            Fragment::Heading { level, text } => Ok(Rendered::new(markdown::heading(*level, text))),
            Fragment::Code(block) => Ok(Rendered::new(block.to_spaced_text())),
            Fragment::Admonition {
                body,
                kind,
                title,
                collapse,
            } => body.render()?.into_admonition(kind, title.as_deref(), *collapse),
            Fragment::Tab { body, title } => body.render()?.into_tab(title),
            Fragment::HLine => Ok(Rendered::new(markdown::hline())),
            Fragment::Seq(items) => {
                let rendered = items.iter().map(Fragment::render).collect::<Result<Vec<_>>>()?;
                Rendered::concat(rendered)
            }
            Fragment::Rendered(rendered) => Ok(rendered.clone()),
            Fragment::External(fragment) => fragment.render(),
        }
    }
}

impl From<&str> for Fragment {
    fn from(text: &str) -> Self {
        Fragment::Raw(SpacedText::plain(text))
    }
}

impl From<String> for Fragment {
    fn from(text: String) -> Self {
        Fragment::Raw(SpacedText::plain(text))
    }
}

impl From<SpacedText> for Fragment {
    fn from(text: SpacedText) -> Self {
        Fragment::Raw(text)
    }
}

impl From<CodeBlock> for Fragment {
    fn from(block: CodeBlock) -> Self {
        Fragment::Code(block)
    }
}

impl From<Rendered> for Fragment {
    fn from(rendered: Rendered) -> Self {
        Fragment::Rendered(rendered)
    }
}

impl From<Vec<Fragment>> for Fragment {
    fn from(items: Vec<Fragment>) -> Self {
        Fragment::Seq(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CaptureError;
    use codeweave_requirements::NAV_KEY;

    #[derive(Debug)]
    struct Footnote {
        label: &'static str,
        note: &'static str,
    }

    impl RenderFragment for Footnote {
        fn render(&self) -> Result<Rendered> {
            Ok(Rendered::new(format!("[^{}]", self.label))
                .with_back(SpacedText::new(format!("[^{}]: {}", self.label, self.note), (1, 1))))
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl RenderFragment for Broken {
        fn render(&self) -> Result<Rendered> {
            Err(CaptureError::Render {
                message: "no data".into(),
            })
        }
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let seq = Fragment::from(vec![Fragment::paragraph("First."), Fragment::paragraph("Second.")]);
        assert_eq!(seq.render().unwrap().body.text(), "First.\n\nSecond.");
    }

    #[test]
    fn test_raw_text_is_joined_as_is() {
        let seq = Fragment::Seq(vec!["a".into(), "b".into()]);
        assert_eq!(seq.render().unwrap().body.text(), "ab");
    }

    #[test]
    fn test_admonition_declares_requirements() {
        let fragment = Fragment::admonition(Fragment::paragraph("Body"), "note", Some("Title"), true);
        let rendered = fragment.render().unwrap();
        assert_eq!(rendered.body.text(), "??? note \"Title\"\n\n    Body");
        assert_eq!(rendered.requirements, admonition_requirements());
    }

    #[test]
    fn test_tabs_merge_requirements_once() {
        let tabs = Fragment::Seq(vec![
            Fragment::tab(Fragment::paragraph("One"), "First"),
            Fragment::tab(Fragment::paragraph("Two"), "Second"),
        ]);
        let rendered = tabs.render().unwrap();
        assert_eq!(
            rendered.body.text(),
            "=== \"First\"\n\n    One\n\n=== \"Second\"\n\n    Two"
        );
        assert_eq!(rendered.requirements, tab_requirements());
    }

    #[test]
    fn test_back_matter_stays_outside_blocks() {
        let note = Fragment::external(Footnote {
            label: "1",
            note: "See the appendix.",
        });
        let wrapped = Fragment::tab(Fragment::Seq(vec!["Claim".into(), note]), "Results");
        let rendered = wrapped.render().unwrap();

        assert_eq!(rendered.body.text(), "=== \"Results\"\n\n    Claim[^1]");
        assert_eq!(rendered.back.text(), "[^1]: See the appendix.");
        assert_eq!(
            rendered.to_markdown(),
            "=== \"Results\"\n\n    Claim[^1]\n\n[^1]: See the appendix.\n"
        );
    }

    #[test]
    fn test_external_errors_propagate() {
        let seq = Fragment::Seq(vec!["ok".into(), Fragment::external(Broken)]);
        assert!(matches!(seq.render(), Err(CaptureError::Render { .. })));
    }

    #[test]
    fn test_conflicting_navigation_fails() {
        let nav = || {
            Rendered::default().with_requirements(
                Requirements::new().with_site(NAV_KEY, ConfigValue::seq([ConfigValue::string("index.md")])),
            )
        };
        let seq = Fragment::Seq(vec![nav().into(), nav().into()]);
        assert!(matches!(seq.render(), Err(CaptureError::Requirements(_))));
    }
}
