// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Markdown rendering of individual records.
//!
//! This module holds the building blocks the page composers in
//! [`crate::pages`] stitch together: entry renderers for functions, enums,
//! variables and classes, the signature composer, the table of contents and
//! the description reformatter. Everything here is a pure function of its
//! inputs.
//!
//! # Example
//!
//! ```
//! use doxy2md::parser::{MemberKind, MemberRecord, Protection};
//! use doxy2md::renderer::render_function_entry;
//!
//! let func = MemberRecord {
//!     id: "classFoo_1a1".into(),
//!     kind: MemberKind::Function,
//!     name: "size".into(),
//!     return_type: "std::size_t".into(),
//!     protection: Protection::Public,
//!     is_static: false,
//!     is_const: true,
//!     is_virtual: false,
//!     brief_description: "Number of items.".into(),
//!     detailed_description: String::new(),
//!     parameters: Vec::new(),
//!     raw_argument_string: "() const".into(),
//!     definition: String::new(),
//!     owner: None,
//! };
//!
//! let markdown = render_function_entry(&func);
//! assert!(markdown.starts_with("### size\n\n`std::size_t size() const`"));
//! assert!(markdown.contains("**Brief:** Number of items."));
//! ```

use crate::corpus::OwnedMembers;
use crate::parser::{CompoundRecord, MemberRecord, Parameter, Protection};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::fmt::Write;
use std::sync::LazyLock;

/// Turns a heading into the anchor a Markdown host assigns to it.
///
/// Table-of-contents links only work when this matches the heading-slug
/// algorithm of the site the pages are published on.
pub type Slugify = fn(&str) -> String;

/// Hand-written overview shown on the index page.
///
/// None of this is derived from the input. Every field has a default, so a
/// JSON file only needs to name the fields it changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Overview {
    /// Page title, usually the library name.
    pub title: String,
    /// Library version.
    pub version: Option<String>,
    /// One-line description shown under the title.
    pub description: Option<String>,
    /// Paragraph for the `## Overview` section.
    pub summary: Option<String>,
    /// Groups listed under `## Main Components`.
    pub highlights: Vec<HighlightGroup>,
    /// Closing line of the page.
    pub footer: String,
}

impl Default for Overview {
    fn default() -> Self {
        Self {
            title: "API Documentation".into(),
            version: None,
            description: None,
            summary: None,
            highlights: Vec::new(),
            footer: "*Generated directly from Doxygen XML documentation*".into(),
        }
    }
}

/// A titled list of components on the index page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HighlightGroup {
    /// Heading of the group, e.g. "Core Classes".
    pub heading: String,
    /// Components in display order.
    pub items: Vec<Highlight>,
}

/// One component on the index page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Highlight {
    /// Component name, e.g. "AdobeAsset".
    pub name: String,
    /// Short explanation shown after the name.
    pub summary: String,
}

/// Configuration options for Markdown rendering.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Content of the index page's hand-written sections.
    pub overview: Overview,

    /// Anchor generation for table-of-contents links.
    ///
    /// Defaults to [`legacy_anchor`].
    pub slugify: Slugify,

    /// When set, the index page says when it was generated.
    ///
    /// Off by default so that reruns over the same input are byte-identical.
    pub generated_at: Option<DateTime<Utc>>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            overview: Overview::default(),
            slugify: legacy_anchor,
            generated_at: None,
        }
    }
}

/// Anchor convention of the publishing pipeline these pages were first
/// written for.
///
/// Lowercases, turns spaces and `::` into `-`, and strips
/// `( ) & < > , = ~ * [ ]`. Everything else is kept.
///
/// # Example
///
/// ```
/// use doxy2md::renderer::legacy_anchor;
///
/// assert_eq!(legacy_anchor("~AdobeAsset"), "adobeasset");
/// assert_eq!(legacy_anchor("operator<<"), "operator");
/// assert_eq!(legacy_anchor("ccx::Space"), "ccx-space");
/// ```
#[must_use]
pub fn legacy_anchor(heading: &str) -> String {
    heading
        .to_lowercase()
        .replace(' ', "-")
        .replace("::", "-")
        .chars()
        .filter(|c| !matches!(c, '(' | ')' | '&' | '<' | '>' | ',' | '=' | '~' | '*' | '[' | ']'))
        .collect()
}

/// GitHub's heading anchor convention.
///
/// Lowercases, keeps alphanumerics, `-` and `_`, turns spaces into `-`
/// and drops everything else.
///
/// # Example
///
/// ```
/// use doxy2md::renderer::github_anchor;
///
/// assert_eq!(github_anchor("ccx::Space"), "ccxspace");
/// assert_eq!(github_anchor("get_name"), "get_name");
/// ```
#[must_use]
pub fn github_anchor(heading: &str) -> String {
    heading
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

static RE_PARA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<para>(.*?)</para>").unwrap());

static RE_EMPHASIS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<emphasis>(.*?)</emphasis>").unwrap());

static RE_ULINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<ulink url="([^"]*)">(.*?)</ulink>"#).unwrap());

static RE_MEMBER_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<ref refid="([^"]*)" kindref="member">(.*?)</ref>"#).unwrap()
});

static RE_BLANK_LINES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Rewrites the few Doxygen markup tags that have a Markdown equivalent.
///
/// Paragraphs become blank-line separated blocks, emphasis becomes bold,
/// `ulink` becomes a link, and member `ref`s become inline code holding the
/// label. Any other markup is left as it is. Blank-line runs are collapsed
/// and the result is trimmed.
///
/// # Example
///
/// ```
/// use doxy2md::renderer::format_description;
///
/// assert_eq!(
///     format_description("<para>Hello <emphasis>world</emphasis></para>"),
///     "Hello **world**"
/// );
/// ```
#[must_use]
pub fn format_description(description: &str) -> String {
    if description.is_empty() {
        return String::new();
    }

    let text = RE_PARA.replace_all(description, "${1}\n\n");
    let text = RE_EMPHASIS.replace_all(&text, "**${1}**");
    let text = RE_ULINK.replace_all(&text, "[${2}](${1})");
    let text = RE_MEMBER_REF.replace_all(&text, "`${2}`");
    let text = RE_BLANK_LINES.replace_all(&text, "\n\n");

    text.trim().to_owned()
}

/// Composes the one-line signature of a function.
///
/// Constructors and destructors (no return type, or a `~` name) render
/// without a type. Any other function with an empty type gets `void`.
///
/// # Example
///
/// ```
/// # use doxy2md::parser::{MemberKind, MemberRecord, Protection};
/// use doxy2md::renderer::compose_signature;
/// # let blank = MemberRecord {
/// #     id: String::new(), kind: MemberKind::Function, name: String::new(),
/// #     return_type: String::new(), protection: Protection::Unset,
/// #     is_static: false, is_const: false, is_virtual: false,
/// #     brief_description: String::new(), detailed_description: String::new(),
/// #     parameters: Vec::new(), raw_argument_string: String::new(),
/// #     definition: String::new(), owner: None,
/// # };
///
/// let ctor = MemberRecord { name: "Foo".into(), raw_argument_string: "(int x)".into(), ..blank.clone() };
/// assert_eq!(compose_signature(&ctor), "Foo(int x)");
///
/// let func = MemberRecord { name: "Bar".into(), return_type: "int".into(), ..blank };
/// assert_eq!(compose_signature(&func), "int Bar()");
/// ```
#[must_use]
pub fn compose_signature(func: &MemberRecord) -> String {
    let name = func.name.as_str();
    let args = argument_list(func.raw_argument_string.trim());

    let is_structor = name.starts_with('~')
        || (func.return_type.is_empty() && !name.is_empty() && !name.starts_with("operator"));
    if is_structor {
        return format!("{name}{args}");
    }

    let return_type = if func.return_type.is_empty() {
        "void"
    } else {
        &func.return_type
    };
    format!("{return_type} {name}{args}")
}

fn argument_list(raw: &str) -> String {
    if raw.is_empty() {
        "()".to_owned()
    } else if raw.starts_with('(') {
        raw.to_owned()
    } else {
        format!("({raw})")
    }
}

/// Builds the `**Qualifiers:**` value for a member.
///
/// Markers appear in a fixed order: protection, static, const, virtual.
/// Returns `None` when no marker applies.
#[must_use]
pub fn qualifiers(member: &MemberRecord) -> Option<String> {
    let protection = match member.protection {
        Protection::Public => Some("🟢 **public**"),
        Protection::Private => Some("🔴 **private**"),
        Protection::Protected => Some("🟡 **protected**"),
        Protection::Package | Protection::Unset => None,
    };

    let markers: Vec<&str> = [
        protection,
        member.is_static.then_some("⚡ **static**"),
        member.is_const.then_some("🔒 **const**"),
        member.is_virtual.then_some("👻 **virtual**"),
    ]
    .into_iter()
    .flatten()
    .collect();

    (!markers.is_empty()).then(|| markers.join(" "))
}

/// Renders the `**Parameters:**` block, or nothing when there are none.
#[must_use]
pub fn format_parameters(parameters: &[Parameter]) -> String {
    if parameters.is_empty() {
        return String::new();
    }

    let mut out = String::from("**Parameters:**\n\n");
    for param in parameters {
        write!(
            out,
            "- **`{}`** (`{}`)",
            escape_for_inline_code(&param.name),
            escape_for_inline_code(&param.type_name)
        )
        .unwrap();
        if let Some(default) = param.default.as_deref().filter(|d| !d.is_empty()) {
            write!(out, " = `{}`", escape_for_inline_code(default)).unwrap();
        }
        if !param.description.is_empty() {
            write!(out, " - {}", param.description).unwrap();
        }
        out.push('\n');
    }
    out.push('\n');
    out
}

/// Renders one function as a `###` section.
#[must_use]
pub fn render_function_entry(func: &MemberRecord) -> String {
    let mut out = String::new();
    writeln!(out, "### {}\n", display_name(&func.name)).unwrap();
    writeln!(out, "`{}`\n", escape_for_inline_code(&compose_signature(func))).unwrap();
    render_descriptions(&mut out, &func.brief_description, &func.detailed_description);
    out.push_str(&format_parameters(&func.parameters));
    render_qualifiers(&mut out, func);
    out
}

/// Renders one enum as a `###` section.
#[must_use]
pub fn render_enum_entry(item: &MemberRecord) -> String {
    let name = display_name(&item.name);
    let mut out = String::new();
    writeln!(out, "### {name}\n").unwrap();
    writeln!(out, "`enum {}`\n", escape_for_inline_code(name)).unwrap();
    render_descriptions(&mut out, &item.brief_description, &item.detailed_description);
    render_qualifiers(&mut out, item);
    out
}

/// Renders one variable as a `###` section.
#[must_use]
pub fn render_variable_entry(var: &MemberRecord) -> String {
    let name = display_name(&var.name);
    let var_type = if var.return_type.is_empty() {
        "auto"
    } else {
        &var.return_type
    };
    let mut out = String::new();
    writeln!(out, "### {name}\n").unwrap();
    writeln!(out, "`{}`\n", escape_for_inline_code(&format!("{var_type} {name}"))).unwrap();
    render_descriptions(&mut out, &var.brief_description, &var.detailed_description);
    render_qualifiers(&mut out, var);
    out
}

/// Renders the summary of a class shown on the class list.
///
/// `detail_page` is the filename of the class's own page.
#[must_use]
pub fn render_class_entry(class: &CompoundRecord, detail_page: &str) -> String {
    let mut out = String::new();
    writeln!(out, "### {}\n", display_name(&class.name)).unwrap();
    render_descriptions(&mut out, &class.brief_description, &class.detailed_description);
    writeln!(out, "- **Language:** {}\n", display_language(&class.language)).unwrap();

    if !class.base_classes.is_empty() {
        out.push_str("**Base Classes:**\n");
        for base in &class.base_classes {
            writeln!(out, "- {}", base.name).unwrap();
        }
        out.push('\n');
    }

    writeln!(out, "[Detailed Documentation]({detail_page})\n").unwrap();
    out
}

/// Renders the table of contents for a class page.
///
/// Sections appear only for member kinds that are present.
#[must_use]
pub fn render_table_of_contents(members: &OwnedMembers<'_>, slugify: Slugify) -> String {
    let mut out = String::from("## Table of Contents\n\n");
    let sections = [
        ("Member Functions", &members.functions),
        ("Types", &members.enums),
        ("Attributes", &members.variables),
    ];

    for (title, items) in sections {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "### {title}\n").unwrap();
        for item in items.iter() {
            let name = display_name(&item.name);
            writeln!(out, "- [{name}](#{})", slugify(name)).unwrap();
        }
        out.push('\n');
    }

    out
}

/// Appends the `**Brief:**` and `**Description:**` lines that have content.
pub(crate) fn render_descriptions(out: &mut String, brief: &str, detailed: &str) {
    if !brief.is_empty() {
        writeln!(out, "**Brief:** {brief}\n").unwrap();
    }
    let detailed = format_description(detailed);
    if !detailed.is_empty() {
        writeln!(out, "**Description:** {detailed}\n").unwrap();
    }
}

fn render_qualifiers(out: &mut String, member: &MemberRecord) {
    if let Some(qualifiers) = qualifiers(member) {
        writeln!(out, "**Qualifiers:** {qualifiers}\n").unwrap();
    }
}

pub(crate) fn display_name(name: &str) -> &str {
    if name.is_empty() { "Unknown" } else { name }
}

pub(crate) fn display_language(language: &str) -> &str {
    if language.is_empty() { "Unknown" } else { language }
}

/// Escapes backticks in a string for use inside inline code spans.
///
/// Replaces backticks with single quotes so that a stray backtick in a
/// declaration cannot end the code span early.
pub(crate) fn escape_for_inline_code(s: &str) -> String {
    s.replace('`', "'")
}
