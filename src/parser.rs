// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Record extraction from Doxygen XML documents.
//!
//! This module turns a single Doxygen XML document into flat, immutable
//! records. Only the subset of the Doxygen schema needed for rendering is
//! read; everything else in the tree is ignored.
//!
//! # Format Overview
//!
//! A Doxygen XML document has a `<doxygen>` root containing:
//! - `compounddef` elements for classes, structs, namespaces (and more)
//! - `memberdef` elements, nested in `sectiondef`s, for functions,
//!   variables, enums, typedefs and friends
//!
//! No linking between documents happens here. Each member only remembers
//! the id of the `compounddef` it was found in.
//!
//! # Example
//!
//! ```
//! use doxy2md::parser::{parse_document, CompoundKind};
//!
//! let xml = r#"<doxygen>
//!   <compounddef id="classFoo" kind="class" language="C++" prot="public">
//!     <compoundname>ns::Foo</compoundname>
//!     <briefdescription><para>A foo.</para></briefdescription>
//!   </compounddef>
//! </doxygen>"#;
//!
//! let doc = parse_document(xml).unwrap();
//! assert_eq!(doc.compounds.len(), 1);
//! assert_eq!(doc.compounds[0].kind, CompoundKind::Class);
//! assert_eq!(doc.compounds[0].brief_description, "A foo.");
//! ```

use roxmltree::Node;
use snafu::prelude::*;

/// Tag name every accepted document must use for its root element.
pub const ROOT_TAG: &str = "doxygen";

/// Error type for rejected documents.
#[derive(Debug, Snafu)]
pub enum ParseError {
    /// The document is not well-formed XML.
    #[snafu(display("failed to parse XML: {source}"))]
    Xml {
        /// The underlying XML parsing error.
        source: roxmltree::Error,
    },

    /// The document is well-formed but is not a Doxygen compound dump.
    #[snafu(display("unexpected root element <{tag}>, expected <{ROOT_TAG}>"))]
    UnexpectedRoot {
        /// The tag name the document actually uses.
        tag: String,
    },
}

/// Access level of a compound, member, base class or inner class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protection {
    /// `prot="public"`.
    Public,
    /// `prot="protected"`.
    Protected,
    /// `prot="private"`.
    Private,
    /// `prot="package"`.
    Package,
    /// Attribute absent or unrecognized.
    #[default]
    Unset,
}

impl Protection {
    fn from_attr(value: Option<&str>) -> Self {
        match value {
            Some("public") => Self::Public,
            Some("protected") => Self::Protected,
            Some("private") => Self::Private,
            Some("package") => Self::Package,
            _ => Self::Unset,
        }
    }

    /// Returns the Doxygen spelling, or an empty string for [`Protection::Unset`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Package => "package",
            Self::Unset => "",
        }
    }
}

/// The kind of a `compounddef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompoundKind {
    /// A C++ class.
    Class,
    /// A C++ struct.
    Struct,
    /// A namespace.
    Namespace,
    /// Any other compound kind (file, dir, page, union, ...), kept verbatim.
    Other(String),
}

impl CompoundKind {
    fn from_attr(value: &str) -> Self {
        match value {
            "class" => Self::Class,
            "struct" => Self::Struct,
            "namespace" => Self::Namespace,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the Doxygen spelling of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Namespace => "namespace",
            Self::Other(kind) => kind,
        }
    }
}

/// The kind of a `memberdef`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    /// A free or member function.
    Function,
    /// A variable or data member.
    Variable,
    /// An enumeration.
    Enum,
    /// A typedef or alias.
    Typedef,
    /// A friend declaration.
    Friend,
    /// Any other member kind (define, signal, property, ...), kept verbatim.
    Other(String),
}

impl MemberKind {
    fn from_attr(value: &str) -> Self {
        match value {
            "function" => Self::Function,
            "variable" => Self::Variable,
            "enum" => Self::Enum,
            "typedef" => Self::Typedef,
            "friend" => Self::Friend,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Returns the Doxygen spelling of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Function => "function",
            Self::Variable => "variable",
            Self::Enum => "enum",
            Self::Typedef => "typedef",
            Self::Friend => "friend",
            Self::Other(kind) => kind,
        }
    }
}

/// A `basecompoundref` entry of a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseClass {
    /// Name of the base as written in the source.
    pub name: String,
    /// Inheritance access level.
    pub protection: Protection,
    /// Whether this is virtual inheritance.
    pub is_virtual: bool,
}

/// An `innerclass` entry of a compound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InnerClass {
    /// Qualified name of the nested class.
    pub name: String,
    /// Compound id of the nested class (may be empty).
    pub reference_id: String,
    /// Access level of the nested class.
    pub protection: Protection,
}

/// A single `param` of a member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    /// Declared type, e.g. `const std::string &`.
    pub type_name: String,
    /// Declared name; empty for unnamed parameters.
    pub name: String,
    /// Default value, present only when the source declares one.
    pub default: Option<String>,
    /// Text of the matching `parameteritem` in the detailed description.
    pub description: String,
}

/// A class, struct or namespace (or an unrecognized compound).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompoundRecord {
    /// Stable Doxygen id, e.g. `classccx_1_1assets__v2_1_1AdobeAsset`.
    pub id: String,
    /// The compound kind.
    pub kind: CompoundKind,
    /// Qualified name, `::`-separated.
    pub name: String,
    /// Source language as reported by Doxygen.
    pub language: String,
    /// Access level.
    pub protection: Protection,
    /// Flattened brief description.
    pub brief_description: String,
    /// Flattened detailed description.
    pub detailed_description: String,
    /// Direct base classes, in declaration order.
    pub base_classes: Vec<BaseClass>,
    /// Nested classes, in declaration order.
    pub inner_classes: Vec<InnerClass>,
}

/// A function, variable, enum, typedef or friend (or an unrecognized member).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberRecord {
    /// Stable Doxygen id; normally prefixed by the owning compound's id.
    pub id: String,
    /// The member kind.
    pub kind: MemberKind,
    /// Unqualified name.
    pub name: String,
    /// Return or declared type; empty for constructors and destructors.
    pub return_type: String,
    /// Access level.
    pub protection: Protection,
    /// `static="yes"`.
    pub is_static: bool,
    /// `const="yes"`.
    pub is_const: bool,
    /// `virt="virtual"`.
    pub is_virtual: bool,
    /// Flattened brief description.
    pub brief_description: String,
    /// Flattened detailed description.
    pub detailed_description: String,
    /// Parameters in declaration order.
    pub parameters: Vec<Parameter>,
    /// Unparsed argument list, e.g. `(int x) const`.
    pub raw_argument_string: String,
    /// Full declaration text.
    pub definition: String,
    /// Id of the enclosing `compounddef`, when there is one.
    pub owner: Option<String>,
}

/// All records extracted from one XML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Every `compounddef` in document order.
    pub compounds: Vec<CompoundRecord>,
    /// Every `memberdef` in document order.
    pub members: Vec<MemberRecord>,
}

/// Parses one Doxygen XML document into records.
///
/// `compounddef` and `memberdef` elements are found anywhere in the tree,
/// not only at the top level. Records of unrecognized kinds are still
/// returned; filtering them is up to the caller.
///
/// # Errors
///
/// Returns [`ParseError::Xml`] if the text is not well-formed XML and
/// [`ParseError::UnexpectedRoot`] if the root element is not `<doxygen>`.
///
/// # Example
///
/// ```
/// use doxy2md::parser::{parse_document, ParseError};
///
/// let err = parse_document("<doxygenindex/>").unwrap_err();
/// assert!(matches!(err, ParseError::UnexpectedRoot { .. }));
/// ```
pub fn parse_document(xml: &str) -> Result<Document, ParseError> {
    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;

    let tree = roxmltree::Document::parse_with_options(xml, options).context(XmlSnafu)?;
    let root = tree.root_element();
    ensure!(
        root.has_tag_name(ROOT_TAG),
        UnexpectedRootSnafu {
            tag: root.tag_name().name()
        }
    );

    let compounds = root
        .descendants()
        .filter(|n| n.has_tag_name("compounddef"))
        .map(extract_compound)
        .collect();
    let members = root
        .descendants()
        .filter(|n| n.has_tag_name("memberdef"))
        .map(extract_member)
        .collect();

    Ok(Document { compounds, members })
}

fn extract_compound(node: Node<'_, '_>) -> CompoundRecord {
    let base_classes = node
        .children()
        .filter(|n| n.has_tag_name("basecompoundref"))
        .map(|base| BaseClass {
            name: element_text(Some(base)),
            protection: Protection::from_attr(base.attribute("prot")),
            is_virtual: base.attribute("virt") == Some("virtual"),
        })
        .collect();

    let inner_classes = node
        .children()
        .filter(|n| n.has_tag_name("innerclass"))
        .map(|inner| InnerClass {
            name: element_text(Some(inner)),
            reference_id: attr(inner, "refid"),
            protection: Protection::from_attr(inner.attribute("prot")),
        })
        .collect();

    CompoundRecord {
        id: attr(node, "id"),
        kind: CompoundKind::from_attr(node.attribute("kind").unwrap_or_default()),
        name: element_text(child(node, "compoundname")),
        language: attr(node, "language"),
        protection: Protection::from_attr(node.attribute("prot")),
        brief_description: element_text(child(node, "briefdescription")),
        detailed_description: element_text(child(node, "detaileddescription")),
        base_classes,
        inner_classes,
    }
}

fn extract_member(node: Node<'_, '_>) -> MemberRecord {
    let detail = child(node, "detaileddescription");

    MemberRecord {
        id: attr(node, "id"),
        kind: MemberKind::from_attr(node.attribute("kind").unwrap_or_default()),
        name: element_text(child(node, "name")),
        return_type: element_text(child(node, "type")),
        protection: Protection::from_attr(node.attribute("prot")),
        is_static: node.attribute("static") == Some("yes"),
        is_const: node.attribute("const") == Some("yes"),
        is_virtual: node.attribute("virt") == Some("virtual"),
        brief_description: element_text(child(node, "briefdescription")),
        detailed_description: element_text(detail),
        parameters: extract_parameters(node, &parameter_descriptions(detail)),
        raw_argument_string: element_text(child(node, "argsstring")),
        definition: element_text(child(node, "definition")),
        owner: node
            .ancestors()
            .skip(1)
            .find(|n| n.has_tag_name("compounddef"))
            .and_then(|n| n.attribute("id"))
            .map(str::to_owned),
    }
}

fn extract_parameters(member: Node<'_, '_>, descriptions: &[(String, String)]) -> Vec<Parameter> {
    member
        .children()
        .filter(|n| n.has_tag_name("param"))
        .map(|param| {
            let name = element_text(child(param, "declname"));
            let description = descriptions
                .iter()
                .find(|(documented, _)| !name.is_empty() && *documented == name)
                .map(|(_, text)| text.clone())
                .unwrap_or_default();
            Parameter {
                type_name: element_text(child(param, "type")),
                default: child(param, "defval").map(|defval| element_text(Some(defval))),
                name,
                description,
            }
        })
        .collect()
}

/// Collects `(name, description)` pairs from `<parameterlist kind="param">`
/// blocks inside a detailed description.
fn parameter_descriptions(detail: Option<Node<'_, '_>>) -> Vec<(String, String)> {
    let Some(detail) = detail else {
        return Vec::new();
    };

    detail
        .descendants()
        .filter(|n| n.has_tag_name("parameterlist") && n.attribute("kind") == Some("param"))
        .flat_map(|list| list.children().filter(|n| n.has_tag_name("parameteritem")))
        .flat_map(|item| {
            let description = element_text(child(item, "parameterdescription"));
            item.descendants()
                .filter(|n| n.has_tag_name("parametername"))
                .map(move |name| (element_text(Some(name)), description.clone()))
        })
        .collect()
}

/// Returns the first direct child element with the given tag name.
fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Option<Node<'a, 'input>> {
    node.children().find(|n| n.has_tag_name(tag))
}

fn attr(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_owned()
}

/// Flattens an element to plain text.
///
/// Takes the element's own text plus, for each direct child element, that
/// child's text and trailing text. Markup nested deeper than one level is
/// dropped. The result goes through [`clean_text`].
fn element_text(node: Option<Node<'_, '_>>) -> String {
    let Some(node) = node else {
        return String::new();
    };

    let mut raw = String::from(node.text().unwrap_or_default());
    for child in node.children().filter(Node::is_element) {
        raw.push_str(child.text().unwrap_or_default());
        raw.push_str(child.tail().unwrap_or_default());
    }

    clean_text(&raw)
}

/// Decodes HTML entities, collapses whitespace runs to one space and trims.
///
/// # Example
///
/// ```
/// use doxy2md::parser::clean_text;
///
/// assert_eq!(clean_text("  a &amp;\n\t b  "), "a & b");
/// ```
#[must_use]
pub fn clean_text(raw: &str) -> String {
    html_escape::decode_html_entities(raw)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
