// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Whole-page composition.
//!
//! [`compose_site`] produces every page of the output as a list of
//! [`Page`]s: the index, one list page per category, the file inventory and
//! a detail page per class. Pages link to each other by relative filename.
//! Nothing is written to disk here; see [`crate::writer`].

use crate::corpus::{Corpus, Stats};
use crate::group::{group_by_namespace, sort_by_name};
use crate::parser::{CompoundRecord, MemberRecord};
use crate::renderer::{
    RenderOptions, display_language, display_name, render_class_entry, render_descriptions,
    render_enum_entry, render_function_entry, render_table_of_contents, render_variable_entry,
};
use std::fmt::Write;

/// Filename of the index page.
pub const INDEX_PAGE: &str = "index.md";
/// Filename of the class list.
pub const CLASSES_PAGE: &str = "classes.md";
/// Filename of the namespace list.
pub const NAMESPACES_PAGE: &str = "namespaces.md";
/// Filename of the struct list.
pub const STRUCTS_PAGE: &str = "structs.md";
/// Filename of the function list.
pub const FUNCTIONS_PAGE: &str = "functions.md";
/// Filename of the enum list.
pub const ENUMS_PAGE: &str = "enums.md";
/// Filename of the input file inventory.
pub const FILES_PAGE: &str = "files.md";

/// A rendered page and the filename it is published under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Filename relative to the output directory.
    pub filename: String,
    /// Markdown content.
    pub content: String,
}

impl Page {
    fn new(filename: impl Into<String>, content: String) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }
}

/// Renders every page of the documentation set.
///
/// `files` are the input filenames listed on the inventory page. Class
/// pages come last, one per class record in corpus order; classes sharing
/// an id produce pages with the same filename.
///
/// # Example
///
/// ```
/// use doxy2md::corpus::Corpus;
/// use doxy2md::pages::compose_site;
/// use doxy2md::renderer::RenderOptions;
///
/// let pages = compose_site(&Corpus::default(), &[], &RenderOptions::default());
/// let names: Vec<&str> = pages.iter().map(|p| p.filename.as_str()).collect();
/// assert_eq!(
///     names,
///     ["index.md", "classes.md", "namespaces.md", "structs.md",
///      "functions.md", "enums.md", "files.md"]
/// );
/// ```
#[must_use]
pub fn compose_site(corpus: &Corpus, files: &[String], opts: &RenderOptions) -> Vec<Page> {
    let mut pages = vec![
        Page::new(INDEX_PAGE, render_index(&corpus.stats(), opts)),
        Page::new(CLASSES_PAGE, render_classes_page(corpus)),
        Page::new(NAMESPACES_PAGE, render_namespaces_page(corpus)),
        Page::new(STRUCTS_PAGE, render_structs_page(corpus)),
        Page::new(FUNCTIONS_PAGE, render_functions_page(corpus)),
        Page::new(ENUMS_PAGE, render_enums_page(corpus)),
        Page::new(FILES_PAGE, render_files_page(files)),
    ];
    pages.extend(corpus.classes.iter().map(|class| {
        Page::new(
            class_page_filename(&class.id),
            render_class_page(class, corpus, opts),
        )
    }));
    pages
}

/// Returns the filename of a class's detail page.
///
/// Characters other than ASCII alphanumerics, `_`, `-` and `.` are replaced
/// with `_` so the id is safe to use as a filename.
///
/// # Example
///
/// ```
/// use doxy2md::pages::class_page_filename;
///
/// assert_eq!(class_page_filename("classccx_1_1Space"), "class_classccx_1_1Space.md");
/// assert_eq!(class_page_filename("../x"), "class_.._x.md");
/// ```
#[must_use]
pub fn class_page_filename(id: &str) -> String {
    let safe: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!("class_{safe}.md")
}

/// Renders the index page: overview, counts and navigation.
#[must_use]
pub fn render_index(stats: &Stats, opts: &RenderOptions) -> String {
    let overview = &opts.overview;
    let mut out = String::new();
    writeln!(out, "# {}\n", overview.title).unwrap();

    match (&overview.version, &overview.description) {
        (Some(version), Some(description)) => {
            writeln!(out, "**Version:** {version}  ").unwrap();
            writeln!(out, "**Description:** {description}\n").unwrap();
        }
        (Some(version), None) => writeln!(out, "**Version:** {version}\n").unwrap(),
        (None, Some(description)) => writeln!(out, "**Description:** {description}\n").unwrap(),
        (None, None) => {}
    }

    if let Some(summary) = &overview.summary {
        writeln!(out, "## Overview\n\n{summary}\n").unwrap();
    }

    out.push_str("## Documentation Statistics\n\n");
    for (label, count) in [
        ("Classes", stats.classes),
        ("Namespaces", stats.namespaces),
        ("Structs", stats.structs),
        ("Functions", stats.functions),
        ("Enums", stats.enums),
        ("Variables", stats.variables),
        ("Typedefs", stats.typedefs),
    ] {
        writeln!(out, "- **Total {label}:** {count}").unwrap();
    }

    out.push_str("\n## Quick Navigation\n\n");
    for (title, page, blurb) in [
        ("Classes", CLASSES_PAGE, "Complete list of all classes with their methods and properties."),
        ("Namespaces", NAMESPACES_PAGE, "Namespace organization and hierarchy."),
        ("Structs", STRUCTS_PAGE, "Data structures and utility classes."),
        ("Functions", FUNCTIONS_PAGE, "Standalone functions and utilities."),
        ("Enums", ENUMS_PAGE, "Enumerations and constants."),
        ("Files", FILES_PAGE, "Source file organization and structure."),
    ] {
        writeln!(out, "### [{title}]({page})\n{blurb}\n").unwrap();
    }

    if !overview.highlights.is_empty() {
        out.push_str("## Main Components\n\n");
        for group in &overview.highlights {
            writeln!(out, "### {}", group.heading).unwrap();
            for item in &group.items {
                if item.summary.is_empty() {
                    writeln!(out, "- **{}**", item.name).unwrap();
                } else {
                    writeln!(out, "- **{}** - {}", item.name, item.summary).unwrap();
                }
            }
            out.push('\n');
        }
    }

    out.push_str("---\n\n");
    if let Some(at) = opts.generated_at {
        writeln!(out, "*Generated on {}*\n", at.format("%Y-%m-%d %H:%M UTC")).unwrap();
    }
    writeln!(out, "{}", overview.footer).unwrap();
    out
}

/// Renders the class list, grouped by namespace.
#[must_use]
pub fn render_classes_page(corpus: &Corpus) -> String {
    let mut out = String::from("# Classes\n\n");
    writeln!(out, "Total Classes: {}\n", corpus.classes.len()).unwrap();

    for (namespace, classes) in group_by_namespace(&corpus.classes) {
        writeln!(out, "## {namespace}\n").unwrap();
        for class in classes {
            out.push_str(&render_class_entry(class, &class_page_filename(&class.id)));
            out.push('\n');
        }
    }
    out
}

/// Renders the namespace list, sorted by name.
#[must_use]
pub fn render_namespaces_page(corpus: &Corpus) -> String {
    let mut out = String::from("# Namespaces\n\n");
    writeln!(out, "Total Namespaces: {}\n", corpus.namespaces.len()).unwrap();

    let mut namespaces: Vec<&CompoundRecord> = corpus.namespaces.iter().collect();
    sort_by_name(&mut namespaces);
    for namespace in namespaces {
        writeln!(out, "## {}\n", display_name(&namespace.name)).unwrap();
        render_compound_summary(&mut out, namespace);
    }
    out
}

/// Renders the struct list, grouped by namespace.
#[must_use]
pub fn render_structs_page(corpus: &Corpus) -> String {
    let mut out = String::from("# Structs\n\n");
    writeln!(out, "Total Structs: {}\n", corpus.structs.len()).unwrap();

    for (namespace, structs) in group_by_namespace(&corpus.structs) {
        writeln!(out, "## {namespace}\n").unwrap();
        for item in structs {
            writeln!(out, "### {}\n", display_name(&item.name)).unwrap();
            render_compound_summary(&mut out, item);
        }
    }
    out
}

/// Renders the function list, grouped by namespace.
#[must_use]
pub fn render_functions_page(corpus: &Corpus) -> String {
    let mut out = String::from("# Functions\n\n");
    writeln!(out, "Total Functions: {}\n", corpus.functions.len()).unwrap();

    for (namespace, functions) in group_by_namespace(&corpus.functions) {
        writeln!(out, "## {namespace}\n").unwrap();
        for func in functions {
            out.push_str(&render_function_entry(func));
        }
    }
    out
}

/// Renders the enum list, grouped by namespace.
#[must_use]
pub fn render_enums_page(corpus: &Corpus) -> String {
    let mut out = String::from("# Enums\n\n");
    writeln!(out, "Total Enums: {}\n", corpus.enums.len()).unwrap();

    for (namespace, enums) in group_by_namespace(&corpus.enums) {
        writeln!(out, "## {namespace}\n").unwrap();
        for item in enums {
            out.push_str(&render_enum_entry(item));
        }
    }
    out
}

/// Renders the inventory of input files.
///
/// Files are bucketed by name prefix only; their content plays no part.
#[must_use]
pub fn render_files_page(files: &[String]) -> String {
    let mut buckets: [(&str, &str, Vec<&str>); 4] = [
        ("Class Files", "class", Vec::new()),
        ("Namespace Files", "namespace", Vec::new()),
        ("Struct Files", "struct", Vec::new()),
        ("Other Files", "", Vec::new()),
    ];
    for file in files {
        if let Some((_, _, bucket)) = buckets
            .iter_mut()
            .find(|(_, prefix, _)| file.starts_with(prefix))
        {
            bucket.push(file);
        }
    }

    let mut out = String::from("# Files\n\nSource file organization and structure.\n");
    for (title, _, mut names) in buckets {
        names.sort_unstable();
        writeln!(out, "\n## {title} ({})\n", names.len()).unwrap();
        for name in names {
            writeln!(out, "- `{name}`").unwrap();
        }
    }
    out
}

/// Renders the detail page of one class.
#[must_use]
pub fn render_class_page(class: &CompoundRecord, corpus: &Corpus, opts: &RenderOptions) -> String {
    let mut out = String::new();
    writeln!(out, "# {}\n", display_name(&class.name)).unwrap();
    render_descriptions(&mut out, &class.brief_description, &class.detailed_description);
    writeln!(out, "**Language:** {}\n", display_language(&class.language)).unwrap();

    if !class.base_classes.is_empty() {
        out.push_str("## Base Classes\n\n");
        for base in &class.base_classes {
            write!(out, "- **{}**", base.name).unwrap();
            if base.is_virtual {
                out.push_str(" (virtual)");
            }
            writeln!(out, " - {}", base.protection.as_str()).unwrap();
        }
        out.push('\n');
    }

    if !class.inner_classes.is_empty() {
        out.push_str("## Inner Classes\n\n");
        for inner in &class.inner_classes {
            if corpus.class(&inner.reference_id).is_some() {
                write!(
                    out,
                    "- [**{}**]({})",
                    inner.name,
                    class_page_filename(&inner.reference_id)
                )
                .unwrap();
            } else {
                write!(out, "- **{}**", inner.name).unwrap();
            }
            writeln!(out, " - {}", inner.protection.as_str()).unwrap();
        }
        out.push('\n');
    }

    let members = corpus.members_of(class);
    out.push_str(&render_table_of_contents(&members, opts.slugify));

    let sections: [(&str, &Vec<&MemberRecord>, fn(&MemberRecord) -> String); 3] = [
        ("Member Functions", &members.functions, render_function_entry),
        ("Types", &members.enums, render_enum_entry),
        ("Attributes", &members.variables, render_variable_entry),
    ];
    for (title, items, render) in sections {
        if items.is_empty() {
            continue;
        }
        writeln!(out, "## {title}\n").unwrap();
        for item in items {
            out.push_str(&render(item));
            out.push('\n');
        }
    }

    writeln!(
        out,
        "\n---\n\n[Back to Classes]({CLASSES_PAGE}) | [Back to Index]({INDEX_PAGE})"
    )
    .unwrap();
    out
}

fn render_compound_summary(out: &mut String, compound: &CompoundRecord) {
    render_descriptions(out, &compound.brief_description, &compound.detailed_description);
    writeln!(out, "- **Language:** {}\n", display_language(&compound.language)).unwrap();
}
