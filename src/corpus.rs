// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Aggregation of extracted records into a corpus.
//!
//! A [`Corpus`] is built by folding parsed [`Document`]s into per-kind
//! buckets. Once built it is only read. [`ingest_dir`] does the whole input
//! pass over a directory of XML files, logging and recording documents that
//! could not be used instead of stopping.

use crate::parser::{
    self, CompoundKind, CompoundRecord, Document, MemberKind, MemberRecord, ParseError,
};
use snafu::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};
use walkdir::WalkDir;

/// Extension of the files read from the input directory.
pub const XML_EXTENSION: &str = "xml";

/// Error type for a document that could not be loaded.
#[derive(Debug, Snafu)]
pub enum LoadError {
    /// The file could not be read.
    #[snafu(display("failed to read {}: {source}", path.display()))]
    ReadFile {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file was read but rejected by the parser.
    #[snafu(display("failed to parse {}: {source}", path.display()))]
    ParseFile {
        /// The file that failed.
        path: PathBuf,
        /// The parser's reason.
        source: ParseError,
    },
}

impl LoadError {
    /// Returns `true` if the file is well-formed XML of some other schema.
    ///
    /// Doxygen writes `index.xml` with a `<doxygenindex>` root next to the
    /// compound files, so these are expected and not treated as failures.
    #[must_use]
    pub const fn is_foreign_document(&self) -> bool {
        matches!(
            self,
            Self::ParseFile {
                source: ParseError::UnexpectedRoot { .. },
                ..
            }
        )
    }
}

/// Every record of a run, bucketed by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    /// Class compounds, in insertion order.
    pub classes: Vec<CompoundRecord>,
    /// Namespace compounds, in insertion order.
    pub namespaces: Vec<CompoundRecord>,
    /// Struct compounds, in insertion order.
    pub structs: Vec<CompoundRecord>,
    /// Function members, in insertion order.
    pub functions: Vec<MemberRecord>,
    /// Enum members, in insertion order.
    pub enums: Vec<MemberRecord>,
    /// Variable members, in insertion order.
    pub variables: Vec<MemberRecord>,
    /// Typedef members, in insertion order.
    pub typedefs: Vec<MemberRecord>,
    /// Friend members, in insertion order.
    pub friends: Vec<MemberRecord>,
    /// Number of documents folded in.
    pub files_processed: usize,
    /// Occurrences of kinds that have no bucket, keyed by `compound:<kind>`
    /// or `member:<kind>`.
    pub unhandled_kinds: BTreeMap<String, usize>,
}

/// Per-kind record counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Stats {
    /// Documents that were parsed and folded in.
    pub total_files: usize,
    /// Number of classes.
    pub classes: usize,
    /// Number of namespaces.
    pub namespaces: usize,
    /// Number of structs.
    pub structs: usize,
    /// Number of functions.
    pub functions: usize,
    /// Number of enums.
    pub enums: usize,
    /// Number of variables.
    pub variables: usize,
    /// Number of typedefs.
    pub typedefs: usize,
    /// Number of friends.
    pub friends: usize,
}

impl Corpus {
    /// Builds a corpus from parsed documents.
    ///
    /// # Example
    ///
    /// ```
    /// use doxy2md::corpus::Corpus;
    /// use doxy2md::parser::parse_document;
    ///
    /// let doc = parse_document(r#"<doxygen>
    ///   <compounddef id="classA" kind="class"><compoundname>A</compoundname></compounddef>
    /// </doxygen>"#).unwrap();
    ///
    /// let corpus = Corpus::from_documents([doc]);
    /// assert_eq!(corpus.stats().classes, 1);
    /// assert_eq!(corpus.stats().total_files, 1);
    /// ```
    #[must_use]
    pub fn from_documents(documents: impl IntoIterator<Item = Document>) -> Self {
        documents.into_iter().fold(Self::default(), Self::with_document)
    }

    /// Returns this corpus with one more document folded in.
    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.files_processed += 1;

        for compound in document.compounds {
            let bucket = match compound.kind {
                CompoundKind::Class => &mut self.classes,
                CompoundKind::Namespace => &mut self.namespaces,
                CompoundKind::Struct => &mut self.structs,
                CompoundKind::Other(_) => {
                    *self
                        .unhandled_kinds
                        .entry(format!("compound:{}", compound.kind.as_str()))
                        .or_default() += 1;
                    continue;
                }
            };
            bucket.push(compound);
        }

        for member in document.members {
            let bucket = match member.kind {
                MemberKind::Function => &mut self.functions,
                MemberKind::Enum => &mut self.enums,
                MemberKind::Variable => &mut self.variables,
                MemberKind::Typedef => &mut self.typedefs,
                MemberKind::Friend => &mut self.friends,
                MemberKind::Other(_) => {
                    *self
                        .unhandled_kinds
                        .entry(format!("member:{}", member.kind.as_str()))
                        .or_default() += 1;
                    continue;
                }
            };
            bucket.push(member);
        }

        self
    }

    /// Returns the per-kind counts, derived from the bucket lengths.
    #[must_use]
    pub fn stats(&self) -> Stats {
        Stats {
            total_files: self.files_processed,
            classes: self.classes.len(),
            namespaces: self.namespaces.len(),
            structs: self.structs.len(),
            functions: self.functions.len(),
            enums: self.enums.len(),
            variables: self.variables.len(),
            typedefs: self.typedefs.len(),
            friends: self.friends.len(),
        }
    }

    /// Returns the class with the given id, if any.
    #[must_use]
    pub fn class(&self, id: &str) -> Option<&CompoundRecord> {
        self.classes.iter().find(|c| c.id == id)
    }

    /// Returns the functions, enums and variables that belong to `owner`.
    #[must_use]
    pub fn members_of<'a>(&'a self, owner: &CompoundRecord) -> OwnedMembers<'a> {
        let select = |members: &'a [MemberRecord]| -> Vec<&'a MemberRecord> {
            members.iter().filter(|m| belongs_to(m, owner)).collect()
        };
        OwnedMembers {
            functions: select(&self.functions),
            enums: select(&self.enums),
            variables: select(&self.variables),
        }
    }
}

/// Members associated with one compound, in corpus order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnedMembers<'a> {
    /// Member functions.
    pub functions: Vec<&'a MemberRecord>,
    /// Member enums.
    pub enums: Vec<&'a MemberRecord>,
    /// Data members.
    pub variables: Vec<&'a MemberRecord>,
}

/// Decides whether `member` belongs to `owner`.
///
/// Uses the enclosing compound recorded at parse time. Members without one
/// fall back to id containment, since Doxygen member ids are prefixed by
/// the id of their compound.
fn belongs_to(member: &MemberRecord, owner: &CompoundRecord) -> bool {
    if owner.id.is_empty() {
        return false;
    }
    match &member.owner {
        Some(id) => *id == owner.id,
        None => member.id.contains(&owner.id),
    }
}

/// The outcome of reading an input directory.
#[derive(Debug, Default)]
pub struct Ingest {
    /// Records from every accepted document.
    pub corpus: Corpus,
    /// Names of every XML file found, accepted or not.
    pub files: Vec<String>,
    /// Well-formed files with a non-Doxygen root element.
    pub skipped: Vec<PathBuf>,
    /// Files that could not be read or were not well-formed.
    pub failures: Vec<LoadError>,
}

/// Lists the XML files directly inside `dir`, sorted by path.
///
/// Symlinks are followed. Entries that cannot be read, including dangling
/// links, are logged and left out.
#[must_use]
pub fn collect_xml_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == XML_EXTENSION))
        .map(walkdir::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

/// Reads and parses one file.
///
/// # Errors
///
/// Returns [`LoadError::ReadFile`] if the file cannot be read and
/// [`LoadError::ParseFile`] if the parser rejects it.
pub fn load_file(path: &Path) -> Result<Document, LoadError> {
    let xml = std::fs::read_to_string(path).context(ReadFileSnafu { path })?;
    parser::parse_document(&xml).context(ParseFileSnafu { path })
}

/// Parses every XML file in `dir` and folds the results into a corpus.
///
/// Rejected documents are logged and reported in the returned [`Ingest`];
/// they never stop the pass. An empty directory yields an empty corpus.
#[must_use]
pub fn ingest_dir(dir: &Path) -> Ingest {
    let paths = collect_xml_files(dir);
    info!("Found {} XML files in {}", paths.len(), dir.display());

    let mut skipped = Vec::new();
    let mut failures = Vec::new();
    let documents: Vec<Document> = paths
        .iter()
        .filter_map(|path| match load_file(path) {
            Ok(document) => {
                debug!(
                    compounds = document.compounds.len(),
                    members = document.members.len(),
                    "parsed {}",
                    path.display()
                );
                Some(document)
            }
            Err(err) if err.is_foreign_document() => {
                warn!("Skipping {err}");
                skipped.push(path.clone());
                None
            }
            Err(err) => {
                error!("{err}");
                failures.push(err);
                None
            }
        })
        .collect();

    let corpus = Corpus::from_documents(documents);
    log_summary(&corpus);

    let files = paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect();

    Ingest {
        corpus,
        files,
        skipped,
        failures,
    }
}

fn log_summary(corpus: &Corpus) {
    let stats = corpus.stats();
    info!(
        total_files = stats.total_files,
        classes = stats.classes,
        namespaces = stats.namespaces,
        structs = stats.structs,
        functions = stats.functions,
        enums = stats.enums,
        variables = stats.variables,
        typedefs = stats.typedefs,
        friends = stats.friends,
        "Parsing complete"
    );
    for (kind, count) in &corpus.unhandled_kinds {
        warn!("Ignored {count} record(s) of unhandled kind {kind}");
    }
}
