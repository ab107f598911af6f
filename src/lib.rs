// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Convert Doxygen XML documentation dumps to cross-linked Markdown.
//!
//! This crate reads the XML files Doxygen writes for a C++ library and
//! renders them as a small set of Markdown pages: an index, one list per
//! category, a file inventory and a detail page for every class.
//!
//! # Overview
//!
//! A run is a single pass:
//!
//! 1. Each XML document is parsed into flat records
//! 2. The records are folded into a [`corpus::Corpus`]
//! 3. Records are grouped by namespace and rendered to pages
//! 4. The pages are written to the output directory
//!
//! # Example
//!
//! ```no_run
//! use doxy2md::{corpus, pages, renderer, writer};
//! use std::path::Path;
//!
//! let ingest = corpus::ingest_dir(Path::new("xml"));
//! let site = pages::compose_site(
//!     &ingest.corpus,
//!     &ingest.files,
//!     &renderer::RenderOptions::default(),
//! );
//! writer::write_pages(Path::new("markdown_docs"), &site).unwrap();
//! ```
//!
//! # Modules
//!
//! - [`parser`]: record extraction from a single XML document
//! - [`corpus`]: aggregation of records across an input directory
//! - [`group`]: namespace grouping and ordering
//! - [`renderer`]: Markdown for individual records
//! - [`pages`]: whole-page composition
//! - [`writer`]: output to disk

#![deny(missing_docs)]

pub mod corpus;
pub mod group;
pub mod pages;
pub mod parser;
pub mod renderer;
pub mod writer;
