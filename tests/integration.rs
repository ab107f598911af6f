// SPDX-License-Identifier: GPL-3.0-only
// Copyright (C) 2025 Brian Hetro <whee@smaertness.net>

//! Integration tests for doxy2md ingestion, composition and the CLI.

use assert_cmd::Command;
use doxy2md::{corpus, pages, renderer, writer};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ADOBE_ASSET_PAGE: &str = "class_classccx_1_1assets__v2_1_1AdobeAsset.md";

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn fixture_xml() -> PathBuf {
    fixtures().join("xml")
}

fn doxy2md() -> Command {
    Command::new(env!("CARGO_BIN_EXE_doxy2md"))
}

/// Copies fixture XML files into `dir`.
fn copy_fixtures(dir: &Path, names: &[&str]) {
    for name in names {
        fs::copy(fixture_xml().join(name), dir.join(name))
            .unwrap_or_else(|e| panic!("Failed to copy {name}: {e}"));
    }
}

/// Runs the library pipeline over the fixtures and checks every page.
#[test]
fn converts_fixture_directory() {
    let out = TempDir::new().unwrap();

    let ingest = corpus::ingest_dir(&fixture_xml());
    assert!(ingest.failures.is_empty(), "{:?}", ingest.failures);
    assert_eq!(ingest.skipped, vec![fixture_xml().join("index.xml")]);
    assert_eq!(ingest.files.len(), 5);

    let stats = ingest.corpus.stats();
    assert_eq!(stats.total_files, 4);
    assert_eq!(stats.classes, 1);
    assert_eq!(stats.namespaces, 1);
    assert_eq!(stats.structs, 1);
    assert_eq!(stats.functions, 5);
    assert_eq!(stats.enums, 2);
    assert_eq!(stats.variables, 2);
    assert_eq!(stats.typedefs, 1);
    assert_eq!(stats.friends, 1);
    assert_eq!(ingest.corpus.unhandled_kinds.get("compound:file"), Some(&1));

    let site = pages::compose_site(
        &ingest.corpus,
        &ingest.files,
        &renderer::RenderOptions::default(),
    );
    let report = writer::write_pages(out.path(), &site).unwrap();
    assert!(report.failures.is_empty());
    assert_eq!(report.written.len(), 8);

    let index = fs::read_to_string(out.path().join("index.md")).unwrap();
    assert!(index.starts_with("# API Documentation\n\n"));
    assert!(index.contains("- **Total Classes:** 1\n"));
    assert!(index.contains("- **Total Functions:** 5\n"));
    assert!(index.contains("- **Total Typedefs:** 1\n"));
    assert!(index.ends_with("*Generated directly from Doxygen XML documentation*\n"));

    let classes = fs::read_to_string(out.path().join("classes.md")).unwrap();
    assert!(classes.contains("## ccx::assets_v2\n\n### ccx::assets_v2::AdobeAsset\n"));
    assert!(classes.contains(&format!("[Detailed Documentation]({ADOBE_ASSET_PAGE})")));

    let structs = fs::read_to_string(out.path().join("structs.md")).unwrap();
    assert!(structs.contains("## ccx::util\n\n### ccx::util::Range\n"));

    let files = fs::read_to_string(out.path().join("files.md")).unwrap();
    assert!(files.contains("## Class Files (1)\n\n- `classccx_1_1assets__v2_1_1AdobeAsset.xml`\n"));
    assert!(files.contains("## Other Files (2)\n\n- `AdobeAsset_8h.xml`\n- `index.xml`\n"));

    let class_page = fs::read_to_string(out.path().join(ADOBE_ASSET_PAGE)).unwrap();
    assert!(class_page.starts_with("# ccx::assets_v2::AdobeAsset\n\n"));
    assert!(class_page.contains("## Base Classes\n\n- **ccx::assets_v2::Resource** - public\n"));
    assert!(class_page.contains("- **ccx::assets_v2::AdobeAsset::Links** - public\n"));
    assert!(class_page.contains("`AdobeAsset(const std::string &id, bool shared=false)`"));
    assert!(class_page.contains("`~AdobeAsset()`"));
    assert!(class_page.contains("- **`id`** (`const std::string &`) - Cloud identifier.\n"));
    assert!(class_page.contains("- **`shared`** (`bool`) = `false`\n"));
    assert!(class_page.contains("**Qualifiers:** 🟢 **public** 🔒 **const** 👻 **virtual**\n"));
    assert!(class_page.contains("**Qualifiers:** 🟢 **public** ⚡ **static**\n"));
    assert!(class_page.contains("**Qualifiers:** 🔴 **private**\n"));
    assert!(class_page.contains("### m_id\n"));
    assert!(!class_page.contains("isValidId"));
    assert!(!class_page.contains("AssetContext"));
    assert!(class_page.ends_with("[Back to Classes](classes.md) | [Back to Index](index.md)\n"));
}

/// Category pages do not depend on the order documents are folded in.
#[test]
fn category_pages_ignore_document_order() {
    let mut documents: Vec<_> = corpus::collect_xml_files(&fixture_xml())
        .iter()
        .filter_map(|path| corpus::load_file(path).ok())
        .collect();
    assert_eq!(documents.len(), 4);

    let render = |documents: Vec<_>| {
        let corpus = corpus::Corpus::from_documents(documents);
        let mut site = pages::compose_site(&corpus, &[], &renderer::RenderOptions::default());
        site.truncate(7);
        site
    };

    let forward = render(documents.clone());
    documents.reverse();
    let backward = render(documents);

    assert_eq!(forward, backward);
}

/// An empty input directory still yields the fixed set of pages.
#[test]
fn empty_directory_produces_fixed_pages() {
    let input = TempDir::new().unwrap();

    let ingest = corpus::ingest_dir(input.path());
    let site = pages::compose_site(
        &ingest.corpus,
        &ingest.files,
        &renderer::RenderOptions::default(),
    );

    assert_eq!(site.len(), 7);
    assert!(site[0].content.contains("- **Total Classes:** 0\n"));
}

/// The CLI writes the full page set into the requested directory.
#[test]
fn cli_converts_directory() {
    let out = TempDir::new().unwrap();

    doxy2md()
        .arg(fixture_xml())
        .arg("-o")
        .arg(out.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote 8 pages"));

    for page in [
        "index.md",
        "classes.md",
        "namespaces.md",
        "structs.md",
        "functions.md",
        "enums.md",
        "files.md",
        ADOBE_ASSET_PAGE,
    ] {
        assert!(out.path().join(page).is_file(), "missing {page}");
    }
}

/// A malformed document fails the run but the other pages are still written.
#[test]
fn cli_reports_malformed_document() {
    let input = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    copy_fixtures(input.path(), &["classccx_1_1assets__v2_1_1AdobeAsset.xml"]);
    fs::write(input.path().join("broken.xml"), "<doxygen><compounddef>").unwrap();

    doxy2md()
        .arg(input.path())
        .arg("--output")
        .arg(out.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("broken.xml"))
        .stderr(predicate::str::contains("1 document(s) could not be parsed"));

    let classes = fs::read_to_string(out.path().join("classes.md")).unwrap();
    assert!(classes.contains("Total Classes: 1"));
    let files = fs::read_to_string(out.path().join("files.md")).unwrap();
    assert!(files.contains("- `broken.xml`"));
}

/// The overview file controls the index page heading and highlights.
#[test]
fn cli_applies_overview() {
    let out = TempDir::new().unwrap();

    doxy2md()
        .arg(fixture_xml())
        .arg("-o")
        .arg(out.path())
        .arg("--overview")
        .arg(fixtures().join("overview.json"))
        .arg("--quiet")
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote").not());

    let index = fs::read_to_string(out.path().join("index.md")).unwrap();
    assert!(index.starts_with(
        "# Shared Asset Model C++ Client Library (SAM.cpp)\n\n**Version:** 14.3.0  \n"
    ));
    assert!(index.contains("## Overview\n\nThis documentation covers"));
    assert!(index.contains("### Core Classes\n- **AdobeAsset** - Base class for Adobe assets\n"));
}

/// A broken overview file is reported before anything is written.
#[test]
fn cli_rejects_invalid_overview() {
    let dir = TempDir::new().unwrap();
    let overview = dir.path().join("overview.json");
    fs::write(&overview, "{ \"title\": ").unwrap();
    let out = dir.path().join("docs");

    doxy2md()
        .arg(fixture_xml())
        .arg("-o")
        .arg(&out)
        .arg("--overview")
        .arg(&overview)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse overview"));

    assert!(!out.exists());
}

/// A missing input directory is fatal.
#[test]
fn cli_fails_on_missing_input() {
    let dir = TempDir::new().unwrap();

    doxy2md()
        .arg(dir.path().join("nope"))
        .arg("-o")
        .arg(dir.path().join("docs"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}

/// A dry run lists the pages without creating the output directory.
#[test]
fn cli_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("docs");

    doxy2md()
        .arg(fixture_xml())
        .arg("-o")
        .arg(&out)
        .arg("--dry-run")
        .assert()
        .success()
        .stderr(predicate::str::contains("Would write"))
        .stderr(predicate::str::contains(ADOBE_ASSET_PAGE));

    assert!(!out.exists());
}

/// The anchor style is selectable and validated.
#[test]
fn cli_github_anchor_style() {
    let out = TempDir::new().unwrap();

    doxy2md()
        .arg(fixture_xml())
        .args(["--anchor-style", "github", "-q", "-o"])
        .arg(out.path())
        .assert()
        .success();

    let class_page = fs::read_to_string(out.path().join(ADOBE_ASSET_PAGE)).unwrap();
    assert!(class_page.contains("- [getName](#getname)\n"));
    assert!(class_page.contains("- [m_id](#m_id)\n"));

    doxy2md()
        .args(["--anchor-style", "fancy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("anchor-style must be legacy or github"));
}
