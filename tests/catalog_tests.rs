// SPDX-License-Identifier: PMPL-1.0-or-later

//! Loading, writing and round-tripping real catalogs

use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use ts_linguist::catalog::{self, Catalog, TranslationBody, TranslationState};
use ts_linguist::CatalogError;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn test_load_dutch_catalog_header() {
    let catalog = Catalog::load(fixture("subsurface_nl_NL.ts")).expect("fixture should load");
    assert_eq!(catalog.version.as_deref(), Some("2.1"));
    assert_eq!(catalog.language.as_deref(), Some("nl_NL"));
    assert_eq!(catalog.source_language.as_deref(), Some("en_US"));
    assert_eq!(catalog.language_code(), Some("nl"));
    assert_eq!(catalog.contexts.len(), 6);
    assert_eq!(catalog.message_count(), 15);
}

#[test]
fn test_load_preserves_message_details() {
    let catalog = Catalog::load(fixture("subsurface_nl_NL.ts")).unwrap();

    let main = catalog.context("MainWindow").expect("MainWindow context");
    let quit = &main.messages[0];
    assert_eq!(quit.source, "&Quit");
    assert_eq!(quit.translation.body, TranslationBody::Single("&Afsluiten".into()));
    assert_eq!(quit.first_location().as_deref(), Some("../desktop-widgets/mainwindow.ui:171"));
    assert_eq!(quit.ts_line, Some(25));

    let vanished = &main.messages[2];
    assert_eq!(vanished.translation.state, TranslationState::Vanished);
    assert!(!vanished.is_active());

    let c_core = catalog.context("gettextFromC").unwrap();
    let tag = c_core
        .messages
        .iter()
        .find(|m| m.source.starts_with("Expected XML tag"))
        .unwrap();
    assert_eq!(tag.source, "Expected XML tag 'DiveDates' not found");
    assert!(tag.extra_comment.as_deref().unwrap().contains("do not translate"));

    let planner = c_core.messages.iter().find(|m| m.source == "Dive mode").unwrap();
    assert_eq!(planner.disambiguation(), "planner");
}

#[test]
fn test_load_numerus_and_unfinished() {
    let catalog = Catalog::load(fixture("subsurface_nl_NL.ts")).unwrap();

    let dives = &catalog.context("DiveTripModelBase").unwrap().messages[0];
    assert!(dives.numerus);
    assert_eq!(
        dives.translation.body.forms(),
        &["(%n duik)".to_string(), "(%n duiken)".to_string()]
    );

    let bt = &catalog.context("BtDeviceSelectionDialog").unwrap().messages[0];
    assert_eq!(bt.translation.state, TranslationState::Unfinished);
    assert!(bt.translation.body.is_empty());
}

#[test]
fn test_round_trip_fixture_is_lossless() {
    for name in ["subsurface_nl_NL.ts", "subsurface_broken.ts"] {
        let catalog = Catalog::load(fixture(name)).unwrap();
        let result = catalog::round_trip(&catalog).expect("round trip should succeed");
        assert!(result.is_lossless(), "{} lost {:?} gained {:?}", name, result.lost, result.gained);
        assert_eq!(result.triples, catalog.triples().len());
    }
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("copy.ts");

    let catalog = Catalog::load(fixture("subsurface_nl_NL.ts")).unwrap();
    catalog.save(&out).expect("save should succeed");
    let reloaded = Catalog::load(&out).unwrap();

    assert_eq!(reloaded.triples(), catalog.triples());
    assert_eq!(reloaded.language, catalog.language);
    let saved = fs::read_to_string(&out).unwrap();
    assert!(saved.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n"));
}

#[test]
fn test_load_utf8_bom() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bom.ts");
    let mut bytes = vec![0xEF, 0xBB, 0xBF];
    bytes.extend_from_slice(&fs::read(fixture("subsurface_nl_NL.ts")).unwrap());
    fs::write(&path, bytes).unwrap();

    let catalog = Catalog::load(&path).expect("BOM should be stripped");
    assert_eq!(catalog.message_count(), 15);
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = TempDir::new().unwrap();
    let err = Catalog::load(dir.path().join("nope.ts")).unwrap_err();
    assert!(matches!(err, CatalogError::Io { .. }));
}

#[test]
fn test_load_wrong_root_is_rejected() {
    let err = Catalog::parse("<?xml version=\"1.0\"?>\n<html><body/></html>").unwrap_err();
    assert!(matches!(err, CatalogError::UnexpectedRoot { .. }));
}

#[test]
fn test_truncated_catalog_reports_position() {
    let xml = fs::read_to_string(fixture("subsurface_nl_NL.ts")).unwrap();
    let cut = &xml[..xml.len() / 2];
    let err = Catalog::parse(cut).unwrap_err();
    match err {
        CatalogError::UnexpectedEof { .. } | CatalogError::Xml { .. } => {}
        other => panic!("unexpected error: {other}"),
    }
}
