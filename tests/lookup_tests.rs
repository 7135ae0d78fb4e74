// SPDX-License-Identifier: PMPL-1.0-or-later

//! Runtime lookups against the Dutch fixture

use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use ts_linguist::language::PluralRule;
use ts_linguist::lookup::C_CONTEXT;
use ts_linguist::{Catalog, Translator};

fn translator() -> Translator {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/subsurface_nl_NL.ts");
    let catalog = Catalog::load(path).expect("fixture should load");
    Translator::from_catalog(&catalog)
}

#[test]
fn test_translated_strings() {
    let tr = translator();
    assert_eq!(tr.tr("MainWindow", "&Quit"), "&Afsluiten");
    assert_eq!(tr.tr("PreferencesLanguage", "Restart required"), "Herstart vereist");
    assert_eq!(
        tr.tr(
            "PreferencesLanguage",
            "To correctly load a new language you must restart Subsurface."
        ),
        "Om een nieuwe taal correct te laden moet Subsurface opnieuw gestart worden."
    );
}

#[test]
fn test_c_core_strings_keep_placeholders() {
    let tr = translator();
    assert_eq!(tr.tr_c("Error: %1"), "Fout: %1");
    assert_eq!(
        tr.tr_c("Malformed XML response. Line %1: %2"),
        "Ongeldig XML-antwoord. Regel %1: %2"
    );
    assert_eq!(
        tr.translate(C_CONTEXT, "Expected XML tag 'DiveDates' not found", "", None),
        "Verwachte XML-tag 'DiveDates' niet gevonden"
    );
}

#[test]
fn test_fallbacks_show_english() {
    let tr = translator();
    // unfinished
    let bt = "A device needs a non-zero address for a connection.";
    assert_eq!(tr.tr("BtDeviceSelectionDialog", bt), bt);
    // vanished
    assert_eq!(tr.tr("MainWindow", "Show log"), "Show log");
    // wrong context
    assert_eq!(tr.tr("DiveListView", "Tags"), "Tags");
    // unknown
    assert_eq!(tr.tr("MainWindow", "Never extracted"), "Never extracted");
}

#[test]
fn test_numerus_forms() {
    let tr = translator();
    assert_eq!(tr.plural_rule(), PluralRule::NotOne);
    assert_eq!(tr.translate("DiveTripModelBase", "(%n dive(s))", "", Some(1)), "(1 duik)");
    assert_eq!(tr.translate("DiveTripModelBase", "(%n dive(s))", "", Some(2)), "(2 duiken)");
    assert_eq!(tr.translate("DiveTripModelBase", "(%n dive(s))", "", Some(0)), "(0 duiken)");
    // No count: first form, placeholder left alone
    assert_eq!(tr.translate("DiveTripModelBase", "(%n dive(s))", "", Some(-1)), "(%n duik)");
}

#[test]
fn test_disambiguation_retry() {
    let tr = translator();
    assert_eq!(tr.translate(C_CONTEXT, "Dive mode", "planner", None), "Duikmodus");
    // Only a disambiguated entry exists, so a plain lookup misses
    assert_eq!(tr.lookup(C_CONTEXT, "Dive mode", "", None), None);
    assert_eq!(tr.lookup(C_CONTEXT, "Dive mode", "log", None), None);
}

#[test]
fn test_shared_across_threads() {
    let tr = Arc::new(translator());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tr = Arc::clone(&tr);
            thread::spawn(move || tr.translate("DiveTripModelBase", "(%n dive(s))", "", Some(i)))
        })
        .collect();
    let results: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(results, vec!["(0 duiken)", "(1 duik)", "(2 duiken)", "(3 duiken)"]);
}

#[test]
fn test_export_matches_lookup() {
    let tr = translator();
    let table = tr.export();
    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["MainWindow"]["&Quit"], "&Afsluiten");
    assert_eq!(json["DiveTripModelBase"]["(%n dive(s))"][0], "(%n duik)");
    assert_eq!(json["gettextFromC"]["Dive mode"]["planner"], "Duikmodus");
    assert!(json.get("BtDeviceSelectionDialog").is_none());
    assert_eq!(tr.len(), 13);
}
