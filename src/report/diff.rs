// SPDX-License-Identifier: PMPL-1.0-or-later

//! Diff utilities for catalogs.
//!
//! Messages are matched on context, source and disambiguation. Vanished and
//! obsolete messages count as absent, so a message that `lupdate` retired
//! shows up as removed.

use crate::catalog::{Catalog, TranslationState};
use crate::checks;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct MessageKey {
    pub context: String,
    pub source: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
    pub key: MessageKey,
    pub before: Vec<String>,
    pub after: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogDiff {
    pub added: Vec<MessageKey>,
    pub removed: Vec<MessageKey>,
    /// Translation text differs
    pub changed: Vec<Change>,
    /// Unfinished in the base, finished in the comparison
    pub newly_finished: Vec<MessageKey>,
    /// Finished in the base, unfinished in the comparison
    pub regressed: Vec<MessageKey>,
    pub completion_before: f64,
    pub completion_after: f64,
}

struct Snapshot<'a> {
    state: TranslationState,
    forms: &'a [String],
}

fn active_messages(catalog: &Catalog) -> BTreeMap<MessageKey, Snapshot<'_>> {
    let mut map = BTreeMap::new();
    for entry in catalog.entries().filter(|e| e.message.is_active()) {
        let key = MessageKey {
            context: entry.context.to_string(),
            source: entry.message.source.clone(),
            comment: entry.message.disambiguation().to_string(),
        };
        // Duplicates resolve to the first definition, as lookups do
        map.entry(key).or_insert(Snapshot {
            state: entry.message.translation.state,
            forms: entry.message.translation.body.forms(),
        });
    }
    map
}

impl CatalogDiff {
    pub fn compute(base: &Catalog, compare: &Catalog) -> Self {
        let before = active_messages(base);
        let after = active_messages(compare);

        let mut diff = CatalogDiff {
            added: Vec::new(),
            removed: Vec::new(),
            changed: Vec::new(),
            newly_finished: Vec::new(),
            regressed: Vec::new(),
            completion_before: checks::stats(base).completion,
            completion_after: checks::stats(compare).completion,
        };

        for (key, old) in &before {
            let Some(new) = after.get(key) else {
                diff.removed.push(key.clone());
                continue;
            };
            match (old.state, new.state) {
                (TranslationState::Unfinished, TranslationState::Finished) => {
                    diff.newly_finished.push(key.clone())
                }
                (TranslationState::Finished, TranslationState::Unfinished) => {
                    diff.regressed.push(key.clone())
                }
                _ => {}
            }
            if old.forms != new.forms {
                diff.changed.push(Change {
                    key: key.clone(),
                    before: old.forms.to_vec(),
                    after: new.forms.to_vec(),
                });
            }
        }
        diff.added = after
            .keys()
            .filter(|key| !before.contains_key(*key))
            .cloned()
            .collect();
        diff
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty()
            && self.removed.is_empty()
            && self.changed.is_empty()
            && self.newly_finished.is_empty()
            && self.regressed.is_empty()
    }
}

pub fn format_diff(diff: &CatalogDiff, base_label: &str, compare_label: &str) -> String {
    let mut lines = Vec::new();
    lines.push("=== TS-LINGUIST CATALOG DIFF ===".to_string());
    lines.push(format!("Base: {}", base_label));
    lines.push(format!("Compare: {}", compare_label));
    lines.push(String::new());

    lines.push(format!(
        "Completion: {:.1}% -> {:.1}% ({:+.1})",
        diff.completion_before,
        diff.completion_after,
        diff.completion_after - diff.completion_before
    ));
    lines.push(format!("Added: {}", diff.added.len()));
    lines.push(format!("Removed: {}", diff.removed.len()));
    lines.push(format!("Changed: {}", diff.changed.len()));
    lines.push(format!("Newly finished: {}", diff.newly_finished.len()));
    lines.push(format!("Back to unfinished: {}", diff.regressed.len()));

    push_keys(&mut lines, "Added messages:", &diff.added);
    push_keys(&mut lines, "Removed messages:", &diff.removed);
    push_keys(&mut lines, "Newly finished:", &diff.newly_finished);
    push_keys(&mut lines, "Back to unfinished:", &diff.regressed);

    if !diff.changed.is_empty() {
        lines.push(String::new());
        lines.push("Changed translations:".to_string());
        for change in &diff.changed {
            lines.push(format!("  {}", fmt_key(&change.key)));
            lines.push(format!("    - {}", fmt_forms(&change.before)));
            lines.push(format!("    + {}", fmt_forms(&change.after)));
        }
    }

    lines.join("\n")
}

fn push_keys(lines: &mut Vec<String>, title: &str, keys: &[MessageKey]) {
    if keys.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push(title.to_string());
    for key in keys {
        lines.push(format!("  {}", fmt_key(key)));
    }
}

fn fmt_key(key: &MessageKey) -> String {
    if key.comment.is_empty() {
        format!("{} / {:?}", key.context, key.source)
    } else {
        format!("{} / {:?} ({})", key.context, key.source, key.comment)
    }
}

fn fmt_forms(forms: &[String]) -> String {
    match forms {
        [single] => format!("{:?}", single),
        _ => format!("{:?}", forms),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Message, Translation};

    fn base() -> Catalog {
        let mut catalog = Catalog::new(Some("nl_NL".to_string()));
        catalog.insert("MainWindow", Message::new("&Quit", Translation::finished("&Afsluiten")));
        catalog.insert("MainWindow", Message::new("Restart required", Translation::unfinished()));
        catalog.insert("DiveListView", Message::new("Delete", Translation::finished("Wissen")));
        catalog
    }

    #[test]
    fn test_identical_catalogs() {
        let diff = CatalogDiff::compute(&base(), &base());
        assert!(diff.is_empty());
        assert_eq!(diff.completion_before, diff.completion_after);
    }

    #[test]
    fn test_detects_each_kind_of_change() {
        let mut compare = Catalog::new(Some("nl_NL".to_string()));
        compare.insert("MainWindow", Message::new("&Quit", Translation::finished("&Stoppen")));
        compare.insert(
            "MainWindow",
            Message::new("Restart required", Translation::finished("Herstart vereist")),
        );
        compare.insert("MainWindow", Message::new("&Open", Translation::finished("&Openen")));

        let diff = CatalogDiff::compute(&base(), &compare);
        assert_eq!(diff.added.len(), 1);
        assert_eq!(diff.added[0].source, "&Open");
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].source, "Delete");
        assert_eq!(diff.newly_finished.len(), 1);
        // "&Quit" text changed, and the newly finished message went from "" to text
        assert_eq!(diff.changed.len(), 2);
        assert!((diff.completion_after - 100.0).abs() < f64::EPSILON);

        let text = format_diff(&diff, "old.ts", "new.ts");
        assert!(text.contains("Newly finished: 1"));
        assert!(text.contains("+ \"&Stoppen\""));
    }
}
