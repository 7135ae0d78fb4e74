// SPDX-License-Identifier: PMPL-1.0-or-later

//! ts-linguist: Qt Linguist catalog reader, runtime lookup and linter.
//!
//! The crate loads `.ts` translation catalogs into a typed model, serves
//! `tr()`-style lookups with the same fallback rules Qt applies, and checks
//! catalogs for the data-quality problems that show up as broken UI text.
//!
//! PIECES:
//! 1. **Catalog**: parse and write `.ts` XML without losing messages.
//! 2. **Lookup**: an immutable `Translator` with plural-form selection.
//! 3. **Checks**: rules TS001-TS012 producing `Finding`s.
//! 4. **Report / Sweep**: terminal, JSON, YAML and SARIF output, over one
//!    catalog or a whole translations tree.

pub mod catalog;
pub mod checks;
pub mod config;
pub mod error;
pub mod language;
pub mod lookup;
pub mod report;
pub mod sweep;
pub mod types;

pub use catalog::Catalog;
pub use config::Config;
pub use error::CatalogError;
pub use lookup::Translator;
