// SPDX-License-Identifier: PMPL-1.0-or-later

//! Qt Linguist translation catalogs (`.ts` files)
//!
//! A catalog is a list of `<context>` groups, one per UI class, each holding
//! `<message>` entries that pair an English `source` with its translation.
//! The model keeps file order for contexts and messages so that a catalog
//! written back out diffs cleanly against the one that was read.
//!
//! ```text
//! <TS version="2.1" language="nl_NL">
//!   <context>
//!     <name>MainWindow</name>
//!     <message>
//!       <location filename="../desktop-widgets/mainwindow.cpp" line="42"/>
//!       <source>&amp;Quit</source>
//!       <translation>Afsluiten</translation>
//!     </message>
//!   </context>
//! </TS>
//! ```

mod reader;
mod roundtrip;
mod writer;

pub use roundtrip::{round_trip, RoundTrip};

use crate::error::{CatalogError, Result};
use crate::language;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Format version written by current `lupdate` releases.
pub const TS_VERSION: &str = "2.1";

/// A parsed `.ts` document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: Option<String>,
    /// Target locale, e.g. `nl_NL`.
    pub language: Option<String>,
    pub source_language: Option<String>,
    pub contexts: Vec<Context>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub numerus: bool,
    pub locations: Vec<Location>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_source: Option<String>,
    /// Disambiguation, `msgctxt` in gettext terms. Part of the lookup key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_comment: Option<String>,
    /// Note from the developer to translators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translator_comment: Option<String>,
    pub translation: Translation,
    /// Line of the `<message>` tag in the `.ts` file itself. Not written back.
    #[serde(skip)]
    pub ts_line: Option<u32>,
}

/// Where the source string was extracted from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub filename: Option<String>,
    pub line: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub state: TranslationState,
    pub body: TranslationBody,
}

/// Value of the `type` attribute. No attribute means finished.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationState {
    #[default]
    Finished,
    Unfinished,
    Vanished,
    Obsolete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationBody {
    Single(String),
    Numerus(Vec<String>),
}

/// Borrowed view of one message together with the context it belongs to.
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub context: &'a str,
    pub message: &'a Message,
}

/// Order-independent identity of a message and its translation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Triple {
    pub context: String,
    pub source: String,
    pub comment: String,
    pub translation: Vec<String>,
}

impl Catalog {
    pub fn new(language: Option<String>) -> Self {
        Self {
            version: Some(TS_VERSION.to_string()),
            language,
            source_language: None,
            contexts: Vec::new(),
        }
    }

    /// Parse a catalog from XML text.
    pub fn parse(xml: &str) -> Result<Self> {
        reader::parse(xml)
    }

    /// Read and parse a catalog from disk.
    ///
    /// A UTF-8 or UTF-16 byte order mark selects the decoder; anything
    /// without one is expected to be UTF-8, which is all `lupdate` writes.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(path, &bytes)
    }

    /// Decode and parse file contents already read from `path`.
    pub fn from_bytes(path: &Path, bytes: &[u8]) -> Result<Self> {
        let text = decode(path, bytes)?;
        let catalog = Self::parse(&text)?;
        debug!(
            path = %path.display(),
            contexts = catalog.contexts.len(),
            messages = catalog.message_count(),
            "loaded catalog"
        );
        Ok(catalog)
    }

    /// Serialize in the layout `lupdate` produces.
    pub fn to_xml(&self) -> String {
        writer::write(self)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_xml()).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// ISO 639-1 part of the target locale (`nl_NL` -> `nl`).
    pub fn language_code(&self) -> Option<&str> {
        self.language.as_deref().map(language::base_code)
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|ctx| ctx.name == name)
    }

    /// Add a message, creating its context on first use.
    pub fn insert(&mut self, context: &str, message: Message) {
        match self.contexts.iter_mut().find(|ctx| ctx.name == context) {
            Some(ctx) => ctx.messages.push(message),
            None => self.contexts.push(Context {
                name: context.to_string(),
                comment: None,
                messages: vec![message],
            }),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = Entry<'_>> {
        self.contexts.iter().flat_map(|ctx| {
            ctx.messages.iter().map(move |message| Entry {
                context: &ctx.name,
                message,
            })
        })
    }

    pub fn message_count(&self) -> usize {
        self.contexts.iter().map(|ctx| ctx.messages.len()).sum()
    }

    pub fn triples(&self) -> BTreeSet<Triple> {
        self.entries()
            .map(|entry| Triple {
                context: entry.context.to_string(),
                source: entry.message.source.clone(),
                comment: entry.message.comment.clone().unwrap_or_default(),
                translation: entry.message.translation.body.forms().to_vec(),
            })
            .collect()
    }
}

impl Message {
    pub fn new(source: impl Into<String>, translation: Translation) -> Self {
        Self {
            source: source.into(),
            numerus: matches!(translation.body, TranslationBody::Numerus(_)),
            translation,
            ..Default::default()
        }
    }

    pub fn with_location(mut self, filename: impl Into<String>, line: u32) -> Self {
        self.locations.push(Location {
            filename: Some(filename.into()),
            line: Some(line),
        });
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn disambiguation(&self) -> &str {
        self.comment.as_deref().unwrap_or("")
    }

    /// Obsolete and vanished messages are kept for translators but never
    /// compiled into the runtime table.
    pub fn is_active(&self) -> bool {
        matches!(
            self.translation.state,
            TranslationState::Finished | TranslationState::Unfinished
        )
    }

    /// `file:line` of the first extraction site.
    pub fn first_location(&self) -> Option<String> {
        let loc = self.locations.first()?;
        let file = loc.filename.as_deref()?;
        Some(match loc.line {
            Some(line) => format!("{}:{}", file, line),
            None => file.to_string(),
        })
    }
}

impl Translation {
    pub fn finished(text: impl Into<String>) -> Self {
        Self {
            state: TranslationState::Finished,
            body: TranslationBody::Single(text.into()),
        }
    }

    pub fn unfinished() -> Self {
        Self {
            state: TranslationState::Unfinished,
            body: TranslationBody::default(),
        }
    }

    pub fn numerus<I, S>(forms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            state: TranslationState::Finished,
            body: TranslationBody::Numerus(forms.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.state == TranslationState::Finished
    }
}

impl TranslationBody {
    pub fn forms(&self) -> &[String] {
        match self {
            Self::Single(text) => std::slice::from_ref(text),
            Self::Numerus(forms) => forms,
        }
    }

    /// True when no form carries any text.
    pub fn is_empty(&self) -> bool {
        self.forms().iter().all(String::is_empty)
    }
}

impl Default for TranslationBody {
    fn default() -> Self {
        Self::Single(String::new())
    }
}

impl TranslationState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Finished => "finished",
            Self::Unfinished => "unfinished",
            Self::Vanished => "vanished",
            Self::Obsolete => "obsolete",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unfinished" => Some(Self::Unfinished),
            "vanished" => Some(Self::Vanished),
            "obsolete" => Some(Self::Obsolete),
            _ => None,
        }
    }
}

fn decode(path: &Path, bytes: &[u8]) -> Result<String> {
    match encoding_rs::Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            if had_errors {
                return Err(CatalogError::Encoding {
                    path: path.to_path_buf(),
                    encoding: encoding.name(),
                });
            }
            Ok(text.into_owned())
        }
        None => String::from_utf8(bytes.to_vec()).map_err(|_| CatalogError::Encoding {
            path: path.to_path_buf(),
            encoding: "UTF-8",
        }),
    }
}
