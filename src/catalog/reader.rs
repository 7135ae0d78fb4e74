// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pull parser for the TS 2.1 document type

use super::{Catalog, Context, Location, Message, Translation, TranslationBody, TranslationState};
use crate::error::{CatalogError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::debug;

pub(super) fn parse(xml: &str) -> Result<Catalog> {
    Parser::new(xml).document()
}

struct Parser<'a> {
    reader: Reader<&'a [u8]>,
    input: &'a [u8],
    /// Offset of the event most recently returned by `next`.
    event_start: u64,
    counted_to: usize,
    line: u32,
}

impl<'a> Parser<'a> {
    fn new(xml: &'a str) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        Self {
            reader,
            input: xml.as_bytes(),
            event_start: 0,
            counted_to: 0,
            line: 1,
        }
    }

    fn next(&mut self) -> Result<Event<'a>> {
        self.event_start = self.reader.buffer_position() as u64;
        self.reader.read_event().map_err(|source| CatalogError::Xml {
            position: self.reader.error_position() as u64,
            source,
        })
    }

    fn xml_error(&self, source: quick_xml::Error) -> CatalogError {
        CatalogError::Xml {
            position: self.event_start,
            source,
        }
    }

    /// Line of the current event. Offsets only grow, so counting resumes
    /// where the previous call stopped.
    fn current_line(&mut self) -> u32 {
        let offset = (self.event_start as usize).min(self.input.len());
        if offset > self.counted_to {
            let newlines = self.input[self.counted_to..offset]
                .iter()
                .filter(|&&b| b == b'\n')
                .count();
            self.line += newlines as u32;
            self.counted_to = offset;
        }
        self.line
    }

    fn attributes(&self, start: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.xml_error(err.into()))?;
            let value = attr
                .unescape_value()
                .map_err(|err| self.xml_error(err))?
                .into_owned();
            attrs.push((
                String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                value,
            ));
        }
        Ok(attrs)
    }

    fn document(&mut self) -> Result<Catalog> {
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"TS" => {
                    let mut catalog = self.root_attributes(&e)?;
                    self.root_body(&mut catalog)?;
                    return Ok(catalog);
                }
                Event::Empty(e) if e.name().as_ref() == b"TS" => {
                    return self.root_attributes(&e);
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(CatalogError::UnexpectedRoot {
                        found: element_name(&e),
                    });
                }
                Event::Eof => return Err(CatalogError::MissingRoot),
                _ => {}
            }
        }
    }

    fn root_attributes(&self, start: &BytesStart<'_>) -> Result<Catalog> {
        let mut catalog = Catalog::default();
        for (key, value) in self.attributes(start)? {
            match key.as_str() {
                "version" => catalog.version = Some(value),
                "language" => catalog.language = Some(value),
                "sourcelanguage" => catalog.source_language = Some(value),
                _ => {}
            }
        }
        Ok(catalog)
    }

    fn root_body(&mut self, catalog: &mut Catalog) -> Result<()> {
        loop {
            match self.next()? {
                Event::Start(e) if e.name().as_ref() == b"context" => {
                    let context = self.context()?;
                    catalog.contexts.push(context);
                }
                // <defaultcodec>, <dependencies> and extra-* carry nothing the
                // lookup table or the checks use.
                Event::Start(e) => self.skip(&element_name(&e))?,
                Event::End(_) => return Ok(()),
                Event::Eof => return Err(CatalogError::UnexpectedEof { element: "TS" }),
                _ => {}
            }
        }
    }

    fn context(&mut self) -> Result<Context> {
        let position = self.event_start;
        let mut name = None;
        let mut comment = None;
        let mut messages = Vec::new();
        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"name" => name = Some(self.text("name")?),
                    b"comment" => comment = Some(self.text("comment")?),
                    b"message" => {
                        let attrs = self.attributes(&e)?;
                        messages.push(self.message(attrs)?);
                    }
                    _ => self.skip(&element_name(&e))?,
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"name" => name = Some(String::new()),
                    b"message" => {
                        return Err(CatalogError::MissingElement {
                            parent: "message",
                            element: "source",
                            position: self.event_start,
                        })
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(CatalogError::UnexpectedEof { element: "context" }),
                _ => {}
            }
        }
        let name = name.ok_or(CatalogError::MissingElement {
            parent: "context",
            element: "name",
            position,
        })?;
        Ok(Context {
            name,
            comment,
            messages,
        })
    }

    fn message(&mut self, attrs: Vec<(String, String)>) -> Result<Message> {
        let position = self.event_start;
        let mut message = Message {
            ts_line: Some(self.current_line()),
            ..Default::default()
        };
        for (key, value) in attrs {
            match key.as_str() {
                "id" => message.id = Some(value),
                "numerus" => {
                    message.numerus = parse_yes_no(&value).ok_or(CatalogError::InvalidAttribute {
                        attribute: "numerus",
                        value,
                        position,
                    })?
                }
                _ => {}
            }
        }

        let mut source = None;
        loop {
            match self.next()? {
                Event::Start(e) => match e.name().as_ref() {
                    b"location" => {
                        let attrs = self.attributes(&e)?;
                        message.locations.push(self.location(attrs)?);
                        self.skip("location")?;
                    }
                    b"source" => source = Some(self.text("source")?),
                    b"oldsource" => message.old_source = Some(self.text("oldsource")?),
                    b"comment" => message.comment = Some(self.text("comment")?),
                    b"oldcomment" => message.old_comment = Some(self.text("oldcomment")?),
                    b"extracomment" => message.extra_comment = Some(self.text("extracomment")?),
                    b"translatorcomment" => {
                        message.translator_comment = Some(self.text("translatorcomment")?)
                    }
                    b"translation" => {
                        let state = self.translation_state(&e)?;
                        message.translation = Translation {
                            state,
                            body: self.translation_body()?,
                        };
                    }
                    _ => {
                        let name = element_name(&e);
                        debug!(element = %name, "skipping unknown message child");
                        self.skip(&name)?;
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"location" => {
                        let attrs = self.attributes(&e)?;
                        message.locations.push(self.location(attrs)?);
                    }
                    b"source" => source = Some(String::new()),
                    b"translation" => {
                        message.translation = Translation {
                            state: self.translation_state(&e)?,
                            body: TranslationBody::default(),
                        };
                    }
                    _ => {}
                },
                Event::End(_) => break,
                Event::Eof => return Err(CatalogError::UnexpectedEof { element: "message" }),
                _ => {}
            }
        }

        message.source = source.ok_or(CatalogError::MissingElement {
            parent: "message",
            element: "source",
            position,
        })?;
        Ok(message)
    }

    fn location(&self, attrs: Vec<(String, String)>) -> Result<Location> {
        let mut location = Location::default();
        for (key, value) in attrs {
            match key.as_str() {
                "filename" => location.filename = Some(value),
                "line" => {
                    // Relative locations ("+3") are written by lupdate when
                    // asked to; the sign is dropped and the offset kept.
                    let line = value.trim_start_matches('+').parse::<u32>().ok();
                    location.line = Some(line.ok_or(CatalogError::InvalidAttribute {
                        attribute: "line",
                        value,
                        position: self.event_start,
                    })?);
                }
                _ => {}
            }
        }
        Ok(location)
    }

    fn translation_state(&self, start: &BytesStart<'_>) -> Result<TranslationState> {
        for (key, value) in self.attributes(start)? {
            if key == "type" {
                return TranslationState::parse(&value).ok_or(CatalogError::InvalidAttribute {
                    attribute: "type",
                    value,
                    position: self.event_start,
                });
            }
        }
        Ok(TranslationState::Finished)
    }

    fn translation_body(&mut self) -> Result<TranslationBody> {
        let content = self.mixed("translation", true)?;
        if !content.forms.is_empty() {
            return Ok(TranslationBody::Numerus(content.forms));
        }
        Ok(TranslationBody::Single(content.into_text()))
    }

    /// Plain text with `<byte>` escapes.
    fn text(&mut self, tag: &'static str) -> Result<String> {
        let mut out = String::new();
        loop {
            match self.next()? {
                Event::Text(t) => out.push_str(&t.unescape().map_err(|e| self.xml_error(e))?),
                Event::CData(c) => out.push_str(&String::from_utf8_lossy(&c)),
                Event::Empty(e) if e.name().as_ref() == b"byte" => self.push_byte(&e, &mut out)?,
                Event::Start(e) if e.name().as_ref() == b"byte" => {
                    self.push_byte(&e, &mut out)?;
                    self.skip("byte")?;
                }
                Event::Start(e) | Event::Empty(e) => {
                    return Err(CatalogError::UnexpectedElement {
                        parent: tag,
                        element: element_name(&e),
                        position: self.event_start,
                    })
                }
                Event::End(_) => return Ok(out),
                Event::Eof => return Err(CatalogError::UnexpectedEof { element: tag }),
                _ => {}
            }
        }
    }

    /// Content of `<translation>` or `<numerusform>`: text, length variants,
    /// and (for translations only) numerus forms.
    fn mixed(&mut self, tag: &'static str, allow_forms: bool) -> Result<Mixed> {
        let mut content = Mixed::default();
        loop {
            match self.next()? {
                Event::Text(t) => content
                    .text
                    .push_str(&t.unescape().map_err(|e| self.xml_error(e))?),
                Event::CData(c) => content.text.push_str(&String::from_utf8_lossy(&c)),
                Event::Start(e) => match e.name().as_ref() {
                    b"byte" => {
                        self.push_byte(&e, &mut content.text)?;
                        self.skip("byte")?;
                    }
                    b"lengthvariant" => content.variants.push(self.text("lengthvariant")?),
                    b"numerusform" if allow_forms => {
                        let form = self.mixed("numerusform", false)?;
                        content.forms.push(form.into_text());
                    }
                    _ => {
                        return Err(CatalogError::UnexpectedElement {
                            parent: tag,
                            element: element_name(&e),
                            position: self.event_start,
                        })
                    }
                },
                Event::Empty(e) => match e.name().as_ref() {
                    b"byte" => self.push_byte(&e, &mut content.text)?,
                    b"lengthvariant" => content.variants.push(String::new()),
                    b"numerusform" if allow_forms => content.forms.push(String::new()),
                    _ => {}
                },
                Event::End(_) => return Ok(content),
                Event::Eof => return Err(CatalogError::UnexpectedEof { element: tag }),
                _ => {}
            }
        }
    }

    fn push_byte(&self, start: &BytesStart<'_>, out: &mut String) -> Result<()> {
        let value = self
            .attributes(start)?
            .into_iter()
            .find(|(key, _)| key == "value")
            .map(|(_, value)| value)
            .unwrap_or_default();
        match decode_byte(&value) {
            Some(Some(ch)) => out.push(ch),
            Some(None) => {}
            None => {
                return Err(CatalogError::InvalidAttribute {
                    attribute: "value",
                    value,
                    position: self.event_start,
                })
            }
        }
        Ok(())
    }

    /// Consume events up to and including the end tag of an element whose
    /// start tag was just read.
    fn skip(&mut self, name: &str) -> Result<()> {
        let mut depth = 1usize;
        loop {
            match self.next()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Event::Eof => {
                    debug!(element = name, "document ended while skipping");
                    return Err(CatalogError::UnexpectedEof { element: "TS" });
                }
                _ => {}
            }
        }
    }
}

#[derive(Default)]
struct Mixed {
    text: String,
    forms: Vec<String>,
    variants: Vec<String>,
}

impl Mixed {
    /// Length variants are ordered longest first; the longest one is the
    /// text shown when there is no width constraint.
    fn into_text(self) -> String {
        self.variants.into_iter().next().unwrap_or(self.text)
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn parse_yes_no(value: &str) -> Option<bool> {
    match value {
        "yes" | "true" => Some(true),
        "no" | "false" => Some(false),
        _ => None,
    }
}

/// `<byte value="x1b"/>` or `<byte value="27"/>`. `Some(None)` is the NUL
/// code point, which carries no text.
fn decode_byte(value: &str) -> Option<Option<char>> {
    let (digits, radix) = if let Some(hex) = value.strip_prefix("0x") {
        (hex, 16)
    } else if let Some(hex) = value.strip_prefix('x') {
        (hex, 16)
    } else {
        (value, 10)
    };
    let code = u32::from_str_radix(digits, radix).ok()?;
    if code == 0 {
        return Some(None);
    }
    char::from_u32(code).map(Some)
}
