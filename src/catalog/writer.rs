// SPDX-License-Identifier: PMPL-1.0-or-later

//! Serializer producing the same layout as `lupdate`

use super::{Catalog, Message, TranslationBody, TranslationState};
use quick_xml::escape::escape;
use std::fmt::Write;

pub(super) fn write(catalog: &Catalog) -> String {
    let mut out = String::with_capacity(catalog.message_count() * 160);
    out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<!DOCTYPE TS>\n<TS");
    push_attr(&mut out, "version", catalog.version.as_deref());
    push_attr(&mut out, "language", catalog.language.as_deref());
    push_attr(&mut out, "sourcelanguage", catalog.source_language.as_deref());
    out.push_str(">\n");

    for context in &catalog.contexts {
        out.push_str("<context>\n");
        push_element(&mut out, 1, "name", &context.name);
        if let Some(comment) = &context.comment {
            push_element(&mut out, 1, "comment", comment);
        }
        for message in &context.messages {
            write_message(&mut out, message);
        }
        out.push_str("</context>\n");
    }

    out.push_str("</TS>\n");
    out
}

fn write_message(out: &mut String, message: &Message) {
    indent(out, 1);
    out.push_str("<message");
    push_attr(out, "id", message.id.as_deref());
    if message.numerus {
        push_attr(out, "numerus", Some("yes"));
    }
    out.push_str(">\n");

    for location in &message.locations {
        indent(out, 2);
        out.push_str("<location");
        push_attr(out, "filename", location.filename.as_deref());
        if let Some(line) = location.line {
            let _ = write!(out, " line=\"{}\"", line);
        }
        out.push_str("/>\n");
    }

    push_element(out, 2, "source", &message.source);
    let optional = [
        ("oldsource", &message.old_source),
        ("comment", &message.comment),
        ("oldcomment", &message.old_comment),
        ("extracomment", &message.extra_comment),
        ("translatorcomment", &message.translator_comment),
    ];
    for (tag, value) in optional {
        if let Some(value) = value {
            push_element(out, 2, tag, value);
        }
    }

    indent(out, 2);
    out.push_str("<translation");
    if message.translation.state != TranslationState::Finished {
        push_attr(out, "type", Some(message.translation.state.as_str()));
    }
    out.push('>');
    match &message.translation.body {
        TranslationBody::Single(text) => push_text(out, text),
        TranslationBody::Numerus(forms) => {
            out.push('\n');
            for form in forms {
                push_element(out, 3, "numerusform", form);
            }
            indent(out, 2);
        }
    }
    out.push_str("</translation>\n");

    indent(out, 1);
    out.push_str("</message>\n");
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("    ");
    }
}

fn push_attr(out: &mut String, key: &str, value: Option<&str>) {
    if let Some(value) = value {
        let _ = write!(out, " {}=\"{}\"", key, escape(value));
    }
}

fn push_element(out: &mut String, level: usize, tag: &str, text: &str) {
    indent(out, level);
    let _ = write!(out, "<{}>", tag);
    push_text(out, text);
    let _ = writeln!(out, "</{}>", tag);
}

/// Escape text content. Control characters are not representable in XML
/// 1.0, so they go out as `<byte>` elements the way `lupdate` writes them.
fn push_text(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(pos) = rest.find(is_forbidden_control) {
        out.push_str(&escape(&rest[..pos]));
        let ch = rest[pos..].chars().next().unwrap_or_default();
        let _ = write!(out, "<byte value=\"x{:x}\"/>", ch as u32);
        rest = &rest[pos + ch.len_utf8()..];
    }
    out.push_str(&escape(rest));
}

fn is_forbidden_control(ch: char) -> bool {
    (ch as u32) < 0x20 && !matches!(ch, '\t' | '\n' | '\r')
}
