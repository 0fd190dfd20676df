//! Streaming element walker shared by the descriptor parsers.

use std::io::{BufReader, Read};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, trace};

use droidbuild_core::ConfigurationError;

/// Walk every element of a document whose root must be `<root>`.
///
/// `visit` is called with each element of the first root element and its
/// depth (the root itself is depth 0). The whole input is read so that
/// malformed markup anywhere is reported. Elements outside the first root are
/// checked for well-formedness but not visited.
pub(crate) fn visit_elements<R, F>(source: R, root: &str, mut visit: F) -> Result<(), ConfigurationError>
where
    R: Read,
    F: FnMut(&BytesStart<'_>, usize) -> Result<(), ConfigurationError>,
{
    let mut reader = Reader::from_reader(BufReader::new(source));
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut root_seen = false;
    let mut root_closed = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                enter(e, depth, root, &mut root_seen, root_closed, &mut visit)?;
                depth += 1;
            }
            Ok(Event::Empty(ref e)) => {
                enter(e, depth, root, &mut root_seen, root_closed, &mut visit)?;
                if depth == 0 {
                    root_closed = true;
                }
            }
            Ok(Event::End(ref e)) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    ConfigurationError::new(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    ))
                })?;
                if depth == 0 && root_seen {
                    root_closed = true;
                }
            }
            Ok(Event::Text(ref e)) if depth == 0 && !is_blank(e) => {
                return Err(text_outside(root));
            }
            Ok(Event::CData(_)) if depth == 0 => return Err(text_outside(root)),
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ConfigurationError::new(format!(
                    "malformed markup at byte {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
        }
        buf.clear();
    }

    if !root_seen {
        return Err(ConfigurationError::new(format!("missing <{}> root element", root)));
    }
    if depth > 0 {
        return Err(ConfigurationError::new(format!(
            "malformed markup: {} unterminated element(s) at end of input",
            depth
        )));
    }

    Ok(())
}

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Whitespace, or a byte order mark followed by whitespace
fn is_blank(text: &[u8]) -> bool {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);
    text.iter().all(u8::is_ascii_whitespace)
}

fn text_outside(root: &str) -> ConfigurationError {
    ConfigurationError::new(format!("malformed markup: text outside the <{}> element", root))
}

fn enter<F>(
    element: &BytesStart<'_>,
    depth: usize,
    root: &str,
    root_seen: &mut bool,
    root_closed: bool,
    visit: &mut F,
) -> Result<(), ConfigurationError>
where
    F: FnMut(&BytesStart<'_>, usize) -> Result<(), ConfigurationError>,
{
    if depth == 0 {
        if *root_seen {
            debug!("Ignoring additional root element <{}>", tag_name(element));
            return Ok(());
        }
        *root_seen = true;
        if element.local_name().as_ref() != root.as_bytes() {
            return Err(ConfigurationError::new(format!(
                "expected <{}> root element, found <{}>",
                root,
                tag_name(element)
            )));
        }
    } else if root_closed {
        trace!("Skipping <{}> outside the root element", tag_name(element));
        return Ok(());
    }

    visit(element, depth)
}

/// Qualified tag name for messages
pub(crate) fn tag_name(element: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(element.name().as_ref()).into_owned()
}

/// Look up an attribute by local name, so `android:minSdkVersion` and
/// `minSdkVersion` both match `minSdkVersion`. The first match wins.
pub(crate) fn attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<String>, ConfigurationError> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| {
            ConfigurationError::new(format!("malformed attribute on <{}>: {}", tag_name(element), e))
        })?;
        if attr.key.local_name().as_ref() == name.as_bytes() {
            let value = attr.unescape_value().map_err(|e| {
                ConfigurationError::new(format!(
                    "malformed value for {} on <{}>: {}",
                    name,
                    tag_name(element),
                    e
                ))
            })?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Look up an integer attribute. Any integer is accepted, including negatives.
pub(crate) fn int_attribute(element: &BytesStart<'_>, name: &str) -> Result<Option<i32>, ConfigurationError> {
    match attribute(element, name)? {
        Some(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigurationError::new(format!(
                "{} on <{}> is not an integer: {:?}",
                name,
                tag_name(element),
                value
            ))
        }),
        None => Ok(None),
    }
}
