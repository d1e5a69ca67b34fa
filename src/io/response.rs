//! OpenRosa response parsing. The receiver answers with an `OpenRosaResponse`
//! document whose `message` child carries a `nature` attribute; only
//! `submit_success` counts as accepted.
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};

use crate::error::{Error, Result};
use crate::types::SubmissionOutcome;

pub const OPENROSA_RESPONSE_NS: &str = "http://openrosa.org/http/response";
pub const SUBMIT_SUCCESS: &str = "submit_success";

fn is_response_message(ns: &ResolveResult, local_name: &[u8]) -> bool {
    matches!(ns, ResolveResult::Bound(Namespace(uri)) if *uri == OPENROSA_RESPONSE_NS.as_bytes())
        && local_name == b"message"
}

fn nature_of(element: &BytesStart<'_>) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| Error::MalformedResponse(e.to_string()))?;
        if attr.key.local_name().as_ref() == b"nature" {
            let value = attr
                .unescape_value()
                .map_err(|e| Error::MalformedResponse(e.to_string()))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}

/// Decide whether the remote service accepted the submission.
///
/// The whole body must be well-formed XML. The first `message` element in the
/// OpenRosa response namespace directly under the root is used; its text is
/// returned exactly as sent, whitespace included.
pub fn interpret_response(xml: &str) -> Result<SubmissionOutcome> {
    let mut reader = NsReader::from_str(xml);

    let mut depth: usize = 0;
    let mut roots = 0;
    let mut message: Option<(Option<String>, String)> = None;
    let mut open = false;
    let mut child_seen = false;

    loop {
        let (ns, event) = reader
            .read_resolved_event()
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        match event {
            Event::Start(e) => {
                if depth == 0 {
                    roots += 1;
                }
                if open {
                    child_seen = true;
                } else if depth == 1
                    && message.is_none()
                    && is_response_message(&ns, e.local_name().as_ref())
                {
                    message = Some((nature_of(&e)?, String::new()));
                    open = true;
                }
                depth += 1;
            }
            Event::Empty(e) => {
                if depth == 0 {
                    roots += 1;
                }
                if open {
                    child_seen = true;
                } else if depth == 1
                    && message.is_none()
                    && is_response_message(&ns, e.local_name().as_ref())
                {
                    message = Some((nature_of(&e)?, String::new()));
                }
            }
            Event::End(_) => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::MalformedResponse("unexpected closing tag".to_string()))?;
                if open && depth == 1 {
                    open = false;
                }
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(|e| Error::MalformedResponse(e.to_string()))?;
                if depth == 0 && !text.trim().is_empty() {
                    return Err(Error::MalformedResponse("text outside the root element".to_string()));
                }
                // only the text before the first child element counts
                if open && !child_seen {
                    if let Some((_, body)) = message.as_mut() {
                        body.push_str(&text);
                    }
                }
            }
            Event::CData(e) => {
                if open && !child_seen {
                    let raw = e.into_inner();
                    let text = std::str::from_utf8(&raw).map_err(|e| Error::MalformedResponse(e.to_string()))?;
                    if let Some((_, body)) = message.as_mut() {
                        body.push_str(text);
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if depth != 0 {
        return Err(Error::MalformedResponse("unclosed element".to_string()));
    }
    if roots != 1 {
        return Err(Error::MalformedResponse("expected exactly one root element".to_string()));
    }

    match message {
        Some((nature, text)) => {
            let success = nature.as_deref() == Some(SUBMIT_SUCCESS);
            Ok(SubmissionOutcome { success, message: text })
        }
        None => Err(Error::MalformedResponse(format!(
            "no {{{OPENROSA_RESPONSE_NS}}}message element"
        ))),
    }
}
