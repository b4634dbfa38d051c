//! Streaming token source over a compilation log.
//!
//! A forward-only cursor in the StAX style: [`TokenSource::next_token`]
//! advances to the next structural event and the event's name, attributes
//! and text are then read from the cursor. Name, attribute and text buffers
//! are reused between events, so pulling tokens does not build any tree.
//!
//! Whitespace-only text, comments, processing instructions, declarations and
//! doctypes are consumed silently. A self-closing element produces a single
//! `Open { is_empty: true }` and no `Close`.

use super::element::Attributes;
use crate::utils::error::IngestError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::BufRead;

/// Structural event produced by [`TokenSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    /// Element start; `is_empty` is set for self-closing elements
    Open { is_empty: bool },
    /// Non-whitespace character data (text or CDATA)
    Text,
    /// End of the innermost open element
    Close,
    /// End of input
    Eof,
}

/// Pull-driven tokenizer wrapping a byte stream
pub struct TokenSource<R> {
    reader: Reader<R>,
    buf: Vec<u8>,
    name: String,
    attributes: Attributes,
    text: String,
    depth: usize,
    last: Option<Token>,
}

impl<R: BufRead> TokenSource<R> {
    pub fn new(input: R) -> Self {
        Self {
            reader: Reader::from_reader(input),
            buf: Vec::with_capacity(1024),
            name: String::new(),
            attributes: Attributes::new(),
            text: String::new(),
            depth: 0,
            last: None,
        }
    }

    /// Advance to the next structural event
    ///
    /// **Public** - the only way the stream moves forward
    ///
    /// # Errors
    /// * `IngestError::MalformedInput` - tokenizer error, close without a
    ///   matching open, text outside the root element, or end of input with
    ///   elements still open
    pub fn next_token(&mut self) -> Result<Token, IngestError> {
        loop {
            self.buf.clear();
            let position = self.reader.buffer_position() as u64;
            let event = self
                .reader
                .read_event_into(&mut self.buf)
                .map_err(|e| malformed(position, e))?;

            let token = match event {
                Event::Start(start) => {
                    read_open(&start, &mut self.name, &mut self.attributes, position)?;
                    self.depth += 1;
                    Token::Open { is_empty: false }
                }
                Event::Empty(start) => {
                    read_open(&start, &mut self.name, &mut self.attributes, position)?;
                    Token::Open { is_empty: true }
                }
                Event::End(_) => {
                    if self.depth == 0 {
                        return Err(IngestError::MalformedInput(format!(
                            "close tag without matching open at byte {position}"
                        )));
                    }
                    self.depth -= 1;
                    Token::Close
                }
                Event::Text(text) => {
                    let content = text.unescape().map_err(|e| malformed(position, e))?;
                    if content.trim().is_empty() {
                        continue;
                    }
                    if self.depth == 0 {
                        return Err(IngestError::MalformedInput(format!(
                            "text outside of any element at byte {position}"
                        )));
                    }
                    self.text.clear();
                    self.text.push_str(&content);
                    Token::Text
                }
                Event::CData(data) => {
                    let content = std::str::from_utf8(&data).map_err(|e| malformed(position, e))?;
                    if content.trim().is_empty() {
                        continue;
                    }
                    if self.depth == 0 {
                        return Err(IngestError::MalformedInput(format!(
                            "CDATA outside of any element at byte {position}"
                        )));
                    }
                    self.text.clear();
                    self.text.push_str(content);
                    Token::Text
                }
                Event::Eof => {
                    if self.depth != 0 {
                        return Err(IngestError::MalformedInput(format!(
                            "unexpected end of input with {} element(s) still open",
                            self.depth
                        )));
                    }
                    Token::Eof
                }
                // Comments, declarations, processing instructions, doctypes
                _ => continue,
            };

            self.last = Some(token);
            return Ok(token);
        }
    }

    /// Local name of the element opened by the last `Open` token
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Move the current attribute list out of the cursor
    pub fn take_attributes(&mut self) -> Attributes {
        std::mem::take(&mut self.attributes)
    }

    /// Content of the last `Text` token
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of currently open (non-empty) elements
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn last_token(&self) -> Option<Token> {
        self.last
    }

    /// Discard the subtree of the element just opened
    ///
    /// Consumes tokens up to and including the matching close. Nothing is
    /// kept; a self-closing element has nothing left to discard.
    pub fn skip_element(&mut self) -> Result<(), IngestError> {
        let target = self.open_element_depth()?;
        if target == 0 {
            return Ok(());
        }

        while self.depth >= target {
            if self.next_token()? == Token::Eof {
                return Err(IngestError::MalformedInput(
                    "unexpected end of input while skipping element".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Read the text content of a leaf element just opened
    ///
    /// Concatenates all text up to the matching close, which is consumed.
    ///
    /// # Errors
    /// * `IngestError::MalformedInput` - the element has child elements
    pub fn read_element_text(&mut self) -> Result<String, IngestError> {
        let target = self.open_element_depth()?;
        let mut result = String::new();
        if target == 0 {
            return Ok(result);
        }

        let element = self.name.clone();
        loop {
            match self.next_token()? {
                Token::Text => result.push_str(&self.text),
                Token::Close if self.depth < target => return Ok(result),
                Token::Close => {}
                Token::Open { .. } => {
                    return Err(IngestError::MalformedInput(format!(
                        "unexpected element <{}> inside text element <{element}>",
                        self.name
                    )))
                }
                Token::Eof => {
                    return Err(IngestError::MalformedInput(format!(
                        "unexpected end of input inside <{element}>"
                    )))
                }
            }
        }
    }

    /// Depth of the element opened by the last token, 0 if it was empty
    ///
    /// **Private** - precondition check shared by skip and text reads
    fn open_element_depth(&self) -> Result<usize, IngestError> {
        match self.last {
            Some(Token::Open { is_empty: true }) => Ok(0),
            Some(Token::Open { is_empty: false }) => Ok(self.depth),
            other => Err(IngestError::MalformedInput(format!(
                "expected to be positioned at an element start, found {other:?}"
            ))),
        }
    }
}

/// Copy the name and attributes of a start tag into the cursor buffers
///
/// **Private** - internal helper for next_token
fn read_open(
    start: &BytesStart<'_>,
    name: &mut String,
    attributes: &mut Attributes,
    position: u64,
) -> Result<(), IngestError> {
    let local = start.local_name();
    let local = std::str::from_utf8(local.as_ref()).map_err(|e| malformed(position, e))?;
    name.clear();
    name.push_str(local);

    attributes.clear();
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| malformed(position, e))?;
        let key = attribute.key.local_name();
        let key = std::str::from_utf8(key.as_ref()).map_err(|e| malformed(position, e))?;
        let value = attribute
            .unescape_value()
            .map_err(|e| malformed(position, e))?;
        attributes.push(key, value);
    }
    Ok(())
}

fn malformed(position: u64, error: impl std::fmt::Display) -> IngestError {
    IngestError::MalformedInput(format!("{error} (near byte {position})"))
}
