//! XML text to [`XmlValue`] tree reader.
//!
//! Values are kept as strings (no number conversion, leading zeros are
//! preserved) and trimmed. See [`claim_model::node`] for key conventions.

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};

use claim_model::{ATTRIBUTE_PREFIX, CDATA_KEY, TEXT_KEY, XmlNode, XmlValue};

use crate::error::{IngestError, Result};

/// Parse a document into a node keyed by its root element name.
pub fn parse_xml(text: &str) -> Result<XmlValue> {
    let mut reader = Reader::from_str(text);
    let mut stack = vec![Frame::default()];

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|err| IngestError::malformed(position, err))?;
        match event {
            Event::Start(start) => stack.push(Frame::open(&start, position)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start, position)?;
                attach(&mut stack, frame, position)?;
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(IngestError::malformed(position, "unexpected closing tag"));
                }
                if let Some(frame) = stack.pop() {
                    attach(&mut stack, frame, position)?;
                }
            }
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(&text);
                let value = unescape(&raw).map_err(|err| IngestError::malformed(position, err))?;
                current(&mut stack, position)?.text.push_str(&value);
            }
            Event::CData(cdata) => {
                let value = String::from_utf8_lossy(&cdata).into_owned();
                current(&mut stack, position)?
                    .cdata
                    .get_or_insert_with(String::new)
                    .push_str(&value);
            }
            Event::GeneralRef(reference) => {
                let name = String::from_utf8_lossy(&reference);
                let value = resolve_reference(&name).unwrap_or_else(|| format!("&{name};"));
                current(&mut stack, position)?.text.push_str(&value);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        let position = reader.buffer_position() as u64;
        return Err(IngestError::malformed(position, "unclosed element at end of input"));
    }
    let root = stack.pop().unwrap_or_default();
    if root.node.is_empty() {
        return Err(IngestError::malformed(0, "document has no root element"));
    }
    Ok(XmlValue::Node(root.node))
}

#[derive(Default)]
struct Frame {
    name: String,
    node: XmlNode,
    text: String,
    cdata: Option<String>,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut node = XmlNode::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|err| IngestError::malformed(position, err))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let raw = String::from_utf8_lossy(&attribute.value);
            let value = unescape(&raw).map_err(|err| IngestError::malformed(position, err))?;
            node.push(format!("{ATTRIBUTE_PREFIX}{key}"), XmlValue::text(value));
        }
        Ok(Self {
            name,
            node,
            ..Self::default()
        })
    }

    fn finish(self) -> (String, XmlValue) {
        let text = self.text.trim();
        let mut node = self.node;
        let value = if node.is_empty() && (text.is_empty() || self.cdata.is_none()) {
            XmlValue::Text(self.cdata.unwrap_or_else(|| text.to_string()))
        } else {
            if !text.is_empty() {
                node.push(TEXT_KEY, XmlValue::text(text));
            }
            if let Some(cdata) = self.cdata {
                node.push(CDATA_KEY, XmlValue::Text(cdata));
            }
            XmlValue::Node(node)
        };
        (self.name, value)
    }
}

fn current(stack: &mut [Frame], position: u64) -> Result<&mut Frame> {
    stack
        .last_mut()
        .ok_or_else(|| IngestError::malformed(position, "content outside of any element"))
}

fn attach(stack: &mut [Frame], frame: Frame, position: u64) -> Result<()> {
    let (name, value) = frame.finish();
    current(stack, position)?.node.push(name, value);
    Ok(())
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let scalar = match code.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse().ok()?,
        };
        return char::from_u32(scalar).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}
