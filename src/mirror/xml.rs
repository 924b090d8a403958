//! Minimal element tree for the IDE metadata documents.
//!
//! Only elements, attributes and text are kept. Comments and processing
//! instructions are dropped on rewrite.

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attributes.iter_mut().find(|(existing, _)| existing == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key.to_string(), value)),
        }
    }

    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// First child named `name` carrying `key="value"`.
    pub fn child_with(&self, name: &str, key: &str, value: &str) -> Option<&XmlElement> {
        self.children
            .iter()
            .find(|child| child.name == name && child.attr(key) == Some(value))
    }

    /// First child named `name` carrying `key="value"`, appended from `create` when missing.
    pub fn child_with_or_insert(
        &mut self,
        name: &str,
        key: &str,
        value: &str,
        create: impl FnOnce() -> XmlElement,
    ) -> &mut XmlElement {
        let index = match self
            .children
            .iter()
            .position(|child| child.name == name && child.attr(key) == Some(value))
        {
            Some(index) => index,
            None => {
                self.children.push(create());
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// First child named `name`, appended empty when missing.
    pub fn child_or_insert(&mut self, name: &str) -> &mut XmlElement {
        let index = match self.children.iter().position(|child| child.name == name) {
            Some(index) => index,
            None => {
                self.children.push(XmlElement::new(name));
                self.children.len() - 1
            }
        };
        &mut self.children[index]
    }

    /// Every element named `name` below this one, depth first.
    pub fn descendants<'a>(&'a self, name: &str) -> Vec<&'a XmlElement> {
        let mut found = Vec::new();
        for child in &self.children {
            if child.name == name {
                found.push(child);
            }
            found.extend(child.descendants(name));
        }
        found
    }

    /// Drop every descendant named `name` for which `remove` is true. Returns how many went.
    pub fn remove_descendants(&mut self, name: &str, remove: &dyn Fn(&XmlElement) -> bool) -> usize {
        let before = self.children.len();
        self.children.retain(|child| !(child.name == name && remove(child)));
        let mut removed = before - self.children.len();
        for child in &mut self.children {
            removed += child.remove_descendants(name, remove);
        }
        removed
    }
}

/// Parse a whole document into its root element.
pub fn parse_document(content: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(element_from(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack.pop().ok_or_else(|| "unexpected closing tag".to_string())?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                let text = text.unescape().map_err(|err| err.to_string())?;
                if text.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.text = Some(text.into_owned()),
                    None => return Err("text outside the root element".to_string()),
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(format!("error at position {}: {}", reader.error_position(), err)),
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("element <{}> is never closed", open.name));
    }
    root.ok_or_else(|| "document has no root element".to_string())
}

fn element_from(start: &BytesStart<'_>) -> Result<XmlElement, String> {
    let mut element = XmlElement::new(&String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(|err| err.to_string())?;
        element.attributes.push((key, value.into_owned()));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<(), String> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if root.is_some() {
        return Err("more than one root element".to_string());
    }
    *root = Some(element);
    Ok(())
}

/// Serialize with an XML declaration and two-space indentation.
pub fn to_document_string(root: &XmlElement) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|err| err.to_string())?;
    write_element(&mut writer, root)?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    String::from_utf8(bytes).map_err(|err| err.to_string())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), String> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        return writer.write_event(Event::Empty(start)).map_err(|err| err.to_string());
    }

    writer.write_event(Event::Start(start)).map_err(|err| err.to_string())?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|err| err.to_string())?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|err| err.to_string())
}

#[cfg(test)]
#[path = "../test/mirror/xml.rs"]
mod tests;
