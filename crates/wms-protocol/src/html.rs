//! Lenient HTML tree builder for GetFeatureInfo bodies.
//!
//! GeoServer's FreeMarker templates produce loosely formed HTML: void
//! elements without a closing slash, stray end tags and named entities
//! such as `&nbsp;`. The builder accepts all of that and stops at the
//! first unrecoverable tokenizer error, keeping whatever was built so far.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use tracing::warn;

/// Elements that never have content or an end tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Name of the synthetic root element.
const DOCUMENT: &str = "#document";

#[derive(Debug, Clone, PartialEq)]
pub enum HtmlNode {
    Element(HtmlElement),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HtmlElement {
    /// Lower-cased tag name
    pub name: String,
    pub classes: Vec<String>,
    pub children: Vec<HtmlNode>,
}

impl HtmlElement {
    fn new(name: String, classes: Vec<String>) -> Self {
        Self {
            name,
            classes,
            children: Vec::new(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                HtmlNode::Text(t) => out.push_str(t),
                HtmlNode::Element(e) => e.collect_text(out),
            }
        }
    }

    /// All descendant elements in document order, excluding `self`.
    pub fn descendants(&self) -> Vec<&HtmlElement> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants<'a>(&'a self, out: &mut Vec<&'a HtmlElement>) {
        for child in &self.children {
            if let HtmlNode::Element(e) = child {
                out.push(e);
                e.collect_descendants(out);
            }
        }
    }

    /// Descendants with tag `name`, optionally restricted to those carrying `class`.
    pub fn find_all(&self, name: &str, class: Option<&str>) -> Vec<&HtmlElement> {
        self.descendants()
            .into_iter()
            .filter(|e| e.name == name && class.map_or(true, |c| e.has_class(c)))
            .collect()
    }
}

/// Parse `body` into a tree rooted at a synthetic document element.
pub fn parse(body: &str) -> HtmlElement {
    let mut reader = Reader::from_str(body);
    reader.check_end_names(false);
    reader.trim_text(false);

    let mut stack = vec![HtmlElement::new(DOCUMENT.to_string(), Vec::new())];

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                let element = element_from(&start);
                if VOID_ELEMENTS.contains(&element.name.as_str()) {
                    append(&mut stack, HtmlNode::Element(element));
                } else {
                    stack.push(element);
                }
            }
            Ok(Event::Empty(start)) => {
                append(&mut stack, HtmlNode::Element(element_from(&start)));
            }
            Ok(Event::End(end)) => {
                let name = String::from_utf8_lossy(end.name().as_ref()).to_ascii_lowercase();
                close(&mut stack, &name);
            }
            Ok(Event::Text(text)) => {
                append(&mut stack, HtmlNode::Text(decode_text(&text)));
            }
            Ok(Event::CData(data)) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                append(&mut stack, HtmlNode::Text(text));
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                warn!(
                    position = reader.buffer_position(),
                    error = %e,
                    "Stopped parsing malformed HTML"
                );
                break;
            }
        }
    }

    while stack.len() > 1 {
        pop_into_parent(&mut stack);
    }
    stack.pop().unwrap_or_else(|| HtmlElement::new(DOCUMENT.to_string(), Vec::new()))
}

fn element_from(start: &BytesStart) -> HtmlElement {
    let name = String::from_utf8_lossy(start.name().as_ref()).to_ascii_lowercase();
    let mut classes = Vec::new();

    for attr in start.html_attributes().flatten() {
        if attr.key.as_ref().eq_ignore_ascii_case(b"class") {
            let value = String::from_utf8_lossy(&attr.value).into_owned();
            classes.extend(value.split_whitespace().map(str::to_string));
        }
    }

    HtmlElement::new(name, classes)
}

fn decode_text(text: &BytesText) -> String {
    match text.unescape_with(|entity| match entity {
        "nbsp" => Some(" "),
        _ => None,
    }) {
        Ok(s) => s.into_owned(),
        Err(_) => String::from_utf8_lossy(text).into_owned(),
    }
}

fn append(stack: &mut [HtmlElement], node: HtmlNode) {
    if let Some(top) = stack.last_mut() {
        top.children.push(node);
    }
}

fn pop_into_parent(stack: &mut Vec<HtmlElement>) {
    if let Some(element) = stack.pop() {
        append(stack, HtmlNode::Element(element));
    }
}

/// Close the innermost open element named `name`; unmatched end tags are ignored.
fn close(stack: &mut Vec<HtmlElement>, name: &str) {
    let Some(pos) = stack.iter().skip(1).rposition(|e| e.name == name) else {
        return;
    };
    let target = pos + 1;
    while stack.len() > target {
        pop_into_parent(stack);
    }
}
