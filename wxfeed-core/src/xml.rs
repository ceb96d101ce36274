//! First-match lookups over a parsed feed, in the style of DOM `getElementsByTagName`.
//!
//! Lookups search all descendants in document order, not only direct children, and
//! match on the local tag name. Namespaced lookups match the namespace URI as well.

use roxmltree::{Document, Node, ParsingOptions};

use crate::{
    error::{Result, WeatherError},
    model::{Field, Record},
};

/// Parse a feed body. Some providers still send a DOCTYPE, so DTDs are allowed.
pub(crate) fn parse(text: &str) -> Result<Document<'_>> {
    let opt = ParsingOptions { allow_dtd: true, ..ParsingOptions::default() };
    Ok(Document::parse_with_options(text, opt)?)
}

/// All element descendants of `node` (excluding itself) named `name`, in document order.
pub(crate) fn elements<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.descendants()
        .filter(move |n| n.is_element() && *n != node && n.tag_name().name() == name)
}

pub(crate) fn elements_ns<'a, 'i: 'a>(
    node: Node<'a, 'i>,
    ns: &'a str,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'i>> + 'a {
    node.descendants()
        .filter(move |n| n.is_element() && *n != node && n.has_tag_name((ns, name)))
}

pub(crate) fn first<'a, 'i: 'a>(node: Node<'a, 'i>, name: &'a str) -> Option<Node<'a, 'i>> {
    elements(node, name).next()
}

pub(crate) fn require<'a, 'i: 'a>(node: Node<'a, 'i>, name: &'a str) -> Result<Node<'a, 'i>> {
    first(node, name).ok_or_else(|| WeatherError::missing(name))
}

/// Like [`require`], but `node` itself may be the match. Used for a document's root.
pub(crate) fn locate<'a, 'i: 'a>(node: Node<'a, 'i>, name: &'a str) -> Result<Node<'a, 'i>> {
    node.descendants()
        .find(|n| n.is_element() && n.tag_name().name() == name)
        .ok_or_else(|| WeatherError::missing(name))
}

/// Text of the first child node, the way feeds put a single value inside a tag.
pub(crate) fn text_of<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.first_child().and_then(|c| c.text())
}

/// Text of the first descendant named `name`; both the element and its text must exist.
pub(crate) fn require_text(node: Node<'_, '_>, name: &str) -> Result<String> {
    let element = require(node, name)?;
    text_of(element).map(str::to_owned).ok_or_else(|| WeatherError::missing_text(name))
}

/// Attribute value, empty when the attribute is absent.
pub(crate) fn attr(node: Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_owned()
}

/// `{attribute: value}` for each of `names`, read straight off `node`.
pub(crate) fn attrs(node: Node<'_, '_>, names: &[&str]) -> Record {
    names.iter().map(|&name| (name.to_owned(), Field::Text(attr(node, name)))).collect()
}

/// `{rename(tag): text}` for each child tag of `node`; every tag must be present.
pub(crate) fn texts(
    node: Node<'_, '_>,
    tags: &[&str],
    rename: impl Fn(&str) -> &str,
) -> Result<Record> {
    tags.iter()
        .map(|&tag| -> Result<(String, Field)> {
            Ok((rename(tag).to_owned(), Field::Text(require_text(node, tag)?)))
        })
        .collect()
}
