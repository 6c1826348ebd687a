//! XML reply parsing

use super::{ArrayDetection, Envelope, STATUS_FAILED, parse_code};
use crate::error::{Error, Result};
use crate::value::ResponseValue;
use indexmap::IndexMap;
use std::collections::HashSet;
use std::io::BufReader;
use xmltree::Element;

/// Root element of every reply
const ROOT_TAG: &str = "smoozik";

/// Parses a standalone XML document into a value tree, without envelope checks.
///
/// Useful for payloads that travel outside an envelope, such as the
/// `partytracks` document produced by [`crate::Playlist::to_xml`].
pub fn parse_xml_document(xml: &[u8], detection: ArrayDetection) -> Result<ResponseValue> {
    let root = parse_element(xml)?;
    Ok(element_to_value(&root, detection))
}

/// Converts one element (and its subtree) into a [`ResponseValue`].
///
/// * no child element and non-blank text: `Scalar`
/// * no child element and no text: empty `Mapping`
/// * list-shaped children (see [`ArrayDetection`]): `Sequence` of
///   single-entry mappings `{tag: value}` in document order
/// * otherwise: `Mapping` keyed by child tag, last value wins
pub fn element_to_value(element: &Element, detection: ArrayDetection) -> ResponseValue {
    let children: Vec<&Element> = element
        .children
        .iter()
        .filter_map(|node| node.as_element())
        .collect();

    // Blank text is indistinguishable from an empty element: both map to `{}`
    if children.is_empty() {
        return match element.get_text() {
            Some(text) if !text.trim().is_empty() => ResponseValue::Scalar(text.into_owned()),
            _ => ResponseValue::empty(),
        };
    }

    if is_list(element, &children, detection) {
        ResponseValue::Sequence(
            children
                .into_iter()
                .map(|child| {
                    let mut entry = IndexMap::with_capacity(1);
                    entry.insert(child.name.clone(), element_to_value(child, detection));
                    ResponseValue::Mapping(entry)
                })
                .collect(),
        )
    } else {
        let mut map = IndexMap::with_capacity(children.len());
        for child in children {
            map.insert(child.name.clone(), element_to_value(child, detection));
        }
        ResponseValue::Mapping(map)
    }
}

fn is_list(element: &Element, children: &[&Element], detection: ArrayDetection) -> bool {
    let mut tags = HashSet::with_capacity(children.len());
    for child in children {
        if !tags.insert(child.name.as_str()) {
            return true;
        }
    }

    detection.honors_plural()
        && tags.len() == 1
        && children
            .first()
            .is_some_and(|child| element.name == format!("{}s", child.name))
}

fn parse_element(xml: &[u8]) -> Result<Element> {
    Element::parse(BufReader::new(xml)).map_err(|e| Error::parse(e.to_string()))
}

fn child_text(element: &Element, name: &str) -> String {
    element
        .get_child(name)
        .and_then(|child| child.get_text())
        .map(|text| text.into_owned())
        .unwrap_or_default()
}

pub(super) fn parse_envelope(body: &[u8], detection: ArrayDetection) -> Result<Envelope> {
    let root = parse_element(body)?;

    if root.name != ROOT_TAG {
        return Err(Error::parse("smoozik element missing"));
    }

    let status = root
        .get_child("status")
        .ok_or_else(|| Error::parse("status element missing"))?;
    let status = status.get_text().unwrap_or_default();

    if status.trim() == STATUS_FAILED {
        let error = root
            .get_child("error")
            .ok_or_else(|| Error::parse("error element missing"))?;
        let code = error
            .get_child("code")
            .ok_or_else(|| Error::parse("code element missing"))?;
        let code = parse_code(&code.get_text().unwrap_or_default())?;

        return Ok(Envelope::Failed {
            code,
            message: child_text(error, "message"),
        });
    }

    let data = root
        .get_child("data")
        .ok_or_else(|| Error::parse("data element missing"))?;

    Ok(Envelope::Ok(element_to_value(data, detection)))
}
