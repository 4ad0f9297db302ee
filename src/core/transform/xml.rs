//! Generic XML to JSON conversion
//!
//! Converts an element into the JSON shape DHIS2 consumers expect:
//!
//! - attributes become string-valued keys
//! - child elements become keys; repeated names collapse into an array
//! - a text-only element becomes a string
//! - text alongside attributes or children is kept under `$t`
//! - an empty element becomes `{}`
//!
//! All text is whitespace-trimmed, fragments split by child elements are
//! joined with a single space, and namespaces are dropped in favour of local
//! names.

use roxmltree::Node;
use serde_json::{Map, Value};

/// Key used for text content that sits next to attributes or children
pub const TEXT_KEY: &str = "$t";

/// Converts an element and its subtree
pub fn element_to_value(node: Node<'_, '_>) -> Value {
    let mut map = Map::new();

    for attr in node.attributes() {
        insert_or_append(&mut map, attr.name(), Value::String(attr.value().to_string()));
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            insert_or_append(&mut map, child.tag_name().name(), element_to_value(child));
        } else if child.is_text() {
            let fragment = child.text().map(str::trim).unwrap_or_default();
            if !fragment.is_empty() {
                if !text.is_empty() {
                    text.push(' ');
                }
                text.push_str(fragment);
            }
        }
    }

    if map.is_empty() {
        return if text.is_empty() {
            Value::Object(map)
        } else {
            Value::String(text)
        };
    }

    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), Value::String(text));
    }

    Value::Object(map)
}

fn insert_or_append(map: &mut Map<String, Value>, key: &str, value: Value) {
    match map.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key.to_string(), value);
        }
    }
}
