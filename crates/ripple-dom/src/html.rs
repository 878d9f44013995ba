//! HTML escaping and serialization.

use crate::document::Document;
use crate::node::{NodeId, NodeKind};

/// Elements that never have children and are serialized without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// Elements whose content is raw text rather than markup.
pub const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Returns `true` if `tag` is a void element.
pub fn is_void(tag: &str) -> bool {
	VOID_ELEMENTS.contains(&tag)
}

/// Escapes text content.
pub fn escape_text(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			_ => out.push(c),
		}
	}
	out
}

/// Escapes a double-quoted attribute value.
pub fn escape_attr(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	for c in input.chars() {
		match c {
			'&' => out.push_str("&amp;"),
			'<' => out.push_str("&lt;"),
			'>' => out.push_str("&gt;"),
			'"' => out.push_str("&quot;"),
			'\'' => out.push_str("&#39;"),
			_ => out.push(c),
		}
	}
	out
}

/// Decodes the entities produced by [`escape_text`] and [`escape_attr`] plus
/// numeric character references. Unknown entities are kept verbatim.
pub fn unescape(input: &str) -> String {
	let mut out = String::with_capacity(input.len());
	let mut rest = input;
	while let Some(amp) = rest.find('&') {
		out.push_str(&rest[..amp]);
		rest = &rest[amp..];
		let Some(semi) = rest.find(';') else {
			break;
		};
		let entity = &rest[1..semi];
		let decoded = match entity {
			"amp" => Some('&'),
			"lt" => Some('<'),
			"gt" => Some('>'),
			"quot" => Some('"'),
			"apos" => Some('\''),
			"nbsp" => Some('\u{a0}'),
			_ => entity.strip_prefix('#').and_then(|num| {
				let code = match num.strip_prefix(['x', 'X']) {
					Some(hex) => u32::from_str_radix(hex, 16).ok(),
					None => num.parse().ok(),
				};
				code.and_then(char::from_u32)
			}),
		};
		match decoded {
			Some(c) => {
				out.push(c);
				rest = &rest[semi + 1..];
			}
			None => {
				out.push('&');
				rest = &rest[1..];
			}
		}
	}
	out.push_str(rest);
	out
}

/// Serializes a node and its subtree.
pub fn outer_html(doc: &Document, node: NodeId) -> String {
	let mut out = String::new();
	write_node(doc, node, &mut out);
	out
}

/// Serializes the children of a node.
pub fn inner_html(doc: &Document, node: NodeId) -> String {
	let mut out = String::new();
	for &child in doc.children(node) {
		write_node(doc, child, &mut out);
	}
	out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
	match doc.kind(node) {
		Ok(NodeKind::Text) => {
			let text = doc.text(node).unwrap_or_default();
			let raw = doc
				.parent(node)
				.and_then(|p| doc.tag(p))
				.is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
			if raw {
				out.push_str(text);
			} else {
				out.push_str(&escape_text(text));
			}
		}
		Ok(NodeKind::Comment) => {
			out.push_str("<!--");
			out.push_str(doc.text(node).unwrap_or_default());
			out.push_str("-->");
		}
		Ok(NodeKind::Element) => {
			let tag = doc.tag(node).unwrap_or_default();
			out.push('<');
			out.push_str(tag);
			for (name, value) in doc.attributes(node) {
				out.push(' ');
				out.push_str(name);
				out.push_str("=\"");
				out.push_str(&escape_attr(value));
				out.push('"');
			}
			out.push('>');
			if is_void(tag) {
				return;
			}
			for &child in doc.children(node) {
				write_node(doc, child, out);
			}
			out.push_str("</");
			out.push_str(tag);
			out.push('>');
		}
		Err(_) => {}
	}
}
