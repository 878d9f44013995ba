//! A small HTML fragment parser.
//!
//! Understands the markup the server renderer emits: elements with quoted,
//! unquoted or bare attributes, void elements, comments, raw-text `script` and
//! `style` content, and character references. It is not an HTML5 tree
//! builder; mismatched end tags are reported as errors instead of repaired.

use crate::document::Document;
use crate::error::{DomError, DomResult};
use crate::html::{RAW_TEXT_ELEMENTS, is_void, unescape};
use crate::node::NodeId;

/// Parses `html` and appends the resulting nodes under `parent`.
///
/// Returns the top-level nodes created, in order.
pub fn parse_fragment(doc: &mut Document, parent: NodeId, html: &str) -> DomResult<Vec<NodeId>> {
	let mut parser = Parser {
		input: html,
		pos: 0,
	};
	let mut open: Vec<(NodeId, String)> = Vec::new();
	let mut top_level = Vec::new();

	while parser.pos < html.len() {
		let current = open.last().map_or(parent, |(node, _)| *node);

		if parser.starts_with("<!--") {
			let body = parser.comment()?;
			let node = doc.create_comment(body);
			attach(doc, current, node, open.is_empty(), &mut top_level)?;
		} else if parser.starts_with("</") {
			let name = parser.end_tag()?;
			match open.pop() {
				Some((_, expected)) if expected == name => {}
				Some((_, expected)) => {
					return Err(parser.error(format!(
						"expected </{expected}>, found </{name}>"
					)));
				}
				None => return Err(parser.error(format!("unexpected </{name}>"))),
			}
		} else if parser.starts_with("<") && parser.peek_tag_start() {
			let tag = parser.start_tag()?;
			let node = doc.create_element(tag.name.clone());
			for (name, value) in tag.attrs {
				doc.set_attribute(node, name, value)?;
			}
			attach(doc, current, node, open.is_empty(), &mut top_level)?;

			if RAW_TEXT_ELEMENTS.contains(&tag.name.as_str()) && !tag.self_closing {
				let raw = parser.raw_text(&tag.name)?;
				if !raw.is_empty() {
					let text = doc.create_text(raw);
					doc.append_child(node, text)?;
				}
			} else if !tag.self_closing && !is_void(&tag.name) {
				open.push((node, tag.name));
			}
		} else {
			let raw = parser.text();
			if raw.is_empty() {
				return Err(parser.error("unsupported markup".to_string()));
			}
			let node = doc.create_text(unescape(raw));
			attach(doc, current, node, open.is_empty(), &mut top_level)?;
		}
	}

	if let Some((_, name)) = open.pop() {
		return Err(parser.error(format!("unclosed <{name}>")));
	}
	Ok(top_level)
}

fn attach(
	doc: &mut Document,
	parent: NodeId,
	node: NodeId,
	is_top_level: bool,
	top_level: &mut Vec<NodeId>,
) -> DomResult<()> {
	doc.append_child(parent, node)?;
	if is_top_level {
		top_level.push(node);
	}
	Ok(())
}

struct StartTag {
	name: String,
	attrs: Vec<(String, String)>,
	self_closing: bool,
}

struct Parser<'a> {
	input: &'a str,
	pos: usize,
}

impl<'a> Parser<'a> {
	fn rest(&self) -> &'a str {
		&self.input[self.pos..]
	}

	fn starts_with(&self, prefix: &str) -> bool {
		self.rest().starts_with(prefix)
	}

	fn peek_tag_start(&self) -> bool {
		self.rest()[1..]
			.chars()
			.next()
			.is_some_and(|c| c.is_ascii_alphabetic())
	}

	fn error(&self, message: String) -> DomError {
		DomError::Parse {
			position: self.pos,
			message,
		}
	}

	fn skip_whitespace(&mut self) {
		let trimmed = self.rest().trim_start();
		self.pos = self.input.len() - trimmed.len();
	}

	fn comment(&mut self) -> DomResult<&'a str> {
		let start = self.pos + 4;
		let Some(len) = self.input[start..].find("-->") else {
			return Err(self.error("unterminated comment".to_string()));
		};
		self.pos = start + len + 3;
		Ok(&self.input[start..start + len])
	}

	fn text(&mut self) -> &'a str {
		let rest = self.rest();
		let mut end = rest.len();
		let mut search = 0;
		while let Some(idx) = rest[search..].find('<') {
			let at = search + idx;
			let next = rest[at + 1..].chars().next();
			if matches!(next, Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!') {
				end = at;
				break;
			}
			search = at + 1;
		}
		self.pos += end;
		&rest[..end]
	}

	fn name(&mut self) -> String {
		let rest = self.rest();
		let len = rest
			.find(|c: char| c.is_whitespace() || matches!(c, '>' | '/' | '='))
			.unwrap_or(rest.len());
		self.pos += len;
		rest[..len].to_ascii_lowercase()
	}

	fn start_tag(&mut self) -> DomResult<StartTag> {
		self.pos += 1;
		let name = self.name();
		let mut attrs = Vec::new();
		loop {
			self.skip_whitespace();
			if self.starts_with("/>") {
				self.pos += 2;
				return Ok(StartTag {
					name,
					attrs,
					self_closing: true,
				});
			}
			if self.starts_with(">") {
				self.pos += 1;
				return Ok(StartTag {
					name,
					attrs,
					self_closing: false,
				});
			}
			if self.rest().is_empty() {
				return Err(self.error(format!("unterminated <{name}>")));
			}
			let attr = self.name();
			if attr.is_empty() {
				return Err(self.error(format!("malformed attribute in <{name}>")));
			}
			self.skip_whitespace();
			let value = if self.starts_with("=") {
				self.pos += 1;
				self.skip_whitespace();
				self.attr_value()?
			} else {
				String::new()
			};
			attrs.push((attr, value));
		}
	}

	fn attr_value(&mut self) -> DomResult<String> {
		let rest = self.rest();
		let quote = rest.chars().next().filter(|c| matches!(c, '"' | '\''));
		match quote {
			Some(q) => {
				let Some(len) = rest[1..].find(q) else {
					return Err(self.error("unterminated attribute value".to_string()));
				};
				self.pos += len + 2;
				Ok(unescape(&rest[1..1 + len]))
			}
			None => {
				let len = rest
					.find(|c: char| c.is_whitespace() || c == '>')
					.unwrap_or(rest.len());
				self.pos += len;
				Ok(unescape(&rest[..len]))
			}
		}
	}

	fn end_tag(&mut self) -> DomResult<String> {
		self.pos += 2;
		let name = self.name();
		self.skip_whitespace();
		if !self.starts_with(">") {
			return Err(self.error(format!("malformed </{name}>")));
		}
		self.pos += 1;
		Ok(name)
	}

	fn raw_text(&mut self, tag: &str) -> DomResult<&'a str> {
		let close = format!("</{tag}");
		let rest = self.rest();
		let Some(len) = rest.to_ascii_lowercase().find(&close) else {
			return Err(self.error(format!("unclosed <{tag}>")));
		};
		self.pos += len;
		self.end_tag()?;
		Ok(&rest[..len])
	}
}
