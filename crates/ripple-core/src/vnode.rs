//! The virtual node model.
//!
//! A [`VNode`] describes an element, a component invocation or a fragment. The
//! children of a node are [`Child`] values, which add primitives (text,
//! numbers, booleans, null) and nested lists to the node variants. Nodes are
//! produced fresh on every render and never mutated once handed to the
//! reconciler.

use std::any::TypeId;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use ripple_dom::{Event, Listener};

use crate::error::RenderResult;
use crate::hooks::Scope;
use crate::refs::NodeRef;

/// Reconciliation key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	/// String key.
	Str(Rc<str>),
	/// Integer key.
	Int(i64),
}

impl fmt::Display for Key {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Key::Str(s) => f.write_str(s),
			Key::Int(n) => write!(f, "{n}"),
		}
	}
}

impl From<&str> for Key {
	fn from(value: &str) -> Self {
		Key::Str(value.into())
	}
}

impl From<String> for Key {
	fn from(value: String) -> Self {
		Key::Str(value.into())
	}
}

impl From<i64> for Key {
	fn from(value: i64) -> Self {
		Key::Int(value)
	}
}

impl From<i32> for Key {
	fn from(value: i32) -> Self {
		Key::Int(value.into())
	}
}

/// Indices beyond `i64::MAX` become string keys.
impl From<usize> for Key {
	fn from(value: usize) -> Self {
		i64::try_from(value).map_or_else(|_| Key::Str(value.to_string().into()), Key::Int)
	}
}

/// An event handler prop. Equality is identity.
#[derive(Clone)]
pub struct EventHandler(Listener);

impl EventHandler {
	/// Wraps a closure.
	pub fn new(f: impl Fn(&Event) + 'static) -> Self {
		Self(Rc::new(f))
	}

	/// Invokes the handler.
	pub fn call(&self, event: &Event) {
		(self.0)(event)
	}

	/// Returns the host listener.
	pub fn listener(&self) -> Listener {
		Rc::clone(&self.0)
	}
}

impl PartialEq for EventHandler {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
	}
}

impl fmt::Debug for EventHandler {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "EventHandler({:p})", Rc::as_ptr(&self.0))
	}
}

/// A prop value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropValue {
	/// String attribute.
	Str(Cow<'static, str>),
	/// Integer attribute.
	Int(i64),
	/// Float attribute.
	Float(f64),
	/// Boolean attribute: `true` renders as present, `false` as absent.
	Bool(bool),
	/// Event handler, attached as a listener.
	Handler(EventHandler),
	/// Receives the host node.
	Ref(NodeRef),
	/// Children passed to a component.
	Children(Vec<Child>),
}

impl PropValue {
	/// Returns the attribute text for attribute-like values.
	pub fn as_attribute(&self) -> Option<Cow<'_, str>> {
		match self {
			PropValue::Str(s) => Some(Cow::Borrowed(s)),
			PropValue::Int(n) => Some(Cow::Owned(n.to_string())),
			PropValue::Float(x) => Some(Cow::Owned(x.to_string())),
			PropValue::Bool(true) => Some(Cow::Borrowed("")),
			PropValue::Bool(false)
			| PropValue::Handler(_)
			| PropValue::Ref(_)
			| PropValue::Children(_) => None,
		}
	}
}

impl From<&'static str> for PropValue {
	fn from(value: &'static str) -> Self {
		PropValue::Str(Cow::Borrowed(value))
	}
}

impl From<String> for PropValue {
	fn from(value: String) -> Self {
		PropValue::Str(Cow::Owned(value))
	}
}

impl From<i64> for PropValue {
	fn from(value: i64) -> Self {
		PropValue::Int(value)
	}
}

impl From<i32> for PropValue {
	fn from(value: i32) -> Self {
		PropValue::Int(value.into())
	}
}

impl From<f64> for PropValue {
	fn from(value: f64) -> Self {
		PropValue::Float(value)
	}
}

impl From<bool> for PropValue {
	fn from(value: bool) -> Self {
		PropValue::Bool(value)
	}
}

impl From<EventHandler> for PropValue {
	fn from(value: EventHandler) -> Self {
		PropValue::Handler(value)
	}
}

impl From<NodeRef> for PropValue {
	fn from(value: NodeRef) -> Self {
		PropValue::Ref(value)
	}
}

/// Named props, kept in name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<String, PropValue>);

impl Props {
	/// Creates empty props.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a prop, builder style.
	pub fn with(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.insert(name, value);
		self
	}

	/// Inserts a prop, returning the previous value.
	pub fn insert(
		&mut self,
		name: impl Into<String>,
		value: impl Into<PropValue>,
	) -> Option<PropValue> {
		self.0.insert(name.into(), value.into())
	}

	/// Removes a prop.
	pub fn remove(&mut self, name: &str) -> Option<PropValue> {
		self.0.remove(name)
	}

	/// Looks up a prop.
	pub fn get(&self, name: &str) -> Option<&PropValue> {
		self.0.get(name)
	}

	/// Looks up a string prop.
	pub fn get_str(&self, name: &str) -> Option<&str> {
		match self.0.get(name) {
			Some(PropValue::Str(s)) => Some(s),
			_ => None,
		}
	}

	/// Looks up an integer prop.
	pub fn get_int(&self, name: &str) -> Option<i64> {
		match self.0.get(name) {
			Some(PropValue::Int(n)) => Some(*n),
			_ => None,
		}
	}

	/// Looks up a boolean prop.
	pub fn get_bool(&self, name: &str) -> Option<bool> {
		match self.0.get(name) {
			Some(PropValue::Bool(b)) => Some(*b),
			_ => None,
		}
	}

	/// Returns the children passed to a component.
	pub fn children(&self) -> &[Child] {
		match self.0.get("children") {
			Some(PropValue::Children(children)) => children,
			_ => &[],
		}
	}

	/// Returns `true` if a prop is present.
	pub fn contains(&self, name: &str) -> bool {
		self.0.contains_key(name)
	}

	/// Iterates props in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Returns the number of props.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` if there are no props.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

/// Signature of a component render function.
pub type RenderFn = dyn Fn(&Scope, &Props) -> RenderResult<Child>;

/// A component: a named render function.
///
/// Two components are the same type when they wrap the same function item or
/// closure expression, so a component value can be rebuilt on every render
/// without remounting. Passing a coerced `fn` pointer erases that identity.
#[derive(Clone)]
pub struct Component {
	name: Cow<'static, str>,
	type_id: TypeId,
	render: Rc<RenderFn>,
}

impl Component {
	/// Wraps a render function.
	pub fn new<F>(name: impl Into<Cow<'static, str>>, render: F) -> Self
	where
		F: Fn(&Scope, &Props) -> RenderResult<Child> + 'static,
	{
		Self {
			name: name.into(),
			type_id: TypeId::of::<F>(),
			render: Rc::new(render),
		}
	}

	/// Returns the component name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Invokes the render function.
	pub(crate) fn call(&self, scope: &Scope, props: &Props) -> RenderResult<Child> {
		(self.render)(scope, props)
	}
}

impl PartialEq for Component {
	fn eq(&self, other: &Self) -> bool {
		self.type_id == other.type_id
	}
}

impl fmt::Debug for Component {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Component").field(&self.name).finish()
	}
}

/// The type of a [`VNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum NodeType {
	/// A native host element.
	Tag(Cow<'static, str>),
	/// A component invocation.
	Component(Component),
	/// Children grouped without a wrapping element.
	Fragment,
}

impl From<&'static str> for NodeType {
	fn from(value: &'static str) -> Self {
		NodeType::Tag(Cow::Borrowed(value))
	}
}

impl From<String> for NodeType {
	fn from(value: String) -> Self {
		NodeType::Tag(Cow::Owned(value))
	}
}

impl From<Component> for NodeType {
	fn from(value: Component) -> Self {
		NodeType::Component(value)
	}
}

/// A child of a node: a nested node or a primitive.
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
	/// A nested node.
	Node(VNode),
	/// Text.
	Text(Cow<'static, str>),
	/// An integer, rendered as text.
	Int(i64),
	/// A float, rendered as text.
	Float(f64),
	/// Renders nothing.
	Bool(bool),
	/// Renders nothing.
	Null,
	/// A nested list, rendered like a fragment.
	List(Vec<Child>),
}

impl Child {
	/// Returns the text a primitive renders as, `None` for nodes and for
	/// values that render nothing.
	pub fn text(&self) -> Option<Cow<'_, str>> {
		match self {
			Child::Text(s) => Some(Cow::Borrowed(s)),
			Child::Int(n) => Some(Cow::Owned(n.to_string())),
			Child::Float(x) => Some(Cow::Owned(x.to_string())),
			Child::Node(_) | Child::Bool(_) | Child::Null | Child::List(_) => None,
		}
	}

	/// Returns the key of a keyed node.
	pub fn key(&self) -> Option<&Key> {
		match self {
			Child::Node(node) => node.key.as_ref(),
			_ => None,
		}
	}

	/// Returns `true` if the child renders nothing.
	pub fn is_empty(&self) -> bool {
		matches!(self, Child::Null | Child::Bool(_))
	}
}

impl From<VNode> for Child {
	fn from(value: VNode) -> Self {
		Child::Node(value)
	}
}

impl From<&'static str> for Child {
	fn from(value: &'static str) -> Self {
		Child::Text(Cow::Borrowed(value))
	}
}

impl From<String> for Child {
	fn from(value: String) -> Self {
		Child::Text(Cow::Owned(value))
	}
}

impl From<i64> for Child {
	fn from(value: i64) -> Self {
		Child::Int(value)
	}
}

impl From<i32> for Child {
	fn from(value: i32) -> Self {
		Child::Int(value.into())
	}
}

impl From<usize> for Child {
	fn from(value: usize) -> Self {
		i64::try_from(value).map_or_else(|_| Child::Text(value.to_string().into()), Child::Int)
	}
}

impl From<f64> for Child {
	fn from(value: f64) -> Self {
		Child::Float(value)
	}
}

impl From<bool> for Child {
	fn from(value: bool) -> Self {
		Child::Bool(value)
	}
}

impl From<()> for Child {
	fn from((): ()) -> Self {
		Child::Null
	}
}

impl<T: Into<Child>> From<Option<T>> for Child {
	fn from(value: Option<T>) -> Self {
		value.map_or(Child::Null, Into::into)
	}
}

impl<T: Into<Child>> From<Vec<T>> for Child {
	fn from(value: Vec<T>) -> Self {
		Child::List(value.into_iter().map(Into::into).collect())
	}
}

/// A virtual node.
#[derive(Debug, Clone, PartialEq)]
pub struct VNode {
	/// What the node is.
	pub ty: NodeType,
	/// Props (attributes, handlers, refs; component inputs).
	pub props: Props,
	/// Children, with one level of nested lists flattened.
	pub children: Vec<Child>,
	/// Reconciliation key.
	pub key: Option<Key>,
}

/// Builds a [`VNode`].
///
/// One level of nested [`Child::List`] children is flattened into the
/// child sequence. A `key` prop is moved into [`VNode::key`].
///
/// ```
/// use ripple_core::{Child, NodeType, Props, create_element};
///
/// let list = create_element(
/// 	"ul",
/// 	Props::new().with("key", "menu"),
/// 	vec![Child::from(vec!["a", "b"]), Child::from("c")],
/// );
/// assert_eq!(list.children.len(), 3);
/// assert_eq!(list.key.unwrap().to_string(), "menu");
/// ```
pub fn create_element(
	ty: impl Into<NodeType>,
	mut props: Props,
	children: impl IntoIterator<Item = Child>,
) -> VNode {
	let key = match props.remove("key") {
		Some(PropValue::Str(s)) => Some(Key::from(s.as_ref())),
		Some(PropValue::Int(n)) => Some(Key::Int(n)),
		Some(other) => {
			props.insert("key", other);
			None
		}
		None => None,
	};
	VNode {
		ty: ty.into(),
		props,
		children: flatten_children(children),
		key,
	}
}

pub(crate) fn flatten_children(children: impl IntoIterator<Item = Child>) -> Vec<Child> {
	let mut out = Vec::new();
	for child in children {
		match child {
			Child::List(items) => out.extend(items),
			other => out.push(other),
		}
	}
	out
}

impl VNode {
	/// Creates an element node with no props or children.
	pub fn element(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			ty: NodeType::Tag(tag.into()),
			props: Props::new(),
			children: Vec::new(),
			key: None,
		}
	}

	/// Creates a component node.
	pub fn component(component: Component, props: Props) -> Self {
		create_element(component, props, Vec::new())
	}

	/// Creates a fragment node.
	pub fn fragment(children: impl IntoIterator<Item = impl Into<Child>>) -> Self {
		create_element(
			NodeType::Fragment,
			Props::new(),
			children.into_iter().map(Into::into),
		)
	}

	/// Sets a prop.
	pub fn attr(mut self, name: impl Into<String>, value: impl Into<PropValue>) -> Self {
		self.props.insert(name, value);
		self
	}

	/// Attaches an event handler under `on<event>`.
	pub fn on(mut self, event: &str, handler: impl Fn(&Event) + 'static) -> Self {
		self.props
			.insert(format!("on{event}"), EventHandler::new(handler));
		self
	}

	/// Attaches a node ref.
	pub fn node_ref(mut self, node_ref: NodeRef) -> Self {
		self.props.insert("ref", node_ref);
		self
	}

	/// Appends a child, flattening one level of lists.
	pub fn child(mut self, child: impl Into<Child>) -> Self {
		match child.into() {
			Child::List(items) => self.children.extend(items),
			other => self.children.push(other),
		}
		self
	}

	/// Appends several children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl Into<Child>>) -> Self {
		self.children
			.extend(flatten_children(children.into_iter().map(Into::into)));
		self
	}

	/// Sets the key.
	pub fn key(mut self, key: impl Into<Key>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Returns the props a component receives: its props plus its children
	/// under `children`.
	pub fn component_props(&self) -> Cow<'_, Props> {
		if self.children.is_empty() || self.props.contains("children") {
			return Cow::Borrowed(&self.props);
		}
		let mut props = self.props.clone();
		props.insert("children", PropValue::Children(self.children.clone()));
		Cow::Owned(props)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn noop(_: &Scope, _: &Props) -> RenderResult<Child> {
		Ok(Child::Null)
	}

	fn other(_: &Scope, _: &Props) -> RenderResult<Child> {
		Ok(Child::Null)
	}

	#[rstest]
	#[case(5, Key::Int(5))]
	#[case(usize::MAX, Key::Str(usize::MAX.to_string().into()))]
	fn test_usize_key_never_truncates(#[case] value: usize, #[case] expected: Key) {
		assert_eq!(Key::from(value), expected);
	}

	#[rstest]
	#[case(5, Child::Int(5))]
	#[case(usize::MAX, Child::from(usize::MAX.to_string()))]
	fn test_usize_child_never_truncates(#[case] value: usize, #[case] expected: Child) {
		let child = Child::from(value);
		assert_eq!(child, expected);
		assert_eq!(child.text().unwrap(), value.to_string());
	}

	#[rstest]
	fn test_create_element_flattens_one_level() {
		let nested = Child::List(vec![Child::List(vec!["deep".into()]), "a".into()]);
		let node = create_element("div", Props::new(), vec![nested, "b".into()]);

		assert_eq!(node.children.len(), 3);
		assert!(matches!(node.children[0], Child::List(_)));
		assert_eq!(node.children[1], Child::from("a"));
		assert_eq!(node.children[2], Child::from("b"));
	}

	#[rstest]
	#[case(PropValue::from("k"), Some(Key::from("k")))]
	#[case(PropValue::Int(7), Some(Key::Int(7)))]
	#[case(PropValue::Bool(true), None)]
	fn test_create_element_extracts_key(#[case] key: PropValue, #[case] expected: Option<Key>) {
		let node = create_element("li", Props::new().with("key", key), Vec::new());
		assert_eq!(node.key, expected);
		assert_eq!(node.props.contains("key"), expected.is_none());
	}

	#[rstest]
	fn test_component_identity_follows_function() {
		assert_eq!(Component::new("A", noop), Component::new("A2", noop));
		assert_ne!(Component::new("A", noop), Component::new("A", other));
	}

	#[rstest]
	fn test_event_handler_equality_is_identity() {
		let handler = EventHandler::new(|_| {});
		let same = handler.clone();
		let different = EventHandler::new(|_| {});
		assert_eq!(handler, same);
		assert_ne!(handler, different);
	}

	#[rstest]
	fn test_component_props_include_children() {
		let node = VNode::component(Component::new("Card", noop), Props::new().with("title", "t"))
			.child("body");
		let props = node.component_props();
		assert_eq!(props.get_str("title"), Some("t"));
		assert_eq!(props.children(), &[Child::from("body")]);
	}

	#[rstest]
	fn test_child_text() {
		assert_eq!(Child::from(42).text().as_deref(), Some("42"));
		assert_eq!(Child::from("x").text().as_deref(), Some("x"));
		assert_eq!(Child::Null.text(), None);
		assert_eq!(Child::from(false).text(), None);
		assert!(Child::from(None::<&str>).is_empty());
	}

	#[rstest]
	fn test_attribute_rendering() {
		assert_eq!(PropValue::from(true).as_attribute().as_deref(), Some(""));
		assert_eq!(PropValue::from(false).as_attribute(), None);
		assert_eq!(PropValue::from(3).as_attribute().as_deref(), Some("3"));
	}
}
