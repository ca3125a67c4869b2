//! Page trees and store-aware components.
//!
//! A [`Component`] turns the state of a [`Store`] into a [`Page`]. Components
//! never reach for a global store. They receive a [`StoreContext`] from the
//! [`StoreProvider`] at the root of the tree and pass it down to any child
//! component they render.

use crate::store::{Dispatch, Reducer, Store};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

/// Event kinds that page elements can listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
	/// Mouse click.
	Click,
	/// Value input.
	Input,
	/// Value commit.
	Change,
	/// Form submission.
	Submit,
}

impl EventType {
	/// Returns the DOM event name.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Click => "click",
			Self::Input => "input",
			Self::Change => "change",
			Self::Submit => "submit",
		}
	}
}

impl std::str::FromStr for EventType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"click" => Ok(Self::Click),
			"input" => Ok(Self::Input),
			"change" => Ok(Self::Change),
			"submit" => Ok(Self::Submit),
			other => Err(format!("Unknown event type: {}", other)),
		}
	}
}

/// An event delivered to a [`Callback`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
	/// The kind of event.
	pub event_type: EventType,
	/// The `id` attribute of the element the event fired on.
	pub target_id: Option<String>,
}

/// A cloneable event handler.
#[derive(Clone)]
pub struct Callback {
	inner: Arc<dyn Fn(&Event) + Send + Sync + 'static>,
}

impl Callback {
	/// Wraps `f` as a callback.
	pub fn new<F>(f: F) -> Self
	where
		F: Fn(&Event) + Send + Sync + 'static,
	{
		Self { inner: Arc::new(f) }
	}

	/// Invokes the callback.
	pub fn call(&self, event: &Event) {
		(self.inner)(event)
	}
}

impl fmt::Debug for Callback {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("Callback")
	}
}

/// A renderable tree.
#[derive(Debug, Clone)]
pub enum Page {
	/// An element.
	Element(PageElement),
	/// A text node.
	Text(Cow<'static, str>),
	/// Several siblings without a wrapper element.
	Fragment(Vec<Page>),
	/// Renders nothing.
	Empty,
}

impl Page {
	/// Creates a text node.
	pub fn text(text: impl Into<Cow<'static, str>>) -> Self {
		Self::Text(text.into())
	}

	/// Creates a fragment.
	pub fn fragment(children: impl IntoIterator<Item = impl IntoPage>) -> Self {
		Self::Fragment(children.into_iter().map(IntoPage::into_page).collect())
	}

	/// Creates an empty page.
	pub fn empty() -> Self {
		Self::Empty
	}

	/// Finds the first element whose `id` attribute equals `id`.
	pub fn find_by_id(&self, id: &str) -> Option<&PageElement> {
		match self {
			Self::Element(el) => {
				if el.get_attr("id") == Some(id) {
					return Some(el);
				}
				el.child_pages().iter().find_map(|child| child.find_by_id(id))
			}
			Self::Fragment(children) => children.iter().find_map(|child| child.find_by_id(id)),
			Self::Text(_) | Self::Empty => None,
		}
	}

	/// Concatenates every text node in the tree.
	pub fn text_content(&self) -> String {
		let mut out = String::new();
		self.collect_text(&mut out);
		out
	}

	fn collect_text(&self, out: &mut String) {
		match self {
			Self::Element(el) => el.child_pages().iter().for_each(|c| c.collect_text(out)),
			Self::Text(text) => out.push_str(text),
			Self::Fragment(children) => children.iter().for_each(|c| c.collect_text(out)),
			Self::Empty => {}
		}
	}
}

/// Elements serialized without children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
	"area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
	"wbr",
];

/// An element node.
#[derive(Debug, Clone)]
pub struct PageElement {
	tag: Cow<'static, str>,
	attrs: Vec<(Cow<'static, str>, Cow<'static, str>)>,
	children: Vec<Page>,
	event_handlers: Vec<(EventType, Callback)>,
}

impl PageElement {
	/// Creates an element with the given tag.
	pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
		Self {
			tag: tag.into(),
			attrs: Vec::new(),
			children: Vec::new(),
			event_handlers: Vec::new(),
		}
	}

	/// Sets an attribute, replacing any earlier value of the same name.
	pub fn attr(
		mut self,
		name: impl Into<Cow<'static, str>>,
		value: impl Into<Cow<'static, str>>,
	) -> Self {
		let name = name.into();
		let value = value.into();
		match self.attrs.iter_mut().find(|(n, _)| *n == name) {
			Some(slot) => slot.1 = value,
			None => self.attrs.push((name, value)),
		}
		self
	}

	/// Sets the `id` attribute.
	pub fn id(self, id: impl Into<Cow<'static, str>>) -> Self {
		self.attr("id", id)
	}

	/// Sets the `class` attribute.
	pub fn class(self, class: impl Into<Cow<'static, str>>) -> Self {
		self.attr("class", class)
	}

	/// Adds a child.
	pub fn child(mut self, child: impl IntoPage) -> Self {
		self.children.push(child.into_page());
		self
	}

	/// Adds several children.
	pub fn children(mut self, children: impl IntoIterator<Item = impl IntoPage>) -> Self {
		self.children
			.extend(children.into_iter().map(IntoPage::into_page));
		self
	}

	/// Adds an event handler.
	pub fn on<F>(mut self, event_type: EventType, handler: F) -> Self
	where
		F: Fn(&Event) + Send + Sync + 'static,
	{
		self.event_handlers.push((event_type, Callback::new(handler)));
		self
	}

	/// Adds an existing [`Callback`] as an event handler.
	pub fn on_callback(mut self, event_type: EventType, callback: Callback) -> Self {
		self.event_handlers.push((event_type, callback));
		self
	}

	/// Returns the tag name.
	pub fn tag_name(&self) -> &str {
		&self.tag
	}

	/// Returns the attributes in insertion order.
	pub fn attrs(&self) -> &[(Cow<'static, str>, Cow<'static, str>)] {
		&self.attrs
	}

	/// Returns the value of the first attribute named `name`.
	pub fn get_attr(&self, name: &str) -> Option<&str> {
		self.attrs
			.iter()
			.find(|(n, _)| n == name)
			.map(|(_, v)| v.as_ref())
	}

	/// Returns the children.
	pub fn child_pages(&self) -> &[Page] {
		&self.children
	}

	/// Returns whether the element has no closing tag.
	pub fn is_void(&self) -> bool {
		VOID_ELEMENTS
			.iter()
			.any(|tag| tag.eq_ignore_ascii_case(&self.tag))
	}

	/// Returns the event handlers.
	pub fn event_handlers(&self) -> &[(EventType, Callback)] {
		&self.event_handlers
	}

	/// Wraps the element in a [`Page`].
	pub fn into_page(self) -> Page {
		Page::Element(self)
	}
}

/// Conversion into a [`Page`].
pub trait IntoPage {
	/// Performs the conversion.
	fn into_page(self) -> Page;
}

impl IntoPage for Page {
	fn into_page(self) -> Page {
		self
	}
}

impl IntoPage for PageElement {
	fn into_page(self) -> Page {
		Page::Element(self)
	}
}

impl IntoPage for String {
	fn into_page(self) -> Page {
		Page::Text(Cow::Owned(self))
	}
}

impl IntoPage for &'static str {
	fn into_page(self) -> Page {
		Page::Text(Cow::Borrowed(self))
	}
}

impl IntoPage for Cow<'static, str> {
	fn into_page(self) -> Page {
		Page::Text(self)
	}
}

impl<T: IntoPage> IntoPage for Option<T> {
	fn into_page(self) -> Page {
		self.map_or(Page::Empty, IntoPage::into_page)
	}
}

impl<T: IntoPage> IntoPage for Vec<T> {
	fn into_page(self) -> Page {
		Page::fragment(self)
	}
}

/// Read access to a store, plus a way to dispatch to it, for one render.
pub struct StoreContext<R: Reducer> {
	store: Store<R>,
}

impl<R: Reducer> Clone for StoreContext<R> {
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
		}
	}
}

impl<R: Reducer> StoreContext<R> {
	/// Creates a context bound to `store`.
	pub fn new(store: Store<R>) -> Self {
		Self { store }
	}

	/// Returns a snapshot of the current state.
	pub fn state(&self) -> R::State {
		self.store.state()
	}

	/// Projects a value out of the current state.
	pub fn select<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
		self.store.with_state(f)
	}

	/// Returns a dispatch handle for event handlers.
	pub fn dispatcher(&self) -> Dispatch<R> {
		self.store.dispatcher()
	}

	/// Dispatches `action` right away.
	pub fn dispatch(&self, action: R::Action) -> R::State {
		self.store.dispatch(action)
	}
}

/// A view that renders from store state.
pub trait Component<R: Reducer>: Send + Sync + 'static {
	/// Renders the component.
	fn render(&self, cx: &StoreContext<R>) -> Page;

	/// Name used in logs.
	fn name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// A [`Component`] backed by a closure, created with [`component_fn`].
pub struct ComponentFn<F> {
	f: F,
}

/// Wraps a render closure as a [`Component`].
pub fn component_fn<R, F>(f: F) -> ComponentFn<F>
where
	R: Reducer,
	F: Fn(&StoreContext<R>) -> Page + Send + Sync + 'static,
{
	ComponentFn { f }
}

impl<R, F> Component<R> for ComponentFn<F>
where
	R: Reducer,
	F: Fn(&StoreContext<R>) -> Page + Send + Sync + 'static,
{
	fn render(&self, cx: &StoreContext<R>) -> Page {
		(self.f)(cx)
	}
}

/// The root of a component tree: binds a component to a store.
pub struct StoreProvider<R: Reducer> {
	store: Store<R>,
	component: Arc<dyn Component<R>>,
}

impl<R: Reducer> StoreProvider<R> {
	/// Binds `component` to `store`.
	pub fn new(store: Store<R>, component: Arc<dyn Component<R>>) -> Self {
		Self { store, component }
	}

	/// Returns the bound store.
	pub fn store(&self) -> &Store<R> {
		&self.store
	}

	/// Renders the component with a context for the bound store.
	pub fn render(&self) -> Page {
		let cx = StoreContext::new(self.store.clone());
		self.component.render(&cx)
	}
}
