//! Reducer-driven state store.
//!
//! A [`Store`] owns one state value and changes it only by running dispatched
//! actions through its [`Reducer`]. Stores are cheap to clone; clones share
//! the same state. A fresh store is built for every render cycle.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

/// A pure state transition function.
///
/// Implementations must be deterministic: the same state and action always
/// produce the same next state, with no side effects.
///
/// # Example
///
/// ```
/// use isomorphic_pages::Reducer;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// struct Count(i64);
///
/// enum CountAction {
///     Add(i64),
/// }
///
/// struct CountReducer;
///
/// impl Reducer for CountReducer {
///     type State = Count;
///     type Action = CountAction;
///
///     fn initial_state(&self) -> Count {
///         Count::default()
///     }
///
///     fn reduce(&self, state: &Count, action: CountAction) -> Count {
///         match action {
///             CountAction::Add(n) => Count(state.0 + n),
///         }
///     }
/// }
/// ```
pub trait Reducer: Send + Sync + 'static {
	/// The state owned by a store built from this reducer.
	type State: Clone + Serialize + DeserializeOwned + Send + Sync + 'static;
	/// The actions this reducer understands.
	type Action: Send + 'static;

	/// The state a store starts from when it is not given one.
	fn initial_state(&self) -> Self::State;

	/// Computes the next state.
	fn reduce(&self, state: &Self::State, action: Self::Action) -> Self::State;
}

/// A [`Reducer`] backed by a closure, created with [`reducer_fn`].
pub struct ReducerFn<S, A, F> {
	f: F,
	_marker: PhantomData<fn(&S, A) -> S>,
}

/// Wraps a closure as a [`Reducer`] whose initial state is `S::default()`.
///
/// ```
/// use isomorphic_pages::{Reducer, reducer_fn};
///
/// let reducer = reducer_fn(|count: &i64, delta: i64| count + delta);
/// assert_eq!(reducer.reduce(&reducer.initial_state(), 3), 3);
/// ```
pub fn reducer_fn<S, A, F>(f: F) -> ReducerFn<S, A, F>
where
	F: Fn(&S, A) -> S + Send + Sync + 'static,
{
	ReducerFn {
		f,
		_marker: PhantomData,
	}
}

impl<S, A, F> Reducer for ReducerFn<S, A, F>
where
	S: Default + Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
	A: Send + 'static,
	F: Fn(&S, A) -> S + Send + Sync + 'static,
{
	type State = S;
	type Action = A;

	fn initial_state(&self) -> S {
		S::default()
	}

	fn reduce(&self, state: &S, action: A) -> S {
		(self.f)(state, action)
	}
}

type Listener<S> = Arc<dyn Fn(&S) + Send + Sync>;
type Listeners<S> = Mutex<Vec<(u64, Listener<S>)>>;

struct StoreInner<R: Reducer> {
	reducer: Arc<R>,
	state: RwLock<R::State>,
	listeners: Arc<Listeners<R::State>>,
	next_listener_id: AtomicU64,
}

/// The state container.
pub struct Store<R: Reducer> {
	inner: Arc<StoreInner<R>>,
}

impl<R: Reducer> Clone for Store<R> {
	fn clone(&self) -> Self {
		Self {
			inner: Arc::clone(&self.inner),
		}
	}
}

impl<R: Reducer> fmt::Debug for Store<R>
where
	R::State: fmt::Debug,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Store")
			.field("state", &*self.inner.state.read())
			.field("listener_count", &self.listener_count())
			.finish()
	}
}

impl<R: Reducer> Store<R> {
	/// Creates a store seeded with `initial_state`, or with the reducer's
	/// initial state when `None`.
	pub fn new(reducer: Arc<R>, initial_state: Option<R::State>) -> Self {
		let state = initial_state.unwrap_or_else(|| reducer.initial_state());
		Self {
			inner: Arc::new(StoreInner {
				reducer,
				state: RwLock::new(state),
				listeners: Arc::new(Mutex::new(Vec::new())),
				next_listener_id: AtomicU64::new(0),
			}),
		}
	}

	/// Applies `action` and returns the new state.
	///
	/// Listeners run after the state lock is released.
	pub fn dispatch(&self, action: R::Action) -> R::State {
		let next = {
			let mut state = self.inner.state.write();
			let next = self.inner.reducer.reduce(&state, action);
			*state = next.clone();
			next
		};

		let listeners: Vec<Listener<R::State>> = self
			.inner
			.listeners
			.lock()
			.iter()
			.map(|(_, listener)| Arc::clone(listener))
			.collect();
		for listener in listeners {
			listener(&next);
		}

		next
	}

	/// Returns a snapshot of the current state.
	pub fn state(&self) -> R::State {
		self.inner.state.read().clone()
	}

	/// Reads the current state without cloning it.
	pub fn with_state<T>(&self, f: impl FnOnce(&R::State) -> T) -> T {
		f(&self.inner.state.read())
	}

	/// Returns a dispatch handle bound to this store.
	pub fn dispatcher(&self) -> Dispatch<R> {
		Dispatch {
			store: self.clone(),
		}
	}

	/// Registers a listener that runs after every dispatch.
	pub fn subscribe<F>(&self, listener: F) -> Subscription<R::State>
	where
		F: Fn(&R::State) + Send + Sync + 'static,
	{
		let id = self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed);
		self.inner.listeners.lock().push((id, Arc::new(listener)));
		Subscription {
			id,
			listeners: Arc::downgrade(&self.inner.listeners),
		}
	}

	/// Returns the number of registered listeners.
	pub fn listener_count(&self) -> usize {
		self.inner.listeners.lock().len()
	}

	/// Returns the reducer driving this store.
	pub fn reducer(&self) -> &R {
		&self.inner.reducer
	}

	/// Creates a non-owning handle to this store.
	pub fn downgrade(&self) -> WeakStore<R> {
		WeakStore {
			inner: Arc::downgrade(&self.inner),
		}
	}
}

/// A non-owning reference to a [`Store`].
pub struct WeakStore<R: Reducer> {
	inner: Weak<StoreInner<R>>,
}

impl<R: Reducer> Clone for WeakStore<R> {
	fn clone(&self) -> Self {
		Self {
			inner: Weak::clone(&self.inner),
		}
	}
}

impl<R: Reducer> WeakStore<R> {
	/// Returns the store if it is still alive.
	pub fn upgrade(&self) -> Option<Store<R>> {
		self.inner.upgrade().map(|inner| Store { inner })
	}
}

/// A dispatch handle bound to one store.
///
/// Callers can dispatch through it without holding the store itself.
pub struct Dispatch<R: Reducer> {
	store: Store<R>,
}

impl<R: Reducer> Clone for Dispatch<R> {
	fn clone(&self) -> Self {
		Self {
			store: self.store.clone(),
		}
	}
}

impl<R: Reducer> fmt::Debug for Dispatch<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Dispatch").finish_non_exhaustive()
	}
}

impl<R: Reducer> Dispatch<R> {
	/// Dispatches `action` to the bound store and returns the new state.
	pub fn dispatch(&self, action: R::Action) -> R::State {
		self.store.dispatch(action)
	}
}

/// Handle returned by [`Store::subscribe`].
///
/// Dropping the handle keeps the listener registered.
pub struct Subscription<S> {
	id: u64,
	listeners: Weak<Listeners<S>>,
}

impl<S> fmt::Debug for Subscription<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Subscription").field("id", &self.id).finish()
	}
}

impl<S> Subscription<S> {
	/// Removes the listener. Returns `false` if it was already gone.
	pub fn unsubscribe(self) -> bool {
		let Some(listeners) = self.listeners.upgrade() else {
			return false;
		};
		let mut listeners = listeners.lock();
		let before = listeners.len();
		listeners.retain(|(id, _)| *id != self.id);
		listeners.len() != before
	}
}
