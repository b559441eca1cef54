//! Stack of focused views with click-driven narrowing, growing and undo.

use log::debug;

use super::error::NavigationError;
use super::store::{ElementId, Elements, GraphStore};

/// How a view came to be.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewOrigin {
	/// Snapshot of the whole graph.
	AllElements,
	/// An explicit selection, usually a clicked neighborhood.
	Selection,
	/// The previous view grown by a delta.
	Union,
	/// The previous view minus a delta, closed over edge endpoints.
	Difference,
}

/// One entry of the focus stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
	origin: ViewOrigin,
	elements: Elements,
}

impl View {
	/// How this view was produced.
	pub fn origin(&self) -> ViewOrigin {
		self.origin
	}

	/// The elements in focus.
	pub fn elements(&self) -> &Elements {
		&self.elements
	}
}

/// Split of the graph into what the current view shows and everything else.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Emphasis {
	/// Elements of the current view that exist in the graph.
	pub focused: Elements,
	/// The rest of the graph.
	pub dimmed: Elements,
}

impl Emphasis {
	/// Emphasis for `view` over the current contents of `store`.
	pub fn of(store: &GraphStore, view: &View) -> Self {
		let focused: Elements = view
			.elements
			.iter()
			.filter(|id| store.contains(id))
			.cloned()
			.collect();
		let dimmed = store.complement(&focused);
		Self { focused, dimmed }
	}
}

/// Receives the new current view after every change of focus.
pub trait ViewRefresh {
	/// Redraw for `view`; called after every push and every effective pop.
	fn refresh(&mut self, store: &GraphStore, view: &View);
}

/// Keeps the most recent [`Emphasis`] until someone takes it.
#[derive(Clone, Debug, Default)]
pub struct PendingEmphasis(Option<Emphasis>);

impl PendingEmphasis {
	/// Take the latest emphasis, if a refresh happened since the last take.
	pub fn take(&mut self) -> Option<Emphasis> {
		self.0.take()
	}
}

impl ViewRefresh for PendingEmphasis {
	fn refresh(&mut self, store: &GraphStore, view: &View) {
		self.0 = Some(Emphasis::of(store, view));
	}
}

/// Navigates a graph by pushing views onto a stack.
///
/// The bottom of the stack is a whole-graph snapshot and is never popped.
/// `n`-arguments are neighborhood radii: `n == 1` is the seed itself,
/// each further step adds one hop.
pub struct FocusNavigator<R> {
	stack: Vec<View>,
	refresh: R,
}

impl<R: ViewRefresh> FocusNavigator<R> {
	/// A navigator whose base view is the whole of `store`.
	pub fn new(store: &GraphStore, refresh: R) -> Self {
		let mut nav = Self::unattached(refresh);
		nav.reset(store);
		nav
	}

	/// A navigator with no base view; every operation but [`reset`](Self::reset)
	/// fails until one is seeded.
	pub fn unattached(refresh: R) -> Self {
		Self {
			stack: Vec::new(),
			refresh,
		}
	}

	/// Drop all history and seed a fresh whole-graph base view.
	pub fn reset(&mut self, store: &GraphStore) {
		self.stack.clear();
		self.push(store, ViewOrigin::AllElements, store.all_elements());
	}

	/// The refresh observer.
	pub fn refresher(&self) -> &R {
		&self.refresh
	}

	/// Mutable access to the refresh observer.
	pub fn refresher_mut(&mut self) -> &mut R {
		&mut self.refresh
	}

	/// Number of views on the stack.
	pub fn depth(&self) -> usize {
		self.stack.len()
	}

	/// The view on top of the stack.
	pub fn current(&self) -> Result<&View, NavigationError> {
		self.stack.last().ok_or(NavigationError::NoBaseView)
	}

	/// Push `elements` as the new current view.
	pub fn select(&mut self, store: &GraphStore, elements: Elements) -> Result<&View, NavigationError> {
		self.current()?;
		Ok(self.push(store, ViewOrigin::Selection, elements))
	}

	/// Push a fresh snapshot of the whole graph.
	pub fn clear(&mut self, store: &GraphStore) -> Result<&View, NavigationError> {
		self.current()?;
		Ok(self.push(store, ViewOrigin::AllElements, store.all_elements()))
	}

	/// Push the current view grown by `delta`.
	pub fn add_elements(&mut self, store: &GraphStore, delta: &Elements) -> Result<&View, NavigationError> {
		let grown = self.current()?.elements.union(delta);
		Ok(self.push(store, ViewOrigin::Union, grown))
	}

	/// Push the current view minus `delta`.
	///
	/// Edges that survive keep both endpoints, even endpoints named in `delta`.
	pub fn subtract_elements(&mut self, store: &GraphStore, delta: &Elements) -> Result<&View, NavigationError> {
		let mut remainder = self.current()?.elements.difference(delta);
		let endpoints: Vec<ElementId> = remainder
			.edges()
			.filter_map(|edge| store.endpoints(edge))
			.flat_map(|(source, target)| [ElementId::node(source), ElementId::node(target)])
			.collect();
		remainder.extend(endpoints);
		Ok(self.push(store, ViewOrigin::Difference, remainder))
	}

	/// Return to the previous view. A stack holding only the base view is left
	/// as it is; the result says whether a view was popped.
	pub fn back(&mut self, store: &GraphStore) -> Result<bool, NavigationError> {
		self.current()?;
		if self.stack.len() == 1 {
			return Ok(false);
		}
		self.stack.pop();
		if let Some(view) = self.stack.last() {
			self.refresh.refresh(store, view);
		}
		debug!("focus back to depth {}", self.stack.len());
		Ok(true)
	}

	/// Everything within `n - 1` hops of `seed`, including `seed`.
	pub fn neighborhood(&self, store: &GraphStore, seed: &Elements, n: usize) -> Result<Elements, NavigationError> {
		if n == 0 {
			return Err(NavigationError::InvalidRadius(n));
		}
		let mut hood = seed.clone();
		for _ in 1..n {
			let next = store.neighbors_of(&hood);
			if next.len() == hood.len() {
				break;
			}
			hood = next;
		}
		Ok(hood)
	}

	/// Focus on the `n`-neighborhood of `seed`, replacing the current focus.
	pub fn click(&mut self, store: &GraphStore, seed: &Elements, n: usize) -> Result<&View, NavigationError> {
		let hood = self.neighborhood(store, seed, n)?;
		self.select(store, hood)
	}

	/// Add the `n`-neighborhood of `seed` to the current focus.
	pub fn shift_click(&mut self, store: &GraphStore, seed: &Elements, n: usize) -> Result<&View, NavigationError> {
		let hood = self.neighborhood(store, seed, n)?;
		self.add_elements(store, &hood)
	}

	/// Remove the `n`-neighborhood of `seed` from the current focus.
	pub fn alt_click(&mut self, store: &GraphStore, seed: &Elements, n: usize) -> Result<&View, NavigationError> {
		let hood = self.neighborhood(store, seed, n)?;
		self.subtract_elements(store, &hood)
	}

	fn push(&mut self, store: &GraphStore, origin: ViewOrigin, elements: Elements) -> &View {
		debug!(
			"focus push {:?} with {} elements at depth {}",
			origin,
			elements.len(),
			self.stack.len() + 1
		);
		self.stack.push(View { origin, elements });
		let view = &self.stack[self.stack.len() - 1];
		self.refresh.refresh(store, view);
		view
	}
}
