use crate::{
	error::{Result, RouteError},
	params::Params,
	pattern::ParamPolicy,
	tree::{NodeSnapshot, Tree},
};
use std::fmt::{self, Debug, Formatter};
use tracing::trace;

/// Collects routes before serving begins.
///
/// Registration needs exclusive access to the tree; calling [`build`](RouterBuilder::build)
/// freezes it into a [`Router`], which only ever reads.
pub struct RouterBuilder<H> {
	tree: Tree<H>,
	method_not_allowed: bool,
}

impl<H> Default for RouterBuilder<H> {
	fn default() -> Self {
		Self {
			tree: Tree::default(),
			method_not_allowed: false,
		}
	}
}

impl<H> Debug for RouterBuilder<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("RouterBuilder")
			.field("nodes", &self.tree.len())
			.field("param_policy", &self.tree.policy())
			.field("method_not_allowed", &self.method_not_allowed)
			.finish()
	}
}

impl<H> RouterBuilder<H> {
	pub fn new() -> Self {
		Self::default()
	}

	/// How malformed placeholders are handled in routes registered after this call.
	pub fn param_policy(mut self, policy: ParamPolicy) -> Self {
		self.tree.set_policy(policy);
		self
	}

	/// Report a path that exists without a handler for the request method as
	/// [`RouteError::MethodNotRegistered`] to the transport, so it can answer 405. Off by
	/// default, in which case both cases are plain "not found".
	pub fn method_not_allowed(mut self, enabled: bool) -> Self {
		self.method_not_allowed = enabled;
		self
	}

	pub fn try_register(mut self, method: &str, path: &str, handler: H) -> Result<Self> {
		self.tree.insert(path, method, handler)?;
		Ok(self)
	}

	/// Registers a route.
	///
	/// # Panics
	///
	/// Routes are registered during startup, so an invalid pattern is fatal. Use
	/// [`try_register`](RouterBuilder::try_register) to handle the error instead.
	pub fn register(self, method: &str, path: &str, handler: H) -> Self {
		match self.try_register(method, path, handler) {
			Ok(builder) => builder,
			Err(e) => panic!("failed to register {} {}: {}", method, path, e),
		}
	}

	pub fn get(self, path: &str, handler: H) -> Self {
		self.register("GET", path, handler)
	}

	pub fn post(self, path: &str, handler: H) -> Self {
		self.register("POST", path, handler)
	}

	pub fn put(self, path: &str, handler: H) -> Self {
		self.register("PUT", path, handler)
	}

	pub fn delete(self, path: &str, handler: H) -> Self {
		self.register("DELETE", path, handler)
	}

	pub fn patch(self, path: &str, handler: H) -> Self {
		self.register("PATCH", path, handler)
	}

	pub fn build(self) -> Router<H> {
		Router {
			tree: self.tree,
			method_not_allowed: self.method_not_allowed,
		}
	}
}

/// A handler chosen for a request, with the path parameters it should see.
#[derive(Debug)]
pub struct Resolved<'r, H> {
	pub handler: &'r H,
	pub params: Params,
	/// The pattern the handler was registered under.
	pub pattern: &'r str,
}

/// An immutable route table, safe to share between any number of concurrent lookups.
pub struct Router<H> {
	tree: Tree<H>,
	method_not_allowed: bool,
}

impl<H> Debug for Router<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Router")
			.field("tree", &self.tree)
			.field("method_not_allowed", &self.method_not_allowed)
			.finish()
	}
}

impl<H> Router<H> {
	pub fn builder() -> RouterBuilder<H> {
		RouterBuilder::default()
	}

	pub fn method_not_allowed(&self) -> bool {
		self.method_not_allowed
	}

	/// Picks the handler for `method` on `path` and extracts its parameters.
	pub fn resolve(&self, method: &str, path: &str) -> Result<Resolved<'_, H>> {
		let found = self.tree.search(path)?;

		match found.handler(method) {
			Some(handler) => {
				trace!(method, path, pattern = found.pattern(), "resolved route");
				Ok(Resolved {
					handler,
					params: found.params(),
					pattern: found.pattern(),
				})
			}
			None => Err(RouteError::MethodNotRegistered {
				method: method.to_owned(),
				path: path.to_owned(),
				allowed: found.methods().map(str::to_owned).collect(),
			}),
		}
	}

	/// A serializable dump of the route tree, for diagnostics.
	pub fn snapshot(&self) -> NodeSnapshot {
		self.tree.snapshot()
	}
}
