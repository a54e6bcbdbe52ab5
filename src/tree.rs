use crate::{
	error::{Result, RouteError},
	params::{Param, Params},
	pattern::{normalize, ParamPolicy, ParamType, Pattern, Segment},
};
use serde::Serialize;
use std::{
	cmp,
	collections::BTreeMap,
	fmt::{self, Debug, Formatter},
};
use tracing::{debug, trace};

type NodeId = usize;

const ROOT: NodeId = 0;

/// How many parameters a route places in each gap between its literal segments.
///
/// Entry 0 counts the parameters before the first literal, entry `n` those after the `n`th. Two
/// routes ending on the same node are the same route exactly when their shapes are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Shape(Vec<usize>);

impl Shape {
	fn new() -> Self {
		Self(vec![0])
	}

	fn current_gap(&self) -> usize {
		self.0.last().copied().unwrap_or_default()
	}

	fn add_param(&mut self) -> usize {
		match self.0.last_mut() {
			Some(gap) => {
				*gap += 1;
				*gap
			}
			None => 0,
		}
	}

	fn add_literal(&mut self) {
		self.0.push(0);
	}
}

/// Terminal data of one registered route.
struct Endpoint<H> {
	pattern: String,
	params: Vec<(String, ParamType)>,
	handlers: BTreeMap<String, H>,
}

struct Node<H> {
	segment: String,
	children: BTreeMap<String, NodeId>,
	/// Longest run of parameters any route declared right after this node.
	param_capacity: usize,
	endpoints: BTreeMap<Shape, Endpoint<H>>,
}

impl<H> Node<H> {
	fn new(segment: impl Into<String>) -> Self {
		Self {
			segment: segment.into(),
			children: BTreeMap::new(),
			param_capacity: 0,
			endpoints: BTreeMap::new(),
		}
	}
}

/// A tree of path segments.
///
/// Nodes live in an arena and branch only on literal segments. Parameter placeholders never get a
/// node of their own: the node they follow records that it accepts parameters, and lookups skip
/// over request segments in those positions.
pub struct Tree<H> {
	nodes: Vec<Node<H>>,
	policy: ParamPolicy,
}

impl<H> Default for Tree<H> {
	fn default() -> Self {
		Self::new(ParamPolicy::default())
	}
}

impl<H> Debug for Tree<H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Tree")
			.field("nodes", &self.nodes.len())
			.field("policy", &self.policy)
			.finish()
	}
}

impl<H> Tree<H> {
	pub fn new(policy: ParamPolicy) -> Self {
		Self {
			nodes: vec![Node::new("/")],
			policy,
		}
	}

	pub fn policy(&self) -> ParamPolicy {
		self.policy
	}

	/// Changes how patterns registered from now on treat malformed placeholders.
	pub fn set_policy(&mut self, policy: ParamPolicy) {
		self.policy = policy;
	}

	/// Number of nodes, root included.
	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.len() == 1 && self.nodes[ROOT].endpoints.is_empty()
	}

	/// Registers `handler` for `method` on `path`.
	///
	/// Registering the same route and method again replaces the handler and the parameter names.
	pub fn insert(&mut self, path: &str, method: &str, handler: H) -> Result<&mut Self> {
		let pattern = Pattern::parse(path, self.policy)?;

		let mut node = ROOT;
		let mut shape = Shape::new();
		let mut params = Vec::with_capacity(pattern.param_count());

		for segment in pattern.segments() {
			match *segment {
				Segment::Param { name, kind } => {
					params.push((name.to_owned(), kind));
					let run = shape.add_param();
					let capacity = &mut self.nodes[node].param_capacity;
					*capacity = cmp::max(*capacity, run);
				}
				Segment::Literal(literal) => {
					node = self.child_or_insert(node, literal);
					shape.add_literal();
				}
			}
		}

		let endpoint = self.nodes[node]
			.endpoints
			.entry(shape)
			.or_insert_with(|| Endpoint {
				pattern: path.to_owned(),
				params: Vec::new(),
				handlers: BTreeMap::new(),
			});

		endpoint.pattern = path.to_owned();
		endpoint.params = params;
		if endpoint.handlers.insert(method.to_owned(), handler).is_some() {
			debug!(pattern = path, method, "replaced existing route handler");
		} else {
			debug!(pattern = path, method, "registered route");
		}

		Ok(self)
	}

	fn child_or_insert(&mut self, parent: NodeId, segment: &str) -> NodeId {
		if let Some(&child) = self.nodes[parent].children.get(segment) {
			return child;
		}

		let child = self.nodes.len();
		self.nodes.push(Node::new(segment));
		self.nodes[parent].children.insert(segment.to_owned(), child);
		child
	}

	/// Finds the route registered for `path`.
	///
	/// Each request segment is matched against the literal children of the current node first. Only
	/// when no literal child exists, and the node accepts a parameter at this position, is the
	/// segment taken as a parameter value. There is no backtracking.
	pub fn search<'t, 'p>(&'t self, path: &'p str) -> Result<Found<'t, 'p, H>> {
		let not_found = || RouteError::RouteNotFound(path.to_owned());
		let segments = normalize(path).ok_or_else(not_found)?;

		let mut node = &self.nodes[ROOT];
		let mut shape = Shape::new();
		let mut values = Vec::new();

		for segment in segments {
			if let Some(&child) = node.children.get(segment) {
				node = &self.nodes[child];
				shape.add_literal();
			} else if node.param_capacity > shape.current_gap() {
				values.push(segment);
				shape.add_param();
			} else {
				trace!(path, segment, "no route for segment");
				return Err(not_found());
			}
		}

		match node.endpoints.get(&shape) {
			Some(endpoint) => {
				trace!(path, pattern = endpoint.pattern.as_str(), "matched route");
				Ok(Found { endpoint, values })
			}
			None => {
				trace!(path, node = node.segment.as_str(), "no route ends here");
				Err(not_found())
			}
		}
	}

	/// A serializable view of the whole tree.
	pub fn snapshot(&self) -> NodeSnapshot {
		self.snapshot_node(ROOT)
	}

	fn snapshot_node(&self, id: NodeId) -> NodeSnapshot {
		let node = &self.nodes[id];
		NodeSnapshot {
			segment: node.segment.clone(),
			accepts_params: node.param_capacity,
			routes: node
				.endpoints
				.values()
				.map(|endpoint| RouteSnapshot {
					pattern: endpoint.pattern.clone(),
					params: endpoint
						.params
						.iter()
						.map(|(name, kind)| format!("{}:{}", name, kind))
						.collect(),
					methods: endpoint.handlers.keys().cloned().collect(),
				})
				.collect(),
			children: node
				.children
				.values()
				.map(|&child| self.snapshot_node(child))
				.collect(),
		}
	}
}

/// The route a path resolved to, together with the parameter values captured on the way.
pub struct Found<'t, 'p, H> {
	endpoint: &'t Endpoint<H>,
	values: Vec<&'p str>,
}

impl<'t, 'p, H> Found<'t, 'p, H> {
	/// The pattern as it was registered.
	pub fn pattern(&self) -> &'t str {
		&self.endpoint.pattern
	}

	pub fn handler(&self, method: &str) -> Option<&'t H> {
		self.endpoint.handlers.get(method)
	}

	/// Methods with a handler on this route, sorted.
	pub fn methods(&self) -> impl Iterator<Item = &'t str> {
		self.endpoint.handlers.keys().map(String::as_str)
	}

	/// Pairs the captured values with the parameter names of the route.
	pub fn params(&self) -> Params {
		Params::new(
			self.endpoint
				.params
				.iter()
				.zip(&self.values)
				.map(|((name, kind), value)| Param {
					name: name.clone(),
					kind: *kind,
					value: (*value).to_owned(),
				})
				.collect(),
		)
	}
}

impl<'t, 'p, H> Debug for Found<'t, 'p, H> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Found")
			.field("pattern", &self.endpoint.pattern)
			.field("values", &self.values)
			.finish()
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeSnapshot {
	pub segment: String,
	pub accepts_params: usize,
	pub routes: Vec<RouteSnapshot>,
	pub children: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSnapshot {
	pub pattern: String,
	pub params: Vec<String>,
	pub methods: Vec<String>,
}
