use thiserror::Error;

/// Errors raised while registering or resolving routes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
	/// No registered route matches the path.
	#[error("path is not registered: {0}")]
	RouteNotFound(String),

	/// The path matched a route, but not for this method.
	#[error("method {method} is not registered for path: {path}")]
	MethodNotRegistered {
		method: String,
		path: String,
		/// Methods the matched route does accept, sorted.
		allowed: Vec<String>,
	},

	/// Route patterns must be absolute.
	#[error("pattern must start with '/': {0:?}")]
	InvalidPattern(String),

	/// A segment looks like a placeholder but is not `{name:int|string|float|bool}`.
	#[error("malformed parameter segment {segment:?} in pattern {pattern:?}")]
	MalformedParameter { pattern: String, segment: String },
}

impl RouteError {
	/// Whether this error means "nothing to serve here", as opposed to a bad registration.
	pub fn is_not_found(&self) -> bool {
		matches!(
			self,
			RouteError::RouteNotFound(_) | RouteError::MethodNotRegistered { .. }
		)
	}
}

pub type Result<T, E = RouteError> = std::result::Result<T, E>;
