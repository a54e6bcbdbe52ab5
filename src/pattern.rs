use crate::error::{Result, RouteError};
use serde::Serialize;
use std::{fmt, str::FromStr};
use thiserror::Error;
use tracing::warn;

/// The declared type of a path parameter.
///
/// The tag is recorded at registration and handed to the handler alongside the raw value; the
/// router itself never checks that a value parses as the declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
	Int,
	String,
	Float,
	Bool,
}

impl ParamType {
	pub fn as_str(self) -> &'static str {
		match self {
			ParamType::Int => "int",
			ParamType::String => "string",
			ParamType::Float => "float",
			ParamType::Bool => "bool",
		}
	}
}

impl fmt::Display for ParamType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter type: {0:?}")]
pub struct UnknownParamType(pub String);

impl FromStr for ParamType {
	type Err = UnknownParamType;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"int" => Ok(ParamType::Int),
			"string" => Ok(ParamType::String),
			"float" => Ok(ParamType::Float),
			"bool" => Ok(ParamType::Bool),
			other => Err(UnknownParamType(other.to_owned())),
		}
	}
}

/// What to do with a segment that is wrapped in braces but is not a valid placeholder, such as
/// `{id:uuid}` or `{user_id:int}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamPolicy {
	/// Treat the segment as a literal and log a warning.
	Lenient,
	/// Refuse to register the pattern.
	Strict,
}

impl Default for ParamPolicy {
	fn default() -> Self {
		ParamPolicy::Lenient
	}
}

/// One classified component of a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Literal(&'a str),
	Param { name: &'a str, kind: ParamType },
}

impl<'a> Segment<'a> {
	/// Classifies a single token. Only the exact form `{name:type}` is a parameter.
	pub fn parse(token: &'a str) -> Self {
		match placeholder(token) {
			Some((name, kind)) => Segment::Param { name, kind },
			None => Segment::Literal(token),
		}
	}
}

fn placeholder(token: &str) -> Option<(&str, ParamType)> {
	let inner = token.strip_prefix('{')?.strip_suffix('}')?;
	let (name, kind) = inner.split_at(inner.find(':')?);
	let kind = kind[1..].parse().ok()?;

	if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphabetic()) {
		return None;
	}

	Some((name, kind))
}

fn looks_like_placeholder(token: &str) -> bool {
	token.len() >= 2 && token.starts_with('{') && token.ends_with('}')
}

/// Splits an absolute path into its segments.
///
/// Returns `None` for paths that don't start with `/`. The root path yields no segments; every
/// other component is kept verbatim, empty ones included (`/a/` is `["a", ""]`).
pub fn normalize(path: &str) -> Option<impl Iterator<Item = &str>> {
	let rest = path.strip_prefix('/')?;
	let mut segments = rest.split('/');
	if rest.is_empty() {
		segments.next();
	}
	Some(segments)
}

/// A route pattern split into classified segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern<'a> {
	text: &'a str,
	segments: Vec<Segment<'a>>,
}

impl<'a> Pattern<'a> {
	pub fn parse(text: &'a str, policy: ParamPolicy) -> Result<Self> {
		let tokens = normalize(text).ok_or_else(|| RouteError::InvalidPattern(text.to_owned()))?;

		let mut segments = Vec::new();
		for token in tokens {
			let segment = Segment::parse(token);
			if let Segment::Literal(literal) = segment {
				if looks_like_placeholder(literal) {
					match policy {
						ParamPolicy::Strict => {
							return Err(RouteError::MalformedParameter {
								pattern: text.to_owned(),
								segment: literal.to_owned(),
							})
						}
						ParamPolicy::Lenient => warn!(
							pattern = text,
							segment = literal,
							"malformed parameter placeholder, matching it literally"
						),
					}
				}
			}
			segments.push(segment);
		}

		Ok(Self { text, segments })
	}

	pub fn as_str(&self) -> &'a str {
		self.text
	}

	pub fn segments(&self) -> &[Segment<'a>] {
		&self.segments
	}

	/// Number of parameter placeholders in the pattern.
	pub fn param_count(&self) -> usize {
		self.segments
			.iter()
			.filter(|segment| matches!(segment, Segment::Param { .. }))
			.count()
	}
}
