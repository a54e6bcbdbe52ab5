use crate::pattern::ParamType;
use serde::Serialize;
use std::collections::HashMap;

/// A single path parameter captured from a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Param {
	pub name: String,
	/// The type declared in the route pattern. Not checked against `value`.
	pub kind: ParamType,
	pub value: String,
}

/// Path parameters captured for one request, in pattern order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(Vec<Param>);

impl Params {
	pub(crate) fn new(params: Vec<Param>) -> Self {
		Self(params)
	}

	/// Value of the named parameter. If a pattern repeats a name, the last occurrence wins.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.find(name).map(|param| param.value.as_str())
	}

	/// Declared type of the named parameter.
	pub fn kind(&self, name: &str) -> Option<ParamType> {
		self.find(name).map(|param| param.kind)
	}

	fn find(&self, name: &str) -> Option<&Param> {
		self.0.iter().rev().find(|param| param.name == name)
	}

	pub fn iter(&self) -> impl Iterator<Item = &Param> {
		self.0.iter()
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Name to value mapping.
	pub fn to_map(&self) -> HashMap<String, String> {
		self.0
			.iter()
			.map(|param| (param.name.clone(), param.value.clone()))
			.collect()
	}
}

impl<'a> IntoIterator for &'a Params {
	type Item = &'a Param;
	type IntoIter = std::slice::Iter<'a, Param>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
