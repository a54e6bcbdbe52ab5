//! A small segment-trie HTTP router with typed path parameters.
//!
//! ```
//! use sprig::{ParamType, RouterBuilder};
//!
//! let router = RouterBuilder::new()
//! 	.get("/", "index")
//! 	.get("/users/{id:int}", "user")
//! 	.get("/users/{id:int}/posts/{slug:string}", "post")
//! 	.post("/users", "create")
//! 	.build();
//!
//! let resolved = router.resolve("GET", "/users/7/posts/hello").unwrap();
//! assert_eq!(*resolved.handler, "post");
//! assert_eq!(resolved.params.get("id"), Some("7"));
//! assert_eq!(resolved.params.kind("slug"), Some(ParamType::String));
//!
//! assert!(router.resolve("GET", "/users").is_err());
//! ```
//!
//! Routes are slash-separated patterns. A segment written as `{name:type}`, with an alphabetic
//! name and one of the types `int`, `string`, `float` or `bool`, captures whatever the request
//! has in that position; every other segment must match exactly. The type is handed to the
//! handler with the captured string but is never checked.
//!
//! Matching is literal first: a request segment is only taken as a parameter value when the
//! route table has no literal segment of that name at that position. Registering the same
//! pattern and method twice keeps the last handler.
//!
//! With the `http` feature (on by default), [`HttpRouter`] serves a router of [`Handler`]s through
//! hyper and puts each request's [`Params`] into its extensions, where handlers read them with
//! [`RequestExt`].

#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::*;

mod error;
mod params;

/// Route pattern syntax.
pub mod pattern;

/// The path segment tree behind the router.
pub mod tree;

/// Route registration and lookup.
///
/// Use the RouterBuilder to register routes, then build a Router to serve them.
pub mod router;

pub use error::{Result, RouteError};
pub use params::{Param, Params};
pub use pattern::{ParamPolicy, ParamType};
pub use router::*;
