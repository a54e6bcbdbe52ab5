use crate::{Params, RouteError, Router};
use anyhow::{Error, Result};
use hyper::{
	body::Body,
	header::{HeaderValue, ALLOW},
	service::Service,
	StatusCode,
};
use percent_encoding::percent_decode_str;
use std::{
	convert::Infallible,
	fmt::{self, Debug, Formatter},
	future::{ready, Future, Ready},
	pin::Pin,
	sync::Arc,
	task::{Context, Poll},
};
use tracing::debug;

pub use hyper;

pub use hyper::http::response::Builder as ResponseBuilder;
pub type Request = hyper::Request<Body>;
pub type Response = Pin<Box<dyn Future<Output = Result<hyper::Response<Body>>> + Send>>;

/// A route handler. Path parameters are in the request extensions, see [`RequestExt`].
pub type Handler = Arc<dyn Fn(Request) -> Response + Send + Sync>;

/// Wraps an async function into a [`Handler`].
pub fn handler<F, Fut>(f: F) -> Handler
where
	F: Fn(Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<hyper::Response<Body>>> + Send + 'static,
{
	Arc::new(move |req| Box::pin(f(req)))
}

/// Access to the path parameters the router attached to a request.
pub trait RequestExt {
	/// Parameters of the matched route. Always present on requests passed to a handler.
	fn params(&self) -> Option<&Params>;

	/// Shorthand for one parameter value.
	fn param(&self, name: &str) -> Option<&str> {
		self.params().and_then(|params| params.get(name))
	}
}

impl<B> RequestExt for hyper::Request<B> {
	fn params(&self) -> Option<&Params> {
		self.extensions().get::<Params>()
	}
}

fn with_status(status: StatusCode, body: Body) -> hyper::Response<Body> {
	let mut response = hyper::Response::new(body);
	*response.status_mut() = status;
	response
}

fn default_error_handler(e: Error) -> hyper::Response<Body> {
	with_status(StatusCode::INTERNAL_SERVER_ERROR, e.to_string().into())
}

fn default_not_found_handler(_req: Request) -> hyper::Response<Body> {
	with_status(StatusCode::NOT_FOUND, Body::empty())
}

fn method_not_allowed(allowed: &[String]) -> hyper::Response<Body> {
	let mut response = with_status(StatusCode::METHOD_NOT_ALLOWED, Body::empty());
	if let Ok(value) = HeaderValue::from_str(&allowed.join(", ")) {
		response.headers_mut().insert(ALLOW, value);
	}
	response
}

/// A function that can convert an error into a response.
pub type ErrorHandler = fn(e: Error) -> hyper::Response<Body>;

/// A function that handles unroutable requests and creates a response.
pub type NotFoundHandler = fn(req: Request) -> hyper::Response<Body>;

type InnerHttpRouter = Router<Handler>;

/// Serves a [`Router`] of [`Handler`]s through hyper.
///
/// Pass it to `hyper::Server::serve`; every connection gets a [`RouteHandler`] sharing the same
/// route table.
pub struct HttpRouter {
	router: Arc<InnerHttpRouter>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl From<InnerHttpRouter> for HttpRouter {
	fn from(inner: InnerHttpRouter) -> Self {
		Self {
			router: Arc::new(inner),
			internal_error: default_error_handler,
			not_found: default_not_found_handler,
		}
	}
}

impl HttpRouter {
	/// Replaces the default `500` response for handler errors.
	pub fn internal_error_handler(mut self, handler: ErrorHandler) -> Self {
		self.internal_error = handler;
		self
	}

	/// Replaces the default `404` response for unroutable requests.
	pub fn not_found_handler(mut self, handler: NotFoundHandler) -> Self {
		self.not_found = handler;
		self
	}

	/// A request service, as hyper would get for a new connection.
	pub fn route_handler(&self) -> RouteHandler {
		RouteHandler {
			router: Arc::clone(&self.router),
			internal_error: self.internal_error,
			not_found: self.not_found,
		}
	}
}

impl Debug for HttpRouter {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("HttpRouter")
			.field("router", &self.router)
			.finish()
	}
}

impl<T> Service<T> for HttpRouter {
	type Response = RouteHandler;
	type Error = Infallible;
	type Future = Ready<Result<Self::Response, Self::Error>>;

	fn poll_ready(&mut self, _: &mut Context) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, _: T) -> Self::Future {
		ready(Ok(self.route_handler()))
	}
}

/// Responsible for handling the actual HTTP requests from hyper.
pub struct RouteHandler {
	router: Arc<InnerHttpRouter>,
	internal_error: ErrorHandler,
	not_found: NotFoundHandler,
}

impl Service<Request> for RouteHandler {
	type Response = hyper::Response<Body>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		Poll::Ready(Ok(()))
	}

	fn call(&mut self, mut req: Request) -> Self::Future {
		// Routes are matched, and parameters captured, on the decoded path.
		let decoded = percent_decode_str(req.uri().path())
			.decode_utf8()
			.map(|path| path.into_owned());
		let path = match decoded {
			Ok(path) => path,
			Err(e) => {
				debug!(path = req.uri().path(), error = %e, "request path is not valid UTF-8");
				let response = (self.not_found)(req);
				return Box::pin(async { Ok(response) });
			}
		};
		let resolved = self.router.resolve(req.method().as_str(), &path);

		match resolved {
			Ok(resolved) => {
				let route = Arc::clone(resolved.handler);
				req.extensions_mut().insert(resolved.params);

				let fut = route(req);
				let err = self.internal_error;
				Box::pin(async move { Ok(fut.await.unwrap_or_else(err)) })
			}
			Err(RouteError::MethodNotRegistered { allowed, .. })
				if self.router.method_not_allowed() =>
			{
				debug!(method = %req.method(), path = req.uri().path(), "method not allowed");
				let response = method_not_allowed(&allowed);
				Box::pin(async { Ok(response) })
			}
			Err(e) => {
				debug!(method = %req.method(), error = %e, "no route for request");
				let response = (self.not_found)(req);
				Box::pin(async { Ok(response) })
			}
		}
	}
}
