#![cfg(feature = "http")]

use sprig::{
	handler,
	hyper::{self, body, header::ALLOW, service::Service, Body, Method, StatusCode},
	Handler, HttpRouter, Request, RequestExt, RouterBuilder,
};

async fn echo(req: Request) -> anyhow::Result<hyper::Response<Body>> {
	let mut params: Vec<String> = req
		.params()
		.map(|params| {
			params
				.iter()
				.map(|p| format!("{}={}", p.name, p.value))
				.collect()
		})
		.unwrap_or_default();
	params.insert(0, req.uri().path().to_owned());
	Ok(hyper::Response::new(params.join(" ").into()))
}

async fn named(name: &'static str, req: Request) -> anyhow::Result<hyper::Response<Body>> {
	let param = req.param("param").unwrap_or("-").to_owned();
	Ok(hyper::Response::new(format!("{} {}", name, param).into()))
}

async fn greet(req: Request) -> anyhow::Result<hyper::Response<Body>> {
	let name = req.param("name").unwrap_or("-").to_owned();
	Ok(hyper::Response::new(name.into()))
}

async fn failing(_req: Request) -> anyhow::Result<hyper::Response<Body>> {
	anyhow::bail!("boom")
}

fn scenario() -> RouterBuilder<Handler> {
	RouterBuilder::<Handler>::new()
		.get("/", handler(|req| named("index", req)))
		.get("/path/{param:int}/all", handler(|req| named("all", req)))
		.get("/path/{param:int}/all/{otherparam:int}", handler(echo))
		.get("/path/{param:int}", handler(|req| named("param", req)))
		.post("/path", handler(|req| named("create", req)))
		.get("/fail", handler(failing))
}

async fn send(router: &HttpRouter, method: Method, uri: &str) -> (StatusCode, String) {
	let req = hyper::Request::builder()
		.method(method)
		.uri(uri)
		.body(Body::empty())
		.unwrap();

	let response = router.route_handler().call(req).await.unwrap();
	let status = response.status();
	let bytes = body::to_bytes(response.into_body()).await.unwrap();
	(status, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn dispatches_to_distinct_handlers() {
	let router = HttpRouter::from(scenario().build());

	assert_eq!(
		send(&router, Method::GET, "/").await,
		(StatusCode::OK, "index -".to_owned())
	);
	assert_eq!(
		send(&router, Method::POST, "/path").await,
		(StatusCode::OK, "create -".to_owned())
	);
	assert_eq!(
		send(&router, Method::GET, "/path/3").await,
		(StatusCode::OK, "param 3".to_owned())
	);
	assert_eq!(
		send(&router, Method::GET, "/path/3/all").await,
		(StatusCode::OK, "all 3".to_owned())
	);
	assert_eq!(
		send(&router, Method::GET, "/path/3/all/5?verbose=1").await,
		(
			StatusCode::OK,
			"/path/3/all/5 param=3 otherparam=5".to_owned()
		)
	);
}

#[tokio::test]
async fn routes_on_the_decoded_path() {
	let router = HttpRouter::from(
		RouterBuilder::<Handler>::new()
			.get("/users/{name:string}", handler(greet))
			.get("/café", handler(|req| named("cafe", req)))
			.build(),
	);

	assert_eq!(
		send(&router, Method::GET, "/users/john%20doe").await,
		(StatusCode::OK, "john doe".to_owned())
	);
	assert_eq!(
		send(&router, Method::GET, "/caf%C3%A9").await,
		(StatusCode::OK, "cafe -".to_owned())
	);

	// %FF does not decode to UTF-8
	let (status, _) = send(&router, Method::GET, "/users/%FF").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unroutable_requests_are_not_found() {
	let router = HttpRouter::from(scenario().build());

	let (status, body) = send(&router, Method::GET, "/missing").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
	assert!(body.is_empty());

	// the path exists, but only for POST
	let (status, _) = send(&router, Method::GET, "/path").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn method_not_allowed_when_enabled() {
	let router = HttpRouter::from(scenario().method_not_allowed(true).build());

	let req = hyper::Request::builder()
		.method(Method::DELETE)
		.uri("/path")
		.body(Body::empty())
		.unwrap();
	let response = router.route_handler().call(req).await.unwrap();

	assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
	assert_eq!(response.headers().get(ALLOW).unwrap(), "POST");

	let (status, _) = send(&router, Method::GET, "/missing").await;
	assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn handler_errors_become_internal_errors() {
	let router = HttpRouter::from(scenario().build());

	assert_eq!(
		send(&router, Method::GET, "/fail").await,
		(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_owned())
	);
}

#[tokio::test]
async fn custom_fallback_handlers() {
	let router = HttpRouter::from(scenario().build())
		.not_found_handler(|_req| {
			let mut response = hyper::Response::new(Body::from("nothing here"));
			*response.status_mut() = StatusCode::GONE;
			response
		})
		.internal_error_handler(|e| hyper::Response::new(Body::from(format!("handled: {}", e))));

	assert_eq!(
		send(&router, Method::GET, "/missing").await,
		(StatusCode::GONE, "nothing here".to_owned())
	);
	assert_eq!(
		send(&router, Method::GET, "/fail").await,
		(StatusCode::OK, "handled: boom".to_owned())
	);
}

#[tokio::test]
async fn connections_share_the_route_table() {
	let mut router = HttpRouter::from(scenario().build());

	let mut first = router.call(()).await.unwrap();
	let mut second = router.call(()).await.unwrap();

	for (service, uri) in vec![(&mut first, "/path/1"), (&mut second, "/path/2")] {
		let req = hyper::Request::get(uri).body(Body::empty()).unwrap();
		let response = service.call(req).await.unwrap();
		assert_eq!(response.status(), StatusCode::OK);
	}
}
