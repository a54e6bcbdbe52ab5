use sprig::{
	handler,
	hyper::{Body, Server},
	Handler, HttpRouter, ParamPolicy, Request, RequestExt, ResponseBuilder, RouterBuilder,
};
use tracing_subscriber::EnvFilter;

async fn index(_req: Request) -> anyhow::Result<sprig::hyper::Response<Body>> {
	Ok(ResponseBuilder::default().body(Body::from("hello"))?)
}

async fn show_params(req: Request) -> anyhow::Result<sprig::hyper::Response<Body>> {
	let params = req
		.params()
		.map(|params| serde_json::to_string(params))
		.transpose()?
		.unwrap_or_default();

	Ok(ResponseBuilder::default()
		.header("content-type", "application/json")
		.body(params.into())?)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sprig=debug")),
		)
		.init();

	let addr = ([127, 0, 0, 1], 3000).into();

	let builder = RouterBuilder::<Handler>::new()
		.param_policy(ParamPolicy::Strict)
		.method_not_allowed(true)
		.get("/", handler(index))
		.get("/path/{param:int}", handler(show_params))
		.get("/path/{param:int}/all/{otherparam:int}", handler(show_params))
		.post("/foo/{a:string}/bar/{b:bool}/baz", handler(show_params));

	let router = builder.build();
	println!("{}", serde_json::to_string_pretty(&router.snapshot())?);

	let server = Server::bind(&addr).serve(HttpRouter::from(router));
	println!("Listening on http://{}", addr);

	server.await?;
	Ok(())
}
