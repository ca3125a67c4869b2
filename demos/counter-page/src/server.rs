//! HTTP server for the counter page.
//!
//! Routes:
//!
//! - `GET /` renders the page
//! - `GET /api/` returns the page state as JSON
//! - `GET /static/<path>` serves the client bundle and other assets
//!
//! The `userName` and `counter` query parameters seed the page state on both
//! HTML and API routes.

use crate::cli::ServerSettings;
use crate::page::get_page_with;
use crate::reducer::{CounterReducer, set_counter, set_default_counter_set, set_user_name};
use crate::template;
use bytes::Bytes;
use http_body_util::Full;
use hyper::body::{Body, Incoming};
use hyper::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use isomorphic::prelude::{Dispatch, InitialHtmlOptions, PageRenderer, Setup};
use isomorphic::pages::SettingsError;
use serde::Deserialize;
use std::convert::Infallible;
use std::future::Future;
use std::path::{Component as PathComponent, Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::TcpListener;

const TEXT_HTML: &str = "text/html; charset=utf-8";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("Failed to load page settings: {0}")]
	Settings(#[from] SettingsError),
	#[error("Failed to bind {addr}: {source}")]
	Bind {
		addr: String,
		#[source]
		source: std::io::Error,
	},
	#[error("Server I/O error: {0}")]
	Io(#[from] std::io::Error),
}

/// Query parameters that seed the page state.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupParams {
	pub user_name: Option<String>,
	pub counter: Option<String>,
}

impl SetupParams {
	/// Parses the query string of a request. An unparseable query seeds nothing.
	pub fn from_query(query: Option<&str>) -> Self {
		let Some(query) = query else {
			return Self::default();
		};
		serde_urlencoded::from_str(query).unwrap_or_else(|err| {
			tracing::debug!(error = %err, query, "ignoring malformed query string");
			Self::default()
		})
	}

	/// The requested counter value, if it parses as an integer.
	pub fn counter_value(&self) -> Option<i64> {
		self.counter.as_deref()?.trim().parse().ok()
	}

	/// The setup that dispatches these parameters into a fresh store. An empty
	/// `userName` counts as no name.
	pub fn into_setup(self) -> Setup<CounterReducer> {
		Setup::sync(move |dispatch: &Dispatch<CounterReducer>| {
			if let Some(user_name) = self.user_name.as_ref().filter(|name| !name.is_empty()) {
				set_user_name(dispatch, user_name.clone());
			}
			if let Some(counter) = self.counter_value() {
				set_counter(dispatch, counter);
				set_default_counter_set(dispatch);
			}
			Ok::<_, Infallible>(())
		})
	}
}

/// Request handling for the counter page.
#[derive(Clone)]
pub struct PageService {
	renderer: PageRenderer<CounterReducer>,
	static_dir: Arc<PathBuf>,
}

impl PageService {
	pub fn new(renderer: PageRenderer<CounterReducer>, static_dir: impl Into<PathBuf>) -> Self {
		Self {
			renderer,
			static_dir: Arc::new(static_dir.into()),
		}
	}

	/// Routes a request and produces its response. Never fails: errors become
	/// error responses.
	pub async fn handle<B>(&self, req: Request<B>) -> Response<Full<Bytes>> {
		let (parts, _) = req.into_parts();
		match parts.method {
			Method::GET => self.route(&parts.uri).await,
			Method::HEAD => without_body(self.route(&parts.uri).await),
			_ => respond(
				StatusCode::METHOD_NOT_ALLOWED,
				TEXT_PLAIN,
				"Method not allowed",
			),
		}
	}

	async fn route(&self, uri: &hyper::Uri) -> Response<Full<Bytes>> {
		let path = uri.path();
		let params = SetupParams::from_query(uri.query());

		if path == "/" {
			self.page(params).await
		} else if path == "/api" || path == "/api/" {
			self.api(params).await
		} else if let Some(file) = path.strip_prefix("/static/") {
			self.static_file(file).await
		} else {
			respond(StatusCode::NOT_FOUND, TEXT_PLAIN, "Not found")
		}
	}

	async fn page(&self, params: SetupParams) -> Response<Full<Bytes>> {
		let options = InitialHtmlOptions::sync(template::render)
			.dispatch_setup_events(params.into_setup());

		match self.renderer.get_initial_html(options).await {
			Ok(html) => respond(StatusCode::OK, TEXT_HTML, html),
			Err(err) => {
				tracing::error!(error = %err, "page render failed");
				respond(StatusCode::INTERNAL_SERVER_ERROR, TEXT_PLAIN, err.to_string())
			}
		}
	}

	async fn api(&self, params: SetupParams) -> Response<Full<Bytes>> {
		let result = self
			.renderer
			.get_current_state(params.into_setup())
			.await
			.map_err(|err| err.to_string())
			.and_then(|state| serde_json::to_vec(&state).map_err(|err| err.to_string()));

		match result {
			Ok(body) => respond(StatusCode::OK, APPLICATION_JSON, body),
			Err(message) => {
				tracing::error!(error = %message, "state request failed");
				let body = serde_json::json!({ "error": { "message": message } });
				respond(
					StatusCode::INTERNAL_SERVER_ERROR,
					APPLICATION_JSON,
					body.to_string(),
				)
			}
		}
	}

	async fn static_file(&self, file: &str) -> Response<Full<Bytes>> {
		let Some(relative) = safe_relative_path(file) else {
			tracing::warn!(path = file, "rejected static path");
			return respond(StatusCode::NOT_FOUND, TEXT_PLAIN, "Not found");
		};

		let full_path = self.static_dir.join(&relative);
		match tokio::fs::read(&full_path).await {
			Ok(contents) => respond(StatusCode::OK, &content_type(&relative), contents),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				respond(StatusCode::NOT_FOUND, TEXT_PLAIN, "Not found")
			}
			Err(err) => {
				tracing::warn!(path = %full_path.display(), error = %err, "static file read failed");
				respond(StatusCode::NOT_FOUND, TEXT_PLAIN, "Not found")
			}
		}
	}
}

impl Service<Request<Incoming>> for PageService {
	type Response = Response<Full<Bytes>>;
	type Error = Infallible;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

	fn call(&self, req: Request<Incoming>) -> Self::Future {
		let service = self.clone();
		Box::pin(async move { Ok(service.handle(req).await) })
	}
}

fn respond(
	status: StatusCode,
	content_type: &str,
	body: impl Into<Bytes>,
) -> Response<Full<Bytes>> {
	let content_type = HeaderValue::from_str(content_type)
		.unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
	let mut response = Response::new(Full::new(body.into()));
	*response.status_mut() = status;
	response.headers_mut().insert(CONTENT_TYPE, content_type);
	response
}

/// Drops the body of a response to a `HEAD` request, keeping its length.
fn without_body(response: Response<Full<Bytes>>) -> Response<Full<Bytes>> {
	let length = response.body().size_hint().exact().unwrap_or(0);
	let (mut parts, _) = response.into_parts();
	parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
	Response::from_parts(parts, Full::new(Bytes::new()))
}

/// Returns `file` as a relative path, or `None` if it could leave the static
/// directory.
fn safe_relative_path(file: &str) -> Option<PathBuf> {
	if file.is_empty() || file.contains('\\') {
		return None;
	}
	let path = Path::new(file);
	path.components()
		.all(|component| matches!(component, PathComponent::Normal(_)))
		.then(|| path.to_path_buf())
}

/// Guesses the content type from the file extension. Text types are served
/// as UTF-8.
fn content_type(path: &Path) -> String {
	let mime = mime_guess::from_path(path).first_or_octet_stream();
	if mime.type_() == mime_guess::mime::TEXT {
		format!("{}; charset=utf-8", mime)
	} else {
		mime.to_string()
	}
}

/// Accepts connections on `listener` until `shutdown` resolves.
pub async fn serve(
	listener: TcpListener,
	service: PageService,
	shutdown: impl Future<Output = ()>,
) -> Result<(), ServerError> {
	tokio::pin!(shutdown);

	loop {
		tokio::select! {
			result = listener.accept() => {
				let (stream, peer) = result?;
				let service = service.clone();

				tokio::task::spawn(async move {
					let io = TokioIo::new(stream);
					if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
						tracing::warn!(%peer, error = %err, "connection error");
					}
				});
			}
			_ = &mut shutdown => {
				tracing::info!("shutdown signal received, stopping server");
				break;
			}
		}
	}

	Ok(())
}

/// Binds the configured address and serves until Ctrl-C.
pub async fn run(settings: ServerSettings) -> Result<(), ServerError> {
	let page_settings = settings.page_settings()?;
	let service = PageService::new(get_page_with(page_settings), settings.static_dir.clone());

	let addr = format!("{}:{}", settings.host, settings.port);
	let listener = TcpListener::bind(&addr)
		.await
		.map_err(|source| ServerError::Bind {
			addr: addr.clone(),
			source,
		})?;
	tracing::info!(address = %addr, static_dir = %settings.static_dir.display(), "listening");

	serve(listener, service, async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			tracing::warn!(error = %err, "failed to listen for shutdown signal");
			std::future::pending::<()>().await;
		}
	})
	.await
}
