// crates/opc-storage-testing/src/server.rs
// ============================================================================
// Module: Authenticating Test Double
// Description: Local HTTP stand-in for the provider's storage endpoint.
// Purpose: Answer the login path with a session cookie and delegate the rest.
// Dependencies: opc-storage-client, serde, serde_json, tiny_http, url
// ============================================================================

//! ## Overview
//! A [`StubServer`] listens on an ephemeral loopback port and routes every
//! request through a [`Router`]. Routes are checked in order and the first
//! match wins: [`Route::Intercept`] answers a fixed path with a fixed response
//! and [`Route::Delegate`] hands the request to a caller-supplied
//! [`RequestHandler`]. [`authenticating_server`] wires the login intercept in
//! front of the caller's handler.
//! Invariants:
//! - The accept loop runs on its own thread; each request runs on its own
//!   worker thread.
//! - [`StubServer::close`] is idempotent and runs on drop, so every exit path
//!   releases the listener.
//! - A handler that panics without answering leaves the request to be
//!   answered with status 500 by the HTTP layer. The first such panic is
//!   re-raised on the owning thread by [`StubServer::close`], so a failed
//!   assertion inside a handler fails the test that started the double.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::io::Cursor;
use std::net::SocketAddr;
use std::panic;
use std::sync::Arc;
use std::thread;
use std::thread::JoinHandle;

use opc_storage_client::AUTHENTICATE_PATH;
use serde::Serialize;
use tiny_http::Header;
use tiny_http::Request;
use tiny_http::Response;
use tiny_http::Server;
use url::Url;

use crate::env::Env;
use crate::env::OsEnv;
use crate::error::TestSupportError;
use crate::log::RequestLog;
use crate::log::RequestLogEvent;
use crate::log::request_log_from_env;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the session cookie issued on the login path.
pub const SESSION_COOKIE_NAME: &str = "testAuthCookie";
/// Placeholder value of the session cookie.
pub const SESSION_COOKIE_VALUE: &str = "cookie value";
/// Loopback bind address; port 0 lets the OS pick a free port.
const BIND_ADDR: &str = "127.0.0.1:0";

// ============================================================================
// SECTION: Responses
// ============================================================================

/// Response produced by a route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubResponse {
    /// HTTP status code.
    status: u16,
    /// Header name/value pairs in insertion order.
    headers: Vec<(String, String)>,
    /// Raw body bytes.
    body: Vec<u8>,
}

impl StubResponse {
    /// Creates a response with `status` and no headers or body.
    #[must_use]
    pub const fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Creates an empty `200 OK` response.
    #[must_use]
    pub const fn ok() -> Self {
        Self::empty(200)
    }

    /// Creates a JSON response.
    ///
    /// A value that cannot be serialized yields an empty `500` response.
    #[must_use]
    pub fn json(status: u16, value: &impl Serialize) -> Self {
        serde_json::to_vec(value).map_or_else(
            |_| Self::empty(500),
            |body| Self::empty(status).with_header("Content-Type", "application/json").with_body(body),
        )
    }

    /// Appends a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Replaces the body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the status code.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// Returns the first header named `name` (ASCII case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts into the wire response; malformed headers are skipped.
    fn into_response(self) -> Response<Cursor<Vec<u8>>> {
        let mut response = Response::from_data(self.body).with_status_code(self.status);
        for (name, value) in &self.headers {
            if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                response.add_header(header);
            }
        }
        response
    }
}

/// Builds the login response carrying the session cookie.
///
/// The status is left at the `200` default.
#[must_use]
pub fn session_cookie_response() -> StubResponse {
    StubResponse::ok().with_header("Set-Cookie", set_cookie_value(SESSION_COOKIE_NAME, SESSION_COOKIE_VALUE))
}

// ============================================================================
// SECTION: Handlers and Routing
// ============================================================================

/// Handler for requests not answered by an intercept route.
///
/// Handlers run concurrently on worker threads; any state they share must be
/// synchronized by the handler itself.
pub trait RequestHandler: Send + Sync {
    /// Produces the response for `request`. The body may be read once.
    fn handle(&self, request: &mut Request) -> StubResponse;
}

impl<F> RequestHandler for F
where
    F: Fn(&mut Request) -> StubResponse + Send + Sync,
{
    fn handle(&self, request: &mut Request) -> StubResponse {
        self(request)
    }
}

/// Returns a handler that answers every request with an empty `200`.
#[must_use]
pub fn noop_handler() -> impl RequestHandler {
    |_request: &mut Request| StubResponse::ok()
}

/// A single routing rule.
pub enum Route {
    /// Answers requests whose path equals `path` with a copy of `response`.
    Intercept {
        /// Exact request path (query string excluded).
        path: String,
        /// Response returned for every matching request.
        response: StubResponse,
    },
    /// Forwards every request to the handler.
    Delegate(Arc<dyn RequestHandler>),
}

impl Route {
    /// Returns true when this route answers requests for `path`.
    #[must_use]
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Intercept {
                path: intercept,
                ..
            } => intercept == path,
            Self::Delegate(_) => true,
        }
    }
}

/// Ordered routes; the first matching route answers.
#[derive(Default)]
pub struct Router {
    /// Routes in match order.
    routes: Vec<Route>,
}

impl Router {
    /// Creates a router without routes; every request gets `404`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the login-intercepting router used by [`authenticating_server`].
    #[must_use]
    pub fn authenticating(handler: impl RequestHandler + 'static) -> Self {
        Self::new().intercept(AUTHENTICATE_PATH, session_cookie_response()).delegate(handler)
    }

    /// Appends an intercept route.
    #[must_use]
    pub fn intercept(mut self, path: impl Into<String>, response: StubResponse) -> Self {
        self.routes.push(Route::Intercept {
            path: path.into(),
            response,
        });
        self
    }

    /// Appends a delegate route.
    #[must_use]
    pub fn delegate(mut self, handler: impl RequestHandler + 'static) -> Self {
        self.routes.push(Route::Delegate(Arc::new(handler)));
        self
    }

    /// Returns the routes in match order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Answers `request` with the first matching route.
    pub fn dispatch(&self, request: &mut Request) -> StubResponse {
        let path = request_path(request.url()).to_string();
        match self.routes.iter().find(|route| route.matches(&path)) {
            Some(Route::Intercept {
                response, ..
            }) => response.clone(),
            Some(Route::Delegate(handler)) => handler.handle(request),
            None => StubResponse::empty(404),
        }
    }
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Payload of a panic raised on a handler thread.
type PanicPayload = Box<dyn Any + Send + 'static>;

/// Running accept loop and the listener it drains.
struct Running {
    /// Listener shared with the accept loop.
    server: Arc<Server>,
    /// Accept loop thread; yields the first handler panic, if any.
    join: JoinHandle<Option<PanicPayload>>,
}

/// Local HTTP test double.
///
/// # Invariants
/// - Owned by the test that started it.
/// - Once closed, the listener is released and further closes do nothing.
pub struct StubServer {
    /// Bound loopback address.
    addr: SocketAddr,
    /// Base URL for the bound address.
    url: Url,
    /// Accept loop state; `None` once closed.
    running: Option<Running>,
}

impl StubServer {
    /// Binds a loopback listener and starts serving `router`.
    ///
    /// # Errors
    ///
    /// Returns [`TestSupportError::Bind`] when the listener or its thread
    /// cannot be started, [`TestSupportError::Address`] when the listener has
    /// no IP address, and [`TestSupportError::Endpoint`] when its URL does not
    /// parse. The listener is released before any error is returned.
    pub fn start(router: Router, log: Arc<dyn RequestLog>) -> Result<Self, TestSupportError> {
        let server = Server::http(BIND_ADDR).map_err(|err| TestSupportError::Bind(err.to_string()))?;
        let Some(addr) = server.server_addr().to_ip() else {
            drop(server);
            return Err(TestSupportError::Address("listener is not bound to an ip socket".to_string()));
        };
        let url = match Url::parse(&format!("http://{addr}")) {
            Ok(url) => url,
            Err(err) => {
                drop(server);
                return Err(err.into());
            }
        };

        let server = Arc::new(server);
        let router = Arc::new(router);
        let loop_server = Arc::clone(&server);
        let join = thread::Builder::new()
            .name(format!("stub-server-{}", addr.port()))
            .spawn(move || serve(&loop_server, &router, &log))
            .map_err(|err| TestSupportError::Bind(format!("accept thread spawn failed: {err}")))?;

        Ok(Self {
            addr,
            url,
            running: Some(Running {
                server,
                join,
            }),
        })
    }

    /// Returns the bound socket address.
    #[must_use]
    pub const fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the base URL (`http://<addr>/`).
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns true once [`StubServer::close`] has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.running.is_none()
    }

    /// Stops accepting, waits for in-flight requests, and releases the listener.
    ///
    /// Calling this more than once is a no-op.
    ///
    /// # Panics
    ///
    /// Re-raises the first panic of a request handler (for example a failed
    /// [`crate::body::decode_request_body`]) once the listener is released.
    /// Nothing is re-raised while the calling thread is already unwinding.
    pub fn close(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };
        running.server.unblock();
        let failure = running.join.join().unwrap_or_else(Some);
        drop(running.server);
        if let Some(payload) = failure {
            if !thread::panicking() {
                panic::resume_unwind(payload);
            }
        }
    }
}

impl Drop for StubServer {
    fn drop(&mut self) {
        self.close();
    }
}

/// Starts a double that intercepts the login path and delegates the rest.
///
/// Request logging follows the process environment (see
/// [`crate::log::DEBUG_LOG_ENV`]).
///
/// # Errors
///
/// Returns the errors of [`StubServer::start`].
pub fn authenticating_server(
    handler: impl RequestHandler + 'static,
) -> Result<StubServer, TestSupportError> {
    authenticating_server_with_env(handler, &OsEnv)
}

/// Starts an authenticating double whose logging flag is read from `env`.
///
/// # Errors
///
/// Returns the errors of [`StubServer::start`].
pub fn authenticating_server_with_env(
    handler: impl RequestHandler + 'static,
    env: &dyn Env,
) -> Result<StubServer, TestSupportError> {
    StubServer::start(Router::authenticating(handler), request_log_from_env(env))
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Accept loop; returns the first handler panic once the server is unblocked.
fn serve(
    server: &Server,
    router: &Arc<Router>,
    log: &Arc<dyn RequestLog>,
) -> Option<PanicPayload> {
    let mut workers: Vec<JoinHandle<()>> = Vec::new();
    let mut failure = None;
    for request in server.incoming_requests() {
        let router = Arc::clone(router);
        let log = Arc::clone(log);
        let (finished, pending): (Vec<_>, Vec<_>) =
            workers.into_iter().partition(JoinHandle::is_finished);
        workers = pending;
        for worker in finished {
            keep_first_panic(&mut failure, worker.join());
        }
        workers.push(thread::spawn(move || answer(&router, log.as_ref(), request)));
    }
    for worker in workers {
        keep_first_panic(&mut failure, worker.join());
    }
    failure
}

/// Records a worker's panic unless an earlier one is already held.
fn keep_first_panic(failure: &mut Option<PanicPayload>, outcome: thread::Result<()>) {
    if let Err(payload) = outcome {
        if failure.is_none() {
            *failure = Some(payload);
        }
    }
}

/// Logs, routes, and answers a single request.
fn answer(router: &Router, log: &dyn RequestLog, mut request: Request) {
    log.record(&RequestLogEvent::new(request.method().to_string(), request.url()));
    let response = router.dispatch(&mut request);
    let _ = request.respond(response.into_response());
}

/// Strips the query string from a request target.
fn request_path(target: &str) -> &str {
    target.split_once('?').map_or(target, |(path, _)| path)
}

/// Formats a `Set-Cookie` value, quoting values that contain spaces or commas.
fn set_cookie_value(name: &str, value: &str) -> String {
    if value.contains([' ', ',']) { format!("{name}=\"{value}\"") } else { format!("{name}={value}") }
}
