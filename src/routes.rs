//! HTTP surface of the relay: the three handshake routes and their state.
//!
//! The flow walks `Idle -> AwaitingAuthorization -> AwaitingCallback ->
//! Completed`, with `Denied` or an error page possible at any point. `/start`
//! obtains the request token and registers it as pending, the provider sends
//! the user back to `/callback`, and the handler exchanges the verifier,
//! persists the grant, and retires the pending entry.

// crates.io
use axum::{
	Router,
	extract::{Query, State},
	http::StatusCode,
	response::{Html, IntoResponse, Response},
	routing::get,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
// self
use crate::{
	_prelude::*,
	error::TransportError,
	handshake::HandshakeClient,
	pages,
	pending::PendingStore,
	store::{GrantStore, StoreError},
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
	/// Signed-exchange client for the provider endpoints.
	pub client: Arc<HandshakeClient>,
	/// Pending request-token registry, scoped to the server's lifetime.
	pub pending: Arc<PendingStore>,
	/// Persistence for completed access grants.
	pub grants: Arc<dyn GrantStore>,
	/// External callback URL announced to the provider.
	pub callback_url: Url,
}
impl AppState {
	/// Creates state with a fresh, empty pending registry.
	pub fn new(client: Arc<HandshakeClient>, grants: Arc<dyn GrantStore>, callback_url: Url) -> Self {
		Self { client, pending: Arc::new(PendingStore::default()), grants, callback_url }
	}
}
impl Debug for AppState {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("AppState")
			.field("callback_url", &self.callback_url)
			.field("pending", &self.pending.len())
			.finish()
	}
}

/// Builds the relay router over `state`.
pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/", get(index))
		.route("/start", get(start))
		.route("/callback", get(callback))
		.layer(TraceLayer::new_for_http())
		.with_state(state)
}

/// Binds `addr` and serves the relay until the task is stopped.
pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> Result<()> {
	let listener = TcpListener::bind(addr).await.map_err(TransportError::from)?;

	tracing::info!(%addr, "relay listening");

	axum::serve(listener, router(state)).await.map_err(TransportError::from)?;

	Ok(())
}

/// Query parameters delivered by the provider's callback redirect.
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
	/// Request token being completed.
	pub oauth_token: Option<String>,
	/// One-time verifier issued after user approval.
	pub oauth_verifier: Option<String>,
	/// Set (to the request token) when the user declined authorization.
	pub denied: Option<String>,
}

async fn index() -> Html<String> {
	Html(pages::index())
}

async fn start(State(state): State<AppState>) -> Result<Html<String>, ErrorPage> {
	let request_token = state.client.request_token(&state.callback_url).await?;
	let authorize_url = state.client.descriptor().authorize_url(&request_token.token);

	tracing::info!(token = %request_token.token, "request token issued");
	state.pending.insert(request_token.token, request_token.secret);

	Ok(Html(pages::start(&authorize_url)))
}

async fn callback(
	State(state): State<AppState>,
	Query(params): Query<CallbackParams>,
) -> Result<Html<String>, ErrorPage> {
	if let Some(denied) = params.denied {
		if state.pending.remove(&denied).is_some() {
			tracing::info!(token = %denied, "pending request token discarded after denial");
		}

		return Err(Error::Denied.into());
	}

	let token = params.oauth_token.ok_or(Error::MissingParameter { name: "oauth_token" })?;
	let verifier =
		params.oauth_verifier.ok_or(Error::MissingParameter { name: "oauth_verifier" })?;
	// Anti-forgery guard: only tokens this process issued may complete.
	let secret = state.pending.secret_of(&token).ok_or(Error::TokenNotFound)?;
	let grant = state.client.access_token(&token, &secret, &verifier).await?;

	state.grants.save(&grant)?;
	// Retire the entry only after exchange + save, so a transient failure
	// leaves the handshake retryable while a replay hits TokenNotFound.
	state.pending.remove(&token);
	tracing::info!(
		screen_name = %grant.screen_name,
		user_id = %grant.user_id,
		"access grant persisted"
	);

	Ok(Html(pages::success(&grant)))
}

/// Handler error that renders as a user-facing HTML error page.
#[derive(Debug)]
pub struct ErrorPage(Error);
impl From<Error> for ErrorPage {
	fn from(e: Error) -> Self {
		Self(e)
	}
}
impl From<StoreError> for ErrorPage {
	fn from(e: StoreError) -> Self {
		Self(e.into())
	}
}
impl IntoResponse for ErrorPage {
	fn into_response(self) -> Response {
		let status = match &self.0 {
			Error::MissingParameter { .. } => StatusCode::BAD_REQUEST,
			Error::TokenNotFound | Error::Denied => StatusCode::FORBIDDEN,
			Error::Provider { .. } | Error::Parse { .. } | Error::Transport(_) =>
				StatusCode::BAD_GATEWAY,
			Error::Storage(_) | Error::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		let message = self.0.to_string();

		if status.is_server_error() {
			tracing::error!(status = %status, error = %message, "handshake failed");
		} else {
			tracing::warn!(status = %status, error = %message, "handshake rejected");
		}

		(status, Html(pages::error(&message))).into_response()
	}
}
