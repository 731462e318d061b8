//! Signed token exchanges against the provider's OAuth 1.0a endpoints.
//!
//! [`HandshakeClient`] owns the HTTP transport, consumer credentials, and
//! provider descriptor so the HTTP handlers only deal with the two handshake
//! operations: obtaining a temporary request token and exchanging it (plus the
//! user's verifier) for a long-lived access grant.

// crates.io
use reqwest::header::AUTHORIZATION;
use url::form_urlencoded;
// self
use crate::{
	_prelude::*,
	auth::{AccessGrant, Consumer, RequestToken, TokenSecret},
	error::TransportError,
	provider::ProviderDescriptor,
	sign::Signer,
};

const BODY_PREVIEW_LEN: usize = 256;

/// Client for the request-token and access-token exchanges.
#[derive(Clone, Debug)]
pub struct HandshakeClient {
	http: ReqwestClient,
	consumer: Consumer,
	descriptor: ProviderDescriptor,
}
impl HandshakeClient {
	/// Creates a client with a default reqwest transport.
	pub fn new(consumer: Consumer, descriptor: ProviderDescriptor) -> Self {
		Self::with_http_client(ReqwestClient::default(), consumer, descriptor)
	}

	/// Creates a client that reuses the caller-provided reqwest transport.
	pub fn with_http_client(
		http: ReqwestClient,
		consumer: Consumer,
		descriptor: ProviderDescriptor,
	) -> Self {
		Self { http, consumer, descriptor }
	}

	/// Provider descriptor this client talks to.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Requests a temporary credential, announcing `callback` as the return URL.
	pub async fn request_token(&self, callback: &Url) -> Result<RequestToken> {
		let body = self
			.post_signed(
				self.descriptor.endpoints.request_token.clone(),
				&[("oauth_callback", callback.as_str())],
				None,
			)
			.await?;

		parse_request_token(&body)
	}

	/// Exchanges an authorized request token and verifier for an access grant.
	pub async fn access_token(
		&self,
		token: &str,
		secret: &TokenSecret,
		verifier: &str,
	) -> Result<AccessGrant> {
		let body = self
			.post_signed(
				self.descriptor.endpoints.access_token.clone(),
				&[("oauth_verifier", verifier)],
				Some((token, secret)),
			)
			.await?;

		parse_access_grant(&body)
	}

	async fn post_signed(
		&self,
		endpoint: Url,
		extra: &[(&str, &str)],
		token: Option<(&str, &TokenSecret)>,
	) -> Result<String> {
		let mut signer = Signer::new(&self.consumer);

		if let Some((token, secret)) = token {
			signer = signer.with_token(token, secret);
		}

		let header = signer.authorization_header("POST", &endpoint, extra);
		let response = self
			.http
			.post(endpoint)
			.header(AUTHORIZATION, header)
			.send()
			.await
			.map_err(TransportError::from)?;
		let status = response.status();
		let body = response.text().await.map_err(TransportError::from)?;

		if !status.is_success() {
			return Err(Error::Provider { status: status.as_u16(), body: preview(&body) });
		}

		Ok(body)
	}
}

fn parse_request_token(body: &str) -> Result<RequestToken> {
	let mut pairs = parse_form(body);
	let token = pairs.remove("oauth_token").ok_or(Error::Parse { field: "oauth_token" })?;
	let secret =
		pairs.remove("oauth_token_secret").ok_or(Error::Parse { field: "oauth_token_secret" })?;

	Ok(RequestToken { token, secret: TokenSecret::new(secret) })
}

fn parse_access_grant(body: &str) -> Result<AccessGrant> {
	let mut pairs = parse_form(body);
	let screen_name = pairs.remove("screen_name").ok_or(Error::Parse { field: "screen_name" })?;
	let user_id = pairs.remove("user_id").ok_or(Error::Parse { field: "user_id" })?;
	let token = pairs.remove("oauth_token").ok_or(Error::Parse { field: "oauth_token" })?;
	let secret =
		pairs.remove("oauth_token_secret").ok_or(Error::Parse { field: "oauth_token_secret" })?;

	Ok(AccessGrant { screen_name, user_id, token, secret: TokenSecret::new(secret) })
}

fn parse_form(body: &str) -> HashMap<String, String> {
	form_urlencoded::parse(body.as_bytes()).into_owned().collect()
}

fn preview(body: &str) -> String {
	if body.len() <= BODY_PREVIEW_LEN {
		return body.into();
	}

	let mut cut = BODY_PREVIEW_LEN;

	while !body.is_char_boundary(cut) {
		cut -= 1;
	}

	body[..cut].into()
}
