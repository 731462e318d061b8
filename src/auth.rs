//! Credential types shared across the handshake flow.

// self
use crate::_prelude::*;

/// Redacted token secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner secret value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Application (consumer) credentials registered with the provider.
#[derive(Clone, Debug)]
pub struct Consumer {
	/// Consumer key identifying the application.
	pub key: String,
	/// Consumer secret used for request signing.
	pub secret: TokenSecret,
}
impl Consumer {
	/// Creates consumer credentials from a key/secret pair.
	pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
		Self { key: key.into(), secret: TokenSecret::new(secret) }
	}
}

/// Temporary credential issued by the provider's request-token endpoint.
///
/// Lives only for the span between the authorize redirect and the callback;
/// the relay keeps it in the pending registry and discards it afterwards.
#[derive(Clone, Debug)]
pub struct RequestToken {
	/// Public request token value.
	pub token: String,
	/// Matching request token secret.
	pub secret: TokenSecret,
}

/// Long-lived credential pair produced by a successful access-token exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessGrant {
	/// Screen name reported by the provider.
	pub screen_name: String,
	/// Stable user identifier reported by the provider.
	pub user_id: String,
	/// Access token authorizing API calls on the user's behalf.
	pub token: String,
	/// Matching access token secret.
	pub secret: TokenSecret,
}
