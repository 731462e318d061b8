//! Provider descriptor data structures shared by the handshake client and handlers.
//!
//! A descriptor carries the four fixed endpoints of the OAuth 1.0a provider
//! contract (request-token, access-token, authorize, user-show) after
//! validation, so flows never deal with raw endpoint strings.

// self
use crate::_prelude::*;

const TWITTER_REQUEST_TOKEN_URL: &str = "https://api.twitter.com/oauth/request_token";
const TWITTER_ACCESS_TOKEN_URL: &str = "https://api.twitter.com/oauth/access_token";
const TWITTER_AUTHORIZE_URL: &str = "https://api.twitter.com/oauth/authorize";
const TWITTER_USER_SHOW_URL: &str = "https://api.twitter.com/1.1/users/show.json";

/// Errors raised while constructing or validating descriptors.
#[derive(Debug, PartialEq, Eq, ThisError)]
pub enum ProviderDescriptorError {
	/// Every endpoint of the provider contract must be present.
	#[error("Missing {endpoint} endpoint.")]
	MissingEndpoint {
		/// Which endpoint was absent.
		endpoint: &'static str,
	},
	/// Endpoints must use HTTPS unless they point at loopback.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// A built-in endpoint constant failed to parse.
	#[error("The {endpoint} endpoint URL is invalid.")]
	InvalidUrl {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
}

/// Endpoint set declared by a provider descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// Request-token endpoint opening the handshake.
	pub request_token: Url,
	/// Access-token endpoint closing the handshake.
	pub access_token: Url,
	/// Authorize page the end user is sent to.
	pub authorize: Url,
	/// User lookup endpoint exposed by the provider contract.
	pub user_show: Url,
}

/// Immutable provider descriptor consumed by the handshake client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderDescriptor {
	/// Validated endpoint definitions exposed by the provider.
	pub endpoints: ProviderEndpoints,
}
impl ProviderDescriptor {
	/// Creates a new empty builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::default()
	}

	/// Descriptor for the Twitter OAuth 1.0a endpoint set.
	pub fn twitter() -> Result<Self, ProviderDescriptorError> {
		Ok(Self::builder()
			.request_token_endpoint(parse_endpoint("request-token", TWITTER_REQUEST_TOKEN_URL)?)
			.access_token_endpoint(parse_endpoint("access-token", TWITTER_ACCESS_TOKEN_URL)?)
			.authorize_endpoint(parse_endpoint("authorize", TWITTER_AUTHORIZE_URL)?)
			.user_show_endpoint(parse_endpoint("user-show", TWITTER_USER_SHOW_URL)?)
			.build()?)
	}

	/// Builds the authorize URL the end user should be redirected to for `token`.
	pub fn authorize_url(&self, token: &str) -> Url {
		let mut url = self.endpoints.authorize.clone();

		url.query_pairs_mut().append_pair("oauth_token", token);

		url
	}
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	/// Request-token endpoint, required.
	pub request_token_endpoint: Option<Url>,
	/// Access-token endpoint, required.
	pub access_token_endpoint: Option<Url>,
	/// Authorize endpoint, required.
	pub authorize_endpoint: Option<Url>,
	/// User-show endpoint, required.
	pub user_show_endpoint: Option<Url>,
}
impl ProviderDescriptorBuilder {
	/// Sets the request-token endpoint.
	pub fn request_token_endpoint(mut self, url: Url) -> Self {
		self.request_token_endpoint = Some(url);

		self
	}

	/// Sets the access-token endpoint.
	pub fn access_token_endpoint(mut self, url: Url) -> Self {
		self.access_token_endpoint = Some(url);

		self
	}

	/// Sets the authorize endpoint.
	pub fn authorize_endpoint(mut self, url: Url) -> Self {
		self.authorize_endpoint = Some(url);

		self
	}

	/// Sets the user-show endpoint.
	pub fn user_show_endpoint(mut self, url: Url) -> Self {
		self.user_show_endpoint = Some(url);

		self
	}

	/// Validates the collected endpoints and produces a descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let request_token = require("request-token", self.request_token_endpoint)?;
		let access_token = require("access-token", self.access_token_endpoint)?;
		let authorize = require("authorize", self.authorize_endpoint)?;
		let user_show = require("user-show", self.user_show_endpoint)?;

		Ok(ProviderDescriptor {
			endpoints: ProviderEndpoints { request_token, access_token, authorize, user_show },
		})
	}
}

fn require(
	endpoint: &'static str,
	url: Option<Url>,
) -> Result<Url, ProviderDescriptorError> {
	let url = url.ok_or(ProviderDescriptorError::MissingEndpoint { endpoint })?;

	// Loopback stays permitted so local mock providers can run over plain HTTP.
	if url.scheme() != "https"
		&& !matches!(url.host_str(), Some("127.0.0.1") | Some("localhost") | Some("[::1]"))
	{
		return Err(ProviderDescriptorError::InsecureEndpoint { endpoint, url: url.into() });
	}

	Ok(url)
}

fn parse_endpoint(
	endpoint: &'static str,
	value: &str,
) -> Result<Url, ProviderDescriptorError> {
	Url::parse(value).map_err(|source| ProviderDescriptorError::InvalidUrl { endpoint, source })
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn url(value: &str) -> Url {
		Url::parse(value).expect("Failed to parse test URL.")
	}

	#[test]
	fn twitter_descriptor_builds_with_fixed_endpoints() {
		let descriptor =
			ProviderDescriptor::twitter().expect("Twitter descriptor should build successfully.");

		assert_eq!(
			descriptor.endpoints.request_token.as_str(),
			"https://api.twitter.com/oauth/request_token",
		);
		assert_eq!(
			descriptor.endpoints.access_token.as_str(),
			"https://api.twitter.com/oauth/access_token",
		);
		assert_eq!(
			descriptor.endpoints.user_show.as_str(),
			"https://api.twitter.com/1.1/users/show.json",
		);
	}

	#[test]
	fn builder_rejects_missing_and_insecure_endpoints() {
		let err = ProviderDescriptor::builder()
			.request_token_endpoint(url("https://example.com/request_token"))
			.build()
			.expect_err("Builder should reject missing endpoints.");

		assert!(matches!(err, ProviderDescriptorError::MissingEndpoint {
			endpoint: "access-token"
		}));

		let err = ProviderDescriptor::builder()
			.request_token_endpoint(url("http://example.com/request_token"))
			.access_token_endpoint(url("https://example.com/access_token"))
			.authorize_endpoint(url("https://example.com/authorize"))
			.user_show_endpoint(url("https://example.com/users/show.json"))
			.build()
			.expect_err("Builder should reject insecure endpoints.");

		assert!(matches!(err, ProviderDescriptorError::InsecureEndpoint {
			endpoint: "request-token",
			..
		}));
	}

	#[test]
	fn builder_permits_loopback_over_plain_http() {
		let descriptor = ProviderDescriptor::builder()
			.request_token_endpoint(url("http://127.0.0.1:9001/oauth/request_token"))
			.access_token_endpoint(url("http://127.0.0.1:9001/oauth/access_token"))
			.authorize_endpoint(url("http://127.0.0.1:9001/oauth/authorize"))
			.user_show_endpoint(url("http://127.0.0.1:9001/1.1/users/show.json"))
			.build()
			.expect("Loopback endpoints should be accepted.");

		assert_eq!(descriptor.endpoints.request_token.port(), Some(9001));
	}

	#[test]
	fn authorize_url_appends_the_request_token() {
		let descriptor =
			ProviderDescriptor::twitter().expect("Twitter descriptor should build successfully.");
		let authorize = descriptor.authorize_url("T1");

		assert_eq!(
			authorize.as_str(),
			"https://api.twitter.com/oauth/authorize?oauth_token=T1",
		);
	}
}
