//! Relay-level error types shared across the handshake client, handlers, and stores.

// self
use crate::_prelude::*;

/// Relay-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical relay error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Provider answered an OAuth endpoint with a non-success status.
	#[error("Provider returned status {status}: {body}.")]
	Provider {
		/// HTTP status code returned by the provider.
		status: u16,
		/// Truncated response body for diagnostics.
		body: String,
	},
	/// Provider returned a token response that lacks a required field.
	#[error("Provider response is missing `{field}`.")]
	Parse {
		/// Name of the absent form field.
		field: &'static str,
	},
	/// Callback request arrived without a mandatory query parameter.
	#[error("Callback parameter `{name}` is missing.")]
	MissingParameter {
		/// Name of the absent query parameter.
		name: &'static str,
	},
	/// Callback carried a request token the relay never issued or already consumed.
	#[error("Request token was not found in the pending registry.")]
	TokenNotFound,
	/// The end user declined the authorization request at the provider.
	#[error("The authorization request was denied by the user.")]
	Denied,
}

/// Configuration and validation failures raised by the relay.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// Config file exists but could not be read.
	#[error("Config file `{path}` could not be read.")]
	FileRead {
		/// Path that failed to load.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
	/// Config file contains invalid TOML.
	#[error("Config file `{path}` is not valid TOML.")]
	FileParse {
		/// Path that failed to parse.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: toml::de::Error,
	},
	/// Public base URL cannot be parsed.
	#[error("Public URL is invalid.")]
	InvalidPublicUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Bind address cannot be parsed.
	#[error("Bind address is invalid.")]
	InvalidBindAddress {
		/// Underlying parsing failure.
		#[source]
		source: std::net::AddrParseError,
	},
	/// Provider descriptor failed validation.
	#[error("Provider descriptor is invalid.")]
	InvalidDescriptor(#[from] crate::provider::ProviderDescriptorError),
	/// Log file could not be opened for appending.
	#[error("Log file `{path}` could not be opened.")]
	LogFile {
		/// Path that failed to open.
		path: String,
		/// Underlying IO failure.
		#[source]
		source: std::io::Error,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the provider.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while serving or calling the provider.")]
	Io(#[from] std::io::Error),
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
