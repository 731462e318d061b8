//! OAuth 1.0a HMAC-SHA1 request signing.
//!
//! Implements the RFC 5849 signing pipeline: percent encoding over the
//! unreserved set, the signature base string, the consumer/token signing key,
//! and `Authorization: OAuth` header assembly. Nonce and timestamp are
//! injectable so signatures stay deterministic under test.

// crates.io
use base64::{Engine as _, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distr::Alphanumeric};
use sha1::Sha1;
use time::OffsetDateTime;
// self
use crate::{
	_prelude::*,
	auth::{Consumer, TokenSecret},
};

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const VERSION: &str = "1.0";
const NONCE_LEN: usize = 32;

// RFC 3986 unreserved characters stay literal; everything else is escaped.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

type HmacSha1 = Hmac<Sha1>;

/// Percent-encodes a value per the OAuth 1.0a parameter encoding rules.
pub fn percent_encode(value: &str) -> String {
	utf8_percent_encode(value, ENCODE_SET).to_string()
}

/// Signs outbound provider requests for one consumer and optional token credential.
#[derive(Clone, Debug)]
pub struct Signer<'a> {
	consumer: &'a Consumer,
	token: Option<(&'a str, &'a TokenSecret)>,
}
impl<'a> Signer<'a> {
	/// Creates a signer carrying only consumer credentials.
	pub fn new(consumer: &'a Consumer) -> Self {
		Self { consumer, token: None }
	}

	/// Attaches a token credential so the token secret joins the signing key.
	pub fn with_token(mut self, token: &'a str, secret: &'a TokenSecret) -> Self {
		self.token = Some((token, secret));

		self
	}

	/// Builds a signed `Authorization: OAuth` header for the request.
	///
	/// `extra` carries additional oauth protocol parameters such as
	/// `oauth_callback` or `oauth_verifier`; they participate in the signature
	/// and are emitted in the header alongside the standard parameters.
	pub fn authorization_header(&self, method: &str, url: &Url, extra: &[(&str, &str)]) -> String {
		self.header_at(method, url, extra, &nonce(), timestamp())
	}

	pub(crate) fn header_at(
		&self,
		method: &str,
		url: &Url,
		extra: &[(&str, &str)],
		nonce: &str,
		timestamp: i64,
	) -> String {
		let mut oauth_params: Vec<(String, String)> = vec![
			("oauth_consumer_key".into(), self.consumer.key.clone()),
			("oauth_nonce".into(), nonce.into()),
			("oauth_signature_method".into(), SIGNATURE_METHOD.into()),
			("oauth_timestamp".into(), timestamp.to_string()),
			("oauth_version".into(), VERSION.into()),
		];

		if let Some((token, _)) = self.token {
			oauth_params.push(("oauth_token".into(), token.into()));
		}
		for (key, value) in extra {
			oauth_params.push(((*key).into(), (*value).into()));
		}

		// Query parameters of the target URL sign too, per RFC 5849 §3.4.1.3.
		let mut signed_params = oauth_params.clone();

		signed_params.extend(url.query_pairs().map(|(k, v)| (k.into_owned(), v.into_owned())));

		let base = signature_base_string(method, url, &signed_params);
		let key = signing_key(&self.consumer.secret, self.token.map(|(_, secret)| secret));

		oauth_params.push(("oauth_signature".into(), hmac_sha1_base64(&key, &base)));
		oauth_params.sort();

		let rendered = oauth_params
			.iter()
			.map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
			.collect::<Vec<_>>()
			.join(", ");

		format!("OAuth {rendered}")
	}
}

pub(crate) fn signature_base_string(
	method: &str,
	url: &Url,
	params: &[(String, String)],
) -> String {
	let mut encoded: Vec<(String, String)> =
		params.iter().map(|(k, v)| (percent_encode(k), percent_encode(v))).collect();

	// Byte-value ordering over the encoded key/value pairs.
	encoded.sort();

	let joined = encoded.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("&");

	format!(
		"{}&{}&{}",
		method.to_uppercase(),
		percent_encode(&base_url(url)),
		percent_encode(&joined)
	)
}

pub(crate) fn signing_key(
	consumer_secret: &TokenSecret,
	token_secret: Option<&TokenSecret>,
) -> String {
	format!(
		"{}&{}",
		percent_encode(consumer_secret.expose()),
		percent_encode(token_secret.map(TokenSecret::expose).unwrap_or_default())
	)
}

pub(crate) fn hmac_sha1_base64(key: &str, message: &str) -> String {
	// HMAC accepts keys of any length, so construction cannot fail.
	let mut mac = HmacSha1::new_from_slice(key.as_bytes())
		.expect("HMAC-SHA1 accepts keys of any length.");

	mac.update(message.as_bytes());

	STANDARD.encode(mac.finalize().into_bytes())
}

fn base_url(url: &Url) -> String {
	let mut base = url.clone();

	base.set_query(None);
	base.set_fragment(None);

	base.to_string()
}

fn nonce() -> String {
	rand::rng().sample_iter(Alphanumeric).take(NONCE_LEN).map(char::from).collect()
}

fn timestamp() -> i64 {
	OffsetDateTime::now_utc().unix_timestamp()
}
