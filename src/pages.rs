//! Minimal HTML rendering for the relay's user-facing pages.

// self
use crate::{_prelude::*, auth::AccessGrant};

/// Landing page.
pub fn index() -> String {
	page(
		"Sign in",
		"<p>This service connects your account via OAuth 1.0a.</p>\
		 <p><a href=\"/start\">Start sign-in</a></p>",
	)
}

/// Redirect page shown after a request token was obtained.
///
/// `authorize_url` already carries the `oauth_token` query parameter.
pub fn start(authorize_url: &Url) -> String {
	let href = escape(authorize_url.as_str());

	page(
		"Authorize",
		&format!(
			"<p>A request token was issued. Continue to the provider to authorize it:</p>\
			 <p><a href=\"{href}\">{href}</a></p>",
		),
	)
}

/// Success page rendered after the access grant was persisted.
pub fn success(grant: &AccessGrant) -> String {
	page(
		"Signed in",
		&format!(
			"<p>Authorization complete.</p>\
			 <p>Screen name: <strong>{}</strong></p>\
			 <p>User id: <strong>{}</strong></p>",
			escape(&grant.screen_name),
			escape(&grant.user_id),
		),
	)
}

/// Error page with a user-facing message.
pub fn error(message: &str) -> String {
	page("Error", &format!("<p>{}</p><p><a href=\"/\">Back</a></p>", escape(message)))
}

fn page(title: &str, body: &str) -> String {
	format!(
		"<!DOCTYPE html>\
		 <html><head><meta charset=\"utf-8\"><title>{title}</title></head>\
		 <body><h1>{title}</h1>{body}</body></html>",
		title = escape(title),
	)
}

fn escape(value: &str) -> String {
	let mut escaped = String::with_capacity(value.len());

	for c in value.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			_ => escaped.push(c),
		}
	}

	escaped
}
