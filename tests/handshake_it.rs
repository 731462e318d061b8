// crates.io
use httpmock::prelude::*;
// self
use oauth1_relay::{
	auth::{Consumer, TokenSecret},
	error::Error,
	handshake::HandshakeClient,
	provider::ProviderDescriptor,
	url::Url,
};

fn url(value: &str) -> Url {
	Url::parse(value).expect("Failed to parse mock provider URL.")
}

fn build_client(server: &MockServer) -> HandshakeClient {
	let descriptor = ProviderDescriptor::builder()
		.request_token_endpoint(url(&server.url("/oauth/request_token")))
		.access_token_endpoint(url(&server.url("/oauth/access_token")))
		.authorize_endpoint(url(&server.url("/oauth/authorize")))
		.user_show_endpoint(url(&server.url("/1.1/users/show.json")))
		.build()
		.expect("Mock provider descriptor should build successfully.");

	HandshakeClient::new(Consumer::new("relay-key", "relay-secret"), descriptor)
}

fn callback() -> Url {
	url("http://127.0.0.1:8080/callback")
}

#[tokio::test]
async fn request_token_posts_a_signed_request_and_parses_the_response() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=T1&oauth_token_secret=S1&oauth_callback_confirmed=true");
		})
		.await;
	let request_token = client
		.request_token(&callback())
		.await
		.expect("Request-token exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(request_token.token, "T1");
	assert_eq!(request_token.secret.expose(), "S1");
}

#[tokio::test]
async fn request_token_surfaces_provider_rejections() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(401).body("Invalid consumer key");
		})
		.await;
	let err = client
		.request_token(&callback())
		.await
		.expect_err("Provider rejections should surface as errors.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Provider { status: 401, .. }));
	assert!(err.to_string().contains("Invalid consumer key"));
}

#[tokio::test]
async fn request_token_rejects_malformed_bodies() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/request_token");
			then.status(200).body("oauth_token=T1");
		})
		.await;
	let err = client
		.request_token(&callback())
		.await
		.expect_err("Responses without a token secret should fail to parse.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Parse { field: "oauth_token_secret" }));
}

#[tokio::test]
async fn access_token_exchanges_the_verifier_for_a_grant() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token").header_exists("authorization");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("oauth_token=AT&oauth_token_secret=ATS&user_id=42&screen_name=alice");
		})
		.await;
	let grant = client
		.access_token("T1", &TokenSecret::new("S1"), "V1")
		.await
		.expect("Access-token exchange should succeed.");

	mock.assert_async().await;

	assert_eq!(grant.screen_name, "alice");
	assert_eq!(grant.user_id, "42");
	assert_eq!(grant.token, "AT");
	assert_eq!(grant.secret.expose(), "ATS");
}

#[tokio::test]
async fn access_token_rejects_responses_missing_identity_fields() {
	let server = MockServer::start_async().await;
	let client = build_client(&server);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth/access_token");
			then.status(200).body("oauth_token=AT&oauth_token_secret=ATS&user_id=42");
		})
		.await;
	let err = client
		.access_token("T1", &TokenSecret::new("S1"), "V1")
		.await
		.expect_err("Responses without a screen name should fail to parse.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Parse { field: "screen_name" }));
}
