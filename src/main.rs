//! Relay entry point: load configuration, open the store, and serve.

// std
use std::sync::Arc;
// self
use oauth1_relay::{
	config::AppConfig,
	error::{ConfigError, Result},
	handshake::HandshakeClient,
	obs,
	provider::ProviderDescriptor,
	routes::{self, AppState},
	store::SqliteStore,
};

#[tokio::main]
async fn main() -> Result<()> {
	let config = AppConfig::load()?;
	let _guard = obs::init(&config.log_path)?;

	tracing::info!(bind = %config.bind, public_url = %config.public_url, "starting oauth1-relay");

	let descriptor = ProviderDescriptor::twitter().map_err(ConfigError::from)?;
	let client = HandshakeClient::new(config.consumer(), descriptor);
	let store = SqliteStore::open(&config.database, config.user_row)?;
	let state = AppState::new(Arc::new(client), Arc::new(store), config.callback_url());

	routes::serve(state, config.bind).await
}
