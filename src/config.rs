//! Layered relay configuration.
//!
//! Values resolve in three layers, mirroring the deployment story of the
//! service: built-in placeholder defaults, then the `APP_CONSUMER_KEY` /
//! `APP_CONSUMER_SECRET` environment variables, then an optional TOML file
//! whose present keys override everything before it. A missing file is
//! silently ignored; a malformed one is a hard error.

// std
use std::{env, fs, io::ErrorKind, net::SocketAddr};
// self
use crate::{
	_prelude::*,
	auth::{Consumer, TokenSecret},
	error::ConfigError,
};

/// Environment variable carrying the consumer key.
pub const ENV_CONSUMER_KEY: &str = "APP_CONSUMER_KEY";
/// Environment variable carrying the consumer secret.
pub const ENV_CONSUMER_SECRET: &str = "APP_CONSUMER_SECRET";
/// Environment variable overriding the config file path.
pub const ENV_CONFIG_FILE: &str = "APP_CONFIG";

const DEFAULT_CONFIG_FILE: &str = "relay.toml";
const PLACEHOLDER_CONSUMER_KEY: &str = "consumer-key-placeholder";
const PLACEHOLDER_CONSUMER_SECRET: &str = "consumer-secret-placeholder";
const DEFAULT_PUBLIC_URL: &str = "http://127.0.0.1:8080";
const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_DATABASE: &str = "relay.sqlite3";
const DEFAULT_LOG_PATH: &str = "log/oauth1-relay.log";
const DEFAULT_USER_ROW: i64 = 2;

/// Resolved relay configuration.
#[derive(Clone, Debug)]
pub struct AppConfig {
	/// Consumer key registered with the provider.
	pub consumer_key: String,
	/// Consumer secret registered with the provider.
	pub consumer_secret: TokenSecret,
	/// Public base URL the provider redirects back to.
	pub public_url: Url,
	/// Local socket address to serve on.
	pub bind: SocketAddr,
	/// SQLite database path.
	pub database: PathBuf,
	/// Log file path.
	pub log_path: PathBuf,
	/// Fixed user row updated by the grant store (single-tenant deployment).
	pub user_row: i64,
}
impl AppConfig {
	/// Loads configuration from the process environment and the config file.
	pub fn load() -> Result<Self, ConfigError> {
		let file = env::var(ENV_CONFIG_FILE).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());

		Self::load_from(
			env::var(ENV_CONSUMER_KEY).ok(),
			env::var(ENV_CONSUMER_SECRET).ok(),
			Path::new(&file),
		)
	}

	/// Resolves the layered configuration from explicit inputs.
	pub fn load_from(
		env_key: Option<String>,
		env_secret: Option<String>,
		file: &Path,
	) -> Result<Self, ConfigError> {
		let mut config = Self::placeholder()?;

		if let Some(key) = env_key {
			config.consumer_key = key;
		}
		if let Some(secret) = env_secret {
			config.consumer_secret = TokenSecret::new(secret);
		}
		if let Some(overrides) = read_overrides(file)? {
			config.apply(overrides)?;
		}

		Ok(config)
	}

	/// Consumer credentials for the handshake client.
	pub fn consumer(&self) -> Consumer {
		Consumer { key: self.consumer_key.clone(), secret: self.consumer_secret.clone() }
	}

	/// External callback URL derived from the public base URL.
	pub fn callback_url(&self) -> Url {
		let mut url = self.public_url.clone();

		url.set_path("/callback");
		url.set_query(None);

		url
	}

	fn placeholder() -> Result<Self, ConfigError> {
		Ok(Self {
			consumer_key: PLACEHOLDER_CONSUMER_KEY.into(),
			consumer_secret: TokenSecret::new(PLACEHOLDER_CONSUMER_SECRET),
			public_url: Url::parse(DEFAULT_PUBLIC_URL)
				.map_err(|source| ConfigError::InvalidPublicUrl { source })?,
			bind: DEFAULT_BIND
				.parse()
				.map_err(|source| ConfigError::InvalidBindAddress { source })?,
			database: DEFAULT_DATABASE.into(),
			log_path: DEFAULT_LOG_PATH.into(),
			user_row: DEFAULT_USER_ROW,
		})
	}

	fn apply(&mut self, overrides: FileOverrides) -> Result<(), ConfigError> {
		if let Some(key) = overrides.consumer_key {
			self.consumer_key = key;
		}
		if let Some(secret) = overrides.consumer_secret {
			self.consumer_secret = TokenSecret::new(secret);
		}
		if let Some(raw) = overrides.public_url {
			self.public_url =
				Url::parse(&raw).map_err(|source| ConfigError::InvalidPublicUrl { source })?;
		}
		if let Some(raw) = overrides.bind {
			self.bind =
				raw.parse().map_err(|source| ConfigError::InvalidBindAddress { source })?;
		}
		if let Some(database) = overrides.database {
			self.database = database;
		}
		if let Some(log_path) = overrides.log_path {
			self.log_path = log_path;
		}
		if let Some(user_row) = overrides.user_row {
			self.user_row = user_row;
		}

		Ok(())
	}
}

#[derive(Debug, Default, Deserialize)]
struct FileOverrides {
	consumer_key: Option<String>,
	consumer_secret: Option<String>,
	public_url: Option<String>,
	bind: Option<String>,
	database: Option<PathBuf>,
	log_path: Option<PathBuf>,
	user_row: Option<i64>,
}

fn read_overrides(path: &Path) -> Result<Option<FileOverrides>, ConfigError> {
	let raw = match fs::read_to_string(path) {
		Ok(raw) => raw,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
		Err(source) =>
			return Err(ConfigError::FileRead { path: path.display().to_string(), source }),
	};

	toml::from_str(&raw)
		.map(Some)
		.map_err(|source| ConfigError::FileParse { path: path.display().to_string(), source })
}

#[cfg(test)]
mod tests {
	// std
	use std::io::Write;
	// self
	use super::*;

	fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
		let dir = tempfile::tempdir().expect("Temp dir should be creatable.");
		let path = dir.path().join("relay.toml");
		let mut file = fs::File::create(&path).expect("Config file should be creatable.");

		file.write_all(contents.as_bytes()).expect("Config file should be writable.");

		(dir, path)
	}

	#[test]
	fn defaults_apply_without_env_or_file() {
		let config = AppConfig::load_from(None, None, Path::new("does-not-exist.toml"))
			.expect("Defaults should resolve.");

		assert_eq!(config.consumer_key, PLACEHOLDER_CONSUMER_KEY);
		assert_eq!(config.consumer_secret.expose(), PLACEHOLDER_CONSUMER_SECRET);
		assert_eq!(config.user_row, DEFAULT_USER_ROW);
		assert_eq!(config.callback_url().as_str(), "http://127.0.0.1:8080/callback");
	}

	#[test]
	fn environment_overrides_defaults() {
		let config = AppConfig::load_from(
			Some("env-key".into()),
			Some("env-secret".into()),
			Path::new("does-not-exist.toml"),
		)
		.expect("Environment layer should resolve.");

		assert_eq!(config.consumer_key, "env-key");
		assert_eq!(config.consumer_secret.expose(), "env-secret");
	}

	#[test]
	fn file_overrides_environment() {
		let (_dir, path) = write_config(
			"consumer_key = \"file-key\"\n\
			 public_url = \"https://relay.example.com\"\n\
			 user_row = 7\n",
		);
		let config = AppConfig::load_from(Some("env-key".into()), Some("env-secret".into()), &path)
			.expect("File layer should resolve.");

		assert_eq!(config.consumer_key, "file-key");
		// Keys absent from the file keep the previous layer's value.
		assert_eq!(config.consumer_secret.expose(), "env-secret");
		assert_eq!(config.user_row, 7);
		assert_eq!(config.callback_url().as_str(), "https://relay.example.com/callback");
	}

	#[test]
	fn malformed_files_are_rejected() {
		let (_dir, path) = write_config("consumer_key = [not toml");
		let err = AppConfig::load_from(None, None, &path)
			.expect_err("Malformed TOML should be rejected.");

		assert!(matches!(err, ConfigError::FileParse { .. }));
	}

	#[test]
	fn invalid_overrides_are_rejected() {
		let (_dir, path) = write_config("bind = \"not-an-address\"\n");
		let err = AppConfig::load_from(None, None, &path)
			.expect_err("Invalid bind addresses should be rejected.");

		assert!(matches!(err, ConfigError::InvalidBindAddress { .. }));
	}
}
