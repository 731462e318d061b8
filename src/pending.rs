//! In-process registry of pending request tokens.
//!
//! Holds the request token secret for the window between the authorize
//! redirect and the provider callback. Entries are inserted when `/start`
//! succeeds and removed once the callback completes or is denied, so a
//! callback is only honored for a token this process actually issued.
//! Contents are lost on restart, which is acceptable: the user simply starts
//! the handshake again. The registry is process-local and must not back a
//! multi-process deployment.

// self
use crate::{_prelude::*, auth::TokenSecret};

/// Thread-safe request-token registry shared across handlers.
#[derive(Debug, Default)]
pub struct PendingStore(RwLock<HashMap<String, TokenSecret>>);
impl PendingStore {
	/// Records the secret for a freshly issued request token.
	pub fn insert(&self, token: impl Into<String>, secret: TokenSecret) {
		self.0.write().insert(token.into(), secret);
	}

	/// Returns a copy of the secret for `token` without consuming the entry.
	pub fn secret_of(&self, token: &str) -> Option<TokenSecret> {
		self.0.read().get(token).cloned()
	}

	/// Removes the entry for `token`, returning its secret when present.
	pub fn remove(&self, token: &str) -> Option<TokenSecret> {
		self.0.write().remove(token)
	}

	/// Checks whether `token` is currently pending.
	pub fn contains(&self, token: &str) -> bool {
		self.0.read().contains_key(token)
	}

	/// Number of pending entries.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Whether the registry holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn entries_round_trip_and_remove_once() {
		let store = PendingStore::default();

		assert!(store.is_empty());

		store.insert("T1", TokenSecret::new("S1"));

		assert!(store.contains("T1"));
		assert_eq!(store.len(), 1);
		assert_eq!(store.secret_of("T1").map(|s| s.expose().to_owned()), Some("S1".into()));
		// Peeking must not consume the entry.
		assert!(store.contains("T1"));

		let removed = store.remove("T1").expect("Entry should be removable once.");

		assert_eq!(removed.expose(), "S1");
		assert!(store.remove("T1").is_none());
		assert!(!store.contains("T1"));
	}

	#[test]
	fn unknown_tokens_are_absent() {
		let store = PendingStore::default();

		assert!(!store.contains("missing"));
		assert!(store.secret_of("missing").is_none());
		assert!(store.remove("missing").is_none());
	}
}
