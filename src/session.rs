//! Per-session key/value contract the strategy uses for CSRF state bookkeeping.
//!
//! Hosts adapt their own session store to [`Session`]; the strategy only ever touches
//! [`STATE_SESSION_KEY`], writing it during the request phase and removing it during the
//! callback phase. Isolation between sessions is the host's responsibility.

// self
use crate::_prelude::*;

/// Session key that holds the outstanding authorization state.
pub const STATE_SESSION_KEY: &str = "omniauth.state";

/// Mutable view over one user's session.
pub trait Session
where
	Self: Send,
{
	/// Returns the value stored under `key`, if any.
	fn get(&self, key: &str) -> Option<&str>;

	/// Stores `value` under `key`, replacing any previous value.
	fn insert(&mut self, key: &str, value: String);

	/// Removes and returns the value stored under `key`.
	fn remove(&mut self, key: &str) -> Option<String>;
}

/// Plain in-process session for hosts without their own store, and for tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemorySession(HashMap<String, String>);
impl MemorySession {
	/// Returns `true` when the session holds no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl Session for MemorySession {
	fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	fn insert(&mut self, key: &str, value: String) {
		self.0.insert(key.to_owned(), value);
	}

	fn remove(&mut self, key: &str) -> Option<String> {
		self.0.remove(key)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn memory_session_round_trips_and_removes() {
		let mut session = MemorySession::default();

		session.insert(STATE_SESSION_KEY, "abc".into());

		assert_eq!(session.get(STATE_SESSION_KEY), Some("abc"));
		assert_eq!(session.remove(STATE_SESSION_KEY), Some("abc".into()));
		assert_eq!(session.remove(STATE_SESSION_KEY), None);
		assert!(session.is_empty());
	}
}
