//! CSRF state tokens: issued by the request phase, consumed once by the callback phase.

// crates.io
use rand::RngCore;
// self
use crate::{_prelude::*, error::CallbackError};

/// Returns `bytes` random bytes from the thread-local CSPRNG, hex-encoded.
pub(crate) fn generate_state(bytes: usize) -> String {
	let mut buf = vec![0_u8; bytes];

	rand::rng().fill_bytes(&mut buf);

	hex::encode(buf)
}

/// Picks the state for one authorize redirect: a configured non-blank value wins.
pub(crate) fn state_for_request(configured: Option<&str>, bytes: usize) -> String {
	match configured {
		Some(state) if !state.trim().is_empty() => state.to_owned(),
		_ => generate_state(bytes),
	}
}

/// Accepts the callback only when a non-empty returned state equals the stored one.
pub(crate) fn verify_state(
	stored: Option<String>,
	returned: Option<&str>,
) -> Result<(), CallbackError> {
	match (stored, returned) {
		(Some(stored), Some(returned)) if !returned.is_empty() && stored == returned => Ok(()),
		_ => Err(CallbackError::CsrfDetected),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn generated_states_are_hex_and_distinct() {
		let first = generate_state(24);
		let second = generate_state(24);

		assert_eq!(first.len(), 48);
		assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
		assert_ne!(first, second);
		assert_eq!(generate_state(32).len(), 64);
	}

	#[test]
	fn configured_state_is_used_unless_blank() {
		assert_eq!(state_for_request(Some("fixed"), 24), "fixed");
		assert_eq!(state_for_request(Some("  "), 24).len(), 48);
		assert_eq!(state_for_request(None, 24).len(), 48);
	}

	#[test]
	fn verification_requires_an_exact_non_empty_match() {
		assert_eq!(verify_state(Some("abc".into()), Some("abc")), Ok(()));
		assert_eq!(verify_state(Some("abc".into()), Some("abd")), Err(CallbackError::CsrfDetected));
		assert_eq!(verify_state(None, Some("abc")), Err(CallbackError::CsrfDetected));
		assert_eq!(verify_state(Some("abc".into()), None), Err(CallbackError::CsrfDetected));
		assert_eq!(verify_state(Some(String::new()), Some("")), Err(CallbackError::CsrfDetected));
	}
}
