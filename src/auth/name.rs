//! Validated short key the host uses to resolve a strategy.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

const NAME_MAX_LEN: usize = 128;

/// Error returned when provider name validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum ProviderNameError {
	/// The name was empty.
	#[error("Provider name cannot be empty.")]
	Empty,
	/// The name contains whitespace characters.
	#[error("Provider name contains whitespace.")]
	ContainsWhitespace,
	/// The name contains a path separator and cannot be used in request paths.
	#[error("Provider name cannot contain `/`.")]
	ContainsSlash,
	/// The name exceeded the allowed character count.
	#[error("Provider name exceeds {max} characters.")]
	TooLong {
		/// Maximum permitted character count.
		max: usize,
	},
}

/// Short provider key (`kaeuferportal` by default) used in request and callback paths.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProviderName(String);
impl ProviderName {
	/// Name registered for the Käuferportal strategy.
	pub const DEFAULT: &'static str = "kaeuferportal";

	/// Creates a new name after validation.
	pub fn new(value: impl AsRef<str>) -> Result<Self, ProviderNameError> {
		let view = value.as_ref();

		validate_view(view)?;

		Ok(Self(view.to_owned()))
	}

	/// Path that starts the request phase, e.g. `/auth/kaeuferportal`.
	pub fn request_path(&self) -> String {
		format!("/auth/{}", self.0)
	}

	/// Path the provider redirects back to, e.g. `/auth/kaeuferportal/callback`.
	pub fn callback_path(&self) -> String {
		format!("/auth/{}/callback", self.0)
	}
}
impl Default for ProviderName {
	fn default() -> Self {
		Self(Self::DEFAULT.to_owned())
	}
}
impl Deref for ProviderName {
	type Target = str;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
impl AsRef<str> for ProviderName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}
impl Borrow<str> for ProviderName {
	fn borrow(&self) -> &str {
		&self.0
	}
}
impl From<ProviderName> for String {
	fn from(value: ProviderName) -> Self {
		value.0
	}
}
impl TryFrom<String> for ProviderName {
	type Error = ProviderNameError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		validate_view(&value)?;

		Ok(Self(value))
	}
}
impl Debug for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "ProviderName({})", self.0)
	}
}
impl Display for ProviderName {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl FromStr for ProviderName {
	type Err = ProviderNameError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

fn validate_view(view: &str) -> Result<(), ProviderNameError> {
	if view.is_empty() {
		return Err(ProviderNameError::Empty);
	}
	if view.chars().any(char::is_whitespace) {
		return Err(ProviderNameError::ContainsWhitespace);
	}
	if view.contains('/') {
		return Err(ProviderNameError::ContainsSlash);
	}
	if view.chars().count() > NAME_MAX_LEN {
		return Err(ProviderNameError::TooLong { max: NAME_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn names_validate_and_build_paths() {
		assert_eq!(ProviderName::new(""), Err(ProviderNameError::Empty));
		assert_eq!(ProviderName::new("kp portal"), Err(ProviderNameError::ContainsWhitespace));
		assert_eq!(ProviderName::new("kp/portal"), Err(ProviderNameError::ContainsSlash));
		assert!(ProviderName::new("a".repeat(NAME_MAX_LEN + 1)).is_err());

		let name = ProviderName::default();

		assert_eq!(name.to_string(), "kaeuferportal");
		assert_eq!(name.request_path(), "/auth/kaeuferportal");
		assert_eq!(name.callback_path(), "/auth/kaeuferportal/callback");
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let name: ProviderName =
			serde_json::from_str("\"kp-staging\"").expect("Name should deserialize successfully.");

		assert_eq!(&*name, "kp-staging");
		assert!(serde_json::from_str::<ProviderName>("\"with space\"").is_err());
	}

	#[test]
	fn borrow_supports_registry_lookup() {
		let registry: HashMap<ProviderName, u8> = HashMap::from_iter([(ProviderName::default(), 1)]);

		assert_eq!(registry.get("kaeuferportal"), Some(&1));
	}
}
