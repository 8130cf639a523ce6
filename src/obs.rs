//! Optional observability helpers for the strategy phases.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit spans named `kaeuferportal_oauth2.phase` with the `phase` and
//!   `stage` fields, plus a warning event for every classified failure.
//! - Enable `metrics` to increment `kaeuferportal_oauth2_phase_total` (labeled by `phase` and
//!   `outcome`) and `kaeuferportal_oauth2_failure_total` (labeled by `kind`).

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Strategy phases observed by the instrumentation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
	/// Authorize redirect construction.
	Request,
	/// Callback verification, code exchange, and profile fetch.
	Callback,
	/// Refresh of an expired access token.
	Refresh,
}
impl PhaseKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseKind::Request => "request",
			PhaseKind::Callback => "callback",
			PhaseKind::Refresh => "refresh",
		}
	}
}
impl Display for PhaseKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseOutcome {
	/// Phase entry.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure handed back to the host.
	Failure,
}
impl PhaseOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			PhaseOutcome::Attempt => "attempt",
			PhaseOutcome::Success => "success",
			PhaseOutcome::Failure => "failure",
		}
	}
}
impl Display for PhaseOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
