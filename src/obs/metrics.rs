// self
use crate::{
	error::FailureKind,
	obs::{PhaseKind, PhaseOutcome},
};

/// Records a phase outcome via the global metrics recorder (when enabled).
pub fn record_phase_outcome(kind: PhaseKind, outcome: PhaseOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"kaeuferportal_oauth2_phase_total",
			"phase" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records a classified failure handed to the host.
pub fn record_failure(kind: FailureKind) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("kaeuferportal_oauth2_failure_total", "kind" => kind.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = kind;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_phase_outcome(PhaseKind::Callback, PhaseOutcome::Failure);
		record_failure(FailureKind::Timeout);
	}
}
