// self
use crate::{
	_prelude::*,
	error::FailureKind,
	obs::PhaseKind,
};

/// Future wrapped in a [`PhaseSpan`] (tracing enabled).
#[cfg(feature = "tracing")]
pub type InstrumentedPhase<F> = tracing::instrument::Instrumented<F>;
/// The unwrapped future (tracing disabled).
#[cfg(not(feature = "tracing"))]
pub type InstrumentedPhase<F> = F;

/// Span covering one strategy phase; a zero-sized no-op without the `tracing` feature.
#[derive(Clone, Debug)]
pub struct PhaseSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl PhaseSpan {
	/// Opens a span for `kind`, labeled with the call site in `stage`.
	pub fn new(kind: PhaseKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("kaeuferportal_oauth2.phase", phase = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Enters the span until the returned guard drops; for the synchronous request phase.
	pub fn entered(self) -> PhaseSpanGuard {
		#[cfg(feature = "tracing")]
		{
			PhaseSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			PhaseSpanGuard {}
		}
	}

	/// Attaches the span to `fut` so it is entered on every poll.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedPhase<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Guard returned by [`PhaseSpan::entered`].
pub struct PhaseSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for PhaseSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("PhaseSpanGuard(..)")
	}
}

/// Emits a warning event describing a failure handed to the host.
pub fn trace_failure(phase: PhaseKind, kind: FailureKind, cause: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(
			phase = phase.as_str(),
			kind = kind.as_str(),
			error = %cause,
			"authentication failed"
		);
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (phase, kind, cause);
	}
}
