//! Logging sink for protocol observers.
//!
//! The protocol core never renders anything itself; every meaningful
//! transition is reported as a `(message, severity)` pair through an
//! injected [`LogSink`]. A presentation layer supplies its own sink;
//! [`TracingSink`] forwards to the `tracing` ecosystem by default, and
//! [`MemorySink`] buffers entries for tests and diagnostics views.

use core::fmt;

/// Severity attached to each protocol log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
	/// Routine progress.
	Info,
	/// A step completed as intended.
	Success,
	/// Degraded but recoverable condition.
	Warning,
	/// A failed operation.
	Error,
}

impl fmt::Display for Severity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Severity::Info => write!(f, "info"),
			Severity::Success => write!(f, "success"),
			Severity::Warning => write!(f, "warning"),
			Severity::Error => write!(f, "error"),
		}
	}
}

/// Sink receiving protocol log lines.
///
/// This is the sole observable side channel of the protocol besides
/// return values.
pub trait LogSink {
	/// Accept one log line.
	fn log(&mut self, message: &str, severity: Severity);
}

/// Default sink forwarding to `tracing`.
///
/// `Success` maps to the info level with the severity recorded as a field.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
	fn log(&mut self, message: &str, severity: Severity) {
		match severity {
			Severity::Info | Severity::Success => {
				tracing::info!(severity = %severity, "{}", message)
			},
			Severity::Warning => tracing::warn!("{}", message),
			Severity::Error => tracing::error!("{}", message),
		}
	}
}

/// Sink buffering every entry in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
	entries: Vec<(String, Severity)>,
}

impl MemorySink {
	/// Create an empty sink.
	pub fn new() -> Self {
		Self::default()
	}

	/// All entries recorded so far, in order.
	pub fn entries(&self) -> &[(String, Severity)] {
		&self.entries
	}

	/// Whether any recorded entry carries the given severity.
	pub fn has_severity(&self, severity: Severity) -> bool {
		self.entries.iter().any(|(_, s)| *s == severity)
	}

	/// Drop all recorded entries.
	pub fn clear(&mut self) {
		self.entries.clear();
	}
}

impl LogSink for MemorySink {
	fn log(&mut self, message: &str, severity: Severity) {
		self.entries.push((message.to_string(), severity));
	}
}
