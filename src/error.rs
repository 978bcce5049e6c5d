//! Error types for the secret-sharing engine and the epoch protocol.

use core::fmt;

/// Result type for sharing and protocol operations.
pub type SharingResult<T> = Result<T, SharingError>;

/// Error types for sharing and protocol operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharingError {
	/// The caller asked to share an empty (or all-whitespace) secret.
	/// Recoverable: the caller may retry with real input.
	EmptySecret,
	/// The secret does not fit below the field modulus.
	SecretTooLarge {
		/// Length of the rejected secret in bytes.
		length: usize,
		/// Maximum encodable length in bytes.
		max: usize,
	},
	/// A node was asked to sub-share while holding nothing.
	/// Indicates a protocol invariant violation, not user error.
	NoShareHeld {
		/// Identifier of the empty-handed node.
		node_id: u32,
	},
	/// A field element has no multiplicative inverse.
	/// Fatal: the modulus or an input is corrupt.
	NotInvertible {
		/// The non-invertible residue.
		value: u128,
	},
	/// Fewer shares survive than the reconstruction threshold requires.
	/// Expected, recoverable outcome reported to the caller.
	InsufficientShares {
		/// Number of shares available.
		available: u32,
		/// Reconstruction threshold.
		required: u32,
	},
	/// Invalid threshold parameters (t, n).
	InvalidParameters {
		/// Threshold value.
		threshold: u32,
		/// Number of parties the threshold was checked against.
		parties: u32,
		/// Description of the validation error.
		reason: &'static str,
	},
	/// An interpolation position fell outside the evaluation point set.
	PointOutOfBounds {
		/// Requested position.
		index: usize,
		/// Number of evaluation points supplied.
		points: usize,
	},
	/// Two shares in one reconstruction set carry the same x-coordinate.
	DuplicateShareIndex {
		/// The repeated share index.
		index: u32,
	},
	/// Sub-share vector length does not match the old holder count.
	ShareCountMismatch {
		/// Expected number of entries.
		expected: usize,
		/// Actual number of entries.
		actual: usize,
	},
}

impl fmt::Display for SharingError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SharingError::EmptySecret => {
				write!(f, "Secret must not be empty or whitespace")
			},
			SharingError::SecretTooLarge { length, max } => {
				write!(f, "Secret too large: {} bytes (max: {})", length, max)
			},
			SharingError::NoShareHeld { node_id } => {
				write!(f, "Node {} holds no share to split", node_id)
			},
			SharingError::NotInvertible { value } => {
				write!(f, "Field element {} is not invertible", value)
			},
			SharingError::InsufficientShares { available, required } => {
				write!(f, "Insufficient shares: {} available, {} required", available, required)
			},
			SharingError::InvalidParameters { threshold, parties, reason } => {
				write!(
					f,
					"Invalid threshold parameters: t={}, n={}, reason: {}",
					threshold, parties, reason
				)
			},
			SharingError::PointOutOfBounds { index, points } => {
				write!(f, "Interpolation position {} out of bounds: {} points supplied", index, points)
			},
			SharingError::DuplicateShareIndex { index } => {
				write!(f, "Duplicate share index: {}", index)
			},
			SharingError::ShareCountMismatch { expected, actual } => {
				write!(f, "Share count mismatch: expected {}, got {}", expected, actual)
			},
		}
	}
}

impl std::error::Error for SharingError {}

/// Validate the protocol parameters `1 <= threshold <= committee_size <= total_nodes`.
pub fn validate_protocol_params(
	threshold: u32,
	committee_size: u32,
	total_nodes: u32,
) -> SharingResult<()> {
	if threshold < 1 {
		return Err(SharingError::InvalidParameters {
			threshold,
			parties: committee_size,
			reason: "threshold must be at least 1",
		});
	}

	if threshold > committee_size {
		return Err(SharingError::InvalidParameters {
			threshold,
			parties: committee_size,
			reason: "threshold cannot exceed committee size",
		});
	}

	if committee_size > total_nodes {
		return Err(SharingError::InvalidParameters {
			threshold: committee_size,
			parties: total_nodes,
			reason: "committee size cannot exceed total nodes",
		});
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_valid_protocol_params() {
		assert!(validate_protocol_params(1, 1, 1).is_ok());
		assert!(validate_protocol_params(3, 5, 10).is_ok());
		assert!(validate_protocol_params(5, 5, 5).is_ok());
	}

	#[test]
	fn test_invalid_protocol_params() {
		// Threshold too small
		assert!(validate_protocol_params(0, 5, 10).is_err());

		// Threshold exceeds committee
		assert!(validate_protocol_params(6, 5, 10).is_err());

		// Committee exceeds node count
		assert!(validate_protocol_params(3, 11, 10).is_err());
	}

	#[test]
	fn test_error_display() {
		let err = SharingError::InsufficientShares { available: 2, required: 3 };
		assert_eq!(err.to_string(), "Insufficient shares: 2 available, 3 required");

		let err = SharingError::NoShareHeld { node_id: 4 };
		assert_eq!(err.to_string(), "Node 4 holds no share to split");
	}
}
