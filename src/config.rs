//! Protocol configuration.
//!
//! Fixed at construction: the total node count N, the nominating/holding
//! committee size K, and the reconstruction threshold T, with
//! `1 <= T <= K <= N` enforced up front.

use crate::error::{validate_protocol_params, SharingResult};

/// Configuration for one protocol instance.
///
/// # Example
///
/// ```
/// use ecpss::ProtocolConfig;
///
/// // 10 nodes, committees of 5, any 3 shares reconstruct
/// let config = ProtocolConfig::new(10, 5, 3).expect("valid parameters");
/// assert_eq!(config.total_nodes(), 10);
/// assert_eq!(config.committee_size(), 5);
/// assert_eq!(config.threshold(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolConfig {
	/// Total number of simulated nodes (N).
	n: u32,
	/// Nominating/holding committee size (K).
	k: u32,
	/// Reconstruction threshold (T).
	t: u32,
}

impl ProtocolConfig {
	/// Create a new configuration.
	///
	/// # Errors
	///
	/// Returns `InvalidParameters` unless
	/// `1 <= threshold <= committee_size <= total_nodes`.
	pub fn new(total_nodes: u32, committee_size: u32, threshold: u32) -> SharingResult<Self> {
		validate_protocol_params(threshold, committee_size, total_nodes)?;
		Ok(Self { n: total_nodes, k: committee_size, t: threshold })
	}

	/// Total number of nodes (N).
	#[inline]
	pub fn total_nodes(&self) -> u32 {
		self.n
	}

	/// Committee size (K): how many nodes nominate, and nominally how many
	/// hold shares each epoch.
	#[inline]
	pub fn committee_size(&self) -> u32 {
		self.k
	}

	/// Reconstruction threshold (T).
	#[inline]
	pub fn threshold(&self) -> u32 {
		self.t
	}
}

#[cfg(feature = "serde")]
impl serde::Serialize for ProtocolConfig {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		use serde::ser::SerializeStruct;
		let mut state = serializer.serialize_struct("ProtocolConfig", 3)?;
		state.serialize_field("total_nodes", &self.n)?;
		state.serialize_field("committee_size", &self.k)?;
		state.serialize_field("threshold", &self.t)?;
		state.end()
	}
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ProtocolConfig {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		use serde::Deserialize;

		#[derive(serde::Deserialize)]
		struct ConfigData {
			total_nodes: u32,
			committee_size: u32,
			threshold: u32,
		}

		let data = ConfigData::deserialize(deserializer)?;
		ProtocolConfig::new(data.total_nodes, data.committee_size, data.threshold)
			.map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_config_creation() {
		let config = ProtocolConfig::new(10, 5, 3).unwrap();
		assert_eq!(config.total_nodes(), 10);
		assert_eq!(config.committee_size(), 5);
		assert_eq!(config.threshold(), 3);
	}

	#[test]
	fn test_degenerate_single_node() {
		assert!(ProtocolConfig::new(1, 1, 1).is_ok());
	}

	#[test]
	fn test_invalid_orderings() {
		// T > K
		assert!(ProtocolConfig::new(10, 3, 5).is_err());
		// K > N
		assert!(ProtocolConfig::new(4, 5, 3).is_err());
		// T = 0
		assert!(ProtocolConfig::new(10, 5, 0).is_err());
	}
}
