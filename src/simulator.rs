//! Epoch orchestrator for the committee-election protocol.
//!
//! [`EcpssSimulator`] owns the node arena and drives the protocol state
//! machine: idle (epoch 0, nothing in custody), entered into epoch 1 by
//! [`encrypt_secret`](EcpssSimulator::encrypt_secret), advanced one epoch
//! per [`keep_alive`](EcpssSimulator::keep_alive) by electing a fresh
//! committee and handing custody over through sub-shares, and returned to
//! idle by [`reconstruct_secret`](EcpssSimulator::reconstruct_secret).
//!
//! The secret is never assembled at any non-terminal step: handover moves
//! custody by re-splitting each held share and Lagrange-recombining the
//! pieces at the incoming seats.
//!
//! All randomness flows through the injected RNG capability and every
//! observable transition is reported through the injected [`LogSink`].

use std::collections::BTreeMap;

use rand_core::{CryptoRng, RngCore};

use crate::config::ProtocolConfig;
use crate::error::{SharingError, SharingResult};
use crate::field::FieldElement;
use crate::log::{LogSink, Severity};
use crate::node::{Node, NodeId};
use crate::shamir::{self, Share};

/// Single-process simulation of Electing Committees Proactive Secret
/// Sharing.
///
/// # Example
///
/// ```
/// use ecpss::{EcpssSimulator, MemorySink, ProtocolConfig};
/// use rand::{rngs::StdRng, SeedableRng};
///
/// let config = ProtocolConfig::new(3, 3, 2).expect("valid parameters");
/// let rng = StdRng::seed_from_u64(1);
/// let mut sim = EcpssSimulator::new(config, rng, MemorySink::new());
///
/// sim.encrypt_secret(b"custody").expect("sharing succeeds");
/// sim.keep_alive();
/// let secret = sim.reconstruct_secret().expect("enough shares survive");
/// assert_eq!(secret, b"custody");
/// ```
pub struct EcpssSimulator<R, S> {
	config: ProtocolConfig,
	nodes: BTreeMap<NodeId, Node>,
	epoch: u64,
	rng: R,
	sink: S,
}

impl<R: RngCore + CryptoRng, S: LogSink> EcpssSimulator<R, S> {
	/// Create an idle simulator with nodes `1..=N` and no secret in
	/// custody.
	pub fn new(config: ProtocolConfig, rng: R, sink: S) -> Self {
		let nodes = Self::fresh_arena(config.total_nodes());
		Self { config, nodes, epoch: 0, rng, sink }
	}

	/// Report the configured parameters through the log sink.
	pub fn initialize(&mut self) {
		self.sink.log(
			&format!(
				"Configured with {} nodes, committee size {}, threshold {}",
				self.config.total_nodes(),
				self.config.committee_size(),
				self.config.threshold()
			),
			Severity::Info,
		);
	}

	/// Split a secret into committee shares and distribute them to a
	/// freshly elected holding committee. Enters epoch 1.
	///
	/// # Errors
	///
	/// * `EmptySecret` for empty or all-whitespace input
	/// * `SecretTooLarge` if the secret does not encode below the modulus
	pub fn encrypt_secret(&mut self, secret: &[u8]) -> SharingResult<()> {
		if secret.is_empty() || secret.iter().all(u8::is_ascii_whitespace) {
			self.sink.log("Cannot share an empty secret", Severity::Error);
			return Err(SharingError::EmptySecret);
		}

		let shares = match shamir::create_shares(
			secret,
			self.config.committee_size(),
			self.config.threshold(),
			&mut self.rng,
		) {
			Ok(shares) => shares,
			Err(e) => {
				self.sink.log(&format!("Sharing failed: {}", e), Severity::Error);
				return Err(e);
			},
		};

		// Start from a clean arena in case a secret was already in custody.
		self.nodes = Self::fresh_arena(self.config.total_nodes());

		let holders = self.run_election();
		let mut assigned = 0u32;
		for (share, holder_id) in shares.into_iter().zip(holders.iter()) {
			// Extra shares or extra holders fall off the end of the zip and
			// stay unassigned.
			let Some(node) = self.nodes.get_mut(holder_id) else { continue };
			if node.holds_share() {
				self.sink.log(
					&format!("Node {} nominated more than once; surplus share dropped", holder_id),
					Severity::Warning,
				);
				continue;
			}
			node.receive_share(share);
			assigned += 1;
		}

		self.epoch = 1;
		self.sink.log(
			&format!(
				"Epoch 1: distributed {} of {} shares to the elected committee",
				assigned,
				self.config.committee_size()
			),
			Severity::Success,
		);
		Ok(())
	}

	/// Advance one epoch: elect a new committee and hand custody over
	/// without reconstructing the secret.
	///
	/// Safe to call while idle (logs a warning and does nothing). Handover
	/// is also skipped, with the old committee left in place, when fewer
	/// than `threshold` holders survive, so a later reconstruction attempt
	/// still sees whatever custody remains.
	pub fn keep_alive(&mut self) {
		if self.epoch == 0 {
			self.sink.log("Keep-alive ignored: no secret in custody", Severity::Warning);
			return;
		}

		let new_holders = self.run_election();
		if new_holders.is_empty() {
			self.sink.log("Election produced no holders; handover skipped", Severity::Warning);
			return;
		}

		// Outgoing committee, ordered by share x-coordinate.
		let mut old_holders: Vec<(NodeId, u32)> = self
			.nodes
			.values()
			.filter_map(|node| node.share().map(|share| (node.id(), share.index)))
			.collect();
		old_holders.sort_by_key(|&(_, index)| index);

		if old_holders.is_empty() {
			self.sink.log("No node holds a share; handover skipped", Severity::Warning);
			return;
		}

		let threshold = self.config.threshold();
		if (old_holders.len() as u32) < threshold {
			self.sink.log(
				&format!(
					"Only {} holders remain but {} are needed; handover skipped",
					old_holders.len(),
					threshold
				),
				Severity::Error,
			);
			return;
		}

		// Every outgoing holder re-splits its share, one sub-share per
		// incoming seat.
		let seats = new_holders.len() as u32;
		let mut sub_shares: Vec<(u32, Vec<FieldElement>)> = Vec::with_capacity(old_holders.len());
		for &(id, index) in &old_holders {
			match self.nodes[&id].create_sub_shares(seats, threshold, &mut self.rng) {
				Ok(subs) => sub_shares.push((index, subs)),
				Err(e) => {
					self.sink.log(&format!("Handover aborted: {}", e), Severity::Error);
					return;
				},
			}
		}

		// Only now is the outgoing node set discarded: every sub-share
		// already exists, so a failure below cannot strand the secret.
		self.nodes = Self::fresh_arena(self.config.total_nodes());

		let used = threshold as usize;
		let old_indices: Vec<u32> = sub_shares.iter().take(used).map(|(index, _)| *index).collect();

		let mut assigned = 0u32;
		for (k, &holder_id) in new_holders.iter().enumerate() {
			let seat = k as u32 + 1;
			let values: Vec<FieldElement> =
				sub_shares.iter().take(used).map(|(_, subs)| subs[k]).collect();

			let Some(node) = self.nodes.get_mut(&holder_id) else { continue };
			if node.holds_share() {
				self.sink.log(
					&format!("Node {} nominated more than once; seat {} left empty", holder_id, seat),
					Severity::Warning,
				);
				continue;
			}
			if let Err(e) = node.recombine_sub_shares(seat, &values, &old_indices) {
				self.sink.log(&format!("Seat {} recombination failed: {}", seat, e), Severity::Error);
				continue;
			}
			assigned += 1;
		}

		self.epoch += 1;
		self.sink.log(
			&format!("Epoch {}: custody handed to a committee of {}", self.epoch, assigned),
			Severity::Success,
		);
	}

	/// Gather all held shares and reconstruct the secret.
	///
	/// Both on success and on failure every node is reset and the protocol
	/// returns to idle (epoch 0).
	///
	/// # Errors
	///
	/// Returns `InsufficientShares` when fewer than `threshold` shares
	/// survive.
	pub fn reconstruct_secret(&mut self) -> SharingResult<Vec<u8>> {
		let shares: Vec<Share> =
			self.nodes.values().filter_map(|node| node.share().cloned()).collect();
		let threshold = self.config.threshold();

		let result = if (shares.len() as u32) < threshold {
			self.sink.log(
				&format!(
					"Reconstruction failed: {} shares held, {} required",
					shares.len(),
					threshold
				),
				Severity::Error,
			);
			Err(SharingError::InsufficientShares {
				available: shares.len() as u32,
				required: threshold,
			})
		} else {
			match shamir::reconstruct_secret(&shares, threshold) {
				Ok(secret) => {
					self.sink.log(
						&format!("Secret reconstructed from {} shares", shares.len()),
						Severity::Success,
					);
					Ok(secret)
				},
				Err(e) => {
					self.sink.log(&format!("Reconstruction failed: {}", e), Severity::Error);
					Err(e)
				},
			}
		};

		for node in self.nodes.values_mut() {
			node.reset();
		}
		self.epoch = 0;
		self.sink.log("Protocol reset: epoch 0, no secret in custody", Severity::Info);

		result
	}

	/// Current epoch; 0 means idle with nothing in custody.
	#[inline]
	pub fn current_epoch(&self) -> u64 {
		self.epoch
	}

	/// The configuration fixed at construction.
	#[inline]
	pub fn config(&self) -> &ProtocolConfig {
		&self.config
	}

	/// Iterate over all nodes in id order.
	pub fn nodes(&self) -> impl Iterator<Item = &Node> {
		self.nodes.values()
	}

	/// Look up a single node by id.
	pub fn node(&self, id: NodeId) -> Option<&Node> {
		self.nodes.get(&id)
	}

	/// The injected log sink.
	pub fn sink(&self) -> &S {
		&self.sink
	}

	/// Run one two-phase election and return the nominated holders in
	/// election (nominator id) order, duplicates included.
	///
	/// Phase one draws every node's election value; only then does phase
	/// two evaluate nominations, since the cutoff depends on the full value
	/// set.
	fn run_election(&mut self) -> Vec<NodeId> {
		for node in self.nodes.values_mut() {
			node.generate_election_value(&mut self.rng);
		}

		let ids: Vec<NodeId> = self.nodes.keys().copied().collect();
		let all_values: Vec<f64> = self.nodes.values().filter_map(Node::election_value).collect();

		let mut holders = Vec::new();
		for id in &ids {
			let Some(node) = self.nodes.get(id) else { continue };
			if let Some(choice) = node.check_and_nominate(
				&all_values,
				self.config.committee_size(),
				&ids,
				&mut self.rng,
			) {
				holders.push(choice);
			}
		}

		self.sink.log(
			&format!("Election complete: {} holders nominated", holders.len()),
			Severity::Info,
		);
		holders
	}

	fn fresh_arena(total_nodes: u32) -> BTreeMap<NodeId, Node> {
		(1..=total_nodes).map(|id| (id, Node::new(id))).collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::log::MemorySink;
	use rand::{rngs::StdRng, SeedableRng};

	fn simulator(n: u32, k: u32, t: u32, seed: u64) -> EcpssSimulator<StdRng, MemorySink> {
		let config = ProtocolConfig::new(n, k, t).unwrap();
		EcpssSimulator::new(config, StdRng::seed_from_u64(seed), MemorySink::new())
	}

	#[test]
	fn test_starts_idle() {
		let sim = simulator(5, 3, 2, 1);
		assert_eq!(sim.current_epoch(), 0);
		assert_eq!(sim.nodes().count(), 5);
		assert!(sim.nodes().all(|n| !n.holds_share()));
	}

	#[test]
	fn test_empty_secret_rejected() {
		let mut sim = simulator(5, 3, 2, 2);

		assert_eq!(sim.encrypt_secret(b"").unwrap_err(), SharingError::EmptySecret);
		assert_eq!(sim.encrypt_secret(b"  \t\n").unwrap_err(), SharingError::EmptySecret);
		assert_eq!(sim.current_epoch(), 0);
		assert!(sim.sink().has_severity(Severity::Error));
	}

	#[test]
	fn test_keep_alive_while_idle_warns() {
		let mut sim = simulator(5, 3, 2, 3);
		sim.keep_alive();

		assert_eq!(sim.current_epoch(), 0);
		let warned = sim
			.sink()
			.entries()
			.iter()
			.any(|(m, s)| *s == Severity::Warning && m.contains("no secret in custody"));
		assert!(warned);
	}

	#[test]
	fn test_encrypt_enters_epoch_one() {
		let mut sim = simulator(5, 3, 2, 4);
		sim.encrypt_secret(b"hold this").unwrap();

		assert_eq!(sim.current_epoch(), 1);
		let holders = sim.nodes().filter(|n| n.holds_share()).count();
		assert!(holders >= 1 && holders <= 3);
	}

	#[test]
	fn test_node_lookup() {
		let sim = simulator(4, 2, 1, 5);
		assert_eq!(sim.node(1).map(Node::id), Some(1));
		assert_eq!(sim.node(4).map(Node::id), Some(4));
		assert!(sim.node(0).is_none());
		assert!(sim.node(5).is_none());
	}

	#[test]
	fn test_initialize_logs_parameters() {
		let mut sim = simulator(10, 5, 3, 6);
		sim.initialize();

		let (message, severity) = &sim.sink().entries()[0];
		assert_eq!(*severity, Severity::Info);
		assert!(message.contains("10"));
		assert!(message.contains('5'));
		assert!(message.contains('3'));
	}

	#[test]
	fn test_reconstruct_resets_to_idle() {
		let mut sim = simulator(2, 2, 2, 7);
		sim.encrypt_secret(b"cycle").unwrap();

		let secret = sim.reconstruct_secret().unwrap();
		assert_eq!(secret, b"cycle");
		assert_eq!(sim.current_epoch(), 0);
		assert!(sim.nodes().all(|n| !n.holds_share() && n.election_value().is_none()));

		// Nothing left in custody: a second attempt reports insufficiency
		let err = sim.reconstruct_secret().unwrap_err();
		assert_eq!(err, SharingError::InsufficientShares { available: 0, required: 2 });
	}
}
