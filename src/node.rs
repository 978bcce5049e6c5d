//! Participant state for the committee-election protocol.
//!
//! A [`Node`] is one simulated participant: it holds at most one share at a
//! time, draws one random election value per epoch, and can re-split its
//! share into sub-shares for custody handover or recombine sub-shares
//! received from the outgoing committee into its own new share.
//!
//! Nodes live in an arena owned by the orchestrator; all mutation goes
//! through these methods, which keeps the one-share-per-node invariant
//! checkable in one place.

use rand::Rng;
use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

use crate::error::{SharingError, SharingResult};
use crate::field::FieldElement;
use crate::shamir::{lagrange_coefficient, Polynomial, Share};

/// Identifier of a simulated node, in `1..=N`.
pub type NodeId = u32;

/// One simulated participant.
#[derive(Debug, Clone)]
pub struct Node {
	id: NodeId,
	election_value: Option<f64>,
	share: Option<Share>,
}

impl Node {
	/// Create a node with no share and no election value.
	pub fn new(id: NodeId) -> Self {
		Self { id, election_value: None, share: None }
	}

	/// This node's identifier.
	#[inline]
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// The election value drawn this epoch, if any.
	#[inline]
	pub fn election_value(&self) -> Option<f64> {
		self.election_value
	}

	/// The currently held share, if any.
	#[inline]
	pub fn share(&self) -> Option<&Share> {
		self.share.as_ref()
	}

	/// Whether this node currently holds a share.
	#[inline]
	pub fn holds_share(&self) -> bool {
		self.share.is_some()
	}

	/// Draw and store this epoch's election value, uniform in `[0, 1)`.
	///
	/// Every node must draw before any node nominates: the nomination
	/// cutoff depends on the full set of values.
	pub fn generate_election_value<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> f64 {
		let value = rng.gen::<f64>();
		self.election_value = Some(value);
		value
	}

	/// Decide whether this node nominates a share holder this epoch, and if
	/// so which one.
	///
	/// The cutoff is the `committee_size`-th smallest value among
	/// `all_values`. A node at or below the cutoff is a nominator and picks
	/// one holder uniformly from `available_ids` excluding itself, falling
	/// back to itself when no other candidate exists. Ties at the cutoff can
	/// enlarge the nominator set; that behavior is kept as specified rather
	/// than broken by an arbitrary tie-break.
	///
	/// Returns `None` if this node has not drawn a value, or did not make
	/// the cutoff.
	pub fn check_and_nominate<R: RngCore + CryptoRng>(
		&self,
		all_values: &[f64],
		committee_size: u32,
		available_ids: &[NodeId],
		rng: &mut R,
	) -> Option<NodeId> {
		let own = self.election_value?;
		if committee_size == 0 || all_values.is_empty() {
			return None;
		}

		let mut sorted = all_values.to_vec();
		sorted.sort_by(f64::total_cmp);
		let cutoff = sorted[(committee_size as usize).min(sorted.len()) - 1];

		if own > cutoff {
			return None;
		}

		let candidates: Vec<NodeId> =
			available_ids.iter().copied().filter(|&id| id != self.id).collect();
		if candidates.is_empty() {
			Some(self.id)
		} else {
			Some(candidates[rng.gen_range(0..candidates.len())])
		}
	}

	/// Re-split the held share for handover: build a fresh random polynomial
	/// whose constant term is the current share value and evaluate it at
	/// `1..=num_seats`, one sub-share per incoming committee seat.
	///
	/// # Errors
	///
	/// Returns `NoShareHeld` if this node holds nothing.
	pub fn create_sub_shares<R: RngCore + CryptoRng>(
		&self,
		num_seats: u32,
		threshold: u32,
		rng: &mut R,
	) -> SharingResult<Vec<FieldElement>> {
		let share = self.share.as_ref().ok_or(SharingError::NoShareHeld { node_id: self.id })?;

		let polynomial =
			Polynomial::random_with_constant(share.value, threshold.saturating_sub(1), rng);
		Ok((1..=num_seats)
			.map(|seat| polynomial.evaluate(FieldElement::new(seat as u128)))
			.collect())
	}

	/// Combine one sub-share from each outgoing holder into this node's new
	/// share at `seat_index`.
	///
	/// `sub_values[j]` is the sub-share this seat received from the old
	/// holder whose share sat at x = `old_indices[j]`. The Lagrange-weighted
	/// sum reproduces the value of the original sharing polynomial at
	/// `seat_index`, so custody moves without the secret ever being
	/// assembled.
	///
	/// # Errors
	///
	/// * `ShareCountMismatch` if the two slices differ in length
	/// * `NotInvertible` if `old_indices` contains a repeated x-coordinate
	pub fn recombine_sub_shares(
		&mut self,
		seat_index: u32,
		sub_values: &[FieldElement],
		old_indices: &[u32],
	) -> SharingResult<()> {
		if sub_values.len() != old_indices.len() {
			return Err(SharingError::ShareCountMismatch {
				expected: old_indices.len(),
				actual: sub_values.len(),
			});
		}

		let mut value = FieldElement::ZERO;
		for (j, &sub_value) in sub_values.iter().enumerate() {
			value += lagrange_coefficient(old_indices, j)? * sub_value;
		}

		self.share = Some(Share { index: seat_index, value });
		Ok(())
	}

	/// Place a share in this node's custody.
	pub fn receive_share(&mut self, share: Share) {
		self.share = Some(share);
	}

	/// Move the held share to another node.
	///
	/// Returns false (and does nothing) if this node holds no share.
	pub fn transfer_share_to(&mut self, other: &mut Node) -> bool {
		match self.share.take() {
			Some(share) => {
				other.share = Some(share);
				true
			},
			None => false,
		}
	}

	/// Clear the election value and wipe the held share.
	pub fn reset(&mut self) {
		self.election_value = None;
		if let Some(mut share) = self.share.take() {
			share.zeroize();
		}
	}
}
