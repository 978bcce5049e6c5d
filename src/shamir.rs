//! Polynomial secret sharing over the 127-bit Mersenne field.
//!
//! A secret is encoded as a field element, planted as the constant term of a
//! random polynomial of degree `threshold - 1`, and evaluated at the nonzero
//! points `1..=n` to produce shares. Any `threshold` shares recover the
//! constant term by Lagrange interpolation at x = 0; fewer reveal nothing
//! about it.
//!
//! The same [`lagrange_coefficient`] basis is used both for final
//! reconstruction here and for recombining sub-shares during committee
//! handover.

use std::collections::HashSet;

use rand_core::{CryptoRng, RngCore};
use zeroize::{Zeroize, ZeroizeOnDrop};

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{SharingError, SharingResult};
use crate::field::FieldElement;

/// A single share: the sharing polynomial evaluated at a nonzero index.
///
/// Index 0 is reserved for the secret itself and never appears in a share.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Share {
	/// The x-coordinate, in `{1..n}`.
	pub index: u32,
	/// The polynomial value at `index`.
	pub value: FieldElement,
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Share {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		use serde::Deserialize;

		#[derive(serde::Deserialize)]
		struct ShareData {
			index: u32,
			value: FieldElement,
		}

		let data = ShareData::deserialize(deserializer)?;
		if data.index == 0 {
			return Err(serde::de::Error::custom(
				"share index 0 is reserved for the secret",
			));
		}
		Ok(Share { index: data.index, value: data.value })
	}
}

impl Zeroize for Share {
	fn zeroize(&mut self) {
		self.index.zeroize();
		self.value.zeroize();
	}
}

/// Polynomial over the field, ordered from the constant term upward.
///
/// Coefficients are wiped on drop; the constant term is the shared secret
/// (or, during handover, a holder's current share value).
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Polynomial {
	coefficients: Vec<FieldElement>,
}

impl Polynomial {
	/// Build a polynomial of the given degree with a fixed constant term
	/// and uniformly random higher coefficients.
	pub fn random_with_constant<R: RngCore + CryptoRng>(
		constant: FieldElement,
		degree: u32,
		rng: &mut R,
	) -> Self {
		let mut coefficients = Vec::with_capacity(degree as usize + 1);
		coefficients.push(constant);
		for _ in 0..degree {
			coefficients.push(FieldElement::random(rng));
		}
		Self { coefficients }
	}

	/// Evaluate at `x` by Horner's method.
	pub fn evaluate(&self, x: FieldElement) -> FieldElement {
		let mut acc = FieldElement::ZERO;
		for &coefficient in self.coefficients.iter().rev() {
			acc = acc * x + coefficient;
		}
		acc
	}

	/// Degree of the polynomial (number of coefficients minus one).
	pub fn degree(&self) -> usize {
		self.coefficients.len().saturating_sub(1)
	}
}

/// Split a secret into `total_shares` shares with the given reconstruction
/// threshold.
///
/// The secret is encoded big-endian as the constant term of a random
/// polynomial of degree `threshold - 1`, evaluated at x = 1..=total_shares.
///
/// # Errors
///
/// * `InvalidParameters` unless `1 <= threshold <= total_shares`
/// * `SecretTooLarge` if the secret does not encode below the modulus
pub fn create_shares<R: RngCore + CryptoRng>(
	secret: &[u8],
	total_shares: u32,
	threshold: u32,
	rng: &mut R,
) -> SharingResult<Vec<Share>> {
	if threshold < 1 || threshold > total_shares {
		return Err(SharingError::InvalidParameters {
			threshold,
			parties: total_shares,
			reason: "threshold must be in 1..=total_shares",
		});
	}

	let constant = FieldElement::from_bytes(secret)?;
	let polynomial = Polynomial::random_with_constant(constant, threshold - 1, rng);

	Ok((1..=total_shares)
		.map(|index| Share { index, value: polynomial.evaluate(FieldElement::new(index as u128)) })
		.collect())
}

/// Recover the secret bytes from at least `threshold` shares.
///
/// # Errors
///
/// * `InsufficientShares` if fewer than `threshold` shares are given
/// * `DuplicateShareIndex` if two shares carry the same x-coordinate
pub fn reconstruct_secret(shares: &[Share], threshold: u32) -> SharingResult<Vec<u8>> {
	if (shares.len() as u32) < threshold {
		return Err(SharingError::InsufficientShares {
			available: shares.len() as u32,
			required: threshold,
		});
	}

	let mut seen = HashSet::new();
	for share in shares {
		if !seen.insert(share.index) {
			return Err(SharingError::DuplicateShareIndex { index: share.index });
		}
	}

	Ok(interpolate_at_zero(shares)?.to_bytes())
}

/// Lagrange basis coefficient at x = 0 for position `index` of the
/// evaluation points `xs`.
///
/// This single helper backs both secret reconstruction and sub-share
/// recombination during handover.
///
/// # Errors
///
/// * `PointOutOfBounds` if `index` does not name a point in `xs`
/// * `NotInvertible` if two evaluation points coincide (zero denominator)
pub fn lagrange_coefficient(xs: &[u32], index: usize) -> SharingResult<FieldElement> {
	let Some(&x) = xs.get(index) else {
		return Err(SharingError::PointOutOfBounds { index, points: xs.len() });
	};
	let x_i = FieldElement::new(x as u128);

	// Basis at zero: product over j != i of x_j / (x_j - x_i). The signs of
	// (0 - x_j) and (x_i - x_j) cancel pairwise.
	let mut numerator = FieldElement::ONE;
	let mut denominator = FieldElement::ONE;
	for (j, &x) in xs.iter().enumerate() {
		if j == index {
			continue;
		}
		let x_j = FieldElement::new(x as u128);
		numerator *= x_j;
		denominator *= x_j - x_i;
	}

	Ok(numerator * denominator.inverse()?)
}

/// Interpolate the polynomial through `shares` at x = 0.
fn interpolate_at_zero(shares: &[Share]) -> SharingResult<FieldElement> {
	let xs: Vec<u32> = shares.iter().map(|s| s.index).collect();

	let mut acc = FieldElement::ZERO;
	for (i, share) in shares.iter().enumerate() {
		acc += lagrange_coefficient(&xs, i)? * share.value;
	}
	Ok(acc)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::{rngs::StdRng, SeedableRng};

	#[test]
	fn test_evaluate_matches_direct() {
		// f(x) = 5 + 3x at x = 2 is 11
		let poly = Polynomial {
			coefficients: vec![FieldElement::new(5), FieldElement::new(3)],
		};
		assert_eq!(poly.evaluate(FieldElement::new(2)), FieldElement::new(11));

		// f(x) = 1 + 2x + 3x^2 at x = 4 is 57
		let poly = Polynomial {
			coefficients: vec![FieldElement::new(1), FieldElement::new(2), FieldElement::new(3)],
		};
		assert_eq!(poly.evaluate(FieldElement::new(4)), FieldElement::new(57));
	}

	#[test]
	fn test_hello_scenario() {
		let mut rng = StdRng::seed_from_u64(1);

		let shares = create_shares(b"HELLO", 5, 3, &mut rng).unwrap();
		assert_eq!(shares.len(), 5);
		let indices: Vec<u32> = shares.iter().map(|s| s.index).collect();
		assert_eq!(indices, vec![1, 2, 3, 4, 5]);

		// Any threshold-sized subset recovers the secret
		let recovered = reconstruct_secret(&shares[..3], 3).unwrap();
		assert_eq!(recovered, b"HELLO");

		let recovered = reconstruct_secret(&shares[2..], 3).unwrap();
		assert_eq!(recovered, b"HELLO");

		// One share short is refused
		let err = reconstruct_secret(&shares[..2], 3).unwrap_err();
		assert_eq!(err, SharingError::InsufficientShares { available: 2, required: 3 });
	}

	#[test]
	fn test_round_trip_various_parameters() {
		let mut rng = StdRng::seed_from_u64(2);

		for (n, t) in [(1, 1), (3, 1), (5, 3), (5, 5), (10, 7)] {
			let secret = b"epoch custody";
			let shares = create_shares(secret, n, t, &mut rng).unwrap();
			let recovered = reconstruct_secret(&shares[..t as usize], t).unwrap();
			assert_eq!(recovered, secret, "n = {}, t = {}", n, t);
		}
	}

	#[test]
	fn test_below_threshold_interpolation_misses() {
		let mut rng = StdRng::seed_from_u64(3);

		let secret = b"TOP";
		let encoded = FieldElement::from_bytes(secret).unwrap();
		let shares = create_shares(secret, 5, 3, &mut rng).unwrap();

		// Interpolating a strict subset lands elsewhere in the field
		let partial = interpolate_at_zero(&shares[..2]).unwrap();
		assert_ne!(partial, encoded);
	}

	#[test]
	fn test_duplicate_index_rejected() {
		let duplicated = vec![
			Share { index: 1, value: FieldElement::new(10) },
			Share { index: 1, value: FieldElement::new(20) },
			Share { index: 2, value: FieldElement::new(30) },
		];
		let err = reconstruct_secret(&duplicated, 3).unwrap_err();
		assert_eq!(err, SharingError::DuplicateShareIndex { index: 1 });
	}

	#[test]
	fn test_invalid_parameters() {
		let mut rng = StdRng::seed_from_u64(4);

		assert!(create_shares(b"x", 5, 0, &mut rng).is_err());
		assert!(create_shares(b"x", 3, 4, &mut rng).is_err());
	}

	#[test]
	fn test_lagrange_coefficients_sum_to_one() {
		// Interpolating the constant polynomial f(x) = c gives c back, so
		// the basis coefficients at any point set must sum to one.
		let xs = [1u32, 2, 4, 7];
		let mut sum = FieldElement::ZERO;
		for i in 0..xs.len() {
			sum += lagrange_coefficient(&xs, i).unwrap();
		}
		assert_eq!(sum, FieldElement::ONE);
	}

	#[test]
	fn test_lagrange_index_out_of_bounds() {
		let xs = [1u32, 2, 3];
		let err = lagrange_coefficient(&xs, 3).unwrap_err();
		assert_eq!(err, SharingError::PointOutOfBounds { index: 3, points: 3 });

		let err = lagrange_coefficient(&[], 0).unwrap_err();
		assert_eq!(err, SharingError::PointOutOfBounds { index: 0, points: 0 });
	}

	#[cfg(feature = "serde")]
	#[test]
	fn test_share_deserialize_validates_index() {
		let share = Share { index: 3, value: FieldElement::new(77) };
		let json = serde_json::to_string(&share).unwrap();
		assert_eq!(serde_json::from_str::<Share>(&json).unwrap(), share);

		// Index 0 would alias the secret itself
		assert!(serde_json::from_str::<Share>(r#"{"index":0,"value":7}"#).is_err());
		// Non-canonical value refused via the field element
		let oversized = format!(r#"{{"index":1,"value":{}}}"#, u128::MAX);
		assert!(serde_json::from_str::<Share>(&oversized).is_err());
	}

	#[test]
	fn test_threshold_one_is_constant() {
		let mut rng = StdRng::seed_from_u64(5);

		// Degree-zero polynomial: every share carries the secret itself
		let shares = create_shares(b"k", 4, 1, &mut rng).unwrap();
		let encoded = FieldElement::from_bytes(b"k").unwrap();
		for share in &shares {
			assert_eq!(share.value, encoded);
		}
	}
}
