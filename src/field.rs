//! Prime-field arithmetic for the secret-sharing engine.
//!
//! This module implements exact arithmetic in Z_p where p = 2^127 - 1, the
//! 127-bit Mersenne prime. Secrets, shares, and sub-shares are all residues
//! of this field; the Mersenne shape keeps multiplication exact without any
//! multi-precision dependency (256-bit products fold back with shifts).

use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand_core::{CryptoRng, RngCore};
use zeroize::Zeroize;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::{SharingError, SharingResult};

/// The field modulus p = 2^127 - 1.
pub const MODULUS: u128 = u128::MAX >> 1;

/// Maximum secret length in bytes that is always encodable below the modulus.
///
/// 15 bytes (120 bits) stay strictly below the 127-bit modulus for every bit
/// pattern. Longer secrets are rejected rather than silently truncated.
pub const MAX_SECRET_BYTES: usize = 15;

/// Element of Z_p where p = 2^127 - 1.
///
/// The value is always kept in canonical form, i.e. in `[0, p)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct FieldElement(u128);

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for FieldElement {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		use serde::Deserialize;

		let value = u128::deserialize(deserializer)?;
		if value >= MODULUS {
			return Err(serde::de::Error::custom(format!(
				"field element {} is not in canonical form [0, 2^127 - 1)",
				value
			)));
		}
		Ok(Self(value))
	}
}

impl Zeroize for FieldElement {
	fn zeroize(&mut self) {
		self.0.zeroize();
	}
}

impl FieldElement {
	/// Zero element.
	pub const ZERO: Self = Self(0);

	/// One element.
	pub const ONE: Self = Self(1);

	/// Create a new field element, reducing modulo p if necessary.
	pub fn new(val: u128) -> Self {
		Self(val % MODULUS)
	}

	/// Get the canonical value as u128.
	pub fn value(&self) -> u128 {
		self.0
	}

	/// Sample a uniform element of `[0, p)` from a cryptographically
	/// secure source.
	///
	/// Rejection sampling on the low 127 bits; only the all-ones pattern
	/// (p itself) is ever redrawn.
	pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
		loop {
			let mut buf = [0u8; 16];
			rng.fill_bytes(&mut buf);
			let candidate = u128::from_be_bytes(buf) & MODULUS;
			if candidate != MODULUS {
				return Self(candidate);
			}
		}
	}

	/// Encode a byte string as a field element (big-endian).
	///
	/// # Errors
	///
	/// Returns `SecretTooLarge` if the input exceeds [`MAX_SECRET_BYTES`];
	/// over-long input is never truncated.
	pub fn from_bytes(bytes: &[u8]) -> SharingResult<Self> {
		if bytes.len() > MAX_SECRET_BYTES {
			return Err(SharingError::SecretTooLarge {
				length: bytes.len(),
				max: MAX_SECRET_BYTES,
			});
		}

		let mut value: u128 = 0;
		for &b in bytes {
			value = (value << 8) | b as u128;
		}
		Ok(Self(value))
	}

	/// Decode back to the big-endian byte string.
	///
	/// Leading zero bytes are dropped, so the round trip preserves content
	/// but not leading NUL bytes.
	pub fn to_bytes(&self) -> Vec<u8> {
		let bytes = self.0.to_be_bytes();
		let first = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
		bytes[first..].to_vec()
	}

	/// Raise to the given power by square-and-multiply.
	pub fn pow(&self, mut exp: u128) -> Self {
		let mut base = *self;
		let mut acc = Self::ONE;
		while exp > 0 {
			if exp & 1 == 1 {
				acc *= base;
			}
			base *= base;
			exp >>= 1;
		}
		acc
	}

	/// Compute the multiplicative inverse via the extended Euclidean
	/// algorithm, with the Bezout coefficient tracked modulo p.
	///
	/// # Errors
	///
	/// Returns `NotInvertible` if gcd(self, p) != 1. For the prime modulus
	/// this only happens for zero, but the gcd is checked rather than
	/// assumed.
	pub fn inverse(&self) -> SharingResult<Self> {
		if self.0 == 0 {
			return Err(SharingError::NotInvertible { value: 0 });
		}

		// Invariant: self * old_s == old_r and self * s == r (mod p).
		let (mut old_r, mut r) = (self.0, MODULUS);
		let (mut old_s, mut s) = (1u128, 0u128);

		while r != 0 {
			let q = old_r / r;
			let next_r = old_r - q * r;
			old_r = r;
			r = next_r;

			let q_s = (Self(q % MODULUS) * Self(s)).0;
			let next_s = if old_s >= q_s { old_s - q_s } else { old_s + MODULUS - q_s };
			old_s = s;
			s = next_s;
		}

		if old_r != 1 {
			return Err(SharingError::NotInvertible { value: self.0 });
		}

		Ok(Self(old_s))
	}
}

impl Add for FieldElement {
	type Output = Self;

	fn add(self, other: Self) -> Self {
		let mut sum = self.0 + other.0;
		if sum >= MODULUS {
			sum -= MODULUS;
		}
		Self(sum)
	}
}

impl AddAssign for FieldElement {
	fn add_assign(&mut self, other: Self) {
		*self = *self + other;
	}
}

impl Sub for FieldElement {
	type Output = Self;

	fn sub(self, other: Self) -> Self {
		let diff =
			if self.0 >= other.0 { self.0 - other.0 } else { MODULUS - (other.0 - self.0) };
		Self(diff)
	}
}

impl SubAssign for FieldElement {
	fn sub_assign(&mut self, other: Self) {
		*self = *self - other;
	}
}

impl Mul for FieldElement {
	type Output = Self;

	fn mul(self, other: Self) -> Self {
		let (hi, lo) = mul_wide(self.0, other.0);
		Self(reduce_wide(hi, lo))
	}
}

impl MulAssign for FieldElement {
	fn mul_assign(&mut self, other: Self) {
		*self = *self * other;
	}
}

impl Neg for FieldElement {
	type Output = Self;

	fn neg(self) -> Self {
		if self.0 == 0 {
			Self::ZERO
		} else {
			Self(MODULUS - self.0)
		}
	}
}

/// Full 256-bit product of two u128 values, via 64-bit limbs.
fn mul_wide(a: u128, b: u128) -> (u128, u128) {
	const LO_MASK: u128 = (1 << 64) - 1;

	let (a_hi, a_lo) = (a >> 64, a & LO_MASK);
	let (b_hi, b_lo) = (b >> 64, b & LO_MASK);

	let ll = a_lo * b_lo;
	let lh = a_lo * b_hi;
	let hl = a_hi * b_lo;
	let hh = a_hi * b_hi;

	let (mid, mid_carry) = lh.overflowing_add(hl);
	let (lo, lo_carry) = ll.overflowing_add(mid << 64);
	let hi = hh + (mid >> 64) + ((mid_carry as u128) << 64) + lo_carry as u128;

	(hi, lo)
}

/// Fold a 256-bit product `hi * 2^128 + lo` into `[0, p)`.
///
/// Uses `2^127 == 1 (mod p)`: both factors are below p, so `hi < 2^126`
/// and the single fold plus one conditional subtraction is exact.
fn reduce_wide(hi: u128, lo: u128) -> u128 {
	let folded = ((hi << 1) | (lo >> 127)) + (lo & MODULUS);
	let mut r = (folded & MODULUS) + (folded >> 127);
	if r >= MODULUS {
		r -= MODULUS;
	}
	r
}
