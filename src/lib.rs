//! # Electing Committees Proactive Secret Sharing (ECPSS)
//!
//! This crate implements a threshold secret-sharing engine together with an
//! epoch-based committee-resharing protocol: a secret is split so that no
//! single party holds it, custody rotates each epoch to a freshly elected
//! committee without the secret ever being reassembled in between, and the
//! secret is only reconstructed on an explicit trigger.
//!
//! ## Overview
//!
//! * [`field`] — exact modular arithmetic over the Mersenne prime
//!   p = 2^127 - 1.
//! * [`shamir`] — polynomial secret splitting and Lagrange interpolation.
//! * [`node`] — participant state: election draws, share custody,
//!   sub-sharing and recombination for handover.
//! * [`simulator`] — the epoch orchestrator driving elections, initial
//!   distribution, handovers, and final reconstruction.
//!
//! The whole protocol runs single-threaded inside one process; the three
//! external triggers (`encrypt_secret`, `keep_alive`, `reconstruct_secret`)
//! are serialized and each runs to completion.
//!
//! ## Usage
//!
//! ```
//! use ecpss::{EcpssSimulator, ProtocolConfig, TracingSink};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // 3 nodes, committees of 3, any 2 shares reconstruct
//! let config = ProtocolConfig::new(3, 3, 2).expect("valid parameters");
//! let rng = StdRng::seed_from_u64(42); // use OsRng outside of examples
//! let mut sim = EcpssSimulator::new(config, rng, TracingSink);
//!
//! sim.initialize();
//! sim.encrypt_secret(b"launch code").expect("secret accepted");
//!
//! // Each keep-alive hands custody to a newly elected committee.
//! sim.keep_alive();
//! sim.keep_alive();
//!
//! let secret = sim.reconstruct_secret().expect("threshold met");
//! assert_eq!(secret, b"launch code");
//! ```
//!
//! ## Warning
//!
//! **This is a single-process simulation for research and demonstration.**
//! It provides information-theoretic secrecy of the sharing itself but no
//! network transport, no persistence, and no protection against malicious
//! participants.

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod field;
pub mod log;
pub mod node;
pub mod shamir;
pub mod simulator;

pub use config::ProtocolConfig;
pub use error::{SharingError, SharingResult};
pub use field::{FieldElement, MAX_SECRET_BYTES, MODULUS};
pub use log::{LogSink, MemorySink, Severity, TracingSink};
pub use node::{Node, NodeId};
pub use shamir::{create_shares, lagrange_coefficient, reconstruct_secret, Polynomial, Share};
pub use simulator::EcpssSimulator;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_modulus_is_mersenne() {
		assert_eq!(MODULUS, (1u128 << 127) - 1);
		assert_eq!(MAX_SECRET_BYTES * 8, 120);
	}
}
