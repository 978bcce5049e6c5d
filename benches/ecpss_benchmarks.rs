//! Benchmarks for the secret-sharing engine and the epoch protocol.
//!
//! Run with: `cargo bench`
//! Run specific benchmark: `cargo bench -- create_shares`

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::StdRng, SeedableRng};

use ecpss::{
	create_shares, reconstruct_secret, EcpssSimulator, MemorySink, ProtocolConfig,
};

/// Sharing configurations (threshold, total shares) exercised by the math
/// benchmarks.
const SHARING_CONFIGS: [(u32, u32); 4] = [(2, 3), (3, 5), (5, 8), (7, 10)];

fn bench_create_shares(c: &mut Criterion) {
	let mut group = c.benchmark_group("create_shares");
	let secret = b"benchmark bytes";

	for (t, n) in SHARING_CONFIGS {
		group.bench_with_input(BenchmarkId::from_parameter(format!("{}-of-{}", t, n)), &(t, n), |b, &(t, n)| {
			let mut rng = StdRng::seed_from_u64(1);
			b.iter(|| create_shares(black_box(secret), n, t, &mut rng).unwrap());
		});
	}
	group.finish();
}

fn bench_reconstruct_secret(c: &mut Criterion) {
	let mut group = c.benchmark_group("reconstruct_secret");
	let secret = b"benchmark bytes";

	for (t, n) in SHARING_CONFIGS {
		let mut rng = StdRng::seed_from_u64(2);
		let shares = create_shares(secret, n, t, &mut rng).unwrap();
		let subset = shares[..t as usize].to_vec();

		group.bench_with_input(BenchmarkId::from_parameter(format!("{}-of-{}", t, n)), &subset, |b, subset| {
			b.iter(|| reconstruct_secret(black_box(subset), t).unwrap());
		});
	}
	group.finish();
}

fn bench_epoch_handover(c: &mut Criterion) {
	c.bench_function("epoch_handover_3_of_3", |b| {
		b.iter(|| {
			let config = ProtocolConfig::new(3, 3, 2).unwrap();
			let rng = StdRng::seed_from_u64(3);
			let mut sim = EcpssSimulator::new(config, rng, MemorySink::new());

			sim.encrypt_secret(b"bench secret").unwrap();
			sim.keep_alive();
			black_box(sim.reconstruct_secret().unwrap())
		});
	});
}

criterion_group!(
	benches,
	bench_create_shares,
	bench_reconstruct_secret,
	bench_epoch_handover
);
criterion_main!(benches);
