// Key derivation benchmarks for the identity layer.
//
// Covers mnemonic parsing, seed stretching (PBKDF2, the slowest step), the
// three mnemonic-to-key paths, legacy entropy recovery, and entity id
// parsing with checksum validation.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use hiero_identity::{AccountId, LedgerId, Mnemonic, PrivateKey};

const PHRASE: &str = "abandon abandon abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon abandon abandon abandon \
                      abandon abandon abandon abandon abandon abandon abandon art";

fn bench_mnemonic_parse(c: &mut Criterion) {
    c.bench_function("mnemonic/parse_24", |b| {
        b.iter(|| Mnemonic::parse(PHRASE).unwrap());
    });
}

fn bench_seed(c: &mut Criterion) {
    let mnemonic = Mnemonic::parse(PHRASE).unwrap();

    c.bench_function("mnemonic/to_seed", |b| {
        b.iter(|| mnemonic.to_seed("").unwrap());
    });
}

fn bench_key_paths(c: &mut Criterion) {
    let mnemonic = Mnemonic::parse(PHRASE).unwrap();
    let legacy = Mnemonic::from_legacy_entropy(&[0x5a; 32]);

    c.bench_function("derive/ed25519_account", |b| {
        b.iter(|| mnemonic.to_private_key("").unwrap());
    });
    c.bench_function("derive/ecdsa_index_0", |b| {
        b.iter(|| mnemonic.to_standard_ecdsa_private_key("", 0).unwrap());
    });
    c.bench_function("derive/legacy_entropy", |b| {
        b.iter(|| legacy.to_private_key("").unwrap());
    });
}

fn bench_child_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("derive/ecdsa_path_depth");
    let seed = Mnemonic::parse(PHRASE).unwrap().to_seed("").unwrap();
    let master = PrivateKey::from_seed_ecdsa(&seed[..]).unwrap();

    for depth in [1usize, 5, 10] {
        let path: Vec<u32> = (0..depth as u32).collect();
        group.throughput(Throughput::Elements(depth as u64));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &path, |b, path| {
            b.iter(|| master.derive_path(path).unwrap());
        });
    }

    group.finish();
}

fn bench_entity_id(c: &mut Criterion) {
    c.bench_function("entity/parse_and_validate", |b| {
        b.iter(|| {
            let id: AccountId = "0.0.1001-urkbk".parse().unwrap();
            id.validate_checksum(&LedgerId::MAINNET).unwrap();
        });
    });
}

criterion_group!(
    benches,
    bench_mnemonic_parse,
    bench_seed,
    bench_key_paths,
    bench_child_depth,
    bench_entity_id,
);
criterion_main!(benches);
