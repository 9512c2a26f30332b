//! Decode throughput benchmark.
//!
//! Measures:
//! 1. Tree hashing of a full NFT puzzle (SHA-256 and BLAKE3)
//! 2. Single decode, with and without the ownership layer
//! 3. Parallel batch decode

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use nft_layers::{curry, tree_hash, HashAlgorithm, LayerReferences, NftDecoder, Tree};

fn module(name: &str) -> Tree {
    Tree::list([Tree::atom("mod"), Tree::atom(name)])
}

fn decoder() -> NftDecoder {
    NftDecoder::new(LayerReferences::from_modules(
        HashAlgorithm::Sha256,
        &module("singleton_top_layer_v1_1"),
        &module("nft_state_layer"),
        &module("nft_ownership_layer"),
    ))
}

/// Build a synthetic NFT puzzle with `uris` data URIs.
fn synthetic_nft(seed: u8, uris: usize, with_ownership: bool) -> Tree {
    let singleton_struct = Tree::pair(
        Tree::atom(tree_hash(&module("singleton_top_layer_v1_1")).0),
        Tree::pair(Tree::atom([seed; 32]), Tree::atom([0x02; 32])),
    );
    let metadata = Tree::list([
        Tree::pair(
            Tree::atom("u"),
            Tree::list((0..uris).map(|i| Tree::atom(format!("https://nft.example/{}/{}", seed, i)))),
        ),
        Tree::pair(Tree::atom("h"), Tree::atom([0xaa; 32])),
        Tree::pair(Tree::atom("sn"), Tree::int(i64::from(seed))),
        Tree::pair(Tree::atom("st"), Tree::int(255)),
    ]);
    let p2 = curry(module("p2_delegated"), [Tree::atom([0x03; 48])]);
    let inner = if with_ownership {
        let transfer = curry(
            module("transfer_program"),
            [
                singleton_struct.clone(),
                Tree::atom([0xee; 32]),
                Tree::int(300),
                Tree::atom([0x01; 32]),
                Tree::atom([0x02; 32]),
            ],
        );
        let ownership_inner = curry(module("ownership_inner"), [Tree::nil(), Tree::nil(), p2]);
        curry(
            module("nft_ownership_layer"),
            [Tree::nil(), transfer, ownership_inner],
        )
    } else {
        p2
    };
    let state = curry(
        module("nft_state_layer"),
        [
            Tree::atom(tree_hash(&module("nft_state_layer")).0),
            metadata,
            Tree::atom([0x0f; 32]),
            inner,
        ],
    );
    curry(module("singleton_top_layer_v1_1"), [singleton_struct, state])
}

/// Benchmark: fingerprinting a full puzzle.
fn bench_tree_hash(c: &mut Criterion) {
    let puzzle = synthetic_nft(1, 16, true);

    let mut group = c.benchmark_group("tree_hash");
    group.bench_function("sha256", |b| {
        b.iter(|| HashAlgorithm::Sha256.tree_hash(black_box(&puzzle)))
    });
    group.bench_function("blake3", |b| {
        b.iter(|| HashAlgorithm::Blake3.tree_hash(black_box(&puzzle)))
    });
    group.finish();
}

/// Benchmark: one decode per iteration.
fn bench_decode(c: &mut Criterion) {
    let decoder = decoder();
    let plain = synthetic_nft(1, 4, false);
    let owned = synthetic_nft(1, 4, true);

    let mut group = c.benchmark_group("decode");
    group.bench_function("without_ownership", |b| {
        b.iter(|| decoder.decode(black_box(&plain)))
    });
    group.bench_function("with_ownership", |b| {
        b.iter(|| decoder.decode(black_box(&owned)))
    });
    group.bench_function("not_an_nft", |b| {
        let puzzle = curry(module("cat_v2"), [Tree::nil(), Tree::nil()]);
        b.iter(|| decoder.try_decode(black_box(&puzzle)))
    });
    group.finish();
}

/// Benchmark: parallel batch decode of 256 puzzles.
fn bench_decode_batch(c: &mut Criterion) {
    let decoder = decoder();
    let puzzles: Vec<Tree> = (0..=255u8)
        .map(|seed| synthetic_nft(seed, 4, seed % 2 == 0))
        .collect();

    c.bench_function("decode_batch_256", |b| {
        b.iter(|| decoder.decode_batch(black_box(&puzzles)))
    });
}

criterion_group!(benches, bench_tree_hash, bench_decode, bench_decode_batch);
criterion_main!(benches);
