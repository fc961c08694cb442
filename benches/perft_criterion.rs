use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use zh_chess::game_state::game_state::GameState;
use zh_chess::move_generation::legal_move_generator::LegalMoveGenerator;
use zh_chess::move_generation::perft::perft;

#[derive(Clone, Copy)]
struct BenchCase {
    name: &'static str,
    fen: &'static str,
    /// Known node counts per depth; empty when the case is timed only.
    expected_nodes: &'static [u64],
    max_depth: u8,
}

const CASES: &[BenchCase] = &[
    BenchCase {
        name: "startpos",
        fen: "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR[] w KQkq - 0 1",
        expected_nodes: &[20, 400, 8902],
        max_depth: 3,
    },
    BenchCase {
        name: "full_reserves",
        fen: "r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/2N2N2/PPPP1PPP/R1BQK2R[NBnb] w KQkq - 0 1",
        expected_nodes: &[],
        max_depth: 2,
    },
    BenchCase {
        name: "drop_mate_hunt",
        fen: "6k1/5ppp/8/8/8/8/5PPP/6K1[QRqr] w - - 0 1",
        expected_nodes: &[],
        max_depth: 2,
    },
];

fn bench_perft(c: &mut Criterion) {
    let mut group = c.benchmark_group("perft");
    group.warm_up_time(Duration::from_secs(1));
    group.measurement_time(Duration::from_secs(4));
    group.sample_size(20);

    let generator = LegalMoveGenerator;

    for case in CASES {
        let game = GameState::from_fen(case.fen).expect("benchmark FEN should parse");

        for depth in 1..=case.max_depth {
            let mut warmup_game = game.clone();
            let warmup = perft(&generator, &mut warmup_game, depth).expect("perft should run");
            if let Some(expected) = case.expected_nodes.get(usize::from(depth) - 1) {
                assert_eq!(
                    warmup.nodes as u64, *expected,
                    "node mismatch for {} depth {}",
                    case.name, depth
                );
            }

            group.throughput(Throughput::Elements(warmup.nodes as u64));
            let mut bench_game = game.clone();
            group.bench_function(BenchmarkId::new(case.name, format!("d{depth}")), |b| {
                b.iter(|| {
                    let counts = perft(&generator, black_box(&mut bench_game), black_box(depth))
                        .expect("perft benchmark run should succeed");
                    black_box(counts.nodes)
                });
            });
        }
    }

    group.finish();
}

criterion_group!(perft_benches, bench_perft);
criterion_main!(perft_benches);
