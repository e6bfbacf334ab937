//! Benchmarks for street scoring and full automated games.
//!
//! Scoring runs after every round and on every hover in a presentation
//! layer; the simulator plays thousands of games per run.

#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use streetdice::autoplay::play_game;
use streetdice::dice::Dice;
use streetdice::game::{find_groups, plaza_bonus, score_row};
use streetdice::{Board, Building, Coord, GameConfig};

/// A crowded board with mixed groups and a few plazas.
fn busy_board() -> Board {
    let mut dice = Dice::new(0xC0FFEE);
    let mut board = Board::new(5, 6);
    for row in 0..5 {
        for col in 0..6 {
            let building = match dice.next_face() {
                1 | 4 => Building::House,
                2 | 5 => Building::Forest,
                3 => Building::Lake,
                _ => Building::Square,
            };
            board.place(Coord::new(row, col), building);
        }
    }
    board
}

fn bench_find_groups(c: &mut Criterion) {
    let board = busy_board();

    c.bench_function("find_groups_full_board", |b| {
        b.iter(|| black_box(find_groups(black_box(&board))));
    });
}

fn bench_score_all_rows(c: &mut Criterion) {
    let board = busy_board();
    let config = GameConfig::default();

    c.bench_function("score_all_rows", |b| {
        b.iter(|| {
            let total: u32 = (0..5).map(|row| score_row(black_box(&board), &config, row)).sum();
            black_box(total)
        });
    });
}

fn bench_plaza_bonus(c: &mut Criterion) {
    let board = busy_board();
    let config = GameConfig::default();

    c.bench_function("plaza_bonus", |b| {
        b.iter(|| black_box(plaza_bonus(black_box(&board), &config)));
    });
}

fn bench_autoplay_game(c: &mut Criterion) {
    let config = GameConfig::default();

    c.bench_function("autoplay_game", |b| {
        b.iter(|| {
            let result = play_game(black_box(42), black_box(&config));
            black_box(result)
        });
    });
}

criterion_group!(
    benches,
    bench_find_groups,
    bench_score_all_rows,
    bench_plaza_bonus,
    bench_autoplay_game
);
criterion_main!(benches);
