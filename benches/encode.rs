//! Code point and color escape encoding benchmarks.

#![allow(clippy::semicolon_if_nothing_returned)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use termtile::ansi::write_colors;
use termtile::{Rgb, encode_codepoint};

fn encode_ranges(c: &mut Criterion) {
    let cases = [
        ("ascii", 'A' as i32),
        ("two_byte", 'é' as i32),
        ("three_byte", '▒' as i32),
        ("four_byte", 0x1F600),
        ("invalid", -1),
    ];
    for (name, cp) in cases {
        c.bench_function(&format!("encode_codepoint_{name}"), |b| {
            b.iter(|| encode_codepoint(black_box(cp)));
        });
    }
}

fn encode_sweep(c: &mut Criterion) {
    c.bench_function("encode_codepoint_sweep_bmp", |b| {
        b.iter(|| {
            let mut total = 0usize;
            for cp in (0..0x1_0000).step_by(97) {
                total += encode_codepoint(black_box(cp)).len();
            }
            total
        });
    });
}

fn color_sequences(c: &mut Criterion) {
    let mut out = Vec::with_capacity(64);
    c.bench_function("write_colors", |b| {
        b.iter(|| {
            out.clear();
            write_colors(&mut out, black_box(Rgb::new(255, 128, 7)), black_box(Rgb::BLACK))
                .unwrap();
        });
    });
}

criterion_group!(benches, encode_ranges, encode_sweep, color_sequences);
criterion_main!(benches);
