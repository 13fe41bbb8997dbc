use criterion::{Criterion, criterion_group, criterion_main};
use hexdatalib::{HexData, PatternSearch, SearchType, search_all};
use rand::Rng;

fn random_data_1mb() -> Vec<u8> {
    rand::rng()
        .sample_iter(rand::distr::StandardUniform)
        .take(1024 * 1024)
        .collect()
}

fn bench_line_model(c: &mut Criterion) {
    let data = random_data_1mb();

    c.bench_function("lines_regenerate_1mb", |b| {
        let mut hd = HexData::from_bytes(data.clone());
        b.iter(|| {
            hd.regenerate_all();
            std::hint::black_box(hd.hex_lines().len());
        });
    });

    c.bench_function("lines_change_width_1mb", |b| {
        let mut hd = HexData::from_bytes(data.clone());
        let mut wide = false;
        b.iter(|| {
            wide = !wide;
            hd.set_bytes_per_line(if wide { 48 } else { 16 });
            std::hint::black_box(hd.hex_lines().len());
        });
    });
}

fn bench_search(c: &mut Criterion) {
    let mut data = random_data_1mb();
    let tail = data.len() - 4;
    data[tail..].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);

    c.bench_function("search_find_next_1mb", |b| {
        let mut search = PatternSearch::new();
        search.set_pattern("DE AD BE EF");
        b.iter(|| {
            search.run();
            std::hint::black_box(search.find_next(std::hint::black_box(&data)));
        });
    });

    c.bench_function("search_all_regex_1mb", |b| {
        let search_type = SearchType::Regex(r"(?-u)\xDE\xAD\xBE\xEF".to_string());
        b.iter(|| {
            std::hint::black_box(search_all(std::hint::black_box(&data), &search_type));
        });
    });
}

criterion_group!(
    name = hexdatalib_benches;
    config = Criterion::default().sample_size(20);
    targets = bench_line_model, bench_search
);
criterion_main!(hexdatalib_benches);
