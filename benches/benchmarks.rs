use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fm_snp::align::{map_reads, MapOpt, Read};
use fm_snp::index::{sa, FMIndex, IndexOpt};
use fm_snp::util::dna;
use fm_snp::variant::{call_snps, CallOpt};

fn make_reference(len: usize) -> Vec<u8> {
    let mut seq = Vec::with_capacity(len);
    let mut x: u32 = 42;
    for _ in 0..len {
        x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        seq.push(dna::BASES[(x >> 16) as usize % 4]);
    }
    seq
}

fn make_reads(reference: &[u8], n: usize, len: usize) -> Vec<Read> {
    (0..n)
        .map(|i| {
            let start = (i * 97) % (reference.len() - len);
            let mut seq = reference[start..start + len].to_vec();
            seq[len / 3] = dna::complement(seq[len / 3]);
            let seq = if i % 2 == 0 { seq } else { dna::revcomp(&seq) };
            Read::new(format!("r{}", i), seq)
        })
        .collect()
}

fn bench_build_sa(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let text: Vec<u8> = reference
        .iter()
        .filter_map(|&b| dna::to_alphabet(b))
        .chain(std::iter::once(dna::SENTINEL))
        .collect();

    c.bench_function("build_sa_10k", |b| {
        b.iter(|| {
            black_box(sa::build_sa(black_box(&text)));
        })
    });
}

fn bench_search_exact(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let fm = FMIndex::build(&reference, IndexOpt::default()).unwrap();
    let pattern = reference[100..120].to_vec();

    c.bench_function("search_exact_20bp", |b| {
        b.iter(|| {
            black_box(fm.search_exact(black_box(&pattern)));
        })
    });
}

fn bench_map_reads(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let fm = FMIndex::build(&reference, IndexOpt::default()).unwrap();
    let reads = make_reads(&reference, 200, 100);
    let opt = MapOpt::default();

    c.bench_function("map_reads_200x100bp", |b| {
        b.iter(|| {
            black_box(map_reads(&reference, black_box(&reads), &fm, &opt).unwrap());
        })
    });
}

fn bench_call_snps(c: &mut Criterion) {
    let reference = make_reference(10_000);
    let fm = FMIndex::build(&reference, IndexOpt::default()).unwrap();
    let reads = make_reads(&reference, 500, 100);
    let alns = map_reads(&reference, &reads, &fm, &MapOpt::default()).unwrap();
    let opt = CallOpt::default();

    c.bench_function("call_snps_500_alignments", |b| {
        b.iter(|| {
            black_box(call_snps(black_box(&alns), &reference, &opt).unwrap());
        })
    });
}

criterion_group!(benches, bench_build_sa, bench_search_exact, bench_map_reads, bench_call_snps);
criterion_main!(benches);
