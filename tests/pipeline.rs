use fm_snp::align::{map_reads, Alignment, MapOpt, Read, Strand};
use fm_snp::index::{FMIndex, IndexOpt};
use fm_snp::pipeline::AnalysisContext;
use fm_snp::util::dna;
use fm_snp::variant::{call_snps, CallOpt, SnpRecord};

const SMALL_REF: &[u8] = b"AAAACCCCGGGGTTTT";

fn aln_at(pos: usize, seq: &[u8]) -> Alignment {
    Alignment {
        read_id: format!("r{}", pos),
        ref_pos: pos,
        mismatches: 0,
        strand: Strand::Forward,
        sequence: seq.to_vec(),
    }
}

fn pseudo_random_reference(len: usize, seed: u32) -> Vec<u8> {
    let mut x = seed;
    (0..len)
        .map(|_| {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            dna::BASES[(x >> 16) as usize % 4]
        })
        .collect()
}

#[test]
fn reference_only_reads_yield_no_snps() {
    let alns: Vec<_> = (0..5).map(|_| aln_at(4, b"CCCC")).collect();
    let opt = CallOpt { min_depth: 3, min_alt_frac: 0.2 };
    assert!(call_snps(&alns, SMALL_REF, &opt).unwrap().is_empty());
}

#[test]
fn one_alt_position_called() {
    let mut alns: Vec<_> = (0..4).map(|_| aln_at(4, b"CCCT")).collect();
    alns.push(aln_at(4, b"CCCC"));
    let opt = CallOpt { min_depth: 3, min_alt_frac: 0.2 };
    assert_eq!(
        call_snps(&alns, SMALL_REF, &opt).unwrap(),
        vec![SnpRecord { position: 7, ref_base: b'C', alt_base: b'T', alt_count: 4, depth: 5 }]
    );
}

#[test]
fn repeated_read_takes_lowest_offset() {
    let reference = b"ACGTACGT";
    let fm = FMIndex::build(reference, IndexOpt::default()).unwrap();
    let opt = MapOpt { max_mismatches: 0, ..MapOpt::default() };
    let alns = map_reads(reference, &[Read::new("r", b"ACGT".to_vec())], &fm, &opt).unwrap();
    assert_eq!(alns.len(), 1);
    assert_eq!((alns[0].ref_pos, alns[0].strand), (0, Strand::Forward));
}

#[test]
fn substrings_map_on_both_strands() {
    let reference = pseudo_random_reference(400, 7);
    let fm = FMIndex::build(&reference, IndexOpt::default()).unwrap();
    for start in (0..360).step_by(37) {
        let window = &reference[start..start + 40];

        let opt = MapOpt::default();
        let fwd = map_reads(&reference, &[Read::new("f", window.to_vec())], &fm, &opt).unwrap();
        assert_eq!(fwd.len(), 1);
        assert_eq!((fwd[0].ref_pos, fwd[0].mismatches, fwd[0].strand), (start, 0, Strand::Forward));

        let rc = Read::new("r", dna::revcomp(window));
        let rev = map_reads(&reference, &[rc], &fm, &opt).unwrap();
        assert_eq!(rev.len(), 1);
        assert_eq!((rev[0].ref_pos, rev[0].strand), (start, Strand::Reverse));
        assert_eq!(rev[0].sequence, window);
    }
}

#[test]
fn long_read_is_unmapped() {
    let fm = FMIndex::build(SMALL_REF, IndexOpt::default()).unwrap();
    let read = Read::new("long", b"AAAACCCCGGGGTTTTA".to_vec());
    assert!(map_reads(SMALL_REF, &[read], &fm, &MapOpt::default()).unwrap().is_empty());
}

#[test]
fn full_pipeline_calls_planted_snps() {
    let reference = pseudo_random_reference(600, 99);
    let mut sample = reference.clone();
    let planted = [150usize, 420];
    for &p in &planted {
        sample[p] = if sample[p] == b'A' { b'G' } else { b'A' };
    }

    let mut reads = Vec::new();
    for (i, start) in (0..560).step_by(8).enumerate() {
        let seq = sample[start..start + 40].to_vec();
        let seq = if i % 2 == 0 { seq } else { dna::revcomp(&seq) };
        reads.push(Read::new(format!("read{}", i), seq));
    }

    let mut ctx = AnalysisContext::new(reference.clone(), reads);
    ctx.map_opt.threads = 2;
    let report = ctx.run().unwrap();

    assert_eq!(report.mapping_summary.total_reads, 70);
    assert_eq!(report.alignments.len(), 70);
    let called: Vec<_> = report.snps.iter().map(|s| s.position).collect();
    assert_eq!(called, planted.to_vec());
    for s in &report.snps {
        assert_eq!(s.ref_base, reference[s.position]);
        assert_eq!(s.alt_base, sample[s.position]);
        assert_eq!(s.alt_count, s.depth);
    }
    assert_eq!(report.index.recover_text().len(), reference.len() + 1);
}

#[test]
fn invalid_reference_is_rejected() {
    let ctx = AnalysisContext::new(b"ACGTRY".to_vec(), Vec::new());
    assert!(ctx.run().is_err());
}
