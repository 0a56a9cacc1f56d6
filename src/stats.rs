//! 比对结果与 SNP 的汇总统计：覆盖度、深度分布、Ti/Tv、正反链比例、突变矩阵、密度分布。

use std::collections::BTreeMap;

use serde::Serialize;

use crate::align::{Alignment, Strand};
use crate::util::dna::{base_index, is_transition, BASES};
use crate::variant::SnpRecord;

pub const DENSITY_BINS: usize = 10;

/// 每个参考位置被多少条比对覆盖
pub fn coverage(alignments: &[Alignment], ref_len: usize) -> Vec<u32> {
    let mut cov = vec![0u32; ref_len];
    for aln in alignments {
        let end = aln.ref_end().min(ref_len);
        for c in cov.iter_mut().take(end).skip(aln.ref_pos) {
            *c += 1;
        }
    }
    cov
}

/// 深度 -> 该深度的参考位置数
pub fn depth_histogram(coverage: &[u32]) -> BTreeMap<u32, usize> {
    let mut hist = BTreeMap::new();
    for &d in coverage {
        *hist.entry(d).or_insert(0) += 1;
    }
    hist
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnpSummary {
    pub total: usize,
    pub transitions: usize,
    pub transversions: usize,
    /// 无颠换时为 None，保留两位小数
    pub ti_tv_ratio: Option<f64>,
    /// 按 alt 支持数累加后最多的 alt 碱基
    pub most_common_alt: Option<char>,
}

pub fn snp_summary(snps: &[SnpRecord]) -> SnpSummary {
    let mut transitions = 0usize;
    let mut transversions = 0usize;
    let mut alt_counts: BTreeMap<u8, u64> = BTreeMap::new();
    for s in snps {
        *alt_counts.entry(s.alt_base).or_insert(0) += u64::from(s.alt_count);
        if is_transition(s.ref_base, s.alt_base) {
            transitions += 1;
        } else {
            transversions += 1;
        }
    }
    let ti_tv_ratio =
        (transversions > 0).then(|| round2(transitions as f64 / transversions as f64));
    // 并列时取字母序最小者
    let most_common_alt = alt_counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(&b, _)| b as char);
    SnpSummary { total: snps.len(), transitions, transversions, ti_tv_ratio, most_common_alt }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingSummary {
    pub reference_len: usize,
    pub total_reads: usize,
    pub mapped_reads: usize,
    pub percent_mapped: f64,
    pub forward_reads: usize,
    pub reverse_reads: usize,
    pub forward_reverse_ratio: Option<f64>,
}

pub fn mapping_summary(
    alignments: &[Alignment],
    total_reads: usize,
    reference_len: usize,
) -> MappingSummary {
    let mapped_reads = alignments.len();
    let forward_reads = alignments.iter().filter(|a| a.strand == Strand::Forward).count();
    let reverse_reads = mapped_reads - forward_reads;
    let percent_mapped = if total_reads > 0 {
        round2(mapped_reads as f64 * 100.0 / total_reads as f64)
    } else {
        0.0
    };
    MappingSummary {
        reference_len,
        total_reads,
        mapped_reads,
        percent_mapped,
        forward_reads,
        reverse_reads,
        forward_reverse_ratio: (reverse_reads > 0)
            .then(|| round2(forward_reads as f64 / reverse_reads as f64)),
    }
}

/// 4x4 突变矩阵，行 = 参考碱基，列 = alt 碱基（A C G T）
pub fn mutation_matrix(snps: &[SnpRecord]) -> [[u32; 4]; 4] {
    let mut m = [[0u32; 4]; 4];
    for s in snps {
        if let (Some(r), Some(a)) = (base_index(s.ref_base), base_index(s.alt_base)) {
            m[r][a] += 1;
        }
    }
    m
}

/// SNP 在参考全长上按 10 等分的计数；末端位置计入最后一格
pub fn snp_density(snps: &[SnpRecord], ref_len: usize) -> [usize; DENSITY_BINS] {
    let mut bins = [0usize; DENSITY_BINS];
    if ref_len == 0 {
        return bins;
    }
    for s in snps {
        let b = (s.position * DENSITY_BINS / ref_len).min(DENSITY_BINS - 1);
        bins[b] += 1;
    }
    bins
}

pub fn matrix_labels() -> [char; 4] {
    BASES.map(|b| b as char)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
