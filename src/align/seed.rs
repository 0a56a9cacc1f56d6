use std::collections::BTreeSet;

use super::Strand;
use crate::index::{FMIndex, OccTable};

/// read（或其反向互补）上用于精确查找的子串
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seed {
    pub offset: usize,
    pub len: usize,
}

/// 由种子命中推断出的候选参考位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Candidate {
    pub ref_pos: usize,
    pub strand: Strand,
}

/// 以序列中点为中心的主种子，长度 min(max_seed_len, len)
pub fn primary_seed(seq_len: usize, max_seed_len: usize) -> Seed {
    let len = max_seed_len.min(seq_len);
    let mid = seq_len / 2;
    Seed { offset: mid.saturating_sub(len / 2), len }
}

/// 回退滑动种子：长度 max(min_seed_len, primary_len / 2)，步长为其一半（至少 1）
pub fn fallback_seeds(seq_len: usize, primary_len: usize, min_seed_len: usize) -> Vec<Seed> {
    let len = min_seed_len.max(primary_len / 2);
    if len == 0 || len > seq_len {
        return Vec::new();
    }
    let step = (len / 2).max(1);
    (0..=seq_len - len)
        .step_by(step)
        .map(|offset| Seed { offset, len })
        .collect()
}

/// 在参考上查找种子，把命中换算为整条序列的起点，只保留完全落在参考内的位置
fn push_hits<R: OccTable>(
    fm: &FMIndex<R>,
    seq: &[u8],
    seed: Seed,
    strand: Strand,
    out: &mut BTreeSet<Candidate>,
) {
    let ref_len = fm.reference_len();
    let pattern = &seq[seed.offset..seed.offset + seed.len];
    for hit in fm.search_exact(pattern) {
        let Some(ref_pos) = hit.checked_sub(seed.offset) else {
            continue;
        };
        if ref_pos + seq.len() <= ref_len {
            out.insert(Candidate { ref_pos, strand });
        }
    }
}

/// 单一方向的候选收集：主种子命中即停止，否则累积全部回退种子的命中
pub fn collect_candidates<R: OccTable>(
    fm: &FMIndex<R>,
    seq: &[u8],
    strand: Strand,
    min_seed_len: usize,
    max_seed_len: usize,
    out: &mut BTreeSet<Candidate>,
) {
    if seq.is_empty() || seq.len() > fm.reference_len() {
        return;
    }
    let before = out.len();
    let primary = primary_seed(seq.len(), max_seed_len);
    push_hits(fm, seq, primary, strand, out);
    if out.len() > before {
        return;
    }
    for seed in fallback_seeds(seq.len(), primary.len, min_seed_len) {
        push_hits(fm, seq, seed, strand, out);
    }
}
