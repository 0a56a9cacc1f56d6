use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, MapError};
use crate::index::{FMIndex, OccTable};
use crate::util::dna;

pub mod extend;
pub mod seed;

pub use extend::{extend_ungapped, hamming_distance};
pub use seed::{collect_candidates, fallback_seeds, primary_seed, Candidate, Seed};

/// 比对参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapOpt {
    pub max_mismatches: usize,
    pub min_seed_len: usize,
    pub max_seed_len: usize,
    pub threads: usize,
}

impl Default for MapOpt {
    fn default() -> Self {
        Self { max_mismatches: 3, min_seed_len: 12, max_seed_len: 16, threads: 1 }
    }
}

impl MapOpt {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_seed_len, self.max_seed_len);
        if min == 0 || max == 0 || min > max {
            return Err(ConfigError::SeedLength { min, max });
        }
        if self.threads == 0 {
            return Err(ConfigError::Threads);
        }
        Ok(())
    }
}

/// 比对链方向；Forward 排在 Reverse 之前，用于确定性的并列裁决
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Strand {
    Forward,
    Reverse,
}

impl Strand {
    pub fn symbol(self) -> char {
        match self {
            Strand::Forward => '+',
            Strand::Reverse => '-',
        }
    }
}

impl fmt::Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Read {
    pub id: String,
    pub seq: Vec<u8>,
}

impl Read {
    pub fn new(id: impl Into<String>, seq: impl Into<Vec<u8>>) -> Self {
        Self { id: id.into(), seq: seq.into() }
    }
}

/// 按 read id 去重：同一 id 以最后一条记录的序列为准，位置保持首次出现的顺序
pub fn unique_reads(reads: &[Read]) -> Vec<&Read> {
    let mut slot: HashMap<&str, usize> = HashMap::with_capacity(reads.len());
    let mut out: Vec<&Read> = Vec::with_capacity(reads.len());
    for read in reads {
        match slot.get(read.id.as_str()) {
            Some(&i) => out[i] = read,
            None => {
                slot.insert(read.id.as_str(), out.len());
                out.push(read);
            }
        }
    }
    out
}

/// 单条 read 的最佳无空位比对；sequence 为与参考同向的序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub read_id: String,
    pub ref_pos: usize,
    pub mismatches: usize,
    pub strand: Strand,
    pub sequence: Vec<u8>,
}

impl Alignment {
    pub fn ref_end(&self) -> usize {
        self.ref_pos + self.sequence.len()
    }
}

/// 比对单条 read：正反两链各自播种，候选按 (ref_pos, strand) 升序延伸，
/// 保留错配最少者；并列时位置小者优先，同位置正链优先。
pub fn map_read<R: OccTable>(
    reference: &[u8],
    read: &Read,
    fm: &FMIndex<R>,
    opt: &MapOpt,
) -> Option<Alignment> {
    let forward = dna::normalize_seq(&read.seq);
    let reverse = dna::revcomp(&forward);

    let mut candidates = BTreeSet::new();
    for (seq, strand) in [(&forward, Strand::Forward), (&reverse, Strand::Reverse)] {
        collect_candidates(fm, seq, strand, opt.min_seed_len, opt.max_seed_len, &mut candidates);
    }

    let mut best: Option<(Candidate, usize)> = None;
    for cand in candidates {
        let seq = match cand.strand {
            Strand::Forward => &forward,
            Strand::Reverse => &reverse,
        };
        let Some(mm) = extend_ungapped(reference, seq, cand.ref_pos, opt.max_mismatches) else {
            continue;
        };
        if best.map_or(true, |(_, b)| mm < b) {
            best = Some((cand, mm));
        }
    }

    let (cand, mismatches) = best?;
    let sequence = match cand.strand {
        Strand::Forward => forward,
        Strand::Reverse => reverse,
    };
    Some(Alignment {
        read_id: read.id.clone(),
        ref_pos: cand.ref_pos,
        mismatches,
        strand: cand.strand,
        sequence,
    })
}

/// 批量比对。每个 read id 至多一条比对（重复 id 见 [`unique_reads`]），
/// 输出按输入顺序排列，未比对上的 read 不出现在结果中。
/// threads > 1 时使用 rayon 线程池并行，结果与顺序执行一致。
pub fn map_reads<R: OccTable + Sync>(
    reference: &[u8],
    reads: &[Read],
    fm: &FMIndex<R>,
    opt: &MapOpt,
) -> Result<Vec<Alignment>, MapError> {
    opt.validate()?;
    let n_input = reads.len();
    let start = Instant::now();

    let reads = unique_reads(reads);
    if reads.len() < n_input {
        warn!(
            duplicates = n_input - reads.len(),
            "duplicate read ids, keeping the last record of each"
        );
    }

    let alignments: Vec<Alignment> = if opt.threads > 1 {
        let pool = rayon::ThreadPoolBuilder::new().num_threads(opt.threads).build()?;
        pool.install(|| reads.par_iter().filter_map(|r| map_read(reference, r, fm, opt)).collect())
    } else {
        reads.iter().filter_map(|r| map_read(reference, r, fm, opt)).collect()
    };

    debug!(threads = opt.threads, "mapping finished");
    info!(
        reads = reads.len(),
        mapped = alignments.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "reads mapped"
    );
    Ok(alignments)
}
