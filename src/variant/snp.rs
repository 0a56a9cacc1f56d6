use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::pileup::Pileup;
use crate::align::Alignment;
use crate::error::ConfigError;

/// 变异检出阈值
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CallOpt {
    pub min_depth: u32,
    pub min_alt_frac: f64,
}

impl Default for CallOpt {
    fn default() -> Self {
        Self { min_depth: 3, min_alt_frac: 0.2 }
    }
}

impl CallOpt {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_depth < 1 {
            return Err(ConfigError::MinDepth(self.min_depth));
        }
        if !(0.0..=1.0).contains(&self.min_alt_frac) {
            return Err(ConfigError::MinAltFrac(self.min_alt_frac));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnpRecord {
    pub position: usize,
    pub ref_base: u8,
    pub alt_base: u8,
    pub alt_count: u32,
    pub depth: u32,
}

impl SnpRecord {
    pub fn alt_frac(&self) -> f64 {
        self.alt_count as f64 / self.depth as f64
    }
}

/// 从 pileup 检出 SNP：深度不足的位置整体跳过；
/// 每个与参考不同且 alt_count / depth >= min_alt_frac 的碱基产生一条记录。
/// 结果按位置升序，同一位置按 alt 碱基字母序。
pub fn call_from_pileup(pileup: &Pileup, reference: &[u8], opt: &CallOpt) -> Vec<SnpRecord> {
    let mut snps = Vec::new();
    for (position, counts) in pileup.iter() {
        let Some(&ref_base) = reference.get(position) else {
            continue;
        };
        let depth: u32 = counts.values().sum();
        if depth < opt.min_depth {
            continue;
        }
        for (&alt_base, &alt_count) in counts {
            if alt_base == ref_base {
                continue;
            }
            if alt_count as f64 / depth as f64 >= opt.min_alt_frac {
                snps.push(SnpRecord { position, ref_base, alt_base, alt_count, depth });
            }
        }
    }
    snps
}

pub fn call_snps(
    alignments: &[Alignment],
    reference: &[u8],
    opt: &CallOpt,
) -> Result<Vec<SnpRecord>, ConfigError> {
    opt.validate()?;
    let start = Instant::now();
    let pileup = Pileup::build(alignments);
    let snps = call_from_pileup(&pileup, reference, opt);
    info!(
        positions = pileup.len(),
        snps = snps.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "variants called"
    );
    Ok(snps)
}
