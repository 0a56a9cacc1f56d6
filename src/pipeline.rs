//! 一次分析运行：建索引 -> 比对 -> 变异检出 -> 汇总。
//! 各阶段完整物化输出后再进入下一阶段，状态全部显式地放在上下文与报告中。

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use tracing::info;

use crate::align::{self, Alignment, MapOpt, Read};
use crate::error::PipelineError;
use crate::index::{FMIndex, IndexOpt};
use crate::stats::{self, MappingSummary, SnpSummary, DENSITY_BINS};
use crate::variant::{self, CallOpt, Pileup, SnpRecord};

/// 一次分析的输入与参数
#[derive(Debug, Clone, Default)]
pub struct AnalysisContext {
    pub reference: Vec<u8>,
    pub reads: Vec<Read>,
    pub index_opt: IndexOpt,
    pub map_opt: MapOpt,
    pub call_opt: CallOpt,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StageTimings {
    pub index: Duration,
    pub mapping: Duration,
    pub calling: Duration,
}

#[derive(Debug)]
pub struct AnalysisReport {
    pub index: FMIndex,
    pub alignments: Vec<Alignment>,
    pub snps: Vec<SnpRecord>,
    pub coverage: Vec<u32>,
    pub depth_histogram: BTreeMap<u32, usize>,
    pub snp_summary: SnpSummary,
    pub mapping_summary: MappingSummary,
    /// 行 = 参考碱基，列 = alt 碱基，顺序 A C G T
    pub mutation_matrix: [[u32; 4]; 4],
    pub snp_density: [usize; DENSITY_BINS],
    pub timings: StageTimings,
}

impl AnalysisContext {
    pub fn new(reference: impl Into<Vec<u8>>, reads: Vec<Read>) -> Self {
        Self { reference: reference.into(), reads, ..Self::default() }
    }

    /// 所有参数在任何计算开始前校验
    pub fn validate(&self) -> Result<(), PipelineError> {
        self.index_opt.validate()?;
        self.map_opt.validate()?;
        self.call_opt.validate()?;
        Ok(())
    }

    pub fn run(&self) -> Result<AnalysisReport, PipelineError> {
        self.validate()?;
        let mut timings = StageTimings::default();

        let t = Instant::now();
        let index = FMIndex::build(&self.reference, self.index_opt)?;
        timings.index = t.elapsed();
        info!(
            reference_len = index.reference_len(),
            checkpoint_step = self.index_opt.checkpoint_step,
            elapsed_ms = timings.index.as_millis() as u64,
            "FM index built"
        );

        let t = Instant::now();
        let alignments = align::map_reads(&self.reference, &self.reads, &index, &self.map_opt)?;
        timings.mapping = t.elapsed();

        let t = Instant::now();
        let pileup = if self.map_opt.threads > 1 {
            Pileup::build_parallel(&alignments)
        } else {
            Pileup::build(&alignments)
        };
        let snps = variant::call_from_pileup(&pileup, &self.reference, &self.call_opt);
        timings.calling = t.elapsed();
        info!(
            positions = pileup.len(),
            snps = snps.len(),
            elapsed_ms = timings.calling.as_millis() as u64,
            "variants called"
        );

        let ref_len = index.reference_len();
        let coverage = stats::coverage(&alignments, ref_len);
        let depth_histogram = stats::depth_histogram(&coverage);
        let snp_summary = stats::snp_summary(&snps);
        let mutation_matrix = stats::mutation_matrix(&snps);
        let snp_density = stats::snp_density(&snps, ref_len);
        let total_reads = align::unique_reads(&self.reads).len();
        let mapping_summary = stats::mapping_summary(&alignments, total_reads, ref_len);

        Ok(AnalysisReport {
            index,
            alignments,
            snps,
            coverage,
            depth_histogram,
            snp_summary,
            mapping_summary,
            mutation_matrix,
            snp_density,
            timings,
        })
    }
}
