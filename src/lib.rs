//! # fm-snp
//!
//! 受 [BWA](https://github.com/lh3/bwa) 启发的小型比对与 SNP 检出流程。
//!
//! - **索引构建**：后缀数组（倍增 + 基数排序）→ BWT → FM 索引（C 表 + 检查点秩结构）
//! - **精确查找**：反向搜索
//! - **序列比对**：正反链播种、自适应回退种子、限定错配数的无空位延伸
//! - **变异检出**：pileup + 深度 / 等位基因频率过滤
//!
//! ## 快速示例
//!
//! ```rust
//! use fm_snp::index::{FMIndex, IndexOpt};
//! use fm_snp::align::{map_reads, MapOpt, Read};
//! use fm_snp::variant::{call_snps, CallOpt};
//!
//! let reference = b"AAAACCCCGGGGTTTT";
//! let fm = FMIndex::build(reference, IndexOpt::default()).unwrap();
//! let mut hits = fm.search_exact(b"CCGG");
//! hits.sort_unstable();
//! assert_eq!(hits, vec![6]);
//!
//! let reads = vec![Read::new("r1", b"CCCCGGGG".to_vec())];
//! let alns = map_reads(reference, &reads, &fm, &MapOpt::default()).unwrap();
//! assert_eq!(alns[0].ref_pos, 4);
//!
//! let snps = call_snps(&alns, reference, &CallOpt::default()).unwrap();
//! assert!(snps.is_empty());
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 后缀数组、BWT、秩结构、FM 索引
//! - [`align`] — 种子生成与延伸，每条 read 至多一个最佳比对
//! - [`variant`] — pileup 与 SNP 检出
//! - [`stats`] — 覆盖度与汇总统计
//! - [`pipeline`] — 串联各阶段的分析上下文
//! - [`io`] — FASTA / FASTQ 读取与结果导出
//! - [`util`] — DNA 编码 / 反向互补等工具函数

pub mod align;
pub mod error;
pub mod index;
pub mod io;
pub mod pipeline;
pub mod stats;
pub mod util;
pub mod variant;

pub use error::{ConfigError, IndexError, MapError, PipelineError};
