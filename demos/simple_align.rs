//! 演示如何在 library 模式下使用 fm-snp：建索引、精确查找、比对、检出 SNP。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_align
//! ```

use fm_snp::align::Read;
use fm_snp::io::report;
use fm_snp::pipeline::AnalysisContext;
use fm_snp::util::dna;

fn main() -> anyhow::Result<()> {
    // 1. 参考序列
    let reference = b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGATTGCAACGGTCA".to_vec();
    println!("参考长度: {} bp", reference.len());

    // 2. 构造 read：在位置 20 引入替换，一半取反向互补
    let mut sample = reference.clone();
    sample[20] = dna::complement(sample[20]);
    let reads: Vec<Read> = (0..6)
        .map(|i| {
            let start = 2 + i * 3;
            let seq = sample[start..start + 30].to_vec();
            let seq = if i % 2 == 0 { seq } else { dna::revcomp(&seq) };
            Read::new(format!("read{}", i), seq)
        })
        .collect();

    // 3. 运行整条流程
    let ctx = AnalysisContext::new(reference, reads);
    let result = ctx.run()?;

    println!("BWT: {}", result.index.bwt_string());
    let mut hits = result.index.search_exact(b"GCTAGCT");
    hits.sort_unstable();
    println!("精确匹配 'GCTAGCT': {:?}", hits);

    for aln in &result.alignments {
        println!(
            "  {} -> pos={} strand={} mismatches={}",
            aln.read_id, aln.ref_pos, aln.strand, aln.mismatches
        );
    }

    let mut out = std::io::stdout().lock();
    report::write_snp_table(&mut out, &result.snps, ',')?;
    report::write_summary(&mut out, &result.mapping_summary, &result.snp_summary)?;
    Ok(())
}
