use anyhow::Result;
use std::collections::BTreeMap;
use std::io::Write;

use crate::stats::{self, MappingSummary, SnpSummary, DENSITY_BINS};
use crate::variant::SnpRecord;

pub const SNP_HEADER: [&str; 5] = ["Position", "Ref", "Alt", "Count", "Depth"];

/// SNP 表导出；delimiter 为 ',' 时即 CSV
pub fn write_snp_table<W: Write>(
    out: &mut W,
    snps: &[SnpRecord],
    delimiter: char,
) -> Result<()> {
    writeln!(out, "{}", SNP_HEADER.join(delimiter.to_string().as_str()))?;
    for s in snps {
        writeln!(
            out,
            "{pos}{d}{r}{d}{a}{d}{n}{d}{depth}",
            pos = s.position,
            r = s.ref_base as char,
            a = s.alt_base as char,
            n = s.alt_count,
            depth = s.depth,
            d = delimiter,
        )?;
    }
    Ok(())
}

pub fn write_bwt<W: Write>(out: &mut W, bwt: &str) -> Result<()> {
    out.write_all(bwt.as_bytes())?;
    writeln!(out)?;
    Ok(())
}

/// 逐位置覆盖度，"Position<TAB>Depth"
pub fn write_coverage<W: Write>(out: &mut W, coverage: &[u32]) -> Result<()> {
    writeln!(out, "Position\tDepth")?;
    for (pos, depth) in coverage.iter().enumerate() {
        writeln!(out, "{}\t{}", pos, depth)?;
    }
    Ok(())
}

pub fn write_depth_histogram<W: Write>(out: &mut W, hist: &BTreeMap<u32, usize>) -> Result<()> {
    writeln!(out, "Depth\tPositions")?;
    for (depth, n) in hist {
        writeln!(out, "{}\t{}", depth, n)?;
    }
    Ok(())
}

/// 突变矩阵，首行为 alt 碱基，每行以参考碱基开头
pub fn write_mutation_matrix<W: Write>(out: &mut W, matrix: &[[u32; 4]; 4]) -> Result<()> {
    let labels = stats::matrix_labels();
    write!(out, "Ref/Alt")?;
    for b in labels {
        write!(out, "\t{}", b)?;
    }
    writeln!(out)?;
    for (b, row) in labels.iter().zip(matrix) {
        write!(out, "{}", b)?;
        for n in row {
            write!(out, "\t{}", n)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// 每 10% 参考长度一格的 SNP 计数
pub fn write_snp_density<W: Write>(out: &mut W, bins: &[usize; DENSITY_BINS]) -> Result<()> {
    let width = 100 / DENSITY_BINS;
    writeln!(out, "Reference Segment\tSNP Count")?;
    for (i, n) in bins.iter().enumerate() {
        writeln!(out, "{}-{}%\t{}", i * width, (i + 1) * width, n)?;
    }
    Ok(())
}

fn opt_f64(v: Option<f64>) -> String {
    v.map_or_else(|| "NA".to_string(), |x| format!("{:.2}", x))
}

/// 汇总统计，"Metric<TAB>Value" 每行一项
pub fn write_summary<W: Write>(
    out: &mut W,
    mapping: &MappingSummary,
    snps: &SnpSummary,
) -> Result<()> {
    let rows: Vec<(&str, String)> = vec![
        ("Reference Length", mapping.reference_len.to_string()),
        ("Total Reads", mapping.total_reads.to_string()),
        ("Mapped Reads", mapping.mapped_reads.to_string()),
        ("Percent Mapped", format!("{:.2}", mapping.percent_mapped)),
        ("Forward Strand Reads", mapping.forward_reads.to_string()),
        ("Reverse Strand Reads", mapping.reverse_reads.to_string()),
        ("Forward/Reverse Ratio", opt_f64(mapping.forward_reverse_ratio)),
        ("Total SNPs", snps.total.to_string()),
        ("Transitions", snps.transitions.to_string()),
        ("Transversions", snps.transversions.to_string()),
        ("Ti/Tv Ratio", opt_f64(snps.ti_tv_ratio)),
        (
            "Most Common Alt Allele",
            snps.most_common_alt.map_or_else(|| "NA".to_string(), String::from),
        ),
    ];
    for (k, v) in rows {
        writeln!(out, "{}\t{}", k, v)?;
    }
    Ok(())
}
