use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use fm_snp::align::MapOpt;
use fm_snp::index::{FMIndex, IndexMeta, IndexOpt};
use fm_snp::io;
use fm_snp::pipeline::AnalysisContext;
use fm_snp::variant::CallOpt;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[derive(Parser, Debug)]
#[command(
    name = "fm-snp",
    author,
    version,
    about = "FM-index read mapper and pileup SNP caller",
    arg_required_else_help = true
)]
struct Cli {
    /// More verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build the FM index of a reference FASTA
    Index {
        /// Reference FASTA file (records are concatenated)
        reference: PathBuf,
        /// Output prefix; the index is written to <prefix>.fm
        #[arg(short, long, default_value = "ref")]
        output: String,
        #[arg(long = "checkpoint-step", default_value_t = 16)]
        checkpoint_step: usize,
        /// Also export the BWT as plain text
        #[arg(long)]
        bwt: Option<PathBuf>,
    },
    /// Exact search of a pattern in a saved index
    Search {
        /// Path to FM index (.fm)
        #[arg(short = 'i', long = "index")]
        index: String,
        pattern: String,
    },
    /// Map reads and call SNPs in one run
    Call {
        /// Reference FASTA file
        reference: PathBuf,
        /// Reads FASTQ file
        reads: PathBuf,
        /// Output SNP table (stdout if omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Tab-separated output instead of CSV
        #[arg(long)]
        tsv: bool,
        /// Print summary statistics and distribution tables to stderr
        #[arg(long)]
        summary: bool,
        /// Write per-position coverage ("Position<TAB>Depth")
        #[arg(long)]
        coverage: Option<PathBuf>,
        #[arg(long = "checkpoint-step", default_value_t = 16)]
        checkpoint_step: usize,
        #[arg(long = "max-mismatches", default_value_t = 3)]
        max_mismatches: usize,
        #[arg(long = "min-seed-len", default_value_t = 12)]
        min_seed_len: usize,
        #[arg(long = "max-seed-len", default_value_t = 16)]
        max_seed_len: usize,
        #[arg(long = "min-depth", default_value_t = 3)]
        min_depth: u32,
        #[arg(long = "min-alt-frac", default_value_t = 0.2)]
        min_alt_frac: f64,
        #[arg(short = 't', long = "threads", default_value_t = 1)]
        threads: usize,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match cli.command {
        Commands::Index { reference, output, checkpoint_step, bwt } => {
            run_index(&reference, &output, IndexOpt { checkpoint_step }, bwt)
        }
        Commands::Search { index, pattern } => run_search(&index, &pattern),
        Commands::Call {
            reference,
            reads,
            out,
            tsv,
            summary,
            coverage,
            checkpoint_step,
            max_mismatches,
            min_seed_len,
            max_seed_len,
            min_depth,
            min_alt_frac,
            threads,
        } => {
            let mut ctx = AnalysisContext {
                index_opt: IndexOpt { checkpoint_step },
                map_opt: MapOpt { max_mismatches, min_seed_len, max_seed_len, threads },
                call_opt: CallOpt { min_depth, min_alt_frac },
                ..AnalysisContext::default()
            };
            // 先校验参数，再读取输入
            ctx.validate()?;
            ctx.reference = io::load_reference(&reference)?;
            ctx.reads = io::load_reads(&reads)?;
            let outputs = CallOutputs { snps: out, coverage, summary };
            run_call(&ctx, outputs, if tsv { '\t' } else { ',' })
        }
    }
}

fn run_index(
    reference: &Path,
    output: &str,
    opt: IndexOpt,
    bwt_path: Option<PathBuf>,
) -> Result<()> {
    opt.validate()?;
    let seq = io::load_reference(reference)?;
    info!(reference = %reference.display(), total_len = seq.len(), "reference loaded");

    let mut fm = FMIndex::build(&seq, opt).context("cannot build FM index")?;
    fm.set_meta(IndexMeta {
        reference_file: Some(reference.display().to_string()),
        build_args: Some(std::env::args().collect::<Vec<_>>().join(" ")),
        build_timestamp: Some(chrono::Utc::now().to_rfc3339()),
    });

    let out_path = format!("{}.fm", output);
    fm.save_to_file(&out_path)
        .with_context(|| format!("cannot write index to '{}'", out_path))?;
    info!(path = %out_path, "FM index saved");

    if let Some(p) = bwt_path {
        let mut f = create_output(&p)?;
        io::report::write_bwt(&mut f, &fm.bwt_string())?;
        info!(path = %p.display(), "BWT exported");
    }
    Ok(())
}

fn run_search(index_path: &str, pattern: &str) -> Result<()> {
    let fm: FMIndex = FMIndex::load_from_file(index_path)
        .with_context(|| format!("cannot load index '{}'", index_path))?;
    let mut hits = fm.search_exact(pattern.to_ascii_uppercase().as_bytes());
    hits.sort_unstable();
    let mut out = std::io::BufWriter::new(std::io::stdout());
    for h in &hits {
        writeln!(out, "{}", h)?;
    }
    info!(pattern, hits = hits.len(), "search finished");
    Ok(())
}

struct CallOutputs {
    snps: Option<PathBuf>,
    coverage: Option<PathBuf>,
    summary: bool,
}

fn create_output(path: &Path) -> Result<std::io::BufWriter<std::fs::File>> {
    let f = std::fs::File::create(path)
        .with_context(|| format!("cannot create '{}'", path.display()))?;
    Ok(std::io::BufWriter::new(f))
}

fn run_call(ctx: &AnalysisContext, outputs: CallOutputs, delimiter: char) -> Result<()> {
    let report = ctx.run()?;

    let mut out: Box<dyn Write> = if let Some(p) = &outputs.snps {
        Box::new(create_output(p)?)
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };
    io::report::write_snp_table(&mut out, &report.snps, delimiter)?;
    out.flush()?;

    if let Some(p) = &outputs.coverage {
        let mut f = create_output(p)?;
        io::report::write_coverage(&mut f, &report.coverage)?;
        f.flush()?;
        info!(path = %p.display(), "coverage exported");
    }

    if outputs.summary {
        let mut err = std::io::stderr().lock();
        io::report::write_summary(&mut err, &report.mapping_summary, &report.snp_summary)?;
        writeln!(err, "Index Runtime\t{:.2}", report.timings.index.as_secs_f64())?;
        writeln!(err, "Mapping Runtime\t{:.2}", report.timings.mapping.as_secs_f64())?;
        writeln!(err, "SNP Calling Runtime\t{:.2}", report.timings.calling.as_secs_f64())?;
        writeln!(err)?;
        io::report::write_depth_histogram(&mut err, &report.depth_histogram)?;
        writeln!(err)?;
        io::report::write_mutation_matrix(&mut err, &report.mutation_matrix)?;
        writeln!(err)?;
        io::report::write_snp_density(&mut err, &report.snp_density)?;
    }
    Ok(())
}
