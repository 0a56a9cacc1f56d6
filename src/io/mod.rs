pub mod fasta;
pub mod fastq;
pub mod report;

use anyhow::{Context, Result};
use std::path::Path;

use crate::align::Read;

pub fn load_reference(path: &Path) -> Result<Vec<u8>> {
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open reference FASTA '{}'", path.display()))?;
    fasta::read_reference(std::io::BufReader::new(fh))
        .with_context(|| format!("cannot parse reference FASTA '{}'", path.display()))
}

pub fn load_reads(path: &Path) -> Result<Vec<Read>> {
    let fh = std::fs::File::open(path)
        .with_context(|| format!("cannot open reads FASTQ '{}'", path.display()))?;
    fastq::read_reads(std::io::BufReader::new(fh))
        .with_context(|| format!("cannot parse reads FASTQ '{}'", path.display()))
}
