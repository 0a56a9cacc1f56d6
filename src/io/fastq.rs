use anyhow::{anyhow, Result};
use std::io::BufRead;

use crate::align::{self, Read};

#[derive(Debug, Clone)]
pub struct FastqRecord {
    pub id: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl From<FastqRecord> for Read {
    fn from(rec: FastqRecord) -> Self {
        Read { id: rec.id, seq: rec.seq }
    }
}

pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    line_no: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), done: false, line_no: 0 }
    }

    fn next_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self.reader.read_line(&mut self.buf)?;
        self.line_no += 1;
        Ok(n > 0)
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        if self.done { return Ok(None); }

        // header line starting with '@'，跳过空行
        loop {
            if !self.next_line()? { self.done = true; return Ok(None); }
            if !self.buf.trim().is_empty() { break; }
        }
        if !self.buf.starts_with('@') {
            return Err(anyhow!("line {}: FASTQ header not starting with '@'", self.line_no));
        }
        let header = self.buf[1..].trim_end().to_string();
        let mut parts = header.splitn(2, char::is_whitespace);
        let id = parts.next().unwrap_or("").to_string();
        let desc = parts.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        // sequence line
        if !self.next_line()? { return Err(anyhow!("unexpected EOF after header '{}'", id)); }
        let seq = self.buf.trim_end().as_bytes().to_ascii_uppercase();

        // plus line
        if !self.next_line()? || !self.buf.starts_with('+') {
            return Err(anyhow!("line {}: missing '+' line for '{}'", self.line_no, id));
        }

        // quality line
        if !self.next_line()? { return Err(anyhow!("missing quality line for '{}'", id)); }
        let qual = self.buf.trim_end().as_bytes().to_vec();

        // line-wrapped FASTQ is not supported
        if qual.len() != seq.len() {
            return Err(anyhow!("seq/qual length mismatch for '{}'", id));
        }

        Ok(Some(FastqRecord { id, desc, seq, qual }))
    }
}

/// 读取全部 read，保持文件中的顺序；重复 id 以最后一条记录为准
pub fn read_reads<R: BufRead>(reader: R) -> Result<Vec<Read>> {
    let mut fq = FastqReader::new(reader);
    let mut reads = Vec::new();
    while let Some(rec) = fq.next_record()? {
        reads.push(Read::from(rec));
    }
    Ok(align::unique_reads(&reads).into_iter().cloned().collect())
}
