use anyhow::{anyhow, bail, Result};
use std::io::BufRead;

#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// 逐条读取 FASTA；序列行去除空白并大写化，首个 header 之前只允许空行
pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    pending_id: Option<String>,
    done: bool,
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), line_no: 0, pending_id: None, done: false }
    }

    fn next_line(&mut self) -> Result<bool> {
        self.buf.clear();
        self.line_no += 1;
        Ok(self.reader.read_line(&mut self.buf)? > 0)
    }

    fn header_id(&self) -> String {
        self.buf[1..].split_whitespace().next().unwrap_or("").to_string()
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        let id = match self.pending_id.take() {
            Some(id) => id,
            None => loop {
                if !self.next_line()? {
                    self.done = true;
                    return Ok(None);
                }
                if self.buf.starts_with('>') {
                    break self.header_id();
                }
                if !self.buf.trim().is_empty() {
                    return Err(anyhow!(
                        "line {}: sequence data before first FASTA header",
                        self.line_no
                    ));
                }
            },
        };

        let mut seq: Vec<u8> = Vec::new();
        while self.next_line()? {
            if self.buf.starts_with('>') {
                self.pending_id = Some(self.header_id());
                return Ok(Some(FastaRecord { id, seq }));
            }
            seq.extend(
                self.buf
                    .bytes()
                    .filter(|b| !b.is_ascii_whitespace())
                    .map(|b| b.to_ascii_uppercase()),
            );
        }
        self.done = true;
        Ok(Some(FastaRecord { id, seq }))
    }
}

/// 读取全部记录并首尾相接为单条参考序列
pub fn read_reference<R: BufRead>(reader: R) -> Result<Vec<u8>> {
    let mut fasta = FastaReader::new(reader);
    let mut n_seqs = 0usize;
    let mut reference = Vec::new();
    while let Some(rec) = fasta.next_record()? {
        n_seqs += 1;
        reference.extend_from_slice(&rec.seq);
    }
    if n_seqs == 0 {
        bail!("FASTA input contains no sequences");
    }
    Ok(reference)
}
