use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bwt::build_bwt;
use super::rank::{CheckpointRank, OccTable};
use super::sa::build_sa;
use crate::error::{ConfigError, IndexError};
use crate::util::dna::{self, SENTINEL, SENTINEL_CHAR, SIGMA};

pub const DEFAULT_CHECKPOINT_STEP: usize = 16;

/// 索引构建参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOpt {
    pub checkpoint_step: usize,
}

impl Default for IndexOpt {
    fn default() -> Self {
        Self { checkpoint_step: DEFAULT_CHECKPOINT_STEP }
    }
}

impl IndexOpt {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.checkpoint_step == 0 {
            return Err(ConfigError::CheckpointStep);
        }
        Ok(())
    }
}

/// 索引元信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 单参考序列 FM 索引：
/// - 文本编码为 [0..SIGMA)，0 为哨兵 `$`，只出现在末尾；
/// - C 表记录首次出现位置，缺失的字母为 None；
/// - 秩查询委托给 OccTable（默认采样检查点），BWT 由其持有；
/// - 保存完整 SA，区间直接映射为参考坐标。
#[derive(Debug, Serialize, Deserialize)]
pub struct FMIndex<R = CheckpointRank> {
    /// first_occurrence[c] = BWT 中字母 < c 的数量；c 不出现时为 None
    first_occurrence: [Option<u32>; SIGMA],
    sa: Vec<u32>,
    rank: R,
    #[serde(default)]
    meta: IndexMeta,
}

impl FMIndex<CheckpointRank> {
    /// 从 ASCII 参考序列构建索引，允许末尾已带一个 `$`
    pub fn build(reference: &[u8], opt: IndexOpt) -> Result<Self, IndexError> {
        opt.validate()?;
        Self::build_with(reference, |bwt| CheckpointRank::build(bwt, opt.checkpoint_step))
    }
}

impl<R: OccTable> FMIndex<R> {
    /// 使用任意秩结构构建
    pub fn build_with(
        reference: &[u8],
        make_rank: impl FnOnce(Vec<u8>) -> R,
    ) -> Result<Self, IndexError> {
        let text = encode_reference(reference)?;
        let sa = build_sa(&text);
        let bwt = build_bwt(&text, &sa);

        let mut freq = [0u32; SIGMA];
        for &ch in &bwt {
            freq[ch as usize] += 1;
        }
        let mut first_occurrence = [None; SIGMA];
        let mut acc = 0u32;
        for (c, &f) in freq.iter().enumerate() {
            if f > 0 {
                first_occurrence[c] = Some(acc);
            }
            acc += f;
        }

        debug!(text_len = text.len(), "suffix array and BWT built");
        Ok(Self { first_occurrence, sa, rank: make_rank(bwt), meta: IndexMeta::default() })
    }

    /// 参考序列长度（不含哨兵）
    pub fn reference_len(&self) -> usize {
        self.sa.len().saturating_sub(1)
    }

    pub fn sa(&self) -> &[u32] {
        &self.sa
    }

    pub fn bwt(&self) -> &[u8] {
        self.rank.bwt()
    }

    pub fn rank(&self) -> &R {
        &self.rank
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// BWT 的 ASCII 形式（哨兵为 `$`），可直接导出为文本
    pub fn bwt_string(&self) -> String {
        self.bwt().iter().map(|&c| dna::from_alphabet(c) as char).collect()
    }

    /// ASCII 字母的首次出现位置；未出现的字母返回 None
    pub fn first_occurrence(&self, symbol: u8) -> Option<u32> {
        dna::to_alphabet(symbol).and_then(|c| self.first_occurrence[c as usize])
    }

    /// BWT[0..pos) 中 ASCII 字母 symbol 的个数
    pub fn count_symbol(&self, symbol: u8, pos: usize) -> u32 {
        dna::to_alphabet(symbol).map_or(0, |c| self.rank.count_symbol(c, pos))
    }

    /// 反向搜索：返回 SA 半开区间 [l, r)（等价于闭区间 [top, bottom]），
    /// pat 为编码后的字母表。
    pub fn backward_search(&self, pat: &[u8]) -> Option<(usize, usize)> {
        let mut l = 0usize;
        let mut r = self.rank.len();
        for &a in pat.iter().rev() {
            let c0 = self.first_occurrence.get(a as usize).copied().flatten()? as usize;
            let nl = c0 + self.rank.count_symbol(a, l) as usize;
            let nr = c0 + self.rank.count_symbol(a, r) as usize;
            if nl >= nr {
                return None;
            }
            l = nl;
            r = nr;
        }
        Some((l, r))
    }

    /// 精确匹配：返回所有出现位置（顺序为 SA 顺序，调用方不应依赖）。
    /// 空模式匹配所有非哨兵位置；含字母表外符号的模式没有匹配。
    pub fn search_exact(&self, pattern: &[u8]) -> Vec<usize> {
        let sentinel_pos = self.reference_len();
        if pattern.is_empty() {
            return (0..sentinel_pos).collect();
        }
        let Some(pat) = dna::encode_pattern(pattern) else {
            return Vec::new();
        };
        match self.backward_search(&pat) {
            Some((l, r)) => self.sa[l..r]
                .iter()
                .map(|&p| p as usize)
                .filter(|&p| p != sentinel_pos)
                .collect(),
            None => Vec::new(),
        }
    }

    /// LF 映射：LF(i) = C[BWT[i]] + Occ(BWT[i], i)
    #[inline]
    fn lf(&self, i: usize) -> usize {
        let c = self.bwt()[i];
        let c0 = self.first_occurrence[c as usize].unwrap_or(0) as usize;
        c0 + self.rank.count_symbol(c, i) as usize
    }

    /// 结构一致性检查：秩结构自检、SA 为 [0, n) 的排列且与 BWT 等长、
    /// 恰有一个哨兵、C 表与 BWT 字母计数一致
    pub fn verify(&self) -> Result<(), IndexError> {
        self.rank.verify()?;
        let n = self.rank.len();
        if self.sa.len() != n {
            return Err(IndexError::Corrupt(format!(
                "suffix array has {} entries, BWT has {}",
                self.sa.len(),
                n
            )));
        }
        let mut seen = vec![false; n];
        for &p in &self.sa {
            match seen.get_mut(p as usize) {
                Some(s) if !*s => *s = true,
                _ => return Err(IndexError::Corrupt(format!("suffix array entry {} invalid", p))),
            }
        }
        let mut freq = [0u32; SIGMA];
        for &ch in self.bwt() {
            freq[ch as usize] += 1;
        }
        if n > 0 && freq[SENTINEL as usize] != 1 {
            return Err(IndexError::Corrupt("BWT must hold exactly one sentinel".into()));
        }
        let mut acc = 0u32;
        for (c, &f) in freq.iter().enumerate() {
            let expected = (f > 0).then_some(acc);
            if self.first_occurrence[c] != expected {
                return Err(IndexError::Corrupt(format!("C table entry {} mismatch", c)));
            }
            acc += f;
        }
        Ok(())
    }

    /// 逆 BWT：由 BWT 还原参考序列（含末尾 `$`）
    pub fn recover_text(&self) -> Vec<u8> {
        let n = self.rank.len();
        if n == 0 {
            return Vec::new();
        }
        let mut text = vec![SENTINEL_CHAR; n];
        // 第 0 行是后缀 "$"，其 BWT 字符为文本倒数第二个字符
        let mut row = 0usize;
        for j in (0..n - 1).rev() {
            text[j] = dna::from_alphabet(self.bwt()[row]);
            row = self.lf(row);
        }
        text
    }
}

impl<R: Serialize> FMIndex<R> {
    pub fn save_to_file(&self, path: &str) -> Result<(), IndexError> {
        let f = std::io::BufWriter::new(std::fs::File::create(path)?);
        bincode::serialize_into(f, self)?;
        Ok(())
    }
}

impl<R: OccTable + DeserializeOwned> FMIndex<R> {
    /// 读取并校验索引，结构不一致时返回 IndexError::Corrupt
    pub fn load_from_file(path: &str) -> Result<Self, IndexError> {
        let f = std::io::BufReader::new(std::fs::File::open(path)?);
        let idx: Self = bincode::deserialize_from(f)?;
        idx.verify()?;
        Ok(idx)
    }
}

/// SA 与秩计数以 u32 存储，文本（含哨兵）长度不能超过 u32::MAX
fn check_text_len(reference_len: usize) -> Result<(), IndexError> {
    if reference_len >= u32::MAX as usize {
        return Err(IndexError::ReferenceTooLong { len: reference_len });
    }
    Ok(())
}

/// 校验并编码参考序列，末尾追加哨兵
fn encode_reference(reference: &[u8]) -> Result<Vec<u8>, IndexError> {
    let body = reference.strip_suffix(&[SENTINEL_CHAR]).unwrap_or(reference);
    check_text_len(body.len())?;
    let mut text = Vec::with_capacity(body.len() + 1);
    for (position, &b) in body.iter().enumerate() {
        match dna::to_alphabet(b) {
            Some(c) if c != SENTINEL => text.push(c),
            _ => return Err(IndexError::InvalidSymbol { symbol: b as char, position }),
        }
    }
    text.push(SENTINEL);
    Ok(text)
}
