use serde::{Deserialize, Serialize};

use crate::error::IndexError;
use crate::util::dna::SIGMA;

fn corrupt(msg: impl Into<String>) -> IndexError {
    IndexError::Corrupt(msg.into())
}

/// BWT 上的秩查询接口：count_symbol(c, pos) = BWT[0..pos) 中 c 的出现次数。
/// 采样检查点、全量前缀表、小波树等都可以实现这一契约。
pub trait OccTable {
    /// 底层 BWT（编码后的字母表）
    fn bwt(&self) -> &[u8];

    /// pos 超出 BWT 长度时按全长计数
    fn count_symbol(&self, symbol: u8, pos: usize) -> u32;

    fn len(&self) -> usize {
        self.bwt().len()
    }

    fn is_empty(&self) -> bool {
        self.bwt().is_empty()
    }

    /// 反序列化后的一致性检查；默认只检查 BWT 字母表
    fn verify(&self) -> Result<(), IndexError> {
        match self.bwt().iter().position(|&c| c as usize >= SIGMA) {
            Some(i) => Err(corrupt(format!("BWT symbol {} at row {}", self.bwt()[i], i))),
            None => Ok(()),
        }
    }
}

/// 稀疏检查点秩结构：
/// - 每个字母一张升序表 `(position, count_before_position)`，按步长 step 采样；
/// - 表尾追加 `(len, total)`，因此最后一个检查点等于该字母总数；
/// - 查询 = 最近检查点 + 至多 step 长度的顺扫。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointRank {
    step: u32,
    bwt: Vec<u8>,
    checkpoints: Vec<Vec<(u32, u32)>>,
}

impl CheckpointRank {
    /// step 须大于 0（由 FMIndex::build 在边界处校验）
    pub fn build(bwt: Vec<u8>, step: usize) -> Self {
        debug_assert!(step > 0);
        let n = bwt.len();
        let mut checkpoints: Vec<Vec<(u32, u32)>> =
            (0..SIGMA).map(|_| Vec::with_capacity(n / step + 2)).collect();
        let mut running = [0u32; SIGMA];
        for (i, &ch) in bwt.iter().enumerate() {
            if i % step == 0 {
                for (a, list) in checkpoints.iter_mut().enumerate() {
                    list.push((i as u32, running[a]));
                }
            }
            running[ch as usize] += 1;
        }
        for (a, list) in checkpoints.iter_mut().enumerate() {
            list.push((n as u32, running[a]));
        }
        Self { step: step as u32, bwt, checkpoints }
    }

    pub fn step(&self) -> usize {
        self.step as usize
    }

    pub fn checkpoints(&self, symbol: u8) -> &[(u32, u32)] {
        self.checkpoints
            .get(symbol as usize)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

impl OccTable for CheckpointRank {
    fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    #[inline]
    fn count_symbol(&self, symbol: u8, pos: usize) -> u32 {
        let list = self.checkpoints(symbol);
        if pos == 0 || list.is_empty() {
            return 0;
        }
        let pos = pos.min(self.bwt.len());
        let idx = pos / self.step as usize;
        let &(cp_pos, cp_count) = list.get(idx).unwrap_or(&list[list.len() - 1]);
        let add = self.bwt[cp_pos as usize..pos]
            .iter()
            .filter(|&&ch| ch == symbol)
            .count() as u32;
        cp_count + add
    }

    fn verify(&self) -> Result<(), IndexError> {
        if self.step == 0 {
            return Err(corrupt("checkpoint step is zero"));
        }
        if self.checkpoints.len() != SIGMA {
            return Err(corrupt("checkpoint table has wrong alphabet size"));
        }
        let n = self.bwt.len();
        let step = self.step as usize;
        let expected_len = n / step + usize::from(n % step != 0) + 1;
        let mut running = [0u32; SIGMA];
        for i in 0..expected_len {
            let pos = (i * step).min(n);
            for (a, list) in self.checkpoints.iter().enumerate() {
                if list.len() != expected_len || list[i] != (pos as u32, running[a]) {
                    return Err(corrupt(format!("checkpoint mismatch for symbol {} at {}", a, pos)));
                }
            }
            let end = ((i + 1) * step).min(n);
            for &ch in self.bwt.get(pos..end).unwrap_or(&[]) {
                let slot = running
                    .get_mut(ch as usize)
                    .ok_or_else(|| corrupt(format!("BWT symbol {}", ch)))?;
                *slot += 1;
            }
        }
        Ok(())
    }
}

/// 全量前缀计数表：occ[i][c] = BWT[0..i) 中 c 的个数。O(1) 查询，空间 O(n·σ)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DenseRank {
    bwt: Vec<u8>,
    occ: Vec<[u32; SIGMA]>,
}

impl DenseRank {
    pub fn build(bwt: Vec<u8>) -> Self {
        let mut occ = Vec::with_capacity(bwt.len() + 1);
        let mut running = [0u32; SIGMA];
        occ.push(running);
        for &ch in &bwt {
            running[ch as usize] += 1;
            occ.push(running);
        }
        Self { bwt, occ }
    }
}

impl OccTable for DenseRank {
    fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    #[inline]
    fn count_symbol(&self, symbol: u8, pos: usize) -> u32 {
        let pos = pos.min(self.bwt.len());
        self.occ[pos].get(symbol as usize).copied().unwrap_or(0)
    }

    fn verify(&self) -> Result<(), IndexError> {
        if self.occ.len() != self.bwt.len() + 1 {
            return Err(corrupt("occurrence table length does not match BWT"));
        }
        let mut running = [0u32; SIGMA];
        for (i, row) in self.occ.iter().enumerate() {
            if *row != running {
                return Err(corrupt(format!("occurrence row {} mismatch", i)));
            }
            if let Some(&ch) = self.bwt.get(i) {
                let slot = running
                    .get_mut(ch as usize)
                    .ok_or_else(|| corrupt(format!("BWT symbol {} at row {}", ch, i)))?;
                *slot += 1;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bwt(len: usize) -> Vec<u8> {
        let mut x: u32 = 2024;
        (0..len)
            .map(|_| {
                x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                ((x >> 16) % SIGMA as u32) as u8
            })
            .collect()
    }

    fn naive_count(bwt: &[u8], symbol: u8, pos: usize) -> u32 {
        bwt[..pos.min(bwt.len())].iter().filter(|&&c| c == symbol).count() as u32
    }

    #[test]
    fn checkpoint_counts_match_naive() {
        for step in [1usize, 3, 4, 16, 64] {
            for len in [0usize, 1, 15, 16, 17, 33, 100] {
                let bwt = make_bwt(len);
                let rank = CheckpointRank::build(bwt.clone(), step);
                for c in 0..SIGMA as u8 {
                    for pos in 0..=len + 3 {
                        assert_eq!(
                            rank.count_symbol(c, pos),
                            naive_count(&bwt, c, pos),
                            "step={} len={} c={} pos={}",
                            step,
                            len,
                            c,
                            pos
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn final_checkpoint_is_total_and_monotonic() {
        let bwt = make_bwt(77);
        let rank = CheckpointRank::build(bwt.clone(), 8);
        for c in 0..SIGMA as u8 {
            let list = rank.checkpoints(c);
            assert!(list.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 <= w[1].1));
            assert_eq!(list.last().copied(), Some((77, naive_count(&bwt, c, 77))));
        }
    }

    #[test]
    fn dense_agrees_with_checkpoint() {
        let bwt = make_bwt(200);
        let sparse = CheckpointRank::build(bwt.clone(), 16);
        let dense = DenseRank::build(bwt);
        for c in 0..SIGMA as u8 {
            for pos in 0..=205 {
                assert_eq!(sparse.count_symbol(c, pos), dense.count_symbol(c, pos));
            }
        }
    }

    #[test]
    fn unknown_symbol_counts_zero() {
        let rank = CheckpointRank::build(vec![1, 2, 0], 2);
        assert_eq!(rank.count_symbol(9, 3), 0);
    }

    #[test]
    fn built_tables_verify() {
        for len in [0, 1, 7, 8, 9, 64, 77] {
            let bwt = make_bwt(len);
            for step in [1, 3, 8, 100] {
                let rank = CheckpointRank::build(bwt.clone(), step);
                assert!(rank.verify().is_ok(), "len={} step={}", len, step);
            }
            assert!(DenseRank::build(bwt).verify().is_ok());
        }
    }

    #[test]
    fn tampered_tables_fail_verify() {
        let mut rank = CheckpointRank::build(make_bwt(40), 8);
        rank.step = 0;
        assert!(matches!(rank.verify(), Err(IndexError::Corrupt(_))));

        let mut rank = CheckpointRank::build(make_bwt(40), 8);
        rank.bwt[3] = SIGMA as u8;
        assert!(matches!(rank.verify(), Err(IndexError::Corrupt(_))));

        let mut rank = CheckpointRank::build(make_bwt(40), 8);
        rank.checkpoints[2][1].1 += 1;
        assert!(rank.verify().is_err());

        let mut dense = DenseRank::build(make_bwt(40));
        dense.bwt[0] = 200;
        assert!(dense.verify().is_err());

        let mut dense = DenseRank::build(make_bwt(40));
        dense.occ.pop();
        assert!(dense.verify().is_err());
    }
}
