use std::collections::BTreeMap;

use rayon::prelude::*;

use crate::align::Alignment;

/// 参考坐标 -> (观测碱基 -> 次数)。按位置、碱基有序。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pileup {
    columns: BTreeMap<usize, BTreeMap<u8, u32>>,
}

impl Pileup {
    pub fn new() -> Self {
        Self::default()
    }

    /// 将一条比对的每个碱基叠加到参考坐标上
    pub fn add_alignment(&mut self, aln: &Alignment) {
        for (i, &base) in aln.sequence.iter().enumerate() {
            *self.columns.entry(aln.ref_pos + i).or_default().entry(base).or_insert(0) += 1;
        }
    }

    pub fn build(alignments: &[Alignment]) -> Self {
        let mut pileup = Self::new();
        for aln in alignments {
            pileup.add_alignment(aln);
        }
        pileup
    }

    /// 并行累加：各线程局部 pileup 再按位置求和归并（加法满足交换律与结合律）
    pub fn build_parallel(alignments: &[Alignment]) -> Self {
        alignments
            .par_iter()
            .fold(Self::new, |mut acc, aln| {
                acc.add_alignment(aln);
                acc
            })
            .reduce(Self::new, Self::merge)
    }

    pub fn merge(mut self, other: Self) -> Self {
        for (pos, counts) in other.columns {
            let column = self.columns.entry(pos).or_default();
            for (base, n) in counts {
                *column.entry(base).or_insert(0) += n;
            }
        }
        self
    }

    pub fn column(&self, pos: usize) -> Option<&BTreeMap<u8, u32>> {
        self.columns.get(&pos)
    }

    pub fn depth(&self, pos: usize) -> u32 {
        self.column(pos).map_or(0, |c| c.values().sum())
    }

    /// 有观测的位置，升序
    pub fn iter(&self) -> impl Iterator<Item = (usize, &BTreeMap<u8, u32>)> {
        self.columns.iter().map(|(&p, c)| (p, c))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::Strand;

    fn aln(pos: usize, seq: &[u8]) -> Alignment {
        Alignment {
            read_id: "r".into(),
            ref_pos: pos,
            mismatches: 0,
            strand: Strand::Forward,
            sequence: seq.to_vec(),
        }
    }

    #[test]
    fn overlapping_alignments_accumulate() {
        let p = Pileup::build(&[aln(2, b"ACG"), aln(3, b"CT")]);
        assert_eq!(p.len(), 3);
        assert_eq!(p.depth(3), 2);
        assert_eq!(p.column(4).unwrap().get(&b'G'), Some(&1));
        assert_eq!(p.column(4).unwrap().get(&b'T'), Some(&1));
        assert_eq!(p.depth(0), 0);
    }

    #[test]
    fn parallel_build_equals_sequential() {
        let alns: Vec<Alignment> = (0..200).map(|i| aln(i % 37, b"ACGTTGCA")).collect();
        assert_eq!(Pileup::build(&alns), Pileup::build_parallel(&alns));
    }
}
