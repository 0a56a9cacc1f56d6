pub mod bwt;
pub mod fm;
pub mod rank;
pub mod sa;

pub use fm::{FMIndex, IndexMeta, IndexOpt};
pub use rank::{CheckpointRank, DenseRank, OccTable};
