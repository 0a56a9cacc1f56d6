use thiserror::Error;

/// 调用边界上的参数校验错误（不做静默截断）
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("checkpoint step must be greater than zero")]
    CheckpointStep,

    #[error("min_depth must be >= 1, got {0}")]
    MinDepth(u32),

    #[error("min_alt_frac must lie in [0, 1], got {0}")]
    MinAltFrac(f64),

    #[error("invalid seed lengths: min_seed_len={min}, max_seed_len={max}")]
    SeedLength { min: usize, max: usize },

    #[error("thread count must be greater than zero")]
    Threads,
}

/// 索引构建与持久化错误
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("unsupported symbol '{symbol}' at reference position {position}")]
    InvalidSymbol { symbol: char, position: usize },

    #[error("reference of {len} bp exceeds the 32-bit index limit")]
    ReferenceTooLong { len: usize },

    #[error("corrupt index: {0}")]
    Corrupt(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("index i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index codec error: {0}")]
    Codec(#[from] bincode::Error),
}

/// 比对阶段错误
#[derive(Debug, Error)]
pub enum MapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot build mapping thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// 整条分析流程的错误
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Map(#[from] MapError),
}
