pub mod pileup;
pub mod snp;

pub use pileup::Pileup;
pub use snp::{call_from_pileup, call_snps, CallOpt, SnpRecord};
