#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;

pub mod assembly;
pub mod cli;
pub mod genotype;
pub mod haplotype;
pub mod model;
pub mod pair_hmm;
pub mod reads;
pub mod smith_waterman;
pub mod utils;
