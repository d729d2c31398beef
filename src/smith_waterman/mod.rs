pub mod smith_waterman_aligner;
