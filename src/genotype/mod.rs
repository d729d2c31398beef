pub mod genotyping_engine;
