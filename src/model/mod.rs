pub mod variant_context;
pub mod vcf_writer;
