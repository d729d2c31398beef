use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::model::variant_context::VariantContext;
use crate::utils::errors::HaplotypeCallerError;

/**
 * Minimal VCF v4.2 text sink. Rows are appended in the order they are given;
 * the engine is responsible for handing them over in scan order.
 */
pub struct VcfWriter {
    writer: BufWriter<File>,
}

impl VcfWriter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<VcfWriter, HaplotypeCallerError> {
        let file = File::create(path.as_ref()).map_err(|e| {
            HaplotypeCallerError::VcfWrite(format!(
                "Unable to create {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Ok(VcfWriter {
            writer: BufWriter::new(file),
        })
    }

    pub fn write_header(&mut self, sample: &str) -> Result<(), HaplotypeCallerError> {
        writeln!(self.writer, "##fileformat=VCFv4.2")
            .and_then(|_| {
                writeln!(
                    self.writer,
                    "##FORMAT=<ID=GQ,Number=1,Type=Integer,Description=\"Genotype Quality\">"
                )
            })
            .and_then(|_| {
                writeln!(
                    self.writer,
                    "##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">"
                )
            })
            .and_then(|_| {
                writeln!(
                    self.writer,
                    "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\t{}",
                    sample
                )
            })
            .map_err(|e| HaplotypeCallerError::VcfWrite(e.to_string()))
    }

    pub fn write_variant(&mut self, variant: &VariantContext) -> Result<(), HaplotypeCallerError> {
        writeln!(self.writer, "{}", variant)
            .map_err(|e| HaplotypeCallerError::VcfWrite(e.to_string()))
    }
}
