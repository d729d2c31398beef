use rayon::prelude::*;
use rust_htslib::bam::{self, Read};

use crate::assembly::assembler::Assembler;
use crate::assembly::assembly_region::AssemblyRegion;
use crate::genotype::genotyping_engine::GenotypingEngine;
use crate::model::variant_context::VariantContext;
use crate::model::vcf_writer::VcfWriter;
use crate::pair_hmm::pair_hmm::PairHMM;
use crate::reads::read_clipper::ReadClipper;
use crate::reads::read_filter::ReadFilter;
use crate::reads::sam_record::SamRecord;
use crate::utils::errors::HaplotypeCallerError;
use crate::utils::simple_interval::SimpleInterval;

/**
 * Drives the caller across a reference contig: tiles it into assembly
 * regions, recruits and prepares each region's reads, and runs assembly,
 * PairHMM and genotyping over them.
 *
 * Regions are independent and are dispatched to the rayon pool; each worker
 * owns its own BAM reader handle. Per-region output is buffered and flushed
 * to the VCF sink in scan order.
 */
pub struct HaplotypeCallerEngine {
    bam_path: String,
    reference_path: String,
    output_path: String,
    assembly_region_size: usize,
    assembly_region_padding: usize,
    max_reads_per_assembly_region: usize,
}

impl HaplotypeCallerEngine {
    pub const DEFAULT_ASSEMBLY_REGION_SIZE: usize = 245;
    pub const DEFAULT_ASSEMBLY_REGION_PADDING: usize = 85;
    pub const DEFAULT_MAX_READS_PER_ASSEMBLY_REGION: usize = 200;
    const SAMPLE_NAME: &'static str = "NA12878";

    pub fn new(bam_path: &str, reference_path: &str, output_path: &str) -> HaplotypeCallerEngine {
        HaplotypeCallerEngine {
            bam_path: bam_path.to_string(),
            reference_path: reference_path.to_string(),
            output_path: output_path.to_string(),
            assembly_region_size: Self::DEFAULT_ASSEMBLY_REGION_SIZE,
            assembly_region_padding: Self::DEFAULT_ASSEMBLY_REGION_PADDING,
            max_reads_per_assembly_region: Self::DEFAULT_MAX_READS_PER_ASSEMBLY_REGION,
        }
    }

    /**
     * Call variants over the whole reference contig and write them to the
     * VCF sink. This is the only entry point of the binary.
     */
    pub fn call_variants(&self) -> Result<(), HaplotypeCallerError> {
        let (contig, reference) = self.read_reference()?;
        info!(
            "Loaded reference contig {} of {} bases",
            contig,
            reference.len()
        );

        let regions = AssemblyRegion::tile_contig(
            &contig,
            reference.len(),
            self.assembly_region_size,
            self.assembly_region_padding,
        );
        info!("Processing {} assembly regions", regions.len());

        let per_region_variants = regions
            .par_iter()
            .map(|region| self.call_region(region, &reference))
            .collect::<Result<Vec<Vec<VariantContext>>, HaplotypeCallerError>>()?;

        let mut writer = VcfWriter::from_path(&self.output_path)?;
        writer.write_header(Self::SAMPLE_NAME)?;
        let mut emitted = 0;
        for variants in per_region_variants {
            for variant in variants {
                writer.write_variant(&variant)?;
                emitted += 1;
            }
        }
        info!("Wrote {} variants to {}", emitted, self.output_path);
        Ok(())
    }

    /// Load the single reference record the FASTA collaborator supplies.
    fn read_reference(&self) -> Result<(String, Vec<u8>), HaplotypeCallerError> {
        let reader = bio::io::fasta::Reader::from_file(&self.reference_path).map_err(|e| {
            HaplotypeCallerError::FastaRead(format!(
                "Unable to open {}: {}",
                self.reference_path, e
            ))
        })?;
        let record = reader
            .records()
            .next()
            .ok_or_else(|| {
                HaplotypeCallerError::FastaRead(format!(
                    "No FASTA records found in {}",
                    self.reference_path
                ))
            })?
            .map_err(|e| HaplotypeCallerError::FastaRead(e.to_string()))?;
        Ok((record.id().to_string(), record.seq().to_vec()))
    }

    /**
     * Run the full pipeline over one assembly region. Every skip is logged
     * and yields an empty result; only I/O failures are errors.
     */
    fn call_region(
        &self,
        region: &AssemblyRegion,
        reference: &[u8],
    ) -> Result<Vec<VariantContext>, HaplotypeCallerError> {
        let padded = region.padded_span();

        let reads = self.fetch_reads(padded)?;
        if reads.is_empty() {
            debug!("Skipping region {:?}: no overlapping reads", region.active_span());
            return Ok(Vec::new());
        }

        let mut reads =
            Self::prepare_reads(reads, padded, self.max_reads_per_assembly_region);
        if reads.is_empty() {
            debug!(
                "Skipping region {:?}: no reads survived filtering",
                region.active_span()
            );
            return Ok(Vec::new());
        }

        let padded_reference =
            reference[padded.get_start()..padded.get_end()].to_ascii_uppercase();

        let mut haplotypes = Assembler::default().assemble(&reads, &padded_reference);
        if haplotypes.len() < 2 {
            debug!(
                "Skipping region {:?}: assembly produced {} haplotype(s)",
                region.active_span(),
                haplotypes.len()
            );
            return Ok(Vec::new());
        }

        let max_read_length = reads.iter().map(|read| read.len()).max().unwrap_or(0);
        let max_haplotype_length = haplotypes
            .iter()
            .map(|haplotype| haplotype.len())
            .max()
            .unwrap_or(0);
        let mut pair_hmm = PairHMM::initialize(max_read_length, max_haplotype_length);
        let likelihoods = pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);
        if reads.is_empty() {
            debug!(
                "Skipping region {:?}: no reads survived likelihood filtering",
                region.active_span()
            );
            return Ok(Vec::new());
        }

        let variants = GenotypingEngine::assign_genotype_likelihoods(
            &reads,
            &mut haplotypes,
            &likelihoods,
            &padded_reference,
            padded,
            region.active_span(),
        );
        debug!(
            "Region {:?}: {} variant(s) emitted",
            region.active_span(),
            variants.len()
        );
        Ok(variants)
    }

    /**
     * Ask the BAM collaborator for the mapped reads overlapping the padded
     * span. Each region worker opens its own reader handle.
     */
    fn fetch_reads(&self, padded: &SimpleInterval) -> Result<Vec<SamRecord>, HaplotypeCallerError> {
        let mut reader = bam::IndexedReader::from_path(&self.bam_path).map_err(|e| {
            HaplotypeCallerError::BamRead(format!("Unable to open {}: {}", self.bam_path, e))
        })?;

        let target_names = reader
            .header()
            .target_names()
            .iter()
            .map(|name| String::from_utf8_lossy(name).to_string())
            .collect::<Vec<String>>();
        let tid = target_names
            .iter()
            .position(|name| name == padded.get_contig())
            .ok_or_else(|| {
                HaplotypeCallerError::BamRead(format!(
                    "Contig {} not found in BAM header",
                    padded.get_contig()
                ))
            })?;

        reader
            .fetch((
                tid as i32,
                padded.get_start() as i64,
                padded.get_end() as i64,
            ))
            .map_err(|e| HaplotypeCallerError::BamRead(e.to_string()))?;

        let mut reads = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| HaplotypeCallerError::BamRead(e.to_string()))?;
            if record.is_unmapped() || record.pos() < 0 {
                continue;
            }
            reads.push(SamRecord::from_hts_record(&record, &target_names));
        }
        Ok(reads)
    }

    /**
     * Filter, clip and downsample a region's reads: apply the stateless
     * pre-clipping filters, hard-clip soft clips and overhangs beyond the
     * padded span, drop reads that end up too short, and uniformly subsample
     * if the region is over its read cap.
     */
    pub fn prepare_reads(
        mut reads: Vec<SamRecord>,
        padded: &SimpleInterval,
        max_reads: usize,
    ) -> Vec<SamRecord> {
        reads.retain(|read| {
            !ReadFilter::PRE_CLIPPING_FILTERS
                .iter()
                .any(|filter| filter.apply(read))
        });

        for read in reads.iter_mut() {
            ReadClipper::hard_clip_soft_clipped_bases(read);
            ReadClipper::hard_clip_to_interval(read, padded);
        }

        reads.retain(|read| !ReadFilter::MinimumLength.apply(read));

        if reads.len() > max_reads {
            let mut keep =
                rand::seq::index::sample(&mut rand::thread_rng(), reads.len(), max_reads)
                    .into_vec();
            keep.sort_unstable();
            let sampled = keep
                .into_iter()
                .map(|index| reads[index].clone())
                .collect::<Vec<SamRecord>>();
            reads = sampled;
        }
        reads
    }
}
