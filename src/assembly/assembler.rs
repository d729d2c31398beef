use rust_htslib::bam::record::{Cigar, CigarString};
use std::collections::HashSet;

use crate::assembly::read_threading_graph::ReadThreadingGraph;
use crate::haplotype::haplotype::Haplotype;
use crate::reads::sam_record::SamRecord;
use crate::smith_waterman::smith_waterman_aligner::{SmithWatermanAligner, NEW_SW_PARAMETERS};
use crate::utils::quality_utils::QualityUtils;

/**
 * Local reassembly of a region's reads into candidate haplotypes.
 *
 * Builds a kmer de Bruijn graph over the reference and the high-quality
 * portions of the reads, escalating the kmer size until a usable graph is
 * found, then enumerates and scores source-to-sink paths. The surviving
 * haplotypes are aligned back to the padded reference so their cigars can
 * seed the event maps.
 */
pub struct Assembler {
    starting_kmer_size: usize,
    min_base_quality_to_use: u8,
}

impl Default for Assembler {
    fn default() -> Assembler {
        Assembler {
            starting_kmer_size: 25,
            min_base_quality_to_use: 10 + QualityUtils::ASCII_OFFSET,
        }
    }
}

impl Assembler {
    pub const KMER_SIZE_ITERATION_INCREASE: usize = 10;
    pub const MAX_KMER_ITERATIONS_TO_ATTEMPT: usize = 6;
    pub const MAX_UNIQUE_KMERS_COUNT_TO_DISCARD: usize = 1000;
    /// Haplotypes are ranked by score and truncated to this many.
    pub const MAX_HAPLOTYPES_TO_RETAIN: usize = 128;
    /// Same-length haplotypes within this Hamming distance of the reference
    /// skip Smith-Waterman and take an all-M alignment.
    const MAX_MISMATCHES_FOR_TRIVIAL_ALIGNMENT: usize = 2;

    pub fn new(starting_kmer_size: usize, min_base_quality_to_use: u8) -> Assembler {
        Assembler {
            starting_kmer_size,
            min_base_quality_to_use,
        }
    }

    /**
     * Assemble the reads over the padded reference slice into ranked, aligned
     * haplotypes. The reference haplotype is always present (score 0, all-M
     * cigar); an empty result means the region cannot be assembled.
     */
    pub fn assemble(&self, reads: &[SamRecord], reference: &[u8]) -> Vec<Haplotype> {
        let (mut haplotypes, too_many_unique_kmers) =
            self.assemble_with_kmer_size(reads, reference, self.starting_kmer_size, false);

        if haplotypes.is_empty() && !too_many_unique_kmers {
            let mut kmer_size = self.starting_kmer_size;
            for iteration in 1..=Self::MAX_KMER_ITERATIONS_TO_ATTEMPT {
                kmer_size += Self::KMER_SIZE_ITERATION_INCREASE;
                let last_attempt = iteration == Self::MAX_KMER_ITERATIONS_TO_ATTEMPT;
                let (candidate, too_many) =
                    self.assemble_with_kmer_size(reads, reference, kmer_size, last_attempt);
                haplotypes = candidate;
                if !haplotypes.is_empty() || too_many {
                    break;
                }
            }
        }

        self.align_haplotypes_to_reference(&mut haplotypes, reference);
        haplotypes
    }

    /**
     * One assembly attempt at a fixed kmer size. The second member of the
     * returned pair signals the too-many-unique-kmers condition, which stops
     * the caller from escalating further.
     */
    fn assemble_with_kmer_size(
        &self,
        reads: &[SamRecord],
        reference: &[u8],
        kmer_size: usize,
        allow_duplicate_kmers_in_ref: bool,
    ) -> (Vec<Haplotype>, bool) {
        if reference.len() < kmer_size {
            return (Vec::new(), false);
        }

        if !allow_duplicate_kmers_in_ref
            && !ReadThreadingGraph::duplicate_kmers_of(reference, kmer_size).is_empty()
        {
            debug!(
                "Not using kmer size of {} in read threading assembler because reference contains non-unique kmers",
                kmer_size
            );
            return (Vec::new(), false);
        }

        let mut graph = ReadThreadingGraph::new(kmer_size, self.min_base_quality_to_use);
        graph.set_reference(reference);
        for read in reads {
            graph.add_read(read);
        }
        graph.build();

        if graph.unique_kmers_count() > Self::MAX_UNIQUE_KMERS_COUNT_TO_DISCARD {
            debug!(
                "Not using kmer size of {} in read threading assembler because it has too much unique kmers",
                kmer_size
            );
            return (Vec::new(), true);
        }

        if graph.has_cycles() {
            debug!(
                "Not using kmer size of {} in read threading assembler because it contains a cycle",
                kmer_size
            );
            return (Vec::new(), false);
        }

        if graph.is_low_complexity() {
            debug!(
                "Not using kmer size of {} in read threading assembler because it does not produce a graph with enough complexity",
                kmer_size
            );
            return (Vec::new(), false);
        }

        debug!("Using kmer size of {} in assembler", kmer_size);
        (self.rank_haplotypes(graph.find_paths(), reference), false)
    }

    /**
     * Put the reference haplotype first, drop path haplotypes that reproduce
     * the reference or each other, and keep the top scorers.
     */
    fn rank_haplotypes(&self, paths: Vec<Haplotype>, reference: &[u8]) -> Vec<Haplotype> {
        let mut haplotypes = vec![Haplotype::new_reference(reference)];
        haplotypes.extend(
            paths
                .into_iter()
                .filter(|haplotype| haplotype.bases.as_slice() != reference),
        );

        haplotypes.sort_by(|a, b| b.score.cmp(&a.score));

        let mut seen: HashSet<Vec<u8>> = HashSet::new();
        haplotypes.retain(|haplotype| seen.insert(haplotype.bases.clone()));
        haplotypes.truncate(Self::MAX_HAPLOTYPES_TO_RETAIN);
        haplotypes
    }

    fn align_haplotypes_to_reference(&self, haplotypes: &mut [Haplotype], reference: &[u8]) {
        for haplotype in haplotypes.iter_mut() {
            if haplotype.is_ref() {
                continue;
            }
            if haplotype.len() == reference.len()
                && Self::hamming_distance(&haplotype.bases, reference)
                    <= Self::MAX_MISMATCHES_FOR_TRIVIAL_ALIGNMENT
            {
                haplotype.cigar = CigarString(vec![Cigar::Match(haplotype.len() as u32)]);
                haplotype.alignment_begin_wrt_ref = 0;
            } else {
                let alignment =
                    SmithWatermanAligner::align(reference, &haplotype.bases, &NEW_SW_PARAMETERS);
                haplotype.alignment_begin_wrt_ref = alignment.alignment_offset;
                haplotype.cigar = alignment.cigar;
            }
        }
    }

    fn hamming_distance(a: &[u8], b: &[u8]) -> usize {
        a.iter().zip(b.iter()).filter(|(x, y)| x != y).count()
    }
}
