use ordered_float::OrderedFloat;
use rust_htslib::bam::record::{Cigar, CigarString};
use std::collections::BTreeMap;

use crate::model::variant_context::VariantContext;

/**
 * A candidate reconstructed sequence for a region, produced by the assembly
 * graph. The cigar and alignment offset are against the padded reference
 * slice; the event map is keyed by the absolute begin coordinate of each
 * event the haplotype carries.
 */
#[derive(Clone, Debug)]
pub struct Haplotype {
    pub bases: Vec<u8>,
    pub event_map: BTreeMap<usize, VariantContext>,
    pub cigar: CigarString,
    pub alignment_begin_wrt_ref: usize,
    pub score: OrderedFloat<f64>,
    pub rank: usize,
    is_ref: bool,
}

impl Haplotype {
    /**
     * Main constructor for assembled haplotypes
     *
     * @param bases the haplotype sequence
     * @param score log10 path probability from the assembly graph
     */
    pub fn new(bases: Vec<u8>, score: f64) -> Haplotype {
        Haplotype {
            bases,
            event_map: BTreeMap::new(),
            cigar: CigarString(Vec::new()),
            alignment_begin_wrt_ref: 0,
            score: OrderedFloat(score),
            rank: 0,
            is_ref: false,
        }
    }

    /**
     * Build the reference haplotype for a padded reference slice: score 0,
     * all-M cigar, aligned at offset 0.
     */
    pub fn new_reference(reference: &[u8]) -> Haplotype {
        Haplotype {
            bases: reference.to_vec(),
            event_map: BTreeMap::new(),
            cigar: CigarString(vec![Cigar::Match(reference.len() as u32)]),
            alignment_begin_wrt_ref: 0,
            score: OrderedFloat(0.0),
            rank: 0,
            is_ref: true,
        }
    }

    pub fn len(&self) -> usize {
        self.bases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    pub fn is_ref(&self) -> bool {
        self.is_ref
    }

    /**
     * Events in this haplotype's map that span the given position: their key
     * is at or before begin and their location extends past it.
     */
    pub fn get_overlapping_events(&self, begin: usize) -> Vec<&VariantContext> {
        self.event_map
            .range(..=begin)
            .filter(|(_, event)| event.location.get_end() > begin)
            .map(|(_, event)| event)
            .collect()
    }
}
