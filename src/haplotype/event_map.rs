use rust_htslib::bam::record::Cigar;
use std::collections::BTreeSet;

use crate::haplotype::haplotype::Haplotype;
use crate::model::variant_context::VariantContext;
use crate::utils::simple_interval::SimpleInterval;

/**
 * Extract simple variation events from haplotypes by walking their cigars
 * against the padded reference.
 */
pub struct EventMap {}

impl EventMap {
    /**
     * Build event maps for each haplotype, returning the sorted set of the
     * starting positions of all events across all haplotypes. Also assigns
     * each haplotype its rank (its index in the list).
     *
     * @param haplotypes the ranked haplotypes of the region
     * @param reference the padded reference slice
     * @param padded_region the absolute span of the reference slice
     */
    pub fn build_event_maps_for_haplotypes(
        haplotypes: &mut [Haplotype],
        reference: &[u8],
        padded_region: &SimpleInterval,
    ) -> BTreeSet<usize> {
        let mut event_begins = BTreeSet::new();
        debug!("=== Best Haplotypes ===");
        for (rank, haplotype) in haplotypes.iter_mut().enumerate() {
            haplotype.rank = rank;
            Self::process_cigar_for_initial_events(haplotype, reference, padded_region);
            event_begins.extend(haplotype.event_map.keys().cloned());
            debug!("> Cigar = {:?}", &haplotype.cigar);
            debug!(">> Events = {:?}", &haplotype.event_map);
        }
        event_begins
    }

    /**
     * Walk along the alignment and turn any difference from the reference
     * into an event: mismatches within M blocks become SNVs, I and D blocks
     * become insertions/deletions anchored at the preceding reference base.
     */
    fn process_cigar_for_initial_events(
        haplotype: &mut Haplotype,
        reference: &[u8],
        padded_region: &SimpleInterval,
    ) {
        let contig = padded_region.get_contig().to_string();
        let padded_begin = padded_region.get_start();

        let cigar = haplotype.cigar.clone();
        let mut ref_pos = haplotype.alignment_begin_wrt_ref;
        let mut hap_pos = 0_usize;

        for element in cigar.0.iter() {
            match *element {
                Cigar::Match(length) => {
                    let length = length as usize;
                    for offset in 0..length {
                        if reference[ref_pos + offset] != haplotype.bases[hap_pos + offset] {
                            let mismatch_begin = padded_begin + ref_pos + offset;
                            let event = VariantContext::new_event(
                                SimpleInterval::new(
                                    contig.clone(),
                                    mismatch_begin,
                                    mismatch_begin + 1,
                                ),
                                (reference[ref_pos + offset] as char).to_string(),
                                (haplotype.bases[hap_pos + offset] as char).to_string(),
                            );
                            haplotype.event_map.insert(mismatch_begin, event);
                        }
                    }
                    ref_pos += length;
                    hap_pos += length;
                }
                Cigar::Ins(length) => {
                    let length = length as usize;
                    if ref_pos > 0 {
                        let anchor = reference[ref_pos - 1] as char;
                        let mut alt = anchor.to_string();
                        alt.push_str(
                            std::str::from_utf8(&haplotype.bases[hap_pos..hap_pos + length])
                                .expect("Haplotype bases must be valid ASCII"),
                        );
                        let insertion_begin = padded_begin + ref_pos - 1;
                        let event = VariantContext::new_event(
                            SimpleInterval::new(
                                contig.clone(),
                                insertion_begin,
                                insertion_begin + 1,
                            ),
                            anchor.to_string(),
                            alt,
                        );
                        haplotype.event_map.insert(insertion_begin, event);
                    }
                    hap_pos += length;
                }
                Cigar::Del(length) => {
                    let length = length as usize;
                    if ref_pos > 0 {
                        let deletion_begin = padded_begin + ref_pos - 1;
                        let event = VariantContext::new_event(
                            SimpleInterval::new(
                                contig.clone(),
                                deletion_begin,
                                deletion_begin + length + 1,
                            ),
                            std::str::from_utf8(&reference[ref_pos - 1..ref_pos + length])
                                .expect("Reference bases must be valid ASCII")
                                .to_string(),
                            (reference[ref_pos - 1] as char).to_string(),
                        );
                        haplotype.event_map.insert(deletion_begin, event);
                    }
                    ref_pos += length;
                }
                Cigar::SoftClip(length) => {
                    hap_pos += length as usize;
                }
                other => panic!(
                    "Unsupported cigar operator {} created during haplotype alignment",
                    other.char()
                ),
            }
        }
    }
}
