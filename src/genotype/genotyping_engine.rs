use linked_hash_set::LinkedHashSet;
use std::collections::{BTreeMap, BTreeSet};

use crate::haplotype::event_map::EventMap;
use crate::haplotype::haplotype::Haplotype;
use crate::model::variant_context::VariantContext;
use crate::reads::sam_record::SamRecord;
use crate::utils::math_utils::{MathUtils, LOG10_TWO};
use crate::utils::simple_interval::SimpleInterval;

lazy_static! {
    /// Canonical (a1, a2) genotype orderings, a1 <= a2, for every allele
    /// count up to the per-site maximum. The per-site genotype likelihood
    /// vector is addressed in exactly this order.
    static ref ALLELE_INDEX_CACHE: Vec<Vec<(usize, usize)>> = (0..=GenotypingEngine::MAX_ALLELE_COUNT)
        .map(|allele_count| {
            let mut inner_cache = Vec::new();
            for a1 in 0..allele_count {
                for a2 in a1..allele_count {
                    inner_cache.push((a1, a2));
                }
            }
            inner_cache
        })
        .collect::<Vec<Vec<(usize, usize)>>>();
}

/**
 * Turns haplotype events into site-level allele sets, marginalizes
 * read-haplotype likelihoods onto alleles, computes diploid genotype
 * likelihoods and emits the variants that pass the quality gate.
 */
pub struct GenotypingEngine {}

impl GenotypingEngine {
    pub const SPAN_DEL: &'static str = "*";
    const ALLELE_EXTENSION: usize = 2;
    const MAX_GENOTYPE_QUALITY: usize = 99;
    const MIN_GENOTYPE_QUALITY: usize = 10;
    pub const MAX_ALLELE_COUNT: usize = 10;

    /**
     * Genotype every site within the origin span that any haplotype carries
     * an event for, in ascending coordinate order.
     *
     * @param reads the reads surviving PairHMM filtering
     * @param haplotypes the ranked haplotypes; event maps are built here
     * @param haplotype_likelihoods log10 likelihoods indexed [read][haplotype]
     * @param reference the padded reference slice
     * @param padded_region absolute span of the reference slice
     * @param origin_region the primary span in which variants may be called
     */
    pub fn assign_genotype_likelihoods(
        reads: &[SamRecord],
        haplotypes: &mut [Haplotype],
        haplotype_likelihoods: &[Vec<f64>],
        reference: &[u8],
        padded_region: &SimpleInterval,
        origin_region: &SimpleInterval,
    ) -> Vec<VariantContext> {
        let event_begins =
            EventMap::build_event_maps_for_haplotypes(haplotypes, reference, padded_region);

        let mut variants = Vec::new();
        for begin in event_begins {
            if begin < origin_region.get_start() || begin >= origin_region.get_end() {
                continue;
            }

            let mut events = Self::get_events_from_haplotypes(begin, haplotypes);
            Self::replace_span_dels(
                &mut events,
                reference[begin - padded_region.get_start()],
                begin,
            );
            let (alleles, alleles_loc) = Self::get_compatible_alleles(&events);
            let allele_count = alleles.len();
            if allele_count > Self::MAX_ALLELE_COUNT {
                debug!(
                    "Skipping site at {}:{} with {} alleles",
                    alleles_loc.get_contig(),
                    begin,
                    allele_count
                );
                continue;
            }

            let allele_mapper = Self::get_allele_mapper(&alleles, begin, haplotypes);
            let haplotype_mapper = Self::get_haplotype_mapper(&allele_mapper, haplotypes.len());
            let allele_likelihoods = Self::marginalize(
                &haplotype_mapper,
                allele_count,
                reads,
                haplotype_likelihoods,
                &alleles_loc.expand_within_contig(Self::ALLELE_EXTENSION),
            );
            let genotype_likelihoods =
                Self::calculate_genotype_likelihoods(&allele_likelihoods, allele_count);
            let (genotype_index, genotype_quality) =
                Self::get_genotype_quality_and_max_genotype_index(&genotype_likelihoods);
            if genotype_index == 0 || genotype_quality < Self::MIN_GENOTYPE_QUALITY {
                continue;
            }
            let genotype = ALLELE_INDEX_CACHE[allele_count][genotype_index];
            variants.push(VariantContext::new_call(
                alleles_loc,
                alleles,
                genotype,
                genotype_quality,
            ));
        }
        variants
    }

    /**
     * The distinct events across all haplotypes that span the given position.
     */
    fn get_events_from_haplotypes(begin: usize, haplotypes: &[Haplotype]) -> Vec<VariantContext> {
        let mut unique_events: BTreeSet<VariantContext> = BTreeSet::new();
        for haplotype in haplotypes {
            for event in haplotype.get_overlapping_events(begin) {
                unique_events.insert(event.clone());
            }
        }
        unique_events.into_iter().collect()
    }

    /**
     * Events that span this position without starting at it become the
     * spanning-deletion placeholder allele.
     */
    fn replace_span_dels(events: &mut [VariantContext], ref_base: u8, begin: usize) {
        for event in events.iter_mut() {
            if event.location.get_start() != begin {
                *event = VariantContext::new_event(
                    SimpleInterval::new(event.location.get_contig().to_string(), begin, begin + 1),
                    (ref_base as char).to_string(),
                    Self::SPAN_DEL,
                );
            }
        }
    }

    /// The site reference allele is the longest REF among the events.
    fn determine_reference_allele(events: &[VariantContext]) -> String {
        let mut reference_allele = &events[0].ref_allele;
        for event in events {
            if event.ref_allele.len() > reference_allele.len() {
                reference_allele = &event.ref_allele;
            }
        }
        reference_allele.clone()
    }

    /**
     * Rewrite an event's ALT against the (possibly longer) site reference
     * allele by appending the reference bases the event does not cover.
     */
    fn get_compatible_alternate_allele(ref_allele: &str, event: &VariantContext) -> String {
        if event.alt_allele == Self::SPAN_DEL {
            return Self::SPAN_DEL.to_string();
        }
        format!("{}{}", event.alt_allele, &ref_allele[event.ref_allele.len()..])
    }

    fn resolve_incompatible_alleles(
        ref_allele: &str,
        event: &VariantContext,
        alts: &mut LinkedHashSet<String>,
    ) {
        if event.ref_allele == ref_allele {
            alts.insert(event.alt_allele.clone());
        } else {
            alts.insert(Self::get_compatible_alternate_allele(ref_allele, event));
        }
    }

    /**
     * Assemble the site's allele list (REF first, ALTs deduplicated in
     * insertion order) and its location, which is the span of the longest
     * event at the site.
     */
    fn get_compatible_alleles(events: &[VariantContext]) -> (Vec<String>, SimpleInterval) {
        let mut longest_event = &events[0];
        let ref_allele = Self::determine_reference_allele(events);
        let mut alts: LinkedHashSet<String> = LinkedHashSet::new();
        for event in events {
            if event.size() > longest_event.size() {
                longest_event = event;
            }
            Self::resolve_incompatible_alleles(&ref_allele, event, &mut alts);
        }
        let mut alleles = vec![ref_allele];
        alleles.extend(alts.into_iter());
        (alleles, longest_event.location.clone())
    }

    /**
     * Map each allele index to the ranks of the haplotypes supporting it.
     * Haplotypes without a spanning event at the site support the reference.
     */
    fn get_allele_mapper(
        alleles: &[String],
        begin: usize,
        haplotypes: &[Haplotype],
    ) -> BTreeMap<usize, Vec<usize>> {
        let mut result: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        result.entry(0).or_insert_with(Vec::new);
        let ref_allele = &alleles[0];
        let get_index = |allele: &str| {
            alleles
                .iter()
                .position(|candidate| candidate == allele)
                .expect("Site allele list must contain every event allele")
        };
        for haplotype in haplotypes {
            let spanning_events = haplotype.get_overlapping_events(begin);
            if spanning_events.is_empty() {
                result.entry(0).or_insert_with(Vec::new).push(haplotype.rank);
            }
            for event in spanning_events {
                let allele_index = if event.location.get_start() == begin {
                    if event.ref_allele.len() == ref_allele.len() {
                        get_index(&event.alt_allele)
                    } else if event.ref_allele.len() < ref_allele.len() {
                        get_index(&Self::get_compatible_alternate_allele(ref_allele, event))
                    } else {
                        continue;
                    }
                } else {
                    get_index(Self::SPAN_DEL)
                };
                result
                    .entry(allele_index)
                    .or_insert_with(Vec::new)
                    .push(haplotype.rank);
            }
        }
        result
    }

    fn get_haplotype_mapper(
        allele_mapper: &BTreeMap<usize, Vec<usize>>,
        haplotype_count: usize,
    ) -> Vec<usize> {
        let mut haplotype_mapper = vec![0_usize; haplotype_count];
        for (&allele_index, haplotype_ranks) in allele_mapper {
            for &rank in haplotype_ranks {
                haplotype_mapper[rank] = allele_index;
            }
        }
        haplotype_mapper
    }

    fn get_read_indices_to_keep(reads: &[SamRecord], overlap: &SimpleInterval) -> Vec<usize> {
        reads
            .iter()
            .enumerate()
            .filter(|(_, read)| read.get_interval().overlaps(overlap))
            .map(|(index, _)| index)
            .collect()
    }

    /**
     * Project read-haplotype likelihoods onto alleles: a read's likelihood
     * for an allele is the best likelihood among the haplotypes mapped to it.
     * Only reads near the site (its location expanded by ALLELE_EXTENSION)
     * participate.
     */
    fn marginalize(
        haplotype_mapper: &[usize],
        allele_count: usize,
        reads: &[SamRecord],
        haplotype_likelihoods: &[Vec<f64>],
        overlap: &SimpleInterval,
    ) -> Vec<Vec<f64>> {
        let read_indices_to_keep = Self::get_read_indices_to_keep(reads, overlap);
        let mut allele_likelihoods =
            vec![vec![std::f64::NEG_INFINITY; allele_count]; read_indices_to_keep.len()];
        for (r, &old_read_index) in read_indices_to_keep.iter().enumerate() {
            for (h, &allele_index) in haplotype_mapper.iter().enumerate() {
                let likelihood = haplotype_likelihoods[old_read_index][h];
                if likelihood > allele_likelihoods[r][allele_index] {
                    allele_likelihoods[r][allele_index] = likelihood;
                }
            }
        }
        allele_likelihoods
    }

    fn single_component_genotype_likelihood_by_read(
        genotype_likelihoods: &mut Vec<f64>,
        allele_likelihoods: &[Vec<f64>],
        a: usize,
    ) {
        genotype_likelihoods.extend(
            allele_likelihoods
                .iter()
                .map(|likelihoods| likelihoods[a] + *LOG10_TWO),
        );
    }

    fn two_component_genotype_likelihood_by_read(
        genotype_likelihoods: &mut Vec<f64>,
        allele_likelihoods: &[Vec<f64>],
        a1: usize,
        a2: usize,
    ) {
        genotype_likelihoods.extend(allele_likelihoods.iter().map(|likelihoods| {
            MathUtils::approximate_log10_sum_log10(likelihoods[a1], likelihoods[a2])
        }));
    }

    fn calculate_read_likelihoods_by_genotype_index(
        allele_likelihoods: &[Vec<f64>],
        allele_count: usize,
    ) -> Vec<Vec<f64>> {
        let genotype_count = (allele_count + 1) * allele_count / 2;
        let mut read_likelihoods_by_genotype_index = Vec::with_capacity(genotype_count);
        for a1 in 0..allele_count {
            for a2 in a1..allele_count {
                let mut read_genotype_likelihoods = Vec::with_capacity(allele_likelihoods.len());
                if a1 == a2 {
                    Self::single_component_genotype_likelihood_by_read(
                        &mut read_genotype_likelihoods,
                        allele_likelihoods,
                        a1,
                    );
                } else {
                    Self::two_component_genotype_likelihood_by_read(
                        &mut read_genotype_likelihoods,
                        allele_likelihoods,
                        a1,
                        a2,
                    );
                }
                read_likelihoods_by_genotype_index.push(read_genotype_likelihoods);
            }
        }
        read_likelihoods_by_genotype_index
    }

    /**
     * Collapse per-read genotype likelihoods into one log10 likelihood per
     * genotype, normalizing out the diploid ploidy factor.
     */
    fn get_genotype_likelihoods(read_likelihoods_by_genotype_index: &[Vec<f64>]) -> Vec<f64> {
        let denominator = read_likelihoods_by_genotype_index[0].len() as f64 * *LOG10_TWO;
        read_likelihoods_by_genotype_index
            .iter()
            .map(|read_likelihoods| read_likelihoods.iter().sum::<f64>() - denominator)
            .collect()
    }

    fn calculate_genotype_likelihoods(
        allele_likelihoods: &[Vec<f64>],
        allele_count: usize,
    ) -> Vec<f64> {
        let read_likelihoods_by_genotype_index =
            Self::calculate_read_likelihoods_by_genotype_index(allele_likelihoods, allele_count);
        Self::get_genotype_likelihoods(&read_likelihoods_by_genotype_index)
    }

    /**
     * @return the index of the most likely genotype and the phred-scaled
     * margin over the runner-up, capped at MAX_GENOTYPE_QUALITY
     */
    fn get_genotype_quality_and_max_genotype_index(genotypes: &[f64]) -> (usize, usize) {
        let (mut max, mut second_max, mut max_index);
        if genotypes[0] > genotypes[1] {
            second_max = genotypes[1];
            max = genotypes[0];
            max_index = 0;
        } else {
            second_max = genotypes[0];
            max = genotypes[1];
            max_index = 1;
        }
        for (i, &likelihood) in genotypes.iter().enumerate().skip(2) {
            if likelihood >= max {
                second_max = max;
                max = likelihood;
                max_index = i;
            } else if likelihood > second_max {
                second_max = likelihood;
            }
        }
        let genotype_quality = (-10.0 * (second_max - max)).round() as usize;
        (
            max_index,
            std::cmp::min(genotype_quality, Self::MAX_GENOTYPE_QUALITY),
        )
    }
}
