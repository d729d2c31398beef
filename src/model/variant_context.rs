use itertools::Itertools;
use std::cmp::Ordering;
use std::fmt;

use crate::utils::simple_interval::SimpleInterval;

/**
 * A variation event against the reference: either a raw haplotype event
 * (REF/ALT pair at a location) or, once genotyped, a full site record with
 * its allele list, diploid genotype and genotype quality.
 *
 * Identity and ordering are by (location, REF, ALT).
 */
#[derive(Clone, Debug)]
pub struct VariantContext {
    pub location: SimpleInterval,
    pub ref_allele: String,
    pub alt_allele: String,
    pub alleles: Vec<String>,
    pub genotype: (usize, usize),
    pub genotype_quality: usize,
}

impl VariantContext {
    /**
     * Build a raw event as extracted from a haplotype's cigar walk; the
     * site-level fields are filled in by the genotyper.
     */
    pub fn new_event<R: Into<String>, A: Into<String>>(
        location: SimpleInterval,
        ref_allele: R,
        alt_allele: A,
    ) -> VariantContext {
        VariantContext {
            location,
            ref_allele: ref_allele.into(),
            alt_allele: alt_allele.into(),
            alleles: Vec::new(),
            genotype: (0, 0),
            genotype_quality: 0,
        }
    }

    /**
     * Build a called site with its full allele list and genotype.
     */
    pub fn new_call(
        location: SimpleInterval,
        alleles: Vec<String>,
        genotype: (usize, usize),
        genotype_quality: usize,
    ) -> VariantContext {
        VariantContext {
            location,
            ref_allele: String::new(),
            alt_allele: String::new(),
            alleles,
            genotype,
            genotype_quality,
        }
    }

    pub fn size(&self) -> usize {
        self.location.size()
    }
}

impl PartialEq for VariantContext {
    fn eq(&self, other: &Self) -> bool {
        self.location == other.location
            && self.ref_allele == other.ref_allele
            && self.alt_allele == other.alt_allele
    }
}

impl Eq for VariantContext {}

impl Ord for VariantContext {
    fn cmp(&self, other: &Self) -> Ordering {
        self.location
            .cmp(&other.location)
            .then_with(|| self.ref_allele.cmp(&other.ref_allele))
            .then_with(|| self.alt_allele.cmp(&other.alt_allele))
    }
}

impl PartialOrd for VariantContext {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Formats the variant as a VCF v4.2 data row (POS is 1-based).
impl fmt::Display for VariantContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t.\t{}\t",
            self.location.get_contig(),
            self.location.get_start() + 1,
            if self.alleles.is_empty() {
                "."
            } else {
                self.alleles[0].as_str()
            }
        )?;
        if self.alleles.len() > 1 {
            write!(f, "{}", self.alleles[1..].iter().join(","))?;
        } else {
            write!(f, ".")?;
        }
        write!(
            f,
            "\t.\t.\t.\tGT:GQ\t{}/{}:{}",
            self.genotype.0, self.genotype.1, self.genotype_quality
        )
    }
}
