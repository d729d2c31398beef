use ndarray::Array2;

use crate::haplotype::haplotype::Haplotype;
use crate::reads::sam_record::SamRecord;
use crate::utils::quality_utils::QualityUtils;

lazy_static! {
    static ref INITIAL_CONDITION: f64 = 2.0_f64.powf(1020.0);
    static ref INITIAL_CONDITION_LOG10: f64 = (*INITIAL_CONDITION).log10();
}

/**
 * Pair HMM for scoring reads against haplotypes under a three-state
 * (Match/Insertion/Deletion) model. Figure 4.1 in Durbin 1998.
 *
 * The forward recursion runs in probability space scaled by INITIAL_CONDITION
 * to keep intermediates inside double range; the scale is removed in log10 at
 * the end. Matrices are sized once per region and reused across every
 * (read, haplotype) pair.
 */
pub struct PairHMM {
    match_matrix: Array2<f64>,
    insertion_matrix: Array2<f64>,
    deletion_matrix: Array2<f64>,
    prior: Array2<f64>,
    previous_haplotype_length: Option<usize>,
    max_read_length: usize,
    max_haplotype_length: usize,
}

impl PairHMM {
    const M_TO_M: usize = 0;
    const M_TO_I: usize = 1;
    const M_TO_D: usize = 2;
    const I_TO_M: usize = 3;
    const I_TO_I: usize = 4;
    const D_TO_M: usize = 5;
    const D_TO_D: usize = 6;

    /// Constant transition probabilities [M->M, M->I, M->D, I->M, I->I, D->M, D->D].
    pub const TRANSITION_PROBABILITIES: [f64; 7] = [0.9998, 0.0001, 0.0001, 0.9, 0.1, 0.9, 0.1];

    const TRISTATE_CORRECTION: f64 = 3.0;
    const MAXIMUM_BEST_ALT_LIKELIHOOD_DIFFERENCE: f64 = -4.5;
    const EXPECTED_ERROR_RATE_PER_BASE: f64 = 0.02;
    const LOG10_QUALITY_PER_BASE: f64 = -4.0;
    const MAXIMUM_EXPECTED_ERROR_PER_READ: f64 = 2.0;

    /**
     * Initialize this PairHMM, making it suitable to run against reads and
     * haplotypes up to the given lengths.
     */
    pub fn initialize(max_read_length: usize, max_haplotype_length: usize) -> PairHMM {
        let padded_max_read_length = max_read_length + 1;
        let padded_max_haplotype_length = max_haplotype_length + 1;
        PairHMM {
            match_matrix: Array2::zeros((padded_max_read_length, padded_max_haplotype_length)),
            insertion_matrix: Array2::zeros((padded_max_read_length, padded_max_haplotype_length)),
            deletion_matrix: Array2::zeros((padded_max_read_length, padded_max_haplotype_length)),
            prior: Array2::zeros((padded_max_read_length, padded_max_haplotype_length)),
            previous_haplotype_length: None,
            max_read_length,
            max_haplotype_length,
        }
    }

    /**
     * For every read compute the log10 probability of the read arising from
     * each haplotype, then cap each read's likelihoods at best - 4.5 and drop
     * reads whose best likelihood falls below the expected-error threshold
     * (removing their rows in place, preserving order).
     *
     * Per-base qualities are first clipped from above by the read's mapping
     * quality.
     *
     * @return the surviving likelihood matrix, indexed [read][haplotype]
     */
    pub fn compute_log10_likelihoods(
        &mut self,
        haplotypes: &[Haplotype],
        reads: &mut Vec<SamRecord>,
    ) -> Vec<Vec<f64>> {
        if reads.is_empty() {
            return Vec::new();
        }

        for read in reads.iter_mut() {
            Self::modify_read_qualities(read);
        }

        let mut log_likelihoods = Vec::with_capacity(reads.len());
        for read in reads.iter() {
            let row = haplotypes
                .iter()
                .map(|haplotype| self.compute_read_likelihood_given_haplotype_log10(read, haplotype))
                .collect::<Vec<f64>>();
            log_likelihoods.push(row);
        }

        self.normalize_likelihoods_and_filter_poorly_modeled_reads(reads, &mut log_likelihoods);
        log_likelihoods
    }

    /// Clip the read's base qualities from above by its mapping quality.
    fn modify_read_qualities(read: &mut SamRecord) {
        let cap = QualityUtils::ASCII_OFFSET.saturating_add(read.mapq);
        for qual in read.qual.iter_mut() {
            *qual = std::cmp::min(*qual, cap);
        }
    }

    fn compute_read_likelihood_given_haplotype_log10(
        &mut self,
        read: &SamRecord,
        haplotype: &Haplotype,
    ) -> f64 {
        assert!(
            read.len() <= self.max_read_length && haplotype.len() <= self.max_haplotype_length,
            "PairHMM matrices are too small for the given read and haplotype"
        );

        // free deletions in the beginning: the first deletion row carries the
        // scale factor spread across the haplotype
        if self.previous_haplotype_length != Some(haplotype.len()) {
            let initial_value = *INITIAL_CONDITION / haplotype.len() as f64;
            self.deletion_matrix.row_mut(0).fill(initial_value);
            self.previous_haplotype_length = Some(haplotype.len());
        }

        self.initialize_priors(read, haplotype);

        let t = &Self::TRANSITION_PROBABILITIES;
        for i in 1..=read.len() {
            for j in 1..=haplotype.len() {
                self.match_matrix[[i, j]] = self.prior[[i, j]]
                    * (self.match_matrix[[i - 1, j - 1]] * t[Self::M_TO_M]
                        + self.insertion_matrix[[i - 1, j - 1]] * t[Self::I_TO_M]
                        + self.deletion_matrix[[i - 1, j - 1]] * t[Self::D_TO_M]);
                self.insertion_matrix[[i, j]] = self.match_matrix[[i - 1, j]] * t[Self::M_TO_I]
                    + self.insertion_matrix[[i - 1, j]] * t[Self::I_TO_I];
                self.deletion_matrix[[i, j]] = self.match_matrix[[i, j - 1]] * t[Self::M_TO_D]
                    + self.deletion_matrix[[i, j - 1]] * t[Self::D_TO_D];
            }
        }

        let end_i = read.len();
        let mut final_sum_probabilities = 0.0;
        for j in 1..=haplotype.len() {
            final_sum_probabilities +=
                self.match_matrix[[end_i, j]] + self.deletion_matrix[[end_i, j]];
        }

        let result = final_sum_probabilities.log10() - *INITIAL_CONDITION_LOG10;
        assert!(
            result <= 0.0,
            "PairHMM log probability cannot be greater than 0.0"
        );
        result
    }

    /**
     * Initializes the matrix that holds all the constants related to the
     * editing distance between the read and the haplotype.
     */
    fn initialize_priors(&mut self, read: &SamRecord, haplotype: &Haplotype) {
        for i in 0..read.len() {
            let x = read.seq[i];
            let qual = read.qual[i];
            for j in 0..haplotype.len() {
                let y = haplotype.bases[j];
                self.prior[[i + 1, j + 1]] = if x == y || x == b'N' || y == b'N' {
                    QualityUtils::qual_to_prob(qual)
                } else {
                    QualityUtils::qual_to_error_prob(qual) / Self::TRISTATE_CORRECTION
                };
            }
        }
    }

    fn normalize_likelihoods_and_filter_poorly_modeled_reads(
        &self,
        reads: &mut Vec<SamRecord>,
        log_likelihoods: &mut Vec<Vec<f64>>,
    ) {
        let mut remove_indices = Vec::new();
        for (i, row) in log_likelihoods.iter_mut().enumerate() {
            let best_likelihood = row.iter().cloned().fold(std::f64::NEG_INFINITY, f64::max);
            let cap_likelihood = best_likelihood + Self::MAXIMUM_BEST_ALT_LIKELIHOOD_DIFFERENCE;
            for likelihood in row.iter_mut() {
                if *likelihood < cap_likelihood {
                    *likelihood = cap_likelihood;
                }
            }

            let likelihood_threshold = Self::MAXIMUM_EXPECTED_ERROR_PER_READ
                .min((reads[i].len() as f64 * Self::EXPECTED_ERROR_RATE_PER_BASE).ceil())
                * Self::LOG10_QUALITY_PER_BASE;
            if best_likelihood < likelihood_threshold {
                remove_indices.push(i);
            }
        }

        for &i in remove_indices.iter().rev() {
            log_likelihoods.remove(i);
            reads.remove(i);
        }
    }
}
