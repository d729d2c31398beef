use ndarray::Array2;
use rust_htslib::bam::record::{Cigar, CigarString};

lazy_static! {
    pub static ref ORIGINAL_DEFAULT: SWParameters = SWParameters::new(3, -1, -4, -3);
    pub static ref STANDARD_NGS: SWParameters = SWParameters::new(25, -50, -110, -6);
    pub static ref NEW_SW_PARAMETERS: SWParameters = SWParameters::new(200, -150, -260, -11);
    pub static ref ALIGNMENT_TO_BEST_HAPLOTYPE_SW_PARAMETERS: SWParameters =
        SWParameters::new(10, -15, -30, -5);
}

/**
 * A set of weights for the Smith-Waterman alignment: match bonus, mismatch
 * penalty, gap open penalty and gap extension penalty.
 */
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SWParameters {
    pub w_match: i32,
    pub w_mismatch: i32,
    pub w_open: i32,
    pub w_extend: i32,
}

impl SWParameters {
    pub fn new(w_match: i32, w_mismatch: i32, w_open: i32, w_extend: i32) -> SWParameters {
        SWParameters {
            w_match,
            w_mismatch,
            w_open,
            w_extend,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SmithWatermanAlignmentResult {
    pub alignment_offset: usize,
    pub cigar: CigarString,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum State {
    Match,
    Insertion,
    Deletion,
}

/**
 * Affine-gap Smith-Waterman used to align assembled haplotypes back to the
 * padded reference slice.
 */
pub struct SmithWatermanAligner {}

impl SmithWatermanAligner {
    /**
     * Perform a Smith-Waterman alignment of alt against ref.
     *
     * @param reference bases to align to, must be the byte equivalent of uppercase chars
     * @param alternate bases to align against the reference
     * @param parameters the set of weights to use
     * @return the alignment offset into the reference and the cigar of the alignment
     */
    pub fn align(
        reference: &[u8],
        alternate: &[u8],
        parameters: &SWParameters,
    ) -> SmithWatermanAlignmentResult {
        assert!(
            !reference.is_empty() && !alternate.is_empty(),
            "Non-empty sequences are required for the Smith-Waterman calculation"
        );

        let mut score = Array2::<i32>::zeros((reference.len() + 1, alternate.len() + 1));
        let mut trace = Array2::<i32>::zeros((reference.len() + 1, alternate.len() + 1));
        Self::calculate_matrix(reference, alternate, &mut score, &mut trace, parameters);
        Self::calculate_cigar(&score, &trace)
    }

    /**
     * Fill the score and trace matrices. The trace matrix records, for each
     * cell, the signed length of the winning step: 0 for a diagonal step,
     * +len for a vertical (deletion) gap and -len for a horizontal
     * (insertion) gap. Ties resolve diagonal > down > right.
     */
    fn calculate_matrix(
        reference: &[u8],
        alternate: &[u8],
        score: &mut Array2<i32>,
        trace: &mut Array2<i32>,
        parameters: &SWParameters,
    ) {
        let row_size = reference.len() + 1;
        let col_size = alternate.len() + 1;

        let low_init = std::i32::MIN / 2;
        let mut gap_size_down = vec![0_i32; col_size + 1];
        let mut best_gap_down = vec![low_init; col_size + 1];
        let mut gap_size_right = vec![0_i32; row_size + 1];
        let mut best_gap_right = vec![low_init; row_size + 1];

        for i in 1..row_size {
            for j in 1..col_size {
                let step_diag = score[[i - 1, j - 1]]
                    + if reference[i - 1] == alternate[j - 1] {
                        parameters.w_match
                    } else {
                        parameters.w_mismatch
                    };

                // running best score of a vertical gap ending at (i, j), either
                // freshly opened from the cell above or extended by one
                let gap_open_down = score[[i - 1, j]] + parameters.w_open;
                best_gap_down[j] += parameters.w_extend;
                if gap_open_down > best_gap_down[j] {
                    best_gap_down[j] = gap_open_down;
                    gap_size_down[j] = 1;
                } else {
                    gap_size_down[j] += 1;
                }
                let step_down = best_gap_down[j];
                let step_down_size = gap_size_down[j];

                let gap_open_right = score[[i, j - 1]] + parameters.w_open;
                best_gap_right[i] += parameters.w_extend;
                if gap_open_right > best_gap_right[i] {
                    best_gap_right[i] = gap_open_right;
                    gap_size_right[i] = 1;
                } else {
                    gap_size_right[i] += 1;
                }
                let step_right = best_gap_right[i];
                let step_right_size = gap_size_right[i];

                if step_diag >= step_down && step_diag >= step_right {
                    score[[i, j]] = step_diag;
                    trace[[i, j]] = 0;
                } else if step_down >= step_right {
                    score[[i, j]] = step_down;
                    trace[[i, j]] = step_down_size;
                } else {
                    score[[i, j]] = step_right;
                    trace[[i, j]] = -step_right_size;
                }
            }
        }
    }

    /**
     * Walk the trace matrix back from the best-scoring end cell and emit the
     * alignment as an offset into the reference plus a cigar over the
     * alternate (soft-clipping any overhangs).
     */
    fn calculate_cigar(score: &Array2<i32>, trace: &Array2<i32>) -> SmithWatermanAlignmentResult {
        let ref_size = score.nrows() - 1;
        let alt_size = score.ncols() - 1;

        let mut max_score = std::i32::MIN;
        let mut segment_length: usize = 0;

        // look for the largest score on the rightmost column. we use >= combined with the traversal
        // direction to ensure that if two scores are equal, the one closer to diagonal gets picked
        let mut pos_i = 0;
        for i in 1..=ref_size {
            let cur_score = score[[i, alt_size]];
            if cur_score >= max_score {
                max_score = cur_score;
                pos_i = i;
            }
        }

        // now look for a larger score on the bottom-most row
        let mut pos_j = alt_size;
        let abs_diff = |x: usize, y: usize| if x > y { x - y } else { y - x };
        for j in 1..=alt_size {
            let cur_score = score[[ref_size, j]];
            if cur_score > max_score
                || (cur_score == max_score && abs_diff(ref_size, j) < abs_diff(pos_i, pos_j))
            {
                max_score = cur_score;
                pos_i = ref_size;
                pos_j = j;
                // end of the alternate is overhanging; record it as a soft clip
                segment_length = alt_size - j;
            }
        }

        let mut elements: Vec<Cigar> = Vec::new();
        if segment_length > 0 {
            elements.push(Cigar::SoftClip(segment_length as u32));
            segment_length = 0;
        }

        let mut state = State::Match;
        loop {
            let cur_trace = trace[[pos_i, pos_j]];
            let (new_state, step_size) = if cur_trace > 0 {
                (State::Deletion, cur_trace as usize)
            } else if cur_trace < 0 {
                (State::Insertion, (-cur_trace) as usize)
            } else {
                (State::Match, 1)
            };

            // move to the next best location in the sw matrix
            match new_state {
                State::Match => {
                    pos_i -= 1;
                    pos_j -= 1;
                }
                State::Insertion => pos_j -= step_size,
                State::Deletion => pos_i -= step_size,
            }

            if new_state == state {
                segment_length += step_size;
            } else {
                if segment_length > 0 {
                    elements.push(Self::make_element(state, segment_length as u32));
                }
                segment_length = step_size;
                state = new_state;
            }

            if pos_i == 0 || pos_j == 0 {
                break;
            }
        }

        elements.push(Self::make_element(state, segment_length as u32));
        let alignment_offset = pos_i;
        if pos_j > 0 {
            elements.push(Cigar::SoftClip(pos_j as u32));
        }

        elements.reverse();
        SmithWatermanAlignmentResult {
            alignment_offset,
            cigar: CigarString(elements),
        }
    }

    fn make_element(state: State, length: u32) -> Cigar {
        match state {
            State::Match => Cigar::Match(length),
            State::Insertion => Cigar::Ins(length),
            State::Deletion => Cigar::Del(length),
        }
    }
}
