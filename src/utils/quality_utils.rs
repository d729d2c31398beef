lazy_static! {
    static ref QUAL_TO_ERROR_PROB_CACHE: Vec<f64> = (0..=255_usize)
        .map(|q| {
            if q < QualityUtils::ASCII_OFFSET as usize {
                0.0
            } else {
                10.0_f64.powf(-((q - QualityUtils::ASCII_OFFSET as usize) as f64) / 10.0)
            }
        })
        .collect::<Vec<f64>>();
}

pub struct QualityUtils {}

impl QualityUtils {
    /// Offset of the phred+33 encoding used for per-base qualities throughout the caller.
    pub const ASCII_OFFSET: u8 = b'!';

    /**
     * Convert a phred+33 encoded quality score to its probability of being wrong (Q30 => 0.001)
     *
     * This is the Phred-style conversion, *not* the Illumina-style conversion.
     * The result is read from a precomputed cache so this is cheap to call per base.
     *
     * @param qual a phred+33 encoded quality score
     * @return a probability (0.0-1.0)
     */
    pub fn qual_to_error_prob(qual: u8) -> f64 {
        QUAL_TO_ERROR_PROB_CACHE[qual as usize]
    }

    /**
     * Convert a phred+33 encoded quality score to its probability of being true (Q30 => 0.999)
     */
    pub fn qual_to_prob(qual: u8) -> f64 {
        1.0 - QualityUtils::qual_to_error_prob(qual)
    }
}
