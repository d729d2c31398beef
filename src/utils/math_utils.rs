use rayon::prelude::*;

lazy_static! {
    static ref JACOBIAN_CACHE: Vec<f64> =
        (0..((JacobianLogTable::MAX_TOLERANCE / JacobianLogTable::TABLE_STEP) + 1.0) as usize)
            .into_par_iter()
            .map(|k| (1.0 + 10.0_f64.powf(-(k as f64) * JacobianLogTable::TABLE_STEP)).log10())
            .collect::<Vec<f64>>();
    pub static ref LOG10_TWO: f64 = 2.0_f64.log10();
}

pub struct MathUtils {}

impl MathUtils {
    /**
     * Calculate the approximate log10 sum of two log10 values, i.e.
     * log10(10^a + 10^b), using the Jacobian logarithm table.
     *
     * @param a the first log10 value
     * @param b the second log10 value
     * @return an approximation of log10(10^a + 10^b)
     */
    pub fn approximate_log10_sum_log10(a: f64, b: f64) -> f64 {
        // this code works only when a <= b so we flip them if the order is opposite
        if a > b {
            return MathUtils::approximate_log10_sum_log10(b, a);
        } else if a == std::f64::NEG_INFINITY {
            return b;
        }

        // if |b-a| < tol we need to compute log(e^a + e^b) = log(e^b(1 + e^(a-b))) = b + log(1 + e^(-(b-a)))
        // we compute the second term as a table lookup with integer quantization
        let diff = b - a;
        b + if diff < JacobianLogTable::MAX_TOLERANCE {
            JacobianLogTable::get(diff)
        } else {
            0.0
        }
    }

    pub fn is_valid_log10_probability(result: f64) -> bool {
        result <= 0.0
    }
}

/**
 * Encapsulates the second term of the Jacobian log identity for differences up to MAX_TOLERANCE
 */
pub struct JacobianLogTable {}

impl JacobianLogTable {
    // if log(a) - log(b) > MAX_TOLERANCE, b is effectively treated as zero in approximateLogSumLog
    // MAX_TOLERANCE = 8.0 introduces an error of at most one part in 10^8 in sums
    pub const MAX_TOLERANCE: f64 = 8.0;

    pub const TABLE_STEP: f64 = 0.0001;
    pub const INV_STEP: f64 = 1.0 / JacobianLogTable::TABLE_STEP;

    pub fn get(difference: f64) -> f64 {
        let index = (difference * JacobianLogTable::INV_STEP).round() as usize;
        JACOBIAN_CACHE[index]
    }
}
