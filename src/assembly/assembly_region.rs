use std::cmp::min;

use crate::utils::simple_interval::SimpleInterval;

/**
 * Region of the genome that gets assembled by the local assembly engine.
 *
 * An AssemblyRegion is defined by two intervals -- a primary interval in
 * which variants are called and a second, padded, interval used for read
 * recruitment and assembly. Although we do not call variants in the padding,
 * assembling over a larger territory improves calls in the primary span.
 */
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssemblyRegion {
    /**
     * The span in which this region is responsible for calling variants
     */
    active_span: SimpleInterval,
    /**
     * The padded span in which we perform assembly in order to call variants
     * within the active span
     */
    padded_span: SimpleInterval,
}

impl AssemblyRegion {
    /**
     * Create a new AssemblyRegion
     * @param active_span the primary span of this region
     * @param padding the symmetric padding to use for assembly
     * @param contig_length length of the region's contig
     */
    pub fn new(active_span: SimpleInterval, padding: usize, contig_length: usize) -> AssemblyRegion {
        AssemblyRegion {
            padded_span: Self::make_padded_span(&active_span, padding, contig_length),
            active_span,
        }
    }

    fn make_padded_span(
        active_span: &SimpleInterval,
        padding: usize,
        contig_length: usize,
    ) -> SimpleInterval {
        SimpleInterval::new(
            active_span.get_contig(),
            active_span.get_start().saturating_sub(padding),
            min(active_span.get_end() + padding, contig_length),
        )
    }

    /**
     * Tile a processing interval covering the whole contig with fixed-size
     * primary windows, each padded symmetrically for assembly.
     */
    pub fn tile_contig(
        contig: &str,
        contig_length: usize,
        region_size: usize,
        padding: usize,
    ) -> Vec<AssemblyRegion> {
        (0..contig_length)
            .step_by(region_size)
            .map(|begin| {
                let end = min(begin + region_size, contig_length);
                AssemblyRegion::new(
                    SimpleInterval::new(contig, begin, end),
                    padding,
                    contig_length,
                )
            })
            .collect()
    }

    pub fn active_span(&self) -> &SimpleInterval {
        &self.active_span
    }

    pub fn padded_span(&self) -> &SimpleInterval {
        &self.padded_span
    }
}
