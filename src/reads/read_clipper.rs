use rust_htslib::bam::record::Cigar;

use crate::reads::sam_record::SamRecord;
use crate::utils::simple_interval::SimpleInterval;

/**
 * Hard-clipping operations applied to reads before assembly.
 *
 * Both operations remove bases from SEQ/QUAL in place. Soft-clip removal also
 * drops the clipped elements from the cigar; interval clipping leaves POS and
 * the cigar untouched so the read keeps its original alignment interval.
 */
pub struct ReadClipper {}

impl ReadClipper {
    /**
     * Remove leading and trailing soft-clipped bases from SEQ and QUAL,
     * dropping the corresponding S elements from the cigar.
     */
    pub fn hard_clip_soft_clipped_bases(read: &mut SamRecord) {
        if read.cigar.0.is_empty() {
            return;
        }

        if let Cigar::SoftClip(front_length) = read.cigar.0[0] {
            let front_length = front_length as usize;
            read.seq.drain(..front_length.min(read.seq.len()));
            read.qual.drain(..front_length.min(read.qual.len()));
            read.cigar.0.remove(0);
        }

        if let Some(&Cigar::SoftClip(back_length)) = read.cigar.0.last() {
            let back_length = back_length as usize;
            read.seq.truncate(read.seq.len().saturating_sub(back_length));
            read.qual.truncate(read.qual.len().saturating_sub(back_length));
            read.cigar.0.pop();
        }
    }

    /**
     * Trim SEQ and QUAL so the read does not extend past the given interval.
     */
    pub fn hard_clip_to_interval(read: &mut SamRecord, interval: &SimpleInterval) {
        assert_eq!(
            read.rname,
            interval.get_contig(),
            "Read and clipping interval must be on the same contig"
        );

        let alignment_begin = read.get_alignment_begin();
        let alignment_end = read.get_alignment_end();

        if alignment_begin < interval.get_start() {
            let clip_size = (interval.get_start() - alignment_begin).min(read.seq.len());
            read.seq.drain(..clip_size);
            read.qual.drain(..clip_size);
        }
        if alignment_end > interval.get_end() {
            let clip_size = (alignment_end - interval.get_end()).min(read.seq.len());
            read.seq.truncate(read.seq.len() - clip_size);
            read.qual.truncate(read.qual.len() - clip_size);
        }
    }
}
