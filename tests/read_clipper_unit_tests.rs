#![allow(non_upper_case_globals, non_snake_case)]

use haplotypecaller::reads::cigar_utils::CigarUtils;
use haplotypecaller::reads::read_clipper::ReadClipper;
use haplotypecaller::reads::read_filter::ReadFilter;
use haplotypecaller::reads::sam_record::SamRecord;
use haplotypecaller::utils::simple_interval::SimpleInterval;

fn make_read(pos: usize, cigar: &str, seq: &str) -> SamRecord {
    SamRecord {
        qname: "read1".to_string(),
        flags: 0,
        rname: "20".to_string(),
        pos,
        mapq: 60,
        cigar: CigarUtils::cigar_from_str(cigar).unwrap(),
        rnext: "=".to_string(),
        pnext: pos,
        tlen: 0,
        seq: seq.as_bytes().to_vec(),
        qual: vec![b'I'; seq.len()],
    }
}

#[test]
fn test_hard_clip_soft_clipped_bases() {
    let mut read = make_read(100, "3S10M2S", "AAACGTACGTACGTT");
    ReadClipper::hard_clip_soft_clipped_bases(&mut read);
    assert_eq!(read.seq, b"CGTACGTACG".to_vec());
    assert_eq!(read.qual.len(), 10);
    assert_eq!(CigarUtils::cigar_to_string(&read.cigar), "10M");
}

#[test]
fn test_hard_clip_soft_clipped_bases_without_soft_clips_is_a_noop() {
    let mut read = make_read(100, "10M", "ACGTACGTAC");
    ReadClipper::hard_clip_soft_clipped_bases(&mut read);
    assert_eq!(read.seq, b"ACGTACGTAC".to_vec());
    assert_eq!(CigarUtils::cigar_to_string(&read.cigar), "10M");
}

#[test]
fn test_hard_clip_to_interval_front() {
    // alignment [95, 105), window starts at 100: drop the first 5 bases
    let mut read = make_read(96, "10M", "ACGTACGTAC");
    ReadClipper::hard_clip_to_interval(&mut read, &SimpleInterval::new("20", 100, 200));
    assert_eq!(read.seq, b"CGTAC".to_vec());
    assert_eq!(read.qual.len(), 5);
}

#[test]
fn test_hard_clip_to_interval_back() {
    // alignment [100, 110), window ends at 105: drop the last 5 bases
    let mut read = make_read(101, "10M", "ACGTACGTAC");
    ReadClipper::hard_clip_to_interval(&mut read, &SimpleInterval::new("20", 0, 105));
    assert_eq!(read.seq, b"ACGTA".to_vec());
}

#[test]
fn test_hard_clip_to_interval_with_overhang_longer_than_the_read() {
    // a long deletion pushes the alignment end far past the window; the clip
    // is bounded by the bases the read actually has
    let mut read = make_read(101, "10M50D", "ACGTACGTAC");
    ReadClipper::hard_clip_to_interval(&mut read, &SimpleInterval::new("20", 0, 105));
    assert!(read.seq.is_empty());
    assert!(read.qual.is_empty());
}

#[test]
fn test_hard_clip_to_interval_contained_read_is_untouched() {
    let mut read = make_read(101, "10M", "ACGTACGTAC");
    ReadClipper::hard_clip_to_interval(&mut read, &SimpleInterval::new("20", 50, 200));
    assert_eq!(read.seq, b"ACGTACGTAC".to_vec());
}

#[test]
fn test_mapping_quality_filter() {
    let mut read = make_read(100, "10M", "ACGTACGTAC");
    assert!(!ReadFilter::MappingQuality.apply(&read));
    read.mapq = 19;
    assert!(ReadFilter::MappingQuality.apply(&read));
    read.mapq = 20;
    assert!(!ReadFilter::MappingQuality.apply(&read));
}

#[test]
fn test_flag_filters() {
    let mut read = make_read(100, "10M", "ACGTACGTAC");
    assert!(!ReadFilter::Duplicate.apply(&read));
    assert!(!ReadFilter::Secondary.apply(&read));
    read.flags = SamRecord::FLAG_DUPLICATE_READ;
    assert!(ReadFilter::Duplicate.apply(&read));
    read.flags = SamRecord::FLAG_SECONDARY_ALIGNMENT;
    assert!(ReadFilter::Secondary.apply(&read));
}

#[test]
fn test_mate_on_same_contig_filter() {
    let mut read = make_read(100, "10M", "ACGTACGTAC");
    assert!(!ReadFilter::MateOnSameContig.apply(&read));
    read.rnext = "21".to_string();
    assert!(ReadFilter::MateOnSameContig.apply(&read));
}

#[test]
fn test_minimum_length_filter() {
    let read = make_read(100, "10M", "ACGTACGTAC");
    assert!(ReadFilter::MinimumLength.apply(&read));
    let read = make_read(100, "25M", "ACGTACGTACGTACGTACGTACGTA");
    assert!(!ReadFilter::MinimumLength.apply(&read));
}

#[test]
fn test_alignment_interval_comes_from_pos_and_cigar() {
    let read = make_read(100, "2M2I3M1D4M", "ACGTACGTACG");
    assert_eq!(read.get_alignment_begin(), 99);
    assert_eq!(read.get_alignment_end(), 109);
    assert_eq!(read.get_interval(), SimpleInterval::new("20", 99, 109));
}
