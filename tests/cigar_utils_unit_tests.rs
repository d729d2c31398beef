#![allow(non_upper_case_globals, non_snake_case)]

use haplotypecaller::reads::cigar_utils::CigarUtils;
use rust_htslib::bam::record::{Cigar, CigarString};

#[test]
fn test_cigar_string_round_trip() {
    for text in &["31M20S", "2M2I3M1D4M", "80M", "5S10M3D7M5S", "1M1I1D1N1S1H1P1=1X"] {
        let cigar = CigarUtils::cigar_from_str(text).unwrap();
        assert_eq!(&CigarUtils::cigar_to_string(&cigar), text);
    }
}

#[test]
fn test_cigar_from_str_parses_elements() {
    let cigar = CigarUtils::cigar_from_str("2M2I3M1D4M").unwrap();
    assert_eq!(
        cigar,
        CigarString(vec![
            Cigar::Match(2),
            Cigar::Ins(2),
            Cigar::Match(3),
            Cigar::Del(1),
            Cigar::Match(4),
        ])
    );
}

#[test]
fn test_cigar_from_str_rejects_malformed_input() {
    assert!(CigarUtils::cigar_from_str("M").is_err());
    assert!(CigarUtils::cigar_from_str("10Q").is_err());
    assert!(CigarUtils::cigar_from_str("10M5").is_err());
}

#[test]
fn test_reference_length_counts_m_d_n_eq_x() {
    let cigar = CigarUtils::cigar_from_str("2M2I3M1D4M").unwrap();
    assert_eq!(CigarUtils::reference_length(&cigar), 10);

    let cigar = CigarUtils::cigar_from_str("5S10M2N3=2X4H").unwrap();
    assert_eq!(CigarUtils::reference_length(&cigar), 17);
}

#[test]
fn test_read_length_counts_m_i_s_eq_x() {
    let cigar = CigarUtils::cigar_from_str("2M2I3M1D4M").unwrap();
    assert_eq!(CigarUtils::read_length(&cigar), 11);

    let cigar = CigarUtils::cigar_from_str("5S10M2N3=2X4H").unwrap();
    assert_eq!(CigarUtils::read_length(&cigar), 20);
}

#[test]
fn test_contains_operator() {
    let cigar = CigarUtils::cigar_from_str("31M20S").unwrap();
    assert!(CigarUtils::contains_operator(&cigar, 'S'));
    assert!(CigarUtils::contains_operator(&cigar, 'M'));
    assert!(!CigarUtils::contains_operator(&cigar, 'D'));
}
