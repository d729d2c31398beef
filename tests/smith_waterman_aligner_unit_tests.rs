#![allow(non_upper_case_globals, non_snake_case)]

use haplotypecaller::reads::cigar_utils::CigarUtils;
use haplotypecaller::smith_waterman::smith_waterman_aligner::{
    SWParameters, SmithWatermanAligner, NEW_SW_PARAMETERS, ORIGINAL_DEFAULT, STANDARD_NGS,
};

fn assert_alignment(
    reference: &str,
    alternate: &str,
    parameters: &SWParameters,
    expected_offset: usize,
    expected_cigar: &str,
) {
    let result =
        SmithWatermanAligner::align(reference.as_bytes(), alternate.as_bytes(), parameters);
    assert_eq!(
        result.alignment_offset, expected_offset,
        "wrong offset aligning {} against {}",
        alternate, reference
    );
    assert_eq!(
        CigarUtils::cigar_to_string(&result.cigar),
        expected_cigar,
        "wrong cigar aligning {} against {}",
        alternate,
        reference
    );
}

#[test]
fn test_sub_string_match() {
    assert_alignment("AAACCCCC", "CCCCC", &ORIGINAL_DEFAULT, 3, "5M");
}

#[test]
fn test_degenerate_alignment_with_indels_at_both_ends() {
    assert_alignment(
        "TGTGTGTGTGTGTGACAGAGAGAGAGAGAGAGAGAGAGAGAGAGA",
        "ACAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGAGA",
        &STANDARD_NGS,
        14,
        "31M20S",
    );
}

#[test]
fn test_indels_at_start_and_end() {
    assert_alignment("AAACCCCC", "CCCCCGGG", &ORIGINAL_DEFAULT, 3, "5M3S");
}

#[test]
fn test_odd_no_alignment() {
    assert_alignment(
        "AAAGACTACTG",
        "AACGGACACTG",
        &SWParameters::new(50, -100, -220, -12),
        1,
        "2M2I3M1D4M",
    );
    assert_alignment(
        "AAAGACTACTG",
        "AACGGACACTG",
        &SWParameters::new(200, -50, -300, -22),
        0,
        "11M",
    );
}

#[test]
fn test_complex_read_aligned_to_ref() {
    assert_alignment("AAAGGACTGACTG", "ACTGACTGACTG", &ORIGINAL_DEFAULT, 1, "12M");
}

#[test]
fn test_sub_string_match_long() {
    let reference = "ATAGAAAATAGTTTTTGGAAATATGGGTGAAGAGACATCTCCTCTTATGGAAAAAGGGATTCTAGAATTTAACAATAAATATTCCCAACTTTCCCCAAGGCTTTAAAATCTACCTTGAAGGAGCAGCTGATGTATTTCTAGAACAGACTTAGGTGTCTTGGTGTGGCCTGTAAAGAGATACTGTCTTTCTCTTTTGAGTGTAAGAGAGAAAGGACAGTCTACTCAATAAAGAGTGCTGGGAAAACTGAATATCCACACACAGAATAATAAAACTAGATCCTATCTCTCACCATATACAAAGATCAACTCAAAACAAATTAAAGACCTAAATGTAAGACAAGAAATTATAAAACTACTAGAAAAAAACACAAGGGAAATGCTTCAGGACATTGGC";
    assert_alignment(reference, "AAAAAAA", &ORIGINAL_DEFAULT, 359, "7M");
}

#[test]
fn test_identical_alignments_with_differing_flank_lengths() {
    let padded_ref = "GCGTCGCAGTCTTAAGGCCCCGCCTTTTCAGACAGCTTCCGCTGGGCCTGGGCCGCTGCGGGGCGGTCACGGCCCCTTTAAGCCTGAGCCCCGCCCCCTGGCTCCCCGCCCCCTCTTCTCCCCTCCCCCAAGCCAGCACCTGGTGCCCCGGCGGGTCGTGCGGCGCGGCGCTCCGCGGTGAGCGCCTGACCCCGAGGGGGCCCGGGGCCGCGTCCCTGGGCCCTCCCCACCCTTGCGGTGGCCTCGCGGGTCCCAGGGGCGGGGCTGGAGCGGCAGCAGGGCCGGGGAGATGGGCGGTGGGGAGCGCGGGAGGGACCGGGCCGAGCCGGGGGAAGGGCTCCGGTGACT";
    let padded_alt = "GCGTCGCAGTCTTAAGGCCCCGCCTTTTCAGACAGCTTCCGCTGGGCCTGGGCCGCTGCGGGGCGGTCACGGCCCCTTTAAGCCTGAGCCCCGCCCCCTGGCTCCCCGCCCCCTCTTCTCCCCTCCCCCAAGCCAGCACCTGGTGCCCCGGCGGGTCGTGCGGCGCGGCGCTCCGCGGTGAGCGCCTGACCCCGAGGGCCGGGCCCTCCCCACCCTTGCGGTGGCCTCGCGGGTCCCAGGGGCGGGGCTGGAGCGGCAGCAGGGCCGGGGAGATGGGCGGTGGGGAGCGCGGGAGGGACCGGGCCGAGCCGGGGGAAGGGCTCCGGTGACT";
    let not_padded_ref = "CTTTAAGCCTGAGCCCCGCCCCCTGGCTCCCCGCCCCCTCTTCTCCCCTCCCCCAAGCCAGCACCTGGTGCCCCGGCGGGTCGTGCGGCGCGGCGCTCCGCGGTGAGCGCCTGACCCCGAGGGGGCCCGGGGCCGCGTCCCTGGGCCCTCCCCACCCTTGCGGTGGCCTCGCGGGTCCCAGGGGCGGGGCTGGAGCGGCAGCAGGGCCGGGGAGATGGGCGGTGGGGAGCGCGGGAGGGA";
    let not_padded_alt = "CTTTAAGCCTGAGCCCCGCCCCCTGGCTCCCCGCCCCCTCTTCTCCCCTCCCCCAAGCCAGCACCTGGTGCCCCGGCGGGTCGTGCGGCGCGGCGCTCCGCGGTGAGCGCCTGACCCCGAGGGCCGGGCCCTCCCCACCCTTGCGGTGGCCTCGCGGGTCCCAGGGGCGGGGCTGGAGCGGCAGCAGGGCCGGGGAGATGGGCGGTGGGGAGCGCGGGAGGGA";

    let sw_pad = "NNNNNNNNNN";
    let padded_reference = format!("{}{}{}", sw_pad, padded_ref, sw_pad);
    let padded_alternate = format!("{}{}{}", sw_pad, padded_alt, sw_pad);
    let not_padded_reference = format!("{}{}{}", sw_pad, not_padded_ref, sw_pad);
    let not_padded_alternate = format!("{}{}{}", sw_pad, not_padded_alt, sw_pad);

    let padded_result = SmithWatermanAligner::align(
        padded_reference.as_bytes(),
        padded_alternate.as_bytes(),
        &NEW_SW_PARAMETERS,
    );
    let not_padded_result = SmithWatermanAligner::align(
        not_padded_reference.as_bytes(),
        not_padded_alternate.as_bytes(),
        &NEW_SW_PARAMETERS,
    );

    // the alignments should be the same up to the lengths of the M flanks
    assert_eq!(padded_result.cigar.0.len(), not_padded_result.cigar.0.len());
    for (padded_element, not_padded_element) in padded_result
        .cigar
        .0
        .iter()
        .zip(not_padded_result.cigar.0.iter())
    {
        if padded_element.char() == 'M' && not_padded_element.char() == 'M' {
            continue;
        }
        assert_eq!(padded_element, not_padded_element);
    }
}

#[test]
fn test_alignment_on_equal_strings_is_all_match() {
    let sequence = "ACGTACCGTTAGCATTGACC";
    let result = SmithWatermanAligner::align(
        sequence.as_bytes(),
        sequence.as_bytes(),
        &NEW_SW_PARAMETERS,
    );
    assert_eq!(result.alignment_offset, 0);
    assert_eq!(CigarUtils::cigar_to_string(&result.cigar), "20M");
}
