#![allow(non_upper_case_globals, non_snake_case)]

use haplotypecaller::haplotype::haplotype::Haplotype;
use haplotypecaller::pair_hmm::pair_hmm::PairHMM;
use haplotypecaller::reads::cigar_utils::CigarUtils;
use haplotypecaller::reads::sam_record::SamRecord;
use haplotypecaller::utils::quality_utils::QualityUtils;

const REF_80: &str = "GAGCCGACACAGTCGCAGATCCGTTAACCCCGGAGGCTAAACAGCTTTGGACGCCTTGGAGAACCTGGCGCATTCCACTG";
const ALT_80: &str = "GAGCCGACACAGTCGCAGATCCGTTAACCCCGGAGGCTACACAGCTTTGGACGCCTTGGAGAACCTGGCGCATTCCACTG";

fn make_read(name: &str, seq: &str, qual: u8, mapq: u8) -> SamRecord {
    SamRecord {
        qname: name.to_string(),
        flags: 0,
        rname: "20".to_string(),
        pos: 1,
        mapq,
        cigar: CigarUtils::cigar_from_str(&format!("{}M", seq.len())).unwrap(),
        rnext: "=".to_string(),
        pnext: 1,
        tlen: 0,
        seq: seq.as_bytes().to_vec(),
        qual: vec![qual; seq.len()],
    }
}

fn make_haplotypes() -> Vec<Haplotype> {
    vec![
        Haplotype::new_reference(REF_80.as_bytes()),
        Haplotype::new(ALT_80.as_bytes().to_vec(), -0.05),
    ]
}

#[test]
fn test_likelihoods_are_valid_log10_probabilities() {
    let haplotypes = make_haplotypes();
    let mut reads = vec![
        make_read("ref_read", REF_80, b'I', 60),
        make_read("alt_read", ALT_80, b'I', 60),
    ];
    let mut pair_hmm = PairHMM::initialize(80, 80);
    let likelihoods = pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);

    assert_eq!(likelihoods.len(), 2);
    for row in &likelihoods {
        assert_eq!(row.len(), 2);
        for &likelihood in row {
            assert!(likelihood <= 0.0, "likelihood {} is not log10", likelihood);
        }
    }
}

#[test]
fn test_reads_prefer_the_haplotype_they_were_drawn_from() {
    let haplotypes = make_haplotypes();
    let mut reads = vec![
        make_read("ref_read", REF_80, b'I', 60),
        make_read("alt_read", ALT_80, b'I', 60),
    ];
    let mut pair_hmm = PairHMM::initialize(80, 80);
    let likelihoods = pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);

    assert!(likelihoods[0][0] > likelihoods[0][1]);
    assert!(likelihoods[1][1] > likelihoods[1][0]);
}

#[test]
fn test_likelihoods_are_capped_at_best_minus_4_5() {
    let haplotypes = make_haplotypes();
    // low mapping quality caps the base qualities, keeping the mismatch
    // penalty well inside the cap; high quality reads sit right at it
    let mut reads = vec![
        make_read("ref_read", REF_80, b'I', 60),
        make_read("alt_read", ALT_80, b'I', 60),
        make_read("low_mapq_read", REF_80, b'I', 10),
    ];
    let mut pair_hmm = PairHMM::initialize(80, 80);
    let likelihoods = pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);

    for row in &likelihoods {
        let best = row.iter().cloned().fold(std::f64::NEG_INFINITY, f64::max);
        let worst = row.iter().cloned().fold(std::f64::INFINITY, f64::min);
        assert!(
            best - worst <= 4.5 + 1e-9,
            "spread {} exceeds the cap",
            best - worst
        );
    }
}

#[test]
fn test_mapping_quality_caps_base_qualities() {
    let haplotypes = make_haplotypes();
    let mut reads = vec![make_read("read", REF_80, b'I', 10)];
    let mut pair_hmm = PairHMM::initialize(80, 80);
    pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);

    let cap = QualityUtils::ASCII_OFFSET + 10;
    assert!(reads[0].qual.iter().all(|&q| q <= cap));
}

#[test]
fn test_poorly_modeled_reads_are_dropped_in_place() {
    let haplotypes = make_haplotypes();
    // a read unrelated to either haplotype scores far below the expected
    // error threshold and is removed together with its likelihood row
    let garbage = "TTTTTTTTTTGGGGGGGGGGAAAAAAAAAACCCCCCCCCC";
    let mut reads = vec![
        make_read("ref_read", REF_80, b'I', 60),
        make_read("garbage_read", garbage, b'I', 60),
        make_read("alt_read", ALT_80, b'I', 60),
    ];
    let mut pair_hmm = PairHMM::initialize(80, 80);
    let likelihoods = pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);

    assert_eq!(reads.len(), 2);
    assert_eq!(likelihoods.len(), 2);
    assert_eq!(reads[0].qname, "ref_read");
    assert_eq!(reads[1].qname, "alt_read");
    assert!(likelihoods[0][0] > likelihoods[0][1]);
    assert!(likelihoods[1][1] > likelihoods[1][0]);
}

#[test]
fn test_empty_read_list_produces_an_empty_matrix() {
    let haplotypes = make_haplotypes();
    let mut reads: Vec<SamRecord> = Vec::new();
    let mut pair_hmm = PairHMM::initialize(80, 80);
    let likelihoods = pair_hmm.compute_log10_likelihoods(&haplotypes, &mut reads);
    assert!(likelihoods.is_empty());
}
