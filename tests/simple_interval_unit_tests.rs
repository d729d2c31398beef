#![allow(non_upper_case_globals, non_snake_case)]

use haplotypecaller::utils::simple_interval::SimpleInterval;

#[test]
fn test_size_is_half_open() {
    let interval = SimpleInterval::new("20", 10, 20);
    assert_eq!(interval.size(), 10);
    assert_eq!(SimpleInterval::new("20", 5, 5).size(), 0);
}

#[test]
fn test_overlaps() {
    let a = SimpleInterval::new("20", 10, 20);
    assert!(a.overlaps(&SimpleInterval::new("20", 15, 25)));
    assert!(a.overlaps(&SimpleInterval::new("20", 0, 11)));
    assert!(a.overlaps(&SimpleInterval::new("20", 12, 15)));
    // half-open: abutting intervals do not overlap
    assert!(!a.overlaps(&SimpleInterval::new("20", 20, 30)));
    assert!(!a.overlaps(&SimpleInterval::new("20", 0, 10)));
    // different contigs never overlap
    assert!(!a.overlaps(&SimpleInterval::new("21", 10, 20)));
}

#[test]
fn test_contains() {
    let outer = SimpleInterval::new("20", 10, 30);
    assert!(outer.contains(&SimpleInterval::new("20", 10, 30)));
    assert!(outer.contains(&SimpleInterval::new("20", 15, 25)));
    assert!(!outer.contains(&SimpleInterval::new("20", 5, 25)));
    assert!(!outer.contains(&SimpleInterval::new("20", 15, 35)));
    assert!(!outer.contains(&SimpleInterval::new("21", 15, 25)));
}

#[test]
fn test_span_with() {
    let a = SimpleInterval::new("20", 10, 20);
    let b = SimpleInterval::new("20", 40, 50);
    assert_eq!(a.span_with(&b), SimpleInterval::new("20", 10, 50));
    assert_eq!(b.span_with(&a), SimpleInterval::new("20", 10, 50));
}

#[test]
#[should_panic]
fn test_span_with_different_contigs_panics() {
    let a = SimpleInterval::new("20", 10, 20);
    let b = SimpleInterval::new("21", 40, 50);
    a.span_with(&b);
}

#[test]
fn test_expand_within_contig_saturates_at_zero() {
    let interval = SimpleInterval::new("20", 3, 10);
    assert_eq!(
        interval.expand_within_contig(5),
        SimpleInterval::new("20", 0, 15)
    );
    assert_eq!(
        interval.expand_within_contig(2),
        SimpleInterval::new("20", 1, 12)
    );
}

#[test]
fn test_ordering_is_by_contig_then_coordinates() {
    let mut intervals = vec![
        SimpleInterval::new("20", 30, 40),
        SimpleInterval::new("19", 50, 60),
        SimpleInterval::new("20", 10, 20),
        SimpleInterval::new("20", 10, 15),
    ];
    intervals.sort();
    assert_eq!(
        intervals,
        vec![
            SimpleInterval::new("19", 50, 60),
            SimpleInterval::new("20", 10, 15),
            SimpleInterval::new("20", 10, 20),
            SimpleInterval::new("20", 30, 40),
        ]
    );
}
