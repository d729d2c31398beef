use rust_htslib::bam::record::{CigarString, Record};

use crate::reads::cigar_utils::CigarUtils;
use crate::utils::quality_utils::QualityUtils;
use crate::utils::simple_interval::SimpleInterval;

/**
 * An aligned read as handed over by the BAM collaborator, holding the eleven
 * mandatory SAM fields. POS is 1-based as in the SAM text format; per-base
 * qualities are phred+33 encoded.
 */
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SamRecord {
    pub qname: String,
    pub flags: u16,
    pub rname: String,
    pub pos: usize,
    pub mapq: u8,
    pub cigar: CigarString,
    pub rnext: String,
    pub pnext: usize,
    pub tlen: i64,
    pub seq: Vec<u8>,
    pub qual: Vec<u8>,
}

impl SamRecord {
    pub const FLAG_READ_PAIRED: u16 = 0x1;
    pub const FLAG_PROPER_PAIR: u16 = 0x2;
    pub const FLAG_READ_UNMAPPED: u16 = 0x4;
    pub const FLAG_MATE_UNMAPPED: u16 = 0x8;
    pub const FLAG_READ_REVERSE_STRAND: u16 = 0x10;
    pub const FLAG_MATE_REVERSE_STRAND: u16 = 0x20;
    pub const FLAG_FIRST_OF_PAIR: u16 = 0x40;
    pub const FLAG_SECOND_OF_PAIR: u16 = 0x80;
    pub const FLAG_SECONDARY_ALIGNMENT: u16 = 0x100;
    pub const FLAG_FAILS_VENDOR_QUALITY_CHECK: u16 = 0x200;
    pub const FLAG_DUPLICATE_READ: u16 = 0x400;
    pub const FLAG_SUPPLEMENTARY_ALIGNMENT: u16 = 0x800;

    /**
     * Convert a record produced by the htslib reader into the caller's read model.
     *
     * Raw phred qualities are re-encoded as phred+33 and the mate reference name
     * is collapsed to "=" when the mate maps to the same contig, matching the
     * SAM text convention the filters key on.
     *
     * @param record the decoded BAM record, must be mapped
     * @param target_names reference-name table from the BAM header
     */
    pub fn from_hts_record(record: &Record, target_names: &[String]) -> SamRecord {
        let rnext = if record.mtid() < 0 {
            "*".to_string()
        } else if record.mtid() == record.tid() {
            "=".to_string()
        } else {
            target_names[record.mtid() as usize].clone()
        };

        SamRecord {
            qname: String::from_utf8_lossy(record.qname()).to_string(),
            flags: record.flags(),
            rname: target_names[record.tid() as usize].clone(),
            pos: record.pos() as usize + 1,
            mapq: record.mapq(),
            cigar: record.cigar().take(),
            rnext,
            pnext: if record.mpos() < 0 { 0 } else { record.mpos() as usize + 1 },
            tlen: record.insert_size(),
            seq: record.seq().as_bytes(),
            qual: record
                .qual()
                .iter()
                .map(|q| q.saturating_add(QualityUtils::ASCII_OFFSET))
                .collect(),
        }
    }

    pub fn is_paired(&self) -> bool {
        self.flags & Self::FLAG_READ_PAIRED != 0
    }

    pub fn is_proper_pair(&self) -> bool {
        self.flags & Self::FLAG_PROPER_PAIR != 0
    }

    pub fn is_unmapped(&self) -> bool {
        self.flags & Self::FLAG_READ_UNMAPPED != 0
    }

    pub fn is_mate_unmapped(&self) -> bool {
        self.flags & Self::FLAG_MATE_UNMAPPED != 0
    }

    pub fn is_reverse_strand(&self) -> bool {
        self.flags & Self::FLAG_READ_REVERSE_STRAND != 0
    }

    pub fn is_mate_reverse_strand(&self) -> bool {
        self.flags & Self::FLAG_MATE_REVERSE_STRAND != 0
    }

    pub fn is_first_of_pair(&self) -> bool {
        self.flags & Self::FLAG_FIRST_OF_PAIR != 0
    }

    pub fn is_second_of_pair(&self) -> bool {
        self.flags & Self::FLAG_SECOND_OF_PAIR != 0
    }

    pub fn is_secondary_alignment(&self) -> bool {
        self.flags & Self::FLAG_SECONDARY_ALIGNMENT != 0
    }

    pub fn fails_vendor_quality_check(&self) -> bool {
        self.flags & Self::FLAG_FAILS_VENDOR_QUALITY_CHECK != 0
    }

    pub fn is_duplicate(&self) -> bool {
        self.flags & Self::FLAG_DUPLICATE_READ != 0
    }

    pub fn is_supplementary_alignment(&self) -> bool {
        self.flags & Self::FLAG_SUPPLEMENTARY_ALIGNMENT != 0
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    /// 0-based inclusive start of the alignment on the reference.
    pub fn get_alignment_begin(&self) -> usize {
        self.pos - 1
    }

    /// 0-based exclusive end of the alignment on the reference.
    pub fn get_alignment_end(&self) -> usize {
        self.get_alignment_begin() + CigarUtils::reference_length(&self.cigar)
    }

    pub fn get_interval(&self) -> SimpleInterval {
        SimpleInterval::new(
            self.rname.clone(),
            self.get_alignment_begin(),
            self.get_alignment_end(),
        )
    }
}
