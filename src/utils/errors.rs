use std::error::Error;
use std::fmt;

/// Fatal errors surfaced to the caller. Region-level skips (short reference,
/// duplicate kmers, cycles, low complexity, quality gates) are not errors and
/// never travel through this type.
#[derive(Debug, Clone)]
pub enum HaplotypeCallerError {
    InvalidArgument(String),
    BamRead(String),
    FastaRead(String),
    VcfWrite(String),
}

impl fmt::Display for HaplotypeCallerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaplotypeCallerError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            HaplotypeCallerError::BamRead(msg) => write!(f, "BAM read error: {}", msg),
            HaplotypeCallerError::FastaRead(msg) => write!(f, "FASTA read error: {}", msg),
            HaplotypeCallerError::VcfWrite(msg) => write!(f, "VCF write error: {}", msg),
        }
    }
}

impl Error for HaplotypeCallerError {}
