pub mod cigar_utils;
pub mod read_clipper;
pub mod read_filter;
pub mod sam_record;
