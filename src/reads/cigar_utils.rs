use rust_htslib::bam::record::{Cigar, CigarString};

use crate::utils::errors::HaplotypeCallerError;

pub struct CigarUtils {}

impl CigarUtils {
    /**
     * How many reference bases does the cigar walk over? Sums the lengths of
     * the M, D, N, = and X elements.
     */
    pub fn reference_length(cigar: &CigarString) -> usize {
        cigar
            .0
            .iter()
            .filter(|element| Self::cigar_consumes_reference_bases(element))
            .map(|element| element.len() as usize)
            .sum()
    }

    /**
     * How many read bases does the cigar account for? Sums the lengths of
     * the M, I, S, = and X elements.
     */
    pub fn read_length(cigar: &CigarString) -> usize {
        cigar
            .0
            .iter()
            .filter(|element| Self::cigar_consumes_read_bases(element))
            .map(|element| element.len() as usize)
            .sum()
    }

    pub fn cigar_consumes_reference_bases(element: &Cigar) -> bool {
        matches!(
            element,
            Cigar::Match(_) | Cigar::Del(_) | Cigar::RefSkip(_) | Cigar::Equal(_) | Cigar::Diff(_)
        )
    }

    pub fn cigar_consumes_read_bases(element: &Cigar) -> bool {
        matches!(
            element,
            Cigar::Match(_) | Cigar::Ins(_) | Cigar::SoftClip(_) | Cigar::Equal(_) | Cigar::Diff(_)
        )
    }

    pub fn is_soft_clip(element: &Cigar) -> bool {
        matches!(element, Cigar::SoftClip(_))
    }

    pub fn contains_operator(cigar: &CigarString, operator: char) -> bool {
        cigar.0.iter().any(|element| element.char() == operator)
    }

    /**
     * Parse a SAM-style cigar string, e.g. "31M20S", into a CigarString.
     */
    pub fn cigar_from_str(text: &str) -> Result<CigarString, HaplotypeCallerError> {
        let mut elements = Vec::new();
        let mut length: u32 = 0;
        let mut saw_digit = false;
        for c in text.chars() {
            if let Some(digit) = c.to_digit(10) {
                length = length * 10 + digit;
                saw_digit = true;
                continue;
            }
            if !saw_digit {
                return Err(HaplotypeCallerError::InvalidArgument(format!(
                    "Cigar element without a length in '{}'",
                    text
                )));
            }
            let element = match c {
                'M' => Cigar::Match(length),
                'I' => Cigar::Ins(length),
                'D' => Cigar::Del(length),
                'N' => Cigar::RefSkip(length),
                'S' => Cigar::SoftClip(length),
                'H' => Cigar::HardClip(length),
                'P' => Cigar::Pad(length),
                '=' => Cigar::Equal(length),
                'X' => Cigar::Diff(length),
                other => {
                    return Err(HaplotypeCallerError::InvalidArgument(format!(
                        "Unknown cigar operator '{}' in '{}'",
                        other, text
                    )))
                }
            };
            elements.push(element);
            length = 0;
            saw_digit = false;
        }
        if saw_digit {
            return Err(HaplotypeCallerError::InvalidArgument(format!(
                "Trailing cigar length without an operator in '{}'",
                text
            )));
        }
        Ok(CigarString(elements))
    }

    pub fn cigar_to_string(cigar: &CigarString) -> String {
        cigar
            .0
            .iter()
            .map(|element| format!("{}{}", element.len(), element.char()))
            .collect::<Vec<String>>()
            .join("")
    }
}
