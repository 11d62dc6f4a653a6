//! Compiled-in regulatory radar tables.
//!
//! Tables are constant data selected once at configuration time by domain
//! code and chip identity; nothing here is mutated at runtime. Values trace
//! the published FCC 06-96, ETSI EN 301 893, and MKK test-waveform
//! parameters. Declaration order within a table is the dispatch priority
//! when several filter types cover the same duration.

mod china;
mod etsi;
mod fcc;
mod korea;
mod mkk;

use serde::{Deserialize, Serialize};

/// Regulatory domain enumeration; discriminants follow the wire codes used
/// by the configuration boundary.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DomainCode {
    Fcc = 1,
    Etsi = 2,
    Mkk = 3,
    China = 4,
    Korea = 5,
}

impl DomainCode {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Fcc),
            2 => Some(Self::Etsi),
            3 => Some(Self::Mkk),
            4 => Some(Self::China),
            5 => Some(Self::Korea),
            _ => None,
        }
    }
}

/// Pattern family a filter correlates against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PatternKind {
    Fixed,
    Variable,
    Staggered,
}

/// Static matching parameters for one radar signature.
#[derive(Debug, Clone, Copy)]
pub struct FilterSpec {
    pub filter_id: u32,
    pub min_pri_us: u64,
    pub max_pri_us: u64,
    pub min_duration_us: u32,
    pub max_duration_us: u32,
    /// Qualifying pulses required to declare a match.
    pub threshold: u32,
    pub pattern: PatternKind,
    /// Relax strict PRI windows; lowers the effective threshold in the
    /// scored matcher.
    pub ignore_pri_window: bool,
    /// Accept 3x PRI multiples in hypothesis scoring and counting.
    pub triple_multiple: bool,
}

/// Duration bucket grouping filters that share an RSSI threshold.
#[derive(Debug, Clone, Copy)]
pub struct FilterTypeSpec {
    pub min_duration_us: u32,
    pub max_duration_us: u32,
    pub rssi_threshold: u8,
    /// Cheapest early-reject bound: smallest member PRI.
    pub min_pri_us: u64,
    pub filters: &'static [FilterSpec],
}

/// Long-pulse (Bin5) chirp descriptor, matched by duration/RSSI heuristics.
#[derive(Debug, Clone, Copy)]
pub struct Bin5Spec {
    pub min_duration_us: u32,
    pub max_duration_us: u32,
    pub rssi_threshold: u8,
    /// Pulses required inside the burst window to declare.
    pub pulses_required: u32,
    pub burst_window_us: u64,
}

/// One regulatory domain's complete matching data.
pub struct RadarTable {
    pub domain: DomainCode,
    pub filter_types: &'static [FilterTypeSpec],
    pub bin5: &'static [Bin5Spec],
}

pub fn radar_table(domain: DomainCode) -> &'static RadarTable {
    match domain {
        DomainCode::Fcc => &fcc::TABLE,
        DomainCode::Etsi => &etsi::TABLE,
        DomainCode::Mkk => &mkk::TABLE,
        DomainCode::China => &china::TABLE,
        DomainCode::Korea => &korea::TABLE,
    }
}

/// At most this many filter types are tried per duration bucket.
pub const MAX_OVERLAP: usize = 16;

/// Duration lookup covers pulses up to this width; longer pulses only reach
/// the Bin5 path.
pub const MAX_LOOKUP_DURATION_US: usize = 64;

/// Builds the duration-indexed dispatch table: entry `d` lists the indices
/// of filter types whose bucket covers a `d` microsecond pulse, capped at
/// [`MAX_OVERLAP`] and kept in declaration order.
pub fn build_duration_lookup(table: &RadarTable) -> Vec<Vec<usize>> {
    let mut lookup = vec![Vec::new(); MAX_LOOKUP_DURATION_US + 1];
    for (index, ft) in table.filter_types.iter().enumerate() {
        let lo = ft.min_duration_us as usize;
        let hi = (ft.max_duration_us as usize).min(MAX_LOOKUP_DURATION_US);
        for entry in lookup.iter_mut().take(hi + 1).skip(lo) {
            if entry.len() < MAX_OVERLAP {
                entry.push(index);
            }
        }
    }
    lookup
}

/// Per-chip normalization quirks; data, not logic.
#[derive(Debug, Clone, Copy)]
pub struct ChipProfile {
    pub name: &'static str,
    /// Raw-duration to microseconds fixed-point scaling.
    pub dur_multiplier_num: u32,
    pub dur_multiplier_den: u32,
    /// Added to every filter type's RSSI threshold.
    pub rssi_adjust: i16,
}

/// Supported baseband chips.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChipId {
    /// Reports durations in microseconds directly.
    Baseline,
    /// 44 MHz sampling clock; durations scale by 5/4.
    FastClock,
    /// External LNA raises the noise floor seen by the detector.
    HighGainFrontEnd,
}

pub fn chip_profile(chip: ChipId) -> &'static ChipProfile {
    match chip {
        ChipId::Baseline => &ChipProfile {
            name: "baseline",
            dur_multiplier_num: 1,
            dur_multiplier_den: 1,
            rssi_adjust: 0,
        },
        ChipId::FastClock => &ChipProfile {
            name: "fast-clock",
            dur_multiplier_num: 5,
            dur_multiplier_den: 4,
            rssi_adjust: 0,
        },
        ChipId::HighGainFrontEnd => &ChipProfile {
            name: "high-gain-fe",
            dur_multiplier_num: 1,
            dur_multiplier_den: 1,
            rssi_adjust: 3,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_domain_has_a_table() {
        for code in 1..=5 {
            let domain = DomainCode::from_code(code).unwrap();
            let table = radar_table(domain);
            assert_eq!(table.domain, domain);
            assert!(!table.filter_types.is_empty());
        }
    }

    #[test]
    fn unknown_domain_code_is_rejected() {
        assert!(DomainCode::from_code(0).is_none());
        assert!(DomainCode::from_code(6).is_none());
    }

    #[test]
    fn lookup_preserves_declaration_order() {
        let table = radar_table(DomainCode::Fcc);
        let lookup = build_duration_lookup(table);
        for entry in &lookup {
            assert!(entry.len() <= MAX_OVERLAP);
            assert!(entry.windows(2).all(|w| w[0] < w[1]));
        }
    }

    #[test]
    fn table_buckets_are_well_formed() {
        for code in 1..=5 {
            let table = radar_table(DomainCode::from_code(code).unwrap());
            for ft in table.filter_types {
                assert!(ft.min_duration_us <= ft.max_duration_us);
                assert!(ft.filters.len() <= 10);
                for rf in ft.filters {
                    assert!(rf.min_pri_us <= rf.max_pri_us);
                    assert!(rf.threshold > 0);
                }
            }
        }
    }
}
