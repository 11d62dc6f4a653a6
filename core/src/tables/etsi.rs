//! ETSI EN 301 893 radar test signals (references 1-6).

use super::{Bin5Spec, DomainCode, FilterSpec, FilterTypeSpec, PatternKind, RadarTable};

static SHORT_PULSE_FILTERS: [FilterSpec; 4] = [
    // Reference 1: 750 Hz fixed PRF.
    FilterSpec {
        filter_id: 20,
        min_pri_us: 1300,
        max_pri_us: 1370,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 10,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    // Reference 2: 200-1000 Hz PRF.
    FilterSpec {
        filter_id: 21,
        min_pri_us: 1000,
        max_pri_us: 5000,
        min_duration_us: 1,
        max_duration_us: 15,
        threshold: 10,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: true,
    },
    // Reference 5: staggered, 2-3 PRFs at 300-400 Hz.
    FilterSpec {
        filter_id: 24,
        min_pri_us: 2500,
        max_pri_us: 3333,
        min_duration_us: 1,
        max_duration_us: 2,
        threshold: 15,
        pattern: PatternKind::Staggered,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    // Reference 6: staggered, 400-1200 Hz.
    FilterSpec {
        filter_id: 25,
        min_pri_us: 833,
        max_pri_us: 2500,
        min_duration_us: 1,
        max_duration_us: 2,
        threshold: 15,
        pattern: PatternKind::Staggered,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static MEDIUM_PULSE_FILTERS: [FilterSpec; 1] = [
    // Reference 3: 200-1600 Hz PRF, wider pulses.
    FilterSpec {
        filter_id: 22,
        min_pri_us: 625,
        max_pri_us: 5000,
        min_duration_us: 6,
        max_duration_us: 15,
        threshold: 15,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static WIDE_PULSE_FILTERS: [FilterSpec; 1] = [
    // Reference 4: 200-1200 Hz PRF, 20-30 us pulses.
    FilterSpec {
        filter_id: 23,
        min_pri_us: 833,
        max_pri_us: 5000,
        min_duration_us: 20,
        max_duration_us: 30,
        threshold: 12,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static FILTER_TYPES: [FilterTypeSpec; 3] = [
    FilterTypeSpec {
        min_duration_us: 1,
        max_duration_us: 15,
        rssi_threshold: 8,
        min_pri_us: 625,
        filters: &SHORT_PULSE_FILTERS,
    },
    FilterTypeSpec {
        min_duration_us: 6,
        max_duration_us: 15,
        rssi_threshold: 8,
        min_pri_us: 625,
        filters: &MEDIUM_PULSE_FILTERS,
    },
    FilterTypeSpec {
        min_duration_us: 20,
        max_duration_us: 30,
        rssi_threshold: 8,
        min_pri_us: 833,
        filters: &WIDE_PULSE_FILTERS,
    },
];

static BIN5: [Bin5Spec; 0] = [];

pub static TABLE: RadarTable = RadarTable {
    domain: DomainCode::Etsi,
    filter_types: &FILTER_TYPES,
    bin5: &BIN5,
};
