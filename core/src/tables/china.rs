//! China (MIIT) radar parameters; follows the ETSI reference subset used
//! for the 5.8 GHz band.

use super::{Bin5Spec, DomainCode, FilterSpec, FilterTypeSpec, PatternKind, RadarTable};

static SHORT_PULSE_FILTERS: [FilterSpec; 2] = [
    FilterSpec {
        filter_id: 60,
        min_pri_us: 1300,
        max_pri_us: 1370,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 10,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    FilterSpec {
        filter_id: 61,
        min_pri_us: 1000,
        max_pri_us: 5000,
        min_duration_us: 1,
        max_duration_us: 15,
        threshold: 10,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: true,
    },
];

static WIDE_PULSE_FILTERS: [FilterSpec; 1] = [
    FilterSpec {
        filter_id: 62,
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

static FILTER_TYPES: [FilterTypeSpec; 2] = [
    FilterTypeSpec {
        min_duration_us: 1,
        max_duration_us: 15,
        rssi_threshold: 8,
        min_pri_us: 1000,
        filters: &SHORT_PULSE_FILTERS,
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
    domain: DomainCode::China,
    filter_types: &FILTER_TYPES,
    bin5: &BIN5,
};
