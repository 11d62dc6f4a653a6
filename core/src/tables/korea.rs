//! Korea (KCC) radar parameters; FCC-derived with the domestic 3030 us and
//! 556 us signatures.

use super::{Bin5Spec, DomainCode, FilterSpec, FilterTypeSpec, PatternKind, RadarTable};

static SHORT_PULSE_FILTERS: [FilterSpec; 3] = [
    FilterSpec {
        filter_id: 80,
        min_pri_us: 1400,
        max_pri_us: 1460,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 12,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    FilterSpec {
        filter_id: 81,
        min_pri_us: 3000,
        max_pri_us: 3060,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 8,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    FilterSpec {
        filter_id: 82,
        min_pri_us: 540,
        max_pri_us: 570,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 16,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static FILTER_TYPES: [FilterTypeSpec; 1] = [FilterTypeSpec {
    min_duration_us: 1,
    max_duration_us: 5,
    rssi_threshold: 10,
    min_pri_us: 540,
    filters: &SHORT_PULSE_FILTERS,
}];

static BIN5: [Bin5Spec; 0] = [];

pub static TABLE: RadarTable = RadarTable {
    domain: DomainCode::Korea,
    filter_types: &FILTER_TYPES,
    bin5: &BIN5,
};
