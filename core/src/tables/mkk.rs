//! Japan MKK (W53/W56) radar parameters; a blend of the FCC and ETSI sets
//! plus the 1389 us and 4000 us domestic signatures.

use super::{Bin5Spec, DomainCode, FilterSpec, FilterTypeSpec, PatternKind, RadarTable};

static SHORT_PULSE_FILTERS: [FilterSpec; 3] = [
    FilterSpec {
        filter_id: 40,
        min_pri_us: 1360,
        max_pri_us: 1420,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 12,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    FilterSpec {
        filter_id: 41,
        min_pri_us: 3900,
        max_pri_us: 4100,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 8,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    FilterSpec {
        filter_id: 42,
        min_pri_us: 518,
        max_pri_us: 3066,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 15,
        pattern: PatternKind::Variable,
        ignore_pri_window: true,
        triple_multiple: false,
    },
];

static MEDIUM_PULSE_FILTERS: [FilterSpec; 1] = [
    FilterSpec {
        filter_id: 43,
        min_pri_us: 200,
        max_pri_us: 500,
        min_duration_us: 6,
        max_duration_us: 10,
        threshold: 12,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static FILTER_TYPES: [FilterTypeSpec; 2] = [
    FilterTypeSpec {
        min_duration_us: 1,
        max_duration_us: 5,
        rssi_threshold: 10,
        min_pri_us: 518,
        filters: &SHORT_PULSE_FILTERS,
    },
    FilterTypeSpec {
        min_duration_us: 6,
        max_duration_us: 10,
        rssi_threshold: 10,
        min_pri_us: 200,
        filters: &MEDIUM_PULSE_FILTERS,
    },
];

static BIN5: [Bin5Spec; 1] = [
    Bin5Spec {
        min_duration_us: 50,
        max_duration_us: 110,
        rssi_threshold: 15,
        pulses_required: 3,
        burst_window_us: 12_000_000,
    },
];

pub static TABLE: RadarTable = RadarTable {
    domain: DomainCode::Mkk,
    filter_types: &FILTER_TYPES,
    bin5: &BIN5,
};
