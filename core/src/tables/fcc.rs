//! FCC part 15 subpart E radar test waveforms (FCC 06-96).

use super::{Bin5Spec, DomainCode, FilterSpec, FilterTypeSpec, PatternKind, RadarTable};

static SHORT_PULSE_FILTERS: [FilterSpec; 3] = [
    // Type 0: 1428 us fixed PRI reference radar.
    FilterSpec {
        filter_id: 0,
        min_pri_us: 1400,
        max_pri_us: 1460,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 12,
        pattern: PatternKind::Fixed,
        ignore_pri_window: false,
        triple_multiple: false,
    },
    // Type 1: 518-3066 us variable PRI.
    FilterSpec {
        filter_id: 1,
        min_pri_us: 518,
        max_pri_us: 3066,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 15,
        pattern: PatternKind::Variable,
        ignore_pri_window: true,
        triple_multiple: false,
    },
    // Type 2: 150-230 us short-burst radar.
    FilterSpec {
        filter_id: 2,
        min_pri_us: 150,
        max_pri_us: 230,
        min_duration_us: 1,
        max_duration_us: 5,
        threshold: 16,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static MEDIUM_PULSE_FILTERS: [FilterSpec; 1] = [
    // Type 3: 200-500 us PRI, 6-10 us pulses.
    FilterSpec {
        filter_id: 3,
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

static LONG_PULSE_FILTERS: [FilterSpec; 1] = [
    // Type 4: 200-500 us PRI, 11-20 us pulses.
    FilterSpec {
        filter_id: 4,
        min_pri_us: 200,
        max_pri_us: 500,
        min_duration_us: 11,
        max_duration_us: 20,
        threshold: 9,
        pattern: PatternKind::Variable,
        ignore_pri_window: false,
        triple_multiple: false,
    },
];

static FILTER_TYPES: [FilterTypeSpec; 3] = [
    FilterTypeSpec {
        min_duration_us: 1,
        max_duration_us: 5,
        rssi_threshold: 10,
        min_pri_us: 150,
        filters: &SHORT_PULSE_FILTERS,
    },
    FilterTypeSpec {
        min_duration_us: 6,
        max_duration_us: 10,
        rssi_threshold: 10,
        min_pri_us: 200,
        filters: &MEDIUM_PULSE_FILTERS,
    },
    FilterTypeSpec {
        min_duration_us: 11,
        max_duration_us: 20,
        rssi_threshold: 10,
        min_pri_us: 200,
        filters: &LONG_PULSE_FILTERS,
    },
];

static BIN5: [Bin5Spec; 1] = [
    // Type 5: 50-100 us chirped long pulse, 1-3 pulses per burst.
    Bin5Spec {
        min_duration_us: 50,
        max_duration_us: 110,
        rssi_threshold: 15,
        pulses_required: 3,
        burst_window_us: 12_000_000,
    },
];

pub static TABLE: RadarTable = RadarTable {
    domain: DomainCode::Fcc,
    filter_types: &FILTER_TYPES,
    bin5: &BIN5,
};
