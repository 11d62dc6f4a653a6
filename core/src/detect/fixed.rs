use crate::detect::filter::Filter;
use crate::pulse::{Pulse, PulseBuffer};

/// Fixed-PRI window correlation over the shared pulse history.
///
/// The pulse buffer is ground truth: a train of `threshold + 1` expected
/// arrival windows is laid out ending at the trigger pulse and every window
/// containing a duration-compatible pulse counts once. The window half-width
/// grows with the window index to absorb accumulated timing drift.
///
/// Returns the number of populated windows; the caller compares it against
/// the filter threshold.
pub fn check_fixed_pattern(
    filter: &Filter,
    pulses: &PulseBuffer,
    trigger: &Pulse,
    pri_margin_us: u64,
) -> u32 {
    let spec = &filter.spec;
    let refpri = reference_pri(filter);
    if refpri == 0 {
        return 0;
    }

    let windows = spec.threshold as u64;
    let train_start = trigger.timestamp_us.saturating_sub(refpri * windows);

    let mut numpulses = 0u32;
    for n in 0..=windows {
        let margin = pri_margin_us + n;
        let center = train_start + refpri * n;
        let window_start = center.saturating_sub(margin);
        let window_end = center + margin;

        for pulse in pulses.iter() {
            if pulse.timestamp_us < window_start {
                continue;
            }
            if pulse.timestamp_us > window_end {
                break;
            }
            if Pulse::duration_matches(pulse.duration_us, trigger.duration_us) {
                numpulses += 1;
                break;
            }
        }
    }
    numpulses
}

/// Reference PRI for the window train. The most recent observed interval is
/// used when it falls inside the filter's PRI band; otherwise the band
/// midpoint stands in until an interval has been seen.
fn reference_pri(filter: &Filter) -> u64 {
    let spec = &filter.spec;
    let observed = filter
        .delay_line
        .iter()
        .last()
        .map(|e| e.delta_us)
        .filter(|d| (spec.min_pri_us..=spec.max_pri_us).contains(d));
    observed.unwrap_or((spec.min_pri_us + spec.max_pri_us) / 2)
}
