use crate::detect::filter::Filter;

/// Scored matcher for signatures whose PRI wanders inside a band.
///
/// Every delay-line interval is treated as a PRI hypothesis and scored by
/// how many other intervals sit within the margin of the hypothesis or its
/// low multiples. The winning hypothesis (ties break toward the lowest PRI)
/// is refined by averaging its supporters, then a counting walk tallies
/// pulses whose spacing from the last accepted pulse matches any of the
/// first K refined-PRI multiples.
///
/// Returns the walk's pulse count; the caller compares it against the
/// filter's effective threshold.
pub fn check_variable_pattern(filter: &Filter, margin_us: u64) -> u32 {
    let line = &filter.delay_line;
    if line.len() < 2 {
        return line.len() as u32;
    }

    let k_max: u64 = if filter.spec.triple_multiple { 3 } else { 2 };
    let band_lo = filter.spec.min_pri_us.saturating_sub(margin_us);
    let band_hi = filter.spec.max_pri_us.saturating_add(margin_us);

    // Hypothesis scoring pass; only intervals inside the filter's PRI band
    // may anchor a hypothesis.
    let mut best_pri = u64::MAX;
    let mut best_score = 0u32;
    for hyp in line.iter() {
        let candidate = hyp.delta_us;
        if candidate == 0 || !(band_lo..=band_hi).contains(&candidate) {
            continue;
        }
        let score = line
            .iter()
            .filter(|e| multiple_rank(e.delta_us, candidate, margin_us, k_max).is_some())
            .count() as u32;
        if score > best_score || (score == best_score && candidate < best_pri) {
            best_score = score;
            best_pri = candidate;
        }
    }
    if best_pri == u64::MAX {
        return 0;
    }

    // Refinement: average the supporting intervals, folding multiples back
    // to the fundamental.
    let mut sum = 0u64;
    let mut supporters = 0u64;
    for e in line.iter() {
        if let Some(rank) = multiple_rank(e.delta_us, best_pri, margin_us, k_max) {
            sum += e.delta_us / rank;
            supporters += 1;
        }
    }
    let refined = if supporters > 0 { sum / supporters } else { best_pri };
    if refined == 0 {
        return 0;
    }

    // Counting walk over the pulse train.
    let mut numpulses = 0u32;
    let mut last_good_ts: Option<u64> = None;
    for e in line.iter() {
        match last_good_ts {
            None => {
                numpulses = 1;
                last_good_ts = Some(e.timestamp_us);
            }
            Some(ts) => {
                let delta = e.timestamp_us.saturating_sub(ts);
                let matched =
                    (1..=k_max).any(|m| delta.abs_diff(refined * m) <= margin_us * m);
                if matched {
                    numpulses += 1;
                    last_good_ts = Some(e.timestamp_us);
                }
            }
        }
    }
    numpulses
}

/// Rank of the multiple of `candidate` that `delta` matches within the
/// margin, or None. The margin scales with the multiple.
fn multiple_rank(delta: u64, candidate: u64, margin_us: u64, k_max: u64) -> Option<u64> {
    (1..=k_max).find(|&k| delta.abs_diff(candidate * k) <= margin_us * k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::delay_line::DelayElement;
    use crate::tables::{FilterSpec, PatternKind};

    fn variable_spec(threshold: u32) -> FilterSpec {
        FilterSpec {
            filter_id: 1,
            min_pri_us: 300,
            max_pri_us: 2000,
            min_duration_us: 1,
            max_duration_us: 5,
            threshold,
            pattern: PatternKind::Variable,
            ignore_pri_window: false,
            triple_multiple: false,
        }
    }

    fn feed_deltas(filter: &mut Filter, deltas: &[u64]) {
        let mut ts = 100_000u64;
        for &d in deltas {
            ts += d;
            filter.insert(DelayElement {
                delta_us: d,
                duration_us: 1,
                rssi: 25,
                timestamp_us: ts,
            });
        }
    }

    #[test]
    fn uniform_train_counts_every_pulse() {
        let mut filter = Filter::new(variable_spec(8), 64);
        feed_deltas(&mut filter, &[500; 10]);
        assert_eq!(check_variable_pattern(&filter, 10), 10);
    }

    #[test]
    fn double_spaced_pulses_count_toward_the_base_hypothesis() {
        let mut filter = Filter::new(variable_spec(8), 64);
        // A burst at 500 us, then a burst at the 1000 us double.
        feed_deltas(&mut filter, &[500, 500, 500, 500, 500, 1000, 1000, 1000]);
        let count = check_variable_pattern(&filter, 10);
        assert_eq!(count, 8);
    }

    #[test]
    fn tie_breaks_toward_the_lowest_pri() {
        let mut filter = Filter::new(variable_spec(8), 64);
        // 500 and 1000 support each other asymmetrically; the fundamental
        // must win over the double.
        feed_deltas(&mut filter, &[1000, 500, 1000, 500, 1000, 500]);
        assert!(check_variable_pattern(&filter, 10) >= 6);
    }

    #[test]
    fn unrelated_intervals_do_not_accumulate() {
        let mut filter = Filter::new(variable_spec(8), 64);
        feed_deltas(&mut filter, &[311, 977, 1531, 463, 877]);
        assert!(check_variable_pattern(&filter, 10) < 5);
    }
}
