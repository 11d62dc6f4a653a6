use crate::detect::filter::Filter;

/// Upper bound on distinct PRI values a staggered signature cycles through.
pub const MAX_STAGGER_CANDIDATES: usize = 3;

/// Matcher for signatures whose PRI alternates among a small set per burst.
///
/// Intervals are clustered into at most three PRI candidates (a running
/// average anchors each cluster); support is the cluster population. A
/// staggered signature needs at least two populated candidates, so a single
/// cluster reports zero regardless of its size.
///
/// Returns the total supporting count across candidates, or zero when fewer
/// than two candidates are populated.
pub fn check_staggered_pattern(filter: &Filter, margin_us: u64) -> u32 {
    let band_lo = filter.spec.min_pri_us.saturating_sub(margin_us);
    let band_hi = filter.spec.max_pri_us.saturating_add(margin_us);
    let mut candidates: Vec<Candidate> = Vec::with_capacity(MAX_STAGGER_CANDIDATES);

    for e in filter.delay_line.iter() {
        if e.delta_us == 0 || !(band_lo..=band_hi).contains(&e.delta_us) {
            continue;
        }
        if let Some(c) = candidates
            .iter_mut()
            .find(|c| c.mean().abs_diff(e.delta_us) <= margin_us)
        {
            c.sum += e.delta_us;
            c.count += 1;
        } else if candidates.len() < MAX_STAGGER_CANDIDATES {
            candidates.push(Candidate {
                sum: e.delta_us,
                count: 1,
            });
        }
    }

    let populated = candidates.iter().filter(|c| c.count >= 2).count();
    if populated < 2 {
        return 0;
    }
    candidates.iter().map(|c| c.count).sum()
}

struct Candidate {
    sum: u64,
    count: u32,
}

impl Candidate {
    fn mean(&self) -> u64 {
        self.sum / self.count as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detect::delay_line::DelayElement;
    use crate::tables::{FilterSpec, PatternKind};

    fn staggered_spec() -> FilterSpec {
        FilterSpec {
            filter_id: 24,
            min_pri_us: 833,
            max_pri_us: 3333,
            min_duration_us: 1,
            max_duration_us: 2,
            threshold: 12,
            pattern: PatternKind::Staggered,
            ignore_pri_window: false,
            triple_multiple: false,
        }
    }

    fn feed_deltas(filter: &mut Filter, deltas: &[u64]) {
        let mut ts = 50_000u64;
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
    fn alternating_pris_accumulate_support() {
        let mut filter = Filter::new(staggered_spec(), 64);
        let deltas: Vec<u64> = (0..14)
            .map(|i| if i % 2 == 0 { 1000 } else { 1500 })
            .collect();
        feed_deltas(&mut filter, &deltas);
        assert_eq!(check_staggered_pattern(&filter, 20), 14);
    }

    #[test]
    fn single_pri_is_not_staggered() {
        let mut filter = Filter::new(staggered_spec(), 64);
        feed_deltas(&mut filter, &[1000; 14]);
        assert_eq!(check_staggered_pattern(&filter, 20), 0);
    }

    #[test]
    fn three_way_stagger_is_supported() {
        let mut filter = Filter::new(staggered_spec(), 64);
        let cycle = [900u64, 1200, 1600];
        let deltas: Vec<u64> = (0..15).map(|i| cycle[i % 3]).collect();
        feed_deltas(&mut filter, &deltas);
        assert_eq!(check_staggered_pattern(&filter, 20), 15);
    }

    #[test]
    fn a_fourth_pri_is_ignored() {
        let mut filter = Filter::new(staggered_spec(), 64);
        feed_deltas(&mut filter, &[900, 1200, 1600, 2500, 900, 1200, 1600, 2500]);
        // The 2500 us intervals arrive after three candidates exist.
        assert_eq!(check_staggered_pattern(&filter, 20), 6);
    }
}
