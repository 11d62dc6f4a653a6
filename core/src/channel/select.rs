use crate::channel::leakage::leakage_into;
use crate::channel::{
    BandRestriction, Channel, ChannelWidth, SelectionFlags, BLOCK_PAIRS_160, BLOCK_STARTS,
};
use crate::nol::NolManager;
use crate::telemetry::LogManager;
use crate::{DfsError, DfsResult};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Result of a reselection attempt.
#[derive(Debug, Clone, Copy)]
pub struct SelectionOutcome {
    pub channel: Channel,
    pub width: ChannelWidth,
    /// True when the negotiated width is narrower than requested.
    pub downgraded: bool,
}

/// Rule-filtered, leakage-aware random channel selection.
///
/// The RNG is seeded from elapsed-tick entropy by the engine; tests inject
/// a fixed seed for reproducibility.
pub struct ChannelSelector {
    rng: StdRng,
    leakage_threshold: i32,
    logger: LogManager,
}

impl ChannelSelector {
    pub fn new(seed: u64, leakage_threshold: i32) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            leakage_threshold,
            logger: LogManager::new(),
        }
    }

    /// Picks a replacement channel for the requested width.
    ///
    /// When no bonded group satisfies the width, the search steps down the
    /// explicit 160-80-40-20 ladder and reports the downgrade; it never
    /// silently returns a narrower pick, and never a channel that failed
    /// rule filtering.
    pub fn pick(
        &mut self,
        catalogue: &[Channel],
        want: ChannelWidth,
        flags: &SelectionFlags,
        nol: &NolManager,
    ) -> DfsResult<SelectionOutcome> {
        let survivors = rule_filter(catalogue, flags, nol);
        if survivors.is_empty() {
            return Err(DfsError::NoChannelAvailable);
        }
        let blocks = block_bitmaps(&survivors);

        let mut width = want;
        loop {
            let mut candidates = bonded_candidates(width, &blocks, &survivors);
            candidates.retain(|c| self.leakage_ok(c, width, nol));

            if !candidates.is_empty() {
                let index = self.rng.gen_range(0..candidates.len());
                let channel = candidates[index];
                let downgraded = width != want;
                if downgraded {
                    self.logger.record(&format!(
                        "reselection downgraded {} -> {} MHz",
                        want.mhz(),
                        width.mhz()
                    ));
                }
                return Ok(SelectionOutcome {
                    channel,
                    width,
                    downgraded,
                });
            }

            width = match width.step_down() {
                Some(narrower) => narrower,
                None => return Err(DfsError::NoChannelAvailable),
            };
        }
    }

    /// A candidate is usable when its modeled leakage into every banned
    /// channel stays under the threshold.
    fn leakage_ok(&self, candidate: &Channel, width: ChannelWidth, nol: &NolManager) -> bool {
        nol.entries().all(|banned| {
            leakage_into(candidate.freq_mhz, width, banned.channel_mhz) <= self.leakage_threshold
        })
    }
}

/// Step 1: drop channels per the exclusion flags and the NOL (exact
/// frequency match).
fn rule_filter(catalogue: &[Channel], flags: &SelectionFlags, nol: &NolManager) -> Vec<Channel> {
    catalogue
        .iter()
        .filter(|ch| ch.enabled)
        .filter(|ch| Some(ch.freq_mhz) != flags.exclude_current_mhz)
        .filter(|ch| !(flags.exclude_weather && ch.weather))
        .filter(|ch| !(flags.exclude_dfs && ch.dfs_required))
        .filter(|ch| match flags.band {
            BandRestriction::Any => true,
            BandRestriction::LowBandOnly => ch.freq_mhz <= 5330,
            BandRestriction::HighBandOnly => ch.freq_mhz >= 5490,
        })
        .filter(|ch| match flags.acs_range_mhz {
            Some((lo, hi)) => (lo..=hi).contains(&ch.freq_mhz),
            None => true,
        })
        .filter(|ch| !nol.contains(ch.freq_mhz))
        .copied()
        .collect()
}

/// Step 2: per-80 MHz-block presence bitmap, one bit per 20 MHz subchannel.
fn block_bitmaps(survivors: &[Channel]) -> [u8; BLOCK_STARTS.len()] {
    let mut blocks = [0u8; BLOCK_STARTS.len()];
    for (block, &start) in BLOCK_STARTS.iter().enumerate() {
        for sub in 0..4u8 {
            let number = start + 4 * sub;
            if survivors.iter().any(|ch| ch.number == number) {
                blocks[block] |= 1 << sub;
            }
        }
    }
    blocks
}

/// Step 3: channels that can anchor a bonded group of the requested width.
fn bonded_candidates(
    width: ChannelWidth,
    blocks: &[u8; BLOCK_STARTS.len()],
    survivors: &[Channel],
) -> Vec<Channel> {
    let mut numbers: Vec<u8> = Vec::new();
    match width {
        ChannelWidth::Mhz20 => {
            numbers.extend(survivors.iter().map(|ch| ch.number));
        }
        ChannelWidth::Mhz40 => {
            for (block, &start) in BLOCK_STARTS.iter().enumerate() {
                // The two 40 MHz halves of a block bond independently.
                if blocks[block] & 0b0011 == 0b0011 {
                    numbers.extend([start, start + 4]);
                }
                if blocks[block] & 0b1100 == 0b1100 {
                    numbers.extend([start + 8, start + 12]);
                }
            }
        }
        ChannelWidth::Mhz80 => {
            for (block, &start) in BLOCK_STARTS.iter().enumerate() {
                if blocks[block] == 0b1111 {
                    numbers.extend((0..4).map(|i| start + 4 * i));
                }
            }
        }
        ChannelWidth::Mhz160 => {
            for &(first, second) in &BLOCK_PAIRS_160 {
                if blocks[first] == 0b1111 && blocks[second] == 0b1111 {
                    numbers.extend((0..4).map(|i| BLOCK_STARTS[first] + 4 * i));
                    numbers.extend((0..4).map(|i| BLOCK_STARTS[second] + 4 * i));
                }
            }
        }
    }
    survivors
        .iter()
        .filter(|ch| numbers.contains(&ch.number))
        .copied()
        .collect()
}
