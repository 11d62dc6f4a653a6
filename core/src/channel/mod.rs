pub mod leakage;
pub mod select;

pub use select::{ChannelSelector, SelectionOutcome};

use serde::{Deserialize, Serialize};

/// Transmit bandwidth, in the regulatory bonding ladder.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChannelWidth {
    Mhz20,
    Mhz40,
    Mhz80,
    Mhz160,
}

impl ChannelWidth {
    pub fn mhz(self) -> u32 {
        match self {
            Self::Mhz20 => 20,
            Self::Mhz40 => 40,
            Self::Mhz80 => 80,
            Self::Mhz160 => 160,
        }
    }

    /// Next narrower rung of the fallback ladder.
    pub fn step_down(self) -> Option<Self> {
        match self {
            Self::Mhz160 => Some(Self::Mhz80),
            Self::Mhz80 => Some(Self::Mhz40),
            Self::Mhz40 => Some(Self::Mhz20),
            Self::Mhz20 => None,
        }
    }
}

/// One 20 MHz channel of the catalogue with its regulatory state flags.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub number: u8,
    pub freq_mhz: u32,
    pub dfs_required: bool,
    pub weather: bool,
    pub enabled: bool,
}

impl Channel {
    pub fn new(number: u8) -> Self {
        let freq_mhz = 5000 + 5 * number as u32;
        Self {
            number,
            freq_mhz,
            dfs_required: (52..=144).contains(&number),
            // 5600-5650 MHz is reserved around weather radars.
            weather: (120..=128).contains(&number),
            enabled: true,
        }
    }
}

/// First channel number of each 80 MHz block; subchannels step by 4.
pub const BLOCK_STARTS: [u8; 6] = [36, 52, 100, 116, 132, 149];

/// Block index pairs that form contiguous 160 MHz segments.
pub const BLOCK_PAIRS_160: [(usize, usize); 2] = [(0, 1), (2, 3)];

/// The standard 5 GHz channel map.
pub fn default_5ghz_catalogue() -> Vec<Channel> {
    BLOCK_STARTS
        .iter()
        .flat_map(|&start| (0..4).map(move |i| Channel::new(start + 4 * i)))
        .collect()
}

/// Band halves used by the band-restriction selection flag.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum BandRestriction {
    #[default]
    Any,
    /// U-NII-1/2A, at or below 5330 MHz.
    LowBandOnly,
    /// U-NII-2C/3, at or above 5490 MHz.
    HighBandOnly,
}

/// Exclusion rules applied before random selection.
#[derive(Debug, Clone, Default)]
pub struct SelectionFlags {
    pub exclude_current_mhz: Option<u32>,
    pub exclude_weather: bool,
    pub exclude_dfs: bool,
    pub band: BandRestriction,
    /// Inclusive ACS frequency window, when the auto-channel layer narrows
    /// the search.
    pub acs_range_mhz: Option<(u32, u32)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_covers_all_blocks() {
        let catalogue = default_5ghz_catalogue();
        assert_eq!(catalogue.len(), 24);
        assert!(catalogue.iter().any(|c| c.number == 36 && !c.dfs_required));
        assert!(catalogue.iter().any(|c| c.number == 120 && c.weather));
        assert!(catalogue.iter().any(|c| c.number == 149 && !c.dfs_required));
    }

    #[test]
    fn width_ladder_ends_at_twenty() {
        assert_eq!(ChannelWidth::Mhz160.step_down(), Some(ChannelWidth::Mhz80));
        assert_eq!(ChannelWidth::Mhz20.step_down(), None);
    }

    #[test]
    fn channel_frequency_follows_the_numbering_rule() {
        assert_eq!(Channel::new(36).freq_mhz, 5180);
        assert_eq!(Channel::new(149).freq_mhz, 5745);
    }
}
