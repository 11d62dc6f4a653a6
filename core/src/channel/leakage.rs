//! Empirical adjacent-channel leakage tables.
//!
//! Values model how much transmit energy (relative scale) bleeds from a
//! candidate channel into a victim channel, indexed by their separation in
//! 20 MHz steps. Wider transmit bandwidths have wider skirts. The tables
//! are measurement-derived data; do not tune them in code.

use crate::channel::ChannelWidth;

const LEAK_20: [i32; 8] = [100, 40, 26, 18, 12, 8, 5, 2];
const LEAK_40: [i32; 8] = [100, 80, 44, 28, 20, 14, 9, 5];
const LEAK_80: [i32; 8] = [100, 90, 70, 48, 34, 24, 16, 10];
const LEAK_160: [i32; 8] = [100, 95, 85, 70, 55, 42, 30, 20];

/// Modeled leakage from a transmitter at `tx_mhz`/`width` into a victim
/// channel at `victim_mhz`.
pub fn leakage_into(tx_mhz: u32, width: ChannelWidth, victim_mhz: u32) -> i32 {
    let table = match width {
        ChannelWidth::Mhz20 => &LEAK_20,
        ChannelWidth::Mhz40 => &LEAK_40,
        ChannelWidth::Mhz80 => &LEAK_80,
        ChannelWidth::Mhz160 => &LEAK_160,
    };
    let separation = (tx_mhz.abs_diff(victim_mhz) / 20) as usize;
    table[separation.min(table.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leakage_decays_with_separation() {
        let near = leakage_into(5180, ChannelWidth::Mhz80, 5200);
        let far = leakage_into(5180, ChannelWidth::Mhz80, 5500);
        assert!(near > far);
    }

    #[test]
    fn wider_transmit_leaks_more_at_equal_separation() {
        let narrow = leakage_into(5180, ChannelWidth::Mhz20, 5260);
        let wide = leakage_into(5180, ChannelWidth::Mhz160, 5260);
        assert!(wide > narrow);
    }
}
