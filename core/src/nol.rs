use crate::channel::ChannelWidth;
use crate::telemetry::LogManager;
use crate::{DfsError, DfsResult};
use serde::{Deserialize, Serialize};

/// One banned channel.
#[derive(Debug, Clone, Copy)]
pub struct NolEntry {
    pub channel_mhz: u32,
    pub width: ChannelWidth,
    pub start_us: u64,
    pub timeout_us: u64,
}

impl NolEntry {
    pub fn deadline_us(&self) -> u64 {
        self.start_us.saturating_add(self.timeout_us)
    }

    pub fn remaining_us(&self, now_us: u64) -> u64 {
        self.deadline_us().saturating_sub(now_us)
    }
}

/// Persistable view of one NOL entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct NolSnapshotEntry {
    pub channel_mhz: u32,
    pub width: ChannelWidth,
    pub remaining_us: u64,
}

/// Non-Occupancy List: channels banned from transmission after a radar hit.
///
/// Expiry is two-phase. `poll_expired` unlinks a due entry and notifies the
/// caller, but the entry is only parked on a deferred free list; the caller
/// runs `reclaim` later, outside the expiry path, to actually release it.
/// Both lists live behind the owner's single NOL lock, so a lookup can
/// never observe a half-unlinked entry.
pub struct NolManager {
    entries: Vec<NolEntry>,
    free_list: Vec<NolEntry>,
    capacity: usize,
    count: usize,
    logger: LogManager,
}

impl NolManager {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            free_list: Vec::new(),
            capacity: capacity.max(1),
            count: 0,
            logger: LogManager::new(),
        }
    }

    /// Bans a channel, or refreshes the ban in place when the same
    /// channel/width pair is already listed. A full list reports
    /// `CapacityExhausted` and leaves existing entries untouched.
    pub fn add(
        &mut self,
        channel_mhz: u32,
        width: ChannelWidth,
        timeout_us: u64,
        now_us: u64,
    ) -> DfsResult<()> {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.channel_mhz == channel_mhz && e.width == width)
        {
            entry.start_us = now_us;
            entry.timeout_us = timeout_us;
            self.logger
                .record(&format!("NOL refresh {} MHz", channel_mhz));
            return Ok(());
        }
        if self.entries.len() == self.capacity {
            return Err(DfsError::CapacityExhausted(format!(
                "NOL full at {} entries",
                self.capacity
            )));
        }
        self.entries.push(NolEntry {
            channel_mhz,
            width,
            start_us: now_us,
            timeout_us,
        });
        self.count += 1;
        self.logger.record(&format!(
            "NOL add {} MHz / {:?} for {} us",
            channel_mhz, width, timeout_us
        ));
        Ok(())
    }

    /// Unlinks every entry whose ban has elapsed, invoking `notify` for each
    /// after the unlink, and parks them on the deferred free list.
    /// Returns the number of expiries.
    pub fn poll_expired(
        &mut self,
        now_us: u64,
        mut notify: impl FnMut(u32, ChannelWidth),
    ) -> usize {
        let mut expired = 0;
        let mut index = 0;
        while index < self.entries.len() {
            if self.entries[index].deadline_us() <= now_us {
                let entry = self.entries.remove(index);
                self.count = self.count.saturating_sub(1);
                self.free_list.push(entry);
                notify(entry.channel_mhz, entry.width);
                expired += 1;
            } else {
                index += 1;
            }
        }
        expired
    }

    /// Releases unlinked entries; called outside the expiry path.
    pub fn reclaim(&mut self) -> usize {
        let reclaimed = self.free_list.len();
        self.free_list.clear();
        reclaimed
    }

    /// Unlinks every live entry onto the deferred free list.
    pub fn clear_all(&mut self) {
        self.free_list.append(&mut self.entries);
        self.count = 0;
    }

    /// Exact-frequency membership check used by the channel selector.
    pub fn contains(&self, channel_mhz: u32) -> bool {
        self.entries.iter().any(|e| e.channel_mhz == channel_mhz)
    }

    pub fn entries(&self) -> impl Iterator<Item = &NolEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn deferred_len(&self) -> usize {
        self.free_list.len()
    }

    /// Remaining-time view for external persistence.
    pub fn snapshot(&self, now_us: u64) -> Vec<NolSnapshotEntry> {
        self.entries
            .iter()
            .map(|e| NolSnapshotEntry {
                channel_mhz: e.channel_mhz,
                width: e.width,
                remaining_us: e.remaining_us(now_us),
            })
            .collect()
    }

    /// Rebuilds the list from a persisted snapshot; entries whose remaining
    /// time is already zero are skipped.
    pub fn restore(&mut self, snapshot: &[NolSnapshotEntry], now_us: u64) -> DfsResult<()> {
        for item in snapshot {
            if item.remaining_us == 0 {
                continue;
            }
            self.add(item.channel_mhz, item.width, item.remaining_us, now_us)?;
        }
        Ok(())
    }
}
