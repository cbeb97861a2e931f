/// A newer boot-epoch estimate this much later than the current one means the
/// device rebooted.
pub const REBOOT_THRESHOLD_MS: i64 = 10_000;

/// Maps device uptime onto the local clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeviceClock {
    boot_epoch: Option<i64>,
}

impl DeviceClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn boot_epoch(&self) -> Option<i64> {
        self.boot_epoch
    }

    pub fn is_known(&self) -> bool {
        self.boot_epoch.is_some()
    }

    /// Folds one `millis` report into the estimate. Lower estimates carry less
    /// transport latency and always win. Returns whether the epoch changed.
    pub fn observe_uptime(&mut self, local_now: i64, uptime_ms: i64) -> bool {
        let candidate = local_now - uptime_ms;
        let replace = match self.boot_epoch {
            None => true,
            Some(current) => candidate < current || candidate - current > REBOOT_THRESHOLD_MS,
        };
        if replace {
            if self.boot_epoch.is_some() {
                log::debug!("Boot epoch moved to {candidate}");
            }
            self.boot_epoch = Some(candidate);
        }
        replace
    }

    pub fn reset(&mut self) {
        self.boot_epoch = None;
    }

    pub fn to_local(&self, device_ms: i64) -> Option<i64> {
        self.boot_epoch.map(|epoch| device_ms + epoch)
    }

    pub fn to_device(&self, local_ms: i64) -> Option<i64> {
        self.boot_epoch.map(|epoch| local_ms - epoch)
    }

    pub fn elapsed(&self, local_now: i64) -> Option<i64> {
        self.to_device(local_now)
    }
}

/// `m:ss`, minutes unbounded.
pub fn format_elapsed(ms: i64) -> String {
    let seconds = ms.max(0) / 1000;
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
