//! Sync job parameterization.
//!
//! Mirrors an OS job scheduler's vocabulary: periodic triggers with
//! network/charging constraints, plus an immediate one-off trigger for
//! on-demand refreshes. The daemon interprets these specs.

use std::time::Duration;

/// Fixed interval of the aggressive sync trigger.
pub const AGGRESSIVE_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Recurring sync at the user-configured interval.
    UserSet,
    /// Recurring 15-minute sync, gated on unmetered network + charging.
    Aggressive,
    /// One-off sync requested right now.
    Immediate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkRequirement {
    Any,
    Unmetered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Periodic(Duration),
    /// Zero-deadline one-off. `refresh` distinguishes "fetch from network"
    /// from "re-render notifications from cache only".
    Immediate { refresh: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSpec {
    pub kind: JobKind,
    pub trigger: Trigger,
    pub network: NetworkRequirement,
    pub requires_charging: bool,
    /// Whether the trigger survives a daemon restart. Periodic triggers
    /// derive from config, so they do; immediate ones do not.
    pub persisted: bool,
}

impl JobSpec {
    pub fn immediate(refresh: bool) -> Self {
        Self {
            kind: JobKind::Immediate,
            trigger: Trigger::Immediate { refresh },
            network: NetworkRequirement::Any,
            requires_charging: false,
            persisted: false,
        }
    }
}

/// Build the recurring schedule for a user-chosen interval.
///
/// Always one trigger at the user interval (any network). If that interval
/// differs from [`AGGRESSIVE_INTERVAL`], a second 15-minute trigger is added,
/// restricted to unmetered network while charging.
pub fn build_schedule(user_interval: Duration) -> Vec<JobSpec> {
    let mut specs = vec![JobSpec {
        kind: JobKind::UserSet,
        trigger: Trigger::Periodic(user_interval),
        network: NetworkRequirement::Any,
        requires_charging: false,
        persisted: true,
    }];

    if user_interval != AGGRESSIVE_INTERVAL {
        specs.push(JobSpec {
            kind: JobKind::Aggressive,
            trigger: Trigger::Periodic(AGGRESSIVE_INTERVAL),
            network: NetworkRequirement::Unmetered,
            requires_charging: true,
            persisted: true,
        });
    }

    specs
}

/// Device-state probe the aggressive trigger is gated on.
pub trait ConditionProbe {
    fn is_unmetered(&self) -> bool;
    fn is_charging(&self) -> bool;

    fn satisfies(&self, spec: &JobSpec) -> bool {
        let network_ok = match spec.network {
            NetworkRequirement::Any => true,
            NetworkRequirement::Unmetered => self.is_unmetered(),
        };
        network_ok && (!spec.requires_charging || self.is_charging())
    }
}

/// Best-effort probe for Linux desktops: charging state from sysfs,
/// network assumed unmetered (wired/wifi).
pub struct SysfsProbe;

impl ConditionProbe for SysfsProbe {
    fn is_unmetered(&self) -> bool {
        true
    }

    fn is_charging(&self) -> bool {
        let Ok(entries) = std::fs::read_dir("/sys/class/power_supply") else {
            // No battery information: desktops count as always charging
            return true;
        };

        let mut saw_battery = false;
        for entry in entries.flatten() {
            let status_path = entry.path().join("status");
            if let Ok(status) = std::fs::read_to_string(&status_path) {
                saw_battery = true;
                let status = status.trim();
                if status == "Charging" || status == "Full" {
                    return true;
                }
            }
        }
        !saw_battery
    }
}
