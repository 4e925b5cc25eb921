//! Sleep prevention mode catalog and duration presets
//!
//! Static data only: which caffeinate flags each mode maps to, the
//! human-facing names and descriptions, and the named duration presets.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};

/// Which subsystems the inhibitor keeps awake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SleepMode {
    Display,
    Idle,
    Disk,
    #[serde(rename = "ac")]
    AcPower,
    All,
}

impl SleepMode {
    pub const DEFAULT: SleepMode = SleepMode::Idle;

    pub const ALL_MODES: [SleepMode; 5] = [
        SleepMode::Display,
        SleepMode::Idle,
        SleepMode::Disk,
        SleepMode::AcPower,
        SleepMode::All,
    ];

    /// Caffeinate flags for this mode. `All` is the union of the
    /// display, idle, and disk flag sets.
    pub fn flags(self) -> &'static [&'static str] {
        match self {
            SleepMode::Display => &["-d"],
            SleepMode::Idle => &["-i"],
            SleepMode::Disk => &["-m"],
            SleepMode::AcPower => &["-s"],
            SleepMode::All => &["-d", "-i", "-m"],
        }
    }

    /// Stable identifier used on the wire.
    pub fn id(self) -> &'static str {
        match self {
            SleepMode::Display => "display",
            SleepMode::Idle => "idle",
            SleepMode::Disk => "disk",
            SleepMode::AcPower => "ac",
            SleepMode::All => "all",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            SleepMode::Display => "🖥️ Prevent Display Sleep",
            SleepMode::Idle => "💤 Prevent Idle System Sleep",
            SleepMode::Disk => "💾 Prevent Disk Sleep",
            SleepMode::AcPower => "🔌 Prevent Sleep on AC Power",
            SleepMode::All => "🚫 Prevent All Sleep",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SleepMode::Display => "Keep screen on while allowing system to sleep",
            SleepMode::Idle => "Keep system awake but allow display to sleep",
            SleepMode::Disk => "Keep hard drives spinning",
            SleepMode::AcPower => "Only when connected to power adapter",
            SleepMode::All => "Keep everything awake (display, system, disk)",
        }
    }

    /// Parse a mode identifier, falling back to the default for anything
    /// unrecognized. Unknown modes degrade rather than fail.
    pub fn parse(s: &str) -> SleepMode {
        match s {
            "display" => SleepMode::Display,
            "idle" => SleepMode::Idle,
            "disk" => SleepMode::Disk,
            "ac" => SleepMode::AcPower,
            "all" => SleepMode::All,
            _ => SleepMode::DEFAULT,
        }
    }
}

impl fmt::Display for SleepMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

// Manual impl so unrecognized strings take the default branch instead of
// erroring. serde's `other` attribute only covers tagged enums, so it can't
// express this for a plain string enum.
impl<'de> Deserialize<'de> for SleepMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(SleepMode::parse(&s))
    }
}

/// Named duration presets, in minutes. `None` means indefinite.
pub const DURATION_PRESETS: [(&str, Option<u64>); 5] = [
    ("30min", Some(30)),
    ("1hr", Some(60)),
    ("2hr", Some(120)),
    ("4hr", Some(240)),
    ("indefinite", None),
];

/// Look up a preset by name. Outer `None` means the preset is unknown;
/// inner `None` means indefinite.
pub fn preset_minutes(name: &str) -> Option<Option<u64>> {
    DURATION_PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, minutes)| *minutes)
}

/// Comma-separated preset names, for error messages and schema docs.
pub fn preset_names() -> String {
    DURATION_PRESETS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Format a whole-second interval as `H:MM:SS`, with a day prefix past 24h.
pub fn format_interval(total_seconds: i64) -> String {
    let total_seconds = total_seconds.max(0);
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    let seconds = total_seconds % 60;

    if days == 1 {
        format!("1 day, {}:{:02}:{:02}", hours, minutes, seconds)
    } else if days > 1 {
        format!("{} days, {}:{:02}:{:02}", days, hours, minutes, seconds)
    } else {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    }
}
