//! Device types and the issues offered for each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Kind of device brought in for repair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// Phones
    Smartphone,
    /// Tablets
    Tablet,
    /// Laptops
    Laptop,
    /// Desktop computers
    DesktopComputer,
    /// Game consoles
    GameConsole,
    /// Smart watches
    SmartWatch,
    /// Headphones and earbuds
    Headphones,
    /// Anything else
    Other,
}

/// Label did not name a device type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown device type: {0}")]
pub struct UnknownDeviceType(pub String);

impl DeviceType {
    /// Every device type, in the order offered to the customer
    pub const ALL: [Self; 8] = [
        Self::Smartphone,
        Self::Tablet,
        Self::Laptop,
        Self::DesktopComputer,
        Self::GameConsole,
        Self::SmartWatch,
        Self::Headphones,
        Self::Other,
    ];

    /// Display label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Smartphone => "Smartphone",
            Self::Tablet => "Tablet",
            Self::Laptop => "Laptop",
            Self::DesktopComputer => "Desktop Computer",
            Self::GameConsole => "Game Console",
            Self::SmartWatch => "Smart Watch",
            Self::Headphones => "Headphones/Earbuds",
            Self::Other => "Other",
        }
    }

    /// Issue types offered for this device
    #[must_use]
    pub const fn common_issues(self) -> &'static [&'static str] {
        match self {
            Self::Smartphone => &[
                "Cracked Screen",
                "Battery Issues",
                "Charging Problems",
                "Water Damage",
                "Camera Not Working",
                "Software Issues",
                "Other",
            ],
            Self::Tablet => &[
                "Cracked Screen",
                "Battery Issues",
                "Charging Problems",
                "Water Damage",
                "Not Powering On",
                "Software Issues",
                "Other",
            ],
            Self::Laptop => &[
                "Screen Issues",
                "Battery Problems",
                "Keyboard Replacement",
                "Charging Issues",
                "Hard Drive Failure",
                "Performance Problems",
                "Other",
            ],
            Self::DesktopComputer => &[
                "Not Powering On",
                "Slow Performance",
                "Hard Drive Issues",
                "Operating System Problems",
                "Virus Removal",
                "Hardware Upgrade",
                "Other",
            ],
            Self::GameConsole => &[
                "Not Powering On",
                "Disc Reading Issues",
                "Controller Problems",
                "Overheating",
                "Network Connection Issues",
                "Other",
            ],
            Self::SmartWatch => &[
                "Screen Damage",
                "Battery Issues",
                "Button Not Working",
                "Not Syncing",
                "Water Damage",
                "Other",
            ],
            Self::Headphones => &[
                "Audio Problems",
                "Charging Case Issues",
                "Connection Problems",
                "Physical Damage",
                "Battery Issues",
                "Other",
            ],
            Self::Other => &["Please Describe Your Issue"],
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for DeviceType {
    type Err = UnknownDeviceType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|device| device.label() == s)
            .ok_or_else(|| UnknownDeviceType(s.to_string()))
    }
}
