use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisKind {
    X,
    Y,
    Z,
    Channel,
    Time,
    Spectra,
    Lifetime,
    Frequency,
    #[default]
    Unknown,
}

impl AxisKind {
    pub fn is_spatial(self) -> bool {
        matches!(self, AxisKind::X | AxisKind::Y | AxisKind::Z)
    }

    pub fn label(self) -> &'static str {
        match self {
            AxisKind::X => "X",
            AxisKind::Y => "Y",
            AxisKind::Z => "Z",
            AxisKind::Channel => "Channel",
            AxisKind::Time => "Time",
            AxisKind::Spectra => "Spectra",
            AxisKind::Lifetime => "Lifetime",
            AxisKind::Frequency => "Frequency",
            AxisKind::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AxisKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.label())
    }
}

pub fn default_axis_for_index(index: usize) -> AxisKind {
    match index {
        0 => AxisKind::Y,
        1 => AxisKind::X,
        2 => AxisKind::Z,
        3 => AxisKind::Channel,
        4 => AxisKind::Time,
        _ => AxisKind::Unknown,
    }
}
