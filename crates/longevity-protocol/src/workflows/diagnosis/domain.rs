use serde::{Deserialize, Serialize};
use std::fmt;

/// Points awarded per answer option, best option first.
pub const POINTS: [u8; 4] = [100, 70, 40, 20];

/// Number of questions in the authored quiz bank.
pub const QUESTION_COUNT: usize = 17;

/// Scored wellness categories. Serialized with the keys the stored data uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    #[serde(rename = "energia")]
    Energy,
    #[serde(rename = "son")]
    Sleep,
    #[serde(rename = "nutricio")]
    Nutrition,
    #[serde(rename = "atencio")]
    Attention,
    #[serde(rename = "temps")]
    PerceivedTime,
}

impl Domain {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Energy,
            Self::Sleep,
            Self::Nutrition,
            Self::Attention,
            Self::PerceivedTime,
        ]
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::Energy => "energia",
            Self::Sleep => "son",
            Self::Nutrition => "nutricio",
            Self::Attention => "atencio",
            Self::PerceivedTime => "temps",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Energy => "Energy",
            Self::Sleep => "Sleep",
            Self::Nutrition => "Nutrition",
            Self::Attention => "Attention",
            Self::PerceivedTime => "Perceived Time",
        }
    }

    /// Accepts the stored keys as well as the English aliases, case-insensitively.
    pub fn from_key(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "energia" | "energy" => Some(Self::Energy),
            "son" | "sleep" => Some(Self::Sleep),
            "nutricio" | "nutrition" => Some(Self::Nutrition),
            "atencio" | "attention" => Some(Self::Attention),
            "temps" | "time" | "perceived_time" => Some(Self::PerceivedTime),
            _ => None,
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Points for a single answer index. Indices past the table score as the last option.
pub fn points_for(answer: u8) -> u8 {
    POINTS
        .get(answer as usize)
        .copied()
        .unwrap_or(POINTS[POINTS.len() - 1])
}

/// Round-half-up integer mean. Empty input yields 0.
pub(crate) fn rounded_mean<I>(values: I) -> u8
where
    I: IntoIterator<Item = u32>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        return 0;
    }

    ((sum * 2 + count) / (count * 2)) as u8
}
