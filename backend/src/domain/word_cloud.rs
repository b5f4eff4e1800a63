//! Font sizing for the adjective word cloud.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Smallest font size in rem.
pub const MIN_FONT_SIZE: f64 = 1.0;
/// Largest font size in rem.
pub const MAX_FONT_SIZE: f64 = 6.0;
/// Lightest font weight.
pub const MIN_FONT_WEIGHT: u16 = 300;
/// Heaviest font weight.
pub const MAX_FONT_WEIGHT: u16 = 900;

/// Interpolation between the smallest and largest observed count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordScale {
    /// Proportional to the count.
    Linear,
    /// Proportional to the square root of the count, compressing outliers.
    #[default]
    Sqrt,
}

/// Error raised for unknown scale names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown scale '{0}'; expected linear or sqrt")]
pub struct WordScaleParseError(pub String);

impl FromStr for WordScale {
    type Err = WordScaleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(Self::Linear),
            "sqrt" => Ok(Self::Sqrt),
            _ => Err(WordScaleParseError(s.to_owned())),
        }
    }
}

impl WordScale {
    fn project(self, count: u32) -> f64 {
        let value = f64::from(count);
        match self {
            Self::Linear => value,
            Self::Sqrt => value.sqrt(),
        }
    }
}

/// A word and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordFrequency {
    /// The word.
    #[serde(alias = "word")]
    pub adjective: String,
    /// Occurrences.
    pub count: u32,
}

/// Rendering hints for one word.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizedWord {
    /// The word.
    pub adjective: String,
    /// Occurrences.
    pub count: u32,
    /// Font size in rem.
    pub font_size: f64,
    /// Font weight rounded to the nearest hundred.
    pub font_weight: u16,
}

fn interpolate(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Size every word between the fixed bounds.
///
/// Equal counts receive the midpoint size and weight. Output order matches
/// input order.
///
/// # Examples
/// ```
/// use gratitude::domain::{WordFrequency, WordScale, size_words};
///
/// let sized = size_words(
///     &[WordFrequency { adjective: "calm".into(), count: 2 }],
///     WordScale::Sqrt,
/// );
/// assert_eq!(sized[0].font_weight, 600);
/// ```
#[must_use]
pub fn size_words(words: &[WordFrequency], scale: WordScale) -> Vec<SizedWord> {
    let Some(min) = words.iter().map(|word| word.count).min() else {
        return Vec::new();
    };
    let max = words.iter().map(|word| word.count).max().unwrap_or(min);

    let min_weight = f64::from(MIN_FONT_WEIGHT);
    let max_weight = f64::from(MAX_FONT_WEIGHT);
    let (lo, hi) = (scale.project(min), scale.project(max));

    words
        .iter()
        .map(|word| {
            let (font_size, weight) = if min == max {
                (
                    (MIN_FONT_SIZE + MAX_FONT_SIZE) / 2.0,
                    (min_weight + max_weight) / 2.0,
                )
            } else {
                let value = scale.project(word.count);
                (
                    interpolate(value, lo, hi, MIN_FONT_SIZE, MAX_FONT_SIZE),
                    interpolate(value, lo, hi, min_weight, max_weight),
                )
            };
            SizedWord {
                adjective: word.adjective.clone(),
                count: word.count,
                font_size,
                font_weight: round_weight(weight),
            }
        })
        .collect()
}

// Clamped to 300..=900 so the cast cannot truncate.
fn round_weight(weight: f64) -> u16 {
    let rounded = (weight / 100.0).round() * 100.0;
    rounded.clamp(f64::from(MIN_FONT_WEIGHT), f64::from(MAX_FONT_WEIGHT)) as u16
}
