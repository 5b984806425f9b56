use std::fmt::Display;

/// Stars shown for a perfect 10
pub const MAX_STARS: u8 = 5;

const FILLED: char = '★';
const EMPTY: char = '☆';

/// A 0–10 score as 0–5 highlighted stars plus a text label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarRating {
    pub filled: u8,
    pub label: String,
}

impl StarRating {
    /// Absent (or non-finite) scores render as "N/A" with no stars
    pub fn from_score(score: Option<f64>) -> Self {
        match score.filter(|score| score.is_finite()) {
            Some(score) => Self {
                filled: (score / 2.0).round().clamp(0.0, MAX_STARS as f64) as u8,
                label: format!("{:.1}/10", score),
            },
            None => Self {
                filled: 0,
                label: "N/A".to_string(),
            },
        }
    }
}

impl Display for StarRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for star in 0..MAX_STARS {
            let symbol = if star < self.filled { FILLED } else { EMPTY };
            write!(f, "{}", symbol)?;
        }
        write!(f, " {}", self.label)
    }
}
