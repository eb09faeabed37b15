use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Star {
    Full,
    Half,
    Empty,
}

/// Five-slot star display for a raw 0-10 vote average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarRating {
    pub full: u8,
    pub half: bool,
}

impl StarRating {
    pub fn from_vote_average(vote_average: f64) -> Self {
        let normalized = if vote_average.is_finite() {
            (vote_average / 2.0).clamp(0.0, 5.0)
        } else {
            0.0
        };
        let full = normalized.floor() as u8;
        // A fifth full star leaves no slot for a half
        let half = full < 5 && normalized.fract() >= 0.5;
        Self { full, half }
    }

    pub fn slots(&self) -> [Star; 5] {
        let mut slots = [Star::Empty; 5];
        for (i, slot) in slots.iter_mut().enumerate() {
            let position = i as u8 + 1;
            if position <= self.full {
                *slot = Star::Full;
            } else if position == self.full + 1 && self.half {
                *slot = Star::Half;
            }
        }
        slots
    }
}

impl fmt::Display for StarRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for slot in self.slots() {
            let c = match slot {
                Star::Full => '★',
                Star::Half => '½',
                Star::Empty => '☆',
            };
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_star() {
        let stars = StarRating::from_vote_average(7.2);
        assert_eq!(stars.full, 3);
        assert!(stars.half);
        assert_eq!(stars.slots(), [Star::Full, Star::Full, Star::Full, Star::Half, Star::Empty]);
        assert_eq!(stars.to_string(), "★★★½☆");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(StarRating::from_vote_average(14.0), StarRating { full: 5, half: false });
        assert_eq!(StarRating::from_vote_average(-3.0), StarRating { full: 0, half: false });
        assert_eq!(StarRating::from_vote_average(f64::NAN), StarRating { full: 0, half: false });
    }
}
