//! Reviews

use thiserror::Error;

/// Errors raised while building a rating.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RatingError {
    /// Ratings run from 1 to 5.
    #[error("rating must be between 1 and 5, got {0}")]
    OutOfRange(i64),
}

/// A review rating between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Lowest allowed rating.
    pub const MIN: u8 = 1;

    /// Highest allowed rating.
    pub const MAX: u8 = 5;

    /// The rating as a number.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .filter(|rating| (Self::MIN..=Self::MAX).contains(rating))
            .map(Rating)
            .ok_or(RatingError::OutOfRange(value))
    }
}

/// Derived review statistics of a product.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReviewSummary {
    /// Number of reviews.
    pub num_reviews: u32,

    /// Mean rating, 0 when there are no reviews.
    pub average_rating: f64,
}

impl ReviewSummary {
    /// Summarise a complete set of ratings.
    pub fn from_ratings(ratings: impl IntoIterator<Item = Rating>) -> Self {
        let (count, sum) = ratings
            .into_iter()
            .fold((0_u32, 0_u32), |(count, sum), rating| {
                (count.saturating_add(1), sum.saturating_add(u32::from(rating.get())))
            });

        if count == 0 {
            return ReviewSummary::default();
        }

        ReviewSummary {
            num_reviews: count,
            average_rating: f64::from(sum) / f64::from(count),
        }
    }
}
