//! Catalog query parameters

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Image used when a product has none.
pub const PLACEHOLDER_IMAGE: &str = "/images/sample.jpg";

/// First image of a product, or the placeholder when there is none.
pub fn primary_image(images: &[String]) -> &str {
    images.first().map_or(PLACEHOLDER_IMAGE, String::as_str)
}

/// Errors raised while parsing a sort expression.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SortError {
    /// The expression is not of the form `field_direction`.
    #[error("sort must look like `field_asc` or `field_desc`, got `{0}`")]
    Malformed(String),

    /// The field cannot be sorted on.
    #[error("cannot sort by `{0}`")]
    UnknownField(String),

    /// The direction is neither `asc` nor `desc`.
    #[error("unknown sort direction `{0}`")]
    UnknownDirection(String),
}

/// Product fields a listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Product name.
    Name,

    /// Unit price.
    Price,

    /// Creation time.
    CreatedAt,

    /// Mean review rating.
    AverageRating,

    /// Number of reviews.
    NumReviews,

    /// Units in stock.
    StockQuantity,
}

impl FromStr for SortField {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(SortField::Name),
            "price" => Ok(SortField::Price),
            "created_at" | "createdAt" => Ok(SortField::CreatedAt),
            "average_rating" | "averageRating" => Ok(SortField::AverageRating),
            "num_reviews" | "numReviews" => Ok(SortField::NumReviews),
            "stock_quantity" | "stockQuantity" => Ok(SortField::StockQuantity),
            other => Err(SortError::UnknownField(other.to_string())),
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,

    /// Largest first.
    Descending,
}

impl FromStr for SortDirection {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Ascending),
            "desc" => Ok(SortDirection::Descending),
            other => Err(SortError::UnknownDirection(other.to_string())),
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        })
    }
}

/// Ordering applied to a product listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSort {
    /// Field to order by.
    pub field: SortField,

    /// Direction to order in.
    pub direction: SortDirection,
}

impl Default for ProductSort {
    /// Newest first.
    fn default() -> Self {
        ProductSort {
            field: SortField::CreatedAt,
            direction: SortDirection::Descending,
        }
    }
}

impl FromStr for ProductSort {
    type Err = SortError;

    /// Parse `field_direction`, e.g. `price_asc` or `created_at_desc`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, direction) = s
            .rsplit_once('_')
            .ok_or_else(|| SortError::Malformed(s.to_string()))?;

        if field.is_empty() {
            return Err(SortError::Malformed(s.to_string()));
        }

        Ok(ProductSort {
            field: field.parse()?,
            direction: direction.parse()?,
        })
    }
}

/// Filters applied to a product listing. Absent fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub keyword: Option<String>,

    /// Exact category.
    pub category: Option<String>,

    /// Exact brand.
    pub brand: Option<String>,

    /// Inclusive lower price bound, in minor units.
    pub min_price: Option<u64>,

    /// Inclusive upper price bound, in minor units.
    pub max_price: Option<u64>,
}
