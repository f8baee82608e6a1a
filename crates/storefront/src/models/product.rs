//! Catalog products: rows, request bodies, and listing filters.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use bazaar_core::reconcile::patch::merge_text;
use bazaar_core::{Price, PriceError, PricePatch, ProductId};

/// Highest average review a product can carry.
pub const MAX_REVIEW: f64 = 5.0;

/// A product row as stored and returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub price: Price,
    pub sale_price: Option<Price>,
    pub total_stock: i32,
    pub average_review: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// The editable fields of this product.
    #[must_use]
    pub fn draft(&self) -> ProductDraft {
        ProductDraft {
            image: self.image.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            brand: self.brand.clone(),
            price: self.price,
            sale_price: self.sale_price,
            total_stock: self.total_stock,
            average_review: self.average_review,
        }
    }
}

/// The columns cart and wishlist views need.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ProductSummary {
    pub id: ProductId,
    pub image: Option<String>,
    pub title: String,
    pub price: Price,
    pub sale_price: Option<Price>,
    pub total_stock: i32,
}

/// Product fields embedded in cart and wishlist views.
///
/// A product deleted after being added renders as a placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCard {
    pub image: Option<String>,
    pub title: String,
    pub price: Option<Price>,
    pub sale_price: Option<Price>,
    pub total_stock: i32,
}

impl ProductCard {
    pub const MISSING_TITLE: &'static str = "Product not found";

    #[must_use]
    pub fn new(summary: Option<&ProductSummary>) -> Self {
        summary.map_or_else(Self::missing, |p| Self {
            image: p.image.clone(),
            title: p.title.clone(),
            price: Some(p.price),
            sale_price: p.sale_price,
            total_stock: p.total_stock,
        })
    }

    #[must_use]
    pub fn missing() -> Self {
        Self {
            image: None,
            title: Self::MISSING_TITLE.to_owned(),
            price: None,
            sale_price: None,
            total_stock: 0,
        }
    }
}

/// Validation failures for product input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProductInputError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("{field}: {source}")]
    Price {
        field: &'static str,
        source: PriceError,
    },
    #[error("totalStock cannot be negative")]
    NegativeStock,
    #[error("averageReview must be between 0 and 5")]
    ReviewOutOfRange,
}

/// Validated product fields, ready to insert or update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub image: Option<String>,
    pub title: String,
    pub description: String,
    pub category: String,
    pub brand: String,
    pub price: Price,
    pub sale_price: Option<Price>,
    pub total_stock: i32,
    pub average_review: f64,
}

impl ProductDraft {
    fn check_numbers(self) -> Result<Self, ProductInputError> {
        if self.total_stock < 0 {
            return Err(ProductInputError::NegativeStock);
        }
        if !(0.0..=MAX_REVIEW).contains(&self.average_review) {
            return Err(ProductInputError::ReviewOutOfRange);
        }
        Ok(self)
    }
}

/// Body of the admin "add product" request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductRequest {
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    pub price: PricePatch,
    #[serde(default)]
    pub sale_price: Option<PricePatch>,
    #[serde(default)]
    pub total_stock: i32,
    #[serde(default)]
    pub average_review: Option<f64>,
}

impl NewProductRequest {
    /// Validate into a draft.
    ///
    /// # Errors
    ///
    /// Returns `ProductInputError` for blank required text, negative prices
    /// or stock, or a review outside `0..=5`.
    pub fn into_draft(self) -> Result<ProductDraft, ProductInputError> {
        ProductDraft {
            image: non_blank(self.image),
            title: required("title", &self.title)?,
            description: self.description.trim().to_owned(),
            category: required("category", &self.category)?,
            brand: required("brand", &self.brand)?,
            price: resolve_price("price", &self.price)?,
            sale_price: self
                .sale_price
                .as_ref()
                .map(|p| resolve_price("salePrice", p))
                .transpose()?,
            total_stock: self.total_stock,
            average_review: self.average_review.unwrap_or(0.0),
        }
        .check_numbers()
    }
}

/// Body of the admin "edit product" request.
///
/// Absent fields and blank text keep the stored value. A price sent as `""`
/// resets it to zero.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatchRequest {
    pub image: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub price: Option<PricePatch>,
    pub sale_price: Option<PricePatch>,
    pub total_stock: Option<i32>,
    pub average_review: Option<f64>,
}

impl ProductPatchRequest {
    /// Produce the edited draft.
    ///
    /// # Errors
    ///
    /// Same as [`NewProductRequest::into_draft`] for the submitted fields.
    pub fn apply(&self, current: &ProductDraft) -> Result<ProductDraft, ProductInputError> {
        let sale_price = match &self.sale_price {
            Some(patch) => Some(resolve_price("salePrice", patch)?),
            None => current.sale_price,
        };

        ProductDraft {
            image: non_blank(self.image.clone()).or_else(|| current.image.clone()),
            title: merge_text(&current.title, self.title.as_deref()),
            description: merge_text(&current.description, self.description.as_deref()),
            category: merge_text(&current.category, self.category.as_deref()),
            brand: merge_text(&current.brand, self.brand.as_deref()),
            price: PricePatch::apply(self.price.as_ref(), current.price).map_err(|source| {
                ProductInputError::Price {
                    field: "price",
                    source,
                }
            })?,
            sale_price,
            total_stock: self.total_stock.unwrap_or(current.total_stock),
            average_review: self.average_review.unwrap_or(current.average_review),
        }
        .check_numbers()
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ProductInputError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ProductInputError::MissingField(field));
    }
    Ok(value.to_owned())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn resolve_price(field: &'static str, patch: &PricePatch) -> Result<Price, ProductInputError> {
    patch
        .resolve()
        .map_err(|source| ProductInputError::Price { field, source })
}

/// Listing order for the shop catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductSort {
    #[default]
    PriceLowToHigh,
    PriceHighToLow,
    TitleAToZ,
    TitleZToA,
}

impl ProductSort {
    /// The `ORDER BY` clause for this sort. Ties break on id for stable pages.
    #[must_use]
    pub const fn order_by(self) -> &'static str {
        match self {
            Self::PriceLowToHigh => "price ASC, id ASC",
            Self::PriceHighToLow => "price DESC, id ASC",
            Self::TitleAToZ => "title ASC, id ASC",
            Self::TitleZToA => "title DESC, id ASC",
        }
    }
}

impl FromStr for ProductSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "price-lowtohigh" => Ok(Self::PriceLowToHigh),
            "price-hightolow" => Ok(Self::PriceHighToLow),
            "title-atoz" => Ok(Self::TitleAToZ),
            "title-ztoa" => Ok(Self::TitleZToA),
            other => Err(format!("Unknown sort option: {other}")),
        }
    }
}

/// Filters for the shop catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub categories: Vec<String>,
    pub brands: Vec<String>,
    pub sort: ProductSort,
}

impl ProductFilter {
    /// Build a filter from raw query parameters.
    ///
    /// `category` and `brand` are comma-separated lists; empty entries are
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns a message naming the value if `sort_by` is not a known option.
    pub fn from_query(
        category: Option<&str>,
        brand: Option<&str>,
        sort_by: Option<&str>,
    ) -> Result<Self, String> {
        let sort = match sort_by.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => raw.parse()?,
            None => ProductSort::default(),
        };
        Ok(Self {
            categories: split_list(category),
            brands: split_list(brand),
            sort,
        })
    }
}

fn split_list(raw: Option<&str>) -> Vec<String> {
    raw.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn shirt() -> ProductDraft {
        ProductDraft {
            image: Some("https://img.example/shirt.png".to_owned()),
            title: "Linen Shirt".to_owned(),
            description: "Breathable".to_owned(),
            category: "men".to_owned(),
            brand: "nike".to_owned(),
            price: Price::parse("40").unwrap(),
            sale_price: Some(Price::parse("35").unwrap()),
            total_stock: 12,
            average_review: 4.5,
        }
    }

    #[test]
    fn test_new_product_requires_title() {
        let req: NewProductRequest =
            serde_json::from_str(r#"{"title":"  ","category":"men","brand":"nike","price":10}"#)
                .unwrap();
        assert_eq!(
            req.into_draft(),
            Err(ProductInputError::MissingField("title"))
        );
    }

    #[test]
    fn test_new_product_accepts_string_price() {
        let req: NewProductRequest = serde_json::from_str(
            r#"{"title":"Mug","category":"kitchen","brand":"acme","price":"12.5","totalStock":3}"#,
        )
        .unwrap();
        let draft = req.into_draft().unwrap();
        assert_eq!(draft.price, Price::parse("12.50").unwrap());
        assert_eq!(draft.sale_price, None);
        assert_eq!(draft.total_stock, 3);
    }

    #[test]
    fn test_new_product_rejects_negative_stock() {
        let req: NewProductRequest = serde_json::from_str(
            r#"{"title":"Mug","category":"k","brand":"a","price":1,"totalStock":-1}"#,
        )
        .unwrap();
        assert_eq!(req.into_draft(), Err(ProductInputError::NegativeStock));
    }

    #[test]
    fn test_patch_empty_price_is_zero() {
        let patch: ProductPatchRequest = serde_json::from_str(r#"{"price":""}"#).unwrap();
        let edited = patch.apply(&shirt()).unwrap();
        assert_eq!(edited.price, Price::ZERO);
        assert_eq!(edited.sale_price, shirt().sale_price);
    }

    #[test]
    fn test_patch_absent_fields_preserved() {
        let patch: ProductPatchRequest =
            serde_json::from_str(r#"{"title":"","brand":"adidas"}"#).unwrap();
        let edited = patch.apply(&shirt()).unwrap();
        assert_eq!(edited.title, "Linen Shirt");
        assert_eq!(edited.brand, "adidas");
        assert_eq!(edited.total_stock, 12);
        assert_eq!(edited.image, shirt().image);
    }

    #[test]
    fn test_patch_allows_zero_stock() {
        let patch: ProductPatchRequest = serde_json::from_str(r#"{"totalStock":0}"#).unwrap();
        assert_eq!(patch.apply(&shirt()).unwrap().total_stock, 0);
    }

    #[test]
    fn test_patch_rejects_bad_review() {
        let patch: ProductPatchRequest = serde_json::from_str(r#"{"averageReview":7}"#).unwrap();
        assert_eq!(
            patch.apply(&shirt()),
            Err(ProductInputError::ReviewOutOfRange)
        );
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!(
            "price-hightolow".parse::<ProductSort>(),
            Ok(ProductSort::PriceHighToLow)
        );
        assert!("cheapest".parse::<ProductSort>().is_err());
    }

    #[test]
    fn test_filter_from_query() {
        let filter =
            ProductFilter::from_query(Some("men, women,"), None, Some("title-atoz")).unwrap();
        assert_eq!(filter.categories, vec!["men", "women"]);
        assert!(filter.brands.is_empty());
        assert_eq!(filter.sort, ProductSort::TitleAToZ);

        let default = ProductFilter::from_query(None, Some(""), None).unwrap();
        assert_eq!(default, ProductFilter::default());

        assert!(ProductFilter::from_query(None, None, Some("random")).is_err());
    }

    #[test]
    fn test_missing_card_placeholder() {
        let card = ProductCard::new(None);
        assert_eq!(card.title, "Product not found");
        assert_eq!(card.total_stock, 0);
        assert_eq!(card.price, None);
    }
}
