use bigdecimal::BigDecimal;

use super::catalog::{
    AlbumDuration, AlbumFormat, Anc, Category, Genre, HeadphoneType, Mechanism, PortableType, Rpm,
    Traction, VinylSize,
};

/// Filter over the catalog. Every populated field narrows the result; an empty
/// query matches every product.
///
/// Attribute filters that only exist on some kinds (`artist`, `traction`, ...)
/// implicitly restrict the result to those kinds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    pub category: Option<Category>,
    /// Case-insensitive substring of the product name.
    pub name: Option<String>,
    pub min_price: Option<BigDecimal>,
    pub max_price: Option<BigDecimal>,
    pub in_stock: Option<bool>,

    pub artist: Option<String>,
    pub genre: Option<Genre>,
    pub format: Option<AlbumFormat>,
    pub min_year: Option<i32>,
    pub max_year: Option<i32>,
    pub min_duration: Option<AlbumDuration>,
    pub max_duration: Option<AlbumDuration>,

    pub size: Option<VinylSize>,
    /// Vinyl cutting speed or turntable speed, depending on the kind.
    pub rpm: Option<Rpm>,
    /// Vinyl, player or audio equipment color.
    pub color: Option<String>,

    /// Player or audio equipment brand.
    pub brand: Option<String>,
    pub headphone_type: Option<HeadphoneType>,
    pub anc: Option<Anc>,
    pub wireless: Option<bool>,
    pub bluetooth: Option<bool>,
    pub min_power: Option<i32>,
    pub max_power: Option<i32>,

    pub traction: Option<Traction>,
    pub mechanism: Option<Mechanism>,
    pub portable_type: Option<PortableType>,
}

impl ProductQuery {
    pub fn for_category(category: Category) -> Self {
        ProductQuery {
            category: Some(category),
            ..Default::default()
        }
    }

    /// Pins the query to `category`, keeping every other filter.
    pub fn within(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }
}
