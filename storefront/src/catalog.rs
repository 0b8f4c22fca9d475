//! Catalog browsing: products for sale and the repair services on offer.

use crate::cart::{CartProduct, ProductId};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Catalog lookup errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// No product has this id
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// No repair service has this id
    #[error("service {0} not found")]
    ServiceNotFound(ServiceId),
}

/// A product for sale
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Identifier
    pub id: ProductId,
    /// Display name
    pub name: String,
    /// Unit price
    pub price: Money,
    /// Image reference
    pub image: Option<String>,
    /// Category, e.g. `Audio`
    pub category: String,
    /// Manufacturer
    pub brand: String,
    /// Average review score out of 5
    pub rating: f32,
    /// Headline features
    pub features: Vec<String>,
    /// Whether it can be ordered now
    pub in_stock: bool,
}

impl Product {
    /// The fields the cart keeps
    #[must_use]
    pub fn to_cart_product(&self) -> CartProduct {
        CartProduct {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            image: self.image.clone(),
            category: Some(self.category.clone()),
            brand: Some(self.brand.clone()),
        }
    }
}

/// Narrowing applied to the product list
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductFilter {
    /// Exact category
    pub category: Option<String>,
    /// Exact brand
    pub brand: Option<String>,
    /// Inclusive lower price bound
    pub min_price: Option<Money>,
    /// Inclusive upper price bound
    pub max_price: Option<Money>,
    /// Hide products that are out of stock
    pub in_stock_only: bool,
    /// Inclusive lower rating bound; `0.0` disables
    pub min_rating: f32,
}

impl ProductFilter {
    /// Whether `product` passes every active criterion
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.category.as_ref().is_none_or(|c| *c == product.category)
            && self.brand.as_ref().is_none_or(|b| *b == product.brand)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && (!self.in_stock_only || product.in_stock)
            && product.rating >= self.min_rating
    }

    /// Active criteria with their chip labels, in a fixed order
    #[must_use]
    pub fn active(&self) -> Vec<(FilterCriterion, String)> {
        let mut active = Vec::new();
        if let Some(category) = &self.category {
            active.push((FilterCriterion::Category, format!("Category: {category}")));
        }
        if let Some(brand) = &self.brand {
            active.push((FilterCriterion::Brand, format!("Brand: {brand}")));
        }
        if let Some(min) = self.min_price {
            active.push((FilterCriterion::MinPrice, format!("Min Price: {min}")));
        }
        if let Some(max) = self.max_price {
            active.push((FilterCriterion::MaxPrice, format!("Max Price: {max}")));
        }
        if self.in_stock_only {
            active.push((FilterCriterion::InStockOnly, "In Stock Only".to_string()));
        }
        if self.min_rating > 0.0 {
            active.push((FilterCriterion::MinRating, format!("Min Rating: {}", self.min_rating)));
        }
        active
    }

    /// One chip label per active criterion
    #[must_use]
    pub fn active_labels(&self) -> Vec<String> {
        self.active().into_iter().map(|(_, label)| label).collect()
    }

    /// Reset a single criterion, leaving the others in place
    pub fn remove(&mut self, criterion: FilterCriterion) {
        match criterion {
            FilterCriterion::Category => self.category = None,
            FilterCriterion::Brand => self.brand = None,
            FilterCriterion::MinPrice => self.min_price = None,
            FilterCriterion::MaxPrice => self.max_price = None,
            FilterCriterion::InStockOnly => self.in_stock_only = false,
            FilterCriterion::MinRating => self.min_rating = 0.0,
        }
    }

    /// Whether any criterion is active
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self != Self::default()
    }

    /// Reset every criterion
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// One narrowing criterion of a [`ProductFilter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterCriterion {
    /// [`ProductFilter::category`]
    Category,
    /// [`ProductFilter::brand`]
    Brand,
    /// [`ProductFilter::min_price`]
    MinPrice,
    /// [`ProductFilter::max_price`]
    MaxPrice,
    /// [`ProductFilter::in_stock_only`]
    InStockOnly,
    /// [`ProductFilter::min_rating`]
    MinRating,
}

/// Product list ordering
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Catalog order
    #[default]
    Featured,
    /// Cheapest first
    #[serde(rename = "price-low")]
    PriceLowToHigh,
    /// Most expensive first
    #[serde(rename = "price-high")]
    PriceHighToLow,
    /// Best rated first
    Rating,
    /// Alphabetical, ignoring case
    Name,
}

/// The products on offer, in featured order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Catalog over `products`
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Every product, featured order
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Look up a product
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ProductNotFound`] for an unknown id.
    pub fn product(&self, id: ProductId) -> Result<&Product, CatalogError> {
        self.products
            .iter()
            .find(|product| product.id == id)
            .ok_or(CatalogError::ProductNotFound(id))
    }

    /// Filtered and sorted products; ties keep featured order
    #[must_use]
    pub fn browse(&self, filter: &ProductFilter, sort: SortOrder) -> Vec<&Product> {
        let mut products: Vec<&Product> = self
            .products
            .iter()
            .filter(|product| filter.matches(product))
            .collect();

        match sort {
            SortOrder::Featured => {},
            SortOrder::PriceLowToHigh => products.sort_by_key(|p| p.price),
            SortOrder::PriceHighToLow => products.sort_by(|a, b| b.price.cmp(&a.price)),
            SortOrder::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
            SortOrder::Name => products.sort_by_cached_key(|p| p.name.to_lowercase()),
        }

        products
    }

    /// Distinct categories, first-seen order
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.category.as_str()))
    }

    /// Distinct brands, first-seen order
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        distinct(self.products.iter().map(|p| p.brand.as_str()))
    }

    /// The storefront's stock
    #[must_use]
    pub fn demo() -> Self {
        let product = |id, name: &str, dollars, category: &str, brand: &str, rating, features: [&str; 3], in_stock| Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price: Money::from_dollars(dollars),
            image: None,
            category: category.to_string(),
            brand: brand.to_string(),
            rating,
            features: features.iter().map(ToString::to_string).collect(),
            in_stock,
        };

        Self::new(vec![
            product(1, "Smartphone Pro X", 899, "Smartphones", "TechX", 4.8, ["5G", "OLED Display", "Triple Camera"], true),
            product(2, "Laptop Ultra Slim", 1299, "Laptops", "CompuMax", 4.7, ["16GB RAM", "SSD Storage", "Touchscreen"], true),
            product(3, "Smart Watch Series 5", 299, "Wearables", "TechX", 4.6, ["Heart Monitor", "GPS", "Waterproof"], true),
            product(4, "Wireless Earbuds Pro", 159, "Audio", "SoundWave", 4.5, ["Noise Cancellation", "Wireless Charging", "Water Resistant"], true),
            product(5, "HD Smart TV 55\"", 699, "TVs", "ViewClear", 4.4, ["4K", "Smart Apps", "Voice Control"], true),
            product(6, "Gaming Console X", 499, "Gaming", "GamePro", 4.9, ["4K Gaming", "High Performance", "1TB Storage"], false),
            product(7, "Bluetooth Speaker", 79, "Audio", "SoundWave", 4.3, ["Waterproof", "Long Battery Life", "Portable"], true),
            product(8, "Digital Camera Pro", 849, "Cameras", "PhotoMaster", 4.7, ["20MP", "Optical Zoom", "4K Video"], true),
        ])
    }
}

/// Repair service identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceId(u32);

impl ServiceId {
    /// Wrap a raw id
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw id
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Device categories repair services are grouped under
pub const SERVICE_CATEGORIES: [&str; 7] =
    ["All Devices", "Smartphone", "Tablet", "Laptop", "Computer", "Gaming", "Audio"];

/// A repair service offered at the desk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    /// Identifier
    pub id: ServiceId,
    /// Display name
    pub name: String,
    /// What the repair covers
    pub description: String,
    /// Starting price
    pub base_price: Money,
    /// One of [`SERVICE_CATEGORIES`]
    pub category: String,
    /// Turnaround, e.g. `1-2 hours`
    pub estimated_time: String,
    /// Warranty on the repair, `N/A` when none
    pub warranty: String,
}

impl Service {
    /// Case-insensitive substring match on name or description; blank matches all
    #[must_use]
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.name.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
    }
}

/// Repair services, in listing order
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    /// Catalog over `services`
    #[must_use]
    pub const fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// Every service, listing order
    #[must_use]
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    /// Look up a service
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::ServiceNotFound`] for an unknown id.
    pub fn service(&self, id: ServiceId) -> Result<&Service, CatalogError> {
        self.services
            .iter()
            .find(|service| service.id == id)
            .ok_or(CatalogError::ServiceNotFound(id))
    }

    /// Services matching `query` and, when given, exactly `category`
    #[must_use]
    pub fn search(&self, query: &str, category: Option<&str>) -> Vec<&Service> {
        self.services
            .iter()
            .filter(|service| service.matches_query(query))
            .filter(|service| category.is_none_or(|c| service.category == c))
            .collect()
    }

    /// The repair desk's services
    #[must_use]
    pub fn demo() -> Self {
        let service = |id, name: &str, description: &str, dollars, category: &str, time: &str, warranty: &str| Service {
            id: ServiceId::new(id),
            name: name.to_string(),
            description: description.to_string(),
            base_price: Money::from_dollars(dollars),
            category: category.to_string(),
            estimated_time: time.to_string(),
            warranty: warranty.to_string(),
        };

        Self::new(vec![
            service(1, "Screen Repair", "Professional screen replacement for smartphones, tablets, and laptops. Fix cracked or non-responsive screens.", 49, "Smartphone", "1-2 hours", "90 days"),
            service(2, "Battery Replacement", "Replace your device's aging battery to restore full performance and battery life. Same-day service available.", 39, "All Devices", "30-60 minutes", "6 months"),
            service(3, "Water Damage Repair", "Professional diagnosis and repair for water-damaged devices. Quick service to prevent further damage.", 79, "All Devices", "1-3 days", "30 days"),
            service(4, "Charging Port Repair", "Fix charging issues with a new charging port. Stop struggling with loose connections or failed charging.", 45, "Smartphone", "1 hour", "90 days"),
            service(5, "Speaker/Microphone Repair", "Resolve audio problems with professional speaker and microphone repairs. Restore clear sound and voice quality.", 40, "Smartphone", "1 hour", "90 days"),
            service(6, "Data Recovery", "Recover important data from damaged or non-functioning devices. Professional and confidential service.", 99, "All Devices", "1-5 days", "N/A"),
            service(7, "Laptop Keyboard Replacement", "Replace damaged laptop keyboards with genuine or high-quality compatible parts. Restore smooth typing experience.", 69, "Laptop", "1-2 hours", "6 months"),
            service(8, "Virus Removal & System Optimization", "Remove viruses, malware, and optimize your device performance. Make your device run like new again.", 59, "Computer", "2-4 hours", "30 days"),
            service(9, "Game Console Repair", "Fix common game console issues including overheating, disc reading problems, and controller connectivity.", 69, "Gaming", "1-3 days", "90 days"),
        ])
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = BTreeSet::new();
    values.filter(|value| seen.insert(*value)).collect()
}
