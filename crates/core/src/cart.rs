//! Cart line items and the in-memory cart collection.
//!
//! [`Cart`] is an ordered list of [`CartItem`]s keyed by [`ServiceId`]. All
//! mutations keep two invariants:
//!
//! - an id appears at most once (adding an existing id increments its
//!   quantity instead of appending a duplicate);
//! - a quantity is never zero (dropping to zero removes the line).
//!
//! The collection does no I/O; [`crate::store::CartStore`] wraps it with
//! write-through persistence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Price, ServiceId};

/// A single line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: ServiceId,
    pub name: String,
    /// Unit price; zero marks a custom quote.
    pub price: Price,
    /// Always at least 1.
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_custom_quote: bool,
    #[serde(default)]
    pub is_personalized: bool,
    /// Free-text annotation, e.g. personalization details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl CartItem {
    /// `price * quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price.times(self.quantity)
    }

    /// Whether this line is priced by negotiation.
    #[must_use]
    pub const fn needs_quote(&self) -> bool {
        self.is_custom_quote || self.price.is_custom_quote()
    }
}

/// Input to [`Cart::add_item`].
///
/// Mirrors [`CartItem`] but with an optional quantity. A missing or zero
/// quantity counts as 1.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCartItem {
    pub id: ServiceId,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_custom_quote: bool,
    #[serde(default)]
    pub is_personalized: bool,
}

impl NewCartItem {
    /// Build an item with only the required fields.
    #[must_use]
    pub fn new(id: ServiceId, name: impl Into<String>, price: Price) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            quantity: None,
            description: None,
            is_custom_quote: false,
            is_personalized: false,
        }
    }

    /// Set the quantity contributed by this add.
    #[must_use]
    pub const fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = Some(quantity);
        self
    }

    /// The quantity this add contributes.
    #[must_use]
    pub fn contributed_quantity(&self) -> u32 {
        self.quantity.filter(|q| *q > 0).unwrap_or(1)
    }

    fn into_item(self) -> CartItem {
        let quantity = self.contributed_quantity();
        CartItem {
            id: self.id,
            name: self.name,
            price: self.price,
            quantity,
            description: self.description,
            is_custom_quote: self.is_custom_quote,
            is_personalized: self.is_personalized,
            note: None,
        }
    }
}

/// Fields that [`Cart::patch_item`] merges into an existing line.
///
/// `None` leaves the field unchanged. The id and quantity are not
/// patchable; quantity goes through [`Cart::set_quantity`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<Price>,
    #[serde(default)]
    pub is_custom_quote: Option<bool>,
    #[serde(default)]
    pub is_personalized: Option<bool>,
    #[serde(default)]
    pub note: Option<String>,
}

impl ItemPatch {
    fn apply(self, item: &mut CartItem) {
        if let Some(name) = self.name {
            item.name = name;
        }
        if let Some(description) = self.description {
            item.description = Some(description);
        }
        if let Some(price) = self.price {
            item.price = price;
        }
        if let Some(flag) = self.is_custom_quote {
            item.is_custom_quote = flag;
        }
        if let Some(flag) = self.is_personalized {
            item.is_personalized = flag;
        }
        if let Some(note) = self.note {
            item.note = Some(note);
        }
    }
}

/// Ordered collection of cart lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up a line by id.
    #[must_use]
    pub fn get(&self, id: &ServiceId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a line, or increase the quantity of the line with the same id.
    pub fn add_item(&mut self, new_item: NewCartItem) {
        let added = new_item.contributed_quantity();
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == new_item.id) {
            existing.quantity = existing.quantity.saturating_add(added);
        } else {
            self.items.push(new_item.into_item());
        }
    }

    /// Remove the line with `id`. Returns the removed line, if any.
    pub fn remove_item(&mut self, id: &ServiceId) -> Option<CartItem> {
        let index = self.items.iter().position(|item| &item.id == id)?;
        Some(self.items.remove(index))
    }

    /// Replace a line's quantity. Zero or below removes the line.
    ///
    /// Quantities above `u32::MAX` saturate. Returns `false` if no line has
    /// `id`.
    pub fn set_quantity(&mut self, id: &ServiceId, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.remove_item(id).is_some();
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Merge `patch` into the line with `id`. Returns `false` if absent.
    pub fn patch_item(&mut self, id: &ServiceId, patch: ItemPatch) -> bool {
        match self.items.iter_mut().find(|item| &item.id == id) {
            Some(item) => {
                patch.apply(item);
                true
            }
            None => false,
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over all lines, saturating at `Decimal::MAX`.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items
            .iter()
            .map(CartItem::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Whether any line is a custom quote, so the UI can show
    /// "+ custom quote" next to the numeric total.
    #[must_use]
    pub fn has_custom_quote(&self) -> bool {
        self.items.iter().any(CartItem::needs_quote)
    }

    /// Drop lines that violate the cart invariants.
    ///
    /// Persisted data is not trusted: zero quantities are removed and later
    /// duplicates are folded into the first occurrence.
    #[must_use]
    pub fn normalized(self) -> Self {
        let mut cart = Self::new();
        for item in self.items {
            if item.quantity == 0 {
                continue;
            }
            if let Some(existing) = cart.items.iter_mut().find(|line| line.id == item.id) {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            } else {
                cart.items.push(item);
            }
        }
        cart
    }
}
