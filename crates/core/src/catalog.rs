//! The agency's service packages.
//!
//! Package prices are in whole rupees. A zero price is a custom quote.

use serde::Serialize;

use crate::cart::NewCartItem;
use crate::types::{Price, ServiceId};

/// Grouping used on the services page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ServiceCategory {
    SocialMedia,
    WebDevelopment,
    Branding,
    Marketing,
    Custom,
}

impl ServiceCategory {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SocialMedia => "Social Media",
            Self::WebDevelopment => "Web Development",
            Self::Branding => "Branding & Design",
            Self::Marketing => "Digital Marketing",
            Self::Custom => "Custom Projects",
        }
    }
}

/// A purchasable package as listed on the services page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePackage {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub description: &'static str,
    pub category: ServiceCategory,
    pub is_custom_quote: bool,
}

impl ServicePackage {
    #[must_use]
    pub fn price(&self) -> Price {
        Price::from_units(self.price)
    }

    /// The cart input for adding one of this package.
    ///
    /// Returns `None` only if the static id is malformed.
    #[must_use]
    pub fn to_cart_item(&self) -> Option<NewCartItem> {
        let id = ServiceId::parse(self.id).ok()?;
        let mut item = NewCartItem::new(id, self.name, self.price());
        item.description = Some(self.description.to_string());
        item.is_custom_quote = self.is_custom_quote;
        Some(item)
    }
}

const PACKAGES: &[ServicePackage] = &[
    ServicePackage {
        id: "smm-monthly",
        name: "Social Media Management (Monthly)",
        price: 14_999,
        description: "Content calendar, 20 posts, community management across two platforms.",
        category: ServiceCategory::SocialMedia,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "smm-starter",
        name: "Social Media Starter Kit",
        price: 4_999,
        description: "Profile setup, highlight covers, and 8 launch posts.",
        category: ServiceCategory::SocialMedia,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "web-landing",
        name: "Landing Page",
        price: 9_999,
        description: "Single responsive page with contact form and analytics.",
        category: ServiceCategory::WebDevelopment,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "web-business",
        name: "Business Website",
        price: 24_999,
        description: "Up to 6 pages, CMS, on-page SEO, and hosting setup.",
        category: ServiceCategory::WebDevelopment,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "web-ecommerce",
        name: "E-commerce Store",
        price: 44_999,
        description: "Product catalog, cart, payment gateway integration, and admin training.",
        category: ServiceCategory::WebDevelopment,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "logo-design",
        name: "Logo Design",
        price: 3_499,
        description: "Three concepts, two revision rounds, full file kit.",
        category: ServiceCategory::Branding,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "brand-identity",
        name: "Brand Identity",
        price: 12_999,
        description: "Logo, palette, typography, and a brand guidelines document.",
        category: ServiceCategory::Branding,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "seo-monthly",
        name: "SEO Retainer (Monthly)",
        price: 9_999,
        description: "Keyword research, technical fixes, and four optimized articles.",
        category: ServiceCategory::Marketing,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "ads-management",
        name: "Paid Ads Management",
        price: 7_999,
        description: "Campaign setup and monthly optimization on Meta and Google.",
        category: ServiceCategory::Marketing,
        is_custom_quote: false,
    },
    ServicePackage {
        id: "custom-project",
        name: "Custom Project",
        price: 0,
        description: "Tell us what you need and we will send a tailored quote.",
        category: ServiceCategory::Custom,
        is_custom_quote: true,
    },
];

/// Every package, in display order.
#[must_use]
pub const fn packages() -> &'static [ServicePackage] {
    PACKAGES
}

/// Look up a package by id.
#[must_use]
pub fn find(id: &str) -> Option<&'static ServicePackage> {
    PACKAGES.iter().find(|package| package.id == id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_ids_unique_and_valid() {
        let mut seen = HashSet::new();
        for package in packages() {
            assert!(ServiceId::parse(package.id).is_ok(), "{}", package.id);
            assert!(seen.insert(package.id), "duplicate id {}", package.id);
        }
    }

    #[test]
    fn test_custom_quote_packages_are_zero_priced() {
        for package in packages().iter().filter(|p| p.is_custom_quote) {
            assert!(package.price().is_custom_quote());
        }
    }

    #[test]
    fn test_find_to_cart_item() {
        let item = find("smm-monthly").unwrap().to_cart_item().unwrap();
        assert_eq!(item.id.as_str(), "smm-monthly");
        assert_eq!(item.price, Price::from_units(14_999));
        assert_eq!(item.contributed_quantity(), 1);
    }

    #[test]
    fn test_find_unknown() {
        assert!(find("nope").is_none());
    }
}
