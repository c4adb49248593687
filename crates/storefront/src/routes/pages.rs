//! Informational page handlers and the service catalog.

use agency_core::catalog::{self, ServiceCategory, ServicePackage};
use askama::Template;
use askama_web::WebTemplate;
use axum::{Json, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::session_storage::visitor_store;

/// A service tile on the services page.
#[derive(Clone)]
pub struct PackageView {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: String,
    pub custom_quote: bool,
}

impl From<&ServicePackage> for PackageView {
    fn from(package: &ServicePackage) -> Self {
        Self {
            id: package.id,
            name: package.name,
            description: package.description,
            price: if package.is_custom_quote {
                "Custom quote".to_string()
            } else {
                package.price().to_string()
            },
            custom_quote: package.is_custom_quote,
        }
    }
}

/// Packages grouped under a category heading.
#[derive(Clone)]
pub struct CategoryView {
    pub label: &'static str,
    pub packages: Vec<PackageView>,
}

/// Group the catalog by category, keeping catalog order.
fn categories() -> Vec<CategoryView> {
    let mut groups: Vec<(ServiceCategory, Vec<PackageView>)> = Vec::new();
    for package in catalog::packages() {
        match groups.iter_mut().find(|(category, _)| *category == package.category) {
            Some((_, packages)) => packages.push(PackageView::from(package)),
            None => groups.push((package.category, vec![PackageView::from(package)])),
        }
    }
    groups
        .into_iter()
        .map(|(category, packages)| CategoryView {
            label: category.label(),
            packages,
        })
        .collect()
}

/// A portfolio case study.
#[derive(Clone)]
pub struct Project {
    pub title: &'static str,
    pub client: &'static str,
    pub category: &'static str,
    pub summary: &'static str,
}

const PROJECTS: &[Project] = &[
    Project {
        title: "Farm-to-table storefront",
        client: "Green Basket Organics",
        category: "E-commerce",
        summary: "Catalog, subscriptions, and UPI checkout for a Pune grocery cooperative.",
    },
    Project {
        title: "Festival season campaign",
        client: "Kalakriti Handlooms",
        category: "Social Media",
        summary: "Six-week Instagram campaign that tripled story engagement.",
    },
    Project {
        title: "Clinic rebrand",
        client: "Smile Dental Studio",
        category: "Branding",
        summary: "New identity, signage system, and appointment landing page.",
    },
    Project {
        title: "Local SEO turnaround",
        client: "Chai Point Cafe",
        category: "SEO",
        summary: "Moved three outlets into the map pack within four months.",
    },
];

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    /// Play the typewriter heading; true only on the visitor's first view.
    pub animate_intro: bool,
    pub featured: Vec<PackageView>,
}

/// About page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/about.html")]
pub struct AboutTemplate;

/// Services page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/services.html")]
pub struct ServicesTemplate {
    pub categories: Vec<CategoryView>,
}

/// Portfolio page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/portfolio.html")]
pub struct PortfolioTemplate {
    pub projects: &'static [Project],
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate;

/// Display the home page.
///
/// The intro heading animates once per visitor; the flag is kept in the
/// visitor's storage next to the cart.
#[instrument(skip(session))]
pub async fn home(session: Session) -> impl IntoResponse {
    let animate_intro = visitor_store(&session).await.take_intro().await;
    HomeTemplate {
        animate_intro,
        featured: catalog::packages()
            .iter()
            .filter(|package| !package.is_custom_quote)
            .take(3)
            .map(PackageView::from)
            .collect(),
    }
}

pub async fn about() -> impl IntoResponse {
    AboutTemplate
}

pub async fn services() -> impl IntoResponse {
    ServicesTemplate {
        categories: categories(),
    }
}

pub async fn portfolio() -> impl IntoResponse {
    PortfolioTemplate { projects: PROJECTS }
}

pub async fn contact() -> impl IntoResponse {
    ContactTemplate
}

/// `GET /api/services` - the full catalog.
pub async fn catalog_api() -> Json<&'static [ServicePackage]> {
    Json(catalog::packages())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories_cover_catalog() {
        let total: usize = categories().iter().map(|c| c.packages.len()).sum();
        assert_eq!(total, catalog::packages().len());
    }

    #[test]
    fn test_categories_unique() {
        let groups = categories();
        let mut labels: Vec<_> = groups.iter().map(|c| c.label).collect();
        labels.dedup();
        assert_eq!(labels.len(), groups.len());
    }

    #[test]
    fn test_custom_quote_tile() {
        let package = catalog::find("custom-project").map(PackageView::from);
        assert!(package.is_some_and(|p| p.custom_quote && p.price == "Custom quote"));
    }
}
