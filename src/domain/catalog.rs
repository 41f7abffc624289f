//! Public catalog composition.
//!
//! Folds the category → service → product hierarchy into one nested view.
//! Services with a single product act as directly orderable items: the
//! product's id, prices and features are hoisted onto the service entry.
//! Services with several products advertise the lowest discounted price as a
//! "starting at" price.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Category, Product, Service};

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryView {
    pub id: Uuid,
    pub category: String,
    pub category_slug: String,
    pub image: Option<String>,
    pub services: Vec<ServiceView>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceView {
    /// The service id, or the product id when the service has exactly one product.
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub subcategories: Vec<SubcategoryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubcategoryView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub image: String,
    pub description: Option<String>,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
    pub features: Vec<String>,
}

impl From<&Product> for SubcategoryView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.name.clone(),
            slug: product.slug.clone(),
            image: product.image.clone(),
            description: product.description.clone(),
            original_price: product.original_price,
            discounted_price: product.discounted_price,
            features: product.features.clone(),
        }
    }
}

/// Build the nested catalog. Category, service and product order follow the
/// input slices.
pub fn build_catalog(
    categories: &[Category],
    services: &[Service],
    products: &[Product],
) -> Vec<CategoryView> {
    let mut services_by_category: HashMap<Uuid, Vec<&Service>> = HashMap::new();
    for service in services {
        services_by_category
            .entry(service.category_id)
            .or_default()
            .push(service);
    }

    let mut products_by_service: HashMap<Uuid, Vec<&Product>> = HashMap::new();
    for product in products {
        products_by_service
            .entry(product.service_id)
            .or_default()
            .push(product);
    }

    categories
        .iter()
        .map(|category| {
            let services = services_by_category
                .get(&category.id)
                .map(|list| {
                    list.iter()
                        .map(|service| {
                            let products = products_by_service
                                .get(&service.id)
                                .map(Vec::as_slice)
                                .unwrap_or_default();
                            service_view(service, products)
                        })
                        .collect()
                })
                .unwrap_or_default();

            CategoryView {
                id: category.id,
                category: category.name.clone(),
                category_slug: category.slug.clone(),
                image: category.image.clone(),
                services,
            }
        })
        .collect()
}

/// Compose one service entry from its products.
pub fn service_view(service: &Service, products: &[&Product]) -> ServiceView {
    let mut view = ServiceView {
        id: service.id,
        title: service.name.clone(),
        slug: service.slug.clone(),
        image: service.image.clone(),
        description: service.description.clone(),
        subcategories: products.iter().map(|p| SubcategoryView::from(*p)).collect(),
        original_price: None,
        discounted_price: None,
        features: None,
    };

    match products {
        [] => {}
        [only] => {
            view.id = only.id;
            view.original_price = only.original_price;
            view.discounted_price = only.discounted_price;
            view.features = Some(only.features.clone());
            if view.image.as_deref().is_none_or(str::is_empty) && !only.image.is_empty() {
                view.image = Some(only.image.clone());
            }
        }
        many => {
            view.discounted_price = many
                .iter()
                .map(|p| p.discounted_price.unwrap_or(Decimal::ZERO))
                .min();
        }
    }

    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn category(name: &str) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: name.to_lowercase(),
            image: None,
            created_at: Utc::now(),
        }
    }

    fn service(category: &Category, name: &str, image: Option<&str>) -> Service {
        Service {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: name.to_lowercase(),
            category_id: category.id,
            image: image.map(Into::into),
            description: None,
            created_at: Utc::now(),
        }
    }

    fn product(service: &Service, name: &str, original: Decimal, discounted: Option<Decimal>) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            slug: name.to_lowercase(),
            service_id: service.id,
            image: format!("https://img.example/{name}.png"),
            video: None,
            gallery: vec![],
            description: None,
            features: vec![format!("{name} feature")],
            original_price: Some(original),
            discounted_price: discounted,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn single_product_service_takes_product_identity_and_prices() {
        let cat = category("Printing");
        let srv = service(&cat, "Letterheads", None);
        let only = product(&srv, "Standard", dec!(400), Some(dec!(300)));

        let catalog = build_catalog(&[cat], &[srv.clone()], &[only.clone()]);
        let view = &catalog[0].services[0];

        assert_eq!(view.id, only.id);
        assert_eq!(view.original_price, Some(dec!(400)));
        assert_eq!(view.discounted_price, Some(dec!(300)));
        assert_eq!(view.features.as_deref(), Some(only.features.as_slice()));
        assert_eq!(view.image.as_deref(), Some(only.image.as_str()));
        assert_eq!(view.title, srv.name);
        assert_eq!(view.subcategories.len(), 1);
    }

    #[test]
    fn single_product_keeps_service_image_when_present() {
        let cat = category("Printing");
        let srv = service(&cat, "Envelopes", Some("https://img.example/service.png"));
        let only = product(&srv, "Plain", dec!(250), Some(dec!(180)));

        let view = service_view(&srv, &[&only]);
        assert_eq!(view.image.as_deref(), Some("https://img.example/service.png"));
    }

    #[test]
    fn multi_product_service_advertises_minimum_discounted_price() {
        let cat = category("Printing");
        let srv = service(&cat, "Visiting Cards", None);
        let a = product(&srv, "Business", dec!(500), Some(dec!(350)));
        let b = product(&srv, "Luxury", dec!(800), Some(dec!(650)));
        let c = product(&srv, "Personalized", dec!(600), Some(dec!(450)));

        let view = service_view(&srv, &[&a, &b, &c]);
        assert_eq!(view.id, srv.id);
        assert_eq!(view.discounted_price, Some(dec!(350)));
        assert_eq!(view.original_price, None);
        assert!(view.features.is_none());
        assert_eq!(view.subcategories.len(), 3);
        assert!(view.image.is_none());
    }

    #[test]
    fn missing_discounted_price_counts_as_zero_in_minimum() {
        let cat = category("Gifts");
        let srv = service(&cat, "Mugs", None);
        let a = product(&srv, "Magic", dec!(500), Some(dec!(350)));
        let b = product(&srv, "Plain", dec!(300), None);

        let view = service_view(&srv, &[&a, &b]);
        assert_eq!(view.discounted_price, Some(Decimal::ZERO));
    }

    #[test]
    fn empty_levels_are_tolerated() {
        let empty_cat = category("Empty");
        let cat = category("Apparel");
        let srv = service(&cat, "Caps", None);

        let catalog = build_catalog(&[empty_cat.clone(), cat], &[srv.clone()], &[]);
        assert_eq!(catalog.len(), 2);
        assert!(catalog[0].services.is_empty());

        let view = &catalog[1].services[0];
        assert_eq!(view.id, srv.id);
        assert!(view.subcategories.is_empty());
        assert!(view.discounted_price.is_none());
        assert!(view.original_price.is_none());
    }

    #[test]
    fn services_are_grouped_under_their_own_category() {
        let apparel = category("Apparel");
        let gifts = category("Gifts");
        let caps = service(&apparel, "Caps", None);
        let mugs = service(&gifts, "Mugs", None);

        let catalog = build_catalog(&[apparel, gifts], &[caps.clone(), mugs.clone()], &[]);
        assert_eq!(catalog[0].services.len(), 1);
        assert_eq!(catalog[0].services[0].slug, caps.slug);
        assert_eq!(catalog[1].services[0].slug, mugs.slug);
    }
}
