//! Cart → order pricing.

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Orders whose subtotal is strictly above this amount get [`DISCOUNT_RATE`] off.
pub const DISCOUNT_THRESHOLD: Decimal = dec!(999);
pub const DISCOUNT_RATE: Decimal = dec!(0.12);

#[derive(Debug, Clone)]
pub struct PricedProduct {
    pub id: Uuid,
    pub name: String,
    pub original_price: Option<Decimal>,
    pub discounted_price: Option<Decimal>,
}

impl PricedProduct {
    /// Discounted price unless missing or zero, then original price, then zero.
    pub fn unit_price(&self) -> Decimal {
        self.discounted_price
            .filter(|price| !price.is_zero())
            .or(self.original_price)
            .unwrap_or(Decimal::ZERO)
    }
}

#[derive(Debug, Clone)]
pub struct CheckoutLine {
    /// `None` when the product was deleted after being added to the cart.
    pub product: Option<PricedProduct>,
    pub quantity: i32,
    pub logo_url: Option<String>,
    pub video_url: Option<String>,
    pub customization_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub logo_url: Option<String>,
    pub video_url: Option<String>,
    pub customization_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PricedOrder {
    pub lines: Vec<PricedLine>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

pub fn discount_for(subtotal: Decimal) -> Decimal {
    if subtotal > DISCOUNT_THRESHOLD {
        (subtotal * DISCOUNT_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    } else {
        Decimal::ZERO
    }
}

/// Snapshot every line with a live product; orphaned lines are dropped.
pub fn price_cart(lines: Vec<CheckoutLine>) -> PricedOrder {
    let lines: Vec<PricedLine> = lines
        .into_iter()
        .filter_map(|line| {
            let product = line.product?;
            Some(PricedLine {
                product_id: product.id,
                price: product.unit_price(),
                name: product.name,
                quantity: line.quantity,
                logo_url: line.logo_url,
                video_url: line.video_url,
                customization_note: line.customization_note,
            })
        })
        .collect();

    let subtotal: Decimal = lines
        .iter()
        .map(|line| line.price * Decimal::from(line.quantity))
        .sum();
    let discount = discount_for(subtotal);

    PricedOrder {
        lines,
        subtotal,
        discount,
        total: subtotal - discount,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(original: Option<Decimal>, discounted: Option<Decimal>, quantity: i32) -> CheckoutLine {
        CheckoutLine {
            product: Some(PricedProduct {
                id: Uuid::new_v4(),
                name: "Flyer".into(),
                original_price: original,
                discounted_price: discounted,
            }),
            quantity,
            logo_url: None,
            video_url: None,
            customization_note: None,
        }
    }

    #[test]
    fn subtotal_above_threshold_gets_twelve_percent_off() {
        let order = price_cart(vec![line(Some(dec!(600)), Some(dec!(500)), 2)]);
        assert_eq!(order.subtotal, dec!(1000));
        assert_eq!(order.discount, dec!(120));
        assert_eq!(order.total, dec!(880));
    }

    #[test]
    fn subtotal_at_threshold_is_not_discounted() {
        let order = price_cart(vec![line(None, Some(dec!(333)), 3)]);
        assert_eq!(order.subtotal, dec!(999));
        assert_eq!(order.total, dec!(999));
        assert_eq!(order.discount, Decimal::ZERO);
    }

    #[test]
    fn unit_price_falls_back_through_original_to_zero() {
        let zero_discount = line(Some(dec!(400)), Some(Decimal::ZERO), 1);
        let only_original = line(Some(dec!(250)), None, 1);
        let no_prices = line(None, None, 4);

        let order = price_cart(vec![zero_discount, only_original, no_prices]);
        let prices: Vec<Decimal> = order.lines.iter().map(|l| l.price).collect();
        assert_eq!(prices, vec![dec!(400), dec!(250), Decimal::ZERO]);
        assert_eq!(order.subtotal, dec!(650));
    }

    #[test]
    fn orphaned_lines_are_dropped_silently() {
        let mut orphan = line(Some(dec!(100)), None, 1);
        orphan.product = None;
        let order = price_cart(vec![orphan, line(Some(dec!(80)), Some(dec!(60)), 2)]);

        assert_eq!(order.lines.len(), 1);
        assert_eq!(order.total, dec!(120));
    }

    #[test]
    fn customization_is_carried_into_the_snapshot() {
        let mut custom = line(Some(dec!(200)), Some(dec!(150)), 1);
        custom.logo_url = Some("https://cdn.example/logo.png".into());
        custom.customization_note = Some("left chest".into());

        let order = price_cart(vec![custom]);
        assert_eq!(order.lines[0].logo_url.as_deref(), Some("https://cdn.example/logo.png"));
        assert_eq!(order.lines[0].customization_note.as_deref(), Some("left chest"));
        assert_eq!(order.lines[0].name, "Flyer");
    }

    #[test]
    fn fractional_discounts_round_to_cents() {
        assert_eq!(discount_for(dec!(1000.05)), dec!(120.01));
        assert_eq!(discount_for(dec!(1001)), dec!(120.12));
    }
}
