use rust_decimal::Decimal;

/// Price actually charged: the discounted price when it is a positive
/// amount, otherwise the base price.
pub fn effective_price(price: Decimal, discounted_price: Option<Decimal>) -> Decimal {
    match discounted_price {
        Some(discounted) if discounted > Decimal::ZERO => discounted,
        _ => price,
    }
}

/// Whether a discounted price marks the product as on sale.
pub fn is_on_sale(discounted_price: Option<Decimal>) -> bool {
    discounted_price.is_some_and(|d| d > Decimal::ZERO)
}

/// Render an amount as `$12.30`.
pub fn format_price(amount: Decimal) -> String {
    format!("${:.2}", amount.round_dp(2))
}

/// Parse a string-encoded price bound. Blank or malformed input means "unset".
pub fn parse_bound(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<Decimal>().ok()
}
