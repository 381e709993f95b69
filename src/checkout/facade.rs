use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    cart::{self, CartError, CartLineItem, CartStore, NewCartItem},
    money::format_price,
    orders::{OrderGateway, OrderPayload, OrderRecord},
    persistence::{PersistError, SnapshotStore},
};

use super::{CheckoutError, CheckoutStore};

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct FormattedPrices {
    pub subtotal: String,
    pub total: String,
    pub final_total: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct OrderSummary {
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    /// Number of distinct lines, not units.
    pub item_count: usize,
}

/// One shopper's cart and checkout, with derived totals and order submission.
pub struct CartSession {
    pub cart: CartStore,
    pub checkout: CheckoutStore,
}

impl CartSession {
    pub fn open(snapshots: Arc<dyn SnapshotStore>) -> Result<Self, PersistError> {
        Ok(Self {
            cart: CartStore::open(snapshots.clone())?,
            checkout: CheckoutStore::open(snapshots)?,
        })
    }

    pub fn add_to_cart(&mut self, item: NewCartItem) -> Result<&CartLineItem, CartError> {
        if !item.in_stock {
            tracing::debug!(product_id = item.product_id, "refusing out-of-stock item");
            return Err(CartError::OutOfStock);
        }
        self.cart.add_item(item)
    }

    pub fn total_items(&self) -> u32 {
        cart::total_items(self.cart.items())
    }

    pub fn subtotal(&self) -> Decimal {
        cart::subtotal(self.cart.items())
    }

    /// Same as the subtotal until tax or shipping is folded in here.
    pub fn total(&self) -> Decimal {
        self.subtotal()
    }

    pub fn final_total(&self) -> Decimal {
        let checkout = self.checkout.state();
        self.subtotal()
            .saturating_add(checkout.shipping_cost)
            .saturating_sub(checkout.discount_amount)
    }

    pub fn formatted_prices(&self) -> FormattedPrices {
        FormattedPrices {
            subtotal: format_price(self.subtotal()),
            total: format_price(self.total()),
            final_total: format_price(self.final_total()),
        }
    }

    /// Mirrors `final_total` plus a tax term that is always zero for now.
    pub fn order_summary(&self) -> OrderSummary {
        let checkout = self.checkout.state();
        let subtotal = self.subtotal();
        let tax = Decimal::ZERO;
        OrderSummary {
            subtotal,
            shipping: checkout.shipping_cost,
            discount: checkout.discount_amount,
            tax,
            total: subtotal
                .saturating_add(checkout.shipping_cost)
                .saturating_add(tax)
                .saturating_sub(checkout.discount_amount),
            item_count: self.cart.items().len(),
        }
    }

    /// Validate, submit, then clear the cart and reset checkout.
    ///
    /// Preconditions are checked in order: address, payment method, non-empty cart.
    /// Nothing is cleared when submission fails.
    pub async fn complete_order(
        &mut self,
        orders: &dyn OrderGateway,
    ) -> Result<OrderRecord, CheckoutError> {
        let payload = self.order_payload()?;

        let record = orders.create_order(&payload).await.map_err(|err| {
            tracing::error!(error = %err, "order creation failed");
            CheckoutError::OrderCreation(err)
        })?;

        tracing::info!(order_id = %record.id, total = %record.order.total, "order created");
        self.cart.clear();
        self.checkout.reset();
        Ok(record)
    }

    fn order_payload(&self) -> Result<OrderPayload, CheckoutError> {
        let checkout = self.checkout.state();
        let shipping_address = checkout
            .shipping_address
            .clone()
            .ok_or(CheckoutError::ShippingAddressRequired)?;
        let payment_method = checkout
            .payment_method
            .ok_or(CheckoutError::PaymentMethodRequired)?;
        if self.cart.items().is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(OrderPayload {
            items: self.cart.items().to_vec(),
            shipping_address,
            payment_method,
            subtotal: self.subtotal(),
            shipping_cost: checkout.shipping_cost,
            discount_amount: checkout.discount_amount,
            promo_code: checkout.promo_code.clone(),
            total: self.final_total(),
        })
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use uuid::Uuid;

    use super::*;
    use crate::{
        checkout::{CheckoutState, PaymentMethod, ShippingAddress},
        orders::{MemoryOrders, OrderError},
        persistence::MemorySnapshots,
    };

    struct RejectingOrders;

    #[async_trait]
    impl OrderGateway for RejectingOrders {
        async fn create_order(&self, _: &OrderPayload) -> Result<OrderRecord, OrderError> {
            Err(OrderError::Rejected("service unavailable".into()))
        }

        async fn order(&self, _: Uuid) -> Result<Option<OrderRecord>, OrderError> {
            Ok(None)
        }
    }

    fn session() -> CartSession {
        CartSession::open(Arc::new(MemorySnapshots::new())).expect("open")
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            full_name: "Ada Lovelace".into(),
            phone: "+44 20 0000 0000".into(),
            street: "12 St James's Square".into(),
            city: "London".into(),
            state: "London".into(),
            country: "UK".into(),
            postal_code: "SW1Y 4JH".into(),
        }
    }

    fn sneaker(in_stock: bool) -> NewCartItem {
        NewCartItem {
            product_id: 3,
            name: "Court Sneaker".into(),
            price: Decimal::from(150),
            discounted_price: Some(Decimal::from(100)),
            image: "/placeholder.png".into(),
            color: Some("white".into()),
            color_hex: Some("#ffffff".into()),
            size: Some("42".into()),
            quantity: Some(2),
            in_stock,
        }
    }

    #[test]
    fn out_of_stock_is_rejected_before_mutation() {
        let mut session = session();
        let err = session.add_to_cart(sneaker(false)).unwrap_err();
        assert_eq!(err, CartError::OutOfStock);
        assert!(session.cart.items().is_empty());
    }

    #[test]
    fn final_total_and_summary_agree_while_tax_is_zero() {
        let mut session = session();
        session.add_to_cart(sneaker(true)).expect("in stock");
        session.checkout.set_shipping_cost(Decimal::from(5));
        session.checkout.apply_promo_code("SAVE20").expect("valid code");

        assert_eq!(session.subtotal(), Decimal::from(200));
        assert_eq!(session.total(), Decimal::from(200));
        assert_eq!(session.final_total(), Decimal::from(185));

        let summary = session.order_summary();
        assert_eq!(summary.total, session.final_total());
        assert_eq!(summary.tax, Decimal::ZERO);
        assert_eq!(summary.item_count, 1);

        let prices = session.formatted_prices();
        assert_eq!(prices.subtotal, "$200.00");
        assert_eq!(prices.final_total, "$185.00");
    }

    #[tokio::test]
    async fn missing_address_wins_over_everything_else() {
        let orders = MemoryOrders::new();
        let mut empty = session();
        let mut session = session();
        session.checkout.set_payment_method(PaymentMethod::Card);
        session.add_to_cart(sneaker(true)).expect("in stock");

        let err = session.complete_order(&orders).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ShippingAddressRequired));

        let err = empty.complete_order(&orders).await.unwrap_err();
        assert!(matches!(err, CheckoutError::ShippingAddressRequired));
    }

    #[tokio::test]
    async fn payment_then_empty_cart_preconditions() {
        let orders = MemoryOrders::new();
        let mut session = session();
        session.checkout.set_shipping_address(address());

        let err = session.complete_order(&orders).await.unwrap_err();
        assert!(matches!(err, CheckoutError::PaymentMethodRequired));

        session.checkout.set_payment_method(PaymentMethod::BankTransfer);
        let err = session.complete_order(&orders).await.unwrap_err();
        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(orders.is_empty());
    }

    #[tokio::test]
    async fn successful_order_resets_everything() {
        let orders = MemoryOrders::new();
        let mut session = session();
        session.add_to_cart(sneaker(true)).expect("in stock");
        session.checkout.set_shipping_address(address());
        session.checkout.set_payment_method(PaymentMethod::Card);
        session.checkout.apply_promo_code("SAVE10").expect("valid code");

        let record = session.complete_order(&orders).await.expect("order");
        assert_eq!(record.order.total, Decimal::from(190));
        assert_eq!(record.order.promo_code.as_deref(), Some("SAVE10"));
        assert_eq!(record.order.items.len(), 1);
        assert_eq!(orders.len(), 1);

        assert!(session.cart.items().is_empty());
        assert_eq!(session.checkout.state(), &CheckoutState::default());
    }

    #[tokio::test]
    async fn failed_submission_keeps_cart_and_checkout() {
        let mut session = session();
        session.add_to_cart(sneaker(true)).expect("in stock");
        session.checkout.set_shipping_address(address());
        session.checkout.set_payment_method(PaymentMethod::Paypal);

        let err = session.complete_order(&RejectingOrders).await.unwrap_err();
        assert!(matches!(err, CheckoutError::OrderCreation(_)));
        assert_eq!(session.cart.items().len(), 1);
        assert!(session.checkout.state().shipping_address.is_some());
    }
}
