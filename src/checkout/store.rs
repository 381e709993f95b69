use std::sync::Arc;

use rust_decimal::Decimal;

use crate::persistence::{PersistError, SnapshotStore};

use super::{
    CheckoutError, CheckoutState, PaymentMethod, ShippingAddress,
    model::{FREE_SHIPPING_CODE, promo_discount},
};

/// Shipping, payment and promo selections for the order in progress.
pub struct CheckoutStore {
    state: CheckoutState,
    snapshots: Arc<dyn SnapshotStore>,
}

impl CheckoutStore {
    pub const STORE_NAME: &'static str = "checkout-data";

    pub fn open(snapshots: Arc<dyn SnapshotStore>) -> Result<Self, PersistError> {
        let state = match snapshots.load(Self::STORE_NAME)? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding unreadable checkout snapshot");
                CheckoutState::default()
            }),
            None => CheckoutState::default(),
        };
        Ok(Self { state, snapshots })
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn set_shipping_address(&mut self, address: ShippingAddress) {
        self.state.shipping_address = Some(address);
        self.persist();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.state.payment_method = Some(method);
        self.persist();
    }

    pub fn set_shipping_cost(&mut self, cost: Decimal) {
        self.state.shipping_cost = cost;
        self.persist();
    }

    /// Unknown codes leave the state untouched.
    pub fn apply_promo_code(&mut self, code: &str) -> Result<(), CheckoutError> {
        let Some(discount) = promo_discount(code) else {
            tracing::debug!(code, "rejected promo code");
            return Err(CheckoutError::InvalidPromoCode);
        };
        let code = code.trim().to_uppercase();
        if code == FREE_SHIPPING_CODE {
            self.state.shipping_cost = Decimal::ZERO;
        }
        self.state.discount_amount = discount;
        tracing::info!(code = %code, %discount, "promo code applied");
        self.state.promo_code = Some(code);
        self.persist();
        Ok(())
    }

    /// Shipping cost is not restored.
    pub fn remove_promo_code(&mut self) {
        self.state.promo_code = None;
        self.state.discount_amount = Decimal::ZERO;
        self.persist();
    }

    pub fn reset(&mut self) {
        self.state = CheckoutState::default();
        tracing::debug!("checkout state reset");
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_value(&self.state)
            .map_err(PersistError::from)
            .and_then(|snapshot| self.snapshots.save(Self::STORE_NAME, &snapshot));
        if let Err(err) = result {
            tracing::warn!(error = %err, "checkout snapshot write failed");
        }
    }
}
