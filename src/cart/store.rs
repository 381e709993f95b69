use std::sync::Arc;

use rust_decimal::Decimal;

use crate::persistence::{PersistError, SnapshotStore};

use super::{
    CartError, CartLineItem, CartState, MAX_LINE_QUANTITY, NewCartItem, line_id, max_unit_price,
};

/// Cart line items plus the drawer visibility flag.
///
/// Every mutation writes the full snapshot through the persistence port.
pub struct CartStore {
    state: CartState,
    snapshots: Arc<dyn SnapshotStore>,
}

impl CartStore {
    pub const STORE_NAME: &'static str = "shopping-cart";

    /// Read the persisted snapshot once. A snapshot that no longer decodes
    /// is discarded in favor of an empty cart.
    pub fn open(snapshots: Arc<dyn SnapshotStore>) -> Result<Self, PersistError> {
        let state = match snapshots.load(Self::STORE_NAME)? {
            Some(value) => serde_json::from_value(value).unwrap_or_else(|err| {
                tracing::warn!(error = %err, "discarding unreadable cart snapshot");
                CartState::default()
            }),
            None => CartState::default(),
        };
        Ok(Self { state, snapshots })
    }

    pub fn state(&self) -> &CartState {
        &self.state
    }

    pub fn items(&self) -> &[CartLineItem] {
        &self.state.items
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open
    }

    /// Merge into the line with the same composite key, or append a new one.
    ///
    /// A merge that would push the line past `MAX_LINE_QUANTITY` is rejected
    /// and leaves the cart unchanged.
    pub fn add_item(&mut self, item: NewCartItem) -> Result<&CartLineItem, CartError> {
        if item.price < Decimal::ZERO || item.price > max_unit_price() {
            return Err(CartError::InvalidPrice);
        }
        if item
            .discounted_price
            .is_some_and(|price| price < Decimal::ZERO || price > max_unit_price())
        {
            return Err(CartError::InvalidPrice);
        }
        let id = item.line_id();
        let quantity = item.requested_quantity();
        let limit = CartError::QuantityLimit {
            max: MAX_LINE_QUANTITY,
        };

        let index = match self.state.items.iter().position(|line| line.id == id) {
            Some(index) => {
                let line = &mut self.state.items[index];
                line.quantity = line
                    .quantity
                    .checked_add(quantity)
                    .filter(|total| *total <= MAX_LINE_QUANTITY)
                    .ok_or(limit)?;
                index
            }
            None if quantity > MAX_LINE_QUANTITY => return Err(limit),
            None => {
                self.state.items.push(item.into_line());
                self.state.items.len() - 1
            }
        };
        tracing::debug!(line_id = %id, quantity, "item added to cart");
        self.persist();
        Ok(&self.state.items[index])
    }

    pub fn remove_item(&mut self, line_id: &str) {
        let before = self.state.items.len();
        self.state.items.retain(|line| line.id != line_id);
        if self.state.items.len() != before {
            tracing::debug!(line_id, "item removed from cart");
        }
        self.persist();
    }

    /// Absolute set. Zero or negative removes the line.
    pub fn update_quantity(&mut self, line_id: &str, quantity: i64) -> Result<(), CartError> {
        if quantity <= 0 {
            self.remove_item(line_id);
            return Ok(());
        }
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| *q <= MAX_LINE_QUANTITY)
            .ok_or(CartError::QuantityLimit {
                max: MAX_LINE_QUANTITY,
            })?;
        if let Some(line) = self.state.items.iter_mut().find(|line| line.id == line_id) {
            line.quantity = quantity;
        }
        self.persist();
        Ok(())
    }

    pub fn clear(&mut self) {
        self.state.items.clear();
        tracing::debug!("cart cleared");
        self.persist();
    }

    pub fn toggle(&mut self) -> bool {
        self.state.is_open = !self.state.is_open;
        self.persist();
        self.state.is_open
    }

    pub fn has_item(&self, product_id: i64, color: Option<&str>, size: Option<&str>) -> bool {
        let id = line_id(product_id, color, size);
        self.state.items.iter().any(|line| line.id == id)
    }

    pub fn get_item_by_id(&self, line_id: &str) -> Option<&CartLineItem> {
        self.state.items.iter().find(|line| line.id == line_id)
    }

    /// Replace all lines at once, used after refreshing them from the catalog.
    pub fn replace_items(&mut self, items: Vec<CartLineItem>) {
        self.state.items = items;
        self.persist();
    }

    fn persist(&self) {
        let result = serde_json::to_value(&self.state)
            .map_err(PersistError::from)
            .and_then(|snapshot| self.snapshots.save(Self::STORE_NAME, &snapshot));
        if let Err(err) = result {
            tracing::warn!(error = %err, "cart snapshot write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemorySnapshots;

    fn new_item(product_id: i64, color: Option<&str>, size: Option<&str>) -> NewCartItem {
        NewCartItem {
            product_id,
            name: "Trail Runner".into(),
            price: Decimal::from(120),
            discounted_price: None,
            image: "/placeholder.png".into(),
            color: color.map(str::to_string),
            color_hex: None,
            size: size.map(str::to_string),
            quantity: None,
            in_stock: true,
        }
    }

    fn store() -> (CartStore, Arc<dyn SnapshotStore>) {
        let snapshots: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshots::new());
        (CartStore::open(snapshots.clone()).expect("open"), snapshots)
    }

    #[test]
    fn repeated_adds_merge_into_one_line() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, Some("red"), Some("M"))).expect("add");
        cart.add_item(NewCartItem {
            quantity: Some(3),
            ..new_item(1, Some("red"), Some("M"))
        })
        .expect("add");
        cart.add_item(new_item(1, Some("red"), Some("M"))).expect("add");

        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
        assert_eq!(cart.items()[0].id, "1-red-M");
    }

    #[test]
    fn different_variants_get_separate_lines_in_insertion_order() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, Some("red"), None)).expect("add");
        cart.add_item(new_item(1, Some("blue"), None)).expect("add");
        cart.add_item(new_item(2, None, None)).expect("add");

        let ids: Vec<_> = cart.items().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["1-red-default", "1-blue-default", "2-default-default"]);
        assert!(cart.has_item(1, Some("blue"), None));
        assert!(!cart.has_item(1, Some("green"), None));
    }

    #[test]
    fn zero_or_negative_quantity_removes_line() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, None, None)).expect("add");
        cart.add_item(new_item(2, None, None)).expect("add");

        cart.update_quantity("1-default-default", 0).expect("update");
        cart.update_quantity("2-default-default", -4).expect("update");

        assert!(cart.items().is_empty());
    }

    #[test]
    fn update_quantity_sets_absolute_value() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, None, None)).expect("add");
        cart.update_quantity("1-default-default", 7).expect("update");
        cart.update_quantity("missing", 3).expect("update");

        assert_eq!(cart.get_item_by_id("1-default-default").map(|l| l.quantity), Some(7));
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn merge_past_the_line_limit_is_rejected() {
        let (mut cart, snapshots) = store();
        cart.add_item(NewCartItem {
            quantity: Some(MAX_LINE_QUANTITY),
            ..new_item(1, None, None)
        })
        .expect("add");

        let err = cart.add_item(new_item(1, None, None)).unwrap_err();
        assert_eq!(err, CartError::QuantityLimit { max: MAX_LINE_QUANTITY });
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);

        let reopened = CartStore::open(snapshots).expect("reopen");
        assert_eq!(reopened.items()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn huge_requested_quantity_does_not_overflow() {
        let (mut cart, _) = store();
        let err = cart
            .add_item(NewCartItem {
                quantity: Some(u32::MAX),
                ..new_item(1, None, None)
            })
            .unwrap_err();
        assert_eq!(err, CartError::QuantityLimit { max: MAX_LINE_QUANTITY });
        assert!(cart.items().is_empty());

        cart.add_item(new_item(1, None, None)).expect("add");
        assert!(cart
            .add_item(NewCartItem {
                quantity: Some(u32::MAX),
                ..new_item(1, None, None)
            })
            .is_err());
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn update_past_the_line_limit_is_rejected() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, None, None)).expect("add");

        assert!(cart.update_quantity("1-default-default", i64::from(MAX_LINE_QUANTITY) + 1).is_err());
        assert!(cart.update_quantity("1-default-default", i64::MAX).is_err());
        assert_eq!(cart.items()[0].quantity, 1);

        cart.update_quantity("1-default-default", i64::from(MAX_LINE_QUANTITY))
            .expect("update");
        assert_eq!(cart.items()[0].quantity, MAX_LINE_QUANTITY);
    }

    #[test]
    fn out_of_range_prices_are_rejected() {
        let (mut cart, _) = store();
        let too_big = NewCartItem {
            price: Decimal::MAX,
            ..new_item(1, None, None)
        };
        let negative_sale = NewCartItem {
            discounted_price: Some(Decimal::from(-1)),
            ..new_item(2, None, None)
        };

        assert_eq!(cart.add_item(too_big).unwrap_err(), CartError::InvalidPrice);
        assert_eq!(cart.add_item(negative_sale).unwrap_err(), CartError::InvalidPrice);
        assert!(cart.items().is_empty());
    }

    #[test]
    fn removing_unknown_line_is_a_noop() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, None, None)).expect("add");
        cart.remove_item("nope");
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn toggle_only_flips_visibility() {
        let (mut cart, _) = store();
        cart.add_item(new_item(1, None, None)).expect("add");
        assert!(cart.toggle());
        assert!(!cart.toggle());
        assert_eq!(cart.items().len(), 1);
    }

    #[test]
    fn state_survives_reopen() {
        let (mut cart, snapshots) = store();
        cart.add_item(new_item(9, Some("black"), Some("42"))).expect("add");
        cart.toggle();

        let reopened = CartStore::open(snapshots).expect("reopen");
        assert_eq!(reopened.items(), cart.items());
        assert!(reopened.is_open());
    }

    #[test]
    fn unreadable_snapshot_starts_empty() {
        let snapshots: Arc<dyn SnapshotStore> = Arc::new(MemorySnapshots::new());
        snapshots
            .save(CartStore::STORE_NAME, &serde_json::json!({ "items": "garbage" }))
            .expect("save");

        let cart = CartStore::open(snapshots).expect("open");
        assert!(cart.items().is_empty());
    }
}
