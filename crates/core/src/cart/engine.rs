//! Cart engine

use jiff::Timestamp;
use tracing::{debug, warn};

use crate::{
    cart::{CartError, CartLineItem, CartState, CartView},
    products::{Product, ProductId},
    storage::{ClientStore, StorageKey},
};

/// Result of a quantity update.
///
/// None of these are errors: the cart screen shows a message and carries on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    /// The line now has the requested quantity.
    Updated,

    /// The requested quantity was below one; nothing changed.
    BelowFloor,

    /// There is no live cart to update.
    CartMissing,

    /// The cart has no line for the product.
    LineMissing,
}

/// Cart operations over an injected client store.
#[derive(Debug)]
pub struct CartEngine<S: ClientStore> {
    store: S,
}

impl<S: ClientStore> CartEngine<S> {
    /// Create an engine over `store`.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store.
    pub fn into_inner(self) -> S {
        self.store
    }

    /// Add one unit of `product` to the cart.
    ///
    /// A missing or expired cart is recreated with a fresh expiry. An existing
    /// cart keeps its expiry.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if storage or serialisation fails.
    pub fn add_item(&mut self, product: &Product, now: Timestamp) -> Result<CartState, CartError> {
        let mut cart = match self.load_live(now)? {
            Some(cart) => cart,
            None => CartState::fresh(now)?,
        };

        let existing = cart
            .items
            .iter_mut()
            .find(|line| line.product_id == product.product_id);

        if let Some(line) = existing {
            line.quantity = line.quantity.saturating_add(1);
        } else {
            cart.items.push(CartLineItem {
                product_id: product.product_id,
                product_name: product.product_name.clone(),
                image: product.first_image().to_string(),
                quantity: 1,
            });
        }

        self.save(&cart)?;

        debug!(product_id = %product.product_id, "added product to cart");

        Ok(cart)
    }

    /// Overwrite the quantity of the line for `product_id`.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if storage or serialisation fails.
    pub fn update_quantity(
        &mut self,
        product_id: ProductId,
        quantity: u32,
        now: Timestamp,
    ) -> Result<QuantityUpdate, CartError> {
        if quantity < 1 {
            return Ok(QuantityUpdate::BelowFloor);
        }

        let Some(mut cart) = self.load_live(now)? else {
            warn!(%product_id, "quantity update without a cart");

            return Ok(QuantityUpdate::CartMissing);
        };

        let Some(line) = cart
            .items
            .iter_mut()
            .find(|line| line.product_id == product_id)
        else {
            return Ok(QuantityUpdate::LineMissing);
        };

        line.quantity = quantity;

        self.save(&cart)?;

        Ok(QuantityUpdate::Updated)
    }

    /// Remove every line for `product_id`, returning whether any was removed.
    ///
    /// The remaining lines are written back even when none are left.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if storage or serialisation fails.
    pub fn remove_item(&mut self, product_id: ProductId, now: Timestamp) -> Result<bool, CartError> {
        let Some(mut cart) = self.load_live(now)? else {
            return Ok(false);
        };

        let before = cart.items.len();

        cart.items.retain(|line| line.product_id != product_id);

        let removed = cart.items.len() != before;

        self.save(&cart)?;

        Ok(removed)
    }

    /// Read the cart, clearing it from storage if it has expired.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if storage fails.
    pub fn view(&mut self, now: Timestamp) -> Result<CartView, CartError> {
        Ok(self
            .load_live(now)?
            .map(CartView::of)
            .unwrap_or_default())
    }

    /// Remove the cart from storage.
    ///
    /// # Errors
    ///
    /// Returns a `CartError` if storage fails.
    pub fn clear(&mut self) -> Result<(), CartError> {
        self.store.remove(StorageKey::Cart)?;

        Ok(())
    }

    fn load_live(&mut self, now: Timestamp) -> Result<Option<CartState>, CartError> {
        let Some(raw) = self.store.get(StorageKey::Cart)? else {
            return Ok(None);
        };

        let cart = match serde_json::from_str::<CartState>(&raw) {
            Ok(cart) => cart,
            Err(error) => {
                warn!(%error, "discarding unreadable cart");
                self.store.remove(StorageKey::Cart)?;

                return Ok(None);
            }
        };

        if cart.is_expired(now) {
            debug!(expires = %cart.expires, "cart expired");
            self.store.remove(StorageKey::Cart)?;

            return Ok(None);
        }

        Ok(Some(cart))
    }

    fn save(&mut self, cart: &CartState) -> Result<(), CartError> {
        let raw = serde_json::to_string(cart).map_err(CartError::Serialize)?;

        self.store.set(StorageKey::Cart, raw)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use crate::{cart::CART_TTL, storage::MemoryStore};

    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap_or(Timestamp::UNIX_EPOCH)
    }

    fn panel() -> Product {
        Product::new(7, "Panel X", "a.jpg,b.jpg")
    }

    fn stored(engine: &CartEngine<MemoryStore>) -> TestResult<Option<CartState>> {
        let raw = engine.store().get(StorageKey::Cart)?;

        Ok(raw.map(|raw| serde_json::from_str(&raw)).transpose()?)
    }

    #[test]
    fn add_item_to_empty_storage_creates_cart() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());

        engine.add_item(&panel(), now())?;

        let cart = stored(&engine)?.ok_or("cart not stored")?;

        assert_eq!(
            cart.items,
            vec![CartLineItem {
                product_id: ProductId(7),
                product_name: "Panel X".to_string(),
                image: "a.jpg".to_string(),
                quantity: 1,
            }]
        );
        assert_eq!(cart.expires, now().checked_add(CART_TTL)?);

        Ok(())
    }

    #[test]
    fn adding_same_product_increments_quantity() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());

        engine.add_item(&panel(), now())?;
        engine.add_item(&panel(), now())?;

        let cart = stored(&engine)?.ok_or("cart not stored")?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|line| line.quantity), Some(2));

        Ok(())
    }

    #[test]
    fn later_adds_do_not_extend_expiry() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());

        let first = engine.add_item(&panel(), now())?;
        let later = now().checked_add(SignedDuration::from_hours(48))?;
        let second = engine.add_item(&Product::new(8, "Battery", ""), later)?;

        assert_eq!(first.expires, second.expires);

        Ok(())
    }

    #[test]
    fn add_after_expiry_starts_fresh_cart() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        engine.add_item(&panel(), now())?;

        let much_later = now().checked_add(CART_TTL)?.checked_add(SignedDuration::from_secs(1))?;
        let cart = engine.add_item(&panel(), much_later)?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|line| line.quantity), Some(1));
        assert_eq!(cart.expires, much_later.checked_add(CART_TTL)?);

        Ok(())
    }

    #[test]
    fn view_of_expired_cart_is_empty_and_cleared() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        for id in 1..=5 {
            engine.add_item(&Product::new(id, format!("Product {id}"), ""), now())?;
        }

        let much_later = now().checked_add(CART_TTL)?.checked_add(SignedDuration::from_secs(1))?;
        let view = engine.view(much_later)?;

        assert!(view.is_empty());
        assert!(view.aggregate.is_empty());
        assert_eq!(view.expires, None);
        assert!(!engine.store().contains(StorageKey::Cart));

        Ok(())
    }

    #[test]
    fn quantity_below_one_is_ignored() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        engine.add_item(&panel(), now())?;
        engine.add_item(&panel(), now())?;

        let outcome = engine.update_quantity(ProductId(7), 0, now())?;

        assert_eq!(outcome, QuantityUpdate::BelowFloor);
        assert_eq!(engine.view(now())?.lines.first().map(|l| l.quantity), Some(2));

        Ok(())
    }

    #[test]
    fn quantity_update_overwrites() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        engine.add_item(&panel(), now())?;

        let outcome = engine.update_quantity(ProductId(7), 12, now())?;

        assert_eq!(outcome, QuantityUpdate::Updated);
        assert_eq!(engine.view(now())?.lines.first().map(|l| l.quantity), Some(12));

        Ok(())
    }

    #[test]
    fn quantity_update_without_cart_flags_missing() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());

        let outcome = engine.update_quantity(ProductId(7), 3, now())?;

        assert_eq!(outcome, QuantityUpdate::CartMissing);
        assert!(!engine.store().contains(StorageKey::Cart));

        Ok(())
    }

    #[test]
    fn quantity_update_for_unknown_line() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        engine.add_item(&panel(), now())?;

        let outcome = engine.update_quantity(ProductId(99), 3, now())?;

        assert_eq!(outcome, QuantityUpdate::LineMissing);

        Ok(())
    }

    #[test]
    fn removing_last_item_keeps_empty_cart() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        engine.add_item(&panel(), now())?;

        assert!(engine.remove_item(ProductId(7), now())?);

        let cart = stored(&engine)?.ok_or("cart should persist when empty")?;
        assert!(cart.items.is_empty());

        let view = engine.view(now())?;
        assert!(view.is_empty());
        assert!(view.expires.is_some());

        Ok(())
    }

    #[test]
    fn remove_without_cart_is_noop() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());

        assert!(!engine.remove_item(ProductId(7), now())?);
        assert!(!engine.store().contains(StorageKey::Cart));

        Ok(())
    }

    #[test]
    fn view_aggregates_duplicate_raw_lines() -> TestResult {
        let mut store = MemoryStore::new();
        let expires = now().checked_add(CART_TTL)?.as_millisecond();
        store.set(
            StorageKey::Cart,
            format!(
                r#"{{"items":[
                    {{"productId":7,"productName":"Panel X","image":"a.jpg","quantity":1}},
                    {{"productId":7,"productName":"Panel X","image":"a.jpg","quantity":4}}
                ],"expires":{expires}}}"#
            ),
        )?;
        let mut engine = CartEngine::new(store);

        let view = engine.view(now())?;

        assert_eq!(view.lines.len(), 2);
        assert_eq!(view.aggregate.len(), 1);
        assert_eq!(view.aggregate.first().map(|l| l.quantity), Some(5));

        Ok(())
    }

    #[test]
    fn unreadable_cart_is_discarded() -> TestResult {
        let mut store = MemoryStore::new();
        store.set(StorageKey::Cart, "[oops".to_string())?;
        let mut engine = CartEngine::new(store);

        assert!(engine.view(now())?.is_empty());
        assert!(!engine.store().contains(StorageKey::Cart));

        Ok(())
    }

    #[test]
    fn clear_removes_cart() -> TestResult {
        let mut engine = CartEngine::new(MemoryStore::new());
        engine.add_item(&panel(), now())?;

        engine.clear()?;

        assert!(!engine.store().contains(StorageKey::Cart));

        Ok(())
    }
}
