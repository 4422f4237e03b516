//! Cart and wishlist persisted in per-origin key/value storage.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lx_client::{Notice, Notifier};
use lx_storage::{KeyValueStore, save_json};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::price::{PriceInput, lenient_id, lenient_price};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: f64,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default, rename = "addedAt")]
    pub added_at: u64,
}

fn one() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WishlistItem {
    #[serde(deserialize_with = "lenient_id")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "addedAt")]
    pub added_at: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WishlistToggle {
    pub added: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartAdd {
    pub new_quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub cart: String,
    pub wishlist: String,
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self {
            cart: "cart".to_owned(),
            wishlist: "wishlist".to_owned(),
        }
    }
}

/// Read-through store: every operation re-reads storage so writes from other
/// tabs are observed. When storage fails the last in-memory copy is used for
/// the rest of the page load.
pub struct LocalCommerceStore<S: KeyValueStore> {
    storage: S,
    keys: StorageKeys,
    clock: Rc<dyn Clock>,
    notifier: Rc<dyn Notifier>,
    cart: RefCell<Vec<CartItem>>,
    wishlist: RefCell<Vec<WishlistItem>>,
    degraded: Cell<bool>,
}

impl<S: KeyValueStore> LocalCommerceStore<S> {
    pub fn new(storage: S, clock: Rc<dyn Clock>, notifier: Rc<dyn Notifier>) -> Self {
        Self::with_keys(storage, StorageKeys::default(), clock, notifier)
    }

    pub fn with_keys(
        storage: S,
        keys: StorageKeys,
        clock: Rc<dyn Clock>,
        notifier: Rc<dyn Notifier>,
    ) -> Self {
        Self {
            storage,
            keys,
            clock,
            notifier,
            cart: RefCell::new(Vec::new()),
            wishlist: RefCell::new(Vec::new()),
            degraded: Cell::new(false),
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded.get()
    }

    pub fn toggle_wishlist(&self, product_id: &str, product_name: &str) -> WishlistToggle {
        let mut items = self.read_wishlist();
        let added = match items.iter().position(|item| item.id == product_id) {
            Some(pos) => {
                items.remove(pos);
                false
            }
            None => {
                items.push(WishlistItem {
                    id: product_id.to_owned(),
                    name: product_name.to_owned(),
                    added_at: self.clock.now_ms(),
                });
                true
            }
        };
        self.write_wishlist(items);

        if added {
            self.notifier
                .notify(Notice::success(format!("Added {product_name} to wishlist")));
        } else {
            self.notifier
                .notify(Notice::info(format!("Removed {product_name} from wishlist")));
        }
        WishlistToggle { added }
    }

    pub fn add_to_cart<'a>(
        &self,
        product_id: &str,
        product_name: &str,
        unit_price: impl Into<PriceInput<'a>>,
    ) -> CartAdd {
        let mut items = self.read_cart();
        let new_quantity = match items.iter_mut().find(|item| item.id == product_id) {
            Some(item) => {
                item.quantity = item.quantity.saturating_add(1);
                item.quantity
            }
            None => {
                items.push(CartItem {
                    id: product_id.to_owned(),
                    name: product_name.to_owned(),
                    price: unit_price.into().resolve(),
                    quantity: 1,
                    added_at: self.clock.now_ms(),
                });
                1
            }
        };
        self.write_cart(items);

        if new_quantity > 1 {
            self.notifier.notify(Notice::info(format!(
                "Increased quantity of {product_name} in cart"
            )));
        } else {
            self.notifier
                .notify(Notice::success(format!("Added {product_name} to cart")));
        }
        CartAdd { new_quantity }
    }

    /// Quantity 0 removes the line. Returns false when the id is not in the cart.
    pub fn set_quantity(&self, product_id: &str, quantity: u32) -> bool {
        let mut items = self.read_cart();
        let Some(pos) = items.iter().position(|item| item.id == product_id) else {
            return false;
        };
        if quantity == 0 {
            items.remove(pos);
        } else {
            items[pos].quantity = quantity;
        }
        self.write_cart(items);
        true
    }

    pub fn remove_from_cart(&self, product_id: &str) -> bool {
        self.set_quantity(product_id, 0)
    }

    pub fn clear_cart(&self) {
        self.write_cart(Vec::new());
    }

    pub fn cart(&self) -> Vec<CartItem> {
        self.read_cart()
    }

    pub fn wishlist(&self) -> Vec<WishlistItem> {
        self.read_wishlist()
    }

    pub fn cart_count(&self) -> u64 {
        self.read_cart().iter().map(|item| u64::from(item.quantity)).sum()
    }

    pub fn wishlist_count(&self) -> u64 {
        self.read_wishlist().len() as u64
    }

    pub fn in_wishlist(&self, product_id: &str) -> bool {
        self.read_wishlist().iter().any(|item| item.id == product_id)
    }

    pub fn cart_total(&self) -> f64 {
        self.read_cart()
            .iter()
            .map(|item| item.price * f64::from(item.quantity))
            .sum()
    }

    fn read_cart(&self) -> Vec<CartItem> {
        match self.read_collection::<CartItem>(&self.keys.cart) {
            Some(items) => {
                let items = normalize_cart(items);
                *self.cart.borrow_mut() = items.clone();
                items
            }
            None => self.cart.borrow().clone(),
        }
    }

    fn read_wishlist(&self) -> Vec<WishlistItem> {
        match self.read_collection::<WishlistItem>(&self.keys.wishlist) {
            Some(items) => {
                let items = normalize_wishlist(items);
                *self.wishlist.borrow_mut() = items.clone();
                items
            }
            None => self.wishlist.borrow().clone(),
        }
    }

    /// `None` when storage itself failed; corrupt JSON reads as empty.
    fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Option<Vec<T>> {
        if self.degraded.get() {
            return None;
        }
        match self.storage.get(key) {
            Ok(None) => Some(Vec::new()),
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(items) => Some(items),
                Err(err) => {
                    warn!(key, error = %err, "discarding unreadable stored collection");
                    Some(Vec::new())
                }
            },
            Err(err) => {
                self.degrade(&err);
                None
            }
        }
    }

    fn write_cart(&self, items: Vec<CartItem>) {
        *self.cart.borrow_mut() = items;
        self.persist(&self.keys.cart, &*self.cart.borrow());
    }

    fn write_wishlist(&self, items: Vec<WishlistItem>) {
        *self.wishlist.borrow_mut() = items;
        self.persist(&self.keys.wishlist, &*self.wishlist.borrow());
    }

    fn persist<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if self.degraded.get() {
            return;
        }
        if let Err(err) = save_json(&self.storage, key, value) {
            self.degrade(&err);
        } else {
            debug!(key, "persisted collection");
        }
    }

    fn degrade(&self, err: &anyhow::Error) {
        if !self.degraded.replace(true) {
            warn!(error = %err, "storage unavailable, keeping cart and wishlist in memory for this page");
        }
    }
}

/// Merge duplicate ids (quantities add, first name/price win) and lift zero
/// quantities to one.
fn normalize_cart(items: Vec<CartItem>) -> Vec<CartItem> {
    let mut merged: Vec<CartItem> = Vec::with_capacity(items.len());
    for mut item in items {
        item.quantity = item.quantity.max(1);
        match merged.iter_mut().find(|existing| existing.id == item.id) {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity)
            }
            None => merged.push(item),
        }
    }
    merged
}

fn normalize_wishlist(items: Vec<WishlistItem>) -> Vec<WishlistItem> {
    let mut unique: Vec<WishlistItem> = Vec::with_capacity(items.len());
    for item in items {
        if !unique.iter().any(|existing| existing.id == item.id) {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use lx_client::NoticeKind;
    use lx_client::testing::NoticeLog;
    use lx_storage::{InMemoryStore, UnavailableStore};

    fn store_over<S: KeyValueStore>(storage: S) -> (LocalCommerceStore<S>, Rc<NoticeLog>) {
        let notices = Rc::new(NoticeLog::new());
        let store = LocalCommerceStore::new(
            storage,
            Rc::new(FixedClock::at(1_700_000_000_000)),
            notices.clone(),
        );
        (store, notices)
    }

    #[test]
    fn repeated_adds_increment_and_keep_first_price() {
        let (store, notices) = store_over(InMemoryStore::new());
        assert_eq!(store.add_to_cart("p1", "Watch", 1200.0).new_quantity, 1);
        assert_eq!(store.add_to_cart("p1", "Renamed", 999.0).new_quantity, 2);
        assert_eq!(store.add_to_cart("p1", "Watch", "$5").new_quantity, 3);

        let cart = store.cart();
        assert_eq!(cart.len(), 1);
        assert_eq!(cart[0].name, "Watch");
        assert_eq!(cart[0].price, 1200.0);
        assert_eq!(cart[0].quantity, 3);
        assert_eq!(store.cart_count(), 3);

        let kinds: Vec<_> = notices.notices().iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NoticeKind::Success, NoticeKind::Info, NoticeKind::Info]);
        assert_eq!(
            notices.last().map(|n| n.message),
            Some("Increased quantity of Watch in cart".to_owned())
        );
    }

    #[test]
    fn added_at_is_stamped_on_insert_only() {
        let clock = Rc::new(FixedClock::at(1_000));
        let store = LocalCommerceStore::new(InMemoryStore::new(), clock.clone(), Rc::new(NoticeLog::new()));
        store.add_to_cart("p1", "Watch", 1200.0);
        store.toggle_wishlist("p2", "Bag");

        clock.advance(5_000);
        store.add_to_cart("p1", "Watch", 1200.0);
        store.add_to_cart("p3", "Belt", 90.0);

        let stamps: Vec<(String, u64)> = store.cart().into_iter().map(|i| (i.id, i.added_at)).collect();
        assert_eq!(stamps, vec![("p1".to_owned(), 1_000), ("p3".to_owned(), 6_000)]);
        assert_eq!(store.wishlist()[0].added_at, 1_000);
    }

    #[test]
    fn toggle_is_its_own_inverse() {
        let (store, notices) = store_over(InMemoryStore::new());
        store.toggle_wishlist("p9", "Scarf");
        let before = store.wishlist();

        assert!(store.toggle_wishlist("p2", "Bag").added);
        assert!(store.in_wishlist("p2"));
        assert!(!store.toggle_wishlist("p2", "Bag").added);
        assert_eq!(store.wishlist(), before);
        assert_eq!(store.wishlist_count(), 1);
        assert_eq!(
            notices.last().map(|n| n.message),
            Some("Removed Bag from wishlist".to_owned())
        );
    }

    #[test]
    fn every_mutation_is_persisted() -> anyhow::Result<()> {
        let storage = Rc::new(InMemoryStore::new());
        let (store, _) = store_over(storage.clone());
        store.add_to_cart("p1", "Watch", 1200.0);
        store.toggle_wishlist("p2", "Bag");

        let cart: Vec<CartItem> = serde_json::from_str(&storage.raw("cart").unwrap_or_default())?;
        assert_eq!(cart, store.cart());
        let raw_wishlist = storage.raw("wishlist").unwrap_or_default();
        assert!(raw_wishlist.contains("\"addedAt\":1700000000000"));

        // A second store over the same storage sees the same state.
        let (reopened, _) = store_over(storage);
        assert_eq!(reopened.cart_count(), 1);
        assert!(reopened.in_wishlist("p2"));
        Ok(())
    }

    #[test]
    fn reads_through_to_storage() -> anyhow::Result<()> {
        let storage = Rc::new(InMemoryStore::new());
        let (store, _) = store_over(storage.clone());
        store.add_to_cart("p1", "Watch", 1200.0);

        storage.set("cart", r#"[{"id":"p1","name":"Watch","price":1200,"quantity":4}]"#)?;
        assert_eq!(store.add_to_cart("p1", "Watch", 1200.0).new_quantity, 5);
        Ok(())
    }

    #[test]
    fn legacy_collections_are_normalized() {
        let storage = InMemoryStore::with_entry(
            "cart",
            r#"[{"id":7,"name":"Ring","price":"$2,500.00","quantity":0,"date":"2024-01-01"},
                {"id":"7","name":"Other","price":1,"quantity":2},
                {"id":"8","name":"Belt","price":"call us"}]"#,
        );
        let (store, _) = store_over(storage);
        let cart = store.cart();
        assert_eq!(cart.len(), 2);
        assert_eq!(cart[0].id, "7");
        assert_eq!(cart[0].name, "Ring");
        assert_eq!(cart[0].price, 2500.0);
        assert_eq!(cart[0].quantity, 3);
        assert_eq!(cart[1].price, 0.0);
        assert_eq!(cart[1].quantity, 1);
        assert_eq!(store.cart_total(), 7500.0);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let storage = InMemoryStore::with_entry("wishlist", "not json at all");
        let (store, _) = store_over(storage);
        assert_eq!(store.wishlist_count(), 0);
        assert!(store.toggle_wishlist("p1", "Watch").added);
        assert!(!store.is_degraded());
    }

    #[test]
    fn unavailable_storage_degrades_to_memory() {
        let storage = Rc::new(UnavailableStore::new());
        let (store, notices) = store_over(storage.clone());

        assert_eq!(store.add_to_cart("p1", "Watch", 1200.0).new_quantity, 1);
        assert_eq!(store.add_to_cart("p1", "Watch", 1200.0).new_quantity, 2);
        assert!(store.toggle_wishlist("p2", "Bag").added);
        assert!(store.is_degraded());
        assert_eq!(store.cart_count(), 2);
        assert_eq!(store.wishlist_count(), 1);
        assert_eq!(storage.write_attempts(), 0);
        assert_eq!(notices.notices().len(), 3);
    }

    #[test]
    fn quantity_edits() {
        let (store, _) = store_over(InMemoryStore::new());
        store.add_to_cart("p1", "Watch", 100.0);
        store.add_to_cart("p2", "Bag", 50.0);

        assert!(store.set_quantity("p1", 3));
        assert_eq!(store.cart_total(), 350.0);
        assert!(store.remove_from_cart("p2"));
        assert!(!store.remove_from_cart("p2"));
        assert_eq!(store.cart_count(), 3);

        store.clear_cart();
        assert_eq!(store.cart_count(), 0);
        assert!(store.cart().is_empty());
    }
}
