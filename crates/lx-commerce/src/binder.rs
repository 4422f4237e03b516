//! Product-card controls and the navigation count badges.

use std::cell::Cell;
use std::rc::Rc;

use lx_storage::KeyValueStore;

use crate::price::{PriceInput, parse_price};
use crate::store::{CartAdd, LocalCommerceStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeKind {
    Cart,
    Wishlist,
}

impl BadgeKind {
    pub const ALL: [BadgeKind; 2] = [BadgeKind::Cart, BadgeKind::Wishlist];

    pub fn element_id(self) -> &'static str {
        match self {
            BadgeKind::Cart => "cart-indicator",
            BadgeKind::Wishlist => "wishlist-indicator",
        }
    }

    /// `href` of the navigation link the badge hangs off.
    pub fn link_href(self) -> &'static str {
        match self {
            BadgeKind::Cart => "/cart",
            BadgeKind::Wishlist => "/wishlist",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeView {
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndicatorState {
    pub cart: u64,
    pub wishlist: u64,
}

impl IndicatorState {
    pub fn count(&self, kind: BadgeKind) -> u64 {
        match kind {
            BadgeKind::Cart => self.cart,
            BadgeKind::Wishlist => self.wishlist,
        }
    }

    pub fn badge(&self, kind: BadgeKind) -> BadgeView {
        let count = self.count(kind);
        BadgeView {
            text: count.to_string(),
            visible: count > 0,
        }
    }
}

/// Where badges end up. Implementations locate or create each badge once and
/// must not duplicate it on repeated calls.
pub trait IndicatorSurface {
    fn show_badge(&self, kind: BadgeKind, view: &BadgeView);
}

pub fn render(state: &IndicatorState, surface: &dyn IndicatorSurface) {
    for kind in BadgeKind::ALL {
        surface.show_badge(kind, &state.badge(kind));
    }
}

/// What a card exposes about its product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRef {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl ProductRef {
    /// `data_price` is the typed attribute; the control's text is only used
    /// when the attribute is missing or blank.
    pub fn from_card(id: &str, name: &str, data_price: Option<&str>, price_text: &str) -> Self {
        let price = match data_price.map(str::trim).filter(|raw| !raw.is_empty()) {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .unwrap_or_else(|| parse_price(raw)),
            None => parse_price(price_text),
        };
        Self {
            id: id.trim().to_owned(),
            name: name.trim().to_owned(),
            price,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WishlistControl {
    pub in_wishlist: bool,
}

impl WishlistControl {
    pub fn label_html(self) -> &'static str {
        if self.in_wishlist {
            r#"<i class="fas fa-heart"></i> In Wishlist"#
        } else {
            r#"<i class="far fa-heart"></i> Wishlist"#
        }
    }
}

pub struct CommerceBinder<S: KeyValueStore> {
    store: LocalCommerceStore<S>,
    surface: Rc<dyn IndicatorSurface>,
    state: Cell<IndicatorState>,
}

impl<S: KeyValueStore> CommerceBinder<S> {
    pub fn new(store: LocalCommerceStore<S>, surface: Rc<dyn IndicatorSurface>) -> Self {
        Self {
            store,
            surface,
            state: Cell::new(IndicatorState::default()),
        }
    }

    pub fn store(&self) -> &LocalCommerceStore<S> {
        &self.store
    }

    pub fn state(&self) -> IndicatorState {
        self.state.get()
    }

    pub fn wishlist_control(&self, product_id: &str) -> WishlistControl {
        WishlistControl {
            in_wishlist: self.store.in_wishlist(product_id),
        }
    }

    pub fn on_wishlist_click(&self, product: &ProductRef) -> WishlistControl {
        let toggle = self.store.toggle_wishlist(&product.id, &product.name);
        self.refresh_indicators();
        WishlistControl {
            in_wishlist: toggle.added,
        }
    }

    pub fn on_cart_click(&self, product: &ProductRef) -> CartAdd {
        let added = self
            .store
            .add_to_cart(&product.id, &product.name, PriceInput::Amount(product.price));
        self.refresh_indicators();
        added
    }

    /// Recompute both counts from the store and render them.
    pub fn refresh_indicators(&self) {
        self.set_state(IndicatorState {
            cart: self.store.cart_count(),
            wishlist: self.store.wishlist_count(),
        });
    }

    /// Server-reported counts override the local ones until the next local
    /// mutation.
    pub fn apply_server_count(&self, kind: BadgeKind, count: u64) {
        let mut state = self.state.get();
        match kind {
            BadgeKind::Cart => state.cart = count,
            BadgeKind::Wishlist => state.wishlist = count,
        }
        self.set_state(state);
    }

    fn set_state(&self, state: IndicatorState) {
        self.state.set(state);
        render(&state, self.surface.as_ref());
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use lx_client::LogNotifier;
    use lx_storage::InMemoryStore;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Keeps one badge per kind, like a page that creates each badge once.
    #[derive(Default)]
    pub(crate) struct FakeNav {
        pub badges: RefCell<HashMap<BadgeKind, BadgeView>>,
        pub renders: Cell<usize>,
    }

    impl FakeNav {
        pub fn badge(&self, kind: BadgeKind) -> Option<BadgeView> {
            self.badges.borrow().get(&kind).cloned()
        }
    }

    impl IndicatorSurface for FakeNav {
        fn show_badge(&self, kind: BadgeKind, view: &BadgeView) {
            self.renders.set(self.renders.get() + 1);
            self.badges.borrow_mut().insert(kind, view.clone());
        }
    }

    pub(crate) fn binder() -> (CommerceBinder<InMemoryStore>, Rc<FakeNav>) {
        let nav = Rc::new(FakeNav::default());
        let store = LocalCommerceStore::new(
            InMemoryStore::new(),
            Rc::new(FixedClock::at(0)),
            Rc::new(LogNotifier),
        );
        (CommerceBinder::new(store, nav.clone()), nav)
    }

    fn product(id: &str, name: &str, price: f64) -> ProductRef {
        ProductRef {
            id: id.to_owned(),
            name: name.to_owned(),
            price,
        }
    }

    #[test]
    fn two_cart_clicks_show_two() {
        let (binder, nav) = binder();
        let watch = product("p1", "Watch", 1200.0);
        binder.on_cart_click(&watch);
        assert_eq!(binder.on_cart_click(&watch).new_quantity, 2);

        let cart = binder.store().cart();
        assert_eq!(cart.len(), 1);
        assert_eq!((cart[0].price, cart[0].quantity), (1200.0, 2));
        assert_eq!(
            nav.badge(BadgeKind::Cart),
            Some(BadgeView { text: "2".into(), visible: true })
        );
    }

    #[test]
    fn double_wishlist_toggle_hides_badge() {
        let (binder, nav) = binder();
        let bag = product("p2", "Bag", 800.0);
        assert!(binder.on_wishlist_click(&bag).in_wishlist);
        assert_eq!(nav.badge(BadgeKind::Wishlist).map(|b| b.visible), Some(true));

        let control = binder.on_wishlist_click(&bag);
        assert!(!control.in_wishlist);
        assert!(control.label_html().ends_with("Wishlist"));
        assert!(binder.store().wishlist().is_empty());
        assert_eq!(
            nav.badge(BadgeKind::Wishlist),
            Some(BadgeView { text: "0".into(), visible: false })
        );
    }

    #[test]
    fn refresh_is_idempotent() {
        let (binder, nav) = binder();
        binder.on_cart_click(&product("p1", "Watch", 10.0));
        let first = (nav.badge(BadgeKind::Cart), nav.badge(BadgeKind::Wishlist));
        binder.refresh_indicators();
        binder.refresh_indicators();
        assert_eq!(first, (nav.badge(BadgeKind::Cart), nav.badge(BadgeKind::Wishlist)));
        assert_eq!(nav.badges.borrow().len(), 2);
    }

    #[test]
    fn server_count_overrides_until_next_mutation() {
        let (binder, nav) = binder();
        binder.on_cart_click(&product("p1", "Watch", 10.0));
        binder.apply_server_count(BadgeKind::Cart, 5);
        assert_eq!(nav.badge(BadgeKind::Cart).map(|b| b.text), Some("5".into()));

        binder.on_cart_click(&product("p1", "Watch", 10.0));
        assert_eq!(nav.badge(BadgeKind::Cart).map(|b| b.text), Some("2".into()));
    }

    #[test]
    fn card_price_prefers_typed_attribute() {
        let typed = ProductRef::from_card("p1", " Watch ", Some("1200"), "$9.00");
        assert_eq!((typed.name.as_str(), typed.price), ("Watch", 1200.0));

        let scraped = ProductRef::from_card("p1", "Watch", None, "Add to cart - $1,299.00");
        assert_eq!(scraped.price, 1299.0);

        let blank = ProductRef::from_card("p1", "Watch", Some(" "), "Sold out");
        assert_eq!(blank.price, 0.0);
    }
}
