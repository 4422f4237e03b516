//! Storefront logic that runs in the shopper's browser: the persisted cart and
//! wishlist, count badges, the public forms and the checkout glue.

pub mod binder;
pub mod carousel;
pub mod checkout;
pub mod clock;
pub mod countdown;
pub mod forms;
pub mod price;
pub mod reconcile;
pub mod store;

pub use binder::{BadgeKind, BadgeView, CommerceBinder, IndicatorState, IndicatorSurface, ProductRef};
pub use clock::Clock;
pub use price::{PriceInput, parse_price};
pub use store::{CartAdd, CartItem, LocalCommerceStore, StorageKeys, WishlistItem, WishlistToggle};
