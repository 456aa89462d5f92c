//! The cart store.
//!
//! Maintains the working set of line items the user intends to purchase and
//! exposes aggregate views over it. Cart state is transient: in-memory only,
//! scoped to the process, never persisted.
//!
//! Cart operations never fail; inputs are normalized (quantity floors,
//! absent-variant defaults) rather than rejected. Stock-limit enforcement,
//! if any, is a view-layer concern consulting product data.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use green_papaya_core::{CurrencyCode, Price, ProductId};

use crate::models::{CartLine, CartLineInput, VariantKey};
use crate::notify::Listeners;

/// Reserved error type for cart operations.
///
/// No cart operation currently raises it (quantity floors and variant
/// defaults normalize every input), but future stock-limit validation will
/// surface here.
#[derive(Debug, thiserror::Error)]
pub enum CartOperationError {
    /// Requested quantity exceeds available stock.
    #[error("insufficient stock for {product_id}: {requested} requested")]
    InsufficientStock {
        /// The product in question.
        product_id: ProductId,
        /// The quantity that was requested.
        requested: u32,
    },
}

#[derive(Default)]
struct CartState {
    lines: Vec<CartLine>,
    is_open: bool,
}

/// The cart store.
///
/// A cheaply cloneable handle; clones share state and listeners. Each
/// mutation is atomic: the internal lock is held for the duration of the
/// update and released before listeners run.
#[derive(Clone, Default)]
pub struct CartStore {
    state: Arc<Mutex<CartState>>,
    listeners: Listeners,
}

impl CartStore {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a change listener, invoked synchronously after every
    /// mutation.
    pub fn subscribe(&self, listener: impl Fn() + Send + Sync + 'static) {
        self.listeners.subscribe(listener);
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add an item to the cart.
    ///
    /// If a line with the same `(product_id, variant)` identity already
    /// exists, its quantity grows by the added amount; otherwise a new
    /// unselected line is appended. The input quantity is floored to 1.
    /// Adding also surfaces the cart panel (`is_open`).
    pub fn add_item(&self, input: CartLineInput) {
        let added = input.quantity.max(1);

        self.mutate(|state| {
            let existing = state
                .lines
                .iter_mut()
                .find(|line| line.product_id == input.product_id && line.variant == input.variant);

            match existing {
                Some(line) => line.quantity = line.quantity.saturating_add(added),
                None => state.lines.push(CartLine {
                    product_id: input.product_id,
                    variant: input.variant,
                    display_name: input.display_name,
                    unit_price: input.unit_price,
                    thumbnail: input.thumbnail,
                    quantity: added,
                    selected: false,
                }),
            }

            state.is_open = true;
        });
    }

    /// Remove the matching line entirely. No-op if absent.
    pub fn remove_item(&self, product_id: &ProductId, variant: &VariantKey) {
        self.mutate(|state| {
            state
                .lines
                .retain(|line| !(line.product_id == *product_id && line.variant == *variant));
        });
    }

    /// Increment the matching line's quantity by one. No upper bound is
    /// enforced here.
    pub fn increase_quantity(&self, product_id: &ProductId, variant: &VariantKey) {
        self.mutate(|state| {
            if let Some(line) = find_line(state, product_id, variant) {
                line.quantity = line.quantity.saturating_add(1);
            }
        });
    }

    /// Decrement the matching line's quantity by one, but never below 1.
    ///
    /// A decrement at quantity 1 is a no-op; removal is a separate, explicit
    /// action.
    pub fn decrease_quantity(&self, product_id: &ProductId, variant: &VariantKey) {
        self.mutate(|state| {
            if let Some(line) = find_line(state, product_id, variant)
                && line.quantity > 1
            {
                line.quantity -= 1;
            }
        });
    }

    /// Flip the selection flag of exactly the matching line.
    pub fn toggle_select(&self, product_id: &ProductId, variant: &VariantKey) {
        self.mutate(|state| {
            if let Some(line) = find_line(state, product_id, variant) {
                line.selected = !line.selected;
            }
        });
    }

    /// Set the selection flag uniformly across all lines.
    pub fn select_all(&self, selected: bool) {
        self.mutate(|state| {
            for line in &mut state.lines {
                line.selected = selected;
            }
        });
    }

    /// Surface or hide the cart panel.
    pub fn toggle_open(&self) {
        self.mutate(|state| state.is_open = !state.is_open);
    }

    /// Hide the cart panel.
    pub fn close(&self) {
        self.mutate(|state| state.is_open = false);
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of all lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> Vec<CartLine> {
        self.lock().lines.clone()
    }

    /// Badge count: total quantity across all lines.
    #[must_use]
    pub fn badge_count(&self) -> u32 {
        self.lock()
            .lines
            .iter()
            .fold(0, |total, line| total.saturating_add(line.quantity))
    }

    /// Subtotal over selected lines (`unit_price` × `quantity`).
    #[must_use]
    pub fn selected_total(&self) -> Price {
        let state = self.lock();
        let currency = state
            .lines
            .iter()
            .find(|line| line.selected)
            .map_or(CurrencyCode::default(), |line| line.unit_price.currency());

        state
            .lines
            .iter()
            .filter(|line| line.selected)
            .fold(Price::zero(currency), |total, line| {
                total + line.line_total()
            })
    }

    /// Whether the cart panel is currently surfaced.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run one atomic mutation, then notify listeners with the lock released.
    fn mutate(&self, f: impl FnOnce(&mut CartState)) {
        {
            let mut state = self.lock();
            f(&mut state);
        }
        self.listeners.notify();
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("CartStore")
            .field("lines", &state.lines.len())
            .field("is_open", &state.is_open)
            .finish()
    }
}

fn find_line<'a>(
    state: &'a mut CartState,
    product_id: &ProductId,
    variant: &VariantKey,
) -> Option<&'a mut CartLine> {
    state
        .lines
        .iter_mut()
        .find(|line| line.product_id == *product_id && line.variant == *variant)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn input(product: &str, color: Option<&str>, quantity: u32) -> CartLineInput {
        CartLineInput {
            product_id: ProductId::new(product),
            variant: VariantKey {
                color: color.map(str::to_owned),
                size: None,
            },
            display_name: format!("Product {product}"),
            unit_price: Price::from_minor(1000, CurrencyCode::USD),
            thumbnail: String::new(),
            quantity,
        }
    }

    fn key(color: Option<&str>) -> VariantKey {
        VariantKey {
            color: color.map(str::to_owned),
            size: None,
        }
    }

    #[test]
    fn test_add_merges_same_identity() {
        let cart = CartStore::new();
        cart.add_item(input("p1", Some("black"), 1));
        cart.add_item(input("p1", Some("black"), 2));

        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 3);
        assert_eq!(cart.badge_count(), 3);
    }

    #[test]
    fn test_add_distinct_variants_appends() {
        let cart = CartStore::new();
        cart.add_item(input("p1", Some("black"), 1));
        cart.add_item(input("p1", Some("white"), 1));

        assert_eq!(cart.lines().len(), 2);

        cart.remove_item(&ProductId::new("p1"), &key(Some("black")));
        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().variant, key(Some("white")));
    }

    #[test]
    fn test_add_floors_zero_quantity() {
        let cart = CartStore::new();
        cart.add_item(input("p1", None, 0));
        assert_eq!(cart.lines().first().unwrap().quantity, 1);
    }

    #[test]
    fn test_add_surfaces_cart_panel() {
        let cart = CartStore::new();
        assert!(!cart.is_open());
        cart.add_item(input("p1", None, 1));
        assert!(cart.is_open());

        cart.close();
        assert!(!cart.is_open());
        cart.toggle_open();
        assert!(cart.is_open());
    }

    #[test]
    fn test_decrease_floors_at_one() {
        let cart = CartStore::new();
        cart.add_item(input("p1", Some("black"), 1));
        cart.add_item(input("p1", Some("black"), 2));

        let id = ProductId::new("p1");
        let variant = key(Some("black"));
        for _ in 0..3 {
            cart.decrease_quantity(&id, &variant);
        }

        // Floors at 1, never reaches 0 or goes negative.
        assert_eq!(cart.lines().first().unwrap().quantity, 1);

        // The line is still there; removal is explicit.
        cart.remove_item(&id, &variant);
        assert!(cart.lines().is_empty());
    }

    #[test]
    fn test_increase_is_unbounded() {
        let cart = CartStore::new();
        cart.add_item(input("p1", None, 1));

        let id = ProductId::new("p1");
        let variant = key(None);
        for _ in 0..100 {
            cart.increase_quantity(&id, &variant);
        }
        assert_eq!(cart.lines().first().unwrap().quantity, 101);
    }

    #[test]
    fn test_quantity_edits_on_absent_line_are_noops() {
        let cart = CartStore::new();
        cart.add_item(input("p1", None, 1));

        let missing = ProductId::new("p2");
        cart.increase_quantity(&missing, &key(None));
        cart.decrease_quantity(&missing, &key(None));
        cart.remove_item(&missing, &key(None));
        cart.toggle_select(&missing, &key(None));

        let lines = cart.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines.first().unwrap().quantity, 1);
    }

    #[test]
    fn test_new_lines_start_unselected() {
        let cart = CartStore::new();
        cart.add_item(input("p1", None, 2));
        assert!(!cart.lines().first().unwrap().selected);
        assert_eq!(cart.selected_total().minor(), 0);
    }

    #[test]
    fn test_toggle_select_flips_one_line() {
        let cart = CartStore::new();
        cart.add_item(input("p1", Some("black"), 2));
        cart.add_item(input("p2", None, 1));

        cart.toggle_select(&ProductId::new("p1"), &key(Some("black")));
        assert_eq!(cart.selected_total().minor(), 2000);

        cart.toggle_select(&ProductId::new("p1"), &key(Some("black")));
        assert_eq!(cart.selected_total().minor(), 0);
    }

    #[test]
    fn test_select_all_total_matches_sum() {
        let cart = CartStore::new();
        cart.add_item(input("p1", Some("black"), 2)); // 2000
        cart.add_item(input("p2", None, 3)); // 3000

        cart.select_all(true);
        assert_eq!(cart.selected_total().minor(), 5000);

        cart.select_all(false);
        assert_eq!(cart.selected_total().minor(), 0);
    }

    #[test]
    fn test_listeners_fire_once_per_mutation() {
        let cart = CartStore::new();
        let calls = std::sync::Arc::new(AtomicUsize::new(0));

        let seen = std::sync::Arc::clone(&calls);
        cart.subscribe(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        cart.add_item(input("p1", None, 1));
        cart.increase_quantity(&ProductId::new("p1"), &key(None));
        cart.select_all(true);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_listener_reads_back_completed_state() {
        let cart = CartStore::new();
        let observer = cart.clone();
        let observed = std::sync::Arc::new(AtomicUsize::new(0));

        let seen = std::sync::Arc::clone(&observed);
        cart.subscribe(move || {
            seen.store(observer.badge_count() as usize, Ordering::SeqCst);
        });

        cart.add_item(input("p1", None, 4));
        assert_eq!(observed.load(Ordering::SeqCst), 4);
    }
}
