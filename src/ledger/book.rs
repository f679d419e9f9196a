//! Append-only order arena with secondary indexes.
//!
//! ## Architecture
//!
//! - **Slab**: order storage; the slab key is the order id
//! - **HashMap (event)**: event id → order ids, so settlement touches only
//!   that event's orders
//! - **HashMap (orderer)**: address → order ids, so withdrawal touches only
//!   the caller's orders
//!
//! ## Memory Model
//!
//! Orders are never removed, so slab keys are handed out sequentially
//! (0, 1, 2, ...) and never reused. History is permanent.
//!
//! ## Example
//!
//! ```
//! use alloy_primitives::Address;
//! use binary_book::ledger::OrderBook;
//! use binary_book::types::{fixed, Outcome};
//!
//! let mut book = OrderBook::with_capacity(16);
//! let alice = Address::repeat_byte(0x01);
//!
//! let id = book.insert(alice, fixed::whole(10), Outcome::White, 1, fixed::whole(2));
//! assert_eq!(id, 0);
//! assert_eq!(book.order_count(), 1);
//! assert_eq!(book.event_orders(1), &[0]);
//! ```

use std::collections::HashMap;

use alloy_primitives::{Address, U256};
use sha2::{Digest, Sha256};
use slab::Slab;

use crate::error::{LedgerError, Result};
use crate::types::{EventId, Order, OrderId, OrderRecord, Outcome};

#[derive(Debug, Default)]
pub struct OrderBook {
    /// Order storage, key = order id
    orders: Slab<Order>,

    /// Event id to order ids, in creation order
    by_event: HashMap<EventId, Vec<OrderId>>,

    /// Orderer to order ids, in creation order
    by_orderer: HashMap<Address, Vec<OrderId>>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a book with pre-allocated capacity
    pub fn with_capacity(order_capacity: usize) -> Self {
        Self {
            orders: Slab::with_capacity(order_capacity),
            by_event: HashMap::new(),
            by_orderer: HashMap::new(),
        }
    }

    // ========================================================================
    // Capacity and Size
    // ========================================================================

    /// Number of orders ever created
    #[inline]
    pub fn order_count(&self) -> u64 {
        self.orders.len() as u64
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.orders.capacity()
    }

    // ========================================================================
    // Order Management
    // ========================================================================

    /// Append a new pending order and index it.
    ///
    /// Returns the new order's id.
    pub fn insert(
        &mut self,
        orderer: Address,
        amount: U256,
        outcome: Outcome,
        event_id: EventId,
        placing_price: U256,
    ) -> OrderId {
        let entry = self.orders.vacant_entry();
        let id = entry.key() as OrderId;
        entry.insert(Order::new(id, orderer, amount, outcome, event_id, placing_price));

        self.by_event.entry(event_id).or_default().push(id);
        self.by_orderer.entry(orderer).or_default().push(id);
        id
    }

    #[inline]
    pub fn get(&self, id: OrderId) -> Option<&Order> {
        let key = usize::try_from(id).ok()?;
        self.orders.get(key)
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, id: OrderId) -> Option<&mut Order> {
        let key = usize::try_from(id).ok()?;
        self.orders.get_mut(key)
    }

    #[inline]
    pub fn contains(&self, id: OrderId) -> bool {
        self.get(id).is_some()
    }

    /// All order ids ever placed on `event_id`
    pub fn event_orders(&self, event_id: EventId) -> &[OrderId] {
        self.by_event.get(&event_id).map(Vec::as_slice).unwrap_or_default()
    }

    /// All order ids ever placed by `orderer`
    pub fn orderer_orders(&self, orderer: Address) -> &[OrderId] {
        self.by_orderer.get(&orderer).map(Vec::as_slice).unwrap_or_default()
    }

    /// Pending orders of `event_id`, in creation order
    pub fn pending_for_event(&self, event_id: EventId) -> impl Iterator<Item = &Order> + '_ {
        self.event_orders(event_id)
            .iter()
            .filter_map(|&id| self.get(id))
            .filter(|order| order.is_pending)
    }

    /// Executed, not yet withdrawn orders of `orderer`
    pub fn claimable_for(&self, orderer: Address) -> impl Iterator<Item = &Order> + '_ {
        self.orderer_orders(orderer)
            .iter()
            .filter_map(|&id| self.get(id))
            .filter(|order| order.is_claimable())
    }

    /// Every order in id order
    pub fn iter(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter().map(|(_, order)| order)
    }

    // ========================================================================
    // State Root
    // ========================================================================

    /// SHA-256 over the SSZ encoding of every order, in id order.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        Self::hash_records(self.order_count(), self.iter().map(OrderRecord::from))
    }

    /// State root the book would have once each `(order id, price)` in
    /// `executions` has been executed. Nothing is modified.
    pub fn projected_state_root(&self, executions: &HashMap<OrderId, U256>) -> Result<[u8; 32]> {
        let records = self.iter().map(|order| match executions.get(&order.id) {
            Some(&price) => {
                let mut executed = order.clone();
                executed.execute(price);
                OrderRecord::from(&executed)
            }
            None => OrderRecord::from(order),
        });
        Self::hash_records(self.order_count(), records)
    }

    fn hash_records(count: u64, records: impl Iterator<Item = OrderRecord>) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(count.to_le_bytes());
        for record in records {
            let bytes = ssz_rs::serialize(&record).map_err(|err| {
                LedgerError::StateEncoding(format!("order {}: {:?}", record.id, err))
            })?;
            hasher.update(&bytes);
        }
        Ok(hasher.finalize().into())
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
