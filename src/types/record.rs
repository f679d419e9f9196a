//! Fixed-size SSZ encoding of an order.
//!
//! ## SSZ Serialization
//!
//! `Order` carries `Address`/`U256` values, so it is flattened into an
//! [`OrderRecord`] of basic SSZ types before encoding:
//! - `u64`, `bool`: direct little-endian encoding
//! - addresses: left-padded into a 32-byte word
//! - `U256` values: 32 little-endian bytes
//!
//! Every record encodes to exactly 148 bytes, and the same order always
//! produces the same bytes. State roots are built from these encodings.

use ssz_rs::prelude::*;

use crate::types::Order;

/// SSZ-serializable snapshot of an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct OrderRecord {
    pub id: u64,

    /// Orderer address as a left-padded 32-byte word
    pub orderer: [u8; 32],

    /// Collateral amount, little-endian
    pub amount: [u8; 32],

    /// Outcome as u8 (0=White, 1=Black)
    pub outcome_raw: u8,

    pub event_id: u64,

    pub is_pending: bool,

    pub is_executed: bool,

    pub is_withdrawn: bool,

    /// Placing price, little-endian
    pub placing_price: [u8; 32],

    /// Executing price, little-endian
    pub executing_price: [u8; 32],
}

impl From<&Order> for OrderRecord {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id,
            orderer: order.orderer.into_word().0,
            amount: order.amount.to_le_bytes::<32>(),
            outcome_raw: order.outcome.to_u8(),
            event_id: order.event_id,
            is_pending: order.is_pending,
            is_executed: order.is_executed,
            is_withdrawn: order.is_withdrawn,
            placing_price: order.placing_price.to_le_bytes::<32>(),
            executing_price: order.executing_price.to_le_bytes::<32>(),
        }
    }
}

impl OrderRecord {
    /// Encoded size in bytes
    pub const SIZE: usize = 8 + 32 + 32 + 1 + 8 + 1 + 1 + 1 + 32 + 32;
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{fixed, Outcome};
    use alloy_primitives::{Address, U256};

    fn sample_order() -> Order {
        Order::new(
            9,
            Address::repeat_byte(0x22),
            fixed::whole(1000),
            Outcome::Black,
            5,
            fixed::whole(2),
        )
    }

    #[test]
    fn test_record_fields() {
        let order = sample_order();
        let record = OrderRecord::from(&order);

        assert_eq!(record.id, 9);
        assert_eq!(record.outcome_raw, 1);
        assert_eq!(record.event_id, 5);
        assert!(record.is_pending);
        assert_eq!(&record.orderer[..12], &[0u8; 12]);
        assert_eq!(&record.orderer[12..], Address::repeat_byte(0x22).as_slice());
        assert_eq!(U256::from_le_bytes(record.amount), fixed::whole(1000));
        assert_eq!(record.executing_price, [0u8; 32]);
    }

    #[test]
    fn test_record_ssz_roundtrip() {
        let record = OrderRecord::from(&sample_order());

        let serialized = ssz_rs::serialize(&record).expect("Failed to serialize");
        let deserialized: OrderRecord =
            ssz_rs::deserialize(&serialized).expect("Failed to deserialize");

        assert_eq!(record, deserialized);
    }

    #[test]
    fn test_record_ssz_size() {
        let record = OrderRecord::from(&sample_order());
        let bytes = ssz_rs::serialize(&record).expect("Failed to serialize");
        assert_eq!(bytes.len(), OrderRecord::SIZE);
        assert_eq!(bytes.len(), 148);
    }

    #[test]
    fn test_record_changes_with_state() {
        let mut order = sample_order();
        let before = ssz_rs::serialize(&OrderRecord::from(&order)).unwrap();

        order.execute(fixed::whole(3));
        let after = ssz_rs::serialize(&OrderRecord::from(&order)).unwrap();

        assert_ne!(before, after, "execution must change the encoding");
    }
}
