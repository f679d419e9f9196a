//! Shared fixture for the integration tests.

#![allow(dead_code)]

use alloy_primitives::{Address, U256};

use binary_book::config::LedgerSettings;
use binary_book::memory::{MemoryExchange, MemoryToken};
use binary_book::port::CollateralToken;
use binary_book::types::fixed;
use binary_book::OrderLedger;

pub const CUSTODY: Address = Address::repeat_byte(0x0F);
pub const ADMIN: Address = Address::repeat_byte(0xAD);
pub const COORDINATOR: Address = Address::repeat_byte(0xCC);
pub const FEE_RECIPIENT: Address = Address::repeat_byte(0xFE);
pub const EXCHANGE: Address = Address::repeat_byte(0xEE);

pub const ALICE: Address = Address::repeat_byte(0x01);
pub const BOB: Address = Address::repeat_byte(0x02);
pub const CAROL: Address = Address::repeat_byte(0x03);

pub type Ledger = OrderLedger<MemoryToken, MemoryExchange>;

pub fn fx(s: &str) -> U256 {
    fixed::to_fixed(s).expect("valid decimal")
}

pub fn settings() -> LedgerSettings {
    LedgerSettings::new(CUSTODY, ADMIN, COORDINATOR, FEE_RECIPIENT)
}

/// Collateral the exchange holds to pay out sells above the buy price
pub const EXCHANGE_LIQUIDITY: u64 = 1_000_000;

/// Ledger built from `settings` whose users each hold and have approved
/// `funds` collateral, with both sides priced at 2.0.
pub fn ledger_with_settings(settings: LedgerSettings, funds: U256) -> Ledger {
    let mut token = MemoryToken::new();
    for who in [ALICE, BOB, CAROL] {
        token.mint(who, funds);
        token.approve(who, CUSTODY, funds);
    }
    token.mint(EXCHANGE, fixed::whole(EXCHANGE_LIQUIDITY));
    let exchange = MemoryExchange::new(EXCHANGE, fixed::whole(2), fixed::whole(2));
    OrderLedger::new(settings, token, exchange).expect("valid settings")
}

pub fn ledger_with_funds(funds: U256) -> Ledger {
    ledger_with_settings(settings(), funds)
}

pub fn ledger() -> Ledger {
    ledger_with_funds(fixed::whole(10_000))
}

/// Add collateral to custody beyond what orders deposited.
pub fn fund_custody(ledger: &mut Ledger, amount: U256) {
    ledger.collateral_mut().mint(CUSTODY, amount);
}

pub fn balance(ledger: &Ledger, who: Address) -> U256 {
    ledger.collateral().balance_of(who)
}

/// Custody covers unstarted deposits, outstanding claims and the collected fee.
pub fn assert_conserved(ledger: &Ledger) {
    let reserved = ledger.reserved_collateral().expect("reservation in range");
    assert!(
        ledger.custody_balance() >= reserved,
        "custody {} below reserved {}",
        ledger.custody_balance(),
        reserved
    );
}

/// No order is ever pending and executed at once.
pub fn assert_flags_consistent(ledger: &Ledger) {
    for order in ledger.book().iter() {
        assert!(
            !(order.is_pending && order.is_executed),
            "order {} is pending and executed",
            order.id
        );
        if order.is_withdrawn {
            assert!(order.is_executed, "order {} withdrawn without execution", order.id);
        }
    }
}
