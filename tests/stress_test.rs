//! Stress tests for the order ledger.
//!
//! These tests verify:
//! 1. Custody covers unstarted deposits, outstanding claims and the collected
//!    fee after every operation of a long random workload, and every
//!    withdrawal is paid
//! 2. Determinism is preserved across runs
//! 3. Large events aggregate and settle in one pass
//!
//! ## Running Stress Tests
//!
//! ```bash
//! cargo test --release --test stress_test -- --nocapture
//! ```

mod support;

use std::time::Instant;

use alloy_primitives::{Address, U256};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use binary_book::memory::{MemoryExchange, MemoryToken};
use binary_book::types::{fixed, OrderStatus, Outcome};
use binary_book::{LedgerError, OrderLedger};

use support::*;

// ============================================================================
// TEST CONSTANTS
// ============================================================================

const USER_COUNT: u8 = 24;
const EVENT_COUNT: u64 = 8;
const WORKLOAD_OPS: usize = 20_000;

/// Collateral each user starts with (whole units)
const USER_FUNDS: u64 = 1_000_000_000;
/// Exchange liquidity paying out price gains (whole units)
const EXCHANGE_FUNDS: u64 = 1_000_000_000;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Open,
    Started,
    Settled,
}

fn users() -> Vec<Address> {
    // 0x40.. keeps clear of the fixture's role addresses
    (0..USER_COUNT).map(|i| Address::repeat_byte(0x40 + i)).collect()
}

fn milli() -> U256 {
    fixed::SCALE / U256::from(1000u64)
}

fn stress_ledger(users: &[Address]) -> Ledger {
    let mut token = MemoryToken::new();
    for &who in users {
        token.mint(who, fixed::whole(USER_FUNDS));
        token.approve(who, CUSTODY, fixed::whole(USER_FUNDS));
    }
    token.mint(EXCHANGE, fixed::whole(EXCHANGE_FUNDS));
    let exchange = MemoryExchange::new(EXCHANGE, fixed::whole(2), fixed::whole(2));
    OrderLedger::new(settings(), token, exchange).expect("valid settings")
}

/// Random price in [0.5, 5.0] with three decimals
fn random_price(rng: &mut ChaCha8Rng) -> U256 {
    U256::from(rng.gen_range(500u64..=5_000)) * milli()
}

/// Random amount in [1, 1000] with three decimals
fn random_amount(rng: &mut ChaCha8Rng) -> U256 {
    U256::from(rng.gen_range(1_000u64..=1_000_000)) * milli()
}

/// Settle every event still in flight, then let every user withdraw.
///
/// Prices drop to 0.5 first: no order was placed below it, so every
/// remaining aggregated buy fits within its deposits.
fn drain(ledger: &mut Ledger, phases: &mut [Phase], users: &[Address]) {
    let floor = U256::from(500u64) * milli();
    ledger.exchange_mut().set_price(Outcome::White, floor);
    ledger.exchange_mut().set_price(Outcome::Black, floor);
    for (index, phase) in phases.iter_mut().enumerate() {
        let event_id = index as u64 + 1;
        if *phase == Phase::Open {
            ledger.event_start(COORDINATOR, event_id).unwrap();
            *phase = Phase::Started;
        }
        if *phase == Phase::Started {
            ledger.event_end(COORDINATOR, event_id).unwrap();
            *phase = Phase::Settled;
        }
    }
    for &who in users {
        match ledger.withdraw_collateral(who) {
            Ok(_) | Err(LedgerError::NothingToWithdraw) => {}
            Err(err) => panic!("withdrawal for {} failed: {}", who, err),
        }
    }
}

/// Run a seeded mixed workload and return the ledger it leaves behind.
fn run_workload(seed: u64, ops: usize) -> Ledger {
    let users = users();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut ledger = stress_ledger(&users);
    let mut phases = vec![Phase::Open; EVENT_COUNT as usize];

    for _ in 0..ops {
        let roll = rng.gen_range(0..100);
        match roll {
            0..=54 => {
                let who = users[rng.gen_range(0..users.len())];
                let event_id = rng.gen_range(1..=EVENT_COUNT);
                let outcome = Outcome::from_is_white(rng.gen_bool(0.5));
                let amount = random_amount(&mut rng);
                let result = ledger.create_order(who, amount, outcome, event_id);
                match phases[event_id as usize - 1] {
                    Phase::Open => {
                        result.unwrap();
                    }
                    _ => assert_eq!(result.unwrap_err(), LedgerError::EventAlreadyStarted(event_id)),
                }
            }
            55..=69 => {
                let count = ledger.order_count();
                if count == 0 {
                    continue;
                }
                let order_id = rng.gen_range(0..count);
                let orderer = ledger.order(order_id).unwrap().orderer;
                match ledger.cancel_order(orderer, order_id) {
                    Ok(()) | Err(LedgerError::OrderNotPending(_)) | Err(LedgerError::EventAlreadyStarted(_)) => {}
                    Err(err) => panic!("cancel of order {} failed: {}", order_id, err),
                }
            }
            70..=79 => {
                let outcome = Outcome::from_is_white(rng.gen_bool(0.5));
                let price = random_price(&mut rng);
                ledger.exchange_mut().set_price(outcome, price);
            }
            80..=87 => {
                let index = rng.gen_range(0..phases.len());
                let event_id = index as u64 + 1;
                match phases[index] {
                    // A price rise since placement can make the buys
                    // unaffordable; the event stays open for a later try.
                    Phase::Open => match ledger.event_start(COORDINATOR, event_id) {
                        Ok(_) => phases[index] = Phase::Started,
                        Err(LedgerError::InsufficientLedgerBalance { .. }) => {}
                        Err(err) => panic!("start of event {} failed: {}", event_id, err),
                    },
                    Phase::Started => {
                        ledger.event_end(COORDINATOR, event_id).unwrap();
                        phases[index] = Phase::Settled;
                    }
                    Phase::Settled => {
                        assert_eq!(
                            ledger.event_end(COORDINATOR, event_id).unwrap_err(),
                            LedgerError::EventNotStarted(event_id)
                        );
                    }
                }
            }
            _ => {
                let who = users[rng.gen_range(0..users.len())];
                match ledger.withdraw_collateral(who) {
                    Ok(withdrawal) => assert!(withdrawal.net <= withdrawal.gross),
                    Err(LedgerError::NothingToWithdraw) => {}
                    Err(err) => panic!("withdrawal for {} failed: {}", who, err),
                }
            }
        }
        assert_conserved(&ledger);
    }

    drain(&mut ledger, &mut phases, &users);
    ledger
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Long random workload over many users and overlapping events.
///
/// # Verification
/// - Custody covers the reservation after every step
/// - Withdrawals never fail for want of custody
/// - No order is ever pending and executed at once
/// - Once drained, nothing is pending and every executed order was paid
#[test]
fn stress_mixed_workload() {
    println!("\n=== STRESS TEST: Mixed Workload ===\n");

    let start = Instant::now();
    let ledger = run_workload(42, WORKLOAD_OPS);
    let elapsed = start.elapsed();

    assert_flags_consistent(&ledger);
    assert_eq!(ledger.pending_collateral(), U256::ZERO);
    assert_eq!(ledger.sessions().in_flight(), 0);

    let mut canceled = 0;
    let mut withdrawn = 0;
    for order in ledger.book().iter() {
        match order.status() {
            OrderStatus::Canceled => canceled += 1,
            OrderStatus::Withdrawn => withdrawn += 1,
            status => panic!("order {} left in {:?}", order.id, status),
        }
    }
    assert!(withdrawn > 0, "expected some settled orders");
    assert_eq!(ledger.outstanding_claims(), U256::ZERO);
    assert!(ledger.custody_balance() >= ledger.collected_fee());

    println!("\n=== RESULTS ===");
    println!("  Operations:        {:>12}", WORKLOAD_OPS);
    println!("  Orders created:    {:>12}", ledger.order_count());
    println!("  Orders canceled:   {:>12}", canceled);
    println!("  Orders withdrawn:  {:>12}", withdrawn);
    println!("  Collected fee:     {:>12}", fixed::from_fixed_trimmed(ledger.collected_fee()));
    println!("  Elapsed time:      {:>12.2?}", elapsed);
    println!();
    println!("  State root:        {}", hex::encode(ledger.state_root().unwrap()));

    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Same seed, same state root; different seed, different root.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_OPS: usize = 5_000;
    const SEED: u64 = 12345;

    let first = run_workload(SEED, TEST_OPS);
    let second = run_workload(SEED, TEST_OPS);
    let first_root = first.state_root().unwrap();
    let second_root = second.state_root().unwrap();
    println!("  Run 1 state root: {}", hex::encode(first_root));
    println!("  Run 2 state root: {}", hex::encode(second_root));

    assert_eq!(first_root, second_root, "State roots must match for determinism");
    assert_eq!(first.events(), second.events());
    assert_eq!(first.dropped_events(), second.dropped_events());
    assert_eq!(first.collected_fee(), second.collected_fee());

    let other = run_workload(SEED + 1, TEST_OPS);
    let other_root = other.state_root().unwrap();
    println!("  Different seed:   {}", hex::encode(other_root));
    assert_ne!(first_root, other_root, "Different seeds should produce different roots");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}

/// One event with many orders on both sides.
#[test]
fn stress_large_event() {
    println!("\n=== LARGE EVENT TEST ===\n");

    const ORDER_COUNT: usize = 50_000;

    let users = users();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let mut ledger = stress_ledger(&users);

    let mut white_tokens = U256::ZERO;
    let mut black_tokens = U256::ZERO;
    let start = Instant::now();
    for i in 0..ORDER_COUNT {
        let who = users[i % users.len()];
        let outcome = Outcome::from_is_white(rng.gen_bool(0.5));
        let amount = random_amount(&mut rng);
        // Placing price is always 2.0 here
        let tokens = fixed::div(amount, fixed::whole(2)).unwrap();
        match outcome {
            Outcome::White => white_tokens += tokens,
            Outcome::Black => black_tokens += tokens,
        }
        ledger.create_order(who, amount, outcome, 1).unwrap();
    }
    let create_elapsed = start.elapsed();

    let start = Instant::now();
    let receipt = ledger.event_start(COORDINATOR, 1).unwrap();
    let start_elapsed = start.elapsed();
    assert_eq!(receipt.orders, ORDER_COUNT as u64);
    assert_eq!(receipt.white_token_amount, white_tokens);
    assert_eq!(receipt.black_token_amount, black_tokens);

    ledger.exchange_mut().set_price(Outcome::White, fixed::to_fixed("2.5").unwrap());
    ledger.exchange_mut().set_price(Outcome::Black, fixed::to_fixed("1.5").unwrap());

    let start = Instant::now();
    let receipt = ledger.event_end(COORDINATOR, 1).unwrap();
    let end_elapsed = start.elapsed();
    assert_eq!(receipt.orders, ORDER_COUNT as u64);
    assert_eq!(ledger.pending_collateral(), U256::ZERO);
    assert!(ledger.book().iter().all(|order| order.is_executed));
    assert!(receipt.collateral >= ledger.outstanding_claims());

    for &who in &users {
        ledger.withdraw_collateral(who).unwrap();
    }
    assert_eq!(ledger.outstanding_claims(), U256::ZERO);
    assert_conserved(&ledger);
    assert_flags_consistent(&ledger);

    let throughput = ORDER_COUNT as f64 / create_elapsed.as_secs_f64();
    println!("  Orders:            {:>12}", ORDER_COUNT);
    println!("  Create time:       {:>12.2?}", create_elapsed);
    println!("  Create throughput: {:>12.0} orders/sec", throughput);
    println!("  Event start:       {:>12.2?}", start_elapsed);
    println!("  Event end:         {:>12.2?}", end_elapsed);

    println!("\n=== LARGE EVENT TEST PASSED ===\n");
}
