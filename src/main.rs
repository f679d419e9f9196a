//! Binary Book - demo entry point
//!
//! Runs one event through the full order lifecycle against the in-memory
//! token and exchange.
//!
//! ```bash
//! cargo run                       # built-in demo config
//! cargo run -- path/to/ledger.toml
//! ```

use std::error::Error;

use alloy_primitives::Address;
use tracing_subscriber::EnvFilter;

use binary_book::memory::{MemoryExchange, MemoryToken};
use binary_book::types::fixed::{self, from_fixed_trimmed};
use binary_book::{LedgerConfig, LedgerSettings, OrderLedger, Outcome};

const DEMO_CONFIG: &str = include_str!("../config/demo.toml");

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => LedgerConfig::load(path)?,
        None => LedgerConfig::from_toml_str(DEMO_CONFIG)?,
    };
    init_tracing(&config.logging.level);
    let settings = LedgerSettings::from_config(&config)?;

    println!("===========================================");
    println!("  Binary Book - event settlement demo");
    println!("===========================================");
    println!();

    let alice = Address::repeat_byte(0x01);
    let bob = Address::repeat_byte(0x02);
    let custody = settings.custody;
    let coordinator = settings.coordinator;
    let admin = settings.admin;

    let mut token = MemoryToken::new();
    for who in [alice, bob] {
        token.mint(who, fixed::whole(1000));
        token.approve(who, custody, fixed::whole(1000));
    }
    // Exchange liquidity to pay out positive price movement
    let exchange_address = Address::repeat_byte(0xEE);
    token.mint(exchange_address, fixed::whole(1000));

    let exchange = MemoryExchange::new(exchange_address, fixed::whole(2), fixed::whole(2));
    let mut ledger = OrderLedger::new(settings, token, exchange)?;

    let event_id = 1;
    let white = ledger.create_order(alice, fixed::whole(1000), Outcome::White, event_id)?;
    let black = ledger.create_order(bob, fixed::whole(400), Outcome::Black, event_id)?;
    println!("Orders placed: {} (white #{white}, black #{black})", ledger.order_count());

    let start = ledger.event_start(coordinator, event_id)?;
    println!(
        "Event {event_id} started: {} white / {} black tokens bought for {}",
        from_fixed_trimmed(start.white_token_amount),
        from_fixed_trimmed(start.black_token_amount),
        from_fixed_trimmed(start.collateral),
    );

    ledger.exchange_mut().set_price(Outcome::White, fixed::to_fixed("2.5").ok_or("bad price")?);
    ledger.exchange_mut().set_price(Outcome::Black, fixed::to_fixed("1.5").ok_or("bad price")?);

    let end = ledger.event_end(coordinator, event_id)?;
    println!(
        "Event {event_id} settled: {} orders executed, {} received",
        end.orders,
        from_fixed_trimmed(end.collateral),
    );
    println!("  State root: {}", end.state_root_hex());

    for who in [alice, bob] {
        let withdrawal = ledger.withdraw_collateral(who)?;
        println!(
            "  {who}: gross {} fee {} net {}",
            from_fixed_trimmed(withdrawal.gross),
            from_fixed_trimmed(withdrawal.fee),
            from_fixed_trimmed(withdrawal.net),
        );
    }

    let swept = ledger.withdraw_fee(admin)?;
    println!("Fee swept to {}: {}", ledger.fee_recipient(), from_fixed_trimmed(swept));
    println!("Notifications emitted: {}", ledger.events().len());
    Ok(())
}
