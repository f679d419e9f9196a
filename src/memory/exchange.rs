//! Exchange with settable prices and tracked positions.

use alloy_primitives::{Address, U256};

use crate::port::{CollateralToken, Exchange, ExchangeError};
use crate::types::{fixed, Outcome, Trade, TradeDirection};

/// Fills every in-bound trade at the current price.
///
/// Every trade settles in collateral between the trading account and the
/// exchange's own address, which must hold enough to pay out sells at a
/// higher price. Positions are tracked per side so that a sell can never
/// exceed what was bought. `halt` makes every call fail, which tests use to exercise the
/// ledger's atomicity.
#[derive(Debug, Clone)]
pub struct MemoryExchange {
    address: Address,
    white_price: U256,
    black_price: U256,
    white_position: U256,
    black_position: U256,
    trades: Vec<Trade>,
    halted: bool,
}

impl MemoryExchange {
    pub fn new(address: Address, white_price: U256, black_price: U256) -> Self {
        Self {
            address,
            white_price,
            black_price,
            white_position: U256::ZERO,
            black_position: U256::ZERO,
            trades: Vec::new(),
            halted: false,
        }
    }

    pub fn set_price(&mut self, outcome: Outcome, price: U256) {
        match outcome {
            Outcome::White => self.white_price = price,
            Outcome::Black => self.black_price = price,
        }
    }

    pub fn halt(&mut self, halted: bool) {
        self.halted = halted;
    }

    pub fn position(&self, outcome: Outcome) -> U256 {
        match outcome {
            Outcome::White => self.white_position,
            Outcome::Black => self.black_position,
        }
    }

    /// Every trade executed so far, oldest first
    pub fn trades(&self) -> &[Trade] {
        &self.trades
    }

    fn price_of(&self, outcome: Outcome) -> Result<U256, ExchangeError> {
        if self.halted {
            return Err(ExchangeError::Halted);
        }
        Ok(match outcome {
            Outcome::White => self.white_price,
            Outcome::Black => self.black_price,
        })
    }

    fn execute<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        outcome: Outcome,
        direction: TradeDirection,
        bound: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        let price = self.price_of(outcome)?;
        let position = self.position(outcome);
        let value = fixed::mul(quantity, price)
            .map_err(|err| ExchangeError::Unavailable(err.to_string()))?;

        let updated = match direction {
            TradeDirection::Buy => {
                if price > bound {
                    return Err(ExchangeError::PriceOutOfBounds { price, bound });
                }
                position
                    .checked_add(quantity)
                    .ok_or_else(|| ExchangeError::Unavailable("position overflow".to_string()))?
            }
            TradeDirection::Sell => {
                if price < bound {
                    return Err(ExchangeError::PriceOutOfBounds { price, bound });
                }
                if position < quantity {
                    return Err(ExchangeError::InsufficientPosition {
                        available: position,
                        required: quantity,
                    });
                }
                position - quantity
            }
        };

        // Collateral settles before the position moves.
        if !value.is_zero() {
            match direction {
                TradeDirection::Buy => collateral.transfer(account, self.address, value)?,
                TradeDirection::Sell => collateral.transfer(self.address, account, value)?,
            }
        }

        match outcome {
            Outcome::White => self.white_position = updated,
            Outcome::Black => self.black_position = updated,
        }
        let id = self.trades.len() as u64 + 1;
        self.trades
            .push(Trade::new(id, outcome, direction, quantity, price, bound));
        Ok(value)
    }
}

impl Exchange for MemoryExchange {
    fn address(&self) -> Address {
        self.address
    }

    fn current_white_price(&self) -> Result<U256, ExchangeError> {
        self.price_of(Outcome::White)
    }

    fn current_black_price(&self) -> Result<U256, ExchangeError> {
        self.price_of(Outcome::Black)
    }

    fn buy_white<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        max_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        self.execute(collateral, account, Outcome::White, TradeDirection::Buy, max_price, quantity)
    }

    fn buy_black<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        max_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        self.execute(collateral, account, Outcome::Black, TradeDirection::Buy, max_price, quantity)
    }

    fn sell_white<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        min_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        self.execute(collateral, account, Outcome::White, TradeDirection::Sell, min_price, quantity)
    }

    fn sell_black<C: CollateralToken>(
        &mut self,
        collateral: &mut C,
        account: Address,
        min_price: U256,
        quantity: U256,
    ) -> Result<U256, ExchangeError> {
        self.execute(collateral, account, Outcome::Black, TradeDirection::Sell, min_price, quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryToken;
    use crate::port::TokenError;

    const EXCHANGE: Address = Address::repeat_byte(0xEE);
    const TRADER: Address = Address::repeat_byte(0x0F);

    fn exchange() -> MemoryExchange {
        MemoryExchange::new(EXCHANGE, fixed::whole(2), fixed::whole(4))
    }

    fn token() -> MemoryToken {
        let mut token = MemoryToken::new();
        token.mint(TRADER, fixed::whole(100));
        token.mint(EXCHANGE, fixed::whole(100));
        token
    }

    #[test]
    fn test_exchange_prices() {
        let mut ex = exchange();
        assert_eq!(ex.current_price(Outcome::White), Ok(fixed::whole(2)));
        assert_eq!(ex.current_price(Outcome::Black), Ok(fixed::whole(4)));

        ex.set_price(Outcome::White, fixed::whole(3));
        assert_eq!(ex.current_white_price(), Ok(fixed::whole(3)));
    }

    #[test]
    fn test_exchange_buy_then_sell() {
        let mut ex = exchange();
        let mut token = token();
        let paid = ex
            .buy(&mut token, TRADER, Outcome::White, fixed::whole(10), fixed::whole(5))
            .unwrap();
        assert_eq!(paid, fixed::whole(10));
        assert_eq!(ex.position(Outcome::White), fixed::whole(5));
        assert_eq!(token.balance_of(TRADER), fixed::whole(90));

        ex.set_price(Outcome::White, fixed::whole(3));
        let received = ex
            .sell(&mut token, TRADER, Outcome::White, fixed::whole(1), fixed::whole(5))
            .unwrap();
        assert_eq!(received, fixed::whole(15));
        assert_eq!(ex.position(Outcome::White), U256::ZERO);
        assert_eq!(token.balance_of(TRADER), fixed::whole(105));
        assert_eq!(token.balance_of(EXCHANGE), fixed::whole(95));

        assert_eq!(ex.trades().len(), 2);
        assert!(ex.trades().iter().all(Trade::within_bound));
        assert_eq!(ex.trades()[1].direction, TradeDirection::Sell);
    }

    #[test]
    fn test_exchange_enforces_bounds() {
        let mut ex = exchange();
        let mut token = token();
        let err = ex
            .buy_black(&mut token, TRADER, fixed::whole(3), fixed::whole(1))
            .unwrap_err();
        assert_eq!(
            err,
            ExchangeError::PriceOutOfBounds { price: fixed::whole(4), bound: fixed::whole(3) }
        );
        assert_eq!(token.balance_of(TRADER), fixed::whole(100));

        ex.buy_black(&mut token, TRADER, fixed::whole(4), fixed::whole(1)).unwrap();
        let err = ex
            .sell_black(&mut token, TRADER, fixed::whole(5), fixed::whole(1))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::PriceOutOfBounds { .. }));
        assert_eq!(ex.position(Outcome::Black), fixed::whole(1));
    }

    #[test]
    fn test_exchange_oversell_and_halt() {
        let mut ex = exchange();
        let mut token = token();
        let err = ex
            .sell_white(&mut token, TRADER, U256::ZERO, fixed::whole(1))
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InsufficientPosition { .. }));

        ex.halt(true);
        assert_eq!(ex.current_white_price(), Err(ExchangeError::Halted));
        assert!(ex.trades().is_empty());
    }

    #[test]
    fn test_exchange_unpaid_buy_takes_no_position() {
        let mut ex = exchange();
        let mut token = MemoryToken::new();
        token.mint(TRADER, fixed::whole(1));

        let err = ex
            .buy_white(&mut token, TRADER, fixed::whole(10), fixed::whole(5))
            .unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::Settlement(TokenError::InsufficientBalance { .. })
        ));
        assert_eq!(ex.position(Outcome::White), U256::ZERO);
        assert!(ex.trades().is_empty());
        assert_eq!(token.balance_of(TRADER), fixed::whole(1));
    }
}
