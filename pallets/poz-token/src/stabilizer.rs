//! Post-swap price stabilization.
//!
//! The stabilizer keeps a price floor in stable-per-POZ. A buy ratchets the floor
//! towards the new price by `emission_rate`. A sell that pushed the price under the
//! floor is undone by pulling the excess POZ out of the pair into the backing reserve
//! and syncing the pair, which leaves the price at or just above the floor.

use crate::{
    amm::{token_and_stable_reserves, AmmPair},
    types::{TradeDirection, BPS_DENOMINATOR},
    Config, Error, Event, Pallet, PriceFloor, LOG_TARGET,
};
use frame_support::{dispatch::DispatchResult, ensure};
use sp_runtime::{
    helpers_128bit::multiply_by_rational_with_rounding,
    traits::{Saturating, Zero},
    FixedPointNumber, FixedU128, Rounding,
};

/// Stable per POZ. `None` for an empty pool.
pub fn spot_price(token_reserve: u128, stable_reserve: u128) -> Option<FixedU128> {
    if token_reserve == 0 {
        return None;
    }
    FixedU128::checked_from_rational(stable_reserve, token_reserve)
}

/// Largest POZ reserve that still prices the pool at or above `price`.
pub fn token_reserve_at(stable_reserve: u128, price: FixedU128) -> Option<u128> {
    if price.is_zero() {
        return None;
    }
    multiply_by_rational_with_rounding(
        stable_reserve,
        FixedU128::DIV,
        price.into_inner(),
        Rounding::Down,
    )
}

/// Move `floor` towards `price` by `rate_bps` of the gap. Never moves it down.
pub fn ratchet(floor: FixedU128, price: FixedU128, rate_bps: u32) -> FixedU128 {
    if price <= floor {
        return floor;
    }
    let share = FixedU128::saturating_from_rational(rate_bps.min(BPS_DENOMINATOR), BPS_DENOMINATOR);
    floor.saturating_add(price.saturating_sub(floor).saturating_mul(share))
}

impl<T: Config> Pallet<T> {
    pub(crate) fn do_dynamic_adjustment(
        caller: &T::AccountId,
        direction: TradeDirection,
    ) -> DispatchResult {
        let policy = Self::current_policy()?;
        ensure!(policy.rift.as_ref() == Some(caller), Error::<T>::Unauthorized);

        let (pair, stable) = match (&policy.uniswap_pair, &policy.stable_token) {
            (Some(pair), Some(stable)) => (pair.clone(), stable.clone()),
            _ => return Err(Error::<T>::AdjustmentUnavailable.into()),
        };

        let reserves = T::Amm::get_reserves(&pair).map_err(|e| {
            log::warn!(target: LOG_TARGET, "reserve lookup for {:?} failed: {:?}", pair, e);
            Error::<T>::AdjustmentUnavailable
        })?;
        let (token_reserve, stable_reserve) =
            token_and_stable_reserves(&Self::token_account(), &stable, reserves);
        let price = spot_price(token_reserve, stable_reserve)
            .ok_or(Error::<T>::AdjustmentUnavailable)?;

        let floor = PriceFloor::<T>::get();
        if floor.is_zero() {
            PriceFloor::<T>::put(price);
            Self::deposit_event(Event::PriceAdjusted {
                direction,
                price,
                price_after: price,
                floor: price,
                absorbed: 0,
            });
            return Ok(());
        }

        let (price_after, new_floor, absorbed) = match direction {
            TradeDirection::Sell if price < floor => {
                let target = token_reserve_at(stable_reserve, floor)
                    .ok_or(Error::<T>::AdjustmentUnavailable)?;
                let excess = token_reserve
                    .saturating_sub(target)
                    .min(Self::balance_of(&pair));

                if excess > 0 {
                    Self::move_untaxed(&pair, &policy.absorption_target(), excess)?;
                    T::Amm::sync(&pair).map_err(|e| {
                        log::warn!(target: LOG_TARGET, "sync of {:?} failed: {:?}", pair, e);
                        Error::<T>::AdjustmentUnavailable
                    })?;
                }

                let after = spot_price(token_reserve - excess, stable_reserve)
                    .ok_or(Error::<T>::AdjustmentUnavailable)?;
                (after, floor.max(after), excess)
            }
            TradeDirection::Buy => (price, ratchet(floor, price, policy.emission_rate), 0),
            TradeDirection::Sell => (price, floor, 0),
        };

        PriceFloor::<T>::put(new_floor);
        log::debug!(
            target: LOG_TARGET,
            "{:?} adjustment: price {:?} -> {:?}, floor {:?}, absorbed {}",
            direction,
            price,
            price_after,
            new_floor,
            absorbed
        );
        Self::deposit_event(Event::PriceAdjusted {
            direction,
            price,
            price_after,
            floor: new_floor,
            absorbed,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(n: u128, d: u128) -> FixedU128 {
        FixedU128::from_rational(n, d)
    }

    #[test]
    fn spot_price_is_stable_per_token() {
        assert_eq!(spot_price(300_000, 30_000), Some(fixed(1, 10)));
        assert_eq!(spot_price(0, 30_000), None);
    }

    #[test]
    fn target_reserve_restores_floor() {
        let floor = fixed(1, 10);
        let target = token_reserve_at(29_000, floor).unwrap();
        assert_eq!(target, 290_000);
        assert!(spot_price(target, 29_000).unwrap() >= floor);
        assert_eq!(token_reserve_at(1, FixedU128::zero()), None);
    }

    #[test]
    fn target_reserve_rounds_towards_higher_price() {
        let floor = fixed(1, 3);
        let target = token_reserve_at(1_000, floor).unwrap();
        assert!(spot_price(target, 1_000).unwrap() >= floor);
    }

    #[test]
    fn ratchet_follows_emission_rate() {
        let floor = fixed(1, 10);
        let price = fixed(2, 10);
        assert_eq!(ratchet(floor, price, BPS_DENOMINATOR), price);
        assert_eq!(ratchet(floor, price, 5_000), fixed(15, 100));
        assert_eq!(ratchet(floor, price, 0), floor);
        assert_eq!(ratchet(price, floor, BPS_DENOMINATOR), price);
    }
}
