//! Fee computation and reserve routing.
//!
//! Everything here is a pure function of the [`PolicyState`]; the pallet decides
//! fee exemption from the classification registry and hands the result over.

use crate::types::{FeeSplit, PolicyState, BPS_DENOMINATOR};
use sp_std::prelude::*;

/// `amount * rate_bps / 10_000`, rounded down.
///
/// Goes through a u128 quotient/remainder split so `amount` can use the full range.
pub fn bps_of(amount: u128, rate_bps: u32) -> u128 {
    let rate = u128::from(rate_bps.min(BPS_DENOMINATOR));
    let denominator = u128::from(BPS_DENOMINATOR);
    (amount / denominator) * rate + (amount % denominator) * rate / denominator
}

impl<AccountId: Clone> PolicyState<AccountId> {
    /// Split `amount` into the recipient's share and the fee legs.
    ///
    /// `exempt` is true when either side of the transfer is whitelisted.
    pub fn split(&self, amount: u128, exempt: bool) -> FeeSplit {
        if exempt || self.transfer_fee_rate == 0 {
            return FeeSplit { net: amount, ..Default::default() };
        }

        let fee = bps_of(amount, self.transfer_fee_rate);
        let backing = bps_of(fee, self.backing_reserve_rate);
        let emission = fee - backing;

        let mut split = FeeSplit { net: amount - fee, ..Default::default() };
        if self.backing_reserve.is_some() {
            split.to_backing_reserve = backing;
        } else {
            split.to_treasury += backing;
        }
        if self.emission_reserve.is_some() {
            split.to_emission_reserve = emission;
        } else {
            split.to_treasury += emission;
        }
        split
    }

    /// Nonzero fee legs paired with their destination, in routing order.
    pub fn fee_routes(&self, split: &FeeSplit) -> Vec<(AccountId, u128)> {
        let mut routes = Vec::with_capacity(3);
        if let Some(backing) = &self.backing_reserve {
            if split.to_backing_reserve > 0 {
                routes.push((backing.clone(), split.to_backing_reserve));
            }
        }
        if let Some(emission) = &self.emission_reserve {
            if split.to_emission_reserve > 0 {
                routes.push((emission.clone(), split.to_emission_reserve));
            }
        }
        if split.to_treasury > 0 {
            routes.push((self.treasury.clone(), split.to_treasury));
        }
        routes
    }

    /// Where stabilizer-absorbed POZ goes.
    pub fn absorption_target(&self) -> AccountId {
        self.backing_reserve.clone().unwrap_or_else(|| self.treasury.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn policy(fee: u32, backing_rate: u32, reserves: bool) -> PolicyState<u64> {
        PolicyState {
            owner: 1,
            transfer_fee_rate: fee,
            backing_reserve_rate: backing_rate,
            emission_rate: BPS_DENOMINATOR,
            treasury: 5,
            backing_reserve: reserves.then_some(6),
            emission_reserve: reserves.then_some(7),
            stable_token: None,
            uniswap_pair: None,
            rift: None,
        }
    }

    #[test]
    fn one_percent_of_thousand_is_ten() {
        let split = policy(100, 5_000, true).split(1_000, false);
        assert_eq!(split.net, 990);
        assert_eq!(split.to_backing_reserve, 5);
        assert_eq!(split.to_emission_reserve, 5);
        assert_eq!(split.to_treasury, 0);
    }

    #[test]
    fn emission_leg_absorbs_rounding() {
        // fee = 3, backing = floor(3 * 0.5) = 1
        let split = policy(300, 5_000, true).split(100, false);
        assert_eq!(split.net, 97);
        assert_eq!(split.to_backing_reserve, 1);
        assert_eq!(split.to_emission_reserve, 2);
    }

    #[test]
    fn fee_rounds_in_favour_of_recipient() {
        // 1% of 99 is 0.99, which floors to zero
        let split = policy(100, 5_000, true).split(99, false);
        assert_eq!(split.net, 99);
        assert_eq!(split.fee(), 0);
    }

    #[test]
    fn unconfigured_reserves_fall_back_to_treasury() {
        let p = policy(100, 2_500, false);
        let split = p.split(10_000, false);
        assert_eq!(split.net, 9_900);
        assert_eq!(split.to_treasury, 100);
        assert_eq!(p.fee_routes(&split), vec![(5, 100)]);
    }

    #[test]
    fn exempt_and_zero_rate_pass_through() {
        assert_eq!(policy(100, 5_000, true).split(1_000, true).net, 1_000);
        let zero = policy(0, 5_000, true);
        let split = zero.split(1_000, false);
        assert_eq!(split.net, 1_000);
        assert!(zero.fee_routes(&split).is_empty());
    }

    #[test]
    fn full_rate_takes_everything() {
        let split = policy(BPS_DENOMINATOR, BPS_DENOMINATOR, true).split(777, false);
        assert_eq!(split.net, 0);
        assert_eq!(split.to_backing_reserve, 777);
        assert_eq!(split.to_emission_reserve, 0);
    }

    #[test]
    fn bps_of_handles_full_range() {
        assert_eq!(bps_of(u128::MAX, BPS_DENOMINATOR), u128::MAX);
        assert_eq!(bps_of(u128::MAX, 0), 0);
        assert_eq!(bps_of(u128::MAX, 5_000), u128::MAX / 2);
    }

    proptest! {
        #[test]
        fn split_conserves_amount(
            amount in any::<u128>(),
            fee in 0u32..=BPS_DENOMINATOR,
            backing in 0u32..=BPS_DENOMINATOR,
            reserves in any::<bool>(),
        ) {
            let p = policy(fee, backing, reserves);
            let split = p.split(amount, false);
            prop_assert_eq!(split.net + split.fee(), amount);
            let routed: u128 = p.fee_routes(&split).iter().map(|(_, v)| *v).sum();
            prop_assert_eq!(routed, split.fee());
            prop_assert_eq!(split, p.split(amount, false));
        }
    }
}
