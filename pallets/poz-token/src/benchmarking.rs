//! Benchmarking setup for pallet-poz-token

use super::*;

#[allow(unused)]
use crate::Pallet as PozToken;
use frame_benchmarking::v2::*;
use frame_system::RawOrigin;

/// Put a fully routed policy owned by `owner` in place, whatever genesis did.
fn set_up_policy<T: Config>(owner: &T::AccountId) {
    let policy = PolicyState {
        owner: owner.clone(),
        transfer_fee_rate: 300,
        backing_reserve_rate: 5_000,
        emission_rate: BPS_DENOMINATOR,
        treasury: account("treasury", 0, 0),
        backing_reserve: Some(account("backing", 0, 0)),
        emission_reserve: Some(account("emission", 0, 0)),
        stable_token: None,
        uniswap_pair: None,
        rift: None,
    };
    Policy::<T>::put(policy);
    Initialized::<T>::put(true);
}

fn fund<T: Config>(who: &T::AccountId, amount: u128) {
    Balances::<T>::insert(who, amount);
    TotalSupply::<T>::mutate(|total| *total = total.saturating_add(amount));
}

#[benchmarks]
mod benchmarks {
    use super::*;

    // Taxed, with both fee legs routed to reserves
    #[benchmark]
    fn transfer() {
        let caller: T::AccountId = whitelisted_caller();
        let recipient: T::AccountId = account("recipient", 0, 0);
        set_up_policy::<T>(&account("owner", 0, 0));
        fund::<T>(&caller, 10_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 970_000);
    }

    #[benchmark]
    fn transfer_from() {
        let spender: T::AccountId = whitelisted_caller();
        let holder: T::AccountId = account("holder", 0, 0);
        let recipient: T::AccountId = account("recipient", 0, 0);
        set_up_policy::<T>(&account("owner", 0, 0));
        fund::<T>(&holder, 10_000_000);
        Allowances::<T>::insert(&holder, &spender, 5_000_000);

        #[extrinsic_call]
        _(RawOrigin::Signed(spender.clone()), holder.clone(), recipient.clone(), 1_000_000);

        assert_eq!(Balances::<T>::get(&recipient), 970_000);
        assert_eq!(Allowances::<T>::get(&holder, &spender), 4_000_000);
    }

    #[benchmark]
    fn approve() {
        let caller: T::AccountId = whitelisted_caller();
        let spender: T::AccountId = account("spender", 0, 0);

        #[extrinsic_call]
        _(RawOrigin::Signed(caller.clone()), spender.clone(), 1_000_000);

        assert_eq!(Allowances::<T>::get(&caller, &spender), 1_000_000);
    }

    #[benchmark]
    fn initialize() {
        Policy::<T>::kill();
        Initialized::<T>::kill();
        let owner: T::AccountId = account("owner", 0, 0);
        let params = InitParams {
            transfer_fee_rate: 300,
            backing_reserve: Some(account("backing", 0, 0)),
            backing_reserve_rate_complement: 5_000,
            emission_reserve: Some(account("emission", 0, 0)),
            emission_rate_complement: 0,
            owner: owner.clone(),
            mint_recipient: account("vault", 0, 0),
            treasury: account("treasury", 0, 0),
            supply: None,
        };
        let origin = T::InitializeOrigin::try_successful_origin().expect("Initialize origin");

        #[extrinsic_call]
        _(origin as T::RuntimeOrigin, params);

        assert_eq!(Initialized::<T>::get(), true);
        assert_eq!(Policy::<T>::get().map(|p| p.owner), Some(owner));
    }

    // The heaviest policy setter: address and rate together
    #[benchmark]
    fn set_policy() {
        let owner: T::AccountId = whitelisted_caller();
        let reserve: T::AccountId = account("new-backing", 0, 0);
        set_up_policy::<T>(&owner);

        #[extrinsic_call]
        set_backing_reserve(RawOrigin::Signed(owner), reserve.clone(), 2_500);

        let policy = Policy::<T>::get().expect("policy set up");
        assert_eq!(policy.backing_reserve, Some(reserve));
        assert_eq!(policy.backing_reserve_rate, 2_500);
    }

    #[benchmark]
    fn set_address_flag() {
        let owner: T::AccountId = whitelisted_caller();
        let vault: T::AccountId = account("vault", 0, 0);
        set_up_policy::<T>(&owner);

        #[extrinsic_call]
        set_locked_address(RawOrigin::Signed(owner), vault.clone(), true);

        assert_eq!(Locked::<T>::get(&vault), true);
    }

    impl_benchmark_test_suite!(PozToken, crate::mock::uninitialized_ext(), crate::mock::Test);
}
