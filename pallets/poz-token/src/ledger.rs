//! Balance and allowance mutators. Every entry point validates before it writes.

use crate::{
    types::{FeeSplit, InitParams, LedgerSnapshot, PolicyState, BPS_DENOMINATOR},
    Allowances, Balances, Config, Error, Event, Initialized, Locked, Pallet, Policy, PriceFloor,
    TotalSupply, Whitelisted, LOG_TARGET,
};
use codec::Decode;
use frame_support::{dispatch::DispatchResult, ensure, traits::Get};
use sp_runtime::{
    traits::{AccountIdConversion, TrailingZeroInput},
    DispatchError, FixedU128,
};
use sp_std::{collections::btree_set::BTreeSet, prelude::*};

/// Allowance value that is never consumed by `transfer_from`.
pub const UNLIMITED_ALLOWANCE: u128 = u128::MAX;

impl<T: Config> Pallet<T> {
    /// The all-zero account, the ledger's null address.
    pub fn zero_account() -> Option<T::AccountId> {
        T::AccountId::decode(&mut TrailingZeroInput::zeroes()).ok()
    }

    pub(crate) fn ensure_not_zero(who: &T::AccountId) -> DispatchResult {
        ensure!(Self::zero_account().as_ref() != Some(who), Error::<T>::ZeroAddress);
        Ok(())
    }

    pub(crate) fn ensure_rate(rate: u32) -> DispatchResult {
        ensure!(rate <= BPS_DENOMINATOR, Error::<T>::RateTooHigh);
        Ok(())
    }

    /// Account the token itself is known by, e.g. when ordering pair reserves.
    pub fn token_account() -> T::AccountId {
        T::PalletId::get().into_account_truncating()
    }

    pub(crate) fn current_policy() -> Result<PolicyState<T::AccountId>, DispatchError> {
        Policy::<T>::get().ok_or_else(|| Error::<T>::NotInitialized.into())
    }

    /// Quote the fee split for a transfer without moving anything.
    pub fn compute_split(
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> Result<FeeSplit, DispatchError> {
        let policy = Self::current_policy()?;
        let exempt = Whitelisted::<T>::get(from) || Whitelisted::<T>::get(to);
        Ok(policy.split(amount, exempt))
    }

    /// Supply held outside locked wallets.
    pub fn circulating_supply() -> u128 {
        Locked::<T>::iter_keys()
            .fold(TotalSupply::<T>::get(), |acc, who| {
                acc.saturating_sub(Balances::<T>::get(&who))
            })
    }

    fn credit(who: &T::AccountId, amount: u128) -> DispatchResult {
        Balances::<T>::try_mutate(who, |balance| -> DispatchResult {
            *balance = balance.checked_add(amount).ok_or(Error::<T>::Overflow)?;
            Ok(())
        })
    }

    /// Move `amount` from `from` to `to`, taking the transfer fee. Returns what `to` received.
    pub fn do_transfer(
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> Result<u128, DispatchError> {
        Self::ensure_not_zero(from)?;
        Self::ensure_not_zero(to)?;
        let policy = Self::current_policy()?;

        let balance = Balances::<T>::get(from);
        ensure!(balance >= amount, Error::<T>::InsufficientBalance);

        let exempt = Whitelisted::<T>::get(from) || Whitelisted::<T>::get(to);
        let split = policy.split(amount, exempt);

        Balances::<T>::insert(from, balance - amount);
        Self::credit(to, split.net)?;
        Self::deposit_event(Event::Transfer {
            from: from.clone(),
            to: to.clone(),
            amount: split.net,
        });

        for (reserve, leg) in policy.fee_routes(&split) {
            Self::credit(&reserve, leg)?;
            log::debug!(target: LOG_TARGET, "routed fee {} from {:?} to {:?}", leg, from, reserve);
            Self::deposit_event(Event::Transfer { from: from.clone(), to: reserve, amount: leg });
        }

        Ok(split.net)
    }

    /// `do_transfer` on behalf of `from`, consuming `spender`'s allowance.
    pub fn do_transfer_from(
        spender: &T::AccountId,
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> Result<u128, DispatchError> {
        Self::ensure_not_zero(from)?;
        Self::ensure_not_zero(to)?;

        let allowance = Allowances::<T>::get(from, spender);
        ensure!(allowance >= amount, Error::<T>::InsufficientAllowance);

        let net = Self::do_transfer(from, to, amount)?;

        if allowance != UNLIMITED_ALLOWANCE {
            Allowances::<T>::insert(from, spender, allowance - amount);
        }
        Ok(net)
    }

    /// Fee-free internal move, used by the stabilizer.
    pub(crate) fn move_untaxed(
        from: &T::AccountId,
        to: &T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        let balance = Balances::<T>::get(from);
        ensure!(balance >= amount, Error::<T>::InsufficientBalance);
        Balances::<T>::insert(from, balance - amount);
        Self::credit(to, amount)?;
        Self::deposit_event(Event::Transfer { from: from.clone(), to: to.clone(), amount });
        Ok(())
    }

    pub fn do_approve(
        owner: &T::AccountId,
        spender: &T::AccountId,
        amount: u128,
    ) -> DispatchResult {
        Self::ensure_not_zero(owner)?;
        Self::ensure_not_zero(spender)?;
        Allowances::<T>::insert(owner, spender, amount);
        Self::deposit_event(Event::Approval {
            owner: owner.clone(),
            spender: spender.clone(),
            amount,
        });
        Ok(())
    }

    /// Validate `params` completely, then mint and store the policy.
    pub fn do_initialize(params: InitParams<T::AccountId>) -> DispatchResult {
        ensure!(!Initialized::<T>::get(), Error::<T>::AlreadyInitialized);

        Self::ensure_not_zero(&params.treasury)?;
        Self::ensure_not_zero(&params.owner)?;
        Self::ensure_not_zero(&params.mint_recipient)?;
        for reserve in [&params.backing_reserve, &params.emission_reserve].into_iter().flatten() {
            Self::ensure_not_zero(reserve)?;
        }
        Self::ensure_rate(params.transfer_fee_rate)?;
        Self::ensure_rate(params.backing_reserve_rate_complement)?;
        Self::ensure_rate(params.emission_rate_complement)?;

        let supply = params.supply.unwrap_or_else(T::InitialSupply::get);
        let policy = PolicyState {
            owner: params.owner.clone(),
            transfer_fee_rate: params.transfer_fee_rate,
            backing_reserve_rate: BPS_DENOMINATOR - params.backing_reserve_rate_complement,
            emission_rate: BPS_DENOMINATOR - params.emission_rate_complement,
            treasury: params.treasury.clone(),
            backing_reserve: params.backing_reserve,
            emission_reserve: params.emission_reserve,
            stable_token: None,
            uniswap_pair: None,
            rift: None,
        };

        Self::credit(&params.mint_recipient, supply)?;
        TotalSupply::<T>::mutate(|total| *total = total.saturating_add(supply));
        Policy::<T>::put(policy);
        Initialized::<T>::put(true);

        log::info!(
            target: LOG_TARGET,
            "initialized: owner {:?}, treasury {:?}, {} minted to {:?}",
            params.owner,
            params.treasury,
            supply,
            params.mint_recipient
        );
        Self::deposit_event(Event::Initialized {
            owner: params.owner,
            treasury: params.treasury,
            mint_recipient: params.mint_recipient,
            supply,
        });
        Ok(())
    }

    /// Capture the full ledger state.
    pub fn export_snapshot() -> LedgerSnapshot<T::AccountId> {
        LedgerSnapshot {
            total_supply: TotalSupply::<T>::get(),
            balances: Balances::<T>::iter().collect(),
            allowances: Allowances::<T>::iter().collect(),
            policy: Policy::<T>::get(),
            locked: Locked::<T>::iter_keys().collect(),
            whitelisted: Whitelisted::<T>::iter_keys().collect(),
            price_floor: PriceFloor::<T>::get().into_inner(),
        }
    }

    /// Validate a policy the way `initialize` and the setters would.
    fn ensure_valid_policy(policy: &PolicyState<T::AccountId>) -> DispatchResult {
        Self::ensure_not_zero(&policy.owner)?;
        Self::ensure_not_zero(&policy.treasury)?;
        let optional = [
            &policy.backing_reserve,
            &policy.emission_reserve,
            &policy.stable_token,
            &policy.uniswap_pair,
            &policy.rift,
        ];
        for who in optional.into_iter().flatten() {
            Self::ensure_not_zero(who)?;
        }
        Self::ensure_rate(policy.transfer_fee_rate)?;
        Self::ensure_rate(policy.backing_reserve_rate)?;
        Self::ensure_rate(policy.emission_rate)
    }

    /// Rebuild storage from a snapshot. Only valid on empty storage.
    ///
    /// Every account may appear at most once per list, and the balances must add up
    /// to the total supply.
    pub fn restore_snapshot(snapshot: LedgerSnapshot<T::AccountId>) -> DispatchResult {
        ensure!(!Initialized::<T>::get(), Error::<T>::AlreadyInitialized);

        let held = snapshot
            .balances
            .iter()
            .try_fold(0u128, |acc, (_, balance)| acc.checked_add(*balance))
            .ok_or(Error::<T>::Overflow)?;
        ensure!(held == snapshot.total_supply, Error::<T>::InconsistentSnapshot);

        let holders: BTreeSet<_> = snapshot.balances.iter().map(|(who, _)| who).collect();
        let approvals: BTreeSet<_> =
            snapshot.allowances.iter().map(|(owner, spender, _)| (owner, spender)).collect();
        let locked: BTreeSet<_> = snapshot.locked.iter().collect();
        let whitelisted: BTreeSet<_> = snapshot.whitelisted.iter().collect();
        ensure!(
            holders.len() == snapshot.balances.len()
                && approvals.len() == snapshot.allowances.len()
                && locked.len() == snapshot.locked.len()
                && whitelisted.len() == snapshot.whitelisted.len(),
            Error::<T>::InconsistentSnapshot
        );

        if let Some(policy) = &snapshot.policy {
            Self::ensure_valid_policy(policy)?;
        }

        for (who, balance) in snapshot.balances {
            Balances::<T>::insert(who, balance);
        }
        for (owner, spender, amount) in snapshot.allowances {
            Allowances::<T>::insert(owner, spender, amount);
        }
        for who in snapshot.locked {
            Locked::<T>::insert(who, true);
        }
        for who in snapshot.whitelisted {
            Whitelisted::<T>::insert(who, true);
        }
        TotalSupply::<T>::put(snapshot.total_supply);
        PriceFloor::<T>::put(FixedU128::from_inner(snapshot.price_floor));
        if let Some(policy) = snapshot.policy {
            Policy::<T>::put(policy);
            Initialized::<T>::put(true);
        }
        Ok(())
    }
}
