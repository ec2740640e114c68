#![cfg_attr(not(feature = "std"), no_std)]
// Getters and the pallet-level RuntimeEvent are deprecated upstream but still the house style here
#![allow(deprecated)]
#![allow(clippy::let_unit_value)]

//! # PozToken pallet
//!
//! Fee-on-transfer token ledger. Every taxed transfer pays `transfer_fee_rate` of the
//! amount, split between a backing reserve and an emission reserve (or the treasury
//! when those are not configured). Whitelisted accounts never pay the fee. Locked
//! accounts are ordinary holders that are left out of the circulating supply.
//!
//! After each swap on the token's AMM pair, the rift operator calls
//! `dynamic_adjustment` so the pool price never falls below the floor the
//! stabilizer keeps (see [`stabilizer`]).

use frame_support::{
    dispatch::DispatchResult, ensure, pallet_prelude::*, traits::EnsureOrigin, PalletId,
};
use frame_system::{ensure_signed, pallet_prelude::*};
use sp_runtime::FixedU128;
use sp_std::prelude::*;

pub use pallet::*;

pub mod amm;
mod ledger;
pub mod policy;
pub mod stabilizer;
pub mod types;
pub mod weights;

pub use amm::AmmPair;
pub use ledger::UNLIMITED_ALLOWANCE;
pub use types::{
    FeeSplit, InitParams, LedgerSnapshot, PolicyState, TradeDirection, BPS_DENOMINATOR,
    CONSTRUCTOR_SUPPLY,
};
pub use weights::WeightInfo;

#[cfg(test)]
mod mock;


#[cfg(feature = "runtime-benchmarks")]
mod benchmarking;

pub(crate) const LOG_TARGET: &str = "pallet-poz-token";

/// The current storage version.
const STORAGE_VERSION: StorageVersion = StorageVersion::new(1);

pub const TOKEN_NAME: &[u8] = b"PozToken";
pub const TOKEN_SYMBOL: &[u8] = b"POZ";
pub const DECIMALS: u8 = 18;

#[frame_support::pallet]
pub mod pallet {
    use super::*;

    #[pallet::config]
    pub trait Config: frame_system::Config {
        type RuntimeEvent: From<Event<Self>> + IsType<<Self as frame_system::Config>::RuntimeEvent>;
        /// Who may run the one-shot `initialize`.
        type InitializeOrigin: EnsureOrigin<Self::RuntimeOrigin>;
        /// The pair the token trades against.
        type Amm: AmmPair<Self::AccountId>;
        /// Derives the token's own account, which orders the pair's reserves.
        #[pallet::constant]
        type PalletId: Get<PalletId>;
        /// Minted to the mint recipient on initialization.
        #[pallet::constant]
        type InitialSupply: Get<u128>;
        type WeightInfo: WeightInfo;
    }

    #[pallet::pallet]
    #[pallet::storage_version(STORAGE_VERSION)]
    pub struct Pallet<T>(_);

    /// Total token supply
    #[pallet::storage]
    #[pallet::getter(fn total_supply)]
    pub type TotalSupply<T> = StorageValue<_, u128, ValueQuery>;

    /// Account balances. Entries are never removed, a zero balance stays.
    #[pallet::storage]
    #[pallet::getter(fn balance_of)]
    pub type Balances<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, u128, ValueQuery>;

    /// owner -> spender -> remaining allowance
    #[pallet::storage]
    #[pallet::getter(fn allowance)]
    pub type Allowances<T: Config> = StorageDoubleMap<
        _,
        Blake2_128Concat,
        T::AccountId,
        Blake2_128Concat,
        T::AccountId,
        u128,
        ValueQuery,
    >;

    #[pallet::storage]
    #[pallet::getter(fn policy)]
    pub type Policy<T: Config> = StorageValue<_, PolicyState<T::AccountId>, OptionQuery>;

    /// Set once by `initialize` (or genesis), never cleared.
    #[pallet::storage]
    #[pallet::getter(fn is_initialized)]
    pub type Initialized<T> = StorageValue<_, bool, ValueQuery>;

    /// Accounts excluded from the circulating supply
    #[pallet::storage]
    #[pallet::getter(fn is_locked)]
    pub type Locked<T: Config> = StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Accounts exempt from the transfer fee, as sender or recipient
    #[pallet::storage]
    #[pallet::getter(fn is_whitelisted)]
    pub type Whitelisted<T: Config> =
        StorageMap<_, Blake2_128Concat, T::AccountId, bool, ValueQuery>;

    /// Stabilizer floor, stable per POZ. Zero until the first adjustment.
    #[pallet::storage]
    #[pallet::getter(fn price_floor)]
    pub type PriceFloor<T> = StorageValue<_, FixedU128, ValueQuery>;

    #[pallet::event]
    #[pallet::generate_deposit(pub(super) fn deposit_event)]
    pub enum Event<T: Config> {
        /// Tokens moved. Fee legs are reported as their own transfers.
        Transfer { from: T::AccountId, to: T::AccountId, amount: u128 },
        Approval { owner: T::AccountId, spender: T::AccountId, amount: u128 },
        /// Ledger initialized and the supply minted
        Initialized {
            owner: T::AccountId,
            treasury: T::AccountId,
            mint_recipient: T::AccountId,
            supply: u128,
        },
        TransferFeeRateUpdated { rate: u32 },
        TreasuryUpdated { treasury: T::AccountId },
        BackingReserveAddressUpdated { backing_reserve: T::AccountId },
        BackingReserveRateUpdated { rate: u32 },
        EmissionAddressUpdated { emission_reserve: T::AccountId },
        EmissionRateUpdated { rate: u32 },
        StableTokenAddressUpdated { stable_token: T::AccountId },
        UniswapPairUpdated { pair: T::AccountId },
        RiftUpdated { rift: T::AccountId },
        LockedAddressUpdated { account: T::AccountId, active: bool },
        WhitelistUpdated { account: T::AccountId, active: bool },
        OwnershipTransferred { previous_owner: T::AccountId, new_owner: T::AccountId },
        /// Stabilizer ran after a swap
        PriceAdjusted {
            direction: TradeDirection,
            price: FixedU128,
            price_after: FixedU128,
            floor: FixedU128,
            absorbed: u128,
        },
    }

    #[pallet::error]
    pub enum Error<T> {
        /// The null account was given where a real one is needed
        ZeroAddress,
        InsufficientBalance,
        InsufficientAllowance,
        /// Rate above 10_000 bps
        RateTooHigh,
        /// Caller is not the owner, or not the rift operator
        Unauthorized,
        /// The AMM pair could not be read or synced
        AdjustmentUnavailable,
        NotInitialized,
        AlreadyInitialized,
        Overflow,
        /// Snapshot balances do not add up to its total supply
        InconsistentSnapshot,
    }

    #[pallet::call]
    impl<T: Config> Pallet<T> {
        #[pallet::call_index(0)]
        #[pallet::weight(T::WeightInfo::transfer())]
        pub fn transfer(origin: OriginFor<T>, to: T::AccountId, amount: u128) -> DispatchResult {
            let sender = ensure_signed(origin)?;
            Self::do_transfer(&sender, &to, amount).map(|_| ())
        }

        #[pallet::call_index(1)]
        #[pallet::weight(T::WeightInfo::transfer_from())]
        pub fn transfer_from(
            origin: OriginFor<T>,
            from: T::AccountId,
            to: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let spender = ensure_signed(origin)?;
            Self::do_transfer_from(&spender, &from, &to, amount).map(|_| ())
        }

        #[pallet::call_index(2)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn approve(
            origin: OriginFor<T>,
            spender: T::AccountId,
            amount: u128,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            Self::do_approve(&owner, &spender, amount)
        }

        #[pallet::call_index(3)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn increase_allowance(
            origin: OriginFor<T>,
            spender: T::AccountId,
            added: u128,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            let current = Allowances::<T>::get(&owner, &spender);
            let amount = current.checked_add(added).ok_or(Error::<T>::Overflow)?;
            Self::do_approve(&owner, &spender, amount)
        }

        #[pallet::call_index(4)]
        #[pallet::weight(T::WeightInfo::approve())]
        pub fn decrease_allowance(
            origin: OriginFor<T>,
            spender: T::AccountId,
            subtracted: u128,
        ) -> DispatchResult {
            let owner = ensure_signed(origin)?;
            let current = Allowances::<T>::get(&owner, &spender);
            let amount =
                current.checked_sub(subtracted).ok_or(Error::<T>::InsufficientAllowance)?;
            Self::do_approve(&owner, &spender, amount)
        }

        /// One-shot initializer for ledgers not set up at genesis.
        #[pallet::call_index(5)]
        #[pallet::weight(T::WeightInfo::initialize())]
        pub fn initialize(
            origin: OriginFor<T>,
            params: InitParams<T::AccountId>,
        ) -> DispatchResult {
            T::InitializeOrigin::ensure_origin(origin)?;
            Self::do_initialize(params)
        }

        #[pallet::call_index(6)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_transfer_fee_rate(origin: OriginFor<T>, rate: u32) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_rate(rate)?;
                policy.transfer_fee_rate = rate;
                Ok(())
            })?;
            log::info!(target: LOG_TARGET, "transfer fee rate set to {} bps", rate);
            Self::deposit_event(Event::TransferFeeRateUpdated { rate });
            Ok(())
        }

        #[pallet::call_index(7)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_treasury(origin: OriginFor<T>, treasury: T::AccountId) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&treasury)?;
                policy.treasury = treasury.clone();
                Ok(())
            })?;
            log::info!(target: LOG_TARGET, "treasury set to {:?}", treasury);
            Self::deposit_event(Event::TreasuryUpdated { treasury });
            Ok(())
        }

        #[pallet::call_index(8)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_backing_reserve_address(
            origin: OriginFor<T>,
            backing_reserve: T::AccountId,
        ) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&backing_reserve)?;
                policy.backing_reserve = Some(backing_reserve.clone());
                Ok(())
            })?;
            Self::deposit_event(Event::BackingReserveAddressUpdated { backing_reserve });
            Ok(())
        }

        #[pallet::call_index(9)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_backing_reserve_rate(origin: OriginFor<T>, rate: u32) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_rate(rate)?;
                policy.backing_reserve_rate = rate;
                Ok(())
            })?;
            Self::deposit_event(Event::BackingReserveRateUpdated { rate });
            Ok(())
        }

        /// Address and rate in one call.
        #[pallet::call_index(10)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_backing_reserve(
            origin: OriginFor<T>,
            backing_reserve: T::AccountId,
            rate: u32,
        ) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&backing_reserve)?;
                Self::ensure_rate(rate)?;
                policy.backing_reserve = Some(backing_reserve.clone());
                policy.backing_reserve_rate = rate;
                Ok(())
            })?;
            log::info!(
                target: LOG_TARGET,
                "backing reserve set to {:?} at {} bps",
                backing_reserve,
                rate
            );
            Self::deposit_event(Event::BackingReserveAddressUpdated { backing_reserve });
            Self::deposit_event(Event::BackingReserveRateUpdated { rate });
            Ok(())
        }

        #[pallet::call_index(11)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_emission_address(
            origin: OriginFor<T>,
            emission_reserve: T::AccountId,
        ) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&emission_reserve)?;
                policy.emission_reserve = Some(emission_reserve.clone());
                Ok(())
            })?;
            Self::deposit_event(Event::EmissionAddressUpdated { emission_reserve });
            Ok(())
        }

        #[pallet::call_index(12)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_emission_rate(origin: OriginFor<T>, rate: u32) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_rate(rate)?;
                policy.emission_rate = rate;
                Ok(())
            })?;
            Self::deposit_event(Event::EmissionRateUpdated { rate });
            Ok(())
        }

        /// Address and rate in one call.
        #[pallet::call_index(13)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_emission_reserve(
            origin: OriginFor<T>,
            emission_reserve: T::AccountId,
            rate: u32,
        ) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&emission_reserve)?;
                Self::ensure_rate(rate)?;
                policy.emission_reserve = Some(emission_reserve.clone());
                policy.emission_rate = rate;
                Ok(())
            })?;
            log::info!(
                target: LOG_TARGET,
                "emission reserve set to {:?} at {} bps",
                emission_reserve,
                rate
            );
            Self::deposit_event(Event::EmissionAddressUpdated { emission_reserve });
            Self::deposit_event(Event::EmissionRateUpdated { rate });
            Ok(())
        }

        #[pallet::call_index(14)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_stable_token_address(
            origin: OriginFor<T>,
            stable_token: T::AccountId,
        ) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&stable_token)?;
                policy.stable_token = Some(stable_token.clone());
                Ok(())
            })?;
            Self::deposit_event(Event::StableTokenAddressUpdated { stable_token });
            Ok(())
        }

        #[pallet::call_index(15)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_uniswap_pair(origin: OriginFor<T>, pair: T::AccountId) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&pair)?;
                policy.uniswap_pair = Some(pair.clone());
                Ok(())
            })?;
            log::info!(target: LOG_TARGET, "uniswap pair set to {:?}", pair);
            Self::deposit_event(Event::UniswapPairUpdated { pair });
            Ok(())
        }

        /// Look the POZ/stable pair up on the AMM and store it.
        #[pallet::call_index(16)]
        #[pallet::weight(T::WeightInfo::discover_uniswap_pair())]
        pub fn discover_uniswap_pair(origin: OriginFor<T>) -> DispatchResult {
            let (_, mut policy) = Self::ensure_owner(origin)?;
            let stable = policy.stable_token.clone().ok_or(Error::<T>::AdjustmentUnavailable)?;
            let pair = T::Amm::get_pair(&Self::token_account(), &stable)
                .ok_or(Error::<T>::AdjustmentUnavailable)?;
            Self::ensure_not_zero(&pair)?;

            policy.uniswap_pair = Some(pair.clone());
            Policy::<T>::put(policy);
            log::info!(target: LOG_TARGET, "discovered pair {:?}", pair);
            Self::deposit_event(Event::UniswapPairUpdated { pair });
            Ok(())
        }

        #[pallet::call_index(17)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn set_rift(origin: OriginFor<T>, rift: T::AccountId) -> DispatchResult {
            Self::mutate_policy(origin, |policy| {
                Self::ensure_not_zero(&rift)?;
                policy.rift = Some(rift.clone());
                Ok(())
            })?;
            log::info!(target: LOG_TARGET, "rift operator set to {:?}", rift);
            Self::deposit_event(Event::RiftUpdated { rift });
            Ok(())
        }

        #[pallet::call_index(18)]
        #[pallet::weight(T::WeightInfo::set_address_flag())]
        pub fn set_locked_address(
            origin: OriginFor<T>,
            account: T::AccountId,
            active: bool,
        ) -> DispatchResult {
            Self::ensure_owner(origin)?;
            Self::ensure_not_zero(&account)?;
            if active {
                Locked::<T>::insert(&account, true);
            } else {
                Locked::<T>::remove(&account);
            }
            Self::deposit_event(Event::LockedAddressUpdated { account, active });
            Ok(())
        }

        #[pallet::call_index(19)]
        #[pallet::weight(T::WeightInfo::set_address_flag())]
        pub fn set_whitelist(
            origin: OriginFor<T>,
            account: T::AccountId,
            active: bool,
        ) -> DispatchResult {
            Self::ensure_owner(origin)?;
            Self::ensure_not_zero(&account)?;
            if active {
                Whitelisted::<T>::insert(&account, true);
            } else {
                Whitelisted::<T>::remove(&account);
            }
            Self::deposit_event(Event::WhitelistUpdated { account, active });
            Ok(())
        }

        #[pallet::call_index(20)]
        #[pallet::weight(T::WeightInfo::set_policy())]
        pub fn transfer_ownership(origin: OriginFor<T>, new_owner: T::AccountId) -> DispatchResult {
            let (previous_owner, mut policy) = Self::ensure_owner(origin)?;
            Self::ensure_not_zero(&new_owner)?;
            policy.owner = new_owner.clone();
            Policy::<T>::put(policy);
            log::info!(target: LOG_TARGET, "ownership {:?} -> {:?}", previous_owner, new_owner);
            Self::deposit_event(Event::OwnershipTransferred { previous_owner, new_owner });
            Ok(())
        }

        /// Run the stabilizer after a swap on the pair. Rift operator only.
        #[pallet::call_index(21)]
        #[pallet::weight(T::WeightInfo::dynamic_adjustment())]
        pub fn dynamic_adjustment(
            origin: OriginFor<T>,
            direction: TradeDirection,
        ) -> DispatchResult {
            let caller = ensure_signed(origin)?;
            Self::do_dynamic_adjustment(&caller, direction)
        }
    }

    impl<T: Config> Pallet<T> {
        /// Signed origin that matches the stored owner.
        fn ensure_owner(
            origin: OriginFor<T>,
        ) -> Result<(T::AccountId, PolicyState<T::AccountId>), DispatchError> {
            let who = ensure_signed(origin)?;
            let policy = Self::current_policy()?;
            ensure!(policy.owner == who, Error::<T>::Unauthorized);
            Ok((who, policy))
        }

        /// Owner check, then `f`, then store. Nothing is written if `f` fails.
        fn mutate_policy(
            origin: OriginFor<T>,
            f: impl FnOnce(&mut PolicyState<T::AccountId>) -> DispatchResult,
        ) -> DispatchResult {
            let (_, mut policy) = Self::ensure_owner(origin)?;
            f(&mut policy)?;
            Policy::<T>::put(policy);
            Ok(())
        }
    }

    #[pallet::genesis_config]
    #[derive(frame_support::DefaultNoBound)]
    pub struct GenesisConfig<T: Config> {
        /// Initialize the ledger at genesis. `InitParams::constructor` gives the
        /// treasury-only setup.
        pub initialize: Option<InitParams<T::AccountId>>,
        /// Restore an exported ledger instead.
        pub snapshot: Option<LedgerSnapshot<T::AccountId>>,
    }

    #[pallet::genesis_build]
    impl<T: Config> BuildGenesisConfig for GenesisConfig<T> {
        fn build(&self) {
            assert!(
                self.initialize.is_none() || self.snapshot.is_none(),
                "Genesis can either initialize or restore a snapshot, not both"
            );

            if let Some(ref params) = self.initialize {
                Pallet::<T>::do_initialize(params.clone()).expect("Invalid genesis initialization");
            }

            if let Some(ref snapshot) = self.snapshot {
                Pallet::<T>::restore_snapshot(snapshot.clone()).expect("Invalid genesis snapshot");
            }
        }
    }
}
