use codec::{Decode, DecodeWithMemTracking, Encode, MaxEncodedLen};
use scale_info::TypeInfo;
use serde::{Deserialize, Serialize};
use sp_runtime::RuntimeDebug;
use sp_std::prelude::*;

/// 10_000 basis points == 100%.
pub const BPS_DENOMINATOR: u32 = 10_000;

/// Supply minted by the constructor-style setup: 16 million POZ at 18 decimals.
pub const CONSTRUCTOR_SUPPLY: u128 = 16_000_000 * 1_000_000_000_000_000_000;

/// Direction of the swap that preceded a stabilization call.
#[derive(
    Clone,
    Copy,
    Encode,
    Decode,
    DecodeWithMemTracking,
    PartialEq,
    Eq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
    Serialize,
    Deserialize,
)]
pub enum TradeDirection {
    /// POZ went into the pool, price moved down.
    Sell,
    /// POZ left the pool, price moved up.
    Buy,
}

/// Owner-controlled economics of the token.
///
/// Addresses left as `None` are not configured yet. Fee legs that would route to an
/// unconfigured reserve fall back to the treasury.
#[derive(
    Clone,
    Encode,
    Decode,
    PartialEq,
    Eq,
    RuntimeDebug,
    TypeInfo,
    MaxEncodedLen,
    Serialize,
    Deserialize,
)]
pub struct PolicyState<AccountId> {
    pub owner: AccountId,
    /// Share of every taxed transfer taken as fee, in bps.
    pub transfer_fee_rate: u32,
    /// Share of the fee routed to the backing reserve, in bps. The rest goes to emission.
    pub backing_reserve_rate: u32,
    /// Share of a buy-side price gain the stabilizer locks into the floor, in bps.
    pub emission_rate: u32,
    pub treasury: AccountId,
    pub backing_reserve: Option<AccountId>,
    pub emission_reserve: Option<AccountId>,
    pub stable_token: Option<AccountId>,
    pub uniswap_pair: Option<AccountId>,
    /// Operator allowed to call `dynamic_adjustment`.
    pub rift: Option<AccountId>,
}

/// Arguments of the one-shot initializer.
///
/// Rates are passed as complements: the stored rate is `10_000 - complement`.
#[derive(
    Clone,
    Encode,
    Decode,
    DecodeWithMemTracking,
    PartialEq,
    Eq,
    RuntimeDebug,
    TypeInfo,
    Serialize,
    Deserialize,
)]
pub struct InitParams<AccountId> {
    pub transfer_fee_rate: u32,
    pub backing_reserve: Option<AccountId>,
    pub backing_reserve_rate_complement: u32,
    pub emission_reserve: Option<AccountId>,
    pub emission_rate_complement: u32,
    pub owner: AccountId,
    pub mint_recipient: AccountId,
    pub treasury: AccountId,
    /// Amount to mint. `None` mints `Config::InitialSupply`.
    pub supply: Option<u128>,
}

impl<AccountId: Clone> InitParams<AccountId> {
    /// Constructor-style setup: no reserves, the treasury holds [`CONSTRUCTOR_SUPPLY`]
    /// and collects every fee.
    pub fn constructor(owner: AccountId, treasury: AccountId, transfer_fee_rate: u32) -> Self {
        Self {
            transfer_fee_rate,
            backing_reserve: None,
            backing_reserve_rate_complement: 0,
            emission_reserve: None,
            emission_rate_complement: 0,
            owner,
            mint_recipient: treasury.clone(),
            treasury,
            supply: Some(CONSTRUCTOR_SUPPLY),
        }
    }
}

/// Outcome of applying the fee policy to one transfer.
#[derive(Clone, Copy, Default, PartialEq, Eq, RuntimeDebug)]
pub struct FeeSplit {
    /// Amount credited to the recipient.
    pub net: u128,
    pub to_treasury: u128,
    pub to_backing_reserve: u128,
    pub to_emission_reserve: u128,
}

impl FeeSplit {
    pub fn fee(&self) -> u128 {
        self.to_treasury
            .saturating_add(self.to_backing_reserve)
            .saturating_add(self.to_emission_reserve)
    }
}

/// Everything needed to rebuild a ledger exactly.
#[derive(
    Clone, Encode, Decode, PartialEq, Eq, RuntimeDebug, TypeInfo, Serialize, Deserialize,
)]
pub struct LedgerSnapshot<AccountId> {
    pub total_supply: u128,
    pub balances: Vec<(AccountId, u128)>,
    /// `(owner, spender, amount)`
    pub allowances: Vec<(AccountId, AccountId, u128)>,
    pub policy: Option<PolicyState<AccountId>>,
    pub locked: Vec<AccountId>,
    pub whitelisted: Vec<AccountId>,
    /// Raw `FixedU128` inner value of the stabilizer floor.
    pub price_floor: u128,
}
