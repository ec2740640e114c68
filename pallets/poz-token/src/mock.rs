use crate as pallet_poz_token;
use crate::{AmmPair, InitParams};
use frame_support::{derive_impl, parameter_types, PalletId};
use sp_runtime::{
    helpers_128bit::multiply_by_rational_with_rounding, traits::IdentityLookup, BuildStorage,
    DispatchError, DispatchResult, Rounding,
};
use std::cell::RefCell;

type Block = frame_system::mocking::MockBlock<Test>;

// Configure a mock runtime to test the pallet.
frame_support::construct_runtime!(
    pub enum Test {
        System: frame_system,
        PozToken: pallet_poz_token,
    }
);

#[derive_impl(frame_system::config_preludes::TestDefaultConfig)]
impl frame_system::Config for Test {
    type AccountId = u64;
    type Lookup = IdentityLookup<Self::AccountId>;
    type Block = Block;
}

pub const ZERO: u64 = 0;
pub const OWNER: u64 = 1;
pub const ALICE: u64 = 2;
pub const BOB: u64 = 3;
pub const CAROL: u64 = 4;
pub const TREASURY: u64 = 5;
pub const BACKING: u64 = 6;
pub const EMISSION: u64 = 7;
/// Mint wallet of the reserve setup
pub const VAULT1: u64 = 8;
/// Locked wallet of the reserve setup
pub const VAULT2: u64 = 9;
pub const RIFT: u64 = 10;
pub const STABLE: u64 = 100;
pub const PAIR: u64 = 200;

pub const UNIT: u128 = 1_000_000_000_000_000_000;
pub const SUPPLY: u128 = 1_000_000_000 * UNIT;

parameter_types! {
    pub const DeployerAccount: u64 = OWNER;
    pub const PozPalletId: PalletId = PalletId(*b"poz/tokn");
    pub const InitialSupply: u128 = SUPPLY;
}

pub struct EnsureDeployer;
impl frame_support::traits::EnsureOrigin<RuntimeOrigin> for EnsureDeployer {
    type Success = u64;

    fn try_origin(o: RuntimeOrigin) -> Result<Self::Success, RuntimeOrigin> {
        match o.clone().into() {
            Ok(frame_system::RawOrigin::Signed(account)) if account == DeployerAccount::get() => {
                Ok(account)
            }
            _ => Err(o),
        }
    }

    #[cfg(feature = "runtime-benchmarks")]
    fn try_successful_origin() -> Result<RuntimeOrigin, ()> {
        Ok(RuntimeOrigin::signed(DeployerAccount::get()))
    }
}

impl pallet_poz_token::Config for Test {
    type RuntimeEvent = RuntimeEvent;
    type InitializeOrigin = EnsureDeployer;
    type Amm = MockAmm;
    type PalletId = PozPalletId;
    type InitialSupply = InitialSupply;
    type WeightInfo = ();
}

/// Uniswap-V2 style pool state. The POZ side lives in the ledger as the pair's
/// balance; `token_reserve` is the pair's cached view of it, refreshed by `sync`.
#[derive(Default, Clone, Debug)]
pub struct MockPool {
    pub live: bool,
    pub token_reserve: u128,
    pub stable_reserve: u128,
    pub fail_sync: bool,
}

thread_local! {
    pub static POOL: RefCell<MockPool> = RefCell::new(MockPool::default());
}

pub struct MockAmm;

impl MockAmm {
    pub fn pool() -> MockPool {
        POOL.with(|p| p.borrow().clone())
    }

    pub fn set_offline(offline: bool) {
        POOL.with(|p| p.borrow_mut().live = !offline);
    }

    pub fn set_fail_sync(fail: bool) {
        POOL.with(|p| p.borrow_mut().fail_sync = fail);
    }

    /// Pool price in stable per POZ.
    pub fn price() -> sp_runtime::FixedU128 {
        let pool = Self::pool();
        crate::stabilizer::spot_price(pool.token_reserve, pool.stable_reserve)
            .expect("pool is funded")
    }

    fn amount_out(amount_in: u128, reserve_in: u128, reserve_out: u128) -> u128 {
        let with_fee = amount_in * 997;
        multiply_by_rational_with_rounding(
            with_fee,
            reserve_out,
            reserve_in * 1_000 + with_fee,
            Rounding::Down,
        )
        .expect("reserves fit in u128")
    }

    /// Deposit POZ from `provider` plus `stable` and open the pool.
    pub fn add_liquidity(provider: u64, tokens: u128, stable: u128) {
        PozToken::do_transfer(&provider, &PAIR, tokens).expect("provider funded");
        POOL.with(|p| {
            let mut pool = p.borrow_mut();
            pool.live = true;
            pool.stable_reserve += stable;
            pool.token_reserve = PozToken::balance_of(PAIR);
        });
    }

    /// Sell POZ for stable; the pool prices what actually arrived after the fee.
    pub fn sell(user: u64, tokens: u128) -> u128 {
        PozToken::do_transfer(&user, &PAIR, tokens).expect("seller funded");
        POOL.with(|p| {
            let mut pool = p.borrow_mut();
            let balance = PozToken::balance_of(PAIR);
            let received = balance - pool.token_reserve;
            let out = Self::amount_out(received, pool.token_reserve, pool.stable_reserve);
            pool.stable_reserve -= out;
            pool.token_reserve = balance;
            out
        })
    }

    /// Buy POZ with stable. Returns what the buyer received after the fee.
    pub fn buy(user: u64, stable: u128) -> u128 {
        let out = POOL.with(|p| {
            let pool = p.borrow();
            Self::amount_out(stable, pool.stable_reserve, pool.token_reserve)
        });
        let received = PozToken::do_transfer(&PAIR, &user, out).expect("pool funded");
        POOL.with(|p| {
            let mut pool = p.borrow_mut();
            pool.stable_reserve += stable;
            pool.token_reserve = PozToken::balance_of(PAIR);
        });
        received
    }
}

impl AmmPair<u64> for MockAmm {
    fn get_reserves(pair: &u64) -> Result<(u128, u128), DispatchError> {
        let pool = Self::pool();
        if !pool.live || *pair != PAIR {
            return Err(DispatchError::Other("pair unavailable"));
        }
        if PozToken::token_account() < STABLE {
            Ok((pool.token_reserve, pool.stable_reserve))
        } else {
            Ok((pool.stable_reserve, pool.token_reserve))
        }
    }

    fn get_pair(token_a: &u64, token_b: &u64) -> Option<u64> {
        let token = PozToken::token_account();
        let matches = (*token_a == token && *token_b == STABLE)
            || (*token_a == STABLE && *token_b == token);
        matches.then_some(PAIR)
    }

    fn sync(pair: &u64) -> DispatchResult {
        POOL.with(|p| {
            let mut pool = p.borrow_mut();
            if pool.fail_sync || *pair != PAIR {
                return Err(DispatchError::Other("sync failed"));
            }
            pool.token_reserve = PozToken::balance_of(PAIR);
            Ok(())
        })
    }
}

fn build(config: pallet_poz_token::GenesisConfig<Test>) -> sp_io::TestExternalities {
    POOL.with(|p| *p.borrow_mut() = MockPool::default());

    let mut t = frame_system::GenesisConfig::<Test>::default().build_storage().unwrap();
    config.assimilate_storage(&mut t).unwrap();

    let mut ext = sp_io::TestExternalities::new(t);
    ext.execute_with(|| System::set_block_number(1));
    ext
}

/// Constructor-style ledger: 1% fee, 16M POZ minted to and collected by the treasury.
pub fn new_test_ext() -> sp_io::TestExternalities {
    build(pallet_poz_token::GenesisConfig {
        initialize: Some(InitParams::constructor(OWNER, TREASURY, 100)),
        snapshot: None,
    })
}

/// The trading setup: 3% fee, half to backing, half to emission, full floor ratchet.
pub fn reserve_params() -> InitParams<u64> {
    InitParams {
        transfer_fee_rate: 300,
        backing_reserve: Some(BACKING),
        backing_reserve_rate_complement: 5_000,
        emission_reserve: Some(EMISSION),
        emission_rate_complement: 0,
        owner: OWNER,
        mint_recipient: VAULT1,
        treasury: TREASURY,
        supply: None,
    }
}

pub fn reserve_ext() -> sp_io::TestExternalities {
    build(pallet_poz_token::GenesisConfig { initialize: Some(reserve_params()), snapshot: None })
}

/// Nothing initialized; for exercising `initialize` itself.
pub fn uninitialized_ext() -> sp_io::TestExternalities {
    build(Default::default())
}

pub fn snapshot_ext(snapshot: crate::LedgerSnapshot<u64>) -> sp_io::TestExternalities {
    build(pallet_poz_token::GenesisConfig { initialize: None, snapshot: Some(snapshot) })
}
