//! Weights for pallet-poz-token.
//!
//! Hand-estimated from the storage access of each call until the benchmarks in
//! `benchmarking.rs` are run on reference hardware.

#![allow(unused_parens)]
#![allow(unused_imports)]

use frame_support::{
    traits::Get,
    weights::{constants::RocksDbWeight, Weight},
};
use sp_std::marker::PhantomData;

pub trait WeightInfo {
    fn transfer() -> Weight;
    fn transfer_from() -> Weight;
    fn approve() -> Weight;
    fn initialize() -> Weight;
    fn set_policy() -> Weight;
    fn set_address_flag() -> Weight;
    fn discover_uniswap_pair() -> Weight;
    fn dynamic_adjustment() -> Weight;
}

pub struct SubstrateWeight<T>(PhantomData<T>);
impl<T: frame_system::Config> WeightInfo for SubstrateWeight<T> {
    /// Reads: Policy, Balances(from), Whitelisted x2. Writes: up to four balances.
    fn transfer() -> Weight {
        Weight::from_parts(45_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(7_u64))
            .saturating_add(T::DbWeight::get().writes(5_u64))
    }
    fn transfer_from() -> Weight {
        Weight::from_parts(52_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(8_u64))
            .saturating_add(T::DbWeight::get().writes(6_u64))
    }
    fn approve() -> Weight {
        Weight::from_parts(18_000_000, 0)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn initialize() -> Weight {
        Weight::from_parts(30_000_000, 1_489)
            .saturating_add(T::DbWeight::get().reads(3_u64))
            .saturating_add(T::DbWeight::get().writes(4_u64))
    }
    fn set_policy() -> Weight {
        Weight::from_parts(15_000_000, 1_489)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn set_address_flag() -> Weight {
        Weight::from_parts(15_000_000, 1_489)
            .saturating_add(T::DbWeight::get().reads(1_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    fn discover_uniswap_pair() -> Weight {
        Weight::from_parts(25_000_000, 1_489)
            .saturating_add(T::DbWeight::get().reads(2_u64))
            .saturating_add(T::DbWeight::get().writes(1_u64))
    }
    /// Includes one AMM reserve read and one sync.
    fn dynamic_adjustment() -> Weight {
        Weight::from_parts(60_000_000, 3_593)
            .saturating_add(T::DbWeight::get().reads(6_u64))
            .saturating_add(T::DbWeight::get().writes(4_u64))
    }
}

// For backwards compatibility and tests
impl WeightInfo for () {
    fn transfer() -> Weight {
        Weight::from_parts(45_000_000, 3_593)
            .saturating_add(RocksDbWeight::get().reads(7_u64))
            .saturating_add(RocksDbWeight::get().writes(5_u64))
    }
    fn transfer_from() -> Weight {
        Weight::from_parts(52_000_000, 3_593)
            .saturating_add(RocksDbWeight::get().reads(8_u64))
            .saturating_add(RocksDbWeight::get().writes(6_u64))
    }
    fn approve() -> Weight {
        Weight::from_parts(18_000_000, 0)
            .saturating_add(RocksDbWeight::get().reads(1_u64))
            .saturating_add(RocksDbWeight::get().writes(1_u64))
    }
    fn initialize() -> Weight {
        Weight::from_parts(30_000_000, 1_489)
            .saturating_add(RocksDbWeight::get().reads(3_u64))
            .saturating_add(RocksDbWeight::get().writes(4_u64))
    }
    fn set_policy() -> Weight {
        Weight::from_parts(15_000_000, 1_489)
            .saturating_add(RocksDbWeight::get().reads(1_u64))
            .saturating_add(RocksDbWeight::get().writes(1_u64))
    }
    fn set_address_flag() -> Weight {
        Weight::from_parts(15_000_000, 1_489)
            .saturating_add(RocksDbWeight::get().reads(1_u64))
            .saturating_add(RocksDbWeight::get().writes(1_u64))
    }
    fn discover_uniswap_pair() -> Weight {
        Weight::from_parts(25_000_000, 1_489)
            .saturating_add(RocksDbWeight::get().reads(2_u64))
            .saturating_add(RocksDbWeight::get().writes(1_u64))
    }
    fn dynamic_adjustment() -> Weight {
        Weight::from_parts(60_000_000, 3_593)
            .saturating_add(RocksDbWeight::get().reads(6_u64))
            .saturating_add(RocksDbWeight::get().writes(4_u64))
    }
}
