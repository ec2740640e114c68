//! Seam to the external AMM pair the token trades against.

use frame_support::dispatch::DispatchResult;
use sp_runtime::DispatchError;

/// Read-mostly view of a Uniswap-V2 style pair.
///
/// Calls are synchronous; a failure aborts whatever the pallet was doing.
pub trait AmmPair<AccountId> {
    /// `(reserve0, reserve1)` of `pair`, ordered by token address.
    fn get_reserves(pair: &AccountId) -> Result<(u128, u128), DispatchError>;

    /// Pair address for two tokens, if one exists.
    fn get_pair(token_a: &AccountId, token_b: &AccountId) -> Option<AccountId>;

    /// Make the pair re-read its token balances after they changed underneath it.
    fn sync(pair: &AccountId) -> DispatchResult;
}

impl<AccountId> AmmPair<AccountId> for () {
    fn get_reserves(_pair: &AccountId) -> Result<(u128, u128), DispatchError> {
        Err(DispatchError::Other("no AMM configured"))
    }

    fn get_pair(_token_a: &AccountId, _token_b: &AccountId) -> Option<AccountId> {
        None
    }

    fn sync(_pair: &AccountId) -> DispatchResult {
        Err(DispatchError::Other("no AMM configured"))
    }
}

/// Reorder pair reserves into `(token_reserve, stable_reserve)`.
///
/// The pair stores the reserve of the lower address first.
pub fn token_and_stable_reserves<AccountId: Ord>(
    token: &AccountId,
    stable: &AccountId,
    (reserve0, reserve1): (u128, u128),
) -> (u128, u128) {
    if token < stable {
        (reserve0, reserve1)
    } else {
        (reserve1, reserve0)
    }
}
