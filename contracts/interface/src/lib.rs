//! FractionalProperty Contract Interface
//!
//! This crate defines the typed call surface of the FractionalProperty
//! contract consumed by the Propshare SDK: ABI bindings, the contract's
//! revert strings, and the share arithmetic the contract applies on-chain.
//!
//! The arithmetic here mirrors the contract exactly (integer floor
//! division) so client-side estimates agree with on-chain results. None of
//! it is an enforcement layer: the contract is the authority on every
//! invariant.

use alloy_primitives::U256;
use alloy_sol_types::sol;

sol! {
    /// A listed property as stored and returned by the contract.
    struct Property {
        uint256 id;
        string name;
        string location;
        string imageUrl;
        uint256 totalValue;
        uint256 totalShares;
        uint256 sharesIssued;
        bool active;
    }

    /// List a new property. Owner-only.
    function listProperty(
        string name,
        string location,
        string imageUrl,
        uint256 totalValue,
        uint256 totalShares
    );

    /// Invest in a property. The attached value buys
    /// `value * totalShares / totalValue` shares.
    function invest(uint256 propertyId) payable;

    function getAllProperties() returns (Property[]);

    function getActiveProperties() returns (Property[]);

    function getUserInvestment(uint256 propertyId, address investor) returns (uint256);

    /// Ownership in basis points (scaled by 10_000).
    function getUserOwnershipPercentage(uint256 propertyId, address investor) returns (uint256);
}

/// Scale factor of `getUserOwnershipPercentage` (2500 = 25.00%).
pub const OWNERSHIP_SCALE: u64 = 10_000;

/// Revert reason for a zero-value `invest` call.
pub const REVERT_ZERO_INVESTMENT: &str = "Investment must be greater than 0";

/// Revert reason for investing in an inactive (or fully subscribed) property.
pub const REVERT_PROPERTY_INACTIVE: &str = "Property is not active";

/// Revert reason when the requested shares exceed the remaining supply.
pub const REVERT_INSUFFICIENT_SHARES: &str = "Not enough shares available";

/// Whether an error message carries one of the contract's revert reasons.
pub fn is_contract_revert(message: &str) -> bool {
    message.contains(REVERT_ZERO_INVESTMENT)
        || message.contains(REVERT_PROPERTY_INACTIVE)
        || message.contains(REVERT_INSUFFICIENT_SHARES)
}

/// Shares bought by `amount` wei, as the contract computes them:
/// `amount * totalShares / totalValue`, floored.
///
/// Returns `None` for a zero-valued property or on overflow of the scaled
/// product.
pub fn shares_for_amount(amount: U256, total_value: U256, total_shares: U256) -> Option<U256> {
    if total_value.is_zero() {
        return None;
    }
    amount.checked_mul(total_shares).map(|scaled| scaled / total_value)
}

/// Ownership of `shares` out of `total_shares` in basis points.
pub fn ownership_bps(shares: U256, total_shares: U256) -> Option<U256> {
    if total_shares.is_zero() {
        return None;
    }
    shares
        .checked_mul(U256::from(OWNERSHIP_SCALE))
        .map(|scaled| scaled / total_shares)
}

/// Price of one share in wei (`totalValue / totalShares`, floored).
pub fn share_price(total_value: U256, total_shares: U256) -> Option<U256> {
    if total_shares.is_zero() {
        return None;
    }
    Some(total_value / total_shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::utils::parse_ether;

    fn hundred_eth_property() -> (U256, U256) {
        (parse_ether("100").unwrap(), U256::from(10_000u64))
    }

    #[test]
    fn shares_match_contract_computation() {
        let (total_value, total_shares) = hundred_eth_property();

        let ten_eth = parse_ether("10").unwrap();
        assert_eq!(
            shares_for_amount(ten_eth, total_value, total_shares),
            Some(U256::from(1_000u64))
        );

        let twenty_five_eth = parse_ether("25").unwrap();
        assert_eq!(
            shares_for_amount(twenty_five_eth, total_value, total_shares),
            Some(U256::from(2_500u64))
        );
    }

    #[test]
    fn fractional_amounts_floor() {
        let (total_value, total_shares) = hundred_eth_property();

        // 0.015 ETH at 0.01 ETH per share buys exactly one share.
        let amount = parse_ether("0.015").unwrap();
        assert_eq!(
            shares_for_amount(amount, total_value, total_shares),
            Some(U256::from(1u64))
        );
    }

    #[test]
    fn ownership_is_basis_points() {
        let (_, total_shares) = hundred_eth_property();
        assert_eq!(
            ownership_bps(U256::from(2_500u64), total_shares),
            Some(U256::from(2_500u64))
        );
        assert_eq!(
            ownership_bps(U256::ZERO, total_shares),
            Some(U256::ZERO)
        );
    }

    #[test]
    fn zero_supply_is_rejected() {
        assert_eq!(shares_for_amount(U256::from(1u64), U256::ZERO, U256::from(10u64)), None);
        assert_eq!(ownership_bps(U256::from(1u64), U256::ZERO), None);
        assert_eq!(share_price(U256::from(1u64), U256::ZERO), None);
    }

    #[test]
    fn share_price_matches_seeded_listings() {
        let (total_value, total_shares) = hundred_eth_property();
        assert_eq!(
            share_price(total_value, total_shares),
            Some(parse_ether("0.01").unwrap())
        );
    }

    #[test]
    fn revert_reasons_are_recognized() {
        assert!(is_contract_revert(
            "execution reverted: Property is not active"
        ));
        assert!(is_contract_revert(REVERT_INSUFFICIENT_SHARES));
        assert!(!is_contract_revert("user rejected the request"));
    }
}
