//! Error-path tests across contract boundaries
//!
//! Every failure must leave zero observable state change on both the
//! marketplace ledgers and the registry.

use crate::harness::{TestHarness, DEFAULT_BUYER_BALANCE, ONE_TOKEN};
use nft_marketplace::MarketplaceError;

#[test]
fn test_attacker_cannot_list_another_sellers_token() {
    let harness = TestHarness::new();
    let attacker = &harness.accounts.attacker;

    let token_id = harness.mint_listed_ready();
    let result = harness.marketplace.try_list_item(
        attacker,
        &harness.nft.address,
        &token_id,
        &ONE_TOKEN,
    );
    assert_eq!(result, Err(Ok(MarketplaceError::NotOwner)));
    assert_eq!(
        harness.marketplace.get_listing(&harness.nft.address, &token_id),
        None
    );
}

#[test]
fn test_attacker_cannot_cancel_or_reprice() {
    let harness = TestHarness::new();
    let seller = &harness.accounts.seller;
    let attacker = &harness.accounts.attacker;

    let token_id = harness.mint_listed_ready();
    harness
        .marketplace
        .list_item(seller, &harness.nft.address, &token_id, &ONE_TOKEN);

    let cancel =
        harness
            .marketplace
            .try_cancel_listing(attacker, &harness.nft.address, &token_id);
    assert_eq!(cancel, Err(Ok(MarketplaceError::NotOwner)));

    let reprice = harness.marketplace.try_update_listing(
        attacker,
        &harness.nft.address,
        &token_id,
        &(ONE_TOKEN / 10),
    );
    assert_eq!(reprice, Err(Ok(MarketplaceError::NotOwner)));

    let listing = harness
        .marketplace
        .get_listing(&harness.nft.address, &token_id)
        .unwrap();
    assert_eq!(listing.price, ONE_TOKEN);
}

#[test]
fn test_listing_without_registry_approval_fails() {
    let harness = TestHarness::new();
    let seller = &harness.accounts.seller;

    // Minted but never approved to the marketplace
    let token_id = harness.nft.mint(seller);
    let result = harness.marketplace.try_list_item(
        seller,
        &harness.nft.address,
        &token_id,
        &ONE_TOKEN,
    );
    assert_eq!(result, Err(Ok(MarketplaceError::NotApprovedForMarketplace)));
}

#[test]
fn test_underbid_leaves_everything_untouched() {
    let harness = TestHarness::new();
    let seller = &harness.accounts.seller;
    let buyer = &harness.accounts.buyer;

    let token_id = harness.mint_listed_ready();
    harness
        .marketplace
        .list_item(seller, &harness.nft.address, &token_id, &(2 * ONE_TOKEN));

    let result =
        harness
            .marketplace
            .try_buy_item(buyer, &harness.nft.address, &token_id, &ONE_TOKEN);
    assert_eq!(result, Err(Ok(MarketplaceError::PriceNotMet)));

    assert_eq!(harness.nft.owner_of(&token_id), *seller);
    assert_eq!(harness.balance(buyer), DEFAULT_BUYER_BALANCE);
    assert_eq!(harness.marketplace.get_proceeds(seller), 0);
    assert!(harness
        .marketplace
        .get_listing(&harness.nft.address, &token_id)
        .is_some());
}

#[test]
fn test_withdraw_without_proceeds_fails() {
    let harness = TestHarness::new();

    let result = harness
        .marketplace
        .try_withdraw_proceeds(&harness.accounts.attacker);
    assert_eq!(result, Err(Ok(MarketplaceError::NoProceeds)));
}
