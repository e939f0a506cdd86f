#![no_std]

use soroban_sdk::{
    contract, contractclient, contracterror, contractimpl, contracttype, token, Address, Env,
    Symbol,
};


// ============================================================================
// Error Types
// ============================================================================

/// Marketplace errors
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum MarketplaceError {
    /// Marketplace not initialized
    NotInitialized = 1,
    /// Already initialized
    AlreadyInitialized = 2,
    /// Listing price must be greater than zero
    PriceMustBeAboveZero = 3,
    /// Marketplace holds no transfer approval for the token
    NotApprovedForMarketplace = 4,
    /// An active listing already exists for this token
    AlreadyListed = 5,
    /// Caller is not the owner of the token
    NotOwner = 6,
    /// No active listing exists for this token
    NotListed = 7,
    /// Payment does not meet the asking price
    PriceNotMet = 8,
    /// Caller has no withdrawable proceeds
    NoProceeds = 9,
    /// Currency transfer failed
    TransferFailed = 10,
}

// ============================================================================
// Data Types
// ============================================================================

/// An active offer to sell one token at a fixed price
///
/// Absence of a listing is represented by the storage entry not existing,
/// never by a zeroed struct: price 0 is a rejected input, not a sentinel.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Listing {
    pub seller: Address,
    pub price: i128,
}

/// Storage keys
#[contracttype]
pub enum DataKey {
    /// Admin address
    Admin,
    /// Token contract used for all payments
    PaymentToken,
    /// Listing data ((nft_contract, token_id) -> Listing)
    Listing(Address, u32),
    /// Withdrawable sale revenue (seller -> i128)
    Proceeds(Address),
}

// ============================================================================
// Asset Registry Interface
// ============================================================================

/// Surface the marketplace consumes from any NFT contract it serves
///
/// `transfer_from` must accept the marketplace as `operator` when it holds a
/// per-token or blanket approval from the owner.
#[contractclient(name = "AssetRegistryClient")]
pub trait AssetRegistry {
    fn owner_of(env: Env, token_id: u32) -> Address;
    fn get_approved(env: Env, token_id: u32) -> Option<Address>;
    fn is_approved_for_all(env: Env, owner: Address, operator: Address) -> bool;
    fn transfer_from(env: Env, operator: Address, from: Address, to: Address, token_id: u32);
}

// ============================================================================
// Storage Module
// ============================================================================

mod storage {
    use super::*;

    // --- Admin / Configuration ---

    pub fn set_admin(e: &Env, admin: &Address) {
        e.storage().instance().set(&DataKey::Admin, admin);
    }

    pub fn get_admin(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::Admin)
    }

    pub fn has_admin(e: &Env) -> bool {
        e.storage().instance().has(&DataKey::Admin)
    }

    pub fn set_payment_token(e: &Env, token: &Address) {
        e.storage().instance().set(&DataKey::PaymentToken, token);
    }

    pub fn get_payment_token(e: &Env) -> Option<Address> {
        e.storage().instance().get(&DataKey::PaymentToken)
    }

    // --- Listing Ledger ---

    pub fn set_listing(e: &Env, nft_contract: &Address, token_id: u32, listing: &Listing) {
        e.storage()
            .persistent()
            .set(&DataKey::Listing(nft_contract.clone(), token_id), listing);
    }

    pub fn get_listing(e: &Env, nft_contract: &Address, token_id: u32) -> Option<Listing> {
        e.storage()
            .persistent()
            .get(&DataKey::Listing(nft_contract.clone(), token_id))
    }

    pub fn has_listing(e: &Env, nft_contract: &Address, token_id: u32) -> bool {
        e.storage()
            .persistent()
            .has(&DataKey::Listing(nft_contract.clone(), token_id))
    }

    pub fn remove_listing(e: &Env, nft_contract: &Address, token_id: u32) {
        e.storage()
            .persistent()
            .remove(&DataKey::Listing(nft_contract.clone(), token_id));
    }

    // --- Proceeds Ledger ---

    pub fn get_proceeds(e: &Env, seller: &Address) -> i128 {
        e.storage()
            .persistent()
            .get(&DataKey::Proceeds(seller.clone()))
            .unwrap_or(0)
    }

    pub fn set_proceeds(e: &Env, seller: &Address, amount: i128) {
        e.storage()
            .persistent()
            .set(&DataKey::Proceeds(seller.clone()), &amount);
    }
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct NftMarketplace;

#[contractimpl]
impl NftMarketplace {
    // ========================================================================
    // Initialization
    // ========================================================================

    /// Initialize the marketplace
    ///
    /// # Arguments
    /// * `admin` - Admin address
    /// * `payment_token` - Token contract all sales are settled in
    pub fn initialize(e: Env, admin: Address, payment_token: Address) -> Result<(), MarketplaceError> {
        if storage::has_admin(&e) {
            return Err(MarketplaceError::AlreadyInitialized);
        }

        admin.require_auth();

        storage::set_admin(&e, &admin);
        storage::set_payment_token(&e, &payment_token);

        Ok(())
    }

    /// Get admin address
    pub fn get_admin(e: Env) -> Result<Address, MarketplaceError> {
        storage::get_admin(&e).ok_or(MarketplaceError::NotInitialized)
    }

    /// Get the payment token contract address
    pub fn get_payment_token(e: Env) -> Result<Address, MarketplaceError> {
        storage::get_payment_token(&e).ok_or(MarketplaceError::NotInitialized)
    }

    // ========================================================================
    // Listing Management
    // ========================================================================

    /// List a token for sale
    ///
    /// The seller must own the token and must have granted the marketplace a
    /// transfer approval (per-token or approved-for-all) on the registry, so
    /// that a later `buy_item` can move the token.
    ///
    /// # Errors
    /// * `PriceMustBeAboveZero` - If `price` is zero or negative
    /// * `AlreadyListed` - If an active listing exists for this token
    /// * `NotOwner` - If `seller` does not own the token on the registry
    /// * `NotApprovedForMarketplace` - If the marketplace holds no approval
    pub fn list_item(
        e: Env,
        seller: Address,
        nft_contract: Address,
        token_id: u32,
        price: i128,
    ) -> Result<(), MarketplaceError> {
        seller.require_auth();

        if price <= 0 {
            return Err(MarketplaceError::PriceMustBeAboveZero);
        }

        let registry = AssetRegistryClient::new(&e, &nft_contract);
        if registry.owner_of(&token_id) != seller {
            return Err(MarketplaceError::NotOwner);
        }

        if storage::has_listing(&e, &nft_contract, token_id) {
            return Err(MarketplaceError::AlreadyListed);
        }

        let marketplace = e.current_contract_address();
        let approved = registry.get_approved(&token_id) == Some(marketplace.clone())
            || registry.is_approved_for_all(&seller, &marketplace);
        if !approved {
            return Err(MarketplaceError::NotApprovedForMarketplace);
        }

        let listing = Listing {
            seller: seller.clone(),
            price,
        };
        storage::set_listing(&e, &nft_contract, token_id, &listing);

        e.events().publish(
            (Symbol::new(&e, "ItemListed"), nft_contract, token_id),
            (seller, price),
        );

        Ok(())
    }

    /// Change the asking price of an active listing
    ///
    /// The seller stays fixed; only the price moves. Reuses the `ItemListed`
    /// signal so indexers treat it as a listing change.
    ///
    /// # Errors
    /// * `NotListed` - If no active listing exists
    /// * `NotOwner` - If `seller` is not the listing's seller
    /// * `PriceMustBeAboveZero` - If `new_price` is zero or negative
    pub fn update_listing(
        e: Env,
        seller: Address,
        nft_contract: Address,
        token_id: u32,
        new_price: i128,
    ) -> Result<(), MarketplaceError> {
        seller.require_auth();

        let mut listing = storage::get_listing(&e, &nft_contract, token_id)
            .ok_or(MarketplaceError::NotListed)?;

        if listing.seller != seller {
            return Err(MarketplaceError::NotOwner);
        }

        if new_price <= 0 {
            return Err(MarketplaceError::PriceMustBeAboveZero);
        }

        listing.price = new_price;
        storage::set_listing(&e, &nft_contract, token_id, &listing);

        e.events().publish(
            (Symbol::new(&e, "ItemListed"), nft_contract, token_id),
            (seller, new_price),
        );

        Ok(())
    }

    /// Cancel an active listing
    ///
    /// # Errors
    /// * `NotListed` - If no active listing exists
    /// * `NotOwner` - If `seller` is not the listing's seller
    pub fn cancel_listing(
        e: Env,
        seller: Address,
        nft_contract: Address,
        token_id: u32,
    ) -> Result<(), MarketplaceError> {
        seller.require_auth();

        let listing = storage::get_listing(&e, &nft_contract, token_id)
            .ok_or(MarketplaceError::NotListed)?;

        if listing.seller != seller {
            return Err(MarketplaceError::NotOwner);
        }

        storage::remove_listing(&e, &nft_contract, token_id);

        e.events().publish(
            (Symbol::new(&e, "ItemCancelled"), nft_contract, token_id),
            listing.seller,
        );

        Ok(())
    }

    // ========================================================================
    // Purchase
    // ========================================================================

    /// Buy a listed token
    ///
    /// The buyer pays `amount` of the payment token. Any amount above the
    /// asking price is credited to the seller in full; there is no refund of
    /// the difference.
    ///
    /// Invariant: the proceeds credit and the listing removal commit before
    /// either external transfer. A reentrant purchase therefore observes
    /// `NotListed`, and a failed transfer reverts the whole invocation, so no
    /// partial state is ever visible.
    ///
    /// # Errors
    /// * `NotListed` - If no active listing exists
    /// * `PriceNotMet` - If `amount` is below the asking price
    pub fn buy_item(
        e: Env,
        buyer: Address,
        nft_contract: Address,
        token_id: u32,
        amount: i128,
    ) -> Result<(), MarketplaceError> {
        buyer.require_auth();

        let listing = storage::get_listing(&e, &nft_contract, token_id)
            .ok_or(MarketplaceError::NotListed)?;

        if amount < listing.price {
            return Err(MarketplaceError::PriceNotMet);
        }

        let payment_token =
            storage::get_payment_token(&e).ok_or(MarketplaceError::NotInitialized)?;

        // EFFECTS - ledger mutations commit before any external call
        let proceeds = storage::get_proceeds(&e, &listing.seller);
        storage::set_proceeds(&e, &listing.seller, proceeds + amount);
        storage::remove_listing(&e, &nft_contract, token_id);

        // INTERACTIONS
        // Escrow the full bid; it backs the seller's later withdrawal
        let marketplace = e.current_contract_address();
        token::Client::new(&e, &payment_token).transfer(&buyer, &marketplace, &amount);

        // Move the token under the marketplace's approval
        AssetRegistryClient::new(&e, &nft_contract).transfer_from(
            &marketplace,
            &listing.seller,
            &buyer,
            &token_id,
        );

        e.events().publish(
            (Symbol::new(&e, "ItemBought"), nft_contract, token_id),
            (buyer, listing.price),
        );

        Ok(())
    }

    // ========================================================================
    // Proceeds
    // ========================================================================

    /// Withdraw accumulated sale proceeds
    ///
    /// Invariant: the balance is zeroed before the payout is initiated, so a
    /// reentrant withdrawal observes zero and fails `NoProceeds`. A failed
    /// payout surfaces `TransferFailed` and reverts the zeroing with it.
    ///
    /// # Errors
    /// * `NoProceeds` - If the caller's balance is zero
    /// * `TransferFailed` - If the currency transfer does not succeed
    pub fn withdraw_proceeds(e: Env, seller: Address) -> Result<(), MarketplaceError> {
        seller.require_auth();

        let amount = storage::get_proceeds(&e, &seller);
        if amount == 0 {
            return Err(MarketplaceError::NoProceeds);
        }

        let payment_token =
            storage::get_payment_token(&e).ok_or(MarketplaceError::NotInitialized)?;

        // EFFECTS
        storage::set_proceeds(&e, &seller, 0);

        // INTERACTIONS
        let payout = token::Client::new(&e, &payment_token).try_transfer(
            &e.current_contract_address(),
            &seller,
            &amount,
        );
        if payout.is_err() {
            return Err(MarketplaceError::TransferFailed);
        }

        Ok(())
    }

    // ========================================================================
    // Read Accessors
    // ========================================================================

    /// Get the active listing for a token, if any
    pub fn get_listing(e: Env, nft_contract: Address, token_id: u32) -> Option<Listing> {
        storage::get_listing(&e, &nft_contract, token_id)
    }

    /// Get a seller's withdrawable proceeds (0 for unseen sellers)
    pub fn get_proceeds(e: Env, seller: Address) -> i128 {
        storage::get_proceeds(&e, &seller)
    }
}
