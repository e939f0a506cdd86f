#![no_std]
use soroban_sdk::{contract, contracterror, contractimpl, contracttype, Address, Env, String, Symbol};


// ============================================================================
// Error Types
// ============================================================================

/// Contract errors for structured error handling
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum BasicNftError {
    /// Token with the given token_id has not been minted
    TokenNotFound = 1,
    /// The `from` address is not the current owner of the token
    NotOwner = 2,
    /// Caller is neither the owner nor an approved operator
    NotAuthorized = 3,
}

// ============================================================================
// Data Types
// ============================================================================

/// Storage keys for the contract
#[contracttype]
pub enum DataKey {
    /// Counter for generating sequential token IDs
    TokenCounter,
    /// Owner mapping (token_id -> Address)
    Owner(u32),
    /// Per-token approved operator (token_id -> Address)
    Approved(u32),
    /// Blanket operator approval ((owner, operator) -> bool)
    OperatorApproval(Address, Address),
}

/// Every token in the collection shares the same metadata URI
const TOKEN_URI: &str = "ipfs://bafybeig37ioir76s7mg5oobetncojcm3c3hxasyd4rvid4jqhy4gkaheg4/?filename=0-PUG.json";

// ============================================================================
// Storage Module
// ============================================================================

mod storage {
    use super::*;

    // --- Token Counter ---

    pub fn next_token_id(e: &Env) -> u32 {
        let count: u32 = e
            .storage()
            .instance()
            .get(&DataKey::TokenCounter)
            .unwrap_or(0);
        e.storage()
            .instance()
            .set(&DataKey::TokenCounter, &(count + 1));
        count
    }

    pub fn get_token_counter(e: &Env) -> u32 {
        e.storage()
            .instance()
            .get(&DataKey::TokenCounter)
            .unwrap_or(0)
    }

    // --- Owner Mapping ---

    pub fn set_owner(e: &Env, token_id: u32, owner: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Owner(token_id), owner);
    }

    pub fn get_owner(e: &Env, token_id: u32) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Owner(token_id))
    }

    // --- Per-Token Approval ---

    pub fn set_approved(e: &Env, token_id: u32, operator: &Address) {
        e.storage()
            .persistent()
            .set(&DataKey::Approved(token_id), operator);
    }

    pub fn get_approved(e: &Env, token_id: u32) -> Option<Address> {
        e.storage().persistent().get(&DataKey::Approved(token_id))
    }

    pub fn clear_approved(e: &Env, token_id: u32) {
        e.storage().persistent().remove(&DataKey::Approved(token_id));
    }

    // --- Blanket Operator Approval ---

    pub fn set_operator_approval(e: &Env, owner: &Address, operator: &Address, approved: bool) {
        let key = DataKey::OperatorApproval(owner.clone(), operator.clone());
        if approved {
            e.storage().persistent().set(&key, &true);
        } else {
            e.storage().persistent().remove(&key);
        }
    }

    pub fn is_operator_approved(e: &Env, owner: &Address, operator: &Address) -> bool {
        e.storage()
            .persistent()
            .get(&DataKey::OperatorApproval(owner.clone(), operator.clone()))
            .unwrap_or(false)
    }
}

// ============================================================================
// Contract Implementation
// ============================================================================

#[contract]
pub struct BasicNft;

#[contractimpl]
impl BasicNft {
    // ========================================================================
    // Collection Metadata
    // ========================================================================

    /// Collection name
    pub fn name(e: Env) -> String {
        String::from_str(&e, "Dogie")
    }

    /// Collection symbol
    pub fn symbol(e: Env) -> String {
        String::from_str(&e, "DOG")
    }

    /// Metadata URI for a token. The whole collection points at one image.
    pub fn token_uri(e: Env, token_id: u32) -> Result<String, BasicNftError> {
        storage::get_owner(&e, token_id).ok_or(BasicNftError::TokenNotFound)?;
        Ok(String::from_str(&e, TOKEN_URI))
    }

    // ========================================================================
    // Minting
    // ========================================================================

    /// Mint a new token to `to`
    ///
    /// Token IDs are sequential starting at 0.
    ///
    /// # Returns
    /// The token_id of the newly minted token
    pub fn mint(e: Env, to: Address) -> u32 {
        to.require_auth();

        let token_id = storage::next_token_id(&e);
        storage::set_owner(&e, token_id, &to);

        e.events().publish(
            (Symbol::new(&e, "Mint"), token_id),
            (to, e.ledger().timestamp()),
        );

        token_id
    }

    // ========================================================================
    // Query Functions
    // ========================================================================

    /// Get owner of a token
    pub fn owner_of(e: Env, token_id: u32) -> Result<Address, BasicNftError> {
        storage::get_owner(&e, token_id).ok_or(BasicNftError::TokenNotFound)
    }

    /// Get the approved operator for a token, if any
    pub fn get_approved(e: Env, token_id: u32) -> Option<Address> {
        storage::get_approved(&e, token_id)
    }

    /// Check whether `operator` is approved for all of `owner`'s tokens
    pub fn is_approved_for_all(e: Env, owner: Address, operator: Address) -> bool {
        storage::is_operator_approved(&e, &owner, &operator)
    }

    /// Total number of tokens minted so far
    pub fn total_supply(e: Env) -> u32 {
        storage::get_token_counter(&e)
    }

    // ========================================================================
    // Approvals
    // ========================================================================

    /// Approve `operator` to transfer a single token
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    /// * `NotOwner` - If `owner` does not own the token
    pub fn approve(
        e: Env,
        owner: Address,
        operator: Address,
        token_id: u32,
    ) -> Result<(), BasicNftError> {
        owner.require_auth();

        let current_owner = storage::get_owner(&e, token_id).ok_or(BasicNftError::TokenNotFound)?;
        if current_owner != owner {
            return Err(BasicNftError::NotOwner);
        }

        storage::set_approved(&e, token_id, &operator);

        e.events().publish(
            (Symbol::new(&e, "Approval"), token_id),
            (owner, operator),
        );

        Ok(())
    }

    /// Grant or revoke `operator` approval over all of `owner`'s tokens
    pub fn set_approval_for_all(e: Env, owner: Address, operator: Address, approved: bool) {
        owner.require_auth();

        storage::set_operator_approval(&e, &owner, &operator, approved);

        e.events().publish(
            (Symbol::new(&e, "ApprovalForAll"),),
            (owner, operator, approved),
        );
    }

    // ========================================================================
    // Transfer
    // ========================================================================

    /// Transfer a token from `from` to `to`
    ///
    /// `operator` must be the owner, the token's approved operator, or an
    /// approved-for-all operator. The per-token approval is cleared on
    /// transfer so a stale operator cannot move the token again.
    ///
    /// # Errors
    /// * `TokenNotFound` - If the token does not exist
    /// * `NotOwner` - If `from` is not the current owner
    /// * `NotAuthorized` - If `operator` holds no approval
    pub fn transfer_from(
        e: Env,
        operator: Address,
        from: Address,
        to: Address,
        token_id: u32,
    ) -> Result<(), BasicNftError> {
        operator.require_auth();

        let current_owner = storage::get_owner(&e, token_id).ok_or(BasicNftError::TokenNotFound)?;
        if current_owner != from {
            return Err(BasicNftError::NotOwner);
        }

        let authorized = operator == from
            || storage::get_approved(&e, token_id) == Some(operator.clone())
            || storage::is_operator_approved(&e, &from, &operator);
        if !authorized {
            return Err(BasicNftError::NotAuthorized);
        }

        storage::clear_approved(&e, token_id);
        storage::set_owner(&e, token_id, &to);

        e.events().publish(
            (Symbol::new(&e, "Transfer"), token_id),
            (from, to, e.ledger().timestamp()),
        );

        Ok(())
    }
}
