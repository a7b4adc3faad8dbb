//! Events emitted on every governance and ledger transition

use anchor_lang::prelude::*;

use crate::state::ProposalKind;

#[event]
pub struct CollectionCreated {
    pub collection: Pubkey,
    pub admin: Pubkey,
    pub total_members: u8,
}

#[event]
pub struct MemberAdded {
    pub collection: Pubkey,
    pub member: Pubkey,
    pub active_members: u8,
}

#[event]
pub struct PaymentReceived {
    pub collection: Pubkey,
    pub member: Pubkey,
    pub amount: u64,
    pub paid_periods: u8,
    pub can_withdraw: bool,
}

#[event]
pub struct MultisigCreated {
    pub collection: Pubkey,
    pub signer_count: u8,
    pub threshold: u8,
}

#[event]
pub struct ProposalCreated {
    pub collection: Pubkey,
    pub proposal_id: u64,
    pub kind: ProposalKind,
    pub proposer: Pubkey,
    pub expires_at: i64,
}

#[event]
pub struct VoteCast {
    pub collection: Pubkey,
    pub proposal_id: u64,
    pub signer: Pubkey,
    pub approve: bool,
}

#[event]
pub struct ProposalExecuted {
    pub collection: Pubkey,
    pub proposal_id: u64,
    pub kind: ProposalKind,
    pub payout: u64,
    pub penalty: u64,
}
