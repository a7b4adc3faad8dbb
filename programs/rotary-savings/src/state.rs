//! Account layouts for collections, members, signer groups and proposals

use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, MAX_SIGNERS};
use crate::error::SavingsError;

/// A savings circle and its pooled balance.
///
/// The account itself holds the pooled lamports; `total_balance` is the
/// tracked share that belongs to members.
#[account]
#[derive(InitSpace)]
pub struct Collection {
    /// Creator, the only identity allowed to enroll members or propose
    /// closure and settings changes
    pub admin: Pubkey,
    #[max_len(MAX_NAME_LEN)]
    pub name: String,
    /// Seconds of contributions required before a member vests
    pub duration: i64,
    /// Minimum seconds between two contributions
    pub period: i64,
    pub amount_per_period: u64,
    pub total_members: u8,
    pub active_members: u8,
    pub total_balance: u64,
    pub is_active: bool,
    /// Percentage kept by the pool on early withdrawal, 0..=100
    pub early_withdrawal_penalty_rate: u8,
    /// Sum of all penalties kept in the pool so far
    pub retained_penalties: u64,
    pub bump: u8,
}

/// Per-member contribution ledger.
#[account]
#[derive(InitSpace)]
pub struct Member {
    pub collection: Pubkey,
    /// Wallet that pays in and receives payouts
    pub owner: Pubkey,
    pub paid_periods: u8,
    pub last_paid: i64,
    pub total_paid: u64,
    /// Vested: enough periods paid to cover the collection duration
    pub can_withdraw: bool,
    pub early_withdrawal_requested: bool,
    pub bump: u8,
}

/// Signer group governing one collection.
#[account]
#[derive(InitSpace)]
pub struct Multisig {
    pub collection: Pubkey,
    /// Order matters: vote slots in every proposal follow this order
    #[max_len(MAX_SIGNERS)]
    pub signers: Vec<Pubkey>,
    pub threshold: u8,
    /// Sequence number of the next proposal
    pub nonce: u64,
    pub bump: u8,
}

/// New schedule and penalty for a collection. All four fields replace the
/// current values when the proposal executes.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct SettingsChange {
    pub duration: i64,
    pub period: i64,
    pub amount_per_period: u64,
    pub early_withdrawal_penalty_rate: u8,
}

/// What a proposal does once approved.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub enum ProposalAction {
    Withdraw { member: Pubkey, amount: u64 },
    CloseCollection,
    AdjustSettings { settings: SettingsChange },
    EarlyWithdraw { member: Pubkey, amount: u64 },
}

impl ProposalAction {
    pub fn kind(&self) -> ProposalKind {
        match self {
            ProposalAction::Withdraw { .. } => ProposalKind::Withdraw,
            ProposalAction::CloseCollection => ProposalKind::CloseCollection,
            ProposalAction::AdjustSettings { .. } => ProposalKind::AdjustSettings,
            ProposalAction::EarlyWithdraw { .. } => ProposalKind::EarlyWithdraw,
        }
    }

    /// Member targeted by a withdrawal, if any.
    pub fn member(&self) -> Option<Pubkey> {
        match self {
            ProposalAction::Withdraw { member, .. }
            | ProposalAction::EarlyWithdraw { member, .. } => Some(*member),
            _ => None,
        }
    }
}

/// Discriminant of [`ProposalAction`], as sent by clients.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ProposalKind {
    Withdraw = 0,
    CloseCollection = 1,
    AdjustSettings = 2,
    EarlyWithdraw = 3,
}

impl TryFrom<u8> for ProposalKind {
    type Error = SavingsError;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ProposalKind::Withdraw),
            1 => Ok(ProposalKind::CloseCollection),
            2 => Ok(ProposalKind::AdjustSettings),
            3 => Ok(ProposalKind::EarlyWithdraw),
            _ => Err(SavingsError::InvalidProposalType),
        }
    }
}

/// A pending governance action.
#[account]
pub struct Proposal {
    pub collection: Pubkey,
    /// Sequence number taken from the multisig nonce
    pub id: u64,
    pub action: ProposalAction,
    pub proposer: Pubkey,
    pub created_at: i64,
    pub expires_at: i64,
    pub executed: bool,
    /// One slot per signer, in multisig order
    pub approvals: Vec<bool>,
    pub disapprovals: Vec<bool>,
    pub bump: u8,
}

impl Proposal {
    /// Account size for a proposal voted on by `signer_count` signers,
    /// discriminator included.
    pub fn space(signer_count: usize) -> usize {
        8 + 32 // collection
            + 8 // id
            + ProposalAction::INIT_SPACE
            + 32 // proposer
            + 8 + 8 // created_at, expires_at
            + 1 // executed
            + 2 * (4 + signer_count) // approvals, disapprovals
            + 1 // bump
    }
}

/// Returned by `execute_proposal` so clients can read what happened.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct EffectSummary {
    pub proposal_id: u64,
    pub kind: ProposalKind,
    /// Lamports sent to the member
    pub payout: u64,
    /// Lamports kept by the pool
    pub penalty: u64,
}
