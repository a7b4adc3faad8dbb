//! Error definitions

use anchor_lang::prelude::*;

#[error_code]
pub enum SavingsError {
    #[msg("Unauthorized - caller does not hold the required role")]
    Unauthorized,
    #[msg("Threshold must be between 1 and the number of signers")]
    InvalidThreshold,
    #[msg("Collection is not active")]
    Inactive,
    #[msg("Collection is full")]
    CapacityExceeded,
    #[msg("Not a valid multisig signer")]
    NotASigner,
    #[msg("Proposal already executed")]
    AlreadyExecuted,
    #[msg("Proposal expired")]
    Expired,
    #[msg("Not enough approvals")]
    InsufficientApprovals,
    #[msg("Member cannot withdraw yet")]
    NotEligible,
    #[msg("Early withdrawal not requested")]
    NotRequested,
    #[msg("Invalid proposal type")]
    InvalidProposalType,
    #[msg("Member is eligible for regular withdrawal")]
    AlreadyEligible,
    #[msg("Early withdrawal already requested")]
    AlreadyRequested,
    #[msg("Too many signers")]
    TooManySigners,
    #[msg("Signer listed more than once")]
    DuplicateSigner,
    #[msg("Penalty rate must not exceed 100 percent")]
    InvalidPenaltyRate,
    #[msg("Duration, period, amount and capacity must be positive")]
    InvalidSchedule,
    #[msg("Collection name too long")]
    NameTooLong,
    #[msg("Invalid payment amount")]
    InvalidPaymentAmount,
    #[msg("Too early for next payment")]
    TooEarly,
    #[msg("Member account required for withdrawal proposals")]
    MissingMemberAccount,
    #[msg("Settings required for adjustment proposals")]
    MissingSettings,
    #[msg("Member account does not match the proposal")]
    MemberMismatch,
    #[msg("Pool balance too low for payout")]
    InsufficientPoolBalance,
    #[msg("Arithmetic overflow")]
    MathOverflow,
    #[msg("Proposal vote slots do not match the signer group")]
    VoteSlotMismatch,
}
