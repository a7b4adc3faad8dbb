//! Governance engine
//!
//! Everything here works on plain account structs and never touches
//! `AccountInfo`, so the instruction handlers stay thin and the rules can be
//! exercised without a validator. Each operation validates first and mutates
//! only once every check has passed.

use anchor_lang::prelude::*;

use crate::constants::{MAX_NAME_LEN, MAX_PENALTY_RATE, MAX_SIGNERS, PROPOSAL_LIFETIME};
use crate::error::SavingsError;
use crate::math::penalty_and_payout;
use crate::state::{
    Collection, EffectSummary, Member, Multisig, Proposal, ProposalAction, ProposalKind,
    SettingsChange,
};

// ---------------------------------------------------------------------------
// Collection settings
// ---------------------------------------------------------------------------

pub fn validate_name(name: &str) -> Result<()> {
    require!(name.len() <= MAX_NAME_LEN, SavingsError::NameTooLong);
    Ok(())
}

/// Name bytes for the collection PDA. Seeds are derived before the handler
/// runs, so the length has to be enforced here.
pub fn name_seed(name: &str) -> Result<&[u8]> {
    validate_name(name)?;
    Ok(name.as_bytes())
}

pub fn validate_settings(settings: &SettingsChange) -> Result<()> {
    require!(
        settings.duration > 0 && settings.period > 0 && settings.amount_per_period > 0,
        SavingsError::InvalidSchedule
    );
    require!(
        settings.early_withdrawal_penalty_rate <= MAX_PENALTY_RATE,
        SavingsError::InvalidPenaltyRate
    );
    Ok(())
}

impl Collection {
    fn apply_settings(&mut self, settings: &SettingsChange) {
        self.duration = settings.duration;
        self.period = settings.period;
        self.amount_per_period = settings.amount_per_period;
        self.early_withdrawal_penalty_rate = settings.early_withdrawal_penalty_rate;
    }
}

// ---------------------------------------------------------------------------
// Membership ledger
// ---------------------------------------------------------------------------

impl Member {
    /// Vesting rule: paid periods must cover the whole duration.
    pub fn is_vested(paid_periods: u8, collection: &Collection) -> bool {
        (paid_periods as i64)
            .checked_mul(collection.period)
            .map_or(true, |covered| covered >= collection.duration)
    }

    fn reset_after_withdrawal(&mut self) {
        self.total_paid = 0;
        self.can_withdraw = false;
        self.early_withdrawal_requested = false;
    }
}

/// Books one contribution against the member and the pool.
pub fn record_payment(
    collection: &mut Collection,
    member: &mut Member,
    amount: u64,
    now: i64,
) -> Result<()> {
    require!(collection.is_active, SavingsError::Inactive);
    require!(
        amount == collection.amount_per_period,
        SavingsError::InvalidPaymentAmount
    );
    require!(
        !member.early_withdrawal_requested,
        SavingsError::AlreadyRequested
    );
    require!(
        member.paid_periods == 0 || now.saturating_sub(member.last_paid) >= collection.period,
        SavingsError::TooEarly
    );

    let paid_periods = member
        .paid_periods
        .checked_add(1)
        .ok_or(SavingsError::MathOverflow)?;
    let total_paid = member
        .total_paid
        .checked_add(amount)
        .ok_or(SavingsError::MathOverflow)?;
    let total_balance = collection
        .total_balance
        .checked_add(amount)
        .ok_or(SavingsError::MathOverflow)?;

    member.paid_periods = paid_periods;
    member.last_paid = now;
    member.total_paid = total_paid;
    collection.total_balance = total_balance;
    if Member::is_vested(paid_periods, collection) {
        member.can_withdraw = true;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Signer registry
// ---------------------------------------------------------------------------

impl Multisig {
    pub fn validate_signers(signers: &[Pubkey], threshold: u8) -> Result<()> {
        require!(signers.len() <= MAX_SIGNERS, SavingsError::TooManySigners);
        require!(
            threshold > 0 && threshold as usize <= signers.len(),
            SavingsError::InvalidThreshold
        );
        for (i, signer) in signers.iter().enumerate() {
            require!(
                !signers[..i].contains(signer),
                SavingsError::DuplicateSigner
            );
        }
        Ok(())
    }

    pub fn signer_index(&self, key: &Pubkey) -> Option<usize> {
        self.signers.iter().position(|signer| signer == key)
    }

    /// Hands out the current nonce and advances it.
    pub fn next_sequence(&mut self) -> Result<u64> {
        let sequence = self.nonce;
        self.nonce = sequence.checked_add(1).ok_or(SavingsError::MathOverflow)?;
        Ok(sequence)
    }
}

// ---------------------------------------------------------------------------
// Proposal creation
// ---------------------------------------------------------------------------

/// Checks the per-kind creation rules and builds the proposal payload.
///
/// Withdrawal amounts are fixed here to what the member has paid so far.
pub fn authorize_proposal(
    kind: ProposalKind,
    collection_key: &Pubkey,
    collection: &Collection,
    member: Option<&Member>,
    proposer: &Pubkey,
    settings: Option<SettingsChange>,
) -> Result<ProposalAction> {
    require!(collection.is_active, SavingsError::Inactive);

    match kind {
        ProposalKind::Withdraw => {
            let member = member.ok_or(SavingsError::MissingMemberAccount)?;
            require_keys_eq!(member.collection, *collection_key, SavingsError::Unauthorized);
            require!(member.can_withdraw, SavingsError::NotEligible);
            Ok(ProposalAction::Withdraw {
                member: member.owner,
                amount: member.total_paid,
            })
        }
        ProposalKind::CloseCollection => {
            require_keys_eq!(*proposer, collection.admin, SavingsError::Unauthorized);
            Ok(ProposalAction::CloseCollection)
        }
        ProposalKind::AdjustSettings => {
            require_keys_eq!(*proposer, collection.admin, SavingsError::Unauthorized);
            let settings = settings.ok_or(SavingsError::MissingSettings)?;
            validate_settings(&settings)?;
            Ok(ProposalAction::AdjustSettings { settings })
        }
        ProposalKind::EarlyWithdraw => {
            let member = member.ok_or(SavingsError::MissingMemberAccount)?;
            require_keys_eq!(member.collection, *collection_key, SavingsError::Unauthorized);
            require_keys_eq!(*proposer, member.owner, SavingsError::Unauthorized);
            require!(!member.can_withdraw, SavingsError::AlreadyEligible);
            require!(
                !member.early_withdrawal_requested,
                SavingsError::AlreadyRequested
            );
            Ok(ProposalAction::EarlyWithdraw {
                member: member.owner,
                amount: member.total_paid,
            })
        }
    }
}

impl Proposal {
    #[allow(clippy::too_many_arguments)]
    pub fn open(
        &mut self,
        collection: Pubkey,
        id: u64,
        action: ProposalAction,
        proposer: Pubkey,
        signer_count: usize,
        now: i64,
        bump: u8,
    ) -> Result<()> {
        self.collection = collection;
        self.id = id;
        self.action = action;
        self.proposer = proposer;
        self.created_at = now;
        self.expires_at = now
            .checked_add(PROPOSAL_LIFETIME)
            .ok_or(SavingsError::MathOverflow)?;
        self.executed = false;
        self.approvals = vec![false; signer_count];
        self.disapprovals = vec![false; signer_count];
        self.bump = bump;
        Ok(())
    }

    /// Executed and expired proposals accept neither votes nor execution.
    pub fn ensure_actionable(&self, now: i64) -> Result<()> {
        require!(!self.executed, SavingsError::AlreadyExecuted);
        require!(now < self.expires_at, SavingsError::Expired);
        Ok(())
    }

    /// Last vote wins; a signer can flip between approve and disapprove
    /// until execution or expiry.
    pub fn record_vote(&mut self, signer_index: usize, approve: bool, now: i64) -> Result<()> {
        self.ensure_actionable(now)?;
        require!(
            signer_index < self.approvals.len() && signer_index < self.disapprovals.len(),
            SavingsError::VoteSlotMismatch
        );

        self.approvals[signer_index] = approve;
        self.disapprovals[signer_index] = !approve;
        Ok(())
    }

    pub fn approval_count(&self) -> usize {
        self.approvals.iter().filter(|approved| **approved).count()
    }
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// A fully validated execution outcome, ready to be applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Payout {
        kind: ProposalKind,
        member: Pubkey,
        payout: u64,
        penalty: u64,
        balance_after: u64,
        retained_after: u64,
    },
    Close,
    Adjust(SettingsChange),
}

impl Effect {
    /// Lamports that leave the pool account.
    pub fn transfer_amount(&self) -> u64 {
        match self {
            Effect::Payout { payout, .. } => *payout,
            _ => 0,
        }
    }
}

/// Runs every execution check and computes the effect without mutating.
pub fn plan_execution(
    collection: &Collection,
    multisig: &Multisig,
    proposal: &Proposal,
    member: Option<&Member>,
    now: i64,
) -> Result<Effect> {
    proposal.ensure_actionable(now)?;
    require!(
        proposal.approval_count() >= multisig.threshold as usize,
        SavingsError::InsufficientApprovals
    );

    match proposal.action {
        ProposalAction::Withdraw { member: target, amount } => {
            let member = payout_member(member, proposal, &target)?;
            require!(member.can_withdraw, SavingsError::NotEligible);
            // Stale proposals from before a previous payout must not pay again.
            require!(member.total_paid >= amount, SavingsError::NotEligible);
            let balance_after = collection
                .total_balance
                .checked_sub(amount)
                .ok_or(SavingsError::InsufficientPoolBalance)?;
            Ok(Effect::Payout {
                kind: ProposalKind::Withdraw,
                member: target,
                payout: amount,
                penalty: 0,
                balance_after,
                retained_after: collection.retained_penalties,
            })
        }
        ProposalAction::EarlyWithdraw { member: target, amount } => {
            let member = payout_member(member, proposal, &target)?;
            require!(
                member.early_withdrawal_requested,
                SavingsError::NotRequested
            );
            require!(member.total_paid >= amount, SavingsError::NotEligible);
            let (penalty, payout) =
                penalty_and_payout(amount, collection.early_withdrawal_penalty_rate)?;
            // The penalty stays in the pool, only the payout leaves the books.
            let balance_after = collection
                .total_balance
                .checked_sub(payout)
                .ok_or(SavingsError::InsufficientPoolBalance)?;
            let retained_after = collection
                .retained_penalties
                .checked_add(penalty)
                .ok_or(SavingsError::MathOverflow)?;
            Ok(Effect::Payout {
                kind: ProposalKind::EarlyWithdraw,
                member: target,
                payout,
                penalty,
                balance_after,
                retained_after,
            })
        }
        ProposalAction::CloseCollection => Ok(Effect::Close),
        ProposalAction::AdjustSettings { settings } => Ok(Effect::Adjust(settings)),
    }
}

fn payout_member<'a>(
    member: Option<&'a Member>,
    proposal: &Proposal,
    target: &Pubkey,
) -> Result<&'a Member> {
    let member = member.ok_or(SavingsError::MissingMemberAccount)?;
    require_keys_eq!(member.owner, *target, SavingsError::MemberMismatch);
    require_keys_eq!(
        member.collection,
        proposal.collection,
        SavingsError::MemberMismatch
    );
    Ok(member)
}

/// Applies a planned effect and marks the proposal executed.
pub fn apply_effect(
    effect: &Effect,
    collection: &mut Collection,
    member: Option<&mut Member>,
    proposal: &mut Proposal,
) -> EffectSummary {
    let (payout, penalty) = match *effect {
        Effect::Payout {
            payout,
            penalty,
            balance_after,
            retained_after,
            ..
        } => {
            collection.total_balance = balance_after;
            collection.retained_penalties = retained_after;
            if let Some(member) = member {
                member.reset_after_withdrawal();
            }
            (payout, penalty)
        }
        Effect::Close => {
            collection.is_active = false;
            (0, 0)
        }
        Effect::Adjust(settings) => {
            collection.apply_settings(&settings);
            (0, 0)
        }
    };
    proposal.executed = true;

    EffectSummary {
        proposal_id: proposal.id,
        kind: proposal.action.kind(),
        payout,
        penalty,
    }
}
