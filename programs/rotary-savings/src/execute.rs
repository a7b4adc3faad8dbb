//! Proposal execution
//!
//! Anyone may trigger execution once enough signers approved. Withdrawal
//! kinds need the member ledger and the member's wallet; lamports are
//! debited straight from the program-owned collection account.

use anchor_lang::prelude::*;

use crate::constants::{MULTISIG_SEED, PROPOSAL_SEED};
use crate::error::SavingsError;
use crate::events::ProposalExecuted;
use crate::governance::{apply_effect, plan_execution, Effect};
use crate::state::{Collection, EffectSummary, Member, Multisig, Proposal};

#[derive(Accounts)]
pub struct ExecuteProposal<'info> {
    pub executor: Signer<'info>,

    #[account(mut)]
    pub collection: Account<'info, Collection>,

    #[account(
        seeds = [MULTISIG_SEED, collection.key().as_ref()],
        bump = multisig.bump
    )]
    pub multisig: Account<'info, Multisig>,

    #[account(
        mut,
        seeds = [PROPOSAL_SEED, collection.key().as_ref(), &proposal.id.to_le_bytes()],
        bump = proposal.bump,
        has_one = collection
    )]
    pub proposal: Account<'info, Proposal>,

    #[account(mut)]
    pub member: Option<Account<'info, Member>>,

    /// Member wallet receiving the payout
    #[account(mut)]
    pub recipient: Option<SystemAccount<'info>>,
}

impl<'info> ExecuteProposal<'info> {
    pub fn execute(&mut self) -> Result<EffectSummary> {
        let now = Clock::get()?.unix_timestamp;
        let effect = plan_execution(
            &self.collection,
            &self.multisig,
            &self.proposal,
            self.member.as_deref(),
            now,
        )?;

        let payout = effect.transfer_amount();
        if let Effect::Payout { member, .. } = effect {
            let recipient = self
                .recipient
                .as_ref()
                .ok_or(SavingsError::MissingMemberAccount)?;
            require_keys_eq!(recipient.key(), member, SavingsError::MemberMismatch);

            if payout > 0 {
                self.collection.sub_lamports(payout)?;
                recipient.add_lamports(payout)?;
            }
        }

        let summary = apply_effect(
            &effect,
            &mut self.collection,
            self.member.as_deref_mut(),
            &mut self.proposal,
        );

        msg!(
            "Proposal {} executed: payout {}, penalty {}",
            summary.proposal_id,
            summary.payout,
            summary.penalty
        );
        emit!(ProposalExecuted {
            collection: self.collection.key(),
            proposal_id: summary.proposal_id,
            kind: summary.kind,
            payout: summary.payout,
            penalty: summary.penalty,
        });
        Ok(summary)
    }
}
