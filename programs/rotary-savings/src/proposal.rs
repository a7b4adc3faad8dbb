//! Proposal creation
//!
//! Every proposal kind goes through the same account context. The proposal
//! PDA is derived from the multisig nonce, so the account a client passes
//! must be the next one in sequence.

use anchor_lang::prelude::*;

use crate::constants::{MULTISIG_SEED, PROPOSAL_SEED};
use crate::events::ProposalCreated;
use crate::governance::authorize_proposal;
use crate::state::{Collection, Member, Multisig, Proposal, ProposalKind, SettingsChange};

#[derive(Accounts)]
pub struct CreateProposal<'info> {
    #[account(mut)]
    pub proposer: Signer<'info>,

    pub collection: Account<'info, Collection>,

    #[account(
        mut,
        seeds = [MULTISIG_SEED, collection.key().as_ref()],
        bump = multisig.bump
    )]
    pub multisig: Account<'info, Multisig>,

    /// Sized for the current signer set; vote slots never grow afterwards
    #[account(
        init,
        payer = proposer,
        space = Proposal::space(multisig.signers.len()),
        seeds = [PROPOSAL_SEED, collection.key().as_ref(), &multisig.nonce.to_le_bytes()],
        bump
    )]
    pub proposal: Account<'info, Proposal>,

    /// Required for withdrawal kinds, ignored otherwise
    #[account(mut)]
    pub member: Option<Account<'info, Member>>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateProposal<'info> {
    pub fn create_proposal(
        &mut self,
        bumps: &CreateProposalBumps,
        kind: ProposalKind,
        settings: Option<SettingsChange>,
    ) -> Result<u64> {
        let now = Clock::get()?.unix_timestamp;
        let proposer = self.proposer.key();
        let collection = self.collection.key();

        let action = authorize_proposal(
            kind,
            &collection,
            &self.collection,
            self.member.as_deref(),
            &proposer,
            settings,
        )?;

        let id = self.multisig.next_sequence()?;
        self.proposal.open(
            collection,
            id,
            action,
            proposer,
            self.multisig.signers.len(),
            now,
            bumps.proposal,
        )?;

        // Blocks a second early-withdraw proposal for the same member.
        if kind == ProposalKind::EarlyWithdraw {
            if let Some(member) = self.member.as_mut() {
                member.early_withdrawal_requested = true;
            }
        }

        msg!("Proposal {} ({:?}) created by {}", id, kind, proposer);
        emit!(ProposalCreated {
            collection,
            proposal_id: id,
            kind,
            proposer,
            expires_at: self.proposal.expires_at,
        });
        Ok(id)
    }
}
