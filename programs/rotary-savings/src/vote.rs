//! Multisig voting

use anchor_lang::prelude::*;

use crate::constants::{MULTISIG_SEED, PROPOSAL_SEED};
use crate::error::SavingsError;
use crate::events::VoteCast;
use crate::state::{Collection, Multisig, Proposal};

#[derive(Accounts)]
pub struct Vote<'info> {
    pub signer: Signer<'info>,

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
}

impl<'info> Vote<'info> {
    pub fn vote(&mut self, approve: bool) -> Result<()> {
        let signer = self.signer.key();
        let index = self
            .multisig
            .signer_index(&signer)
            .ok_or(SavingsError::NotASigner)?;

        let now = Clock::get()?.unix_timestamp;
        self.proposal.record_vote(index, approve, now)?;

        msg!(
            "Vote on proposal {}: {} by {}",
            self.proposal.id,
            if approve { "APPROVE" } else { "DISAPPROVE" },
            signer
        );
        emit!(VoteCast {
            collection: self.collection.key(),
            proposal_id: self.proposal.id,
            signer,
            approve,
        });
        Ok(())
    }
}
