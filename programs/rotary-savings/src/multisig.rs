//! Signer group registration

use anchor_lang::prelude::*;

use crate::constants::MULTISIG_SEED;
use crate::error::SavingsError;
use crate::events::MultisigCreated;
use crate::state::{Collection, Multisig};

#[derive(Accounts)]
pub struct CreateMultisig<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        constraint = collection.admin == admin.key() @ SavingsError::Unauthorized
    )]
    pub collection: Account<'info, Collection>,

    /// One signer group per collection; the PDA makes a second one impossible
    #[account(
        init,
        payer = admin,
        space = 8 + Multisig::INIT_SPACE,
        seeds = [MULTISIG_SEED, collection.key().as_ref()],
        bump
    )]
    pub multisig: Account<'info, Multisig>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateMultisig<'info> {
    pub fn create_multisig(
        &mut self,
        bumps: &CreateMultisigBumps,
        signers: Vec<Pubkey>,
        threshold: u8,
    ) -> Result<()> {
        Multisig::validate_signers(&signers, threshold)?;

        let signer_count = signers.len() as u8;
        self.multisig.set_inner(Multisig {
            collection: self.collection.key(),
            signers,
            threshold,
            nonce: 0,
            bump: bumps.multisig,
        });

        msg!(
            "Multisig for {}: {} of {} signers",
            self.collection.key(),
            threshold,
            signer_count
        );
        emit!(MultisigCreated {
            collection: self.collection.key(),
            signer_count,
            threshold,
        });
        Ok(())
    }
}
