//! Collection onboarding and member contributions

use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};

use crate::constants::{COLLECTION_SEED, MEMBER_SEED};
use crate::error::SavingsError;
use crate::events::{CollectionCreated, MemberAdded, PaymentReceived};
use crate::governance::{name_seed, record_payment, validate_settings};
use crate::state::{Collection, Member, SettingsChange};

// ---------------------------------------------------------------------------
// Create Collection
// ---------------------------------------------------------------------------
// The collection PDA doubles as the pool: contributions are paid into it and
// payouts are debited from it.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
#[instruction(name: String)]
pub struct CreateCollection<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        init,
        payer = admin,
        space = 8 + Collection::INIT_SPACE,
        seeds = [COLLECTION_SEED, admin.key().as_ref(), name_seed(&name)?],
        bump
    )]
    pub collection: Account<'info, Collection>,

    pub system_program: Program<'info, System>,
}

impl<'info> CreateCollection<'info> {
    pub fn create_collection(
        &mut self,
        bumps: &CreateCollectionBumps,
        name: String,
        settings: SettingsChange,
        total_members: u8,
    ) -> Result<()> {
        validate_settings(&settings)?;
        require!(total_members > 0, SavingsError::InvalidSchedule);

        self.collection.set_inner(Collection {
            admin: self.admin.key(),
            name,
            duration: settings.duration,
            period: settings.period,
            amount_per_period: settings.amount_per_period,
            total_members,
            active_members: 0,
            total_balance: 0,
            is_active: true,
            early_withdrawal_penalty_rate: settings.early_withdrawal_penalty_rate,
            retained_penalties: 0,
            bump: bumps.collection,
        });

        msg!(
            "Collection {} created by {}",
            self.collection.name,
            self.admin.key()
        );
        emit!(CollectionCreated {
            collection: self.collection.key(),
            admin: self.admin.key(),
            total_members,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Add Member
// ---------------------------------------------------------------------------

#[derive(Accounts)]
#[instruction(new_member: Pubkey)]
pub struct AddMember<'info> {
    #[account(mut)]
    pub admin: Signer<'info>,

    #[account(
        mut,
        constraint = collection.admin == admin.key() @ SavingsError::Unauthorized
    )]
    pub collection: Account<'info, Collection>,

    #[account(
        init,
        payer = admin,
        space = 8 + Member::INIT_SPACE,
        seeds = [MEMBER_SEED, collection.key().as_ref(), new_member.as_ref()],
        bump
    )]
    pub member: Account<'info, Member>,

    pub system_program: Program<'info, System>,
}

impl<'info> AddMember<'info> {
    pub fn add_member(&mut self, bumps: &AddMemberBumps, new_member: Pubkey) -> Result<()> {
        require!(self.collection.is_active, SavingsError::Inactive);
        require!(
            self.collection.active_members < self.collection.total_members,
            SavingsError::CapacityExceeded
        );

        self.member.set_inner(Member {
            collection: self.collection.key(),
            owner: new_member,
            paid_periods: 0,
            last_paid: 0,
            total_paid: 0,
            can_withdraw: false,
            early_withdrawal_requested: false,
            bump: bumps.member,
        });
        self.collection.active_members += 1;

        msg!(
            "Member {} added ({}/{})",
            new_member,
            self.collection.active_members,
            self.collection.total_members
        );
        emit!(MemberAdded {
            collection: self.collection.key(),
            member: new_member,
            active_members: self.collection.active_members,
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Pay
// ---------------------------------------------------------------------------
// One contribution per period, exactly `amount_per_period` lamports.
// ---------------------------------------------------------------------------

#[derive(Accounts)]
pub struct Pay<'info> {
    #[account(mut)]
    pub owner: Signer<'info>,

    #[account(mut)]
    pub collection: Account<'info, Collection>,

    #[account(
        mut,
        has_one = collection @ SavingsError::Unauthorized,
        constraint = member.owner == owner.key() @ SavingsError::Unauthorized
    )]
    pub member: Account<'info, Member>,

    pub system_program: Program<'info, System>,
}

impl<'info> Pay<'info> {
    pub fn pay(&mut self, amount: u64) -> Result<()> {
        let now = Clock::get()?.unix_timestamp;
        record_payment(&mut self.collection, &mut self.member, amount, now)?;

        transfer(
            CpiContext::new(
                self.system_program.to_account_info(),
                Transfer {
                    from: self.owner.to_account_info(),
                    to: self.collection.to_account_info(),
                },
            ),
            amount,
        )?;

        msg!(
            "Payment {} of {} lamports from {}",
            self.member.paid_periods,
            amount,
            self.owner.key()
        );
        if self.member.can_withdraw {
            msg!("Member {} is now vested", self.owner.key());
        }
        emit!(PaymentReceived {
            collection: self.collection.key(),
            member: self.owner.key(),
            amount,
            paid_periods: self.member.paid_periods,
            can_withdraw: self.member.can_withdraw,
        });
        Ok(())
    }
}
