//! Rotary Savings - Anchor Program
//!
//! A rotating savings circle. Members pay a fixed amount every period into a
//! pooled collection account and vest once their paid periods cover the
//! collection duration. Every movement of pooled funds, and every change to
//! the collection itself, goes through a proposal that a threshold of the
//! collection's signers must approve within seven days.
//!
//! Proposal kinds:
//! - Withdraw: pay a vested member everything they contributed
//! - EarlyWithdraw: pay an unvested member their stake minus the penalty
//! - AdjustSettings: replace schedule, amount and penalty rate
//! - CloseCollection: stop new payments and proposals

#![allow(unexpected_cfgs)]

use anchor_lang::prelude::*;

pub mod collection;
pub mod constants;
pub mod error;
pub mod events;
pub mod execute;
pub mod governance;
pub mod math;
pub mod multisig;
pub mod proposal;
pub mod state;
pub mod vote;

use collection::*;
use execute::*;
use multisig::*;
use proposal::*;
use state::{EffectSummary, ProposalKind, SettingsChange};
use vote::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod rotary_savings {
    use super::*;

    /// Create a savings circle administered by the signer.
    pub fn create_collection(
        ctx: Context<CreateCollection>,
        name: String,
        duration: i64,
        period: i64,
        amount_per_period: u64,
        total_members: u8,
        early_withdrawal_penalty_rate: u8,
    ) -> Result<()> {
        let settings = SettingsChange {
            duration,
            period,
            amount_per_period,
            early_withdrawal_penalty_rate,
        };
        ctx.accounts
            .create_collection(&ctx.bumps, name, settings, total_members)
    }

    /// Enroll a member. Admin only, bounded by `total_members`.
    pub fn add_member(ctx: Context<AddMember>, new_member: Pubkey) -> Result<()> {
        ctx.accounts.add_member(&ctx.bumps, new_member)
    }

    /// Contribute one period's amount.
    pub fn pay(ctx: Context<Pay>, amount: u64) -> Result<()> {
        ctx.accounts.pay(amount)
    }

    /// Register the signer group and approval threshold for a collection.
    pub fn create_multisig(
        ctx: Context<CreateMultisig>,
        signers: Vec<Pubkey>,
        threshold: u8,
    ) -> Result<()> {
        ctx.accounts.create_multisig(&ctx.bumps, signers, threshold)
    }

    /// Generic entry point taking the raw proposal type
    /// (0 withdraw, 1 close, 2 adjust settings, 3 early withdraw).
    pub fn create_proposal(
        ctx: Context<CreateProposal>,
        proposal_type: u8,
        settings: Option<SettingsChange>,
    ) -> Result<u64> {
        let kind = ProposalKind::try_from(proposal_type)?;
        ctx.accounts.create_proposal(&ctx.bumps, kind, settings)
    }

    /// Propose paying out a vested member. Anyone may propose on their behalf.
    pub fn propose_withdraw(ctx: Context<CreateProposal>) -> Result<u64> {
        ctx.accounts
            .create_proposal(&ctx.bumps, ProposalKind::Withdraw, None)
    }

    /// Member asks to leave before vesting, accepting the penalty.
    pub fn propose_early_withdraw(ctx: Context<CreateProposal>) -> Result<u64> {
        ctx.accounts
            .create_proposal(&ctx.bumps, ProposalKind::EarlyWithdraw, None)
    }

    /// Admin proposes closing the collection.
    pub fn propose_close_collection(ctx: Context<CreateProposal>) -> Result<u64> {
        ctx.accounts
            .create_proposal(&ctx.bumps, ProposalKind::CloseCollection, None)
    }

    /// Admin proposes new schedule, amount and penalty rate.
    pub fn propose_adjust_settings(
        ctx: Context<CreateProposal>,
        settings: SettingsChange,
    ) -> Result<u64> {
        ctx.accounts
            .create_proposal(&ctx.bumps, ProposalKind::AdjustSettings, Some(settings))
    }

    /// Approve or disapprove a proposal. Later votes replace earlier ones.
    pub fn vote(ctx: Context<Vote>, approve: bool) -> Result<()> {
        ctx.accounts.vote(approve)
    }

    /// Apply an approved proposal. Callable by anyone.
    pub fn execute_proposal(ctx: Context<ExecuteProposal>) -> Result<EffectSummary> {
        ctx.accounts.execute()
    }
}
