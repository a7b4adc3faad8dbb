use std::path::PathBuf;

use anchor_lang::{
    AccountDeserialize, AccountSerialize, AnchorDeserialize, InstructionData, ToAccountMetas,
};
use litesvm::types::{FailedTransactionMetadata, TransactionResult};
use litesvm::LiteSVM;
use rotary_savings::error::SavingsError;
use rotary_savings::state::{EffectSummary, SettingsChange};
use rotary_savings::{accounts, instruction};
use solana_clock::Clock;
use solana_instruction::error::InstructionError;
use solana_instruction::Instruction;
use solana_keypair::Keypair;
use solana_native_token::LAMPORTS_PER_SOL;
use solana_pubkey::Pubkey;
use solana_signer::Signer;
use solana_transaction::Transaction;
use solana_transaction_error::TransactionError;

pub const PROGRAM_ID: Pubkey = rotary_savings::ID;

/// Address of the created proposal, or the failed transaction.
pub type ProposalResult = Result<Pubkey, FailedTransactionMetadata>;

/// Clock value every test starts from.
pub const START: i64 = 1_700_000_000;
pub const WEEK: i64 = 7 * 24 * 60 * 60;
pub const DURATION: i64 = 30 * 24 * 60 * 60;
pub const AMOUNT_PER_PERIOD: u64 = LAMPORTS_PER_SOL / 10;
pub const PENALTY_RATE: u8 = 5;
pub const COLLECTION_NAME: &str = "Test Collection";

pub fn read_program() -> Vec<u8> {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("..");
    path.push("target");
    path.push("deploy");
    path.push("rotary_savings.so");
    std::fs::read(&path).unwrap_or_else(|_| panic!("Failed to read program from {:?}", path))
}

pub fn setup_svm() -> LiteSVM {
    let mut svm = LiteSVM::new();
    svm.add_program(PROGRAM_ID, &read_program());
    warp_to(&mut svm, START);
    svm
}

pub fn warp_to(svm: &mut LiteSVM, unix_timestamp: i64) {
    let mut clock = svm.get_sysvar::<Clock>();
    clock.unix_timestamp = unix_timestamp;
    svm.set_sysvar(&clock);
}

pub fn funded_keypair(svm: &mut LiteSVM, lamports: u64) -> Keypair {
    let keypair = Keypair::new();
    svm.airdrop(&keypair.pubkey(), lamports).unwrap();
    keypair
}

pub fn lamports(svm: &LiteSVM, address: &Pubkey) -> u64 {
    svm.get_account(address).map_or(0, |account| account.lamports)
}

pub fn fetch<T: AccountDeserialize>(svm: &LiteSVM, address: &Pubkey) -> T {
    let account = svm
        .get_account(address)
        .unwrap_or_else(|| panic!("account {} missing", address));
    T::try_deserialize(&mut account.data.as_slice()).unwrap()
}

/// Signs and sends a single instruction. The blockhash is rotated first so
/// identical instructions sent twice are not rejected as duplicates.
pub fn send(
    svm: &mut LiteSVM,
    ix: Instruction,
    payer: &Keypair,
    signers: &[&Keypair],
) -> TransactionResult {
    svm.expire_blockhash();
    let blockhash = svm.latest_blockhash();
    let tx =
        Transaction::new_signed_with_payer(&[ix], Some(&payer.pubkey()), signers, blockhash);
    svm.send_transaction(tx)
}

pub fn assert_program_error<T>(
    result: Result<T, FailedTransactionMetadata>,
    expected: SavingsError,
) {
    let code = expected as u32 + anchor_lang::error::ERROR_CODE_OFFSET;
    match result {
        Err(failed) => match failed.err {
            TransactionError::InstructionError(_, InstructionError::Custom(actual)) => {
                assert_eq!(
                    actual, code,
                    "expected {:?}, logs: {:?}",
                    expected, failed.meta.logs
                )
            }
            other => panic!("expected {:?}, got {:?}", expected, other),
        },
        Ok(_) => panic!("expected {:?}, transaction succeeded", expected),
    }
}

pub fn collection_pda(admin: &Pubkey, name: &str) -> Pubkey {
    Pubkey::find_program_address(
        &[b"collection", admin.as_ref(), name.as_bytes()],
        &PROGRAM_ID,
    )
    .0
}

pub fn member_pda(collection: &Pubkey, owner: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[b"member", collection.as_ref(), owner.as_ref()],
        &PROGRAM_ID,
    )
    .0
}

pub fn multisig_pda(collection: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(&[b"multisig", collection.as_ref()], &PROGRAM_ID).0
}

pub fn proposal_pda(collection: &Pubkey, id: u64) -> Pubkey {
    Pubkey::find_program_address(
        &[b"proposal", collection.as_ref(), &id.to_le_bytes()],
        &PROGRAM_ID,
    )
    .0
}

/// A collection with an admin, a 2-of-3 signer group and enrolled members.
pub struct Circle {
    pub svm: LiteSVM,
    pub admin: Keypair,
    pub signers: Vec<Keypair>,
    pub members: Vec<Keypair>,
    pub collection: Pubkey,
    pub multisig: Pubkey,
}

impl Circle {
    /// Funded keypairs only, nothing created on chain yet.
    pub fn empty(member_count: usize) -> Self {
        let mut svm = setup_svm();
        let admin = funded_keypair(&mut svm, 10 * LAMPORTS_PER_SOL);
        let signers: Vec<Keypair> = (0..3)
            .map(|_| funded_keypair(&mut svm, LAMPORTS_PER_SOL))
            .collect();
        let members: Vec<Keypair> = (0..member_count)
            .map(|_| funded_keypair(&mut svm, 10 * LAMPORTS_PER_SOL))
            .collect();
        let collection = collection_pda(&admin.pubkey(), COLLECTION_NAME);
        let multisig = multisig_pda(&collection);

        Circle {
            svm,
            admin,
            signers,
            members,
            collection,
            multisig,
        }
    }

    pub fn new(member_count: usize) -> Self {
        let mut circle = Circle::empty(member_count);
        circle
            .create_collection(WEEK, DURATION, AMOUNT_PER_PERIOD, 5, PENALTY_RATE)
            .unwrap();
        let signer_keys = circle.signer_keys();
        circle.create_multisig(&signer_keys, 2).unwrap();
        for i in 0..member_count {
            let owner = circle.members[i].pubkey();
            circle.add_member(&owner).unwrap();
        }
        circle
    }

    pub fn signer_keys(&self) -> Vec<Pubkey> {
        self.signers.iter().map(|s| s.pubkey()).collect()
    }

    pub fn create_collection(
        &mut self,
        period: i64,
        duration: i64,
        amount_per_period: u64,
        total_members: u8,
        early_withdrawal_penalty_rate: u8,
    ) -> TransactionResult {
        let data = instruction::CreateCollection {
            name: COLLECTION_NAME.to_string(),
            duration,
            period,
            amount_per_period,
            total_members,
            early_withdrawal_penalty_rate,
        };
        let address = self.collection;
        self.send_create_collection(address, data)
    }

    /// Creates a collection under `name` at a caller-chosen address, for names
    /// that cannot be turned into a PDA off chain.
    pub fn create_collection_named(&mut self, name: &str, address: Pubkey) -> TransactionResult {
        let data = instruction::CreateCollection {
            name: name.to_string(),
            duration: DURATION,
            period: WEEK,
            amount_per_period: AMOUNT_PER_PERIOD,
            total_members: 5,
            early_withdrawal_penalty_rate: PENALTY_RATE,
        };
        self.send_create_collection(address, data)
    }

    fn send_create_collection(
        &mut self,
        address: Pubkey,
        data: instruction::CreateCollection,
    ) -> TransactionResult {
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts::CreateCollection {
                admin: self.admin.pubkey(),
                collection: address,
                system_program: solana_sdk_ids::system_program::ID,
            }
            .to_account_metas(None),
            data: data.data(),
        };
        send(&mut self.svm, ix, &self.admin, &[&self.admin])
    }

    pub fn create_multisig_as(
        &mut self,
        caller: &Keypair,
        signers: &[Pubkey],
        threshold: u8,
    ) -> TransactionResult {
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts::CreateMultisig {
                admin: caller.pubkey(),
                collection: self.collection,
                multisig: self.multisig,
                system_program: solana_sdk_ids::system_program::ID,
            }
            .to_account_metas(None),
            data: instruction::CreateMultisig {
                signers: signers.to_vec(),
                threshold,
            }
            .data(),
        };
        send(&mut self.svm, ix, caller, &[caller])
    }

    pub fn create_multisig(&mut self, signers: &[Pubkey], threshold: u8) -> TransactionResult {
        let admin = self.admin.insecure_clone();
        self.create_multisig_as(&admin, signers, threshold)
    }

    pub fn add_member_as(&mut self, caller: &Keypair, owner: &Pubkey) -> TransactionResult {
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts::AddMember {
                admin: caller.pubkey(),
                collection: self.collection,
                member: member_pda(&self.collection, owner),
                system_program: solana_sdk_ids::system_program::ID,
            }
            .to_account_metas(None),
            data: instruction::AddMember { new_member: *owner }.data(),
        };
        send(&mut self.svm, ix, caller, &[caller])
    }

    pub fn add_member(&mut self, owner: &Pubkey) -> TransactionResult {
        let admin = self.admin.insecure_clone();
        self.add_member_as(&admin, owner)
    }

    pub fn member_account(&self, index: usize) -> Pubkey {
        member_pda(&self.collection, &self.members[index].pubkey())
    }

    pub fn pay_as(
        &mut self,
        payer: &Keypair,
        member_index: usize,
        amount: u64,
    ) -> TransactionResult {
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts::Pay {
                owner: payer.pubkey(),
                collection: self.collection,
                member: self.member_account(member_index),
                system_program: solana_sdk_ids::system_program::ID,
            }
            .to_account_metas(None),
            data: instruction::Pay { amount }.data(),
        };
        send(&mut self.svm, ix, payer, &[payer])
    }

    pub fn pay(&mut self, member_index: usize) -> TransactionResult {
        let member = self.members[member_index].insecure_clone();
        self.pay_as(&member, member_index, AMOUNT_PER_PERIOD)
    }

    /// Pays `periods` contributions one week apart, starting at the current clock.
    pub fn pay_periods(&mut self, member_index: usize, periods: usize) {
        for _ in 0..periods {
            self.pay(member_index).unwrap();
            self.advance(WEEK);
        }
    }

    pub fn now(&self) -> i64 {
        self.svm.get_sysvar::<Clock>().unix_timestamp
    }

    pub fn advance(&mut self, seconds: i64) {
        let now = self.now();
        warp_to(&mut self.svm, now + seconds);
    }

    pub fn next_proposal(&self) -> Pubkey {
        let multisig: rotary_savings::state::Multisig = fetch(&self.svm, &self.multisig);
        proposal_pda(&self.collection, multisig.nonce)
    }

    fn create_proposal_accounts(
        &self,
        proposer: &Keypair,
        member: Option<Pubkey>,
    ) -> accounts::CreateProposal {
        accounts::CreateProposal {
            proposer: proposer.pubkey(),
            collection: self.collection,
            multisig: self.multisig,
            proposal: self.next_proposal(),
            member,
            system_program: solana_sdk_ids::system_program::ID,
        }
    }

    /// Sends one of the proposal instructions; returns the proposal address.
    pub fn propose<D: InstructionData>(
        &mut self,
        proposer: &Keypair,
        member: Option<Pubkey>,
        data: D,
    ) -> ProposalResult {
        let accounts = self.create_proposal_accounts(proposer, member);
        let proposal = accounts.proposal;
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts.to_account_metas(None),
            data: data.data(),
        };
        send(&mut self.svm, ix, proposer, &[proposer]).map(|_| proposal)
    }

    pub fn propose_withdraw(&mut self, proposer: &Keypair, member_index: usize) -> ProposalResult {
        let member = self.member_account(member_index);
        self.propose(proposer, Some(member), instruction::ProposeWithdraw {})
    }

    pub fn propose_early_withdraw(&mut self, member_index: usize) -> ProposalResult {
        let proposer = self.members[member_index].insecure_clone();
        let member = self.member_account(member_index);
        self.propose(&proposer, Some(member), instruction::ProposeEarlyWithdraw {})
    }

    pub fn propose_close(&mut self) -> ProposalResult {
        let admin = self.admin.insecure_clone();
        self.propose(&admin, None, instruction::ProposeCloseCollection {})
    }

    pub fn propose_settings(&mut self, settings: SettingsChange) -> ProposalResult {
        let admin = self.admin.insecure_clone();
        self.propose(&admin, None, instruction::ProposeAdjustSettings { settings })
    }

    pub fn vote_as(
        &mut self,
        voter: &Keypair,
        proposal: &Pubkey,
        approve: bool,
    ) -> TransactionResult {
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts::Vote {
                signer: voter.pubkey(),
                collection: self.collection,
                multisig: self.multisig,
                proposal: *proposal,
            }
            .to_account_metas(None),
            data: instruction::Vote { approve }.data(),
        };
        send(&mut self.svm, ix, voter, &[voter])
    }

    pub fn vote(
        &mut self,
        signer_index: usize,
        proposal: &Pubkey,
        approve: bool,
    ) -> TransactionResult {
        let voter = self.signers[signer_index].insecure_clone();
        self.vote_as(&voter, proposal, approve)
    }

    /// Executes `proposal`, passing the member ledger and wallet when given.
    pub fn execute(
        &mut self,
        proposal: &Pubkey,
        member_index: Option<usize>,
    ) -> TransactionResult {
        let (member, recipient) = match member_index {
            Some(i) => (Some(self.member_account(i)), Some(self.members[i].pubkey())),
            None => (None, None),
        };
        self.execute_with(proposal, member, recipient)
    }

    pub fn execute_with(
        &mut self,
        proposal: &Pubkey,
        member: Option<Pubkey>,
        recipient: Option<Pubkey>,
    ) -> TransactionResult {
        let executor = self.admin.insecure_clone();
        let ix = Instruction {
            program_id: PROGRAM_ID,
            accounts: accounts::ExecuteProposal {
                executor: executor.pubkey(),
                collection: self.collection,
                multisig: self.multisig,
                proposal: *proposal,
                member,
                recipient,
            }
            .to_account_metas(None),
            data: instruction::ExecuteProposal {}.data(),
        };
        send(&mut self.svm, ix, &executor, &[&executor])
    }

    /// Rewrites the collection account in place, bypassing the program.
    pub fn overwrite_collection(
        &mut self,
        edit: impl FnOnce(&mut rotary_savings::state::Collection),
    ) {
        let mut state = self.collection_state();
        edit(&mut state);
        let mut bytes = Vec::new();
        state.try_serialize(&mut bytes).unwrap();

        let mut account = self.svm.get_account(&self.collection).unwrap();
        account.data[..bytes.len()].copy_from_slice(&bytes);
        self.svm.set_account(self.collection, account).unwrap();
    }

    pub fn collection_state(&self) -> rotary_savings::state::Collection {
        fetch(&self.svm, &self.collection)
    }

    pub fn member_state(&self, index: usize) -> rotary_savings::state::Member {
        fetch(&self.svm, &self.member_account(index))
    }

    pub fn proposal_state(&self, proposal: &Pubkey) -> rotary_savings::state::Proposal {
        fetch(&self.svm, proposal)
    }
}

pub fn effect_summary(result: &TransactionResult) -> EffectSummary {
    let meta = result.as_ref().expect("execution failed");
    EffectSummary::deserialize(&mut meta.return_data.data.as_slice()).unwrap()
}
