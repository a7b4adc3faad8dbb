//! Seeds and limits shared by every instruction

pub const COLLECTION_SEED: &[u8] = b"collection";
pub const MEMBER_SEED: &[u8] = b"member";
pub const MULTISIG_SEED: &[u8] = b"multisig";
pub const PROPOSAL_SEED: &[u8] = b"proposal";

/// Seconds a proposal stays open for voting and execution.
pub const PROPOSAL_LIFETIME: i64 = 7 * 24 * 60 * 60;

/// Upper bound on the signer set, fixes the multisig account size.
pub const MAX_SIGNERS: usize = 10;

/// A PDA seed component cannot exceed 32 bytes.
pub const MAX_NAME_LEN: usize = 32;

pub const MAX_PENALTY_RATE: u8 = 100;
