// Randomness coordinator interface
//
// Wire format shared by the lottery (which requests randomness through CPI)
// and any coordinator program that serves it, including the local stand-in in
// `mock_coordinator`.
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use std::mem::size_of;

use crate::{
    config::RandomnessRequest,
    utils::{unpack_fixed_bytes, unpack_u16, unpack_u32, unpack_u64},
};

/// Seed of the coordinator state PDA
pub const COORDINATOR_STATE_SEED: &[u8] = b"coordinator";
/// Seed of the PDA that signs fulfillment callbacks
pub const COORDINATOR_AUTHORITY_SEED: &[u8] = b"authority";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CoordinatorInstruction {
    /// Create the coordinator state account
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer
    /// 1. `[writable]` Coordinator state (PDA)
    /// 2. `[]` The system program
    Initialize,

    /// Register a randomness request. The new request id is returned as
    /// little-endian u64 return data.
    ///
    /// Accounts expected:
    /// 0. `[writable]` Coordinator state (PDA)
    RequestRandomWords {
        key_hash: [u8; 32],
        subscription_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u32,
        num_words: u32,
    },

    /// Deliver a random word to the consumer of a request
    ///
    /// Accounts expected:
    /// 0. `[]` Coordinator state (PDA)
    /// 1. `[]` Coordinator authority (PDA, signs the callback)
    /// 2. `[]` Consumer program
    /// 3. `[writable]` Consumer lottery account
    /// 4. `[writable]` Winner account forwarded to the consumer
    FulfillRandomWords {
        request_id: u64,
        random_word: [u8; 32],
    },
}

impl CoordinatorInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(ProgramError::InvalidInstructionData)?;

        Ok(match tag {
            0 => Self::Initialize,
            1 => {
                let (key_hash, rest) = unpack_fixed_bytes::<32>(rest)?;
                let (subscription_id, rest) = unpack_u64(rest)?;
                let (request_confirmations, rest) = unpack_u16(rest)?;
                let (callback_gas_limit, rest) = unpack_u32(rest)?;
                let (num_words, _) = unpack_u32(rest)?;
                Self::RequestRandomWords {
                    key_hash,
                    subscription_id,
                    request_confirmations,
                    callback_gas_limit,
                    num_words,
                }
            }
            2 => {
                let (request_id, rest) = unpack_u64(rest)?;
                let (random_word, _) = unpack_fixed_bytes::<32>(rest)?;
                Self::FulfillRandomWords {
                    request_id,
                    random_word,
                }
            }
            _ => return Err(ProgramError::InvalidInstructionData),
        })
    }

    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match self {
            Self::Initialize => buf.push(0),
            Self::RequestRandomWords {
                key_hash,
                subscription_id,
                request_confirmations,
                callback_gas_limit,
                num_words,
            } => {
                buf.push(1);
                buf.extend_from_slice(key_hash);
                buf.extend_from_slice(&subscription_id.to_le_bytes());
                buf.extend_from_slice(&request_confirmations.to_le_bytes());
                buf.extend_from_slice(&callback_gas_limit.to_le_bytes());
                buf.extend_from_slice(&num_words.to_le_bytes());
            }
            Self::FulfillRandomWords {
                request_id,
                random_word,
            } => {
                buf.push(2);
                buf.extend_from_slice(&request_id.to_le_bytes());
                buf.extend_from_slice(random_word);
            }
        }
        buf
    }
}

impl From<&RandomnessRequest> for CoordinatorInstruction {
    fn from(request: &RandomnessRequest) -> Self {
        Self::RequestRandomWords {
            key_hash: request.key_hash,
            subscription_id: request.subscription_id,
            request_confirmations: request.request_confirmations,
            callback_gas_limit: request.callback_gas_limit,
            num_words: request.num_words,
        }
    }
}

pub fn find_state_address(coordinator_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COORDINATOR_STATE_SEED], coordinator_id)
}

pub fn find_authority_address(coordinator_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[COORDINATOR_AUTHORITY_SEED], coordinator_id)
}

/// Create initialize instruction
pub fn initialize(coordinator_id: &Pubkey, payer: &Pubkey) -> Result<Instruction, ProgramError> {
    let (state, _) = find_state_address(coordinator_id);
    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(state, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *coordinator_id,
        accounts,
        data: CoordinatorInstruction::Initialize.pack(),
    })
}

/// Create request_random_words instruction
pub fn request_random_words(
    coordinator_id: &Pubkey,
    coordinator_state: &Pubkey,
    request: &RandomnessRequest,
) -> Result<Instruction, ProgramError> {
    Ok(Instruction {
        program_id: *coordinator_id,
        accounts: vec![AccountMeta::new(*coordinator_state, false)],
        data: CoordinatorInstruction::from(request).pack(),
    })
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    coordinator_id: &Pubkey,
    consumer_program: &Pubkey,
    lottery: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_word: [u8; 32],
) -> Result<Instruction, ProgramError> {
    let (state, _) = find_state_address(coordinator_id);
    let (authority, _) = find_authority_address(coordinator_id);
    let accounts = vec![
        AccountMeta::new_readonly(state, false),
        AccountMeta::new_readonly(authority, false),
        AccountMeta::new_readonly(*consumer_program, false),
        AccountMeta::new(*lottery, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *coordinator_id,
        accounts,
        data: CoordinatorInstruction::FulfillRandomWords {
            request_id,
            random_word,
        }
        .pack(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LotteryConfig;

    #[test]
    fn request_carries_config_parameters() {
        let config = LotteryConfig::localnet(Pubkey::new_unique(), Pubkey::new_unique());
        let data = CoordinatorInstruction::from(&config.randomness_request()).pack();
        assert_eq!(data.len(), 1 + 32 + 8 + 2 + 4 + 4);
        match CoordinatorInstruction::unpack(&data).unwrap() {
            CoordinatorInstruction::RequestRandomWords {
                key_hash,
                callback_gas_limit,
                num_words,
                ..
            } => {
                assert_eq!(key_hash, config.key_hash);
                assert_eq!(callback_gas_limit, config.callback_gas_limit);
                assert_eq!(num_words, 1);
            }
            other => panic!("unexpected instruction {:?}", other),
        }
    }

    #[test]
    fn fulfill_requires_full_word() {
        let mut data = CoordinatorInstruction::FulfillRandomWords {
            request_id: 1,
            random_word: [9; 32],
        }
        .pack();
        data.pop();
        assert_eq!(
            CoordinatorInstruction::unpack(&data),
            Err(ProgramError::InvalidInstructionData)
        );
    }

    #[test]
    fn authority_and_state_are_distinct() {
        let coordinator_id = Pubkey::new_unique();
        assert_ne!(
            find_state_address(&coordinator_id).0,
            find_authority_address(&coordinator_id).0
        );
    }
}
