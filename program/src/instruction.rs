use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use std::mem::size_of;

use crate::{
    error::LotteryError,
    utils::{find_lottery_address, unpack_fixed_bytes, unpack_u16, unpack_u32, unpack_u64},
    vrf::RandomWord,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LotteryInstruction {
    /// Create the lottery account and open the first round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` Payer for the lottery account
    /// 1. `[writable]` The lottery account (PDA)
    /// 2. `[]` Randomness coordinator program
    /// 3. `[]` Fulfillment authority allowed to deliver randomness
    /// 4. `[]` The system program
    InitializeLottery {
        /// Minimum payment per entry in lamports
        entry_fee: u64,
        /// Seconds between draws
        draw_interval: u64,
        key_hash: [u8; 32],
        subscription_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u32,
    },

    /// Enter the current round
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The player, pays the entry
    /// 1. `[writable]` The lottery account
    /// 2. `[]` The system program
    EnterLottery {
        /// Lamports paid, at least the entry fee
        amount: u64,
    },

    /// Evaluate the upkeep predicate. Sets one byte of return data:
    /// 1 when a draw may start, 0 otherwise.
    ///
    /// Accounts expected:
    /// 0. `[]` The lottery account
    CheckUpkeep,

    /// Start a draw and request randomness (anyone may call)
    ///
    /// Accounts expected:
    /// 0. `[writable]` The lottery account
    /// 1. `[]` Randomness coordinator program
    /// 2. `[writable]` Coordinator state account
    PerformUpkeep,

    /// Deliver randomness for the pending request and pay the winner
    ///
    /// Accounts expected:
    /// 0. `[signer]` Fulfillment authority
    /// 1. `[writable]` The lottery account
    /// 2. `[writable]` The winner, `entrants[random_word mod entrants]`
    FulfillRandomWords {
        request_id: u64,
        random_word: RandomWord,
    },
}

impl LotteryInstruction {
    /// Unpacks a byte buffer into a LotteryInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(LotteryError::InvalidInstructionData)?;
        Self::unpack_payload(*tag, rest)
            .map_err(|_| ProgramError::from(LotteryError::InvalidInstructionData))
    }

    fn unpack_payload(tag: u8, rest: &[u8]) -> Result<Self, ProgramError> {
        Ok(match tag {
            0 => {
                let (entry_fee, rest) = unpack_u64(rest)?;
                let (draw_interval, rest) = unpack_u64(rest)?;
                let (key_hash, rest) = unpack_fixed_bytes::<32>(rest)?;
                let (subscription_id, rest) = unpack_u64(rest)?;
                let (request_confirmations, rest) = unpack_u16(rest)?;
                let (callback_gas_limit, _) = unpack_u32(rest)?;
                Self::InitializeLottery {
                    entry_fee,
                    draw_interval,
                    key_hash,
                    subscription_id,
                    request_confirmations,
                    callback_gas_limit,
                }
            }
            1 => {
                let (amount, _) = unpack_u64(rest)?;
                Self::EnterLottery { amount }
            }
            2 => Self::CheckUpkeep,
            3 => Self::PerformUpkeep,
            4 => {
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

    /// Packs a LotteryInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match *self {
            Self::InitializeLottery {
                entry_fee,
                draw_interval,
                ref key_hash,
                subscription_id,
                request_confirmations,
                callback_gas_limit,
            } => {
                buf.push(0);
                buf.extend_from_slice(&entry_fee.to_le_bytes());
                buf.extend_from_slice(&draw_interval.to_le_bytes());
                buf.extend_from_slice(key_hash);
                buf.extend_from_slice(&subscription_id.to_le_bytes());
                buf.extend_from_slice(&request_confirmations.to_le_bytes());
                buf.extend_from_slice(&callback_gas_limit.to_le_bytes());
            }
            Self::EnterLottery { amount } => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::CheckUpkeep => buf.push(2),
            Self::PerformUpkeep => buf.push(3),
            Self::FulfillRandomWords {
                request_id,
                ref random_word,
            } => {
                buf.push(4);
                buf.extend_from_slice(&request_id.to_le_bytes());
                buf.extend_from_slice(random_word);
            }
        }
        buf
    }
}

/// Create initialize_lottery instruction
#[allow(clippy::too_many_arguments)]
pub fn initialize_lottery(
    program_id: &Pubkey,
    payer: &Pubkey,
    coordinator: &Pubkey,
    fulfillment_authority: &Pubkey,
    entry_fee: u64,
    draw_interval: u64,
    key_hash: [u8; 32],
    subscription_id: u64,
    request_confirmations: u16,
    callback_gas_limit: u32,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = find_lottery_address(program_id);
    let data = LotteryInstruction::InitializeLottery {
        entry_fee,
        draw_interval,
        key_hash,
        subscription_id,
        request_confirmations,
        callback_gas_limit,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(*coordinator, false),
        AccountMeta::new_readonly(*fulfillment_authority, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create enter_lottery instruction
pub fn enter_lottery(
    program_id: &Pubkey,
    player: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = find_lottery_address(program_id);
    let data = LotteryInstruction::EnterLottery { amount }.pack();

    let accounts = vec![
        AccountMeta::new(*player, true),
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}

/// Create check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey) -> Result<Instruction, ProgramError> {
    let (lottery, _) = find_lottery_address(program_id);

    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(lottery, false)],
        data: LotteryInstruction::CheckUpkeep.pack(),
    })
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    coordinator: &Pubkey,
    coordinator_state: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (lottery, _) = find_lottery_address(program_id);

    let accounts = vec![
        AccountMeta::new(lottery, false),
        AccountMeta::new_readonly(*coordinator, false),
        AccountMeta::new(*coordinator_state, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: LotteryInstruction::PerformUpkeep.pack(),
    })
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    fulfillment_authority: &Pubkey,
    lottery: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_word: RandomWord,
) -> Result<Instruction, ProgramError> {
    let data = LotteryInstruction::FulfillRandomWords {
        request_id,
        random_word,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*fulfillment_authority, true),
        AccountMeta::new(*lottery, false),
        AccountMeta::new(*winner, false),
    ];

    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data,
    })
}
