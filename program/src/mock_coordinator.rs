// Local randomness coordinator
//
// A stand-in coordinator for localnet and tests. It hands out sequential
// request ids and forwards whatever random word the caller supplies to the
// consumer lottery, signing the callback with its authority PDA.
use arrayref::{array_mut_ref, array_ref, array_refs, mut_array_refs};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke_signed, set_return_data},
    program_error::ProgramError,
    program_pack::{IsInitialized, Pack, Sealed},
    pubkey::Pubkey,
    rent::Rent,
    system_instruction,
    sysvar::Sysvar,
};

use crate::{
    coordinator::{
        find_authority_address, find_state_address, CoordinatorInstruction,
        COORDINATOR_AUTHORITY_SEED, COORDINATOR_STATE_SEED,
    },
    instruction,
};

/// Coordinator state account data
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinatorState {
    pub is_initialized: bool,
    /// Id handed to the next request. Ids below this have been issued.
    pub next_request_id: u64,
    pub authority_bump: u8,
}

impl Sealed for CoordinatorState {}

impl IsInitialized for CoordinatorState {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Pack for CoordinatorState {
    const LEN: usize = 1 + 8 + 1;

    fn unpack_from_slice(src: &[u8]) -> Result<Self, ProgramError> {
        let src = array_ref![src, 0, CoordinatorState::LEN];
        let (is_initialized, next_request_id, authority_bump) = array_refs![src, 1, 8, 1];

        let is_initialized = match is_initialized {
            [0] => false,
            [1] => true,
            _ => return Err(ProgramError::InvalidAccountData),
        };

        Ok(CoordinatorState {
            is_initialized,
            next_request_id: u64::from_le_bytes(*next_request_id),
            authority_bump: authority_bump[0],
        })
    }

    fn pack_into_slice(&self, dst: &mut [u8]) {
        let dst = array_mut_ref![dst, 0, CoordinatorState::LEN];
        let (is_initialized_dst, next_request_id_dst, authority_bump_dst) =
            mut_array_refs![dst, 1, 8, 1];

        is_initialized_dst[0] = self.is_initialized as u8;
        *next_request_id_dst = self.next_request_id.to_le_bytes();
        authority_bump_dst[0] = self.authority_bump;
    }
}

impl CoordinatorState {
    /// Issue the next request id
    pub fn issue_request_id(&mut self) -> Result<u64, ProgramError> {
        let request_id = self.next_request_id;
        self.next_request_id = request_id
            .checked_add(1)
            .ok_or(ProgramError::InvalidAccountData)?;
        Ok(request_id)
    }

    /// Whether `request_id` was handed out by this coordinator
    pub fn has_issued(&self, request_id: u64) -> bool {
        request_id != 0 && request_id < self.next_request_id
    }
}

fn load_state(state_info: &AccountInfo, program_id: &Pubkey) -> Result<CoordinatorState, ProgramError> {
    if state_info.owner != program_id {
        msg!("Coordinator state is not owned by the coordinator");
        return Err(ProgramError::IncorrectProgramId);
    }
    CoordinatorState::unpack(&state_info.data.borrow())
}

/// Entry point of the coordinator program
pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    match CoordinatorInstruction::unpack(instruction_data)? {
        CoordinatorInstruction::Initialize => {
            msg!("Coordinator: Initialize");
            process_initialize(program_id, accounts)
        }
        CoordinatorInstruction::RequestRandomWords {
            subscription_id,
            num_words,
            ..
        } => {
            msg!("Coordinator: Request Random Words");
            process_request(program_id, accounts, subscription_id, num_words)
        }
        CoordinatorInstruction::FulfillRandomWords {
            request_id,
            random_word,
        } => {
            msg!("Coordinator: Fulfill Random Words");
            process_fulfill(program_id, accounts, request_id, random_word)
        }
    }
}

fn process_initialize(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let payer_info = next_account_info(account_info_iter)?;
    let state_info = next_account_info(account_info_iter)?;
    let system_program_info = next_account_info(account_info_iter)?;

    if !payer_info.is_signer {
        return Err(ProgramError::MissingRequiredSignature);
    }

    let (expected_state, state_bump) = find_state_address(program_id);
    if *state_info.key != expected_state {
        return Err(ProgramError::InvalidSeeds);
    }
    if state_info.owner == program_id {
        return Err(ProgramError::AccountAlreadyInitialized);
    }

    let rent = Rent::get()?;
    invoke_signed(
        &system_instruction::create_account(
            payer_info.key,
            state_info.key,
            rent.minimum_balance(CoordinatorState::LEN),
            CoordinatorState::LEN as u64,
            program_id,
        ),
        &[
            payer_info.clone(),
            state_info.clone(),
            system_program_info.clone(),
        ],
        &[&[COORDINATOR_STATE_SEED, &[state_bump]]],
    )?;

    let (_, authority_bump) = find_authority_address(program_id);
    let state = CoordinatorState {
        is_initialized: true,
        next_request_id: 1,
        authority_bump,
    };
    CoordinatorState::pack(state, &mut state_info.data.borrow_mut())?;
    Ok(())
}

fn process_request(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    subscription_id: u64,
    num_words: u32,
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let state_info = next_account_info(account_info_iter)?;

    let mut state = load_state(state_info, program_id)?;
    let request_id = state.issue_request_id()?;
    CoordinatorState::pack(state, &mut state_info.data.borrow_mut())?;

    msg!(
        "Request {} registered: subscription {}, {} word(s)",
        request_id,
        subscription_id,
        num_words
    );
    set_return_data(&request_id.to_le_bytes());
    Ok(())
}

fn process_fulfill(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    request_id: u64,
    random_word: [u8; 32],
) -> ProgramResult {
    let account_info_iter = &mut accounts.iter();
    let state_info = next_account_info(account_info_iter)?;
    let authority_info = next_account_info(account_info_iter)?;
    let consumer_program_info = next_account_info(account_info_iter)?;
    let lottery_info = next_account_info(account_info_iter)?;
    let winner_info = next_account_info(account_info_iter)?;

    let state = load_state(state_info, program_id)?;
    if !state.has_issued(request_id) {
        msg!("nonexistent request {}", request_id);
        return Err(ProgramError::InvalidArgument);
    }

    let authority = Pubkey::create_program_address(
        &[COORDINATOR_AUTHORITY_SEED, &[state.authority_bump]],
        program_id,
    )?;
    if *authority_info.key != authority {
        return Err(ProgramError::InvalidSeeds);
    }

    let callback = instruction::fulfill_random_words(
        consumer_program_info.key,
        authority_info.key,
        lottery_info.key,
        winner_info.key,
        request_id,
        random_word,
    )?;
    invoke_signed(
        &callback,
        &[
            authority_info.clone(),
            lottery_info.clone(),
            winner_info.clone(),
            consumer_program_info.clone(),
        ],
        &[&[COORDINATOR_AUTHORITY_SEED, &[state.authority_bump]]],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_start_at_one_and_increase() {
        let mut state = CoordinatorState {
            is_initialized: true,
            next_request_id: 1,
            authority_bump: 255,
        };
        assert!(!state.has_issued(1));
        assert_eq!(state.issue_request_id().unwrap(), 1);
        assert_eq!(state.issue_request_id().unwrap(), 2);
        assert!(state.has_issued(1));
        assert!(state.has_issued(2));
        assert!(!state.has_issued(0));
        assert!(!state.has_issued(3));
    }

    #[test]
    fn state_layout() {
        let state = CoordinatorState {
            is_initialized: true,
            next_request_id: 0x0102,
            authority_bump: 7,
        };
        let mut buf = [0u8; CoordinatorState::LEN];
        CoordinatorState::pack(state, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 1, 0, 0, 0, 0, 0, 0, 7]);
        assert_eq!(CoordinatorState::unpack(&buf).unwrap(), state);
    }

    #[test]
    fn uninitialized_state_is_rejected() {
        let buf = [0u8; CoordinatorState::LEN];
        assert_eq!(
            CoordinatorState::unpack(&buf),
            Err(ProgramError::UninitializedAccount)
        );
    }
}
