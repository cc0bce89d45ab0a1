// Program entrypoint
#![cfg(not(feature = "no-entrypoint"))]

use solana_program::{
    account_info::AccountInfo, entrypoint, entrypoint::ProgramResult,
    program_error::{PrintProgramError, ProgramError},
    pubkey::Pubkey,
};

use crate::error::LotteryError;

entrypoint!(process_instruction);

fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    if let Err(error) = crate::process_instruction(program_id, accounts, instruction_data) {
        if let ProgramError::Custom(code) = error {
            if let Some(lottery_error) = LotteryError::from_code(code) {
                lottery_error.print::<LotteryError>();
            }
        }
        return Err(error);
    }
    Ok(())
}
