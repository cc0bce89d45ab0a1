// Autoraffle
// A self-operating lottery on Solana: players enter, anyone may start the
// draw once the interval has passed, and the randomness coordinator's
// callback pays the whole pool to one entrant.

// Core modules
pub mod config;
pub mod error;
pub mod events;
pub mod instruction;
pub mod processor;
pub mod round;
pub mod state;
pub mod utils;

// Randomness and payout seams
pub mod coordinator;
pub mod payout;
pub mod vrf;

// Local coordinator program used on localnet and in tests
pub mod mock_coordinator;

pub mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
