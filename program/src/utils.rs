// Autoraffle Lottery Program - Utility Functions
use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use std::convert::TryInto;

use crate::state::LOTTERY_SEED;

/// Find the program derived address of the lottery
pub fn find_lottery_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[LOTTERY_SEED], program_id)
}

/// Convert lamports to SOL (for display purposes)
pub fn lamports_to_sol(lamports: u64) -> f64 {
    lamports as f64 / 1_000_000_000.0
}

pub(crate) fn unpack_fixed_bytes<const N: usize>(
    input: &[u8],
) -> Result<([u8; N], &[u8]), ProgramError> {
    if input.len() < N {
        return Err(ProgramError::InvalidInstructionData);
    }
    let (bytes, rest) = input.split_at(N);
    let bytes = bytes
        .try_into()
        .map_err(|_| ProgramError::InvalidInstructionData)?;
    Ok((bytes, rest))
}

pub(crate) fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
    let (bytes, rest) = unpack_fixed_bytes::<8>(input)?;
    Ok((u64::from_le_bytes(bytes), rest))
}

pub(crate) fn unpack_u32(input: &[u8]) -> Result<(u32, &[u8]), ProgramError> {
    let (bytes, rest) = unpack_fixed_bytes::<4>(input)?;
    Ok((u32::from_le_bytes(bytes), rest))
}

pub(crate) fn unpack_u16(input: &[u8]) -> Result<(u16, &[u8]), ProgramError> {
    let (bytes, rest) = unpack_fixed_bytes::<2>(input)?;
    Ok((u16::from_le_bytes(bytes), rest))
}
