// Randomness oracle integration for the lottery program
use solana_program::{
    account_info::AccountInfo,
    msg,
    program::{get_return_data, invoke},
    program_error::ProgramError,
};
use std::convert::TryInto;

use crate::{config::RandomnessRequest, coordinator, error::LotteryError};

/// A 32-byte random value, read as a big-endian unsigned integer
pub type RandomWord = [u8; 32];

/// Something that accepts randomness requests and hands back a correlation id.
/// The randomness itself arrives later through the lottery's fulfillment
/// entry point.
pub trait RandomnessOracle {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<u64, ProgramError>;
}

/// Requests randomness from a coordinator program through CPI
pub struct CoordinatorOracle<'a, 'info> {
    pub coordinator_program: &'a AccountInfo<'info>,
    pub coordinator_state: &'a AccountInfo<'info>,
}

impl<'a, 'info> RandomnessOracle for CoordinatorOracle<'a, 'info> {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<u64, ProgramError> {
        let instruction = coordinator::request_random_words(
            self.coordinator_program.key,
            self.coordinator_state.key,
            request,
        )?;
        invoke(
            &instruction,
            &[
                self.coordinator_state.clone(),
                self.coordinator_program.clone(),
            ],
        )?;

        let (program_id, data) = get_return_data().ok_or_else(|| {
            msg!("Coordinator returned no request id");
            ProgramError::from(LotteryError::InvalidCoordinator)
        })?;
        if program_id != *self.coordinator_program.key {
            msg!("Return data set by unexpected program {}", program_id);
            return Err(LotteryError::InvalidCoordinator.into());
        }
        parse_request_id(&data)
    }
}

fn parse_request_id(data: &[u8]) -> Result<u64, ProgramError> {
    let bytes: [u8; 8] = data
        .get(..8)
        .and_then(|slice| slice.try_into().ok())
        .ok_or(LotteryError::InvalidCoordinator)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Reduce a random word modulo the number of entrants.
///
/// Modulo bias is accepted: with at most a few hundred entrants against a
/// 256-bit word it is negligible.
pub fn winner_index(random_word: &RandomWord, entrant_count: usize) -> Option<usize> {
    if entrant_count == 0 {
        return None;
    }
    let modulus = entrant_count as u128;
    let remainder = random_word
        .iter()
        .fold(0u128, |acc, byte| ((acc << 8) | *byte as u128) % modulus);
    Some(remainder as usize)
}

/// Encode a small value as a random word, handy for tests and tooling
pub fn random_word_from_u64(value: u64) -> RandomWord {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_select_by_modulo() {
        assert_eq!(winner_index(&random_word_from_u64(5), 3), Some(2));
        assert_eq!(winner_index(&random_word_from_u64(2), 4), Some(2));
        assert_eq!(winner_index(&random_word_from_u64(9), 1), Some(0));
    }

    #[test]
    fn no_entrants_no_index() {
        assert_eq!(winner_index(&[0xff; 32], 0), None);
    }

    #[test]
    fn full_width_word_is_reduced_as_uint256() {
        // 2^256 - 1 = (2^8)^32 - 1, and 256 ≡ 1 (mod 255), so the result is 0
        assert_eq!(winner_index(&[0xff; 32], 255), Some(0));
        // 2^256 - 1 is odd, and ≡ 0 (mod 3) since 2^256 ≡ 1 (mod 3)
        assert_eq!(winner_index(&[0xff; 32], 2), Some(1));
        assert_eq!(winner_index(&[0xff; 32], 3), Some(0));
    }

    #[test]
    fn high_bytes_influence_selection() {
        let mut word = [0u8; 32];
        word[0] = 1; // 2^248
        // 2^248 mod 7: 2^3 ≡ 1 (mod 7), 248 = 3 * 82 + 2, so 2^248 ≡ 4
        assert_eq!(winner_index(&word, 7), Some(4));
    }

    #[test]
    fn request_id_needs_eight_bytes() {
        assert_eq!(parse_request_id(&7u64.to_le_bytes()).unwrap(), 7);
        assert_eq!(
            parse_request_id(&[1, 2, 3]),
            Err(LotteryError::InvalidCoordinator.into())
        );
    }
}
