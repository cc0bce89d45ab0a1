// Autoraffle Lottery Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::AccountInfo,
    clock::UnixTimestamp,
    program_error::ProgramError,
    program_pack::{IsInitialized, Sealed},
    pubkey::Pubkey,
};

use crate::{config::LotteryConfig, error::LotteryError};

/// Upper bound on entries per round, sized so the account stays under 10 KiB
pub const MAX_ENTRANTS: usize = 256;

/// Seed of the lottery PDA
pub const LOTTERY_SEED: &[u8] = b"lottery";

/// Phase of the current round
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    /// Accepting entries
    Open,
    /// Draw started, waiting for the coordinator to deliver randomness
    AwaitingRandomness { request_id: u64 },
}

impl RoundPhase {
    pub const LEN: usize = 1 + 8;

    pub fn is_open(&self) -> bool {
        matches!(self, RoundPhase::Open)
    }
}

impl Default for RoundPhase {
    fn default() -> Self {
        RoundPhase::Open
    }
}

/// Lottery account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Lottery {
    /// Is the lottery initialized
    pub is_initialized: bool,
    /// Bump of the lottery PDA
    pub bump: u8,
    /// Immutable deployment parameters
    pub config: LotteryConfig,
    /// Phase of the current round
    pub phase: RoundPhase,
    /// One slot per entry, in entry order
    pub entrants: Vec<Pubkey>,
    /// Lamports collected since the last payout
    pub pooled_balance: u64,
    /// Creation time or time of the last reset
    pub last_draw_timestamp: UnixTimestamp,
    /// Most recently paid winner
    pub recent_winner: Option<Pubkey>,
}

impl Sealed for Lottery {}

impl IsInitialized for Lottery {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

impl Lottery {
    pub const LEN: usize = 1
        + 1
        + LotteryConfig::LEN
        + RoundPhase::LEN
        + 4
        + 32 * MAX_ENTRANTS
        + 8
        + 8
        + 1
        + 32;

    /// Decode account data. Trailing bytes past the encoded value are ignored.
    pub fn unpack_account_data(data: &[u8]) -> Result<Self, ProgramError> {
        Self::deserialize(&mut &data[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    /// Load an initialized lottery owned by `program_id`
    pub fn load(account: &AccountInfo, program_id: &Pubkey) -> Result<Self, ProgramError> {
        if account.owner != program_id {
            return Err(ProgramError::IncorrectProgramId);
        }
        let lottery = Self::unpack_account_data(&account.data.borrow())?;
        if !lottery.is_initialized {
            return Err(LotteryError::NotInitialized.into());
        }
        Ok(lottery)
    }

    pub fn save(&self, account: &AccountInfo) -> Result<(), ProgramError> {
        self.serialize(&mut &mut account.data.borrow_mut()[..])
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entry_fee
    }

    pub fn interval(&self) -> u64 {
        self.config.draw_interval
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn player(&self, index: usize) -> Result<Pubkey, ProgramError> {
        self.entrants
            .get(index)
            .copied()
            .ok_or_else(|| LotteryError::EntrantIndexOutOfBounds.into())
    }

    pub fn number_of_players(&self) -> usize {
        self.entrants.len()
    }

    pub fn recent_winner(&self) -> Option<Pubkey> {
        self.recent_winner
    }

    pub fn latest_timestamp(&self) -> UnixTimestamp {
        self.last_draw_timestamp
    }

    pub fn pooled_balance(&self) -> u64 {
        self.pooled_balance
    }

    pub fn pending_request_id(&self) -> Option<u64> {
        match self.phase {
            RoundPhase::Open => None,
            RoundPhase::AwaitingRandomness { request_id } => Some(request_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_lottery() -> Lottery {
        Lottery {
            is_initialized: true,
            bump: 254,
            config: LotteryConfig::localnet(Pubkey::new_unique(), Pubkey::new_unique()),
            phase: RoundPhase::AwaitingRandomness { request_id: 7 },
            entrants: vec![Pubkey::new_unique(); MAX_ENTRANTS],
            pooled_balance: u64::MAX,
            last_draw_timestamp: 1_700_000_000,
            recent_winner: Some(Pubkey::new_unique()),
        }
    }

    #[test]
    fn worst_case_encoding_fits_account() {
        let encoded = full_lottery().try_to_vec().unwrap();
        assert_eq!(encoded.len(), Lottery::LEN);
    }

    #[test]
    fn unpack_ignores_trailing_bytes() {
        let mut lottery = full_lottery();
        lottery.entrants.truncate(2);
        let mut data = vec![0u8; Lottery::LEN];
        let encoded = lottery.try_to_vec().unwrap();
        data[..encoded.len()].copy_from_slice(&encoded);

        assert_eq!(Lottery::unpack_account_data(&data).unwrap(), lottery);
    }

    #[test]
    fn zeroed_account_is_uninitialized() {
        let data = vec![0u8; Lottery::LEN];
        let lottery = Lottery::unpack_account_data(&data).unwrap();
        assert!(!lottery.is_initialized());
        assert!(lottery.phase().is_open());
    }

    #[test]
    fn player_index_is_bounds_checked() {
        let lottery = Lottery::default();
        assert_eq!(
            lottery.player(0),
            Err(LotteryError::EntrantIndexOutOfBounds.into())
        );
    }

    #[test]
    fn pending_request_follows_phase() {
        let mut lottery = full_lottery();
        assert_eq!(lottery.pending_request_id(), Some(7));
        lottery.phase = RoundPhase::Open;
        assert_eq!(lottery.pending_request_id(), None);
    }
}
