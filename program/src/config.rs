// Autoraffle Lottery Program - Configuration
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::error::LotteryError;

/// Number of random words requested per draw
pub const NUM_WORDS: u32 = 1;

/// 0.01 SOL
pub const DEFAULT_ENTRY_FEE: u64 = 10_000_000;
/// Seconds between draws
pub const DEFAULT_DRAW_INTERVAL: u64 = 30;
pub const DEFAULT_CALLBACK_GAS_LIMIT: u32 = 500_000;
pub const DEFAULT_REQUEST_CONFIRMATIONS: u16 = 3;
/// Gas lane used by local deployments
pub const LOCALNET_KEY_HASH: [u8; 32] = [
    0xd8, 0x9b, 0x2b, 0xf1, 0x50, 0xe3, 0xb9, 0xe1, 0x34, 0x46, 0x98, 0x6e, 0x57, 0x1f, 0xb9, 0xca,
    0xb2, 0x4b, 0x13, 0xce, 0xa0, 0xa4, 0x3e, 0xa2, 0x0a, 0x60, 0x49, 0xa8, 0x5c, 0xc8, 0x07, 0xcc,
];

/// Deployment parameters, fixed once the lottery is initialized
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LotteryConfig {
    /// Minimum payment per entry in lamports
    pub entry_fee: u64,
    /// Minimum seconds since the last draw before upkeep is eligible
    pub draw_interval: u64,
    /// Randomness coordinator program
    pub coordinator: Pubkey,
    /// The only signer allowed to deliver randomness
    pub fulfillment_authority: Pubkey,
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
}

impl LotteryConfig {
    pub const LEN: usize = 8 + 8 + 32 + 32 + 32 + 8 + 2 + 4;

    /// Local network preset: 0.01 SOL entries drawn every 30 seconds
    pub fn localnet(coordinator: Pubkey, fulfillment_authority: Pubkey) -> Self {
        Self {
            entry_fee: DEFAULT_ENTRY_FEE,
            draw_interval: DEFAULT_DRAW_INTERVAL,
            coordinator,
            fulfillment_authority,
            key_hash: LOCALNET_KEY_HASH,
            subscription_id: 0,
            request_confirmations: DEFAULT_REQUEST_CONFIRMATIONS,
            callback_gas_limit: DEFAULT_CALLBACK_GAS_LIMIT,
        }
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.coordinator == Pubkey::default() {
            msg!("Coordinator program must be set");
            return Err(LotteryError::InvalidConfig.into());
        }
        if self.fulfillment_authority == Pubkey::default() {
            msg!("Fulfillment authority must be set");
            return Err(LotteryError::InvalidConfig.into());
        }
        if self.callback_gas_limit == 0 {
            msg!("Callback gas limit must be greater than zero");
            return Err(LotteryError::InvalidConfig.into());
        }
        Ok(())
    }

    /// Parameters forwarded verbatim to the coordinator on every draw
    pub fn randomness_request(&self) -> RandomnessRequest {
        RandomnessRequest {
            key_hash: self.key_hash,
            subscription_id: self.subscription_id,
            request_confirmations: self.request_confirmations,
            callback_gas_limit: self.callback_gas_limit,
            num_words: NUM_WORDS,
        }
    }
}

/// A single randomness request as seen by the coordinator
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub key_hash: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use borsh::BorshSerialize;

    fn key_hash_from_hex(hex: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&hex[2 * i..2 * i + 2], 16).unwrap();
        }
        out
    }

    #[test]
    fn localnet_preset_is_valid() {
        let config = LotteryConfig::localnet(Pubkey::new_unique(), Pubkey::new_unique());
        assert!(config.validate().is_ok());
        assert_eq!(config.entry_fee, 10_000_000);
        assert_eq!(config.draw_interval, 30);
    }

    #[test]
    fn rejects_missing_oracle_wiring() {
        let mut config = LotteryConfig::localnet(Pubkey::default(), Pubkey::new_unique());
        assert_eq!(
            config.validate(),
            Err(LotteryError::InvalidConfig.into())
        );

        config.coordinator = Pubkey::new_unique();
        config.fulfillment_authority = Pubkey::default();
        assert_eq!(
            config.validate(),
            Err(LotteryError::InvalidConfig.into())
        );
    }

    #[test]
    fn zero_entry_fee_is_allowed() {
        let mut config = LotteryConfig::localnet(Pubkey::new_unique(), Pubkey::new_unique());
        config.entry_fee = 0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn serialized_size_matches_len() {
        let config = LotteryConfig::localnet(Pubkey::new_unique(), Pubkey::new_unique());
        assert_eq!(config.try_to_vec().unwrap().len(), LotteryConfig::LEN);
    }

    #[test]
    fn request_carries_single_word() {
        let config = LotteryConfig::localnet(Pubkey::new_unique(), Pubkey::new_unique());
        let request = config.randomness_request();
        assert_eq!(request.num_words, NUM_WORDS);
        assert_eq!(
            request.key_hash,
            key_hash_from_hex("d89b2bf150e3b9e13446986e571fb9cab24b13cea0a43ea20a6049a85cc807cc")
        );
        assert_eq!(request.callback_gas_limit, 500_000);
    }
}
