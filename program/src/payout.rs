// Autoraffle Lottery Program - Prize payout
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey, rent::Rent,
};

use crate::error::LotteryError;

/// Moves the prize to the winner. Must either apply completely or fail.
pub trait PrizeTransfer {
    fn transfer(&mut self, recipient: &Pubkey, amount: u64) -> ProgramResult;
}

/// Pays out of a program-owned account by moving lamports directly. The rent
/// reserve of the source account is never spent.
pub struct LamportPayout<'a, 'info> {
    pub source: &'a AccountInfo<'info>,
    pub recipient: &'a AccountInfo<'info>,
    pub rent: Rent,
}

impl<'a, 'info> PrizeTransfer for LamportPayout<'a, 'info> {
    fn transfer(&mut self, recipient: &Pubkey, amount: u64) -> ProgramResult {
        if self.recipient.key != recipient {
            msg!(
                "Winner account mismatch: expected {}, got {}",
                recipient,
                self.recipient.key
            );
            return Err(ProgramError::InvalidAccountData);
        }
        if !self.recipient.is_writable {
            msg!("Winner account {} is not writable", recipient);
            return Err(ProgramError::InvalidAccountData);
        }

        let reserve = self.rent.minimum_balance(self.source.data_len());
        let source_lamports = self.source.lamports();
        let remaining = source_lamports
            .checked_sub(amount)
            .filter(|remaining| *remaining >= reserve)
            .ok_or_else(|| {
                msg!(
                    "Insufficient pool lamports: have {}, paying {}, reserve {}",
                    source_lamports,
                    amount,
                    reserve
                );
                ProgramError::InsufficientFunds
            })?;
        let credited = self
            .recipient
            .lamports()
            .checked_add(amount)
            .ok_or(LotteryError::Overflow)?;

        **self.source.try_borrow_mut_lamports()? = remaining;
        **self.recipient.try_borrow_mut_lamports()? = credited;
        Ok(())
    }
}
