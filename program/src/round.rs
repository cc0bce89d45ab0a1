// Autoraffle Lottery Program - Round state machine
//
// Open --perform_upkeep--> AwaitingRandomness{id} --fulfill_random_words(id)--> Open
use solana_program::{
    clock::UnixTimestamp, msg, program_error::ProgramError, pubkey::Pubkey,
};

use crate::{
    config::LotteryConfig,
    error::LotteryError,
    events::LotteryEvent,
    payout::PrizeTransfer,
    state::{Lottery, RoundPhase, MAX_ENTRANTS},
    utils::lamports_to_sol,
    vrf::{winner_index, RandomWord, RandomnessOracle},
};

impl Lottery {
    /// A fresh lottery with an open, empty round starting at `now`
    pub fn new(config: LotteryConfig, bump: u8, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            bump,
            config,
            phase: RoundPhase::Open,
            entrants: Vec::new(),
            pooled_balance: 0,
            last_draw_timestamp: now,
            recent_winner: None,
        }
    }

    /// Admit one entry for `player`. Nothing changes unless every check passes.
    pub fn enter(&mut self, player: Pubkey, payment: u64) -> Result<(), ProgramError> {
        if payment < self.config.entry_fee {
            msg!(
                "Payment of {} lamports is below the entry fee of {}",
                payment,
                self.config.entry_fee
            );
            return Err(LotteryError::InsufficientPayment.into());
        }
        if !self.phase.is_open() {
            msg!("Round is waiting for randomness, entries are closed");
            return Err(LotteryError::RoundNotOpen.into());
        }
        if self.entrants.len() >= MAX_ENTRANTS {
            return Err(LotteryError::LotteryFull.into());
        }
        let pooled_balance = self
            .pooled_balance
            .checked_add(payment)
            .ok_or(LotteryError::Overflow)?;

        self.entrants.push(player);
        self.pooled_balance = pooled_balance;

        LotteryEvent::LotteryEntered { player }.emit();
        Ok(())
    }

    /// Whether a draw may start at `now`
    pub fn check_upkeep(&self, now: UnixTimestamp) -> bool {
        let elapsed = now.saturating_sub(self.last_draw_timestamp);
        let time_passed = elapsed >= 0 && elapsed as u64 >= self.config.draw_interval;

        self.phase.is_open()
            && time_passed
            && !self.entrants.is_empty()
            && self.pooled_balance > 0
    }

    /// Close entries and ask the oracle for randomness. The predicate is
    /// re-evaluated here, whatever the caller saw earlier.
    pub fn perform_upkeep<O: RandomnessOracle>(
        &mut self,
        now: UnixTimestamp,
        oracle: &mut O,
    ) -> Result<u64, ProgramError> {
        if !self.check_upkeep(now) {
            msg!(
                "Upkeep not needed: balance={} players={} phase={:?}",
                self.pooled_balance,
                self.entrants.len(),
                self.phase
            );
            return Err(LotteryError::UpkeepNotNeeded.into());
        }

        let request_id = oracle.request_random_words(&self.config.randomness_request())?;
        self.phase = RoundPhase::AwaitingRandomness { request_id };

        LotteryEvent::RequestedLotteryWinner { request_id }.emit();
        Ok(request_id)
    }

    /// Consume the randomness for the pending request, pay the whole pool to
    /// the selected entrant and open the next round.
    ///
    /// The ledger is reset before the transfer is attempted. If the transfer
    /// fails, every change made here is undone and the request stays pending.
    pub fn fulfill_random_words<T: PrizeTransfer>(
        &mut self,
        request_id: u64,
        random_word: &RandomWord,
        now: UnixTimestamp,
        payout: &mut T,
    ) -> Result<Pubkey, ProgramError> {
        match self.phase {
            RoundPhase::AwaitingRandomness { request_id: pending } if pending == request_id => {}
            _ => {
                msg!(
                    "No pending request {} (pending: {:?})",
                    request_id,
                    self.pending_request_id()
                );
                return Err(LotteryError::UnknownRequest.into());
            }
        }

        let index = winner_index(random_word, self.entrants.len())
            .ok_or(LotteryError::EntrantIndexOutOfBounds)?;
        let winner = self.player(index)?;
        let snapshot = self.clone();

        self.recent_winner = Some(winner);
        self.entrants.clear();
        let prize = std::mem::take(&mut self.pooled_balance);
        self.phase = RoundPhase::Open;
        self.last_draw_timestamp = now;

        if let Err(err) = payout.transfer(&winner, prize) {
            msg!("Payout of {} lamports to {} failed: {}", prize, winner, err);
            *self = snapshot;
            return Err(LotteryError::PayoutTransferFailed.into());
        }

        msg!(
            "Entrant #{} won {} SOL",
            index,
            lamports_to_sol(prize)
        );
        LotteryEvent::WinnerPicked { winner, prize }.emit();
        Ok(winner)
    }
}
