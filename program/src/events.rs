// Autoraffle Lottery Program - Events
//
// Events are borsh-encoded and written with `sol_log_data` so indexers can
// decode them from transaction logs.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{log::sol_log_data, msg, pubkey::Pubkey};

#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum LotteryEvent {
    /// A player bought an entry into the current round
    LotteryEntered { player: Pubkey },
    /// A draw started and randomness was requested
    RequestedLotteryWinner { request_id: u64 },
    /// The round closed and the pool was paid out
    WinnerPicked { winner: Pubkey, prize: u64 },
}

impl LotteryEvent {
    pub fn emit(&self) {
        match self {
            LotteryEvent::LotteryEntered { player } => msg!("LotteryEntered: {}", player),
            LotteryEvent::RequestedLotteryWinner { request_id } => {
                msg!("RequestedLotteryWinner: {}", request_id)
            }
            LotteryEvent::WinnerPicked { winner, prize } => {
                msg!("WinnerPicked: {} ({} lamports)", winner, prize)
            }
        }
        if let Ok(data) = self.try_to_vec() {
            sol_log_data(&[&data]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_tag_leads_encoding() {
        let winner = Pubkey::new_unique();
        let data = LotteryEvent::WinnerPicked { winner, prize: 3 }
            .try_to_vec()
            .unwrap();
        assert_eq!(data[0], 2);
        assert_eq!(&data[1..33], winner.as_ref());
        assert_eq!(&data[33..], &3u64.to_le_bytes()[..]);
    }

    #[test]
    fn decodes_request_event() {
        let data = LotteryEvent::RequestedLotteryWinner { request_id: 9 }
            .try_to_vec()
            .unwrap();
        assert_eq!(
            LotteryEvent::try_from_slice(&data).unwrap(),
            LotteryEvent::RequestedLotteryWinner { request_id: 9 }
        );
    }
}
