// Autoraffle Lottery Program - Errors
use solana_program::{
    decode_error::DecodeError, msg, program_error::PrintProgramError, program_error::ProgramError,
};
use num_derive::FromPrimitive;
use thiserror::Error;

/// Errors that may be returned by the lottery program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum LotteryError {
    /// Payment is below the configured entry fee
    #[error("Payment is below the entry fee")]
    InsufficientPayment,

    /// Entries are only accepted while the round is open
    #[error("Round is not open")]
    RoundNotOpen,

    /// The upkeep predicate was false at call time
    #[error("Upkeep not needed")]
    UpkeepNotNeeded,

    /// Fulfillment does not match the pending randomness request
    #[error("Unknown randomness request")]
    UnknownRequest,

    /// The prize could not be transferred to the winner
    #[error("Payout transfer failed")]
    PayoutTransferFailed,

    #[error("Invalid instruction data")]
    InvalidInstructionData,

    #[error("Lottery already initialized")]
    AlreadyInitialized,

    #[error("Lottery not initialized")]
    NotInitialized,

    #[error("Invalid lottery configuration")]
    InvalidConfig,

    /// Coordinator program does not match the configured one
    #[error("Invalid randomness coordinator")]
    InvalidCoordinator,

    #[error("Fulfillment must be signed by the configured authority")]
    UnauthorizedFulfiller,

    #[error("Lottery has no room for more entrants")]
    LotteryFull,

    #[error("Entrant index out of bounds")]
    EntrantIndexOutOfBounds,

    #[error("Arithmetic overflow")]
    Overflow,
}

impl From<LotteryError> for ProgramError {
    fn from(e: LotteryError) -> Self {
        ProgramError::Custom(e as u32)
    }
}

impl LotteryError {
    /// Map a custom program error code back to the lottery error it encodes
    pub fn from_code(code: u32) -> Option<Self> {
        use LotteryError::*;
        [
            InsufficientPayment,
            RoundNotOpen,
            UpkeepNotNeeded,
            UnknownRequest,
            PayoutTransferFailed,
            InvalidInstructionData,
            AlreadyInitialized,
            NotInitialized,
            InvalidConfig,
            InvalidCoordinator,
            UnauthorizedFulfiller,
            LotteryFull,
            EntrantIndexOutOfBounds,
            Overflow,
        ]
        .into_iter()
        .find(|error| *error as u32 == code)
    }
}

impl<T> DecodeError<T> for LotteryError {
    fn type_of() -> &'static str {
        "Lottery Error"
    }
}

impl PrintProgramError for LotteryError {
    fn print<E>(&self) {
        msg!(&self.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_map_back_to_errors() {
        assert_eq!(LotteryError::from_code(3), Some(LotteryError::UnknownRequest));
        assert_eq!(LotteryError::from_code(13), Some(LotteryError::Overflow));
        assert_eq!(LotteryError::from_code(14), None);
    }

    #[test]
    fn custom_codes_follow_declaration_order() {
        assert_eq!(
            ProgramError::from(LotteryError::InsufficientPayment),
            ProgramError::Custom(0)
        );
        assert_eq!(
            ProgramError::from(LotteryError::PayoutTransferFailed),
            ProgramError::Custom(4)
        );
        assert_eq!(
            ProgramError::from(LotteryError::Overflow),
            ProgramError::Custom(13)
        );
    }
}
