// Autoraffle Lottery Program - Instruction Processor
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed, set_return_data},
    program_error::ProgramError,
    program_pack::IsInitialized,
    pubkey::Pubkey,
    rent::Rent,
    system_instruction, system_program,
    sysvar::Sysvar,
};

use crate::{
    config::LotteryConfig,
    error::LotteryError,
    instruction::LotteryInstruction,
    payout::LamportPayout,
    state::{Lottery, LOTTERY_SEED},
    utils::{find_lottery_address, lamports_to_sol},
    vrf::{CoordinatorOracle, RandomWord},
};

/// Program state handler.
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = LotteryInstruction::unpack(instruction_data)?;

        match instruction {
            LotteryInstruction::InitializeLottery {
                entry_fee,
                draw_interval,
                key_hash,
                subscription_id,
                request_confirmations,
                callback_gas_limit,
            } => {
                msg!("Instruction: Initialize Lottery");
                Self::process_initialize_lottery(
                    program_id,
                    accounts,
                    entry_fee,
                    draw_interval,
                    key_hash,
                    subscription_id,
                    request_confirmations,
                    callback_gas_limit,
                )
            }
            LotteryInstruction::EnterLottery { amount } => {
                msg!("Instruction: Enter Lottery");
                Self::process_enter_lottery(program_id, accounts, amount)
            }
            LotteryInstruction::CheckUpkeep => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts)
            }
            LotteryInstruction::PerformUpkeep => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts)
            }
            LotteryInstruction::FulfillRandomWords {
                request_id,
                random_word,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, random_word)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process_initialize_lottery(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        entry_fee: u64,
        draw_interval: u64,
        key_hash: [u8; 32],
        subscription_id: u64,
        request_confirmations: u16,
        callback_gas_limit: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let payer_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let coordinator_info = next_account_info(account_info_iter)?;
        let authority_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !payer_info.is_signer {
            msg!("Payer must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if *system_program_info.key != system_program::id() {
            return Err(ProgramError::IncorrectProgramId);
        }

        let (expected_lottery, bump_seed) = find_lottery_address(program_id);
        if *lottery_info.key != expected_lottery {
            msg!("Invalid lottery account address");
            return Err(ProgramError::InvalidSeeds);
        }

        let config = LotteryConfig {
            entry_fee,
            draw_interval,
            coordinator: *coordinator_info.key,
            fulfillment_authority: *authority_info.key,
            key_hash,
            subscription_id,
            request_confirmations,
            callback_gas_limit,
        };
        config.validate()?;

        if lottery_info.owner == program_id {
            let existing = Lottery::unpack_account_data(&lottery_info.data.borrow())?;
            if existing.is_initialized() {
                msg!("Lottery account is already initialized");
                return Err(LotteryError::AlreadyInitialized.into());
            }
        } else {
            Self::create_lottery_account(
                program_id,
                payer_info,
                lottery_info,
                system_program_info,
                bump_seed,
            )?;
        }

        let clock = Clock::get()?;
        let lottery = Lottery::new(config, bump_seed, clock.unix_timestamp);
        lottery.save(lottery_info)?;

        msg!(
            "Lottery initialized: EntryFee={} SOL, Interval={}s, Coordinator={}",
            lamports_to_sol(entry_fee),
            draw_interval,
            coordinator_info.key
        );
        Ok(())
    }

    /// Create the lottery PDA. An address that already holds lamports cannot
    /// go through `create_account`, so it is topped up to rent exemption,
    /// allocated and assigned instead.
    fn create_lottery_account<'a>(
        program_id: &Pubkey,
        payer_info: &AccountInfo<'a>,
        lottery_info: &AccountInfo<'a>,
        system_program_info: &AccountInfo<'a>,
        bump_seed: u8,
    ) -> ProgramResult {
        let rent = Rent::get()?;
        let rent_lamports = rent.minimum_balance(Lottery::LEN);
        let bump = [bump_seed];
        let signer_seeds: &[&[u8]] = &[LOTTERY_SEED, &bump];

        if lottery_info.lamports() == 0 {
            return invoke_signed(
                &system_instruction::create_account(
                    payer_info.key,
                    lottery_info.key,
                    rent_lamports,
                    Lottery::LEN as u64,
                    program_id,
                ),
                &[
                    payer_info.clone(),
                    lottery_info.clone(),
                    system_program_info.clone(),
                ],
                &[signer_seeds],
            );
        }

        msg!(
            "Lottery address pre-funded with {} lamports",
            lottery_info.lamports()
        );
        let shortfall = rent_lamports.saturating_sub(lottery_info.lamports());
        if shortfall > 0 {
            invoke(
                &system_instruction::transfer(payer_info.key, lottery_info.key, shortfall),
                &[
                    payer_info.clone(),
                    lottery_info.clone(),
                    system_program_info.clone(),
                ],
            )?;
        }
        invoke_signed(
            &system_instruction::allocate(lottery_info.key, Lottery::LEN as u64),
            &[lottery_info.clone(), system_program_info.clone()],
            &[signer_seeds],
        )?;
        invoke_signed(
            &system_instruction::assign(lottery_info.key, program_id),
            &[lottery_info.clone(), system_program_info.clone()],
            &[signer_seeds],
        )
    }

    fn process_enter_lottery(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let player_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !player_info.is_signer {
            msg!("Player must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut lottery = Lottery::load(lottery_info, program_id)?;
        lottery.enter(*player_info.key, amount)?;

        invoke(
            &system_instruction::transfer(player_info.key, lottery_info.key, amount),
            &[
                player_info.clone(),
                lottery_info.clone(),
                system_program_info.clone(),
            ],
        )?;

        lottery.save(lottery_info)?;

        msg!(
            "Entry #{} recorded, pool is now {} SOL",
            lottery.number_of_players(),
            lamports_to_sol(lottery.pooled_balance())
        );
        Ok(())
    }

    fn process_check_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let lottery_info = next_account_info(account_info_iter)?;

        let lottery = Lottery::load(lottery_info, program_id)?;
        let clock = Clock::get()?;
        let upkeep_needed = lottery.check_upkeep(clock.unix_timestamp);

        set_return_data(&[upkeep_needed as u8]);
        msg!("Upkeep needed: {}", upkeep_needed);
        Ok(())
    }

    fn process_perform_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let lottery_info = next_account_info(account_info_iter)?;
        let coordinator_info = next_account_info(account_info_iter)?;
        let coordinator_state_info = next_account_info(account_info_iter)?;

        let mut lottery = Lottery::load(lottery_info, program_id)?;
        if *coordinator_info.key != lottery.config.coordinator {
            msg!(
                "Coordinator {} does not match configured {}",
                coordinator_info.key,
                lottery.config.coordinator
            );
            return Err(LotteryError::InvalidCoordinator.into());
        }

        let clock = Clock::get()?;
        let mut oracle = CoordinatorOracle {
            coordinator_program: coordinator_info,
            coordinator_state: coordinator_state_info,
        };
        let request_id = lottery.perform_upkeep(clock.unix_timestamp, &mut oracle)?;
        lottery.save(lottery_info)?;

        msg!("Draw started, waiting on request {}", request_id);
        Ok(())
    }

    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: u64,
        random_word: RandomWord,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let lottery_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        let mut lottery = Lottery::load(lottery_info, program_id)?;
        if !authority_info.is_signer || *authority_info.key != lottery.config.fulfillment_authority
        {
            msg!("Randomness must be delivered by {}", lottery.config.fulfillment_authority);
            return Err(LotteryError::UnauthorizedFulfiller.into());
        }

        let clock = Clock::get()?;
        let mut payout = LamportPayout {
            source: lottery_info,
            recipient: winner_info,
            rent: Rent::get()?,
        };
        let winner = lottery.fulfill_random_words(
            request_id,
            &random_word,
            clock.unix_timestamp,
            &mut payout,
        )?;
        lottery.save(lottery_info)?;

        msg!("Request {} fulfilled, winner {}", request_id, winner);
        Ok(())
    }
}
