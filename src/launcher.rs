//! Mint launch orchestration.
//!
//! A launch runs three submissions through the wallet, each awaited before the
//! next is built:
//!
//! 1. create the mint account and initialize it with its metadata,
//! 2. create the wallet's associated token account for the mint,
//! 3. mint the requested supply into that account.
//!
//! Nothing is rolled back: if a later step fails, earlier ones stay applied.
//! [`SubmissionMode::Batched`] sends every instruction in one atomic
//! transaction instead.

use crate::{
    connection::Connection,
    form::LaunchRequest,
    instructions::{
        create_holding_account_instruction, create_mint_instructions, holding_account_address,
        metadata_tlv_len, mint_account_len, mint_supply_instruction, token_metadata,
    },
    wallet::Wallet,
    Error, Result,
};
use solana_sdk::{
    instruction::Instruction,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    transaction::Transaction,
};
use std::{
    fmt,
    sync::atomic::{AtomicBool, Ordering},
};
use tracing::{debug, info, warn};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionMode {
    /// One transaction per step.
    #[default]
    Sequential,
    /// Every instruction in a single transaction.
    Batched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    CreateMint,
    CreateHoldingAccount,
    MintSupply,
    /// All of the above in one transaction.
    Batched,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::CreateMint => "Create Mint Account",
            Step::CreateHoldingAccount => "Create Token Account",
            Step::MintSupply => "Mint Tokens",
            Step::Batched => "Launch Token",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LaunchReceipt {
    pub mint: Pubkey,
    pub holder: Pubkey,
    pub amount: u64,
    pub signatures: Vec<(Step, Signature)>,
}

#[derive(Debug)]
pub enum LaunchError {
    /// Another launch on this launcher has not finished yet.
    InFlight,
    /// Failed before anything was submitted.
    Prepare(Error),
    /// A submission failed; `completed` lists the steps that already landed.
    Step {
        step: Step,
        completed: Vec<(Step, Signature)>,
        source: Error,
    },
}

impl fmt::Display for LaunchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchError::InFlight => write!(f, "a launch is already in progress"),
            LaunchError::Prepare(source) => write!(f, "failed to prepare launch: {}", source),
            LaunchError::Step {
                step,
                completed,
                source,
            } => write!(
                f,
                "{} failed after {} completed step(s): {}",
                step,
                completed.len(),
                source
            ),
        }
    }
}

impl std::error::Error for LaunchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LaunchError::InFlight => None,
            LaunchError::Prepare(source) | LaunchError::Step { source, .. } => Some(&**source),
        }
    }
}

/// Clears the in-flight flag when the launch ends, whichever way it ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct TokenLauncher<C, W> {
    connection: C,
    wallet: W,
    mode: SubmissionMode,
    in_flight: AtomicBool,
}

impl<C: Connection, W: Wallet> TokenLauncher<C, W> {
    pub fn new(connection: C, wallet: W) -> Self {
        Self {
            connection,
            wallet,
            mode: SubmissionMode::default(),
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn with_mode(mut self, mode: SubmissionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> SubmissionMode {
        self.mode
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Launches a new token with a freshly generated mint keypair.
    pub async fn launch(
        &self,
        request: &LaunchRequest,
    ) -> std::result::Result<LaunchReceipt, LaunchError> {
        self.launch_with_mint(request, Keypair::new()).await
    }

    pub async fn launch_with_mint(
        &self,
        request: &LaunchRequest,
        mint: Keypair,
    ) -> std::result::Result<LaunchReceipt, LaunchError> {
        let _guard = InFlightGuard::acquire(&self.in_flight).ok_or(LaunchError::InFlight)?;

        let payer = self.wallet.pubkey();
        let holder = holding_account_address(&payer, &mint.pubkey());
        info!(mint = %mint.pubkey(), holder = %holder, payer = %payer, "Launching token");

        let mint_instructions = self
            .mint_instructions(request, &mint.pubkey())
            .await
            .map_err(LaunchError::Prepare)?;
        let holding_instruction = create_holding_account_instruction(&payer, &mint.pubkey());
        let supply_instruction =
            mint_supply_instruction(&mint.pubkey(), &holder, &payer, request.supply)
                .map_err(LaunchError::Prepare)?;

        let plan = match self.mode {
            SubmissionMode::Sequential => vec![
                (Step::CreateMint, mint_instructions, true),
                (Step::CreateHoldingAccount, vec![holding_instruction], false),
                (Step::MintSupply, vec![supply_instruction], false),
            ],
            SubmissionMode::Batched => {
                let mut instructions = mint_instructions;
                instructions.push(holding_instruction);
                instructions.push(supply_instruction);
                vec![(Step::Batched, instructions, true)]
            }
        };

        let mut signatures = Vec::with_capacity(plan.len());
        for (step, instructions, mint_signs) in plan {
            let signer = mint_signs.then_some(&mint);
            match self.submit(&instructions, signer).await {
                Ok(signature) => {
                    info!(%step, %signature, "Transaction confirmed");
                    signatures.push((step, signature));
                }
                Err(source) => {
                    warn!(%step, error = %source, "Transaction failed, stopping launch");
                    return Err(LaunchError::Step {
                        step,
                        completed: signatures,
                        source,
                    });
                }
            }
        }

        Ok(LaunchReceipt {
            mint: mint.pubkey(),
            holder,
            amount: request.supply,
            signatures,
        })
    }

    async fn mint_instructions(
        &self,
        request: &LaunchRequest,
        mint: &Pubkey,
    ) -> Result<Vec<Instruction>> {
        let payer = self.wallet.pubkey();
        let metadata = token_metadata(mint, &payer, request)?;

        let space = mint_account_len()?;
        let metadata_len = metadata_tlv_len(&metadata)?;
        let rent = self
            .connection
            .minimum_balance_for_size(space + metadata_len)
            .await?;
        debug!(space, metadata_len, rent, "Sized mint account");

        create_mint_instructions(&payer, mint, rent, space, &metadata, request.decimals)
    }

    async fn submit(
        &self,
        instructions: &[Instruction],
        mint: Option<&Keypair>,
    ) -> Result<Signature> {
        let recent_blockhash = self.connection.latest_blockhash().await?;
        let payer = self.wallet.pubkey();
        let mut transaction = Transaction::new_with_payer(instructions, Some(&payer));
        transaction.message.recent_blockhash = recent_blockhash;

        if let Some(mint) = mint {
            transaction.try_partial_sign(&[mint], recent_blockhash)?;
        }

        self.wallet.submit(transaction, &self.connection).await
    }
}
