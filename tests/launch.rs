use async_trait::async_trait;
use solana_sdk::{
    hash::Hash,
    pubkey::Pubkey,
    signature::{Keypair, Signature, Signer},
    system_program,
    transaction::Transaction,
};
use spl_token_2022::instruction::TokenInstruction;
use spl_token_metadata_interface::instruction::TokenMetadataInstruction;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use tokio::sync::Notify;
use token_launchpad::{
    instructions::{holding_account_address, metadata_tlv_len, mint_account_len, token_metadata},
    Connection, KeypairWallet, LaunchError, LaunchRequest, Result, Step, SubmissionMode,
    TokenForm, TokenLauncher, Wallet,
};

const RENT: u64 = 4_000_000;

/// In-memory cluster that records every transaction it is asked to land.
struct RecordingConnection {
    blockhash: Hash,
    fail_on: Option<usize>,
    fail_rent: bool,
    rent_queries: Mutex<Vec<usize>>,
    attempts: Mutex<Vec<Transaction>>,
}

impl RecordingConnection {
    fn new() -> Self {
        Self {
            blockhash: Hash::new_unique(),
            fail_on: None,
            fail_rent: false,
            rent_queries: Mutex::new(vec![]),
            attempts: Mutex::new(vec![]),
        }
    }

    fn failing_on(index: usize) -> Self {
        Self {
            fail_on: Some(index),
            ..Self::new()
        }
    }

    fn attempts(&self) -> Vec<Transaction> {
        self.attempts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connection for RecordingConnection {
    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64> {
        if self.fail_rent {
            return Err("rpc unavailable".into());
        }
        self.rent_queries.lock().unwrap().push(size);
        Ok(RENT)
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        Ok(self.blockhash)
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        let index = {
            let mut attempts = self.attempts.lock().unwrap();
            attempts.push(transaction.clone());
            attempts.len() - 1
        };
        if self.fail_on == Some(index) {
            return Err("insufficient funds for rent".into());
        }
        transaction.verify()?;
        Ok(transaction.signatures[0])
    }
}

/// Holds the first submission until released.
struct GatedConnection {
    inner: RecordingConnection,
    gate_first: AtomicBool,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl Connection for GatedConnection {
    async fn minimum_balance_for_size(&self, size: usize) -> Result<u64> {
        self.inner.minimum_balance_for_size(size).await
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.inner.latest_blockhash().await
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        if self.gate_first.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.send_and_confirm(transaction).await
    }
}

/// A wallet whose user declines every signing request.
struct RejectingWallet(Pubkey);

#[async_trait]
impl Wallet for RejectingWallet {
    fn pubkey(&self) -> Pubkey {
        self.0
    }

    async fn submit(
        &self,
        _transaction: Transaction,
        _connection: &dyn Connection,
    ) -> Result<Signature> {
        Err("user rejected the request".into())
    }
}

fn program_ids(transaction: &Transaction) -> Vec<Pubkey> {
    transaction
        .message
        .instructions
        .iter()
        .map(|ix| *ix.program_id(&transaction.message.account_keys))
        .collect()
}

fn minted_amount(transaction: &Transaction) -> u64 {
    let data = &transaction.message.instructions.last().unwrap().data;
    match TokenInstruction::unpack(data).unwrap() {
        TokenInstruction::MintTo { amount } => amount,
        _ => panic!("expected MintTo"),
    }
}

fn metadata_fields(transaction: &Transaction) -> (String, String, String) {
    let data = &transaction.message.instructions[3].data;
    match TokenMetadataInstruction::unpack(data).unwrap() {
        TokenMetadataInstruction::Initialize(init) => (init.name, init.symbol, init.uri),
        _ => panic!("expected metadata Initialize"),
    }
}

#[tokio::test]
async fn launch_submits_three_transactions_in_order() {
    let payer = Keypair::new();
    let payer_pubkey = payer.pubkey();
    let mint = Keypair::new();
    let mint_pubkey = mint.pubkey();
    let connection = Arc::new(RecordingConnection::new());
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(payer));
    let request = TokenForm::new("MyToken", "MTK", "https://x/y.json", "500").resolve();

    let receipt = launcher.launch_with_mint(&request, mint).await.unwrap();

    let holder = holding_account_address(&payer_pubkey, &mint_pubkey);
    assert_eq!(receipt.mint, mint_pubkey);
    assert_eq!(receipt.holder, holder);
    assert_eq!(receipt.amount, 500);
    let steps: Vec<Step> = receipt.signatures.iter().map(|(step, _)| *step).collect();
    assert_eq!(
        steps,
        vec![Step::CreateMint, Step::CreateHoldingAccount, Step::MintSupply]
    );
    assert!(!launcher.is_in_flight());

    let sent = connection.attempts();
    assert_eq!(sent.len(), 3);

    // A: create and initialize the mint, signed by both payer and mint
    assert_eq!(
        program_ids(&sent[0]),
        vec![
            system_program::id(),
            spl_token_2022::id(),
            spl_token_2022::id(),
            spl_token_2022::id(),
        ]
    );
    assert_eq!(sent[0].message.header.num_required_signatures, 2);
    assert_eq!(sent[0].message.account_keys[0], payer_pubkey);
    assert_eq!(
        metadata_fields(&sent[0]),
        (
            "MyToken".to_string(),
            "MTK".to_string(),
            "https://x/y.json".to_string()
        )
    );

    // B: associated token account
    assert_eq!(program_ids(&sent[1]), vec![spl_associated_token_account::id()]);
    assert!(sent[1].message.account_keys.contains(&holder));

    // C: mint into it
    assert_eq!(program_ids(&sent[2]), vec![spl_token_2022::id()]);
    assert_eq!(minted_amount(&sent[2]), 500);

    for (transaction, (_, signature)) in sent.iter().zip(&receipt.signatures) {
        assert_eq!(transaction.signatures[0], *signature);
    }
}

#[tokio::test]
async fn rent_covers_mint_and_metadata() {
    let payer = Keypair::new();
    let payer_pubkey = payer.pubkey();
    let mint = Keypair::new();
    let mint_pubkey = mint.pubkey();
    let connection = Arc::new(RecordingConnection::new());
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(payer));
    let request = LaunchRequest::default();

    launcher.launch_with_mint(&request, mint).await.unwrap();

    let metadata = token_metadata(&mint_pubkey, &payer_pubkey, &request).unwrap();
    let expected = mint_account_len().unwrap() + metadata_tlv_len(&metadata).unwrap();
    assert_eq!(*connection.rent_queries.lock().unwrap(), vec![expected]);
}

#[tokio::test]
async fn empty_form_launches_defaults() {
    let connection = Arc::new(RecordingConnection::new());
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(Keypair::new()));

    let receipt = launcher
        .launch(&TokenForm::new("", "", "", "").resolve())
        .await
        .unwrap();

    assert_eq!(receipt.amount, 1_000_000_000);
    let sent = connection.attempts();
    assert_eq!(
        metadata_fields(&sent[0]),
        (
            "FR".to_string(),
            "FR".to_string(),
            "https://cdn.100xdevs.com/metadata.json".to_string()
        )
    );
    assert_eq!(minted_amount(&sent[2]), 1_000_000_000);
}

#[tokio::test]
async fn non_numeric_supply_mints_default() {
    let connection = Arc::new(RecordingConnection::new());
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(Keypair::new()));

    launcher
        .launch(&TokenForm::new("MyToken", "MTK", "", "lots").resolve())
        .await
        .unwrap();

    assert_eq!(minted_amount(&connection.attempts()[2]), 1_000_000_000);
}

#[tokio::test]
async fn failed_submission_stops_the_sequence() {
    let connection = Arc::new(RecordingConnection::failing_on(1));
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(Keypair::new()));

    let err = launcher.launch(&LaunchRequest::default()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Create Token Account failed after 1 completed step(s): insufficient funds for rent"
    );
    match err {
        LaunchError::Step {
            step, completed, ..
        } => {
            assert_eq!(step, Step::CreateHoldingAccount);
            assert_eq!(completed.len(), 1);
            assert_eq!(completed[0].0, Step::CreateMint);
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(connection.attempts().len(), 2);
    assert!(!launcher.is_in_flight());
}

#[tokio::test]
async fn first_failure_submits_nothing_else() {
    let connection = Arc::new(RecordingConnection::failing_on(0));
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(Keypair::new()));

    let err = launcher.launch(&LaunchRequest::default()).await.unwrap_err();

    assert!(matches!(
        err,
        LaunchError::Step { step: Step::CreateMint, ref completed, .. } if completed.is_empty()
    ));
    assert_eq!(connection.attempts().len(), 1);
}

#[tokio::test]
async fn rejected_signature_stops_before_sending() {
    let connection = Arc::new(RecordingConnection::new());
    let launcher = TokenLauncher::new(connection.clone(), RejectingWallet(Pubkey::new_unique()));

    let err = launcher.launch(&LaunchRequest::default()).await.unwrap_err();

    assert!(matches!(err, LaunchError::Step { step: Step::CreateMint, .. }));
    assert!(err.to_string().contains("user rejected the request"));
    assert!(connection.attempts().is_empty());
}

#[tokio::test]
async fn rent_query_failure_is_a_prepare_error() {
    let connection = Arc::new(RecordingConnection {
        fail_rent: true,
        ..RecordingConnection::new()
    });
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(Keypair::new()));

    let err = launcher.launch(&LaunchRequest::default()).await.unwrap_err();

    assert!(matches!(err, LaunchError::Prepare(_)));
    assert!(connection.attempts().is_empty());
    assert!(!launcher.is_in_flight());
}

#[tokio::test]
async fn batched_launch_is_one_transaction() {
    let connection = Arc::new(RecordingConnection::new());
    let launcher = TokenLauncher::new(connection.clone(), KeypairWallet::new(Keypair::new()))
        .with_mode(SubmissionMode::Batched);
    assert_eq!(launcher.mode(), SubmissionMode::Batched);

    let request = TokenForm::new("MyToken", "MTK", "https://x/y.json", "500").resolve();
    let receipt = launcher.launch(&request).await.unwrap();

    assert_eq!(receipt.signatures.len(), 1);
    assert_eq!(receipt.signatures[0].0, Step::Batched);

    let sent = connection.attempts();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        program_ids(&sent[0]),
        vec![
            system_program::id(),
            spl_token_2022::id(),
            spl_token_2022::id(),
            spl_token_2022::id(),
            spl_associated_token_account::id(),
            spl_token_2022::id(),
        ]
    );
    assert_eq!(minted_amount(&sent[0]), 500);
}

#[tokio::test]
async fn second_launch_is_refused_while_in_flight() {
    let connection = Arc::new(GatedConnection {
        inner: RecordingConnection::new(),
        gate_first: AtomicBool::new(true),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let launcher = Arc::new(TokenLauncher::new(
        connection.clone(),
        KeypairWallet::new(Keypair::new()),
    ));
    let request = LaunchRequest::default();

    let first = tokio::spawn({
        let launcher = launcher.clone();
        let request = request.clone();
        async move { launcher.launch(&request).await }
    });

    connection.entered.notified().await;
    assert!(launcher.is_in_flight());
    let second = launcher.launch(&request).await;
    assert!(matches!(second, Err(LaunchError::InFlight)));

    connection.release.notify_one();
    let receipt = first.await.unwrap().unwrap();
    assert_eq!(receipt.signatures.len(), 3);
    assert!(!launcher.is_in_flight());

    // Released guard lets the next launch through
    launcher.launch(&request).await.unwrap();
    assert_eq!(connection.inner.attempts().len(), 6);
}
