use crate::{form::LaunchRequest, Result};
use solana_sdk::{instruction::Instruction, pubkey::Pubkey, system_instruction::create_account};
use spl_associated_token_account::{
    get_associated_token_address_with_program_id, instruction::create_associated_token_account,
};
use spl_token_2022::{
    extension::ExtensionType,
    instruction::{initialize_mint, mint_to},
    state::Mint,
};
use spl_token_client::token::ExtensionInitializationParams;
use spl_token_metadata_interface::state::TokenMetadata;
use spl_type_length_value::variable_len_pack::VariableLenPack;

// Token-2022 extension entries are prefixed by a u16 type and a u16 length
const TYPE_SIZE: usize = 2;
const LENGTH_SIZE: usize = 2;

/// Metadata stored in the mint account itself.
pub fn token_metadata(
    mint: &Pubkey,
    authority: &Pubkey,
    request: &LaunchRequest,
) -> Result<TokenMetadata> {
    Ok(TokenMetadata {
        update_authority: Some(*authority).try_into()?,
        mint: *mint,
        name: request.name.clone(),
        symbol: request.symbol.clone(),
        uri: request.uri.clone(),
        additional_metadata: vec![],
    })
}

/// Metadata pointer pointing back at the mint.
pub fn metadata_pointer_params(mint: &Pubkey, authority: &Pubkey) -> ExtensionInitializationParams {
    ExtensionInitializationParams::MetadataPointer {
        authority: Some(*authority),
        metadata_address: Some(*mint),
    }
}

/// Space of a mint account carrying the `MetadataPointer` extension.
pub fn mint_account_len() -> Result<usize> {
    Ok(ExtensionType::try_calculate_account_len::<Mint>(&[
        ExtensionType::MetadataPointer,
    ])?)
}

/// Bytes the metadata extension adds to the mint once initialized.
pub fn metadata_tlv_len(metadata: &TokenMetadata) -> Result<usize> {
    Ok(TYPE_SIZE + LENGTH_SIZE + metadata.get_packed_len()?)
}

/// Instructions creating the mint account and initializing it with its metadata.
///
/// The account is created with `space` bytes but funded with `lamports`, which
/// must already cover the metadata: the metadata initialize instruction grows
/// the account in place.
pub fn create_mint_instructions(
    payer: &Pubkey,
    mint: &Pubkey,
    lamports: u64,
    space: usize,
    metadata: &TokenMetadata,
    decimals: u8,
) -> Result<Vec<Instruction>> {
    let create_account_instruction = create_account(
        payer,
        mint,
        lamports,
        space as u64,
        &spl_token_2022::id(),
    );

    // Must come before `initialize_mint`
    let metadata_pointer_instruction =
        metadata_pointer_params(mint, payer).instruction(&spl_token_2022::id(), mint)?;

    let initialize_mint_instruction = initialize_mint(
        &spl_token_2022::id(),
        mint,
        payer, // Mint authority
        None,  // Freeze authority
        decimals,
    )?;

    let initialize_metadata_instruction = spl_token_metadata_interface::instruction::initialize(
        &spl_token_2022::id(),
        mint,  // Metadata account
        payer, // Update authority
        mint,
        payer, // Mint authority
        metadata.name.clone(),
        metadata.symbol.clone(),
        metadata.uri.clone(),
    );

    Ok(vec![
        create_account_instruction,
        metadata_pointer_instruction,
        initialize_mint_instruction,
        initialize_metadata_instruction,
    ])
}

pub fn holding_account_address(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address_with_program_id(owner, mint, &spl_token_2022::id())
}

/// Creates the payer's associated token account for `mint`.
pub fn create_holding_account_instruction(payer: &Pubkey, mint: &Pubkey) -> Instruction {
    create_associated_token_account(
        payer, // Funding account
        payer, // Token account owner
        mint,
        &spl_token_2022::id(),
    )
}

pub fn mint_supply_instruction(
    mint: &Pubkey,
    holder: &Pubkey,
    authority: &Pubkey,
    amount: u64,
) -> Result<Instruction> {
    Ok(mint_to(
        &spl_token_2022::id(),
        mint,
        holder,
        authority,
        &[],
        amount,
    )?)
}
