// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Hiero Keytool
//!
//! Entry point for the `hiero-keytool` binary. Parses CLI arguments,
//! initializes logging, and runs one offline command against the identity
//! library:
//!
//! - `mnemonic generate`: fresh 12 or 24-word phrase
//! - `mnemonic inspect`: validate a phrase, show its account key
//! - `key derive`: Ed25519, ECDSA or legacy key at an index
//! - `id parse`: every form of an entity id, checksum verified
//! - `id checksum`: an id with its checksum for the chosen network
//! - `version`: print build version information
//!
//! Results go to stdout (plain text, or JSON with `--json`); logs go to stderr.

mod cli;
mod logging;

use std::fmt;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use hiero_identity::{
    AccountId, EvmAddress, KeyAlgorithm, LedgerId, Mnemonic, MnemonicKind, PrivateKey, PublicKey,
};

use cli::{
    Commands, DeriveArgs, GenerateArgs, HieroKeytoolCli, IdArgs, IdCommand, KeyCommand,
    MnemonicCommand, PhraseArgs, Scheme,
};

fn main() -> Result<()> {
    let cli = HieroKeytoolCli::parse();
    logging::init_logging("hiero_keytool=info,hiero_identity=warn", cli.log_format);

    let ledger: LedgerId = cli
        .network
        .parse()
        .with_context(|| format!("invalid network `{}`", cli.network))?;
    let json = cli.json;

    match cli.command {
        Commands::Mnemonic(MnemonicCommand::Generate(args)) => emit(json, &generate_mnemonic(args)?),
        Commands::Mnemonic(MnemonicCommand::Inspect(args)) => emit(json, &inspect_mnemonic(args)?),
        Commands::Key(KeyCommand::Derive(args)) => emit(json, &derive_key(args)?),
        Commands::Id(IdCommand::Parse(args)) => emit(json, &parse_id(args, &ledger)?),
        Commands::Id(IdCommand::Checksum(args)) => emit(json, &checksum_id(args, &ledger)?),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Writes a report to stdout in the selected format.
fn emit<T: Serialize + fmt::Display>(json: bool, report: &T) -> Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(report).context("failed to render JSON")?;
        println!("{rendered}");
    } else {
        print!("{report}");
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// mnemonic
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct GeneratedMnemonic {
    kind: MnemonicKind,
    words: usize,
    phrase: String,
}

impl fmt::Display for GeneratedMnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.phrase)
    }
}

fn generate_mnemonic(args: GenerateArgs) -> Result<GeneratedMnemonic> {
    let mnemonic = Mnemonic::generate_standard(args.words.get())
        .context("failed to generate mnemonic")?;
    tracing::info!(words = mnemonic.words().len(), "generated mnemonic");

    Ok(GeneratedMnemonic {
        kind: mnemonic.kind(),
        words: mnemonic.words().len(),
        phrase: mnemonic.to_string(),
    })
}

#[derive(Serialize)]
struct MnemonicInfo {
    kind: MnemonicKind,
    words: usize,
    public_key: PublicKey,
    alias_account: AccountId,
}

impl fmt::Display for MnemonicInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "kind:          {} ({} words)", self.kind, self.words)?;
        writeln!(f, "public key:    {}", self.public_key)?;
        writeln!(f, "alias account: {}", self.alias_account)
    }
}

fn parse_phrase(args: &PhraseArgs) -> Result<Mnemonic> {
    Mnemonic::parse(&args.phrase.join(" ")).context("invalid mnemonic")
}

fn inspect_mnemonic(args: PhraseArgs) -> Result<MnemonicInfo> {
    let mnemonic = parse_phrase(&args)?;
    let key = mnemonic
        .to_private_key(&args.passphrase)
        .context("failed to recover account key")?;
    let public_key = key.public_key();

    Ok(MnemonicInfo {
        kind: mnemonic.kind(),
        words: mnemonic.words().len(),
        public_key,
        alias_account: AccountId::from_alias(0, 0, public_key),
    })
}

// ---------------------------------------------------------------------------
// key
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct DerivedKey {
    algorithm: KeyAlgorithm,
    index: i64,
    public_key: PublicKey,
    public_key_raw: String,
    evm_address: Option<EvmAddress>,
    alias_account: AccountId,
    #[serde(skip_serializing_if = "Option::is_none")]
    private_key: Option<String>,
}

impl fmt::Display for DerivedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "algorithm:     {}", self.algorithm)?;
        writeln!(f, "index:         {}", self.index)?;
        writeln!(f, "public key:    {}", self.public_key)?;
        writeln!(f, "raw:           {}", self.public_key_raw)?;
        if let Some(address) = &self.evm_address {
            writeln!(f, "evm address:   0x{address}")?;
        }
        writeln!(f, "alias account: {}", self.alias_account)?;
        if let Some(private_key) = &self.private_key {
            writeln!(f, "private key:   {private_key}")?;
        }
        Ok(())
    }
}

fn derive_key(args: DeriveArgs) -> Result<DerivedKey> {
    let mnemonic = parse_phrase(&args.phrase)?;
    let passphrase = &args.phrase.passphrase;
    tracing::debug!(scheme = ?args.scheme, index = args.index, "deriving key");

    let key = match args.scheme {
        Scheme::Ed25519 => mnemonic
            .to_standard_ed25519_private_key(passphrase, standard_index(args.index)?)
            .context("Ed25519 derivation failed")?,
        Scheme::Ecdsa => mnemonic
            .to_standard_ecdsa_private_key(passphrase, standard_index(args.index)?)
            .context("ECDSA derivation failed")?,
        Scheme::Legacy => legacy_key(&mnemonic, passphrase, args.index)?,
    };
    debug_assert_eq!(key.algorithm(), args.scheme.algorithm());

    let public_key = key.public_key();
    Ok(DerivedKey {
        algorithm: key.algorithm(),
        index: args.index,
        public_key,
        public_key_raw: public_key.to_string_raw(),
        evm_address: public_key.to_evm_address(),
        alias_account: AccountId::from_alias(0, 0, public_key),
        private_key: args.reveal.then(|| key.to_string_der()),
    })
}

fn standard_index(index: i64) -> Result<u32> {
    u32::try_from(index).with_context(|| format!("index {index} is outside 0..=4294967295"))
}

fn legacy_key(mnemonic: &Mnemonic, passphrase: &str, index: i64) -> Result<PrivateKey> {
    if !passphrase.is_empty() {
        bail!("legacy derivation takes no passphrase");
    }
    mnemonic
        .to_legacy_private_key()
        .context("failed to recover legacy key")?
        .legacy_derive(index)
        .context("legacy derivation failed")
}

// ---------------------------------------------------------------------------
// id
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct IdInfo {
    id: AccountId,
    mode: &'static str,
    shard: u64,
    realm: u64,
    num: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    with_checksum: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    evm_address: Option<EvmAddress>,
    bytes: String,
}

impl fmt::Display for IdInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "id:            {}", self.id)?;
        writeln!(f, "mode:          {}", self.mode)?;
        writeln!(f, "shard.realm:   {}.{}", self.shard, self.realm)?;
        if let Some(with_checksum) = &self.with_checksum {
            writeln!(f, "checksummed:   {with_checksum}")?;
        }
        if let Some(address) = &self.evm_address {
            writeln!(f, "evm address:   0x{address}")?;
        }
        writeln!(f, "protobuf:      {}", self.bytes)
    }
}

fn parse_account(args: &IdArgs, ledger: &LedgerId) -> Result<AccountId> {
    let id: AccountId = args
        .id
        .parse()
        .with_context(|| format!("invalid entity id `{}`", args.id))?;
    id.validate_checksum(ledger)
        .with_context(|| format!("`{}` does not belong to {ledger}", args.id))?;
    Ok(id)
}

fn parse_id(args: IdArgs, ledger: &LedgerId) -> Result<IdInfo> {
    let id = parse_account(&args, ledger)?;

    let (mode, with_checksum, evm_address) = if id.alias().is_some() {
        ("alias", None, None)
    } else if let Some(address) = id.evm_address() {
        ("evm", None, Some(*address))
    } else {
        let checksummed = id.to_string_with_checksum(ledger)?;
        ("num", Some(checksummed), id.to_solidity_address().ok())
    };

    Ok(IdInfo {
        id,
        mode,
        shard: id.shard(),
        realm: id.realm(),
        num: id.num(),
        with_checksum,
        evm_address,
        bytes: hex::encode(id.to_bytes()),
    })
}

#[derive(Serialize)]
struct ChecksummedId {
    ledger: LedgerId,
    id: String,
}

impl fmt::Display for ChecksummedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.id)
    }
}

fn checksum_id(args: IdArgs, ledger: &LedgerId) -> Result<ChecksummedId> {
    let id = parse_account(&args, ledger)?;
    let with_checksum = id
        .to_string_with_checksum(ledger)
        .context("only numeric ids carry a checksum")?;
    Ok(ChecksummedId {
        ledger: ledger.clone(),
        id: with_checksum,
    })
}

// ---------------------------------------------------------------------------
// version
// ---------------------------------------------------------------------------

fn print_version() {
    println!("hiero-keytool {}", env!("CARGO_PKG_VERSION"));
}
