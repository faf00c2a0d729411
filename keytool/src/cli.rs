//! # CLI Interface
//!
//! Defines the command-line argument structure for `hiero-keytool` using
//! `clap` derive. Three command groups (`mnemonic`, `key`, `id`) plus
//! `version`.
//!
//! Settings that tend to stay fixed for a whole shell session (network,
//! log format, passphrase) can come from the environment instead of flags.

use clap::{Args, Parser, Subcommand, ValueEnum};

use hiero_identity::KeyAlgorithm;

use crate::logging::LogFormat;

/// Hiero key and account-id tool.
///
/// Generates and inspects mnemonics, derives keys along the standard and
/// legacy paths, and parses or checksums entity ids. Everything runs
/// offline; nothing here talks to a network.
#[derive(Parser, Debug)]
#[command(
    name = "hiero-keytool",
    about = "Hiero key and account-id tool",
    version,
    propagate_version = true
)]
pub struct HieroKeytoolCli {
    /// Ledger used for entity id checksums: mainnet, testnet, previewnet, or hex.
    #[arg(long, short = 'n', global = true, env = "HIERO_NETWORK", default_value = "mainnet")]
    pub network: String,

    /// Log output format.
    #[arg(long, global = true, env = "HIERO_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Print results as JSON on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the keytool binary.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate or inspect mnemonic phrases.
    #[command(subcommand)]
    Mnemonic(MnemonicCommand),
    /// Derive keys from a mnemonic.
    #[command(subcommand)]
    Key(KeyCommand),
    /// Parse entity ids and compute their checksums.
    #[command(subcommand)]
    Id(IdCommand),
    /// Print version information and exit.
    Version,
}

#[derive(Subcommand, Debug)]
pub enum MnemonicCommand {
    /// Generate a fresh BIP-39 mnemonic.
    Generate(GenerateArgs),
    /// Validate a mnemonic and show the account key it stands for.
    Inspect(PhraseArgs),
}

#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Derive a key from a mnemonic.
    Derive(DeriveArgs),
}

#[derive(Subcommand, Debug)]
pub enum IdCommand {
    /// Parse an account id and show every form of it.
    Parse(IdArgs),
    /// Print an account id with its checksum for the selected network.
    Checksum(IdArgs),
}

/// Arguments for `mnemonic generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Number of words.
    #[arg(long, short = 'w', value_enum, default_value_t = WordCount::TwentyFour)]
    pub words: WordCount,
}

/// Word counts a standard mnemonic can have.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordCount {
    #[value(name = "12")]
    Twelve,
    #[value(name = "24")]
    TwentyFour,
}

impl WordCount {
    pub fn get(self) -> usize {
        match self {
            WordCount::Twelve => 12,
            WordCount::TwentyFour => 24,
        }
    }
}

/// A mnemonic phrase plus the passphrase protecting it.
#[derive(Args, Debug)]
pub struct PhraseArgs {
    /// The mnemonic, as one quoted argument or as separate words.
    #[arg(required = true, num_args = 1..)]
    pub phrase: Vec<String>,

    /// BIP-39 passphrase. Must be empty for legacy phrases.
    #[arg(long, short = 'p', env = "HIERO_PASSPHRASE", default_value = "", hide_env_values = true)]
    pub passphrase: String,
}

/// Derivation scheme for `key derive`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    /// `44'/3030'/0'/0'/index'` over SLIP-10 Ed25519.
    Ed25519,
    /// `44'/3030'/0'/0/index` over BIP-32 secp256k1.
    Ecdsa,
    /// Legacy entropy key, then legacy child `index`.
    Legacy,
}

impl Scheme {
    pub fn algorithm(self) -> KeyAlgorithm {
        match self {
            Scheme::Ed25519 | Scheme::Legacy => KeyAlgorithm::Ed25519,
            Scheme::Ecdsa => KeyAlgorithm::EcdsaSecp256k1,
        }
    }
}

/// Arguments for `key derive`.
#[derive(Args, Debug)]
pub struct DeriveArgs {
    #[command(flatten)]
    pub phrase: PhraseArgs,

    /// Derivation scheme.
    #[arg(long, short = 's', value_enum, default_value_t = Scheme::Ed25519)]
    pub scheme: Scheme,

    /// Account index. Negative values are only meaningful for `legacy`.
    #[arg(long, short = 'i', default_value_t = 0, allow_negative_numbers = true)]
    pub index: i64,

    /// Also print the private key. **It lands in your terminal scrollback.**
    #[arg(long)]
    pub reveal: bool,
}

/// A single entity id argument.
#[derive(Args, Debug)]
pub struct IdArgs {
    /// `num`, `shard.realm.num[-checksum]`, or `shard.realm.<alias|evm address>`.
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        // Ensures the derive macros produce a valid CLI definition.
        HieroKeytoolCli::command().debug_assert();
    }

    #[test]
    fn phrase_as_separate_words() {
        let cli = HieroKeytoolCli::try_parse_from([
            "hiero-keytool",
            "mnemonic",
            "inspect",
            "abandon",
            "about",
        ])
        .unwrap();
        let Commands::Mnemonic(MnemonicCommand::Inspect(args)) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.phrase, ["abandon", "about"]);
    }

    #[test]
    fn derive_defaults_and_negative_index() {
        let cli = HieroKeytoolCli::try_parse_from([
            "hiero-keytool",
            "key",
            "derive",
            "word",
            "--scheme",
            "legacy",
            "--index",
            "-1",
        ])
        .unwrap();
        let Commands::Key(KeyCommand::Derive(args)) = cli.command else {
            panic!("wrong subcommand");
        };
        assert_eq!(args.scheme, Scheme::Legacy);
        assert_eq!(args.index, -1);
        assert!(!args.reveal);
        assert_eq!(cli.network, "mainnet");
    }

    #[test]
    fn word_count_is_restricted() {
        assert!(HieroKeytoolCli::try_parse_from(["hiero-keytool", "mnemonic", "generate", "-w", "18"]).is_err());
        assert!(HieroKeytoolCli::try_parse_from(["hiero-keytool", "mnemonic", "generate", "-w", "12"]).is_ok());
    }
}
