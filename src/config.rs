// Command-line configuration
// The walkthrough's fixed parameters live here as defaults, not globals

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::rsa::bigint::{from_u64, RsaBigInt};

pub const DEFAULT_PUBLIC_PEM: &str = "public_key.pem";
pub const DEFAULT_PRIVATE_PEM: &str = "private_key.pem";

#[derive(Parser, Debug)]
#[command(name = "tiny-rsa", version, about = "8-bit RSA: derive, encrypt, decrypt, break")]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. "debug", "tiny_rsa=trace")
    #[arg(long, global = true, default_value = "info")]
    pub log: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Derive a key pair and write both halves as PEM files
    Generate {
        #[command(flatten)]
        key: KeyArgs,

        #[arg(long, default_value = DEFAULT_PUBLIC_PEM)]
        public_out: PathBuf,

        #[arg(long, default_value = DEFAULT_PRIVATE_PEM)]
        private_out: PathBuf,
    },

    /// Print N and e from a public key PEM and judge its strength
    Extract {
        #[arg(long, default_value = DEFAULT_PUBLIC_PEM)]
        public_key: PathBuf,
    },

    /// Full walkthrough: derive, encrypt, decrypt, then break the key
    Demo(DemoArgs),

    /// Recover the private key from a public key PEM
    Attack {
        #[arg(long, default_value = DEFAULT_PUBLIC_PEM)]
        public_key: PathBuf,

        /// Stop after this many trial divisions
        #[arg(long)]
        budget: Option<u64>,

        /// Write the recovered private key here
        #[arg(long)]
        private_out: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct KeyArgs {
    /// First secret prime
    #[arg(short, long, default_value = "11")]
    pub p: RsaBigInt,

    /// Second secret prime
    #[arg(short, long, default_value = "17")]
    pub q: RsaBigInt,

    /// Public exponent
    #[arg(short, long, default_value = "3")]
    pub e: RsaBigInt,
}

#[derive(Args, Debug, Clone)]
pub struct DemoArgs {
    #[command(flatten)]
    pub key: KeyArgs,

    /// Integer message, must be below N
    #[arg(long, default_value = "42")]
    pub message: RsaBigInt,

    /// Text message
    #[arg(long, default_value = "Hi")]
    pub text: String,

    /// Single byte to use instead when the text does not fit N
    #[arg(long, default_value_t = b'H')]
    pub fallback_byte: u8,

    #[arg(long)]
    pub budget: Option<u64>,
}

/// Parameters of one walkthrough run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub p: RsaBigInt,
    pub q: RsaBigInt,
    pub e: RsaBigInt,
    pub message: RsaBigInt,
    pub text: String,
    pub fallback_byte: u8,
    pub budget: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            p: from_u64(11),
            q: from_u64(17),
            e: from_u64(3),
            message: from_u64(42),
            text: "Hi".to_string(),
            fallback_byte: b'H',
            budget: None,
        }
    }
}

impl From<DemoArgs> for DemoConfig {
    fn from(args: DemoArgs) -> Self {
        Self {
            p: args.key.p,
            q: args.key.q,
            e: args.key.e,
            message: args.message,
            text: args.text,
            fallback_byte: args.fallback_byte,
            budget: args.budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_defaults_match_cli_defaults() {
        let cli = Cli::try_parse_from(["tiny-rsa", "demo"]).unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo subcommand");
        };
        assert_eq!(DemoConfig::from(args), DemoConfig::default());
        assert_eq!(cli.log, "info");
    }

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "tiny-rsa", "demo", "-p", "61", "-q", "53", "-e", "17", "--message", "65",
            "--budget", "5",
        ])
        .unwrap();
        let Command::Demo(args) = cli.command else {
            panic!("expected demo subcommand");
        };
        let config = DemoConfig::from(args);
        assert_eq!(config.p, from_u64(61));
        assert_eq!(config.q, from_u64(53));
        assert_eq!(config.e, from_u64(17));
        assert_eq!(config.message, from_u64(65));
        assert_eq!(config.budget, Some(5));
    }

    #[test]
    fn test_attack_defaults() {
        let cli = Cli::try_parse_from(["tiny-rsa", "attack"]).unwrap();
        match cli.command {
            Command::Attack {
                public_key,
                budget,
                private_out,
            } => {
                assert_eq!(public_key, PathBuf::from(DEFAULT_PUBLIC_PEM));
                assert_eq!(budget, None);
                assert_eq!(private_out, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_prime() {
        assert!(Cli::try_parse_from(["tiny-rsa", "generate", "-p", "eleven"]).is_err());
    }
}
