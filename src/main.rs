// reesa command line
// Generates key files and encrypts / decrypts single hex blocks

use std::path::PathBuf;
use std::process;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use reesa::rsa::codec::{serialize_private_key, serialize_public_key};
use reesa::rsa::keygen::has_probable_prime_factors;
use reesa::rsa::{
    decrypt_block, decrypt_to_string, encrypt_block, encrypt_bytes, generate_keypair_with,
    KeygenConfig, DEFAULT_PRIMALITY_ROUNDS, DEFAULT_PRIME_BITS, DEFAULT_PUBLIC_EXPONENT,
    MAX_PRIME_BITS, MIN_PRIME_BITS,
};
use reesa::util::{load_key, load_private_key, save_private_key, save_public_key, StoredKey};

/// Textbook RSA key generation and raw block encryption
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate a private key and write it as JSON
    Genkey {
        #[arg(short, long)]
        out: PathBuf,

        /// Bit width of each prime factor
        #[arg(long, default_value_t = DEFAULT_PRIME_BITS,
              value_parser = clap::value_parser!(u64).range(MIN_PRIME_BITS..=MAX_PRIME_BITS))]
        bits: u64,

        #[arg(long, default_value_t = DEFAULT_PUBLIC_EXPONENT)]
        exponent: u64,

        /// Miller-Rabin rounds per candidate (at least one)
        #[arg(long, default_value_t = DEFAULT_PRIMALITY_ROUNDS,
              value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
        rounds: usize,

        /// Seed for reproducible keys; OS entropy when omitted
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Write the public half of a key file
    Pubkey {
        #[arg(short, long)]
        key: PathBuf,

        #[arg(short, long)]
        out: PathBuf,
    },

    /// Print the fields of a key file
    Inspect {
        #[arg(short, long)]
        key: PathBuf,
    },

    /// Encrypt one block with a public (or private) key file
    Encrypt {
        #[arg(short, long)]
        key: PathBuf,

        /// Plaintext block as base-16
        #[arg(long, conflicts_with = "text", required_unless_present = "text")]
        hex: Option<String>,

        /// Plaintext as UTF-8, encrypted as one big-endian block
        #[arg(long)]
        text: Option<String>,
    },

    /// Decrypt one block with a private key file
    Decrypt {
        #[arg(short, long)]
        key: PathBuf,

        /// Ciphertext block as base-16
        #[arg(long)]
        hex: String,

        /// Print the plaintext as UTF-8 instead of base-16
        #[arg(long)]
        text: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(cli.command) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}

fn init_tracing(level: &str) {
    let log_level: tracing::Level = level.parse().unwrap_or(tracing::Level::WARN);
    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    let stderr_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_filter(env_filter);

    tracing_subscriber::registry().with(stderr_layer).init();
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Genkey {
            out,
            bits,
            exponent,
            rounds,
            seed,
        } => {
            let config = KeygenConfig::default()
                .with_prime_bits(bits)
                .with_public_exponent(exponent)
                .with_primality_rounds(rounds);
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };

            tracing::info!(bits, exponent, "generating key pair");
            let key = generate_keypair_with(&config, &mut rng).context("key generation failed")?;
            save_private_key(&out, &key)
                .with_context(|| format!("failed to write {}", out.display()))?;

            Ok(format!(
                "wrote {}-bit private key to {}",
                key.bit_length(),
                out.display()
            ))
        }

        Command::Pubkey { key, out } => {
            let stored =
                load_key(&key).with_context(|| format!("failed to load {}", key.display()))?;
            save_public_key(&out, &stored.public_key())
                .with_context(|| format!("failed to write {}", out.display()))?;
            Ok(format!("wrote public key to {}", out.display()))
        }

        Command::Inspect { key } => {
            let stored =
                load_key(&key).with_context(|| format!("failed to load {}", key.display()))?;
            Ok(describe(&stored))
        }

        Command::Encrypt { key, hex, text } => {
            let public = load_key(&key)
                .with_context(|| format!("failed to load {}", key.display()))?
                .public_key();

            let ciphertext = match (hex, text) {
                (Some(block), _) => encrypt_block(&public, &block)?,
                (None, Some(message)) => encrypt_bytes(&public, message.as_bytes())?,
                (None, None) => bail!("either --hex or --text is required"),
            };
            Ok(ciphertext)
        }

        Command::Decrypt { key, hex, text } => {
            let private = load_private_key(&key)
                .with_context(|| format!("failed to load {}", key.display()))?;

            if text {
                Ok(decrypt_to_string(&private, &hex)?)
            } else {
                Ok(decrypt_block(&private, &hex)?)
            }
        }
    }
}

fn describe(stored: &StoredKey) -> String {
    match stored {
        StoredKey::Private(key) => {
            let fields = serialize_private_key(key);
            let status = match key.validate() {
                Ok(()) if has_probable_prime_factors(key, &mut StdRng::from_entropy()) => {
                    "consistent".to_string()
                }
                Ok(()) => "inconsistent: p or q is composite".to_string(),
                Err(e) => e.to_string(),
            };

            format!(
                "private key ({} bits)\n\
                 p:                {}\n\
                 q:                {}\n\
                 public exponent:  {}\n\
                 private exponent: {}\n\
                 modulus:          {}\n\
                 totient:          {}\n\
                 status:           {}",
                key.bit_length(),
                fields.p,
                fields.q,
                fields.public_exponent,
                fields.private_exponent,
                fields.modulus,
                fields.totient,
                status
            )
        }
        StoredKey::Public(key) => {
            let fields = serialize_public_key(key);
            format!(
                "public key ({} bits)\n\
                 public exponent:  {}\n\
                 modulus:          {}",
                key.bit_length(),
                fields.public_exponent,
                fields.modulus
            )
        }
    }
}
