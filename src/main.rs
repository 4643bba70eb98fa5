use anyhow::{Context as _, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use fmdcrypt::format::{self, Packet, WrappedKeyBlob};
use fmdcrypt::{FmdCrypto, PrivateKeyHandle, Salt, salt_from_encoded_hash};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;
use tracing::debug;
mod auth;

#[derive(Debug, Parser)]
#[command(name = "fmdcrypt")]
#[command(
    version,
    about = "Unlock a password-wrapped Find My Device key and decrypt packets sent to it."
)]
struct Cli {
    /// Path to the base64 wrapped private key
    #[arg(long, global = true, value_name = "PATH", env = "FMDCRYPT_KEY")]
    key: Option<PathBuf>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, global = true, default_value = "warn", env = "FMDCRYPT_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Checks that the password unlocks the private key
    Unlock,

    /// Decrypts a base64 packet from a file, or stdin if no file is given
    Decrypt { packet: Option<PathBuf> },

    /// Prints the encoded login digest for a base64 salt
    #[command(arg_required_else_help = true)]
    LoginHash {
        #[arg(long)]
        salt: String,
    },

    /// Prints the base64 salt embedded in an encoded argon2 digest
    #[command(arg_required_else_help = true)]
    Salt { encoded_hash: String },

    /// Prints the layout of a base64 blob as JSON
    #[command(arg_required_else_help = true)]
    Inspect {
        #[arg(value_enum)]
        kind: BlobKind,
        /// File holding the blob; stdin if omitted
        file: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum BlobKind {
    WrappedKey,
    Packet,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Layout {
    WrappedKey {
        total_len: usize,
        salt: String,
        iv_len: usize,
        ciphertext_len: usize,
    },
    Packet {
        total_len: usize,
        encrypted_session_key_len: usize,
        iv_len: usize,
        ciphertext_len: usize,
    },
}

impl Layout {
    fn of(kind: BlobKind, data: &[u8]) -> fmdcrypt::Result<Self> {
        Ok(match kind {
            BlobKind::WrappedKey => {
                let blob = WrappedKeyBlob::parse(data)?;
                Layout::WrappedKey {
                    total_len: data.len(),
                    salt: blob.salt().to_base64(),
                    iv_len: blob.iv().len(),
                    ciphertext_len: blob.ciphertext().len(),
                }
            }
            BlobKind::Packet => {
                let packet = Packet::parse(data)?;
                Layout::Packet {
                    total_len: data.len(),
                    encrypted_session_key_len: packet.encrypted_session_key().len(),
                    iv_len: packet.iv().len(),
                    ciphertext_len: packet.ciphertext().len(),
                }
            }
        })
    }
}

fn default_key_path() -> Result<PathBuf> {
    let project_dirs =
        ProjectDirs::from("", "", "fmdcrypt").context("could not determine platform directories")?;

    Ok(project_dirs.data_dir().join("private_key.b64"))
}

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Collapses every password-related failure into one message so the CLI
/// cannot tell a wrong password from a damaged key.
fn unlock_error(e: fmdcrypt::Error) -> anyhow::Error {
    if e.is_unlock_failure() {
        debug!(kind = ?e.kind(), error = %e, "unlock failed");
        anyhow!("could not unlock")
    } else {
        e.into()
    }
}

async fn read_input(path: Option<PathBuf>) -> Result<String> {
    match path {
        Some(p) => tokio::fs::read_to_string(&p)
            .await
            .with_context(|| format!("failed to read {}", p.display())),
        None => {
            let mut buf = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buf)
                .await
                .context("failed to read stdin")?;
            Ok(buf)
        }
    }
}

async fn unlock(fmd: &FmdCrypto, key: Option<PathBuf>, stdin_free: bool) -> Result<PrivateKeyHandle> {
    let path = match key {
        Some(p) => p,
        None => default_key_path()?,
    };
    let wrapped = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("failed to read wrapped key {}", path.display()))?;

    let password = auth::read_password(stdin_free)?;
    fmd.unwrap_private_key(&password, &wrapped)
        .await
        .map_err(unlock_error)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Cli::parse();
    init_logging(&args.log_level);

    let fmd = FmdCrypto::new();

    match args.command {
        Commands::Unlock => {
            unlock(&fmd, args.key, true).await?;
            println!("private key unlocked");
        }
        Commands::Decrypt { packet } => {
            let stdin_free = packet.is_some();
            let key = unlock(&fmd, args.key, stdin_free).await?;
            let packet = read_input(packet).await?;
            let plaintext = fmd.decrypt_packet(&key, &packet).await?;
            println!("{plaintext}");
        }
        Commands::LoginHash { salt } => {
            let salt = Salt::from_base64(&salt)?;
            let password = auth::read_password(true)?;
            let hash = fmd.hash_password_for_login(&password, &salt).await?;
            println!("{hash}");
        }
        Commands::Salt { encoded_hash } => {
            let salt = salt_from_encoded_hash(&encoded_hash)?;
            println!("{}", salt.to_base64());
        }
        Commands::Inspect { kind, file } => {
            let data = format::decode_base64(&read_input(file).await?)?;
            let layout = Layout::of(kind, &data)?;
            println!("{}", serde_json::to_string_pretty(&layout)?);
        }
    }

    Ok(())
}
