#![forbid(unsafe_code)]

//! tyresta CLI: sign, verify and digest data with XML-DSig algorithms.

use base64::Engine;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::EnvFilter;
use tyresta_core::{algorithm, Error};
use tyresta_crypto::VerifyOutcome;
use tyresta_keys::KeysManager;
use tyresta_transforms::{registry, TransformChain, TransformCtx, TransformOperation};

const CHUNK_SIZE: usize = 8192;

#[derive(Parser)]
#[command(
    name = "tyresta",
    about = "tyresta: XML-DSig signature and digest transforms",
    version
)]
struct Cli {
    /// Verbose output (debug logging unless RUST_LOG is set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct Input {
    /// Input file
    file: PathBuf,

    /// Algorithm URI or short name (e.g. ecdsa-sha256)
    #[arg(short, long)]
    alg: String,

    /// Base64-decode the input before processing
    #[arg(long = "base64-input")]
    base64_input: bool,

    /// Only allow these transforms (URI or name); may be repeated
    #[arg(long = "enable")]
    enable: Vec<String>,
}

#[derive(clap::Args)]
struct Keys {
    /// Load private/public key (PEM or DER, auto-detected)
    #[arg(short = 'k', long)]
    key: Option<PathBuf>,

    /// Load key with a name (NAME:FILE)
    #[arg(short = 'K', long = "key-name")]
    key_name: Vec<String>,

    /// Use the key with this name instead of the first matching one
    #[arg(long = "use-key")]
    use_key: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a file, printing the base64 SignatureValue
    Sign {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        keys: Keys,

        /// Output file for the raw signature bytes (default: base64 on stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Verify a base64 SignatureValue over a file
    Verify {
        #[command(flatten)]
        input: Input,

        #[command(flatten)]
        keys: Keys,

        /// Expected SignatureValue (base64)
        #[arg(long, conflicts_with = "signature_file")]
        signature: Option<String>,

        /// File holding the raw signature bytes
        #[arg(long = "signature-file")]
        signature_file: Option<PathBuf>,
    },

    /// Compute (or check) the digest of a file
    Digest {
        #[command(flatten)]
        input: Input,

        /// Expected DigestValue (base64); prints OK or INVALID
        #[arg(long)]
        expect: Option<String>,
    },

    /// List registered transforms
    Info,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = registry::init().and_then(|()| match cli.command {
        Commands::Sign {
            input,
            keys,
            output,
        } => cmd_sign(&input, &keys, output.as_deref()),
        Commands::Verify {
            input,
            keys,
            signature,
            signature_file,
        } => cmd_verify(&input, &keys, signature, signature_file),
        Commands::Digest { input, expect } => cmd_digest(&input, expect),
        Commands::Info => cmd_info(),
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_sign(input: &Input, keys: &Keys, output: Option<&Path>) -> Result<(), Error> {
    let mgr = build_keys_manager(keys)?;
    let mut chain = build_chain(input, TransformOperation::Sign)?;
    bind_key(&mut chain, &mgr, keys.use_key.as_deref())?;
    feed_file(&mut chain, &input.file)?;

    let signature = chain.result_bytes()?;
    match output {
        Some(path) => std::fs::write(path, signature)?,
        None => println!("{}", base64::engine::general_purpose::STANDARD.encode(signature)),
    }
    Ok(())
}

fn cmd_verify(
    input: &Input,
    keys: &Keys,
    signature: Option<String>,
    signature_file: Option<PathBuf>,
) -> Result<(), Error> {
    let expected = match (signature, signature_file) {
        (Some(b64), _) => decode_base64(&b64)?,
        (None, Some(path)) => std::fs::read(path)?,
        (None, None) => {
            return Err(Error::Other(
                "one of --signature or --signature-file is required".into(),
            ))
        }
    };

    let mgr = build_keys_manager(keys)?;
    let mut chain = build_chain(input, TransformOperation::Verify)?;
    bind_key(&mut chain, &mgr, keys.use_key.as_deref())?;
    feed_file(&mut chain, &input.file)?;
    report(chain.verify(&expected)?)
}

fn cmd_digest(input: &Input, expect: Option<String>) -> Result<(), Error> {
    match expect {
        None => {
            let mut chain = build_chain(input, TransformOperation::Sign)?;
            feed_file(&mut chain, &input.file)?;
            let digest = chain.result_bytes()?;
            println!("{}", base64::engine::general_purpose::STANDARD.encode(digest));
            Ok(())
        }
        Some(b64) => {
            let expected = decode_base64(&b64)?;
            let mut chain = build_chain(input, TransformOperation::Verify)?;
            feed_file(&mut chain, &input.file)?;
            report(chain.verify(&expected)?)
        }
    }
}

fn cmd_info() -> Result<(), Error> {
    println!("tyresta: XML-DSig transform engine");
    println!();
    println!("Registered transforms:");
    for klass in registry::klasses()? {
        println!(
            "  {:<14} {:<10} {}",
            klass.name(),
            format!("{:?}", klass.usage()).to_lowercase(),
            klass.href()
        );
    }
    println!();
    println!("Supported key formats:");
    println!("  PKCS#8 and SubjectPublicKeyInfo, PEM or DER (RSA, DSA, EC P-256/P-384)");
    Ok(())
}

// ── Utility functions ────────────────────────────────────────────────

fn report(outcome: VerifyOutcome) -> Result<(), Error> {
    match outcome {
        VerifyOutcome::Match => {
            println!("OK");
            Ok(())
        }
        VerifyOutcome::Mismatch => {
            eprintln!("INVALID: {outcome}");
            process::exit(1);
        }
    }
}

fn build_chain(input: &Input, operation: TransformOperation) -> Result<TransformChain, Error> {
    let mut ctx = TransformCtx::new();
    for t in &input.enable {
        ctx.enable(t);
    }
    ctx.debug = tracing::enabled!(tracing::Level::DEBUG);

    let mut chain = TransformChain::new();
    if input.base64_input {
        chain.append(ctx.create(algorithm::BASE64, TransformOperation::Decrypt)?);
    }
    chain.append(ctx.create(&input.alg, operation)?);
    Ok(chain)
}

fn bind_key(
    chain: &mut TransformChain,
    mgr: &KeysManager,
    use_key: Option<&str>,
) -> Result<(), Error> {
    let transform = chain
        .last_mut()
        .ok_or_else(|| Error::InvalidState("empty transform chain".into()))?;
    let requirement = transform.key_requirement()?;
    let key = match use_key {
        Some(name) => mgr.resolve_named(name, &requirement)?,
        None => mgr.resolve_key(&requirement)?,
    };
    transform.bind_key(key)
}

fn feed_file(chain: &mut TransformChain, path: &Path) -> Result<(), Error> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| Error::Other(format!("{}: {e}", path.display())))?;
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        chain.push(&buf[..n], false)?;
    }
    chain.push(&[], true)
}

fn decode_base64(text: &str) -> Result<Vec<u8>, Error> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    base64::engine::general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| Error::Base64(format!("decode error: {e}")))
}

fn build_keys_manager(keys: &Keys) -> Result<KeysManager, Error> {
    let mut mgr = KeysManager::new();

    if let Some(path) = &keys.key {
        mgr.add_key(tyresta_keys::loader::load_key_file(path)?);
    }

    for entry in &keys.key_name {
        let (name, path) = parse_key_name(entry)?;
        mgr.add_key(tyresta_keys::loader::load_key_file(&path)?.with_name(name));
    }

    if mgr.is_empty() {
        return Err(Error::KeyNotFound("no key given (use -k or -K)".into()));
    }
    Ok(mgr)
}

fn parse_key_name(entry: &str) -> Result<(&str, PathBuf), Error> {
    match entry.split_once(':') {
        Some((name, file)) if !name.is_empty() && !file.is_empty() => {
            Ok((name, PathBuf::from(file)))
        }
        _ => Err(Error::Other(format!(
            "invalid key-name format: {entry} (expected NAME:FILE)"
        ))),
    }
}
