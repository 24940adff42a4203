use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use huffkey::{CodecConfig, HuffmanCodec};
use tracing_subscriber::EnvFilter;

fn prompt(label: &str, input: &mut impl BufRead) -> anyhow::Result<String> {
    print!("{label}");
    io::stdout().flush()?;
    let mut line = String::new();
    input.read_line(&mut line).context("reading stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = CodecConfig::from_env().context("invalid configuration")?;
    let codec = HuffmanCodec::new(config);

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let text = prompt("Enter some text: ", &mut input)?;
    let key_path = PathBuf::from(prompt("Export key as: ", &mut input)?);
    println!("You typed: {text}");

    let encoded = codec
        .encode(text.as_bytes(), &key_path)
        .with_context(|| format!("encoding with key {}", key_path.display()))?;
    let decoded = codec
        .decode(&encoded, &key_path)
        .with_context(|| format!("decoding with key {}", key_path.display()))?;

    println!("Encoded: {encoded}");
    println!("Decoded: {}", String::from_utf8_lossy(&decoded));
    Ok(())
}
