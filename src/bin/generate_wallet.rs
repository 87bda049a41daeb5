//! Generate a random wallet for testing purposes.
//!
//! Prints the derived address and persists `WALLET_PRIVATE_KEY` into the
//! local `.env` file, replacing an existing entry.
//!
//! WARNING: for testing only. Do not use for production funds.

use std::fs;
use std::path::Path;

use alloy::signers::local::PrivateKeySigner;

use optimism_swap_mcp::chain::constants::OPTIMISM_CHAIN_ID;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Generating a new random wallet for testing...");
    println!("WARNING: This is for testing purposes only. Do not use for production.");
    println!("------------------------------------------------------");

    let signer = PrivateKeySigner::random();
    let private_key = format!("0x{}", alloy::hex::encode(signer.to_bytes()));

    println!();
    println!("Wallet Information:");
    println!("Address: {}", signer.address());
    println!("Private Key: {}", private_key);
    println!("Chain: Optimism (Chain ID: {})", OPTIMISM_CHAIN_ID);

    let env_path = Path::new(".env");
    let entry = format!("WALLET_PRIVATE_KEY={}", private_key);

    let content = if env_path.exists() {
        let existing = fs::read_to_string(env_path)?;
        if existing.lines().any(|line| line.starts_with("WALLET_PRIVATE_KEY=")) {
            existing
                .lines()
                .map(|line| {
                    if line.starts_with("WALLET_PRIVATE_KEY=") {
                        entry.clone()
                    } else {
                        line.to_string()
                    }
                })
                .collect::<Vec<_>>()
                .join("\n")
                + "\n"
        } else {
            format!("{}\n{}\n", existing.trim_end(), entry)
        }
    } else {
        format!("{}\n", entry)
    };

    fs::write(env_path, content)?;

    println!();
    println!("Private key saved to .env as WALLET_PRIVATE_KEY.");

    Ok(())
}
