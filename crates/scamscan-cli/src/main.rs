//! Binary entrypoint: scan a payload given as arguments or on stdin.
use std::io::Read;

use scamscan_cli::Scanner;
use scamscan_core::ClientContext;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let raw = if args.is_empty() {
        let mut buf = String::new();
        if std::io::stdin().read_to_string(&mut buf).is_err() {
            eprintln!("usage: scamscan <payload>");
            std::process::exit(2);
        }
        buf
    } else {
        args.join(" ")
    };

    let scanner = match Scanner::online().await {
        Ok(scanner) => scanner,
        Err(err) => {
            eprintln!("failed to initialize scanner: {err}");
            std::process::exit(1);
        }
    };

    let client = ClientContext {
        user_agent: Some("scamscan-cli".to_string()),
        ..ClientContext::default()
    };
    match scanner.scan(&raw, &client).await {
        Ok(report) => {
            tracing::info!(
                verdict = %report.record.verdict,
                risk = report.record.risk_score,
                "scan complete"
            );
            println!(
                "{}",
                serde_json::to_string_pretty(&report).expect("report serializes")
            );
            if report.record.verdict.is_dangerous() {
                std::process::exit(3);
            }
        }
        Err(err) => {
            eprintln!("scan rejected: {err}");
            std::process::exit(2);
        }
    }
}
