//! # quantumic — console session runner
//!
//! Thin exerciser of the session controller: wires logging + config, builds
//! the HTTP gateway and the session, then drives the imperative entry points
//! from stdin. Not a UI — the dashboard's presentation layer lives elsewhere
//! and consumes the same `Session` surface.
//!
//! ## Environment Variables
//!
//! | Variable             | Default                 | Description                     |
//! |----------------------|-------------------------|---------------------------------|
//! | `BACKEND_URL`        | `http://localhost:3000` | Agent + ledger service base URL |
//! | `POLL_INTERVAL_SECS` | `30`                    | Snapshot refresh cadence        |
//! | `RUST_LOG`           | `quantumic=debug`       | Tracing filter                  |

use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quantumic::format::{segment_message, Segment};
use quantumic::models::{Asset, Direction};
use quantumic::{Config, HttpGateway, Session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::from_default_env()
                .add_directive("quantumic=debug".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    info!(
        r#"

  ╔═══════════════════════════════════════════╗
  ║   QUANTUMIC — AI Trading Dashboard        ║
  ║   Session Controller                      ║
  ╚═══════════════════════════════════════════╝"#
    );

    let config = Config::from_env().context("Failed to load config")?;
    let gateway = Arc::new(HttpGateway::new(&config.backend_url));
    let session = Session::with_poll_interval(gateway, config.poll_interval);

    session.start().await;
    info!(
        backend  = %config.backend_url,
        interval = ?config.poll_interval,
        "session running — type a message, /buy <sym> <amt>, /sell <sym> <amt>, /auto or /quit"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !handle_line(&session, line.trim()).await {
                    break;
                }
            }
        }
    }

    session.stop().await;
    Ok(())
}

/// One console command. Returns `false` on `/quit`.
async fn handle_line(session: &Session, line: &str) -> bool {
    match line.split_whitespace().collect::<Vec<_>>().as_slice() {
        [] => {}
        ["/quit"] => return false,
        ["/auto"] => match session.submit_auto_trade().await {
            Ok(trade) => info!(asset = %trade.asset, price = trade.price, "auto trade done"),
            Err(e) => warn!(error = %e, "auto trade rejected"),
        },
        [cmd @ ("/buy" | "/sell"), symbol, amount] => {
            let direction = if *cmd == "/buy" { Direction::Buy } else { Direction::Sell };
            let Some(asset) = Asset::from_symbol(symbol) else {
                warn!(symbol = %symbol, "unknown asset");
                return true;
            };
            let Ok(amount) = amount.parse::<f64>() else {
                warn!(amount = %amount, "amount must be a number");
                return true;
            };
            match session.submit_manual_trade(asset, direction, amount).await {
                Ok(trade) => info!(asset = %trade.asset, price = trade.price, "trade done"),
                Err(e) => warn!(error = %e, "trade rejected"),
            }
        }
        _ => {
            if session.submit_chat_turn(line).await {
                if let Some(reply) = session.conversation().snapshot().await.last() {
                    print_reply(&reply.content);
                }
            }
        }
    }
    true
}

fn print_reply(content: &str) {
    for segment in segment_message(content) {
        match segment {
            Segment::Paragraph(text) => println!("{text}"),
            Segment::CodeBlock(code) => {
                println!("  ┌───");
                for line in code.lines() {
                    println!("  │ {line}");
                }
                println!("  └───");
            }
            Segment::BulletLine(text) => println!("  • {text}"),
            Segment::NumberedLine { number, text } => println!("  {number}. {text}"),
        }
    }
}
