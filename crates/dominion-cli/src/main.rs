//! Dominion CLI - a command-line client for the Dominion fitness API.
//!
//! Browse the exercise, mobility, and shop catalogs anonymously; sign in to
//! log progress, plan workouts, and join communities and challenges.

mod commands;
mod output;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dominion_core::{AccessDenied, ApiError, Config, Dominion};

/// Initialize the tracing subscriber for logging.
///
/// `RUST_LOG` controls the level (e.g. RUST_LOG=debug). Setting
/// `DOMINION_LOG_DIR` additionally writes daily log files there; the
/// returned guard must stay alive so buffered lines are flushed on exit.
fn init_tracing() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match std::env::var("DOMINION_LOG_DIR") {
        Ok(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "dominion.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(fmt::layer().with_ansi(false).with_writer(writer))
                .with(filter)
                .init();
            Some(guard)
        }
        _ => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn print_usage() {
    println!("Dominion - bodyweight fitness from the command line");
    println!();
    println!("USAGE:");
    println!("    dominion <command> [arguments]");
    println!();
    println!("ACCOUNT:");
    println!("    login                     Sign in");
    println!("    register                  Create an account and sign in");
    println!("    logout                    Sign out");
    println!("    whoami                    Show the signed-in profile");
    println!();
    println!("CATALOG (no account needed):");
    println!("    exercises [--pillar P] [--level L]   Browse the exercise catalog");
    println!("    exercise <id>             Show one exercise");
    println!("    pillars                   List movement pillars");
    println!("    mobility                  Browse the mobility catalog");
    println!("    shop                      Browse the product catalog");
    println!("    communities               List communities");
    println!("    messages <community-id>   Read a community's message history");
    println!("    leaderboard               Show the points leaderboard");
    println!("    challenges                List active challenges");
    println!();
    println!("TRAINING (sign in first):");
    println!("    log <exercise-id> [--reps N] [--sets N] [--hold SECS]");
    println!("        [--weight KG] [--notes TEXT]      Log a training entry");
    println!("    progress [exercise-id]    Show logged progress");
    println!("    plan <name> <exercise-id>... [--duration MIN]   Create a workout");
    println!("    workouts                  List workouts");
    println!("    stats                     Thirty-day training summary");
    println!("    join community <id>       Join a community");
    println!("    join challenge <id>       Join a challenge");
}

/// Map an error to the message shown to the user. Everything is recoverable
/// from the CLI's point of view; nothing here panics.
fn friendly_message(error: &anyhow::Error) -> String {
    if error.downcast_ref::<AccessDenied>().is_some() {
        return "Not signed in - run `dominion login` first".to_string();
    }
    match error.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthenticated) => {
            "Session expired - run `dominion login` to sign in again".to_string()
        }
        Some(ApiError::NetworkFailure(e)) if e.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        Some(ApiError::NetworkFailure(_)) => {
            "Unable to connect to the server. Check your internet connection.".to_string()
        }
        _ => error.to_string(),
    }
}

#[tokio::main]
async fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _log_guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() || args[0] == "help" || args[0] == "--help" {
        print_usage();
        return;
    }

    if let Err(e) = run(&args).await {
        eprintln!("Error: {}", friendly_message(&e));
        std::process::exit(1);
    }
}

async fn run(args: &[String]) -> Result<()> {
    let config = Config::load()?;
    let mut dominion = Dominion::new(config)?;
    info!(command = %args[0], "Dominion CLI starting");

    // Pick up a saved session; a stale one silently falls back to anonymous.
    dominion.restore().await;

    let rest = &args[1..];
    match args[0].as_str() {
        "login" => commands::login(&mut dominion).await,
        "register" => commands::register(&mut dominion).await,
        "logout" => commands::logout(&dominion),
        "whoami" => commands::whoami(&dominion).await,

        "exercises" => commands::exercises(&dominion, rest).await,
        "exercise" => commands::exercise_detail(&dominion, rest).await,
        "pillars" => commands::pillars(&dominion).await,
        "mobility" => commands::mobility(&dominion).await,
        "shop" => commands::shop(&dominion).await,
        "communities" => commands::communities(&dominion).await,
        "messages" => commands::messages(&dominion, rest).await,
        "leaderboard" => commands::leaderboard(&dominion).await,
        "challenges" => commands::challenges(&dominion).await,

        "log" => commands::log_progress(&dominion, rest).await,
        "progress" => commands::progress(&dominion, rest).await,
        "plan" => commands::plan(&dominion, rest).await,
        "workouts" => commands::workouts(&dominion).await,
        "stats" => commands::stats(&dominion).await,
        "join" => commands::join(&dominion, rest).await,

        other => {
            print_usage();
            Err(anyhow::anyhow!("Unknown command: {}", other))
        }
    }
}
