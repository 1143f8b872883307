//! `checkin` - CLI for the attendance check-in client
//!
//! Drives the scanner screen from the terminal: codes come from arguments or
//! stdin, result dialogs are printed, and acknowledgment is implied by the
//! next code.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use checkin::cli::{Cli, Command, ConfigCommand, OpenCommand, ScanCommand, SendCommand};
use checkin::navigation::REGISTERED_SCREENS;
use checkin::permission::provider_from_config;
use checkin::screen::{HomeScreen, LoginScreen};
use checkin::source::{scan_channel, LineSource, ListSource, ScanSource};
use checkin::{
    init_logging, AttendanceScreen, CheckInClient, Config, NavigationShell, Notification,
    ScanPermission,
};

/// Exit status when the scan was interrupted with Ctrl-C.
const EXIT_INTERRUPTED: i32 = 130;

/// Capacity of the decode event channel.
const SCAN_CHANNEL_CAPACITY: usize = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    init_logging(cli.verbosity());

    // `config path` and `config validate` must work with a broken config file.
    let config = if cli.command.loads_config() {
        Config::load_from(cli.config.clone()).context("loading configuration")?
    } else {
        Config::default()
    };

    match cli.command {
        Command::Scan(cmd) => handle_scan(config, cmd).await,
        Command::Send(cmd) => handle_send(&config, &cmd).await,
        Command::Menu(cmd) => handle_menu(cmd.json),
        Command::Open(cmd) => Ok(handle_open(&cmd)),
        Command::Config(cmd) => handle_config(&config, cli.config, cmd),
    }
}

/// Cancel `token` on the first Ctrl-C.
fn cancel_on_ctrl_c(token: CancellationToken) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received, cancelling");
            token.cancel();
        }
    })
}

fn print_notification(notification: &Notification, json: bool) {
    if json {
        match serde_json::to_string(notification) {
            Ok(line) => println!("{line}"),
            Err(e) => tracing::error!(error = %e, "failed to encode result"),
        }
    } else {
        println!("{notification}");
    }
}

async fn handle_scan(mut config: Config, cmd: ScanCommand) -> anyhow::Result<ExitCode> {
    if let Some(permission) = cmd.permission {
        config.scanner.permission = permission.into();
        config.validate()?;
    }

    let client = CheckInClient::from_config(&config)?;
    let mut screen = AttendanceScreen::new(client, provider_from_config(&config.scanner));

    if screen.mount().await != ScanPermission::Granted {
        eprintln!("{}", screen.view().message());
        return Ok(ExitCode::FAILURE);
    }
    if !cmd.json {
        eprintln!("{}", screen.view().message());
    }

    let source: Box<dyn ScanSource> = if cmd.codes.is_empty() {
        Box::new(LineSource::stdin())
    } else {
        Box::new(ListSource::new(cmd.codes))
    };
    let source_name = source.name();

    let (sink, feed) = scan_channel(SCAN_CHANNEL_CAPACITY);
    let reader = tokio::spawn(source.run(sink));

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());

    let json = cmd.json;
    let shown = screen
        .run(feed, &cancel, |notification| {
            print_notification(notification, json);
            notification.action
        })
        .await;
    interrupt.abort();

    let recorded = shown.iter().filter(|n| n.result.is_success()).count();
    if !json {
        eprintln!(
            "{} scanned, {recorded} recorded, {} ignored",
            screen.accepted_scans(),
            screen.refused_scans()
        );
    }

    if cancel.is_cancelled() {
        // A pending stdin read cannot be interrupted; don't wait for it.
        std::process::exit(EXIT_INTERRUPTED);
    }

    match reader.await {
        Ok(Ok(sent)) => tracing::debug!(source = source_name, sent, "scan source finished"),
        Ok(Err(e)) => tracing::error!(source = source_name, error = %e, "scan source failed"),
        Err(e) => tracing::error!(source = source_name, error = %e, "scan source task panicked"),
    }

    Ok(if recorded == shown.len() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

async fn handle_send(config: &Config, cmd: &SendCommand) -> anyhow::Result<ExitCode> {
    let client = CheckInClient::from_config(config)?;

    let cancel = CancellationToken::new();
    let interrupt = cancel_on_ctrl_c(cancel.clone());
    let result = client.check_in_with_cancel(&cmd.code, &cancel).await;
    interrupt.abort();

    let success = result.is_success();
    print_notification(&Notification::for_result(result), cmd.json);

    Ok(if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn handle_menu(json: bool) -> anyhow::Result<ExitCode> {
    let home = HomeScreen::default();
    let shell = NavigationShell::default();

    if json {
        let tiles: Vec<_> = home
            .tiles()
            .iter()
            .map(|entry| {
                serde_json::json!({
                    "label": entry.label,
                    "glyph": entry.glyph,
                    "destination": entry.destination,
                    "registered": shell.is_registered(entry.destination),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&tiles)?);
    } else {
        println!("{}", HomeScreen::WELCOME);
        println!();
        for entry in home.tiles() {
            let note = if shell.is_registered(entry.destination) {
                ""
            } else {
                "  (not available)"
            };
            println!("  {} {:<12} -> {}{note}", entry.glyph, entry.label, entry.destination);
        }
        println!();
        let screens: Vec<_> = REGISTERED_SCREENS.iter().map(|s| s.name()).collect();
        println!("Registered screens: {}", screens.join(", "));
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_open(cmd: &OpenCommand) -> ExitCode {
    let mut shell = NavigationShell::default();
    let opened = LoginScreen
        .submit(&mut shell)
        .and_then(|_| HomeScreen::default().tap(&cmd.destination, &mut shell));

    let path: Vec<_> = shell.stack().iter().map(|s| s.title()).collect();
    match opened {
        Ok(screen) => {
            println!("{}", path.join(" > "));
            tracing::debug!(screen = %screen, "opened");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("cannot open '{}': {e}", cmd.destination);
            eprintln!("still on: {}", path.join(" > "));
            ExitCode::FAILURE
        }
    }
}

fn handle_config(
    config: &Config,
    config_path: Option<PathBuf>,
    cmd: ConfigCommand,
) -> anyhow::Result<ExitCode> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Endpoint]");
                println!("  Attendance URL:     {}", config.attendance_url()?);
                match config.request_timeout() {
                    Some(timeout) => println!("  Request timeout:    {} ms", timeout.as_millis()),
                    None => println!("  Request timeout:    none"),
                }
                println!();
                println!("[Scanner]");
                println!("  Permission:         {:?}", config.scanner.permission);
                if let Some(path) = &config.scanner.device_path {
                    println!("  Camera device:      {}", path.display());
                }
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => {
                    println!("Configuration error: {e}");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}
