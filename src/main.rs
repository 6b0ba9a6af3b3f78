#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use eframe::egui;

use clickhist::app::ClickHistApp;
use clickhist::case::{self, CaseRecorder};
use clickhist::constants::layout::{WINDOW_HEIGHT, WINDOW_WIDTH};
use clickhist::error::ClickHistError;
use clickhist::pick::ActionDispatcher;
use clickhist::session::Session;

/// Interactive 2D histogram of two gridded variables with click-to-case picking
#[derive(Parser, Debug)]
#[command(name = "clickhist", version)]
struct Args {
    /// Session config (JSON); the window opens empty without one
    config: Option<PathBuf>,

    /// Data file to use instead of the configured data path
    #[arg(long, value_name = "PATH", requires = "config")]
    data: Option<PathBuf>,

    /// Commit this flat sample index and exit without opening a window
    #[arg(long, value_name = "FLAT_INDEX", requires = "config", allow_negative_numbers = true)]
    headless_commit: Option<i64>,
}

fn report(e: &ClickHistError) -> ExitCode {
    log::error!("{}", e);
    eprintln!("{}: {}", e.title(), e.user_message());
    ExitCode::FAILURE
}

#[cfg(feature = "profile-with-puffin")]
fn start_puffin_server() -> Option<puffin_http::Server> {
    puffin::set_scopes_on(true);
    let addr = format!("127.0.0.1:{}", puffin_http::DEFAULT_PORT);
    match puffin_http::Server::new(&addr) {
        Ok(server) => {
            log::info!("puffin server listening on {}", addr);
            Some(server)
        }
        Err(e) => {
            log::warn!("could not start puffin server: {}", e);
            None
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    #[cfg(feature = "profile-with-puffin")]
    let _puffin_server = start_puffin_server();

    let session = match args
        .config
        .as_deref()
        .map(|path| Session::open(path, args.data.as_deref()))
        .transpose()
    {
        Ok(session) => session,
        Err(e) => return report(&e),
    };

    if let Some(flat) = args.headless_commit {
        let Some(session) = session else {
            return report(&ClickHistError::InvalidConfiguration(
                "--headless-commit needs a session config".to_string(),
            ));
        };
        let mut dispatcher = ActionDispatcher::with_action(Box::new(CaseRecorder::for_session(&session)));
        return match case::commit_flat_index(&session, &mut dispatcher, flat) {
            Ok(summary) => {
                log::info!(
                    "case saved for {} at {}",
                    summary.location.timestamp,
                    summary.location_string()
                );
                ExitCode::SUCCESS
            }
            Err(e) => report(&e),
        };
    }

    let (width, height) = session
        .as_ref()
        .map(|s| (s.config().figure.width, s.config().figure.height))
        .unwrap_or((WINDOW_WIDTH, WINDOW_HEIGHT));
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width, height])
            .with_title("ClickHist"),
        ..Default::default()
    };
    let app = match session {
        Some(session) => ClickHistApp::new(session, args.config.clone()),
        None => ClickHistApp::default(),
    };

    if let Err(e) = eframe::run_native("ClickHist", options, Box::new(|_| Ok(Box::new(app)))) {
        log::error!("window closed with error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
