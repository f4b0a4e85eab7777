use anyhow::{Context, Result};
use askform::app::{App, StoreTarget};
use askform::config;
use askform::form::Acknowledge;
use askform::render;
use askform::signal::FocusTarget;
use askform::store::StoreClient;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,
}

/// Marks the question prompt as focused; the next prompt shows it.
#[derive(Debug, Default)]
struct TerminalFocus {
    pending: AtomicBool,
}

impl TerminalFocus {
    fn take(&self) -> bool {
        self.pending.swap(false, Ordering::SeqCst)
    }
}

impl FocusTarget for TerminalFocus {
    fn focus_question(&self) {
        self.pending.store(true, Ordering::SeqCst);
    }
}

struct TerminalAcknowledge;

impl Acknowledge for TerminalAcknowledge {
    fn acknowledge(&self, question: &str) {
        println!("Question sent: {}", question);
    }
}

fn print_screen(app: &App) {
    if let Some(banner) = render::banner(app.signal.message().as_deref()) {
        println!("{}", banner);
    }
    println!();
    println!("Outputs");
    print!("{}", render::table(&app.records.snapshot()));
}

fn prompt(focus: &TerminalFocus) -> Result<()> {
    if focus.take() {
        print!("question> ");
    } else {
        print!("> ");
    }
    std::io::stdout().flush()?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let cfg = config::load(Some(&args.config))?;
    let store = StoreClient::from_config(&cfg)?;
    let focus = Arc::new(TerminalFocus::default());

    let mut app = App::new(
        Arc::new(store),
        StoreTarget::from_config(&cfg),
        focus.clone(),
        Arc::new(TerminalAcknowledge),
    );

    let (mut probe, mut load) = app.mount().into_handles();
    let mut probe_done = false;
    let mut load_done = false;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Type a question and press Enter. `:r` reloads outputs, `:q` quits.");
    prompt(&focus)?;

    loop {
        tokio::select! {
            status = &mut probe, if !probe_done => {
                probe_done = true;
                let status = status.context("connectivity probe task failed")?;
                info!(status = status.as_str(), "connection check finished");
                if let Some(notice) = app.modal.notice() {
                    println!();
                    println!("{}", render::modal(notice));
                }
                prompt(&focus)?;
            }
            loaded = &mut load, if !load_done => {
                load_done = true;
                if let Err(err) = loaded.context("record load task failed")? {
                    warn!(%err, "startup load failed");
                }
                println!();
                print_screen(&app);
                prompt(&focus)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                // An open modal swallows the next line as its close button.
                if app.modal.notice().is_some() {
                    app.modal.dismiss();
                    prompt(&focus)?;
                    continue;
                }
                match line.trim() {
                    ":q" => break,
                    ":r" => {
                        if let Err(err) = app.reload().await {
                            warn!(%err, "reload failed");
                        }
                        print_screen(&app);
                    }
                    _ => {
                        app.form.on_change(line);
                        if app.form.on_submit().is_err() {
                            if let Some(banner) = render::banner(app.signal.message().as_deref()) {
                                println!("{}", banner);
                            }
                        }
                    }
                }
                prompt(&focus)?;
            }
        }
    }

    probe.abort();
    load.abort();
    Ok(())
}
