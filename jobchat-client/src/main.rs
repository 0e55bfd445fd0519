use std::sync::Arc;

use anyhow::Context;
use jobchat_client::terminal::{Command, StdinLines, TerminalHooks, TerminalUi, HELP};
use jobchat_client::view::{lock_view, Button, JobCard, JobListing, ListingKind};
use jobchat_client::{ChatConfig, ChatSession, HttpApi, Outcome};
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    dotenv::dotenv().ok();
    // logs on stderr, the conversation on stdout
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = ChatConfig::from_env().context("load chat config")?;
    let api = Arc::new(
        HttpApi::new(&config.base_url, config.session_cookie.as_deref()).context("build HTTP client")?,
    );
    println!("room {} as {} ({:?} delivery), /help for commands", config.room_id, config.user_name, config.delivery);

    let session = ChatSession::open(config, api, Arc::new(TerminalHooks));
    let mut painted = session.subscribe();
    let painter = tokio::spawn(async move {
        while let Some(unit) = painted.recv().await {
            println!("{unit}");
        }
    });
    if let Err(e) = session.load_history().await {
        warn!(error = %e, "could not load message history");
    }

    let lines = StdinLines::spawn();
    let actions = session.actions(Arc::new(TerminalUi::new(lines.clone())));
    let mut leave_button = Button::new("나가기");
    let mut job_button = Button::new("확인");
    // jobs touched from this terminal, bookmark state as last reported
    let mut jobs = JobListing::new(ListingKind::All, Vec::new());

    while let Some(line) = lines.next_line().await {
        match Command::parse(&line) {
            Command::Say(text) => {
                lock_view(&session.view()).input.set(text);
                actions.send().await;
            }
            Command::Apply(job_id) => {
                actions.apply(job_id, &mut job_button).await;
            }
            Command::Bookmark(job_id) => {
                if jobs.card(job_id).is_none() {
                    jobs.cards.push(JobCard::new(job_id, format!("#{job_id}"), false));
                }
                if actions.toggle_bookmark(job_id, &mut jobs).await == Outcome::Done {
                    if let Some(card) = jobs.card(job_id) {
                        println!("#{job_id} {}", card.bookmark.label);
                    }
                }
            }
            Command::Delete(job_id) => {
                actions.delete_job(job_id, &mut job_button).await;
            }
            Command::Leave => {
                if actions.leave(&mut leave_button).await == Outcome::Done {
                    break;
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Invalid(line) => println!("unknown command: {line}\n{HELP}"),
        }
    }

    session.close().await;
    let _ = painter.await;
    Ok(())
}
