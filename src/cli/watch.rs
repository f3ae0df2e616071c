//! Interactive rate table: search as you type, switch dates without waiting

use super::{table, ui};
use crate::core::table::{RequestToken, TableController, TableState};
use crate::core::window::parse_query_date;
use crate::core::{DailySnapshot, RateError, RateProvider, fetch_table_data};
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

type Response = (RequestToken, Result<DailySnapshot, RateError>);

#[derive(Debug, PartialEq)]
pub enum Input {
    Quit,
    Date(NaiveDate),
    Search(String),
}

pub fn parse_input(line: &str) -> Result<Input, RateError> {
    let line = line.trim();
    match line {
        ":q" | ":quit" => Ok(Input::Quit),
        _ => match line.strip_prefix(":date") {
            Some(rest) => parse_query_date(rest).map(Input::Date),
            None => Ok(Input::Search(line.to_string())),
        },
    }
}

pub async fn run(provider: Arc<dyn RateProvider>, date: NaiveDate) -> Result<()> {
    let mut controller = TableController::new();
    let (tx, mut rx) = mpsc::unbounded_channel::<Response>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut query = String::new();

    println!(
        "{}",
        ui::style_text(
            "Type to search, ':date YYYYMMDD' to switch dates, ':q' to quit.",
            ui::StyleType::Subtle
        )
    );
    start_fetch(&mut controller, &provider, &tx, date);
    render(&controller, &query);

    loop {
        tokio::select! {
            Some((token, result)) = rx.recv() => {
                if controller.resolve(token, result) {
                    render(&controller, &query);
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Date(date)) => {
                        start_fetch(&mut controller, &provider, &tx, date);
                        render(&controller, &query);
                    }
                    Ok(Input::Search(text)) => {
                        query = text;
                        render(&controller, &query);
                    }
                    Err(e) => eprintln!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
            }
        }
    }
    Ok(())
}

fn start_fetch(
    controller: &mut TableController,
    provider: &Arc<dyn RateProvider>,
    tx: &mpsc::UnboundedSender<Response>,
    date: NaiveDate,
) {
    let token = controller.request(date);
    let provider = Arc::clone(provider);
    let tx = tx.clone();
    tokio::spawn(async move {
        let result = fetch_table_data(provider.as_ref(), date).await;
        if tx.send((token, result)).is_err() {
            debug!(?token, "Watch loop ended before response arrived");
        }
    });
}

fn render(controller: &TableController, query: &str) {
    match controller.state() {
        TableState::Idle => {}
        TableState::Loading { date, .. } => println!("Loading rates for {date}..."),
        TableState::Ready { date, snapshot, .. } => {
            println!(
                "{}",
                table::render(*date, &controller.rows(query), snapshot.len())
            );
        }
        TableState::Failed { date, error, .. } => eprintln!(
            "{}",
            ui::style_text(
                &format!("Failed to load rates for {date}: {error}"),
                ui::StyleType::Error
            )
        ),
    }
}
