/*
 *  main.rs
 *
 *  DuoNav - two screens, two knobs
 *  (c) 2020-26 Stuart Hunter
 *
 *  Driver - feeds input events and display ticks to the main page
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */

use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::Env;
use log::{debug, error, info, warn};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[cfg(unix)] // Only compile this block on Unix-like systems
use tokio::signal::unix::{signal, SignalKind};

use duonav::config;
use duonav::input::InputEvent;
use duonav::pages::MainPage;

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// Asynchronously waits for a SIGINT, SIGTERM, or SIGHUP signal.
#[cfg(unix)]
async fn signal_handler() -> std::io::Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sighup = signal(SignalKind::hangup())?;

    tokio::select! {
        _ = sigint.recv() => {
            info!("SIGINT received. Initiating graceful shutdown.");
        }
        _ = sigterm.recv() => {
            info!("SIGTERM received. Initiating graceful shutdown.");
        }
        _ = sighup.recv() => {
            info!("SIGHUP received. Initiating graceful shutdown.");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
async fn signal_handler() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    info!("Ctrl-C received. Initiating graceful shutdown.");
    Ok(())
}

/// Event lines from the script file, or stdin when there is none
async fn read_events(script: Option<PathBuf>, tx: mpsc::Sender<String>) -> Result<()> {
    match script {
        Some(path) => {
            let file = tokio::fs::File::open(&path)
                .await
                .with_context(|| format!("opening event script {}", path.display()))?;
            info!("reading events from {}", path.display());
            forward_lines(BufReader::new(file), tx).await
        }
        None => forward_lines(BufReader::new(tokio::io::stdin()), tx).await,
    }
}

async fn forward_lines<R: AsyncBufRead + Unpin>(reader: R, tx: mpsc::Sender<String>) -> Result<()> {
    let mut lines = reader.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        // blank lines and # comments are skipped
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if tx.send(line.to_string()).await.is_err() {
            break;
        }
    }
    Ok(())
}

fn status_line(main_page: &MainPage) -> String {
    format!(
        "{} | {}{}",
        main_page.left_page_name(),
        main_page.right_page_name(),
        if main_page.is_message_page_shown() { " [MSG]" } else { "" }
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = config::load()?;

    env_logger::Builder::from_env(Env::default().default_filter_or(cfg.log_level()))
        .format_timestamp_secs()
        .init();

    info!("{} - two screens, two knobs", env!("CARGO_PKG_NAME"));
    info!("v.{} built {}", env!("CARGO_PKG_VERSION"), BUILD_DATE);

    let mut main_page = MainPage::from_config(&cfg)?;

    let (tx, mut rx) = mpsc::channel::<String>(64);
    let reader = tokio::spawn(read_events(cfg.script.clone(), tx));

    let mut ticker = tokio::time::interval(cfg.tick());
    let mut blink = false;
    let mut last_status = String::new();

    let shutdown = signal_handler();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                if let Err(e) = result {
                    error!("signal handler failed: {}", e);
                }
                break;
            }
            _ = ticker.tick() => {
                blink = !blink;
                main_page.tick(blink);
                if main_page.take_redraw() {
                    for region in main_page.visible_regions() {
                        debug!("draw {} at {:?}", region.page, region.area);
                    }
                }
            }
            line = rx.recv() => {
                let Some(line) = line else {
                    info!("input closed");
                    break;
                };
                match line.parse::<InputEvent>() {
                    Ok(event) => {
                        if let Err(e) = main_page.handle_event(event) {
                            error!("{}: {}", event, e);
                        }
                    }
                    Err(e) => warn!("{:?}: {}", line, e),
                }
            }
        }

        let status = status_line(&main_page);
        if status != last_status {
            info!("{}", status);
            last_status = status;
        }
    }

    reader.abort();
    Ok(())
}
