//! Interactive chat loop.
//!
//! Each line read from stdin is one submission. The assistant's answer is
//! printed, then the map is re-rendered if its center moved.

use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use url::Url;
use voyage_core::gazetteer::Coordinates;
use voyage_core::map::{LoadStatus, MapView, SyncOutcome};
use voyage_core::message::{Message, Role};
use voyage_core::session::{SessionHandle, SubmitOutcome};

use crate::Result;
use crate::client::HttpRelay;

const QUIT: &str = "/quit";

pub async fn run(server: Url, map_key: Option<String>) -> Result<()> {
    let relay = HttpRelay::new(&server)?;
    let session = SessionHandle::spawn(Arc::new(relay));
    let mut map = MapView::new(map_key);
    let mut shown = None;
    log::info!("using relay server {server}");

    let snapshot = session.snapshot().await?;
    snapshot.transcript.iter().for_each(print_message);
    render_map(&mut map, snapshot.map_center, &mut shown);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim() == QUIT {
            break;
        }

        session.set_pending_input(line.clone()).await?;
        match session.submit(line).await? {
            SubmitOutcome::Ignored => continue,
            SubmitOutcome::Replied(_) => {}
            SubmitOutcome::Failed(e) => log::warn!("relay failed: {e}"),
        }

        let snapshot = session.snapshot().await?;
        if let Some(message) = snapshot.transcript.last() {
            print_message(message);
        }
        render_map(&mut map, snapshot.map_center, &mut shown);
    }

    Ok(())
}

fn print_message(message: &Message) {
    let who = match message.role {
        Role::Assistant => "assistant",
        Role::User => "vous",
        Role::System => "système",
    };
    println!("{who}: {}", message.content);
}

/// Print the center when the map was just created or moved somewhere new.
fn render_map(map: &mut MapView, center: Coordinates, shown: &mut Option<Coordinates>) {
    match map.sync(LoadStatus::Ready, center) {
        SyncOutcome::Created(c) | SyncOutcome::Recentered(c) if *shown != Some(c) => {
            println!("[carte] centre ({:.4}, {:.4})", c.longitude, c.latitude);
            *shown = Some(c);
        }
        _ => {}
    }
}
