use garrison::core::client::{run, Client};
use garrison::store::memory::MemoryStore;
use garrison::utils::constants::{COMMAND_CHANNEL_CAPACITY, EVENT_CHANNEL_CAPACITY};
use garrison::utils::enums::{ClientCommand, ClientEvent};
use garrison::utils::logger;

use anyhow::Result;
use clap::{Arg, Command};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> Result<()> {
    let matches = Command::new("garrison")
        .about("terminal front end for the garrison chat core")
        .arg(Arg::new("name").short('n').long("name"))
        .arg(
            Arg::new("json")
                .long("json")
                .action(clap::ArgAction::SetTrue),
        )
        .arg(Arg::new("log-dir").long("log-dir"))
        .get_matches();

    match matches.get_one::<String>("log-dir") {
        Some(dir) => logger::init_file_tracing(dir),
        None => logger::init_tracing(),
    }

    let json = matches.get_one::<bool>("json").copied().unwrap_or(false);

    let (tx, rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
    let (event_tx, mut event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

    //The store handle is built here and injected; nothing global.
    let store = MemoryStore::new();
    let client = Client::new(store);

    if let Some(name) = matches.get_one::<String>("name") {
        tx.send(ClientCommand::SetDisplayName(name.clone())).await?;
    }

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            print_event(event, json);
        }
    });

    let input_tx = tx.clone();
    tokio::spawn(async move {
        if let Err(e) = read_input(input_tx).await {
            eprintln!("input loop failed: {}", e);
        }
    });

    run(client, rx, event_tx).await?;
    Ok(())
}

async fn read_input(tx: mpsc::Sender<ClientCommand>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }
        let commands = parse_line(&line);
        if commands.is_empty() {
            eprintln!("usage: /name <name> | /edit <id> <text> | /delete <id> | /quit | <text>");
            continue;
        }
        for command in commands {
            let quit = command == ClientCommand::Shutdown;
            tx.send(command).await?;
            if quit {
                return Ok(());
            }
        }
    }
    //stdin closed, wind the session down
    tx.send(ClientCommand::Shutdown).await?;
    Ok(())
}

fn parse_line(line: &str) -> Vec<ClientCommand> {
    if let Some(rest) = line.strip_prefix("/name ") {
        return vec![ClientCommand::SetDisplayName(rest.to_string())];
    }
    if let Some(rest) = line.strip_prefix("/edit ") {
        let mut parts = rest.splitn(2, ' ');
        if let (Some(id), Some(text)) = (parts.next(), parts.next()) {
            return vec![
                ClientCommand::BeginEdit(id.to_string()),
                ClientCommand::TypeText(text.to_string()),
                ClientCommand::Submit,
            ];
        }
        return Vec::new();
    }
    if let Some(rest) = line.strip_prefix("/delete ") {
        return vec![ClientCommand::Delete(rest.trim().to_string())];
    }
    if line == "/quit" {
        return vec![ClientCommand::Shutdown];
    }
    if line.starts_with('/') {
        return Vec::new();
    }
    vec![
        ClientCommand::BeginCompose,
        ClientCommand::TypeText(line.to_string()),
        ClientCommand::Submit,
    ]
}

fn print_event(event: ClientEvent, json: bool) {
    if json {
        match serde_json::to_string(&event) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("failed to encode event: {}", e),
        }
        return;
    }
    match event {
        ClientEvent::MessagesChanged(messages) | ClientEvent::SendMessages(messages) => {
            println!("--- {} message(s) ---", messages.len());
            for message in messages {
                println!("{}  {}", message.id, message);
            }
        }
        ClientEvent::StreamBroken(reason) => println!("!! live stream broken: {}", reason),
        ClientEvent::ActionFailed(reason) => println!("!! {}", reason),
    }
}
