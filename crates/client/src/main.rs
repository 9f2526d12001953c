//! Taleweave console client - composition root binary.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use taleweave_client::{
    ApiAdapter, AuthService, BearerToken, DebugService, GameService, HistoryService, SessionStore,
    StoryService,
};
use taleweave_domain::{parse_sensory_payload, GameState, TranscriptEntry};
use taleweave_shared::{CreateStoryRequest, LoginRequest, RegisterRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from the working directory, if a .env is present.
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "taleweave=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Taleweave client");

    // Load configuration
    let base_url = std::env::var("TALEWEAVE_API_URL")
        .unwrap_or_else(|_| taleweave_client::infrastructure::http_client::DEFAULT_BASE_URL.into());
    url::Url::parse(&base_url)
        .map_err(|e| anyhow::anyhow!("invalid TALEWEAVE_API_URL {base_url:?}: {e}"))?;
    let session_id = std::env::var("TALEWEAVE_SESSION_ID").unwrap_or_else(|_| "default".into());

    // Wire the engine: one adapter, one store, services on top.
    let token = BearerToken::new();
    let api = Arc::new(ApiAdapter::new(&base_url, token.clone()));
    let store = Arc::new(SessionStore::new());
    let auth = AuthService::new(api.clone(), token);
    let history = HistoryService::new(api.clone()).with_session(session_id);
    let game = GameService::new(api.clone(), history, store.clone(), auth.clone());
    let stories = StoryService::new(api.clone());
    let debug = DebugService::new(api);

    println!("Taleweave console ({base_url})");
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt(&store).await;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = split_command(line);
        match command {
            "quit" | "exit" => break,
            "help" => print_help(),
            "login" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(username), Some(password)) => {
                        report(
                            auth.login(LoginRequest {
                                username: username.into(),
                                password: password.into(),
                            })
                            .await
                            .map(|user| format!("signed in as {}", user.username)),
                        );
                    }
                    _ => println!("usage: login <username> <password>"),
                }
            }
            "register" => {
                let mut parts = rest.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some(username), Some(password)) => {
                        report(
                            auth.register(RegisterRequest {
                                username: username.into(),
                                password: password.into(),
                                email: parts.next().map(str::to_string),
                            })
                            .await
                            .map(|user| format!("registered and signed in as {}", user.username)),
                        );
                    }
                    _ => println!("usage: register <username> <password> [email]"),
                }
            }
            "logout" => {
                auth.logout().await;
                game.deselect_story().await;
                println!("signed out");
            }
            "stories" => match stories.list().await {
                Ok(list) if list.is_empty() => println!("no stories yet, try 'new <name>'"),
                Ok(list) => {
                    for story in list {
                        println!("  #{}  {}  - {}", story.id, story.name, story.description);
                    }
                }
                Err(err) => println!("error: {err}"),
            },
            "new" => {
                if rest.is_empty() {
                    println!("usage: new <name>");
                } else {
                    report(
                        stories
                            .create(CreateStoryRequest {
                                name: rest.to_string(),
                                description: None,
                            })
                            .await
                            .map(|story| format!("created story #{}", story.id)),
                    );
                }
            }
            "select" => match rest.parse::<i64>() {
                Ok(story_id) => match game.select_story(story_id).await {
                    Ok(()) => {
                        print_state(&store).await;
                        print_transcript(&store.transcript().await);
                    }
                    Err(err) => println!("error: {err}"),
                },
                Err(_) => println!("usage: select <story-id>"),
            },
            "state" => print_state(&store).await,
            "log" => print_transcript(&store.transcript().await),
            "npc" => {
                if rest.is_empty() {
                    println!("usage: npc <name>");
                } else {
                    print_transcript(&game.npc_transcript(rest).await);
                }
            }
            "talk" => match rest.split_once(':') {
                Some((npc_name, text)) => match game.talk_to_npc(npc_name.trim(), text).await {
                    Ok(chat) => print_transcript(&chat.transcript),
                    Err(err) => println!("error: {err}"),
                },
                None => println!("usage: talk <npc>: <text>"),
            },
            "console" => match debug.console_snapshot().await {
                Ok(snapshot) => {
                    println!("fetched at {}", snapshot.fetched_at);
                    println!("locations: {:#}", snapshot.locations);
                    println!("npcs: {:#}", snapshot.npcs);
                }
                Err(err) => println!("error: {err}"),
            },
            // Anything else is a player action.
            _ => match game.submit_action(line).await {
                Ok(_) => print_transcript(&store.transcript().await),
                Err(err) => println!("error: {err}"),
            },
        }
    }

    tracing::info!("Taleweave client exiting");
    Ok(())
}

fn print_help() {
    println!("commands:");
    println!("  help");
    println!("  quit | exit");
    println!("  login <username> <password>");
    println!("  register <username> <password> [email]");
    println!("  logout");
    println!("  stories");
    println!("  new <name>");
    println!("  select <story-id>");
    println!("  state");
    println!("  log");
    println!("  npc <name>");
    println!("  talk <npc>: <text>");
    println!("  console");
    println!("  <text>   (anything else is submitted as a player action)");
}

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    }
}

fn report(result: Result<String, impl std::fmt::Display>) {
    match result {
        Ok(message) => println!("{message}"),
        Err(err) => println!("error: {err}"),
    }
}

async fn print_prompt(store: &SessionStore) {
    match store.active_story().await {
        Some(story_id) => print!("story {story_id}> "),
        None => print!("> "),
    }
    use std::io::Write;
    let _ = std::io::stdout().flush();
}

async fn print_state(store: &SessionStore) {
    let Some(state) = store.snapshot().await else {
        println!("no story selected");
        return;
    };
    print_location(&state);
}

fn print_location(state: &GameState) {
    println!(
        "{} ({}) - {}",
        state.player_location, state.current_time, state.location_description
    );
    if !state.connected_locations.is_empty() {
        println!("exits: {}", state.connected_locations.join(", "));
    }
    for npc in &state.npcs_at_current_location {
        println!("  {} - {} ({})", npc.name, npc.event, npc.personality);
    }
}

fn print_transcript(entries: &[TranscriptEntry]) {
    if entries.is_empty() {
        println!("(empty transcript)");
        return;
    }
    for entry in entries {
        match parse_sensory_payload(&entry.message) {
            Some(payload) => {
                println!("{}:", entry.speaker);
                for (sense, text) in [
                    ("vision", &payload.vision),
                    ("hearing", &payload.hearing),
                    ("smell", &payload.smell),
                    ("touch", &payload.touch),
                ] {
                    if !text.is_empty() {
                        println!("    {sense}: {text}");
                    }
                }
            }
            None => println!("{}: {}", entry.speaker, entry.message),
        }
    }
}
