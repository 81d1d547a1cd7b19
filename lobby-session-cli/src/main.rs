use clap::{Parser, Subcommand};
use lobby_session_cli::shell::{render_lobbies, render_status, HELP};
use lobby_session_cli::{export_schemas, CliError, LogConfig, Result, ShellCommand};
use lobby_session_client::{
    ClientConfig, FileTokenStore, SessionHandle, SessionManager, SessionRuntime,
    TokenStore, WebSocketConnector,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "lobby-cli")]
#[command(version, about = "Lobby CLI - session token management and an interactive lobby shell")]
struct Cli {
    /// Lobby server address (http(s):// or ws(s)://, the path is always /ws)
    #[arg(
        short = 's',
        long,
        env = "LOBBY_SERVER_URL",
        default_value = "http://localhost:4000",
        global = true
    )]
    server: String,

    /// Directory holding the session token file
    #[arg(long, env = "LOBBY_TOKEN_DIR", default_value = ".lobby-session", global = true)]
    token_dir: PathBuf,

    /// Seconds to wait for an answer to a join request
    #[arg(long, default_value_t = 10, global = true)]
    request_timeout: u64,

    /// Verbose logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored session token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Connect and open the interactive lobby shell
    Connect,

    /// Export JSON Schemas of the wire frames
    Schema {
        /// Output directory
        #[arg(short = 'o', long, default_value = "schemas")]
        out: PathBuf,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Store a token obtained from the login endpoint
    Set { token: String },
    /// Remove the stored token
    Clear,
    /// Print whether a token is stored
    Show,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = match (&cli.command, cli.verbose) {
        (_, true) => LogConfig::dev(),
        (Commands::Connect, false) => LogConfig::quiet(),
        _ => LogConfig::default(),
    };
    log_config.init()?;

    match cli.command {
        Commands::Token { action } => {
            let store = FileTokenStore::open(&cli.token_dir)?;
            run_token_action(&store, action)?;
        }
        Commands::Connect => {
            let config = ClientConfig::new(&cli.server)?
                .with_request_timeout(Duration::from_secs(cli.request_timeout));
            let store = FileTokenStore::open(&cli.token_dir)?;
            run_shell(config, store).await?;
        }
        Commands::Schema { out } => {
            for path in export_schemas(&out)? {
                println!("{}", path.display());
            }
        }
    }

    Ok(())
}

fn run_token_action(store: &FileTokenStore, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Set { token } => {
            if token.trim().is_empty() {
                return Err(CliError::InvalidConfig("token must not be empty".to_string()));
            }
            store.store(&token)?;
            println!("Token stored in {}", store.path().display());
        }
        TokenAction::Clear => {
            store.clear()?;
            println!("Token cleared");
        }
        TokenAction::Show => match store.load() {
            Some(token) => println!("Token stored ({} characters)", token.len()),
            None => println!("No token stored"),
        },
    }
    Ok(())
}

async fn run_shell(config: ClientConfig, store: FileTokenStore) -> Result<()> {
    info!("Using lobby endpoint {}", config.endpoint);

    let manager = SessionManager::new(config, Arc::new(store), Arc::new(WebSocketConnector::new()));
    let runtime = SessionRuntime::spawn(manager);
    let handle = runtime.handle();

    let mut notices = handle.notices();
    let mut state_rx = handle.subscribe();
    let mut last_page = handle.snapshot().state.page;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if let Err(e) = handle.connect().await {
        println!("{}", e);
    }
    println!("Type 'help' for commands.");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match ShellCommand::parse(&line) {
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&handle, command).await,
                    Ok(None) => {}
                    Err(message) => println!("{}", message),
                }
            }

            notice = notices.recv() => match notice {
                Ok(notice) => println!("{}", notice),
                Err(e) => warn!("Missed notices: {}", e),
            },

            changed = state_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let page = state_rx.borrow_and_update().state.page;
                if page != last_page {
                    println!("-> {}", page);
                    last_page = page;
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down...");
                break;
            }
        }
    }

    runtime.shutdown().await;
    Ok(())
}

async fn execute(handle: &SessionHandle, command: ShellCommand) {
    let result = match command {
        ShellCommand::Help => {
            println!("{}", HELP);
            Ok(())
        }
        ShellCommand::Status => {
            print!("{}", render_status(&handle.snapshot()));
            Ok(())
        }
        ShellCommand::Lobbies => {
            print!("{}", render_lobbies(&handle.snapshot().state.lobbies));
            Ok(())
        }
        ShellCommand::Create {
            name,
            max_players,
            password,
        } => {
            let is_private = password.is_some();
            let password = password.unwrap_or_default();
            handle
                .create_lobby(&name, max_players, is_private, &password)
                .await
                .map(|_| ())
        }
        ShellCommand::Join { lobby_id, password } => {
            handle
                .join_lobby(lobby_id.clone(), &password)
                .await
                .map(|pending| {
                    tokio::spawn(async move {
                        println!("join {}: {}", lobby_id, pending.wait().await);
                    });
                })
        }
        ShellCommand::Leave => handle.leave_lobby().await.map(|_| ()),
        ShellCommand::Ready => handle.start_game().await.map(|_| ()),
        ShellCommand::Unready => handle.cancel_game().await.map(|_| ()),
        ShellCommand::Connect => handle.connect().await,
        ShellCommand::Logout => handle.logout().await,
        ShellCommand::Quit => Ok(()),
    };

    if let Err(e) = result {
        println!("{}", e);
    }
}
