use clap::{Args, Parser, Subcommand};
use peerlink_cli::application::chat::HELP;
use peerlink_cli::{
    AccessoryConfig, ChatCommand, CliError, ConsoleObserver, LogConfig, Result,
    SimulatedAccessory, load_session_config,
};
use peerlink_core::{
    DiscoveryFailure, SendErrorCode, SessionConfig, SessionHandle, SessionLoop, SessionRuntime,
    SessionSnapshot, SessionState, TransportEvent,
};
use std::path::PathBuf;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

type Runtime = SessionRuntime<SimulatedAccessory, ConsoleObserver>;

#[derive(Parser)]
#[command(name = "peerlink")]
#[command(
    version,
    about = "PeerLink - exchange messages with a (simulated) paired accessory"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    /// Session config file (JSON)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat with the accessory
    Chat {
        #[command(flatten)]
        accessory: AccessoryArgs,
    },

    /// Scripted run: discover, send, wait, summarize
    Demo {
        #[command(flatten)]
        accessory: AccessoryArgs,

        /// Messages to send
        #[arg(short = 'n', long, default_value_t = 5)]
        count: usize,

        /// How long to wait for discovery and for resolutions (ms)
        #[arg(long, default_value_t = 2000)]
        timeout_ms: u64,
    },
}

#[derive(Args, Debug, Clone)]
struct AccessoryArgs {
    /// Simulated peer id (repeatable)
    #[arg(short = 'p', long = "peer", default_value = "gear-s3")]
    peers: Vec<String>,

    /// Make discovery fail (device-not-connected, service-not-found)
    #[arg(long)]
    discovery_failure: Option<DiscoveryFailure>,

    /// Fail every Nth send (0 = never)
    #[arg(long, default_value_t = 0)]
    fail_every: u32,

    /// Error code for injected failures
    #[arg(long, default_value = "PEER_AGENT_NO_RESPONSE")]
    fail_code: SendErrorCode,

    /// Do not echo delivered messages back
    #[arg(long)]
    no_echo: bool,

    /// Largest payload the accessory accepts (bytes)
    #[arg(long, default_value_t = 4096)]
    max_payload: usize,
}

impl From<AccessoryArgs> for AccessoryConfig {
    fn from(args: AccessoryArgs) -> Self {
        Self {
            peers: args.peers,
            discovery_failure: args.discovery_failure,
            fail_every: args.fail_every,
            fail_code: args.fail_code,
            echo: !args.no_echo,
            max_payload: args.max_payload,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut log_config = LogConfig::from_verbosity(cli.verbose);
    if cli.json_logs {
        log_config = log_config.with_json();
    }
    if matches!(cli.command, Commands::Chat { .. }) {
        log_config = log_config.for_interactive(cli.verbose);
    }
    log_config.init().map_err(CliError::Logging)?;

    let config = load_session_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Chat { accessory } => chat(&config, accessory.into()).await,
        Commands::Demo {
            accessory,
            count,
            timeout_ms,
        } => {
            demo(
                &config,
                accessory.into(),
                count,
                Duration::from_millis(timeout_ms),
            )
            .await
        }
    }
}

fn spawn_session(config: &SessionConfig, accessory: AccessoryConfig) -> Runtime {
    info!("Starting session with simulated peers {:?}", accessory.peers);
    let session_loop = SessionLoop::new(
        SimulatedAccessory::new(accessory),
        ConsoleObserver::stdout(),
        config,
    );
    SessionRuntime::spawn(
        session_loop,
        Duration::from_millis(config.poll_interval_ms),
    )
}

async fn wait_for(
    handle: &SessionHandle,
    timeout: Duration,
    what: &'static str,
    done: impl Fn(&SessionSnapshot) -> bool,
) -> Result<SessionSnapshot> {
    let deadline = tokio::time::Instant::now() + timeout;

    loop {
        let status = handle.status().await?;
        if done(&status) {
            return Ok(status);
        }
        if tokio::time::Instant::now() >= deadline {
            return Err(CliError::Timeout(what));
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

fn print_status(status: &SessionSnapshot) {
    let peer = status
        .bound_peer
        .as_ref()
        .map(|p| format!("{} ({})", p.id(), p.reachability()))
        .unwrap_or_else(|| "none".to_string());

    println!(
        "State: {} | Peer: {} | In flight: {}",
        status.state, peer, status.pending
    );
}

async fn chat(config: &SessionConfig, accessory: AccessoryConfig) -> Result<()> {
    let runtime = spawn_session(config, accessory);
    let handle = runtime.handle();

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match ChatCommand::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            ChatCommand::Find => handle.find_peers()?,
            ChatCommand::Bind(peer) => {
                if let Err(e) = handle.bind(peer).await {
                    println!("{}", e);
                }
            }
            ChatCommand::Unbind => {
                if handle.unbind().await?.is_none() {
                    println!("No peer bound");
                }
            }
            ChatCommand::Status => print_status(&handle.status().await?),
            ChatCommand::Availability { peer, available } => {
                let event = TransportEvent::PeerAvailabilityChanged { peer, available };
                if let Err(e) = handle.deliver(event).await {
                    println!("{}", e);
                }
            }
            ChatCommand::Help => println!("{}", HELP),
            ChatCommand::Quit => break,
            ChatCommand::Send(text) => {
                if let Err(e) = handle.send(text).await {
                    println!("{}", e);
                }
            }
        }
    }

    runtime.shutdown().await?;
    info!("Chat closed");
    Ok(())
}

async fn demo(
    config: &SessionConfig,
    accessory: AccessoryConfig,
    count: usize,
    timeout: Duration,
) -> Result<()> {
    let runtime = spawn_session(config, accessory);
    let handle = runtime.handle();

    handle.find_peers()?;
    let status = wait_for(&handle, timeout, "discovery", |s| {
        s.state != SessionState::Discovering
    })
    .await?;

    if status.bound_peer.is_none() {
        runtime.shutdown().await?;
        return Err(CliError::DiscoveryFailed(
            "no peer could be bound".to_string(),
        ));
    }

    let mut rejected = 0;
    for i in 1..=count {
        if let Err(e) = handle.send(format!("Hello {}", i)).await {
            println!("Send rejected: {}", e);
            rejected += 1;
        }
    }

    if let Err(e) = wait_for(&handle, timeout, "resolutions", |s| s.pending == 0).await {
        warn!("{}", e);
    }

    let session_loop = runtime.shutdown().await?;
    let tally = session_loop.controller().observer().tally();

    println!();
    println!("Summary");
    println!("  sent:         {}", tally.sent);
    println!("  rejected:     {}", rejected);
    println!("  acknowledged: {}", tally.acknowledged);
    println!("  failed:       {}", tally.failed);
    println!("  unresolved:   {}", tally.unresolved());
    println!("  received:     {}", tally.received);
    println!("  anomalies:    {}", tally.anomalies);

    Ok(())
}
