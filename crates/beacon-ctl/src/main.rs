//! beacon-ctl — command-line interface for the Beacon registry daemon.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 8080;

// ── Response types ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct StatusResponse {
    servers:              usize,
    stale_threshold_secs: u64,
    uptime_secs:          u64,
}

#[derive(Deserialize)]
struct ServerInfo {
    ip:           String,
    port:         u16,
    name:         String,
    game_version: u32,
    is_joinable:  bool,
    last_seen:    u64,
}

#[derive(Deserialize)]
struct ResultBody {
    result: String,
}

#[derive(Deserialize)]
struct IpResponse {
    ip: String,
}

#[derive(Serialize)]
struct Submission {
    name:         String,
    game_version: u32,
    is_joinable:  bool,
}

// ── HTTP helpers ──────────────────────────────────────────────────────────────

fn base_url(port: u16) -> String {
    format!("http://127.0.0.1:{}/api", port)
}

async fn get_json<T: for<'de> Deserialize<'de>>(url: &str) -> Result<T> {
    reqwest::get(url)
    .await
    .with_context(|| format!("failed to connect to beacond at {} — is it running?", url))?
    .json::<T>()
    .await
    .context("failed to parse response")
}

/// Send a request that answers with a `{"result": ...}` body on any status.
async fn send_for_result(req: reqwest::RequestBuilder, url: &str) -> Result<()> {
    let resp = req
    .send()
    .await
    .with_context(|| format!("failed to connect to beacond at {} — is it running?", url))?;

    let status = resp.status();
    let body: ResultBody = resp.json().await.context("failed to parse response")?;

    println!("{} — {}", status, body.result);
    if !status.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

// ── Subcommand handlers ───────────────────────────────────────────────────────

async fn cmd_status(port: u16) -> Result<()> {
    let resp: StatusResponse = get_json(&format!("{}/status", base_url(port))).await?;

    println!("═══════════════════════════════════════");
    println!("  Beacon Registry Status");
    println!("═══════════════════════════════════════");
    println!("  Registered servers : {}", resp.servers);
    println!("  Stale threshold    : {}s", resp.stale_threshold_secs);
    println!("  Uptime             : {}s", resp.uptime_secs);

    Ok(())
}

async fn cmd_list(port: u16) -> Result<()> {
    let servers: Vec<ServerInfo> = get_json(&format!("{}/servers", base_url(port))).await?;

    if servers.is_empty() {
        println!("No servers registered.");
        return Ok(());
    }

    println!("═══════════════════════════════════════");
    println!("  Registered Servers ({})", servers.len());
    println!("═══════════════════════════════════════");

    for s in &servers {
        println!("  ┌─ {}", s.name);
        println!("  │  address  : {}:{}", s.ip, s.port);
        println!("  │  version  : {}", s.game_version);
        println!("  │  joinable : {}", if s.is_joinable { "yes" } else { "no" });
        println!("  └─ last seen: {} (unix)", s.last_seen);
    }

    Ok(())
}

async fn cmd_register(
    port: u16,
    server_id: &str,
    name: &str,
    game_version: u32,
    is_joinable: bool,
) -> Result<()> {
    let url = format!("{}/servers/{}", base_url(port), server_id);
    let body = Submission {
        name: name.to_string(),
        game_version,
        is_joinable,
    };
    send_for_result(reqwest::Client::new().post(&url).json(&body), &url).await
}

async fn cmd_remove(port: u16, server_id: &str) -> Result<()> {
    let url = format!("{}/servers/{}", base_url(port), server_id);
    send_for_result(reqwest::Client::new().delete(&url), &url).await
}

async fn cmd_getip(port: u16) -> Result<()> {
    let resp: IpResponse = get_json(&format!("{}/getip", base_url(port))).await?;
    println!("{}", resp.ip);
    Ok(())
}

fn print_usage() {
    println!("Usage: beacon-ctl [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status                          Show registry status");
    println!("  list                            List registered servers");
    println!("  register <ip:port> <name>       Register a server (run on the server's host)");
    println!("      [--version <n>] [--joinable]");
    println!("  remove <ip:port>                Remove a server registration");
    println!("  getip                           Print the source IP the registry sees");
    println!();
    println!("Options:");
    println!("  --port <port>   Registry API port (default: {})", DEFAULT_PORT);
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --port option
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        if args[i] == "--port" {
            i += 1;
            port = args.get(i)
            .context("--port requires a value")?
            .parse()
            .context("--port must be a number")?;
        } else {
            remaining.push(&args[i]);
        }
        i += 1;
    }

    match remaining.as_slice() {
        ["status"] | []                => cmd_status(port).await,
        ["list"]                       => cmd_list(port).await,
        ["getip"]                      => cmd_getip(port).await,
        ["remove", server_id]          => cmd_remove(port, server_id).await,
        ["register", server_id, name, rest @ ..] => {
            let mut game_version = 0u32;
            let mut is_joinable = false;
            let mut j = 0;
            while j < rest.len() {
                match rest[j] {
                    "--version" => {
                        j += 1;
                        game_version = rest.get(j)
                        .context("--version requires a value")?
                        .parse()
                        .context("--version must be a number")?;
                    }
                    "--joinable" => is_joinable = true,
                    other => anyhow::bail!("unknown register option: {other}"),
                }
                j += 1;
            }
            cmd_register(port, server_id, name, game_version, is_joinable).await
        }
        ["help"] | ["--help"] | ["-h"] => { print_usage(); Ok(()) }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
