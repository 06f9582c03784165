use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "proxy-admin-cli")]
#[command(about = "Command line client for the proxy admin API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000", env = "PROXY_ADMIN_URL")]
    url: String,

    /// Bearer token, when the server requires one.
    #[arg(short, long, env = "PROXY_ADMIN_KEY")]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List config files
    List,
    /// Print one config file
    Show { name: String },
    /// Replace one config file with the content of FILE (stdin when omitted)
    Put {
        name: String,
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
    /// Ask the proxy to reload its configuration
    Reload,
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    let res = match cli.command {
        Commands::List => {
            client
                .get(format!("{}/api/admin/sites", base))
                .headers(headers)
                .send()
                .await?
        }
        Commands::Show { name } => {
            let res = client
                .get(format!("{}/api/admin/sites/{}", base, name))
                .headers(headers)
                .send()
                .await?;
            if res.status().is_success() {
                let file: Value = res.json().await?;
                print!("{}", file["content"].as_str().unwrap_or_default());
                return Ok(ExitCode::SUCCESS);
            }
            res
        }
        Commands::Put { name, file } => {
            let content = match file {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            client
                .put(format!("{}/api/admin/sites/{}", base, name))
                .headers(headers)
                .json(&json!({ "content": content }))
                .send()
                .await?
        }
        Commands::Reload => {
            client
                .post(format!("{}/api/admin/reload", base))
                .headers(headers)
                .send()
                .await?
        }
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(ExitCode::FAILURE);
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(ExitCode::SUCCESS)
}
