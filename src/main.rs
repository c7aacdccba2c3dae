use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::env;
use tracing::warn;
use twitter_api_client::config::ClientConfig;
use twitter_api_client::twitter_client::api::HomeTimelineQuery;
use twitter_api_client::{OAuthOptions, TwitterClient};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the PIN-based OAuth handshake and print the resulting access token
    Login,
    /// Show the home timeline
    Timeline {
        #[arg(short, long)]
        count: Option<u32>,
        #[arg(long)]
        max_id: Option<String>,
        #[arg(long)]
        since_id: Option<String>,
    },
    /// Show the authenticated user
    Whoami,
    /// Show account settings
    Settings,
}

fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("twitter_api_client=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("twitter_api_client=info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// User credentials saved from a previous `login`.
fn user_oauth(config: &ClientConfig) -> Result<OAuthOptions> {
    let token = env::var("TWITTER_ACCESS_TOKEN")
        .with_context(|| anyhow!("Missing `TWITTER_ACCESS_TOKEN`; run `login` first"))?;
    let token_secret = env::var("TWITTER_ACCESS_TOKEN_SECRET")
        .with_context(|| anyhow!("Missing `TWITTER_ACCESS_TOKEN_SECRET`; run `login` first"))?;
    Ok(config.oauth_options().with_token(token, token_secret))
}

async fn login(client: &TwitterClient, config: &ClientConfig) -> Result<()> {
    let request_token = client.get_request_token(&config.oauth_options()).await?;
    if !request_token.callback_confirmed() {
        warn!("callback was not confirmed");
    }

    // User browses here to approve the app and receive a PIN
    println!("Browse to: {}", client.authenticate_url(&request_token));

    let mut verifier = String::new();
    println!("Enter PIN:");
    std::io::stdin().read_line(&mut verifier)?;

    let oauth = config
        .oauth_options()
        .for_access_token(&request_token, verifier.trim());
    let access_token = client.get_access_token(&oauth).await?;

    println!("Authorized as @{}", access_token.screen_name);
    println!("TWITTER_ACCESS_TOKEN={}", access_token.oauth_token);
    println!(
        "TWITTER_ACCESS_TOKEN_SECRET={}",
        access_token.oauth_token_secret
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    dotenv().ok();
    init_tracing(args.verbose);

    let config = ClientConfig::from_env()?;
    let client = TwitterClient::new(&config);

    match args.command {
        Command::Login => login(&client, &config).await?,
        Command::Timeline {
            count,
            max_id,
            since_id,
        } => {
            let query = HomeTimelineQuery {
                count,
                max_id,
                since_id,
                ..Default::default()
            };
            let tweets = client
                .fetch_home_timeline(&user_oauth(&config)?, &query)
                .await?;
            for tweet in tweets {
                let created_at = tweet
                    .created_at_utc()
                    .map(|created_at| created_at.format("%Y-%m-%d %H:%M").to_string())
                    .unwrap_or(tweet.created_at.clone());
                println!(
                    "{} {} @{}: {}",
                    tweet.id_str, created_at, tweet.user.screen_name, tweet.text
                );
            }
        }
        Command::Whoami => {
            let me = client
                .fetch_account_verify_credentials(&user_oauth(&config)?)
                .await?;
            println!("{me:?}");
        }
        Command::Settings => {
            let settings = client
                .fetch_account_settings(&user_oauth(&config)?)
                .await?;
            println!("{settings:?}");
        }
    }

    Ok(())
}
