use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;
use time::Duration;

const DEFAULT_AUTH_COOKIE_NAME: &str = "cascos_auth";

#[allow(clippy::large_enum_variant)]
pub(crate) enum RunOutcome {
    Serve {
        addr: SocketAddr,
        config: cascos::config::AppConfig,
    },
    Exit(i32),
}

pub(crate) fn run() -> RunOutcome {
    let cli = Cli::parse();
    if let Some(Command::AuthKey) = cli.command {
        let code = run_auth_key();
        return RunOutcome::Exit(code);
    }

    let auth = match resolve_auth_config(&cli) {
        Ok(auth) => auth,
        Err(err) => {
            eprintln!("error: {err}");
            return RunOutcome::Exit(2);
        }
    };

    RunOutcome::Serve {
        addr: cli.addr,
        config: cascos::config::AppConfig {
            data_file: cli.data_file,
            app_name: cli.app_name,
            auth,
            require_login: cli.require_login,
        },
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "cascos",
    version,
    about = "Helmet inventory and loan tracking server"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[arg(long, env = "CASCOS_DATA_FILE", default_value = "data/inventario.json")]
    data_file: PathBuf,
    #[arg(long, env = "CASCOS_ADDR", default_value = "127.0.0.1:3000")]
    addr: SocketAddr,
    #[arg(long, default_value = "Cascos")]
    app_name: String,
    #[arg(long, env = "CASCOS_AUTH_KEY")]
    auth_key: Option<String>,
    #[arg(long, env = "CASCOS_AUTH_TOKEN_TTL")]
    auth_token_ttl: Option<String>,
    #[arg(long, env = "CASCOS_AUTH_COOKIE_NAME")]
    auth_cookie_name: Option<String>,
    #[arg(long, env = "CASCOS_AUTH_COOKIE_SECURE")]
    auth_cookie_secure: bool,
    #[arg(long, env = "CASCOS_REQUIRE_LOGIN")]
    require_login: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print a fresh session signing key.
    AuthKey,
}

fn run_auth_key() -> i32 {
    let secret = match cascos::auth::generate_auth_key() {
        Ok(secret) => secret,
        Err(err) => {
            eprintln!("failed to generate auth key: {err}");
            return 1;
        }
    };
    println!("{secret}");
    0
}

fn resolve_auth_config(cli: &Cli) -> Result<cascos::config::AuthConfig, String> {
    let key = match cli.auth_key.as_deref() {
        Some(key) if key.trim().is_empty() => {
            return Err("auth key cannot be empty".to_string());
        }
        Some(key) => key.trim().to_string(),
        None => {
            tracing::warn!("no auth key configured; sessions will not survive a restart");
            cascos::auth::generate_auth_key()
                .map_err(|err| format!("failed to generate auth key: {err}"))?
        }
    };

    if let Some(name) = cli.auth_cookie_name.as_deref()
        && name.trim().is_empty()
    {
        return Err("auth cookie name cannot be empty".to_string());
    }

    let token_ttl = match cli.auth_token_ttl.as_deref() {
        Some(raw) => parse_auth_token_ttl(raw)?,
        None => default_auth_token_ttl(),
    };
    let cookie_name = cli
        .auth_cookie_name
        .as_deref()
        .map(|name| name.trim().to_string())
        .unwrap_or_else(|| DEFAULT_AUTH_COOKIE_NAME.to_string());

    Ok(cascos::config::AuthConfig {
        key,
        token_ttl,
        cookie_name,
        cookie_secure: cli.auth_cookie_secure,
    })
}

fn default_auth_token_ttl() -> Duration {
    Duration::days(14)
}

const MAX_AUTH_TOKEN_TTL_SECONDS: i64 = 3650 * 86_400;

fn parse_auth_token_ttl(raw: &str) -> Result<Duration, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("auth token ttl cannot be empty".to_string());
    }

    let (amount, unit) = match value.chars().last() {
        Some(ch) if ch.is_ascii_alphabetic() => {
            (&value[..value.len() - 1], ch.to_ascii_lowercase())
        }
        _ => (value, 's'),
    };

    let amount: i64 = amount
        .parse()
        .map_err(|_| format!("invalid auth token ttl '{value}'; expected <number>[s|m|h|d]"))?;

    if amount <= 0 {
        return Err("auth token ttl must be greater than 0".to_string());
    }

    let unit_seconds: i64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3_600,
        'd' => 86_400,
        _ => {
            return Err(format!(
                "invalid auth token ttl '{value}'; expected <number>[s|m|h|d]"
            ));
        }
    };

    match amount.checked_mul(unit_seconds) {
        Some(seconds) if seconds <= MAX_AUTH_TOKEN_TTL_SECONDS => {
            Ok(Duration::seconds(seconds))
        }
        _ => Err(format!("auth token ttl '{value}' exceeds 3650 days")),
    }
}
