#![warn(clippy::pedantic)]

use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::Verbosity;

use crate::{
    api::Credentials,
    client::ApiClient,
    config::{Config, DEFAULT_CONFIG_PATH},
    error::Failure,
};

mod api;
mod auth;
mod client;
mod config;
mod error;
#[cfg(test)]
mod test_support;

#[derive(Parser)]
struct Args {
    /// The address of the authentication API. Takes precedence over the
    /// address stored in the configuration file
    #[arg(long, short)]
    server: Option<String>,

    /// The bearer token to authenticate with. Takes precedence over the
    /// token stored in the configuration file
    #[arg(long, short)]
    jwt: Option<String>,

    /// What to do
    #[arg(long, short, value_enum, ignore_case = true, default_value_t = Action::CheckConnection)]
    action: Action,

    /// The username (for registration / login)
    #[arg(long, short)]
    username: Option<String>,

    /// The password (for registration / login). By omitting it, it will
    /// be requested on execution.
    #[arg(long, short)]
    password: Option<String>,

    /// The configuration file holding the server address and the token
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(flatten)]
    verbose: Verbosity,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Action {
    Login,
    Register,
    #[value(name = "checkConnection")]
    CheckConnection,
    #[value(name = "authinfo")]
    AuthInfo,
}

impl Action {
    fn needs_credentials(self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }
}

/// A validated action, carrying whatever it needs to run.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    CheckConnection,
    Login(Credentials),
    Register(Credentials),
    AuthInfo,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.verbose.tracing_level_filter())
        .with_writer(std::io::stderr)
        .init();

    match try_main(args) {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(Failure::Rejected(message)) => {
            println!("{message}");
            ExitCode::from(1)
        }
        Err(Failure::Fatal(e)) => {
            eprintln!("Error: {e:?}");
            ExitCode::from(2)
        }
    }
}

fn try_main(args: Args) -> Result<String, Failure> {
    let stored = Config::load(&args.config)?;
    let config = Config {
        server_address: args.server.unwrap_or(stored.server_address),
        token: args.jwt.unwrap_or(stored.token),
    };
    tracing::debug!("Server address: {}", config.server_address);

    let password = match args.password {
        Some(password) => {
            tracing::warn!(
                "The password has been provided on the command line. Note that this is less secure than providing it when requested."
            );
            Some(password)
        }
        None if args.action.needs_credentials()
            && args.username.as_deref().is_some_and(|u| !u.is_empty()) =>
        {
            tracing::debug!("Prompting for password...");
            rpassword::prompt_password("Enter Password: ").ok()
        }
        None => None,
    };

    let command = validate(args.action, args.username, password, &config.token)?;
    run(config, command, &args.config)
}

fn credentials(username: Option<String>, password: Option<String>) -> Result<Credentials, Failure> {
    match (
        username.filter(|u| !u.is_empty()),
        password.filter(|p| !p.is_empty()),
    ) {
        (Some(username), Some(password)) => Ok(Credentials { username, password }),
        _ => Err(Failure::rejected("Please set a username and a password")),
    }
}

/// Check that the arguments make sense for `action`.
fn validate(
    action: Action,
    username: Option<String>,
    password: Option<String>,
    token: &str,
) -> Result<Command, Failure> {
    match action {
        Action::Login => Ok(Command::Login(credentials(username, password)?)),
        Action::Register => Ok(Command::Register(credentials(username, password)?)),
        Action::CheckConnection | Action::AuthInfo if token.is_empty() => Err(Failure::rejected(
            "Please set a jwt using the config.json or the command line argument -j",
        )),
        Action::CheckConnection => Ok(Command::CheckConnection),
        Action::AuthInfo => Ok(Command::AuthInfo),
    }
}

/// Perform `command` after checking the server is reachable, persisting the
/// configuration if the command changed it. Returns the text to report.
fn run(config: Config, command: Command, config_path: &Path) -> Result<String, Failure> {
    let client = ApiClient::new(config.server_address.clone())?;
    client.check_reachable()?;

    let (report, updated) = execute(&client, config, command)?;
    if let Some(updated) = updated {
        updated.save(config_path)?;
        return Ok(format!(
            "{report}\n(login saved to {})",
            config_path.display()
        ));
    }
    Ok(report)
}

fn execute(
    client: &ApiClient,
    mut config: Config,
    command: Command,
) -> Result<(String, Option<Config>), Failure> {
    match command {
        Command::CheckConnection => Ok(("Connection successful".to_string(), None)),
        Command::Login(credentials) => {
            let login = auth::login(client, &credentials)?;
            tracing::debug!("Token acquired: {}", login.jwt);
            let report = format!(
                "Logged in as {} ({})\nJWT: {}\nSessionToken: {}\nThe login expires on {}",
                login.username, login.user_id, login.jwt, login.session_token, login.valid_until
            );
            config.token = login.jwt;
            Ok((report, Some(config)))
        }
        Command::Register(credentials) => {
            let username = auth::register(client, &credentials)?;
            Ok((format!("Created user with name {username}"), None))
        }
        Command::AuthInfo => {
            let info = auth::auth_info(client, &config.token)?;
            Ok((
                format!("Logged in as {} ({})", info.username, info.id),
                None,
            ))
        }
    }
}
