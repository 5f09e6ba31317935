use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use bankdesk::config::{ClientConfig, ConfigError, normalize_api_url};
use bankdesk::forms::login::submit_login;
use bankdesk::forms::register::{RegisterForm, submit_registration};
use bankdesk::guard::require;
use bankdesk::net::api::DEFAULT_ALERT_LIMIT;
use bankdesk::{
    ApiClient, ApiError, AuthError, AuthSession, FileTokenStore, GuardDecision, Role, Route, SessionStatus, TokenStore,
};
use clap::{Args, Parser, Subcommand};
use dialoguer::Password;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("not signed in; run `bankdesk login` first")]
    NotSignedIn,
    #[error("unknown role `{0}` (expected customer or admin)")]
    InvalidRole(String),
    #[error("output encode failed: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("failed to read input: {0}")]
    Prompt(#[from] dialoguer::Error),
}

#[derive(Parser, Debug)]
#[command(name = "bankdesk", about = "Banking dashboard API client")]
struct Cli {
    /// API base URL; overrides `BANKDESK_API_URL`.
    #[arg(long)]
    api_url: Option<String>,

    /// Session file holding the bearer token; overrides `BANKDESK_SESSION_FILE`.
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session token.
    Login {
        username: String,
        #[arg(long, env = "BANKDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored session token.
    Logout,
    /// Show the signed-in account.
    Whoami,
    /// Create an account. Does not sign in.
    Register(RegisterArgs),
    /// Show the route-guard decision for a dashboard path.
    Open { path: String },
    Chat(ChatCommand),
    Fraud(FraudCommand),
    Users(UsersCommand),
}

#[derive(Args, Debug)]
struct RegisterArgs {
    username: String,
    email: String,
    #[arg(long, default_value = "customer")]
    role: String,
    #[arg(long)]
    full_name: Option<String>,
    #[arg(long, env = "BANKDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
    #[arg(long)]
    confirm_password: Option<String>,
}

#[derive(Args, Debug)]
struct ChatCommand {
    #[command(subcommand)]
    command: ChatSubcommand,
}

#[derive(Subcommand, Debug)]
enum ChatSubcommand {
    Send { message: String },
    Greeting,
}

#[derive(Args, Debug)]
struct FraudCommand {
    #[command(subcommand)]
    command: FraudSubcommand,
}

#[derive(Subcommand, Debug)]
enum FraudSubcommand {
    Alerts {
        #[arg(long, default_value_t = DEFAULT_ALERT_LIMIT)]
        limit: u32,
    },
    Insights,
}

#[derive(Args, Debug)]
struct UsersCommand {
    #[command(subcommand)]
    command: UsersSubcommand,
}

#[derive(Subcommand, Debug)]
enum UsersSubcommand {
    List,
    Get { user_id: String },
}

type Session = AuthSession<ApiClient>;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    init_tracing();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig, CliError> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config.api_url = normalize_api_url(Some(url))?;
    }
    if let Some(path) = &cli.session_file {
        config.session_file.clone_from(path);
    }
    Ok(config)
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = resolve_config(&cli)?;
    tracing::debug!(api_url = %config.api_url, session_file = %config.session_file.display(), "starting");

    let tokens: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(&config.session_file));
    let api = ApiClient::from_config(&config, tokens.clone())?;
    let auth = AuthSession::new(api, tokens);
    auth.initialize().await;

    match cli.command {
        Command::Login { username, password } => run_login(&auth, &username, password).await,
        Command::Logout => {
            auth.logout();
            println!("signed out");
            Ok(())
        }
        Command::Whoami => run_whoami(&auth),
        Command::Register(args) => run_register(&auth, args).await,
        Command::Open { path } => {
            println!("{}", describe_decision(auth.guard(Route::from_path(&path))));
            Ok(())
        }
        Command::Chat(chat) => run_chat(&auth, chat).await,
        Command::Fraud(fraud) => run_fraud(&auth, fraud).await,
        Command::Users(users) => run_users(&auth, users).await,
    }
}

async fn run_login(auth: &Session, username: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };
    let landing = submit_login(auth, username, &password).await?;
    if let Some(user) = auth.session().user() {
        println!("signed in as {} ({})", user.display_name(), user.role);
    }
    println!("landing: {landing}");
    Ok(())
}

fn run_whoami(auth: &Session) -> Result<(), CliError> {
    let session = auth.session();
    match (session.status(), session.user()) {
        (SessionStatus::Authenticated, Some(user)) => {
            println!("{} <{}> ({})", user.display_name(), user.email, user.role);
            Ok(())
        }
        _ => Err(CliError::NotSignedIn),
    }
}

async fn run_register(auth: &Session, args: RegisterArgs) -> Result<(), CliError> {
    let role = Role::parse(&args.role).ok_or_else(|| CliError::InvalidRole(args.role.clone()))?;
    let password = match args.password {
        Some(password) => password,
        None => Password::new().with_prompt("Password").interact()?,
    };
    // Mismatches are reported by the form check, not re-prompted.
    let confirm_password = match args.confirm_password {
        Some(confirm) => confirm,
        None => Password::new().with_prompt("Confirm password").interact()?,
    };
    let form = RegisterForm {
        username: args.username,
        email: args.email,
        password,
        confirm_password,
        role,
        full_name: args.full_name.unwrap_or_default(),
    };
    let next = submit_registration(auth, &form).await?;
    println!("account created; sign in next ({next})");
    Ok(())
}

async fn run_chat(auth: &Session, chat: ChatCommand) -> Result<(), CliError> {
    require(Route::Dashboard, &auth.session())?;
    let reply = match chat.command {
        ChatSubcommand::Send { message } => auth.api().send_chat_message(&message).await?,
        ChatSubcommand::Greeting => auth.api().chat_greeting().await?,
    };
    println!("{}", reply.response);
    for suggestion in reply.suggestions.iter().flatten() {
        println!("  - {suggestion}");
    }
    Ok(())
}

async fn run_fraud(auth: &Session, fraud: FraudCommand) -> Result<(), CliError> {
    require(Route::AdminFraud, &auth.session())?;
    match fraud.command {
        FraudSubcommand::Alerts { limit } => print_json(&auth.api().sample_fraud_alerts(limit).await?),
        FraudSubcommand::Insights => print_json(&auth.api().fraud_insights().await?),
    }
}

async fn run_users(auth: &Session, users: UsersCommand) -> Result<(), CliError> {
    require(Route::Admin, &auth.session())?;
    match users.command {
        UsersSubcommand::List => print_json(&auth.api().list_users().await?),
        UsersSubcommand::Get { user_id } => print_json(&auth.api().get_user(&user_id).await?),
    }
}

fn describe_decision(decision: GuardDecision) -> String {
    match decision {
        GuardDecision::Loading => "loading".to_owned(),
        GuardDecision::Render(route) => format!("render {route}"),
        GuardDecision::Redirect(route) => format!("redirect {route}"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
