use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "chartchat")]
#[command(about = "chartchat CLI — Epic identity exchange and patient FHIR queries")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the authorization URL to open in a browser
    LoginUrl(LoginUrlArgs),
    /// Exchange an authorization code for tokens
    Exchange(ExchangeArgs),
    /// Resolve and print the identity behind a token pair
    Whoami(TokenArgs),
    /// Read a resource by reference (e.g. AdverseEvent/123)
    Get(GetArgs),
    /// Search a resource type, following pagination to the end
    Search(SearchArgs),
    /// Search the patient's appointments for a date
    Appointments(AppointmentsArgs),
    /// List the tools exposed to the orchestration loop
    Tools(TokenArgs),
    /// Pull Epic API documentation records by id
    PullDocs(PullDocsArgs),
}

#[derive(clap::Args)]
pub struct ProviderArgs {
    /// OAuth client id
    #[arg(long, env = "EPIC_CLIENT_ID")]
    pub client_id: String,
    /// OAuth client secret (omit for public clients)
    #[arg(long, env = "EPIC_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,
    /// Provider base URL (defaults to the Epic sandbox)
    #[arg(long)]
    pub base_url: Option<String>,
}

#[derive(clap::Args)]
pub struct LoginUrlArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,
    /// Redirect URI registered with the provider
    #[arg(long)]
    pub redirect_uri: String,
    /// Opaque state carried through the redirect
    #[arg(long, default_value = "chartchat-cli")]
    pub state: String,
}

#[derive(clap::Args)]
pub struct ExchangeArgs {
    #[command(flatten)]
    pub provider: ProviderArgs,
    /// Authorization code from the callback
    #[arg(long)]
    pub code: String,
    /// Redirect URI used on the authorize request
    #[arg(long)]
    pub redirect_uri: String,
}

#[derive(clap::Args)]
pub struct TokenArgs {
    /// Bearer access token
    #[arg(long, env = "EPIC_ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: String,
    /// OIDC id token
    #[arg(long, env = "EPIC_ID_TOKEN", hide_env_values = true)]
    pub id_token: String,
}

#[derive(clap::Args)]
pub struct GetArgs {
    #[command(flatten)]
    pub tokens: TokenArgs,
    /// Resource reference (e.g. AdverseEvent/123)
    pub reference: String,
}

#[derive(clap::Args)]
pub struct SearchArgs {
    #[command(flatten)]
    pub tokens: TokenArgs,
    /// Resource type (e.g. Encounter)
    pub resource_type: String,
    /// Search parameters as key=value pairs
    pub params: Vec<String>,
}

#[derive(Clone, Copy, ValueEnum, Default)]
pub enum CategoryArg {
    #[default]
    Appointment,
    Surgery,
}

#[derive(clap::Args)]
pub struct AppointmentsArgs {
    #[command(flatten)]
    pub tokens: TokenArgs,
    /// Appointment date (YYYY-MM-DD)
    #[arg(long)]
    pub date: String,
    /// Service category
    #[arg(long, value_enum, default_value = "appointment")]
    pub category: CategoryArg,
}

#[derive(clap::Args)]
pub struct PullDocsArgs {
    /// File with one numeric documentation id per line
    #[arg(long)]
    pub ids_file: String,
    /// Output file
    #[arg(long, default_value = "epic_apis.json")]
    pub out: String,
    /// Session cookie for the documentation site
    #[arg(long, env = "EPIC_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,
    /// Documentation endpoint base
    #[arg(
        long,
        default_value = "https://fhir.epic.com/Specifications/Api?id=",
        hide = true
    )]
    pub base: String,
}
