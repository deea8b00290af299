//! Create API token command

use std::io::IsTerminal;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgGroup, Args, ValueEnum};
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;
use serde::Serialize;

use crate::domain::api_token::IssueTokenRequest;
use crate::domain::user::UserLookup;
use crate::infrastructure::api_token::IssuedApiToken;

const MISSING_USER_MESSAGE: &str =
    "Either a --id=<number> or --email=<email> option must be provided.";
const SECRET_WARNING: &str = "The secret will not be shown again.";

/// Arguments for the create-api-token command
#[derive(Args, Debug, Clone)]
#[command(group(ArgGroup::new("user").required(true).args(["id", "email"])))]
pub struct CreateApiTokenArgs {
    /// ID of the user that will own the token
    #[arg(long)]
    pub id: Option<i64>,

    /// Email of the user that will own the token
    #[arg(long)]
    pub email: Option<String>,

    /// Name of the token, prompted for when omitted
    #[arg(long)]
    pub name: Option<String>,

    /// Expiry date in YYYY-MM-DD format
    #[arg(long)]
    pub expires: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl CreateApiTokenArgs {
    /// The owner selector given on the command line
    pub fn lookup(&self) -> anyhow::Result<UserLookup> {
        match (self.id, &self.email) {
            (Some(id), None) => Ok(UserLookup::Id(id)),
            (None, Some(email)) => Ok(UserLookup::Email(email.clone())),
            _ => anyhow::bail!(MISSING_USER_MESSAGE),
        }
    }
}

/// Issue a token and print its credentials
pub async fn run(args: CreateApiTokenArgs) -> anyhow::Result<ExitCode> {
    let config = super::bootstrap()?;

    let owner = match args.lookup() {
        Ok(owner) => owner,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let issuer = crate::create_issuer_with_config(&config).await?;

    let name = match non_blank(args.name) {
        Some(name) => Some(name),
        None => prompt_for_name()?,
    };

    let request = IssueTokenRequest::new(owner, name, args.expires);

    match issuer.issue(request).await {
        Ok(issued) => {
            match args.output {
                OutputFormat::Text => println!("{}", render_text(&issued)),
                OutputFormat::Json => println!("{}", render_json(&issued)?),
            }
            eprintln!("{}", SECRET_WARNING);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            for message in e.messages() {
                eprintln!("{}", message);
            }
            Ok(ExitCode::FAILURE)
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Ask for a token name on an interactive terminal
///
/// Returns `None` when stdin is not a terminal so that validation reports
/// the missing name.
fn prompt_for_name() -> anyhow::Result<Option<String>> {
    if !std::io::stdin().is_terminal() {
        return Ok(None);
    }

    let name: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("Please specify a name for the API token")
        .allow_empty(true)
        .interact_text()?;

    Ok(non_blank(Some(name)))
}

fn render_text(issued: &IssuedApiToken) -> String {
    format!(
        "API token created for user {}\nToken ID: {}\nSecret: {}",
        issued.user.email(),
        issued.token_id(),
        issued.secret
    )
}

#[derive(Serialize)]
struct IssuedTokenOutput<'a> {
    user_id: i64,
    user_email: &'a str,
    name: &'a str,
    token_id: &'a str,
    secret: &'a str,
    expires_at: NaiveDate,
}

fn render_json(issued: &IssuedApiToken) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&IssuedTokenOutput {
        user_id: issued.user.id().value(),
        user_email: issued.user.email(),
        name: issued.token.name(),
        token_id: issued.token_id().as_str(),
        secret: &issued.secret,
        expires_at: issued.expires_at(),
    })
}
