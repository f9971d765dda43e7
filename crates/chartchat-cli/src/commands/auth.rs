use anyhow::{Context, Result};
use colored::Colorize;

use chartchat_auth::{EpicProvider, EpicProviderConfig, TokenSet};

use crate::cli::{ExchangeArgs, LoginUrlArgs, ProviderArgs, TokenArgs};
use crate::output::print_json;

fn provider_from(args: &ProviderArgs) -> EpicProvider {
    let mut config = EpicProviderConfig::new(&args.client_id);
    if let Some(secret) = &args.client_secret {
        config = config.with_client_secret(secret);
    }
    if let Some(base_url) = &args.base_url {
        config = config.with_base_url(base_url);
    }
    EpicProvider::new(config)
}

pub fn login_url(args: &LoginUrlArgs) -> Result<()> {
    let provider = provider_from(&args.provider);
    let url = provider
        .authorization_url(&args.redirect_uri, &args.state)
        .context("Failed to build authorization URL")?;

    println!("{}", "Open this URL in a browser to sign in:".cyan());
    println!("{url}");
    Ok(())
}

pub async fn exchange(args: &ExchangeArgs) -> Result<()> {
    let provider = provider_from(&args.provider);
    let tokens = provider
        .exchange_code(&args.code, &args.redirect_uri)
        .await
        .context("Code exchange failed")?;

    print_json(&serde_json::json!({
        "access_token": tokens.access_token,
        "id_token": tokens.id_token,
        "token_type": tokens.token_type,
        "expires_in": tokens.expires_in,
        "scope": tokens.scope,
    }));
    Ok(())
}

pub async fn whoami(args: &TokenArgs) -> Result<()> {
    // The client id plays no role in profile resolution.
    let provider = EpicProvider::new(EpicProviderConfig::new(
        std::env::var("EPIC_CLIENT_ID").unwrap_or_default(),
    ));
    let tokens = TokenSet {
        access_token: args.access_token.clone(),
        id_token: Some(args.id_token.clone()),
        token_type: None,
        expires_in: None,
        scope: None,
    };

    let identity = provider
        .resolve_identity(&tokens)
        .await
        .context("Identity resolution failed")?;
    print_json(&serde_json::to_value(&identity)?);
    Ok(())
}
