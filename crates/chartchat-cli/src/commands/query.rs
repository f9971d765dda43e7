use std::sync::Arc;

use anyhow::{Context, Result};
use futures_util::TryStreamExt;
use time::Date;
use time::format_description::well_known::Iso8601;

use chartchat_core::Resource;
use chartchat_fhir::{FhirClient, FhirClientOptions, SearchParams, ServiceCategory};
use chartchat_tools::ToolRegistry;

use crate::cli::{AppointmentsArgs, CategoryArg, GetArgs, SearchArgs, TokenArgs};
use crate::output::print_json;

fn make_client(tokens: &TokenArgs) -> Result<FhirClient> {
    FhirClient::new(FhirClientOptions {
        access_token: tokens.access_token.clone(),
        id_token: tokens.id_token.clone(),
    })
    .context("Failed to construct FHIR client from tokens")
}

fn parse_reference(reference: &str) -> Result<(&str, &str)> {
    let parts: Vec<&str> = reference.splitn(2, '/').collect();
    if parts.len() != 2 {
        anyhow::bail!("Invalid reference \"{reference}\". Expected format: ResourceType/id");
    }
    Ok((parts[0], parts[1]))
}

pub async fn get(args: &GetArgs) -> Result<()> {
    let client = make_client(&args.tokens)?;
    let (resource_type, id) = parse_reference(&args.reference)?;
    let resource = client.read(resource_type, id).await?;
    print_json(resource.as_json());
    Ok(())
}

pub async fn search(args: &SearchArgs) -> Result<()> {
    let client = make_client(&args.tokens)?;

    let mut params = SearchParams::new();
    for pair in &args.params {
        let Some((key, value)) = pair.split_once('=') else {
            anyhow::bail!("Invalid parameter \"{pair}\". Expected format: key=value");
        };
        params.push(key, value);
    }

    let resources: Vec<Resource> = client
        .search_all(&args.resource_type, &params)
        .try_collect()
        .await?;
    print_json(&serde_json::Value::Array(
        resources.into_iter().map(Resource::into_json).collect(),
    ));
    Ok(())
}

pub async fn appointments(args: &AppointmentsArgs) -> Result<()> {
    let client = make_client(&args.tokens)?;
    let date = Date::parse(&args.date, &Iso8601::DATE)
        .with_context(|| format!("Invalid date \"{}\". Expected YYYY-MM-DD", args.date))?;
    let category = match args.category {
        CategoryArg::Appointment => ServiceCategory::Appointment,
        CategoryArg::Surgery => ServiceCategory::Surgery,
    };

    let appointments = client.get_appointments(date, category).await?;
    print_json(&serde_json::Value::Array(
        appointments.into_iter().map(Resource::into_json).collect(),
    ));
    Ok(())
}

pub fn tools(args: &TokenArgs) -> Result<()> {
    let client = make_client(args)?;
    let registry = ToolRegistry::for_client(Arc::new(client));
    print_json(&serde_json::to_value(registry.descriptors())?);
    Ok(())
}
