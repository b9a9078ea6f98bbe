use anyhow::{Context, Result};
use rwapi::{Client, ClientConfig, Filter, Query, ResultEnvelope};
use tracing::info;

use crate::argparse::{Cli, Commands, ItemArgs, SearchArgs};
use crate::filter_expr::{parse_facet, parse_filter, parse_sort};

pub async fn handle_command(cli: Cli) -> Result<()> {
    let config = client_config(&cli)?;
    match cli.command {
        Commands::Search(args) => search(&config, args).await,
        Commands::Item(args) => item(&config, args).await,
    }
}

/// Config file values, overridden by the command line flags.
pub fn client_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = match &cli.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(appname) = &cli.appname {
        config.appname = Some(appname.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }
    Ok(config)
}

pub fn build_search_query(args: &SearchArgs) -> Result<Query> {
    let mut query = Query::new();
    query.set_fields(args.fields_include.clone(), args.fields_exclude.clone());

    if let Some(limit) = args.limit {
        query.set_limit(limit);
    }
    if let Some(offset) = args.offset {
        query.set_offset(offset);
    }
    for spec in &args.sorts {
        let (field, direction) = parse_sort(spec)?;
        query.add_sort(&field, direction);
    }
    if let Some(preset) = &args.preset {
        query.set_preset(preset.as_str());
    }
    if let Some(profile) = &args.profile {
        query.set_profile(profile.as_str());
    }
    if let Some(text) = &args.query {
        query.set_query(text.as_str(), args.query_fields.clone(), args.query_operator);
    }

    if !args.filters.is_empty() {
        let mut filter = Filter::all().with_operator(args.filter_operator);
        for expr in &args.filters {
            filter.add_filter(parse_filter(expr)?);
        }
        query.set_filter(filter);
    }

    for spec in &args.facets {
        query.add_facet(parse_facet(spec, args.facet_limit)?);
    }

    Ok(query)
}

async fn search(config: &ClientConfig, args: SearchArgs) -> Result<()> {
    let query = build_search_query(&args)?;
    let client = Client::from_config(config)?;

    if args.dry_run {
        println!("POST {}", client.url(&args.resource, None));
        println!("{}", serde_json::to_string_pretty(&query.to_json_value()?)?);
        return Ok(());
    }

    let body = client
        .query_raw(&args.resource, &query)
        .await
        .with_context(|| format!("Failed to search {}", args.resource))?;
    print_body(&body, args.raw)
}

async fn item(config: &ClientConfig, args: ItemArgs) -> Result<()> {
    let mut query = Query::new();
    query.set_fields(args.fields_include.clone(), Vec::new());

    let client = Client::from_config(config)?;
    let body = client
        .query_item_raw(&args.resource, &args.id, &query)
        .await
        .with_context(|| format!("Failed to fetch {} {}", args.resource, args.id))?;
    print_body(&body, args.raw)
}

fn print_body(body: &[u8], raw: bool) -> Result<()> {
    if raw {
        println!("{}", String::from_utf8_lossy(body));
        return Ok(());
    }
    let envelope = ResultEnvelope::from_slice(body)?;
    print!("{}", render_envelope(&envelope)?);
    Ok(())
}

/// Human readable listing of the items and facets of a response.
pub fn render_envelope(envelope: &ResultEnvelope) -> Result<String> {
    let mut out = format!("{} of {} results\n", envelope.count, envelope.total_count);

    let fields: Vec<serde_json::Value> = envelope.materialize()?;
    for (item, fields) in envelope.items.iter().zip(fields) {
        out.push_str(&format!("\n[{}] score {} {}\n", item.id, item.score, item.href));
        out.push_str(&serde_json::to_string_pretty(&fields)?);
        out.push('\n');
    }

    let mut facets: Vec<_> = envelope.facets().collect();
    facets.sort_by_key(|(name, _)| *name);
    for (name, facet) in facets {
        out.push_str(&format!(
            "\nfacet {} ({:?}, missing {}{})\n",
            name,
            facet.kind,
            facet.missing,
            if facet.more { ", more" } else { "" }
        ));
        for bucket in &facet.data {
            out.push_str(&format!("  {:>8}  {}\n", bucket.count, bucket.value));
        }
    }

    info!(
        "{} items, {} facets",
        envelope.items.len(),
        envelope.facets().count()
    );
    Ok(out)
}
