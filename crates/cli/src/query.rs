use std::{pin::pin, str::FromStr};

use anyhow::Context;
use colored::Colorize;
use flowgraph_sdk::{
    Chain,
    cache::{CacheTag, Endpoint},
    query::{Entity, GetQuery, ListQuery, Order, Paging},
};
use futures::StreamExt;
use serde::{Serialize, de::DeserializeOwned};
use tabled::{Table, settings::Style};
use tokio_util::sync::CancellationToken;

use crate::{args::ListArgs, http::HttpSubgraphClient};

pub(crate) async fn get<E: Entity + Serialize>(
    client: &HttpSubgraphClient,
    chain: &Chain,
    id: &str,
    block: Option<u64>,
) -> anyhow::Result<()> {
    let endpoint = Endpoint::<E>::new();
    let mut query = GetQuery::new(id);
    query.block = block;

    let result = endpoint
        .get(client, chain.chain_id(), &query)
        .await
        .with_context(|| format!("getting {} {id}", E::KIND))?;
    match &result.data {
        Some(entity) => println!("{}", serde_json::to_string_pretty(entity)?),
        None => println!("{}", format!("{} {id} not found", E::KIND.name()).yellow()),
    }
    render_tags(&result.tags);
    Ok(())
}

pub(crate) async fn list<E>(
    client: &HttpSubgraphClient,
    chain: &Chain,
    args: &ListArgs,
    block: Option<u64>,
    cancellation_token: CancellationToken,
) -> anyhow::Result<()>
where
    E: Entity + Serialize,
    E::Filter: DeserializeOwned,
    E::OrderBy: FromStr,
{
    let endpoint = Endpoint::<E>::new();
    let query = list_query::<E>(args, block)?;
    let tags = endpoint.list_tags(chain.chain_id(), query.filter.as_ref());

    if !args.all {
        let result = endpoint
            .list(client, chain.chain_id(), &query)
            .await
            .with_context(|| format!("listing {}", E::KIND.collection()))?;
        println!("{}", serde_json::to_string_pretty(result.data.items())?);
        if let Some(next) = result.data.next_paging() {
            println!("{}", format!("More results available, next page: {next:?}").bright_black());
        }
        render_tags(&result.tags);
        return Ok(());
    }

    let handler = endpoint.handler();
    let mut pages = pin!(handler.list_all(client, query));
    let mut total = 0;
    loop {
        let page = tokio::select! {
            _ = cancellation_token.cancelled() => break,
            page = pages.next() => page,
        };
        let Some(page) = page else {
            break;
        };
        let page = page.with_context(|| format!("listing {}", E::KIND.collection()))?;
        for item in page.items() {
            println!("{}", serde_json::to_string(item)?);
        }
        total += page.items().len();
    }
    println!("{}", format!("{total} {} listed", E::KIND.collection()).bold());
    render_tags(&tags);
    Ok(())
}

pub(crate) async fn tags<E>(chain: &Chain, filter: Option<&str>) -> anyhow::Result<()>
where
    E: Entity,
    E::Filter: DeserializeOwned,
{
    let filter = filter.map(parse_filter::<E>).transpose()?;
    render_tags(&Endpoint::<E>::new().list_tags(chain.chain_id(), filter.as_ref()));
    Ok(())
}

fn list_query<E>(args: &ListArgs, block: Option<u64>) -> anyhow::Result<ListQuery<E::Filter, E::OrderBy>>
where
    E: Entity,
    E::Filter: DeserializeOwned,
    E::OrderBy: FromStr,
{
    let paging = match &args.last_id {
        Some(last_id) => Paging::last_id(Some(last_id.clone()), args.take),
        None if args.all && args.order_by.is_none() && !args.desc && args.skip == 0 => {
            // Cursor paging is not limited by the maximum skip
            Paging::last_id(None, args.take)
        },
        None => Paging::skip(args.skip, args.take),
    };
    let mut query = ListQuery::new(paging);
    query.block = block;
    if let Some(filter) = &args.filter {
        query.filter = Some(parse_filter::<E>(filter)?);
    }
    if let Some(order_by) = &args.order_by {
        let order_by = E::OrderBy::from_str(order_by)
            .map_err(|_| anyhow::anyhow!("unknown {} order field: {order_by}", E::KIND.name()))?;
        query.order = Some(if args.desc { Order::desc(order_by) } else { Order::asc(order_by) });
    } else if args.desc {
        query.order = Some(Order::desc(E::OrderBy::default()));
    }
    Ok(query)
}

fn parse_filter<E>(filter: &str) -> anyhow::Result<E::Filter>
where
    E: Entity,
    E::Filter: DeserializeOwned,
{
    serde_json::from_str(filter).with_context(|| format!("parsing {} filter", E::KIND.name()))
}

fn render_tags(tags: &[CacheTag]) {
    let mut table = Table::new(tags);
    table.with(Style::sharp());
    println!("\n{}\n{table}", "Cache tags:".bold().purple());
}
