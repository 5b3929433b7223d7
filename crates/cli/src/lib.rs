pub mod args;
mod http;
mod query;

use anyhow::Context;
use args::Cli;
use flowgraph_sdk::{
    Chain,
    entity::{
        Account, AccountTokenSnapshot, EntityKind, Index, IndexSubscription, IndexUpdatedEvent,
        Stream, StreamPeriod, SubscriptionUnitsUpdatedEvent, Token, TokenStatistic,
    },
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use crate::{args::Commands, http::HttpSubgraphClient};

/// Calls the generic command function with the entity type of the kind.
macro_rules! for_kind {
    ($kind:expr, $f:ident($($arg:expr),* $(,)?)) => {
        match $kind {
            EntityKind::Account => query::$f::<Account>($($arg),*).await,
            EntityKind::Token => query::$f::<Token>($($arg),*).await,
            EntityKind::TokenStatistic => query::$f::<TokenStatistic>($($arg),*).await,
            EntityKind::AccountTokenSnapshot => query::$f::<AccountTokenSnapshot>($($arg),*).await,
            EntityKind::Stream => query::$f::<Stream>($($arg),*).await,
            EntityKind::StreamPeriod => query::$f::<StreamPeriod>($($arg),*).await,
            EntityKind::Index => query::$f::<Index>($($arg),*).await,
            EntityKind::IndexSubscription => query::$f::<IndexSubscription>($($arg),*).await,
            EntityKind::IndexUpdatedEvent => query::$f::<IndexUpdatedEvent>($($arg),*).await,
            EntityKind::SubscriptionUnitsUpdatedEvent => {
                query::$f::<SubscriptionUnitsUpdatedEvent>($($arg),*).await
            },
        }
    };
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing(cli.verbose);

    let chain = match &cli.endpoint {
        Some(endpoint) => Chain::custom(cli.chain_id, endpoint),
        None => Chain::by_id(cli.chain_id)
            .with_context(|| format!("unknown chain ID {}, see `--endpoint`", cli.chain_id))?,
    };
    tracing::debug!(chain = chain.name(), endpoint = chain.subgraph_endpoint(), "using indexing service");
    let client = HttpSubgraphClient::new(chain.subgraph_endpoint()).context("building HTTP client")?;

    let cancellation_signal = CancellationToken::new();
    let cancellation_token = cancellation_signal.child_token();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancellation_signal.cancel();
        }
    });

    match &cli.command {
        Commands::Get { kind, id } => for_kind!(kind, get(&client, &chain, id, cli.block)),
        Commands::List { kind, list } => {
            for_kind!(kind, list(&client, &chain, list, cli.block, cancellation_token.clone()))
        },
        Commands::Tags { kind, filter } => for_kind!(kind, tags(&chain, filter.as_deref())),
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "flowgraph_sdk=debug,flowgraph_cli=debug" } else { "warn" })
    });
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}
