use clap::{Args, Parser, Subcommand};
use flowgraph_sdk::entity::EntityKind;

pub(crate) const DEFAULT_CHAIN_ID: u64 = 5;

#[derive(Parser, Debug)]
#[command(name = "flowgraph-cli", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Chain to query, one of the known presets unless `--endpoint` is given
    #[arg(long, global = true, default_value_t = DEFAULT_CHAIN_ID)]
    pub chain_id: u64,

    /// Indexing service GraphQL endpoint [default: hosted service of the
    /// chain]
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Block number to query the state at [default: latest indexed block]
    #[arg(long, global = true)]
    pub block: Option<u64>,

    /// Log executed requests (overridden by `RUST_LOG`)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get a single entity by ID, along with its cache tags
    Get {
        /// Entity kind, e.g. `stream-period`
        kind: EntityKind,

        /// Entity ID
        id: String,
    },
    /// List entities, along with cache tags of the list
    List {
        /// Entity kind, e.g. `stream-period`
        kind: EntityKind,

        #[command(flatten)]
        list: ListArgs,
    },
    /// Show cache tags a list query would be stored under, without running it
    Tags {
        /// Entity kind, e.g. `stream-period`
        kind: EntityKind,

        /// Filter as JSON `where` input, e.g. `{"sender": "0x..."}`
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Filter as JSON `where` input, e.g. `{"sender": "0x..."}`
    #[arg(long)]
    pub filter: Option<String>,

    /// Field to order by, e.g. `startedAtTimestamp` [default: id]
    #[arg(long)]
    pub order_by: Option<String>,

    /// Order descending
    #[arg(long, default_value_t = false)]
    pub desc: bool,

    /// Number of entities to skip
    #[arg(long, default_value_t = 0, conflicts_with = "last_id")]
    pub skip: u32,

    /// Page size (at most 999)
    #[arg(long, default_value_t = flowgraph_sdk::query::DEFAULT_TAKE)]
    pub take: u32,

    /// List entities after this ID, in ID order
    #[arg(long)]
    pub last_id: Option<String>,

    /// Fetch all pages until exhausted or terminated by (Ctrl+C)
    #[arg(long, default_value_t = false)]
    pub all: bool,
}
