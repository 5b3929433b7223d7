use clap::Parser;

#[tokio::main]
async fn main() {
    if let Err(err) = flowgraph_cli::run(flowgraph_cli::args::Cli::parse()).await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}
