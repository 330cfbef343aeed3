use clap::Parser;
use eyre::Result;
use tipjar_cli::{args::TipJarArgs, handler, utils};

fn main() -> Result<()> {
    handler::install();
    utils::load_dotenv();
    utils::subscriber();
    utils::enable_paint();
    let args = TipJarArgs::parse();
    main_args(args)
}

#[tokio::main]
async fn main_args(args: TipJarArgs) -> Result<()> {
    args.run().await
}
