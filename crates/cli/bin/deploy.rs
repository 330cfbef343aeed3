use eyre::Result;
use tipjar_cli::{cmd::deploy, handler, utils};

fn main() -> Result<()> {
    handler::install();
    utils::load_dotenv();
    utils::subscriber();
    utils::enable_paint();
    run()
}

#[tokio::main]
async fn run() -> Result<()> {
    deploy::run().await
}
