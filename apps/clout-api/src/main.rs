use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = clout_api::Args::parse();

	clout_api::run(args).await
}
