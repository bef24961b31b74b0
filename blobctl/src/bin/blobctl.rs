use blobctl::cli::Cli;
use blobctl_command_execute_tokio::TokioCommandExecute;
use blobctl_core::{Context, OsEnv};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let ctx = Context::new()
        .with_env(OsEnv)
        .with_command_execute(TokioCommandExecute);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli.run(ctx, &mut std::io::stdout().lock()))?;

    Ok(())
}
