use clap::Parser;
use color_eyre::eyre::Result;
use quickpage::{
    app::{self, StartScreen},
    cli::{Cli, Commands},
    headless, logging,
};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.verbose)?;

    let settings_file = quickpage::settings_file(&cli)?;
    let settings_path = settings_file.path().to_path_buf();
    let quick_page = quickpage::load(&cli, settings_file)?;
    match cli.command.unwrap_or(Commands::New) {
        Commands::New => app::run(quick_page, StartScreen::CreatePage).await,
        Commands::Settings => app::run(quick_page, StartScreen::Settings).await,
        command => headless::run(&quick_page, &settings_path, command).await,
    }
}
