use clap::Parser;
use tabpad::cli::{Cli, Command};
use tabpad::infra::config::Config;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if let Some(Command::Completions { shell }) = cli.command {
        tabpad::cli::print_completions(shell);
        return Ok(());
    }

    let config = Config::load(cli.config.as_deref())?;
    tabpad::init(&config, cli.log_file.as_deref())?;

    let mut app = tabpad::ui::app::UiApp::new(config);
    app.open_files(&cli.files);
    app.run()
}
