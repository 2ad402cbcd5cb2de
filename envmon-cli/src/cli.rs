use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};
use envmon_core::{
    Config, Dashboard, DashboardOptions, OpenMeteoProvider, ViewMode, WeatherProvider, describe,
    view::{TreeView, grid},
};
use inquire::{Confirm, CustomType, Select, Text};

use crate::terminal;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "envmon", version, about = "Environmental monitoring dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the interactive dashboard (default).
    Watch(WatchArgs),

    /// Fetch current conditions once, print them and exit.
    Show {
        /// Layout to print; defaults to the configured view.
        #[arg(long, value_enum)]
        view: Option<ViewArg>,

        /// Print the raw snapshot as JSON instead of a view.
        #[arg(long, conflicts_with = "view")]
        json: bool,
    },

    /// Edit the configuration file interactively.
    Configure,
}

#[derive(Debug, Default, Args)]
pub struct WatchArgs {
    /// Initial layout; defaults to the configured view.
    #[arg(long, value_enum)]
    view: Option<ViewArg>,

    /// Start with auto-refresh turned off.
    #[arg(long)]
    no_auto_refresh: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ViewArg {
    Grid,
    Tree,
}

impl From<ViewArg> for ViewMode {
    fn from(arg: ViewArg) -> Self {
        match arg {
            ViewArg::Grid => ViewMode::Grid,
            ViewArg::Tree => ViewMode::Tree,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = Config::load()?;

        match self.command.unwrap_or(Command::Watch(WatchArgs::default())) {
            Command::Watch(args) => {
                let options = watch_options(&config, &args);
                let provider = OpenMeteoProvider::with_base_url(config.api_url.as_str());
                terminal::run(Dashboard::new(provider, options)).await?;
            }
            Command::Show { view, json } => {
                let provider = OpenMeteoProvider::with_base_url(config.api_url.as_str());
                let snapshot = provider.fetch().await.context("Failed to fetch weather data")?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&snapshot)?);
                } else {
                    let description = describe(snapshot.weathercode);
                    let out = match view.map(ViewMode::from).unwrap_or(config.default_view) {
                        ViewMode::Grid => grid::render(Some(&snapshot), description),
                        ViewMode::Tree => TreeView::new().render(Some(&snapshot), description),
                    };
                    println!("{out}");
                }
            }
            Command::Configure => configure(config)?,
        }

        Ok(())
    }
}

fn watch_options(config: &Config, args: &WatchArgs) -> DashboardOptions {
    let mut options = config.dashboard_options();
    if let Some(view) = args.view {
        options.view_mode = view.into();
    }
    if args.no_auto_refresh {
        options.auto_refresh = false;
    }
    options
}

fn configure(mut config: Config) -> anyhow::Result<()> {
    let views = ViewMode::all().to_vec();
    let start = views.iter().position(|v| *v == config.default_view).unwrap_or(0);

    config.default_view = Select::new("Default view:", views).with_starting_cursor(start).prompt()?;

    config.auto_refresh = Confirm::new("Start with auto-refresh on?")
        .with_default(config.auto_refresh)
        .prompt()?;

    config.refresh_interval_secs = CustomType::<u64>::new("Refresh interval (seconds):")
        .with_default(config.refresh_interval_secs)
        .with_validator(|secs: &u64| {
            Ok(if *secs >= 1 {
                inquire::validator::Validation::Valid
            } else {
                inquire::validator::Validation::Invalid("must be at least 1 second".into())
            })
        })
        .prompt()?;

    config.api_url = Text::new("Forecast endpoint:").with_default(&config.api_url).prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}
