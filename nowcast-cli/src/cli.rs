use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, InquireError, Password, PasswordDisplayMode, Select, Text};
use nowcast_core::{
    App, AppController, Config, Coordinates, FixedLocation, LocationProvider, NoLocation,
    SystemClock, TemperatureUnit, WeatherProvider, provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "nowcast", version, about = "Current weather in your terminal")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com key and an optional fixed location.
    Configure,

    /// Show current weather for a place name, postcode or "lat,lon".
    Show {
        query: String,

        #[arg(long, short = 'f')]
        fahrenheit: bool,
    },

    /// Show current weather at the device location.
    Here {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long, short = 'f')]
        fahrenheit: bool,
    },

    /// Interactive screen: type to search, `:loc`, `:unit`, `:quit`. (default)
    Interactive {
        #[command(flatten)]
        location: LocationArgs,

        #[arg(long, short = 'f')]
        fahrenheit: bool,
    },
}

#[derive(Debug, Default, clap::Args)]
pub struct LocationArgs {
    /// Latitude; overrides the configured location.
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    pub lat: Option<f64>,

    /// Longitude; overrides the configured location.
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lon: Option<f64>,
}

impl LocationArgs {
    fn coordinates(&self) -> Option<Coordinates> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
            _ => None,
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let command = self.command.unwrap_or(Command::Interactive {
            location: LocationArgs::default(),
            fahrenheit: false,
        });

        match command {
            Command::Configure => configure(),
            Command::Show { query, fahrenheit } => {
                let mut app = build_app(&LocationArgs::default(), fahrenheit)?;
                app.search(&query);
                app.settle().await;
                finish(&app)
            }
            Command::Here { location, fahrenheit } => {
                let mut app = build_app(&location, fahrenheit)?;
                app.press_location();
                app.settle().await;
                finish(&app)
            }
            Command::Interactive { location, fahrenheit } => {
                let mut app = build_app(&location, fahrenheit)?;
                interactive(&mut app).await
            }
        }
    }
}

fn build_app(location: &LocationArgs, fahrenheit: bool) -> anyhow::Result<App> {
    let config = Config::load()?;

    let provider: Arc<dyn WeatherProvider> = Arc::from(provider_from_config(&config)?);

    let location: Arc<dyn LocationProvider> =
        match location.coordinates().or(config.location) {
            Some(coords) => Arc::new(FixedLocation::new(coords)),
            None => Arc::new(NoLocation),
        };

    let unit = if fahrenheit { TemperatureUnit::Fahrenheit } else { config.units };
    tracing::debug!(base_url = config.base_url(), ?unit, "starting app");

    let controller = AppController::new(unit, Arc::new(SystemClock));
    Ok(App::new(controller, provider, location))
}

/// Print the screen for a one-shot command; a failed lookup becomes the exit error.
fn finish(app: &App) -> anyhow::Result<()> {
    let controller = app.controller();
    match (controller.display(), controller.last_error()) {
        (Some(_), None) => {
            println!("{}", render::screen(controller));
            Ok(())
        }
        (_, Some(err)) => Err(anyhow::anyhow!("{err}")),
        (None, None) => Err(anyhow::anyhow!(
            "No weather to show.\n\
             Hint: pass --lat/--lon or run `nowcast configure` to set a location."
        )),
    }
}

async fn interactive(app: &mut App) -> anyhow::Result<()> {
    println!("{}", render::screen(app.controller()));

    loop {
        let input = match Text::new("Search:")
            .with_help_message(":loc use location, :unit toggle °C/°F, :quit exit")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match input.trim() {
            ":quit" | ":q" => break,
            ":loc" => app.press_location(),
            ":unit" => app.toggle_unit(),
            text => app.search(text),
        }

        app.settle().await;
        println!("{}", render::screen(app.controller()));
    }

    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let path = Config::config_file_path()?;
    let mut config = Config::load_from(&path)?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .with_help_message("Get one at https://www.weatherapi.com/my/")
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    }

    let units = Select::new("Default units:", vec!["celsius", "fahrenheit"])
        .prompt()
        .context("Failed to read units")?;
    config.units = match units {
        "fahrenheit" => TemperatureUnit::Fahrenheit,
        _ => TemperatureUnit::Celsius,
    };

    let set_location = Confirm::new("Set a fixed location for `:loc` and `here`?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Failed to read answer")?;

    if set_location {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please type a number, e.g. 48.85")
            .prompt()
            .context("Failed to read latitude")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please type a number, e.g. 2.35")
            .prompt()
            .context("Failed to read longitude")?;
        config.set_location(Some(Coordinates::new(latitude, longitude)));
    } else {
        config.set_location(None);
    }

    let saved = config.save()?;
    println!("Configuration saved to {}", saved.display());

    Ok(())
}
