use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, PasswordDisplayMode, Text};
use weathersphere_core::{
    Config, LookupState, OpenWeatherProvider, SubmitOutcome, WeatherLookup,
    error::GENERIC_FAILURE_MESSAGE, provider::provider_from_config, view,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathersphere", version, about = "Current weather by city name")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and an optional default city.
    Configure,

    /// Show current weather for one city and exit.
    Show {
        /// City name, e.g. "Dhaka" or "London,GB".
        city: String,
    },

    /// Prompt for city names until Esc or Ctrl-C (the default).
    Interactive {
        /// City to show on start; falls back to the configured default city.
        #[arg(long)]
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Interactive { city: None }) {
            Command::Configure => configure(),
            Command::Show { city } => show(&city).await,
            Command::Interactive { city } => interactive(city).await,
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let mut key_prompt = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked);
    if config.api_key.is_some() {
        key_prompt = key_prompt.with_help_message("leave empty to keep the current key");
    }
    let api_key = key_prompt.prompt().context("Failed to read API key")?;
    let api_key = api_key.trim();
    if !api_key.is_empty() {
        config.api_key = Some(api_key.to_string());
    } else if config.api_key.is_none() {
        bail!("An API key is required. Get one at https://openweathermap.org/api");
    }

    let current_city = config.default_city().unwrap_or_default().to_string();
    let city = Text::new("Default city (optional):")
        .with_initial_value(&current_city)
        .prompt()
        .context("Failed to read default city")?;
    let city = city.trim();
    config.default_city = (!city.is_empty()).then(|| city.to_string());

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

fn lookup_from_config(config: &Config) -> anyhow::Result<WeatherLookup<OpenWeatherProvider>> {
    match Config::config_file_path() {
        Ok(path) => log::debug!("using config file {}", path.display()),
        Err(err) => log::debug!("no config file location: {err}"),
    }
    let provider = provider_from_config(config)?;
    log::debug!("using provider endpoint {}", provider.base_url());
    Ok(WeatherLookup::new(provider))
}

async fn show(city: &str) -> anyhow::Result<()> {
    let config = Config::load()?;
    let rendered = lookup_once(&config, city).await?;

    print!("{rendered}");
    Ok(())
}

/// Run one lookup and render it; a failed lookup is an error.
async fn lookup_once(config: &Config, city: &str) -> anyhow::Result<String> {
    let mut lookup = lookup_from_config(config)?;

    lookup.update_query(city);
    match lookup.submit_query().await {
        SubmitOutcome::Ignored => bail!("City name must not be empty"),
        SubmitOutcome::Failed => bail!(failure_text(lookup.state())),
        SubmitOutcome::Loaded | SubmitOutcome::Busy => {}
    }

    Ok(view::render(lookup.state()))
}

fn failure_text(state: &LookupState) -> String {
    state
        .failure
        .clone()
        .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string())
}

async fn interactive(city: Option<String>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let mut lookup = lookup_from_config(&config)?;

    let initial = city
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .or_else(|| config.default_city());
    if let Some(initial) = initial {
        log::debug!("loading start city {initial:?}");
        lookup.load_default(initial).await;
    }
    println!("{}", view::render(lookup.state()));

    loop {
        let input = Text::new("City:")
            .with_placeholder("Enter city name")
            .with_help_message("Enter to search, Esc to quit")
            .prompt();

        let text = match input {
            Ok(text) => text,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city name"),
        };

        lookup.update_query(text);
        if lookup.submit_query().await == SubmitOutcome::Ignored {
            continue;
        }
        println!("{}", view::render(lookup.state()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_subcommand_means_interactive() {
        let cli = Cli::try_parse_from(["weathersphere"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn failure_text_uses_recorded_message() {
        let state = LookupState {
            failure: Some("City not found. Please enter a valid city name.".into()),
            ..Default::default()
        };
        assert_eq!(
            failure_text(&state),
            "City not found. Please enter a valid city name."
        );
        assert_eq!(failure_text(&LookupState::default()), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn lookup_once_fails_when_lookup_fails() {
        let config = Config {
            api_key: Some("K".into()),
            base_url: Some("http://127.0.0.1:1".into()),
            ..Default::default()
        };

        let err = lookup_once(&config, "Zzzzznotacity").await.unwrap_err();
        assert_eq!(err.to_string(), GENERIC_FAILURE_MESSAGE);
    }

    #[tokio::test]
    async fn lookup_once_rejects_blank_city() {
        let config = Config {
            api_key: Some("K".into()),
            ..Default::default()
        };

        let err = lookup_once(&config, "   ").await.unwrap_err();
        assert!(err.to_string().contains("must not be empty"));
    }

    #[test]
    fn show_takes_city() {
        let cli = Cli::try_parse_from(["weathersphere", "show", "New York"]).unwrap();
        assert!(matches!(cli.command, Some(Command::Show { city }) if city == "New York"));
    }

    #[test]
    fn interactive_accepts_start_city() {
        let cli =
            Cli::try_parse_from(["weathersphere", "interactive", "--city", "Dhaka"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Interactive { city: Some(c) }) if c == "Dhaka"
        ));
    }
}
