use std::sync::Arc;

use anyhow::{Context, anyhow, bail};
use chrono::Utc;
use clap::{Args, Parser, Subcommand, ValueEnum};
use inquire::Confirm;
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};
use worldclock_core::{
    AppContext, Config, Dashboard, ForecastView, KeyPrompt, KeyState, Location, NoPrompt,
    TimeFormat, country,
};

use crate::{prompt::InquireKeyPrompt, terminal};

const WATCH_HELP: &str = "add <city> | rm <n> | t (12/24h) | key <api key> | q";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "worldclock", version, about = "World clock and weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// More log output on stderr (-v, -vv, -vvv). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and the preferred clock format.
    Configure,

    /// Look up a city and add it to the tracked locations.
    Add {
        /// City name, e.g. "new york".
        #[arg(required = true, num_args = 1..)]
        city: Vec<String>,
    },

    /// Stop tracking the location at a 1-based position (see `list`).
    Remove { position: usize },

    /// Print the tracked locations.
    List,

    /// Print the dashboard once, with current weather.
    Show {
        #[command(flatten)]
        format: FormatFlags,
    },

    /// Keep the dashboard on screen, refreshing every second.
    Watch {
        #[command(flatten)]
        format: FormatFlags,
    },

    /// Print the upcoming forecast for the location at a 1-based position.
    Forecast {
        position: usize,

        /// Also list the bundled icon file for each row.
        #[arg(long)]
        icons: bool,
    },

    /// Set the stored clock format.
    Format { mode: FormatMode },

    /// Download the country outline and flag for a location into the cache dir.
    Assets { position: usize },
}

/// One-off override of the stored clock format.
#[derive(Debug, Clone, Copy, Args)]
pub struct FormatFlags {
    #[arg(long = "24h", conflicts_with = "twelve_hour")]
    twenty_four_hour: bool,

    #[arg(long = "12h")]
    twelve_hour: bool,
}

impl FormatFlags {
    fn resolve(self, stored: TimeFormat) -> TimeFormat {
        match (self.twenty_four_hour, self.twelve_hour) {
            (true, _) => TimeFormat::TwentyFourHour,
            (_, true) => TimeFormat::TwelveHour,
            _ => stored,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatMode {
    #[value(name = "12")]
    Twelve,
    #[value(name = "24")]
    TwentyFour,
    Toggle,
}

impl Cli {
    pub async fn run(self, mut config: Config) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(&mut config),
            Command::Add { city } => add(&mut config, &city.join(" ")).await,
            Command::Remove { position } => remove(&mut config, position),
            Command::List => {
                list(&config);
                Ok(())
            }
            Command::Show { format } => show(config, format).await,
            Command::Watch { format } => watch(config, format).await,
            Command::Forecast { position, icons } => forecast(config, position, icons).await,
            Command::Format { mode } => set_format(&mut config, mode),
            Command::Assets { position } => assets(config, position).await,
        }
    }
}

fn context(config: &Config) -> anyhow::Result<Arc<AppContext>> {
    let ctx = AppContext::from_config(config.clone(), Config::key_file_path()?)?;
    Ok(Arc::new(ctx))
}

/// Positions on the command line are 1-based.
fn location_at(config: &Config, position: usize) -> anyhow::Result<&Location> {
    position
        .checked_sub(1)
        .and_then(|i| config.locations.get(i))
        .ok_or_else(|| {
            anyhow!("No location at position {position}; {} tracked", config.locations.len())
        })
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let ctx = context(config)?;

    let replace = match ctx.api_keys.state() {
        KeyState::NoKey => true,
        KeyState::Cached(_) => Confirm::new("An API key is already stored. Replace it?")
            .with_default(false)
            .prompt()?,
    };
    if replace {
        match InquireKeyPrompt.request_key() {
            Some(key) => {
                ctx.api_keys.store(&key)?;
                println!("API key saved to {}", ctx.api_keys.path().display());
            }
            None => println!("No API key entered; keeping the previous state."),
        }
    }

    let use_24_hour = Confirm::new("Use a 24-hour clock?")
        .with_default(config.use_24_hour)
        .prompt()?;
    config.use_24_hour = use_24_hour;
    config.save()?;

    println!("Configuration saved.");
    Ok(())
}

async fn add(config: &mut Config, city: &str) -> anyhow::Result<()> {
    let ctx = context(config)?;

    let location = ctx
        .resolver()
        .resolve(city)
        .await
        .map_err(|err| anyhow!(err.add_location_message()))?;

    println!(
        "Added {} ({}, {})",
        location.city,
        location.timezone_id(),
        country::country_name(&location.country_code).unwrap_or("unknown country")
    );
    config.locations.push(location);
    config.save()
}

fn remove(config: &mut Config, position: usize) -> anyhow::Result<()> {
    let city = location_at(config, position)?.city.clone();
    config.locations.remove(position - 1);
    config.save()?;

    println!("Removed {city}");
    Ok(())
}

fn list(config: &Config) {
    if config.locations.is_empty() {
        println!("No locations yet. Add one with `worldclock add <city>`.");
        return;
    }
    for (i, location) in config.locations.iter().enumerate() {
        println!(
            "{:>2}. {:<20} {:<28} {}",
            i + 1,
            location.city,
            location.timezone_id(),
            country::country_name(&location.country_code).unwrap_or("")
        );
    }
}

async fn show(config: Config, flags: FormatFlags) -> anyhow::Result<()> {
    let format = flags.resolve(config.time_format());
    let ctx = context(&config)?;

    let mut dashboard = Dashboard::new(ctx, config.locations, format);
    dashboard.refresh_weather(&InquireKeyPrompt).await;

    print!("{}", dashboard.frame());
    Ok(())
}

async fn forecast(config: Config, position: usize, icons: bool) -> anyhow::Result<()> {
    let location = location_at(&config, position)?.clone();
    let ctx = context(&config)?;

    let view = ForecastView::open(&ctx, &location, &InquireKeyPrompt, Utc::now()).await;
    print!("{view}");

    if view.is_error() {
        bail!("forecast unavailable for {}", location.city);
    }
    if let (true, Ok(rows)) = (icons, &view.body) {
        println!();
        for row in rows {
            println!("{:<6}  {}", row.time, row.icon_path.unwrap_or("-"));
        }
    }
    Ok(())
}

fn set_format(config: &mut Config, mode: FormatMode) -> anyhow::Result<()> {
    let format = match mode {
        FormatMode::Twelve => TimeFormat::TwelveHour,
        FormatMode::TwentyFour => TimeFormat::TwentyFourHour,
        FormatMode::Toggle => config.time_format().toggle(),
    };
    config.set_time_format(format);
    config.save()?;

    println!("Clock format: {}", if format.is_24_hour() { "24-hour" } else { "12-hour" });
    Ok(())
}

async fn assets(config: Config, position: usize) -> anyhow::Result<()> {
    let location = location_at(&config, position)?.clone();
    if location.country_code.is_empty() {
        bail!("No country code known for {}", location.city);
    }

    let ctx = context(&config)?;
    let images = ctx.assets.fetch(&location.country_code).await?;

    let dir = Config::cache_dir()?;
    let (shape, flag) = images
        .save_to(&dir)
        .with_context(|| format!("Failed to write images to {}", dir.display()))?;

    println!("Shape: {}", shape.display());
    println!("Flag:  {}", flag.display());
    Ok(())
}

/// A line typed while `watch` is running.
#[derive(Debug, PartialEq, Eq)]
enum WatchCommand<'a> {
    Add(&'a str),
    Remove(usize),
    Toggle,
    Key(&'a str),
    Quit,
    Unknown,
}

impl<'a> WatchCommand<'a> {
    fn parse(line: &'a str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        let (head, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        Some(match (head, rest) {
            ("add", city) if !city.is_empty() => Self::Add(city),
            ("rm" | "remove", n) => n.parse().map(Self::Remove).unwrap_or(Self::Unknown),
            ("t" | "toggle", "") => Self::Toggle,
            ("key", key) if !key.is_empty() => Self::Key(key),
            ("q" | "quit", "") => Self::Quit,
            _ => Self::Unknown,
        })
    }
}

async fn watch(mut config: Config, flags: FormatFlags) -> anyhow::Result<()> {
    let format = flags.resolve(config.time_format());
    let ctx = context(&config)?;

    // Ask once up front; the refresh loop never blocks on a prompt.
    if ctx.api_keys.state() == KeyState::NoKey {
        if let Err(err) = ctx.api_keys.resolve(&InquireKeyPrompt) {
            warn!(error = %err, "starting without an API key");
        }
    }

    let mut dashboard = Dashboard::new(Arc::clone(&ctx), config.locations.clone(), format);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let mut ticker = time::interval(time::Duration::from_secs(1));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = dashboard.tick(Utc::now(), &NoPrompt);
                if report.polled {
                    debug!("weather poll started");
                }
                if report.added > 0 {
                    persist(&mut config, &mut dashboard);
                }
            }
            line = lines.next_line(), if stdin_open => {
                let Some(line) = line? else {
                    stdin_open = false;
                    continue;
                };
                let Some(command) = WatchCommand::parse(&line) else { continue };
                if command == WatchCommand::Quit {
                    break;
                }
                if handle(&mut dashboard, &ctx, command) {
                    persist(&mut config, &mut dashboard);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }

        let has_key = ctx.api_keys.state() != KeyState::NoKey;
        terminal::draw(&dashboard.frame(), &footer(has_key, dashboard.pending_adds()))?;
    }

    info!("watch stopped");
    Ok(())
}

fn persist(config: &mut Config, dashboard: &mut Dashboard) {
    config.locations = dashboard.store().to_locations();
    config.set_time_format(dashboard.format());
    if let Err(err) = config.save() {
        dashboard.notify(format!("Could not save config: {err}"));
    }
}

/// Bottom line of the live view: pending lookups, a key hint, then the commands.
fn footer(has_key: bool, pending_adds: usize) -> String {
    let mut parts = Vec::new();
    if pending_adds > 0 {
        parts.push(format!("looking up {pending_adds} location(s)..."));
    }
    if !has_key {
        parts.push("no API key: type `key <api key>`".to_string());
    }
    parts.push(WATCH_HELP.to_string());
    parts.join("  ·  ")
}

/// Apply one typed command. Returns whether persisted state changed.
fn handle(dashboard: &mut Dashboard, ctx: &AppContext, command: WatchCommand<'_>) -> bool {
    match command {
        // Saved once the lookup lands on a later tick.
        WatchCommand::Add(city) => {
            dashboard.request_add(city);
            false
        }
        WatchCommand::Remove(n) => match n.checked_sub(1).and_then(|i| dashboard.remove_location(i)) {
            Some(location) => {
                dashboard.notify(format!("Removed {}", location.city));
                true
            }
            None => {
                dashboard.notify(format!("No location at position {n}"));
                false
            }
        },
        WatchCommand::Toggle => {
            dashboard.toggle_format();
            true
        }
        WatchCommand::Key(key) => {
            match ctx.api_keys.store(key) {
                Ok(()) => dashboard.notify("API key saved"),
                Err(err) => dashboard.notify(format!("Could not save API key: {err}")),
            }
            false
        }
        WatchCommand::Quit | WatchCommand::Unknown => {
            dashboard.notify(WATCH_HELP);
            false
        }
    }
}
