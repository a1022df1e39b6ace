use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cityweather_core::{AppError, Config, ConfigError};
use cityweather_extension::menus::ADD_CITY_MENU_ID;
use cityweather_extension::{
    on_context_menu_clicked, on_installed, Delivery, LoggingMenus, MenuClick, NoBrowserTabs,
    CardList, OptionsPage, Popup, SAVE_COOLDOWN,
};
use cityweather_store::{FileStorage, Store};
use cityweather_weather::WeatherClient;

#[derive(Parser, Debug)]
#[command(
    name = "cityweather",
    version,
    about = "City weather extension, driven from the command line"
)]
struct Args {
    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Reset storage and register the context menu, as on install
    Install,
    /// Simulate a context-menu click on selected text
    MenuClick {
        /// The selected text
        text: Option<String>,

        #[arg(long, default_value = ADD_CITY_MENU_ID)]
        menu_id: String,
    },
    /// Show the popup: one weather card per city
    List,
    /// Add a city to the list
    Add { city: String },
    /// Remove the city at INDEX (as shown by `list`)
    Remove { index: usize },
    /// Switch between Fahrenheit and Celsius
    ToggleScale,
    /// Ask the active page to toggle its overlay
    ToggleOverlay,
    /// Show or edit the options page
    Options {
        #[command(subcommand)]
        action: OptionsAction,
    },
}

#[derive(Subcommand, Debug)]
enum OptionsAction {
    Show,
    Set {
        #[arg(long)]
        home_city: Option<String>,

        #[arg(long)]
        auto_overlay: Option<bool>,

        /// Skip the post-save cooldown
        #[arg(long)]
        no_cooldown: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Config errors happen before logging is set up, so the
            // detail goes to stderr directly.
            eprintln!("{}", e.user_message());
            eprintln!("  {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), AppError> {
    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load_from(&config_path)?;

    let filter = match config.logging.filter.trim() {
        "" => "info",
        f => f,
    };
    cityweather_core::init(filter)?;

    let validation = config.validate();
    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    if !validation.is_valid() {
        return Err(ConfigError::Invalid(validation.error_summary()).into());
    }

    tracing::debug!(
        "Using config {} and storage {}",
        config_path.display(),
        config.storage.path.display()
    );
    let store = Store::new(FileStorage::new(&config.storage.path));

    match args.command {
        Command::Install => {
            on_installed(&store, &LoggingMenus).await?;
            println!("Installed: city list cleared, options reset.");
        }
        Command::MenuClick { text, menu_id } => {
            let click = MenuClick {
                menu_item_id: menu_id,
                selection_text: text,
            };
            match on_context_menu_clicked(&store, &click).await? {
                Some(city) => println!("Added {}", city),
                None => println!("Nothing to add."),
            }
        }
        Command::List => list(store, &config).await?,
        Command::Add { city } => {
            let mut popup = Popup::load(store).await?;
            popup.set_city_input(city);
            if popup.add_city().await? {
                println!("Cities: {}", popup.cities().join(", "));
            } else {
                println!("Nothing to add.");
            }
        }
        Command::Remove { index } => {
            let mut popup = Popup::load(store).await?;
            let removed = popup.delete_city(index).await?;
            println!("Removed {}", removed);
        }
        Command::ToggleScale => {
            let mut popup = Popup::load(store).await?;
            let scale = popup.toggle_temp_scale(&NoBrowserTabs).await?;
            println!("Temperature scale: {} ({})", scale, scale.symbol());
        }
        Command::ToggleOverlay => {
            let popup = Popup::load(store).await?;
            match popup.toggle_overlay(&NoBrowserTabs).await {
                Delivery::Sent(tab) => println!("Overlay toggled on tab {}", tab.0),
                Delivery::NoActiveTab => println!("No active tab to toggle the overlay on."),
                Delivery::Failed => println!("Could not reach the active tab."),
            }
        }
        Command::Options { action } => {
            let mut page = OptionsPage::load(store).await?;
            match action {
                OptionsAction::Show => print_options(&page),
                OptionsAction::Set {
                    home_city,
                    auto_overlay,
                    no_cooldown,
                } => {
                    if let Some(home_city) = home_city {
                        page.set_home_city(home_city);
                    }
                    if let Some(auto_overlay) = auto_overlay {
                        page.set_auto_overlay(auto_overlay);
                    }

                    if no_cooldown {
                        page.save(std::future::ready(())).await?;
                    } else {
                        println!("{}", page.save_button_label());
                        page.save(tokio::time::sleep(SAVE_COOLDOWN)).await?;
                    }
                    print_options(&page);
                }
            }
        }
    }

    Ok(())
}

/// Render every card, fetching all cities concurrently.
async fn list(store: Store<FileStorage>, config: &Config) -> Result<(), AppError> {
    let popup = Popup::load(store).await?;
    let specs = popup.cards();
    if specs.is_empty() {
        println!("No cities yet. Add one with `cityweather add <city>`.");
        return Ok(());
    }

    let client = WeatherClient::with_base_url(
        config.weather.effective_api_key(),
        &config.weather.api_base_url,
    )?;

    let mut cards = CardList::new();
    cards.refresh(&specs, &client).await;

    for (spec, card) in specs.iter().zip(cards.cards()) {
        let view = card.view();
        let label = match spec.delete_index {
            Some(index) => format!("[{}]", index),
            None => "[home]".to_string(),
        };
        println!("{} {}", label, view.title);
        for line in &view.lines {
            println!("    {}", line);
        }
    }
    println!("Scale: {}", popup.scale_button_label());

    Ok(())
}

fn print_options(page: &OptionsPage<FileStorage>) {
    let options = page.options();
    println!("Home city:    {}", options.home_city().unwrap_or("(none)"));
    println!("Auto overlay: {}", options.has_auto_overlay);
    println!("Scale:        {}", options.temp_scale);
}
