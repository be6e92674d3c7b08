use carousel_deck::config::{self, CarouselConfig};
use carousel_deck::simulate::{Simulation, SimulationEvent};
use carousel_deck::strings::Labels;
use carousel_deck::{logging, output, publish};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser)]
#[command(name = "carousel-deck")]
#[command(about = "Accessible slide carousels from Markdown decks")]
#[command(long_about = "\
Accessible slide carousels from Markdown decks

A deck is a TOML file listing rows of Markdown regions. Each row becomes one
slide; a heading-only first row becomes the carousel title.

Source structure:

  decks/
  ├── carousel.toml                # Deck config (optional)
  ├── strings/                     # Placeholder sheets (optional)
  │   ├── placeholders.json        #   default language
  │   └── fr/placeholders.json     #   [strings] language = \"fr\"
  ├── spring.toml                  # Deck → spring.html
  └── archive/
      └── 2023.toml                # Deck → archive/2023.html

Deck file:

  [[rows]]
  regions = [\"## Our Work\"]                       # title
  [[rows]]
  regions = [\"![Dawn](dawn.jpg)\"]                 # image-only slide
  [[rows]]
  regions = [\"![Dusk](dusk.jpg)\", \"### Dusk ...\"] # image + content

Run 'carousel-deck gen-config' to generate a documented carousel.toml.")]
#[command(version)]
struct Cli {
    /// Deck source directory
    #[arg(long, default_value = "decks", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render one deck file to HTML
    Render {
        /// Deck file
        deck: PathBuf,
    },
    /// Render every deck under the source directory
    Build,
    /// Print a deck's slide inventory without writing anything
    Check {
        /// Deck file
        deck: PathBuf,
    },
    /// Replay navigation events against a simulated viewport
    Simulate {
        /// Deck file
        deck: PathBuf,
        /// Event to replay: next, prev, jump:N (slide N, from 1) or scroll:PX (repeatable)
        #[arg(long = "event", required = true)]
        events: Vec<SimulationEvent>,
    },
    /// Print a stock carousel.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::Render { deck } => {
            let dir = deck_dir(&deck);
            let config = config::load_config(dir)?;
            let labels = resolve_labels(&config, dir).await;
            let out = publish::single_output_path(&deck, &cli.output);
            let rendered = publish::render_deck_file(&deck, &out, &labels, &config.render)?;
            output::print_build_output(std::slice::from_ref(&rendered), dir);
        }
        Command::Build => {
            let config = config::load_config(&cli.source)?;
            init_thread_pool(&config.processing);
            let labels = resolve_labels(&config, &cli.source).await;

            info!(source = %cli.source.display(), output = %cli.output.display(), "building decks");
            let rendered = publish::build_all(&cli.source, &cli.output, &labels, &config.render)?;
            output::print_build_output(&rendered, &cli.source);
        }
        Command::Check { deck } => {
            let dir = deck_dir(&deck);
            let config = config::load_config(dir)?;
            let labels = resolve_labels(&config, dir).await;
            let carousel = publish::assemble_deck_file(&deck, &labels)?;
            output::print_check_output(&carousel);
        }
        Command::Simulate { deck, events } => {
            let dir = deck_dir(&deck);
            let config = config::load_config(dir)?;
            let labels = resolve_labels(&config, dir).await;
            let carousel = publish::assemble_deck_file(&deck, &labels)?;

            let mut simulation = Simulation::new(
                carousel,
                config.viewport.slide_width,
                config.tracking.threshold,
            );
            output::print_check_output(simulation.carousel());
            for event in events {
                let outcomes = simulation.step(event);
                output::print_simulation_step(&event.to_string(), &outcomes, simulation.carousel());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Directory holding a deck file and its `carousel.toml`.
fn deck_dir(deck: &Path) -> &Path {
    deck.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
}

async fn resolve_labels(config: &CarouselConfig, dir: &Path) -> Labels {
    let table = publish::string_table(&config.strings, dir);
    Labels::resolve(&*table).await
}

/// Initialize the rayon thread pool based on processing config.
///
/// Capped at the number of available CPU cores.
fn init_thread_pool(processing: &config::ProcessingConfig) {
    let threads = config::effective_threads(processing);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
