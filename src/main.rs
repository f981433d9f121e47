use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spopify::{cli, config, error, types::PkceToken};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[clap(about = "Log in to Spotify")]
    Auth,

    #[clap(about = "List your playlists")]
    Playlists(PlaylistsOptions),

    #[clap(about = "Count the tracks of a playlist per genre")]
    Genres(GenresOptions),

    #[clap(about = "Show the tracks of chosen genres")]
    Filter(FilterOptions),

    #[clap(about = "Show repeated tracks of a playlist")]
    Duplicates(PlaylistArg),

    #[clap(about = "Remove repeated tracks, keeping the first occurrence")]
    Dedup(PlaylistArg),

    #[clap(about = "Manage your own genre tags")]
    Tags(TagsOptions),

    #[clap(about = "Manage fallback genres of artists")]
    Fallback(FallbackOptions),

    #[clap(about = "Run the HTTP API")]
    Serve,

    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    #[clap(long)]
    pub search: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistArg {
    pub playlist_id: String,
}

#[derive(Parser, Debug, Clone)]
pub struct GenresOptions {
    pub playlist_id: String,

    /// Show every tag instead of main genres only
    #[clap(long)]
    pub all: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct FilterOptions {
    pub playlist_id: String,

    #[clap(long = "genre", required = true, num_args = 1)]
    pub genres: Vec<String>,

    /// Save the matching tracks as a new playlist
    #[clap(long)]
    pub create: bool,

    #[clap(long, requires = "create")]
    pub name: Option<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct TagsOptions {
    #[command(subcommand)]
    pub command: TagsSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum TagsSubcommand {
    List { track_id: String },
    Add { track_id: String, genre: String },
    Remove { track_id: String, genre: String },
}

#[derive(Parser, Debug, Clone)]
pub struct FallbackOptions {
    #[command(subcommand)]
    pub command: FallbackSubcommand,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FallbackSubcommand {
    List,
    Add {
        artist: String,
        #[clap(required = true, num_args = 1..)]
        genres: Vec<String>,
    },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Playlists(opt) => cli::playlists(opt.search).await,
        Command::Genres(opt) => cli::genres(opt.playlist_id, opt.all).await,
        Command::Filter(opt) => {
            cli::filter(opt.playlist_id, opt.genres, opt.create, opt.name).await
        }
        Command::Duplicates(opt) => cli::duplicates(opt.playlist_id).await,
        Command::Dedup(opt) => cli::dedup(opt.playlist_id).await,
        Command::Tags(opt) => match opt.command {
            TagsSubcommand::List { track_id } => cli::list_tags(track_id).await,
            TagsSubcommand::Add { track_id, genre } => cli::add_tag(track_id, genre).await,
            TagsSubcommand::Remove { track_id, genre } => cli::remove_tag(track_id, genre).await,
        },
        Command::Fallback(opt) => match opt.command {
            FallbackSubcommand::List => cli::list_fallback().await,
            FallbackSubcommand::Add { artist, genres } => cli::add_fallback(artist, genres).await,
        },
        Command::Serve => cli::serve().await,
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
