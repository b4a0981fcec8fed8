use clap::{ArgAction, Parser, Subcommand};
use commands::{add, auth, config, done, list, pick, recommend, rm, search, stats, sync};
use commands::{CategoryArg, ContentTypeArg, MoodArg, SortArg};

mod app;
mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "nextup")]
#[command(about = "NextUp - A watchlist that knows what you should watch next")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add an item to the watchlist
    #[command(long_about = "Add an item to the watchlist. With --video-id and a configured YouTube API key, the title and thumbnail are filled in from the video; an explicitly given title always wins. The item is saved locally first and pushed to the remote backend when signed in.")]
    Add {
        /// Title of the item (optional when --video-id can supply one)
        title: Option<String>,

        /// Content type
        #[arg(long = "type", value_enum, default_value = "video")]
        content_type: ContentTypeArg,

        /// Watch category
        #[arg(long, value_enum, default_value = "quick")]
        category: CategoryArg,

        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,

        /// YouTube video id to attach (enables metadata lookup)
        #[arg(long)]
        video_id: Option<String>,
    },
    /// List watchlist items
    List {
        /// Only show items of this content type
        #[arg(long = "type", value_enum)]
        content_type: Option<ContentTypeArg>,

        /// Only show items of this watch category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Only show watched items
        #[arg(long, conflicts_with = "unwatched")]
        watched: bool,

        /// Only show unwatched items
        #[arg(long)]
        unwatched: bool,

        /// Sort order
        #[arg(long, value_enum, default_value = "newest")]
        sort: SortArg,
    },
    /// Search items by title and notes
    Search {
        /// Text to look for (case-insensitive, matches title and notes)
        query: Option<String>,

        /// Only show items of this content type
        #[arg(long = "type", value_enum)]
        content_type: Option<ContentTypeArg>,

        /// Only show items of this watch category
        #[arg(long, value_enum)]
        category: Option<CategoryArg>,

        /// Only show watched items
        #[arg(long, conflicts_with = "unwatched")]
        watched: bool,

        /// Only show unwatched items
        #[arg(long)]
        unwatched: bool,

        /// Only show items that have notes
        #[arg(long, conflicts_with = "without_notes")]
        with_notes: bool,

        /// Only show items without notes
        #[arg(long)]
        without_notes: bool,
    },
    /// Toggle the watched flag on items
    #[command(long_about = "Toggle the watched flag. A single id flips the flag; several ids mark every listed item as watched in one batch. Ids may be full uuids or unique prefixes as shown by 'nextup list'.")]
    Done {
        /// Item ids (full uuid or unique prefix)
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Remove items from the watchlist
    Rm {
        /// Item ids (full uuid or unique prefix)
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Recommend what to watch right now
    #[command(long_about = "Score every unwatched item against the time of day, your recent watch history, how long it has waited, and an optional mood, then show the winner with its reasons. With a mood and a configured OpenRouter key, titles are also rated by a language model.")]
    Recommend {
        /// Current mood to match against
        #[arg(long, value_enum)]
        mood: Option<MoodArg>,
    },
    /// Pick a random unwatched item
    Pick,
    /// Show watchlist statistics
    Stats,
    /// Reconcile the local watchlist with the remote backend
    #[command(long_about = "Run a full reconciliation: fetch the remote watchlist as the authoritative view, keep items the remote has never seen, and push those up. Requires a configured Supabase backend and a signed-in session.")]
    Sync,
    /// Manage the account session
    Auth {
        #[command(subcommand)]
        cmd: AuthCommands,
    },
    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum AuthCommands {
    /// Sign in with email and password
    Login {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    Signup {
        /// Account email (prompted for when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out, keeping all local data
    Logout,
    /// Show the current session
    Status,
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current configuration (masks secrets)
    Show {
        /// Show secrets unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a configuration template to the config directory
    Init {
        /// Overwrite an existing config file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },

    /// Configure the Supabase backend
    #[command(long_about = "Configure the Supabase project used for account sync. You'll find the project URL and anon key under Settings > API in the Supabase dashboard.")]
    Supabase {
        /// Project base URL, e.g. https://PROJECT.supabase.co (prompted for when omitted)
        #[arg(long)]
        url: Option<String>,

        /// Project anon key (prompted for when omitted)
        #[arg(long)]
        anon_key: Option<String>,
    },

    /// Configure YouTube metadata lookup
    #[command(long_about = "Configure the YouTube Data API key used to fill in titles and thumbnails for items added with --video-id. Create a key in the Google Cloud console with the YouTube Data API v3 enabled.")]
    Youtube {
        /// YouTube Data API key (prompted for when omitted)
        #[arg(long)]
        api_key: Option<String>,
    },

    /// Configure OpenRouter title analysis
    #[command(long_about = "Configure the OpenRouter API key and model used to rate titles against your mood during recommendations. Create a key at https://openrouter.ai/keys.")]
    Openrouter {
        /// OpenRouter API key (prompted for when omitted)
        #[arg(long)]
        api_key: Option<String>,

        /// Chat model to use
        #[arg(long)]
        model: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Add {
            title,
            content_type,
            category,
            notes,
            video_id,
        } => add::run_add(title, content_type, category, notes, video_id, &output).await,
        Commands::List {
            content_type,
            category,
            watched,
            unwatched,
            sort,
        } => list::run_list(content_type, category, watched, unwatched, sort, &output).await,
        Commands::Search {
            query,
            content_type,
            category,
            watched,
            unwatched,
            with_notes,
            without_notes,
        } => {
            search::run_search(
                query.unwrap_or_default(),
                content_type,
                category,
                watched,
                unwatched,
                with_notes,
                without_notes,
                &output,
            )
            .await
        }
        Commands::Done { ids } => done::run_done(ids, &output).await,
        Commands::Rm { ids } => rm::run_rm(ids, &output).await,
        Commands::Recommend { mood } => recommend::run_recommend(mood, &output).await,
        Commands::Pick => pick::run_pick(&output).await,
        Commands::Stats => stats::run_stats(&output).await,
        Commands::Sync => sync::run_sync(&output).await,
        Commands::Auth { cmd } => auth::run_auth(cmd, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
    }
}
