use anyhow::{anyhow, Context, Result};
use catalog::{
    parser, CatalogIndex, EmbeddingRecord, Platform, SourceItem, Style, CATALOG_FILE, META_FILE,
};
use clap::{Parser, Subcommand};
use colored::Colorize;
use embedder::{vector::normalize, EmbeddingClient, StyleTagger};
use ingest::{Downloader, PinterestClient, RedditClient};
use server::{RecommendationOrchestrator, RecommendationRequest};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use trends::TrendReport;

const TRENDS_FILE: &str = "trends.json";
const HTTP_TIMEOUT_SECS: u64 = 20;

/// TrendRecs - Fashion Trend Recommendation Engine
#[derive(Parser)]
#[command(name = "trend-recs")]
#[command(about = "Fashion trend recommender over Reddit and Pinterest outfit posts", long_about = None)]
struct Cli {
    /// Path to the catalog data directory
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Collect new image posts from fashion subreddits
    IngestReddit {
        /// Subreddits to pull from (e.g., streetwear malefashionadvice)
        #[arg(long, num_args = 1.., default_values_t = [String::from("streetwear"), String::from("malefashionadvice")])]
        subreddits: Vec<String>,

        /// Maximum posts to fetch per subreddit
        #[arg(long, default_value = "50")]
        limit: u32,
    },

    /// Collect pins from the authorized Pinterest account's boards
    IngestPinterest {
        /// Board names or ids to pull; defaults to fashion-relevant boards
        #[arg(long, num_args = 0..)]
        boards: Vec<String>,

        /// Maximum pins to fetch per board
        #[arg(long, default_value = "100")]
        limit: usize,

        /// Only consider boards with this privacy (PUBLIC | PROTECTED | SECRET)
        #[arg(long)]
        privacy: Option<String>,

        /// Ready-made access token; minted from the refresh token when absent
        #[arg(long, env = "PINTEREST_ACCESS_TOKEN", hide_env_values = true)]
        access_token: Option<String>,

        /// Pinterest app id, used to refresh the access token
        #[arg(long, env = "PINTEREST_APP_ID")]
        app_id: Option<String>,

        /// Pinterest app secret
        #[arg(long, env = "PINTEREST_APP_SECRET", hide_env_values = true)]
        app_secret: Option<String>,

        /// OAuth refresh token for the authorized account
        #[arg(long, env = "PINTEREST_REFRESH_TOKEN", hide_env_values = true)]
        refresh_token: Option<String>,
    },

    /// Embed and style-tag ingested images that have no embedding yet
    Embed {
        /// Address of the embedding model service
        #[arg(long, default_value = "http://localhost:50051")]
        embed_addr: String,

        /// Images per embedding request
        #[arg(long, default_value = "16")]
        batch_size: usize,
    },

    /// Compute and display the trend report
    Trends {
        /// EMA span in days
        #[arg(long, default_value = "5")]
        span: u32,

        /// Where to save the report (defaults to trends.json in the data dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Get outfit recommendations
    Recommend {
        /// Reference photo to personalize against
        #[arg(long)]
        photo: Option<PathBuf>,

        /// Restrict results to these styles (e.g., streetwear vintage)
        #[arg(long, num_args = 0..)]
        styles: Vec<String>,

        /// Number of recommendations to return
        #[arg(long, default_value = "10")]
        limit: usize,

        /// Show detailed explanation for each recommendation
        #[arg(long)]
        explain: bool,

        /// Address of the embedding model service
        #[arg(long, default_value = "http://localhost:50051")]
        embed_addr: String,
    },

    /// List the supported style categories
    Styles,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Pull API credentials from .env before clap reads the environment
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::IngestReddit { subreddits, limit } => {
            handle_ingest_reddit(&cli.data_dir, subreddits, limit).await?
        }
        Commands::IngestPinterest {
            boards,
            limit,
            privacy,
            access_token,
            app_id,
            app_secret,
            refresh_token,
        } => {
            handle_ingest_pinterest(
                &cli.data_dir,
                boards,
                limit,
                privacy,
                access_token,
                app_id,
                app_secret,
                refresh_token,
            )
            .await?
        }
        Commands::Embed {
            embed_addr,
            batch_size,
        } => handle_embed(&cli.data_dir, &embed_addr, batch_size).await?,
        Commands::Trends { span, output } => handle_trends(&cli.data_dir, span, output)?,
        Commands::Recommend {
            photo,
            styles,
            limit,
            explain,
            embed_addr,
        } => handle_recommend(&cli.data_dir, photo, styles, limit, explain, &embed_addr).await?,
        Commands::Styles => handle_styles(&cli.data_dir)?,
    }

    Ok(())
}

/// Origin ids already in the metadata log, for deduplication across runs
fn known_origins(data_dir: &Path) -> Result<HashSet<(Platform, String)>> {
    let items = parser::parse_items(&data_dir.join(META_FILE))?;
    Ok(items
        .into_iter()
        .map(|item| (item.platform, item.origin_id))
        .collect())
}

/// Download collected posts and append them to the metadata log
async fn store_posts(
    data_dir: &Path,
    posts: Vec<ingest::CollectedPost>,
    known: &mut HashSet<(Platform, String)>,
) -> Result<usize> {
    let downloader = Downloader::new(data_dir.join("images"))?;
    let mut items: Vec<SourceItem> = Vec::new();

    for post in posts {
        let key = (post.platform, post.origin_id.clone());
        if known.contains(&key) {
            continue;
        }
        match downloader.fetch(&post.url).await {
            Ok(path) => {
                known.insert(key);
                items.push(post.into_source_item(path.display().to_string()));
            }
            Err(e) => {
                tracing::warn!("Skipping {}: download failed ({})", post.url, e);
            }
        }
    }

    parser::append_records(&data_dir.join(META_FILE), &items)?;
    Ok(items.len())
}

/// Handle the 'ingest-reddit' command
async fn handle_ingest_reddit(data_dir: &Path, subreddits: Vec<String>, limit: u32) -> Result<()> {
    let client = RedditClient::new(HTTP_TIMEOUT_SECS)?;
    let mut known = known_origins(data_dir)?;

    // A failing subreddit is logged and skipped inside fetch_new_all;
    // the remaining sources still get ingested.
    let results = client.fetch_new_all(&subreddits, limit).await;
    let fetched = results.len();

    let mut total = 0;
    for (subreddit, posts) in results {
        println!("r/{}: {} image posts found", subreddit.bold(), posts.len());
        let stored = store_posts(data_dir, posts, &mut known).await?;
        println!("  {} {} new items stored", "✓".green(), stored);
        total += stored;
    }

    println!(
        "{} Ingested {} new items from {} of {} subreddits",
        "✓".green(),
        total,
        fetched,
        subreddits.len()
    );
    Ok(())
}

/// Handle the 'ingest-pinterest' command
async fn handle_ingest_pinterest(
    data_dir: &Path,
    board_names: Vec<String>,
    limit: usize,
    privacy: Option<String>,
    access_token: Option<String>,
    app_id: Option<String>,
    app_secret: Option<String>,
    refresh_token: Option<String>,
) -> Result<()> {
    let token = match access_token {
        Some(token) => token,
        None => {
            let app_id = app_id.ok_or_else(|| anyhow!("PINTEREST_APP_ID is not set"))?;
            let app_secret = app_secret.ok_or_else(|| anyhow!("PINTEREST_APP_SECRET is not set"))?;
            let refresh_token =
                refresh_token.ok_or_else(|| anyhow!("PINTEREST_REFRESH_TOKEN is not set"))?;
            println!("Refreshing Pinterest access token...");
            PinterestClient::refresh_access_token(
                &app_id,
                &app_secret,
                &refresh_token,
                ingest::pinterest::DEFAULT_BASE_URL,
            )
            .await
            .context("Failed to refresh Pinterest access token")?
        }
    };

    let client = PinterestClient::new(token, HTTP_TIMEOUT_SECS)?;
    let mut known = known_origins(data_dir)?;

    let all_boards = client.list_boards(privacy.as_deref()).await?;
    let boards = if board_names.is_empty() {
        // No explicit boards: keep the ones whose name or description
        // looks fashion-related
        all_boards
            .into_iter()
            .filter(|b| b.relevance() > 0.0)
            .collect()
    } else {
        PinterestClient::find_boards(&all_boards, &board_names)
    };
    if boards.is_empty() {
        return Err(anyhow!("No matching Pinterest boards found"));
    }

    // A failing board is logged and skipped inside list_pins_all;
    // the remaining boards still get ingested.
    let results = client.list_pins_all(&boards, limit).await;
    let fetched = results.len();

    let mut total = 0;
    for (board, pins) in results {
        let posts: Vec<_> = pins
            .iter()
            .filter_map(|pin| PinterestClient::pin_to_post(pin, &board.name))
            .collect();
        println!("{}: {} image pins found", board.name.bold(), posts.len());

        let stored = store_posts(data_dir, posts, &mut known).await?;
        println!("  {} {} new items stored", "✓".green(), stored);
        total += stored;
    }

    println!(
        "{} Ingested {} new items from {} of {} boards",
        "✓".green(),
        total,
        fetched,
        boards.len()
    );
    Ok(())
}

/// Handle the 'embed' command
async fn handle_embed(data_dir: &Path, embed_addr: &str, batch_size: usize) -> Result<()> {
    let index = CatalogIndex::load_from_files(data_dir)?;
    let pending: Vec<_> = index
        .all_item_ids()
        .into_iter()
        .filter(|id| index.get_embedding(*id).is_none())
        .collect();
    if pending.is_empty() {
        println!("{} Nothing to embed, catalog is up to date", "✓".green());
        return Ok(());
    }
    println!("Embedding {} items...", pending.len());

    let mut client = EmbeddingClient::connect(embed_addr)
        .await
        .context("Failed to connect to embedding service")?;
    let tagger = StyleTagger::from_client(&mut client)
        .await
        .map_err(|e| anyhow!("Failed to embed style prompts: {}", e))?;

    let catalog_path = data_dir.join(CATALOG_FILE);
    let mut embedded = 0;
    for chunk in pending.chunks(batch_size.max(1)) {
        // Read image bytes, dropping items whose file went missing
        let mut ids = Vec::with_capacity(chunk.len());
        let mut images = Vec::with_capacity(chunk.len());
        for &id in chunk {
            let item = index
                .get_item(id)
                .ok_or_else(|| anyhow!("Item {} missing from catalog", id))?;
            match tokio::fs::read(&item.local_path).await {
                Ok(bytes) => {
                    ids.push(id);
                    images.push(bytes);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: cannot read image ({})", item.local_path, e);
                }
            }
        }
        if images.is_empty() {
            continue;
        }

        let vectors = client
            .embed_images(images)
            .await
            .map_err(|e| anyhow!("Embedding batch failed: {}", e))?;

        let records: Vec<EmbeddingRecord> = ids
            .into_iter()
            .zip(vectors)
            .map(|(item_id, mut vector)| {
                normalize(&mut vector);
                let (style, confidence) = tagger.tag(&vector);
                EmbeddingRecord {
                    item_id,
                    vector,
                    style,
                    confidence,
                }
            })
            .collect();
        parser::append_records(&catalog_path, &records)?;
        embedded += records.len();
        println!("  {} / {} embedded", embedded, pending.len());
    }

    println!("{} Embedded and tagged {} items", "✓".green(), embedded);
    Ok(())
}

/// Handle the 'trends' command
fn handle_trends(data_dir: &Path, span: u32, output: Option<PathBuf>) -> Result<()> {
    let index = CatalogIndex::load_from_files(data_dir)?;
    let report = TrendReport::compute(&index, span);

    let mut velocities: Vec<_> = report.latest_velocities().into_iter().collect();
    velocities.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    println!("{}", "Style velocities (latest day):".bold().blue());
    for (style, velocity) in &velocities {
        let arrow = if *velocity > 0.0 {
            "↑".green()
        } else if *velocity < 0.0 {
            "↓".red()
        } else {
            "→".normal()
        };
        println!("  {} {:<16} {:+.3}", arrow, style.label(), velocity);
    }

    let out_path = output.unwrap_or_else(|| data_dir.join(TRENDS_FILE));
    report.save(&out_path)?;
    println!("{} Report saved to {}", "✓".green(), out_path.display());
    Ok(())
}

/// Handle the 'recommend' command
async fn handle_recommend(
    data_dir: &Path,
    photo: Option<PathBuf>,
    style_names: Vec<String>,
    limit: usize,
    explain: bool,
    embed_addr: &str,
) -> Result<()> {
    let styles = style_names
        .iter()
        .map(|s| Style::from_str(s).map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;

    let start = Instant::now();
    let catalog = Arc::new(CatalogIndex::load_from_files(data_dir)?);
    let (items, embeddings) = catalog.counts();
    if embeddings == 0 {
        return Err(anyhow!(
            "Catalog has no embeddings yet, run `trend-recs embed` first"
        ));
    }
    println!(
        "{} Loaded catalog ({} items, {} embedded) in {:?}",
        "✓".green(),
        items,
        embeddings,
        start.elapsed()
    );

    let report = TrendReport::compute(&catalog, trends::DEFAULT_SPAN);
    let orchestrator = RecommendationOrchestrator::new(catalog, &report, embed_addr).await?;

    let photo_bytes = match photo {
        Some(path) => Some(
            tokio::fs::read(&path)
                .await
                .with_context(|| format!("Failed to read photo {}", path.display()))?,
        ),
        None => None,
    };

    let recommendations = orchestrator
        .get_recommendations(RecommendationRequest {
            photo: photo_bytes,
            styles,
            limit,
        })
        .await?;

    println!("{}", "Outfit recommendations:".bold().blue());
    for (rank, rec) in recommendations.iter().enumerate() {
        println!(
            "{}. [{}] {} - Score: {:.2}",
            (rank + 1).to_string().green(),
            rec.style.label(),
            rec.url,
            rec.score
        );
        println!("   Saved at: {}", rec.local_path);
        if explain {
            println!("   Explanation: {}", rec.explanation);
        }
    }
    Ok(())
}

/// Handle the 'styles' command
fn handle_styles(data_dir: &Path) -> Result<()> {
    let index = CatalogIndex::load_from_files(data_dir)?;
    let velocities = TrendReport::compute(&index, trends::DEFAULT_SPAN).latest_velocities();

    println!("{}", "Style categories:".bold().blue());
    println!(
        "  {:<16} {:>6} {:>10} {:>10}",
        "style".bold(),
        "items".bold(),
        "avg conf".bold(),
        "velocity".bold()
    );
    for style in Style::ALL {
        let (count, avg_confidence) = index
            .get_style_stats(style)
            .map(|s| (s.item_count, s.avg_confidence))
            .unwrap_or((0, 0.0));
        let velocity = velocities.get(&style).copied().unwrap_or(0.0);
        println!(
            "  {:<16} {:>6} {:>10.2} {:>+10.3}",
            style.label(),
            count,
            avg_confidence,
            velocity
        );
        println!("    prompt: \"{}\"", style.prompt());
    }
    Ok(())
}
