//! SwipePedia - Swipe through random Wikipedia articles from your terminal
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use tokio::runtime::Runtime;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use swipepedia::api::{self, wikipedia::WikipediaClient};
use swipepedia::feed::{FeedBuffer, ensure_buffer};
use swipepedia::images::ImageChain;
use swipepedia::{Article, BookmarkSortOrder, Bookmarks, Config, Database, Language};

/// Width summaries are wrapped to on the command line
const WRAP_WIDTH: usize = 76;

fn main() -> Result<()> {
    // Initialize logging (RUST_LOG=debug for verbose output)
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match parse_args(std::env::args().skip(1).collect())? {
        Command::Run => swipepedia::app::run(),
        Command::Random { count, language } => block_on(random_cli(count, language)),
        Command::Article { title, language } => block_on(article_cli(title.as_deref(), language)),
        Command::Image { title } => block_on(image_cli(&title)),
        Command::Bookmarks { sort } => list_bookmarks(sort),
        Command::BookmarksClear => clear_bookmarks(),
        Command::Languages => {
            list_languages();
            Ok(())
        }
        Command::Help => {
            print_help();
            Ok(())
        }
        Command::Version => {
            print_version();
            Ok(())
        }
    }
}

fn block_on<F: Future<Output = Result<()>>>(future: F) -> Result<()> {
    Runtime::new()?.block_on(future)
}

/// CLI commands
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run,
    Random {
        count: usize,
        language: Option<Language>,
    },
    Article {
        title: Option<String>,
        language: Option<Language>,
    },
    Image {
        title: String,
    },
    Bookmarks {
        sort: Option<BookmarkSortOrder>,
    },
    BookmarksClear,
    Languages,
    Help,
    Version,
}

fn parse_args(args: Vec<String>) -> Result<Command> {
    let Some(first) = args.first() else {
        return Ok(Command::Run);
    };

    match first.as_str() {
        "-h" | "--help" | "help" => Ok(Command::Help),
        "-v" | "--version" | "version" => Ok(Command::Version),

        "random" => {
            let count = flag_value(&args, &["-n", "--count"])
                .map(|n| n.parse::<usize>().with_context(|| format!("Invalid count: {n}")))
                .transpose()?
                .unwrap_or(5);
            Ok(Command::Random {
                count,
                language: language_flag(&args)?,
            })
        }

        "article" => {
            let title = positional(&args).join(" ");
            Ok(Command::Article {
                title: (!title.is_empty()).then_some(title),
                language: language_flag(&args)?,
            })
        }

        "image" => {
            let title = positional(&args).join(" ");
            if title.is_empty() {
                return Err(anyhow::anyhow!("Missing article title"));
            }
            Ok(Command::Image { title })
        }

        "bookmarks" | "bm" => {
            if args.get(1).is_some_and(|a| a == "clear") {
                return Ok(Command::BookmarksClear);
            }
            let sort = flag_value(&args, &["--sort", "-s"])
                .map(|s| {
                    BookmarkSortOrder::from_str(s)
                        .ok_or_else(|| anyhow::anyhow!("Unknown sort order: {s} (use recent or alpha)"))
                })
                .transpose()?;
            Ok(Command::Bookmarks { sort })
        }

        "languages" | "langs" => Ok(Command::Languages),

        other => Err(anyhow::anyhow!(
            "Unknown command: {other}\nRun 'swipepedia --help' for usage"
        )),
    }
}

/// Value following the first of `names` in `args`
fn flag_value<'a>(args: &'a [String], names: &[&str]) -> Option<&'a str> {
    args.iter()
        .position(|a| names.contains(&a.as_str()))
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn language_flag(args: &[String]) -> Result<Option<Language>> {
    flag_value(args, &["--lang", "-l"])
        .map(|code| {
            Language::from_str(code).ok_or_else(|| {
                anyhow::anyhow!("Unknown language: {code}\nRun 'swipepedia languages' for the list")
            })
        })
        .transpose()
}

/// Words after the command that are not flags or flag values
fn positional(args: &[String]) -> Vec<&str> {
    let mut words = Vec::new();
    let mut iter = args.iter().skip(1);
    while let Some(arg) = iter.next() {
        if arg.starts_with('-') {
            iter.next();
        } else {
            words.push(arg.as_str());
        }
    }
    words
}

fn print_help() {
    let config_path = Config::default_path()
        .map_or_else(|_| "Unknown".to_string(), |p| p.display().to_string());

    println!(
        r#"{}
📚 SwipePedia - Swipe through random Wikipedia articles

USAGE:
    swipepedia                         Launch TUI
    swipepedia [COMMAND]

COMMANDS:
    random [OPTIONS]                   Print random articles
      Options:
        -n, --count <n>                Number of articles (default and max: 5)
        -l, --lang <code>              Content language (default: from config)

    article [title] [OPTIONS]          Print one article, ready to share
      Options:
        -l, --lang <code>              Content language
      Examples:
        swipepedia article "Alan Turing"
        swipepedia article --lang fr

    image <title>                      Find a picture for an article title

    bookmarks [OPTIONS]                List saved articles
      Options:
        -s, --sort <recent|alpha>      Sort order (default: from config)
    bookmarks clear                    Delete all saved articles

    languages                          List supported languages

OPTIONS:
    -h, --help                         Show this help message
    -v, --version                      Show version information

KEYBINDINGS (TUI):
    Cards
      l/→           Like
      h/←           Dislike
      b             Bookmark
      o             Open in browser
      r             Load more cards

    Bookmarks
      j/k           Move selection
      s             Toggle sort order
      d             Delete bookmark
      D             Clear all

    General
      Tab           Switch view
      t             Change theme
      L             Change language
      ?             Help

CONFIG:
    {}
"#,
        swipepedia::LOGO,
        config_path
    );
}

fn print_version() {
    println!("swipepedia {}", swipepedia::VERSION);
}

fn print_article(article: &Article, language: Language) {
    println!("\n{}", article.title);
    if !article.summary.is_empty() {
        for line in textwrap::wrap(&article.summary, WRAP_WIDTH) {
            println!("  {line}");
        }
    }
    println!("  🔗 {}", article.url(language));
}

async fn random_cli(count: usize, language: Option<Language>) -> Result<()> {
    let config = Config::load()?;
    let client = WikipediaClient::new(language.unwrap_or(config.language));

    // Deal one deck, the same way the TUI does
    let mut deck = FeedBuffer::new();
    ensure_buffer(&mut deck, &client).await;
    if let Some(error) = deck.last_error() {
        return Err(anyhow::anyhow!("{error}"));
    }

    let language = client.language();
    println!("{} Random articles", language.flag());
    println!("{}", "─".repeat(WRAP_WIDTH));
    for article in deck.articles().iter().take(count) {
        print_article(article, language);
    }

    Ok(())
}

async fn article_cli(title: Option<&str>, language: Option<Language>) -> Result<()> {
    let config = Config::load()?;
    let language = language.unwrap_or(config.language);
    let client = WikipediaClient::new(language);

    let article = match title {
        Some(title) => client
            .summary(title)
            .await
            .with_context(|| format!("Failed to fetch \"{title}\""))?,
        None => client
            .random_summary()
            .await
            .context("Failed to fetch a random article")?,
    };

    println!("{}", article.share_text(language));
    Ok(())
}

async fn image_cli(title: &str) -> Result<()> {
    let config = Config::load()?;
    let client = WikipediaClient::new(config.language);

    // The article's own thumbnail wins when the title resolves
    let article = match client.summary(title).await {
        Ok(article) => article,
        Err(e) => {
            tracing::info!("No article for \"{title}\" ({e}); searching by title only");
            Article::new(title, title, "", None)
        }
    };

    let chain = ImageChain::new(api::providers_from_config(&config));
    match chain.resolve(&article).await {
        Some(url) => println!("{url}"),
        None if chain.providers().is_empty() => {
            println!("No thumbnail for \"{title}\" and no image providers configured");
        }
        None => println!("No image found for \"{title}\""),
    }

    Ok(())
}

fn open_bookmarks() -> Result<Bookmarks> {
    let config = Config::load()?;
    let analytics = swipepedia::analytics::Analytics::open(config.analytics);
    Bookmarks::load(Database::open()?, analytics)
}

fn list_bookmarks(sort: Option<BookmarkSortOrder>) -> Result<()> {
    let config = Config::load()?;
    let bookmarks = open_bookmarks()?;

    if bookmarks.is_empty() {
        println!("No bookmarks yet.");
        println!("\nPress b on a card in the TUI to save it.");
        return Ok(());
    }

    let order = sort.unwrap_or(config.bookmark_sort);
    println!(
        "🔖 {} bookmarks ({})\n",
        bookmarks.len(),
        order.name().to_lowercase()
    );
    for article in bookmarks.sorted(order) {
        println!("  {}", article.title);
        println!("    {}", article.url(config.language));
    }

    Ok(())
}

fn clear_bookmarks() -> Result<()> {
    let mut bookmarks = open_bookmarks()?;
    let count = bookmarks.clear()?;
    println!("✓ Removed {count} bookmarks");
    Ok(())
}

fn list_languages() {
    println!("Supported languages:\n");
    for lang in Language::all() {
        println!(
            "  {}  {:<4}{:<14}{}",
            lang.flag(),
            lang.code(),
            lang.native_name(),
            lang.name()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Command> {
        parse_args(args.iter().map(ToString::to_string).collect())
    }

    #[test]
    fn test_no_args_runs_tui() {
        assert_eq!(parse(&[]).unwrap(), Command::Run);
    }

    #[test]
    fn test_random_flags() {
        assert_eq!(
            parse(&["random", "-n", "3", "--lang", "es"]).unwrap(),
            Command::Random {
                count: 3,
                language: Some(Language::Spanish)
            }
        );
        assert!(parse(&["random", "-n", "many"]).is_err());
        assert!(parse(&["random", "--lang", "xx"]).is_err());
    }

    #[test]
    fn test_article_title_joins_words() {
        assert_eq!(
            parse(&["article", "Alan", "Turing", "-l", "de"]).unwrap(),
            Command::Article {
                title: Some("Alan Turing".to_string()),
                language: Some(Language::German)
            }
        );
        assert_eq!(
            parse(&["article"]).unwrap(),
            Command::Article {
                title: None,
                language: None
            }
        );
    }

    #[test]
    fn test_bookmarks_commands() {
        assert_eq!(parse(&["bookmarks", "clear"]).unwrap(), Command::BookmarksClear);
        assert_eq!(
            parse(&["bm", "--sort", "alpha"]).unwrap(),
            Command::Bookmarks {
                sort: Some(BookmarkSortOrder::Alphabetical)
            }
        );
        assert!(parse(&["image"]).is_err());
        assert!(parse(&["frobnicate"]).is_err());
    }
}
