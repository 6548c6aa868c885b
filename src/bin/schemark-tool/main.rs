use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use spdlog::{info, warn};

use schemark::config::Config;
use schemark::content::parser::parse_markdown;
use schemark::logger::configure_logger;
use schemark::paginator::Paginator;
use schemark::post::Post;
use schemark::post_store::PostStore;
use schemark::seo::generate_all;
use schemark::view::rss_renderer::RssChannel;

use crate::config::open_config;

mod config;

const CFG_FILE_NAME: &str = "schemark.toml";
const DEFAULT_PAGE_SIZE: u32 = 10;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config path
    #[arg(short, long)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List post summaries, newest first
    List {
        /// Only posts of this category
        #[arg(short, long)]
        category: Option<String>,

        /// Page number, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Print a post as content nodes
    Show {
        slug: String,
    },
    /// Print the JSON-LD documents of a post
    Schema {
        slug: String,
    },
    /// Print posts related to a post
    Related {
        slug: String,

        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },
    /// Print all categories
    Categories,
    /// Print the author directory
    Authors,
    /// Print the RSS feed
    Feed,
}

#[derive(Serialize)]
struct PostView<'a> {
    post: &'a Post,
    nodes: Vec<schemark::content::ContentNode>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn load_post(store: &PostStore, slug: &str) -> Result<Post> {
    match store.get_by_slug(slug) {
        Some(post) => Ok(post),
        None => bail!("Post not found: {}", slug),
    }
}

fn page_size(config: &Config) -> usize {
    config.feed.as_ref().map_or(DEFAULT_PAGE_SIZE, |feed| feed.page_size) as usize
}

fn run(command: Command, config: &Config) -> Result<()> {
    let store = PostStore::new(&config.paths.content_dir);

    match command {
        Command::List { category, page } => {
            let posts = match category {
                Some(category) => store.get_by_category(&category),
                None => store.list_all(),
            };
            let paginator = Paginator::from(&posts, page_size(config));
            let page = paginator.page(page).map_err(anyhow::Error::msg)?;
            print_json(&page)
        }
        Command::Show { slug } => {
            let post = load_post(&store, &slug)?;
            let nodes = parse_markdown(post.content_str(), config.parser);
            print_json(&PostView { post: &post, nodes })
        }
        Command::Schema { slug } => {
            let post = load_post(&store, &slug)?;
            print_json(&generate_all(&post, &config.site))
        }
        Command::Related { slug, limit } => print_json(&store.get_related(&slug, limit)),
        Command::Categories => print_json(&store.get_all_categories()),
        Command::Authors => print_json(&store.get_authors()),
        Command::Feed => {
            let (title, description) = match config.feed {
                Some(ref feed) => (feed.title.as_str(), feed.description.as_str()),
                None => (config.site.name.as_str(), ""),
            };
            let channel = RssChannel {
                ch_title: title,
                ch_desc: description,
                site: &config.site,
            };
            let mut posts = store.list_all();
            posts.truncate(page_size(config));
            let xml = channel.render(&posts).context("Could not render the feed")?;
            println!("{}", String::from_utf8(xml)?);
            Ok(())
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config_path = args.config_path.map(PathBuf::from);

    let config = open_config(config_path)?;

    if let Err(err) = configure_logger(&config) {
        warn!("Error creating logger sinks. Using console instead. Desc={}", err);
    }
    info!("Content directory is {}", config.paths.content_dir.display());

    run(args.command, &config)
}
