use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use movie_recommender::{
    cli::{Command, Section, HELP},
    config::Config,
    controller::ViewController,
    render,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout is the UI
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_recommender=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        api_base_url = %config.api_base_url,
        history_path = %config.history_path.display(),
        language = %config.default_language,
        "Starting movie recommender"
    );

    let controller =
        ViewController::from_config(&config).context("Failed to create HTTP client")?;
    controller.start().await;

    println!("🎬 Movie Recommender");
    let view = controller.snapshot().await;
    print!("{}", render::trending_view(&view));
    print!("{}", render::history_view(&view));
    println!("Type /help for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match Command::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        if !run_command(&controller, command).await {
            break;
        }
    }

    Ok(())
}

/// Executes one command; returns false when the user asked to quit
async fn run_command(controller: &ViewController, command: Command) -> bool {
    match command {
        Command::Input(text) => controller.on_input(&text).await,
        Command::Recommend => {
            if controller.snapshot().await.has_query() {
                print!("{}", render::loading_view());
                let _ = std::io::stdout().flush();
            }
            controller.get_recommendations().await;
            print!("{}", render::results_view(&controller.snapshot().await));
        }
        Command::Language(language) => {
            controller.select_language(language).await;
            print!("{}", render::trending_view(&controller.snapshot().await));
        }
        Command::Open(section, index) => {
            let view = controller.snapshot().await;
            let movies = match section {
                Section::Results => view.results.as_slice(),
                Section::Trending => view.trending.as_slice(),
                Section::History => view.history.entries(),
            };

            match movies.get(index - 1) {
                Some(movie) => {
                    print!("{}", render::movie_card(None, movie));
                    if !controller.record_click(movie.clone()).await {
                        println!("(not added to recently viewed: movie has no ID)");
                    }
                }
                None => println!("No entry {} in that list", index),
            }
        }
        Command::Show(section) => {
            let view = controller.snapshot().await;
            let rendered = match section {
                Section::Results => render::results_view(&view),
                Section::Trending => render::trending_view(&view),
                Section::History => render::history_view(&view),
            };
            print!("{}", rendered);
        }
        Command::Suggestions => {
            let view = controller.snapshot().await;
            let rendered = render::suggestions_view(&view);
            if rendered.is_empty() {
                println!("No suggestions");
            } else {
                print!("{}", rendered);
            }
        }
        Command::Languages => {
            print!("{}", render::languages_view(controller.snapshot().await.language));
        }
        Command::Help => print!("{}", HELP),
        Command::Quit => return false,
    }
    true
}
