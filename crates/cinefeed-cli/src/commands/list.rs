use cinefeed_core::{FeedUpdate, MovieFeed};
use cinefeed_models::MovieSummary;
use color_eyre::{Report, Result};
use comfy_table::{Cell, CellAlignment, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::debug;

use super::spinner::Spinner;
use super::{movie, AppContext};
use crate::output::Output;

pub async fn run_popular(pages: u32, output: &Output) -> Result<()> {
    let ctx = AppContext::load(output)?;
    let feed = load_feed(&ctx, None, pages, output).await?;
    print_feed(&ctx, &feed, output);
    Ok(())
}

pub async fn run_search(term: &str, pages: u32, open: bool, output: &Output) -> Result<()> {
    if term.trim().is_empty() {
        debug!("Empty search term, nothing to do");
        return Ok(());
    }

    let ctx = AppContext::load(output)?;
    let feed = load_feed(&ctx, Some(term), pages, output).await?;

    if open {
        if let [only] = feed.results() {
            let detail = ctx.cache.get_or_fetch(only.id).await;
            movie::print_details(&[detail], output);
            return Ok(());
        }
        debug!(results = feed.results().len(), "Search did not yield exactly one movie, listing instead");
    }

    print_feed(&ctx, &feed, output);
    Ok(())
}

/// Load up to `pages` pages of the query into a fresh feed.
async fn load_feed(ctx: &AppContext, term: Option<&str>, pages: u32, output: &Output) -> Result<MovieFeed> {
    let mut feed = MovieFeed::new();
    feed.begin(term);
    let feed = Mutex::new(feed);

    let spinner = Spinner::start(describe_query(term), output.is_quiet());
    loop {
        let loaded = feed.lock().await.pages_loaded();
        if loaded >= pages {
            break;
        }
        spinner.set_message(format!("{} (page {})", describe_query(term), loaded + 1));

        match ctx.lister.load_next(&feed).await {
            Ok(Some(FeedUpdate::Appended(_))) => {}
            Ok(Some(update)) => {
                debug!(?update, "Feed stopped advancing");
                break;
            }
            Ok(None) => break,
            Err(failure) => {
                spinner.finish();
                return Err(Report::new(failure));
            }
        }
    }
    spinner.finish();

    Ok(feed.into_inner())
}

fn describe_query(term: Option<&str>) -> String {
    match term {
        Some(term) => format!("Searching for \"{}\"", term),
        None => "Loading popular movies".to_string(),
    }
}

fn summaries(ctx: &AppContext, feed: &MovieFeed) -> Vec<MovieSummary> {
    feed.results()
        .iter()
        .map(|raw| MovieSummary::from_raw(raw, &ctx.config.tmdb.image_base_url, &ctx.config.images.poster_size))
        .collect()
}

fn print_feed(ctx: &AppContext, feed: &MovieFeed, output: &Output) {
    let movies = summaries(ctx, feed);

    if !output.is_human() {
        output.json(&json!({
            "term": feed.term(),
            "pages_loaded": feed.pages_loaded(),
            "has_more": feed.has_more(),
            "results": movies,
        }));
        return;
    }
    if output.is_quiet() {
        return;
    }

    if movies.is_empty() {
        match feed.term() {
            Some(term) => output.info(format!("No movies found for \"{}\"", term)),
            None => output.info("No popular movies returned"),
        }
        return;
    }

    let heading = match feed.term() {
        Some(term) => format!("Results for \"{}\"", term),
        None => "Popular movies".to_string(),
    };
    println!("\n{}", heading.bright_cyan().bold());
    println!("{}", summary_table(&movies));
    if feed.has_more() {
        println!(
            "{}",
            format!("Showing {} pages; use --pages for more", feed.pages_loaded()).dimmed()
        );
    }
}

fn summary_table(movies: &[MovieSummary]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("ID").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Title").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Year").add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Rating").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for movie in movies {
        table.add_row(summary_row(movie));
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn summary_row(movie: &MovieSummary) -> Vec<Cell> {
    vec![
        Cell::new(movie.id).set_alignment(CellAlignment::Right),
        Cell::new(&movie.title),
        Cell::new(movie.year.map(|y| y.to_string()).unwrap_or_default()),
        Cell::new(format!("{} {:.1}", movie.stars, movie.rating)).fg(comfy_table::Color::Yellow),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_query() {
        assert_eq!(describe_query(None), "Loading popular movies");
        assert_eq!(describe_query(Some("alien")), "Searching for \"alien\"");
    }

    #[test]
    fn test_summary_table_lists_every_movie() {
        let raw: cinefeed_models::RawMovie = serde_json::from_value(json!({
            "id": 603,
            "title": "The Matrix",
            "vote_average": 8.2,
            "release_date": "1999-03-30"
        }))
        .unwrap();
        let movie = MovieSummary::from_raw(&raw, "https://image.tmdb.org/t/p/", "w500");

        let rendered = summary_table(&[movie]).to_string();
        assert!(rendered.contains("The Matrix"));
        assert!(rendered.contains("1999"));
        assert!(rendered.contains("★★★★☆ 8.2"));
    }
}
