use std::collections::HashMap;

use cinefeed_models::{Detail, MovieDetail, MovieId, StarRating};
use color_eyre::Result;
use comfy_table::{Cell, Table};
use futures::future::join_all;
use owo_colors::OwoColorize;
use serde_json::json;

use super::spinner::Spinner;
use super::AppContext;
use crate::output::Output;

/// Fetch detail records for `ids` concurrently. Each distinct id is fetched
/// once; output follows the order given.
pub async fn run_movie(ids: &[MovieId], output: &Output) -> Result<()> {
    let ctx = AppContext::load(output)?;

    let mut unique = ids.to_vec();
    unique.sort_unstable();
    unique.dedup();

    let spinner = Spinner::start(format!("Fetching {} movie(s)", unique.len()), output.is_quiet());
    let fetched = join_all(unique.iter().map(|&id| ctx.cache.get_or_fetch(id))).await;
    spinner.finish();

    let by_id: HashMap<MovieId, Detail> = unique.into_iter().zip(fetched).collect();
    let details: Vec<Detail> = ids.iter().filter_map(|id| by_id.get(id).cloned()).collect();

    for detail in details.iter().filter(|d| d.is_fallback()) {
        output.warn(format!("Movie {}: {}", detail.movie().id, detail.movie().overview));
    }

    print_details(&details, output);
    Ok(())
}

pub fn print_details(details: &[Detail], output: &Output) {
    if !output.is_human() {
        let data = match details {
            [single] => json!(single),
            _ => json!(details),
        };
        output.json(&data);
        return;
    }
    if output.is_quiet() {
        return;
    }

    for detail in details {
        print_detail(detail.movie());
    }
}

fn print_detail(movie: &MovieDetail) {
    let year = movie.release_year().map(|y| format!(" ({})", y)).unwrap_or_default();
    println!("\n{}{}", movie.title.bright_cyan().bold(), year.dimmed());
    println!("{}", facts_table(movie));
    println!("{}", movie.overview);

    if !movie.cast.is_empty() {
        println!("{}", cast_table(movie));
    }
}

fn stars_for(rating: f64) -> StarRating {
    // `rating` is already on the 0-5 scale
    StarRating::from_vote_average(rating * 2.0)
}

fn facts_table(movie: &MovieDetail) -> Table {
    let mut table = Table::new();
    let rows = [
        ("ID", movie.id.to_string()),
        ("Rating", format!("{} {:.1}/5", stars_for(movie.rating), movie.rating)),
        ("Released", movie.release_date.clone().unwrap_or_default()),
        ("Runtime", movie.runtime.clone()),
        ("Director", movie.director.clone()),
        ("Genres", movie.genres.join(", ")),
        ("Certification", movie.certification.clone()),
        ("Status", movie.status.clone()),
        ("Budget", movie.budget.clone()),
        ("Revenue", movie.revenue.clone()),
        ("Trailer", movie.trailer.clone().unwrap_or_else(|| "-".to_string())),
        ("Poster", movie.poster_path.clone()),
    ];
    for (label, value) in rows {
        table.add_row(vec![
            Cell::new(label).add_attribute(comfy_table::Attribute::Bold),
            Cell::new(value),
        ]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

fn cast_table(movie: &MovieDetail) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new("Cast").fg(comfy_table::Color::Cyan).add_attribute(comfy_table::Attribute::Bold),
        Cell::new("Character").add_attribute(comfy_table::Attribute::Bold),
    ]);
    for entry in &movie.cast {
        table.add_row(vec![Cell::new(&entry.name), Cell::new(&entry.character)]);
    }
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinefeed_sources::Normalizer;

    fn fight_club() -> MovieDetail {
        Normalizer::default().normalize_value(
            550,
            json!({
                "id": 550,
                "title": "Fight Club",
                "vote_average": 8.4,
                "runtime": 139,
                "budget": 63_000_000,
                "release_date": "1999-10-15",
                "credits": {
                    "crew": [{"job": "Director", "name": "David Fincher"}],
                    "cast": [{"id": 819, "name": "Edward Norton", "character": "The Narrator"}]
                }
            }),
        )
    }

    #[test]
    fn test_facts_table_shows_normalized_fields() {
        let rendered = facts_table(&fight_club()).to_string();
        assert!(rendered.contains("David Fincher"));
        assert!(rendered.contains("2h 19m"));
        assert!(rendered.contains("$63.0M"));
        assert!(rendered.contains("★★★★☆ 4.2/5"));
    }

    #[test]
    fn test_cast_table_lists_characters() {
        let rendered = cast_table(&fight_club()).to_string();
        assert!(rendered.contains("Edward Norton"));
        assert!(rendered.contains("The Narrator"));
    }

    #[test]
    fn test_stars_use_five_point_scale() {
        assert_eq!(stars_for(4.5).to_string(), "★★★★½");
        assert_eq!(stars_for(0.0).to_string(), "☆☆☆☆☆");
    }
}
