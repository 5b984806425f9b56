use std::fmt::Write;

use crate::models::Movie;
use crate::render::stars::StarRating;

const NO_POSTER: &str = "No Poster";
const UNKNOWN_TITLE: &str = "Unknown";
const NO_OVERVIEW: &str = "No description available.";
const NO_GENRES: &str = "N/A";

/// Title line, falling back to a placeholder
pub fn title_of(movie: &Movie) -> &str {
    movie
        .title
        .as_deref()
        .filter(|title| !title.trim().is_empty())
        .unwrap_or(UNKNOWN_TITLE)
}

/// Multi-line card for a movie, numbered when `index` is given
pub fn movie_card(index: Option<usize>, movie: &Movie) -> String {
    let mut card = String::new();

    let heading = match index {
        Some(index) => format!("{}. {}", index, title_of(movie)),
        None => title_of(movie).to_string(),
    };
    let _ = writeln!(card, "{}", heading);
    let _ = writeln!(card, "   {}", StarRating::from_score(movie.vote_average));

    let genres = movie
        .genres
        .as_ref()
        .and_then(|genres| genres.joined())
        .unwrap_or_else(|| NO_GENRES.to_string());
    let _ = writeln!(card, "   Genres: {}", genres);

    let poster = movie
        .poster
        .as_deref()
        .filter(|poster| !poster.is_empty())
        .unwrap_or(NO_POSTER);
    let _ = writeln!(card, "   Poster: {}", poster);

    let overview = movie
        .overview
        .as_deref()
        .filter(|overview| !overview.trim().is_empty())
        .unwrap_or(NO_OVERVIEW);
    let _ = writeln!(card, "   {}", overview);

    if let Some(link) = movie.tmdb_link.as_deref().filter(|link| !link.is_empty()) {
        let _ = writeln!(card, "   View on TMDb: {}", link);
    }

    card
}

/// One line per movie: index, title and rating
pub fn movie_list(movies: &[Movie]) -> String {
    movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            format!(
                "{:>2}. {} ({})\n",
                i + 1,
                title_of(movie),
                StarRating::from_score(movie.vote_average).label
            )
        })
        .collect()
}
