//! Plain-text views of the controller state.

use crate::controller::ViewState;
use crate::models::Language;

pub mod cards;
pub mod stars;

pub use cards::{movie_card, movie_list};
pub use stars::StarRating;

const LOADING: &str = "Loading recommendations...\n";

/// Shown while a recommendation request is in flight
pub fn loading_view() -> &'static str {
    LOADING
}

/// Loading/error line plus the result cards
pub fn results_view(view: &ViewState) -> String {
    if view.loading {
        return LOADING.to_string();
    }
    if let Some(error) = &view.error {
        return format!("Error: {}\n", error);
    }
    if view.results.is_empty() {
        return "No recommendations yet. Type a title and run /recommend.\n".to_string();
    }

    view.results
        .iter()
        .enumerate()
        .map(|(i, movie)| movie_card(Some(i + 1), movie))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn suggestions_view(view: &ViewState) -> String {
    if view.suggestions.is_empty() {
        return String::new();
    }
    if view.has_no_suggestions() {
        return format!("Suggestions: {}\n", view.suggestions[0]);
    }
    format!("Suggestions: {}\n", view.suggestions.join(" | "))
}

pub fn trending_view(view: &ViewState) -> String {
    let heading = format!("Trending ({})\n", view.language.display_name());
    if view.trending.is_empty() {
        return heading + "  nothing trending\n";
    }
    heading + &movie_list(&view.trending)
}

pub fn history_view(view: &ViewState) -> String {
    if view.history.is_empty() {
        return "Recently viewed\n  nothing yet\n".to_string();
    }
    "Recently viewed\n".to_string() + &movie_list(view.history.entries())
}

/// The language picker, current selection marked
pub fn languages_view(selected: Language) -> String {
    Language::ALL
        .iter()
        .map(|language| {
            let marker = if *language == selected { '*' } else { ' ' };
            format!("{} {} {}\n", marker, language.code(), language.display_name())
        })
        .collect()
}
