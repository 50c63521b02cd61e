//! Pure view: turns the controller model into a [`ViewDescription`].
//!
//! Nothing here touches the terminal. Hidden regions are `None` so the
//! reconciler can skip them.

use cinedex_api::catalog::{Category, MovieDetails, MovieSummary, poster_url};

use super::state::{BrowserController, Content, Mode};

/// Number of overview characters shown on a card.
const EXCERPT_CHARS: usize = 100;

/// Everything the reconciler needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewDescription {
    /// Category menu; hidden in detail mode.
    pub category_menu: Option<CategoryMenuView>,
    /// Pagination controls; hidden in detail mode.
    pub pagination: Option<PaginationView>,
    /// Main content area.
    pub content: ContentView,
    /// Whether a request is in flight.
    pub loading: bool,
    /// Whether the back control is available.
    pub can_go_back: bool,
}

/// Category menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryMenuView {
    /// Menu label, follows the selected category.
    pub label: &'static str,
    /// Selected category.
    pub selected: Category,
}

/// Pagination controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationView {
    /// Page indicator text.
    pub page_label: String,
    /// Previous-page button enabled.
    pub prev_enabled: bool,
    /// Next-page button enabled.
    pub next_enabled: bool,
}

/// Main content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentView {
    /// Nothing resolved yet.
    Blank,
    /// Movie cards (possibly none).
    Grid(Vec<CardView>),
    /// One movie.
    Detail(DetailView),
    /// Details could not be fetched.
    Unavailable {
        /// Message to show.
        message: String,
    },
}

/// One movie card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    /// Movie id, used when the card is opened.
    pub movie_id: u64,
    /// Title.
    pub title: String,
    /// Poster image URL.
    pub poster_url: Option<String>,
    /// Truncated overview.
    pub excerpt: String,
    /// Release footer ("Out in: ...").
    pub footer: String,
}

/// Detail panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailView {
    /// Movie id.
    pub movie_id: u64,
    /// Title.
    pub title: String,
    /// Poster image URL.
    pub poster_url: Option<String>,
    /// Full overview.
    pub overview: String,
    /// Release line.
    pub release: String,
    /// Runtime line ("{n} minutes").
    pub runtime: String,
    /// Genre names joined with ", ".
    pub genres: String,
}

/// Renders the current model.
#[must_use]
pub fn render(controller: &BrowserController) -> ViewDescription {
    let (category_menu, pagination) = match controller.mode() {
        Mode::List => {
            let state = controller.state();
            (
                Some(CategoryMenuView {
                    label: state.current_category.label(),
                    selected: state.current_category,
                }),
                Some(PaginationView {
                    page_label: format!("Page {}", controller.page_indicator()),
                    prev_enabled: state.can_go_prev(),
                    next_enabled: state.can_go_next(),
                }),
            )
        }
        Mode::Detail => (None, None),
    };

    let content = match controller.content() {
        Content::Blank => ContentView::Blank,
        Content::Movies(movies) => ContentView::Grid(movies.iter().map(card).collect()),
        Content::Details(details) => ContentView::Detail(detail(details)),
        Content::DetailsUnavailable { movie_id, reason } => ContentView::Unavailable {
            message: format!("Movie {movie_id} is unavailable: {reason}"),
        },
    };

    ViewDescription {
        category_menu,
        pagination,
        content,
        loading: controller.is_loading(),
        can_go_back: controller.can_go_back(),
    }
}

/// First [`EXCERPT_CHARS`] characters of the overview followed by "...".
#[must_use]
pub fn excerpt(overview: &str) -> String {
    let mut text: String = overview.chars().take(EXCERPT_CHARS).collect();
    text.push_str("...");
    text
}

fn release_line(release_date: &str) -> String {
    format!("Out in: {release_date}")
}

fn card(movie: &MovieSummary) -> CardView {
    CardView {
        movie_id: movie.id,
        title: movie.title.clone(),
        poster_url: poster_url(&movie.poster_path),
        excerpt: excerpt(&movie.overview),
        footer: release_line(&movie.release_date),
    }
}

fn detail(details: &MovieDetails) -> DetailView {
    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    DetailView {
        movie_id: details.summary.id,
        title: details.summary.title.clone(),
        poster_url: poster_url(&details.summary.poster_path),
        overview: details.summary.overview.clone(),
        release: release_line(&details.summary.release_date),
        runtime: format!("{} minutes", details.runtime),
        genres: genres.join(", "),
    }
}
