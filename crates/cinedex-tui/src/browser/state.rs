//! View-state controller for the movie browser.
//!
//! The controller owns the session state (page, category, page bound) and
//! the currently displayed content. Handlers never perform IO: they return
//! a [`CatalogCommand`] for the shell to execute, and results come back
//! through [`BrowserController::apply`].
//!
//! Every command carries a sequence number. Only the response to the most
//! recently issued command is applied; anything older is discarded, so a
//! slow response can never overwrite a newer view.

use cinedex_api::catalog::{Category, FetchError, MovieDetails, MovieSummary};

use super::location::Location;

/// Upper page bound used when none is configured.
pub const DEFAULT_TOTAL_PAGES: u32 = 500;

/// Pagination and category state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    /// Current page, always in `1..=total_pages`.
    pub current_page: u32,
    /// Constant upper page bound.
    pub total_pages: u32,
    /// Current list category.
    pub current_category: Category,
}

impl ViewState {
    /// Page 1 of `popular` with the given page bound (at least 1).
    #[must_use]
    pub fn new(total_pages: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: total_pages.max(1),
            current_category: Category::Popular,
        }
    }

    /// Whether the previous-page control is enabled.
    #[must_use]
    pub const fn can_go_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Whether the next-page control is enabled.
    #[must_use]
    pub const fn can_go_next(&self) -> bool {
        self.current_page < self.total_pages
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(DEFAULT_TOTAL_PAGES)
    }
}

/// Observable browser mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Paginated / categorized / searched results.
    List,
    /// A single movie; pagination and category menu are hidden.
    Detail,
}

/// User intent, already decoded from key presses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Initial load of an addressed view.
    Load(Location),
    /// Next page of the current category.
    NextPage,
    /// Previous page of the current category.
    PrevPage,
    /// Switch category (resets to page 1).
    SelectCategory(Category),
    /// Search submit with the raw input text.
    Search(String),
    /// Open a movie card.
    OpenMovie(u64),
    /// Leave the detail view.
    Back,
}

/// Catalog operation selected by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogRequest {
    /// `list_by_category(category, page)`.
    ListByCategory {
        /// Category to list.
        category: Category,
        /// Page to fetch.
        page: u32,
    },
    /// `search(query, page)`.
    Search {
        /// Trimmed, non-empty query.
        query: String,
        /// Page to fetch.
        page: u32,
    },
    /// `details(movie_id)`.
    Details {
        /// Addressed movie id.
        movie_id: String,
    },
}

impl CatalogRequest {
    /// Page shown in the page indicator once this request resolves.
    const fn indicator_page(&self) -> Option<u32> {
        match self {
            Self::ListByCategory { page, .. } | Self::Search { page, .. } => Some(*page),
            Self::Details { .. } => None,
        }
    }
}

/// A catalog request stamped with its sequence number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogCommand {
    /// Monotonic sequence number.
    pub seq: u64,
    /// Operation to run.
    pub request: CatalogRequest,
}

/// Result of running a [`CatalogRequest`].
#[derive(Debug)]
pub enum CatalogOutcome {
    /// Listing result (empty on failure).
    Movies(Vec<MovieSummary>),
    /// Details result.
    Details(Result<MovieDetails, FetchError>),
}

/// What the content area currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Nothing has resolved yet.
    Blank,
    /// A grid of movie cards (possibly empty).
    Movies(Vec<MovieSummary>),
    /// One movie's details.
    Details(MovieDetails),
    /// The details fetch failed.
    DetailsUnavailable {
        /// Requested id.
        movie_id: String,
        /// Failure description.
        reason: String,
    },
}

/// Saved position to return to from the detail view.
#[derive(Debug, Clone)]
struct HistoryEntry {
    location: Location,
    state: ViewState,
}

/// The view-state controller.
#[derive(Debug)]
#[allow(clippy::module_name_repetitions)]
pub struct BrowserController {
    state: ViewState,
    location: Location,
    history: Vec<HistoryEntry>,
    content: Content,
    page_indicator: u32,
    next_seq: u64,
    pending: Option<CatalogCommand>,
}

impl BrowserController {
    /// Creates a controller with the given initial state.
    #[must_use]
    pub fn new(state: ViewState) -> Self {
        Self {
            page_indicator: state.current_page,
            state,
            location: Location::list(),
            history: Vec::new(),
            content: Content::Blank,
            next_seq: 1,
            pending: None,
        }
    }

    /// Current pagination/category state.
    #[must_use]
    pub const fn state(&self) -> &ViewState {
        &self.state
    }

    /// Current addressed view.
    #[must_use]
    pub const fn location(&self) -> &Location {
        &self.location
    }

    /// Current mode, derived from the addressed view.
    #[must_use]
    pub fn mode(&self) -> Mode {
        if self.location.movie_id().is_some() {
            Mode::Detail
        } else {
            Mode::List
        }
    }

    /// Currently displayed content.
    #[must_use]
    pub const fn content(&self) -> &Content {
        &self.content
    }

    /// Page number shown in the page indicator.
    #[must_use]
    pub const fn page_indicator(&self) -> u32 {
        self.page_indicator
    }

    /// Whether a command is in flight.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether a back action is possible.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        !self.history.is_empty()
    }

    /// Dispatches an intent. Returns the catalog command to run, if any.
    pub fn handle(&mut self, intent: Intent) -> Option<CatalogCommand> {
        match intent {
            Intent::Load(location) => Some(self.load(location)),
            Intent::NextPage => self.next_page(),
            Intent::PrevPage => self.prev_page(),
            Intent::SelectCategory(category) => self.select_category(category),
            Intent::Search(query) => self.submit_search(&query),
            Intent::OpenMovie(movie_id) => self.open_movie(movie_id),
            Intent::Back => self.back(),
        }
    }

    /// Loads an addressed view: details for a movie id, otherwise the
    /// current category at the current page.
    pub fn load(&mut self, location: Location) -> CatalogCommand {
        self.location = location;
        let request = match self.location.movie_id() {
            Some(movie_id) => CatalogRequest::Details {
                movie_id: String::from(movie_id),
            },
            None => self.category_request(),
        };
        self.issue(request)
    }

    /// Advances one page if not at the upper bound.
    pub fn next_page(&mut self) -> Option<CatalogCommand> {
        if self.mode() != Mode::List || !self.state.can_go_next() {
            return None;
        }
        self.state.current_page = self.state.current_page.saturating_add(1);
        Some(self.issue(self.category_request()))
    }

    /// Goes back one page if not on page 1.
    pub fn prev_page(&mut self) -> Option<CatalogCommand> {
        if self.mode() != Mode::List || !self.state.can_go_prev() {
            return None;
        }
        self.state.current_page = self.state.current_page.saturating_sub(1);
        Some(self.issue(self.category_request()))
    }

    /// Switches category and resets to page 1.
    pub fn select_category(&mut self, category: Category) -> Option<CatalogCommand> {
        if self.mode() != Mode::List {
            return None;
        }
        self.state.current_category = category;
        self.state.current_page = 1;
        Some(self.issue(self.category_request()))
    }

    /// Submits a search. An empty (or blank) query refetches the current
    /// category at page 1 without touching the page state.
    ///
    /// Either way the indicator then reads page 1 while prev/next keep
    /// following `current_page`, so the next page action resumes the category.
    pub fn submit_search(&mut self, query: &str) -> Option<CatalogCommand> {
        if self.mode() != Mode::List {
            return None;
        }
        let query = query.trim();
        let request = if query.is_empty() {
            CatalogRequest::ListByCategory {
                category: self.state.current_category,
                page: 1,
            }
        } else {
            CatalogRequest::Search {
                query: String::from(query),
                page: 1,
            }
        };
        Some(self.issue(request))
    }

    /// Navigates to a movie's detail view, remembering the current position.
    pub fn open_movie(&mut self, movie_id: u64) -> Option<CatalogCommand> {
        if self.mode() != Mode::List {
            return None;
        }
        self.history.push(HistoryEntry {
            location: self.location.clone(),
            state: self.state,
        });
        Some(self.load(Location::movie(movie_id.to_string())))
    }

    /// Returns to the previous position and reloads it.
    pub fn back(&mut self) -> Option<CatalogCommand> {
        let entry = self.history.pop()?;
        self.state = entry.state;
        Some(self.load(entry.location))
    }

    /// Applies the outcome of command `seq`.
    ///
    /// Returns `false` (and changes nothing) when `seq` is not the latest
    /// issued command.
    pub fn apply(&mut self, seq: u64, outcome: CatalogOutcome) -> bool {
        let Some(pending) = self.pending.take_if(|p| p.seq == seq) else {
            tracing::debug!(
                seq,
                latest = self.next_seq.saturating_sub(1),
                "discarding stale catalog response"
            );
            return false;
        };

        if let Some(page) = pending.request.indicator_page() {
            self.page_indicator = page;
        }

        self.content = match outcome {
            CatalogOutcome::Movies(movies) => Content::Movies(movies),
            CatalogOutcome::Details(Ok(details)) => Content::Details(details),
            CatalogOutcome::Details(Err(e)) => {
                let movie_id = match pending.request {
                    CatalogRequest::Details { movie_id } => movie_id,
                    _ => String::new(),
                };
                tracing::warn!(movie_id = %movie_id, error = %e, "movie details unavailable");
                Content::DetailsUnavailable {
                    movie_id,
                    reason: e.to_string(),
                }
            }
        };
        true
    }

    /// Listing request for the current category and page.
    const fn category_request(&self) -> CatalogRequest {
        CatalogRequest::ListByCategory {
            category: self.state.current_category,
            page: self.state.current_page,
        }
    }

    /// Stamps a request with the next sequence number and marks it pending.
    fn issue(&mut self, request: CatalogRequest) -> CatalogCommand {
        let command = CatalogCommand {
            seq: self.next_seq,
            request,
        };
        self.next_seq = self.next_seq.saturating_add(1);
        self.pending = Some(command.clone());
        command
    }
}

impl Default for BrowserController {
    fn default() -> Self {
        Self::new(ViewState::default())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use cinedex_api::catalog::StatusCode;
    use tracing::subscriber::with_default;
    use tracing_mock::{expect, subscriber};

    use super::*;

    fn movie(id: u64, title: &str) -> MovieSummary {
        MovieSummary {
            id,
            title: String::from(title),
            poster_path: format!("/{id}.jpg"),
            overview: String::from("An overview."),
            release_date: String::from("1999-03-31"),
        }
    }

    fn details(id: u64) -> MovieDetails {
        MovieDetails {
            summary: movie(id, "The Matrix"),
            runtime: 136,
            genres: Vec::new(),
        }
    }

    fn list_request(category: Category, page: u32) -> CatalogRequest {
        CatalogRequest::ListByCategory { category, page }
    }

    /// Controller that has finished its initial list load.
    fn loaded(total_pages: u32) -> BrowserController {
        let mut controller = BrowserController::new(ViewState::new(total_pages));
        let command = controller.load(Location::list());
        assert!(controller.apply(command.seq, CatalogOutcome::Movies(vec![movie(1, "A")])));
        controller
    }

    #[test]
    fn test_initial_state() {
        // Arrange & Act
        let controller = BrowserController::default();

        // Assert
        assert_eq!(controller.state().current_page, 1);
        assert_eq!(controller.state().total_pages, DEFAULT_TOTAL_PAGES);
        assert_eq!(controller.state().current_category, Category::Popular);
        assert_eq!(controller.mode(), Mode::List);
        assert_eq!(controller.content(), &Content::Blank);
    }

    #[test]
    fn test_load_list_requests_current_category() {
        // Arrange
        let mut controller = BrowserController::default();

        // Act
        let command = controller.load(Location::list());

        // Assert
        assert_eq!(command.request, list_request(Category::Popular, 1));
        assert!(controller.is_loading());
    }

    #[test]
    fn test_load_with_movie_id_requests_details_only() {
        // Arrange
        let mut controller = BrowserController::default();

        // Act
        let command = controller.handle(Intent::Load(Location::from_query("?movieId=603")));

        // Assert
        assert_eq!(
            command.unwrap().request,
            CatalogRequest::Details {
                movie_id: String::from("603")
            }
        );
        assert_eq!(controller.mode(), Mode::Detail);

        // Pagination and category actions are inert in detail mode
        assert!(controller.handle(Intent::NextPage).is_none());
        assert!(controller.handle(Intent::PrevPage).is_none());
        assert!(
            controller
                .handle(Intent::SelectCategory(Category::Upcoming))
                .is_none()
        );
        assert!(controller.handle(Intent::Search(String::from("x"))).is_none());
    }

    #[test]
    fn test_top_rated_page_two_scenario() {
        // Arrange
        let mut controller = loaded(500);
        controller
            .handle(Intent::SelectCategory(Category::TopRated))
            .unwrap();

        // Act
        let command = controller.handle(Intent::NextPage).unwrap();
        let returned = vec![movie(278, "The Shawshank Redemption"), movie(238, "The Godfather")];
        let applied = controller.apply(command.seq, CatalogOutcome::Movies(returned.clone()));

        // Assert
        assert_eq!(command.request, list_request(Category::TopRated, 2));
        assert!(applied);
        assert_eq!(controller.state().current_page, 2);
        assert_eq!(controller.state().current_category, Category::TopRated);
        assert_eq!(controller.page_indicator(), 2);
        assert_eq!(controller.content(), &Content::Movies(returned));
    }

    #[test]
    fn test_prev_at_first_page_is_noop() {
        // Arrange
        let mut controller = loaded(500);

        // Act
        let command = controller.handle(Intent::PrevPage);

        // Assert
        assert!(command.is_none());
        assert_eq!(controller.state().current_page, 1);
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_next_at_last_page_is_noop() {
        // Arrange
        let mut controller = loaded(2);
        controller.handle(Intent::NextPage).unwrap();

        // Act
        let command = controller.handle(Intent::NextPage);

        // Assert
        assert!(command.is_none());
        assert_eq!(controller.state().current_page, 2);
        assert!(!controller.state().can_go_next());
        assert!(controller.state().can_go_prev());
    }

    #[test]
    fn test_page_stays_in_bounds_for_any_navigation_sequence() {
        // Arrange: deterministic pseudo-random walk
        let mut controller = loaded(5);
        let mut seed: u32 = 0x2545_f491;

        for _ in 0..500 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;

            // Act
            let intent = if seed % 3 == 0 {
                Intent::PrevPage
            } else {
                Intent::NextPage
            };
            controller.handle(intent);

            // Assert
            let state = controller.state();
            assert!((1..=state.total_pages).contains(&state.current_page));
            assert_eq!(state.can_go_prev(), state.current_page != 1);
            assert_eq!(state.can_go_next(), state.current_page != state.total_pages);
        }
    }

    #[test]
    fn test_category_switch_resets_page() {
        // Arrange
        let mut controller = loaded(500);
        for _ in 0..4 {
            controller.handle(Intent::NextPage).unwrap();
        }
        assert_eq!(controller.state().current_page, 5);

        // Act
        let command = controller
            .handle(Intent::SelectCategory(Category::NowPlaying))
            .unwrap();

        // Assert
        assert_eq!(command.request, list_request(Category::NowPlaying, 1));
        assert_eq!(controller.state().current_page, 1);
    }

    #[test]
    fn test_empty_search_refetches_category_page_one() {
        // Arrange
        let mut controller = loaded(500);
        controller
            .handle(Intent::SelectCategory(Category::Upcoming))
            .unwrap();

        // Act
        let command = controller.handle(Intent::Search(String::from("   "))).unwrap();

        // Assert
        assert_eq!(command.request, list_request(Category::Upcoming, 1));
    }

    #[test]
    fn test_empty_search_shows_page_one_but_keeps_prev_enabled() {
        // Arrange
        let mut controller = loaded(500);
        controller.handle(Intent::NextPage).unwrap();
        controller.handle(Intent::NextPage).unwrap();

        // Act
        let command = controller.handle(Intent::Search(String::new())).unwrap();
        controller.apply(command.seq, CatalogOutcome::Movies(vec![movie(1, "A")]));

        // Assert
        assert_eq!(controller.page_indicator(), 1);
        assert_eq!(controller.state().current_page, 3);
        assert!(controller.state().can_go_prev());
        let prev = controller.handle(Intent::PrevPage).unwrap();
        assert_eq!(prev.request, list_request(Category::Popular, 2));
    }

    #[test]
    fn test_search_keeps_page_state() {
        // Arrange
        let mut controller = loaded(500);
        controller.handle(Intent::NextPage).unwrap();
        controller.handle(Intent::NextPage).unwrap();

        // Act
        let command = controller
            .handle(Intent::Search(String::from("  matrix ")))
            .unwrap();
        controller.apply(command.seq, CatalogOutcome::Movies(vec![movie(603, "The Matrix")]));

        // Assert
        assert_eq!(
            command.request,
            CatalogRequest::Search {
                query: String::from("matrix"),
                page: 1
            }
        );
        assert_eq!(controller.state().current_page, 3);
        assert_eq!(controller.page_indicator(), 1);

        // Next page continues from the retained category state
        let next = controller.handle(Intent::NextPage).unwrap();
        assert_eq!(next.request, list_request(Category::Popular, 4));
    }

    #[test]
    fn test_stale_response_is_discarded() {
        // Arrange
        let mut controller = loaded(500);
        let first = controller.handle(Intent::NextPage).unwrap();
        let second = controller.handle(Intent::NextPage).unwrap();

        // Act: newer response lands first, then the older one
        let newer = vec![movie(3, "page three")];
        assert!(controller.apply(second.seq, CatalogOutcome::Movies(newer.clone())));
        let applied_stale = controller.apply(first.seq, CatalogOutcome::Movies(vec![movie(2, "x")]));

        // Assert
        assert!(!applied_stale);
        assert_eq!(controller.content(), &Content::Movies(newer));
        assert_eq!(controller.page_indicator(), 3);
    }

    #[test]
    fn test_older_response_is_discarded_while_newer_is_pending() {
        // Arrange
        let mut controller = loaded(500);
        let first = controller.handle(Intent::NextPage).unwrap();
        let _second = controller.handle(Intent::NextPage).unwrap();

        // Act
        let applied = controller.apply(first.seq, CatalogOutcome::Movies(Vec::new()));

        // Assert
        assert!(!applied);
        assert!(controller.is_loading());
        assert_eq!(controller.page_indicator(), 1);
    }

    #[test]
    fn test_stale_response_is_logged() {
        // Arrange
        let mut controller = loaded(500);
        let first = controller.handle(Intent::NextPage).unwrap();
        let second = controller.handle(Intent::NextPage).unwrap();
        controller.apply(second.seq, CatalogOutcome::Movies(Vec::new()));

        let (subscriber, handle) = subscriber::mock()
            .event(
                expect::event()
                    .at_level(tracing::Level::DEBUG)
                    .with_fields(expect::msg("discarding stale catalog response")),
            )
            .only()
            .run_with_handle();

        // Act
        with_default(subscriber, || {
            controller.apply(first.seq, CatalogOutcome::Movies(Vec::new()));
        });

        // Assert
        handle.assert_finished();
    }

    #[test]
    fn test_open_movie_and_back_restores_list_state() {
        // Arrange
        let mut controller = loaded(500);
        controller
            .handle(Intent::SelectCategory(Category::TopRated))
            .unwrap();
        controller.handle(Intent::NextPage).unwrap();

        // Act: open a card
        let open = controller.handle(Intent::OpenMovie(603)).unwrap();

        // Assert
        assert_eq!(
            open.request,
            CatalogRequest::Details {
                movie_id: String::from("603")
            }
        );
        assert_eq!(controller.mode(), Mode::Detail);
        assert_eq!(controller.location().to_query(), "?movieId=603");
        controller.apply(open.seq, CatalogOutcome::Details(Ok(details(603))));

        // Act: back
        let back = controller.handle(Intent::Back).unwrap();

        // Assert
        assert_eq!(controller.mode(), Mode::List);
        assert_eq!(back.request, list_request(Category::TopRated, 2));
        assert!(!controller.can_go_back());
    }

    #[test]
    fn test_back_without_history_is_noop() {
        // Arrange
        let mut controller = BrowserController::default();
        controller.load(Location::movie("603"));

        // Act & Assert
        assert!(controller.handle(Intent::Back).is_none());
        assert_eq!(controller.mode(), Mode::Detail);
    }

    #[test]
    fn test_details_success_is_shown() {
        // Arrange
        let mut controller = BrowserController::default();
        let command = controller.load(Location::movie("603"));

        // Act
        controller.apply(command.seq, CatalogOutcome::Details(Ok(details(603))));

        // Assert
        match controller.content() {
            Content::Details(d) => assert_eq!(d.summary.id, 603),
            other => panic!("unexpected content: {other:?}"),
        }
        assert!(!controller.is_loading());
    }

    #[test]
    fn test_details_failure_is_unavailable() {
        // Arrange
        let mut controller = BrowserController::default();
        let command = controller.load(Location::movie("abc"));
        let error = FetchError::Status {
            status: StatusCode::NOT_FOUND,
            message: String::from(
                "code=34, message=The resource you requested could not be found.",
            ),
        };

        // Act
        controller.apply(command.seq, CatalogOutcome::Details(Err(error)));

        // Assert
        match controller.content() {
            Content::DetailsUnavailable { movie_id, reason } => {
                assert_eq!(movie_id, "abc");
                assert!(reason.contains("HTTP 404"));
                assert!(reason.contains("could not be found"));
            }
            other => panic!("unexpected content: {other:?}"),
        }
    }
}
