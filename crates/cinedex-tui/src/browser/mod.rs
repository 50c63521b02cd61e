//! Movie browser TUI main loop.
//!
//! Key presses become [`Intent`]s for the [`BrowserController`]; the
//! catalog commands it returns run as spawned tasks and their outcomes
//! come back over a channel, so the UI keeps handling keys while a
//! request is in flight.

/// Addressed view.
pub mod location;
mod shell;
/// View-state controller.
pub mod state;
mod ui;
/// Pure view.
pub mod view;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use cinedex_api::catalog::{CatalogApi, Category, movie_page_url};

use self::location::Location;
use self::shell::{InputMode, ShellState};
use self::state::{
    BrowserController, CatalogCommand, CatalogOutcome, CatalogRequest, Content, Intent, Mode,
    ViewState,
};

/// Redraw interval while waiting for input or responses.
const TICK: Duration = Duration::from_millis(100);

/// Outcome of a catalog command, tagged with its sequence number.
type Response = (u64, CatalogOutcome);

/// What a key press asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
enum KeyAction {
    /// Nothing beyond local shell state changes.
    None,
    /// Leave the browser.
    Quit,
    /// Hand an intent to the controller.
    Dispatch(Intent),
}

/// Runs the movie browser TUI until the user quits.
///
/// # Errors
///
/// Returns an error if terminal setup or event handling fails.
#[allow(clippy::module_name_repetitions)]
pub async fn run_browser<C>(client: Arc<C>, initial: Location, total_pages: u32) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
{
    tracing::info!(location = %initial.to_query(), total_pages, "starting movie browser");

    enable_raw_mode().context("failed to enable raw mode")?;
    let mut stdout = io::stdout();
    crossterm::execute!(stdout, EnterAlternateScreen)
        .context("failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("failed to create terminal")?;

    let controller = BrowserController::new(ViewState::new(total_pages));
    let result = run_event_loop(&mut terminal, controller, &client, initial).await;

    // Cleanup (always attempt even if event loop failed)
    disable_raw_mode().context("failed to disable raw mode")?;
    crossterm::execute!(io::stdout(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;

    result
}

/// Runs one catalog request against the client.
///
/// Listing failures are already swallowed by the client; details failures
/// are carried in the outcome.
pub async fn execute<C>(client: &C, request: CatalogRequest) -> CatalogOutcome
where
    C: CatalogApi + Sync,
{
    match request {
        CatalogRequest::ListByCategory { category, page } => {
            CatalogOutcome::Movies(client.list_by_category(category, page).await)
        }
        CatalogRequest::Search { query, page } => {
            CatalogOutcome::Movies(client.search(&query, page).await)
        }
        CatalogRequest::Details { movie_id } => {
            CatalogOutcome::Details(client.details(&movie_id).await)
        }
    }
}

/// Main event loop.
async fn run_event_loop<C>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut controller: BrowserController,
    client: &Arc<C>,
    initial: Location,
) -> Result<()>
where
    C: CatalogApi + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel::<Response>();
    let mut shell = ShellState::new();

    if let Some(command) = controller.handle(Intent::Load(initial)) {
        dispatch(client, command, &tx);
    }

    loop {
        let view = view::render(&controller);
        terminal
            .draw(|frame| ui::draw(frame, &view, &mut shell))
            .context("failed to draw TUI")?;

        while event::poll(Duration::ZERO).context("failed to poll events")? {
            if let Event::Key(key) = event::read().context("failed to read event")?
                && key.kind == KeyEventKind::Press
            {
                match handle_key(&controller, &mut shell, key) {
                    KeyAction::Quit => return Ok(()),
                    KeyAction::Dispatch(intent) => {
                        if let Some(command) = controller.handle(intent) {
                            dispatch(client, command, &tx);
                        }
                    }
                    KeyAction::None => {}
                }
            }
        }

        tokio::select! {
            Some((seq, outcome)) = rx.recv() => {
                if controller.apply(seq, outcome) {
                    shell.reset_selection(card_count(&controller));
                }
            }
            () = tokio::time::sleep(TICK) => {}
        }
    }
}

/// Spawns a catalog command; its outcome is sent back over `tx`.
fn dispatch<C>(client: &Arc<C>, command: CatalogCommand, tx: &mpsc::UnboundedSender<Response>)
where
    C: CatalogApi + Send + Sync + 'static,
{
    tracing::debug!(seq = command.seq, request = ?command.request, "dispatching catalog request");
    let client = Arc::clone(client);
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = execute(client.as_ref(), command.request).await;
        // A closed receiver means the browser has already exited.
        let _ = tx.send((command.seq, outcome));
    });
}

fn card_count(controller: &BrowserController) -> usize {
    match controller.content() {
        Content::Movies(movies) => movies.len(),
        _ => 0,
    }
}

/// Maps a key press to an action, updating shell-local state.
fn handle_key(controller: &BrowserController, shell: &mut ShellState, key: KeyEvent) -> KeyAction {
    match shell.input_mode {
        InputMode::Search => handle_search_input(shell, key.code),
        InputMode::Normal => handle_normal_input(controller, shell, key.code, key.modifiers),
    }
}

/// Handles key input in search mode.
fn handle_search_input(shell: &mut ShellState, key: KeyCode) -> KeyAction {
    match key {
        KeyCode::Esc => shell.cancel_search(),
        KeyCode::Enter => return KeyAction::Dispatch(Intent::Search(shell.submit_search())),
        KeyCode::Backspace => {
            shell.search.pop();
        }
        KeyCode::Char(c) => shell.search.push(c),
        _ => {}
    }
    KeyAction::None
}

/// Handles key input in normal mode.
fn handle_normal_input(
    controller: &BrowserController,
    shell: &mut ShellState,
    key: KeyCode,
    modifiers: KeyModifiers,
) -> KeyAction {
    let intent = match key {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            return KeyAction::Quit;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            shell.move_up();
            return KeyAction::None;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            shell.move_down();
            return KeyAction::None;
        }
        KeyCode::Char('/') => {
            if controller.mode() == Mode::List {
                shell.start_search();
            }
            return KeyAction::None;
        }
        KeyCode::Char('o') => {
            open_movie_page(controller, shell);
            return KeyAction::None;
        }
        KeyCode::Right | KeyCode::Char('n' | 'l') => Intent::NextPage,
        KeyCode::Left | KeyCode::Char('p' | 'h') => Intent::PrevPage,
        KeyCode::Char('c') => Intent::SelectCategory(next_category(
            controller.state().current_category,
        )),
        KeyCode::Char(c @ '1'..='4') => {
            let Some(category) = c
                .to_digit(10)
                .and_then(|d| usize::try_from(d).ok())
                .and_then(|d| d.checked_sub(1))
                .and_then(|idx| Category::ALL.get(idx))
            else {
                return KeyAction::None;
            };
            Intent::SelectCategory(*category)
        }
        KeyCode::Enter => {
            let Some(movie_id) = selected_movie_id(controller, shell) else {
                return KeyAction::None;
            };
            Intent::OpenMovie(movie_id)
        }
        KeyCode::Char('b') | KeyCode::Backspace | KeyCode::Esc => Intent::Back,
        _ => return KeyAction::None,
    };
    KeyAction::Dispatch(intent)
}

/// Category after `current` in menu order, wrapping around.
fn next_category(current: Category) -> Category {
    let idx = Category::ALL
        .iter()
        .position(|c| *c == current)
        .map_or(0, |i| i.saturating_add(1));
    Category::ALL
        .get(idx)
        .copied()
        .unwrap_or(Category::Popular)
}

/// Movie id of the selected card in the grid.
fn selected_movie_id(controller: &BrowserController, shell: &ShellState) -> Option<u64> {
    match controller.content() {
        Content::Movies(movies) => shell
            .selected()
            .and_then(|idx| movies.get(idx))
            .map(|m| m.id),
        _ => None,
    }
}

/// Opens the TMDB page for the shown movie or the selected card.
fn open_movie_page(controller: &BrowserController, shell: &ShellState) {
    let movie_id = match controller.content() {
        Content::Details(details) => Some(details.summary.id),
        _ => selected_movie_id(controller, shell),
    };
    let Some(movie_id) = movie_id else {
        return;
    };
    let url = movie_page_url(movie_id);
    if let Err(e) = open::that(&url) {
        tracing::warn!(url = %url, error = %e, "failed to open movie page");
    }
}
