use ratatui::Frame;

use crate::{
    ui::{
        charting::render_progress_graph, render_game, render_instructions, render_menu,
        render_progress,
    },
    App, AppState,
};

/// A UI Screen boundary: responsible for rendering one app state
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame);
}

pub struct MenuScreen;

impl Screen for MenuScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_menu(app, f);
    }
}

pub struct InstructionsScreen;

impl Screen for InstructionsScreen {
    fn render(&self, _app: &mut App, f: &mut Frame) {
        render_instructions(f);
    }
}

/// Practice and real games share one screen; the session mode decides the
/// controls shown
pub struct GameScreen;

impl Screen for GameScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_game(app, f);
    }
}

/// Progress list - scrolling is clamped here
pub struct ProgressScreen;

impl Screen for ProgressScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_progress(app, f);
    }
}

pub struct GraphScreen;

impl Screen for GraphScreen {
    fn render(&self, app: &mut App, f: &mut Frame) {
        render_progress_graph(app, f);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: &AppState) -> Box<dyn Screen> {
    match state {
        AppState::Menu => Box::new(MenuScreen),
        AppState::Instructions => Box::new(InstructionsScreen),
        AppState::Playing => Box::new(GameScreen),
        AppState::Progress => Box::new(ProgressScreen),
        AppState::Graph => Box::new(GraphScreen),
    }
}
