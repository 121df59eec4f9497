//! Main module of the scoreboard application using Yew.
//! Wires the board, the keyboard, fullscreen and the settings forms.

use log::{debug, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, KeyboardEvent};
use wrestling_scoreboard::keys::key_name;
use wrestling_scoreboard::{Board, Command, InputMode, Runtime, Settings};
use yew::prelude::*;

mod components;
mod config;
mod console;
mod dom;

use components::{render_board, render_overview, MatchConfigForm, TitleBar};
use config::*;
use dom::{AnimationFrames, BoardRefs, PerformanceClock};

// ──────────────────────────────────────────────────────────────────────────────
// Type aliases for better readability
type SharedBoard = Rc<RefCell<Option<Board>>>;
type SharedMode = Rc<RefCell<InputMode>>;

// ──────────────────────────────────────────────────────────────────────────────
// Helper functions

fn is_locked(board: &SharedBoard) -> bool {
    board
        .borrow()
        .as_ref()
        .map_or(false, |board| board.is_clock_running())
}

/// Moves the input mode after an overlay command.
fn switch_mode(mode: &SharedMode, command: Command, locked: bool) {
    let current = *mode.borrow();
    let next = current.after(command, locked);
    if next != current {
        debug!("Input mode {:?} -> {:?}", current, next);
    }
    *mode.borrow_mut() = next;
}

/// Applies one key press. Returns true if the key meant something in the
/// current mode.
fn handle_key(board: &SharedBoard, mode: &SharedMode, key: &str) -> bool {
    let current = *mode.borrow();
    let command = {
        let board = board.borrow();
        let Some(board) = board.as_ref() else {
            return false;
        };
        current.resolve(key, &board.settings().keymap)
    };
    let Some(command) = command else {
        return false;
    };

    match command {
        Command::Board(action) => {
            if let Some(board) = board.borrow_mut().as_mut() {
                board.perform(action);
            }
        }
        Command::OpenMatchConfig => {
            let locked = is_locked(board) || dom::is_fullscreen();
            switch_mode(mode, command, locked);
        }
        Command::ToggleOverview | Command::CloseConfig => {
            switch_mode(mode, command, is_locked(board));
        }
    }
    true
}

/// Registers `listener` on the document for `event` until the returned
/// cleanup runs.
fn listen<E: FromWasmAbi + 'static>(
    event: &'static str,
    listener: impl FnMut(E) + 'static,
) -> impl FnOnce() {
    let closure = Closure::<dyn FnMut(E)>::new(listener);
    let document = gloo_utils::document();
    if let Err(err) =
        document.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        warn!("Cannot listen to {}: {:?}", event, err);
    }
    move || {
        if let Err(err) =
            document.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
        {
            warn!("Cannot stop listening to {}: {:?}", event, err);
        }
        drop(closure);
    }
}

// ──────────────────────────────────────────────────────────────────────────────

/// Primary application component wiring state, effects, and UI elements.
#[function_component(App)]
fn app() -> Html {
    let settings = use_state(|| Rc::new(Settings::default()));
    let board: SharedBoard = use_mut_ref(|| None::<Board>);
    let mode: SharedMode = use_mut_ref(InputMode::default);
    let fullscreen = use_state(|| false);
    let force_update = use_force_update();
    let refs = use_memo((), |_| BoardRefs::default());
    // one frame callback for the whole application; it reaches the board weakly
    let runtime = {
        let board = board.clone();
        use_memo((), move |_| Runtime {
            clock: Rc::new(PerformanceClock::new()),
            frames: Rc::new(AnimationFrames::new(Rc::downgrade(&board))),
        })
    };

    // (re-)build the board whenever settings are applied
    {
        let board = board.clone();
        let refs = refs.clone();
        let runtime = runtime.clone();
        let force_update = force_update.clone();
        use_effect_with((*settings).clone(), move |settings: &Rc<Settings>| {
            match refs.outputs(settings) {
                Some(outputs) => {
                    let next = Board::new(settings.clone(), outputs, (*runtime).clone());
                    *board.borrow_mut() = Some(next);
                    dom::set_theme(settings.match_params.theme);
                    force_update.force_update();
                }
                None => warn!("Board elements are not mounted, keeping the previous board"),
            }
            || ()
        });
    }

    // keyboard
    {
        let board = board.clone();
        let mode = mode.clone();
        let force_update = force_update.clone();
        use_effect_with((), move |_| {
            listen("keydown", move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                if handle_key(&board, &mode, &key_name(&event.key())) {
                    event.prevent_default();
                    force_update.force_update();
                }
            })
        });
    }

    // fullscreen changes hide the settings entry
    {
        let fullscreen = fullscreen.clone();
        use_effect_with((), move |_| {
            listen("fullscreenchange", move |_: Event| {
                fullscreen.set(dom::is_fullscreen());
            })
        });
    }

    let on_fullscreen = {
        let refs = refs.clone();
        Callback::from(move |_: ()| dom::toggle_fullscreen(&refs.board))
    };

    let on_settings = {
        let board = board.clone();
        let mode = mode.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            let locked = is_locked(&board) || dom::is_fullscreen();
            switch_mode(&mode, Command::OpenMatchConfig, locked);
            force_update.force_update();
        })
    };

    let on_submit = {
        let settings = settings.clone();
        let mode = mode.clone();
        Callback::from(move |next: Settings| {
            info!("Applying settings");
            *mode.borrow_mut() = InputMode::Board;
            settings.set(Rc::new(next));
        })
    };

    let on_close = {
        let mode = mode.clone();
        let force_update = force_update.clone();
        Callback::from(move |_: ()| {
            switch_mode(&mode, Command::CloseConfig, false);
            force_update.force_update();
        })
    };

    let on_keys = {
        let mode = mode.clone();
        let force_update = force_update.clone();
        Callback::from(move |open: bool| {
            *mode.borrow_mut() = if open {
                InputMode::KeysConfig
            } else {
                InputMode::MatchConfig
            };
            force_update.force_update();
        })
    };

    let current_mode = *mode.borrow();
    let board_state = board.borrow();
    let lang = &settings.lang;
    let fullscreen_label = if *fullscreen {
        lang.fullscreen_off.clone()
    } else {
        lang.fullscreen_on.clone()
    };

    html! {
        <div class="app" ref={refs.board.clone()}>
            <TitleBar
                fullscreen_label={fullscreen_label}
                show_settings={!*fullscreen}
                {on_fullscreen}
                {on_settings}
            />
            { render_board(board_state.as_ref(), &settings, &refs) }
            if current_mode == InputMode::Overview {
                if let Some(board) = board_state.as_ref() {
                    { render_overview(board) }
                }
            }
            if matches!(current_mode, InputMode::MatchConfig | InputMode::KeysConfig) {
                <MatchConfigForm
                    settings={(*settings).clone()}
                    keys_open={current_mode == InputMode::KeysConfig}
                    {on_submit}
                    {on_close}
                    {on_keys}
                />
            }
        </div>
    }
}

/// Entry point: installs logging and renders the App.
fn main() {
    console::init(LOG_LEVEL);
    info!("Scoreboard starting");
    yew::Renderer::<App>::new().render();
}
