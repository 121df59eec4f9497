//! Yew view components of the scoreboard.
//!
//! The board view renders the score state held by [`Board`]. Clock faces are
//! empty elements filled by the timer through [`crate::dom::BoardRefs`].

use crate::config::*;
use crate::dom::{self, AudioBuzzer, BoardRefs};
use gloo_timers::callback::Timeout;
use log::{info, warn};
use std::rc::Rc;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use wrestling_scoreboard::board::MAX_WARNINGS;
use wrestling_scoreboard::defaults::{self, BUZZER_FILES, KEYMAP_PRESETS};
use wrestling_scoreboard::keys::{key_name, Keymap};
use wrestling_scoreboard::utils::{format_duration, parse_duration};
use wrestling_scoreboard::{Action, Board, Buzzer, Settings, SettingsError, Side};
use yew::prelude::*;

const NBSP: &str = "\u{a0}";

fn or_blank(text: &str) -> &str {
    if text.is_empty() {
        NBSP
    } else {
        text
    }
}

fn input_value(e: InputEvent) -> String {
    e.target_unchecked_into::<HtmlInputElement>().value()
}

fn checked(e: Event) -> bool {
    e.target_unchecked_into::<HtmlInputElement>().checked()
}

fn selected(e: Event) -> String {
    e.target_unchecked_into::<HtmlSelectElement>().value()
}

/// Renders the three warning markers of a wrestler.
fn render_warnings(count: u32) -> Html {
    html! {
        <div class="warnings">
            { for (0..MAX_WARNINGS).map(|i| html! {
                <span class={classes!("warning", (i < count).then_some(WARNING_SHOWN_CLASS))}></span>
            }) }
        </div>
    }
}

/// Renders team and wrestler box of one side.
///
/// The layout follows `settings` and stays the same between renders, so the
/// active-time element the timer writes into keeps its identity. Both boxes
/// are keyed and move instead of being rebuilt when their order changes.
fn render_corner(board: Option<&Board>, settings: &Settings, side: Side, active_ref: &NodeRef) -> Html {
    let params = &settings.match_params;
    let team_name = match side {
        Side::Red => &params.red,
        Side::Blu => &params.blu,
    };
    let corner = board.map(|b| b.corner(side));
    let team_score = corner.map_or(0, |c| c.team.value());
    let wres_score = corner.map_or(0, |c| c.wres.value());
    let warnings = corner.map_or(0, |c| c.warnings.value());
    let wrestler_name = board.map_or("", |b| b.wrestler(side));

    let team = html! {
        <div key="team" class="team box" hidden={!params.show_teams}>
            <div class="name">{ or_blank(team_name) }</div>
            <div class="score">{ team_score }</div>
        </div>
    };
    let wrestler = html! {
        <div key="wres" class="wres box">
            <div class="name">{ or_blank(wrestler_name) }</div>
            <div class="active" ref={active_ref.clone()}></div>
            <div class="score">{ wres_score }</div>
            { render_warnings(warnings) }
        </div>
    };

    html! {
        <div class={classes!("corner", side.to_string())}>
            if params.wrestlers_above_teams {
                { wrestler }
                { team }
            } else {
                { team }
                { wrestler }
            }
        </div>
    }
}

/// Renders the scoreboard with its clock elements.
pub fn render_board(board: Option<&Board>, settings: &Settings, refs: &BoardRefs) -> Html {
    let weight = board.map(Board::weight_label).unwrap_or_default();
    let style = board.map_or("", Board::style_label);

    html! {
        <div class="scoreboard">
            { render_corner(board, settings, Side::Red, &refs.active_red) }
            <div class="match">
                <div class="weight" hidden={!settings.match_params.show_weigth}>{ or_blank(&weight) }</div>
                <div class="style" hidden={!settings.match_params.show_weigth}>{ or_blank(style) }</div>
                <div class="clock period" ref={refs.period.clone()}></div>
                <div class="clock pause" ref={refs.pause.clone()}></div>
                <div class="periodinfo" ref={refs.period_info.clone()}></div>
            </div>
            { render_corner(board, settings, Side::Blu, &refs.active_blu) }
            <img class="sponsor" alt="" ref={refs.sponsor.clone()} />
        </div>
    }
}

/// Renders the overview layer: team scores and the bout table or the logo.
pub fn render_overview(board: &Board) -> Html {
    let settings = board.settings();
    let lang = &settings.lang;
    let params = &settings.match_params;
    let style_short = |greco: bool| {
        if greco {
            lang.greco_short.clone()
        } else {
            lang.non_greco_short.clone()
        }
    };

    html! {
        <div class="overview">
            if board.overview_shows_team_scores() {
                <div class="overview-scores">
                    <div class="red">{ board.corner(Side::Red).team.value() }</div>
                    <div class="blue">{ board.corner(Side::Blu).team.value() }</div>
                </div>
            }
            if board.overview_shows_bouts() {
                <table class="overview-bouts">
                    <tr>
                        <th>{ &params.red }</th>
                        <th colspan="2"></th>
                        <th>{ &params.blu }</th>
                    </tr>
                    { for settings.fights.iter().map(|fight| html! {
                        <tr>
                            <td>{ &fight.red }</td>
                            <td>{ &fight.weight }</td>
                            <td>{ style_short(fight.greco) }</td>
                            <td>{ &fight.blu }</td>
                        </tr>
                    }) }
                </table>
            } else {
                <img class="logo" src={LOGO_SRC} alt="" />
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct TitleBarProps {
    pub fullscreen_label: AttrValue,
    pub show_settings: bool,
    pub on_fullscreen: Callback<()>,
    pub on_settings: Callback<()>,
}

/// Menu that slides away a while after the pointer leaves it.
#[function_component(TitleBar)]
pub fn title_bar(props: &TitleBarProps) -> Html {
    let open = use_state(|| true);
    let hide_timer = use_mut_ref(|| None::<Timeout>);

    let schedule_hide = {
        let open = open.clone();
        let hide_timer = hide_timer.clone();
        Callback::from(move |_: ()| {
            let open = open.clone();
            *hide_timer.borrow_mut() = Some(Timeout::new(TITLEBAR_HIDE_MS, move || open.set(false)));
        })
    };

    // hide after the first pause, as if the pointer had just left
    {
        let schedule_hide = schedule_hide.clone();
        use_effect_with((), move |_| {
            schedule_hide.emit(());
            || ()
        });
    }

    let onmouseenter = {
        let open = open.clone();
        let hide_timer = hide_timer.clone();
        Callback::from(move |_: MouseEvent| {
            hide_timer.borrow_mut().take();
            open.set(true);
        })
    };
    let onmouseleave = schedule_hide.reform(|_: MouseEvent| ());

    html! {
        <div class="titlebar" {onmouseenter} {onmouseleave}>
            if *open {
                <ul>
                    <li>
                        <button onclick={props.on_fullscreen.reform(|_: MouseEvent| ())}>
                            { props.fullscreen_label.clone() }
                        </button>
                    </li>
                    if props.show_settings {
                        <li>
                            <button onclick={props.on_settings.reform(|_: MouseEvent| ())}>
                                { SETTINGS_LABEL }
                            </button>
                        </li>
                    }
                </ul>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MatchConfigProps {
    pub settings: Rc<Settings>,
    pub keys_open: bool,
    pub on_submit: Callback<Settings>,
    pub on_close: Callback<()>,
    pub on_keys: Callback<bool>,
}

/// Form fields that are kept as text or flags until the form is applied.
#[derive(Clone, PartialEq)]
struct PeriodFields {
    text: String,
    countdown: bool,
    subsecond: bool,
}

impl PeriodFields {
    fn from_settings(settings: &Settings) -> Self {
        let period = &settings.timer.period;
        PeriodFields {
            text: format_duration(period.minutes, period.seconds),
            countdown: period.countdown,
            subsecond: settings.subsecond_enabled(),
        }
    }

    fn apply(&self, draft: &Settings) -> Result<Settings, SettingsError> {
        let (minutes, seconds) = parse_duration(&self.text)?;
        let next = draft.with_period(minutes, seconds, self.countdown, self.subsecond)?;
        next.validate()?;
        Ok(next)
    }
}

/// Returns a callback that edits a copy of the draft.
fn edit<T: 'static>(
    draft: &UseStateHandle<Settings>,
    apply: impl Fn(&mut Settings, T) + 'static,
) -> Callback<T> {
    let draft = draft.clone();
    Callback::from(move |value: T| {
        let mut next = (*draft).clone();
        apply(&mut next, value);
        draft.set(next);
    })
}

fn checkbox(label: &str, value: bool, disabled: bool, onchange: Callback<bool>) -> Html {
    html! {
        <label class="check">
            <input type="checkbox" checked={value} {disabled} onchange={onchange.reform(checked)} />
            { label }
        </label>
    }
}

#[function_component(MatchConfigForm)]
pub fn match_config_form(props: &MatchConfigProps) -> Html {
    let draft = use_state(|| (*props.settings).clone());
    let period = use_state(|| PeriodFields::from_settings(&props.settings));
    let error = use_state(|| None::<String>);

    let load_into_form = {
        let draft = draft.clone();
        let period = period.clone();
        Callback::from(move |settings: Settings| {
            period.set(PeriodFields::from_settings(&settings));
            draft.set(settings);
        })
    };

    let onsubmit = {
        let draft = draft.clone();
        let period = period.clone();
        let error = error.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match period.apply(&draft) {
                Ok(settings) => {
                    error.set(None);
                    on_submit.emit(settings);
                }
                Err(err) => error.set(Some(err.to_string())),
            }
        })
    };

    let on_save = {
        let draft = draft.clone();
        let period = period.clone();
        let error = error.clone();
        Callback::from(move |_: MouseEvent| {
            let json = match period.apply(&draft).and_then(|settings| settings.to_json()) {
                Ok(json) => json,
                Err(err) => {
                    error.set(Some(err.to_string()));
                    return;
                }
            };
            if let Err(err) = dom::download_json(&json, SETTINGS_FILE_NAME) {
                warn!("Download failed: {:?}", err);
            }
        })
    };

    let on_load = {
        let draft = draft.clone();
        let error = error.clone();
        let load_into_form = load_into_form.clone();
        Callback::from(move |e: Event| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let base = (*draft).clone();
            let error = error.clone();
            let load_into_form = load_into_form.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let loaded = match dom::read_text(file).await {
                    Ok(json) => base.import(&json),
                    Err(err) => Err(SettingsError::Json(format!("{:?}", err))),
                };
                match loaded {
                    Ok(settings) => {
                        info!("Settings file loaded into the form");
                        error.set(None);
                        load_into_form.emit(settings);
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    let on_period_text = {
        let period = period.clone();
        Callback::from(move |e: InputEvent| {
            period.set(PeriodFields {
                text: input_value(e),
                ..(*period).clone()
            });
        })
    };
    let on_countdown = {
        let period = period.clone();
        Callback::from(move |countdown: bool| {
            period.set(PeriodFields {
                countdown,
                ..(*period).clone()
            });
        })
    };
    let on_subsecond = {
        let period = period.clone();
        Callback::from(move |subsecond: bool| {
            period.set(PeriodFields {
                subsecond,
                ..(*period).clone()
            });
        })
    };

    let on_buzzer = edit(&draft, |s, name: String| {
        AudioBuzzer::new(defaults::buzzer_file(&name)).play();
        s.match_params.buzzer = name;
    });
    let on_weight_preset = edit(&draft, |s, index: String| {
        let preset = index
            .parse::<usize>()
            .ok()
            .and_then(|i| WEIGHT_PRESETS.get(i))
            .and_then(|(_, return_leg)| *return_leg);
        if let Some(return_leg) = preset {
            s.apply_weight_preset(return_leg);
        }
    });

    let settings = &*draft;
    let params = &settings.match_params;
    let invalid_period = error.is_some() && parse_duration(&period.text).is_err();

    if props.keys_open {
        let on_keys_submit = {
            let on_keys = props.on_keys.clone();
            edit(&draft, move |s, keymap: Keymap| {
                s.keymap = keymap;
                on_keys.emit(false);
            })
        };
        return html! {
            <KeysConfigForm
                keymap={settings.keymap.clone()}
                on_submit={on_keys_submit}
                on_cancel={props.on_keys.reform(|_: ()| false)}
            />
        };
    }

    let fights = settings.fights.iter().enumerate().map(|(i, fight)| {
        html! {
            <tr class="fightRow">
                <td>{ i + 1 }</td>
                <td><input type="text" value={fight.red.clone()}
                    oninput={edit(&draft, move |s, v: String| if let Some(f) = s.fights.get_mut(i) { f.red = v }).reform(input_value)} /></td>
                <td><input type="text" class="weight" value={fight.weight.clone()} disabled={!params.show_weigth}
                    oninput={edit(&draft, move |s, v: String| if let Some(f) = s.fights.get_mut(i) { f.weight = v }).reform(input_value)} /></td>
                <td><input type="checkbox" checked={fight.greco} disabled={!params.show_weigth}
                    onchange={edit(&draft, move |s, v: bool| if let Some(f) = s.fights.get_mut(i) { f.greco = v }).reform(checked)} /></td>
                <td><input type="text" value={fight.blu.clone()}
                    oninput={edit(&draft, move |s, v: String| if let Some(f) = s.fights.get_mut(i) { f.blu = v }).reform(input_value)} /></td>
            </tr>
        }
    });

    html! {
        <form class="config match-config" {onsubmit}>
            <fieldset>
                <legend>{ "Mannschaften" }</legend>
                <input type="text" value={params.red.clone()} disabled={!params.show_teams}
                    oninput={edit(&draft, |s, v: String| s.match_params.red = v).reform(input_value)} />
                <input type="text" value={params.blu.clone()} disabled={!params.show_teams}
                    oninput={edit(&draft, |s, v: String| s.match_params.blu = v).reform(input_value)} />
                { checkbox("Mannschaften anzeigen", params.show_teams, false,
                    edit(&draft, |s, v| s.match_params.show_teams = v)) }
                { checkbox("Ringer über Mannschaften", params.wrestlers_above_teams, false,
                    edit(&draft, |s, v| s.match_params.wrestlers_above_teams = v)) }
            </fieldset>

            <fieldset>
                <legend>{ "Zeit" }</legend>
                <input type="text" value={period.text.clone()}
                    class={classes!(invalid_period.then_some(INVALID_CLASS))}
                    oninput={on_period_text} />
                <input type="number" min="1" value={params.last_period.to_string()}
                    oninput={edit(&draft, |s, v: String| {
                        if let Ok(n) = v.parse() { s.match_params.last_period = n }
                    }).reform(input_value)} />
                { checkbox("Countdown", period.countdown, false, on_countdown) }
                { checkbox("Zehntelsekunden", period.subsecond, !period.countdown, on_subsecond) }
                <select onchange={on_buzzer.reform(selected)}>
                    { for BUZZER_FILES.iter().map(|(name, _)| html! {
                        <option value={*name} selected={params.buzzer == *name}>{ *name }</option>
                    }) }
                </select>
            </fieldset>

            <fieldset>
                <legend>{ "Anzeige" }</legend>
                { checkbox("Gewicht und Stil anzeigen", params.show_weigth, false,
                    edit(&draft, |s, v| s.match_params.show_weigth = v)) }
                { checkbox("MM-Reihenfolge", params.mm_set, false,
                    edit(&draft, |s, v| s.match_params.mm_set = v)) }
                { checkbox("Sponsoren anzeigen", params.sponsors.show, false,
                    edit(&draft, |s, v| s.match_params.sponsors.show = v)) }
                { checkbox("Dunkles Design", !params.theme, false,
                    edit(&draft, |s, v: bool| s.match_params.theme = !v)) }
            </fieldset>

            <fieldset>
                <legend>{ "Kämpfe" }</legend>
                <select onchange={on_weight_preset.reform(selected)}>
                    { for WEIGHT_PRESETS.iter().enumerate().map(|(i, (label, _))| html! {
                        <option value={i.to_string()} selected={i == 0}>{ *label }</option>
                    }) }
                </select>
                <table id="fights">
                    { for fights }
                </table>
                <button type="button" onclick={edit(&draft, |s, _: MouseEvent| s.add_fight())}>{ "+" }</button>
                <button type="button" onclick={edit(&draft, |s, _: MouseEvent| s.remove_fight())}>{ "-" }</button>
                <button type="button" onclick={edit(&draft, |s, _: MouseEvent| s.clear_names())}>{ "Namen löschen" }</button>
            </fieldset>

            if let Some(message) = &*error {
                <div class="input-error">{ message }</div>
            }

            <div class="buttons">
                <button type="button" onclick={props.on_keys.reform(|_: MouseEvent| true)}>{ KEYS_LABEL }</button>
                <button type="button" onclick={on_save}>{ "Speichern" }</button>
                <label class="file">
                    { "Laden" }
                    <input type="file" accept=".json,application/json" onchange={on_load} />
                </label>
                <button type="button" onclick={props.on_close.reform(|_: MouseEvent| ())}>{ "Abbrechen" }</button>
                <button type="submit">{ "Übernehmen" }</button>
            </div>
        </form>
    }
}

#[derive(Properties, PartialEq)]
pub struct KeysConfigProps {
    pub keymap: Keymap,
    pub on_submit: Callback<Keymap>,
    pub on_cancel: Callback<()>,
}

/// Records one key per action. Keys bound twice are marked and refused.
#[function_component(KeysConfigForm)]
pub fn keys_config_form(props: &KeysConfigProps) -> Html {
    let draft = use_state(|| props.keymap.clone());
    let error = use_state(|| None::<String>);
    let duplicates = draft.duplicates();

    let onsubmit = {
        let draft = draft.clone();
        let error = error.clone();
        let on_submit = props.on_submit.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            match draft.validate() {
                Ok(()) => on_submit.emit((*draft).clone()),
                Err(err) => error.set(Some(err.to_string())),
            }
        })
    };

    let on_preset = {
        let draft = draft.clone();
        Callback::from(move |e: Event| {
            if let Some(keymap) = defaults::keymap(&selected(e)) {
                draft.set(keymap);
            }
        })
    };

    let record = |action: Action| {
        let draft = draft.clone();
        Callback::from(move |e: KeyboardEvent| {
            e.prevent_default();
            let mut next = (*draft).clone();
            next.set(action, key_name(&e.key()));
            draft.set(next);
        })
    };

    html! {
        <form class="config keys-config" {onsubmit}>
            <select onchange={on_preset}>
                { for KEYMAP_PRESETS.iter().map(|name| html! {
                    <option value={*name} selected={*name == defaults::DEFAULT_KEYMAP}>{ *name }</option>
                }) }
            </select>
            <div class="keymapping">
                { for Action::ALL.iter().map(|&action| html! {
                    <div class="col">
                        <span>{ action.description() }</span>
                        <input type="text" readonly={true} tabindex="-1"
                            value={draft.key(action).to_string()}
                            class={classes!(duplicates.contains(&action).then_some(INVALID_CLASS))}
                            onkeydown={record(action)} />
                    </div>
                }) }
            </div>
            if let Some(message) = &*error {
                <div class="input-error">{ message }</div>
            }
            <div class="buttons">
                <button type="button" onclick={props.on_cancel.reform(|_: MouseEvent| ())}>{ "Zurück" }</button>
                <button type="submit">{ "Übernehmen" }</button>
            </div>
        </form>
    }
}
