//! Browser implementations of the board's display, sound and timing traits.

use crate::config::{CONCEALED_CLASS, DARK_THEME_CLASS, LIGHT_THEME_CLASS};
use log::{error, warn};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, HtmlAnchorElement, HtmlAudioElement, HtmlElement, HtmlImageElement};
use wrestling_scoreboard::defaults;
use wrestling_scoreboard::{
    Board, Buzzer, ClockOutput, FrameScheduler, RenderSink, Settings, SponsorSink, TimerOutputs,
    WallClock,
};
use yew::NodeRef;

fn set_displayed(element: &HtmlElement, displayed: bool) {
    let style = element.style();
    let result = if displayed {
        style.remove_property("display").map(|_| ())
    } else {
        style.set_property("display", "none")
    };
    if let Err(err) = result {
        warn!("Cannot change display of {}: {:?}", element.class_name(), err);
    }
}

fn set_concealed(element: &HtmlElement, concealed: bool) {
    let classes = element.class_list();
    let result = if concealed {
        classes.add_1(CONCEALED_CLASS)
    } else {
        classes.remove_1(CONCEALED_CLASS)
    };
    if let Err(err) = result {
        warn!("Cannot change class of {}: {:?}", element.class_name(), err);
    }
}

/// Clock or label element. Reveal and conceal animate through a CSS class.
pub struct ElementSink {
    element: HtmlElement,
}

impl RenderSink for ElementSink {
    fn write(&self, html: &str) {
        self.element.set_inner_html(html);
    }

    fn show(&self) {
        set_concealed(&self.element, false);
        set_displayed(&self.element, true);
    }

    fn hide(&self) {
        set_displayed(&self.element, false);
        set_concealed(&self.element, true);
    }

    fn reveal(&self) {
        set_displayed(&self.element, true);
        // layout has to see the concealed state before the transition starts
        let _ = self.element.offset_width();
        set_concealed(&self.element, false);
    }

    fn conceal(&self) {
        set_concealed(&self.element, true);
    }
}

pub struct ImageSink {
    image: HtmlImageElement,
}

impl SponsorSink for ImageSink {
    fn set_source(&self, src: &str) {
        self.image.set_src(src);
    }

    fn show(&self) {
        set_displayed(&self.image, true);
    }

    fn hide(&self) {
        set_displayed(&self.image, false);
    }
}

/// Sound of a clock. An empty file name is silence.
pub struct AudioBuzzer {
    audio: Option<HtmlAudioElement>,
}

impl AudioBuzzer {
    pub fn new(file: &str) -> Self {
        if file.is_empty() {
            return Self::silent();
        }
        match HtmlAudioElement::new_with_src(file) {
            Ok(audio) => AudioBuzzer { audio: Some(audio) },
            Err(err) => {
                warn!("Cannot load buzzer {}: {:?}", file, err);
                Self::silent()
            }
        }
    }

    pub fn silent() -> Self {
        AudioBuzzer { audio: None }
    }
}

impl Buzzer for AudioBuzzer {
    fn rewind(&self) {
        if let Some(audio) = &self.audio {
            if let Err(err) = audio.pause() {
                warn!("Cannot pause buzzer: {:?}", err);
            }
            audio.set_current_time(0.0);
        }
    }

    fn play(&self) {
        let Some(audio) = &self.audio else {
            return;
        };
        match audio.play() {
            Ok(promise) => wasm_bindgen_futures::spawn_local(async move {
                if let Err(err) = JsFuture::from(promise).await {
                    warn!("Buzzer did not play: {:?}", err);
                }
            }),
            Err(err) => warn!("Buzzer did not play: {:?}", err),
        }
    }
}

/// `performance.now()`, the time base of animation frame timestamps.
pub struct PerformanceClock {
    performance: Option<web_sys::Performance>,
}

impl PerformanceClock {
    pub fn new() -> Self {
        let performance = web_sys::window().and_then(|window| window.performance());
        if performance.is_none() {
            error!("No performance timer available, clocks will not advance");
        }
        PerformanceClock { performance }
    }
}

impl Default for PerformanceClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock for PerformanceClock {
    fn now(&self) -> f64 {
        self.performance.as_ref().map_or(0.0, |p| p.now())
    }
}

/// Schedules [`Board::step`] on the next animation frame.
///
/// One callback lives for the whole application and reaches whichever board
/// is current, so rebuilding the board never strands a pending frame.
pub struct AnimationFrames {
    callback: Closure<dyn FnMut(f64)>,
}

impl AnimationFrames {
    pub fn new(board: Weak<RefCell<Option<Board>>>) -> Self {
        let callback = Closure::new(move |timestamp: f64| {
            if let Some(board) = board.upgrade() {
                if let Some(board) = board.borrow_mut().as_mut() {
                    board.step(timestamp);
                }
            }
        });
        AnimationFrames { callback }
    }
}

impl FrameScheduler for AnimationFrames {
    fn request_frame(&self) -> bool {
        let requested = web_sys::window()
            .ok_or_else(|| JsValue::from_str("no window"))
            .and_then(|window| {
                window.request_animation_frame(self.callback.as_ref().unchecked_ref())
            });
        match requested {
            Ok(_) => true,
            Err(err) => {
                error!("Cannot request animation frame: {:?}", err);
                false
            }
        }
    }
}

/// Elements the timer writes into, rendered by the board view.
#[derive(Default, Clone, PartialEq)]
pub struct BoardRefs {
    pub board: NodeRef,
    pub period: NodeRef,
    pub pause: NodeRef,
    pub period_info: NodeRef,
    pub active_red: NodeRef,
    pub active_blu: NodeRef,
    pub sponsor: NodeRef,
}

fn element_sink(node: &NodeRef) -> Option<Box<dyn RenderSink>> {
    node.cast::<HtmlElement>()
        .map(|element| Box::new(ElementSink { element }) as Box<dyn RenderSink>)
}

impl BoardRefs {
    /// Outputs of a new timer. None until the board view is mounted.
    pub fn outputs(&self, settings: &Settings) -> Option<TimerOutputs> {
        let buzzer: Rc<dyn Buzzer> = Rc::new(AudioBuzzer::new(defaults::buzzer_file(
            &settings.match_params.buzzer,
        )));
        let silent = || Rc::new(AudioBuzzer::silent()) as Rc<dyn Buzzer>;
        let sponsor = self.sponsor.cast::<HtmlImageElement>()?;

        Some(TimerOutputs {
            period: ClockOutput {
                sink: element_sink(&self.period)?,
                buzzer: buzzer.clone(),
            },
            pause: ClockOutput {
                sink: element_sink(&self.pause)?,
                buzzer,
            },
            active_red: ClockOutput {
                sink: element_sink(&self.active_red)?,
                buzzer: silent(),
            },
            active_blu: ClockOutput {
                sink: element_sink(&self.active_blu)?,
                buzzer: silent(),
            },
            period_info: element_sink(&self.period_info)?,
            sponsor: Box::new(ImageSink { image: sponsor }),
        })
    }
}

pub fn set_theme(light: bool) {
    let theme = if light {
        LIGHT_THEME_CLASS
    } else {
        DARK_THEME_CLASS
    };
    gloo_utils::body().set_class_name(theme);
}

pub fn is_fullscreen() -> bool {
    gloo_utils::document().fullscreen_element().is_some()
}

pub fn toggle_fullscreen(target: &NodeRef) {
    let document = gloo_utils::document();
    if document.fullscreen_element().is_some() {
        document.exit_fullscreen();
    } else if let Some(element) = target.cast::<web_sys::Element>() {
        if let Err(err) = element.request_fullscreen() {
            warn!("Fullscreen refused: {:?}", err);
        }
    }
}

/// Offers `json` as a file download.
pub fn download_json(json: &str, file_name: &str) -> Result<(), JsValue> {
    let href = format!(
        "data:application/json;charset=utf-8,{}",
        String::from(js_sys::encode_uri_component(json))
    );
    let anchor: HtmlAnchorElement = gloo_utils::document().create_element("a")?.dyn_into()?;
    anchor.set_href(&href);
    anchor.set_download(file_name);
    anchor.click();
    Ok(())
}

pub async fn read_text(file: File) -> Result<String, JsValue> {
    let text = JsFuture::from(file.text()).await?;
    text.as_string()
        .ok_or_else(|| JsValue::from_str("file content is not text"))
}
