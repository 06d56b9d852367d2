use eframe::egui;
use std::path::PathBuf;
use std::time::Instant;

use crate::playback::reveal::ease_in_out;
use crate::playback::settings::{MAX_FONT_SIZE, MAX_SPEED, MIN_FONT_SIZE};
use crate::playback::{Engine, Intent, LocalScheduler, PlaybackSettings, PlaybackState};
use crate::render::overlay::{self, Toast};
use crate::render::{self, GUIDE_FRACTION};
use crate::script::watcher::LibraryWatcher;
use crate::script::{self, ScriptCollection};
use crate::surface::{self, Fullscreen, FullscreenError, Viewport};
use crate::theme::Theme;

const FONT_STEP: i32 = 4;
const SPEED_STEP: f32 = 10.0;

/// Everything needed to open the prompter window.
pub struct LaunchOptions {
    pub source: PathBuf,
    pub windowed: bool,
    pub script: Option<String>,
    pub settings: PlaybackSettings,
    pub countdown: u32,
    pub theme: String,
    pub watch: bool,
}

/// User actions collected during input handling and applied afterwards
/// (sending viewport commands inside `ctx.input()` deadlocks).
#[derive(Debug, Clone, PartialEq)]
enum Action {
    PauseOrCancel,
    PlayPause,
    Reset,
    Stop,
    Select(String),
    NextScript,
    PreviousScript,
    FontSize(i32),
    Speed(f32),
    ToggleMirror,
    ToggleFullscreen,
    ToggleTheme,
    ToggleHelp,
    ToggleControls,
    Quit,
}

/// Fullscreen through the native viewport. The request is fire-and-forget;
/// the window reports the new mode on a later frame.
struct ViewportFullscreen<'a> {
    ctx: &'a egui::Context,
}

impl Fullscreen for ViewportFullscreen<'_> {
    fn is_fullscreen(&self) -> bool {
        self.ctx
            .input(|i| i.viewport().fullscreen.unwrap_or(false))
    }

    fn request_fullscreen(&mut self) -> Result<(), FullscreenError> {
        self.send(true)
    }

    fn exit_fullscreen(&mut self) -> Result<(), FullscreenError> {
        self.send(false)
    }
}

impl ViewportFullscreen<'_> {
    fn send(&self, on: bool) -> Result<(), FullscreenError> {
        if self.ctx.input(|i| i.viewport().fullscreen).is_none() {
            return Err(FullscreenError::Unsupported);
        }
        self.ctx
            .send_viewport_cmd(egui::ViewportCommand::Fullscreen(on));
        Ok(())
    }
}

/// Map a transport action to an engine intent. Without a script there is
/// nothing to count down to, so only actions that settle the engine pass.
fn transport_intent(action: &Action, state: PlaybackState, has_script: bool) -> Option<Intent> {
    match action {
        Action::PlayPause if state.is_counting() => Some(Intent::PauseOrCancel),
        Action::PlayPause if has_script => Some(Intent::Play),
        Action::PauseOrCancel => Some(Intent::PauseOrCancel),
        Action::Reset => Some(Intent::Reset),
        Action::Stop if has_script => Some(Intent::Stop),
        _ => None,
    }
}

struct PrompterApp {
    source: PathBuf,
    collection: ScriptCollection,
    watcher: Option<LibraryWatcher>,
    engine: Engine,
    scheduler: LocalScheduler,
    surface: Viewport,
    settings: PlaybackSettings,
    theme: Theme,
    show_controls: bool,
    show_help: bool,
    toast: Option<Toast>,
}

impl PrompterApp {
    fn new(options: LaunchOptions, collection: ScriptCollection, ctx: &egui::Context) -> Self {
        let watcher = if options.watch {
            let repaint = ctx.clone();
            match LibraryWatcher::new(&options.source, move || repaint.request_repaint()) {
                Ok(w) => Some(w),
                Err(e) => {
                    tracing::warn!("live reload disabled: {e}");
                    None
                }
            }
        } else {
            None
        };

        Self {
            source: options.source,
            collection,
            watcher,
            engine: Engine::new(options.countdown),
            scheduler: LocalScheduler::new(Instant::now()),
            surface: Viewport::default(),
            settings: options.settings,
            theme: Theme::from_name(&options.theme),
            show_controls: true,
            show_help: false,
            toast: None,
        }
    }

    fn send(&mut self, intent: Intent) {
        let now = Instant::now();
        self.scheduler.advance_to(now);
        self.engine.dispatch(
            intent,
            now,
            &self.settings,
            &mut self.scheduler,
            &mut self.surface,
        );
    }

    fn reload_scripts(&mut self) {
        match script::load(&self.source) {
            Ok(scripts) => {
                if self.collection.replace(scripts) {
                    self.send(Intent::ScriptChanged);
                }
                self.toast = Some(Toast::new("Scripts reloaded"));
            }
            Err(e) => tracing::warn!("reload failed: {e}"),
        }
    }

    fn apply(&mut self, action: Action, ctx: &egui::Context) {
        match action {
            Action::PlayPause | Action::PauseOrCancel | Action::Reset | Action::Stop => {
                let has_script = !self.collection.is_empty();
                if let Some(intent) = transport_intent(&action, self.engine.state(), has_script) {
                    self.send(intent);
                }
            }
            Action::Select(id) => {
                if self.collection.select(&id) {
                    self.send(Intent::ScriptChanged);
                }
            }
            Action::NextScript => {
                if self.collection.select_next() {
                    self.send(Intent::ScriptChanged);
                }
            }
            Action::PreviousScript => {
                if self.collection.select_previous() {
                    self.send(Intent::ScriptChanged);
                }
            }
            Action::FontSize(delta) => {
                self.settings.adjust_font_size(delta);
                self.toast = Some(Toast::new(format!(
                    "Font size: {}px",
                    self.settings.font_size()
                )));
            }
            Action::Speed(delta) => {
                self.settings.adjust_speed(delta);
                self.toast = Some(Toast::new(format!(
                    "Speed: {:.0} px/s",
                    self.settings.speed()
                )));
            }
            Action::ToggleMirror => {
                self.settings.toggle_mirrored();
                let state = if self.settings.mirrored() { "on" } else { "off" };
                self.toast = Some(Toast::new(format!("Mirror: {state}")));
            }
            Action::ToggleFullscreen => {
                surface::toggle_fullscreen(&mut ViewportFullscreen { ctx });
            }
            Action::ToggleTheme => {
                self.theme = self.theme.toggled();
                self.toast = Some(Toast::new(format!("Theme: {}", self.theme.name)));
            }
            Action::ToggleHelp => self.show_help = !self.show_help,
            Action::ToggleControls => self.show_controls = !self.show_controls,
            Action::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    fn keyboard_actions(ctx: &egui::Context) -> Vec<Action> {
        let mut actions = Vec::new();
        ctx.input(|i| {
            let bindings = [
                (egui::Key::Space, Action::PlayPause),
                (egui::Key::Escape, Action::PauseOrCancel),
                (egui::Key::R, Action::Reset),
                (egui::Key::S, Action::Stop),
                (egui::Key::ArrowUp, Action::Speed(SPEED_STEP)),
                (egui::Key::ArrowDown, Action::Speed(-SPEED_STEP)),
                (egui::Key::Plus, Action::FontSize(FONT_STEP)),
                (egui::Key::Equals, Action::FontSize(FONT_STEP)),
                (egui::Key::Minus, Action::FontSize(-FONT_STEP)),
                (egui::Key::PageDown, Action::NextScript),
                (egui::Key::PageUp, Action::PreviousScript),
                (egui::Key::M, Action::ToggleMirror),
                (egui::Key::F, Action::ToggleFullscreen),
                (egui::Key::D, Action::ToggleTheme),
                (egui::Key::H, Action::ToggleHelp),
                (egui::Key::C, Action::ToggleControls),
                (egui::Key::Q, Action::Quit),
            ];
            for (key, action) in bindings {
                if i.key_pressed(key) {
                    actions.push(action);
                }
            }
        });
        actions
    }

    fn draw_controls(&mut self, ctx: &egui::Context, actions: &mut Vec<Action>) {
        let is_fullscreen = ViewportFullscreen { ctx }.is_fullscreen();
        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                let selected_name = self
                    .collection
                    .selected()
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| "No scripts".to_string());
                egui::ComboBox::from_id_salt("script_picker")
                    .selected_text(selected_name)
                    .show_ui(ui, |ui| {
                        for s in self.collection.scripts() {
                            let is_selected = self.collection.selected_id() == Some(s.id.as_str());
                            if ui.selectable_label(is_selected, &s.name).clicked() {
                                actions.push(Action::Select(s.id.clone()));
                            }
                        }
                    });

                let mut font = self.settings.font_size();
                if ui
                    .add(egui::Slider::new(&mut font, MIN_FONT_SIZE..=MAX_FONT_SIZE).text("Font"))
                    .changed()
                {
                    self.settings.set_font_size(font);
                }

                let mut speed = self.settings.speed();
                if ui
                    .add(egui::Slider::new(&mut speed, 0.0..=MAX_SPEED).text("px/s"))
                    .changed()
                {
                    self.settings.set_speed(speed);
                }

                let mut mirrored = self.settings.mirrored();
                if ui.checkbox(&mut mirrored, "Mirror").changed() {
                    self.settings.set_mirrored(mirrored);
                }

                ui.separator();

                let play_label = match self.engine.state() {
                    PlaybackState::Playing => "Pause",
                    PlaybackState::Counting(_) => "Cancel",
                    _ => "Play",
                };
                if ui.button(play_label).clicked() {
                    actions.push(Action::PlayPause);
                }
                if ui.button("Reset").clicked() {
                    actions.push(Action::Reset);
                }
                if ui.button(surface::fullscreen_label(is_fullscreen)).clicked() {
                    actions.push(Action::ToggleFullscreen);
                }

                ui.separator();
                ui.weak(self.engine.state().to_string());
            });
        });
    }

    fn text_opacity(&self, now: Instant) -> f32 {
        if !self.engine.is_text_visible() {
            return 0.0;
        }
        match self.engine.reveal() {
            Some(reveal) => ease_in_out(reveal.progress(now)),
            None => 1.0,
        }
    }
}

impl eframe::App for PrompterApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.watcher.as_ref().is_some_and(|w| w.poll()) {
            self.reload_scripts();
        }

        let mut actions = Self::keyboard_actions(ctx);
        if self.show_controls {
            self.draw_controls(ctx, &mut actions);
        }
        for action in actions {
            self.apply(action, ctx);
        }

        if self.toast.as_ref().is_some_and(|t| t.is_expired()) {
            self.toast = None;
        }

        let bg = self.theme.background;
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(bg).inner_margin(0.0))
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let now = Instant::now();
                let font_size = self.settings.font_size() as f32;
                let guide_y = rect.top() + rect.height() * GUIDE_FRACTION;

                let opacity = self.text_opacity(now);
                let layout = self.collection.selected().map(|script| {
                    render::layout_script(ui, &script.text, &self.theme, font_size, rect, opacity)
                });
                let content_height = layout.as_ref().map_or(0.0, |l| l.content_height());
                self.surface.measure(content_height, rect.height());
                self.engine.drive(
                    now,
                    &self.settings,
                    &mut self.scheduler,
                    &mut self.surface,
                );

                match (self.collection.selected(), layout) {
                    (Some(script), Some(layout)) => {
                        overlay::draw_guide(ui, &self.theme, rect, guide_y, font_size);
                        if opacity > 0.0 {
                            render::paint_script(
                                ui,
                                &layout,
                                rect,
                                self.surface.scroll_top,
                                self.settings.mirrored(),
                            );
                        }
                        overlay::draw_fade_gradient(ui, rect, 80.0, &self.theme, true);
                        overlay::draw_fade_gradient(ui, rect, 80.0, &self.theme, false);

                        if script.text.trim().is_empty() {
                            overlay::draw_placeholder(ui, &self.theme, rect, "This script is empty");
                        }
                        if let PlaybackState::Counting(n) = self.engine.state() {
                            overlay::draw_countdown(ui, &self.theme, rect, guide_y, n);
                        }
                        if self.engine.reveal().is_some_and(|r| !r.is_complete(now)) {
                            ctx.request_repaint();
                        }
                    }
                    _ => {
                        overlay::draw_placeholder(ui, &self.theme, rect, "No scripts found");
                    }
                }

                if let Some(ref toast) = self.toast {
                    toast.draw(ui, &self.theme, rect);
                    ctx.request_repaint();
                }
                if self.show_help {
                    overlay::draw_help(ui, &self.theme, rect);
                }
            });

        if let Some(wait) = self.scheduler.next_wakeup() {
            ctx.request_repaint_after(wait);
        }
    }
}

pub fn run(options: LaunchOptions) -> anyhow::Result<()> {
    let scripts = script::load(&options.source)?;
    let mut collection = ScriptCollection::new(scripts);
    if let Some(id) = options.script.as_deref() {
        if !collection.select(id) && collection.selected_id() != Some(id) {
            tracing::warn!("script '{id}' not found, showing the first script");
        }
    }

    let title = format!(
        "prompter \u{2014} {}",
        options
            .source
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
    );

    let viewport = if options.windowed {
        egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 720.0])
            .with_title(&title)
    } else {
        egui::ViewportBuilder::default()
            .with_fullscreen(true)
            .with_title(&title)
    };

    let native_options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        &title,
        native_options,
        Box::new(move |cc| Ok(Box::new(PrompterApp::new(options, collection, &cc.egui_ctx)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_without_scripts_is_ignored() {
        assert_eq!(transport_intent(&Action::PlayPause, PlaybackState::Idle, false), None);
        assert_eq!(transport_intent(&Action::Stop, PlaybackState::Paused, false), None);
        assert_eq!(
            transport_intent(&Action::Reset, PlaybackState::Paused, false),
            Some(Intent::Reset)
        );
    }

    #[test]
    fn test_countdown_can_be_cancelled_after_scripts_vanish() {
        assert_eq!(
            transport_intent(&Action::PlayPause, PlaybackState::Counting(2), false),
            Some(Intent::PauseOrCancel)
        );
        assert_eq!(
            transport_intent(&Action::PauseOrCancel, PlaybackState::Counting(2), false),
            Some(Intent::PauseOrCancel)
        );
    }

    #[test]
    fn test_play_pause_with_script() {
        assert_eq!(
            transport_intent(&Action::PlayPause, PlaybackState::Idle, true),
            Some(Intent::Play)
        );
        assert_eq!(
            transport_intent(&Action::PlayPause, PlaybackState::Playing, true),
            Some(Intent::Play)
        );
        assert_eq!(
            transport_intent(&Action::Stop, PlaybackState::Playing, true),
            Some(Intent::Stop)
        );
    }
}
