use crate::errors::HeroTextErrors;
use crate::gui::draw::{draw_badge, draw_text_with_shadow, draw_typed_line};
use crate::types::settings::{HeroSettings, SettingsApp};
use crate::typing::caret::CaretHandle;
use crate::typing::sequencer::TypingSequencer;
use eframe::egui::{CentralPanel, Context, Key, ViewportCommand, Visuals, pos2};
use eframe::epaint::{Color32, FontId};
use eframe::{App, Frame};
use std::time::Duration;

const MAX_FPS: u64 = 60;
const FRAME_TIME: Duration = Duration::from_millis(1000 / MAX_FPS);
const BACKGROUND: Color32 = Color32::from_rgb(10, 10, 12);
const MARGIN: f32 = 60.0;
const STAT_SPACING: f32 = 48.0;

/// Hero section of the portfolio: badge, greeting, name, typed tagline, stats.
pub struct HeroApp {
    hero: HeroSettings,
    sequencer: TypingSequencer,
    caret: CaretHandle,
    tagline_index: usize,
    font_size: f32,
    text_color: Color32,
    accent_color: Color32,
}

impl HeroApp {
    /// Starts the caret and the first tagline; needs a tokio runtime context.
    pub fn new(settings: &SettingsApp) -> Result<Self, HeroTextErrors> {
        let hero = settings.hero().clone();
        let caret = hero.caret()?.spawn();
        let mut sequencer = TypingSequencer::new();
        sequencer.start(hero.typing_params(0)?);
        Ok(Self {
            hero,
            sequencer,
            caret,
            tagline_index: 0,
            font_size: settings.font_size(),
            text_color: settings.text_color(),
            accent_color: settings.accent_color(),
        })
    }

    fn next_tagline(&mut self) -> Result<(), HeroTextErrors> {
        self.tagline_index = (self.tagline_index + 1) % self.hero.taglines().len();
        let params = self.hero.typing_params(self.tagline_index)?;
        if let Some(generation) = self.sequencer.ensure(&params) {
            log::info!(
                "showing tagline {} (generation {})",
                self.tagline_index,
                generation.get()
            );
        }
        Ok(())
    }

    fn caret_opacity(&self) -> f32 {
        if self.hero.caret_fade() {
            self.caret.opacity()
        } else if self.caret.is_visible() {
            1.0
        } else {
            0.0
        }
    }

    fn replay(&mut self) {
        if let Some(params) = self.sequencer.params().cloned() {
            self.sequencer.start(params);
        }
    }

    fn handle_input(&mut self, ctx: &Context) {
        let (next, replay, close) = ctx.input(|i| {
            (
                i.key_pressed(Key::Space) || i.key_pressed(Key::ArrowRight),
                i.key_pressed(Key::R),
                i.key_pressed(Key::Escape),
            )
        });
        if next {
            if let Err(err) = self.next_tagline() {
                log::error!("{}", err);
            }
        }
        if replay {
            self.replay();
        }
        if close {
            ctx.send_viewport_cmd(ViewportCommand::Close);
        }
    }
}

impl App for HeroApp {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.handle_input(ctx);
        if self.sequencer.poll() {
            ctx.request_repaint();
        }

        let app_frame = eframe::egui::Frame::default().fill(BACKGROUND);
        CentralPanel::default().frame(app_frame).show(ctx, |ui| {
            let painter = ui.painter();
            let rect = ui.max_rect();
            let wrap_width = rect.width() - MARGIN * 2.0;
            let muted = self.text_color.gamma_multiply(0.7);
            let x = rect.left() + MARGIN;
            let mut y = rect.top() + rect.height() * 0.2;

            let badge = draw_badge(
                painter,
                pos2(x, y),
                self.hero.badge(),
                FontId::proportional(self.font_size * 0.5),
                self.accent_color,
            );
            y = badge.bottom() + self.font_size;

            let title_font = FontId::proportional(self.font_size * 1.8);
            let greeting = draw_text_with_shadow(
                painter,
                pos2(x, y),
                self.hero.greeting(),
                title_font.clone(),
                self.text_color,
                wrap_width,
            );
            let name = draw_text_with_shadow(
                painter,
                pos2(x, greeting.bottom()),
                self.hero.name(),
                title_font,
                self.accent_color,
                wrap_width,
            );
            y = name.bottom() + self.font_size;

            let tagline = draw_typed_line(
                painter,
                pos2(x, y),
                self.sequencer.displayed(),
                FontId::proportional(self.font_size * 0.7),
                muted,
                self.caret_opacity(),
            );
            y = tagline.bottom() + self.font_size * 2.0;

            let mut stat_x = x;
            for stat in self.hero.stats() {
                let value = draw_text_with_shadow(
                    painter,
                    pos2(stat_x, y),
                    &stat.value,
                    FontId::proportional(self.font_size * 1.1),
                    self.text_color,
                    wrap_width,
                );
                let label = draw_text_with_shadow(
                    painter,
                    pos2(stat_x, value.bottom()),
                    &stat.label,
                    FontId::proportional(self.font_size * 0.5),
                    muted,
                    wrap_width,
                );
                stat_x = value.right().max(label.right()) + STAT_SPACING;
            }
        });

        // The caret blinks even when nothing is typing, so keep repainting.
        ctx.request_repaint_after(FRAME_TIME);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("closing hero banner");
        self.sequencer.cancel();
        self.caret.stop();
    }

    fn clear_color(&self, _visuals: &Visuals) -> [f32; 4] {
        BACKGROUND.to_normalized_gamma_f32()
    }
}
