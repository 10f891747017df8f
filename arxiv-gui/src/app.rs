use std::sync::Arc;
use std::time::{Duration, Instant};

use arxiv_core::{AppConfig, Event, ThemeConfig, Worker};
use eframe::egui::{self, Color32, Rounding, Stroke};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::debug;

use crate::landing::LandingView;
use crate::subscribe::SubscribeView;

/// Poll interval for worker events while requests are outstanding.
const PENDING_REPAINT: Duration = Duration::from_millis(100);

/// Resolved colors for one frame of drawing, optionally faded as a whole.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color32,
    pub panel: Color32,
    pub accent: Color32,
    pub text: Color32,
    pub secondary: Color32,
    pub border: Color32,
    pub link: Color32,
    pub warning: Color32,
    pub warning_bg: Color32,
    pub error: Color32,
}

impl Palette {
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        Self {
            background: theme.background_color32(),
            panel: theme.panel_color32(),
            accent: theme.accent_color32(),
            text: theme.text_color32(),
            secondary: theme.secondary_text_color32(),
            border: theme.border_color32(),
            link: Color32::from_rgb(37, 99, 235),
            warning: Color32::from_rgb(217, 119, 6),
            warning_bg: Color32::from_rgb(255, 251, 235),
            error: Color32::from_rgb(229, 57, 53),
        }
    }

    pub fn faded(self, opacity: f32) -> Self {
        let o = opacity.clamp(0.0, 1.0);
        Self {
            background: self.background.gamma_multiply(o),
            panel: self.panel.gamma_multiply(o),
            accent: self.accent.gamma_multiply(o),
            text: self.text.gamma_multiply(o),
            secondary: self.secondary.gamma_multiply(o),
            border: self.border.gamma_multiply(o),
            link: self.link.gamma_multiply(o),
            warning: self.warning.gamma_multiply(o),
            warning_bg: self.warning_bg.gamma_multiply(o),
            error: self.error.gamma_multiply(o),
        }
    }
}

pub struct AppInit {
    pub runtime: Arc<Runtime>,
    pub worker: Worker,
    pub events: mpsc::UnboundedReceiver<Event>,
    pub config: AppConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Landing,
    Subscribe,
}

pub struct ArxivApp {
    // Keeps the runtime behind the worker's handle alive.
    _runtime: Arc<Runtime>,
    worker: Worker,
    events: mpsc::UnboundedReceiver<Event>,
    palette: Palette,
    font_size: f32,
    theme_applied: bool,
    current_view: AppView,
    landing: LandingView,
    subscribe: SubscribeView,
}

impl ArxivApp {
    pub fn new(init: AppInit) -> Self {
        let landing = LandingView::new();
        init.worker.fetch_papers(landing.initial_fetch());
        Self {
            _runtime: init.runtime,
            worker: init.worker,
            events: init.events,
            palette: Palette::from_theme(&init.config.theme),
            font_size: init.config.ui.font_size,
            theme_applied: false,
            current_view: AppView::Landing,
            landing,
            subscribe: SubscribeView::new(init.config.ui.notice_duration()),
        }
    }

    fn setup_theme(&self, ctx: &egui::Context) {
        let mut style = (*ctx.style()).clone();
        let bg_color = self.palette.background;
        let panel_color = self.palette.panel;
        let border_color = self.palette.border;
        let text_color = self.palette.text;
        let accent_color = self.palette.accent;

        style.visuals = egui::Visuals::light();
        style.visuals.panel_fill = bg_color;
        style.visuals.window_fill = panel_color;
        style.visuals.extreme_bg_color = panel_color;
        style.visuals.override_text_color = Some(text_color);

        style.visuals.widgets.noninteractive.bg_stroke = Stroke::new(1.0, border_color);
        style.visuals.widgets.inactive.bg_stroke = Stroke::new(1.0, border_color);
        style.visuals.widgets.hovered.bg_stroke = Stroke::new(1.0, accent_color);
        style.visuals.widgets.active.bg_fill = accent_color;
        style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, Color32::WHITE);

        style.visuals.selection.bg_fill = accent_color.gamma_multiply(0.35);
        style.visuals.selection.stroke = Stroke::new(1.0, accent_color);

        for widget in [
            &mut style.visuals.widgets.noninteractive,
            &mut style.visuals.widgets.inactive,
            &mut style.visuals.widgets.hovered,
            &mut style.visuals.widgets.active,
        ] {
            widget.rounding = Rounding::same(6.0);
        }

        style.spacing.item_spacing = egui::vec2(10.0, 8.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.interact_size = egui::vec2(36.0, 28.0);

        for style_kind in [egui::TextStyle::Body, egui::TextStyle::Button] {
            if let Some(font) = style.text_styles.get_mut(&style_kind) {
                font.size = self.font_size;
            }
        }

        ctx.set_style(style);
    }

    fn refresh_updates(&mut self) {
        while let Ok(evt) = self.events.try_recv() {
            match evt {
                Event::PapersLoaded { ticket, result } => {
                    self.landing.feed_mut().finish_fetch(ticket.generation, result);
                }
                Event::PaperTranslated { entry_id, result } => {
                    self.landing.feed_mut().finish_translate(&entry_id, result);
                }
                Event::SubscriptionFinished { result } => {
                    self.subscribe.form_mut().finish_submit(result, Instant::now());
                }
            }
        }
    }

    fn has_pending_requests(&self) -> bool {
        let feed = self.landing.feed();
        feed.is_loading()
            || feed.translations_in_flight() > 0
            || self.subscribe.form().is_submitting()
    }

    fn draw_nav_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("nav_bar")
            .frame(
                egui::Frame::none()
                    .fill(self.palette.panel)
                    .inner_margin(egui::Margin::symmetric(16.0, 10.0))
                    .stroke(Stroke::new(1.0, self.palette.border)),
            )
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        egui::RichText::new("arXiv Agent")
                            .strong()
                            .size(18.0)
                            .color(self.palette.accent),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .selectable_label(self.current_view == AppView::Subscribe, "Subscribe")
                            .clicked()
                        {
                            self.switch_view(AppView::Subscribe);
                        }
                        if ui
                            .selectable_label(self.current_view == AppView::Landing, "Home")
                            .clicked()
                        {
                            self.switch_view(AppView::Landing);
                        }
                    });
                });
            });
    }

    fn switch_view(&mut self, view: AppView) {
        if self.current_view != view {
            debug!(?view, "switching view");
            self.current_view = view;
        }
    }
}

impl eframe::App for ArxivApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.setup_theme(ctx);
            self.theme_applied = true;
        }
        self.refresh_updates();
        if let Some(remaining) = self.subscribe.form_mut().tick(Instant::now()) {
            ctx.request_repaint_after(remaining);
        }

        self.draw_nav_bar(ctx);
        match self.current_view {
            AppView::Landing => {
                if let Some(view) = self.landing.show(ctx, self.palette, &self.worker) {
                    self.switch_view(view);
                }
            }
            AppView::Subscribe => self.subscribe.show(ctx, self.palette, &self.worker),
        }

        if self.has_pending_requests() {
            ctx.request_repaint_after(PENDING_REPAINT);
        }
    }
}
