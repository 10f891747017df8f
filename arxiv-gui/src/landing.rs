use arxiv_core::{FeedState, FetchTicket, LandingScroll, PanelStyle, Paper, TopicCode, Transition, Worker};
use eframe::egui::{self, emath::TSTransform, Color32, Rect, RichText, Stroke};
use tracing::warn;

use crate::app::{AppView, Palette};

const FEATURES: [(&str, &str); 4] = [
    ("📚", "Multi Domain"),
    ("👥", "Free Access"),
    ("✨", "AI Curated"),
    ("✉", "Daily Update"),
];

/// Hero panel and paper feed stacked over the same rectangle; a virtual
/// scroll offset over a container twice the viewport height drives the
/// hand-off between them.
pub struct LandingView {
    feed: FeedState,
    scroll: LandingScroll,
    list_at_top: bool,
}

impl LandingView {
    pub fn new() -> Self {
        Self {
            feed: FeedState::default(),
            scroll: LandingScroll::default(),
            list_at_top: true,
        }
    }

    pub fn initial_fetch(&self) -> FetchTicket {
        self.feed.initial_fetch()
    }

    pub fn feed(&self) -> &FeedState {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut FeedState {
        &mut self.feed
    }

    pub fn show(&mut self, ctx: &egui::Context, palette: Palette, worker: &Worker) -> Option<AppView> {
        let mut requested = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(palette.background))
            .show(ctx, |ui| {
                let viewport = ui.max_rect();
                let transition = self.update_scroll(ctx, viewport.height());

                // The panel the user mostly sees sits on the higher layer and
                // takes the input.
                let hero_on_top = transition.hero_interactive();
                let (hero_order, feed_order) = if hero_on_top {
                    (egui::Order::Foreground, egui::Order::Middle)
                } else {
                    (egui::Order::Middle, egui::Order::Foreground)
                };

                let feed_panel = PanelLayer::new("landing_feed", viewport, transition.feed, feed_order);
                feed_panel.show(ctx, !hero_on_top, palette, |ui, palette| {
                    self.draw_feed(ui, palette, worker);
                });
                let hero_panel = PanelLayer::new("landing_hero", viewport, transition.hero, hero_order);
                hero_panel.show(ctx, hero_on_top, palette, |ui, palette| {
                    if draw_hero(ui, palette) {
                        requested = Some(AppView::Subscribe);
                    }
                });
            });
        requested
    }

    fn update_scroll(&mut self, ctx: &egui::Context, viewport_height: f32) -> Transition {
        let delta = ctx.input(|i| i.smooth_scroll_delta.y);
        let transition = self.scroll.apply(delta, viewport_height, self.list_at_top);
        if transition.hero.opacity > 0.0 && transition.feed.opacity > 0.0 {
            // mid hand-off: keep frames coming until smooth scrolling settles
            ctx.request_repaint();
        }
        transition
    }

    fn draw_feed(&mut self, ui: &mut egui::Ui, palette: Palette, worker: &Worker) {
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(RichText::new("Latest Papers").strong().size(34.0));
            ui.label(
                RichText::new("Stay up to date with the newest research in your field")
                    .size(17.0)
                    .color(palette.secondary),
            );
            ui.add_space(12.0);
            ui.horizontal_wrapped(|ui| {
                for topic in TopicCode::ALL {
                    let selected = self.feed.selected() == topic;
                    if ui
                        .selectable_label(selected, RichText::new(topic.label()).size(14.0))
                        .on_hover_text(topic.code())
                        .clicked()
                    {
                        let ticket = self.feed.select_category(topic);
                        worker.fetch_papers(ticket);
                    }
                }
            });
        });
        ui.add_space(12.0);

        if self.feed.is_loading() || self.feed.papers().is_empty() {
            // Nothing to scroll, so upward wheel input goes back to the hero.
            self.list_at_top = true;
        }
        if self.feed.is_loading() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.add(egui::Spinner::new().size(32.0).color(palette.accent));
            });
            return;
        }
        if self.feed.papers().is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(30.0);
                ui.label(RichText::new("No papers found in this category").color(palette.secondary));
            });
            return;
        }

        let papers: Vec<Paper> = self.feed.papers().to_vec();
        let output = egui::ScrollArea::vertical()
            // Fresh scroll state for every category.
            .id_source(("paper_list", self.feed.generation()))
            .auto_shrink([false, false])
            .enable_scrolling(self.scroll.list_owns_scroll())
            .show(ui, |ui| {
                for paper in &papers {
                    self.draw_card(ui, palette, worker, paper);
                    ui.add_space(8.0);
                }
            });
        self.list_at_top = output.state.offset.y <= 0.5;
    }

    fn draw_card(&mut self, ui: &mut egui::Ui, palette: Palette, worker: &Worker, paper: &Paper) {
        egui::Frame::group(ui.style())
            .fill(palette.panel)
            .stroke(Stroke::new(1.0, palette.border))
            .inner_margin(egui::Margin::same(14.0))
            .show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.horizontal(|ui| {
                    badge(ui, &paper.category, palette.panel, palette.link);
                    badge(ui, "New", palette.warning, palette.warning_bg);
                });
                ui.add_space(4.0);
                ui.add(egui::Label::new(RichText::new(&paper.title).strong().size(18.0)).wrap(true));
                ui.add(
                    egui::Label::new(
                        RichText::new(&paper.abstract_text)
                            .size(14.0)
                            .color(palette.secondary),
                    )
                    .wrap(true),
                );
                ui.add_space(6.0);

                ui.horizontal(|ui| {
                    let published = paper.published_at.with_timezone(&chrono::Local);
                    ui.label(
                        RichText::new(format!("🕑 {}", published.format("%Y/%m/%d %H:%M")))
                            .size(13.0)
                            .color(palette.secondary),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(RichText::new("Read").color(palette.accent))
                            .on_hover_text(&paper.entry_id)
                            .clicked()
                        {
                            if let Err(e) = webbrowser::open(&paper.entry_id) {
                                warn!(error = %e, url = %paper.entry_id, "failed to open link");
                            }
                        }

                        if self.feed.is_translating(&paper.entry_id) {
                            ui.add(egui::Spinner::new().size(16.0).color(palette.link));
                        } else if ui
                            .button(RichText::new("translate").color(palette.link))
                            .clicked()
                        {
                            if let Some(ticket) = self.feed.begin_translate(&paper.entry_id) {
                                worker.translate(ticket);
                            }
                        }
                    });
                });

                if let Some(err) = self.feed.translation_error(&paper.entry_id) {
                    ui.label(
                        RichText::new(format!("Translation failed: {err}"))
                            .size(12.0)
                            .color(palette.error),
                    );
                }
            });
    }
}

/// Returns true when "Get Started" was clicked.
fn draw_hero(ui: &mut egui::Ui, palette: Palette) -> bool {
    let mut get_started = false;
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.12);
        ui.label(RichText::new("Stay Updated with arXiv").strong().size(52.0));
        ui.add_space(8.0);
        ui.label(
            RichText::new("The fastest way to track research topics and trends that matter to you")
                .size(20.0)
                .color(palette.secondary),
        );
        ui.add_space(20.0);
        let button = egui::Button::new(RichText::new("Get Started ↗").size(20.0).color(palette.panel))
            .fill(palette.accent)
            .min_size(egui::vec2(180.0, 48.0));
        if ui.add(button).clicked() {
            get_started = true;
        }
        ui.add_space(36.0);

        let tile = egui::vec2(200.0, 96.0);
        for row in FEATURES.chunks(2) {
            ui.horizontal(|ui| {
                let row_width = tile.x * 2.0 + ui.spacing().item_spacing.x;
                ui.add_space(((ui.available_width() - row_width) / 2.0).max(0.0));
                for (icon, label) in row {
                    egui::Frame::none()
                        .fill(palette.panel.gamma_multiply(0.7))
                        .rounding(12.0)
                        .show(ui, |ui| {
                            ui.set_min_size(tile);
                            ui.vertical_centered(|ui| {
                                ui.add_space(12.0);
                                ui.label(RichText::new(*icon).size(28.0).color(palette.accent));
                                ui.label(RichText::new(*label).strong().size(18.0));
                            });
                        });
                }
            });
        }
    });
    get_started
}

fn badge(ui: &mut egui::Ui, text: &str, fg: Color32, bg: Color32) {
    egui::Frame::none()
        .fill(bg)
        .rounding(8.0)
        .stroke(Stroke::new(1.0, fg.gamma_multiply(0.3)))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(RichText::new(text).size(12.0).color(fg));
        });
}

/// One full-viewport panel drawn on its own layer with a transition style
/// applied to it.
struct PanelLayer {
    id: egui::Id,
    viewport: Rect,
    style: PanelStyle,
    order: egui::Order,
}

impl PanelLayer {
    fn new(id: &str, viewport: Rect, style: PanelStyle, order: egui::Order) -> Self {
        Self {
            id: egui::Id::new(id),
            viewport,
            style,
            order,
        }
    }

    fn show(
        self,
        ctx: &egui::Context,
        interactive: bool,
        palette: Palette,
        add_contents: impl FnOnce(&mut egui::Ui, Palette),
    ) {
        if self.style.opacity <= 0.0 {
            return;
        }
        let viewport = self.viewport;
        let faded = palette.faded(self.style.opacity);
        let response = egui::Area::new(self.id)
            .fixed_pos(viewport.min)
            .order(self.order)
            .interactable(interactive)
            .show(ctx, |ui| {
                ui.set_clip_rect(viewport);
                ui.set_min_size(viewport.size());
                ui.set_max_size(viewport.size());
                fade_visuals(ui.visuals_mut(), self.style.opacity);
                ui.painter().rect_filled(viewport, 0.0, faded.background);
                add_contents(ui, faded);
            })
            .response;
        ctx.set_transform_layer(response.layer_id, self.transform());
    }

    /// Scales about the viewport center, then shifts vertically. egui layers
    /// only take a uniform scale, so the tilt is folded in as foreshortening.
    fn transform(&self) -> TSTransform {
        let scale = self.style.scale * self.style.rotate_deg.to_radians().cos();
        let center = self.viewport.center().to_vec2();
        let shift = egui::vec2(0.0, self.style.translate_y * self.viewport.height());
        TSTransform::new(center - center * scale + shift, scale)
    }
}

/// Multiplies the widget colors of a fading panel by `opacity`.
fn fade_visuals(visuals: &mut egui::Visuals, opacity: f32) {
    let opacity = opacity.clamp(0.0, 1.0);
    visuals.override_text_color = visuals
        .override_text_color
        .map(|c| c.gamma_multiply(opacity));
    for widget in [
        &mut visuals.widgets.noninteractive,
        &mut visuals.widgets.inactive,
        &mut visuals.widgets.hovered,
        &mut visuals.widgets.active,
        &mut visuals.widgets.open,
    ] {
        widget.bg_fill = widget.bg_fill.gamma_multiply(opacity);
        widget.weak_bg_fill = widget.weak_bg_fill.gamma_multiply(opacity);
        widget.bg_stroke.color = widget.bg_stroke.color.gamma_multiply(opacity);
        widget.fg_stroke.color = widget.fg_stroke.color.gamma_multiply(opacity);
    }
}
