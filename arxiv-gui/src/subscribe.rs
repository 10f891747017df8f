use std::time::Duration;

use arxiv_core::{Notice, PushTime, SubscriptionForm, TopicCode, Worker};
use eframe::egui::{self, RichText};
use tracing::debug;

use crate::app::Palette;

pub struct SubscribeView {
    form: SubscriptionForm,
    show_topics: bool,
}

impl SubscribeView {
    pub fn new(notice_duration: Duration) -> Self {
        Self {
            form: SubscriptionForm::new(notice_duration),
            show_topics: false,
        }
    }

    pub fn form(&self) -> &SubscriptionForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut SubscriptionForm {
        &mut self.form
    }

    pub fn show(&mut self, ctx: &egui::Context, palette: Palette, worker: &Worker) {
        // An error dialog blocks the form until it is dismissed.
        let blocked = matches!(self.form.notice(), Some(Notice::Error(_)));
        egui::CentralPanel::default()
            .frame(
                egui::Frame::none()
                    .fill(palette.background)
                    .inner_margin(egui::Margin::same(24.0)),
            )
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| {
                            ui.set_max_width(720.0_f32.min(ui.available_width()));
                            self.draw_form(ui, palette, worker);
                        });
                });
            });
        self.draw_notice(ctx, palette);
    }

    fn draw_form(&mut self, ui: &mut egui::Ui, palette: Palette, worker: &Worker) {
        ui.vertical_centered(|ui| {
            ui.add_space(16.0);
            ui.label(RichText::new("Research Paper Updates").strong().size(40.0));
            ui.label(
                RichText::new(
                    "Select your topics of interest and get personalized research paper recommendations",
                )
                .size(18.0)
                .color(palette.secondary),
            );
        });
        ui.add_space(24.0);

        section_label(ui, "Search Topics");
        ui.add(
            egui::TextEdit::singleline(&mut self.form.query)
                .hint_text("Search for research topics...")
                .desired_width(480.0),
        );
        ui.add_space(12.0);

        section_label(ui, "Selected Topic");
        self.draw_topic_picker(ui, palette);
        ui.add_space(12.0);

        section_label(ui, "Email Address");
        ui.add(
            egui::TextEdit::singleline(&mut self.form.email)
                .hint_text("✉ Enter your email for updates")
                .desired_width(480.0),
        );
        ui.add_space(12.0);

        section_label(ui, "Update Time");
        self.draw_time_picker(ui);
        if let Some(time) = self.form.push_time() {
            ui.label(
                RichText::new(format!("Papers will be delivered to your inbox daily at {time}"))
                    .color(palette.secondary),
            );
        }
        ui.add_space(20.0);

        let label = if self.form.is_submitting() {
            "Subscribing..."
        } else {
            "Subscribe to Updates"
        };
        let button = egui::Button::new(RichText::new(label).size(20.0).color(palette.panel))
            .fill(palette.accent)
            .min_size(egui::vec2(ui.available_width(), 52.0));
        let response = ui.add_enabled(self.form.can_submit(), button);
        if !self.form.can_submit() && !self.form.is_submitting() {
            let missing = self.form.missing_fields().join(", ");
            response.on_disabled_hover_text(format!("Missing: {missing}"));
        } else if response.clicked() {
            match self.form.begin_submit() {
                Ok(request) => worker.subscribe(request),
                Err(e) => debug!(error = %e, "submit ignored"),
            }
        }
    }

    fn draw_topic_picker(&mut self, ui: &mut egui::Ui, palette: Palette) {
        ui.horizontal_wrapped(|ui| match self.form.topic() {
            Some(topic) => {
                egui::Frame::none()
                    .fill(palette.accent.gamma_multiply(0.15))
                    .rounding(8.0)
                    .inner_margin(egui::Margin::symmetric(10.0, 4.0))
                    .show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(topic.label()).size(16.0));
                            if ui.small_button("✖").on_hover_text("Remove topic").clicked() {
                                self.form.clear_topic();
                            }
                        });
                    });
            }
            None => {
                if ui.button(RichText::new("➕ Add Topic").size(16.0)).clicked() {
                    self.show_topics = !self.show_topics;
                }
            }
        });

        if self.show_topics && self.form.topic().is_none() {
            egui::Frame::group(ui.style()).fill(palette.panel).show(ui, |ui| {
                egui::Grid::new("topic_grid")
                    .num_columns(2)
                    .spacing(egui::vec2(12.0, 8.0))
                    .show(ui, |ui| {
                        for (i, topic) in TopicCode::ALL.into_iter().enumerate() {
                            if ui
                                .add_sized(
                                    egui::vec2(240.0, 32.0),
                                    egui::Button::new(RichText::new(topic.label()).size(15.0)).frame(false),
                                )
                                .on_hover_text(topic.code())
                                .clicked()
                            {
                                self.form.select_topic(topic);
                                self.show_topics = false;
                            }
                            if i % 2 == 1 {
                                ui.end_row();
                            }
                        }
                    });
            });
        }
    }

    fn draw_time_picker(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let hour_text = self.form.hour.map(|h| format!("{h:02}")).unwrap_or_else(|| "Hour".into());
            egui::ComboBox::from_id_source("push_hour")
                .selected_text(hour_text)
                .width(80.0)
                .show_ui(ui, |ui| {
                    for h in PushTime::HOURS {
                        ui.selectable_value(&mut self.form.hour, Some(h), format!("{h:02}:00"));
                    }
                });
            ui.label(RichText::new(":").size(20.0));
            let minute_text = self.form.minute.map(|m| format!("{m:02}")).unwrap_or_else(|| "Min".into());
            egui::ComboBox::from_id_source("push_minute")
                .selected_text(minute_text)
                .width(80.0)
                .show_ui(ui, |ui| {
                    for m in PushTime::MINUTES {
                        ui.selectable_value(&mut self.form.minute, Some(m), format!("{m:02}"));
                    }
                });
        });
    }

    fn draw_notice(&mut self, ctx: &egui::Context, palette: Palette) {
        let Some(notice) = self.form.notice().cloned() else {
            return;
        };
        let mut dismissed = false;
        match notice {
            Notice::Success { .. } => {
                let time = self.form.push_time().map(|t| t.to_string()).unwrap_or_default();
                egui::Window::new("subscribe_success")
                    .title_bar(false)
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.set_width(460.0);
                        ui.vertical_centered(|ui| {
                            ui.horizontal(|ui| {
                                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                    if ui.small_button("✖").clicked() {
                                        dismissed = true;
                                    }
                                });
                            });
                            ui.label(RichText::new("✔ Subscribed!").strong().size(22.0).color(palette.accent));
                            ui.label(format!(
                                "You are subscribed to arXiv Agent. A paper digest will arrive every day at {time}."
                            ));
                            ui.add_space(8.0);
                        });
                    });
            }
            Notice::Error(message) => {
                egui::Window::new("Subscription failed")
                    .collapsible(false)
                    .resizable(false)
                    .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
                    .show(ctx, |ui| {
                        ui.label(RichText::new(message).color(palette.error));
                        ui.add_space(8.0);
                        if ui.button("OK").clicked() {
                            dismissed = true;
                        }
                    });
            }
        }
        if dismissed {
            self.form.dismiss_notice();
        }
    }
}

fn section_label(ui: &mut egui::Ui, text: &str) {
    ui.label(RichText::new(text).strong().size(18.0));
}
