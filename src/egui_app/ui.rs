//! egui renderer for the application UI.

use eframe::egui::{self, Align2, Color32, Frame, Margin, RichText, Stroke, Ui};

use crate::egui_app::controller::Controller;
use crate::egui_app::state::{ControlView, FieldRowView};
use crate::form::FieldValue;

/// Minimum usable size for the main window.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(480.0, 560.0);

const MUTED_TEXT: Color32 = Color32::from_rgb(140, 140, 140);
const ACCENT: Color32 = Color32::from_rgb(90, 176, 255);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: Controller,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app and load persisted configuration.
    pub fn new() -> Self {
        let mut controller = Controller::new();
        controller.load_configuration();
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        visuals.window_fill = Color32::from_rgb(12, 12, 12);
        visuals.panel_fill = Color32::from_rgb(16, 16, 16);
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(16, 16, 16);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(Color32::from_rgb(24, 24, 24)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new("Visor").color(Color32::WHITE).strong());
                    ui.add_space(8.0);
                    ui.label(RichText::new("PMML model scoring").color(MUTED_TEXT));
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui
                            .button(RichText::new("Close").color(Color32::WHITE))
                            .clicked()
                        {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
    }

    fn render_status(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar")
            .frame(Frame::new().fill(Color32::from_rgb(0, 0, 0)))
            .show(ctx, |ui| {
                let status = self.controller.ui.status.clone();
                ui.horizontal(|ui| {
                    ui.add_space(8.0);
                    let (badge_rect, _) =
                        ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                    ui.painter().rect_filled(badge_rect, 2.0, status.badge_color);
                    ui.add_space(8.0);
                    ui.label(RichText::new(&status.badge_label).color(Color32::WHITE));
                    ui.separator();
                    ui.label(RichText::new(&status.text).color(Color32::WHITE));
                });
            });
    }

    fn render_load_section(&mut self, ui: &mut Ui) {
        if ui
            .button(RichText::new("Load PMML model…").color(Color32::WHITE))
            .clicked()
        {
            self.controller.open_model_via_dialog();
        }
        if let Some(model) = &self.controller.ui.model {
            ui.add_space(6.0);
            ui.label(RichText::new(&model.name).color(Color32::WHITE).strong());
            let mut summary = format!("{} input fields", model.field_count);
            if let Some(target) = &model.target {
                summary.push_str(&format!(", predicts '{target}'"));
            }
            ui.label(RichText::new(summary).color(MUTED_TEXT));
            ui.label(RichText::new(&model.path).color(MUTED_TEXT).small());
        }
    }

    fn render_form(&mut self, ui: &mut Ui) {
        let rows = self.controller.ui.rows.clone();
        egui::ScrollArea::vertical()
            .id_salt("form_scroll")
            .show(ui, |ui| {
                for (index, row) in rows.iter().enumerate() {
                    self.render_field_row(ui, index, row);
                }
            });
    }

    fn render_field_row(&mut self, ui: &mut Ui, index: usize, row: &FieldRowView) {
        let frame = Frame::new()
            .fill(Color32::from_rgb(20, 20, 20))
            .stroke(Stroke::new(1.0, Color32::from_rgb(48, 48, 48)))
            .inner_margin(Margin::symmetric(10, 8));
        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(RichText::new(&row.label).color(Color32::WHITE).strong());
            ui.add_space(4.0);
            match &row.control {
                ControlView::Radio { options } => {
                    if let Some(FieldValue::Choice(selected)) = self.controller.value_mut(index) {
                        ui.horizontal_wrapped(|ui| {
                            for option in options {
                                ui.radio_value(selected, option.clone(), option);
                            }
                        });
                    }
                }
                ControlView::Combo { options } => match self.controller.value_mut(index) {
                    Some(FieldValue::Choice(selected)) => {
                        egui::ComboBox::from_id_salt(&row.name)
                            .selected_text(selected.clone())
                            .show_ui(ui, |ui| {
                                for option in options {
                                    ui.selectable_value(selected, option.clone(), option);
                                }
                            });
                    }
                    Some(FieldValue::Number(number)) => {
                        let mut selected = crate::pmml::format_number(*number);
                        egui::ComboBox::from_id_salt(&row.name)
                            .selected_text(selected.clone())
                            .show_ui(ui, |ui| {
                                for option in options {
                                    ui.selectable_value(&mut selected, option.clone(), option);
                                }
                            });
                        if let Ok(parsed) = selected.parse::<f64>() {
                            *number = parsed;
                        }
                    }
                    _ => {}
                },
                ControlView::Slider { min, max } => {
                    let mut changed = false;
                    if let Some(FieldValue::Number(number)) = self.controller.value_mut(index) {
                        let response = ui.add(egui::Slider::new(number, *min..=*max));
                        changed = response.changed();
                    }
                    if changed {
                        self.controller.snap_value(index);
                    }
                }
                ControlView::TextBox => {
                    if let Some(FieldValue::Text(text)) = self.controller.value_mut(index) {
                        ui.text_edit_singleline(text);
                    }
                }
            }
            ui.add_space(2.0);
            ui.label(RichText::new(&row.hint).color(MUTED_TEXT).small());
        });
        ui.add_space(8.0);
    }

    fn render_result_section(&mut self, ui: &mut Ui) {
        let enabled = self.controller.model_loaded();
        let button = egui::Button::new(RichText::new("Predict").color(Color32::WHITE));
        if ui.add_enabled(enabled, button).clicked() {
            self.controller.predict();
        }
        ui.add_space(6.0);
        match &self.controller.ui.result {
            Some(result) => {
                ui.label(
                    RichText::new(format!("Result: {result}"))
                        .color(ACCENT)
                        .heading(),
                );
            }
            None => {
                ui.label(RichText::new("No prediction yet").color(MUTED_TEXT));
            }
        }
    }

    fn render_modal(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.controller.ui.modal.clone() else {
            return;
        };
        let mut open = true;
        let mut dismiss = false;
        egui::Window::new(&prompt.title)
            .anchor(Align2::CENTER_CENTER, egui::vec2(0.0, 0.0))
            .collapsible(false)
            .resizable(false)
            .auto_sized()
            .open(&mut open)
            .show(ctx, |ui| {
                ui.set_min_width(320.0);
                ui.label(&prompt.message);
                ui.add_space(8.0);
                if ui.button("Dismiss").clicked() {
                    dismiss = true;
                }
            });
        if dismiss || !open {
            self.controller.dismiss_modal();
        }
    }
}

impl Default for EguiApp {
    fn default() -> Self {
        Self::new()
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.render_top_bar(ctx);
        egui::CentralPanel::default().show(ctx, |ui| {
            self.render_load_section(ui);
            ui.add_space(10.0);
            ui.separator();
            ui.add_space(10.0);
            egui::TopBottomPanel::bottom("result_section")
                .frame(Frame::new().fill(Color32::TRANSPARENT))
                .show_inside(ui, |ui| {
                    ui.add_space(8.0);
                    self.render_result_section(ui);
                });
            self.render_form(ui);
        });
        self.render_status(ctx);
        self.render_modal(ctx);
    }
}
