use bevy_egui::{egui, EguiContexts};

pub fn apply_editor_theme(mut contexts: EguiContexts) {
    let ctx = contexts.ctx_mut();
    let mut style = (*ctx.style()).clone();

    // Earthy dark panels
    let panel = egui::Color32::from_rgb(38, 36, 32);
    let inactive = egui::Color32::from_rgb(58, 54, 46);
    let hover = egui::Color32::from_rgb(84, 76, 60);
    let active = egui::Color32::from_rgb(190, 150, 80);

    style.visuals.widgets.noninteractive.bg_fill = panel;
    style.visuals.widgets.inactive.bg_fill = inactive;
    style.visuals.widgets.hovered.bg_fill = hover;
    style.visuals.widgets.active.bg_fill = active;
    style.visuals.widgets.inactive.weak_bg_fill = inactive;
    style.visuals.widgets.hovered.weak_bg_fill = hover;
    style.visuals.widgets.active.weak_bg_fill = active;

    style.visuals.window_fill = panel;
    style.visuals.panel_fill = panel;
    style.visuals.extreme_bg_color = egui::Color32::from_rgb(28, 26, 24);
    style.visuals.faint_bg_color = egui::Color32::from_rgb(46, 43, 38);

    style.visuals.selection.bg_fill = active;
    style.visuals.selection.stroke = egui::Stroke::new(1.0, active);

    let window_rounding = egui::CornerRadius::same(6);
    let widget_rounding = egui::CornerRadius::same(4);

    style.visuals.window_corner_radius = window_rounding;
    style.visuals.widgets.noninteractive.corner_radius = widget_rounding;
    style.visuals.widgets.inactive.corner_radius = widget_rounding;
    style.visuals.widgets.hovered.corner_radius = widget_rounding;
    style.visuals.widgets.active.corner_radius = widget_rounding;

    // Tool and palette tooltips
    style.interaction.tooltip_delay = 0.3;

    ctx.set_style(style);
}
