use std::borrow::Cow;

use crate::rocket::NOSE_VARIANTS;
use crate::viewer::{ViewerState, COLOR_OPTIONS};

/// Per-frame update: builds the control panel, applies whatever the
/// user changed, and advances the simulation.
pub fn update(state: &mut ViewerState, dt: f32, ui: &mut imgui::Ui) {
    draw_controls(state, ui);
    state.tick(dt);
}

fn draw_controls(state: &mut ViewerState, ui: &imgui::Ui) {
    ui.window("Rocket Controls")
        .position([16.0, 16.0], imgui::Condition::FirstUseEver)
        .size([260.0, 130.0], imgui::Condition::FirstUseEver)
        .build(|| {
            let mut variant_index = state.rocket.variant_index();
            if ui.combo("Nose cone", &mut variant_index, &NOSE_VARIANTS, |variant| {
                Cow::Borrowed(variant.name)
            }) {
                state.set_nose_variant(variant_index);
            }

            let mut color_index = state.color_index;
            if ui.combo("Nose color", &mut color_index, &COLOR_OPTIONS, |(name, _)| {
                Cow::Borrowed(*name)
            }) {
                state.set_nose_color(color_index);
            }

            if ui.button("Reset view") {
                state.reset_view();
            }
        });
}
