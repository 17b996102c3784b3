//! Egui input guard: prevents click-through from UI elements to the map.
//!
//! While egui (palette, toolbar, location picker) handles the pointer or
//! has a focused text field, map input systems skip processing so a click on
//! a panel never places or grabs an object underneath it.

use bevy_egui::EguiContexts;

/// Returns `true` when the cursor is over an egui panel or egui is
/// handling a drag/click. Pointer systems early-return on `true`.
#[inline]
pub fn egui_wants_pointer(contexts: &mut EguiContexts) -> bool {
    let ctx = contexts.ctx_mut();
    ctx.wants_pointer_input() || ctx.is_pointer_over_area()
}

/// Returns `true` while a text field (the palette search) has focus.
#[inline]
pub fn egui_wants_keyboard(contexts: &mut EguiContexts) -> bool {
    contexts.ctx_mut().wants_keyboard_input()
}
