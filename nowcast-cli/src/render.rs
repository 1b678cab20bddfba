use nowcast_core::{AppController, Phase};

/// Text for the current screen: the display block, plus the last error if any.
pub fn screen(controller: &AppController) -> String {
    let mut lines = Vec::new();

    match controller.display() {
        Some(display) => {
            lines.push(format!("{}  {}", display.icon.glyph(), display.location_label));
            lines.push(format!("   {}  {}", display.temperature, display.condition_text));
            lines.push(format!("   [{}]", display.icon));
        }
        None if controller.phase() == Phase::Idle && controller.last_error().is_none() => {
            lines.push("No weather loaded yet.".to_string());
        }
        None => {}
    }

    if let Some(err) = controller.last_error() {
        lines.push(format!("error: {err}"));
    }

    lines.join("\n")
}
