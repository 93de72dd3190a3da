use spin_picker::animation::{Area, ItemState, Phase};
use spin_picker::defaults::{CHAOS_END, SPOTLIGHT_END};
use spin_picker::easing::{ease_in_out_cubic, segment};
use spin_picker::ParticipantId;
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

/// Inline CSS placing one animated card.
pub fn item_style(item: &ItemState, transition: &str) -> String {
    let mut style = format!(
        "left: {:.1}px; top: {:.1}px; opacity: {:.3};",
        item.x, item.y, item.opacity
    );
    if (item.scale - 1.0).abs() > 1e-6 {
        style.push_str(&format!(" transform: scale({:.3});", item.scale));
    }
    if !transition.is_empty() {
        style.push_str(&format!(" transition: {};", transition));
    }
    style
}

/// CSS transition for a card, so the browser smooths between frames.
///
/// Spotlight transitions lengthen as the motion slows; the final placement
/// overshoots slightly on the highlighted card.
pub fn item_transition(phase: Option<Phase>, progress: f64, highlighted: bool) -> String {
    match phase {
        Some(Phase::Chaos) => "all 0.08s ease-out".to_string(),
        Some(Phase::Spotlight) => {
            let eased = ease_in_out_cubic(segment(progress, CHAOS_END, SPOTLIGHT_END));
            format!("all {:.2}s ease-out", 0.15 + eased * 0.25)
        }
        Some(Phase::Finale) if highlighted => "all 0.2s ease-out".to_string(),
        Some(Phase::Finale) => "all 0.3s ease-out".to_string(),
        Some(Phase::Settled) if highlighted => {
            "all 0.5s cubic-bezier(0.34, 1.56, 0.64, 1)".to_string()
        }
        Some(Phase::Settled) => "all 0.5s ease-out".to_string(),
        None => String::new(),
    }
}

/// Area from a measured element size; unlaid-out elements use the default.
pub fn area_from_size(width: i32, height: i32) -> Area {
    if width <= 0 || height <= 0 {
        Area::default()
    } else {
        Area::new(width as f64, height as f64)
    }
}

/// Dropdown value to id; the placeholder option has an empty value.
pub fn parse_participant_id(value: &str) -> Option<ParticipantId> {
    value.trim().parse().ok()
}

pub fn input_value(e: &InputEvent) -> String {
    let input: HtmlInputElement = e.target_unchecked_into();
    input.value()
}

pub fn select_value(e: &Event) -> String {
    let select: HtmlSelectElement = e.target_unchecked_into();
    select.value()
}
