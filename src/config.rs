//! Application-level configuration constants.

use spin_picker::animation::AnimationStyle;

// Routing
pub const ROUTE_ROSTER: &str = "#roster";
pub const ROUTE_SETUP: &str = "#setup";
pub const ROUTE_SELECT: &str = "#select";

// Animation
pub const DEFAULT_ANIMATION_STYLE: AnimationStyle = AnimationStyle::Physics;

// UI constants
pub const BADGE_COLOR: &str = "#667eea";
pub const PRESELECT_PLACEHOLDER: &str = "Select a participant...";
pub const EMPTY_ROSTER_MESSAGE: &str = "No participants added yet";
