//! JavaScript interop for blocking user notifications.

use log::warn;
use spin_picker::PickerError;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = window, js_name = alert)]
    fn window_alert(message: &str);
}

/// Show a blocking message box.
pub fn notify(message: &str) {
    warn!("{}", message);
    #[cfg(target_arch = "wasm32")]
    window_alert(message);
}

/// Report a user-input error.
pub fn notify_error(err: &PickerError) {
    notify(&err.to_string());
}
