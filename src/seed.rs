//! Server Seed
//!
//! Reads the JSON the page server embedded next to the first frame.

use todo_core::page::SEED_ELEMENT_ID;
use todo_core::InitialState;

/// Parse `#initial-state`; `None` when the element is missing or malformed
pub fn read_initial_state() -> Option<InitialState> {
    let document = web_sys::window()?.document()?;
    let element = document.get_element_by_id(SEED_ELEMENT_ID)?;
    let json = element.text_content()?;
    match serde_json::from_str(&json) {
        Ok(state) => Some(state),
        Err(e) => {
            web_sys::console::error_1(&format!("[Seed] Invalid initial state: {}", e).into());
            None
        }
    }
}
