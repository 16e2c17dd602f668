//! Todo Frontend Entry Point

fn main() {
    #[cfg(target_arch = "wasm32")]
    todo_ui::start();
}
