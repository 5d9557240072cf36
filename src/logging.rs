#[cfg(target_family = "wasm")]
pub mod wasm;
