pub mod actions;
pub mod state;
pub mod views;

// Re-export the shared state so the binary can build it directly.
pub use state::AppState;
