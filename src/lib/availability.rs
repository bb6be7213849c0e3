//! Weekly availability editing: the one-hour selection grid, the pointer
//! state machine driving it and the API plumbing around them.
pub mod availability_client;
pub mod editor;
pub mod grid;
pub mod helpers;
pub mod models;
pub mod run_tool;
pub mod selection;
pub mod week;
