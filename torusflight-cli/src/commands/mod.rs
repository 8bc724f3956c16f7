pub mod config_cmd;
pub mod run_cmd;
pub mod scene_cmd;
pub mod simulate_cmd;
