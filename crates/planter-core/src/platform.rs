use std::path::PathBuf;

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planter")
}

pub fn data_dir() -> PathBuf {
    // ~/.local/share/planter on Linux; the sculpture normally runs on a Pi.
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("planter")
}
