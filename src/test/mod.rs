mod cfg_build;
#[cfg(target_os = "linux")]
mod native;
mod scenarios;
mod utils;
