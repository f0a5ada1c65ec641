use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use directories::ProjectDirs;

use crate::domain::entities::geo::{GeoDataSource, EAST_ZONE_VALUE, WEST_ZONE_VALUE};
use crate::domain::entities::options::{FilterConfig, SelectOption};
use crate::infra::import::csv::parse_ward_records_csv;

mod app;
mod domain;
mod infra;
#[cfg(test)]
mod tests;
mod ui;
mod usecase;

use app::App;

const EAST_WARDS_CSV: &str = include_str!("../data/east_wards.csv");
const WEST_WARDS_CSV: &str = include_str!("../data/west_wards.csv");

fn main() {
    #[cfg(windows)]
    hide_console_window();

    let webview_data_dir =
        default_webview_data_dir().expect("should resolve and create WebView2 data directory");

    dioxus::LaunchBuilder::desktop()
        .with_cfg(
            dioxus::desktop::Config::new()
                .with_window(dioxus::desktop::WindowBuilder::new().with_title("BMC Reports"))
                .with_data_directory(webview_data_dir),
        )
        .launch(App);
}

#[cfg(windows)]
fn hide_console_window() {
    use windows_sys::Win32::System::Console::GetConsoleWindow;
    use windows_sys::Win32::UI::WindowsAndMessaging::{ShowWindow, SW_HIDE};

    let window = unsafe { GetConsoleWindow() };
    if window != 0 {
        unsafe { ShowWindow(window, SW_HIDE) };
    }
}

fn default_db_path() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("org", "bmc", "reports")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    Ok(project_dirs.data_local_dir().join("filters.sqlite"))
}

fn ensure_webview_data_dir(base_data_dir: &Path) -> Result<PathBuf> {
    let webview_data_dir = base_data_dir.join("webview2");
    std::fs::create_dir_all(&webview_data_dir).with_context(|| {
        format!(
            "failed to create webview dir: {}",
            webview_data_dir.display()
        )
    })?;
    Ok(webview_data_dir)
}

fn default_webview_data_dir() -> Result<PathBuf> {
    let project_dirs = ProjectDirs::from("org", "bmc", "reports")
        .ok_or_else(|| anyhow!("unable to resolve data directory"))?;
    ensure_webview_data_dir(project_dirs.data_local_dir())
}

fn default_filter_config() -> FilterConfig {
    FilterConfig {
        company_options: vec![SelectOption::new("BMC")],
        branch_options: vec![SelectOption::new("BMC")],
        town_options: vec![SelectOption::new("BHAVNAGAR_OSC")],
        zone_options: vec![
            SelectOption::new(EAST_ZONE_VALUE),
            SelectOption::new(WEST_ZONE_VALUE),
        ],
    }
}

fn default_geo_data() -> Result<GeoDataSource> {
    let east = parse_ward_records_csv(EAST_WARDS_CSV, "east_wards.csv")?;
    let west = parse_ward_records_csv(WEST_WARDS_CSV, "west_wards.csv")?;
    Ok(GeoDataSource::new(east, west))
}
