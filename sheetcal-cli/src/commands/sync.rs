use std::io::IsTerminal;

use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use sheetcal_core::config::SheetcalConfig;
use sheetcal_core::{RowBlock, Synchronizer};
use sheetcal_google::{GoogleCalendar, GoogleSheet};

use crate::notifier::TerminalNotifier;
use crate::render::Render;

pub struct SyncArgs {
    pub first_row: u32,
    pub last_row: u32,
    pub sheet: Option<String>,
    pub calendar: Option<String>,
    pub time_zone: Option<String>,
    pub no_prompt: bool,
}

pub async fn run(args: SyncArgs) -> Result<()> {
    let mut cfg = SheetcalConfig::load()?;
    apply_overrides(&mut cfg, &args);

    let block = RowBlock::new(args.first_row, args.last_row)?;
    let settings = cfg.sync_settings()?;
    let token = cfg.require_access_token()?;
    let sheet = GoogleSheet::new(
        &cfg.sheets_api_base,
        cfg.require_spreadsheet_id()?,
        &cfg.sheet_name,
        token,
    )?;

    let notifier = TerminalNotifier::new(!args.no_prompt && std::io::stdin().is_terminal());
    let synchronizer = Synchronizer::new(GoogleCalendar::new(token), notifier, settings);

    println!(
        "Syncing {} rows {}-{} to calendar {}",
        cfg.sheet_name.bold(),
        block.first_row,
        block.last_row(),
        cfg.calendar_id.bold()
    );

    let report = synchronizer
        .sync(&sheet, block)
        .await
        .context("Sync aborted; rows before the failing one were written back")?;

    println!("{}", report.render());

    Ok(())
}

fn apply_overrides(cfg: &mut SheetcalConfig, args: &SyncArgs) {
    if let Some(sheet) = &args.sheet {
        cfg.sheet_name = sheet.clone();
    }
    if let Some(calendar) = &args.calendar {
        cfg.calendar_id = calendar.clone();
    }
    if let Some(zone) = &args.time_zone {
        cfg.time_zone = zone.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> SyncArgs {
        SyncArgs {
            first_row: 2,
            last_row: 4,
            sheet: None,
            calendar: None,
            time_zone: None,
            no_prompt: true,
        }
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = SheetcalConfig::default();
        let args = SyncArgs {
            sheet: Some("Events".to_string()),
            calendar: Some("team@example.com".to_string()),
            time_zone: Some("Europe/Paris".to_string()),
            ..args()
        };

        apply_overrides(&mut cfg, &args);

        assert_eq!(cfg.sheet_name, "Events");
        assert_eq!(cfg.calendar_id, "team@example.com");
        assert_eq!(cfg.time_zone, "Europe/Paris");
    }

    #[test]
    fn missing_flags_keep_config() {
        let mut cfg = SheetcalConfig::default();
        apply_overrides(&mut cfg, &args());

        assert_eq!(cfg.sheet_name, "Scheduler");
        assert_eq!(cfg.calendar_id, "primary");
        assert_eq!(cfg.time_zone, "Asia/Jakarta");
    }
}
