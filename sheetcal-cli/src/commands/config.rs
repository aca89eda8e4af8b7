use anyhow::Result;
use owo_colors::OwoColorize;
use sheetcal_core::config::SheetcalConfig;

pub fn run() -> Result<()> {
    let config_path = SheetcalConfig::config_path()?;
    let cfg = SheetcalConfig::load()?;

    println!("{}", "Paths".bold());
    println!(
        "  Config:       {}{}",
        config_path.display(),
        if config_path.exists() { "" } else { " (missing)" }
    );

    println!("\n{}", "Settings".bold());
    println!(
        "  Spreadsheet:  {}",
        cfg.spreadsheet_id.as_deref().unwrap_or("(not set)")
    );
    println!("  Sheet:        {}", cfg.sheet_name);
    println!("  Calendar:     {}", cfg.calendar_id);
    println!("  Time zone:    {}", cfg.time_zone);
    println!("  Sheets API:   {}", cfg.sheets_api_base);
    println!(
        "  Access token: {}",
        cfg.redacted_token().unwrap_or_else(|| "(not set)".to_string())
    );

    Ok(())
}
