use anyhow::Result;
use sheetcal_core::config::SheetcalConfig;

pub fn run(force: bool) -> Result<()> {
    let config_path = SheetcalConfig::config_path()?;

    if config_path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}\n\
            Use `sheetcal init --force` to overwrite it",
            config_path.display()
        );
    }

    SheetcalConfig::create_default_config(&config_path)?;

    println!("Wrote {}", config_path.display());
    println!("\nSet spreadsheet_id there, then export SHEETCAL_ACCESS_TOKEN and run:");
    println!("  sheetcal sync --first-row 2 --last-row 20");

    Ok(())
}
