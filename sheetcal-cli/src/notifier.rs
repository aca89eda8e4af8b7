use dialoguer::Input;
use owo_colors::OwoColorize;
use sheetcal_core::notify::{Alert, Notifier};

/// Shows alerts on stderr, optionally waiting for the user to acknowledge.
pub struct TerminalNotifier {
    prompt: bool,
}

impl TerminalNotifier {
    pub fn new(prompt: bool) -> Self {
        TerminalNotifier { prompt }
    }
}

impl Notifier for TerminalNotifier {
    fn alert(&self, alert: &Alert) {
        eprintln!("\n{} {}", "!".red().bold(), alert.headline().red().bold());
        eprintln!("  {}", alert.to_string().dimmed());

        if !self.prompt {
            return;
        }

        let acknowledged = Input::<String>::new()
            .with_prompt("Press Enter to continue")
            .allow_empty(true)
            .interact_text();
        if let Err(e) = acknowledged {
            tracing::debug!("alert prompt failed: {e}");
        }
    }
}
