//! Details command implementation

use crate::cli::logging::log;
use crate::cli::LogLevel;
use crate::config::DetailsArgs;
use crate::session::{create_df_table_details, load_sessions, SessionDetails};

/// Text table of session details
pub fn format_details_table(details: &[SessionDetails]) -> String {
    let mut lines = vec![format!(
        "{:<12}{:>4}{:>8}{:>6}{:>6}{:>8}{:>6}{:>6}{:>6}{:>6}{:>8}{:>8}{:>10}",
        "Mouse", "Run", "f (Hz)", "N S1", "N S2", "Trials", "Hit", "FP", "Miss", "CR", "UR Hit", "AR Miss", "Too early"
    )];
    for d in details {
        lines.push(format!(
            "{:<12}{:>4}{:>8.1}{:>6}{:>6}{:>8}{:>6}{:>6}{:>6}{:>6}{:>8}{:>8}{:>10}",
            d.mouse, d.run, d.frequency, d.n_s1, d.n_s2, d.trials, d.hit, d.fp, d.miss, d.cr, d.ur_hit, d.ar_miss, d.too_early
        ));
    }
    lines.join("\n")
}

pub fn run_details(args: DetailsArgs, level: LogLevel) -> Result<(), String> {
    let sessions = load_sessions(&args.sessions).map_err(|e| e.to_string())?;
    let details = create_df_table_details(&sessions).map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&details)
            .map_err(|e| format!("Failed to serialize details: {e}"))?;
        println!("{json}");
    } else {
        log(level, LogLevel::Normal, &format_details_table(&details));
    }
    Ok(())
}
