use colored::Colorize;

use cloudy_rs::Cloudy;

use crate::CliError;

pub async fn usage(cloudy: &Cloudy) -> Result<(), CliError> {
    let usage = cloudy.get_usage(false).await?;

    let pct = (usage.server_usage.exact * 100)
        .checked_div(usage.data_cap.exact)
        .unwrap_or(0);

    let summary = format!(
        "{} of {} used ({pct}%), {} file(s)",
        usage.server_usage.readable, usage.data_cap.readable, usage.file_count
    );
    if pct >= 90 {
        println!("{}", summary.red());
    } else {
        println!("{summary}");
    }
    Ok(())
}
