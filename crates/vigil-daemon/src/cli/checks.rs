use super::commands::OutputFormat;
use std::sync::Arc;
use vigil_daemon::{
    summary_line, HealthAggregator, ProbeClient, SupervisorState, SystemResourceSampler,
    VigilConfig,
};
use vigil_types::{HealthRecord, VigilError, VigilResult};

pub async fn run_check(
    config: &VigilConfig,
    secondary: bool,
    format: OutputFormat,
) -> VigilResult<bool> {
    let aggregator = HealthAggregator::new(
        config.probe.clone(),
        config.monitor.clone(),
        Arc::new(ProbeClient::new()?),
        Arc::new(SystemResourceSampler::new()),
        Arc::new(SupervisorState::new()),
    );

    let record = aggregator.check().await;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&record)
                .map_err(|e| VigilError::Serialization(e.to_string()))?;
            println!("{}", json);
        }
        OutputFormat::Text => print_record(config, &record, secondary),
    }

    Ok(record.is_healthy())
}

fn print_record(config: &VigilConfig, record: &HealthRecord, secondary: bool) {
    let (color, mark) = if record.is_healthy() {
        ("\x1b[38;5;46m", "[+]")
    } else {
        ("\x1b[38;5;196m", "[-]")
    };

    println!("{}{}\x1b[0m {}", color, mark, config.probe.primary_url);
    println!("    {}", summary_line(record));
    if let Some(code) = record.primary_code {
        println!("    HTTP {}", code);
    }

    if secondary {
        let code = record
            .secondary_code
            .map(|c| format!("HTTP {}", c))
            .unwrap_or_else(|| "no response".into());
        println!(
            "{} {} ({})",
            if record.secondary_healthy { "[+]" } else { "[!]" },
            config.probe.secondary_url,
            code
        );
    }

    if let Some(sample) = record.resource_sample {
        println!(
            "\x1b[38;5;245m    memory {:.1}%  cpu {:.1}%\x1b[0m",
            sample.memory_pct, sample.cpu_pct
        );
    }

    if !record.issues.is_empty() {
        let issues: Vec<String> = record.issues.iter().map(|i| i.to_string()).collect();
        println!("\x1b[38;5;226m    issues: {}\x1b[0m", issues.join(", "));
    }

    println!("Overall: {}", record.overall());
}
