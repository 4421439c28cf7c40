use clap::Parser;
use keep_enex::utils::{logger, validation::Validate};
use keep_enex::{
    CliConfig, ConversionReport, ConvertError, EtlEngine, KeepPipeline, LocalStorage,
    OutputFormat, Settings,
};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        fail(e);
    }
}

async fn run(config: &CliConfig) -> Result<(), ConvertError> {
    config.validate()?;
    let settings = config.settings()?;
    tracing::info!(
        "Output encoding: {}",
        settings.encoding.output_encoding().name()
    );

    let report = match settings.format {
        OutputFormat::Evernote => convert_to_enex(settings).await?,
    };
    tracing::info!(
        "✅ Wrote {} notes to {}",
        report.notes_written,
        report.output_dir.display()
    );
    for skipped in &report.skipped {
        tracing::warn!("Skipped {}: {}", skipped.path.display(), skipped.reason);
    }

    if let Some(path) = &config.report {
        let json = serde_json::to_string_pretty(&report)?;
        tokio::fs::write(path, json).await?;
        tracing::info!("📁 Report saved to: {}", path.display());
    }

    Ok(())
}

async fn convert_to_enex(settings: Settings) -> Result<ConversionReport, ConvertError> {
    let storage = LocalStorage::new(settings.output_dir.clone());
    let pipeline = KeepPipeline::new(storage, settings)?;
    EtlEngine::new(pipeline).run().await
}

fn fail(e: ConvertError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code())
}
