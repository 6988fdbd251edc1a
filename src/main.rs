use clap::Parser;
use std::path::Path;
use wine_mlops::domain::ports::Predictor;
use wine_mlops::utils::error::ErrorSeverity;
use wine_mlops::utils::{logger, validation::Validate};
use wine_mlops::{
    run_server, AppState, CliConfig, Command, FeatureVector, LocalStorage, MlopsError,
    PredictionPipeline, StageKind, TomlConfig, TrainingEngine,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 載入並驗證配置
    let config = match TomlConfig::from_file(&cli.config).and_then(|c| c.validate().map(|_| c)) {
        Ok(config) => config,
        Err(e) => {
            let _guard = logger::init_cli_logger(cli.verbose, None);
            tracing::error!("❌ Configuration error in {}: {}", cli.config, e);
            exit_with(&e);
            return Ok(());
        }
    };

    // 初始化日誌，guard 需存活到程式結束
    let _guard = if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        logger::init_json_logger(cli.verbose);
        None
    } else {
        let log_file = config
            .logging
            .as_ref()
            .map(|l| (Path::new(l.log_dir.as_str()), l.file_name.as_str()));
        logger::init_cli_logger(cli.verbose, log_file)
    };

    tracing::info!("Starting wine-mlops ({})", cli.config);
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    if let Err(e) = run(&cli, &config).await {
        exit_with(&e);
    }

    Ok(())
}

async fn run(cli: &CliConfig, config: &TomlConfig) -> wine_mlops::Result<()> {
    match &cli.command {
        Command::Serve { host, port } => {
            let project_root = std::env::current_dir()?;
            let state = AppState::from_config(config, &cli.config, &project_root)?;

            let (default_host, default_port) = config.server_address();
            let host = host.clone().unwrap_or(default_host);
            let port = port.unwrap_or(default_port);

            run_server(state, &host, port).await
        }
        Command::Train { stage, monitor } => {
            if *monitor {
                tracing::info!("🔍 System monitoring enabled");
            }

            let storage = LocalStorage::new(".");
            let engine = match stage {
                Some(name) => {
                    let kind: StageKind = name.parse()?;
                    TrainingEngine::new_with_monitoring(vec![kind.build(config, storage)], *monitor)
                }
                None => TrainingEngine::from_config(config, storage, *monitor),
            };

            let reports = engine.run().await?;
            for report in &reports {
                for artifact in &report.artifacts {
                    tracing::info!("📁 {}: {}", report.stage, artifact);
                }
            }
            tracing::info!("✅ Training pipeline completed ({} stages)", reports.len());
            println!("✅ Training pipeline completed ({} stages)", reports.len());
            Ok(())
        }
        Command::Predict { values } => {
            let features = FeatureVector::from_slice(values)?;
            let pipeline = PredictionPipeline::new(
                LocalStorage::new("."),
                config.get_model_trainer_config().model_path(),
            );

            let prediction = pipeline.predict(&features.to_matrix()).await?;
            tracing::info!("🍷 Predicted quality: {}", prediction);
            println!("{}", prediction);
            Ok(())
        }
    }
}

fn exit_with(e: &MlopsError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ wine-mlops failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,      // 警告，但成功
        ErrorSeverity::Medium => 2,   // 重試錯誤
        ErrorSeverity::High => 1,     // 處理錯誤
        ErrorSeverity::Critical => 3, // 系統錯誤
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
