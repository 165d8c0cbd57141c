use anyhow::{bail, Context, Result};
use clap::Parser;
use defi_analyzer::{analyzer, cli, config, report, scanner, server};
use defi_analyzer_common::{AccessGate, Event, MemoryStore, Telemetry};
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "defi_analyzer=debug,tower_http=debug"
    } else {
        "defi_analyzer=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load()?;
    if let Some(provider) = cli.provider {
        config.provider = provider;
    }

    match cli.command {
        Commands::Serve { bind, static_dir } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }

            let state = server::AppState::from_config(&config)?;
            server::Server::new(state, config.bind.clone()).run().await?;
        }

        Commands::Analyze { paths, output, password, recursive } => {
            println!("🔍 defi-analyzer - プロジェクト解析\n");

            // 0. アクセス確認
            let input = match password {
                Some(p) => p,
                None => dialoguer::Password::new()
                    .with_prompt("访问密码")
                    .interact()
                    .context("パスワード入力に失敗しました")?,
            };
            let telemetry = Telemetry::new(server::TracingSink);
            let mut session = MemoryStore::new();
            let gate = AccessGate::new(config.access_password.clone());
            if let Err(e) = gate.login(&mut session, &input, chrono::Utc::now().timestamp_millis()) {
                telemetry.track(&Event::LoginFailed);
                bail!(e);
            }
            telemetry.track(&Event::LoginSuccess);

            // 1. 文書スキャン
            println!("[1/3] 文書をスキャン中...");
            let documents = scanner::scan_paths(&paths, recursive)?;
            if documents.is_empty() {
                bail!(defi_analyzer::error::AnalyzerError::NoFiles);
            }
            for doc in &documents {
                println!("  - {}", doc.path.display());
            }
            println!("✔ {}件の文書を検出\n", documents.len());
            let files = scanner::load_documents(&documents)?;
            telemetry.track(&Event::FilesSelected {
                file_count: files.len(),
                total_files: files.len(),
            });

            // 2. AI解析
            let client = analyzer::AiClient::from_config(&config)?;
            println!(
                "[2/3] AI解析中... ({} / {})",
                client.provider_kind().display_name(),
                client.model()
            );
            telemetry.track(&Event::AnalysisStarted { file_count: files.len() });

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::default_spinner());
            spinner.set_message("Analyzing...");
            spinner.enable_steady_tick(Duration::from_millis(120));
            let result = analyzer::analyze_files(&client, files).await;
            spinner.finish_and_clear();

            let parsed = match result {
                Ok(parsed) => parsed,
                Err(e) => {
                    telemetry.track(&Event::AnalysisFailed { error: e.to_string() });
                    return Err(e.into());
                }
            };
            telemetry.track(&Event::AnalysisCompleted {
                file_count: documents.len(),
                overall_score: parsed.result.overall_score,
                risk_score: parsed.result.risk_score,
                degraded: parsed.is_degraded(),
            });
            println!("✔ 解析完了\n");

            // 3. 結果出力
            let names = documents.iter().map(|d| d.file_name.clone()).collect();
            let report = report::AnalysisReport::new(
                parsed,
                client.provider_kind().display_name(),
                client.model(),
                names,
            );
            println!("[3/3] 結果を出力中...");
            println!("{}", report::render_summary(&report));

            if let Some(output) = output {
                let json = serde_json::to_string_pretty(&report)?;
                std::fs::write(&output, json)
                    .with_context(|| format!("書き込みに失敗: {}", output.display()))?;
                println!("✔ 結果を保存: {}", output.display());
            }

            println!("\n✅ 解析完了");
        }

        Commands::Probe { models } => {
            let client = analyzer::AiClient::from_config(&config)?;
            println!(
                "🧪 {} モデル疎通確認\n",
                client.provider_kind().display_name()
            );

            let results = client.probe(&models).await;
            let mut failed = 0;
            for result in &results {
                match &result.outcome {
                    Ok(text) => println!("✔ {}: {}", result.model, text.replace('\n', " ")),
                    Err(e) => {
                        failed += 1;
                        println!("✘ {}: {}", result.model, e);
                    }
                }
            }

            if failed == results.len() {
                bail!("利用可能なモデルがありません");
            }
        }

        Commands::Config { show, path } => {
            if path {
                println!("{}", Config::config_path()?.display());
            }

            if show || !path {
                println!("設定:");
                for (key, value) in config.describe() {
                    println!("  {}: {}", key, value);
                }
            }
        }
    }

    Ok(())
}
