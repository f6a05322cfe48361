use clap::Parser;
use review_sheet::{cli, config, error, review, sheets, store, webhook};
use cli::{Cli, Commands, SheetArgs};
use config::{mask_secret, Config};
use error::{ReviewSheetError, Result};
use review_sheet_common::{display_name, lookup, normalize};
use store::FileStore;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use webhook::WebhookClient;

/// ログ初期化（RUST_LOG があれば優先、なければ --verbose で debug）
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(cli_store: Option<&std::path::Path>, config: &Config) -> Result<FileStore> {
    let path = match cli_store {
        Some(path) => path.to_path_buf(),
        None => config.store_path()?,
    };
    FileStore::load(&path)
}

async fn load_sheet(config: &Config, args: &SheetArgs) -> Result<Option<review_sheet_common::SheetData>> {
    sheets::load_sheet(config, args.sheet.as_deref(), args.sheet_name.as_deref()).await
}

async fn load_sheet_or_none(config: &Config, args: &SheetArgs) -> Option<review_sheet_common::SheetData> {
    sheets::load_sheet_or_none(config, args.sheet.as_deref(), args.sheet_name.as_deref()).await
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;
    let store_override = cli.store.as_deref();

    match cli.command {
        Commands::Lookup { file_name, sheet, key_column, start_column, json } => {
            let mut options = config.lookup_options();
            if let Some(column) = key_column {
                options.key_column = column;
            }
            if let Some(column) = start_column {
                options.display_start_column = column;
            }

            let data = load_sheet(&config, &sheet).await?;
            let outcome = lookup(&file_name, data.as_ref(), &options)?;
            debug!(key = %outcome.key, found = outcome.found, "照合結果");

            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("🔎 {}\n", display_name(&file_name));
                for line in review::render_lookup(&outcome) {
                    println!("  {}", line);
                }
            }
        }

        Commands::Normalize { names } => {
            for name in names {
                println!("{}", name);
                println!("  照合キー: {}", normalize(&name));
                println!("  表示名: {}", display_name(&name));
            }
        }

        Commands::Register { minio_path, name } => {
            let mut store = open_store(store_override, &config)?;
            let record = store.register(&minio_path, &name)?.clone();
            store.save()?;
            println!("✔ 登録しました: {} [{}]", display_name(&record.name), record.id);
        }

        Commands::Pending { json } => {
            let store = open_store(store_override, &config)?;
            let pending = store.pending();
            if json {
                println!("{}", serde_json::to_string_pretty(&pending)?);
            } else if pending.is_empty() {
                println!("未レビューのファイルはありません");
            } else {
                println!("未レビュー: {}件\n", pending.len());
                for record in pending {
                    for line in review::summarize_record(record) {
                        println!("{}", line);
                    }
                }
            }
        }

        Commands::History { json } => {
            let store = open_store(store_override, &config)?;
            let history = store.history();
            if json {
                println!("{}", serde_json::to_string_pretty(&history)?);
            } else if history.is_empty() {
                println!("レビュー履歴はありません");
            } else {
                println!("レビュー履歴: {}件\n", history.len());
                for record in history {
                    for line in review::summarize_record(record) {
                        println!("{}", line);
                    }
                }
            }
        }

        Commands::Show { id, sheet } => {
            let store = open_store(store_override, &config)?;
            let record = store.require(&id)?;
            let data = load_sheet_or_none(&config, &sheet).await;
            review::print_record_with_sheet(record, data.as_ref(), &config)?;
        }

        Commands::Review { id, sheet } => {
            println!("📝 review-sheet - レビュー\n");
            let mut store = open_store(store_override, &config)?;

            let ids: Vec<String> = match id {
                Some(id) => vec![store.require(&id)?.id.clone()],
                None => store.pending().iter().map(|r| r.id.clone()).collect(),
            };
            if ids.is_empty() {
                println!("未レビューのファイルはありません");
                return Ok(());
            }

            let data = load_sheet_or_none(&config, &sheet).await;
            let mut reviewed = 0;
            for (i, id) in ids.iter().enumerate() {
                println!("[{}/{}]", i + 1, ids.len());
                if review::run_interactive_review(&config, &mut store, id, data.as_ref())
                    .await?
                    .is_some()
                {
                    reviewed += 1;
                }
            }
            println!("\n✅ {}件中{}件をレビューしました", ids.len(), reviewed);
        }

        Commands::Mark { id, status } => {
            let mut store = open_store(store_override, &config)?;
            let record = store.mark_reviewed(&id, status)?.clone();
            store.save()?;
            println!("✔ {} → {}", display_name(&record.name), status);
        }

        Commands::Download { id, output } => {
            let store = open_store(store_override, &config)?;
            let record = store.require(&id)?;
            review::download_content(&config, record, output.as_deref()).await?;
        }

        Commands::SaveContent { id, file } => {
            let store = open_store(store_override, &config)?;
            let record = store.require(&id)?;

            match file {
                Some(path) => {
                    if !path.exists() {
                        return Err(ReviewSheetError::FileNotFound(path.display().to_string()));
                    }
                    let content = std::fs::read_to_string(&path)?;
                    let url = config.save_content_webhook()?;
                    let client = WebhookClient::new(config.timeout_seconds)?;
                    let response = client.save_content(url, record, &content).await?;
                    println!("✔ 本文を保存ワークフローへ送りました: {}", response);
                }
                None => review::edit_content(&config, record).await?,
            }
        }

        Commands::RegeneratePdf { id } => {
            let store = open_store(store_override, &config)?;
            let record = store.require(&id)?;
            review::regenerate_pdf(&config, record).await?;
        }

        Commands::Config { set, show } => {
            if let Some(pair) = set {
                let (key, value) = cli::parse_key_value(&pair).ok_or_else(|| {
                    ReviewSheetError::Config(format!("KEY=VALUE 形式で指定してください: {}", pair))
                })?;
                // 環境変数の値をファイルに書き込まないよう、ファイルだけを読み直す
                let mut file_config = Config::load_from(&Config::config_path()?)?;
                file_config.set(key, value)?;
                file_config.save()?;
                println!("✔ {} を設定しました", key);
            }

            if show {
                println!("設定:");
                println!("  シートID: {}", config.sheet_id.as_deref().unwrap_or("未設定"));
                println!("  シート名: {}", config.sheet_name.as_deref().unwrap_or("未設定"));
                println!("  範囲: {}", config.sheet_range.as_deref().unwrap_or("未設定"));
                println!("  ファイル名の列: {}", config.file_name_column_index);
                println!("  表示開始列: {}", config.display_start_column_index);
                println!("  アクセストークン: {}", mask_secret(config.sheets_access_token.as_deref()));
                println!("  本文保存Webhook: {}", mask_secret(config.save_content_webhook_url.as_deref()));
                println!("  PDF再生成Webhook: {}", mask_secret(config.regenerate_pdf_webhook_url.as_deref()));
                println!("  ストア: {}", config.store_path()?.display());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
            }
        }
    }

    Ok(())
}
