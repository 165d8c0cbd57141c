use clap::{Parser, Subcommand};
use crate::ai_provider::AiProvider;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "defi-analyzer")]
#[command(about = "DeFiプロジェクト文書AI解析ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// AIプロバイダ (openai/gemini)。省略時は AI_SERVICE または設定ファイル
    #[arg(long, global = true)]
    pub provider: Option<AiProvider>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// HTTPサーバーを起動
    Serve {
        /// 待受アドレス（例: 127.0.0.1:3000）
        #[arg(short, long)]
        bind: Option<String>,

        /// ビルド済みWebアプリのディレクトリ
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// 文書ファイル/フォルダを解析して結果を出力
    Analyze {
        /// 文書ファイルまたはフォルダのパス
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// 出力JSONファイル（省略時は標準出力へ要約を表示）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// アクセスパスワード（省略時は入力を求める）
        #[arg(long, env = "ANALYZER_PASSWORD")]
        password: Option<String>,

        /// サブフォルダも再帰的にスキャン
        #[arg(short = 'r', long)]
        recursive: bool,
    },

    /// モデルの疎通確認
    Probe {
        /// 確認するモデル（カンマ区切り。省略時は設定中のモデル）
        #[arg(short, long, value_delimiter = ',')]
        models: Vec<String>,
    },

    /// 設定を表示
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 設定ファイルのパスを表示
        #[arg(long)]
        path: bool,
    },
}
