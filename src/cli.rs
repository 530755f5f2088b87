use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "twinfinder")]
#[command(
    about = "Compare two images with AI: similarity score and highlighted shared features",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 2枚の画像を比較（スコア + 特徴ハイライト）
    Compare {
        /// 1枚目の画像
        #[arg(required = true)]
        first: PathBuf,

        /// 2枚目の画像
        #[arg(required = true)]
        second: PathBuf,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// ハイライト画像の保存先フォルダ
        #[arg(long)]
        save_highlights: Option<PathBuf>,
    },

    /// 類似度スコアのみ算出
    Score {
        /// 1枚目の画像
        #[arg(required = true)]
        first: PathBuf,

        /// 2枚目の画像
        #[arg(required = true)]
        second: PathBuf,

        /// 結果JSONの出力先
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定（値を省略すると入力を求める）
        #[arg(long)]
        set_api_key: Option<Option<String>>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
