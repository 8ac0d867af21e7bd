// src/main.rs

use std::sync::Arc;

use chrono::{Duration, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tokio::net::TcpListener;
use tracing::info;

use publisher_stat::logging::init_tracing;
use publisher_stat::mock_publisher::start_mock_publisher_server;
use publisher_stat::model::{AdPosStats, CpsStats, SettlementStats};
use publisher_stat::{
    AccessTokenProvider, AdSlot, CredentialTokenProvider, StatConfig, StaticTokenProvider,
    StatsClient,
};

#[derive(Parser, Debug)]
#[command(author = "whiteCcinn", version = "1.0", about = "公众号流量主数据拉取工具")]
struct CliArgs {
    #[command(subcommand)]
    command: Command,

    #[arg(long, default_value = "logs", global = true)]
    log_dir: String,

    #[arg(long, env = "PUBLISHER_STAT_ENDPOINT", global = true)]
    endpoint: Option<String>,

    #[arg(long, env = "PUBLISHER_TOKEN_ENDPOINT", global = true)]
    token_endpoint: Option<String>,

    /// 直接使用现成的 access_token
    #[arg(long, env = "PUBLISHER_ACCESS_TOKEN", global = true, hide_env_values = true)]
    access_token: Option<String>,

    #[arg(long, env = "PUBLISHER_APPID", global = true)]
    appid: Option<String>,

    #[arg(long, env = "PUBLISHER_SECRET", global = true, hide_env_values = true)]
    secret: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 分广告位数据
    Adpos {
        #[command(flatten)]
        query: QueryArgs,
        /// 广告位类型，如 SLOT_ID_BIZ_BOTTOM，留空表示全部
        #[arg(long, default_value = "")]
        ad_slot: String,
    },
    /// 返佣商品数据
    Cps {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// 结算收入数据
    Settlement {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// 同时拉取三类数据
    Report {
        #[command(flatten)]
        query: QueryArgs,
    },
    /// 启动本地 mock 接口
    Mock {
        #[arg(short, long, default_value_t = 9002)]
        port: u16,
    },
}

#[derive(Args, Debug, Clone)]
struct QueryArgs {
    /// 开始日期 YYYY-MM-DD，默认昨天（东八区）
    #[arg(long)]
    start_date: Option<String>,
    /// 结束日期 YYYY-MM-DD，默认同开始日期
    #[arg(long)]
    end_date: Option<String>,
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    page_size: u32,
}

impl QueryArgs {
    fn dates(&self) -> (String, String) {
        let start = self.start_date.clone().unwrap_or_else(yesterday);
        let end = self.end_date.clone().unwrap_or_else(|| start.clone());
        (start, end)
    }
}

#[derive(Serialize)]
struct Report {
    adpos: AdPosStats,
    cps: CpsStats,
    settlement: SettlementStats,
}

/// 东八区的昨天
fn yesterday() -> String {
    (Utc::now() + Duration::hours(8) - Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

fn parse_ad_slot(value: &str) -> Result<Option<AdSlot>, String> {
    match value.trim() {
        "" => Ok(None),
        name => name.parse().map(Some),
    }
}

fn token_provider(
    args: &CliArgs,
    config: &StatConfig,
) -> Result<Arc<dyn AccessTokenProvider>, Box<dyn std::error::Error>> {
    if let Some(token) = &args.access_token {
        return Ok(Arc::new(StaticTokenProvider::new(token.clone())));
    }
    match (&args.appid, &args.secret) {
        (Some(appid), Some(secret)) => Ok(Arc::new(CredentialTokenProvider::new(
            config,
            appid.clone(),
            secret.clone(),
        )?)),
        _ => Err("either --access-token or both --appid and --secret are required".into()),
    }
}

/// 命令行参数优先，其次环境变量，最后是默认公网地址
fn build_client(args: &CliArgs) -> Result<StatsClient, Box<dyn std::error::Error>> {
    let mut config = StatConfig::default();
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if let Some(token_endpoint) = &args.token_endpoint {
        config.token_endpoint = token_endpoint.clone();
    }

    let client = StatsClient::from_config(&config, token_provider(args, &config)?)?;
    info!(endpoint = %client.endpoint(), "publisher stat client ready");
    Ok(client)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化全局 tracing 日志，guard 持有到进程结束
    let _guard = init_tracing(&args.log_dir, "publisher_stat.json")?;

    match &args.command {
        Command::Mock { port } => {
            let listener = TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
            info!("mock publisher stat server starting on port {}", port);
            start_mock_publisher_server(listener).await?;
        }
        Command::Adpos { query, ad_slot } => {
            let client = build_client(&args)?;
            let (start, end) = query.dates();
            let ad_slot = parse_ad_slot(ad_slot)?;
            let stats = client
                .fetch_ad_pos_stats(&start, &end, query.page, query.page_size, ad_slot)
                .await?;
            print_json(&stats)?;
        }
        Command::Cps { query } => {
            let client = build_client(&args)?;
            let (start, end) = query.dates();
            let stats = client.fetch_cps_stats(&start, &end, query.page, query.page_size).await?;
            print_json(&stats)?;
        }
        Command::Settlement { query } => {
            let client = build_client(&args)?;
            let (start, end) = query.dates();
            let stats = client
                .fetch_settlement_stats(&start, &end, query.page, query.page_size)
                .await?;
            print_json(&stats)?;
        }
        Command::Report { query } => {
            let client = build_client(&args)?;
            let (start, end) = query.dates();
            let (adpos, cps, settlement) = futures::future::try_join3(
                client.fetch_ad_pos_stats(&start, &end, query.page, query.page_size, None),
                client.fetch_cps_stats(&start, &end, query.page, query.page_size),
                client.fetch_settlement_stats(&start, &end, query.page, query.page_size),
            )
            .await?;
            print_json(&Report { adpos, cps, settlement })?;
        }
    }

    Ok(())
}
