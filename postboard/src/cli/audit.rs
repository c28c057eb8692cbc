//! audit サブコマンド
//!
//! 稼働中のサーバーの監査ログを一覧・集計します。

use super::DEFAULT_SERVER_URL;
use crate::audit::types::{AuditAction, AuditLevel, AuditLog, AuditResource};
use crate::client::{ApiClient, AuditLogQuery};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};

/// audit サブコマンドの引数
#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    /// Server base URL
    #[arg(long, global = true, default_value = DEFAULT_SERVER_URL, env = "POSTBOARD_URL")]
    pub url: String,

    /// Operation to perform
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// audit の操作
#[derive(Subcommand, Debug, Clone)]
pub enum AuditCommand {
    /// List audit log records, newest first
    List(AuditListArgs),
    /// Show aggregate counts
    Stats,
}

/// audit list の検索条件
#[derive(Args, Debug, Clone, Default)]
pub struct AuditListArgs {
    /// Action (CREATE, READ, UPDATE, DELETE, LOGIN, LOGOUT, ERROR, SYSTEM)
    #[arg(long, value_parser = parse_action)]
    pub action: Option<AuditAction>,
    /// Resource (POST, USER, SYSTEM, API, AUTH)
    #[arg(long, value_parser = parse_resource)]
    pub resource: Option<AuditResource>,
    /// Level (INFO, WARNING, ERROR, CRITICAL)
    #[arg(long, value_parser = parse_level)]
    pub level: Option<AuditLevel>,
    /// Resource id
    #[arg(long)]
    pub resource_id: Option<String>,
    /// Case-sensitive text search over message and details
    #[arg(long)]
    pub search: Option<String>,
    /// Inclusive lower bound (RFC 3339)
    #[arg(long)]
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound (RFC 3339)
    #[arg(long)]
    pub to: Option<DateTime<Utc>>,
    /// Page number (1-based)
    #[arg(long)]
    pub page: Option<i64>,
    /// Records per page (max 200)
    #[arg(long)]
    pub limit: Option<i64>,
}

impl From<&AuditListArgs> for AuditLogQuery {
    fn from(args: &AuditListArgs) -> Self {
        Self {
            action: args.action,
            resource: args.resource,
            level: args.level,
            resource_id: args.resource_id.clone(),
            search: args.search.clone(),
            from_date: args.from,
            to_date: args.to,
            page: args.page,
            limit: args.limit,
        }
    }
}

fn parse_action(s: &str) -> Result<AuditAction, String> {
    AuditAction::parse(&s.to_ascii_uppercase()).ok_or_else(|| format!("unknown action: {}", s))
}

fn parse_resource(s: &str) -> Result<AuditResource, String> {
    AuditResource::parse(&s.to_ascii_uppercase()).ok_or_else(|| format!("unknown resource: {}", s))
}

fn parse_level(s: &str) -> Result<AuditLevel, String> {
    AuditLevel::parse(&s.to_ascii_uppercase()).ok_or_else(|| format!("unknown level: {}", s))
}

/// audit サブコマンドを実行
pub async fn execute(args: &AuditArgs) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.url)?;

    match &args.command {
        AuditCommand::List(list_args) => {
            let response = client.list_audit_logs(&list_args.into()).await?;
            println!("TIMESTAMP\tLEVEL\tACTION\tRESOURCE\tMESSAGE");
            for log in &response.data {
                println!("{}", format_row(log));
            }
            let p = &response.pagination;
            println!(
                "-- page {}/{} ({} total, {} per page)",
                p.page,
                p.total_pages.max(1),
                p.total,
                p.limit
            );
        }
        AuditCommand::Stats => {
            let stats = client.audit_stats().await?;
            println!("total\t{}", stats.total);
            println!("info\t{}", stats.by_level.info);
            println!("warning\t{}", stats.by_level.warning);
            println!("error\t{}", stats.by_level.error);
            println!("critical\t{}", stats.by_level.critical);
            println!("last24Hours\t{}", stats.last_24_hours);
        }
    }
    Ok(())
}

fn format_row(log: &AuditLog) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}",
        log.timestamp.to_rfc3339(),
        log.level,
        log.action,
        log.resource,
        log.message
    )
}
