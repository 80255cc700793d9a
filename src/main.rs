use clap::{Args, Parser, Subcommand};
use miette::{IntoDiagnostic, Result, miette};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use vendordash::application::service::DashboardService;
use vendordash::application::state::UpdatePhase;
use vendordash::config::{DEFAULT_TIMEOUT_SECS, GatewayConfig};
use vendordash::domain::order::VendorId;
use vendordash::domain::ports::{OrderGatewayBox, OrderScope};
use vendordash::domain::query::{OrderQuery, StatusFilter};
use vendordash::domain::status::ItemStatus;
use vendordash::error::DashboardError;
use vendordash::infrastructure::http::HttpOrderGateway;
use vendordash::infrastructure::in_memory::InMemoryOrderGateway;
use vendordash::interfaces::csv::report_writer::ReportWriter;
use vendordash::interfaces::json::order_reader::OrderReader;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Order table of a saved order listing
    Report {
        /// JSON snapshot: a list response or a bare array of orders
        snapshot: PathBuf,
        /// Only orders containing this vendor's items
        #[arg(long)]
        vendor: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Vendor confirmation groups of one order in a snapshot
    Vendors {
        snapshot: PathBuf,
        #[arg(long)]
        order: String,
    },
    /// Summary statistics of a snapshot
    Stats {
        snapshot: PathBuf,
        #[arg(long)]
        vendor: Option<String>,
    },
    /// Order table fetched live from the backend
    Fetch {
        #[command(flatten)]
        connection: ConnectionArgs,
        /// Vendor whose orders to fetch; all orders when omitted
        #[arg(long)]
        vendor: Option<String>,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Updates the status of a vendor's items in an order
    SetStatus {
        #[command(flatten)]
        connection: ConnectionArgs,
        #[arg(long)]
        vendor: String,
        #[arg(long)]
        order: String,
        #[arg(long)]
        status: ItemStatus,
        /// Restrict the update to a single item
        #[arg(long)]
        item: Option<String>,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// `all`, an aggregate status or a stored status
    #[arg(long, default_value = "all")]
    status: StatusFilter,
    /// Case-insensitive match on order id and customer name
    #[arg(long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn query(&self) -> OrderQuery {
        OrderQuery::new(&self.search, self.status.clone())
    }
}

#[derive(Args)]
struct ConnectionArgs {
    /// Base URL of the order backend
    #[arg(long, env = "VENDORDASH_BASE_URL")]
    base_url: String,
    /// Bearer token for the backend
    #[arg(long, env = "VENDORDASH_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Request timeout in seconds
    #[arg(long, env = "VENDORDASH_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,
}

impl ConnectionArgs {
    fn gateway(&self) -> Result<OrderGatewayBox> {
        let config = GatewayConfig::new(&self.base_url, self.token.clone(), self.timeout_secs)
            .into_diagnostic()?;
        let gateway = HttpOrderGateway::new(&config).into_diagnostic()?;
        Ok(Box::new(gateway))
    }
}

fn scope(vendor: Option<String>) -> OrderScope {
    match vendor {
        Some(vendor) => OrderScope::Vendor(VendorId::new(vendor)),
        None => OrderScope::All,
    }
}

/// Loads a snapshot into a session backed by an in-memory gateway.
async fn open_snapshot(path: &Path, scope: OrderScope) -> Result<DashboardService> {
    let file = File::open(path).into_diagnostic()?;
    let orders = OrderReader::new(io::BufReader::new(file))
        .orders()
        .into_diagnostic()?;
    let service = DashboardService::new(Box::new(InMemoryOrderGateway::with_orders(orders)), scope);
    service.refresh().await.into_diagnostic()?;
    Ok(service)
}

async fn write_table(service: &DashboardService, filter: &FilterArgs) -> Result<()> {
    let views = service.orders(&filter.query()).await;
    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer.write_orders(&views).into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    vendordash::telemetry::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Report {
            snapshot,
            vendor,
            filter,
        } => {
            let service = open_snapshot(&snapshot, scope(vendor)).await?;
            write_table(&service, &filter).await?;
        }
        Command::Vendors { snapshot, order } => {
            let service = open_snapshot(&snapshot, OrderScope::All).await?;
            service
                .vendor_groups(&order, |groups| {
                    let stdout = io::stdout();
                    let mut writer = ReportWriter::new(stdout.lock());
                    writer.write_vendor_groups(groups)
                })
                .await
                .into_diagnostic()?
                .into_diagnostic()?;
        }
        Command::Stats { snapshot, vendor } => {
            let service = open_snapshot(&snapshot, scope(vendor)).await?;
            let stats = service.stats().await;
            let stdout = io::stdout();
            let mut writer = ReportWriter::new(stdout.lock());
            writer.write_stats(&stats).into_diagnostic()?;
        }
        Command::Fetch {
            connection,
            vendor,
            filter,
        } => {
            let service = DashboardService::new(connection.gateway()?, scope(vendor));
            service.refresh().await.into_diagnostic()?;
            write_table(&service, &filter).await?;
        }
        Command::SetStatus {
            connection,
            vendor,
            order,
            status,
            item,
        } => {
            let service = DashboardService::new(connection.gateway()?, scope(Some(vendor)));
            service.refresh().await.into_diagnostic()?;

            let outcome = match item {
                Some(item) => service.update_item_status(&order, &item, status).await,
                None => service.update_status(&order, status).await,
            }
            .into_diagnostic()?;

            if let UpdatePhase::RolledBack { reason } = outcome.phase {
                return Err(miette!("status update for order {order} failed: {reason}"));
            }
            let view = service
                .order(&order)
                .await
                .ok_or(DashboardError::UnknownOrder(order))
                .into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = ReportWriter::new(stdout.lock());
            writer.write_orders(&[view]).into_diagnostic()?;
        }
    }

    Ok(())
}
