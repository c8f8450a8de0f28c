use std::process::ExitCode;

use allocation_backtest_core::models::allocation::InputFields;
use allocation_backtest_core::models::calculation::Calculation;
use allocation_backtest_core::models::settings::{Settings, WORLD_TRADING_DATA_KEY};
use allocation_backtest_core::state::{Action, ViewState};
use allocation_backtest_core::PortfolioCalculator;
use clap::Parser;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, CellAlignment, ContentArrangement, Table};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Value a fixed-allocation portfolio from a start date to today",
    after_help = "EXAMPLES:
    allocation-backtest --start-date 2020-01-02 --balance 10000 \\
        --allocation AAPL=40 --allocation GOOG=30 --allocation MSFT=30

    allocation-backtest --symbols SPY,TLT --start-date 2015-01-02 --balance 1000 \\
        --allocation SPY=60 --allocation TLT=40 --json"
)]
struct Args {
    /// First day of the backtest (YYYY-MM-DD)
    #[arg(long, default_value = "")]
    start_date: String,

    /// Initial cash balance
    #[arg(long, default_value = "")]
    balance: String,

    /// Declared assets; each needs an --allocation
    #[arg(long, value_delimiter = ',', default_value = "AAPL,GOOG,MSFT")]
    symbols: Vec<String>,

    /// Allocation percentage per asset, e.g. AAPL=40 (repeatable)
    #[arg(long = "allocation", value_parser = parse_allocation)]
    allocations: Vec<(String, String)>,

    /// World Trading Data API token
    #[arg(long, env = "WORLDTRADINGDATA_API_TOKEN", hide_env_values = true)]
    api_token: Option<String>,

    /// Override the World Trading Data base URL
    #[arg(long, env = "WORLDTRADINGDATA_BASE_URL")]
    base_url: Option<String>,

    /// Print the chart payload as JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn parse_allocation(raw: &str) -> Result<(String, String), String> {
    let (symbol, pct) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected SYMBOL=PERCENT, got '{raw}'"))?;
    Ok((symbol.trim().to_uppercase(), pct.trim().to_string()))
}

impl Args {
    /// Declared symbols first (blank percentage when no allocation was given),
    /// then any allocated symbol that was not declared. Every `--allocation`
    /// stays its own field, so a repeated symbol reaches the validator.
    fn input_fields(&self) -> InputFields {
        let mut fields = InputFields::new(&self.start_date, &self.balance);
        let mut declared: Vec<String> = self
            .symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
        for (symbol, _) in &self.allocations {
            if !declared.contains(symbol) {
                declared.push(symbol.clone());
            }
        }
        for symbol in declared {
            let mut given = self
                .allocations
                .iter()
                .filter(|(s, _)| *s == symbol)
                .peekable();
            if given.peek().is_none() {
                fields = fields.with_allocation(symbol, "");
                continue;
            }
            for (_, pct) in given {
                fields = fields.with_allocation(symbol.clone(), pct.clone());
            }
        }
        fields
    }

    fn settings(&self) -> Settings {
        let mut settings = Settings::default();
        if let Some(token) = &self.api_token {
            settings = settings.with_api_key(WORLD_TRADING_DATA_KEY, token.clone());
        }
        if let Some(url) = &self.base_url {
            settings = settings.with_base_url(url.clone());
        }
        settings
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // .env is optional
    let _ = dotenvy::dotenv();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("allocation_backtest_core=warn,allocation_backtest=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let calculator = PortfolioCalculator::new(&args.settings());
    debug!(?calculator, "calculator ready");

    let state = ViewState::new().reduce(Action::Submitted);
    let result = calculator.calculate(&args.input_fields()).await;
    if let Err(e) = &result {
        error!(tag = e.tag(), "calculation failed: {e}");
    }
    let state = state.reduce(Action::from_result(result));

    if let Some(message) = &state.error {
        eprintln!("error: {message}");
        return ExitCode::FAILURE;
    }

    match &state.last {
        Some(calculation) if args.json => match serde_json::to_string_pretty(&calculation.chart) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                return ExitCode::FAILURE;
            }
        },
        Some(calculation) if state.should_render_chart() => print_table(calculation),
        _ => println!("No price data in range."),
    }
    ExitCode::SUCCESS
}

fn print_table(calculation: &Calculation) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Date").add_attribute(Attribute::Bold),
        Cell::new("Value").add_attribute(Attribute::Bold),
    ]);
    for point in calculation.series.points() {
        table.add_row(vec![
            Cell::new(point.date),
            Cell::new(format!("{:.2}", point.value)).set_alignment(CellAlignment::Right),
        ]);
    }
    println!("{table}");

    if let Some(value) = calculation.final_value() {
        println!(
            "{} → {}: {:.2} (initial balance {:.2})",
            calculation.range.from, calculation.range.to, value, calculation.input.initial_balance
        );
    }
}
