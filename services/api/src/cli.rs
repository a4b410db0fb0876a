use crate::demo::{run_demo, run_scorecard, DemoArgs, ScorecardArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use seller_scorecard::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Seller Scorecard",
    about = "Score seller KPIs, bonus payouts and career progression from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Score a single seller from a KPI CSV export
    Scorecard(ScorecardArgs),
    /// Print a scorecard and period ranking for a synthetic sales team
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Scorecard(args) => run_scorecard(args),
        Command::Demo(args) => run_demo(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["seller-scorecard"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn scorecard_requires_volume_with_career_level() {
        let result = Cli::try_parse_from([
            "seller-scorecard",
            "scorecard",
            "--kpi-csv",
            "kpis.csv",
            "--period",
            "2025-02",
            "--career-level",
            "Aspirante",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn scorecard_accepts_repeated_brackets() {
        let cli = Cli::try_parse_from([
            "seller-scorecard",
            "scorecard",
            "--kpi-csv",
            "kpis.csv",
            "--period",
            "2025-02",
            "--bracket",
            "15k+:50:6",
            "--bracket",
            "30k+:100:2",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Scorecard(args)) => {
                assert_eq!(args.brackets.len(), 2);
                assert_eq!(args.period.to_string(), "2025-02");
                assert!(args.json);
            }
            other => panic!("expected scorecard command, got {other:?}"),
        }
    }
}
