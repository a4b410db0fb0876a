use crate::infra::{engine_from_config, parse_bracket, parse_period, InMemorySnapshotRepository};
use clap::Args;
use seller_scorecard::config::AppConfig;
use seller_scorecard::error::AppError;
use seller_scorecard::scoring::{
    points_leaderboard, BonusBracket, CareerPosition, CompetencyScores, DreInput, ForecastFunnel,
    KpiCsvImporter, KpiPeriod, PointsEntry, Ranking, Scorecard, ScorecardEngine, ScorecardService,
    ScorecardServiceError, SellerId, SellerSnapshot,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ScorecardArgs {
    /// KPI export with `Metric,Target,Actual` columns
    #[arg(long)]
    pub(crate) kpi_csv: PathBuf,
    /// Reporting month (YYYY-MM)
    #[arg(long, value_parser = parse_period)]
    pub(crate) period: KpiPeriod,
    /// Base salary used for the bonus cap (defaults to the configured value)
    #[arg(long)]
    pub(crate) base_salary: Option<f64>,
    /// Bonus bracket as label:bonus_per_client:clients, repeatable
    #[arg(long = "bracket", value_parser = parse_bracket)]
    pub(crate) brackets: Vec<BonusBracket>,
    /// Current career level name
    #[arg(long, requires_all = ["volume", "tenure_months"])]
    pub(crate) career_level: Option<String>,
    /// Cumulative sales volume for career progression
    #[arg(long, requires = "career_level")]
    pub(crate) volume: Option<f64>,
    /// Months at the current level
    #[arg(long, requires = "career_level")]
    pub(crate) tenure_months: Option<f64>,
    /// Print the scorecard as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Reporting month (YYYY-MM) for the synthetic team
    #[arg(long, value_parser = parse_period, default_value = "2025-06")]
    pub(crate) period: KpiPeriod,
}

pub(crate) fn run_scorecard(args: ScorecardArgs) -> Result<(), AppError> {
    let ScorecardArgs {
        kpi_csv,
        period,
        base_salary,
        brackets,
        career_level,
        volume,
        tenure_months,
        json,
    } = args;

    let config = AppConfig::load()?;
    let engine = engine_from_config(&config.scoring);

    let kpis = KpiCsvImporter::from_path(&kpi_csv, period)?;
    let seller_name = kpi_csv
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "seller".to_string());

    let mut seller = SellerSnapshot::new(seller_name.clone(), seller_name, kpis);
    seller.base_salary = base_salary;
    seller.brackets = brackets;
    seller.career = career_level.map(|current_level| CareerPosition {
        current_level,
        cumulative_volume: volume.unwrap_or_default(),
        tenure_months: tenure_months.unwrap_or_default(),
    });

    let scorecard = engine.evaluate(&seller)?;

    if json {
        let payload = serde_json::to_string_pretty(&scorecard).map_err(std::io::Error::from)?;
        println!("{}", payload);
    } else {
        render_scorecard(&scorecard);
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { period } = args;

    let repository = Arc::new(InMemorySnapshotRepository::default());
    let service = ScorecardService::new(repository, ScorecardEngine::default());

    let team = synthetic_team(service.engine(), period);
    let points = points_leaderboard(&team, service.engine().badge_catalog())?;
    for seller in team {
        service.record(seller).map_err(demo_error)?;
    }

    println!("Seller scorecard demo ({})", period);

    let featured = SellerId("seller-ana".to_string());
    let scorecard = service.scorecard(&featured, period).map_err(demo_error)?;
    render_scorecard(&scorecard);

    let ranking = service.ranking(period).map_err(demo_error)?;
    render_ranking(&ranking);
    render_points(&points);

    Ok(())
}

fn demo_error(err: ScorecardServiceError) -> AppError {
    match err {
        ScorecardServiceError::Scoring(err) => AppError::Scoring(err),
        ScorecardServiceError::Repository(err) => {
            AppError::Io(std::io::Error::other(err.to_string()))
        }
    }
}

fn synthetic_team(engine: &ScorecardEngine, period: KpiPeriod) -> Vec<SellerSnapshot> {
    let table = engine.table();

    let ana = table
        .default_snapshot(period)
        .with_reading("new_actives", 12.0, 14.0)
        .with_reading("churn", 5.0, 3.0)
        .with_reading("tpv_m1", 100_000.0, 118_000.0)
        .with_reading("actives_m1", 10.0, 11.0)
        .with_reading("hunter_migration", 70.0, 64.0);
    let mut ana = SellerSnapshot::new("seller-ana", "Ana Ribeiro", ana);
    ana.base_salary = Some(2_200.0);
    ana.brackets = vec![
        BonusBracket::new("15k+", 15_000.0, 50.0, 5).with_clients(6),
        BonusBracket::new("30k+", 30_000.0, 100.0, 4).with_clients(3),
        BonusBracket::new("50k+", 50_000.0, 200.0, 3).with_clients(1),
    ];
    ana.career = Some(CareerPosition {
        current_level: "Aspirante".to_string(),
        cumulative_volume: 120_000.0,
        tenure_months: 5.0,
    });
    ana.forecast = Some(ForecastFunnel {
        qualified: 40,
        proposals: 18,
        new_clients: 9,
        new_actives: 7,
    });
    ana.competencies = Some(CompetencyScores {
        persistence: 5,
        influence: 4,
        relationship: 4,
        organization: 3,
        creativity: 4,
    });
    ana.dre = Some(DreInput {
        salary: 2_200.0,
        benefits: 600.0,
        revenue: 9_800.0,
    });
    ana.badges = vec![
        "first_sale".to_string(),
        "goal_crusher".to_string(),
        "streak_3".to_string(),
    ];

    let bruno = table
        .default_snapshot(period)
        .with_reading("new_actives", 12.0, 10.0)
        .with_reading("churn", 5.0, 4.0)
        .with_reading("tpv_m1", 100_000.0, 92_000.0)
        .with_reading("actives_m1", 10.0, 9.0)
        .with_reading("hunter_migration", 70.0, 70.0);
    let mut bruno = SellerSnapshot::new("seller-bruno", "Bruno Lima", bruno);
    bruno.brackets = vec![BonusBracket::new("15k+", 15_000.0, 50.0, 5).with_clients(4)];
    bruno.badges = vec!["first_sale".to_string(), "mentor".to_string()];

    let carla = table
        .default_snapshot(period)
        .with_reading("new_actives", 12.0, 4.0)
        .with_reading("churn", 5.0, 6.0)
        .with_reading("tpv_m1", 100_000.0, 40_000.0)
        .with_reading("actives_m1", 10.0, 5.0)
        .with_reading("hunter_migration", 70.0, 30.0);
    let carla = SellerSnapshot::new("seller-carla", "Carla Mendes", carla);

    vec![ana, bruno, carla]
}

pub(crate) fn render_scorecard(scorecard: &Scorecard) {
    println!(
        "\n{} ({}) - {}",
        scorecard.name, scorecard.seller_id, scorecard.period
    );
    println!(
        "Composite attainment: {:.1}% [{}]",
        scorecard.composite.total_attainment_percent,
        scorecard.classification.label()
    );

    println!("\nMetrics");
    for metric in &scorecard.composite.metrics {
        println!(
            "- {}: {:.2} / {:.2} -> {:.1}% x {:.2} = {:.2} [{}]{}",
            metric.name,
            metric.actual,
            metric.target,
            metric.attainment_percent,
            metric.weight,
            metric.weighted_contribution,
            metric.classification.label(),
            if metric.inverse { " (lower is better)" } else { "" }
        );
    }

    let bonus = &scorecard.bonus;
    if bonus.brackets.is_empty() {
        println!("\nBonus brackets: none");
    } else {
        println!("\nBonus brackets");
        for bracket in &bonus.brackets {
            println!(
                "- {}: {} clients x {:.2} = {:.2}{}",
                bracket.label,
                bracket.client_count,
                bracket.bonus_per_client,
                bracket.subtotal,
                if bracket.meets_minimum {
                    ""
                } else {
                    " (below qualifying minimum)"
                }
            );
        }
    }
    println!(
        "Gross {:.2} x multiplier {:.2} -> final {:.2} (cap {:.2} on base salary {:.2}{})",
        bonus.gross_bonus,
        bonus.multiplier,
        bonus.final_bonus,
        bonus.cap,
        scorecard.base_salary,
        if bonus.capped { ", capped" } else { "" }
    );

    if let Some(career) = &scorecard.career {
        match &career.next_level {
            Some(next) => println!(
                "\nCareer: {} -> {} | volume {:.0}% | tenure {:.0}% | {}",
                career.current_level,
                next.name,
                career.status.volume_progress_percent,
                career.status.tenure_progress_percent,
                if career.status.eligible {
                    "eligible for promotion"
                } else {
                    "not yet eligible"
                }
            ),
            None => println!("\nCareer: {} (top of the ladder)", career.current_level),
        }
    }

    if let Some(funnel) = &scorecard.forecast {
        println!(
            "Funnel: qualified->proposal {:.0}% | proposal->client {:.0}% | client->active {:.0}%",
            funnel.qualified_to_proposal_percent,
            funnel.proposal_to_client_percent,
            funnel.client_to_active_percent
        );
    }

    if let Some(average) = scorecard.competency_average {
        println!("Competency average: {:.1} / 5", average);
    }

    if let Some(dre) = &scorecard.dre {
        println!(
            "DRE: costs {:.2} | revenue {:.2} | ROI {:.1}% | payback {} months",
            dre.total_costs, dre.revenue, dre.roi_percent, dre.payback_months
        );
    }

    println!(
        "Badges: {} ({} points)",
        scorecard.badges.badges_count, scorecard.badges.total_points
    );
}

pub(crate) fn render_points(entries: &[PointsEntry]) {
    println!("\nBadge points");
    for entry in entries {
        println!(
            "{}. {} {} points ({} badges)",
            entry.position, entry.name, entry.total_points, entry.badges_count
        );
    }
}

pub(crate) fn render_ranking(ranking: &Ranking) {
    println!("\nRanking");
    for entry in &ranking.entries {
        println!(
            "{}. {} ({}) {:.1}% [{}]",
            entry.position,
            entry.name,
            entry.seller_id,
            entry.total_attainment_percent,
            entry.classification.label()
        );
    }

    if !ranking.rejected.is_empty() {
        println!("\nExcluded sellers");
        for rejected in &ranking.rejected {
            println!("- {}: {}", rejected.seller_id, rejected.error);
        }
    }
}
