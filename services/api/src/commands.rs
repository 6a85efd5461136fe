use crate::infra::{parse_event, parse_sex};
use crate::views::{render_event, render_scorecard, render_standards, StandardsView};
use acft_score::config::{AppConfig, TablesConfig};
use acft_score::error::AppError;
use acft_score::scoring::{
    scorer_for, AgeBracket, CachedTableLoader, Event, EventInputs, RawInput, ScoringError, Sex,
    StandardsSource, TableLoader,
};
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Soldier age in years (17-75)
    #[arg(long)]
    pub(crate) age: u32,
    /// Sex the standards are drawn for (M or F)
    #[arg(long, value_parser = parse_sex)]
    pub(crate) sex: Sex,
    /// 3 repetition maximum deadlift in pounds
    #[arg(long = "dl")]
    pub(crate) deadlift: String,
    /// Standing power throw in meters
    #[arg(long = "spt")]
    pub(crate) power_throw: String,
    /// Hand-release push-up repetitions
    #[arg(long = "hrp")]
    pub(crate) pushups: String,
    /// Sprint-drag-carry time as M:SS
    #[arg(long = "sdc")]
    pub(crate) sprint_drag_carry: String,
    /// Plank time as M:SS
    #[arg(long = "plk")]
    pub(crate) plank: String,
    /// Two-mile run time as M:SS
    #[arg(long = "run")]
    pub(crate) run: String,
    /// Read standards tables from this directory instead of the built-in set
    #[arg(long)]
    pub(crate) tables_dir: Option<PathBuf>,
}

impl ScoreArgs {
    fn inputs(&self) -> EventInputs {
        [
            (Event::Deadlift, &self.deadlift),
            (Event::StandingPowerThrow, &self.power_throw),
            (Event::HandReleasePushup, &self.pushups),
            (Event::SprintDragCarry, &self.sprint_drag_carry),
            (Event::Plank, &self.plank),
            (Event::TwoMileRun, &self.run),
        ]
        .into_iter()
        .map(|(event, raw)| (event, RawInput::from(raw.as_str())))
        .collect()
    }
}

#[derive(Args, Debug)]
pub(crate) struct EventArgs {
    /// Event code: DL, SPT, HRP, SDC, PLK or 2MR
    #[arg(long, value_parser = parse_event)]
    pub(crate) event: Event,
    #[arg(long)]
    pub(crate) age: u32,
    #[arg(long, value_parser = parse_sex)]
    pub(crate) sex: Sex,
    /// Raw result; times as M:SS
    #[arg(long)]
    pub(crate) raw: String,
    /// Read standards tables from this directory instead of the built-in set
    #[arg(long)]
    pub(crate) tables_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct StandardsArgs {
    #[arg(long, value_parser = parse_event)]
    pub(crate) event: Event,
    #[arg(long, value_parser = parse_sex)]
    pub(crate) sex: Sex,
    #[arg(long)]
    pub(crate) age: u32,
    /// Read standards tables from this directory instead of the built-in set
    #[arg(long)]
    pub(crate) tables_dir: Option<PathBuf>,
}

/// A `--tables-dir` flag wins over `ACFT_TABLES_DIR`.
fn tables_config(tables_dir: Option<PathBuf>) -> Result<TablesConfig, AppError> {
    match tables_dir {
        Some(directory) => Ok(TablesConfig {
            directory: Some(directory),
        }),
        None => Ok(AppConfig::load()?.tables),
    }
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let inputs = args.inputs();
    let scorer = scorer_for(StandardsSource::from_config(&tables_config(args.tables_dir)?));
    let score = scorer.score(args.age, args.sex, &inputs)?;
    print!("{}", render_scorecard(&score));
    Ok(())
}

pub(crate) fn run_event(args: EventArgs) -> Result<(), AppError> {
    let scorer = scorer_for(StandardsSource::from_config(&tables_config(args.tables_dir)?));
    let score = scorer.resolver().resolve_input(
        args.event,
        args.age,
        args.sex,
        &RawInput::from(args.raw.as_str()),
    )?;
    print!("{}", render_event(&score, args.sex));
    Ok(())
}

pub(crate) fn run_standards(args: StandardsArgs) -> Result<(), AppError> {
    let loader = CachedTableLoader::new(StandardsSource::from_config(&tables_config(
        args.tables_dir,
    )?));
    let view = standards_view(&loader, args.event, args.sex, args.age)?;
    print!("{}", render_standards(&view));
    Ok(())
}

pub(crate) fn standards_view<L: TableLoader + ?Sized>(
    loader: &L,
    event: Event,
    sex: Sex,
    age: u32,
) -> Result<StandardsView, ScoringError> {
    let bracket = AgeBracket::classify(age)?;
    let table = loader.load(event, sex)?;
    StandardsView::from_table(&table, bracket).ok_or_else(|| ScoringError::MalformedTable {
        resource: format!("{event}_{sex}"),
        detail: format!("no column for bracket {bracket}"),
    })
}
