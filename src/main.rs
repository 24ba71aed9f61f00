use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info, warn};

use hydrorating_curve::{
    ChezyFormula, ConfigError, ErrorClass, FlowRegime, HydraulicResult, LevelStep, RatingConfig,
    RatingError,
};
use hydrorating_io::{
    FittedSection, IoError, MetadataReader, ProjectMetadata, ProjectName, ResultWriter, Survey,
    SurveyReader,
};
use hydrorating_section::{SectionError, WaterSection};

#[derive(Parser)]
#[command(name = "hydrorating")]
#[command(about = "Stage-discharge rating curves for surveyed river cross-sections")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Build the rating curve of each survey and resolve the probability levels
    Compute {
        /// Path to a survey CSV file; repeat for several cross-sections
        #[arg(long, required = true)]
        survey: Vec<PathBuf>,

        /// Path to the metadata JSON file of each survey, in the same order
        #[arg(long, required = true)]
        metadata: Vec<PathBuf>,

        /// Project name for output files (letters, digits, '_' or '-')
        #[arg(long)]
        project: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Flow regime: "water", "sediment_flow" or "mudrock_flow"
        #[arg(long, default_value = "water")]
        regime: String,

        /// Chezy formula: "depth_banded", "manning" or "zheleznyakov"
        #[arg(long, default_value = "depth_banded")]
        chezy: String,

        /// Let water spill over sector ridges into neighbouring sectors
        #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
        overflow: bool,

        /// Level step in centimetres (overrides the metadata file)
        #[arg(long)]
        level_step_cm: Option<f64>,

        /// Continue despite roughness or slope outside the typical range
        #[arg(long, default_value_t = false)]
        accept_warnings: bool,
    },

    /// Print the wetted-section metrics at one water level
    Section {
        /// Path to the survey CSV file
        #[arg(long)]
        survey: PathBuf,

        /// Water level, m
        #[arg(long)]
        level: f64,

        /// Restrict the computation to the sector with this name
        #[arg(long)]
        sector: Option<String>,
    },
}

/// Driver-level failures that have no library counterpart.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("{count} sector parameter warning(s); rerun with --accept-warnings to continue")]
    UnconfirmedWarnings { count: usize },

    #[error("no sector named «{name}» in the survey")]
    UnknownSector { name: String },

    #[error("{n_surveys} survey file(s) but {n_metadata} metadata file(s)")]
    UnpairedInputs { n_surveys: usize, n_metadata: usize },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ComputeOutput {
    project: String,
    sections: Vec<SectionRunOutput>,
    sections_file: PathBuf,
}

#[derive(Serialize)]
struct SectionRunOutput {
    survey: PathBuf,
    n_sectors: usize,
    n_levels: usize,
    bottom: f64,
    top_level: Option<f64>,
    top_discharge: Option<f64>,
    design_label: String,
    design_level: Option<f64>,
    n_unresolved: usize,
    rating_file: PathBuf,
    summary_file: PathBuf,
}

#[derive(Serialize)]
struct WettedOutput {
    scope: String,
    level: f64,
    n_bodies: usize,
    width: f64,
    area: f64,
    average_depth: f64,
    max_depth: f64,
    wet_perimeter: f64,
    r_hydraulic: f64,
}

fn class_code(class: ErrorClass) -> u8 {
    match class {
        ErrorClass::InvalidLevel => 2,
        ErrorClass::Configuration => 3,
        ErrorClass::InputData => 4,
        ErrorClass::InterpolationDomain => 5,
    }
}

/// Map the first typed error in the chain to a process exit status.
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<CliError>() {
            return match e {
                CliError::UnconfirmedWarnings { .. } => 7,
                CliError::UnknownSector { .. } => class_code(ErrorClass::InputData),
                CliError::UnpairedInputs { .. } => class_code(ErrorClass::Configuration),
            };
        }
        if let Some(e) = cause.downcast_ref::<RatingError>() {
            return class_code(e.class());
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return class_code(ErrorClass::Configuration);
        }
        if let Some(e) = cause.downcast_ref::<IoError>() {
            return e.class().map_or(6, class_code);
        }
        if let Some(e) = cause.downcast_ref::<SectionError>() {
            return if e.is_level_error() {
                class_code(ErrorClass::InvalidLevel)
            } else {
                class_code(ErrorClass::InputData)
            };
        }
    }
    1
}

fn read_survey(path: &Path) -> Result<Survey> {
    let survey = SurveyReader::new(path)
        .read()
        .context("failed to read survey CSV")?;
    info!(
        n_points = survey.section.profile().len(),
        n_sectors = survey.section.sectors().len(),
        "survey loaded"
    );
    Ok(survey)
}

fn confirm_warnings(survey: &Survey, accept: bool) -> Result<()> {
    let warnings = survey.section.warnings();
    for w in &warnings {
        warn!("{w}");
    }
    if !warnings.is_empty() && !accept {
        return Err(CliError::UnconfirmedWarnings { count: warnings.len() }.into());
    }
    Ok(())
}

/// Options shared by every cross-section of one `compute` run.
struct ComputeOptions {
    regime: FlowRegime,
    formula: ChezyFormula,
    overflow: bool,
    level_step_cm: Option<f64>,
    accept_warnings: bool,
}

/// One cross-section read, checked and fitted.
struct SectionRun {
    survey_path: PathBuf,
    survey: Survey,
    metadata: ProjectMetadata,
    config: RatingConfig,
    result: HydraulicResult,
}

fn fit_section(
    survey_path: &Path,
    metadata_path: &Path,
    options: &ComputeOptions,
) -> Result<SectionRun> {
    let survey = read_survey(survey_path)?;
    confirm_warnings(&survey, options.accept_warnings)?;

    let metadata = MetadataReader::new(metadata_path)
        .read()
        .context("failed to read metadata JSON")?;
    info!(
        n_probabilities = metadata.probabilities.levels().len(),
        design = %metadata.probabilities.design().label,
        "metadata loaded"
    );

    let level_step = options
        .level_step_cm
        .map(LevelStep::from_centimeters)
        .or(metadata.survey.level_step)
        .unwrap_or_default();

    let config = RatingConfig::new()
        .with_regime(options.regime)
        .with_formula(options.formula)
        .with_overflow(options.overflow)
        .with_level_step(level_step);

    let result = config
        .fit(&survey.section, &metadata.probabilities)
        .context("rating computation failed")?;

    for failure in result.design_levels.failures() {
        warn!("{failure}");
    }

    Ok(SectionRun {
        survey_path: survey_path.to_path_buf(),
        survey,
        metadata,
        config,
        result,
    })
}

fn run(cli: Cli) -> Result<()> {
    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Compute {
            survey,
            metadata,
            project,
            output_dir,
            regime,
            chezy,
            overflow,
            level_step_cm,
            accept_warnings,
        } => {
            if survey.len() != metadata.len() {
                return Err(CliError::UnpairedInputs {
                    n_surveys: survey.len(),
                    n_metadata: metadata.len(),
                }
                .into());
            }
            let project_name = ProjectName::new(project)?;
            let options = ComputeOptions {
                regime: regime.parse()?,
                formula: chezy.parse()?,
                overflow,
                level_step_cm,
                accept_warnings,
            };

            let runs = survey
                .iter()
                .zip(&metadata)
                .map(|(survey_path, metadata_path)| {
                    fit_section(survey_path, metadata_path, &options)
                        .with_context(|| format!("cross-section {}", survey_path.display()))
                })
                .collect::<Result<Vec<_>>>()?;
            info!(n_sections = runs.len(), "cross-sections computed");

            let writer = ResultWriter::new(&output_dir, project_name.clone())?;
            let mut sections = Vec::with_capacity(runs.len());
            for (k, run) in runs.iter().enumerate() {
                // A single cross-section keeps the plain `{project}_*` names.
                let numbered = (runs.len() > 1).then(|| writer.section(k + 1));
                let section_writer = numbered.as_ref().unwrap_or(&writer);
                section_writer.write_rating(&run.result.table)?;
                section_writer.write_summary(&run.metadata, &run.survey, &run.config, &run.result)?;

                let top = run.result.table.last();
                sections.push(SectionRunOutput {
                    survey: run.survey_path.clone(),
                    n_sectors: run.survey.section.sectors().len(),
                    n_levels: run.result.table.len(),
                    bottom: run.survey.section.min_elevation(),
                    top_level: top.map(|e| e.level),
                    top_discharge: top.map(|e| e.aggregate.discharge),
                    design_label: run.metadata.probabilities.design().label.clone(),
                    design_level: run.result.design_levels.design().map(|row| row.level),
                    n_unresolved: run.result.design_levels.failures().count(),
                    rating_file: section_writer.rating_path(),
                    summary_file: section_writer.summary_path(),
                });
            }

            let fitted: Vec<FittedSection<'_>> = runs
                .iter()
                .map(|run| FittedSection {
                    metadata: &run.metadata,
                    survey: &run.survey,
                    result: &run.result,
                })
                .collect();
            writer.write_sections(&fitted)?;

            let output = ComputeOutput {
                project: project_name.to_string(),
                sections,
                sections_file: writer.sections_path(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Section { survey, level, sector } => {
            let survey = read_survey(&survey)?;
            let (scope, polyline) = match &sector {
                Some(name) => {
                    let found = survey
                        .section
                        .sectors()
                        .iter()
                        .find(|s| s.name().to_lowercase() == name.to_lowercase())
                        .ok_or_else(|| CliError::UnknownSector { name: name.clone() })?;
                    (found.name().to_string(), found.coord())
                }
                None => ("profile".to_string(), survey.section.profile()),
            };

            let section = WaterSection::compute(polyline, level, None)
                .with_context(|| format!("cannot compute the wetted section of {scope} at {level}"))?;

            let output = WettedOutput {
                scope,
                level,
                n_bodies: section.bodies.len(),
                width: section.width,
                area: section.area,
                average_depth: section.average_depth,
                max_depth: section.max_depth,
                wet_perimeter: section.wet_perimeter,
                r_hydraulic: section.r_hydraulic,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(exit_code(&err))
        }
    }
}
