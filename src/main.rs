use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use haystack_typer::config::Settings;
use haystack_typer::export::{export_csv, export_json, print_summary};
use haystack_typer::logging::init_logging;
use haystack_typer::migrate::{mark_by_display_name, strip_tag, Migration};
use haystack_typer::model::Record;
use haystack_typer::ontology::OntologyIndex;
use haystack_typer::parser::{load_records, write_records};
use haystack_typer::reporter::report;
use haystack_typer::tags::normalize_marker_sentinel;
use haystack_typer::ui::App;

#[derive(Parser, Debug)]
#[command(name = "haystack-typer")]
#[command(about = "Haystack Typer - type building entities against the Haystack defs")]
#[command(version)]
struct Args {
    /// Settings file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Keep legacy marker values as they are
    #[arg(long, global = true)]
    no_normalize: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Type every entity and report tag usage
    Report {
        /// Haystack JSON grid of the building
        file: PathBuf,

        /// Haystack defs grid (JSON)
        #[arg(long, value_name = "FILE")]
        defs: Option<PathBuf>,

        /// Building name used in the report (default: file stem)
        #[arg(long)]
        name: Option<String>,

        /// Export the report to JSON
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,

        /// Export the tag breakdown to CSV
        #[arg(long, value_name = "FILE")]
        csv: Option<PathBuf>,

        /// Skip writing report_<name>.json and .csv to the output directory
        #[arg(long)]
        no_save: bool,

        /// Browse the report in the terminal
        #[arg(long)]
        browse: bool,
    },

    /// Add a marker to equips whose navName contains a string
    Mark {
        file: PathBuf,

        /// Case-insensitive navName substring
        #[arg(long)]
        needle: String,

        /// Marker tag to add
        #[arg(long)]
        tag: String,

        /// Output grid (default: <file>-improved.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Remove a tag from every entity carrying it
    Strip {
        file: PathBuf,

        #[arg(long)]
        tag: String,

        /// Output grid (default: <file>-improved.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if args.log_json {
        settings.logging.json = true;
    }
    if args.no_normalize {
        settings.records.normalize_marker = false;
    }
    init_logging(&settings.logging)?;

    match args.command {
        Command::Report {
            file,
            defs,
            name,
            mut json,
            mut csv,
            no_save,
            browse,
        } => {
            if no_save {
                settings.output.save = false;
            }
            let defs = defs.unwrap_or_else(|| settings.ontology.defs.clone());
            let ontology = OntologyIndex::load(&defs)
                .wrap_err_with(|| format!("cannot load ontology from {}", defs.display()))?;
            let records = read_building(&file, &settings)?;
            let name = name.unwrap_or_else(|| file_stem(&file));

            let report = report(&name, &records, &ontology);
            print_summary(&report)?;

            if let Some((json_default, csv_default)) = settings.saved_report_paths(&name) {
                std::fs::create_dir_all(&settings.output.dir).wrap_err_with(|| {
                    format!("cannot create {}", settings.output.dir.display())
                })?;
                json.get_or_insert(json_default);
                csv.get_or_insert(csv_default);
            }

            if let Some(json_path) = &json {
                export_json(&report, json_path)?;
                println!("Exported to JSON: {}", json_path.display());
            }

            if let Some(csv_path) = &csv {
                export_csv(&report, csv_path)?;
                println!("Exported to CSV: {}", csv_path.display());
            }

            if !browse {
                return Ok(());
            }

            let terminal = ratatui::init();
            let result = App::new(report).run(terminal);
            ratatui::restore();
            result
        }
        Command::Mark {
            file,
            needle,
            tag,
            output,
        } => {
            let records = read_building(&file, &settings)?;
            let migration = mark_by_display_name(records, &needle, &tag)?;
            write_migration(&file, output, &migration)
        }
        Command::Strip { file, tag, output } => {
            let records = read_building(&file, &settings)?;
            let migration = strip_tag(records, &tag)?;
            write_migration(&file, output, &migration)
        }
    }
}

fn read_building(file: &Path, settings: &Settings) -> Result<Vec<Record>> {
    let records = load_records(file)?;
    if settings.records.normalize_marker {
        return Ok(normalize_marker_sentinel(
            records,
            &settings.records.bad_marker,
        ));
    }
    Ok(records)
}

fn write_migration(file: &Path, output: Option<PathBuf>, migration: &Migration) -> Result<()> {
    let output = output
        .unwrap_or_else(|| file.with_file_name(format!("{}-improved.json", file_stem(file))));
    write_records(&output, &migration.records)?;
    info!(changed = migration.changed, "migration written");
    println!(
        "Updated {} of {} entities: {}",
        migration.changed,
        migration.records.len(),
        output.display()
    );
    Ok(())
}

fn file_stem(file: &Path) -> String {
    file.file_stem()
        .map_or_else(|| "building".to_string(), |s| s.to_string_lossy().to_string())
}
