use anyhow::{bail, Context, Result};
use nimby_rails_dataset::{
    build_dataset,
    cli::{Cli, Commands},
    logging::init_logging,
    verify::inspect,
    writer::generate_schema,
    BuildConfig, Error,
};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Build {
            geo,
            timetable,
            output_db,
            force,
            json,
        } => {
            let start = Instant::now();

            for (label, path) in [("Geo export", &geo), ("Timetable export", &timetable)] {
                if !path.is_file() {
                    bail!("{} not found: {:?}", label, path);
                }
            }

            let config = BuildConfig::new(geo, timetable, output_db).overwrite(force);
            if !config.destination_clear() {
                bail!(
                    "Output exists: {:?} (use --force to overwrite)",
                    config.output_db
                );
            }

            let summary = build_dataset(&config)
                .with_context(|| format!("Failed to build {:?}", config.output_db))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!(
                    "\nCreated {:?} in {:.1}s",
                    summary.output,
                    start.elapsed().as_secs_f64()
                );
                println!("  stations:   {}", summary.stations);
                println!("  lines:      {}", summary.lines);
                println!("  line_stops: {}", summary.line_stops);
                println!("  waypoints excluded: {}", summary.waypoints_excluded);
            }
        }

        Commands::Schema => {
            for sql in generate_schema() {
                println!("{};\n", sql);
            }
        }

        Commands::Inspect { db, json } => {
            let counts = match inspect(&db) {
                Ok(counts) => counts,
                Err(Error::ReferentialIntegrityViolation(violations)) => {
                    for violation in &violations {
                        eprintln!("  {}", violation);
                    }
                    bail!("{} foreign key violation(s) in {:?}", violations.len(), db);
                }
                Err(err) => {
                    return Err(err).with_context(|| format!("Failed to inspect {:?}", db))
                }
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&counts)?);
            } else {
                println!("stations:            {}", counts.stations);
                println!("lines:               {}", counts.lines);
                println!("line_stops:          {}", counts.line_stops);
                println!("line_stops_enriched: {}", counts.line_stops_enriched);
            }
        }
    }

    Ok(())
}
