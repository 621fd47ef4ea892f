use anyhow::{Context, Result};
use football_events_sqlite::{
    cli::{Cli, Commands},
    filter::{resolve_queries, CompetitionFilter},
    ingest::{check_sources, run_ingest},
    query::{QueryRunner, QUERIES},
    schema::{DependencyResolver, ALL_TABLES},
    source::DataLayout,
    writer::{generate_schema_script, Database},
};
use std::time::Instant;
use tracing_subscriber::{fmt, EnvFilter};

fn install_tracing_subscriber() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    install_tracing_subscriber();

    match &cli.command {
        Commands::Load { .. } => {
            let config = cli.command.load_config().context("Missing load settings")?;
            let start = Instant::now();

            let mut db = Database::create(&config.output_db)?;
            db.bootstrap(config.schema_script.as_deref())?;

            let layout = DataLayout::new(&config.data_dir);
            println!("\nLoading {:?}...", layout.root());
            let summary = run_ingest(&mut db, &layout, &config.filter)?;

            for (table, count) in &summary.inserted {
                println!("  {:<16} {}", table, count);
            }
            for (step, err) in &summary.failed_steps {
                println!("  step {} aborted: {}", step, err);
            }

            if let Some(snapshot) = &config.snapshot {
                db.export_snapshot(snapshot)?;
                println!("\nSnapshot written to {:?}", snapshot);
            }
            db.finalize()?;

            let elapsed = start.elapsed();
            println!(
                "\nCreated {:?} ({} records) in {:.1}s",
                config.output_db,
                summary.total_rows(),
                elapsed.as_secs_f64()
            );
        }

        Commands::Check {
            data_dir,
            competition,
            season,
        } => {
            let filter = CompetitionFilter::with_overrides(competition.clone(), season.clone());
            let matches = check_sources(&DataLayout::new(data_dir), &filter)?;
            println!("All source documents readable ({} matches selected)", matches);
        }

        Commands::Snapshot { db, out } => {
            Database::open(db)?.export_snapshot(out)?;
            println!("Snapshot of {:?} written to {:?}", db, out);
        }

        Commands::Query { only, skip, .. } => {
            let config = cli.command.query_config().context("Missing query settings")?;
            let queries = resolve_queries(only.clone(), skip.clone())?;

            let outcomes = QueryRunner::new(config).run(&queries)?;
            for outcome in &outcomes {
                println!("{}", outcome.timing);
            }
        }

        Commands::Schema { include, output } => {
            let resolver = DependencyResolver::new();
            let tables = match include {
                Some(names) => {
                    let names: Vec<&str> = names.iter().map(String::as_str).collect();
                    resolver.resolve_includes(&names)
                }
                None => resolver.all_tables_ordered(),
            }
            .map_err(anyhow::Error::msg)?;

            let script = generate_schema_script(&tables);
            match output {
                Some(path) => {
                    std::fs::write(path, &script)
                        .with_context(|| format!("Failed to write schema script: {:?}", path))?;
                    println!("Schema for {} tables written to {:?}", tables.len(), path);
                }
                None => print!("{}", script),
            }
        }

        Commands::ListTables => {
            println!("Available tables:\n");
            for table in ALL_TABLES {
                println!("  {:<16} {}", table.name, table.source_file);
            }
        }

        Commands::ListQueries => {
            println!("Analytical queries:\n");
            for query in QUERIES {
                println!("  {:>2}  {}", query.number, query.title);
            }
        }
    }

    Ok(())
}
