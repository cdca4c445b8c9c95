use anyhow::{bail, Context, Result};
use songplays_dwh::{
    cli::{Cli, Commands},
    logging,
    pipeline::{run_create_tables, run_etl},
    Catalog, DwhConfig,
};
use std::time::Instant;

fn main() -> Result<()> {
    let cli = Cli::parse_args();
    logging::init(&cli.log_level);

    let config = DwhConfig::discover(cli.config.as_deref()).context("Failed to load config")?;

    match cli.command() {
        Commands::Etl => {
            let start = Instant::now();
            run_etl(&config).context("ETL run failed")?;
            println!("ETL complete in {:.1}s", start.elapsed().as_secs_f64());
        }

        Commands::CreateTables => {
            run_create_tables(&config).context("Failed to create tables")?;
            println!("Tables dropped and recreated");
        }

        Commands::ListStatements => {
            let catalog = Catalog::new(&config);
            for (group, statements) in catalog.groups() {
                println!("{}:", group);
                for statement in statements {
                    println!("  {}", statement.name);
                }
            }
        }

        Commands::ShowSql { name } => {
            let catalog = Catalog::new(&config);
            match catalog.find(&name) {
                Some(statement) => println!("{}", statement.sql),
                None => bail!("Unknown statement: {}", name),
            }
        }
    }

    Ok(())
}
