use attachment_style::{read_sheets, Error, QUESTIONNAIRE, SCENARIOS};
use clap::{Parser, ValueEnum};
use std::fs::File;
use std::io::BufReader;

#[derive(Parser)]
struct Args {
    /// CSV file of recorded answer sheets, one row per respondent.
    path: String,
    /// Which experience the answers were recorded against.
    #[arg(long, value_enum, default_value = "questionnaire")]
    bank: Bank,
}

#[derive(Clone, Copy, ValueEnum)]
enum Bank {
    Questionnaire,
    Scenarios,
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bulk=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    let reader = BufReader::new(File::open(&args.path)?);
    for row in read_sheets(reader) {
        match row {
            Ok((id, sheet)) => {
                let tally = match args.bank {
                    Bank::Questionnaire => sheet.to_tally(&*QUESTIONNAIRE),
                    Bank::Scenarios => sheet.to_tally(&*SCENARIOS),
                };
                match tally {
                    Ok(tally) => {
                        let result = tally.classify();
                        println!(
                            "id = {}, primary = {}, secondary = {}, counts = {:?}",
                            id,
                            result.primary,
                            result.secondary,
                            tally.counts()
                        );
                    }
                    Err(e) => {
                        tracing::warn!("skipping {}: {}", id, e);
                    }
                }
            }
            Err(e) => {
                tracing::warn!("skipping row: {}", e);
            }
        }
    }
    Ok(())
}
