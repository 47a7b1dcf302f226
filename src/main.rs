use alumni_scraper_lib::{logger, professions, search_client};
use alumni_scraper_lib::{Collector, CollectorSettings, Config, CsvSink, ProfessionOutcome};

use std::error::Error;

use log::{error, info, warn};

fn main() -> Result<(), Box<dyn Error>> {
    logger::init();
    info!("Starting LinkedIn alumni profile collector...");

    // Fatal before any network activity and before the output file exists.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(Box::new(e));
        }
    };

    let client = search_client::build_client(&config)?;
    let mut sink = CsvSink::open(&config.output_path)?;
    let collector = Collector::new(client.as_ref(), CollectorSettings::from(&config));

    let mut total = 0usize;
    let mut shortfalls = 0usize;

    for profession in professions::PROFESSIONS {
        let report = match collector.collect_profession(profession, &mut sink) {
            Ok(report) => report,
            Err(e) => {
                error!("Aborting run: {}", e);
                return Err(Box::new(e));
            }
        };

        total += report.collected;
        match report.outcome {
            ProfessionOutcome::Satisfied => {
                info!("{}: quota met ({} profiles)", profession.label, report.collected);
            }
            ProfessionOutcome::Exhausted => {
                shortfalls += 1;
                warn!(
                    "{}: keywords exhausted at {}/{} profiles",
                    profession.label, report.collected, config.quota_per_profession
                );
            }
        }
    }

    info!(
        "Completed. {} profiles collected across {} professions ({} below quota). Results in {:?}",
        total,
        professions::PROFESSIONS.len(),
        shortfalls,
        config.output_path
    );
    Ok(())
}
