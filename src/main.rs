use taxi_unit_economics::{run, AnalysisConfig};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AnalysisConfig::default();
    match run(&config) {
        Ok(_) => Ok(()),
        Err(err) if err.is_configuration() => {
            // Nothing was written; report and end the run normally.
            println!("Error: {err}");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
