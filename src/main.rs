use std::time::Instant;

use log::info;

use tsp_cuts_core::{Result, SolverInput, SolverOptions, logging, solve_tsp, write_tour};

fn main() -> Result<()> {
    let now = Instant::now();
    let options = SolverOptions::from_args()?;
    logging::init_logger(&options)?;
    let input = SolverInput::from_options(&options)?;

    info!("input: {input}");
    info!("options: {options}");

    let solution = solve_tsp(input.cities(), &options)?;
    write_tour(&solution.tour, options.output_path())?;

    info!(
        "output: n={} length={:.6} status={} time={:.2}s",
        solution.tour.len(),
        solution.length,
        solution.status,
        now.elapsed().as_secs_f32()
    );

    solution.tour.tour_metrics(options.outlier_threshold);

    Ok(())
}
