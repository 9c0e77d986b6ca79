use std::env;
use std::process;
use duffing::config::RunConfig;
use duffing::render::{self, Renderer};
use duffing::sweep::sweep;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1) {
        Some(path) => match RunConfig::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load {}: {}", path, e);
                process::exit(2);
            }
        },
        None => RunConfig::default()
    };

    let renderer = Renderer::new(config.render.clone());
    let base = config.solve_params();
    log::info!(
        "{} run(s), tmax = {}, t_trans = {}, {} samples per period",
        config.runs.len(), base.tmax, base.t_trans, base.dt_per_period
    );

    let mut failed = 0;
    if config.output.potential_curve {
        if let Err(e) = renderer.save(&renderer.potential_curve(), &config.output.dir, render::POTENTIAL_FILE_NAME) {
            log::error!("failed to save {}: {}", render::POTENTIAL_FILE_NAME, e);
            failed += 1;
        }
    }

    for run in sweep(&base, &config.runs) {
        let solution = match run.solution {
            Ok(solution) => solution,
            Err(e) => {
                log::error!("omega = {:.3}, gamma = {:.3}, delta = {:.3}: {}",
                    run.drive.omega, run.drive.gamma, run.drive.delta, e);
                failed += 1;
                continue;
            }
        };
        log::info!("omega = {:.3}, gamma = {:.3}, delta = {:.3}: {} points, {} on the section",
            run.drive.omega, run.drive.gamma, run.drive.delta,
            solution.len(), solution.poincare_section().len());

        let mut images = vec![
            (renderer.poincare_section(&solution), render::poincare_file_name(&run.drive))
        ];
        if config.output.phase_portrait {
            images.push((renderer.phase_portrait(&solution), render::phase_portrait_file_name(&run.drive)));
        }
        for (img, name) in images {
            if let Err(e) = renderer.save(&img, &config.output.dir, &name) {
                log::error!("failed to save {}: {}", name, e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        process::exit(1);
    }
}
