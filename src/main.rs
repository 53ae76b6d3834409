use std::thread;
use std::time::{Duration, Instant};

use process_monitor::config::Config;

const WAIT_SLICE: Duration = Duration::from_millis(250);

fn main() {
    env_logger::init();

    let once = std::env::args().skip(1).any(|arg| arg == "--once");
    let config = Config::load();

    std::process::exit(run(&config, once));
}

#[cfg(target_os = "linux")]
fn run(config: &Config, once: bool) -> i32 {
    use process_monitor::backend::{LinuxProcessSource, ProcessSampler, RefreshController};
    use process_monitor::ui::text_table;

    let source = match LinuxProcessSource::new(config.cpu_sample_interval()) {
        Ok(source) => source,
        Err(e) => {
            log::error!("Cannot read the process table: {}", e);
            return 1;
        }
    };

    let mut controller = RefreshController::new(
        ProcessSampler::new(source),
        config.aggregate_options(),
        |outcome| match outcome {
            Ok(snapshot) => {
                println!("{}", text_table::title(&snapshot));
                println!("{}", text_table::render(&snapshot));
            }
            // Already logged by the controller; the previous table stays on screen
            Err(_) => {}
        },
    );

    loop {
        let started = Instant::now();
        if let Err(e) = controller.request_refresh() {
            log::error!("{}", e);
            return 1;
        }
        while controller.is_busy() {
            if !controller.wait(WAIT_SLICE) {
                log::debug!("Refresh still running after {:?}", started.elapsed());
            }
        }

        if once {
            return if controller.latest().is_some() { 0 } else { 1 };
        }
        thread::sleep(config.refresh_interval().saturating_sub(started.elapsed()));
    }
}

#[cfg(not(target_os = "linux"))]
fn run(_config: &Config, _once: bool) -> i32 {
    log::error!("Only Linux process tables are supported");
    1
}
