use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{Duration, Instant};

use realtime_speed_controller::threaded_impl::control_thread::spawn_control_thread;
use realtime_speed_controller::threaded_impl::update_thread::{
    spawn_measurement_thread, spawn_target_thread,
};
use realtime_speed_controller::{
    load_config, sim, BusChannels, ControlLoop, DiagnosticLog, LoopStats, PidController,
    SharedState, TimingMetrics, UpdateRouter,
};

const CONFIG_PATH: &str = "config/speed-controller.toml";
const RUN_SECS: u64 = 10;

fn main() {
    println!("===========================================");
    println!("Starting Ground Speed PID Controller");
    println!("===========================================\n");

    let config = load_config(CONFIG_PATH);
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let channels = BusChannels::new(256);
    let state = Arc::new(SharedState::new());
    let log = DiagnosticLog::new(2000);
    let metrics = TimingMetrics::new();
    let stats = LoopStats::new();

    let router = UpdateRouter::new(state.clone(), config.input_sender_id, config.control_sender_id);
    let pid = PidController::new(config.pid());
    let control = ControlLoop::new(pid, state, config.output_sender_id);

    // Simulated bus traffic standing in for the vehicle-side proxies
    let feed_handle = sim::spawn_feed_thread(channels.clone(), &config, stats.clone());

    let measurement_handle = spawn_measurement_thread(
        channels.clone(),
        router.clone(),
        stats.clone(),
        log.clone(),
        metrics.clone(),
        config.verbose,
    );
    let target_handle = spawn_target_thread(
        channels.clone(),
        router,
        stats.clone(),
        log.clone(),
        metrics.clone(),
        config.verbose,
    );
    let control_handle = spawn_control_thread(
        channels.clone(),
        control,
        stats.clone(),
        log.clone(),
        metrics.clone(),
        config.period(),
        config.verbose,
    );

    println!(
        "Control loop running at {} Hz for {} seconds...\n",
        config.freq, RUN_SECS
    );

    // Consume the outbound stream in place of the real transport
    let deadline = Instant::now() + Duration::from_secs(RUN_SECS);
    while Instant::now() < deadline {
        match channels.actuation_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(command) => {
                if config.verbose {
                    println!(
                        "[ACTUATION] acceleration {:.3}, steering {:.1}, valid {}",
                        command.payload.acceleration,
                        command.payload.steering,
                        command.payload.is_valid
                    );
                }
            }
            Err(crossbeam::channel::RecvTimeoutError::Timeout) => continue,
            Err(_) => break,
        }
    }

    println!("\n===========================================");
    println!("Run completed - initiating shutdown");
    stats.shutdown.store(true, Ordering::Relaxed);

    let _ = feed_handle.join();
    let _ = measurement_handle.join();
    let _ = target_handle.join();
    let _ = control_handle.join();

    let ticks = stats.ticks.load(Ordering::Relaxed);
    let skipped = stats.skipped.load(Ordering::Relaxed);
    let published = stats.published.load(Ordering::Relaxed);
    let output_ratio = if ticks > 0 {
        published as f64 / ticks as f64 * 100.0
    } else {
        0.0
    };

    println!("===========================================");
    println!("FINAL RUN RESULTS");
    println!("===========================================");
    println!("Ticks: {} ({} skipped while not ready)", ticks, skipped);
    println!("Commands published: {} ({:.1}% of ticks)", published, output_ratio);
    println!(
        "Commands dropped on full channel: {}",
        stats.dropped.load(Ordering::Relaxed)
    );
    println!(
        "Measurements accepted/rejected: {}/{}",
        stats.measurements_accepted.load(Ordering::Relaxed),
        stats.measurements_rejected.load(Ordering::Relaxed)
    );
    println!(
        "Targets accepted/rejected: {}/{}",
        stats.targets_accepted.load(Ordering::Relaxed),
        stats.targets_rejected.load(Ordering::Relaxed)
    );

    let report = metrics.report();
    println!("\n=== Performance Metrics ===");
    println!("Tick P50: {:?}, P99: {:?}", report.tick_p50, report.tick_p99);
    println!(
        "Publish P50: {:?}, P99: {:?}",
        report.publish_p50, report.publish_p99
    );
    println!(
        "Ingest P50: {:?}, P99: {:?}",
        report.ingest_p50, report.ingest_p99
    );
    println!(
        "Jitter P50: {:?}, P99: {:?}",
        report.jitter_p50, report.jitter_p99
    );

    if config.verbose {
        println!("\n=== Last Diagnostic Entries ===");
        for line in log.tail(10) {
            println!("{}", line);
        }
    }
}
