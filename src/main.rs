use beepboop::cli::Cli;
use beepboop::config::{format_duration, Config, RunSettings};
use beepboop::core::check::{parse_expected_statuses, resolve_mode_and_target, CheckOptions, Checker};
use beepboop::core::poll::{PollOutcome, PollSettings, Poller, EXIT_FAILURE, EXIT_SUCCESS, EXIT_USAGE};
use beepboop::ui::reporter::ConsoleReporter;
use beepboop::ui::{Beeper, Colorizer, SignalEmitter};
use beepboop::version::resolve_version;
use tokio_util::sync::CancellationToken;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = main_impl().await;
    std::process::exit(code);
}

async fn main_impl() -> i32 {
    let cli = Cli::parse_args();
    let app_version = resolve_version();

    if cli.version {
        println!("{}", app_version);
        return EXIT_SUCCESS;
    }

    // Handle configuration commands
    if cli.init {
        return match Config::init() {
            Ok(path) => {
                println!("Config file: {}", path.display());
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("config error: {}", e);
                EXIT_FAILURE
            }
        };
    }

    let config = match Config::load().and_then(|config| config.check().map(|_| config)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("usage error: {}", e);
            return EXIT_USAGE;
        }
    };

    if cli.print_config {
        return match config.to_toml() {
            Ok(text) => {
                print!("{}", text);
                EXIT_SUCCESS
            }
            Err(e) => {
                eprintln!("config error: {}", e);
                EXIT_FAILURE
            }
        };
    }

    let settings = match cli.resolve(config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("usage error: {}", e);
            return EXIT_USAGE;
        }
    };

    let colors = Colorizer::from_environment(settings.no_color);

    let expected_statuses = match parse_expected_statuses(&settings.status) {
        Ok(statuses) => statuses,
        Err(e) => {
            eprintln!("invalid --status: {}", e);
            return EXIT_USAGE;
        }
    };

    let (mode, target) = match resolve_mode_and_target(&settings.mode, &settings.target) {
        Ok(resolved) => resolved,
        Err(e) => {
            eprintln!("target error: {}", e);
            return EXIT_USAGE;
        }
    };

    if !settings.quiet {
        println!("{}", banner(&app_version, &settings, mode.as_str(), &target));
    }

    let options = CheckOptions::new(mode, target, settings.timeout)
        .with_expected_statuses(expected_statuses);
    let checker = match Checker::new(options) {
        Ok(checker) => checker,
        Err(e) if e.is_validation() => {
            eprintln!("usage error: {}", e);
            return EXIT_USAGE;
        }
        Err(e) => {
            eprintln!("{}: {}", colors.error("check failed"), e);
            return EXIT_FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            wait_for_shutdown_signal().await;
            cancel.cancel();
        }
    });

    let poller = Poller::new(PollSettings {
        interval: settings.interval,
        retries: settings.retries,
        once: settings.once,
    });
    let reporter = ConsoleReporter::new(colors, settings.quiet);

    let outcome = poller.run(&checker, &cancel, &reporter).await;
    if outcome == PollOutcome::Up {
        Beeper.emit();
    }
    reporter.report_outcome(&outcome);

    outcome.exit_code()
}

fn banner(version: &str, settings: &RunSettings, mode: &str, target: &str) -> String {
    format!(
        "beepboop {}: mode={} target={} interval={} timeout={} retries={} once={}",
        version,
        mode,
        target,
        format_duration(settings.interval),
        format_duration(settings.timeout),
        settings.retries,
        settings.once
    )
}

/// Resolve on SIGINT, or SIGTERM on Unix
async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        if let Ok(mut terminate) = signal(SignalKind::terminate()) {
            tokio::select! {
                result = tokio::signal::ctrl_c() => {
                    if result.is_ok() {
                        return;
                    }
                }
                _ = terminate.recv() => return,
            }
            // ctrl-c handler unavailable: only SIGTERM can cancel
            terminate.recv().await;
            return;
        }
    }

    // Without a working handler, never cancel
    if tokio::signal::ctrl_c().await.is_err() {
        std::future::pending::<()>().await;
    }
}
