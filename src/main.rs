use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;

use notees::config::NoteesConfig;
use notees::store::NoteStore;

fn init_logging() {
    // Log to the systemd user journal (`journalctl --user -t notees -f`).
    // Wrapper filters: notees at info/debug (per flag/config), everything else at warn.
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("notees") {
                let max = if notees::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("notees".to_string()),
        Err(e) => {
            eprintln!("notees: journal unavailable, logging disabled: {}", e);
            return;
        }
    };

    if log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })).is_ok() {
        // Global max must be Debug so debug logs can pass through when toggled
        log::set_max_level(log::LevelFilter::Debug);
    }
}

fn main() -> ExitCode {
    let invocation = cli::Invocation::parse();

    let config = NoteesConfig::default_path()
        .map(|path| NoteesConfig::load(&path))
        .unwrap_or_default();

    notees::set_debug_logging(invocation.debug || config.debug_logging);
    init_logging();

    if let Err(e) = config.ensure_dirs() {
        log::error!("Failed to create data directory: {}", e);
    }

    let mut store = NoteStore::new(config.blob_store(), config.storage_key.clone())
        .with_seed(config.seed_policy())
        .with_default_color(config.default_color);

    if let Err(e) = commands::load_store(&mut store, &mut std::io::stderr()) {
        eprintln!("notees: {}", e);
        return ExitCode::FAILURE;
    }

    let command = invocation.command_or_list();
    let mut stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    match commands::run(&mut store, &command, config.sort_order, &mut stdin, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("notees: {}", e);
            ExitCode::FAILURE
        }
    }
}
