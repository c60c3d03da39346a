mod app;
mod bank;
mod config;
mod grading;
mod session;
mod ui;

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process;

use eframe::egui;
use simplelog::{
    ColorChoice, CombinedLogger, Config as LogConfig, LevelFilter, SharedLogger, TermLogger,
    TerminalMode, WriteLogger,
};

use app::QuizApp;
use bank::QuestionBank;
use config::UserConfig;

fn main() -> Result<(), eframe::Error> {
    init_logging();

    let mut config = UserConfig::load();
    let Some(bank_path) = resolve_bank_path(&config) else {
        log::error!("no question bank selected");
        fatal("No question bank selected.\nA JSON bank file is required to start.");
    };

    let bank = match QuestionBank::load(&bank_path) {
        Ok(bank) => bank,
        Err(e) => {
            log::error!("failed to load question bank: {}", e);
            fatal(&format!("Failed to load question bank:\n{}", e));
        }
    };

    config.remember_bank(bank_path);
    if let Err(e) = config.save() {
        log::warn!("failed to save config: {}", e);
    }

    let options = eframe::NativeOptions {
        initial_window_size: Some(egui::vec2(1100.0, 750.0)),
        ..Default::default()
    };

    eframe::run_native(
        "Self Quiz",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::dark());
            Box::new(QuizApp::new(cc, bank))
        }),
    )
}

/// The configured bank if it still exists, otherwise a one-time native
/// open dialog. `None` means the user dismissed the dialog.
fn resolve_bank_path(config: &UserConfig) -> Option<PathBuf> {
    if let Some(path) = &config.bank_file {
        if path.is_file() {
            return Some(path.clone());
        }
        log::warn!("configured bank {} is gone", path.display());
    }

    let mut dialog = rfd::FileDialog::new().add_filter("JSON question bank", &["json"]);
    let start_dir = config
        .bank_file
        .as_deref()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .or_else(|| {
            config
                .file_history
                .first()
                .and_then(|(f, _)| Path::new(f).parent().map(Path::to_path_buf))
        });
    if let Some(dir) = start_dir {
        dialog = dialog.set_directory(dir);
    }
    dialog.pick_file()
}

fn fatal(message: &str) -> ! {
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("Self Quiz")
        .set_description(message)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
    process::exit(1);
}

fn init_logging() {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let Some(dir) = dirs::data_local_dir() {
        let dir = dir.join("selfquiz");
        if std::fs::create_dir_all(&dir).is_ok() {
            if let Ok(file) = File::create(dir.join("selfquiz.log")) {
                loggers.push(WriteLogger::new(
                    LevelFilter::Debug,
                    LogConfig::default(),
                    file,
                ));
            }
        }
    }
    let _ = CombinedLogger::init(loggers);
}
