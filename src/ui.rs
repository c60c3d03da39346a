use std::time::Duration;

use egui::{Color32, RichText, Ui};

use crate::grading::GradeReport;
use crate::session::Session;

const ANSWERED_COLOR: Color32 = Color32::from_rgb(110, 200, 110);

/// Everything the widgets can ask the app to do. Option clicks route the
/// question index and displayed label through here instead of capturing
/// per-widget state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizAction {
    None,
    GoTo(usize),
    Toggle { question: usize, label: char },
    Submit,
    Retry,
    Exit,
}

pub fn show_navigation(ui: &mut Ui, session: &Session) -> QuizAction {
    let mut action = QuizAction::None;

    ui.heading("Questions");
    ui.separator();
    egui::ScrollArea::vertical().show(ui, |ui| {
        for index in 0..session.len() {
            let mut text = RichText::new(format!("Question {}", index + 1));
            if session.is_answered(index) {
                text = text.color(ANSWERED_COLOR);
            }
            let selected = index == session.current_index();
            if ui.selectable_label(selected, text).clicked() {
                action = QuizAction::GoTo(index);
            }
        }
    });

    action
}

pub fn show_question(ui: &mut Ui, session: &Session) -> QuizAction {
    let mut action = QuizAction::None;
    let index = session.current_index();
    let total = session.len();

    ui.horizontal(|ui| {
        ui.label(RichText::new(format!("Time: {}", format_elapsed(session.elapsed()))).size(16.0));
        if ui.button("Submit").clicked() {
            action = QuizAction::Submit;
        }
    });
    ui.separator();

    ui.heading(format!("Question {} of {}", index + 1, total));
    ui.add_space(10.0);
    ui.label(RichText::new(&session.current_question().text).size(18.0));
    ui.add_space(10.0);

    for option in session.displayed_options(index) {
        let mut checked = session.selection(index).contains(&option.label);
        if ui
            .checkbox(&mut checked, format!("{}. {}", option.label, option.text))
            .changed()
        {
            action = QuizAction::Toggle {
                question: index,
                label: option.label,
            };
        }
    }

    ui.add_space(20.0);
    ui.horizontal(|ui| {
        if index > 0 && ui.button("Previous").clicked() {
            action = QuizAction::GoTo(index - 1);
        }
        if index < total - 1 {
            if ui.button("Next").clicked() {
                action = QuizAction::GoTo(index + 1);
            }
        } else if ui.button("Finish").clicked() {
            action = QuizAction::Submit;
        }
    });

    action
}

pub fn show_results(ui: &mut Ui, report: &GradeReport, elapsed: Duration) -> QuizAction {
    let mut action = QuizAction::None;

    ui.heading("Results");
    ui.separator();
    ui.label(format!("Time: {}", format_elapsed(elapsed)));
    ui.label(format!("Correct: {} of {}", report.correct(), report.total));
    ui.label(format!("Wrong/total: {}/{}", report.wrong(), report.total));
    ui.add_space(10.0);

    if report.all_correct() {
        ui.label(
            RichText::new("All correct, well done!")
                .size(18.0)
                .color(ANSWERED_COLOR),
        );
    } else {
        ui.label("Wrong answers and corrections:");
        egui::ScrollArea::vertical().show(ui, |ui| {
            for mismatch in &report.mismatches {
                ui.add_space(8.0);
                ui.label(
                    RichText::new(format!("{}. {}", mismatch.id, mismatch.question))
                        .size(16.0)
                        .strong(),
                );
                for option in &mismatch.options {
                    ui.label(option.to_string());
                }
                ui.label(format!(
                    "Your answer: {}   Correct answer: {}",
                    mismatch.chosen, mismatch.correct
                ));
            }
        });
    }

    ui.add_space(20.0);
    ui.separator();
    ui.horizontal(|ui| {
        if ui.button("Retry").clicked() {
            action = QuizAction::Retry;
        }
        if ui.button("Exit").clicked() {
            action = QuizAction::Exit;
        }
    });

    action
}

pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}
