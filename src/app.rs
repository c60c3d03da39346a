use eframe::egui;

use crate::bank::QuestionBank;
use crate::grading;
use crate::session::{Phase, Session, SubmitOutcome};
use crate::ui::{self, QuizAction};

pub struct QuizApp {
    bank: QuestionBank,
    session: Session,
}

impl QuizApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, bank: QuestionBank) -> Self {
        let session = Session::new(&bank);
        Self { bank, session }
    }

    fn handle(&mut self, action: QuizAction, frame: &mut eframe::Frame) {
        match action {
            QuizAction::None => {}
            QuizAction::GoTo(index) => self.session.go_to(index),
            QuizAction::Toggle { question, label } => self.session.toggle_option(question, label),
            QuizAction::Submit => self.submit(),
            QuizAction::Retry => self.retry(),
            QuizAction::Exit => frame.close(),
        }
    }

    fn submit(&mut self) {
        match self.session.try_submit() {
            SubmitOutcome::Graded => self.log_submission(),
            SubmitOutcome::NeedsConfirmation(unanswered) => {
                let confirmed = rfd::MessageDialog::new()
                    .set_level(rfd::MessageLevel::Warning)
                    .set_title("Confirm submission")
                    .set_description(&format!(
                        "{} question(s) unanswered. Submit anyway?",
                        unanswered
                    ))
                    .set_buttons(rfd::MessageButtons::YesNo)
                    .show();
                if confirmed {
                    self.session.confirm_submit();
                    self.log_submission();
                } else {
                    self.session.cancel_submit();
                }
            }
        }
    }

    fn log_submission(&self) {
        let report = grading::grade(&self.session);
        log::info!(
            "submitted after {}: {}/{} wrong",
            ui::format_elapsed(self.session.elapsed()),
            report.wrong(),
            report.total
        );
    }

    fn retry(&mut self) {
        log::info!("restarting with a fresh session");
        self.session = Session::new(&self.bank);
    }
}

impl eframe::App for QuizApp {
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        let mut action = QuizAction::None;

        match self.session.phase() {
            Phase::Active | Phase::Submitting => {
                // Keep the elapsed label moving even when no input arrives.
                ctx.request_repaint_after(std::time::Duration::from_secs(1));

                egui::SidePanel::left("question_nav")
                    .resizable(false)
                    .default_width(170.0)
                    .show(ctx, |ui| {
                        let nav = ui::show_navigation(ui, &self.session);
                        if nav != QuizAction::None {
                            action = nav;
                        }
                    });
                egui::CentralPanel::default().show(ctx, |ui| {
                    let main = ui::show_question(ui, &self.session);
                    if main != QuizAction::None {
                        action = main;
                    }
                });
            }
            Phase::Graded => {
                // The report is derived, not stored; regrading each frame is
                // cheap and cannot drift from the session.
                let report = grading::grade(&self.session);
                egui::CentralPanel::default().show(ctx, |ui| {
                    action = ui::show_results(ui, &report, self.session.elapsed());
                });
            }
        }

        self.handle(action, frame);
    }
}
