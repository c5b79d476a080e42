//! Terminal rendering and interactive input.

use std::time::Duration;

use console::{style, Term};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use indicatif::{ProgressBar, ProgressStyle};
use lew_estimator::{Element, Inputs, Surface};

/// Draws page elements on stdout, with a spinner while waiting.
pub struct TerminalSurface {
    term: Term,
    spinner: Option<ProgressBar>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            spinner: None,
        }
    }

    fn line(&self, text: &str) {
        if let Err(e) = self.term.write_line(text) {
            tracing::warn!(error = %e, "failed to write to terminal");
        }
    }
}

impl Surface for TerminalSurface {
    fn show(&mut self, element: Element) {
        match element {
            Element::Title(text) => {
                self.line("");
                self.line(&format!("  {}", style(text).cyan().bold()));
            }
            Element::Markdown(text) => self.line(&format!("  {}", render_bold(&text))),
            Element::Subheader(text) => {
                self.line("");
                self.line(&format!("  {}", style(text).bold()));
            }
            Element::Metric { label, value } => {
                self.line(&format!("  {}", style(label).dim()));
                self.line(&format!("  {}", style(value).green().bold()));
            }
            Element::Text(text) => {
                for line in text.lines() {
                    self.line(&format!("  {line}"));
                }
            }
            Element::Warning(text) => {
                self.line("");
                self.line(&format!("  {} {}", style("!").yellow().bold(), style(text).yellow()));
            }
            Element::Error(text) => {
                self.line("");
                self.line(&format!("  {} {}", style("✗").red().bold(), style(text).red()));
            }
            Element::Caption(text) => self.line(&format!("  {}", style(text).dim())),
            Element::Divider => {
                self.line("");
                self.line(&format!("  {}", style("─".repeat(60)).dim()));
            }
        }
    }

    fn begin_wait(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(template) = ProgressStyle::with_template("  {spinner:.cyan} {msg}") {
            spinner.set_style(template);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn end_wait(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

/// Turn `**bold**` spans into styled text; everything else is printed as is.
fn render_bold(text: &str) -> String {
    text.split("**")
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 1 {
                style(part).bold().to_string()
            } else {
                part.to_string()
            }
        })
        .collect()
}

/// Ask for each slider value, rejecting entries outside its range.
pub fn prompt_inputs(inputs: &mut Inputs) -> dialoguer::Result<()> {
    let theme = ColorfulTheme::default();

    for slider in inputs.sliders_mut() {
        let bounds = slider.clone();
        let value: f64 = Input::with_theme(&theme)
            .with_prompt(format!("{} [{}-{}]", slider.label, slider.min, slider.max))
            .default(slider.value())
            .validate_with(move |v: &f64| -> Result<(), String> {
                if bounds.contains(*v) {
                    Ok(())
                } else {
                    Err(format!("must be between {} and {}", bounds.min, bounds.max))
                }
            })
            .interact_text()?;
        slider.set(value);
    }
    Ok(())
}

pub fn confirm_adjust() -> dialoguer::Result<bool> {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt("Adjust inputs?")
        .default(true)
        .interact()
}
