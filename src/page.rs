//! One render of the estimator page.
//!
//! The page is written against a [`Surface`] so the same sequence drives the
//! terminal front end and the tests.

use crate::advice::Advisor;
use crate::inputs::Inputs;

pub const TITLE: &str = "X50: Lifelong Wellbeing Estimator";
pub const INTRO: &str =
    "Use this tool to estimate your **LEW** (Life-Enhanced Wellbeing) and get guidance to improve it.";
pub const SCORE_HEADING: &str = "Your Estimated LEW";
pub const SCORE_LABEL: &str = "LEW (Life-Enhanced Wellbeing)";
pub const ADVICE_HEADING: &str = "X50 AI Guidance";
pub const WAIT_MESSAGE: &str = "Thinking deeply about your wellbeing...";
pub const MISSING_KEY_WARNING: &str = "OPENAI_API_KEY not found. Skipping advice generation.";
pub const ADVICE_ERROR: &str = "An error occurred while generating advice.";
pub const DISCLAIMER: &str =
    "This is an early prototype. X50 AI provides motivational insights, not medical advice.";

/// A displayable piece of the page.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Title(String),
    Markdown(String),
    Subheader(String),
    Metric { label: String, value: String },
    Text(String),
    Warning(String),
    Error(String),
    Caption(String),
    Divider,
}

/// Something a page can be drawn on.
pub trait Surface {
    fn show(&mut self, element: Element);

    /// Called before a blocking request starts.
    fn begin_wait(&mut self, message: &str);

    /// Called once the request has returned, successfully or not.
    fn end_wait(&mut self);
}

/// Whether the error text is shown under the advice error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorDetail {
    #[default]
    Shown,
    Hidden,
}

/// What happened in the advice section of a render.
#[derive(Debug, Clone, PartialEq)]
pub enum AdviceOutcome {
    Advice(String),
    /// No credential, so no request was made.
    Skipped,
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct Page {
    pub error_detail: ErrorDetail,
}

impl Page {
    pub fn new(error_detail: ErrorDetail) -> Self {
        Self { error_detail }
    }

    /// Render the page once: header, score, advice section, footer.
    ///
    /// Never fails; advice errors end up on the surface as a banner.
    pub async fn render<S: Surface>(
        &self,
        inputs: &Inputs,
        advisor: Option<&Advisor>,
        surface: &mut S,
    ) -> AdviceOutcome {
        surface.show(Element::Title(TITLE.to_string()));
        surface.show(Element::Markdown(INTRO.to_string()));

        surface.show(Element::Subheader(SCORE_HEADING.to_string()));
        surface.show(Element::Metric {
            label: SCORE_LABEL.to_string(),
            value: inputs.score().to_string(),
        });

        let outcome = self.advice_section(inputs, advisor, surface).await;

        surface.show(Element::Divider);
        surface.show(Element::Caption(DISCLAIMER.to_string()));
        outcome
    }

    async fn advice_section<S: Surface>(
        &self,
        inputs: &Inputs,
        advisor: Option<&Advisor>,
        surface: &mut S,
    ) -> AdviceOutcome {
        let Some(advisor) = advisor else {
            surface.show(Element::Warning(MISSING_KEY_WARNING.to_string()));
            return AdviceOutcome::Skipped;
        };

        surface.begin_wait(WAIT_MESSAGE);
        let result = advisor.advise(inputs).await;
        surface.end_wait();

        match result {
            Ok(advice) => {
                surface.show(Element::Subheader(ADVICE_HEADING.to_string()));
                surface.show(Element::Text(advice.clone()));
                AdviceOutcome::Advice(advice)
            }
            Err(e) => {
                tracing::warn!(error = %e, "advice generation failed");
                surface.show(Element::Error(ADVICE_ERROR.to_string()));
                if self.error_detail == ErrorDetail::Shown {
                    surface.show(Element::Caption(format!("Details: {e}")));
                }
                AdviceOutcome::Failed(e.to_string())
            }
        }
    }
}

/// A surface that records everything shown on it.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub elements: Vec<Element>,
    pub waits: usize,
    waiting: bool,
}

impl RecordingSurface {
    pub fn is_waiting(&self) -> bool {
        self.waiting
    }
}

impl Surface for RecordingSurface {
    fn show(&mut self, element: Element) {
        self.elements.push(element);
    }

    fn begin_wait(&mut self, _message: &str) {
        self.waits += 1;
        self.waiting = true;
    }

    fn end_wait(&mut self) {
        self.waiting = false;
    }
}
