//! Motivational guidance generated by a hosted chat model.

use crate::inputs::Inputs;
use crate::score::LewScore;
use crate::{Error, LLMProvider, LLMRequest, Prompt};

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const SYSTEM_MESSAGE: &str = "You're a motivational LEW advisor.";

/// Model parameters for advice requests.
#[derive(Debug, Clone, PartialEq)]
pub struct AdviceSettings {
    pub model: String,
    pub temperature: f32,
}

impl Default for AdviceSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

/// Build the system and user messages for one advice request.
///
/// Slider values keep their decimal point (`7.0`, not `7`).
pub fn advice_prompt(score: LewScore, wellby: f64, risk_adjustment: f64) -> Prompt {
    let user = format!(
        "You are X50 AI, a pragmatic, motivational wellbeing advisor.\n\
         A user has a LEW score of {score}, a WELLBY score of {wellby:?}, and a risk factor of {risk_adjustment:?}.\n\
         Offer 2\u{2013}3 practical, uplifting insights about how they can improve their wellbeing\u{2014}\n\
         either through increasing life expectancy, boosting WELLBYs, or reducing risk.\n\
         Be encouraging, concise, and grounded in science-based wisdom."
    );
    Prompt::system(SYSTEM_MESSAGE).with_user(user)
}

/// Sends one advice request per call. No retries.
pub struct Advisor {
    provider: Box<dyn LLMProvider>,
    settings: AdviceSettings,
}

impl Advisor {
    pub fn new(provider: Box<dyn LLMProvider>, settings: AdviceSettings) -> Self {
        Self { provider, settings }
    }

    /// Ask the model for guidance on `inputs` and return the trimmed reply.
    pub async fn advise(&self, inputs: &Inputs) -> Result<String, Error> {
        let prompt = advice_prompt(inputs.score(), inputs.wellby(), inputs.risk_adjustment());
        let request = LLMRequest::from_prompt(&self.settings.model, &prompt)
            .temperature(self.settings.temperature);

        tracing::info!(
            provider = self.provider.name(),
            model = %self.settings.model,
            score = %inputs.score(),
            "requesting advice"
        );

        let text = self.provider.generate(&request).await?.text().await?;
        let advice = text.trim();
        if advice.is_empty() {
            return Err(Error::EmptyResponse);
        }
        Ok(advice.to_string())
    }
}
