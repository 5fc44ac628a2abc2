//! Prompt text sent to the generation backend.
//!
//! The language mix, tone and emoji asked for here are requests to the model,
//! not checked properties of the reply.

use super::{GreetingRequest, Languages};

pub fn instructions(request: &GreetingRequest, languages: &Languages) -> String {
    let category = request.category();
    format!(
        "You are a polite AI assistant. Greet {name} based on the time of day \
         ({category}, so open with \"{salutation}\"). Mix {primary} and {secondary}. \
         Add a warm tone and emojis.",
        name = request.name(),
        category = category,
        salutation = category.salutation(),
        primary = languages.primary,
        secondary = languages.secondary,
    )
}

pub fn task(request: &GreetingRequest) -> String {
    format!(
        "Give a {} greeting to {}",
        request.category().salutation(),
        request.name()
    )
}
