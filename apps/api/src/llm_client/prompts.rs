// Shared prompt fragments.
// Each content type renders its own template in generation::prompts.
// This file contains cross-cutting instructions appended to all of them.

/// Closing directive appended to every generation prompt.
pub const JSON_ONLY_INSTRUCTION: &str = "\
I want the output to be in JSON format.
Do not include any additional text or explanations.
Do not wrap the JSON in markdown code fences.";
