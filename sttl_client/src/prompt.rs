//! Prompt assembly for the extraction model.

/// Instruction the extraction model was tuned on.
pub const EXTRACTION_INSTRUCTION: &str =
    "Please extract entities, relations and attributes from the following text";

/// Instruction for short search labels.
pub const LABEL_INSTRUCTION: &str = "extract labels from the text for quick search:";

/// Wrap a user turn in the ChatML template, leaving the assistant turn open.
pub fn chat_template(user: &str) -> String {
    format!("<|im_start|>user\n{user}<|im_end|><|im_start|>assistant\n")
}

/// The user message asking for an STTL encoding of `text`.
pub fn extraction_message(text: &str) -> String {
    format!("{EXTRACTION_INSTRUCTION}\n{text}")
}

/// Raw completion prompt asking for an STTL encoding of `text`.
pub fn extraction_prompt(text: &str) -> String {
    chat_template(&extraction_message(text))
}

/// The user message asking for search labels.
pub fn label_message(text: &str) -> String {
    format!("{LABEL_INSTRUCTION}\n{text}")
}

/// Raw completion prompt asking for search labels.
pub fn label_prompt(text: &str) -> String {
    chat_template(&label_message(text))
}
